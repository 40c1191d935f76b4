//! Tests for PNG encoding functionality.
//!
//! Covers the indexed and RGBA encoders and the format selection done by
//! `create_png_auto` for ramp-coloured field data.

use renderer::gradient::{render_grid, ColorRamp};
use renderer::png::{create_png, create_png_auto, create_png_indexed};
use renderer::RenderError;

const SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

// ============================================================================
// Helper functions
// ============================================================================

/// Colour type byte of the IHDR chunk
fn color_type(png: &[u8]) -> u8 {
    png[25]
}

/// Image dimensions from the IHDR chunk
fn dimensions(png: &[u8]) -> (u32, u32) {
    let w = u32::from_be_bytes([png[16], png[17], png[18], png[19]]);
    let h = u32::from_be_bytes([png[20], png[21], png[22], png[23]]);
    (w, h)
}

fn has_chunk(png: &[u8], name: &[u8; 4]) -> bool {
    png.windows(4).any(|w| w == name)
}

/// Smooth field drawn with a ramp, with a NaN hole in the middle
fn ramp_pixels(width: usize, height: usize) -> Vec<u8> {
    let data: Vec<f64> = (0..width * height)
        .map(|i| {
            let (r, c) = (i / width, i % width);
            if r == height / 2 && c == width / 2 {
                f64::NAN
            } else {
                ((r * 8 / height) * 8 + c * 8 / width) as f64
            }
        })
        .collect();
    // 64 distinct values plus transparent stays under the palette limit
    render_grid(&data, width, height, 0.0, 63.0, &ColorRamp::viridis())
}

// ============================================================================
// Basic PNG creation tests
// ============================================================================

#[test]
fn test_create_png_simple() {
    let pixels = [
        255, 0, 0, 255, // red
        0, 255, 0, 255, // green
        0, 255, 0, 255, // green
        255, 0, 0, 255, // red
    ];

    let png = create_png_auto(&pixels, 2, 2).unwrap();
    assert_eq!(&png[0..8], &SIGNATURE);
    assert_eq!(dimensions(&png), (2, 2));
    assert_eq!(color_type(&png), 3);
    assert!(!has_chunk(&png, b"tRNS"));
}

#[test]
fn test_create_png_rgba() {
    let pixels = [
        255, 0, 0, 255, // red
        0, 255, 0, 255, // green
        0, 0, 255, 255, // blue
        255, 255, 0, 255, // yellow
    ];

    let png = create_png(&pixels, 2, 2).unwrap();
    assert_eq!(&png[0..8], &SIGNATURE);
    assert_eq!(color_type(&png), 6);
    assert!(png.ends_with(&[0xAE, 0x42, 0x60, 0x82]));
}

#[test]
fn test_transparency_emits_trns() {
    let pixels = [
        255, 0, 0, 255, // red, opaque
        0, 0, 0, 0, // transparent
        0, 255, 0, 128, // green, semi-transparent
        0, 0, 255, 255, // blue, opaque
    ];

    let png = create_png_auto(&pixels, 2, 2).unwrap();
    assert_eq!(color_type(&png), 3);
    assert!(has_chunk(&png, b"tRNS"));
}

// ============================================================================
// Format selection tests
// ============================================================================

#[test]
fn test_rgba_fallback_many_colors() {
    let pixels: Vec<u8> = (0..300u32)
        .flat_map(|i| [(i % 256) as u8, (i / 2 % 256) as u8, (i / 3 % 256) as u8, 255])
        .collect();

    let png = create_png_auto(&pixels, 300, 1).unwrap();
    assert_eq!(color_type(&png), 6);
}

#[test]
fn test_ramp_field_is_indexed_and_smaller() {
    let pixels = ramp_pixels(64, 64);

    let indexed = create_png_auto(&pixels, 64, 64).unwrap();
    let rgba = create_png(&pixels, 64, 64).unwrap();

    assert_eq!(color_type(&indexed), 3);
    assert!(
        indexed.len() < rgba.len(),
        "Indexed PNG ({} bytes) should be smaller than RGBA ({} bytes)",
        indexed.len(),
        rgba.len()
    );
}

#[test]
fn test_large_image_parallel_extraction() {
    // 128x128 is above the parallel palette threshold
    let pixels = ramp_pixels(128, 128);
    let png = create_png_auto(&pixels, 128, 128).unwrap();
    assert_eq!(&png[0..8], &SIGNATURE);
    assert_eq!(dimensions(&png), (128, 128));
}

// ============================================================================
// Error cases
// ============================================================================

#[test]
fn test_buffer_length_mismatch() {
    let err = create_png(&[0u8; 12], 2, 2).unwrap_err();
    assert!(matches!(err, RenderError::Encode(_)));
}

#[test]
fn test_zero_size_rejected() {
    let err = create_png_auto(&[], 0, 4).unwrap_err();
    assert!(matches!(err, RenderError::InvalidSize { width: 0, height: 4 }));
}

#[test]
fn test_indexed_requires_palette() {
    let err = create_png_indexed(1, 1, &[], &[0]).unwrap_err();
    assert!(matches!(err, RenderError::Encode(_)));
}
