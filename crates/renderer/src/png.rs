//! PNG encoding for RGBA image data.
//!
//! Supports two encoding modes:
//! - **Indexed PNG (color type 3)**: Used when image has ≤256 unique colors.
//! - **RGBA PNG (color type 6)**: Fallback for images with >256 colors.
//!
//! Field maps drawn from a colour ramp usually stay under the palette limit
//! for small subsets, so [`create_png_auto`] is the normal entry point.

use std::collections::HashMap;
use std::io::Write;

use rayon::prelude::*;

use crate::error::{RenderError, RenderResult};

/// Maximum colors for indexed PNG (PNG8)
const MAX_PALETTE_SIZE: usize = 256;

/// Minimum pixels to benefit from parallel palette extraction
const PARALLEL_THRESHOLD: usize = 4096;

const SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

type Rgba = [u8; 4];

/// Create a PNG image, indexed when the image has at most 256 colours.
pub fn create_png_auto(pixels: &[u8], width: usize, height: usize) -> RenderResult<Vec<u8>> {
    check_buffer(pixels.len(), width, height, 4)?;

    match extract_palette(pixels) {
        Some((palette, indices)) => create_png_indexed(width, height, &palette, &indices),
        None => create_png(pixels, width, height),
    }
}

/// Create an RGBA PNG (color type 6).
pub fn create_png(pixels: &[u8], width: usize, height: usize) -> RenderResult<Vec<u8>> {
    check_buffer(pixels.len(), width, height, 4)?;

    let mut png = SIGNATURE.to_vec();
    write_chunk(&mut png, b"IHDR", &header(width, height, 6));
    write_chunk(&mut png, b"IDAT", &deflate_scanlines(pixels, width * 4, height)?);
    write_chunk(&mut png, b"IEND", &[]);
    Ok(png)
}

/// Create an indexed PNG (color type 3) from a palette and per-pixel indices.
pub fn create_png_indexed(
    width: usize,
    height: usize,
    palette: &[Rgba],
    indices: &[u8],
) -> RenderResult<Vec<u8>> {
    check_buffer(indices.len(), width, height, 1)?;
    if palette.is_empty() || palette.len() > MAX_PALETTE_SIZE {
        return Err(RenderError::Encode(format!(
            "palette has {} entries",
            palette.len()
        )));
    }

    let mut png = SIGNATURE.to_vec();
    write_chunk(&mut png, b"IHDR", &header(width, height, 3));

    let plte: Vec<u8> = palette.iter().flat_map(|c| [c[0], c[1], c[2]]).collect();
    write_chunk(&mut png, b"PLTE", &plte);

    // Alpha per palette entry, only when something is see-through
    if palette.iter().any(|c| c[3] < 255) {
        let trns: Vec<u8> = palette.iter().map(|c| c[3]).collect();
        write_chunk(&mut png, b"tRNS", &trns);
    }

    write_chunk(&mut png, b"IDAT", &deflate_scanlines(indices, width, height)?);
    write_chunk(&mut png, b"IEND", &[]);
    Ok(png)
}

fn check_buffer(len: usize, width: usize, height: usize, bytes_per_pixel: usize) -> RenderResult<()> {
    if width == 0 || height == 0 || width > u32::MAX as usize || height > u32::MAX as usize {
        return Err(RenderError::InvalidSize { width, height });
    }
    let expected = width * height * bytes_per_pixel;
    if len != expected {
        return Err(RenderError::Encode(format!(
            "buffer has {} bytes, expected {}",
            len, expected
        )));
    }
    Ok(())
}

fn header(width: usize, height: usize, color_type: u8) -> Vec<u8> {
    let mut ihdr = Vec::with_capacity(13);
    ihdr.extend_from_slice(&(width as u32).to_be_bytes());
    ihdr.extend_from_slice(&(height as u32).to_be_bytes());
    ihdr.extend_from_slice(&[8, color_type, 0, 0, 0]);
    ihdr
}

/// Build the palette and index buffer, or `None` above 256 colours.
fn extract_palette(pixels: &[u8]) -> Option<(Vec<Rgba>, Vec<u8>)> {
    let palette = if pixels.len() / 4 >= PARALLEL_THRESHOLD {
        unique_colors_parallel(pixels)?
    } else {
        unique_colors(pixels)?
    };

    let lookup: HashMap<Rgba, u8> = palette
        .iter()
        .enumerate()
        .map(|(i, c)| (*c, i as u8))
        .collect();

    let indices = pixels
        .par_chunks_exact(4)
        .map(|p| lookup[&[p[0], p[1], p[2], p[3]]])
        .collect();

    Some((palette, indices))
}

fn unique_colors(pixels: &[u8]) -> Option<Vec<Rgba>> {
    let mut seen: HashMap<Rgba, ()> = HashMap::with_capacity(MAX_PALETTE_SIZE);
    let mut palette = Vec::new();
    for p in pixels.chunks_exact(4) {
        let c = [p[0], p[1], p[2], p[3]];
        if seen.insert(c, ()).is_none() {
            if palette.len() == MAX_PALETTE_SIZE {
                return None;
            }
            palette.push(c);
        }
    }
    Some(palette)
}

/// Per-thread unique colour sets merged in order of first appearance.
fn unique_colors_parallel(pixels: &[u8]) -> Option<Vec<Rgba>> {
    let chunk_size = (pixels.len() / 4 / rayon::current_num_threads()).max(256) * 4;

    let partial: Vec<Option<Vec<Rgba>>> = pixels.par_chunks(chunk_size).map(unique_colors).collect();

    let mut seen: HashMap<Rgba, ()> = HashMap::with_capacity(MAX_PALETTE_SIZE);
    let mut palette = Vec::new();
    for colors in partial {
        for c in colors? {
            if seen.insert(c, ()).is_none() {
                if palette.len() == MAX_PALETTE_SIZE {
                    return None;
                }
                palette.push(c);
            }
        }
    }
    Some(palette)
}

fn write_chunk(png: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());
    png.extend_from_slice(chunk_type);
    png.extend_from_slice(data);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    png.extend_from_slice(&hasher.finalize().to_be_bytes());
}

/// Prefix every scanline with filter type 0 and zlib-compress.
fn deflate_scanlines(data: &[u8], row_bytes: usize, height: usize) -> RenderResult<Vec<u8>> {
    let mut raw = Vec::with_capacity(height * (1 + row_bytes));
    for row in data.chunks_exact(row_bytes).take(height) {
        raw.push(0);
        raw.extend_from_slice(row);
    }

    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::fast());
    encoder
        .write_all(&raw)
        .and_then(|_| encoder.finish())
        .map_err(|e| RenderError::Encode(format!("IDAT compression failed: {}", e)))
}
