//! Reference grid slicing.
//!
//! Cuts the template's 1-D projected coordinate arrays down to the window a
//! subset was taken from. Column offsets index the template directly. Row
//! offsets count in the opposite vertical direction from the template's row
//! storage, so the row window is flipped about the template height before
//! slicing (see [`flipped_row_window`]).

use std::ops::Range;

use crate::error::{AlignmentError, Result};
use crate::offsets::{OffsetPair, SubsetOffsets};

/// Projected coordinates sliced to a subset window.
#[derive(Debug, Clone, PartialEq)]
pub struct SlicedCoordinates {
    /// Projected x, one per target column
    pub x: Vec<f64>,
    /// Projected y, one per target row
    pub y: Vec<f64>,
}

/// Half-open template index range for an inclusive column window.
pub fn column_window(col: OffsetPair, template_width: usize) -> Result<Range<usize>> {
    check_order("column", col)?;
    if col.end >= template_width {
        return Err(AlignmentError::dimension_mismatch(
            "column",
            template_width,
            col.end + 1,
        ));
    }
    Ok(col.start..col.end + 1)
}

/// Half-open template index range for an inclusive row window, flipped
/// about the template height.
///
/// For a template of height `H` and rows `(start, end)` this is
/// `H - end - 1 .. H - start`, which has exactly `end - start + 1` elements.
pub fn flipped_row_window(row: OffsetPair, template_height: usize) -> Result<Range<usize>> {
    check_order("row", row)?;
    if row.end >= template_height {
        return Err(AlignmentError::dimension_mismatch(
            "row",
            template_height,
            row.end + 1,
        ));
    }
    Ok(template_height - row.end - 1..template_height - row.start)
}

// Pairs built by hand or deserialized skip the check in `OffsetPair::new`
fn check_order(axis: &str, pair: OffsetPair) -> Result<()> {
    OffsetPair::new(axis, pair.start, pair.end).map(|_| ())
}

/// Slice template coordinates to the subset window and check the result
/// against the target grid's dimension sizes.
pub fn slice_reference(
    col_coords: &[f64],
    row_coords: &[f64],
    offsets: &SubsetOffsets,
    target_rows: usize,
    target_cols: usize,
) -> Result<SlicedCoordinates> {
    let cols = column_window(offsets.col, col_coords.len())?;
    let rows = flipped_row_window(offsets.row, row_coords.len())?;

    let x = col_coords[cols].to_vec();
    let y = row_coords[rows].to_vec();

    if x.len() != target_cols {
        return Err(AlignmentError::dimension_mismatch("column", target_cols, x.len()));
    }
    if y.len() != target_rows {
        return Err(AlignmentError::dimension_mismatch("row", target_rows, y.len()));
    }

    Ok(SlicedCoordinates { x, y })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::offsets::OffsetSource;

    fn offsets(col: (usize, usize), row: (usize, usize)) -> SubsetOffsets {
        SubsetOffsets {
            col: OffsetPair { start: col.0, end: col.1 },
            row: OffsetPair { start: row.0, end: row.1 },
            source: OffsetSource::Provenance,
        }
    }

    #[test]
    fn test_flipped_row_window_reference_case() {
        let reference: Vec<f64> = (0..10).map(|v| v as f64).collect();
        let window = flipped_row_window(OffsetPair { start: 2, end: 5 }, reference.len()).unwrap();
        assert_eq!(window, 4..8);
        assert_eq!(reference[window], [4.0, 5.0, 6.0, 7.0]);
    }

    #[test]
    fn test_flipped_row_window_full_height() {
        assert_eq!(
            flipped_row_window(OffsetPair { start: 0, end: 9 }, 10).unwrap(),
            0..10
        );
    }

    #[test]
    fn test_flipped_row_window_edges() {
        // First target row maps to the last template row
        assert_eq!(flipped_row_window(OffsetPair { start: 0, end: 0 }, 10).unwrap(), 9..10);
        assert_eq!(flipped_row_window(OffsetPair { start: 9, end: 9 }, 10).unwrap(), 0..1);
    }

    #[test]
    fn test_row_window_beyond_template() {
        let err = flipped_row_window(OffsetPair { start: 5, end: 10 }, 10).unwrap_err();
        assert_eq!(err, AlignmentError::dimension_mismatch("row", 10, 11));
    }

    #[test]
    fn test_reversed_pairs_rejected() {
        let reversed = OffsetPair { start: 5, end: 2 };
        assert_eq!(
            column_window(reversed, 10).unwrap_err(),
            AlignmentError::metadata_parse("column", "start 5 is greater than end 2")
        );
        assert_eq!(
            flipped_row_window(reversed, 10).unwrap_err(),
            AlignmentError::metadata_parse("row", "start 5 is greater than end 2")
        );
    }

    #[test]
    fn test_slice_reference_reversed_offsets() {
        let coords: Vec<f64> = (0..10).map(|v| v as f64).collect();

        let err = slice_reference(&coords, &coords, &offsets((5, 2), (0, 1)), 2, 4).unwrap_err();
        assert!(matches!(err, AlignmentError::MetadataParse { ref axis, .. } if axis == "column"));

        let err = slice_reference(&coords, &coords, &offsets((0, 1), (7, 3)), 5, 2).unwrap_err();
        assert!(matches!(err, AlignmentError::MetadataParse { ref axis, .. } if axis == "row"));
    }

    #[test]
    fn test_column_window_inclusive() {
        assert_eq!(column_window(OffsetPair { start: 10, end: 12 }, 20).unwrap(), 10..13);
        assert!(column_window(OffsetPair { start: 10, end: 20 }, 20).is_err());
    }

    #[test]
    fn test_slice_reference_matches_target() {
        let x: Vec<f64> = (0..20).map(|v| v as f64 * 1000.0).collect();
        let y: Vec<f64> = (0..30).map(|v| v as f64 * 1000.0).collect();

        let sliced = slice_reference(&x, &y, &offsets((10, 12), (20, 23)), 4, 3).unwrap();
        assert_eq!(sliced.x, vec![10_000.0, 11_000.0, 12_000.0]);
        assert_eq!(sliced.y, vec![6_000.0, 7_000.0, 8_000.0, 9_000.0]);
    }

    #[test]
    fn test_slice_reference_column_mismatch() {
        let x: Vec<f64> = (0..20).map(|v| v as f64).collect();
        let y: Vec<f64> = (0..30).map(|v| v as f64).collect();

        let err = slice_reference(&x, &y, &offsets((10, 12), (20, 23)), 4, 5).unwrap_err();
        assert_eq!(err, AlignmentError::dimension_mismatch("column", 5, 3));
    }

    #[test]
    fn test_slice_reference_row_mismatch() {
        let x: Vec<f64> = (0..20).map(|v| v as f64).collect();
        let y: Vec<f64> = (0..30).map(|v| v as f64).collect();

        let err = slice_reference(&x, &y, &offsets((10, 12), (20, 22)), 4, 3).unwrap_err();
        assert_eq!(err, AlignmentError::dimension_mismatch("row", 4, 3));
    }
}
