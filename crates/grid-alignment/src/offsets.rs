//! Subset offset recovery.
//!
//! AORC subsets record the index window they were cut from as
//! `<axis-token>,<start>,<end>` fragments inside the free-text `history`
//! attribute (typically the `-d west_east,3500,3699` arguments of an `ncks`
//! call). Offsets are inclusive on both ends.
//!
//! A structured record (integer-pair global attributes, one per axis) takes
//! precedence; the history pattern is only a compatibility path.

use grid_common::{AttrValue, Dataset};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::AlignmentConfig;
use crate::error::{AlignmentError, Result};

/// An inclusive `(start, end)` index pair along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetPair {
    pub start: usize,
    pub end: usize,
}

impl OffsetPair {
    /// Create a pair, rejecting `start > end`.
    pub fn new(axis: &str, start: usize, end: usize) -> Result<Self> {
        if start > end {
            return Err(AlignmentError::metadata_parse(
                axis,
                format!("start {} is greater than end {}", start, end),
            ));
        }
        Ok(Self { start, end })
    }

    /// Number of indices covered (end is inclusive). Zero for a reversed
    /// pair that bypassed [`OffsetPair::new`].
    pub fn len(&self) -> usize {
        self.end.saturating_add(1).saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Where a set of offsets came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OffsetSource {
    /// Integer-pair global attributes.
    Structured,
    /// Pattern match over the provenance text.
    Provenance,
}

/// Column and row offsets of a subset within the continental grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubsetOffsets {
    pub col: OffsetPair,
    pub row: OffsetPair,
    pub source: OffsetSource,
}

/// Extract the offset pair following `axis_token` in a provenance string.
///
/// The token must appear at least once. It may appear more than once (a
/// history that records the same subsetting command twice), but every
/// occurrence must carry the same pair; differing pairs are an error.
/// The token must not be the tail of a longer identifier (`xwest_east`).
/// A pair followed by a fractional part or a third value (`west_east,10,12.5`,
/// `west_east,10,12,2`) is rejected rather than truncated.
pub fn extract_offsets(provenance: &str, axis_token: &str) -> Result<OffsetPair> {
    let pattern = format!(
        r"(?:^|[^A-Za-z0-9_]){}\s*,\s*(-?\d+)\s*,\s*(-?\d+)(\s*[.,]\s*-?\d)?",
        regex::escape(axis_token)
    );
    let re = Regex::new(&pattern)
        .map_err(|e| AlignmentError::metadata_parse(axis_token, format!("bad axis token: {}", e)))?;

    let mut found: Option<OffsetPair> = None;
    for caps in re.captures_iter(provenance) {
        if caps.get(3).is_some() {
            return Err(AlignmentError::metadata_parse(
                axis_token,
                format!("'{}' is not a pair of integer offsets", caps[0].trim_start()),
            ));
        }
        let start = parse_index(axis_token, &caps[1])?;
        let end = parse_index(axis_token, &caps[2])?;
        let pair = OffsetPair::new(axis_token, start, end)?;

        match found {
            Some(existing) if existing != pair => {
                return Err(AlignmentError::metadata_parse(
                    axis_token,
                    format!(
                        "conflicting offsets {},{} and {},{}",
                        existing.start, existing.end, pair.start, pair.end
                    ),
                ));
            }
            _ => found = Some(pair),
        }
    }

    found.ok_or_else(|| {
        AlignmentError::metadata_parse(
            axis_token,
            format!("no '{},<start>,<end>' fragment in provenance", axis_token),
        )
    })
}

fn parse_index(axis: &str, text: &str) -> Result<usize> {
    if text.starts_with('-') {
        return Err(AlignmentError::metadata_parse(
            axis,
            format!("negative offset {}", text),
        ));
    }
    text.parse::<usize>()
        .map_err(|e| AlignmentError::metadata_parse(axis, format!("invalid offset '{}': {}", text, e)))
}

/// Extract both axes from a provenance string.
pub fn offsets_from_provenance(
    provenance: &str,
    col_token: &str,
    row_token: &str,
) -> Result<SubsetOffsets> {
    Ok(SubsetOffsets {
        col: extract_offsets(provenance, col_token)?,
        row: extract_offsets(provenance, row_token)?,
        source: OffsetSource::Provenance,
    })
}

/// Read the structured offset record, if the dataset carries one.
///
/// Returns `None` when neither attribute is present. A record with only one
/// axis, or with a value that is not a pair of non-negative integers, is an
/// error rather than a reason to fall back.
pub fn offsets_from_record(
    dataset: &Dataset,
    config: &AlignmentConfig,
) -> Option<Result<SubsetOffsets>> {
    let col = dataset.attribute(&config.col_offset_attribute);
    let row = dataset.attribute(&config.row_offset_attribute);
    if col.is_none() && row.is_none() {
        return None;
    }

    let read = |axis: &str, value: Option<&AttrValue>| -> Result<OffsetPair> {
        let value = value.ok_or_else(|| {
            AlignmentError::metadata_parse(axis, "structured offset record is incomplete")
        })?;
        match value.as_ints().as_deref() {
            Some([start, end]) if *start >= 0 && *end >= 0 => {
                OffsetPair::new(axis, *start as usize, *end as usize)
            }
            _ => Err(AlignmentError::metadata_parse(
                axis,
                format!("expected two non-negative integers, got '{}'", value),
            )),
        }
    };

    Some(read(&config.col_token, col).and_then(|col| {
        read(&config.row_token, row).map(|row| SubsetOffsets {
            col,
            row,
            source: OffsetSource::Structured,
        })
    }))
}

/// Resolve subset offsets for a target dataset.
///
/// Uses the structured record when present, otherwise pattern-matches the
/// provenance attribute.
pub fn resolve_offsets(dataset: &Dataset, config: &AlignmentConfig) -> Result<SubsetOffsets> {
    if let Some(record) = offsets_from_record(dataset, config) {
        let offsets = record?;
        debug!(?offsets, "Using structured offset record");
        return Ok(offsets);
    }

    let provenance = dataset
        .attribute(&config.provenance_attribute)
        .and_then(AttrValue::as_str)
        .ok_or_else(|| {
            AlignmentError::metadata_parse(
                &config.col_token,
                format!(
                    "no structured offset record and no '{}' attribute",
                    config.provenance_attribute
                ),
            )
        })?;

    warn!(
        attribute = %config.provenance_attribute,
        "No structured offset record, extracting offsets from provenance text"
    );

    let offsets = offsets_from_provenance(provenance, &config.col_token, &config.row_token)?;
    debug!(?offsets, "Extracted offsets from provenance");
    Ok(offsets)
}
