//! Composition of the alignment stages.

use grid_common::{Dataset, DatasetError};
use projection::{LambertConformal, LccParams};
use tracing::{debug, info};

use crate::annotate::{annotate, Annotation};
use crate::config::AlignmentConfig;
use crate::error::{AlignmentError, Result};
use crate::offsets::{resolve_offsets, SubsetOffsets};
use crate::reproject::{mesh_to_geographic, GeographicMesh};
use crate::slicing::slice_reference;

/// Coordinates derived for a target subset from the template.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedGrid {
    pub offsets: SubsetOffsets,
    /// Projected x per target column
    pub x: Vec<f64>,
    /// Projected y per target row
    pub y: Vec<f64>,
    pub mesh: GeographicMesh,
    /// Template WKT, verbatim
    pub wkt: String,
    /// Projection parameters used for the mesh
    pub params: LccParams,
}

/// An annotated copy of the target together with its derived grid.
#[derive(Debug, Clone)]
pub struct AlignedDataset {
    pub dataset: Dataset,
    pub grid: AlignedGrid,
}

/// Find the WKT string in the template.
///
/// Searches the configured CRS variable first, then global attributes.
pub fn template_wkt<'a>(template: &'a Dataset, config: &AlignmentConfig) -> Result<&'a str> {
    let from_var = template.variable(&config.crs_variable).and_then(|var| {
        config
            .wkt_attributes
            .iter()
            .find_map(|name| var.attributes.get_str(name))
    });

    from_var
        .or_else(|| {
            config
                .wkt_attributes
                .iter()
                .find_map(|name| template.attributes.get_str(name))
        })
        .ok_or_else(|| {
            AlignmentError::Dataset(DatasetError::MissingAttribute(format!(
                "{}:{}",
                config.crs_variable,
                config.wkt_attributes.join("|")
            )))
        })
}

/// Run offset extraction, slicing and reprojection without touching the target.
pub fn align(target: &Dataset, template: &Dataset, config: &AlignmentConfig) -> Result<AlignedGrid> {
    config.validate().map_err(AlignmentError::Config)?;

    let offsets = resolve_offsets(target, config)?;
    info!(
        col_start = offsets.col.start,
        col_end = offsets.col.end,
        row_start = offsets.row.start,
        row_end = offsets.row.end,
        source = ?offsets.source,
        "Resolved subset offsets"
    );

    let target_rows = target.dim_len(&config.row_dim)?;
    let target_cols = target.dim_len(&config.col_dim)?;

    let col_coords = &template.require_variable(&config.template_x_var)?.data;
    let row_coords = &template.require_variable(&config.template_y_var)?.data;
    debug!(
        template_cols = col_coords.len(),
        template_rows = row_coords.len(),
        target_rows,
        target_cols,
        "Slicing template coordinates"
    );

    let sliced = slice_reference(col_coords, row_coords, &offsets, target_rows, target_cols)?;

    let wkt = template_wkt(template, config)?;
    let params = if config.projection_from_wkt {
        LccParams::from_wkt(wkt)?
    } else {
        config.projection
    };
    let proj = LambertConformal::new(params)?;

    let mesh = mesh_to_geographic(&proj, &sliced.x, &sliced.y)?;
    if let Some(bbox) = mesh.bounds() {
        info!(
            min_lon = bbox.min_x,
            min_lat = bbox.min_y,
            max_lon = bbox.max_x,
            max_lat = bbox.max_y,
            "Subset geographic extent"
        );
    }

    Ok(AlignedGrid {
        offsets,
        x: sliced.x,
        y: sliced.y,
        mesh,
        wkt: wkt.to_string(),
        params,
    })
}

/// Align `target` with `template` and return an annotated copy.
///
/// Neither input is modified. On error nothing is returned.
pub fn align_and_annotate(
    target: &Dataset,
    template: &Dataset,
    config: &AlignmentConfig,
) -> Result<AlignedDataset> {
    let grid = align(target, template, config)?;

    let mut dataset = target.clone();
    annotate(
        &mut dataset,
        &Annotation {
            x: &grid.x,
            y: &grid.y,
            mesh: &grid.mesh,
            wkt: &grid.wkt,
            params: &grid.params,
        },
        config,
    )?;

    Ok(AlignedDataset { dataset, grid })
}
