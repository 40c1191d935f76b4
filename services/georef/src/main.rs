//! AORC forcing georeferencing tool.
//!
//! Loads a forcing subset and the NWM spatial metadata template, then:
//! - Recovers the subset offsets from the forcing metadata
//! - Slices and reprojects the template coordinates to longitude/latitude
//! - Writes CF coordinate and grid-mapping metadata onto a copy of the subset
//! - Optionally renders one field as a PNG map and saves the annotated dataset

mod config;
mod fetch;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use grid_alignment::align_and_annotate;
use netcdf_parser::{write_dataset, ReadOptions};
use renderer::{render_field_map, MapOptions};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use config::load_config;
use fetch::DatasetFetcher;

#[derive(Parser, Debug)]
#[command(name = "georef")]
#[command(about = "Attach NWM CONUS coordinates and CF metadata to an AORC forcing subset")]
struct Args {
    /// Forcing subset: local path, OPeNDAP URL or HTTP(S) URL
    #[arg(long, env = "GEOREF_TARGET")]
    target: String,

    /// Spatial metadata template: local path, OPeNDAP URL or HTTP(S) URL
    #[arg(long, env = "GEOREF_TEMPLATE")]
    template: String,

    /// Field to plot
    #[arg(long, default_value = "LWDOWN")]
    field: String,

    /// Time step to plot
    #[arg(long, default_value = "0")]
    time_index: usize,

    /// Write the field map to this PNG file
    #[arg(long)]
    plot: Option<PathBuf>,

    /// Longer side of the field map in pixels
    #[arg(long, default_value = "800")]
    plot_size: usize,

    /// Write the annotated dataset to this NetCDF file
    #[arg(long)]
    output: Option<PathBuf>,

    /// HTTP request timeout for remote downloads
    #[arg(long, env = "GEOREF_REQUEST_TIMEOUT_SECS", default_value = "600")]
    request_timeout_secs: u64,

    /// YAML file overriding the alignment configuration
    #[arg(long, env = "GEOREF_CONFIG")]
    config: Option<PathBuf>,

    /// Log level or filter directives, e.g. `info,grid_alignment=debug`
    #[arg(long, env = "GEOREF_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args.log_level, args.json_logs)?;

    info!(forcing = %args.target, template = %args.template, "Starting georeferencing");
    run(args).await
}

fn log_filter(directives: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(directives).with_context(|| format!("Invalid log level '{}'", directives))
}

fn init_tracing(level: &str, json: bool) -> Result<()> {
    let builder = FmtSubscriber::builder()
        .with_env_filter(log_filter(level)?)
        .with_target(true)
        .with_thread_ids(true);

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

async fn run(args: Args) -> Result<()> {
    let started = Instant::now();
    let config = load_config(args.config.as_deref())?;
    let fetcher = DatasetFetcher::new(Duration::from_secs(args.request_timeout_secs))?;

    let target = fetcher
        .load(&args.target, &ReadOptions::all())
        .await
        .context("Failed to load target dataset")?;

    // Only the coordinate and CRS variables of the template are needed
    let template_vars = [
        config.template_x_var.clone(),
        config.template_y_var.clone(),
        config.crs_variable.clone(),
    ];
    let template = fetcher
        .load(&args.template, &ReadOptions::only(template_vars))
        .await
        .context("Failed to load template dataset")?;

    let aligned = align_and_annotate(&target, &template, &config)
        .context("Failed to align target with template")?;

    let grid = &aligned.grid;
    let (rows, cols) = grid.mesh.shape();
    match grid.mesh.bounds() {
        Some(bounds) => info!(
            rows,
            cols,
            west = bounds.min_x,
            east = bounds.max_x,
            south = bounds.min_y,
            north = bounds.max_y,
            "Subset georeferenced"
        ),
        None => info!(rows, cols, "Subset georeferenced"),
    }

    if let Some(plot) = &args.plot {
        let options = MapOptions {
            max_size: args.plot_size,
            ..MapOptions::default()
        };
        let map = render_field_map(&aligned.dataset, &args.field, args.time_index, &options)
            .with_context(|| format!("Failed to render {}", args.field))?;
        tokio::fs::write(plot, &map.png)
            .await
            .with_context(|| format!("Failed to write {}", plot.display()))?;
        info!(
            path = %plot.display(),
            field = %args.field,
            time_index = args.time_index,
            width = map.width,
            height = map.height,
            "Wrote field map"
        );
    }

    if let Some(output) = args.output {
        let dataset = aligned.dataset;
        let path = output.clone();
        tokio::task::spawn_blocking(move || write_dataset(&dataset, &path))
            .await
            .context("Dataset writer task failed")?
            .with_context(|| format!("Failed to write {}", output.display()))?;
        info!(path = %output.display(), "Wrote annotated dataset");
    }

    info!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Georeferencing complete"
    );
    Ok(())
}
