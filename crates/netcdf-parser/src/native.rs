//! Loading downloaded NetCDF bytes with the native netcdf library.
//!
//! # Performance Notes
//!
//! The netcdf library requires a file path (it wraps libnetcdf/HDF5 which need
//! file handles). When reading from bytes, we write to a temp file first.
//!
//! On Linux, we use `/dev/shm` (memory-backed tmpfs) to minimize I/O latency.
//! Benchmarks show this reduces temp file overhead from ~2-5ms to ~0.5-1ms.

use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Once;

use grid_common::Dataset;
use tracing::debug;

use crate::error::{NetCdfError, NetCdfResult};
use crate::reader::{read_file, ReadOptions};

/// Stop HDF5 from printing its error stack to stderr.
///
/// libnetcdf probes for optional attributes and groups, and HDF5 reports
/// every failed probe as `HDF5-DIAG` noise even though the caller handles
/// it. Runs once per process; call it before the first file is opened.
pub fn silence_hdf5_errors() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        // SAFETY: H5Eset_auto2 is thread-safe and we're passing null pointers
        // to disable error output, which is a documented valid use.
        unsafe {
            hdf5_metno_sys::h5e::H5Eset_auto2(
                hdf5_metno_sys::h5e::H5E_DEFAULT,
                None,
                std::ptr::null_mut(),
            );
        }
    });
}

/// Read a NetCDF file that has already been downloaded into memory.
///
/// libnetcdf needs a file path, so the bytes are written to a temporary file
/// that is removed again once the dataset has been read.
pub fn load_dataset_from_bytes(data: &[u8], options: &ReadOptions) -> NetCdfResult<Dataset> {
    silence_hdf5_errors();

    // Use memory-backed filesystem on Linux for faster I/O
    let temp_dir = get_optimal_temp_dir();
    let temp_file = temp_dir.join(generate_temp_filename());

    let mut file = std::fs::File::create(&temp_file)?;
    file.write_all(data)?;
    drop(file);

    let result = netcdf::open(&temp_file)
        .map_err(|e| NetCdfError::Open {
            location: format!("<{} downloaded bytes>", data.len()),
            reason: e.to_string(),
        })
        .and_then(|nc_file| read_file(&nc_file, options));

    // Clean up
    let _ = std::fs::remove_file(&temp_file);

    let dataset = result?;
    debug!(
        bytes = data.len(),
        variables = dataset.variables().len(),
        "Loaded NetCDF dataset from memory"
    );
    Ok(dataset)
}

// =============================================================================
// Internal helpers
// =============================================================================

/// Get the optimal temp directory for NetCDF file operations.
///
/// On Linux, uses /dev/shm (memory-backed tmpfs) if available for faster I/O.
/// Falls back to the system temp directory on other platforms or if /dev/shm is unavailable.
fn get_optimal_temp_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        use std::path::Path;
        let shm_path = Path::new("/dev/shm");
        if shm_path.exists() && shm_path.is_dir() {
            // Verify we can write to /dev/shm
            let test_path = shm_path.join(format!(".netcdf_test_{}", std::process::id()));
            if std::fs::write(&test_path, b"test").is_ok() {
                let _ = std::fs::remove_file(&test_path);
                return shm_path.to_path_buf();
            }
        }
    }

    std::env::temp_dir()
}

/// Generate a unique temp file name for concurrent safety.
/// Uses process ID, thread ID, and a counter to ensure uniqueness.
fn generate_temp_filename() -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let pid = std::process::id();
    let tid = std::thread::current().id();
    let count = COUNTER.fetch_add(1, Ordering::Relaxed);

    format!("georef_native_{}_{:?}_{}.nc", pid, tid, count)
}
