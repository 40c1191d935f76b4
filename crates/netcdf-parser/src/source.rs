//! Classification of dataset locations.

use std::fmt;
use std::path::PathBuf;

use grid_common::Dataset;

use crate::error::{NetCdfError, NetCdfResult};
use crate::reader::{open_dataset, ReadOptions};

/// Where a dataset comes from and how it has to be opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    /// A file on the local filesystem
    Local(PathBuf),
    /// A THREDDS/Hyrax OPeNDAP endpoint, opened directly by libnetcdf
    OpenDap(String),
    /// A plain HTTP(S) file that must be downloaded before it can be read
    Download(String),
}

impl DatasetSource {
    /// Classify a location string.
    ///
    /// HTTP URLs whose path contains a `/dodsC/` segment are served by an
    /// OPeNDAP server; other HTTP URLs are treated as file downloads.
    pub fn parse(location: &str) -> Self {
        let location = location.trim();
        let lower = location.to_ascii_lowercase();

        if lower.starts_with("dods://") || lower.starts_with("dap4://") {
            return Self::OpenDap(location.to_string());
        }
        if lower.starts_with("http://") || lower.starts_with("https://") {
            if lower.contains("/dodsc/") {
                return Self::OpenDap(location.to_string());
            }
            return Self::Download(location.to_string());
        }
        Self::Local(PathBuf::from(location.strip_prefix("file://").unwrap_or(location)))
    }

    /// True when the bytes have to be fetched over HTTP first.
    pub fn needs_download(&self) -> bool {
        matches!(self, Self::Download(_))
    }

    /// Open a local file or OPeNDAP endpoint.
    ///
    /// Download sources are rejected: fetch the bytes and use
    /// [`crate::load_dataset_from_bytes`] instead.
    pub fn open(&self, options: &ReadOptions) -> NetCdfResult<Dataset> {
        match self {
            Self::Local(path) => open_dataset(&path.to_string_lossy(), options),
            Self::OpenDap(url) => open_dataset(url, options),
            Self::Download(url) => Err(NetCdfError::remote_fetch(
                url.as_str(),
                "source must be downloaded before it can be opened",
            )),
        }
    }
}

impl fmt::Display for DatasetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local(path) => write!(f, "{}", path.display()),
            Self::OpenDap(url) => write!(f, "opendap:{}", url),
            Self::Download(url) => write!(f, "{}", url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thredds_url_is_opendap() {
        let url = "https://thredds.hydroshare.org/thredds/dodsC/hydroshare/resources/abc/data/contents/subset.nc";
        assert_eq!(DatasetSource::parse(url), DatasetSource::OpenDap(url.to_string()));
    }

    #[test]
    fn test_plain_http_is_download() {
        let url = "https://www.hydroshare.org/resource/abc/data/contents/template.nc";
        let source = DatasetSource::parse(url);
        assert!(source.needs_download());
    }

    #[test]
    fn test_local_paths() {
        assert_eq!(
            DatasetSource::parse("/data/aorc/subset.nc"),
            DatasetSource::Local(PathBuf::from("/data/aorc/subset.nc"))
        );
        assert_eq!(
            DatasetSource::parse("file:///data/template.nc"),
            DatasetSource::Local(PathBuf::from("/data/template.nc"))
        );
    }

    #[test]
    fn test_download_source_cannot_be_opened_directly() {
        let source = DatasetSource::parse("http://example.com/file.nc");
        assert!(matches!(
            source.open(&ReadOptions::all()),
            Err(NetCdfError::RemoteFetch { .. })
        ));
    }
}
