//! Resolving and reading map source locations.
//!
//! A location is either a plain filesystem path or a `file://` URL. Remote
//! schemes are rejected; fetching over a network is left to the embedding
//! application.

use crate::error::{EditorError, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    path: PathBuf,
}

impl SourceLocation {
    /// Parses a path or `file://` URL.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::UnsupportedLocation`] for any other URL scheme
    /// or a `file://` URL that does not name a local path.
    pub fn parse(location: &str) -> Result<Self> {
        let location = location.trim();
        if location.is_empty() {
            return Err(EditorError::UnsupportedLocation("empty location".to_string()));
        }

        match Url::parse(location) {
            // single-letter schemes are Windows drive letters, i.e. paths
            Ok(url) if url.scheme().len() > 1 => {
                if url.scheme() != "file" {
                    return Err(EditorError::UnsupportedLocation(format!(
                        "scheme '{}' is not supported: {}",
                        url.scheme(),
                        location
                    )));
                }
                let path = url.to_file_path().map_err(|_| {
                    EditorError::UnsupportedLocation(format!("not a local file URL: {}", location))
                })?;
                Ok(Self { path })
            }
            _ => Ok(Self {
                path: PathBuf::from(location),
            }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the extension suggests a `P5` grayscale raster.
    pub fn looks_like_pgm(&self) -> bool {
        self.has_extension(&["pgm"])
    }

    /// Whether the extension suggests a JSON grid payload.
    pub fn looks_like_json(&self) -> bool {
        self.has_extension(&["json"])
    }

    fn has_extension(&self, candidates: &[&str]) -> bool {
        self.path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| candidates.iter().any(|c| ext.eq_ignore_ascii_case(c)))
    }

    /// Reads the whole file.
    pub async fn read(&self) -> Result<Vec<u8>> {
        let bytes = tokio::fs::read(&self.path).await?;
        debug!(path = %self.path.display(), len = bytes.len(), "Read map source");
        Ok(bytes)
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_paths_pass_through() {
        let location = SourceLocation::parse("maps/floor.pgm").unwrap();
        assert_eq!(location.path(), Path::new("maps/floor.pgm"));
        assert!(location.looks_like_pgm());
        assert!(!location.looks_like_json());
    }

    #[cfg(unix)]
    #[test]
    fn file_urls_become_paths() {
        let location = SourceLocation::parse("file:///tmp/map%20one.PGM").unwrap();
        assert_eq!(location.path(), Path::new("/tmp/map one.PGM"));
        assert!(location.looks_like_pgm());
    }

    #[test]
    fn drive_letters_are_paths() {
        let location = SourceLocation::parse(r"C:\maps\grid.json").unwrap();
        assert_eq!(location.path(), Path::new(r"C:\maps\grid.json"));
    }

    #[test]
    fn remote_schemes_are_rejected() {
        for location in ["https://example.com/map.pgm", "ros://map", ""] {
            assert!(matches!(
                SourceLocation::parse(location),
                Err(EditorError::UnsupportedLocation(_))
            ));
        }
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let location = SourceLocation::parse("/definitely/not/here.pgm").unwrap();
        assert!(matches!(location.read().await, Err(EditorError::Io(_))));
    }
}
