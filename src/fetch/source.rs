//! Where site resources come from.

use crate::error::FetchError;
use std::{
    fs,
    io::ErrorKind,
    path::{Component, Path, PathBuf},
    time::Duration,
};

/// A site resource provider addressed by relative URL.
pub trait Source: Send + Sync {
    /// Fetch the resource at `url` as text.
    fn get(&self, url: &str) -> Result<String, FetchError>;
}

impl<T: Source + ?Sized> Source for &T {
    fn get(&self, url: &str) -> Result<String, FetchError> {
        (**self).get(url)
    }
}

impl<T: Source + ?Sized> Source for Box<T> {
    fn get(&self, url: &str) -> Result<String, FetchError> {
        (**self).get(url)
    }
}

// ============================================================================
// Filesystem
// ============================================================================

/// Reads resources from a site directory.
///
/// Missing files answer with status 404 and paths escaping the root with 403,
/// so callers see the same failures as with a remote source.
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a relative URL (`./Config/a.json`, `/Articles/x/article.txt`) onto
    /// the root. `None` when the URL climbs above the root.
    fn resolve(&self, url: &str) -> Option<PathBuf> {
        let path = url.split(['?', '#']).next().unwrap_or(url);
        let mut resolved = self.root.clone();
        let mut depth = 0usize;
        for component in Path::new(path.trim_start_matches('/')).components() {
            match component {
                Component::Normal(part) => {
                    resolved.push(part);
                    depth += 1;
                }
                Component::ParentDir => {
                    if depth == 0 {
                        return None;
                    }
                    resolved.pop();
                    depth -= 1;
                }
                Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
            }
        }
        Some(resolved)
    }
}

impl Source for FsSource {
    fn get(&self, url: &str) -> Result<String, FetchError> {
        let Some(path) = self.resolve(url) else {
            return Err(FetchError::Status {
                url: url.to_owned(),
                status: 403,
            });
        };
        fs::read_to_string(&path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => FetchError::Status {
                url: url.to_owned(),
                status: 404,
            },
            _ => FetchError::Io {
                url: url.to_owned(),
                source,
            },
        })
    }
}

// ============================================================================
// HTTP
// ============================================================================

/// Fetches resources relative to a base URL over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSource {
    base: String,
    client: reqwest::blocking::Client,
}

impl HttpSource {
    pub fn new(base: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| FetchError::Network {
                url: base.to_owned(),
                message: err.to_string(),
            })?;
        Ok(Self {
            base: base.trim_end_matches('/').to_owned(),
            client,
        })
    }

    fn absolute(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_owned()
        } else {
            format!("{}/{}", self.base, url.trim_start_matches("./").trim_start_matches('/'))
        }
    }
}

impl Source for HttpSource {
    fn get(&self, url: &str) -> Result<String, FetchError> {
        let absolute = self.absolute(url);
        let network = |err: reqwest::Error| FetchError::Network {
            url: absolute.clone(),
            message: err.to_string(),
        };

        let response = self.client.get(&absolute).send().map_err(network)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: absolute,
                status: status.as_u16(),
            });
        }
        response.text().map_err(network)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn site() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("Config")).unwrap();
        fs::write(dir.path().join("Config/projects.txt"), "robot\nship\n").unwrap();
        dir
    }

    #[test]
    fn test_fs_source_reads_relative_paths() {
        let dir = site();
        let source = FsSource::new(dir.path());
        assert_eq!(source.get("Config/projects.txt").unwrap(), "robot\nship\n");
        assert_eq!(source.get("./Config/projects.txt").unwrap(), "robot\nship\n");
        assert_eq!(source.get("/Config/projects.txt").unwrap(), "robot\nship\n");
    }

    #[test]
    fn test_fs_source_ignores_query() {
        let dir = site();
        let source = FsSource::new(dir.path());
        assert!(source.get("Config/projects.txt?v=2").is_ok());
    }

    #[test]
    fn test_fs_source_missing_is_404() {
        let dir = site();
        let source = FsSource::new(dir.path());
        let err = source.get("Config/missing.txt").unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn test_fs_source_rejects_escape() {
        let dir = site();
        let source = FsSource::new(dir.path().join("Config"));
        let err = source.get("../../etc/passwd").unwrap_err();
        assert_eq!(err.status(), Some(403));
        // Climbing within the root is fine
        assert!(source.get("sub/../projects.txt").is_ok());
    }

    #[test]
    fn test_http_source_absolute() {
        let source = HttpSource::new("https://example.com/site/", Duration::from_secs(5)).unwrap();
        assert_eq!(
            source.absolute("./Config/articles.json"),
            "https://example.com/site/Config/articles.json"
        );
        assert_eq!(
            source.absolute("https://cdn.example.com/a.png"),
            "https://cdn.example.com/a.png"
        );
    }
}
