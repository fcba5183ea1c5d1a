//! Claim form template retrieval.
//!
//! The claim form background is a published image. [`CachedTemplate`]
//! downloads it once into the temp directory and reuses that copy on later
//! runs; [`LocalTemplate`] points at a file that is already on disk.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use reqwest::blocking::Client;
use tempfile::NamedTempFile;
use tracing::info;

use crate::error::{ClaimError, ClaimResult};

/// Where the claim form image is published.
pub const DEFAULT_TEMPLATE_URL: &str =
    "https://user-images.githubusercontent.com/898384/54095034-e4fc0380-43df-11e9-8ad2-c263b3a71c71.png";

/// File name of the cached template.
pub const TEMPLATE_FILE_NAME: &str = "template.png";

/// A supplier of a readable template image path.
pub trait TemplateSource: Send + Sync {
    /// Returns the path of the template, fetching it first if needed.
    fn template_path(&self) -> ClaimResult<PathBuf>;
}

/// A template that already exists on disk.
#[derive(Debug, Clone)]
pub struct LocalTemplate {
    path: PathBuf,
}

impl LocalTemplate {
    /// Uses the file at `path` as the template.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TemplateSource for LocalTemplate {
    fn template_path(&self) -> ClaimResult<PathBuf> {
        Ok(self.path.clone())
    }
}

/// A downloaded template, cached at a fixed path.
///
/// The cache is written to a temporary file beside it and renamed into
/// place, so readers only ever see a complete image. Clones share one
/// download lock.
#[derive(Debug, Clone)]
pub struct CachedTemplate {
    client: Client,
    url: String,
    cache_path: PathBuf,
    download_lock: Arc<Mutex<()>>,
}

impl Default for CachedTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATE_URL, std::env::temp_dir().join(TEMPLATE_FILE_NAME))
    }
}

impl CachedTemplate {
    /// Caches the image at `url` under `cache_path`.
    pub fn new(url: impl Into<String>, cache_path: impl Into<PathBuf>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
            cache_path: cache_path.into(),
            download_lock: Arc::new(Mutex::new(())),
        }
    }

    /// An empty file is left behind by an interrupted write; treat it as absent.
    fn is_cached(&self) -> bool {
        fs::metadata(&self.cache_path).is_ok_and(|meta| meta.is_file() && meta.len() > 0)
    }

    fn download(&self) -> ClaimResult<()> {
        let download_error = |message: String| ClaimError::TemplateDownload {
            url: self.url.clone(),
            message,
        };

        let response = self
            .client
            .get(&self.url)
            .send()
            .map_err(|e| download_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(download_error(format!("bad status: {}", status)));
        }

        let bytes = response.bytes().map_err(|e| download_error(e.to_string()))?;
        if bytes.is_empty() {
            return Err(download_error("empty response body".to_string()));
        }

        let directory = self
            .cache_path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let mut staged =
            NamedTempFile::new_in(directory).map_err(|e| download_error(e.to_string()))?;
        staged
            .write_all(&bytes)
            .and_then(|()| staged.as_file().sync_all())
            .map_err(|e| download_error(e.to_string()))?;
        staged
            .persist(&self.cache_path)
            .map_err(|e| download_error(e.error.to_string()))?;

        info!(
            url = %self.url,
            path = %self.cache_path.display(),
            bytes = bytes.len(),
            "Downloaded claim form template"
        );
        Ok(())
    }
}

impl TemplateSource for CachedTemplate {
    fn template_path(&self) -> ClaimResult<PathBuf> {
        if self.is_cached() {
            return Ok(self.cache_path.clone());
        }

        // A poisoned lock only means another download failed; retry here.
        let _guard = self
            .download_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if !self.is_cached() {
            self.download()?;
        }
        Ok(self.cache_path.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use std::net::TcpListener;
    use std::thread;

    /// Serves one raw HTTP response on a local port and returns its URL.
    fn serve_once(response: Vec<u8>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let _ = stream.write_all(&response);
        });
        format!("http://{}/template.png", addr)
    }

    fn closed_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}/template.png", addr)
    }

    fn entries(dir: &Path) -> Vec<PathBuf> {
        fs::read_dir(dir).unwrap().map(|e| e.unwrap().path()).collect()
    }

    #[test]
    fn test_local_template_returns_path() {
        let source = LocalTemplate::new("/srv/claim/template.png");
        assert_eq!(
            source.template_path().unwrap(),
            PathBuf::from("/srv/claim/template.png")
        );
    }

    #[test]
    fn test_cached_template_skips_download_when_present() {
        let dir = tempfile::tempdir().unwrap();
        let cache_path = dir.path().join(TEMPLATE_FILE_NAME);
        fs::write(&cache_path, b"cached").unwrap();

        // An unroutable URL proves no request is made
        let source = CachedTemplate::new("http://invalid.invalid/template.png", &cache_path);

        assert_eq!(source.template_path().unwrap(), cache_path);
        assert_eq!(fs::read(&cache_path).unwrap(), b"cached");
    }

    #[test]
    fn test_cached_template_downloads_into_place() {
        let dir = tempfile::tempdir().unwrap();
        let cache_path = dir.path().join(TEMPLATE_FILE_NAME);
        let url = serve_once(
            b"HTTP/1.1 200 OK\r\nContent-Length: 5\r\nConnection: close\r\n\r\nimage".to_vec(),
        );

        let source = CachedTemplate::new(url, &cache_path);

        assert_eq!(source.template_path().unwrap(), cache_path);
        assert_eq!(fs::read(&cache_path).unwrap(), b"image");
        assert_eq!(entries(dir.path()), vec![cache_path]);
    }

    #[test]
    fn test_truncated_download_is_never_cached() {
        let dir = tempfile::tempdir().unwrap();
        let cache_path = dir.path().join(TEMPLATE_FILE_NAME);
        // Promises 100 bytes, sends 5, then hangs up
        let url = serve_once(
            b"HTTP/1.1 200 OK\r\nContent-Length: 100\r\nConnection: close\r\n\r\nimage"
                .to_vec(),
        );

        let source = CachedTemplate::new(url, &cache_path);

        assert!(matches!(
            source.template_path(),
            Err(ClaimError::TemplateDownload { .. })
        ));
        assert!(entries(dir.path()).is_empty());
    }

    #[test]
    fn test_bad_status_is_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let cache_path = dir.path().join(TEMPLATE_FILE_NAME);
        let url = serve_once(
            b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n".to_vec(),
        );

        let source = CachedTemplate::new(url, &cache_path);

        match source.template_path() {
            Err(ClaimError::TemplateDownload { message, .. }) => assert!(message.contains("404")),
            other => panic!("Expected TemplateDownload error, got {:?}", other),
        }
        assert!(!cache_path.exists());
    }

    #[test]
    fn test_empty_cache_file_is_refetched() {
        let dir = tempfile::tempdir().unwrap();
        let cache_path = dir.path().join(TEMPLATE_FILE_NAME);
        fs::write(&cache_path, b"").unwrap();

        let source = CachedTemplate::new(closed_url(), &cache_path);

        assert!(matches!(
            source.template_path(),
            Err(ClaimError::TemplateDownload { .. })
        ));
    }

    #[test]
    fn test_default_cache_lives_in_temp_dir() {
        let source = CachedTemplate::default();
        assert_eq!(source.cache_path, std::env::temp_dir().join("template.png"));
        assert_eq!(source.url, DEFAULT_TEMPLATE_URL);
    }
}
