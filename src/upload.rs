//! Bulk upload of generated claims to an object store.
//!
//! Every regular file under a directory becomes one object keyed
//! `/<parent directory name>/<file name>`, so a run directory named by a
//! UUID maps to a prefix of the same name in the bucket.

use std::path::{Path, PathBuf};

use aws_sdk_s3::Client;
use aws_sdk_s3::config::{BehaviorVersion, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use tokio::runtime::Handle;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::{ClaimError, ClaimResult};

/// One file to upload and the key it is stored under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadObject {
    /// Object key.
    pub key: String,
    /// Local file.
    pub path: PathBuf,
}

/// A bulk object store.
pub trait ObjectStore: Send + Sync {
    /// Streams the file at `path` to the store under `key`.
    fn put_object(&self, key: &str, path: &Path) -> ClaimResult<()>;

    /// Returns the public URL of the object stored under `key`.
    fn public_url(&self, key: &str) -> String;
}

/// Returns the object key for a file: `/<parent base name>/<file base name>`.
///
/// # Examples
///
/// ```
/// use oncall_claim::upload::object_key;
/// use std::path::Path;
///
/// let key = object_key(Path::new("/tmp/4f1c/2024-01-01 until 2024-01-15 Alice support oncall claim.pdf"));
/// assert_eq!(key, "/4f1c/2024-01-01 until 2024-01-15 Alice support oncall claim.pdf");
/// ```
pub fn object_key(path: &Path) -> String {
    let base_name = |p: Option<&Path>| {
        p.and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    };

    format!("/{}/{}", base_name(path.parent()), base_name(Some(path)))
}

/// Lists every regular file under `directory`, recursively.
///
/// # Errors
///
/// Returns [`ClaimError::Upload`] naming the directory when it cannot be
/// walked.
pub fn collect_upload_objects(directory: &Path) -> ClaimResult<Vec<UploadObject>> {
    let mut objects = Vec::new();

    for entry in WalkDir::new(directory) {
        let entry = entry.map_err(|e| ClaimError::Upload {
            key: directory.display().to_string(),
            message: e.to_string(),
        })?;

        if entry.file_type().is_file() {
            let path = entry.into_path();
            objects.push(UploadObject {
                key: object_key(&path),
                path,
            });
        }
    }

    Ok(objects)
}

/// Uploads every regular file under `directory`, returning the stored keys.
///
/// Stops at the first failed upload.
pub fn upload_directory(store: &dyn ObjectStore, directory: &Path) -> ClaimResult<Vec<String>> {
    let keys = put_all(store, collect_upload_objects(directory)?)?;

    info!(
        directory = %directory.display(),
        objects = keys.len(),
        "Upload complete"
    );
    Ok(keys)
}

/// Uploads exactly `files`, returning the stored keys in the same order.
///
/// Stops at the first failed upload.
pub fn upload_files(store: &dyn ObjectStore, files: &[PathBuf]) -> ClaimResult<Vec<String>> {
    let objects = files
        .iter()
        .map(|path| UploadObject {
            key: object_key(path),
            path: path.clone(),
        })
        .collect();
    let keys = put_all(store, objects)?;

    info!(objects = keys.len(), "Upload complete");
    Ok(keys)
}

fn put_all(store: &dyn ObjectStore, objects: Vec<UploadObject>) -> ClaimResult<Vec<String>> {
    let mut keys = Vec::with_capacity(objects.len());

    for object in objects {
        debug!(key = %object.key, path = %object.path.display(), "Uploading");
        store.put_object(&object.key, &object.path)?;
        keys.push(object.key);
    }

    Ok(keys)
}

/// An S3 bucket, written through the AWS SDK.
///
/// Requests are signed with the credentials of the default provider chain
/// (environment, profile, instance role). The SDK is async; calls are driven
/// on the runtime captured at construction, so [`ObjectStore::put_object`]
/// must run on a blocking thread or outside any runtime.
#[derive(Debug, Clone)]
pub struct S3Store {
    client: Client,
    bucket: String,
    runtime: Handle,
}

impl S3Store {
    /// Connects to `bucket` in `region` using the default credential chain.
    ///
    /// Must be awaited on a multi-threaded runtime that outlives the store.
    pub async fn connect(bucket: impl Into<String>, region: impl Into<String>) -> Self {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.into()))
            .load()
            .await;

        Self::with_client(Client::new(&sdk_config), bucket, Handle::current())
    }

    /// Wraps an already configured client.
    pub fn with_client(client: Client, bucket: impl Into<String>, runtime: Handle) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            runtime,
        }
    }
}

impl ObjectStore for S3Store {
    fn put_object(&self, key: &str, path: &Path) -> ClaimResult<()> {
        let upload_error = |message: String| ClaimError::Upload {
            key: key.to_string(),
            message,
        };

        self.runtime.block_on(async {
            let body = ByteStream::from_path(path)
                .await
                .map_err(|e| upload_error(e.to_string()))?;

            self.client
                .put_object()
                .bucket(&self.bucket)
                .key(s3_key(key))
                .content_type("application/pdf")
                .body(body)
                .send()
                .await
                .map_err(|e| upload_error(DisplayErrorContext(&e).to_string()))?;

            Ok(())
        })
    }

    fn public_url(&self, key: &str) -> String {
        format!(
            "https://{}.s3.amazonaws.com/{}",
            self.bucket,
            encode_key(s3_key(key))
        )
    }
}

/// S3 keys are stored without the leading separator.
fn s3_key(key: &str) -> &str {
    key.trim_start_matches('/')
}

/// Percent-encodes each segment of a key, keeping the separators.
fn encode_key(key: &str) -> String {
    key.split('/')
        .map(urlencoding::encode)
        .collect::<Vec<_>>()
        .join("/")
}
