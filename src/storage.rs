// src/storage.rs
use std::time::Duration;

use crate::auth::token::generate_key_suffix;
use crate::domain::form::ImageFile;
use crate::errors::ServerError;

/// Seam for the submission pipeline so tests can stub the network.
pub trait BlobStore {
    /// Store `data` under `key`, returning a durable retrieval URL.
    fn put_object(&self, key: &str, data: &[u8], content_type: &str)
        -> Result<String, ServerError>;
}

/// HTTP object store: PUT {base}/{bucket}/{key} with a bearer key. The
/// same URL serves the object back, so it doubles as the durable URL.
pub struct ObjectStore {
    client: reqwest::blocking::Client,
    base_url: String,
    bucket: String,
    api_key: String,
}

impl ObjectStore {
    pub fn new(base_url: String, bucket: String, api_key: String) -> Result<Self, ServerError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(360))
            .build()
            .map_err(|e| ServerError::Upload(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            bucket,
            api_key,
        })
    }

    fn object_url(&self, key: &str) -> String {
        format!("{}/{}/{}", self.base_url, self.bucket, key)
    }
}

impl BlobStore for ObjectStore {
    fn put_object(
        &self,
        key: &str,
        data: &[u8],
        content_type: &str,
    ) -> Result<String, ServerError> {
        let url = self.object_url(key);

        let resp = self
            .client
            .put(&url)
            .bearer_auth(&self.api_key)
            .header("Content-Type", content_type)
            .body(data.to_vec())
            .send()
            .map_err(|e| ServerError::Upload(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().unwrap_or_else(|_| "(no body)".to_string());
            return Err(ServerError::Upload(format!(
                "object store HTTP {status}: {text}"
            )));
        }

        Ok(url)
    }
}

/// Storage key: owner id + sanitized original filename + random suffix,
/// so re-uploads of the same file never collide.
pub fn object_key(user_id: i64, filename: &str) -> String {
    let safe: String = filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect();
    format!("{user_id}-{safe}-{}", generate_key_suffix())
}

/// Upload the whole selection concurrently and join before returning.
/// Any failure fails the batch; objects already stored are not deleted
/// (accepted orphan risk).
pub fn store_images<S: BlobStore + Sync>(
    store: &S,
    user_id: i64,
    images: &[ImageFile],
) -> Result<Vec<String>, ServerError> {
    eprintln!("🖼  Uploading {} image(s)", images.len());

    let results: Vec<Result<String, ServerError>> = std::thread::scope(|scope| {
        let handles: Vec<_> = images
            .iter()
            .map(|image| {
                let key = object_key(user_id, &image.filename);
                scope.spawn(move || store.put_object(&key, &image.data, &image.content_type))
            })
            .collect();

        handles
            .into_iter()
            .map(|h| {
                h.join()
                    .unwrap_or_else(|_| Err(ServerError::Upload("upload thread panicked".into())))
            })
            .collect()
    });

    let mut urls = Vec::with_capacity(results.len());
    for result in results {
        match result {
            Ok(url) => urls.push(url),
            Err(e) => {
                eprintln!("⚠️ Image upload failed: {e}");
                return Err(ServerError::Upload("Image upload failed".into()));
            }
        }
    }

    Ok(urls)
}
