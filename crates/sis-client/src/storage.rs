//! Attachment storage over the storage service's object REST API.

use std::future::Future;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue, InvalidHeaderValue};
use serde::Serialize;

use crate::config::{ClientConfig, StorageConfig};
use crate::error::{ClientError, Result};
use crate::traits::ObjectStore;

/// Object key for an entity attachment: `{folder}/{id}.{ext}`.
#[must_use]
pub fn object_key(folder: &str, id: &str, extension: &str) -> String {
    format!(
        "{}/{}.{}",
        folder.trim_matches('/'),
        id.trim(),
        extension.trim_start_matches('.')
    )
}

/// File extension used when storing an image of the given MIME type.
#[must_use]
pub fn extension_for(content_type: &str) -> Option<&'static str> {
    match content_type.trim().to_ascii_lowercase().as_str() {
        "image/png" => Some("png"),
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/webp" => Some("webp"),
        "image/gif" => Some("gif"),
        _ => None,
    }
}

#[derive(Serialize)]
struct RemoveRequest<'a> {
    prefixes: [&'a str; 1],
}

/// [`ObjectStore`] backed by an HTTP storage service.
#[derive(Debug, Clone)]
pub struct HttpObjectStore {
    client: reqwest::Client,
    root: String,
    bucket: String,
}

impl HttpObjectStore {
    /// Build a store from configuration. Fails when storage is not configured.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let storage = &config.storage;
        let Some(base_url) = storage.base_url.as_deref().filter(|_| storage.is_configured()) else {
            return Err(ClientError::Config(
                "storage.base_url is not set; attachments are unavailable".to_string(),
            ));
        };

        let client = reqwest::Client::builder()
            .default_headers(auth_headers(storage)?)
            .timeout(config.timeout())
            .build()
            .map_err(|e| ClientError::Network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            root: format!("{}/storage/v1/object", base_url.trim_end_matches('/')),
            bucket: storage.bucket.clone(),
        })
    }

    /// Public URL of a stored object.
    #[must_use]
    pub fn public_url(&self, path: &str) -> String {
        format!("{}/public/{}/{}", self.root, self.bucket, path)
    }

    async fn put_object(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<String> {
        let url = format!("{}/{}/{}", self.root, self.bucket, key);
        tracing::debug!(bucket = %self.bucket, key, size = bytes.len(), "uploading object");

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, content_type)
            .header("x-upsert", "true")
            .body(bytes)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(key.to_string())
    }

    async fn delete_object(&self, key: &str) -> Result<()> {
        let url = format!("{}/{}", self.root, self.bucket);
        tracing::debug!(bucket = %self.bucket, key, "removing object");

        let response = self
            .client
            .delete(&url)
            .json(&RemoveRequest { prefixes: [key] })
            .send()
            .await?;
        let status = response.status();
        if status.is_success() || status == reqwest::StatusCode::NOT_FOUND {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(ClientError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

fn auth_headers(storage: &StorageConfig) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    if let Some(key) = storage.api_key.as_deref() {
        let invalid = |e: InvalidHeaderValue| ClientError::Config(format!("invalid storage api_key: {e}"));
        headers.insert("apikey", HeaderValue::from_str(key).map_err(invalid)?);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {key}")).map_err(invalid)?,
        );
    }
    Ok(headers)
}

impl ObjectStore for HttpObjectStore {
    fn upload(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> impl Future<Output = Result<String>> + Send {
        self.put_object(key, bytes, content_type)
    }

    fn remove(&self, key: &str) -> impl Future<Output = Result<()>> + Send {
        self.delete_object(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_key_layout() {
        assert_eq!(object_key("students", "2023-0001", "png"), "students/2023-0001.png");
        assert_eq!(object_key("/students/", " 2023-0001 ", ".jpg"), "students/2023-0001.jpg");
    }

    #[test]
    fn test_extension_for_known_images() {
        assert_eq!(extension_for("image/PNG"), Some("png"));
        assert_eq!(extension_for("image/jpeg"), Some("jpg"));
        assert_eq!(extension_for("application/pdf"), None);
    }

    #[test]
    fn test_unconfigured_storage_is_rejected() {
        let result = HttpObjectStore::new(&ClientConfig::default());
        assert!(matches!(result, Err(ClientError::Config(_))));
    }

    #[test]
    fn test_public_url() {
        let mut config = ClientConfig::default();
        config.storage.base_url = Some("https://store.example.edu/".to_string());
        let store = HttpObjectStore::new(&config).unwrap();
        assert_eq!(
            store.public_url("students/2023-0001.png"),
            "https://store.example.edu/storage/v1/object/public/profile/students/2023-0001.png"
        );
    }
}
