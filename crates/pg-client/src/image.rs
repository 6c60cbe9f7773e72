//! Sources of base64-encoded images for vision requests.

use crate::error::PgError;
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::Url;
use reqwest::header::{ACCEPT, CACHE_CONTROL};
use std::path::{Path, PathBuf};
use tokio::sync::OnceCell;
use tokio_util::sync::CancellationToken;

/// Anything that can produce a base64-encoded image
#[async_trait]
pub trait ImageSource: Send + Sync + std::fmt::Debug {
    async fn encode_base64(&self, ctx: &CancellationToken) -> Result<String, PgError>;
}

/// Image read from the local filesystem
#[derive(Debug)]
pub struct ImageFile {
    path: PathBuf,
    encoded: OnceCell<String>,
}

impl ImageFile {
    /// Fails when nothing exists at `path`
    pub fn new(path: impl AsRef<Path>) -> Result<Self, PgError> {
        let path = path.as_ref();
        std::fs::metadata(path).map_err(|e| {
            PgError::image_with_source(format!("file doesn't exist: {}", path.display()), e)
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            encoded: OnceCell::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ImageSource for ImageFile {
    async fn encode_base64(&self, ctx: &CancellationToken) -> Result<String, PgError> {
        let encoded = self
            .encoded
            .get_or_try_init(|| async {
                let data = tokio::select! {
                    biased;
                    _ = ctx.cancelled() => return Err(PgError::Cancelled),
                    data = tokio::fs::read(&self.path) => data,
                };
                let data = data.map_err(|e| {
                    PgError::image_with_source(format!("readfile: {}", self.path.display()), e)
                })?;
                Ok(STANDARD.encode(data))
            })
            .await?;

        Ok(encoded.clone())
    }
}

/// Image downloaded over HTTP
#[derive(Debug)]
pub struct ImageNetwork {
    url: Url,
    http: reqwest::Client,
    encoded: OnceCell<String>,
}

impl ImageNetwork {
    /// Fails when `url` does not parse
    pub fn new(url: &str) -> Result<Self, PgError> {
        Self::with_client(url, reqwest::Client::new())
    }

    /// Download through an existing client
    pub fn with_client(url: &str, http: reqwest::Client) -> Result<Self, PgError> {
        let url = Url::parse(url)
            .map_err(|e| PgError::image_with_source(format!("url doesn't parse: {url:?}"), e))?;

        Ok(Self {
            url,
            http,
            encoded: OnceCell::new(),
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    async fn download(&self) -> Result<Vec<u8>, PgError> {
        let response = self
            .http
            .get(self.url.clone())
            .header(CACHE_CONTROL, "no-cache")
            .header(ACCEPT, "image/*")
            .send()
            .await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(PgError::image(format!(
                "status: {} fetching {}",
                status.as_u16(),
                self.url
            )));
        }

        let data = response
            .bytes()
            .await
            .map_err(|e| PgError::image_with_source("Failed to read image body", e))?;
        Ok(data.to_vec())
    }
}

#[async_trait]
impl ImageSource for ImageNetwork {
    async fn encode_base64(&self, ctx: &CancellationToken) -> Result<String, PgError> {
        let encoded = self
            .encoded
            .get_or_try_init(|| async {
                let data = tokio::select! {
                    biased;
                    _ = ctx.cancelled() => return Err(PgError::Cancelled),
                    data = self.download() => data?,
                };
                Ok(STANDARD.encode(data))
            })
            .await?;

        Ok(encoded.clone())
    }
}

/// Image that is already base64-encoded
#[derive(Debug, Clone)]
pub struct ImageBase64 {
    encoded: String,
}

impl ImageBase64 {
    pub fn new(encoded: impl Into<String>) -> Self {
        Self {
            encoded: encoded.into(),
        }
    }

    /// Encode raw image bytes
    pub fn from_bytes(data: impl AsRef<[u8]>) -> Self {
        Self::new(STANDARD.encode(data))
    }
}

#[async_trait]
impl ImageSource for ImageBase64 {
    async fn encode_base64(&self, _ctx: &CancellationToken) -> Result<String, PgError> {
        Ok(self.encoded.clone())
    }
}
