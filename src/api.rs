// API client module: a small blocking HTTP client that talks to the
// colorization service. One endpoint, one request shape.

use crate::config::Config;
use crate::error::ColorizeError;
use crate::media::{self, ImageRef};
use crate::session::SelectedFile;
use anyhow::{Context, Result};
use reqwest::blocking::{multipart, Client};
use reqwest::header::CONTENT_TYPE;
use std::sync::Arc;

/// Name of the multipart field carrying the image.
pub const FILE_FIELD: &str = "file";

/// Anything that can turn a selected image into a colorized one.
/// `App` is generic over this so tests can swap the network out.
pub trait Colorize {
    fn colorize(&self, file: &SelectedFile) -> Result<ImageRef, ColorizeError>;
}

/// Holds a reqwest blocking client and the full colorize endpoint URL.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    endpoint: String,
}

impl ApiClient {
    /// Build a client for the service described by `config`.
    pub fn new(config: &Config) -> Result<Self> {
        // The blocking client defaults to a 30s timeout; only apply one
        // when it was configured.
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self::with_client(client, config))
    }

    /// Use a preconfigured reqwest client (proxy settings, TLS, ...).
    pub fn with_client(client: Client, config: &Config) -> Self {
        ApiClient {
            client,
            endpoint: config.colorize_url(),
        }
    }

    fn form_for(file: &SelectedFile) -> Result<multipart::Form, ColorizeError> {
        let part = multipart::Part::bytes(file.bytes.to_vec())
            .file_name(file.name.clone())
            .mime_str(&file.mime)
            // Nothing was sent, but the request could not be built either;
            // grouped with the transport errors since no response exists.
            .map_err(|e| ColorizeError::Network(format!("invalid content type {:?}: {}", file.mime, e)))?;
        Ok(multipart::Form::new().part(FILE_FIELD, part))
    }
}

impl Colorize for ApiClient {
    /// POST the file as multipart/form-data and read the body back as raw
    /// image bytes. Failed responses are not parsed.
    fn colorize(&self, file: &SelectedFile) -> Result<ImageRef, ColorizeError> {
        let form = Self::form_for(file)?;
        log::debug!("POST {} ({} bytes, {})", self.endpoint, file.bytes.len(), file.mime);

        let res = self.client.post(&self.endpoint).multipart(form).send()?;
        let status = res.status();
        if !status.is_success() {
            return Err(ColorizeError::Server {
                status: status.as_u16(),
            });
        }

        let content_type = res
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let body = res
            .bytes()
            .map_err(|e| ColorizeError::Decode(e.to_string()))?;
        if body.is_empty() {
            return Err(ColorizeError::Decode("empty response body".into()));
        }

        let mime = media::result_mime(content_type.as_deref(), &body);
        let name = format!("{}-colorized", file.stem());
        Ok(ImageRef::new(name, mime, Arc::from(&body[..])))
    }
}
