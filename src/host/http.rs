// src/host/http.rs
//! reqwest-backed prefill fetch and upload.
//!
//! Thin wrappers: no parsing, no retries. The fetch side swallows every
//! failure into empty text; the upload side reports failures to the caller,
//! which only logs them.

use async_trait::async_trait;
use reqwest::{header, Client, Method, Response};

use crate::capabilities::{NetworkDelivery, TextFetch};
use crate::error::{AppError, CapabilityError};
use crate::types::{HttpMethod, RemoteUrl};

/// Fetches prefill text with a GET request.
#[derive(Clone, Default)]
pub struct HttpTextFetch {
    client: Client,
}

impl HttpTextFetch {
    pub fn new() -> Result<Self, AppError> {
        Ok(Self {
            client: Client::builder().build()?,
        })
    }

    async fn try_fetch(&self, source: &RemoteUrl) -> Result<String, reqwest::Error> {
        log::debug!("GET {}", source);
        let response = self.client.get(source.as_url().clone()).send().await?;
        extract_ok_text(response).await
    }
}

#[async_trait]
impl TextFetch for HttpTextFetch {
    async fn fetch(&self, source: &RemoteUrl) -> String {
        match self.try_fetch(source).await {
            Ok(text) => text,
            Err(e) => {
                log::warn!("Prefill fetch from {} failed: {}", source, e);
                String::new()
            }
        }
    }
}

/// Non-success statuses yield empty text.
async fn extract_ok_text(response: Response) -> Result<String, reqwest::Error> {
    let status = response.status();
    if !status.is_success() {
        log::warn!("{} responded with {}", response.url(), status);
        return Ok(String::new());
    }
    response.text().await
}

/// Sends the raw output text as the request body.
#[derive(Clone, Default)]
pub struct HttpDelivery {
    client: Client,
}

impl HttpDelivery {
    pub fn new() -> Result<Self, AppError> {
        Ok(Self {
            client: Client::builder().build()?,
        })
    }
}

#[async_trait]
impl NetworkDelivery for HttpDelivery {
    async fn send(
        &self,
        target: &RemoteUrl,
        method: &HttpMethod,
        mime_type: &str,
        body: &str,
    ) -> Result<(), CapabilityError> {
        let network_error = |reason: String| CapabilityError::Network {
            target: target.to_string(),
            reason,
        };

        let method = Method::from_bytes(method.as_str().as_bytes())
            .map_err(|e| network_error(e.to_string()))?;
        log::debug!("{} {} ({} bytes, {})", method, target, body.len(), mime_type);

        let response = self
            .client
            .request(method, target.as_url().clone())
            .header(header::CONTENT_TYPE, mime_type)
            .body(body.to_string())
            .send()
            .await
            .map_err(|e| network_error(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(network_error(format!("server responded with {}", status)))
        }
    }
}
