pub mod http;

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use async_trait::async_trait;

use crate::error::Result;

pub use http::HttpTransport;

/// Whether the transport attaches ambient credentials (cookies) to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialsMode {
    Include,
    Omit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub path: String,
    pub credentials: CredentialsMode,
}

impl FetchRequest {
    pub fn get(path: &str, credentials: CredentialsMode) -> Self {
        Self {
            path: path.to_string(),
            credentials,
        }
    }
}

type BodyFuture = Pin<Box<dyn Future<Output = Result<Vec<u8>>> + Send>>;

/// A received response whose body has not been read yet.
///
/// The body is only pulled off the wire when [`FetchResponse::json`] or
/// [`FetchResponse::bytes`] is awaited.
pub struct FetchResponse {
    status: u16,
    url: String,
    body: BodyFuture,
}

impl FetchResponse {
    pub fn new<F>(status: u16, url: impl Into<String>, body: F) -> Self
    where
        F: Future<Output = Result<Vec<u8>>> + Send + 'static,
    {
        Self {
            status,
            url: url.into(),
            body: Box::pin(body),
        }
    }

    /// A response with an already-buffered body.
    pub fn from_bytes(status: u16, url: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        let body = body.into();
        Self::new(status, url, async move { Ok(body) })
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn bytes(self) -> Result<Vec<u8>> {
        self.body.await
    }

    pub async fn json<T: serde::de::DeserializeOwned>(self) -> Result<T> {
        let bytes = self.body.await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

impl fmt::Debug for FetchResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchResponse")
            .field("status", &self.status)
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a GET request. Errors mean no response was received at all.
    async fn get(&self, request: &FetchRequest) -> Result<FetchResponse>;
}
