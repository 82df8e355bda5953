//! Async HTTP client wrapping the keyword JSON API.

use std::fmt;
use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::errors::ErrorResponse;
use crate::models::{CreateKeywordRequest, CreatedKeywords, KeywordPage, MessageResponse};

/// Failure of a client-side operation.
#[derive(Debug)]
pub enum ClientError {
    /// Input rejected before any request was sent
    Validation(String),
    /// The server answered with a non-success status
    Server { status: StatusCode, message: String },
    /// Transport or decoding failure
    Http(reqwest::Error),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Validation(msg) => write!(f, "{}", msg),
            ClientError::Server { status, message } => write!(f, "Error: {} ({})", message, status),
            ClientError::Http(err) => write!(f, "HTTP error: {}", err),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientError::Http(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Http(err)
    }
}

/// Client for the `/api/keywords` resource.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct KeywordApi {
    client: Client,
    base_url: String,
}

impl KeywordApi {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn url(&self) -> String {
        format!("{}/api/keywords", self.base_url.trim_end_matches('/'))
    }

    /// `GET /api/keywords?page=<page>&limit=<limit>`
    pub async fn list(&self, page: u64, limit: u64) -> Result<KeywordPage, ClientError> {
        let resp = self
            .client
            .get(self.url())
            .query(&[("page", page), ("limit", limit)])
            .send()
            .await?;
        read_json(resp).await
    }

    /// `POST /api/keywords`
    pub async fn create(&self, request: &CreateKeywordRequest) -> Result<CreatedKeywords, ClientError> {
        let resp = self.client.post(self.url()).json(request).send().await?;
        read_json(resp).await
    }

    /// `DELETE /api/keywords?id=<id>`
    pub async fn delete(&self, id: &str) -> Result<MessageResponse, ClientError> {
        let resp = self
            .client
            .delete(self.url())
            .query(&[("id", id)])
            .send()
            .await?;
        read_json(resp).await
    }
}

async fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp.json().await?);
    }

    let message = match resp.json::<ErrorResponse>().await {
        Ok(body) => body.message,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("Unexpected response")
            .to_string(),
    };
    Err(ClientError::Server { status, message })
}
