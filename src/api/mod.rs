//! Backend API Bindings
//!
//! REST bindings to the to-do backend, organized by domain. Every request
//! goes through a [`Transport`], which production code backs with reqwest
//! (browser `fetch` on wasm32) and tests back with an in-memory fake.

mod auth;
mod client;
mod todo;
#[cfg(test)]
pub(crate) mod fake;

use async_trait::async_trait;
use serde::Deserialize;

use crate::errors::{ApiError, ApiResult};

pub use auth::*;
pub use client::*;
pub use todo::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

/// One outgoing HTTP exchange
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    /// Sent as `Authorization: Bearer <token>`
    pub bearer: Option<String>,
    /// Sent as a JSON body
    pub body: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: serde::de::DeserializeOwned>(&self) -> ApiResult<T> {
        serde_json::from_str(&self.body)
            .map_err(|e| ApiError::Transport(format!("unreadable response: {}", e)))
    }

    /// Human-readable reason from an error body: `message` field, else raw text
    pub fn server_message(&self) -> Option<String> {
        #[derive(Deserialize)]
        struct MessageBody {
            message: Option<String>,
        }

        match serde_json::from_str::<MessageBody>(&self.body) {
            Ok(parsed) => parsed.message.filter(|m| !m.trim().is_empty()),
            Err(_) => {
                let text = self.body.trim();
                (!text.is_empty()).then(|| text.to_string())
            }
        }
    }
}

/// Performs a single request; no retries, no timeouts
#[async_trait(?Send)]
pub trait Transport {
    async fn send(&self, request: HttpRequest) -> ApiResult<HttpResponse>;
}

/// reqwest-backed transport
#[derive(Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait(?Send)]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> ApiResult<HttpResponse> {
        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
            Method::Put => self.client.put(&request.url),
            Method::Delete => self.client.delete(&request.url),
        };
        if let Some(token) = &request.bearer {
            builder = builder.header(reqwest::header::AUTHORIZATION, format!("Bearer {}", token));
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(HttpResponse { status, body })
    }
}
