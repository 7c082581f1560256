//! Authenticated HTTP Client
//!
//! Wraps the transport for every protected call: attaches the bearer
//! token and handles 401/403 in one place.

use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{HttpRequest, HttpResponse, Method, Transport};
use crate::config::AppConfig;
use crate::errors::{ApiError, ApiResult};
use crate::session::Session;

#[derive(Clone)]
pub struct ApiClient {
    config: Rc<AppConfig>,
    transport: Rc<dyn Transport>,
    session: Session,
}

impl ApiClient {
    pub fn new(config: Rc<AppConfig>, transport: Rc<dyn Transport>, session: Session) -> Self {
        Self { config, transport, session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Send a request, evicting the session on 401/403
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> ApiResult<HttpResponse> {
        let request = HttpRequest {
            method,
            url: self.config.endpoint(path),
            bearer: self.session.token(),
            body,
        };
        tracing::debug!(method = ?method, path, "request");

        let response = self.transport.send(request).await?;

        if response.status == 401 || response.status == 403 {
            tracing::warn!(status = response.status, path, "authentication rejected");
            self.session.expire();
            return Err(ApiError::AuthenticationFailed);
        }
        if !response.is_success() {
            let message = response
                .server_message()
                .unwrap_or_else(|| format!("HTTP error! status: {}", response.status));
            return Err(ApiError::operation(Some(response.status), message));
        }
        Ok(response)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.send(Method::Get, path, None).await?.json()
    }

    pub async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body)
            .map_err(|e| ApiError::Transport(format!("unencodable request: {}", e)))?;
        self.send(method, path, Some(body)).await?.json()
    }
}
