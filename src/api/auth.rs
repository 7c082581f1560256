//! Auth Commands
//!
//! Login and registration. These go straight to the transport: no bearer
//! token, and a 401 here means bad credentials, not an expired session.

use std::rc::Rc;

use serde::Deserialize;

use super::{HttpRequest, HttpResponse, Method, Transport};
use crate::config::AppConfig;
use crate::errors::{ApiError, ApiResult, FieldError, ValidationError};
use crate::models::{Credentials, LoginResponse, RegisterResponse, Registration};
use crate::session::Session;

const LOGIN_PATH: &str = "/api/login";
const REGISTER_PATH: &str = "/api/register";

#[derive(Clone)]
pub struct AuthClient {
    config: Rc<AppConfig>,
    transport: Rc<dyn Transport>,
    session: Session,
}

impl AuthClient {
    pub fn new(config: Rc<AppConfig>, transport: Rc<dyn Transport>, session: Session) -> Self {
        Self { config, transport, session }
    }

    async fn post<B: serde::Serialize>(&self, path: &str, body: &B) -> ApiResult<HttpResponse> {
        let body = serde_json::to_value(body)
            .map_err(|e| ApiError::Transport(format!("unencodable request: {}", e)))?;
        self.transport
            .send(HttpRequest {
                method: Method::Post,
                url: self.config.endpoint(path),
                bearer: None,
                body: Some(body),
            })
            .await
    }

    /// Log in and store the returned token in the session
    pub async fn login(&self, credentials: &Credentials) -> ApiResult<LoginResponse> {
        let response = self.post(LOGIN_PATH, credentials).await?;
        if !response.is_success() {
            tracing::warn!(status = response.status, username = %credentials.username, "login rejected");
            let message = response
                .server_message()
                .unwrap_or_else(|| "Invalid credentials".to_string());
            return Err(ApiError::InvalidCredentials(message));
        }

        let payload: LoginResponse = response.json()?;
        if payload.token.trim().is_empty() {
            return Err(ApiError::operation(Some(response.status), "Login response carried no token"));
        }
        self.session.login(&payload.token);
        tracing::info!(username = %credentials.username, "logged in");
        Ok(payload)
    }

    pub async fn register(&self, registration: &Registration) -> ApiResult<RegisterResponse> {
        let registration = normalize_registration(registration)?;
        let response = self.post(REGISTER_PATH, &registration).await?;
        if !response.is_success() {
            tracing::warn!(status = response.status, username = %registration.username, "registration rejected");
            return Err(registration_error(&response).into());
        }
        tracing::info!(username = %registration.username, "account created");
        response.json()
    }
}

/// Local pre-submit checks; drops an empty email
fn normalize_registration(registration: &Registration) -> Result<Registration, ValidationError> {
    let username = registration.username.trim();
    if username.is_empty() {
        return Err(ValidationError::Message("Username is required".into()));
    }
    if registration.username.chars().any(char::is_whitespace) {
        return Err(ValidationError::Message("Username cannot contain spaces".into()));
    }
    if registration.password.trim().is_empty() {
        return Err(ValidationError::Message("Password is required".into()));
    }
    let email = registration
        .email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(str::to_string);
    Ok(Registration {
        username: username.to_string(),
        password: registration.password.clone(),
        email,
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorEntry {
    Field(FieldError),
    Text(String),
}

#[derive(Deserialize)]
struct RegistrationErrorBody {
    #[serde(default)]
    errors: Vec<ErrorEntry>,
}

fn registration_error(response: &HttpResponse) -> ValidationError {
    if let Ok(body) = serde_json::from_str::<RegistrationErrorBody>(&response.body) {
        if !body.errors.is_empty() {
            let fields = body
                .errors
                .into_iter()
                .map(|entry| match entry {
                    ErrorEntry::Field(field) => field,
                    ErrorEntry::Text(message) => FieldError { field: None, message },
                })
                .collect();
            return ValidationError::Fields(fields);
        }
    }
    ValidationError::Message(
        response
            .server_message()
            .unwrap_or_else(|| "Account creation failed".to_string()),
    )
}
