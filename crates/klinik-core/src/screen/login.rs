//! Login screen.

use serde_json::{json, Value};
use tracing::{info, warn};

use super::{Route, ScreenEffect};
use crate::api::ApiError;
use crate::context::AppContext;
use crate::messages;
use crate::storage::StorageResult;

/// Email/password form. A successful submit stores the session token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginScreen {
    pub email: String,
    pub password: String,
    error: Option<String>,
}

impl LoginScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Post the credentials. Only a storage failure is returned as an error;
    /// everything else ends up in [`LoginScreen::error`].
    pub fn submit(&mut self, ctx: &mut AppContext) -> StorageResult<ScreenEffect> {
        if self.email.is_empty() || self.password.is_empty() {
            self.error = Some(messages::LOGIN_FIELDS_REQUIRED.to_string());
            return Ok(ScreenEffect::None);
        }
        self.error = None;

        let body = json!({ "email": self.email, "password": self.password });
        match ctx.api.post_public("/login", body) {
            Ok(response) => {
                let token = response
                    .get("access_token")
                    .and_then(Value::as_str)
                    .filter(|t| !t.is_empty());
                match token {
                    Some(token) => {
                        ctx.session.login(token)?;
                        info!(email = %self.email, "Login succeeded");
                        Ok(ScreenEffect::Navigate(Route::Dashboard))
                    }
                    None => {
                        self.error = Some(messages::LOGIN_INVALID.to_string());
                        Ok(ScreenEffect::None)
                    }
                }
            }
            Err(e @ ApiError::Http { .. }) => {
                self.error = Some(format!("Error: {}", server_message(&e)));
                Ok(ScreenEffect::None)
            }
            Err(e) => {
                warn!("Login request failed: {}", e);
                self.error = Some(messages::LOGIN_FAILED.to_string());
                Ok(ScreenEffect::None)
            }
        }
    }
}

/// The `message` field of a JSON error body, or the error text.
fn server_message(err: &ApiError) -> String {
    if let ApiError::Http { body, .. } = err {
        let message = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string));
        if let Some(message) = message {
            return message;
        }
    }
    err.to_string()
}
