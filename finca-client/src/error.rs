//! Error taxonomy for remote calls.
//!
//! Two status classes get special treatment at the gateway: 401 clears the
//! session and is surfaced as [`ApiError::Authentication`], while 403 passes
//! through untouched as [`ApiError::Authorization`] because permission
//! failures are caller-context-dependent. Everything else maps by status.

use crate::config::ConfigError;
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Network unreachable, timeout, or the body could not be read.
    #[error("transport error: {message}")]
    Transport { message: String },
    /// 401-class response. The gateway has already cleared the session and
    /// broadcast `SesionExpirada` by the time callers see this.
    #[error("authentication rejected: {message}")]
    Authentication { message: String },
    /// 403-class response, forwarded verbatim.
    #[error("forbidden: {message}")]
    Authorization { message: String },
    /// Business-rule rejection (other 4xx); server message kept verbatim.
    #[error("{message}")]
    Validation { message: String },
    #[error("not found: {message}")]
    NotFound { message: String },
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ApiError {
    pub(crate) fn transport(message: impl Into<String>) -> Self {
        ApiError::Transport {
            message: message.into(),
        }
    }

    pub(crate) fn from_status(status: u16, body: &[u8]) -> Self {
        let message = server_message(body);
        match status {
            401 => ApiError::Authentication { message },
            403 => ApiError::Authorization { message },
            404 => ApiError::NotFound { message },
            400..=499 => ApiError::Validation { message },
            _ => ApiError::Server { status, message },
        }
    }

    pub fn is_authentication(&self) -> bool {
        matches!(self, ApiError::Authentication { .. })
    }
}

/// Error bodies arrive as `{"message": ...}`, `{"error": ...}`, or raw text.
fn server_message(body: &[u8]) -> String {
    #[derive(Deserialize)]
    struct ServerErrorBody {
        message: Option<String>,
        error: Option<String>,
    }

    if let Ok(parsed) = serde_json::from_slice::<ServerErrorBody>(body) {
        if let Some(message) = parsed.message.or(parsed.error) {
            return message;
        }
    }
    let text = String::from_utf8_lossy(body).trim().to_string();
    if text.is_empty() {
        "sin detalle".to_string()
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_classification_distinguishes_401_and_403() {
        assert!(matches!(
            ApiError::from_status(401, b"{\"message\":\"token vencido\"}"),
            ApiError::Authentication { .. }
        ));
        assert!(matches!(
            ApiError::from_status(403, b"{\"message\":\"no es su propiedad\"}"),
            ApiError::Authorization { .. }
        ));
    }

    #[test]
    fn validation_message_kept_verbatim() {
        let err = ApiError::from_status(422, b"{\"message\":\"fecha_fin anterior a fecha_inicio\"}");
        assert_eq!(err.to_string(), "fecha_fin anterior a fecha_inicio");
    }

    #[test]
    fn raw_text_bodies_survive() {
        let err = ApiError::from_status(500, b"boom");
        assert_eq!(err.to_string(), "server error (500): boom");
    }
}
