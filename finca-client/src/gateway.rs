//! Transport gateway: credential injection and uniform authorization-failure
//! handling for every outbound call.
//!
//! The [`HttpSend`] trait is the wire seam: production uses [`ReqwestSender`],
//! tests substitute a scripted sender. The [`Gateway`] owns the cross-cutting
//! contract: the current bearer token is read at call time (so a cleared
//! session is visible to the very next call), a 401 clears the session and
//! broadcasts [`AuthEvent::SesionExpirada`], and a 403 passes through to the
//! caller untouched.

use crate::error::ApiError;
use crate::session::{AuthEvent, SessionHandle};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        };
        write!(f, "{s}")
    }
}

/// A fully-described outbound call, independent of the HTTP library.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<serde_json::Value>,
    pub bearer: Option<String>,
}

#[derive(Debug, Clone)]
pub struct InboundResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl InboundResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Failure below the HTTP layer: connection refused, timeout, body cut short.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct TransportFailure {
    pub message: String,
}

#[async_trait]
pub trait HttpSend: Send + Sync {
    async fn send(&self, request: OutboundRequest) -> Result<InboundResponse, TransportFailure>;
}

/// Production sender backed by reqwest.
pub struct ReqwestSender {
    client: reqwest::Client,
    base_url: String,
}

impl ReqwestSender {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::transport(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl HttpSend for ReqwestSender {
    async fn send(&self, request: OutboundRequest) -> Result<InboundResponse, TransportFailure> {
        let url = format!("{}{}", self.base_url, request.path);
        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Put => self.client.put(&url),
            Method::Patch => self.client.patch(&url),
            Method::Delete => self.client.delete(&url),
        };
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        let response = builder.send().await.map_err(|e| TransportFailure {
            message: e.to_string(),
        })?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportFailure {
                message: e.to_string(),
            })?
            .to_vec();
        Ok(InboundResponse { status, body })
    }
}

#[derive(Clone)]
pub struct Gateway {
    sender: Arc<dyn HttpSend>,
    session: SessionHandle,
}

impl Gateway {
    pub fn new(sender: Arc<dyn HttpSend>, session: SessionHandle) -> Self {
        Self { sender, session }
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    async fn dispatch(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<Vec<u8>, ApiError> {
        let bearer = self.session.token();
        tracing::debug!(%method, path, authenticated = bearer.is_some(), "dispatching");
        let request = OutboundRequest {
            method,
            path: path.to_string(),
            body,
            bearer,
        };
        let response = self
            .sender
            .send(request)
            .await
            .map_err(|e| ApiError::transport(e.message))?;
        if response.is_success() {
            return Ok(response.body);
        }
        let error = ApiError::from_status(response.status, &response.body);
        // Only an established session can expire; a 401 on the login call
        // itself (or after logout) must not broadcast `SesionExpirada`.
        if error.is_authentication() && self.session.is_authenticated() {
            tracing::warn!(path, "credential rejected, clearing session");
            self.session.expire();
        }
        Err(error)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let body = self.dispatch(Method::Get, path, None).await?;
        decode(&body)
    }

    pub async fn get_bytes(&self, path: &str) -> Result<Vec<u8>, ApiError> {
        self.dispatch(Method::Get, path, None).await
    }

    pub async fn post_json<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_value(body)?;
        let response = self.dispatch(Method::Post, path, Some(body)).await?;
        decode(&response)
    }

    pub async fn post_unit<B>(&self, path: &str, body: &B) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_value(body)?;
        self.dispatch(Method::Post, path, Some(body)).await?;
        Ok(())
    }

    /// POST with no body, decoding the returned record (approve endpoints).
    pub async fn post_action<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.dispatch(Method::Post, path, None).await?;
        decode(&response)
    }

    /// POST with no body, ignoring whatever the server returns.
    pub async fn post_action_unit(&self, path: &str) -> Result<(), ApiError> {
        self.dispatch(Method::Post, path, None).await?;
        Ok(())
    }

    pub async fn put_json<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_value(body)?;
        let response = self.dispatch(Method::Put, path, Some(body)).await?;
        decode(&response)
    }

    pub async fn patch_unit(&self, path: &str) -> Result<(), ApiError> {
        self.dispatch(Method::Patch, path, None).await?;
        Ok(())
    }

    pub async fn delete_unit(&self, path: &str) -> Result<(), ApiError> {
        self.dispatch(Method::Delete, path, None).await?;
        Ok(())
    }
}

/// Payloads arrive either bare or wrapped as `{"data": ...}`; unwrap
/// transparently.
fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Envelope<T> {
        Wrapped { data: T },
        Bare(T),
    }

    match serde_json::from_slice::<Envelope<T>>(body)? {
        Envelope::Wrapped { data } => Ok(data),
        Envelope::Bare(value) => Ok(value),
    }
}
