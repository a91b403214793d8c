//! Session store: the single writer of process-wide authentication state.
//!
//! State lives in a `tokio::sync::watch` channel so dependent stores can
//! re-evaluate their role-scoped fetches whenever the viewer changes, and so
//! a cleared token is visible to the very next gateway call (`send` then
//! `borrow` gives read-after-write on the one shared value). Lifecycle events
//! go out on a broadcast channel; `SesionExpirada` is the only signal that is
//! allowed to force navigation in the consuming layer.

use crate::api::{ApiClient, Registro};
use crate::error::ApiError;
use finca_core::{Principal, Sesion};
use std::sync::Arc;
use tokio::sync::{broadcast, watch};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    SesionIniciada,
    SesionCerrada,
    /// The remote rejected the credential (401). Dependents must treat the
    /// session as gone immediately, not after their in-flight call resolves.
    SesionExpirada,
}

/// Cheap-clone handle to the one process-wide session.
#[derive(Clone)]
pub struct SessionHandle {
    state: Arc<watch::Sender<Sesion>>,
    events: broadcast::Sender<AuthEvent>,
}

impl SessionHandle {
    pub fn new() -> Self {
        let (state, _) = watch::channel(Sesion::default());
        let (events, _) = broadcast::channel(16);
        Self {
            state: Arc::new(state),
            events,
        }
    }

    pub fn current(&self) -> Sesion {
        self.state.borrow().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.state.borrow().token.clone()
    }

    pub fn principal(&self) -> Option<Principal> {
        self.state.borrow().principal.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    /// Watch for session changes (login, logout, expiry).
    pub fn subscribe(&self) -> watch::Receiver<Sesion> {
        self.state.subscribe()
    }

    /// Listen for lifecycle events.
    pub fn events(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }

    pub(crate) fn establish(&self, sesion: Sesion) {
        self.state.send_replace(sesion);
        let _ = self.events.send(AuthEvent::SesionIniciada);
    }

    pub(crate) fn close(&self) {
        self.state.send_replace(Sesion::default());
        let _ = self.events.send(AuthEvent::SesionCerrada);
    }

    /// Credential rejected remotely; called by the gateway on 401.
    pub(crate) fn expire(&self) {
        self.state.send_replace(Sesion::default());
        let _ = self.events.send(AuthEvent::SesionExpirada);
    }
}

impl Default for SessionHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Login, registration, and logout against the remote auth endpoints.
#[derive(Clone)]
pub struct SessionStore {
    api: ApiClient,
    handle: SessionHandle,
}

impl SessionStore {
    pub fn new(api: ApiClient) -> Self {
        let handle = api.gateway().session().clone();
        Self { api, handle }
    }

    pub fn handle(&self) -> &SessionHandle {
        &self.handle
    }

    pub fn current(&self) -> Sesion {
        self.handle.current()
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Principal, ApiError> {
        let respuesta = self.api.login(email, password).await?;
        let principal = Principal::from(respuesta.usuario);
        tracing::info!(usuario = %principal.id, rol = %principal.rol, "sesion iniciada");
        self.handle
            .establish(Sesion::authenticated(principal.clone(), respuesta.token));
        Ok(principal)
    }

    pub async fn register(&self, registro: &Registro) -> Result<Principal, ApiError> {
        let respuesta = self.api.register(registro).await?;
        let principal = Principal::from(respuesta.usuario);
        self.handle
            .establish(Sesion::authenticated(principal.clone(), respuesta.token));
        Ok(principal)
    }

    pub async fn forgot_password(&self, email: &str) -> Result<(), ApiError> {
        self.api.forgot_password(email).await
    }

    pub async fn reset_password(&self, token: &str, password: &str) -> Result<(), ApiError> {
        self.api.reset_password(token, password).await
    }

    /// Clears the credential synchronously; no server round-trip. In-flight
    /// dependents observe the cleared token on their next gateway call.
    pub fn logout(&self) {
        tracing::info!("sesion cerrada");
        self.handle.close();
    }
}
