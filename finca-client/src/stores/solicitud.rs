//! Request store and lifecycle workflow, shared by rentals and sales.
//!
//! The two request resources are structurally identical, so one generic
//! store drives both: [`AlquilerStore`] and [`VentaStore`] differ only in
//! their entity type and endpoint family. The store keeps two collections:
//! the role-scoped main list and the pending approval queue, which the
//! server filters (`estado=pendiente`) independently of the main fetch.
//!
//! Approvals and rejections reconcile by re-fetching rather than splicing
//! locally, because a transition may cascade into property-state changes
//! that only a full fetch picks up.

use crate::api::{ApiClient, SolicitudResource, ALQUILERES, VENTAS};
use crate::error::ApiError;
use crate::session::SessionHandle;
use crate::stores::{Collection, FetchScope, RoleScopedStore, StoreStatus};
use async_trait::async_trait;
use finca_core::{
    EstadoSolicitud, Rol, Sesion, Solicitud, SolicitudAlquiler, SolicitudVenta,
};
use std::sync::Arc;

pub struct SolicitudStore<T: Solicitud> {
    api: ApiClient,
    session: SessionHandle,
    resource: SolicitudResource,
    collection: Collection<T>,
    pendientes: Collection<T>,
}

pub type AlquilerStore = SolicitudStore<SolicitudAlquiler>;
pub type VentaStore = SolicitudStore<SolicitudVenta>;

impl AlquilerStore {
    pub fn alquileres(api: ApiClient) -> Arc<Self> {
        SolicitudStore::new(api, ALQUILERES)
    }

    /// Contract document for a rental, as opaque bytes for the presentation
    /// layer to save.
    pub async fn contrato(&self, id: i64) -> Result<Vec<u8>, ApiError> {
        self.api.contrato_alquiler(id).await
    }
}

impl VentaStore {
    pub fn ventas(api: ApiClient) -> Arc<Self> {
        SolicitudStore::new(api, VENTAS)
    }
}

impl<T: Solicitud> SolicitudStore<T> {
    fn new(api: ApiClient, resource: SolicitudResource) -> Arc<Self> {
        let session = api.gateway().session().clone();
        Arc::new(Self {
            api,
            session,
            resource,
            collection: Collection::new(),
            pendientes: Collection::new(),
        })
    }

    pub fn solicitudes(&self) -> Vec<T> {
        self.collection.snapshot()
    }

    pub fn pendientes(&self) -> Vec<T> {
        self.pendientes.snapshot()
    }

    pub fn status(&self) -> StoreStatus {
        self.collection.status()
    }

    pub fn last_error(&self) -> Option<String> {
        self.collection
            .last_error()
            .or_else(|| self.pendientes.last_error())
    }

    // ------------------------------------------------------------------------
    // Derived views (pure reads, no fetch)
    // ------------------------------------------------------------------------

    /// Requests belonging to the viewer's client record.
    pub fn mis_solicitudes(&self) -> Vec<T> {
        match self.session.current().id_cliente() {
            Some(id_cliente) => self
                .collection
                .snapshot()
                .into_iter()
                .filter(|s| s.id_cliente() == id_cliente)
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn activas(&self) -> Vec<T> {
        self.con_estado(EstadoSolicitud::Activo)
    }

    /// Both historical spellings land on the canonical variant at
    /// deserialization, so this is a plain enum filter.
    pub fn finalizadas(&self) -> Vec<T> {
        self.con_estado(EstadoSolicitud::Finalizado)
    }

    fn con_estado(&self, estado: EstadoSolicitud) -> Vec<T> {
        self.collection
            .snapshot()
            .into_iter()
            .filter(|s| s.estado() == estado)
            .collect()
    }

    // ------------------------------------------------------------------------
    // Fetches
    // ------------------------------------------------------------------------

    /// Role-scoped collection fetch: admin and agente load everything, a
    /// cliente only their own records. Whatever the server returns, a
    /// client-scoped collection never exposes another client's rows.
    pub async fn fetch_all(&self) -> Vec<T> {
        let scope = self.scope_for(&self.session.current());
        let fence = self.collection.begin_fetch();
        let result = match scope {
            FetchScope::Todo => self.api.list_solicitudes::<T>(self.resource).await,
            FetchScope::PorCliente(id_cliente) => self
                .api
                .list_solicitudes_por_cliente::<T>(self.resource, id_cliente)
                .await
                .map(|items| {
                    items
                        .into_iter()
                        .filter(|s| s.id_cliente() == id_cliente)
                        .collect()
                }),
            FetchScope::Bloqueado => {
                tracing::debug!(resource = self.resource.base, "fetch suprimido sin sesion");
                self.collection.fail_fetch(fence, "sin sesion".to_string());
                return self.collection.snapshot();
            }
        };
        match result {
            Ok(items) => {
                self.collection.complete_fetch(fence, items);
            }
            Err(e) => {
                tracing::warn!(resource = self.resource.base, error = %e, "fetch fallido");
                self.collection.fail_fetch(fence, e.to_string());
            }
        }
        self.collection.snapshot()
    }

    /// Pending approval queue, server-side filtered.
    pub async fn fetch_pendientes(&self) -> Vec<T> {
        let fence = self.pendientes.begin_fetch();
        match self
            .api
            .list_solicitudes_pendientes::<T>(self.resource)
            .await
        {
            Ok(items) => {
                self.pendientes.complete_fetch(fence, items);
            }
            Err(e) => {
                tracing::warn!(resource = self.resource.base, error = %e, "fetch de pendientes fallido");
                self.pendientes.fail_fetch(fence, e.to_string());
            }
        }
        self.pendientes.snapshot()
    }

    // ------------------------------------------------------------------------
    // CRUD
    // ------------------------------------------------------------------------

    pub async fn create(&self, payload: &T::Nueva) -> Result<T, ApiError> {
        match self.api.create_solicitud::<T>(self.resource, payload).await {
            Ok(solicitud) => {
                self.collection
                    .upsert(|s| s.id() == solicitud.id(), solicitud.clone());
                Ok(solicitud)
            }
            Err(e) => {
                self.collection.record_error(e.to_string());
                Err(e)
            }
        }
    }

    pub async fn update(&self, id: i64, payload: &T::Nueva) -> Result<T, ApiError> {
        match self
            .api
            .update_solicitud::<T>(self.resource, id, payload)
            .await
        {
            Ok(solicitud) => {
                self.collection
                    .replace_where(|s| s.id() == id, solicitud.clone());
                Ok(solicitud)
            }
            Err(e) => {
                self.collection.record_error(e.to_string());
                Err(e)
            }
        }
    }

    pub async fn remove_permanente(&self, id: i64) -> Result<(), ApiError> {
        match self
            .api
            .delete_solicitud_permanente(self.resource, id)
            .await
        {
            Ok(()) => {
                self.collection.remove_where(|s| s.id() == id);
                self.pendientes.remove_where(|s| s.id() == id);
                Ok(())
            }
            Err(e) => {
                self.collection.record_error(e.to_string());
                Err(e)
            }
        }
    }

    // ------------------------------------------------------------------------
    // Lifecycle workflow
    // ------------------------------------------------------------------------

    /// `pendiente -> aprobado`. On success both the pending queue and the
    /// role-scoped collection are re-fetched to reconcile cascaded changes.
    /// On failure local state is untouched.
    pub async fn approve(&self, id: i64) -> Result<T, ApiError> {
        self.guard_transition(id, EstadoSolicitud::Aprobado)?;
        match self.api.approve_solicitud::<T>(self.resource, id).await {
            Ok(solicitud) => {
                tracing::info!(resource = self.resource.base, id, "solicitud aprobada");
                self.fetch_pendientes().await;
                self.fetch_all().await;
                Ok(solicitud)
            }
            Err(e) => {
                self.collection.record_error(e.to_string());
                Err(e)
            }
        }
    }

    /// `pendiente -> rechazado`. The main collection is re-fetched
    /// defensively along with the queue.
    pub async fn reject(&self, id: i64) -> Result<(), ApiError> {
        self.guard_transition(id, EstadoSolicitud::Rechazado)?;
        match self.api.reject_solicitud(self.resource, id).await {
            Ok(()) => {
                tracing::info!(resource = self.resource.base, id, "solicitud rechazada");
                self.fetch_pendientes().await;
                self.fetch_all().await;
                Ok(())
            }
            Err(e) => {
                self.collection.record_error(e.to_string());
                Err(e)
            }
        }
    }

    /// Requester-side cancellation (soft delete). Validity is the server's
    /// call; whatever error it returns is surfaced untouched. On success the
    /// role-scoped collection is reloaded in full.
    pub async fn cancel(&self, id: i64) -> Result<(), ApiError> {
        match self.api.cancel_solicitud(self.resource, id).await {
            Ok(()) => {
                tracing::info!(resource = self.resource.base, id, "solicitud cancelada");
                self.fetch_all().await;
                Ok(())
            }
            Err(e) => {
                self.collection.record_error(e.to_string());
                Err(e)
            }
        }
    }

    /// Free-form transition for admin/agente. The legal graph is enforced
    /// locally when the record is cached; the server stays authoritative.
    pub async fn update_estado(&self, id: i64, nuevo: EstadoSolicitud) -> Result<T, ApiError> {
        self.guard_transition(id, nuevo)?;
        match self
            .api
            .update_estado_solicitud::<T>(self.resource, id, nuevo)
            .await
        {
            Ok(solicitud) => {
                self.collection
                    .replace_where(|s| s.id() == id, solicitud.clone());
                if nuevo != EstadoSolicitud::Pendiente {
                    self.pendientes.remove_where(|s| s.id() == id);
                }
                Ok(solicitud)
            }
            Err(e) => {
                self.collection.record_error(e.to_string());
                Err(e)
            }
        }
    }

    /// Fail fast when the cached copy of the record rules the transition
    /// out. Uncached records are forwarded for the server to decide.
    fn guard_transition(&self, id: i64, hacia: EstadoSolicitud) -> Result<(), ApiError> {
        let cached = self
            .pendientes
            .snapshot()
            .into_iter()
            .chain(self.collection.snapshot())
            .find(|s| s.id() == id);
        if let Some(solicitud) = cached {
            solicitud
                .estado()
                .validate_transition(hacia)
                .map_err(|e| ApiError::Validation {
                    message: e.to_string(),
                })?;
        }
        Ok(())
    }
}

#[async_trait]
impl<T: Solicitud> RoleScopedStore for SolicitudStore<T> {
    fn session(&self) -> &SessionHandle {
        &self.session
    }

    fn scope_for(&self, sesion: &Sesion) -> FetchScope {
        match (sesion.rol(), sesion.id_cliente()) {
            (Some(Rol::Admin), _) | (Some(Rol::Agente), _) => FetchScope::Todo,
            (Some(Rol::Cliente), Some(id_cliente)) => FetchScope::PorCliente(id_cliente),
            _ => FetchScope::Bloqueado,
        }
    }

    fn invalidate(&self) {
        self.collection.invalidate();
        self.pendientes.invalidate();
    }

    fn clear(&self) {
        self.collection.clear();
        self.pendientes.clear();
    }

    async fn refresh(&self) {
        self.fetch_all().await;
    }
}
