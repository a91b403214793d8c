//! Property store.

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::session::SessionHandle;
use crate::stores::{Collection, FetchScope, RoleScopedStore, StoreStatus};
use async_trait::async_trait;
use finca_core::{ActualizaPropiedad, NuevaPropiedad, Propiedad, PropiedadId, Sesion};
use std::sync::Arc;

pub struct PropiedadStore {
    api: ApiClient,
    session: SessionHandle,
    collection: Collection<Propiedad>,
}

impl PropiedadStore {
    pub fn new(api: ApiClient) -> Arc<Self> {
        let session = api.gateway().session().clone();
        Arc::new(Self {
            api,
            session,
            collection: Collection::new(),
        })
    }

    pub fn propiedades(&self) -> Vec<Propiedad> {
        self.collection.snapshot()
    }

    pub fn status(&self) -> StoreStatus {
        self.collection.status()
    }

    pub fn last_error(&self) -> Option<String> {
        self.collection.last_error()
    }

    /// Replace the collection from the server. On failure the previous
    /// collection stays visible and the error is recorded, not raised.
    pub async fn fetch_all(&self) -> Vec<Propiedad> {
        let fence = self.collection.begin_fetch();
        match self.api.list_propiedades().await {
            Ok(items) => {
                self.collection.complete_fetch(fence, items);
            }
            Err(e) => {
                tracing::warn!(error = %e, "fetch de propiedades fallido");
                self.collection.fail_fetch(fence, e.to_string());
            }
        }
        self.collection.snapshot()
    }

    /// Single-record fetch; never mutates the collection.
    pub async fn get_by_id(&self, id: PropiedadId) -> Option<Propiedad> {
        match self.api.get_propiedad(id).await {
            Ok(propiedad) => Some(propiedad),
            Err(e) => {
                self.collection.record_error(e.to_string());
                None
            }
        }
    }

    pub async fn create(&self, payload: &NuevaPropiedad) -> Result<Propiedad, ApiError> {
        match self.api.create_propiedad(payload).await {
            Ok(propiedad) => {
                self.collection
                    .upsert(|p| p.id == propiedad.id, propiedad.clone());
                Ok(propiedad)
            }
            Err(e) => {
                self.collection.record_error(e.to_string());
                Err(e)
            }
        }
    }

    pub async fn update(
        &self,
        id: PropiedadId,
        payload: &ActualizaPropiedad,
    ) -> Result<Propiedad, ApiError> {
        match self.api.update_propiedad(id, payload).await {
            Ok(propiedad) => {
                self.collection
                    .replace_where(|p| p.id == id, propiedad.clone());
                Ok(propiedad)
            }
            Err(e) => {
                self.collection.record_error(e.to_string());
                Err(e)
            }
        }
    }

    pub async fn remove(&self, id: PropiedadId) -> Result<(), ApiError> {
        match self.api.delete_propiedad(id).await {
            Ok(()) => {
                self.collection.remove_where(|p| p.id == id);
                Ok(())
            }
            Err(e) => {
                self.collection.record_error(e.to_string());
                Err(e)
            }
        }
    }
}

#[async_trait]
impl RoleScopedStore for PropiedadStore {
    fn session(&self) -> &SessionHandle {
        &self.session
    }

    fn scope_for(&self, sesion: &Sesion) -> FetchScope {
        if sesion.is_authenticated() {
            FetchScope::Todo
        } else {
            FetchScope::Bloqueado
        }
    }

    fn invalidate(&self) {
        self.collection.invalidate();
    }

    fn clear(&self) {
        self.collection.clear();
    }

    async fn refresh(&self) {
        self.fetch_all().await;
    }
}
