//! Client-records store.

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::session::SessionHandle;
use crate::stores::{Collection, FetchScope, RoleScopedStore, StoreStatus};
use async_trait::async_trait;
use finca_core::{ActualizaCliente, Cliente, ClienteId, NuevoCliente, Sesion};
use std::sync::Arc;

pub struct ClienteStore {
    api: ApiClient,
    session: SessionHandle,
    collection: Collection<Cliente>,
}

impl ClienteStore {
    pub fn new(api: ApiClient) -> Arc<Self> {
        let session = api.gateway().session().clone();
        Arc::new(Self {
            api,
            session,
            collection: Collection::new(),
        })
    }

    pub fn clientes(&self) -> Vec<Cliente> {
        self.collection.snapshot()
    }

    pub fn status(&self) -> StoreStatus {
        self.collection.status()
    }

    pub fn last_error(&self) -> Option<String> {
        self.collection.last_error()
    }

    pub async fn fetch_all(&self) -> Vec<Cliente> {
        let fence = self.collection.begin_fetch();
        match self.api.list_clientes().await {
            Ok(items) => {
                self.collection.complete_fetch(fence, items);
            }
            Err(e) => {
                tracing::warn!(error = %e, "fetch de clientes fallido");
                self.collection.fail_fetch(fence, e.to_string());
            }
        }
        self.collection.snapshot()
    }

    pub async fn get_by_id(&self, id: ClienteId) -> Option<Cliente> {
        match self.api.get_cliente(id).await {
            Ok(cliente) => Some(cliente),
            Err(e) => {
                self.collection.record_error(e.to_string());
                None
            }
        }
    }

    pub async fn create(&self, payload: &NuevoCliente) -> Result<Cliente, ApiError> {
        match self.api.create_cliente(payload).await {
            Ok(cliente) => {
                self.collection.upsert(|c| c.id == cliente.id, cliente.clone());
                Ok(cliente)
            }
            Err(e) => {
                self.collection.record_error(e.to_string());
                Err(e)
            }
        }
    }

    pub async fn update(
        &self,
        id: ClienteId,
        payload: &ActualizaCliente,
    ) -> Result<Cliente, ApiError> {
        match self.api.update_cliente(id, payload).await {
            Ok(cliente) => {
                self.collection.replace_where(|c| c.id == id, cliente.clone());
                Ok(cliente)
            }
            Err(e) => {
                self.collection.record_error(e.to_string());
                Err(e)
            }
        }
    }

    pub async fn remove(&self, id: ClienteId) -> Result<(), ApiError> {
        match self.api.delete_cliente(id).await {
            Ok(()) => {
                self.collection.remove_where(|c| c.id == id);
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
impl RoleScopedStore for ClienteStore {
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
