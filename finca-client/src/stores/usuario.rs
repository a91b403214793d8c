//! Platform-user store. Admin-only; tracks the active and the
//! logically-deleted collections separately.

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::session::SessionHandle;
use crate::stores::{Collection, FetchScope, RoleScopedStore, StoreStatus};
use async_trait::async_trait;
use finca_core::{NuevoUsuario, Rol, Sesion, Usuario, UsuarioId};
use std::sync::Arc;

pub struct UsuarioStore {
    api: ApiClient,
    session: SessionHandle,
    activos: Collection<Usuario>,
    inactivos: Collection<Usuario>,
}

impl UsuarioStore {
    pub fn new(api: ApiClient) -> Arc<Self> {
        let session = api.gateway().session().clone();
        Arc::new(Self {
            api,
            session,
            activos: Collection::new(),
            inactivos: Collection::new(),
        })
    }

    pub fn usuarios(&self) -> Vec<Usuario> {
        self.activos.snapshot()
    }

    pub fn inactivos(&self) -> Vec<Usuario> {
        self.inactivos.snapshot()
    }

    pub fn status(&self) -> StoreStatus {
        self.activos.status()
    }

    pub fn last_error(&self) -> Option<String> {
        self.activos.last_error().or_else(|| self.inactivos.last_error())
    }

    pub async fn fetch_all(&self) -> Vec<Usuario> {
        let fence = self.activos.begin_fetch();
        match self.api.list_usuarios().await {
            Ok(items) => {
                self.activos.complete_fetch(fence, items);
            }
            Err(e) => {
                tracing::warn!(error = %e, "fetch de usuarios fallido");
                self.activos.fail_fetch(fence, e.to_string());
            }
        }
        self.activos.snapshot()
    }

    pub async fn fetch_inactivos(&self) -> Vec<Usuario> {
        let fence = self.inactivos.begin_fetch();
        match self.api.list_usuarios_inactivos().await {
            Ok(items) => {
                self.inactivos.complete_fetch(fence, items);
            }
            Err(e) => {
                tracing::warn!(error = %e, "fetch de usuarios inactivos fallido");
                self.inactivos.fail_fetch(fence, e.to_string());
            }
        }
        self.inactivos.snapshot()
    }

    pub async fn get_by_id(&self, id: UsuarioId) -> Option<Usuario> {
        match self.api.get_usuario(id).await {
            Ok(usuario) => Some(usuario),
            Err(e) => {
                self.activos.record_error(e.to_string());
                None
            }
        }
    }

    pub async fn create(&self, payload: &NuevoUsuario) -> Result<Usuario, ApiError> {
        match self.api.create_usuario(payload).await {
            Ok(usuario) => {
                self.activos.upsert(|u| u.id == usuario.id, usuario.clone());
                Ok(usuario)
            }
            Err(e) => {
                self.activos.record_error(e.to_string());
                Err(e)
            }
        }
    }

    pub async fn update(&self, id: UsuarioId, payload: &NuevoUsuario) -> Result<Usuario, ApiError> {
        match self.api.update_usuario(id, payload).await {
            Ok(usuario) => {
                self.activos.replace_where(|u| u.id == id, usuario.clone());
                Ok(usuario)
            }
            Err(e) => {
                self.activos.record_error(e.to_string());
                Err(e)
            }
        }
    }

    /// Soft removal: the server flips the `activo` flag; the record leaves
    /// the visible collection immediately and shows up in the inactive list
    /// on its next fetch.
    pub async fn remove(&self, id: UsuarioId) -> Result<(), ApiError> {
        match self.api.delete_usuario(id).await {
            Ok(()) => {
                self.activos.remove_where(|u| u.id == id);
                Ok(())
            }
            Err(e) => {
                self.activos.record_error(e.to_string());
                Err(e)
            }
        }
    }

    pub async fn remove_permanente(&self, id: UsuarioId) -> Result<(), ApiError> {
        match self.api.delete_usuario_permanente(id).await {
            Ok(()) => {
                self.activos.remove_where(|u| u.id == id);
                self.inactivos.remove_where(|u| u.id == id);
                Ok(())
            }
            Err(e) => {
                self.inactivos.record_error(e.to_string());
                Err(e)
            }
        }
    }

    /// Reintroduce a logically-deleted user. The active list is reloaded in
    /// full afterward so ordering matches the server instead of splicing
    /// locally.
    pub async fn restaurar(&self, id: UsuarioId) -> Result<(), ApiError> {
        match self.api.restore_usuario(id).await {
            Ok(()) => {
                self.inactivos.remove_where(|u| u.id == id);
                self.fetch_all().await;
                Ok(())
            }
            Err(e) => {
                self.inactivos.record_error(e.to_string());
                Err(e)
            }
        }
    }
}

#[async_trait]
impl RoleScopedStore for UsuarioStore {
    fn session(&self) -> &SessionHandle {
        &self.session
    }

    fn scope_for(&self, sesion: &Sesion) -> FetchScope {
        match sesion.rol() {
            Some(Rol::Admin) => FetchScope::Todo,
            _ => FetchScope::Bloqueado,
        }
    }

    fn invalidate(&self) {
        self.activos.invalidate();
        self.inactivos.invalidate();
    }

    fn clear(&self) {
        self.activos.clear();
        self.inactivos.clear();
    }

    async fn refresh(&self) {
        self.fetch_all().await;
    }
}
