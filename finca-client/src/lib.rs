//! Finca Client - role-aware domain state over the remote property API.
//!
//! The engine mirrors five server-side collections (properties, clients,
//! platform users, rental requests, sale requests) into in-memory stores,
//! scopes what each viewer role fetches and sees, and drives the shared
//! approval/cancellation lifecycle for the two request types. The remote
//! service is the single source of truth; this layer is a faithful,
//! role-aware mirror plus workflow orchestration.

pub mod api;
pub mod config;
pub mod error;
pub mod gateway;
pub mod session;
pub mod stores;

pub use api::{ApiClient, LoginRespuesta, Registro, SolicitudResource, ALQUILERES, VENTAS};
pub use config::{ClientConfig, ConfigError};
pub use error::ApiError;
pub use gateway::{Gateway, HttpSend, InboundResponse, Method, OutboundRequest, ReqwestSender, TransportFailure};
pub use session::{AuthEvent, SessionHandle, SessionStore};
pub use stores::{
    spawn_auto_fetch, AlquilerStore, ClienteStore, FetchScope, PropiedadStore, RoleScopedStore,
    SolicitudStore, StoreStatus, UsuarioStore, VentaStore,
};

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Everything wired to one session: the session store plus the five entity
/// stores, all sharing a single gateway.
pub struct Finca {
    pub session: SessionStore,
    pub propiedades: Arc<PropiedadStore>,
    pub clientes: Arc<ClienteStore>,
    pub usuarios: Arc<UsuarioStore>,
    pub alquileres: Arc<AlquilerStore>,
    pub ventas: Arc<VentaStore>,
    api: ApiClient,
}

impl Finca {
    pub fn connect(config: &ClientConfig) -> Result<Self, ApiError> {
        config.validate()?;
        let sender = ReqwestSender::new(
            &config.api_base_url,
            Duration::from_millis(config.request_timeout_ms),
        )?;
        Ok(Self::with_sender(Arc::new(sender)))
    }

    /// Wire the engine over any transport; tests substitute a scripted one.
    pub fn with_sender(sender: Arc<dyn HttpSend>) -> Self {
        let handle = SessionHandle::new();
        let gateway = Gateway::new(sender, handle);
        let api = ApiClient::new(gateway);
        Self {
            session: SessionStore::new(api.clone()),
            propiedades: PropiedadStore::new(api.clone()),
            clientes: ClienteStore::new(api.clone()),
            usuarios: UsuarioStore::new(api.clone()),
            alquileres: AlquilerStore::alquileres(api.clone()),
            ventas: VentaStore::ventas(api.clone()),
            api,
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Start the session watchers that trigger role-scoped fetches once the
    /// viewer authenticates and suppress them once the session is gone.
    pub fn start_auto_fetch(&self) -> Vec<JoinHandle<()>> {
        vec![
            spawn_auto_fetch(Arc::clone(&self.propiedades)),
            spawn_auto_fetch(Arc::clone(&self.clientes)),
            spawn_auto_fetch(Arc::clone(&self.usuarios)),
            spawn_auto_fetch(Arc::clone(&self.alquileres)),
            spawn_auto_fetch(Arc::clone(&self.ventas)),
        ]
    }
}
