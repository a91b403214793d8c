//! Entity stores: one in-memory, role-scoped mirror per remote collection.
//!
//! Shared plumbing lives here. Every store follows the same contract:
//! read operations (`fetch_all`, `get_by_id`, `fetch_pendientes`) record
//! failures and resolve to stale or empty data, mutating operations record
//! the failure and propagate it so the caller knows whether to proceed.
//! A failed fetch never clears the previous collection.
//!
//! Stale responses are fenced with a generation counter: a fetch captures the
//! generation before suspending, and its result only lands if no role-scope
//! change or logout bumped the generation in the meantime.

mod cliente;
mod propiedad;
mod solicitud;
mod usuario;

pub use cliente::ClienteStore;
pub use propiedad::PropiedadStore;
pub use solicitud::{AlquilerStore, SolicitudStore, VentaStore};
pub use usuario::UsuarioStore;

use crate::session::SessionHandle;
use async_trait::async_trait;
use finca_core::{ClienteId, Sesion};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::task::JoinHandle;

/// Lifecycle of a store's collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Errored,
}

/// What a store is allowed to load for the current viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchScope {
    /// Full collection.
    Todo,
    /// Only records belonging to this client.
    PorCliente(ClienteId),
    /// Not authenticated, or the role may not see this collection at all.
    Bloqueado,
}

#[derive(Debug)]
struct StoreState<T> {
    items: Vec<T>,
    status: StoreStatus,
    error: Option<String>,
    generation: u64,
}

impl<T> Default for StoreState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            status: StoreStatus::Idle,
            error: None,
            generation: 0,
        }
    }
}

/// Interior state of one collection. Locks are held only across synchronous
/// sections, never across an await point.
pub(crate) struct Collection<T> {
    state: RwLock<StoreState<T>>,
}

impl<T: Clone> Collection<T> {
    pub(crate) fn new() -> Self {
        Self {
            state: RwLock::new(StoreState::default()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreState<T>> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState<T>> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    pub(crate) fn snapshot(&self) -> Vec<T> {
        self.read().items.clone()
    }

    pub(crate) fn status(&self) -> StoreStatus {
        self.read().status
    }

    pub(crate) fn last_error(&self) -> Option<String> {
        self.read().error.clone()
    }

    /// Mark loading and return the fence for this fetch.
    pub(crate) fn begin_fetch(&self) -> u64 {
        let mut state = self.write();
        state.status = StoreStatus::Loading;
        state.error = None;
        state.generation
    }

    /// Invalidate any in-flight fetch; its result will be discarded.
    pub(crate) fn invalidate(&self) {
        self.write().generation += 1;
    }

    /// Replace the collection if the fence still holds. Server order is
    /// preserved as-is.
    pub(crate) fn complete_fetch(&self, fence: u64, items: Vec<T>) -> bool {
        let mut state = self.write();
        if state.generation != fence {
            tracing::debug!("discarding superseded fetch result");
            return false;
        }
        state.items = items;
        state.status = StoreStatus::Ready;
        state.error = None;
        true
    }

    /// Record a fetch failure, leaving the stale collection untouched.
    pub(crate) fn fail_fetch(&self, fence: u64, message: String) {
        let mut state = self.write();
        if state.generation != fence {
            return;
        }
        state.status = StoreStatus::Errored;
        state.error = Some(message);
    }

    pub(crate) fn record_error(&self, message: String) {
        self.write().error = Some(message);
    }

    /// Insert a record, replacing any existing one with the same identity
    /// instead of pushing a second copy. A fetch that resolves while a create
    /// is still in flight can already carry the server-committed record.
    pub(crate) fn upsert<F: Fn(&T) -> bool>(&self, matches: F, item: T) {
        let mut state = self.write();
        if let Some(existing) = state.items.iter_mut().find(|r| matches(r)) {
            *existing = item;
        } else {
            state.items.push(item);
        }
    }

    /// Replace the first matching record in place, preserving its position.
    /// Non-matching ids are a no-op.
    pub(crate) fn replace_where<F: Fn(&T) -> bool>(&self, matches: F, item: T) {
        let mut state = self.write();
        if let Some(existing) = state.items.iter_mut().find(|r| matches(r)) {
            *existing = item;
        }
    }

    pub(crate) fn remove_where<F: Fn(&T) -> bool>(&self, matches: F) {
        self.write().items.retain(|r| !matches(r));
    }

    pub(crate) fn clear(&self) {
        let mut state = self.write();
        state.items.clear();
        state.status = StoreStatus::Idle;
        state.error = None;
    }
}

/// A store whose fetches are scoped by the viewer's role.
#[async_trait]
pub trait RoleScopedStore: Send + Sync + 'static {
    fn session(&self) -> &SessionHandle;

    /// Derive the fetch scope from a session. Re-evaluation keys off the
    /// resulting scope, so a login that keeps the same role and client ref
    /// does not trigger a redundant reload.
    fn scope_for(&self, sesion: &Sesion) -> FetchScope;

    /// Bump generation fences so superseded in-flight fetches are discarded.
    fn invalidate(&self);

    /// Drop cached records (logout, or the role lost access).
    fn clear(&self);

    /// Run the role-scoped fetches for this store.
    async fn refresh(&self);
}

/// Watch the session and re-fetch whenever the derived scope changes.
/// While the scope is [`FetchScope::Bloqueado`] fetches are suppressed.
pub fn spawn_auto_fetch<S: RoleScopedStore>(store: Arc<S>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut rx = store.session().subscribe();
        let mut last: Option<FetchScope> = None;
        loop {
            let sesion = rx.borrow_and_update().clone();
            let scope = store.scope_for(&sesion);
            if last != Some(scope) {
                last = Some(scope);
                store.invalidate();
                if scope == FetchScope::Bloqueado {
                    store.clear();
                } else {
                    store.refresh().await;
                }
            }
            if rx.changed().await.is_err() {
                break;
            }
        }
    })
}
