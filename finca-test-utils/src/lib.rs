//! Finca Test Utilities
//!
//! Centralized test infrastructure for the Finca workspace:
//! - `MockSender`: a scripted `HttpSend` with a request log
//! - Response helpers for the JSON shapes the remote API produces
//! - Entity fixtures for common scenarios

use async_trait::async_trait;
use chrono::NaiveDate;
use finca_client::{HttpSend, InboundResponse, Method, OutboundRequest, TransportFailure};
use finca_core::{
    AlquilerId, Cliente, ClienteId, EstadoPropiedad, EstadoSolicitud, Propiedad, PropiedadId, Rol,
    SolicitudAlquiler, SolicitudVenta, Usuario, UsuarioId, VentaId,
};
use once_cell::sync::OnceCell;
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// Initialize test logging once per process.
pub fn init_tracing() {
    static INIT: OnceCell<()> = OnceCell::new();
    INIT.get_or_init(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("finca_client=debug")
            .with_test_writer()
            .try_init();
    });
}

// ============================================================================
// MOCK TRANSPORT
// ============================================================================

/// Scripted [`HttpSend`]: responses are queued per `(method, path)` route and
/// every outbound request is recorded for assertions. When a route's queue is
/// down to one response it becomes sticky, so repeated fetches keep working.
/// Unprogrammed routes answer 404.
pub struct MockSender {
    routes: Mutex<HashMap<(Method, String), VecDeque<InboundResponse>>>,
    log: Mutex<Vec<OutboundRequest>>,
}

impl MockSender {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            routes: Mutex::new(HashMap::new()),
            log: Mutex::new(Vec::new()),
        })
    }

    /// Queue a response for a route.
    pub fn on(&self, method: Method, path: &str, response: InboundResponse) {
        self.routes
            .lock()
            .unwrap()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(response);
    }

    /// All requests seen so far, in order.
    pub fn requests(&self) -> Vec<OutboundRequest> {
        self.log.lock().unwrap().clone()
    }

    pub fn requests_for(&self, method: Method, path: &str) -> Vec<OutboundRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }

    pub fn request_count(&self, method: Method, path: &str) -> usize {
        self.requests_for(method, path).len()
    }
}

#[async_trait]
impl HttpSend for MockSender {
    async fn send(&self, request: OutboundRequest) -> Result<InboundResponse, TransportFailure> {
        self.log.lock().unwrap().push(request.clone());
        let mut routes = self.routes.lock().unwrap();
        if let Some(queue) = routes.get_mut(&(request.method, request.path.clone())) {
            if queue.len() > 1 {
                if let Some(response) = queue.pop_front() {
                    return Ok(response);
                }
            }
            if let Some(response) = queue.front() {
                return Ok(response.clone());
            }
        }
        Ok(InboundResponse {
            status: 404,
            body: br#"{"message":"ruta no programada"}"#.to_vec(),
        })
    }
}

// ============================================================================
// RESPONSE HELPERS
// ============================================================================

pub fn ok_json<T: Serialize>(value: &T) -> InboundResponse {
    InboundResponse {
        status: 200,
        body: serde_json::to_vec(value).expect("fixture serializes"),
    }
}

/// Same payload wrapped in the `{"data": ...}` envelope.
pub fn ok_enveloped<T: Serialize>(value: &T) -> InboundResponse {
    ok_json(&serde_json::json!({ "data": value }))
}

pub fn error_json(status: u16, message: &str) -> InboundResponse {
    InboundResponse {
        status,
        body: serde_json::to_vec(&serde_json::json!({ "message": message }))
            .expect("fixture serializes"),
    }
}

pub fn no_content() -> InboundResponse {
    InboundResponse {
        status: 204,
        body: Vec::new(),
    }
}

pub fn ok_bytes(body: Vec<u8>) -> InboundResponse {
    InboundResponse { status: 200, body }
}

// ============================================================================
// FIXTURES
// ============================================================================

pub fn propiedad(id: i64) -> Propiedad {
    Propiedad {
        id: PropiedadId::new(id),
        titulo: format!("Piso {id}"),
        direccion: format!("Calle Mayor {id}"),
        descripcion: None,
        precio: 950.0,
        estado: EstadoPropiedad::Disponible,
        id_agente: None,
    }
}

pub fn cliente(id: i64) -> Cliente {
    Cliente {
        id: ClienteId::new(id),
        nombre: format!("Cliente {id}"),
        email: format!("cliente{id}@finca.example"),
        telefono: None,
        direccion: None,
    }
}

pub fn usuario(id: i64, rol: Rol) -> Usuario {
    Usuario {
        id: UsuarioId::new(id),
        nombre: format!("Usuario {id}"),
        email: format!("usuario{id}@finca.example"),
        rol,
        id_cliente: None,
        activo: true,
    }
}

/// A `cliente`-rol account linked to a client record.
pub fn usuario_cliente(id: i64, id_cliente: i64) -> Usuario {
    Usuario {
        id_cliente: Some(ClienteId::new(id_cliente)),
        ..usuario(id, Rol::Cliente)
    }
}

pub fn alquiler(id: i64, id_cliente: i64, estado: EstadoSolicitud) -> SolicitudAlquiler {
    SolicitudAlquiler {
        id: AlquilerId::new(id),
        id_propiedad: PropiedadId::new(1),
        id_cliente: ClienteId::new(id_cliente),
        fecha_inicio: NaiveDate::from_ymd_opt(2026, 3, 1).expect("valid date"),
        fecha_fin: NaiveDate::from_ymd_opt(2027, 2, 28).expect("valid date"),
        monto_mensual: 950.0,
        estado,
    }
}

pub fn venta(id: i64, id_cliente: i64, estado: EstadoSolicitud) -> SolicitudVenta {
    SolicitudVenta {
        id: VentaId::new(id),
        id_propiedad: PropiedadId::new(1),
        id_cliente: ClienteId::new(id_cliente),
        fecha_venta: NaiveDate::from_ymd_opt(2026, 5, 20).expect("valid date"),
        monto_total: 185_000.0,
        estado,
    }
}

/// Body of a successful login/register response.
pub fn login_respuesta(token: &str, usuario: &Usuario) -> InboundResponse {
    ok_json(&serde_json::json!({ "token": token, "usuario": usuario }))
}
