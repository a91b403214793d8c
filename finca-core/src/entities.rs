//! Core entity structures
//!
//! Records mirror the remote API's JSON shapes field for field; ids are
//! server-assigned and never fabricated locally. The `Nueva*` payloads are
//! what the client sends on create/update - the server fills in the id and
//! the initial estado.

use crate::{
    AlquilerId, ClienteId, EstadoPropiedad, EstadoSolicitud, PropiedadId, UsuarioId, VentaId,
};
use crate::enums::Rol;
use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Property listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Propiedad {
    pub id: PropiedadId,
    pub titulo: String,
    pub direccion: String,
    pub descripcion: Option<String>,
    pub precio: f64,
    pub estado: EstadoPropiedad,
    pub id_agente: Option<UsuarioId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NuevaPropiedad {
    pub titulo: String,
    pub direccion: String,
    pub descripcion: Option<String>,
    pub precio: f64,
    pub id_agente: Option<UsuarioId>,
}

/// Update payload for a property; estado changes travel here too since the
/// server owns the occupancy transitions triggered by approvals.
pub type ActualizaPropiedad = NuevaPropiedad;

/// Client of the agency (the people renting or buying, not platform users).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cliente {
    pub id: ClienteId,
    pub nombre: String,
    pub email: String,
    pub telefono: Option<String>,
    pub direccion: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NuevoCliente {
    pub nombre: String,
    pub email: String,
    pub telefono: Option<String>,
    pub direccion: Option<String>,
}

pub type ActualizaCliente = NuevoCliente;

/// Platform user account. `id_cliente` links a `cliente`-rol account to the
/// client record whose requests it may see.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Usuario {
    pub id: UsuarioId,
    pub nombre: String,
    pub email: String,
    pub rol: Rol,
    pub id_cliente: Option<ClienteId>,
    #[serde(default = "default_activo")]
    pub activo: bool,
}

fn default_activo() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NuevoUsuario {
    pub nombre: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub rol: Rol,
    pub id_cliente: Option<ClienteId>,
}

/// Rental request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolicitudAlquiler {
    pub id: AlquilerId,
    pub id_propiedad: PropiedadId,
    pub id_cliente: ClienteId,
    pub fecha_inicio: NaiveDate,
    pub fecha_fin: NaiveDate,
    pub monto_mensual: f64,
    pub estado: EstadoSolicitud,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NuevaSolicitudAlquiler {
    pub id_propiedad: PropiedadId,
    pub id_cliente: ClienteId,
    pub fecha_inicio: NaiveDate,
    pub fecha_fin: NaiveDate,
    pub monto_mensual: f64,
}

/// Sale request. Structurally a sibling of [`SolicitudAlquiler`]; both share
/// the same lifecycle and the same workflow operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolicitudVenta {
    pub id: VentaId,
    pub id_propiedad: PropiedadId,
    pub id_cliente: ClienteId,
    pub fecha_venta: NaiveDate,
    pub monto_total: f64,
    pub estado: EstadoSolicitud,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NuevaSolicitudVenta {
    pub id_propiedad: PropiedadId,
    pub id_cliente: ClienteId,
    pub fecha_venta: NaiveDate,
    pub monto_total: f64,
}

/// Seam shared by the two request entities so one store implementation can
/// drive both lifecycles.
pub trait Solicitud:
    Clone + PartialEq + Send + Sync + Serialize + DeserializeOwned + 'static
{
    /// Create/update payload for this request type.
    type Nueva: Serialize + Send + Sync + 'static;

    fn id(&self) -> i64;
    fn id_cliente(&self) -> ClienteId;
    fn estado(&self) -> EstadoSolicitud;
    fn set_estado(&mut self, estado: EstadoSolicitud);
}

impl Solicitud for SolicitudAlquiler {
    type Nueva = NuevaSolicitudAlquiler;

    fn id(&self) -> i64 {
        self.id.as_i64()
    }

    fn id_cliente(&self) -> ClienteId {
        self.id_cliente
    }

    fn estado(&self) -> EstadoSolicitud {
        self.estado
    }

    fn set_estado(&mut self, estado: EstadoSolicitud) {
        self.estado = estado;
    }
}

impl Solicitud for SolicitudVenta {
    type Nueva = NuevaSolicitudVenta;

    fn id(&self) -> i64 {
        self.id.as_i64()
    }

    fn id_cliente(&self) -> ClienteId {
        self.id_cliente
    }

    fn estado(&self) -> EstadoSolicitud {
        self.estado
    }

    fn set_estado(&mut self, estado: EstadoSolicitud) {
        self.estado = estado;
    }
}
