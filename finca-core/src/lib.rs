//! Finca Core - Entity Types
//!
//! Pure data structures with no I/O. All other crates depend on this.
//! This crate contains the entity records mirrored from the remote API,
//! the request-lifecycle enums, and the legal transition graph.

mod entities;
mod enums;
mod error;
mod identity;
mod session;

pub use entities::{
    ActualizaCliente, ActualizaPropiedad, Cliente, NuevaPropiedad, NuevaSolicitudAlquiler,
    NuevaSolicitudVenta, NuevoCliente, NuevoUsuario, Propiedad, Solicitud, SolicitudAlquiler,
    SolicitudVenta, Usuario,
};
pub use enums::{EstadoPropiedad, EstadoSolicitud, ParseEnumError, Rol};
pub use error::TransicionInvalida;
pub use identity::{AlquilerId, ClienteId, PropiedadId, UsuarioId, VentaId};
pub use session::{Principal, Sesion};
