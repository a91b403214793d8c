//! Error types for Finca domain rules

use crate::enums::EstadoSolicitud;
use thiserror::Error;

/// A request-lifecycle transition that the legal graph does not admit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("transicion de estado no permitida: {desde} -> {hacia}")]
pub struct TransicionInvalida {
    pub desde: EstadoSolicitud,
    pub hacia: EstadoSolicitud,
}
