//! Session and principal types
//!
//! Exactly one [`Sesion`] exists per process; the client crate owns the
//! single writer. These are plain values - the synchronization discipline
//! lives with the session store.

use crate::entities::Usuario;
use crate::enums::Rol;
use crate::identity::{ClienteId, UsuarioId};
use serde::{Deserialize, Serialize};

/// The authenticated viewer's identity and role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Principal {
    pub id: UsuarioId,
    pub nombre: String,
    pub email: String,
    pub rol: Rol,
    pub id_cliente: Option<ClienteId>,
}

impl From<Usuario> for Principal {
    fn from(usuario: Usuario) -> Self {
        Self {
            id: usuario.id,
            nombre: usuario.nombre,
            email: usuario.email,
            rol: usuario.rol,
            id_cliente: usuario.id_cliente,
        }
    }
}

/// Current credential and viewer identity. Both fields are `None` between
/// logout (or a rejected credential) and the next successful login.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sesion {
    pub principal: Option<Principal>,
    pub token: Option<String>,
}

impl Sesion {
    pub fn authenticated(principal: Principal, token: String) -> Self {
        Self {
            principal: Some(principal),
            token: Some(token),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.principal.is_some()
    }

    pub fn rol(&self) -> Option<Rol> {
        self.principal.as_ref().map(|p| p.rol)
    }

    pub fn id_cliente(&self) -> Option<ClienteId> {
        self.principal.as_ref().and_then(|p| p.id_cliente)
    }
}
