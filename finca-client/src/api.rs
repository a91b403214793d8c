//! Typed surface over the remote API, one method per operation.
//!
//! Stateless: every method delegates to the gateway, which injects the
//! credential and applies the 401/403 contract. The rental and sale request
//! families share endpoints through [`SolicitudResource`] since the two
//! resources are structurally identical.

use crate::error::ApiError;
use crate::gateway::Gateway;
use finca_core::{
    ActualizaCliente, ActualizaPropiedad, Cliente, ClienteId, EstadoSolicitud, NuevoCliente,
    NuevoUsuario, NuevaPropiedad, Propiedad, PropiedadId, Solicitud, Usuario, UsuarioId,
};
use serde::{Deserialize, Serialize};

/// Endpoint family for one of the two request resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolicitudResource {
    pub base: &'static str,
}

/// Rental requests.
pub const ALQUILERES: SolicitudResource = SolicitudResource {
    base: "/alquileres",
};

/// Sale requests.
pub const VENTAS: SolicitudResource = SolicitudResource { base: "/ventas" };

#[derive(Debug, Serialize)]
struct LoginSolicitud<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRespuesta {
    pub token: String,
    pub usuario: Usuario,
}

/// Registration profile for a new client-facing account.
#[derive(Debug, Clone, Serialize)]
pub struct Registro {
    pub nombre: String,
    pub email: String,
    pub password: String,
    pub telefono: Option<String>,
}

#[derive(Debug, Serialize)]
struct EstadoBody {
    estado: EstadoSolicitud,
}

#[derive(Clone)]
pub struct ApiClient {
    gateway: Gateway,
}

impl ApiClient {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    // ------------------------------------------------------------------------
    // Auth
    // ------------------------------------------------------------------------

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginRespuesta, ApiError> {
        self.gateway
            .post_json("/auth/login", &LoginSolicitud { email, password })
            .await
    }

    pub async fn register(&self, registro: &Registro) -> Result<LoginRespuesta, ApiError> {
        self.gateway.post_json("/auth/register", registro).await
    }

    pub async fn forgot_password(&self, email: &str) -> Result<(), ApiError> {
        self.gateway
            .post_unit("/auth/forgot-password", &serde_json::json!({ "email": email }))
            .await
    }

    pub async fn reset_password(&self, token: &str, password: &str) -> Result<(), ApiError> {
        self.gateway
            .post_unit(
                "/auth/reset-password",
                &serde_json::json!({ "token": token, "password": password }),
            )
            .await
    }

    // ------------------------------------------------------------------------
    // Propiedades
    // ------------------------------------------------------------------------

    pub async fn list_propiedades(&self) -> Result<Vec<Propiedad>, ApiError> {
        self.gateway.get_json("/propiedades").await
    }

    pub async fn get_propiedad(&self, id: PropiedadId) -> Result<Propiedad, ApiError> {
        self.gateway.get_json(&format!("/propiedades/{id}")).await
    }

    pub async fn create_propiedad(&self, payload: &NuevaPropiedad) -> Result<Propiedad, ApiError> {
        self.gateway.post_json("/propiedades", payload).await
    }

    pub async fn update_propiedad(
        &self,
        id: PropiedadId,
        payload: &ActualizaPropiedad,
    ) -> Result<Propiedad, ApiError> {
        self.gateway
            .put_json(&format!("/propiedades/{id}"), payload)
            .await
    }

    pub async fn delete_propiedad(&self, id: PropiedadId) -> Result<(), ApiError> {
        self.gateway.delete_unit(&format!("/propiedades/{id}")).await
    }

    // ------------------------------------------------------------------------
    // Clientes
    // ------------------------------------------------------------------------

    pub async fn list_clientes(&self) -> Result<Vec<Cliente>, ApiError> {
        self.gateway.get_json("/clientes").await
    }

    pub async fn get_cliente(&self, id: ClienteId) -> Result<Cliente, ApiError> {
        self.gateway.get_json(&format!("/clientes/{id}")).await
    }

    pub async fn create_cliente(&self, payload: &NuevoCliente) -> Result<Cliente, ApiError> {
        self.gateway.post_json("/clientes", payload).await
    }

    pub async fn update_cliente(
        &self,
        id: ClienteId,
        payload: &ActualizaCliente,
    ) -> Result<Cliente, ApiError> {
        self.gateway
            .put_json(&format!("/clientes/{id}"), payload)
            .await
    }

    pub async fn delete_cliente(&self, id: ClienteId) -> Result<(), ApiError> {
        self.gateway.delete_unit(&format!("/clientes/{id}")).await
    }

    // ------------------------------------------------------------------------
    // Usuarios
    // ------------------------------------------------------------------------

    pub async fn list_usuarios(&self) -> Result<Vec<Usuario>, ApiError> {
        self.gateway.get_json("/usuarios").await
    }

    pub async fn list_usuarios_inactivos(&self) -> Result<Vec<Usuario>, ApiError> {
        self.gateway.get_json("/usuarios/inactivos").await
    }

    pub async fn get_usuario(&self, id: UsuarioId) -> Result<Usuario, ApiError> {
        self.gateway.get_json(&format!("/usuarios/{id}")).await
    }

    pub async fn create_usuario(&self, payload: &NuevoUsuario) -> Result<Usuario, ApiError> {
        self.gateway.post_json("/usuarios", payload).await
    }

    pub async fn update_usuario(
        &self,
        id: UsuarioId,
        payload: &NuevoUsuario,
    ) -> Result<Usuario, ApiError> {
        self.gateway
            .put_json(&format!("/usuarios/{id}"), payload)
            .await
    }

    /// Soft delete: the server flips the `activo` flag.
    pub async fn delete_usuario(&self, id: UsuarioId) -> Result<(), ApiError> {
        self.gateway.delete_unit(&format!("/usuarios/{id}")).await
    }

    pub async fn delete_usuario_permanente(&self, id: UsuarioId) -> Result<(), ApiError> {
        self.gateway
            .delete_unit(&format!("/usuarios/{id}/permanente"))
            .await
    }

    pub async fn restore_usuario(&self, id: UsuarioId) -> Result<(), ApiError> {
        self.gateway
            .patch_unit(&format!("/usuarios/{id}/restaurar"))
            .await
    }

    // ------------------------------------------------------------------------
    // Solicitudes (shared by alquileres and ventas)
    // ------------------------------------------------------------------------

    pub async fn list_solicitudes<T: Solicitud>(
        &self,
        resource: SolicitudResource,
    ) -> Result<Vec<T>, ApiError> {
        self.gateway.get_json(resource.base).await
    }

    /// Server-side `estado=pendiente` filter, independent of the main list.
    pub async fn list_solicitudes_pendientes<T: Solicitud>(
        &self,
        resource: SolicitudResource,
    ) -> Result<Vec<T>, ApiError> {
        self.gateway
            .get_json(&format!("{}/pendientes", resource.base))
            .await
    }

    pub async fn list_solicitudes_por_cliente<T: Solicitud>(
        &self,
        resource: SolicitudResource,
        id_cliente: ClienteId,
    ) -> Result<Vec<T>, ApiError> {
        self.gateway
            .get_json(&format!("{}/cliente/{id_cliente}", resource.base))
            .await
    }

    pub async fn create_solicitud<T: Solicitud>(
        &self,
        resource: SolicitudResource,
        payload: &T::Nueva,
    ) -> Result<T, ApiError> {
        self.gateway.post_json(resource.base, payload).await
    }

    pub async fn update_solicitud<T: Solicitud>(
        &self,
        resource: SolicitudResource,
        id: i64,
        payload: &T::Nueva,
    ) -> Result<T, ApiError> {
        self.gateway
            .put_json(&format!("{}/{id}", resource.base), payload)
            .await
    }

    pub async fn update_estado_solicitud<T: Solicitud>(
        &self,
        resource: SolicitudResource,
        id: i64,
        estado: EstadoSolicitud,
    ) -> Result<T, ApiError> {
        self.gateway
            .put_json(&format!("{}/{id}/estado", resource.base), &EstadoBody { estado })
            .await
    }

    pub async fn approve_solicitud<T: Solicitud>(
        &self,
        resource: SolicitudResource,
        id: i64,
    ) -> Result<T, ApiError> {
        self.gateway
            .post_action(&format!("{}/{id}/aprobar", resource.base))
            .await
    }

    pub async fn reject_solicitud(
        &self,
        resource: SolicitudResource,
        id: i64,
    ) -> Result<(), ApiError> {
        self.gateway
            .post_action_unit(&format!("{}/{id}/rechazar", resource.base))
            .await
    }

    /// Soft delete; for the requester this is a cancellation.
    pub async fn cancel_solicitud(
        &self,
        resource: SolicitudResource,
        id: i64,
    ) -> Result<(), ApiError> {
        self.gateway
            .delete_unit(&format!("{}/{id}", resource.base))
            .await
    }

    pub async fn delete_solicitud_permanente(
        &self,
        resource: SolicitudResource,
        id: i64,
    ) -> Result<(), ApiError> {
        self.gateway
            .delete_unit(&format!("{}/{id}/permanente", resource.base))
            .await
    }

    /// Contract document for a rental, as an opaque byte stream.
    pub async fn contrato_alquiler(&self, id: i64) -> Result<Vec<u8>, ApiError> {
        self.gateway.get_bytes(&format!("/alquileres/{id}/contrato")).await
    }
}
