//! Enum types for Finca entities

use crate::error::TransicionInvalida;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error returned when parsing an enum from a string fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {expected}: {value}")]
pub struct ParseEnumError {
    pub expected: &'static str,
    pub value: String,
}

impl ParseEnumError {
    fn new(expected: &'static str, value: &str) -> Self {
        Self {
            expected,
            value: value.to_string(),
        }
    }
}

/// Viewer role attached to every authenticated session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rol {
    Admin,
    Agente,
    Cliente,
}

impl fmt::Display for Rol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Rol::Admin => "admin",
            Rol::Agente => "agente",
            Rol::Cliente => "cliente",
        };
        write!(f, "{s}")
    }
}

impl FromStr for Rol {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Rol::Admin),
            "agente" => Ok(Rol::Agente),
            "cliente" => Ok(Rol::Cliente),
            other => Err(ParseEnumError::new("rol", other)),
        }
    }
}

/// Lifecycle state shared by rental and sale requests.
///
/// The remote API historically spells some terminal states in feminine form
/// for one of the two resources (`finalizada`, `rechazada`, ...). The aliases
/// normalize every spelling to the canonical masculine variant at
/// deserialization; serialization always emits the canonical form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EstadoSolicitud {
    Pendiente,
    #[serde(alias = "aprobada")]
    Aprobado,
    #[serde(alias = "activa")]
    Activo,
    #[serde(alias = "finalizada")]
    Finalizado,
    #[serde(alias = "rechazada")]
    Rechazado,
    #[serde(alias = "cancelada")]
    Cancelado,
}

impl EstadoSolicitud {
    /// Whether no further lifecycle transition can leave this state.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            EstadoSolicitud::Finalizado | EstadoSolicitud::Rechazado | EstadoSolicitud::Cancelado
        )
    }

    /// Legal transition graph. `pendiente` is never re-entered once left.
    pub fn can_transition_to(self, hacia: EstadoSolicitud) -> bool {
        use EstadoSolicitud::*;
        matches!(
            (self, hacia),
            (Pendiente, Aprobado)
                | (Pendiente, Rechazado)
                | (Pendiente, Cancelado)
                | (Aprobado, Activo)
                | (Aprobado, Cancelado)
                | (Activo, Finalizado)
                | (Activo, Cancelado)
        )
    }

    pub fn validate_transition(self, hacia: EstadoSolicitud) -> Result<(), TransicionInvalida> {
        if self.can_transition_to(hacia) {
            Ok(())
        } else {
            Err(TransicionInvalida {
                desde: self,
                hacia,
            })
        }
    }
}

impl fmt::Display for EstadoSolicitud {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EstadoSolicitud::Pendiente => "pendiente",
            EstadoSolicitud::Aprobado => "aprobado",
            EstadoSolicitud::Activo => "activo",
            EstadoSolicitud::Finalizado => "finalizado",
            EstadoSolicitud::Rechazado => "rechazado",
            EstadoSolicitud::Cancelado => "cancelado",
        };
        write!(f, "{s}")
    }
}

impl FromStr for EstadoSolicitud {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pendiente" => Ok(EstadoSolicitud::Pendiente),
            "aprobado" | "aprobada" => Ok(EstadoSolicitud::Aprobado),
            "activo" | "activa" => Ok(EstadoSolicitud::Activo),
            "finalizado" | "finalizada" => Ok(EstadoSolicitud::Finalizado),
            "rechazado" | "rechazada" => Ok(EstadoSolicitud::Rechazado),
            "cancelado" | "cancelada" => Ok(EstadoSolicitud::Cancelado),
            other => Err(ParseEnumError::new("estado de solicitud", other)),
        }
    }
}

/// Occupancy state of a property, updated server-side as requests advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EstadoPropiedad {
    Disponible,
    Alquilada,
    Vendida,
    Cancelado,
}

impl fmt::Display for EstadoPropiedad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EstadoPropiedad::Disponible => "disponible",
            EstadoPropiedad::Alquilada => "alquilada",
            EstadoPropiedad::Vendida => "vendida",
            EstadoPropiedad::Cancelado => "cancelado",
        };
        write!(f, "{s}")
    }
}

impl FromStr for EstadoPropiedad {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "disponible" => Ok(EstadoPropiedad::Disponible),
            "alquilada" => Ok(EstadoPropiedad::Alquilada),
            "vendida" => Ok(EstadoPropiedad::Vendida),
            "cancelado" => Ok(EstadoPropiedad::Cancelado),
            other => Err(ParseEnumError::new("estado de propiedad", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn pendiente_is_never_reentered() {
        use EstadoSolicitud::*;
        for desde in [Pendiente, Aprobado, Activo, Finalizado, Rechazado, Cancelado] {
            assert!(!desde.can_transition_to(Pendiente));
        }
    }

    #[test]
    fn terminal_states_admit_nothing() {
        use EstadoSolicitud::*;
        for desde in [Finalizado, Rechazado, Cancelado] {
            for hacia in [Pendiente, Aprobado, Activo, Finalizado, Rechazado, Cancelado] {
                assert!(!desde.can_transition_to(hacia));
            }
        }
    }

    #[test]
    fn approval_path_is_legal() {
        use EstadoSolicitud::*;
        assert!(Pendiente.can_transition_to(Aprobado));
        assert!(Aprobado.can_transition_to(Activo));
        assert!(Activo.can_transition_to(Finalizado));
    }

    #[test]
    fn feminine_spellings_normalize_on_deserialization() {
        let estado: EstadoSolicitud = serde_json::from_str("\"finalizada\"").unwrap();
        assert_eq!(estado, EstadoSolicitud::Finalizado);
        let estado: EstadoSolicitud = serde_json::from_str("\"aprobada\"").unwrap();
        assert_eq!(estado, EstadoSolicitud::Aprobado);
        // Canonical form always serialized back.
        assert_eq!(
            serde_json::to_string(&EstadoSolicitud::Finalizado).unwrap(),
            "\"finalizado\""
        );
    }

    #[test]
    fn rol_round_trips_through_str() {
        for rol in [Rol::Admin, Rol::Agente, Rol::Cliente] {
            assert_eq!(rol.to_string().parse::<Rol>().unwrap(), rol);
        }
    }

    fn any_estado() -> impl Strategy<Value = EstadoSolicitud> {
        use EstadoSolicitud::*;
        prop_oneof![
            Just(Pendiente),
            Just(Aprobado),
            Just(Activo),
            Just(Finalizado),
            Just(Rechazado),
            Just(Cancelado),
        ]
    }

    proptest! {
        // Walking any sequence of legal transitions never returns to pendiente.
        #[test]
        fn legal_walks_are_monotonic(pasos in proptest::collection::vec(any_estado(), 1..8)) {
            let mut actual = EstadoSolicitud::Pendiente;
            let mut salio = false;
            for hacia in pasos {
                if actual.can_transition_to(hacia) {
                    actual = hacia;
                    salio = true;
                }
                if salio {
                    prop_assert_ne!(actual, EstadoSolicitud::Pendiente);
                }
            }
        }

        #[test]
        fn serde_round_trip_is_canonical(estado in any_estado()) {
            let json = serde_json::to_string(&estado).unwrap();
            let back: EstadoSolicitud = serde_json::from_str(&json).unwrap();
            prop_assert_eq!(back, estado);
            // No feminine spelling survives serialization.
            prop_assert!(!json.ends_with("a\""));
        }
    }
}
