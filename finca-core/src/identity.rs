//! Identity types for Finca entities

use serde::{Deserialize, Serialize};
use std::fmt;

/// Server-assigned integer ids, wrapped per entity so a `ClienteId` can
/// never be passed where a `PropiedadId` is expected.
macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            pub const fn as_i64(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(
    /// Id of a property record.
    PropiedadId
);
entity_id!(
    /// Id of a client record.
    ClienteId
);
entity_id!(
    /// Id of a platform user record.
    UsuarioId
);
entity_id!(
    /// Id of a rental request.
    AlquilerId
);
entity_id!(
    /// Id of a sale request.
    VentaId
);
