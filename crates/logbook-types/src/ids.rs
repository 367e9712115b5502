//! Identifier types for logged entities and activities.
//!
//! Entities and simulation runs carry strongly-typed UUID v7 identifiers so
//! they cannot be mixed up at compile time. Activity identifiers are opaque
//! tokens handed in by the surrounding simulation engine; they are usually
//! UUID strings but any text is accepted.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for a simulated entity (vessel, site, equipment).
    EntityId
}

define_id! {
    /// Unique identifier for one simulation run.
    RunId
}

/// Opaque identifier naming an activity instance.
///
/// The log never interprets the contents; it only stores, compares, and
/// exports them. Serializes as a bare string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export, export_to = "bindings/")]
pub struct ActivityId(String);

impl ActivityId {
    /// Create a fresh activity identifier from a UUID v7.
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Borrow the identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ActivityId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ActivityId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for ActivityId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<Uuid> for ActivityId {
    fn from(id: Uuid) -> Self {
        Self(id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_distinct_types() {
        let entity = EntityId::new();
        let run = RunId::new();
        // These are different types -- the compiler enforces no mixing.
        assert_ne!(entity.into_inner(), Uuid::nil());
        assert_ne!(run.into_inner(), Uuid::nil());
    }

    #[test]
    fn activity_id_serializes_as_plain_string() {
        let id = ActivityId::from("unload-1");
        let json = serde_json::to_string(&id).ok();
        assert_eq!(json.as_deref(), Some("\"unload-1\""));
    }

    #[test]
    fn activity_id_from_uuid_matches_uuid_text() {
        let raw = Uuid::now_v7();
        assert_eq!(ActivityId::from(raw).as_str(), raw.to_string());
    }

    #[test]
    fn generated_activity_ids_differ() {
        assert_ne!(ActivityId::generate(), ActivityId::generate());
    }
}
