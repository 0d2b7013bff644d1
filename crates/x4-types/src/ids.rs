//! Type-safe identifier wrappers around [`String`].
//!
//! The producer assigns every identifier; the hub treats them as opaque
//! strings and only uses them as map keys. Distinct newtypes keep a ware
//! id from being looked up in the station map by accident.
//!
//! [`EntityId`] is the only identifier with a rule: it must not be empty.
//! Ware and command identifiers may be any string.

use std::borrow::Borrow;

use serde::{Deserialize, Serialize};

/// Error produced when an identifier fails its construction rule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    /// The identifier was the empty string.
    #[error("{0} must not be empty")]
    Empty(&'static str),
}

/// Generates the accessors and conversions shared by every identifier.
macro_rules! impl_id_common {
    ($name:ident) => {
        impl $name {
            /// Borrow the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Return the inner [`String`] value.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

/// Generates an unconstrained string identifier newtype.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a string as an identifier.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl_id_common!($name);
    };
}

/// Identifier of a game entity (faction, sector, station, ship, order,
/// mission, logbook entry, player).
///
/// Deserialization rejects the empty string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityId(String);

impl EntityId {
    /// Create an entity identifier, rejecting the empty string.
    pub fn new(id: impl Into<String>) -> Result<Self, IdError> {
        let id = id.into();
        if id.is_empty() {
            return Err(IdError::Empty("entity id"));
        }
        Ok(Self(id))
    }
}

impl TryFrom<String> for EntityId {
    type Error = IdError;

    fn try_from(id: String) -> Result<Self, Self::Error> {
        Self::new(id)
    }
}

impl TryFrom<&str> for EntityId {
    type Error = IdError;

    fn try_from(id: &str) -> Result<Self, Self::Error> {
        Self::new(id)
    }
}

impl_id_common!(EntityId);

define_id! {
    /// Identifier of a ware type (e.g. `energycells`).
    WareId
}

define_id! {
    /// Identifier of a command, chosen by whoever enqueues it.
    CommandId
}
