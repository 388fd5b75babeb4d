use thiserror::Error;

use crate::value::ValueType;

/// Fallo de una lectura o escritura tipada sobre un contenedor externo.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccessError {
    #[error("key `{key}` not found")]
    Missing { key: String },

    #[error("key `{key}` holds a {found} value, not {expected}")]
    TypeMismatch {
        key: String,
        expected: ValueType,
        found: ValueType,
    },

    #[error("key `{key}` holds an unsupported {kind} value")]
    Unsupported { key: String, kind: &'static str },

    #[error("container rejected key `{key}`: {reason}")]
    Rejected { key: String, reason: String },
}

impl AccessError {
    pub fn missing(key: &str) -> Self {
        AccessError::Missing { key: key.to_string() }
    }

    pub fn mismatch(key: &str, expected: ValueType, found: ValueType) -> Self {
        AccessError::TypeMismatch {
            key: key.to_string(),
            expected,
            found,
        }
    }

    pub fn rejected(key: &str, reason: impl Into<String>) -> Self {
        AccessError::Rejected {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    /// El contenedor de salida rechazó una escritura. Las escrituras previas se mantienen.
    #[error("failed to export parameter `{key}`")]
    Export {
        key: String,
        #[source]
        source: AccessError,
    },

    #[error("container does not expose declared types; pass an explicit key filter")]
    UnsupportedCapability,

    #[error("Invalid value type: {0}")]
    InvalidValueType(String),

    #[error("Configuration parse error: {0}")]
    Config(#[from] config::ConfigError),
}

pub type Result<T> = std::result::Result<T, Error>;
