//! Frontera con los contenedores clave/valor de plataforma.
//!
//! Un contenedor sólo se puede leer con accesos tipados que fallan si el tipo
//! almacenado no coincide. Algunos entornos además permiten enumerar las claves
//! y consultar el tipo declarado de cada una; eso se expone con
//! [`FormatSource::introspection`].

pub mod media_format;
pub mod toml_table;

use bytes::Bytes;

use crate::error::AccessError;
use crate::value::ValueType;

pub use media_format::{INTROSPECTION_MIN_API_LEVEL, MediaFormat, RuntimeCapabilities};

/// Tipo declarado por el contenedor para una clave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclaredType {
    Null,
    Int,
    Long,
    Float,
    String,
    ByteBuffer,
    /// Cualquier tipo que el contenedor conoce y nosotros no.
    Unrecognized,
}

impl DeclaredType {
    /// `None` para `Null` y `Unrecognized`: esas claves no se importan.
    pub fn supported(self) -> Option<ValueType> {
        match self {
            DeclaredType::Int => Some(ValueType::Int),
            DeclaredType::Long => Some(ValueType::Long),
            DeclaredType::Float => Some(ValueType::Float),
            DeclaredType::String => Some(ValueType::String),
            DeclaredType::ByteBuffer => Some(ValueType::ByteBuffer),
            DeclaredType::Null | DeclaredType::Unrecognized => None,
        }
    }
}

impl From<ValueType> for DeclaredType {
    fn from(ty: ValueType) -> Self {
        match ty {
            ValueType::Null => DeclaredType::Null,
            ValueType::Int => DeclaredType::Int,
            ValueType::Long => DeclaredType::Long,
            ValueType::Float => DeclaredType::Float,
            ValueType::String => DeclaredType::String,
            ValueType::ByteBuffer => DeclaredType::ByteBuffer,
        }
    }
}

pub trait KeyIntrospection {
    fn keys(&self) -> Vec<String>;
    fn declared_type(&self, key: &str) -> DeclaredType;
}

/// Contenedor del que se pueden leer parámetros.
pub trait FormatSource {
    fn contains_key(&self, key: &str) -> bool;

    fn get_i32(&self, key: &str) -> Result<i32, AccessError>;
    fn get_i64(&self, key: &str) -> Result<i64, AccessError>;
    fn get_f32(&self, key: &str) -> Result<f32, AccessError>;
    fn get_string(&self, key: &str) -> Result<String, AccessError>;
    fn get_bytes(&self, key: &str) -> Result<Bytes, AccessError>;

    /// Acceso a los tipos declarados, si el entorno lo soporta.
    fn introspection(&self) -> Option<&dyn KeyIntrospection> {
        None
    }
}

/// Contenedor en el que se pueden escribir parámetros. Las claves existentes se sobrescriben.
pub trait FormatSink {
    fn set_i32(&mut self, key: &str, value: i32) -> Result<(), AccessError>;
    fn set_i64(&mut self, key: &str, value: i64) -> Result<(), AccessError>;
    fn set_f32(&mut self, key: &str, value: f32) -> Result<(), AccessError>;
    fn set_string(&mut self, key: &str, value: &str) -> Result<(), AccessError>;
    /// Recibe una copia del buffer; el contenedor no comparte memoria con el store.
    fn set_bytes(&mut self, key: &str, value: &[u8]) -> Result<(), AccessError>;
}
