use std::{fmt, str::FromStr};

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Discriminante de un [`TypedValue`].
///
/// Los códigos numéricos (`0..=5`) son estables y coinciden con los que usa el
/// formato de plataforma para declarar el tipo de una entrada.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    Null,
    Int,
    Long,
    Float,
    String,
    ByteBuffer,
}

impl ValueType {
    pub const fn code(self) -> u8 {
        match self {
            ValueType::Null => 0,
            ValueType::Int => 1,
            ValueType::Long => 2,
            ValueType::Float => 3,
            ValueType::String => 4,
            ValueType::ByteBuffer => 5,
        }
    }

    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(ValueType::Null),
            1 => Some(ValueType::Int),
            2 => Some(ValueType::Long),
            3 => Some(ValueType::Float),
            4 => Some(ValueType::String),
            5 => Some(ValueType::ByteBuffer),
            _ => None,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ValueType::Null => "null",
            ValueType::Int => "int",
            ValueType::Long => "long",
            ValueType::Float => "float",
            ValueType::String => "string",
            ValueType::ByteBuffer => "byte-buffer",
        };
        write!(f, "{}", text)
    }
}

impl FromStr for ValueType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', '_', ' '], "");

        match normalized.as_str() {
            "null" | "absent" | "none" => Ok(ValueType::Null),
            "int" | "int32" | "integer" => Ok(ValueType::Int),
            "long" | "int64" => Ok(ValueType::Long),
            "float" | "float32" => Ok(ValueType::Float),
            "string" | "str" => Ok(ValueType::String),
            "bytes" | "bytebuffer" | "binary" => Ok(ValueType::ByteBuffer),
            _ => Err(Error::InvalidValueType(s.to_string())),
        }
    }
}

/// Valor de un parámetro de códec. El variante activo es el tipo; no hay
/// conversiones implícitas entre variantes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum TypedValue {
    /// Marcador de borrado: aplicado a un store elimina la clave.
    Null,
    Int(i32),
    Long(i64),
    Float(f32),
    String(String),
    Bytes(Bytes),
}

impl TypedValue {
    pub fn value_type(&self) -> ValueType {
        match self {
            TypedValue::Null => ValueType::Null,
            TypedValue::Int(_) => ValueType::Int,
            TypedValue::Long(_) => ValueType::Long,
            TypedValue::Float(_) => ValueType::Float,
            TypedValue::String(_) => ValueType::String,
            TypedValue::Bytes(_) => ValueType::ByteBuffer,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, TypedValue::Null)
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            TypedValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_long(&self) -> Option<i64> {
        match self {
            TypedValue::Long(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            TypedValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            TypedValue::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            TypedValue::Bytes(v) => Some(v),
            _ => None,
        }
    }
}

impl From<i32> for TypedValue {
    fn from(v: i32) -> Self {
        TypedValue::Int(v)
    }
}

impl From<i64> for TypedValue {
    fn from(v: i64) -> Self {
        TypedValue::Long(v)
    }
}

impl From<f32> for TypedValue {
    fn from(v: f32) -> Self {
        TypedValue::Float(v)
    }
}

impl From<String> for TypedValue {
    fn from(v: String) -> Self {
        TypedValue::String(v)
    }
}

impl From<&str> for TypedValue {
    fn from(v: &str) -> Self {
        TypedValue::String(v.to_string())
    }
}

impl From<Bytes> for TypedValue {
    fn from(v: Bytes) -> Self {
        TypedValue::Bytes(v)
    }
}

impl From<Vec<u8>> for TypedValue {
    fn from(v: Vec<u8>) -> Self {
        TypedValue::Bytes(Bytes::from(v))
    }
}

impl From<&[u8]> for TypedValue {
    fn from(v: &[u8]) -> Self {
        TypedValue::Bytes(Bytes::copy_from_slice(v))
    }
}

/// Par clave/valor para configurar un decodificador subyacente.
///
/// La clave tiene que ser entendida por la instancia de decodificador; aquí es opaca.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub key: String,
    pub value: TypedValue,
}

impl Parameter {
    pub fn new(key: impl Into<String>, value: impl Into<TypedValue>) -> Self {
        Parameter {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Parámetro que, al aplicarse con `set`, borra `key`.
    pub fn null(key: impl Into<String>) -> Self {
        Parameter {
            key: key.into(),
            value: TypedValue::Null,
        }
    }

    pub fn value_type(&self) -> ValueType {
        self.value.value_type()
    }
}
