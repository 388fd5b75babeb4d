//! `toml::Table` como contenedor externo.
//!
//! TOML no distingue entre enteros de 32 y 64 bits, así que no hay
//! introspección: la importación tiene que sondear tipos con una lista de claves.

use bytes::Bytes;
use toml::{Table, Value};

use super::{FormatSink, FormatSource};
use crate::error::AccessError;
use crate::value::ValueType;

fn mismatch(key: &str, expected: ValueType, found: &Value) -> AccessError {
    let found = match found {
        Value::Integer(_) => ValueType::Long,
        Value::Float(_) => ValueType::Float,
        Value::String(_) => ValueType::String,
        Value::Array(items) if items.iter().all(|v| byte_of(v).is_some()) => ValueType::ByteBuffer,
        other => {
            return AccessError::Unsupported {
                key: key.to_string(),
                kind: other.type_str(),
            };
        }
    };
    AccessError::mismatch(key, expected, found)
}

fn byte_of(value: &Value) -> Option<u8> {
    value.as_integer().and_then(|i| u8::try_from(i).ok())
}

fn lookup<'a>(table: &'a Table, key: &str) -> Result<&'a Value, AccessError> {
    table.get(key).ok_or_else(|| AccessError::missing(key))
}

impl FormatSource for Table {
    fn contains_key(&self, key: &str) -> bool {
        Table::contains_key(self, key)
    }

    fn get_i32(&self, key: &str) -> Result<i32, AccessError> {
        let value = lookup(self, key)?;
        value
            .as_integer()
            .and_then(|i| i32::try_from(i).ok())
            .ok_or_else(|| mismatch(key, ValueType::Int, value))
    }

    fn get_i64(&self, key: &str) -> Result<i64, AccessError> {
        let value = lookup(self, key)?;
        value.as_integer().ok_or_else(|| mismatch(key, ValueType::Long, value))
    }

    fn get_f32(&self, key: &str) -> Result<f32, AccessError> {
        let value = lookup(self, key)?;
        value
            .as_float()
            .and_then(|f| {
                let narrowed = f as f32;
                // un f64 finito fuera de rango no es un f32
                (!(f.is_finite() && narrowed.is_infinite())).then_some(narrowed)
            })
            .ok_or_else(|| mismatch(key, ValueType::Float, value))
    }

    fn get_string(&self, key: &str) -> Result<String, AccessError> {
        let value = lookup(self, key)?;
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| mismatch(key, ValueType::String, value))
    }

    fn get_bytes(&self, key: &str) -> Result<Bytes, AccessError> {
        let value = lookup(self, key)?;
        value
            .as_array()
            .and_then(|items| items.iter().map(byte_of).collect::<Option<Vec<u8>>>())
            .map(Bytes::from)
            .ok_or_else(|| mismatch(key, ValueType::ByteBuffer, value))
    }
}

impl FormatSink for Table {
    fn set_i32(&mut self, key: &str, value: i32) -> Result<(), AccessError> {
        self.insert(key.to_string(), Value::Integer(value.into()));
        Ok(())
    }

    fn set_i64(&mut self, key: &str, value: i64) -> Result<(), AccessError> {
        self.insert(key.to_string(), Value::Integer(value));
        Ok(())
    }

    fn set_f32(&mut self, key: &str, value: f32) -> Result<(), AccessError> {
        self.insert(key.to_string(), Value::Float(value.into()));
        Ok(())
    }

    fn set_string(&mut self, key: &str, value: &str) -> Result<(), AccessError> {
        self.insert(key.to_string(), Value::String(value.to_string()));
        Ok(())
    }

    fn set_bytes(&mut self, key: &str, value: &[u8]) -> Result<(), AccessError> {
        let items = value.iter().map(|b| Value::Integer((*b).into())).collect();
        self.insert(key.to_string(), Value::Array(items));
        Ok(())
    }
}
