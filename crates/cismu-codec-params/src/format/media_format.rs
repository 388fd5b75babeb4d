use std::collections::HashMap;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use super::{DeclaredType, FormatSink, FormatSource, KeyIntrospection};
use crate::error::AccessError;
use crate::value::{TypedValue, ValueType};

/// Nivel de API a partir del cual el formato puede enumerar claves y declarar tipos.
pub const INTROSPECTION_MIN_API_LEVEL: u32 = 29;

/// Capacidades del entorno en el que vive un [`MediaFormat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeCapabilities {
    pub api_level: u32,
}

impl RuntimeCapabilities {
    pub fn new(api_level: u32) -> Self {
        Self { api_level }
    }

    pub fn supports_introspection(&self) -> bool {
        self.api_level >= INTROSPECTION_MIN_API_LEVEL
    }
}

impl Default for RuntimeCapabilities {
    fn default() -> Self {
        Self::new(INTROSPECTION_MIN_API_LEVEL)
    }
}

/// Formato de medios en memoria: cada entrada guarda su tipo exacto.
///
/// Las lecturas tipadas sólo tienen éxito si el tipo coincide (un `int` no se
/// lee como `long`). Las entradas `Null` existen como claves pero no se pueden
/// leer con ningún acceso.
#[derive(Debug, Clone, Default)]
pub struct MediaFormat {
    entries: HashMap<String, TypedValue>,
    capabilities: RuntimeCapabilities,
    read_only: bool,
}

impl MediaFormat {
    pub fn new(capabilities: RuntimeCapabilities) -> Self {
        Self {
            entries: HashMap::new(),
            capabilities,
            read_only: false,
        }
    }

    pub fn capabilities(&self) -> RuntimeCapabilities {
        self.capabilities
    }

    /// Un formato de sólo lectura rechaza todas las escrituras.
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    /// Declara `key` con tipo nulo.
    pub fn set_null(&mut self, key: &str) {
        self.entries.insert(key.to_string(), TypedValue::Null);
    }

    pub fn remove(&mut self, key: &str) -> Option<TypedValue> {
        self.entries.remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn lookup(&self, key: &str) -> Result<&TypedValue, AccessError> {
        self.entries.get(key).ok_or_else(|| AccessError::missing(key))
    }

    fn put(&mut self, key: &str, value: TypedValue) -> Result<(), AccessError> {
        if self.read_only {
            return Err(AccessError::rejected(key, "format is read-only"));
        }
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

impl FormatSource for MediaFormat {
    fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    fn get_i32(&self, key: &str) -> Result<i32, AccessError> {
        match self.lookup(key)? {
            TypedValue::Int(v) => Ok(*v),
            other => Err(AccessError::mismatch(key, ValueType::Int, other.value_type())),
        }
    }

    fn get_i64(&self, key: &str) -> Result<i64, AccessError> {
        match self.lookup(key)? {
            TypedValue::Long(v) => Ok(*v),
            other => Err(AccessError::mismatch(key, ValueType::Long, other.value_type())),
        }
    }

    fn get_f32(&self, key: &str) -> Result<f32, AccessError> {
        match self.lookup(key)? {
            TypedValue::Float(v) => Ok(*v),
            other => Err(AccessError::mismatch(key, ValueType::Float, other.value_type())),
        }
    }

    fn get_string(&self, key: &str) -> Result<String, AccessError> {
        match self.lookup(key)? {
            TypedValue::String(v) => Ok(v.clone()),
            other => Err(AccessError::mismatch(key, ValueType::String, other.value_type())),
        }
    }

    fn get_bytes(&self, key: &str) -> Result<Bytes, AccessError> {
        match self.lookup(key)? {
            TypedValue::Bytes(v) => Ok(v.clone()),
            other => Err(AccessError::mismatch(key, ValueType::ByteBuffer, other.value_type())),
        }
    }

    fn introspection(&self) -> Option<&dyn KeyIntrospection> {
        if self.capabilities.supports_introspection() {
            Some(self)
        } else {
            None
        }
    }
}

impl KeyIntrospection for MediaFormat {
    fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    fn declared_type(&self, key: &str) -> DeclaredType {
        self.entries
            .get(key)
            .map(|v| DeclaredType::from(v.value_type()))
            .unwrap_or(DeclaredType::Null)
    }
}

impl FormatSink for MediaFormat {
    fn set_i32(&mut self, key: &str, value: i32) -> Result<(), AccessError> {
        self.put(key, TypedValue::Int(value))
    }

    fn set_i64(&mut self, key: &str, value: i64) -> Result<(), AccessError> {
        self.put(key, TypedValue::Long(value))
    }

    fn set_f32(&mut self, key: &str, value: f32) -> Result<(), AccessError> {
        self.put(key, TypedValue::Float(value))
    }

    fn set_string(&mut self, key: &str, value: &str) -> Result<(), AccessError> {
        self.put(key, TypedValue::String(value.to_string()))
    }

    fn set_bytes(&mut self, key: &str, value: &[u8]) -> Result<(), AccessError> {
        self.put(key, TypedValue::Bytes(Bytes::copy_from_slice(value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_reads_require_exact_type() {
        let mut format = MediaFormat::default();
        format.set_i32("key-int", 10).unwrap();

        assert_eq!(format.get_i32("key-int").unwrap(), 10);
        assert_eq!(
            format.get_i64("key-int").unwrap_err(),
            AccessError::mismatch("key-int", ValueType::Long, ValueType::Int)
        );
        assert_eq!(format.get_string("nope").unwrap_err(), AccessError::missing("nope"));
    }

    #[test]
    fn null_entries_exist_but_cannot_be_read() {
        let mut format = MediaFormat::default();
        format.set_null("key-null");

        assert!(format.contains_key("key-null"));
        assert!(format.get_i32("key-null").is_err());
        assert!(format.get_bytes("key-null").is_err());
        assert_eq!(format.declared_type("key-null"), DeclaredType::Null);
    }

    #[test]
    fn introspection_is_gated_by_api_level() {
        let old = MediaFormat::new(RuntimeCapabilities::new(INTROSPECTION_MIN_API_LEVEL - 1));
        assert!(old.introspection().is_none());

        let mut current = MediaFormat::new(RuntimeCapabilities::new(INTROSPECTION_MIN_API_LEVEL));
        current.set_f32("key-float", 1.5).unwrap();
        let intro = current.introspection().unwrap();
        assert_eq!(intro.keys(), vec!["key-float".to_string()]);
        assert_eq!(intro.declared_type("key-float"), DeclaredType::Float);
    }

    #[test]
    fn read_only_format_rejects_writes() {
        let mut format = MediaFormat::default();
        format.set_read_only(true);

        let err = format.set_string("mode", "stereo").unwrap_err();
        assert!(matches!(err, AccessError::Rejected { ref key, .. } if key == "mode"));
        assert!(format.is_empty());
    }

    #[test]
    fn writes_overwrite_previous_type() {
        let mut format = MediaFormat::default();
        format.set_i32("k", 1).unwrap();
        format.set_bytes("k", &[1, 2, 3]).unwrap();

        assert_eq!(format.len(), 1);
        assert_eq!(format.get_bytes("k").unwrap().as_ref(), &[1, 2, 3]);
    }
}
