use std::collections::{HashMap, hash_map};

use serde::{Deserialize, Serialize};

use crate::value::{Parameter, TypedValue};

/// Colección de [`Parameter`] indexada por clave.
///
/// Una clave está presente si y sólo si su valor no es [`TypedValue::Null`].
///
/// No tiene sincronización interna: si varios hilos la comparten, envolverla en
/// un `RwLock` (un escritor, varios lectores).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterStore {
    params: HashMap<String, Parameter>,
}

impl ParameterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserta, reemplaza o borra un parámetro.
    ///
    /// Si el valor es `Null` se borra la clave (no pasa nada si no existía).
    pub fn set(&mut self, param: Parameter) {
        if param.value.is_null() {
            self.params.remove(&param.key);
        } else {
            self.params.insert(param.key.clone(), param);
        }
    }

    pub fn set_value(&mut self, key: impl Into<String>, value: impl Into<TypedValue>) {
        self.set(Parameter::new(key, value));
    }

    pub fn get(&self, key: &str) -> Option<&Parameter> {
        self.params.get(key)
    }

    /// Vista de lectura de todos los parámetros.
    pub fn entries(&self) -> &HashMap<String, Parameter> {
        &self.params
    }

    pub fn clear(&mut self) {
        self.params.clear();
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.params.keys().map(String::as_str)
    }

    pub fn iter(&self) -> hash_map::Values<'_, String, Parameter> {
        self.params.values()
    }

    /// Copia de los parámetros cuyas claves aparecen en `keys`.
    pub fn filtered<S: AsRef<str>>(&self, keys: &[S]) -> ParameterStore {
        keys.iter()
            .filter_map(|k| self.params.get(k.as_ref()))
            .cloned()
            .collect()
    }

    /// Aplica cada parámetro de `other` con [`ParameterStore::set`].
    pub fn merge(&mut self, other: ParameterStore) {
        self.extend(other.params.into_values());
    }
}

impl Extend<Parameter> for ParameterStore {
    fn extend<I: IntoIterator<Item = Parameter>>(&mut self, iter: I) {
        for param in iter {
            self.set(param);
        }
    }
}

impl FromIterator<Parameter> for ParameterStore {
    fn from_iter<I: IntoIterator<Item = Parameter>>(iter: I) -> Self {
        let mut store = ParameterStore::new();
        store.extend(iter);
        store
    }
}

impl<'a> IntoIterator for &'a ParameterStore {
    type Item = &'a Parameter;
    type IntoIter = hash_map::Values<'a, String, Parameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get_single_parameter() {
        let mut store = ParameterStore::new();
        let param = Parameter::new("test-key", 123);
        store.set(param.clone());

        assert_eq!(store.get("test-key"), Some(&param));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn set_replaces_existing_value() {
        let mut store = ParameterStore::new();
        store.set_value("k", 1);
        store.set_value("k", "now a string");

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("k").unwrap().value.as_str(), Some("now a string"));
    }

    #[test]
    fn set_null_removes_parameter() {
        let mut store = ParameterStore::new();
        store.set_value("test-key", 123);
        assert!(store.get("test-key").is_some());

        store.set(Parameter::null("test-key"));
        assert!(store.get("test-key").is_none());

        // borrar una clave inexistente no es un error
        store.set(Parameter::null("never-there"));
        assert!(store.is_empty());
    }

    #[test]
    fn get_missing_key_returns_none() {
        let store = ParameterStore::new();
        assert!(store.get("nope").is_none());
        assert!(!store.contains_key("nope"));
    }

    #[test]
    fn clear_is_idempotent() {
        let mut store = ParameterStore::new();
        store.set_value("key1", 1);
        store.set_value("key2", "value2");
        assert!(!store.entries().is_empty());

        store.clear();
        assert!(store.entries().is_empty());
        store.clear();
        assert!(store.entries().is_empty());
    }

    #[test]
    fn filtered_keeps_only_requested_keys() {
        let store: ParameterStore = [
            Parameter::new("a", 1),
            Parameter::new("b", 2i64),
            Parameter::new("c", "three"),
        ]
        .into_iter()
        .collect();

        let subset = store.filtered(&["a", "c", "missing"]);
        assert_eq!(subset.len(), 2);
        assert!(subset.contains_key("a"));
        assert!(subset.contains_key("c"));
        assert!(!subset.contains_key("b"));
    }

    #[test]
    fn from_iter_and_merge_apply_removals() {
        let mut store: ParameterStore =
            [Parameter::new("a", 1), Parameter::null("a"), Parameter::new("b", 2)]
                .into_iter()
                .collect();
        assert_eq!(store.keys().collect::<Vec<_>>(), vec!["b"]);

        let mut update = ParameterStore::new();
        update.set_value("c", 3.5f32);
        store.merge(update);
        store.extend([Parameter::null("b")]);

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("c").unwrap().value.as_float(), Some(3.5));
    }

    #[test]
    fn serializes_as_a_plain_map() {
        let mut store = ParameterStore::new();
        store.set_value("bitrate", 128);

        let text = toml::to_string(&store).unwrap();
        let back: ParameterStore = toml::from_str(&text).unwrap();
        assert_eq!(back, store);
    }
}
