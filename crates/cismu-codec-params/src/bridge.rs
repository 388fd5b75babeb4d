//! Conversión entre [`ParameterStore`] y contenedores externos.
//!
//! La exportación escribe cada parámetro con el acceso de su tipo. La importación
//! tiene dos caminos:
//!
//! - sin filtro: el contenedor tiene que declarar los tipos ([`FormatSource::introspection`]);
//!   si no puede, el resultado es un store vacío.
//! - con filtro: para cada clave se prueban lecturas en el orden de [`PROBE_ORDER`]
//!   y gana la primera que funciona. Un valor legible como `int` y como `long`
//!   siempre se importa como `int`.

use tracing::{Level, debug, instrument, trace};

use crate::error::{AccessError, Error, Result};
use crate::format::{FormatSink, FormatSource};
use crate::store::ParameterStore;
use crate::value::{Parameter, TypedValue, ValueType};

/// Orden fijo en el que se sondean los tipos de una clave sin tipo declarado.
pub const PROBE_ORDER: [ValueType; 5] = [
    ValueType::Int,
    ValueType::Long,
    ValueType::Float,
    ValueType::String,
    ValueType::ByteBuffer,
];

/// Exporta `store` a un contenedor nuevo.
pub fn to_container<S: FormatSink + Default>(store: &ParameterStore) -> Result<S> {
    let mut sink = S::default();
    write_into(store, &mut sink)?;
    Ok(sink)
}

/// Escribe todos los parámetros de `store` en `sink`, sobrescribiendo claves existentes.
///
/// Si el contenedor rechaza una escritura se devuelve [`Error::Export`] con la
/// clave; lo que ya se escribió se queda escrito.
#[instrument(level = Level::TRACE, skip_all, fields(params = store.len()), err)]
pub fn write_into<S: FormatSink + ?Sized>(store: &ParameterStore, sink: &mut S) -> Result<()> {
    for param in store {
        write_parameter(sink, param).map_err(|source| Error::Export {
            key: param.key.clone(),
            source,
        })?;
    }
    Ok(())
}

fn write_parameter<S: FormatSink + ?Sized>(
    sink: &mut S,
    param: &Parameter,
) -> std::result::Result<(), AccessError> {
    let key = param.key.as_str();
    match &param.value {
        TypedValue::Int(v) => sink.set_i32(key, *v),
        TypedValue::Long(v) => sink.set_i64(key, *v),
        TypedValue::Float(v) => sink.set_f32(key, *v),
        TypedValue::String(v) => sink.set_string(key, v),
        TypedValue::Bytes(v) => sink.set_bytes(key, v),
        // nunca está en un store
        TypedValue::Null => Ok(()),
    }
}

/// Crea un store a partir de `source`.
///
/// Con `filter_keys = None` se importan todas las claves con tipo declarado
/// (vacío si el contenedor no lo soporta); con `Some(keys)` se sondean sólo esas claves.
pub fn from_container<S: FormatSource + ?Sized>(
    source: &S,
    filter_keys: Option<&[&str]>,
) -> ParameterStore {
    match filter_keys {
        None => import_declared(source),
        Some(keys) => import_probed(source, keys),
    }
}

/// Igual que [`from_container`], pero mezcla el resultado en un store existente.
pub fn import_into<S: FormatSource + ?Sized>(
    store: &mut ParameterStore,
    source: &S,
    filter_keys: Option<&[&str]>,
) {
    store.merge(from_container(source, filter_keys));
}

/// Importación completa que falla con [`Error::UnsupportedCapability`] en lugar
/// de devolver un store vacío cuando no hay tipos declarados.
pub fn try_from_container_all<S: FormatSource + ?Sized>(source: &S) -> Result<ParameterStore> {
    if source.introspection().is_none() {
        return Err(Error::UnsupportedCapability);
    }
    Ok(import_declared(source))
}

#[instrument(level = Level::TRACE, skip_all)]
pub fn import_declared<S: FormatSource + ?Sized>(source: &S) -> ParameterStore {
    let mut store = ParameterStore::new();

    let Some(intro) = source.introspection() else {
        debug!("container does not declare value types; explicit import yields an empty store");
        return store;
    };

    for key in intro.keys() {
        let declared = intro.declared_type(&key);
        let Some(ty) = declared.supported() else {
            trace!(%key, ?declared, "skipping key without a supported declared type");
            continue;
        };

        match read_as(source, &key, ty) {
            Ok(value) => store.set(Parameter { key, value }),
            Err(e) => debug!(%key, error = %e, "declared type could not be read, skipping"),
        }
    }

    store
}

#[instrument(level = Level::TRACE, skip_all, fields(keys = keys.len()))]
pub fn import_probed<S, K>(source: &S, keys: &[K]) -> ParameterStore
where
    S: FormatSource + ?Sized,
    K: AsRef<str>,
{
    let mut store = ParameterStore::new();

    for key in keys.iter().map(AsRef::as_ref) {
        if !source.contains_key(key) {
            continue;
        }
        match probe(source, key) {
            Some(value) => store.set(Parameter::new(key, value)),
            None => trace!(%key, "no candidate type could read the value, skipping"),
        }
    }

    store
}

/// Prueba cada tipo de [`PROBE_ORDER`] y devuelve la primera lectura correcta.
pub fn probe<S: FormatSource + ?Sized>(source: &S, key: &str) -> Option<TypedValue> {
    PROBE_ORDER.iter().find_map(|&ty| match read_as(source, key, ty) {
        Ok(value) => {
            trace!(%key, value_type = %ty, "probe hit");
            Some(value)
        }
        Err(e) => {
            trace!(%key, candidate = %ty, error = %e, "probe miss");
            None
        }
    })
}

fn read_as<S: FormatSource + ?Sized>(
    source: &S,
    key: &str,
    ty: ValueType,
) -> std::result::Result<TypedValue, AccessError> {
    match ty {
        ValueType::Int => source.get_i32(key).map(TypedValue::Int),
        ValueType::Long => source.get_i64(key).map(TypedValue::Long),
        ValueType::Float => source.get_f32(key).map(TypedValue::Float),
        ValueType::String => source.get_string(key).map(TypedValue::String),
        ValueType::ByteBuffer => source.get_bytes(key).map(TypedValue::Bytes),
        // nunca se pide: ni PROBE_ORDER ni DeclaredType::supported dan Null
        ValueType::Null => Err(AccessError::mismatch(key, ValueType::Null, ValueType::Null)),
    }
}
