use config::{Config, File, FileFormat};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::{
    bridge,
    error::Result,
    format::{FormatSource, INTROSPECTION_MIN_API_LEVEL, MediaFormat, RuntimeCapabilities},
    store::ParameterStore,
};

/// Configuración de la conversión con los contenedores de plataforma.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder)]
#[builder(setter(into, strip_option), default)]
#[serde(default)]
pub struct BridgeConfig {
    /// Nivel de API del entorno; decide si los `MediaFormat` declaran tipos.
    pub api_level: u32,
    /// Claves a sondear al importar. `None` = importar todo lo declarado.
    pub import_filter: Option<Vec<String>>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        BridgeConfig {
            api_level: INTROSPECTION_MIN_API_LEVEL,
            import_filter: None,
        }
    }
}

impl BridgeConfig {
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref().to_string_lossy().into_owned();
        let cfg = Config::builder()
            .add_source(File::new(&path, FileFormat::Toml))
            .build()?;
        Ok(cfg.try_deserialize::<BridgeConfig>()?)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let cfg = Config::builder()
            .add_source(File::from_str(text, FileFormat::Toml))
            .build()?;
        Ok(cfg.try_deserialize::<BridgeConfig>()?)
    }

    pub fn capabilities(&self) -> RuntimeCapabilities {
        RuntimeCapabilities::new(self.api_level)
    }

    /// `MediaFormat` vacío con las capacidades de este entorno.
    pub fn media_format(&self) -> MediaFormat {
        MediaFormat::new(self.capabilities())
    }

    /// Importa `source` usando `import_filter`.
    pub fn import<S: FormatSource + ?Sized>(&self, source: &S) -> ParameterStore {
        match &self.import_filter {
            Some(keys) => bridge::import_probed(source, keys),
            None => bridge::import_declared(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::Error, value::TypedValue};
    use indoc::indoc;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_when_file_is_empty() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(file).unwrap();

        let cfg = BridgeConfig::from_file(file.path()).unwrap();
        assert_eq!(cfg, BridgeConfig::default());
        assert!(cfg.capabilities().supports_introspection());
    }

    #[test]
    fn reads_filter_and_level_from_file() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        file.write_all(
            indoc! {r#"
                api_level = 28
                import_filter = ["bitrate", "mode"]
            "#}
            .as_bytes(),
        )
        .unwrap();

        let cfg = BridgeConfig::from_file(file.path()).unwrap();
        assert_eq!(cfg.api_level, 28);
        assert_eq!(cfg.import_filter, Some(vec!["bitrate".to_string(), "mode".to_string()]));
        assert!(!cfg.capabilities().supports_introspection());
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let err = BridgeConfig::from_toml_str("api_level = [").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn builder_fills_defaults() {
        let cfg = BridgeConfigBuilder::default()
            .import_filter(vec!["bitrate".to_string()])
            .build()
            .unwrap();

        assert_eq!(cfg.api_level, INTROSPECTION_MIN_API_LEVEL);
        assert_eq!(cfg.import_filter.as_deref(), Some(&["bitrate".to_string()][..]));
    }

    #[test]
    fn legacy_environment_needs_a_filter() {
        let legacy = BridgeConfig::from_toml_str("api_level = 21").unwrap();
        let mut format = legacy.media_format();
        crate::format::FormatSink::set_i32(&mut format, "bitrate", 128).unwrap();

        assert!(legacy.import(&format).is_empty());

        let filtered = BridgeConfigBuilder::default()
            .api_level(21u32)
            .import_filter(vec!["bitrate".to_string()])
            .build()
            .unwrap();
        let store = filtered.import(&format);
        assert_eq!(store.get("bitrate").unwrap().value, TypedValue::Int(128));
    }
}
