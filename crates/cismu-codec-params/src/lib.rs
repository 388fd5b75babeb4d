//! Crate `cismu_codec_params`: parámetros tipados para configurar decodificadores
//! y su conversión desde/hacia contenedores clave/valor de plataforma.
//!
//! ```
//! use cismu_codec_params::{MediaFormat, ParameterStore, bridge};
//!
//! let mut params = ParameterStore::new();
//! params.set_value("bitrate", 128);
//! params.set_value("mode", "stereo");
//!
//! let format: MediaFormat = bridge::to_container(&params).unwrap();
//! let back = bridge::from_container(&format, Some(&["bitrate", "mode"]));
//! assert_eq!(back, params);
//! ```

pub mod bridge;
pub mod bridge_config;
pub mod error;
pub mod format;
pub mod notifier;
pub mod store;
pub mod value;

pub use bridge_config::{BridgeConfig, BridgeConfigBuilder};
pub use error::{AccessError, Error, Result};
pub use format::{
    DeclaredType, FormatSink, FormatSource, INTROSPECTION_MIN_API_LEVEL, KeyIntrospection,
    MediaFormat, RuntimeCapabilities,
};
pub use notifier::{ChangeNotifier, CodecParametersChangeListener, ListenerId};
pub use store::ParameterStore;
pub use value::{Parameter, TypedValue, ValueType};
