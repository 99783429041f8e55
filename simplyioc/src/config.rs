//! Framework configuration. [ApplicationConfig] is created with opinionated default values, which
//! can then be overwritten by environment variables prefixed with `SIMPLYIOC_` or the
//! `simplyioc.json` file. Lists, e.g. `SIMPLYIOC_EXTRA_NAMESPACES`, are comma separated in
//! environment variables.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use simplyioc_di::resolver::{
    IdentifierResolutionStrategy, ResolutionStrategyPtr, TypeResolutionStrategy,
};

const CONFIG_ENV_PREFIX: &str = "SIMPLYIOC";

/// Name of the default config file.
pub const CONFIG_FILE: &str = "simplyioc.json";

/// How dependencies are matched with beans.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionMode {
    /// By requested type.
    #[default]
    Type,
    /// By the identifier of the injected field or parameter.
    Identifier,
}

impl ResolutionMode {
    pub fn strategy(&self) -> ResolutionStrategyPtr {
        match self {
            ResolutionMode::Type => Box::new(TypeResolutionStrategy),
            ResolutionMode::Identifier => Box::new(IdentifierResolutionStrategy),
        }
    }
}

/// Framework configuration used by the [Application](crate::application::Application).
#[non_exhaustive]
#[derive(Clone, Debug)]
pub struct ApplicationConfig {
    /// Should a default tracing logger be installed in the scope of the application.
    pub install_tracing_logger: bool,
    /// Namespaces to scan in addition to the namespace of the root component.
    pub extra_namespaces: Vec<String>,
    /// Should constructor dependency cycles be reported before creating any component.
    pub detect_cycles: bool,
    /// Resolution used when scanning namespaces. Bean descriptors always resolve by identifier.
    pub resolution: ResolutionMode,
    /// Path to a bean descriptor document. When present, beans are created from the document
    /// instead of scanning namespaces.
    pub descriptor_file: Option<String>,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            install_tracing_logger: true,
            extra_namespaces: vec![],
            detect_cycles: true,
            resolution: ResolutionMode::Type,
            descriptor_file: None,
        }
    }
}

impl From<OptionalApplicationConfig> for ApplicationConfig {
    fn from(value: OptionalApplicationConfig) -> Self {
        let default = Self::default();
        Self {
            install_tracing_logger: value
                .install_tracing_logger
                .unwrap_or(default.install_tracing_logger),
            extra_namespaces: value
                .extra_namespaces
                .unwrap_or(default.extra_namespaces),
            detect_cycles: value.detect_cycles.unwrap_or(default.detect_cycles),
            resolution: value.resolution.unwrap_or(default.resolution),
            descriptor_file: value.descriptor_file.or(default.descriptor_file),
        }
    }
}

impl ApplicationConfig {
    /// Loads the config from the default config file and environment.
    pub fn init_from_environment() -> Result<Self, ConfigError> {
        Self::init_from_builder(
            Config::builder()
                .add_source(File::with_name(CONFIG_FILE).required(false))
                .add_source(
                    Environment::with_prefix(CONFIG_ENV_PREFIX)
                        .try_parsing(true)
                        .list_separator(",")
                        .with_list_parse_key("extra_namespaces"),
                ),
        )
    }

    fn init_from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        builder
            .build()
            .and_then(|config| config.try_deserialize::<OptionalApplicationConfig>())
            .map(|config| config.into())
    }
}

#[derive(Deserialize)]
struct OptionalApplicationConfig {
    install_tracing_logger: Option<bool>,
    extra_namespaces: Option<Vec<String>>,
    detect_cycles: Option<bool>,
    resolution: Option<ResolutionMode>,
    descriptor_file: Option<String>,
}

#[cfg(test)]
mod tests {
    use crate::config::{ApplicationConfig, ResolutionMode};
    use config::{Config, File, FileFormat};

    #[test]
    fn should_use_defaults_for_missing_values() {
        let config = ApplicationConfig::init_from_builder(
            Config::builder().add_source(File::from_str("{}", FileFormat::Json)),
        )
        .unwrap();

        assert!(config.install_tracing_logger);
        assert!(config.detect_cycles);
        assert!(config.extra_namespaces.is_empty());
        assert_eq!(config.resolution, ResolutionMode::Type);
        assert!(config.descriptor_file.is_none());
    }

    #[test]
    fn should_override_defaults() {
        let config = ApplicationConfig::init_from_builder(Config::builder().add_source(
            File::from_str(
                r#"{
                    "install_tracing_logger": false,
                    "extra_namespaces": ["app::dao", "app::ext"],
                    "detect_cycles": false,
                    "resolution": "identifier",
                    "descriptor_file": "beans.json"
                }"#,
                FileFormat::Json,
            ),
        ))
        .unwrap();

        assert!(!config.install_tracing_logger);
        assert!(!config.detect_cycles);
        assert_eq!(config.extra_namespaces, vec!["app::dao", "app::ext"]);
        assert_eq!(config.resolution, ResolutionMode::Identifier);
        assert_eq!(config.descriptor_file.as_deref(), Some("beans.json"));
    }

    #[test]
    fn should_reject_unknown_resolution() {
        assert!(ApplicationConfig::init_from_builder(Config::builder().add_source(
            File::from_str(r#"{ "resolution": "magic" }"#, FileFormat::Json),
        ))
        .is_err());
    }
}
