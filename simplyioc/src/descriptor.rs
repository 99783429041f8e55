//! Bean descriptors - an alternative to namespace scanning, where beans are listed explicitly in a
//! document, each with an identifier and a fully-qualified component type name:
//!
//! ```json
//! {
//!     "beans": [
//!         { "id": "dao", "class": "my_app::dao::DaoImpl" },
//!         { "id": "metier", "class": "my_app::metier::MetierImpl" }
//!     ]
//! }
//! ```
//!
//! The document format is deduced from the file extension, so TOML or YAML can be used as well.
//! Beans are created in document order and dependencies are resolved by the identifier of the
//! injected field or parameter.

use config::{Config, ConfigError, File};
use fxhash::FxHashSet;
use serde::Deserialize;
use simplyioc_di::container::DeclaredBean;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum DescriptorError {
    #[error("Error loading bean descriptors: {0}")]
    Load(#[from] ConfigError),
    #[error("Missing id for bean descriptor at position {0}")]
    MissingId(usize),
    #[error("Missing class for bean: {0}")]
    MissingClass(String),
    #[error("Duplicate bean id: {0}")]
    DuplicateId(String),
}

/// A single bean entry. Both values are required, but validated only when converting to
/// [DeclaredBean]s, so errors can name the offending entry.
#[derive(Clone, Eq, PartialEq, Debug, Default, Deserialize)]
pub struct BeanDescriptor {
    pub id: Option<String>,
    pub class: Option<String>,
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Deserialize)]
pub struct BeanDescriptors {
    #[serde(default)]
    pub beans: Vec<BeanDescriptor>,
}

impl BeanDescriptors {
    /// Loads descriptors from given file.
    pub fn load(path: &str) -> Result<Self, DescriptorError> {
        debug!("Loading bean descriptors from: {path}");
        Config::builder()
            .add_source(File::with_name(path))
            .build()
            .and_then(|config| config.try_deserialize())
            .map_err(DescriptorError::from)
    }

    /// Validates descriptors and converts them to beans for the container.
    pub fn declared_beans(&self) -> Result<Vec<DeclaredBean>, DescriptorError> {
        let mut ids = FxHashSet::default();

        self.beans
            .iter()
            .enumerate()
            .map(|(index, descriptor)| {
                let id = descriptor
                    .id
                    .as_ref()
                    .filter(|id| !id.is_empty())
                    .ok_or(DescriptorError::MissingId(index))?;

                let type_name = descriptor
                    .class
                    .as_ref()
                    .filter(|class| !class.is_empty())
                    .ok_or_else(|| DescriptorError::MissingClass(id.clone()))?;

                if !ids.insert(id.clone()) {
                    return Err(DescriptorError::DuplicateId(id.clone()));
                }

                Ok(DeclaredBean {
                    id: id.clone(),
                    type_name: type_name.clone(),
                })
            })
            .collect()
    }
}
