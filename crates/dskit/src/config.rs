//! Client configuration loaded from TOML.
//!
//! ```toml
//! owner_id = "s~my-app"
//! namespace = "tenant-a"
//! max_encoded_key_len = 4096
//! ```


use dskit_core::{MAX_ENCODED_TOKEN_LEN, key::Context, key::is_valid_namespace};
use serde::Deserialize;
use std::{fs, path::Path};
use thiserror::Error as ThisError;

mod defaults {
    pub(super) const fn max_encoded_key_len() -> usize {
        dskit_core::MAX_ENCODED_TOKEN_LEN
    }
}

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("cannot parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}

///
/// ClientConfig
///
/// Identity a client works under: the owning realm for every key it builds
/// and the default namespace for keys and queries without an ancestor.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    owner_id: String,

    #[serde(default)]
    namespace: String,

    #[serde(default = "defaults::max_encoded_key_len")]
    max_encoded_key_len: usize,
}

impl ClientConfig {
    /// Build and validate a config in code.
    pub fn new(
        owner_id: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            owner_id: owner_id.into(),
            namespace: namespace.into(),
            max_encoded_key_len: defaults::max_encoded_key_len(),
        };
        config.validate()?;

        Ok(config)
    }

    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;

        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_toml_str(&source)
    }

    /// Same realm, different default namespace.
    pub fn with_namespace(&self, namespace: impl Into<String>) -> Result<Self, ConfigError> {
        let config = Self {
            namespace: namespace.into(),
            ..self.clone()
        };
        config.validate()?;

        Ok(config)
    }

    #[must_use]
    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Longest key token accepted from callers before decoding.
    #[must_use]
    pub const fn max_encoded_key_len(&self) -> usize {
        self.max_encoded_key_len
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.owner_id.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "owner_id",
                value: self.owner_id.clone(),
                reason: "must not be empty",
            });
        }

        if !is_valid_namespace(&self.namespace) {
            return Err(ConfigError::Invalid {
                key: "namespace",
                value: self.namespace.clone(),
                reason: "expected up to 100 of [0-9A-Za-z._-]",
            });
        }

        if self.max_encoded_key_len == 0 || self.max_encoded_key_len > MAX_ENCODED_TOKEN_LEN {
            return Err(ConfigError::Invalid {
                key: "max_encoded_key_len",
                value: self.max_encoded_key_len.to_string(),
                reason: "must be between 1 and 8192",
            });
        }

        Ok(())
    }
}

impl Context for ClientConfig {
    fn owner_id(&self) -> &str {
        &self.owner_id
    }

    fn namespace(&self) -> &str {
        &self.namespace
    }
}
