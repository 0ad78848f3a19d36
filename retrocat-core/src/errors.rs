use thiserror::Error;

/// Result type used across the RetroCat core crate.
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Canonical error representation shared by the workspace crates.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("serialization error: {0}")]
    SerializationError(String),

    #[error("deserialization error: {0}")]
    DeserializationError(String),

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("{0}")]
    GeneralError(String),
}

/// Dedicated configuration error used by the configuration module.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("invalid API url {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

impl From<ConfigError> for CatalogError {
    fn from(value: ConfigError) -> Self {
        CatalogError::ConfigError(value.to_string())
    }
}
