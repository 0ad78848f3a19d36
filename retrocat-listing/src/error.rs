use reqwest::StatusCode;
use retrocat_protocol::listing::QueryError;
use retrocat_protocol::Entity;
use thiserror::Error;

/// Failure of a request against the catalog API.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid catalog url {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("catalog request failed: {0}")]
    Transport(String),
    #[error("catalog request timed out")]
    Timeout,
    #[error("catalog returned unexpected status {status}")]
    Status {
        status: StatusCode,
        message: Option<String>,
    },
    #[error("failed to decode catalog response: {0}")]
    Decode(String),
    #[error("no API token configured")]
    Unauthorized,
    #[error("invalid listing query: {0}")]
    InvalidQuery(#[from] QueryError),
}

impl FetchError {
    /// Single human-readable message shown in place of the failed view.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::InvalidUrl { .. } => "The catalog API address is invalid.".to_string(),
            FetchError::Transport(_) => {
                "Could not reach the catalog server. Check your connection and try again."
                    .to_string()
            }
            FetchError::Timeout => "The catalog server took too long to respond.".to_string(),
            FetchError::Status {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.trim().to_string(),
            FetchError::Status { status, .. } => match *status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    "You are not allowed to perform this action.".to_string()
                }
                StatusCode::NOT_FOUND => "The requested item does not exist.".to_string(),
                status if status.is_server_error() => {
                    format!("The catalog server had a problem ({status}). Try again later.")
                }
                status => format!("The catalog server rejected the request ({status})."),
            },
            FetchError::Decode(_) => {
                "The catalog server sent a response that could not be read.".to_string()
            }
            FetchError::Unauthorized => "Sign in to perform this action.".to_string(),
            FetchError::InvalidQuery(err) => format!("Invalid listing request: {err}."),
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_timeout() {
            FetchError::Timeout
        } else if value.is_decode() {
            FetchError::Decode(value.to_string())
        } else {
            FetchError::Transport(value.to_string())
        }
    }
}

/// Filter state that a package refuses to serialize.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    #[error("{entity} has no filter named '{key}'")]
    UnknownField { entity: Entity, key: String },
    #[error("filter '{key}' expects {expected}")]
    KindMismatch { key: String, expected: &'static str },
    #[error("filter '{key}' has its lower bound above its upper bound")]
    InvertedRange { key: String },
    #[error("filter '{key}' bounds must be finite numbers")]
    NonFiniteBound { key: String },
    #[error("filter '{key}' does not accept '{value}' (allowed: {allowed})")]
    UnknownStatus {
        key: String,
        value: String,
        allowed: String,
    },
    #[error("filter '{key}' could not parse '{raw}': {reason}")]
    Parse {
        key: String,
        raw: String,
        reason: String,
    },
}

/// Input a data table rejects before issuing any request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TableError {
    #[error(transparent)]
    Filter(#[from] FilterError),
    #[error("{entity} cannot be sorted by '{field}'")]
    NotSortable { entity: Entity, field: String },
    #[error(transparent)]
    Query(#[from] QueryError),
}
