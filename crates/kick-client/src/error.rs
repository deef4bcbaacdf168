//! Error types for the kick-client crate.

use std::fmt;

/// Structured error returned by the platform.
///
/// `code` is the HTTP status of the failed call; `message` comes from the
/// decoded error envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    code: u16,
    message: String,
    description: Option<String>,
}

impl ApiError {
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            description: None,
        }
    }

    /// Attach a longer description. Empty strings are ignored.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        if !description.is_empty() {
            self.description = Some(description);
        }
        self
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.description {
            Some(description) => write!(f, "Error {}: {} ({description})", self.code, self.message),
            None => write!(f, "Error {}: {}", self.code, self.message),
        }
    }
}

impl std::error::Error for ApiError {}

/// Unified error type for the kick-client crate.
#[derive(Debug, thiserror::Error)]
pub enum KickError {
    #[error("failed to create request: {0}")]
    RequestConstruction(String),

    #[error("failed to make request: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("failed to read response body (status code {status}): {source}")]
    ResponseBodyUnreadable {
        status: u16,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to unmarshal error response (status code {status} and body {body:?}): {source}")]
    ErrorEnvelopeUndecodable {
        status: u16,
        body: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to unmarshal response body (status code {status} and body {body:?}): {source}")]
    SuccessEnvelopeUndecodable {
        status: u16,
        body: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("failed to refresh token: {0}")]
    RefreshFailed(#[source] Box<KickError>),

    #[error("{0}")]
    Configuration(&'static str),

    #[error("invalid webhook signature: {0}")]
    SignatureInvalid(String),

    #[error("failed to unmarshal event: {0}")]
    EventUndecodable(#[source] serde_json::Error),

    #[error("unknown {kind}: {value}")]
    UnknownEnumValue { kind: &'static str, value: String },
}

impl KickError {
    /// The platform-assigned error, if this failure carries one.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(err) => Some(err),
            Self::RefreshFailed(inner) => inner.api_error(),
            _ => None,
        }
    }

    /// Whether the platform rejected the credentials (HTTP 401).
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api(err) if err.code() == 401)
    }
}
