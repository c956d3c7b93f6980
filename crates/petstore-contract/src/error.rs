//! Error types for the contract suite
//!
//! Every failure a scenario can hit is an [`Error`]. The variants fall into three
//! classes (see [`FailureKind`]): the service broke its contract, a fixture could
//! not prepare the entity a scenario depends on, or the run itself failed
//! (network, timeout, bad configuration). Only the first class is a finding about
//! the service.

use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for contract-suite operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the contract suite.
#[derive(Debug, Error)]
pub enum Error {
    /// The observed response diverges from the expected contract.
    #[error("{aspect} mismatch: expected {expected}, got {actual}")]
    Assertion {
        /// Which part of the contract was checked (status code, a field, ...)
        aspect: String,
        /// Expected value, rendered for humans
        expected: String,
        /// Observed value, rendered for humans
        actual: String,
    },

    /// A response body does not conform to its resource schema.
    #[error("response does not match the {schema} schema: {}; instance: {instance}", .violations.join("; "))]
    SchemaViolation {
        /// Name of the violated schema
        schema: String,
        /// The offending instance
        instance: serde_json::Value,
        /// One entry per violated clause, each naming its instance path
        violations: Vec<String>,
    },

    /// A fixture could not create the entity a scenario depends on.
    #[error("fixture setup failed for {resource}: {reason}")]
    FixtureSetup {
        /// Resource the fixture was creating
        resource: &'static str,
        /// What went wrong
        reason: String,
    },

    /// Network or connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Request timeout.
    #[error("Request timeout after {0:?}")]
    Timeout(Duration),

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Invalid HTTP header name.
    #[error("Invalid HTTP header name: {0}")]
    InvalidHeaderName(String),

    /// Invalid HTTP header value.
    #[error("Invalid HTTP header value: {0}")]
    InvalidHeaderValue(String),

    /// HTTP client configuration or initialization error.
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    /// A response body could not be decoded into the requested type.
    #[error("Failed to decode response body: {0}")]
    ResponseDecode(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A schema document failed to compile.
    #[error("Schema `{schema}` failed to compile: {message}")]
    SchemaCompile {
        /// Schema name
        schema: String,
        /// Compiler message
        message: String,
    },

    /// Missing required configuration.
    #[error("Missing required configuration: {0}")]
    MissingConfig(String),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        /// Context description
        context: String,
        /// Underlying error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Classification of a failed scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The service answered, but not as the contract says.
    ContractViolation,
    /// A prerequisite entity could not be created; the scenario never ran.
    SetupFailure,
    /// The run itself failed (transport, timeout, configuration).
    ExecutionError,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FailureKind::ContractViolation => "contract violation",
            FailureKind::SetupFailure => "setup failure",
            FailureKind::ExecutionError => "execution error",
        })
    }
}

impl Error {
    /// Build an assertion failure.
    pub fn assertion(
        aspect: impl Into<String>,
        expected: impl fmt::Display,
        actual: impl fmt::Display,
    ) -> Self {
        Error::Assertion {
            aspect: aspect.into(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Build a fixture setup failure.
    pub fn fixture(resource: &'static str, reason: impl Into<String>) -> Self {
        Error::FixtureSetup {
            resource,
            reason: reason.into(),
        }
    }

    /// Classify this error.
    ///
    /// Context wrappers report the kind of the error they wrap.
    pub fn kind(&self) -> FailureKind {
        match self {
            Error::Assertion { .. } | Error::SchemaViolation { .. } => {
                FailureKind::ContractViolation
            }
            Error::FixtureSetup { .. } => FailureKind::SetupFailure,
            Error::WithContext { source, .. } => source
                .downcast_ref::<Error>()
                .map(Error::kind)
                .unwrap_or(FailureKind::ExecutionError),
            _ => FailureKind::ExecutionError,
        }
    }

    /// Whether this error is a finding about the service rather than the run.
    pub fn is_contract_violation(&self) -> bool {
        self.kind() == FailureKind::ContractViolation
    }

    /// Whether the request never got an answer (timeout or connection failure).
    pub fn is_transport(&self) -> bool {
        match self {
            Error::Connection(_) | Error::Timeout(_) => true,
            Error::WithContext { source, .. } => source
                .downcast_ref::<Error>()
                .is_some_and(Error::is_transport),
            _ => false,
        }
    }

    /// Add context to an error.
    pub fn context<C>(self, context: C) -> Self
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        Error::WithContext {
            context: context.to_string(),
            source: Box::new(self),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() {
            Error::Connection(err.to_string())
        } else {
            Error::HttpClient(err.to_string())
        }
    }
}
