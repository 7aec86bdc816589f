//! Unified error handling for redshift-reaper-core
//!
//! [`ApiError`] is what the service seam returns; it is deliberately small
//! so that fakes and the AWS backend can produce it alike. [`CoreError`]
//! wraps it together with configuration and validation failures.
//!
//! # Example
//!
//! ```rust
//! use redshift_reaper_core::{ApiError, CoreError};
//!
//! let api_err = ApiError::from_code("ClusterNotFound", "Cluster sandbox not found");
//! let core_err: CoreError = api_err.into();
//! assert!(core_err.is_not_found());
//! ```

use thiserror::Error;

use crate::config::ConfigError;

/// Errors returned by a single call against the warehouse service
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The resource does not exist (or is already gone)
    #[error("not found: {0}")]
    NotFound(String),

    /// The caller is not allowed to perform the call
    #[error("access denied: {0}")]
    AccessDenied(String),

    /// The resource exists but is in a state that forbids the call
    #[error("invalid resource state: {0}")]
    InvalidState(String),

    /// The endpoint could not be reached (dispatch failure, timeout)
    #[error("endpoint unreachable: {0}")]
    Endpoint(String),

    /// Any other service fault, keyed by the service error code
    #[error("{code}: {message}")]
    Service { code: String, message: String },
}

impl ApiError {
    /// Classify a service error code into a variant
    ///
    /// Redshift codes follow a few naming families (`ClusterNotFound`,
    /// `ClusterSubnetGroupNotFoundFault`, `InvalidClusterState`, ...), so the
    /// classification works on substrings rather than an exhaustive list.
    pub fn from_code(code: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        if code.contains("NotFound") {
            ApiError::NotFound(message)
        } else if code.starts_with("AccessDenied") || code == "UnauthorizedOperation" {
            ApiError::AccessDenied(message)
        } else if code.starts_with("Invalid") && code.contains("State") {
            ApiError::InvalidState(message)
        } else {
            ApiError::Service {
                code: code.to_string(),
                message,
            }
        }
    }

    /// Returns true if this is a "not found" error
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }

    /// Returns true if this is an authorization error
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::AccessDenied(_))
    }

    /// Returns true if the endpoint could not be reached at all
    #[must_use]
    pub fn is_unreachable(&self) -> bool {
        matches!(self, ApiError::Endpoint(_))
    }
}

/// Core error type
#[derive(Error, Debug)]
pub enum CoreError {
    /// Error from the Redshift API
    #[error("Redshift API error: {0}")]
    Api(#[from] ApiError),

    /// The capability probe could not reach Redshift in this region
    #[error("Redshift is not available in region '{region}'")]
    ServiceUnavailable { region: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation error (e.g. malformed duration or tag)
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    /// Returns true if this is a "not found" error
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            CoreError::Api(e) => e.is_not_found(),
            CoreError::Config(ConfigError::ProfileNotFound { .. }) => true,
            _ => false,
        }
    }

    /// Returns true if this is an authorization error
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        match self {
            CoreError::Api(e) => e.is_unauthorized(),
            _ => false,
        }
    }

    /// Returns true if the service could not be reached
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        match self {
            CoreError::Api(e) => e.is_unreachable(),
            CoreError::ServiceUnavailable { .. } => true,
            _ => false,
        }
    }
}
