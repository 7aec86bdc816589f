//! Error types for redshift-reaper
//!
//! Structured errors with suggestions, printed cargo-style on stderr.

use colored::Colorize;
use redshift_reaper_core::{ConfigError, CoreError};
use thiserror::Error;

/// Cargo-style diagnostic formatter for CLI errors.
///
/// Produces structured output like:
/// ```text
/// error: Profile 'sandbox' not found
///
///   tip: List available profiles: redshift-reaper profile list
/// ```
pub struct CliDiagnostic {
    message: String,
    tips: Vec<String>,
}

impl CliDiagnostic {
    pub fn error(message: &str) -> Self {
        Self {
            message: message.to_string(),
            tips: Vec::new(),
        }
    }

    pub fn tip(mut self, description: &str) -> Self {
        self.tips.push(description.to_string());
        self
    }

    /// Print the diagnostic to stderr with colored formatting.
    pub fn print(&self) {
        eprint!("{}{}", "error".red().bold(), ": ".bold());
        eprintln!("{}", self.message);

        for description in &self.tips {
            eprintln!();
            eprint!("  {}{}", "tip".yellow().bold(), ": ".bold());
            eprintln!("{}", description);
        }
    }
}

/// Main error type for the redshift-reaper application
#[derive(Error, Debug)]
pub enum ReaperCliError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Profile '{name}' not found")]
    ProfileNotFound { name: String },

    #[error("No age threshold given. Pass --older-than or --before, or set older_than in the profile")]
    MissingThreshold,

    #[error("Redshift is not available in region '{region}'")]
    ServiceUnavailable { region: String },

    #[error("Access denied: {message}")]
    AccessDenied { message: String },

    #[error("API error: {message}")]
    ApiError { message: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Output formatting error: {message}")]
    OutputError { message: String },

    #[error("Nuke finished with {failed} failure(s)")]
    NukeFailures { failed: usize },
}

/// Result type for redshift-reaper operations
pub type Result<T> = std::result::Result<T, ReaperCliError>;

impl ReaperCliError {
    /// Get helpful suggestions for resolving this error
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            ReaperCliError::ProfileNotFound { name } => vec![
                "List available profiles: redshift-reaper profile list".to_string(),
                format!("Create profile '{}': redshift-reaper profile set {}", name, name),
            ],
            ReaperCliError::MissingThreshold => vec![
                "Example: redshift-reaper nuke --older-than 7d".to_string(),
                "Store a default: redshift-reaper profile set <name> --older-than 7d".to_string(),
            ],
            ReaperCliError::ServiceUnavailable { .. } => vec![
                "Check the region name: --region <region>".to_string(),
                "Verify network connectivity to the Redshift endpoint".to_string(),
                "Use --skip-probe to list anyway".to_string(),
            ],
            ReaperCliError::AccessDenied { .. } => vec![
                "Check which AWS identity is in use: aws sts get-caller-identity".to_string(),
                "Pick another AWS profile: --aws-profile <name>".to_string(),
            ],
            ReaperCliError::NukeFailures { .. } => vec![
                "Re-run with -v to see every failed call".to_string(),
                "Use -o json to get the per-item report".to_string(),
            ],
            _ => vec![],
        }
    }

    /// Print a cargo-style diagnostic to stderr using colored formatting.
    pub fn print_diagnostic(&self) {
        let mut diag = CliDiagnostic::error(&self.to_string());

        for suggestion in self.suggestions() {
            diag = diag.tip(&suggestion);
        }

        diag.print();
    }
}

impl From<serde_json::Error> for ReaperCliError {
    fn from(err: serde_json::Error) -> Self {
        ReaperCliError::OutputError {
            message: format!("JSON error: {}", err),
        }
    }
}

impl From<serde_yaml::Error> for ReaperCliError {
    fn from(err: serde_yaml::Error) -> Self {
        ReaperCliError::OutputError {
            message: format!("YAML error: {}", err),
        }
    }
}

impl From<anyhow::Error> for ReaperCliError {
    fn from(err: anyhow::Error) -> Self {
        ReaperCliError::Configuration(format!("{:#}", err))
    }
}

impl From<ConfigError> for ReaperCliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::ProfileNotFound { name } => ReaperCliError::ProfileNotFound { name },
            other => ReaperCliError::Configuration(other.to_string()),
        }
    }
}

impl From<CoreError> for ReaperCliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ServiceUnavailable { region } => {
                ReaperCliError::ServiceUnavailable { region }
            }
            CoreError::Config(config_err) => ReaperCliError::from(config_err),
            CoreError::Validation(message) => ReaperCliError::InvalidInput { message },
            CoreError::Api(api_err) if api_err.is_unauthorized() => ReaperCliError::AccessDenied {
                message: api_err.to_string(),
            },
            CoreError::Api(api_err) => ReaperCliError::ApiError {
                message: api_err.to_string(),
            },
        }
    }
}
