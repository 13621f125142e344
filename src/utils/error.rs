use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistrarError {
    #[error("Invalid argument '{field}' = '{value}': {reason}")]
    InvalidArgument {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Command source '{source_id}' is unavailable: {source}")]
    SourceUnavailable {
        source_id: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed command in '{source_id}' at line {line}: {source}")]
    MalformedCommand {
        source_id: String,
        line: usize,
        #[source]
        source: CommandParseError,
    },

    #[error("Worker for '{source_id}' panicked")]
    WorkerPanicked { source_id: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },
}

/// 單行指令的解析錯誤
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandParseError {
    #[error("'{verb}' is missing the <{token}> token")]
    MissingToken { verb: String, token: &'static str },

    #[error("<{token}> must be a non-negative integer, got '{value}'")]
    InvalidInteger {
        token: &'static str,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
}

impl RegistrarError {
    pub fn invalid_argument(field: &str, value: impl ToString, reason: impl Into<String>) -> Self {
        RegistrarError::InvalidArgument {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            RegistrarError::InvalidArgument { field, reason, .. } => {
                format!("Rejected value for {}: {}", field, reason)
            }
            RegistrarError::SourceUnavailable { source_id, .. } => {
                format!("Could not read registration file '{}'", source_id)
            }
            RegistrarError::MalformedCommand {
                source_id, line, ..
            } => format!("Registration file '{}' has a bad command on line {}", source_id, line),
            RegistrarError::WorkerPanicked { source_id } => {
                format!("Processing of '{}' stopped unexpectedly", source_id)
            }
            RegistrarError::IoError(e) => format!("File system error: {}", e),
            RegistrarError::ConfigError { message } => format!("Configuration problem: {}", message),
            RegistrarError::ConfigValidationError { field, message } => {
                format!("Configuration field {} is invalid: {}", field, message)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            RegistrarError::InvalidArgument { .. } => {
                "Use a non-blank department and names, and course numbers / seat counts of at least 1"
            }
            RegistrarError::SourceUnavailable { .. } => {
                "Check that the file exists under the base path and is readable"
            }
            RegistrarError::MalformedCommand { .. } => {
                "Use 'addsubject <dept> <number> <seats>' or 'enrollstudent <dept> <number> <first> <last>'"
            }
            RegistrarError::WorkerPanicked { .. } => "Re-run with --verbose and inspect the log",
            RegistrarError::IoError(_) => "Check file permissions and paths",
            RegistrarError::ConfigError { .. } | RegistrarError::ConfigValidationError { .. } => {
                "Fix the configuration file or command line flags"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, RegistrarError>;
