use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PickerError {
    #[error("Pool file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Unable to decode {} with any of: {}", path.display(), tried.join(", "))]
    Encoding { path: PathBuf, tried: Vec<String> },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Storage,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl PickerError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PickerError::NotFound { .. } | PickerError::Encoding { .. } => ErrorCategory::Input,
            PickerError::CsvError(_)
            | PickerError::IoError(_)
            | PickerError::SerializationError(_) => ErrorCategory::Storage,
            PickerError::ConfigError { .. }
            | PickerError::ConfigValidationError { .. }
            | PickerError::InvalidConfigValueError { .. }
            | PickerError::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            PickerError::SerializationError(_) => ErrorSeverity::Medium,
            PickerError::NotFound { .. }
            | PickerError::Encoding { .. }
            | PickerError::CsvError(_) => ErrorSeverity::High,
            PickerError::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            PickerError::NotFound { path } => {
                format!("Check the pool path or create {}", path.display())
            }
            PickerError::Encoding { .. } => {
                "Re-save the pool file as UTF-8 (or UTF-16 with a byte-order mark)".to_string()
            }
            PickerError::CsvError(_) => {
                "Check that the file is comma-separated with a header row".to_string()
            }
            PickerError::IoError(_) => {
                "Check file permissions and free disk space for the log directory".to_string()
            }
            PickerError::SerializationError(_) => "Retry without --json".to_string(),
            PickerError::ConfigError { .. } | PickerError::ConfigValidationError { .. } => {
                "Check the configuration file syntax".to_string()
            }
            PickerError::InvalidConfigValueError { field, .. }
            | PickerError::MissingConfigError { field } => {
                format!("Provide a valid value for '{}'", field)
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            PickerError::NotFound { path } => format!("找不到清單: {}", path.display()),
            PickerError::Encoding { path, .. } => {
                format!("無法讀取清單編碼: {}", path.display())
            }
            other => other.to_string(),
        }
    }

    /// 對應到 CLI 的退出碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, PickerError>;
