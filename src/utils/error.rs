use thiserror::Error;

#[derive(Error, Debug)]
pub enum SurveyError {
    #[error("Malformed survey source: {message}")]
    MalformedSource { message: String },

    #[error("Record {record} is missing required field '{field}'")]
    MissingRequiredField { field: String, record: usize },

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Source,
    Data,
    Output,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// Process exit code for a run that failed with this severity.
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Medium => 2,
            Self::High => 1,
            Self::Critical => 3,
        }
    }
}

impl SurveyError {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedSource {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MalformedSource { .. } => ErrorCategory::Source,
            Self::MissingRequiredField { .. } => ErrorCategory::Data,
            Self::ZipError(_) | Self::CsvError(_) | Self::IoError(_) | Self::SerializationError(_) => {
                ErrorCategory::Output
            }
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::MissingRequiredField { .. } => ErrorSeverity::Medium,
            Self::MalformedSource { .. } | Self::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::MalformedSource { .. } => {
                "Check that the source is a JSON array of response objects or a headered CSV export"
                    .to_string()
            }
            Self::MissingRequiredField { field, .. } => format!(
                "Fill in '{}' for every response, or run without strict mode to skip incomplete records",
                field
            ),
            Self::ZipError(_) => "Check free disk space and write permissions on the output path".to_string(),
            Self::CsvError(_) => "Check the CSV header row and quoting of the source file".to_string(),
            Self::IoError(_) => "Make sure the source file exists and the output path is writable".to_string(),
            Self::SerializationError(_) => "Inspect the source for non-text values in survey fields".to_string(),
            Self::ConfigError { .. } | Self::MissingConfigError { .. } => {
                "Review the configuration file or command-line flags".to_string()
            }
            Self::InvalidConfigValueError { field, .. } => {
                format!("Correct the value of '{}' and run again", field)
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::MalformedSource { .. } => format!("Could not read the survey responses: {}", self),
            Self::MissingRequiredField { field, record } => {
                format!("Response #{} has no '{}' answer", record, field)
            }
            Self::IoError(e) => format!("File access failed: {}", e),
            _ => self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SurveyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_is_recoverable() {
        let err = SurveyError::MissingRequiredField {
            field: "designIdeal".to_string(),
            record: 3,
        };
        assert_eq!(err.category(), ErrorCategory::Data);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert_eq!(err.user_friendly_message(), "Response #3 has no 'designIdeal' answer");
    }

    #[test]
    fn test_malformed_source_is_critical() {
        let err = SurveyError::malformed("expected an array");
        assert_eq!(err.category(), ErrorCategory::Source);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(err.to_string().contains("expected an array"));
        assert_eq!(err.severity().exit_code(), 3);
    }

    #[test]
    fn test_every_failure_exits_non_zero() {
        let errors = [
            SurveyError::MissingRequiredField {
                field: "perfil".to_string(),
                record: 1,
            },
            SurveyError::MissingConfigError {
                field: "source".to_string(),
            },
            SurveyError::malformed("not an array"),
        ];

        let codes: Vec<i32> = errors.iter().map(|e| e.severity().exit_code()).collect();
        assert_eq!(codes, vec![2, 1, 3]);
        assert!(codes.iter().all(|code| *code != 0));
    }
}
