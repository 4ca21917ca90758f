use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Cannot find a valid CSV to import. {path} doesn't exist.")]
    FileNotFound { path: String },

    #[error("Malformed CSV on line {line}: {message}")]
    ParseError { line: u64, message: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Malformed birthday '{value}' on line {line}: expected YYYY-MM-DD")]
    MalformedDate { line: u64, value: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Parse,
    Data,
    System,
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// The operator can fix the invocation and run again.
    Medium,
    /// The input itself is unusable.
    High,
    Critical,
}

impl ErrorSeverity {
    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::FileNotFound { .. } => ErrorCategory::Input,
            EtlError::ParseError { .. } | EtlError::CsvError(_) => ErrorCategory::Parse,
            EtlError::MalformedDate { .. } => ErrorCategory::Data,
            EtlError::IoError(_) | EtlError::ProcessingError { .. } => ErrorCategory::System,
            EtlError::ValidationError { .. } => ErrorCategory::Config,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Parse | ErrorCategory::Data => {
                ErrorSeverity::High
            }
            ErrorCategory::Config => ErrorSeverity::Medium,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// True for every failure to read the input as CSV, whichever layer caught it.
    pub fn is_parse_error(&self) -> bool {
        self.category() == ErrorCategory::Parse
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::FileNotFound { .. } => {
                "Check the path, or place the export next to the program as in.csv"
            }
            EtlError::ParseError { .. } | EtlError::CsvError(_) => {
                "Re-export the file as CSV and check for stray or unbalanced quotes"
            }
            EtlError::MalformedDate { .. } => {
                "Fix the birthday column or rerun with --skip-malformed-dates"
            }
            EtlError::IoError(_) => "Check file permissions and free disk space",
            EtlError::ValidationError { .. } => "Run with --help to see the accepted arguments",
            EtlError::ProcessingError { .. } => "Rerun with --verbose and report the log",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::FileNotFound { path } => {
                format!("Cannot find a valid CSV to import. {} doesn't exist.", path)
            }
            EtlError::ParseError { line, message } => {
                format!("The input is not valid CSV (line {}): {}", line, message)
            }
            EtlError::CsvError(e) => match e.position() {
                Some(pos) => format!("The input is not valid CSV (line {}): {}", pos.line(), e),
                None => format!("The input is not valid CSV: {}", e),
            },
            EtlError::MalformedDate { line, value } => format!(
                "Birthday '{}' on line {} is not a YYYY-MM-DD date; nothing was written",
                value, line
            ),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_not_found_exits_with_one() {
        let err = EtlError::FileNotFound {
            path: "in.csv".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.severity().exit_code(), 1);
        assert!(err.user_friendly_message().contains("in.csv doesn't exist"));
    }

    #[test]
    fn test_parse_errors_share_a_category() {
        let quoting = EtlError::ParseError {
            line: 3,
            message: "unclosed quote".to_string(),
        };
        assert!(quoting.is_parse_error());
        assert_eq!(quoting.severity(), ErrorSeverity::High);

        let date = EtlError::MalformedDate {
            line: 2,
            value: "1990".to_string(),
        };
        assert!(!date.is_parse_error());
        assert_eq!(date.severity().exit_code(), 1);
    }

    #[test]
    fn test_system_and_config_exit_codes() {
        let io = EtlError::IoError(std::io::Error::new(std::io::ErrorKind::Other, "disk"));
        assert_eq!(io.severity().exit_code(), 3);

        let config = EtlError::ValidationError {
            message: "output cannot be empty".to_string(),
        };
        assert_eq!(config.severity().exit_code(), 2);
    }
}
