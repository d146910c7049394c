use thiserror::Error;

#[derive(Error, Debug)]
pub enum FixError {
    #[error("Invalid JSON document: {0}")]
    InvalidJsonError(#[from] serde_json::Error),

    #[error("Missing field '{key}' in JSON document")]
    MissingFieldError { key: String },

    #[error("Field '{key}' is not a string")]
    FieldTypeError { key: String },

    #[error("Invalid Base64 content: {0}")]
    InvalidBase64Error(#[from] base64::DecodeError),

    #[error("IO error on '{path}': {source}")]
    FileError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("File '{path}' is not valid UTF-8")]
    EncodingError { path: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}': '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Processing error: {message}")]
    ProcessingError { message: String },
}

/// 錯誤分類，對應輸入錯誤、缺資料、IO 及其他
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    MalformedInput,
    MissingData,
    Io,
    Configuration,
    Unclassified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// 行程結束碼
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl FixError {
    pub fn file(path: impl Into<String>, source: std::io::Error) -> Self {
        FixError::FileError {
            path: path.into(),
            source,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            FixError::InvalidJsonError(_)
            | FixError::InvalidBase64Error(_)
            | FixError::EncodingError { .. } => ErrorCategory::MalformedInput,
            FixError::MissingFieldError { .. } | FixError::FieldTypeError { .. } => {
                ErrorCategory::MissingData
            }
            FixError::FileError { .. } => ErrorCategory::Io,
            FixError::ConfigError { .. } | FixError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            FixError::ProcessingError { .. } => ErrorCategory::Unclassified,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::MalformedInput | ErrorCategory::MissingData => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Critical,
            ErrorCategory::Unclassified => ErrorSeverity::Medium,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            FixError::InvalidJsonError(_) => {
                "Check that the input file contains a valid JSON document".to_string()
            }
            FixError::MissingFieldError { key } => {
                format!("Make sure the JSON document has a '{}' field or pass another key with --key", key)
            }
            FixError::FieldTypeError { key } => {
                format!("The '{}' field must hold the Base64 payload as a string", key)
            }
            FixError::InvalidBase64Error(_) => {
                "The payload must use the standard Base64 alphabet with padding".to_string()
            }
            FixError::FileError { .. } => {
                "Check that the path exists and that you have permission to access it".to_string()
            }
            FixError::EncodingError { .. } => {
                "Only UTF-8 text files can be rewritten; convert the file or exclude it".to_string()
            }
            FixError::ConfigError { .. } | FixError::InvalidConfigValueError { .. } => {
                "Review the configuration file and command-line flags".to_string()
            }
            FixError::ProcessingError { .. } => "Re-run with --verbose for details".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::MalformedInput => format!("Malformed input: {}", self),
            ErrorCategory::MissingData => format!("Missing data: {}", self),
            ErrorCategory::Io => format!("File access failed: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Unclassified => format!("Unexpected error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, FixError>;
