use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
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

    #[error("Source not found: {source_id}")]
    SourceNotFound { source_id: String },

    /// 原始表格缺少必要欄位
    #[error("Schema error in {table}: missing column '{column}'")]
    SchemaError { table: String, column: String },

    /// 呼叫順序錯誤，例如未載入資料就合併
    #[error("Precondition failed: {message}")]
    PreconditionError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Input,
    Configuration,
    Sequencing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn precondition(message: impl Into<String>) -> Self {
        EtlError::PreconditionError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::IoError(_) | EtlError::ZipError(_) => ErrorCategory::Io,
            EtlError::CsvError(_)
            | EtlError::SerializationError(_)
            | EtlError::SourceNotFound { .. }
            | EtlError::SchemaError { .. } => ErrorCategory::Input,
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => ErrorCategory::Configuration,
            EtlError::PreconditionError { .. } => ErrorCategory::Sequencing,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Io => ErrorSeverity::Critical,
            ErrorCategory::Input | ErrorCategory::Configuration => ErrorSeverity::High,
            // 呼叫端補上缺少的步驟即可
            ErrorCategory::Sequencing => ErrorSeverity::Medium,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            EtlError::IoError(_) => {
                "Check that the input files exist and the output directory is writable".to_string()
            }
            EtlError::ZipError(_) => "Check free disk space in the output directory".to_string(),
            EtlError::CsvError(_) => {
                "Check the delimiter setting and that the file is a Destatis flat export"
                    .to_string()
            }
            EtlError::SerializationError(_) => {
                "Numeric values could not be serialized; inspect the aggregates".to_string()
            }
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => {
                "Fix the configuration file or command line arguments".to_string()
            }
            EtlError::SourceNotFound { source_id } => {
                format!("Register a table for source '{}' before loading", source_id)
            }
            EtlError::SchemaError { column, .. } => format!(
                "Add column '{}' to the input file or adjust the [columns] configuration",
                column
            ),
            EtlError::PreconditionError { .. } => {
                "Run the missing pipeline step before calling this one".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::IoError(e) => format!("Could not access a file: {}", e),
            EtlError::SchemaError { table, column } => {
                format!("The {} table has no '{}' column", table, column)
            }
            EtlError::PreconditionError { message } => {
                format!("Pipeline steps ran out of order: {}", message)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
