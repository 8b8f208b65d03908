use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("CSV parsing system error: {source}")]
    CsvSystemError {
        #[from]
        source: csv::Error,
    },

    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("CSV data format error: {0}")]
    CsvDataFormatError(String),

    #[error("Data source error: {0}")]
    DataSourceError(String),

    #[error("No data returned for symbol '{symbol}'")]
    EmptySeries { symbol: String },

    #[error("Invalid moving average label '{0}'")]
    InvalidWindowLabel(String),

    #[error("Too many symbols: {requested} requested, the grid holds at most {max}")]
    TooManySymbols { requested: usize, max: usize },

    #[error("Invalid chart option: {0}")]
    InvalidOption(String),
}

impl From<shared::models::ParseError> for EngineError {
    fn from(err: shared::models::ParseError) -> Self {
        EngineError::InvalidOption(err.to_string())
    }
}

impl From<EngineError> for tonic::Status {
    fn from(err: EngineError) -> Self {
        tracing::error!("Mapping EngineError to tonic::Status: {:?}", err);
        match err {
            EngineError::ConfigError(msg) => tonic::Status::failed_precondition(format!("Configuration error: {}", msg)),
            EngineError::CsvSystemError { source } => tonic::Status::internal(format!("CSV parsing system error: {}", source)),
            EngineError::IoError { source } => tonic::Status::internal(format!("I/O error: {}", source)),
            EngineError::CsvDataFormatError(msg) => tonic::Status::internal(format!("CSV data format error: {}", msg)),
            EngineError::DataSourceError(msg) => tonic::Status::not_found(format!("Data source error: {}", msg)),
            err @ EngineError::EmptySeries { .. } => tonic::Status::not_found(err.to_string()),
            err @ EngineError::InvalidWindowLabel(_) => tonic::Status::invalid_argument(err.to_string()),
            err @ EngineError::TooManySymbols { .. } => tonic::Status::invalid_argument(err.to_string()),
            err @ EngineError::InvalidOption(_) => tonic::Status::invalid_argument(err.to_string()),
        }
    }
}
