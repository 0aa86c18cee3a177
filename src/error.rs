use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnalysisError>;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("NetCDF read error: {0}")]
    NetCdf(String),

    #[error("Unsupported input format: {path} (expected .csv or .nc)")]
    UnsupportedFormat { path: String },

    #[error("Analysis window '{0}' is not supported (expected 'year', a season name or abbreviation, or a month number in 1..=12)")]
    InvalidWindow(String),

    #[error("Statistical distribution '{0}' is not supported (expected one of gamma, genextreme, gumbel_r, lognorm, pearson3)")]
    UnsupportedDistribution(String),

    #[error("Distribution fit failed: {0}")]
    FitFailure(String),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    #[error("Missing required data: {0}")]
    MissingData(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Model run error: {0}")]
    ModelRun(String),
}
