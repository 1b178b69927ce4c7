use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgroRiskError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),

    #[error("File must have the columns: zona, lat, lon, cultivo (missing: {})", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Unknown crop: {0}")]
    UnknownCrop(String),

    #[error("No zones loaded - import a file or add a zone first")]
    NoZones,

    #[error("No zones have been evaluated - check the selected crops")]
    NoEvaluatedZones,

    #[error("Data source unavailable: {0}")]
    DataSourceUnavailable(String),
}

impl AgroRiskError {
    /// Conditions shown to the user as warnings rather than failures.
    pub fn is_warning(&self) -> bool {
        matches!(self, AgroRiskError::NoZones | AgroRiskError::NoEvaluatedZones)
    }
}

pub type Result<T> = std::result::Result<T, AgroRiskError>;
