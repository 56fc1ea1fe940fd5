use thiserror::Error;

#[derive(Error, Debug)]
pub enum MaturityError {
    #[error("path does not exist: {0}")]
    PathNotFound(String),

    #[error("config parse error: {0}")]
    ConfigParse(String),

    #[error("malformed threshold table for '{dimension}': {reason}")]
    MalformedThresholds { dimension: String, reason: String },

    #[error("invalid dimension weights: {0}")]
    InvalidWeights(String),

    #[error("missing data: {0}")]
    MissingData(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("toml parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MaturityError {
    /// Configuration defects, as opposed to runtime conditions.
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            Self::ConfigParse(_) | Self::MalformedThresholds { .. } | Self::InvalidWeights(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, MaturityError>;
