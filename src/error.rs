use sqlext_core::ParseError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ExtResult<T> = Result<T, ExtError>;

impl serde::Serialize for ExtError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl From<toml::de::Error> for ExtError {
    fn from(err: toml::de::Error) -> Self {
        ExtError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for ExtError {
    fn from(err: toml::ser::Error) -> Self {
        ExtError::Config(err.to_string())
    }
}
