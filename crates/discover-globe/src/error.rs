//! Globe error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GlobeError {
    #[error("Failed to read outline file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid GeoJSON: {0}")]
    GeoJson(String),

    #[error("Unknown intro variant: {0}")]
    UnknownVariant(String),
}

impl From<serde_json::Error> for GlobeError {
    fn from(err: serde_json::Error) -> Self {
        Self::GeoJson(err.to_string())
    }
}

pub type GlobeResult<T> = Result<T, GlobeError>;
