pub mod mock;

use std::fmt;

#[derive(Debug)]
pub enum AnalyzerError {
    Configuration(String),
    Unsupported(String),
    InvalidResponse(String),
    Other(String),
}

impl AnalyzerError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        AnalyzerError::Configuration(msg.into())
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        AnalyzerError::Unsupported(msg.into())
    }

    pub fn invalid_response(msg: impl Into<String>) -> Self {
        AnalyzerError::InvalidResponse(msg.into())
    }
}

impl fmt::Display for AnalyzerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalyzerError::Configuration(msg)
            | AnalyzerError::Unsupported(msg)
            | AnalyzerError::InvalidResponse(msg)
            | AnalyzerError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for AnalyzerError {}
