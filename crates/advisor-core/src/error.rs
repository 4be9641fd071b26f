use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Agent error: {0}")]
    Agent(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Report error: {0}")]
    Report(String),
}

impl AnalysisError {
    /// True for errors that reject a request before any record is created.
    pub fn is_validation(&self) -> bool {
        matches!(self, AnalysisError::InvalidRequest(_))
    }
}
