use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ForecastError {
    #[error("Invalid file type.")]
    InvalidFileType,

    #[error("Input data must contain a '{0}' column.")]
    MissingColumn(&'static str),

    #[error("{0}")]
    Processing(String),
}

impl ForecastError {
    /// Collapses an internal error chain into a single processing message.
    pub fn processing(err: anyhow::Error) -> Self {
        Self::Processing(format!("{err:#}"))
    }

    /// Client-facing detail string.
    pub fn detail(&self) -> String {
        match self {
            Self::InvalidFileType => self.to_string(),
            Self::MissingColumn(_) | Self::Processing(_) => format!("Error: {self}"),
        }
    }

    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidFileType)
    }
}
