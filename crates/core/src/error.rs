use thiserror::Error;

#[derive(Error, Debug)]
pub enum TitlesmithError {
    #[error("{message}")]
    MissingInput { message: String },

    #[error("{what} not found")]
    NotFound { what: String },

    #[error("{message}")]
    Upstream { message: String },

    #[error("No response from AI")]
    EmptyResponse,

    #[error("Invalid response format: {reason}")]
    MalformedResponse { reason: String },

    #[error("API request failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl TitlesmithError {
    pub(crate) fn missing_input(message: &str) -> Self {
        Self::MissingInput {
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TitlesmithError>;
