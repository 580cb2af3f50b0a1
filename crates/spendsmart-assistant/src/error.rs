use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("API key not set; export `{0}` to enable the assistant")]
    MissingApiKey(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Service returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Service returned no text")]
    EmptyResponse,

    #[error("Assistant unavailable: {0}")]
    Unavailable(String),

    #[error("Draft is missing `{0}`")]
    IncompleteDraft(&'static str),
}
