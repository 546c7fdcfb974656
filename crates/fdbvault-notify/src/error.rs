use fdbvault_core::ToolError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("cannot build http client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("rejected with HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

impl From<NotifyError> for ToolError {
    fn from(e: NotifyError) -> Self {
        ToolError::Delivery(e.to_string())
    }
}
