/// Fallback text shown when a failure carries no usable backend message.
pub const GENERIC_FAILURE: &str = "Something went wrong, please try again";

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("API error ({status}): {}", .message.as_deref().unwrap_or(GENERIC_FAILURE))]
    Api {
        status: u16,
        message: Option<String>,
    },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("No active merchant session")]
    NoSession,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl ClientError {
    /// Text suitable for a toast.
    ///
    /// Domain rejections surface the backend's own message verbatim; transport
    /// and decoding failures collapse into [`GENERIC_FAILURE`].
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Api {
                message: Some(msg), ..
            } => msg.clone(),
            ClientError::Unauthorized(msg) if !msg.is_empty() => msg.clone(),
            ClientError::Validation(problems) => problems.join("\n"),
            ClientError::NoSession => "Please sign in again".to_string(),
            _ => GENERIC_FAILURE.to_string(),
        }
    }

    /// True for failures where the request never produced an HTTP response.
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Http(e) if e.status().is_none())
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
