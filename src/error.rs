use reqwest::StatusCode;
use serde::Deserialize;

/// Error body shape the quiz API uses for rejected requests.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub msg: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The server answered with a non-success status. `message` is the
    /// `msg` field of the error body when one could be parsed.
    #[error("server returned {status}")]
    Server {
        status: StatusCode,
        message: Option<String>,
    },

    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

impl ApiError {
    /// Text shown to the operator: the server-supplied message when there
    /// is one, otherwise the transport error itself.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Server {
                message: Some(msg), ..
            } => msg.clone(),
            ApiError::Server { status, .. } => format!("Request failed with status {status}"),
            ApiError::Transport(err) => err.to_string(),
        }
    }
}
