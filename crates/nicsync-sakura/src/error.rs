//! Sakura Cloud transport error types

use nicsync::NicError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SakuraError {
    #[error("usacloud not found. Please install: brew install usacloud")]
    UsacloudNotFound,

    #[error("usacloud authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("usacloud command failed: {0}")]
    CommandFailed(String),

    #[error("Server not found: {0}")]
    ServerNotFound(String),

    #[error("Interface not found: server {server} slot {slot}")]
    InterfaceNotFound { server: String, slot: usize },

    #[error("Invalid zone: {0}")]
    InvalidZone(String),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SakuraError>;

/// Rate limits, gateway errors and timeouts are worth retrying;
/// everything else from usacloud is treated as final.
fn is_transient_message(message: &str) -> bool {
    let message = message.to_ascii_lowercase();
    ["429", "too many requests", "502", "503", "timeout", "temporarily"]
        .iter()
        .any(|needle| message.contains(needle))
}

impl From<SakuraError> for NicError {
    fn from(e: SakuraError) -> Self {
        match e {
            SakuraError::ServerNotFound(_) | SakuraError::InterfaceNotFound { .. } => {
                NicError::NotFound(e.to_string())
            }
            SakuraError::CommandFailed(ref message) if is_transient_message(message) => {
                NicError::TransientApi(e.to_string())
            }
            SakuraError::JsonError(e) => NicError::Json(e),
            SakuraError::IoError(e) => NicError::Io(e),
            other => NicError::Transport(other.to_string()),
        }
    }
}
