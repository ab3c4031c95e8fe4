use thiserror::Error;

/// Top-level error type for the Docwing widget runtime.
#[derive(Debug, Error)]
pub enum WidgetError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("chat backend returned {status}: {body}")]
    Transport { status: u16, body: String },

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("widget initialization failed: {0}")]
    Initialization(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl WidgetError {
    /// True for the variants that may be shown to the end user as a chat
    /// bubble. Storage and initialization failures degrade silently.
    pub fn is_user_visible(&self) -> bool {
        matches!(
            self,
            WidgetError::Configuration(_)
                | WidgetError::Transport { .. }
                | WidgetError::Connection(_)
        )
    }

    /// Map the error to the copy rendered inside the chat dialog.
    ///
    /// Transport errors are bucketed by status code; everything that is not
    /// user-visible falls back to the generic retry line.
    pub fn user_copy(&self) -> String {
        match self {
            WidgetError::Configuration(_) => {
                "This chat widget is not configured correctly. Please contact the site owner."
                    .to_string()
            }
            WidgetError::Transport { status, .. } => match status {
                401 => "Authentication failed. The widget's API key may be invalid.".to_string(),
                403 => "Access denied. This site may not be allowed to use the chat service."
                    .to_string(),
                429 => "The chat service is receiving too many requests. Please wait a moment and try again."
                    .to_string(),
                s if *s >= 500 => {
                    "The chat service is having trouble right now. Please try again shortly."
                        .to_string()
                }
                _ => "Something went wrong. Please try again.".to_string(),
            },
            WidgetError::Connection(_) => {
                "Could not reach the chat service. Please check your connection and try again."
                    .to_string()
            }
            _ => "Something went wrong. Please try again.".to_string(),
        }
    }
}
