use std::fmt;

use crate::link::LinkError;

/// Every way a load operation can end without an embedded report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmbedError {
    InvalidLink(LinkError),
    /// Public view links are refused by the service's embedding policy.
    EmbedRejectedByPolicy,
    EmbedTimeout { after_ms: u64 },
    /// The surface itself reported that loading failed.
    EmbedLoadError,
    /// A load was observed but the content check came back negative.
    EmbedBlocked,
    PopupBlocked,
    ClipboardWriteFailed(String),
}

impl fmt::Display for EmbedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmbedError::InvalidLink(err) => write!(f, "invalid link: {err}"),
            EmbedError::EmbedRejectedByPolicy => write!(f, "embedding rejected by policy"),
            EmbedError::EmbedTimeout { after_ms } => {
                write!(f, "no success signal within {after_ms}ms")
            }
            EmbedError::EmbedLoadError => write!(f, "surface reported a load error"),
            EmbedError::EmbedBlocked => write!(f, "content verification failed"),
            EmbedError::PopupBlocked => write!(f, "popup and new tab were blocked"),
            EmbedError::ClipboardWriteFailed(reason) => {
                write!(f, "clipboard write failed: {reason}")
            }
        }
    }
}

impl std::error::Error for EmbedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EmbedError::InvalidLink(err) => Some(err),
            _ => None,
        }
    }
}

impl From<LinkError> for EmbedError {
    fn from(err: LinkError) -> Self {
        EmbedError::InvalidLink(err)
    }
}
