//! Error types for stanza_host

use thiserror::Error;

use crate::tree::WidgetId;

/// Errors raised by the widget tree and the scoped container context
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// The widget does not exist (never created, or already disposed)
    #[error("widget {0:?} does not exist")]
    UnknownWidget(WidgetId),

    /// A child was attached to, or a scope opened on, a non-container widget
    #[error("widget {0:?} is not a container")]
    NotAContainer(WidgetId),
}

/// Result type for stanza_host operations
pub type Result<T> = std::result::Result<T, HostError>;
