//! Error types for stanza_core
//!
//! Every variant is a programmer error: inputs come from the same process's
//! own code, so nothing here is meant to be retried.

use stanza_host::HostError;
use thiserror::Error;

use crate::value::PropKind;

/// Errors raised by the component runtime
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComponentError {
    /// A declared property without a default was not supplied at construction
    #[error("{class}: required property '{property}' was not provided")]
    MissingRequiredProperty {
        class: &'static str,
        property: String,
    },

    /// An override or lookup named a property the class does not declare
    #[error("{class}: '{property}' is not a declared property")]
    UnknownProperty {
        class: &'static str,
        property: String,
    },

    /// A property value does not carry the declared type
    #[error("{class}: property '{property}' expects {expected}, got {found}")]
    PropertyTypeMismatch {
        class: &'static str,
        property: String,
        expected: PropKind,
        found: PropKind,
    },

    /// A property value lies outside the range its use allows
    #[error("{class}: property '{property}' value {value} is out of range")]
    PropertyOutOfRange {
        class: &'static str,
        property: String,
        value: i64,
    },

    /// `update()` was called before the component ever rendered
    #[error("{class}: update() called before the component was rendered")]
    NotYetRendered { class: &'static str },

    /// The deferred first render was requested on a rendered component
    #[error("{class}: component has already been rendered")]
    AlreadyRendered { class: &'static str },

    /// A lifecycle method was called after `destroy()`
    #[error("{class}: component used after destroy()")]
    UseAfterDestroy { class: &'static str },

    /// The component is already borrowed, typically because a callback fired
    /// while it was rendering
    #[error("{class}: component is busy (re-entrant access)")]
    Busy { class: &'static str },

    /// A callback outlived the component it points at
    #[error("{class}: component has been dropped")]
    Dropped { class: &'static str },

    /// A render context was asked for a link to a different component type
    #[error("{class}: cannot link to '{requested}' from this render context")]
    LinkMismatch {
        class: &'static str,
        requested: &'static str,
    },

    /// The host toolkit rejected an operation
    #[error(transparent)]
    Host(#[from] HostError),
}

/// Result type for stanza_core operations
pub type Result<T> = std::result::Result<T, ComponentError>;
