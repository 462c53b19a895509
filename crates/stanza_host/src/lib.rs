//! Stanza Host Toolkit
//!
//! The imperative widget toolkit that Stanza components are layered over:
//!
//! - **Widget tree**: a retained arena of containers and primitive widgets
//! - **Scoped container context**: constructors attach to whichever container
//!   is currently active, tracked on an explicit stack in [`BuildCx`]
//! - **Click dispatch**: buttons carry handlers that may rebuild the tree
//! - **Event streams**: the subscription primitive components must release
//!
//! # Example
//!
//! ```rust
//! use stanza_host::{BuildCx, HostError, WidgetTree};
//!
//! let mut tree = WidgetTree::new();
//! let mut cx = BuildCx::new(&mut tree);
//!
//! let column = cx.vstack()?;
//! cx.within(column, |cx| {
//!     cx.label("Hello")?;
//!     cx.spacer()?;
//!     Ok::<_, HostError>(())
//! })?;
//!
//! assert_eq!(tree.children(column)?.len(), 2);
//! # Ok::<(), HostError>(())
//! ```

pub mod build;
pub mod error;
pub mod events;
pub mod tree;

pub use build::BuildCx;
pub use error::HostError;
pub use events::{EventStream, StreamCallback, Subscription};
pub use tree::{
    ClickHandler, ContainerKind, Style, WidgetAttrs, WidgetId, WidgetKind, WidgetNode, WidgetTree,
};
