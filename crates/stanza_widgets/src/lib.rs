//! Stanza Widget Library
//!
//! Ready-made components built on `stanza_core`:
//!
//! - [`CustomLabel`]: a line of text with a rebuilding `set_value`
//! - [`ButtonCounter`]: a click counter reporting through `on_change`
//! - [`TagList`]: a list of tags with a per-instance default
//! - [`ModelPanel`]: a panel bound to a model stream that owns sub-components
//!   and releases them, and its subscription, on destroy
//!
//! # Example
//!
//! ```rust
//! use stanza_core::prelude::*;
//! use stanza_host::{BuildCx, WidgetTree};
//! use stanza_widgets::CustomLabel;
//!
//! let mut tree = WidgetTree::new();
//! let label = CustomLabel::create(&mut BuildCx::new(&mut tree), props! { "value" => "Hi" })?;
//!
//! label.borrow_mut().set_value("Bye", &mut tree)?;
//! label.destroy()?;
//! # Ok::<(), ComponentError>(())
//! ```

pub mod counter;
pub mod label;
pub mod model_panel;
pub mod tag_list;


pub use counter::ButtonCounter;
pub use label::CustomLabel;
pub use model_panel::{ModelPanel, ModelStream};
pub use tag_list::TagList;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::counter::ButtonCounter;
    pub use crate::label::CustomLabel;
    pub use crate::model_panel::{ModelPanel, ModelStream};
    pub use crate::tag_list::TagList;
    pub use stanza_core::prelude::*;
}
