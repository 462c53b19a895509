//! Stanza Core Runtime
//!
//! Reusable, stateful components layered over the immediate-mode widget
//! toolkit in `stanza_host`:
//!
//! - **Declared properties**: per-class tables of (name, type, default),
//!   merged along the inheritance chain and validated at construction
//! - **Render lifecycle**: construct, render once into the ambient container,
//!   then `update()` in place by clearing and refilling a lazily created root
//! - **Destruction protocol**: explicit `destroy()` with an overridable
//!   cleanup hook; nothing is released by dropping a handle
//!
//! # Example
//!
//! ```rust
//! use stanza_core::prelude::*;
//! use stanza_host::{BuildCx, ContainerKind, WidgetTree};
//!
//! struct Greeting {
//!     base: ComponentBase,
//!     text: String,
//! }
//!
//! impl Component for Greeting {
//!     const NAME: &'static str = "Greeting";
//!     const PROPS: &'static [PropDecl] =
//!         &[PropDecl::new("text", PropKind::Str, || "Hello".into())];
//!
//!     fn from_props(base: ComponentBase, props: &mut Props) -> Result<Self> {
//!         Ok(Self { base, text: props.take("text")? })
//!     }
//!
//!     fn base(&self) -> &ComponentBase {
//!         &self.base
//!     }
//!
//!     fn base_mut(&mut self) -> &mut ComponentBase {
//!         &mut self.base
//!     }
//!
//!     fn render(&mut self, cx: &mut RenderCx<'_, '_>) -> Result<()> {
//!         cx.with_root(ContainerKind::VStack, RootOptions::new(), |cx| {
//!             cx.label(self.text.clone())?;
//!             Ok(())
//!         })
//!     }
//! }
//!
//! let mut tree = WidgetTree::new();
//! let greeting = Greeting::create(&mut BuildCx::new(&mut tree), props! { "text" => "Hi" })?;
//!
//! greeting.borrow_mut().text = "Bye".into();
//! greeting.update(&mut tree)?;
//! greeting.destroy()?;
//! # Ok::<(), ComponentError>(())
//! ```

pub mod component;
pub mod config;
pub mod dispose;
pub mod error;
pub mod props;
pub mod render;
pub mod value;

pub use component::{
    Component, ComponentBase, ComponentExt, CreateOptions, Lifecycle, Link, Mounted,
};
pub use config::{ConfigError, RuntimeConfig};
pub use dispose::{Disposable, Disposables, Scoped};
pub use error::{ComponentError, Result};
pub use props::{
    schema_for, PropDecl, PropDefault, PropOverrides, PropSchema, Props, BASE_PROPS,
};
pub use render::{ContainerHandle, RenderCx, RootOptions, RootProps};
pub use value::{Callback, FromPropValue, PropKind, PropValue};

pub mod prelude {
    pub use crate::component::{
        Component, ComponentBase, ComponentExt, CreateOptions, Lifecycle, Link, Mounted,
    };
    pub use crate::dispose::{Disposable, Disposables, Scoped};
    pub use crate::error::{ComponentError, Result};
    pub use crate::props;
    pub use crate::props::{PropDecl, PropOverrides, Props};
    pub use crate::render::{ContainerHandle, RenderCx, RootOptions};
    pub use crate::value::{Callback, PropKind, PropValue};
}
