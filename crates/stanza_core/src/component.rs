//! Components and their lifecycle
//!
//! A component is a plain struct that embeds a [`ComponentBase`], declares
//! its properties in a static table, and implements [`Component::render`].
//! Construction resolves the properties, renders once into whatever
//! container is active, and hands back a [`Mounted`] handle:
//!
//! ```ignore
//! struct CustomLabel {
//!     base: ComponentBase,
//!     value: String,
//! }
//!
//! impl Component for CustomLabel {
//!     const NAME: &'static str = "CustomLabel";
//!     const PROPS: &'static [PropDecl] =
//!         &[PropDecl::new("value", PropKind::Str, || "Hello World".into())];
//!
//!     fn from_props(base: ComponentBase, props: &mut Props) -> Result<Self> {
//!         Ok(Self { base, value: props.take("value")? })
//!     }
//!
//!     fn base(&self) -> &ComponentBase { &self.base }
//!     fn base_mut(&mut self) -> &mut ComponentBase { &mut self.base }
//!
//!     fn render(&mut self, cx: &mut RenderCx<'_, '_>) -> Result<()> {
//!         cx.with_root(ContainerKind::VStack, RootOptions::new(), |cx| {
//!             cx.label(self.value.clone())?;
//!             Ok(())
//!         })
//!     }
//! }
//!
//! let label = CustomLabel::create(&mut cx, props! { "value" => "Hi" })?;
//! label.borrow_mut().value = "Bye".into();
//! label.update(&mut tree)?;
//! ```
//!
//! The lifecycle runs `Constructed` → `Rendered` → (`update()` …) →
//! `Destroyed`. Nothing is torn down automatically: whoever holds a
//! component must call `destroy()` on it, and a component holding
//! sub-components must destroy them from its own [`Component::on_destroy`].

use std::any::Any;
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::{Rc, Weak};

use stanza_host::{BuildCx, ClickHandler, WidgetTree};

use crate::config::RuntimeConfig;
use crate::error::{ComponentError, Result};
use crate::props::{schema_for, PropDecl, PropOverrides, PropSchema, Props, BASE_PROPS};
use crate::render::{run_render, ContainerHandle, RenderCx, RootProps, RootSlot};
use crate::value::PropValue;

/// Lifecycle state of a component instance
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    /// Properties assigned, nothing rendered yet
    Constructed,
    /// Rendered at least once
    Rendered,
    /// `destroy()` has run; terminal
    Destroyed,
}

/// Construction options
#[derive(Clone, Copy, Debug)]
pub struct CreateOptions {
    /// Render immediately. When false the instance stays `Constructed`
    /// until [`ComponentExt::mount`] is called.
    pub render_on_init: bool,
}

impl Default for CreateOptions {
    fn default() -> Self {
        Self {
            render_on_init: true,
        }
    }
}

/// State every component embeds: lifecycle, root slot, and base properties
pub struct ComponentBase {
    class: &'static str,
    state: Lifecycle,
    root: RootSlot,
    self_ref: Option<Weak<dyn Any>>,
}

impl ComponentBase {
    fn new(class: &'static str, root_props: RootProps) -> Self {
        Self {
            class,
            state: Lifecycle::Constructed,
            root: RootSlot {
                props: root_props,
                ..Default::default()
            },
            self_ref: None,
        }
    }

    pub fn class(&self) -> &'static str {
        self.class
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.state
    }

    /// The root container, once created
    pub fn root(&self) -> Option<ContainerHandle> {
        self.root.handle
    }

    /// Root attributes taken from the base properties
    pub fn root_props(&self) -> &RootProps {
        &self.root.props
    }

    pub(crate) fn take_root_slot(&mut self) -> RootSlot {
        std::mem::take(&mut self.root)
    }

    pub(crate) fn restore_root_slot(&mut self, slot: RootSlot) {
        self.root = slot;
    }

    pub(crate) fn self_ref(&self) -> Option<Weak<dyn Any>> {
        self.self_ref.clone()
    }

    fn ensure_alive(&self) -> Result<()> {
        if self.state == Lifecycle::Destroyed {
            return Err(ComponentError::UseAfterDestroy { class: self.class });
        }
        Ok(())
    }
}

impl fmt::Debug for ComponentBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentBase")
            .field("class", &self.class)
            .field("state", &self.state)
            .field("root", &self.root.handle)
            .finish()
    }
}

/// Root attributes from the base properties, read in place so a class can
/// still take them in `from_props`
///
/// A base property the class redeclared with another type is no longer a
/// root attribute and is skipped.
fn root_props(schema: &PropSchema, props: &Props) -> Result<RootProps> {
    let base_value = |name: &str| -> Option<&PropValue> {
        let base = BASE_PROPS.iter().find(|decl| decl.name == name)?;
        if schema.get(name)?.kind != base.kind {
            return None;
        }
        props.get(name)
    };

    let text = |name: &str| base_value(name).and_then(PropValue::as_str).map(str::to_string);
    let pixels = |name: &'static str| -> Result<Option<f32>> {
        let Some(value) = base_value(name).and_then(PropValue::as_int) else {
            return Ok(None);
        };
        let pixels = u16::try_from(value).map_err(|_| ComponentError::PropertyOutOfRange {
            class: props.class(),
            property: name.to_string(),
            value,
        })?;
        Ok(Some(f32::from(pixels)))
    };

    let style = match base_value("style") {
        Some(PropValue::Map(style)) => Some(
            style
                .iter()
                .map(|(key, value)| (key.clone(), value.to_string()))
                .collect(),
        ),
        _ => None,
    };

    Ok(RootProps {
        name: text("name"),
        style,
        width: pixels("width")?,
        height: pixels("height")?,
        style_type_name_override: text("style_type_name_override"),
    })
}

/// A reusable, stateful unit of UI
pub trait Component: Sized + 'static {
    /// Class name used in errors and logs
    const NAME: &'static str;

    /// Properties declared by this class
    const PROPS: &'static [PropDecl] = &[];

    /// Declarations inherited from ancestor classes, outermost first
    const EXTENDS: &'static [&'static [PropDecl]] = &[];

    /// Build the instance from its resolved properties
    fn from_props(base: ComponentBase, props: &mut Props) -> Result<Self>;

    fn base(&self) -> &ComponentBase;

    fn base_mut(&mut self) -> &mut ComponentBase;

    /// (Re)build the component's widgets
    ///
    /// Widgets should be emitted inside the root's scope
    /// ([`RenderCx::with_root`]); output emitted without a root cannot be
    /// removed by a later `update()`.
    fn render(&mut self, cx: &mut RenderCx<'_, '_>) -> Result<()>;

    /// Runs once, after the instance is owned by its handle and before the
    /// first render. Acquire subscriptions here.
    fn on_create(&mut self, _link: Link<Self>) -> Result<()> {
        Ok(())
    }

    /// Release non-UI resources and destroy held sub-components
    fn on_destroy(&mut self) -> Result<()> {
        Ok(())
    }

    /// Merged property schema of this class
    fn schema() -> &'static PropSchema {
        let mut tables: Vec<&[PropDecl]> = Vec::with_capacity(Self::EXTENDS.len() + 2);
        tables.push(BASE_PROPS);
        tables.extend(Self::EXTENDS.iter().copied());
        tables.push(Self::PROPS);
        schema_for::<Self>(Self::NAME, &tables)
    }

    /// Construct and render into the active container of `cx`
    fn create(cx: &mut BuildCx<'_>, overrides: PropOverrides) -> Result<Mounted<Self>> {
        Self::create_with(cx, overrides, CreateOptions::default())
    }

    fn create_with(
        cx: &mut BuildCx<'_>,
        overrides: PropOverrides,
        options: CreateOptions,
    ) -> Result<Mounted<Self>> {
        let schema = Self::schema();
        let mut props = schema.resolve(overrides)?;
        let root_props = root_props(schema, &props)?;
        let component = Self::from_props(ComponentBase::new(Self::NAME, root_props), &mut props)?;
        tracing::debug!(component = Self::NAME, "created component");

        let mounted = Mounted::new(component);
        {
            let mut component = mounted.try_borrow_mut()?;
            let result = component.on_create(mounted.link()).and_then(|()| {
                if options.render_on_init {
                    component.mount(cx)
                } else {
                    Ok(())
                }
            });
            if let Err(err) = result {
                abandon(&mut *component, cx);
                return Err(err);
            }
        }
        Ok(mounted)
    }
}

/// Tear down an instance whose construction failed
///
/// The holder never receives a handle, so whatever `on_create` acquired
/// and any partly built root are released here.
fn abandon<C: Component>(component: &mut C, cx: &mut BuildCx<'_>) {
    let root = component.root();
    if let Err(err) = component.destroy() {
        tracing::warn!(component = C::NAME, error = %err, "destroy after failed create failed");
    }
    if let Some(root) = root {
        if let Err(err) = cx.tree_mut().remove(root.id()) {
            tracing::warn!(component = C::NAME, error = %err, "failed to remove partial root");
        }
    }
    tracing::debug!(component = C::NAME, "abandoned failed construction");
}

/// Lifecycle operations available on every component
pub trait ComponentExt: Component {
    fn lifecycle(&self) -> Lifecycle;

    fn root(&self) -> Option<ContainerHandle>;

    /// Perform the first render in the ambient context of `cx`
    fn mount(&mut self, cx: &mut BuildCx<'_>) -> Result<()>;

    /// Clear the root's children and render again into the same root
    fn update(&mut self, tree: &mut WidgetTree) -> Result<()>;

    /// Run [`Component::on_destroy`] and retire the instance
    fn destroy(&mut self) -> Result<()>;

    /// Whether the root is visible; false before the root exists
    fn visible(&self, tree: &WidgetTree) -> bool;

    fn set_visible(&mut self, tree: &mut WidgetTree, visible: bool) -> Result<()>;

    /// Whether the root is enabled; `None` before the root exists
    fn enabled(&self, tree: &WidgetTree) -> Option<bool>;

    /// Enable or disable the root; does nothing before the root exists
    fn set_enabled(&mut self, tree: &mut WidgetTree, enabled: bool) -> Result<()>;
}

impl<C: Component> ComponentExt for C {
    fn lifecycle(&self) -> Lifecycle {
        self.base().state
    }

    fn root(&self) -> Option<ContainerHandle> {
        self.base().root()
    }

    fn mount(&mut self, cx: &mut BuildCx<'_>) -> Result<()> {
        let base = self.base();
        base.ensure_alive()?;
        if base.state == Lifecycle::Rendered {
            return Err(ComponentError::AlreadyRendered { class: C::NAME });
        }

        // a failed first render still counts as rendered so update() can retry
        let result = run_render(self, cx);
        self.base_mut().state = Lifecycle::Rendered;
        tracing::debug!(component = C::NAME, ok = result.is_ok(), "mounted");
        result
    }

    fn update(&mut self, tree: &mut WidgetTree) -> Result<()> {
        let base = self.base();
        base.ensure_alive()?;
        if base.state == Lifecycle::Constructed {
            return Err(ComponentError::NotYetRendered { class: C::NAME });
        }

        match base.root() {
            Some(root) => {
                let disposed = tree.clear_children(root.id())?;
                tracing::debug!(component = C::NAME, disposed, "updating");
            }
            None => {
                if RuntimeConfig::current().dev_warnings {
                    tracing::warn!(
                        component = C::NAME,
                        "update() on a component without a root; previous output is not removed"
                    );
                }
            }
        }

        let mut build = BuildCx::new(tree);
        run_render(self, &mut build)
    }

    fn destroy(&mut self) -> Result<()> {
        self.base().ensure_alive()?;
        let result = self.on_destroy();
        self.base_mut().state = Lifecycle::Destroyed;
        tracing::debug!(component = C::NAME, ok = result.is_ok(), "destroyed");
        result
    }

    fn visible(&self, tree: &WidgetTree) -> bool {
        self.root()
            .and_then(|root| tree.get(root.id()))
            .is_some_and(|node| node.attrs.visible)
    }

    fn set_visible(&mut self, tree: &mut WidgetTree, visible: bool) -> Result<()> {
        self.base().ensure_alive()?;
        let root = self
            .root()
            .ok_or(ComponentError::NotYetRendered { class: C::NAME })?;
        tree.set_visible(root.id(), visible)?;
        Ok(())
    }

    fn enabled(&self, tree: &WidgetTree) -> Option<bool> {
        let root = self.root()?;
        tree.get(root.id()).map(|node| node.attrs.enabled)
    }

    fn set_enabled(&mut self, tree: &mut WidgetTree, enabled: bool) -> Result<()> {
        self.base().ensure_alive()?;
        if let Some(root) = self.root() {
            tree.set_enabled(root.id(), enabled)?;
        }
        Ok(())
    }
}

/// Shared handle to a constructed component
///
/// Holders use it to mutate properties and drive `update()`/`destroy()`.
/// Dropping the last handle does not destroy the component.
pub struct Mounted<C: Component> {
    cell: Rc<RefCell<C>>,
}

impl<C: Component> Mounted<C> {
    fn new(component: C) -> Self {
        let cell = Rc::new(RefCell::new(component));
        let weak = Rc::downgrade(&cell);
        let self_ref: Weak<dyn Any> = weak;
        cell.borrow_mut().base_mut().self_ref = Some(self_ref);
        Self { cell }
    }

    /// Borrow the component; panics if it is mutably borrowed
    pub fn borrow(&self) -> Ref<'_, C> {
        self.cell.borrow()
    }

    /// Mutably borrow the component; panics if it is already borrowed
    pub fn borrow_mut(&self) -> RefMut<'_, C> {
        self.cell.borrow_mut()
    }

    pub fn try_borrow(&self) -> Result<Ref<'_, C>> {
        self.cell
            .try_borrow()
            .map_err(|_| ComponentError::Busy { class: C::NAME })
    }

    pub fn try_borrow_mut(&self) -> Result<RefMut<'_, C>> {
        self.cell
            .try_borrow_mut()
            .map_err(|_| ComponentError::Busy { class: C::NAME })
    }

    pub fn mount(&self, cx: &mut BuildCx<'_>) -> Result<()> {
        self.try_borrow_mut()?.mount(cx)
    }

    pub fn update(&self, tree: &mut WidgetTree) -> Result<()> {
        self.try_borrow_mut()?.update(tree)
    }

    pub fn destroy(&self) -> Result<()> {
        self.try_borrow_mut()?.destroy()
    }

    pub fn lifecycle(&self) -> Result<Lifecycle> {
        Ok(self.try_borrow()?.lifecycle())
    }

    pub fn root(&self) -> Result<Option<ContainerHandle>> {
        Ok(self.try_borrow()?.root())
    }

    pub fn link(&self) -> Link<C> {
        Link::new(Rc::downgrade(&self.cell))
    }

    /// Whether both handles refer to the same instance
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.cell, &other.cell)
    }
}

impl<C: Component> Clone for Mounted<C> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
        }
    }
}

impl<C: Component> fmt::Debug for Mounted<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cell.try_borrow() {
            Ok(component) => f
                .debug_tuple("Mounted")
                .field(component.base())
                .finish(),
            Err(_) => write!(f, "Mounted({}, <busy>)", C::NAME),
        }
    }
}

/// Weak reference to a mounted component for use inside callbacks
///
/// Invoking through a link fails with `UseAfterDestroy` once the component
/// is destroyed and with `Dropped` once every handle is gone.
pub struct Link<C: Component> {
    target: Weak<RefCell<C>>,
}

impl<C: Component> Link<C> {
    pub(crate) fn new(target: Weak<RefCell<C>>) -> Self {
        Self { target }
    }

    /// Whether the component still exists
    pub fn is_alive(&self) -> bool {
        self.target.strong_count() > 0
    }

    /// Run `f` against the live, undestroyed component
    pub fn with<R>(&self, f: impl FnOnce(&mut C) -> Result<R>) -> Result<R> {
        let cell = self
            .target
            .upgrade()
            .ok_or(ComponentError::Dropped { class: C::NAME })?;
        let mut component = cell
            .try_borrow_mut()
            .map_err(|_| ComponentError::Busy { class: C::NAME })?;
        component.base().ensure_alive()?;
        f(&mut component)
    }

    /// Click handler that runs `f` against the component
    pub fn callback<F>(&self, f: F) -> ClickHandler
    where
        F: Fn(&mut C, &mut WidgetTree) -> Result<()> + 'static,
    {
        let link = self.clone();
        Rc::new(move |tree: &mut WidgetTree| -> anyhow::Result<()> {
            link.with(|component| f(component, tree))?;
            Ok(())
        })
    }

    /// Event stream callback that runs `f` against the component
    pub fn subscriber<T, F>(&self, f: F) -> impl Fn(&T, &mut WidgetTree) -> anyhow::Result<()>
    where
        T: 'static,
        F: Fn(&mut C, &T, &mut WidgetTree) -> Result<()> + 'static,
    {
        let link = self.clone();
        move |value: &T, tree: &mut WidgetTree| -> anyhow::Result<()> {
            link.with(|component| f(component, value, tree))?;
            Ok(())
        }
    }
}

impl<C: Component> Clone for Link<C> {
    fn clone(&self) -> Self {
        Self::new(self.target.clone())
    }
}

impl<C: Component> fmt::Debug for Link<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Link")
            .field("component", &C::NAME)
            .field("alive", &self.is_alive())
            .finish()
    }
}
