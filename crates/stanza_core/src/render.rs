//! Render context and root accessor
//!
//! `render()` receives a [`RenderCx`], which dereferences to the host
//! [`BuildCx`] so every widget constructor is available, and adds the root
//! accessor. The root is created lazily on the first [`RenderCx::root`] call,
//! under whatever container was active when the component was constructed,
//! and the same container is handed back on every later call for the life of
//! the instance.

use std::any::Any;
use std::cell::RefCell;
use std::ops::{Deref, DerefMut};
use std::rc::{Rc, Weak};

use stanza_host::{BuildCx, ContainerKind, Style, WidgetAttrs, WidgetId};

use crate::component::{Component, Link};
use crate::config::RuntimeConfig;
use crate::error::{ComponentError, Result};

/// Handle to a component's root container
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ContainerHandle(WidgetId);

impl ContainerHandle {
    pub fn id(self) -> WidgetId {
        self.0
    }
}

/// Layout arguments for the root container, honoured on the first request only
#[derive(Clone, Debug, PartialEq)]
pub struct RootOptions {
    /// Initial visibility of the root
    pub visible: bool,
    pub spacing: Option<f32>,
    pub name: Option<String>,
    pub width: Option<f32>,
    pub height: Option<f32>,
}

impl Default for RootOptions {
    fn default() -> Self {
        Self {
            visible: true,
            spacing: None,
            name: None,
            width: None,
            height: None,
        }
    }
}

impl RootOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start hidden
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn spacing(mut self, spacing: f32) -> Self {
        self.spacing = Some(spacing);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn width(mut self, width: f32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn height(mut self, height: f32) -> Self {
        self.height = Some(height);
        self
    }
}

/// Root attributes carried by the base properties of every component
///
/// When set, these override the matching [`RootOptions`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RootProps {
    pub name: Option<String>,
    pub style: Option<Style>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub style_type_name_override: Option<String>,
}

impl RootProps {
    fn attrs(&self, options: &RootOptions) -> WidgetAttrs {
        WidgetAttrs {
            name: self.name.clone().or_else(|| options.name.clone()),
            style: self.style.clone(),
            width: self.width.or(options.width),
            height: self.height.or(options.height),
            style_type_name_override: self.style_type_name_override.clone(),
            spacing: options.spacing,
            visible: options.visible,
            enabled: true,
        }
    }
}

/// The first root request, kept to detect later calls with other arguments
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct RootRequest {
    kind: ContainerKind,
    options: RootOptions,
}

/// Root state of a component, lent to the render context while it renders
#[derive(Debug, Default)]
pub(crate) struct RootSlot {
    pub(crate) handle: Option<ContainerHandle>,
    pub(crate) request: Option<RootRequest>,
    pub(crate) props: RootProps,
    pub(crate) mismatch_warned: bool,
}

/// Context passed to [`Component::render`]
pub struct RenderCx<'a, 't> {
    build: &'a mut BuildCx<'t>,
    class: &'static str,
    slot: RootSlot,
    self_ref: Option<Weak<dyn Any>>,
}

impl<'a, 't> RenderCx<'a, 't> {
    /// Name of the component being rendered
    pub fn class(&self) -> &'static str {
        self.class
    }

    /// Get the root container, creating it on the first call
    ///
    /// `kind` and `options` only matter the first time; later calls return
    /// the original root whatever they ask for.
    pub fn root(&mut self, kind: ContainerKind, options: RootOptions) -> Result<ContainerHandle> {
        if let Some(handle) = self.slot.handle {
            self.check_request(kind, &options);
            return Ok(handle);
        }

        let attrs = self.slot.props.attrs(&options);
        let id = self.build.container(kind, attrs)?;
        let handle = ContainerHandle(id);
        tracing::debug!(component = self.class, %kind, ?id, "created root container");

        self.slot.handle = Some(handle);
        self.slot.request = Some(RootRequest { kind, options });
        Ok(handle)
    }

    /// Make `container` the construction target while `f` runs
    pub fn within<R>(
        &mut self,
        container: ContainerHandle,
        f: impl FnOnce(&mut Self) -> Result<R>,
    ) -> Result<R> {
        self.build.push_target(container.id())?;
        let result = f(self);
        self.build.pop_target();
        result
    }

    /// [`RenderCx::root`] followed by [`RenderCx::within`]
    pub fn with_root<R>(
        &mut self,
        kind: ContainerKind,
        options: RootOptions,
        f: impl FnOnce(&mut Self) -> Result<R>,
    ) -> Result<R> {
        let root = self.root(kind, options)?;
        self.within(root, f)
    }

    /// Weak link back to the component being rendered, for callbacks
    pub fn link<C: Component>(&self) -> Result<Link<C>> {
        let cell = self
            .self_ref
            .as_ref()
            .and_then(Weak::upgrade)
            .ok_or(ComponentError::Dropped { class: self.class })?;
        let cell = cell
            .downcast::<RefCell<C>>()
            .map_err(|_| ComponentError::LinkMismatch {
                class: self.class,
                requested: C::NAME,
            })?;
        Ok(Link::new(Rc::downgrade(&cell)))
    }

    fn check_request(&mut self, kind: ContainerKind, options: &RootOptions) {
        let Some(first) = &self.slot.request else {
            return;
        };
        if first.kind == kind && &first.options == options {
            return;
        }
        if RuntimeConfig::current().dev_warnings && !self.slot.mismatch_warned {
            tracing::warn!(
                component = self.class,
                first = %first.kind,
                requested = %kind,
                "root requested with different arguments; keeping the original root"
            );
        }
        self.slot.mismatch_warned = true;
    }
}

impl<'a, 't> Deref for RenderCx<'a, 't> {
    type Target = BuildCx<'t>;

    fn deref(&self) -> &Self::Target {
        &*self.build
    }
}

impl<'a, 't> DerefMut for RenderCx<'a, 't> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.build
    }
}

/// Run one render pass of `component` in the ambient context of `build`
pub(crate) fn run_render<C: Component>(component: &mut C, build: &mut BuildCx<'_>) -> Result<()> {
    let span = tracing::debug_span!("render", component = C::NAME);
    let _enter = span.enter();

    let config = RuntimeConfig::current();
    let base = component.base_mut();
    let slot = base.take_root_slot();
    let self_ref = base.self_ref();
    let had_root = slot.handle.is_some();
    let top_level_before = build.tree().top_level().len();
    let ambient = build.current();

    let mut cx = RenderCx {
        build,
        class: C::NAME,
        slot,
        self_ref,
    };
    let result = component.render(&mut cx);
    let RenderCx { build, slot, .. } = cx;

    if config.warn_on_orphans && ambient.is_none() {
        let created = build
            .tree()
            .top_level()
            .len()
            .saturating_sub(top_level_before);
        let root_created = usize::from(!had_root && slot.handle.is_some());
        let orphans = created.saturating_sub(root_created);
        if orphans > 0 {
            tracing::warn!(
                component = C::NAME,
                orphans,
                "widgets rendered with no active container"
            );
        }
    }

    component.base_mut().restore_root_slot(slot);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_props_override_options() {
        let props = RootProps {
            name: Some("from-props".into()),
            width: Some(300.0),
            ..Default::default()
        };
        let options = RootOptions::new().name("from-options").height(20.0).hidden();
        let attrs = props.attrs(&options);

        assert_eq!(attrs.name.as_deref(), Some("from-props"));
        assert_eq!(attrs.width, Some(300.0));
        assert_eq!(attrs.height, Some(20.0));
        assert!(!attrs.visible);
        assert!(attrs.enabled);
    }

    #[test]
    fn test_root_options_builder() {
        let options = RootOptions::new().spacing(4.0).width(10.0);
        assert_eq!(options.spacing, Some(4.0));
        assert_eq!(options.width, Some(10.0));
        assert!(options.visible);
        assert_ne!(options, RootOptions::default());
    }
}
