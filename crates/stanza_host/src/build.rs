//! Scoped container context
//!
//! Widget constructors never take a parent argument. Instead, a [`BuildCx`]
//! keeps an explicit stack of active containers and every constructor
//! attaches the new widget to the top of that stack:
//!
//! ```ignore
//! let mut tree = WidgetTree::new();
//! let mut cx = BuildCx::new(&mut tree);
//!
//! let column = cx.vstack()?;
//! cx.within(column, |cx| {
//!     cx.label("Title")?;
//!     cx.button("Ok", on_ok)?;
//!     Ok(())
//! })?;
//! ```

use crate::error::Result;
use crate::tree::{ClickHandler, ContainerKind, WidgetAttrs, WidgetId, WidgetKind, WidgetTree};

/// Build context threading the active container stack through construction
pub struct BuildCx<'t> {
    tree: &'t mut WidgetTree,
    targets: Vec<WidgetId>,
}

impl<'t> BuildCx<'t> {
    /// Create a context with no active container
    pub fn new(tree: &'t mut WidgetTree) -> Self {
        Self {
            tree,
            targets: Vec::new(),
        }
    }

    /// Create a context whose initial target is `container`
    pub fn with_target(tree: &'t mut WidgetTree, container: WidgetId) -> Result<Self> {
        tree.ensure_container(container)?;
        Ok(Self {
            tree,
            targets: vec![container],
        })
    }

    pub fn tree(&self) -> &WidgetTree {
        &*self.tree
    }

    pub fn tree_mut(&mut self) -> &mut WidgetTree {
        &mut *self.tree
    }

    /// The container new widgets attach to, if any
    pub fn current(&self) -> Option<WidgetId> {
        self.targets.last().copied()
    }

    /// Number of scopes currently open
    pub fn depth(&self) -> usize {
        self.targets.len()
    }

    /// Make `container` the active target while `f` runs
    ///
    /// The previous target is restored when `f` returns, whether it succeeded
    /// or not.
    pub fn within<R, E>(
        &mut self,
        container: WidgetId,
        f: impl FnOnce(&mut Self) -> std::result::Result<R, E>,
    ) -> std::result::Result<R, E>
    where
        E: From<crate::HostError>,
    {
        self.push_target(container)?;
        let result = f(self);
        self.pop_target();
        result
    }

    /// Push a target without a closure; pair with [`BuildCx::pop_target`]
    pub fn push_target(&mut self, container: WidgetId) -> Result<()> {
        self.tree.ensure_container(container)?;
        self.targets.push(container);
        Ok(())
    }

    pub fn pop_target(&mut self) -> Option<WidgetId> {
        self.targets.pop()
    }

    /// Construct a widget under the active target
    pub fn insert(&mut self, kind: WidgetKind, attrs: WidgetAttrs) -> Result<WidgetId> {
        let parent = self.current();
        if parent.is_none() {
            tracing::debug!(?kind, "widget created with no active container");
        }
        self.tree.insert(kind, attrs, parent)
    }

    pub fn container(&mut self, kind: ContainerKind, attrs: WidgetAttrs) -> Result<WidgetId> {
        self.insert(WidgetKind::Container(kind), attrs)
    }

    pub fn vstack(&mut self) -> Result<WidgetId> {
        self.container(ContainerKind::VStack, WidgetAttrs::default())
    }

    pub fn hstack(&mut self) -> Result<WidgetId> {
        self.container(ContainerKind::HStack, WidgetAttrs::default())
    }

    pub fn zstack(&mut self) -> Result<WidgetId> {
        self.container(ContainerKind::ZStack, WidgetAttrs::default())
    }

    pub fn label(&mut self, text: impl Into<String>) -> Result<WidgetId> {
        self.insert(
            WidgetKind::Label { text: text.into() },
            WidgetAttrs::default(),
        )
    }

    pub fn button(&mut self, text: impl Into<String>, on_click: ClickHandler) -> Result<WidgetId> {
        let id = self.insert(
            WidgetKind::Button { text: text.into() },
            WidgetAttrs::default(),
        )?;
        self.tree.set_on_click(id, on_click)?;
        Ok(id)
    }

    pub fn spacer(&mut self) -> Result<WidgetId> {
        self.insert(WidgetKind::Spacer, WidgetAttrs::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HostError;
    use std::rc::Rc;

    #[test]
    fn test_widgets_attach_to_active_scope() {
        let mut tree = WidgetTree::new();
        let mut cx = BuildCx::new(&mut tree);

        let outer = cx.vstack().unwrap();
        let (inner, title) = cx
            .within(outer, |cx| {
                let title = cx.label("title")?;
                let inner = cx.hstack()?;
                cx.within(inner, |cx| {
                    cx.label("left")?;
                    cx.label("right")?;
                    Ok::<_, HostError>(())
                })?;
                Ok::<_, HostError>((inner, title))
            })
            .unwrap();

        assert_eq!(cx.depth(), 0);
        assert_eq!(cx.current(), None);
        assert_eq!(cx.tree().children(outer).unwrap(), &[title, inner]);
        assert_eq!(cx.tree().children(inner).unwrap().len(), 2);
    }

    #[test]
    fn test_scope_restored_after_error() {
        let mut tree = WidgetTree::new();
        let mut cx = BuildCx::new(&mut tree);
        let outer = cx.vstack().unwrap();

        let result: std::result::Result<(), HostError> = cx.within(outer, |cx| {
            let label = cx.label("x")?;
            // labels cannot host children
            cx.within(label, |_| Ok(()))
        });

        assert!(matches!(result, Err(HostError::NotAContainer(_))));
        assert_eq!(cx.depth(), 0);
    }

    #[test]
    fn test_no_scope_creates_top_level_widget() {
        let mut tree = WidgetTree::new();
        let mut cx = BuildCx::new(&mut tree);
        let label = cx.label("floating").unwrap();

        assert_eq!(cx.tree().top_level(), &[label]);
        assert_eq!(cx.tree().parent(label).unwrap(), None);
    }

    #[test]
    fn test_with_target_and_button() {
        let mut tree = WidgetTree::new();
        let host = tree
            .insert(
                WidgetKind::Container(ContainerKind::Frame),
                WidgetAttrs::default(),
                None,
            )
            .unwrap();

        let mut cx = BuildCx::with_target(&mut tree, host).unwrap();
        let button = cx
            .button(
                "ok",
                Rc::new(|_tree: &mut WidgetTree| -> anyhow::Result<()> { Ok(()) }),
            )
            .unwrap();

        assert_eq!(cx.current(), Some(host));
        assert_eq!(tree.parent(button).unwrap(), Some(host));
        assert_eq!(tree.text(button), Some("ok"));
    }
}
