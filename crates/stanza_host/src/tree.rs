//! Retained widget tree
//!
//! Every widget the toolkit constructs lives in a single [`WidgetTree`] arena
//! and is addressed by a [`WidgetId`]. Containers own an ordered child list;
//! removing a widget disposes its whole subtree.

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use slotmap::{new_key_type, Key, SlotMap};
use smallvec::SmallVec;

use crate::error::{HostError, Result};

new_key_type! {
    pub struct WidgetId;
}

impl WidgetId {
    /// Convert to a raw u64 representation
    pub fn to_raw(self) -> u64 {
        self.data().as_ffi()
    }
}

/// Handler invoked when a button is clicked
///
/// The handler receives the tree mutably so it can rebuild UI in response.
pub type ClickHandler = Rc<dyn Fn(&mut WidgetTree) -> anyhow::Result<()>>;

/// Local style of a widget, keyed by style property name
pub type Style = IndexMap<String, String>;

/// Layout flavour of a container widget
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    /// Children laid out top to bottom
    VStack,
    /// Children laid out left to right
    HStack,
    /// Children layered on top of each other
    ZStack,
    /// Single-slot frame
    Frame,
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContainerKind::VStack => "VStack",
            ContainerKind::HStack => "HStack",
            ContainerKind::ZStack => "ZStack",
            ContainerKind::Frame => "Frame",
        };
        f.write_str(name)
    }
}

/// What a widget is
#[derive(Clone, Debug, PartialEq)]
pub enum WidgetKind {
    Container(ContainerKind),
    Label { text: String },
    Button { text: String },
    Spacer,
}

impl WidgetKind {
    pub fn is_container(&self) -> bool {
        matches!(self, WidgetKind::Container(_))
    }
}

/// Attributes shared by every widget
#[derive(Clone, Debug, PartialEq)]
pub struct WidgetAttrs {
    pub name: Option<String>,
    pub style: Option<Style>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    /// Overrides the type name used when looking up the style
    pub style_type_name_override: Option<String>,
    /// Gap between children (containers only)
    pub spacing: Option<f32>,
    pub visible: bool,
    pub enabled: bool,
}

impl Default for WidgetAttrs {
    fn default() -> Self {
        Self {
            name: None,
            style: None,
            width: None,
            height: None,
            style_type_name_override: None,
            spacing: None,
            visible: true,
            enabled: true,
        }
    }
}

/// A single node in the widget tree
pub struct WidgetNode {
    pub kind: WidgetKind,
    pub attrs: WidgetAttrs,
    parent: Option<WidgetId>,
    children: SmallVec<[WidgetId; 4]>,
    on_click: Option<ClickHandler>,
}

impl WidgetNode {
    pub fn parent(&self) -> Option<WidgetId> {
        self.parent
    }

    pub fn children(&self) -> &[WidgetId] {
        &self.children
    }
}

/// Arena owning every live widget
#[derive(Default)]
pub struct WidgetTree {
    nodes: SlotMap<WidgetId, WidgetNode>,
    /// Widgets created while no container was active, in creation order
    top_level: Vec<WidgetId>,
}

impl WidgetTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a widget as the last child of `parent`, or as a top-level
    /// widget when `parent` is `None`
    pub fn insert(
        &mut self,
        kind: WidgetKind,
        attrs: WidgetAttrs,
        parent: Option<WidgetId>,
    ) -> Result<WidgetId> {
        if let Some(parent) = parent {
            self.ensure_container(parent)?;
        }

        let id = self.nodes.insert(WidgetNode {
            kind,
            attrs,
            parent,
            children: SmallVec::new(),
            on_click: None,
        });

        match parent {
            Some(parent) => self.nodes[parent].children.push(id),
            None => self.top_level.push(id),
        }
        Ok(id)
    }

    /// Attach a click handler to a widget, replacing any previous one
    pub fn set_on_click(&mut self, id: WidgetId, handler: ClickHandler) -> Result<()> {
        self.node_mut(id)?.on_click = Some(handler);
        Ok(())
    }

    pub fn get(&self, id: WidgetId) -> Option<&WidgetNode> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: WidgetId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of live widgets
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Widgets that were created with no active container
    pub fn top_level(&self) -> &[WidgetId] {
        &self.top_level
    }

    pub fn children(&self, id: WidgetId) -> Result<&[WidgetId]> {
        Ok(&self.node(id)?.children)
    }

    pub fn parent(&self, id: WidgetId) -> Result<Option<WidgetId>> {
        Ok(self.node(id)?.parent)
    }

    /// Text shown by a label or button
    pub fn text(&self, id: WidgetId) -> Option<&str> {
        match &self.nodes.get(id)?.kind {
            WidgetKind::Label { text } | WidgetKind::Button { text } => Some(text),
            _ => None,
        }
    }

    pub fn set_text(&mut self, id: WidgetId, new_text: impl Into<String>) -> Result<()> {
        match &mut self.node_mut(id)?.kind {
            WidgetKind::Label { text } | WidgetKind::Button { text } => {
                *text = new_text.into();
            }
            _ => {}
        }
        Ok(())
    }

    pub fn set_visible(&mut self, id: WidgetId, visible: bool) -> Result<()> {
        self.node_mut(id)?.attrs.visible = visible;
        Ok(())
    }

    pub fn set_enabled(&mut self, id: WidgetId, enabled: bool) -> Result<()> {
        self.node_mut(id)?.attrs.enabled = enabled;
        Ok(())
    }

    /// First widget (depth-first, creation order) carrying the given name
    pub fn find_by_name(&self, name: &str) -> Option<WidgetId> {
        let mut stack: Vec<WidgetId> = self.top_level.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id];
            if node.attrs.name.as_deref() == Some(name) {
                return Some(id);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        None
    }

    /// Remove every child of a container, disposing their subtrees
    ///
    /// Returns the number of widgets disposed.
    pub fn clear_children(&mut self, container: WidgetId) -> Result<usize> {
        self.ensure_container(container)?;
        let children = std::mem::take(&mut self.nodes[container].children);
        let mut disposed = 0;
        for child in children {
            disposed += self.dispose_subtree(child);
        }
        tracing::trace!(?container, disposed, "cleared container");
        Ok(disposed)
    }

    /// Detach a widget from its parent and dispose its subtree
    pub fn remove(&mut self, id: WidgetId) -> Result<usize> {
        let parent = self.node(id)?.parent;
        match parent {
            Some(parent) => {
                if let Some(node) = self.nodes.get_mut(parent) {
                    node.children.retain(|child| *child != id);
                }
            }
            None => self.top_level.retain(|top| *top != id),
        }
        Ok(self.dispose_subtree(id))
    }

    /// Whether a widget and all of its ancestors are visible and enabled
    pub fn is_interactive(&self, id: WidgetId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let Some(node) = self.nodes.get(current) else {
                return false;
            };
            if !node.attrs.visible || !node.attrs.enabled {
                return false;
            }
            cursor = node.parent;
        }
        true
    }

    /// Simulate a click on a widget
    ///
    /// The handler is cloned out of the tree before it runs, so it may
    /// rebuild or dispose the clicked widget. Clicks on widgets that are
    /// hidden or disabled (directly or through an ancestor) are ignored.
    pub fn click(&mut self, id: WidgetId) -> anyhow::Result<()> {
        let handler = self.node(id)?.on_click.clone();
        let Some(handler) = handler else {
            return Ok(());
        };
        if !self.is_interactive(id) {
            tracing::trace!(?id, "click ignored on non-interactive widget");
            return Ok(());
        }
        handler(self)
    }

    fn node(&self, id: WidgetId) -> Result<&WidgetNode> {
        self.nodes.get(id).ok_or(HostError::UnknownWidget(id))
    }

    fn node_mut(&mut self, id: WidgetId) -> Result<&mut WidgetNode> {
        self.nodes.get_mut(id).ok_or(HostError::UnknownWidget(id))
    }

    pub(crate) fn ensure_container(&self, id: WidgetId) -> Result<()> {
        if self.node(id)?.kind.is_container() {
            Ok(())
        } else {
            Err(HostError::NotAContainer(id))
        }
    }

    fn dispose_subtree(&mut self, id: WidgetId) -> usize {
        let mut disposed = 0;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(current) {
                stack.extend(node.children);
                disposed += 1;
            }
        }
        disposed
    }

    fn fmt_node(&self, f: &mut fmt::Formatter<'_>, id: WidgetId, depth: usize) -> fmt::Result {
        let node = &self.nodes[id];
        write!(f, "{:indent$}", "", indent = depth * 2)?;
        match &node.kind {
            WidgetKind::Container(kind) => write!(f, "{kind}")?,
            WidgetKind::Label { text } => write!(f, "Label {text:?}")?,
            WidgetKind::Button { text } => write!(f, "Button {text:?}")?,
            WidgetKind::Spacer => f.write_str("Spacer")?,
        }
        if let Some(name) = &node.attrs.name {
            write!(f, " #{name}")?;
        }
        if !node.attrs.visible {
            f.write_str(" (hidden)")?;
        }
        if !node.attrs.enabled {
            f.write_str(" (disabled)")?;
        }
        writeln!(f)?;
        for child in &node.children {
            self.fmt_node(f, *child, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for WidgetTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for id in &self.top_level {
            self.fmt_node(f, *id, 0)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn vstack(tree: &mut WidgetTree, parent: Option<WidgetId>) -> WidgetId {
        tree.insert(
            WidgetKind::Container(ContainerKind::VStack),
            WidgetAttrs::default(),
            parent,
        )
        .unwrap()
    }

    fn label(tree: &mut WidgetTree, parent: WidgetId, text: &str) -> WidgetId {
        tree.insert(
            WidgetKind::Label { text: text.into() },
            WidgetAttrs::default(),
            Some(parent),
        )
        .unwrap()
    }

    #[test]
    fn test_insert_appends_in_order() {
        let mut tree = WidgetTree::new();
        let root = vstack(&mut tree, None);
        let a = label(&mut tree, root, "a");
        let b = label(&mut tree, root, "b");

        assert_eq!(tree.children(root).unwrap(), &[a, b]);
        assert_eq!(tree.parent(a).unwrap(), Some(root));
        assert_eq!(tree.top_level(), &[root]);
        assert_eq!(tree.text(b), Some("b"));
    }

    #[test]
    fn test_insert_under_label_fails() {
        let mut tree = WidgetTree::new();
        let root = vstack(&mut tree, None);
        let a = label(&mut tree, root, "a");

        let err = tree
            .insert(WidgetKind::Spacer, WidgetAttrs::default(), Some(a))
            .unwrap_err();
        assert_eq!(err, HostError::NotAContainer(a));
    }

    #[test]
    fn test_clear_children_disposes_subtree() {
        let mut tree = WidgetTree::new();
        let root = vstack(&mut tree, None);
        let inner = vstack(&mut tree, Some(root));
        let deep = label(&mut tree, inner, "deep");
        label(&mut tree, root, "shallow");

        let disposed = tree.clear_children(root).unwrap();
        assert_eq!(disposed, 3);
        assert!(tree.children(root).unwrap().is_empty());
        assert!(!tree.contains(deep));
        assert!(tree.contains(root));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_remove_detaches_from_parent() {
        let mut tree = WidgetTree::new();
        let root = vstack(&mut tree, None);
        let a = label(&mut tree, root, "a");
        let b = label(&mut tree, root, "b");

        assert_eq!(tree.remove(a).unwrap(), 1);
        assert_eq!(tree.children(root).unwrap(), &[b]);
        assert!(matches!(tree.remove(a), Err(HostError::UnknownWidget(_))));
    }

    #[test]
    fn test_click_respects_disabled_ancestor() {
        let mut tree = WidgetTree::new();
        let root = vstack(&mut tree, None);
        let button = tree
            .insert(
                WidgetKind::Button { text: "go".into() },
                WidgetAttrs::default(),
                Some(root),
            )
            .unwrap();

        let clicks = Rc::new(Cell::new(0));
        let counter = clicks.clone();
        tree.set_on_click(
            button,
            Rc::new(move |_tree: &mut WidgetTree| -> anyhow::Result<()> {
                counter.set(counter.get() + 1);
                Ok(())
            }),
        )
        .unwrap();

        tree.click(button).unwrap();
        tree.set_enabled(root, false).unwrap();
        tree.click(button).unwrap();
        assert_eq!(clicks.get(), 1);
    }

    #[test]
    fn test_click_handler_may_dispose_itself() {
        let mut tree = WidgetTree::new();
        let root = vstack(&mut tree, None);
        let button = tree
            .insert(
                WidgetKind::Button { text: "x".into() },
                WidgetAttrs::default(),
                Some(root),
            )
            .unwrap();
        tree.set_on_click(
            button,
            Rc::new(move |tree: &mut WidgetTree| -> anyhow::Result<()> {
                tree.clear_children(root)?;
                Ok(())
            }),
        )
        .unwrap();

        tree.click(button).unwrap();
        assert!(!tree.contains(button));
    }

    #[test]
    fn test_find_by_name_and_display() {
        let mut tree = WidgetTree::new();
        let root = tree
            .insert(
                WidgetKind::Container(ContainerKind::HStack),
                WidgetAttrs {
                    name: Some("toolbar".into()),
                    ..Default::default()
                },
                None,
            )
            .unwrap();
        label(&mut tree, root, "hi");

        assert_eq!(tree.find_by_name("toolbar"), Some(root));
        assert_eq!(tree.find_by_name("missing"), None);
        assert_eq!(tree.to_string(), "HStack #toolbar\n  Label \"hi\"\n");
    }
}
