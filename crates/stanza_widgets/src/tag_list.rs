//! Tag list component

use stanza_core::prelude::*;
use stanza_host::{ContainerKind, WidgetTree};

/// A vertical list of tags, one label each
///
/// The `tags` default is a fresh empty list for every instance.
pub struct TagList {
    base: ComponentBase,
    pub tags: Vec<String>,
}

impl TagList {
    pub fn add_tag(&mut self, tag: impl Into<String>, tree: &mut WidgetTree) -> Result<()> {
        self.tags.push(tag.into());
        self.update(tree)
    }

    pub fn clear(&mut self, tree: &mut WidgetTree) -> Result<()> {
        self.tags.clear();
        self.update(tree)
    }
}

impl Component for TagList {
    const NAME: &'static str = "TagList";
    const PROPS: &'static [PropDecl] = &[PropDecl::new("tags", PropKind::List, || {
        PropValue::List(Vec::new())
    })];

    fn from_props(base: ComponentBase, props: &mut Props) -> Result<Self> {
        let tags = props
            .take::<Vec<PropValue>>("tags")?
            .into_iter()
            .map(|tag| tag.to_string())
            .collect();
        Ok(Self { base, tags })
    }

    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn render(&mut self, cx: &mut RenderCx<'_, '_>) -> Result<()> {
        cx.with_root(ContainerKind::VStack, RootOptions::new(), |cx| {
            if self.tags.is_empty() {
                cx.label("(no tags)")?;
            }
            for tag in &self.tags {
                cx.label(format!("#{tag}"))?;
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stanza_host::BuildCx;

    fn labels(tree: &WidgetTree, list: &Mounted<TagList>) -> Vec<String> {
        let root = list.root().unwrap().unwrap();
        tree.children(root.id())
            .unwrap()
            .iter()
            .filter_map(|id| tree.text(*id).map(str::to_string))
            .collect()
    }

    #[test]
    fn test_initial_tags() {
        let mut tree = WidgetTree::new();
        let list = TagList::create(
            &mut BuildCx::new(&mut tree),
            props! { "tags" => vec!["rust", "ui"] },
        )
        .unwrap();
        assert_eq!(labels(&tree, &list), vec!["#rust", "#ui"]);
    }

    #[test]
    fn test_add_and_clear() {
        let mut tree = WidgetTree::new();
        let list = TagList::create(&mut BuildCx::new(&mut tree), props! {}).unwrap();
        assert_eq!(labels(&tree, &list), vec!["(no tags)"]);

        list.borrow_mut().add_tag("one", &mut tree).unwrap();
        list.borrow_mut().add_tag("two", &mut tree).unwrap();
        assert_eq!(labels(&tree, &list), vec!["#one", "#two"]);

        list.borrow_mut().clear(&mut tree).unwrap();
        assert_eq!(labels(&tree, &list), vec!["(no tags)"]);
    }
}
