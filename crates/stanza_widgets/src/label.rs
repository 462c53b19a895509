//! Text label component

use stanza_core::prelude::*;
use stanza_host::{ContainerKind, WidgetTree};

/// A single line of text inside a vertical stack
///
/// ```ignore
/// let label = CustomLabel::create(&mut cx, props! { "value" => "Hi" })?;
/// label.borrow_mut().set_value("Bye", &mut tree)?;
/// ```
pub struct CustomLabel {
    base: ComponentBase,
    /// Displayed text
    pub value: String,
}

impl CustomLabel {
    /// Replace the text and rebuild
    pub fn set_value(&mut self, value: impl Into<String>, tree: &mut WidgetTree) -> Result<()> {
        self.value = value.into();
        self.update(tree)
    }
}

impl Component for CustomLabel {
    const NAME: &'static str = "CustomLabel";
    const PROPS: &'static [PropDecl] =
        &[PropDecl::new("value", PropKind::Str, || "Hello World".into())];

    fn from_props(base: ComponentBase, props: &mut Props) -> Result<Self> {
        Ok(Self {
            base,
            value: props.take("value")?,
        })
    }

    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn render(&mut self, cx: &mut RenderCx<'_, '_>) -> Result<()> {
        cx.with_root(ContainerKind::VStack, RootOptions::new(), |cx| {
            cx.label(self.value.as_str())?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stanza_host::BuildCx;

    #[test]
    fn test_default_value() {
        let mut tree = WidgetTree::new();
        let label = CustomLabel::create(&mut BuildCx::new(&mut tree), props! {}).unwrap();
        assert_eq!(label.borrow().value, "Hello World");
    }

    #[test]
    fn test_override_value() {
        let mut tree = WidgetTree::new();
        let label =
            CustomLabel::create(&mut BuildCx::new(&mut tree), props! { "value" => "Hi" }).unwrap();
        assert_eq!(label.borrow().value, "Hi");

        let root = label.root().unwrap().unwrap();
        let children = tree.children(root.id()).unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(tree.text(children[0]), Some("Hi"));
    }

    #[test]
    fn test_set_value_rebuilds() {
        let mut tree = WidgetTree::new();
        let label = CustomLabel::create(&mut BuildCx::new(&mut tree), props! {}).unwrap();
        label.borrow_mut().set_value("Bye", &mut tree).unwrap();

        let root = label.root().unwrap().unwrap();
        let children = tree.children(root.id()).unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(tree.text(children[0]), Some("Bye"));
    }
}
