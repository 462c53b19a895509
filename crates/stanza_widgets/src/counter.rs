//! Click counter component

use stanza_core::prelude::*;
use stanza_host::{ContainerKind, WidgetTree};

/// A count display with an increment button
///
/// Each click increments `value`, reports the new count through `on_change`,
/// and rebuilds.
pub struct ButtonCounter {
    base: ComponentBase,
    pub value: i64,
    pub on_change: Option<Callback>,
}

impl ButtonCounter {
    pub fn increment(&mut self, tree: &mut WidgetTree) -> Result<()> {
        self.value += 1;
        tracing::trace!(value = self.value, "counter incremented");
        if let Some(on_change) = &self.on_change {
            on_change.call(self.value);
        }
        self.update(tree)
    }
}

impl Component for ButtonCounter {
    const NAME: &'static str = "ButtonCounter";
    const PROPS: &'static [PropDecl] = &[
        PropDecl::new("value", PropKind::Int, || PropValue::Int(0)),
        PropDecl::optional("on_change", PropKind::Callback),
    ];

    fn from_props(base: ComponentBase, props: &mut Props) -> Result<Self> {
        Ok(Self {
            base,
            value: props.take("value")?,
            on_change: props.take("on_change")?,
        })
    }

    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn render(&mut self, cx: &mut RenderCx<'_, '_>) -> Result<()> {
        let on_click = cx
            .link::<Self>()?
            .callback(|counter, tree| counter.increment(tree));

        cx.with_root(ContainerKind::HStack, RootOptions::new().spacing(4.0), |cx| {
            cx.label(format!("Count: {}", self.value))?;
            cx.button("+", on_click)?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stanza_host::{BuildCx, WidgetId, WidgetKind};

    fn button_of(tree: &WidgetTree, counter: &Mounted<ButtonCounter>) -> WidgetId {
        let root = counter.root().unwrap().unwrap();
        tree.children(root.id())
            .unwrap()
            .iter()
            .copied()
            .find(|id| matches!(tree.get(*id).unwrap().kind, WidgetKind::Button { .. }))
            .unwrap()
    }

    #[test]
    fn test_click_increments_and_rebuilds() {
        let mut tree = WidgetTree::new();
        let counter = ButtonCounter::create(&mut BuildCx::new(&mut tree), props! {}).unwrap();

        let button = button_of(&tree, &counter);
        tree.click(button).unwrap();

        assert_eq!(counter.borrow().value, 1);
        // the old button was disposed by the rebuild
        assert!(!tree.contains(button));

        let root = counter.root().unwrap().unwrap();
        let children = tree.children(root.id()).unwrap();
        assert_eq!(children.len(), 2);
        assert_eq!(tree.text(children[0]), Some("Count: 1"));
    }

    #[test]
    fn test_initial_value_override() {
        let mut tree = WidgetTree::new();
        let counter =
            ButtonCounter::create(&mut BuildCx::new(&mut tree), props! { "value" => 10 }).unwrap();
        counter.borrow_mut().increment(&mut tree).unwrap();
        assert_eq!(counter.borrow().value, 11);
    }

    #[test]
    fn test_click_after_destroy_fails() {
        let mut tree = WidgetTree::new();
        let counter = ButtonCounter::create(&mut BuildCx::new(&mut tree), props! {}).unwrap();
        let button = button_of(&tree, &counter);

        counter.destroy().unwrap();
        let err = tree.click(button).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ComponentError>(),
            Some(&ComponentError::UseAfterDestroy {
                class: "ButtonCounter"
            })
        );
        assert_eq!(counter.borrow().value, 0);
    }
}
