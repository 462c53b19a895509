//! Panel bound to an external model
//!
//! Shows the latest value published on a model stream and owns two
//! sub-components. It is the reference for the destroy chain: the stream
//! subscription and every child it created are released from
//! `on_destroy()`, and children from a previous render are destroyed before
//! a rebuild creates their replacements.

use std::rc::Rc;

use stanza_core::prelude::*;
use stanza_host::{ContainerKind, EventStream, Subscription, WidgetTree};

use crate::counter::ButtonCounter;
use crate::label::CustomLabel;

/// Stream type a [`ModelPanel`] listens to
pub type ModelStream = EventStream<i64>;

pub struct ModelPanel {
    base: ComponentBase,
    pub title: String,
    source: Rc<ModelStream>,
    /// Latest value received from the model
    pub value: i64,
    subscription: Option<Subscription>,
    children: Disposables,
    label: Option<Mounted<CustomLabel>>,
    counter: Option<Mounted<ButtonCounter>>,
}

impl ModelPanel {
    fn on_model_change(&mut self, value: i64, tree: &mut WidgetTree) -> Result<()> {
        tracing::debug!(value, "model changed");
        self.value = value;
        self.update(tree)
    }

    /// Label child from the latest render
    pub fn label(&self) -> Option<&Mounted<CustomLabel>> {
        self.label.as_ref()
    }

    /// Counter child from the latest render
    pub fn counter(&self) -> Option<&Mounted<ButtonCounter>> {
        self.counter.as_ref()
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.as_ref().is_some_and(Subscription::is_active)
    }
}

impl Component for ModelPanel {
    const NAME: &'static str = "ModelPanel";
    const PROPS: &'static [PropDecl] = &[
        PropDecl::required("source", PropKind::Object),
        PropDecl::new("title", PropKind::Str, || "Model".into()),
    ];

    fn from_props(base: ComponentBase, props: &mut Props) -> Result<Self> {
        Ok(Self {
            base,
            title: props.take("title")?,
            source: props.take_object("source")?,
            value: 0,
            subscription: None,
            children: Disposables::new(),
            label: None,
            counter: None,
        })
    }

    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn on_create(&mut self, link: Link<Self>) -> Result<()> {
        let subscription = self.source.subscribe(link.subscriber(
            |panel: &mut Self, value: &i64, tree: &mut WidgetTree| {
                panel.on_model_change(*value, tree)
            },
        ));
        self.subscription = Some(subscription);
        Ok(())
    }

    fn render(&mut self, cx: &mut RenderCx<'_, '_>) -> Result<()> {
        // widgets of the old children are gone already; retire the instances
        self.children.dispose_all()?;
        self.label = None;
        self.counter = None;

        cx.with_root(ContainerKind::VStack, RootOptions::new().spacing(8.0), |cx| {
            cx.label(format!("{}: {}", self.title, self.value))?;

            let label = CustomLabel::create(cx, props! { "value" => format!("value = {}", self.value) })?;
            let counter = ButtonCounter::create(cx, props! { "value" => self.value })?;

            self.children.push(label.clone());
            self.children.push(counter.clone());
            self.label = Some(label);
            self.counter = Some(counter);
            Ok(())
        })
    }

    fn on_destroy(&mut self) -> Result<()> {
        if let Some(mut subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
        self.label = None;
        self.counter = None;
        self.children.dispose_all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stanza_host::BuildCx;

    fn panel(tree: &mut WidgetTree, stream: &ModelStream) -> Mounted<ModelPanel> {
        ModelPanel::create(
            &mut BuildCx::new(tree),
            props! { "source" => PropValue::object(stream.clone()) },
        )
        .unwrap()
    }

    #[test]
    fn test_source_is_required() {
        let mut tree = WidgetTree::new();
        let err = ModelPanel::create(&mut BuildCx::new(&mut tree), props! {}).unwrap_err();
        assert_eq!(
            err,
            ComponentError::MissingRequiredProperty {
                class: "ModelPanel",
                property: "source".into(),
            }
        );
    }

    #[test]
    fn test_model_change_rebuilds_children() {
        let mut tree = WidgetTree::new();
        let stream = ModelStream::new();
        let panel = panel(&mut tree, &stream);

        let first_label = panel.borrow().label().unwrap().clone();
        stream.emit(&mut tree, &42).unwrap();

        let panel_ref = panel.borrow();
        assert_eq!(panel_ref.value, 42);
        assert_eq!(first_label.lifecycle().unwrap(), Lifecycle::Destroyed);

        let label = panel_ref.label().unwrap();
        assert!(!label.ptr_eq(&first_label));
        assert_eq!(label.borrow().value, "value = 42");
        assert_eq!(panel_ref.counter().unwrap().borrow().value, 42);

        let root = panel_ref.root().unwrap();
        assert_eq!(tree.children(root.id()).unwrap().len(), 3);
    }

    #[test]
    fn test_destroy_releases_subscription_and_children() {
        let mut tree = WidgetTree::new();
        let stream = ModelStream::new();
        let panel = panel(&mut tree, &stream);
        assert_eq!(stream.subscriber_count(), 1);

        let label = panel.borrow().label().unwrap().clone();
        let counter = panel.borrow().counter().unwrap().clone();
        panel.destroy().unwrap();

        assert_eq!(stream.subscriber_count(), 0);
        assert!(!panel.borrow().is_subscribed());
        assert_eq!(label.lifecycle().unwrap(), Lifecycle::Destroyed);
        assert_eq!(counter.lifecycle().unwrap(), Lifecycle::Destroyed);

        // nothing listens any more
        stream.emit(&mut tree, &7).unwrap();
        assert_eq!(panel.borrow().value, 0);
    }
}
