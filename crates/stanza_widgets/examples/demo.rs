//! Component Demo
//!
//! Builds a small window out of components, drives it through clicks and
//! model updates, then tears it down. The widget tree is printed after each
//! step.
//!
//! Run with: RUST_LOG=debug cargo run -p stanza_widgets --example demo

use std::path::Path;

use anyhow::Result;
use stanza_core::RuntimeConfig;
use stanza_host::{BuildCx, WidgetKind, WidgetTree};
use stanza_widgets::prelude::*;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    RuntimeConfig::load_from_dir(Path::new("."))?.install()?;

    let mut tree = WidgetTree::new();
    let model = ModelStream::new();

    let window = BuildCx::new(&mut tree).vstack()?;
    let (greeting, counter, tags, panel) = {
        let mut cx = BuildCx::with_target(&mut tree, window)?;
        cx.label("Stanza demo")?;

        let greeting = CustomLabel::create(&mut cx, props! { "name" => "greeting" })?;
        let counter = ButtonCounter::create(
            &mut cx,
            props! {
                "on_change" => Callback::new(|value| tracing::info!(%value, "counter changed")),
            },
        )?;
        let tags = TagList::create(&mut cx, props! { "tags" => vec!["rust", "ui"] })?;
        let panel = ModelPanel::create(
            &mut cx,
            props! { "source" => PropValue::object(model.clone()), "title" => "Temperature" },
        )?;
        (greeting, counter, tags, panel)
    };
    println!("{tree}");

    greeting.borrow_mut().set_value("Hello again", &mut tree)?;
    tags.borrow_mut().add_tag("components", &mut tree)?;
    for _ in 0..2 {
        let root = counter.root()?.ok_or_else(|| anyhow::anyhow!("counter has no root"))?;
        let button = tree
            .children(root.id())?
            .iter()
            .copied()
            .find(|id| matches!(tree.get(*id).map(|node| &node.kind), Some(WidgetKind::Button { .. })));
        if let Some(button) = button {
            tree.click(button)?;
        }
    }
    model.emit(&mut tree, &21)?;
    println!("{tree}");

    // holders destroy what they created; the panel releases its own children
    let mut owned = Disposables::new();
    owned.push(greeting);
    owned.push(counter);
    owned.push(tags);
    owned.push(panel);
    owned.dispose_all()?;

    tracing::info!(subscribers = model.subscriber_count(), "torn down");
    Ok(())
}
