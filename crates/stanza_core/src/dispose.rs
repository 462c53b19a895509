//! Explicit teardown
//!
//! Components are never torn down by dropping them. Holders collect what
//! they own in a [`Disposables`] bag and dispose of it from their
//! `on_destroy()`, or wrap a single resource in a [`Scoped`] guard when a
//! lexical scope is the natural owner.

use std::ops::{Deref, DerefMut};

use stanza_host::Subscription;

use crate::component::{Component, ComponentExt, Lifecycle, Mounted};
use crate::error::Result;

/// Something that must be released explicitly
pub trait Disposable {
    fn dispose(&mut self) -> Result<()>;
}

impl Disposable for Subscription {
    fn dispose(&mut self) -> Result<()> {
        self.unsubscribe();
        Ok(())
    }
}

impl<C: Component> Disposable for Mounted<C> {
    /// Destroy the component unless something else already did
    fn dispose(&mut self) -> Result<()> {
        let mut component = self.try_borrow_mut()?;
        if component.lifecycle() == Lifecycle::Destroyed {
            return Ok(());
        }
        component.destroy()
    }
}

/// Ordered collection of resources released together
#[derive(Default)]
pub struct Disposables {
    items: Vec<Box<dyn Disposable>>,
}

impl Disposables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: impl Disposable + 'static) {
        self.items.push(Box::new(item));
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Dispose everything in reverse insertion order
    ///
    /// Every item is attempted; the first error is returned. The bag is
    /// empty afterwards.
    pub fn dispose_all(&mut self) -> Result<()> {
        let mut first_error = None;
        while let Some(mut item) = self.items.pop() {
            if let Err(err) = item.dispose() {
                tracing::warn!(error = %err, "dispose failed");
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

impl Disposable for Disposables {
    fn dispose(&mut self) -> Result<()> {
        self.dispose_all()
    }
}

impl std::fmt::Debug for Disposables {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Disposables")
            .field("len", &self.items.len())
            .finish()
    }
}

/// Guard that disposes its resource when it goes out of scope
///
/// Errors on drop cannot be returned, so they are logged. Call
/// [`Scoped::dispose`] to observe them instead.
pub struct Scoped<D: Disposable> {
    inner: Option<D>,
}

impl<D: Disposable> Scoped<D> {
    pub fn new(inner: D) -> Self {
        Self { inner: Some(inner) }
    }

    /// Release the resource now and report the outcome
    pub fn dispose(mut self) -> Result<()> {
        match self.inner.take() {
            Some(mut inner) => inner.dispose(),
            None => Ok(()),
        }
    }

    /// Give up the guard without disposing
    pub fn into_inner(mut self) -> Option<D> {
        self.inner.take()
    }
}

impl<D: Disposable> Deref for Scoped<D> {
    type Target = D;

    fn deref(&self) -> &D {
        // only emptied by methods that consume the guard
        self.inner.as_ref().unwrap_or_else(|| unreachable!())
    }
}

impl<D: Disposable> DerefMut for Scoped<D> {
    fn deref_mut(&mut self) -> &mut D {
        self.inner.as_mut().unwrap_or_else(|| unreachable!())
    }
}

impl<D: Disposable> Drop for Scoped<D> {
    fn drop(&mut self) {
        if let Some(mut inner) = self.inner.take() {
            if let Err(err) = inner.dispose() {
                tracing::error!(error = %err, "dispose on drop failed");
            }
        }
    }
}
