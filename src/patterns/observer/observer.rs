//! Callback + weak context pairs registered with the [`View`](crate::View).

use std::fmt;
use std::sync::{Arc, Weak};

use crate::error::{MvcError, Result};

use super::notification::Notification;

/// Type-erased pairing of a weak context and the callback to run against it.
trait Subscriber: Send + Sync {
    fn notify(&self, notification: &Notification) -> Result<()>;
    fn context_addr(&self) -> usize;
    fn is_alive(&self) -> bool;
}

struct Bound<C: ?Sized, F> {
    context: Weak<C>,
    callback: F,
}

impl<C, F> Subscriber for Bound<C, F>
where
    C: ?Sized + Send + Sync + 'static,
    F: Fn(&C, &Notification) -> Result<()> + Send + Sync + 'static,
{
    fn notify(&self, notification: &Notification) -> Result<()> {
        match self.context.upgrade() {
            Some(context) => (self.callback)(&context, notification),
            None => {
                log::trace!(
                    "[Observer] context released; skipping `{}`",
                    notification.name()
                );
                Ok(())
            }
        }
    }

    fn context_addr(&self) -> usize {
        Weak::as_ptr(&self.context) as *const () as usize
    }

    fn is_alive(&self) -> bool {
        self.context.strong_count() > 0
    }
}

/// A callback bound to a context object that it never keeps alive.
///
/// Once the context is dropped the observer becomes a harmless dead entry:
/// [`notify_observer`](Self::notify_observer) does nothing. Two observers are
/// considered the same, for removal purposes, when their contexts are the
/// same object.
#[derive(Clone)]
pub struct Observer {
    inner: Arc<dyn Subscriber>,
}

impl Observer {
    /// Bind `notify` to `context`.
    ///
    /// Errors returned by `notify` reach the sender wrapped in
    /// [`MvcError::Observer`].
    pub fn new<C, F>(context: &Arc<C>, notify: F) -> Self
    where
        C: ?Sized + Send + Sync + 'static,
        F: Fn(&C, &Notification) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self::from_weak(Arc::downgrade(context), move |ctx: &C, note: &Notification| {
            notify(ctx, note).map_err(|source| MvcError::Observer {
                notification: note.name().to_string(),
                source,
            })
        })
    }

    /// Bind a callback that already speaks the crate's error type.
    pub(crate) fn from_weak<C, F>(context: Weak<C>, notify: F) -> Self
    where
        C: ?Sized + Send + Sync + 'static,
        F: Fn(&C, &Notification) -> Result<()> + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(Bound {
                context,
                callback: notify,
            }),
        }
    }

    /// Invoke the callback with the live context, or do nothing if it is gone.
    pub fn notify_observer(&self, notification: &Notification) -> Result<()> {
        self.inner.notify(notification)
    }

    /// Whether `context` is the object this observer is bound to.
    ///
    /// Pass the object itself (`&*arc`), not a reference to its `Arc`.
    pub fn compare_context<C: ?Sized>(&self, context: &C) -> bool {
        self.inner.context_addr() == context as *const C as *const () as usize
    }

    /// Whether the context is still alive.
    pub fn is_alive(&self) -> bool {
        self.inner.is_alive()
    }
}

impl fmt::Debug for Observer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observer")
            .field("context", &format_args!("{:#x}", self.inner.context_addr()))
            .field("alive", &self.is_alive())
            .finish()
    }
}
