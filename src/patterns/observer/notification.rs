//! The message value broadcast through a core.

use std::any::Any;
use std::fmt;

use crate::payload::Payload;

/// A named message with an optional body and an optional type tag.
///
/// The name is fixed at construction; body and type may be changed by whoever
/// holds the notification mutably before it is sent.
#[derive(Clone)]
pub struct Notification {
    name: String,
    body: Option<Payload>,
    kind: Option<String>,
}

impl Notification {
    /// Create a notification with just a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: None,
            kind: None,
        }
    }

    /// Create a notification from all three parts.
    pub fn with_parts(name: impl Into<String>, body: Option<Payload>, kind: Option<String>) -> Self {
        Self {
            name: name.into(),
            body,
            kind,
        }
    }

    /// Attach a body (builder pattern).
    pub fn with_body<T: Any + Send + Sync>(mut self, body: T) -> Self {
        self.body = Some(Payload::new(body));
        self
    }

    /// Attach a type tag (builder pattern).
    pub fn with_type(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// The notification name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The raw body payload, if any.
    pub fn payload(&self) -> Option<&Payload> {
        self.body.as_ref()
    }

    /// The body downcast to `T`. `None` when absent or of another type.
    pub fn body<T: Any>(&self) -> Option<&T> {
        self.body.as_ref().and_then(|b| b.downcast_ref::<T>())
    }

    /// Replace the body.
    pub fn set_body(&mut self, body: Option<Payload>) {
        self.body = body;
    }

    /// The type tag, if any.
    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    /// Replace the type tag.
    pub fn set_type(&mut self, kind: Option<String>) {
        self.kind = kind;
    }

    /// Human-readable rendering of name, body and type.
    ///
    /// Bodies are type-erased, so the body is rendered by its type name.
    pub fn description(&self) -> String {
        format!(
            "Notification Name: {}\nBody: {}\nType: {}",
            self.name,
            self.body.as_ref().map_or("null", |b| b.type_name()),
            self.kind.as_deref().unwrap_or("null"),
        )
    }
}

impl fmt::Debug for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notification")
            .field("name", &self.name)
            .field("body", &self.body)
            .field("type", &self.kind)
            .finish()
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description())
    }
}
