//! Message stanza wrapper.

use std::fmt;

use uuid::Uuid;

use super::element::Element;
use super::error::{StanzaError, StanzaResult};
use super::jid::Jid;

const MESSAGE_NAME: &str = "message";

/// Message types that the archive policy treats as conversational.
const ARCHIVABLE_TYPES: [&str; 2] = ["normal", "chat"];

/// A `<message/>` stanza.
///
/// The wrapper guarantees the root element is named `message` and otherwise
/// leaves the element untouched, so converting back with
/// [`Message::into_element`] yields exactly what was wrapped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    element: Element,
}

impl Message {
    /// Starts building a new message stanza.
    #[must_use]
    pub fn builder() -> MessageBuilder {
        MessageBuilder::default()
    }

    /// Wraps a parsed element, stamping the given routing addresses on it.
    ///
    /// # Errors
    ///
    /// Returns [`StanzaError::UnexpectedRoot`] when the element is not a
    /// `message`.
    pub fn from_element_with_routing(element: Element, from: &Jid, to: &Jid) -> StanzaResult<Self> {
        let mut message = Self::try_from(element)?;
        message.element.set_attribute("from", from.to_string());
        message.element.set_attribute("to", to.to_string());
        Ok(message)
    }

    /// Returns the stanza identifier.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.element.attribute("id")
    }

    /// Returns the raw `from` address.
    #[must_use]
    pub fn from(&self) -> Option<&str> {
        self.element.attribute("from")
    }

    /// Returns the raw `to` address.
    #[must_use]
    pub fn to(&self) -> Option<&str> {
        self.element.attribute("to")
    }

    /// Returns the message type, defaulting to `normal`.
    #[must_use]
    pub fn message_type(&self) -> &str {
        self.element.attribute("type").unwrap_or("normal")
    }

    /// Returns the body text when a `<body/>` child is present.
    #[must_use]
    pub fn body(&self) -> Option<String> {
        self.element.child("body").map(Element::text)
    }

    /// Returns `true` for `normal` or `chat` messages carrying a body.
    #[must_use]
    pub fn is_archivable(&self) -> bool {
        ARCHIVABLE_TYPES.contains(&self.message_type()) && self.element.child("body").is_some()
    }

    /// Returns the message with an extra child element appended.
    #[must_use]
    pub fn with_child(self, child: Element) -> Self {
        Self {
            element: self.element.with_child(child),
        }
    }

    /// Returns the underlying element.
    #[must_use]
    pub const fn element(&self) -> &Element {
        &self.element
    }

    /// Consumes the wrapper and returns the underlying element.
    #[must_use]
    pub fn into_element(self) -> Element {
        self.element
    }
}

impl TryFrom<Element> for Message {
    type Error = StanzaError;

    fn try_from(element: Element) -> Result<Self, Self::Error> {
        if element.name() != MESSAGE_NAME {
            return Err(StanzaError::UnexpectedRoot {
                expected: MESSAGE_NAME,
                found: element.name().to_owned(),
            });
        }
        Ok(Self { element })
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.element.fmt(f)
    }
}

/// Builder for [`Message`] stanzas.
///
/// A UUID v4 identifier is assigned when no explicit id is set.
#[derive(Debug, Clone, Default)]
pub struct MessageBuilder {
    id: Option<String>,
    from: Option<Jid>,
    to: Option<Jid>,
    message_type: Option<String>,
    body: Option<String>,
    extensions: Vec<Element>,
}

impl MessageBuilder {
    /// Sets the stanza identifier.
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets the sender address.
    #[must_use]
    pub fn from(mut self, from: Jid) -> Self {
        self.from = Some(from);
        self
    }

    /// Sets the recipient address.
    #[must_use]
    pub fn to(mut self, to: Jid) -> Self {
        self.to = Some(to);
        self
    }

    /// Sets the message type (`chat`, `groupchat`, `headline`, ...).
    #[must_use]
    pub fn message_type(mut self, message_type: impl Into<String>) -> Self {
        self.message_type = Some(message_type.into());
        self
    }

    /// Sets the body text.
    #[must_use]
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Appends an extension element after the body.
    #[must_use]
    pub fn extension(mut self, element: Element) -> Self {
        self.extensions.push(element);
        self
    }

    /// Builds the message stanza.
    #[must_use]
    pub fn build(self) -> Message {
        let id = self.id.unwrap_or_else(|| Uuid::new_v4().to_string());
        let mut element = Element::new(MESSAGE_NAME).with_attribute("id", id);
        if let Some(from) = self.from {
            element.set_attribute("from", from.to_string());
        }
        if let Some(to) = self.to {
            element.set_attribute("to", to.to_string());
        }
        if let Some(message_type) = self.message_type {
            element.set_attribute("type", message_type);
        }
        if let Some(body) = self.body {
            element = element.with_child(Element::new("body").with_text(body));
        }
        for extension in self.extensions {
            element = element.with_child(extension);
        }
        Message { element }
    }
}
