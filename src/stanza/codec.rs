//! Codec port translating stanzas to and from their stored text form.

use super::error::StanzaResult;
use super::message::Message;
use super::parser::parse_element;

/// Converts message stanzas to and from their canonical textual form.
pub trait StanzaCodec: Send + Sync {
    /// Serializes a message. Equal messages always encode to equal text.
    fn encode(&self, message: &Message) -> String;

    /// Parses text back into a message.
    ///
    /// # Errors
    ///
    /// Returns [`super::StanzaError`] for malformed or truncated input, or
    /// when the root element is not a message.
    fn decode(&self, text: &str) -> StanzaResult<Message>;
}

/// XML implementation of [`StanzaCodec`].
#[derive(Debug, Default, Clone, Copy)]
pub struct XmlCodec;

impl XmlCodec {
    /// Creates the codec.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl StanzaCodec for XmlCodec {
    fn encode(&self, message: &Message) -> String {
        message.to_string()
    }

    fn decode(&self, text: &str) -> StanzaResult<Message> {
        Message::try_from(parse_element(text)?)
    }
}
