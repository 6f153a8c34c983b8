//! Stanza document model and codec.
//!
//! Offline messages are persisted in their serialized form and parsed back on
//! delivery. This module provides the pieces needed for that round trip:
//!
//! - [`Element`] and [`Node`]: a minimal ordered XML tree whose
//!   [`std::fmt::Display`] output is the canonical stored form
//! - [`Message`]: a validated `<message/>` stanza wrapper
//! - [`Jid`]: addressing, used to derive recipient keys
//! - [`StanzaCodec`]: the port consumed by the offline store, implemented by
//!   [`XmlCodec`]

mod codec;
mod element;
mod error;
mod jid;
mod message;
mod parser;

pub use codec::{StanzaCodec, XmlCodec};
pub use element::{Element, Node};
pub use error::{StanzaError, StanzaResult};
pub use jid::Jid;
pub use message::{Message, MessageBuilder};
pub use parser::{MAX_ELEMENT_DEPTH, parse_element};

#[cfg(test)]
mod tests;
