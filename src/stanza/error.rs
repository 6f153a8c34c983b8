//! Error types for stanza parsing and construction.

use thiserror::Error;

/// Result type for stanza operations.
pub type StanzaResult<T> = Result<T, StanzaError>;

/// Errors returned while parsing or building stanza documents.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StanzaError {
    /// The input contained no element.
    #[error("stanza input cannot be empty")]
    EmptyInput,

    /// The input ended before the root element was closed.
    #[error("unexpected end of input: unterminated element '{0}'")]
    UnterminatedElement(String),

    /// The input ended in the middle of a tag.
    #[error("unexpected end of input inside a tag")]
    UnexpectedEof,

    /// A character appeared where the grammar does not allow it.
    #[error("unexpected character '{found}' at offset {offset}")]
    UnexpectedCharacter {
        /// The offending character.
        found: char,
        /// Byte offset of the character in the input.
        offset: usize,
    },

    /// A closing tag did not match the open element.
    #[error("mismatched closing tag: expected '{expected}', found '{found}'")]
    MismatchedClosingTag {
        /// Name of the element being closed.
        expected: String,
        /// Name found in the closing tag.
        found: String,
    },

    /// An element or attribute name is not a valid XML name.
    #[error("invalid name '{0}'")]
    InvalidName(String),

    /// An entity or character reference could not be resolved.
    #[error("invalid entity reference '&{0};'")]
    InvalidEntity(String),

    /// An attribute was declared twice on the same element.
    #[error("duplicate attribute '{attribute}' on element '{element}'")]
    DuplicateAttribute {
        /// Element carrying the attribute.
        element: String,
        /// Repeated attribute name.
        attribute: String,
    },

    /// Elements nest deeper than the parser accepts.
    #[error("element nesting exceeds {limit} levels")]
    TooDeep {
        /// Maximum accepted depth, counting the root.
        limit: usize,
    },

    /// Non-whitespace content followed the root element.
    #[error("trailing content after root element at offset {0}")]
    TrailingContent(usize),

    /// The root element is not the expected stanza kind.
    #[error("expected a '{expected}' stanza, found '{found}'")]
    UnexpectedRoot {
        /// Expected root element name.
        expected: &'static str,
        /// Root element name that was found.
        found: String,
    },

    /// A JID could not be parsed.
    #[error("invalid JID '{jid}': {reason}")]
    InvalidJid {
        /// The raw JID text.
        jid: String,
        /// Why the JID was rejected.
        reason: &'static str,
    },
}

impl StanzaError {
    pub(crate) fn invalid_jid(jid: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidJid {
            jid: jid.into(),
            reason,
        }
    }
}
