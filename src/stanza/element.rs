//! Generic XML element tree used to represent stanzas.

use std::fmt;

/// A child node of an [`Element`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A nested element.
    Element(Element),
    /// Character data, stored unescaped.
    Text(String),
}

/// An XML element with ordered attributes and children.
///
/// Attribute order is preserved so that the canonical form written by
/// [`fmt::Display`] is deterministic for a given element. Writing recurses
/// once per nesting level; trees produced by [`crate::stanza::parse_element`]
/// are bounded by [`crate::stanza::MAX_ELEMENT_DEPTH`].
///
/// # Example
///
/// ```
/// use pigeonhole::stanza::Element;
///
/// let body = Element::new("body").with_text("Hi!");
/// let message = Element::new("message")
///     .with_attribute("id", "abc")
///     .with_child(body);
///
/// assert_eq!(message.to_string(), r#"<message id="abc"><body>Hi!</body></message>"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    /// Creates an empty element with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Returns the element name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sets an attribute, returning the updated element.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Sets an attribute, replacing any existing value in place.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let attribute_name = name.into();
        let attribute_value = value.into();
        match self
            .attributes
            .iter_mut()
            .find(|(existing, _)| *existing == attribute_name)
        {
            Some((_, slot)) => *slot = attribute_value,
            None => self.attributes.push((attribute_name, attribute_value)),
        }
    }

    /// Returns the value of the named attribute.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.as_str())
    }

    /// Returns all attributes in declaration order.
    #[must_use]
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Appends a child element, returning the updated element.
    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.push(Node::Element(child));
        self
    }

    /// Appends text, returning the updated element.
    ///
    /// Follows the same merging rules as [`Element::push`].
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.push(Node::Text(text.into()));
        self
    }

    /// Appends a child node.
    ///
    /// Text is kept in the form the canonical writer can reproduce: empty
    /// text is ignored and text following a text node is merged into it.
    pub fn push(&mut self, node: Node) {
        match node {
            Node::Text(text) if text.is_empty() => {}
            Node::Text(text) => match self.children.last_mut() {
                Some(Node::Text(previous)) => previous.push_str(&text),
                _ => self.children.push(Node::Text(text)),
            },
            element @ Node::Element(_) => self.children.push(element),
        }
    }

    /// Returns all child nodes.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.children
    }

    /// Iterates over child elements, skipping text.
    pub fn children(&self) -> impl Iterator<Item = &Self> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    /// Returns the first child element with the given name.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Self> {
        self.children().find(|child| child.name == name)
    }

    /// Returns the concatenated direct text content.
    #[must_use]
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                Node::Text(text) => Some(text.as_str()),
                Node::Element(_) => None,
            })
            .collect()
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.name)?;
        for (name, value) in &self.attributes {
            write!(f, " {name}=\"")?;
            write_escaped(f, value)?;
            f.write_str("\"")?;
        }
        if self.children.is_empty() {
            return f.write_str("/>");
        }
        f.write_str(">")?;
        for node in &self.children {
            match node {
                Node::Element(element) => write!(f, "{element}")?,
                Node::Text(text) => write_escaped(f, text)?,
            }
        }
        write!(f, "</{}>", self.name)
    }
}

fn write_escaped(f: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
    for character in value.chars() {
        match character {
            '&' => f.write_str("&amp;")?,
            '<' => f.write_str("&lt;")?,
            '>' => f.write_str("&gt;")?,
            '"' => f.write_str("&quot;")?,
            '\'' => f.write_str("&apos;")?,
            _ => write!(f, "{character}")?,
        }
    }
    Ok(())
}
