//! Parser for serialized stanza documents.
//!
//! Accepts the subset of XML that stanzas use: elements, single- or
//! double-quoted attributes, character data, the five predefined entities,
//! numeric character references, and an optional leading `<?xml ...?>`
//! declaration. Comments, CDATA sections, and DTDs are rejected.

use std::iter::Peekable;
use std::str::CharIndices;

use super::element::{Element, Node};
use super::error::{StanzaError, StanzaResult};

/// Deepest element nesting accepted by [`parse_element`], counting the root.
pub const MAX_ELEMENT_DEPTH: usize = 256;

/// Parses a single root element from `input`.
///
/// # Errors
///
/// Returns [`StanzaError`] when the input is empty, truncated, or not
/// well-formed, and [`StanzaError::TooDeep`] when elements nest deeper than
/// [`MAX_ELEMENT_DEPTH`].
pub fn parse_element(input: &str) -> StanzaResult<Element> {
    let mut cursor = Cursor::new(input);
    cursor.skip_whitespace();
    if cursor.peek().is_none() {
        return Err(StanzaError::EmptyInput);
    }

    cursor.expect('<')?;
    if cursor.peek() == Some('?') {
        cursor.skip_declaration()?;
        cursor.skip_whitespace();
        cursor.expect('<')?;
    }
    let root = parse_element_body(&mut cursor, 1)?;

    cursor.skip_whitespace();
    if cursor.peek().is_some() {
        return Err(StanzaError::TrailingContent(cursor.offset()));
    }
    Ok(root)
}

struct Cursor<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, character)| character)
    }

    fn offset(&mut self) -> usize {
        self.chars
            .peek()
            .map_or(self.input.len(), |&(offset, _)| offset)
    }

    fn bump(&mut self) -> Option<char> {
        self.chars.next().map(|(_, character)| character)
    }

    fn expect(&mut self, expected: char) -> StanzaResult<()> {
        let offset = self.offset();
        match self.bump() {
            Some(found) if found == expected => Ok(()),
            Some(found) => Err(StanzaError::UnexpectedCharacter { found, offset }),
            None => Err(StanzaError::UnexpectedEof),
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn skip_declaration(&mut self) -> StanzaResult<()> {
        let mut previous = '\0';
        while let Some(character) = self.bump() {
            if previous == '?' && character == '>' {
                return Ok(());
            }
            previous = character;
        }
        Err(StanzaError::UnexpectedEof)
    }

    fn read_name(&mut self) -> StanzaResult<String> {
        let mut name = String::new();
        while let Some(character) = self.peek() {
            if character.is_whitespace() || matches!(character, '/' | '>' | '=' | '<' | '\'' | '"')
            {
                break;
            }
            name.push(character);
            self.bump();
        }
        if !is_valid_name(&name) {
            if name.is_empty() {
                return match self.peek() {
                    Some(found) => Err(StanzaError::UnexpectedCharacter {
                        found,
                        offset: self.offset(),
                    }),
                    None => Err(StanzaError::UnexpectedEof),
                };
            }
            return Err(StanzaError::InvalidName(name));
        }
        Ok(name)
    }

    fn read_until(&mut self, terminator: char) -> Option<String> {
        let mut raw = String::new();
        loop {
            match self.bump()? {
                character if character == terminator => return Some(raw),
                character => raw.push(character),
            }
        }
    }
}

/// Parses an element whose opening `<` has already been consumed.
///
/// `depth` is the nesting level of this element, the root being 1.
fn parse_element_body(cursor: &mut Cursor<'_>, depth: usize) -> StanzaResult<Element> {
    let name = cursor.read_name()?;
    let mut element = Element::new(name.clone());

    loop {
        cursor.skip_whitespace();
        match cursor.peek() {
            None => return Err(StanzaError::UnexpectedEof),
            Some('/') => {
                cursor.bump();
                cursor.expect('>')?;
                return Ok(element);
            }
            Some('>') => {
                cursor.bump();
                break;
            }
            Some(_) => parse_attribute(cursor, &mut element)?,
        }
    }

    let mut children = Vec::new();
    let mut text = String::new();
    loop {
        match cursor.peek() {
            None => return Err(StanzaError::UnterminatedElement(name)),
            Some('<') => {
                cursor.bump();
                flush_text(&mut children, &mut text);
                match cursor.peek() {
                    Some('/') => {
                        cursor.bump();
                        let closing = cursor.read_name()?;
                        cursor.skip_whitespace();
                        cursor.expect('>')?;
                        if closing != name {
                            return Err(StanzaError::MismatchedClosingTag {
                                expected: name,
                                found: closing,
                            });
                        }
                        return Ok(attach_children(element, children));
                    }
                    Some(found @ ('!' | '?')) => {
                        return Err(StanzaError::UnexpectedCharacter {
                            found,
                            offset: cursor.offset(),
                        });
                    }
                    Some(_) => {
                        if depth >= MAX_ELEMENT_DEPTH {
                            return Err(StanzaError::TooDeep {
                                limit: MAX_ELEMENT_DEPTH,
                            });
                        }
                        let child = parse_element_body(cursor, depth + 1)?;
                        children.push(Node::Element(child));
                    }
                    None => return Err(StanzaError::UnterminatedElement(name)),
                }
            }
            Some(_) => {
                let mut raw = String::new();
                while let Some(character) = cursor.peek() {
                    if character == '<' {
                        break;
                    }
                    raw.push(character);
                    cursor.bump();
                }
                text.push_str(&unescape(&raw)?);
            }
        }
    }
}

fn parse_attribute(cursor: &mut Cursor<'_>, element: &mut Element) -> StanzaResult<()> {
    let attribute = cursor.read_name()?;
    cursor.skip_whitespace();
    cursor.expect('=')?;
    cursor.skip_whitespace();

    let offset = cursor.offset();
    let quote = match cursor.bump() {
        Some(quote @ ('\'' | '"')) => quote,
        Some(found) => return Err(StanzaError::UnexpectedCharacter { found, offset }),
        None => return Err(StanzaError::UnexpectedEof),
    };
    let raw = cursor.read_until(quote).ok_or(StanzaError::UnexpectedEof)?;

    if element.attribute(&attribute).is_some() {
        return Err(StanzaError::DuplicateAttribute {
            element: element.name().to_owned(),
            attribute,
        });
    }
    element.set_attribute(attribute, unescape(&raw)?);
    Ok(())
}

fn flush_text(children: &mut Vec<Node>, text: &mut String) {
    if !text.is_empty() {
        children.push(Node::Text(std::mem::take(text)));
    }
}

/// Whitespace-only text beside child elements is indentation and is dropped.
/// When text is all an element holds, it is content and is kept as is.
fn attach_children(mut element: Element, children: Vec<Node>) -> Element {
    let has_elements = children
        .iter()
        .any(|node| matches!(node, Node::Element(_)));
    for node in children {
        let indentation =
            has_elements && matches!(&node, Node::Text(text) if text.trim().is_empty());
        if !indentation {
            element.push(node);
        }
    }
    element
}

fn unescape(raw: &str) -> StanzaResult<String> {
    if !raw.contains('&') {
        return Ok(raw.to_owned());
    }

    let mut output = String::with_capacity(raw.len());
    let mut characters = raw.chars();
    while let Some(character) = characters.next() {
        if character != '&' {
            output.push(character);
            continue;
        }

        let mut reference = String::new();
        let mut terminated = false;
        for next in characters.by_ref() {
            if next == ';' {
                terminated = true;
                break;
            }
            reference.push(next);
        }
        if !terminated {
            return Err(StanzaError::InvalidEntity(reference));
        }
        output.push(resolve_reference(&reference)?);
    }
    Ok(output)
}

fn resolve_reference(reference: &str) -> StanzaResult<char> {
    let resolved = match reference {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => reference
            .strip_prefix("#x")
            .or_else(|| reference.strip_prefix("#X"))
            .map(|hex| u32::from_str_radix(hex, 16))
            .or_else(|| reference.strip_prefix('#').map(str::parse::<u32>))
            .and_then(Result::ok)
            .and_then(char::from_u32),
    };
    resolved.ok_or_else(|| StanzaError::InvalidEntity(reference.to_owned()))
}

fn is_valid_name(name: &str) -> bool {
    let mut characters = name.chars();
    let Some(first) = characters.next() else {
        return false;
    };
    (first.is_alphabetic() || matches!(first, '_' | ':'))
        && characters.all(|character| {
            character.is_alphanumeric() || matches!(character, '_' | ':' | '-' | '.')
        })
}
