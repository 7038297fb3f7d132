//! Structural events consumed by the minifier.
//!
//! An event sequence is what a push parser reports while walking a document:
//! opening tags, closing tags, text, comments and an optional document type
//! declaration. The producer guarantees well-formed nesting; the minifier does
//! not repair anything.

/// An attribute of an opening tag.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Attribute {
    /// Attribute name.
    pub name: String,
    /// Attribute value, empty when the attribute has no value.
    pub value: String,
}

impl Attribute {
    /// Create an attribute.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Create an attribute without value (e.g. `disabled`).
    pub fn bare(name: impl Into<String>) -> Self {
        Self::new(name, String::new())
    }
}

/// A structural event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Document type declaration, e.g. `<!DOCTYPE html>`.
    ///
    /// At most once, before every other event.
    Doctype(String),
    /// Opening tag.
    Open {
        /// Tag name.
        tag: String,
        /// Attributes, in source order.
        attributes: Vec<Attribute>,
    },
    /// A chunk of text. Consecutive chunks belong to the same text node.
    Text(String),
    /// Comment body, without `<!--` and `-->`.
    Comment(String),
    /// Closing tag.
    Close(String),
}

impl Event {
    /// Create an [`Event::Open`] event.
    pub fn open<I>(tag: impl Into<String>, attributes: I) -> Self
    where
        I: IntoIterator<Item = Attribute>,
    {
        Self::Open {
            tag: tag.into(),
            attributes: attributes.into_iter().collect(),
        }
    }

    /// Create an [`Event::Text`] event.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Create an [`Event::Comment`] event.
    pub fn comment(text: impl Into<String>) -> Self {
        Self::Comment(text.into())
    }

    /// Create an [`Event::Close`] event.
    pub fn close(tag: impl Into<String>) -> Self {
        Self::Close(tag.into())
    }
}
