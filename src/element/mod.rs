//! Packet content model.
//!
//! An [`Element`] is a named node with attributes and an ordered list of
//! children, each either a nested element or literal text. A [`Packet`] binds
//! an element to the endpoint it will be transmitted on.

pub mod parser;

pub use parser::{parse_packet_line, ElementParser};

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::transport::Endpoint;

/// Root element name for one-way packets.
pub const MESSAGE: &str = "Message";
/// Root element name for packets expecting a reply.
pub const REQUEST: &str = "Request";
/// Root element name for replies to requests.
pub const REPLY: &str = "Reply";

/// A child of an element: either a nested element or literal text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Child {
    /// Literal text value.
    Text(String),
    /// Nested element.
    Element(Element),
}

/// A named node with attributes and ordered children.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    /// Element name.
    pub name: String,
    /// Attributes keyed by unique name.
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    /// Children in insertion order.
    #[serde(default)]
    pub children: Vec<Child>,
}

impl Element {
    /// Creates an element with no attributes or children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(key, value);
        self
    }

    /// Sets an attribute, replacing any previous value for the key.
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Returns the attribute value if present.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Returns the attribute value or `default` when absent.
    pub fn attribute_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.attribute(key).unwrap_or(default)
    }

    /// Appends a nested element.
    pub fn push_element(&mut self, child: Element) {
        self.children.push(Child::Element(child));
    }

    /// Appends a literal text child.
    pub fn push_text(&mut self, text: impl Into<String>) {
        self.children.push(Child::Text(text.into()));
    }

    /// Returns true for `Request` roots.
    pub fn is_request(&self) -> bool {
        self.name == REQUEST
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.name)?;
        for (key, value) in &self.attributes {
            write!(f, " {}=\"{}\"", key, escape(value))?;
        }
        if self.children.is_empty() {
            return write!(f, " />");
        }
        write!(f, ">")?;
        for child in &self.children {
            match child {
                Child::Text(text) => write!(f, "{}", escape(text))?,
                Child::Element(element) => write!(f, "{}", element)?,
            }
        }
        write!(f, "</{}>", self.name)
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// An element bound to the endpoint it will be transmitted on.
pub struct Packet<'a> {
    endpoint: &'a dyn Endpoint,
    element: Element,
}

impl<'a> Packet<'a> {
    /// Binds an element to an endpoint.
    pub fn new(endpoint: &'a dyn Endpoint, element: Element) -> Self {
        Self { endpoint, element }
    }

    /// The packet content.
    pub fn element(&self) -> &Element {
        &self.element
    }

    /// Returns true if the packet expects a reply.
    pub fn is_request(&self) -> bool {
        self.element.is_request()
    }

    /// Sends the packet without waiting for a reply.
    pub async fn send(self) -> Result<()> {
        self.endpoint.send(&self.element).await
    }

    /// Submits the packet and waits up to `timeout` for the correlated reply.
    pub async fn submit(self, timeout: Duration) -> Result<Element> {
        self.endpoint.submit(self.element, timeout).await
    }
}

impl fmt::Display for Packet<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.element, f)
    }
}
