//! Recursive-descent parser from packet lines to element trees.
//!
//! Grammar over the token stream:
//!
//! ```text
//! command       := TYPE attr-or-child*
//! attr-or-child := NAME=VALUE | '<' child-spec | "quoted" | bare
//! child-spec    := childname attr-or-child* '>'
//! ```
//!
//! A leading `?` on the line makes the root a `Request`, otherwise it is a
//! `Message`. The type token becomes the root's `Type` attribute.

use super::{Element, MESSAGE, REQUEST};
use crate::commands::tokenizer::tokenize_line;
use crate::error::ParseError;

/// Parses a packet line into its root element.
///
/// `ping host=a <opt level=2 "x y" >` becomes
/// `<Message Type="ping" host="a"><opt level="2">x y</opt></Message>`.
pub fn parse_packet_line(line: &str) -> Result<Element, ParseError> {
    let mut command = line.trim();
    let mut root_name = MESSAGE;

    if let Some(rest) = command.strip_prefix('?') {
        root_name = REQUEST;
        command = rest.trim_start();
    }

    let tokens = tokenize_line(command)?;
    let mut parser = ElementParser::new(tokens);
    parser.parse_command(root_name)
}

/// Parser state: the token list and a cursor into it.
#[derive(Debug)]
pub struct ElementParser {
    tokens: Vec<String>,
    pos: usize,
}

impl ElementParser {
    /// Creates a parser positioned at the first token.
    pub fn new(tokens: Vec<String>) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Current cursor position.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Parses `TYPE attr-or-child*` into a root element named `root_name`.
    ///
    /// All tokens must be consumed; a stray `>` is rejected.
    pub fn parse_command(&mut self, root_name: &str) -> Result<Element, ParseError> {
        let command_type = self.next().ok_or(ParseError::MissingCommandType)?;

        let mut root = Element::new(root_name).with_attribute("Type", command_type);
        self.parse_contents(&mut root)?;

        if self.peek().is_some() {
            return Err(ParseError::UnexpectedChildClose);
        }
        Ok(root)
    }

    /// Parses attributes and children into `element` until `>` or end of input.
    ///
    /// The closing `>` is left for the caller to consume.
    fn parse_contents(&mut self, element: &mut Element) -> Result<(), ParseError> {
        while let Some(token) = self.peek() {
            if token == ">" {
                break;
            }
            let token = token.to_string();
            self.pos += 1;

            if let Some(name) = token.strip_prefix('<') {
                let child = self.parse_child(name)?;
                element.push_element(child);
            } else if token.starts_with('"') {
                element.push_text(strip_quotes(&token)?);
            } else if let Some((key, value)) = token.split_once('=') {
                let value = if value.starts_with('"') {
                    strip_quotes(value)?
                } else {
                    value.to_string()
                };
                element.set_attribute(key, value);
            } else {
                element.push_text(token);
            }
        }
        Ok(())
    }

    /// Parses a child element after its `<` token.
    ///
    /// `attached` is whatever followed `<` in the same token; when empty, the
    /// next token names the child.
    fn parse_child(&mut self, attached: &str) -> Result<Element, ParseError> {
        let name = if attached.is_empty() {
            self.next().ok_or(ParseError::MissingChildName)?
        } else {
            attached.to_string()
        };

        let mut child = Element::new(name);
        self.parse_contents(&mut child)?;

        match self.next() {
            Some(close) if close == ">" => Ok(child),
            _ => Err(ParseError::UnterminatedChildElement),
        }
    }

    fn peek(&self) -> Option<&str> {
        self.tokens.get(self.pos).map(String::as_str)
    }

    fn next(&mut self) -> Option<String> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }
}

/// Removes the surrounding quotes from a quoted literal.
fn strip_quotes(token: &str) -> Result<String, ParseError> {
    if token.len() < 2 || !token.ends_with('"') {
        return Err(ParseError::UnterminatedStringLiteral);
    }
    Ok(token[1..token.len() - 1].to_string())
}
