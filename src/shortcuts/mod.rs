//! Shortcut (macro) table and template expansion.
//!
//! A shortcut is a named line template. `$1`..`$9` in the template are
//! replaced by the invocation's positional arguments; the expanded line is
//! then fed back into the session's input.

use std::collections::BTreeMap;

use crate::commands::tokenizer::split_record;
use crate::error::{MsshError, ParseError, Result};

/// Named line templates, kept sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShortcutTable {
    entries: BTreeMap<String, String>,
}

impl ShortcutTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a shortcut definition.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// Defines or replaces a shortcut.
    pub fn define(&mut self, name: impl Into<String>, definition: impl Into<String>) {
        self.entries.insert(name.into(), definition.into());
    }

    /// Iterates `(name, definition)` pairs in lexicographic name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of defined shortcuts.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no shortcut is defined.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A parsed `@name args...` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Shortcut name without the preview marker.
    pub name: String,
    /// `@?name` only shows the expansion.
    pub preview: bool,
    /// Positional arguments; `args[0]` is `$1`.
    pub args: Vec<String>,
}

impl Invocation {
    /// Parses the text after the `@` marker.
    pub fn parse(input: &str) -> std::result::Result<Self, ParseError> {
        let mut fields = split_record(input)?.into_iter();
        let first = fields
            .next()
            .filter(|f| !f.is_empty())
            .ok_or(ParseError::MissingShortcutName)?;

        let (name, preview) = match first.strip_prefix('?') {
            Some(name) => (name.to_string(), true),
            None => (first, false),
        };
        if name.is_empty() {
            return Err(ParseError::MissingShortcutName);
        }

        Ok(Self {
            name,
            preview,
            args: fields.collect(),
        })
    }

    /// Looks up the shortcut and substitutes the arguments.
    pub fn expand(&self, table: &ShortcutTable) -> Result<String> {
        let template = table
            .get(&self.name)
            .ok_or_else(|| MsshError::UndefinedShortcut(self.name.clone()))?;
        expand_template(template, &self.args)
    }
}

/// Replaces `$N` placeholders in `template` with `args[N - 1]`.
///
/// A `$` is a placeholder only when followed by a digit, not preceded by `\`,
/// and not the last character. Anything else passes through unchanged,
/// including the backslash of an escaped `\$1`.
pub fn expand_template(template: &str, args: &[String]) -> Result<String> {
    let chars: Vec<char> = template.chars().collect();
    let mut result = String::with_capacity(template.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let escaped = i > 0 && chars[i - 1] == '\\';

        if c == '$' && !escaped {
            if let Some(index) = chars.get(i + 1).and_then(|d| d.to_digit(10)) {
                let index = index as usize;
                let arg = index
                    .checked_sub(1)
                    .and_then(|slot| args.get(slot))
                    .ok_or(MsshError::InvalidArgumentIndex(index))?;
                result.push_str(arg);
                i += 2;
                continue;
            }
        }

        result.push(c);
        i += 1;
    }

    Ok(result)
}
