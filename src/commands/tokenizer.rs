//! Tokenizers for input lines.
//!
//! Two modes are provided:
//! - [`tokenize_line`] splits a packet or control line on whitespace, keeping a
//!   double-quoted span (quotes included) together as one token.
//! - [`split_record`] splits shortcut invocation arguments the way a
//!   space-delimited record reader does: single-space separators, quoted fields
//!   with `""` as an escaped quote.

use std::iter::Peekable;
use std::str::Chars;

use crate::error::ParseError;

/// Splits a line into whitespace-delimited tokens.
///
/// A `"` starts a span that runs to the next `"`, whitespace included. The
/// quotes stay in the token so the element parser can tell literals from
/// bare words: `a "b c"` → `["a", "\"b c\""]`.
pub fn tokenize_line(input: &str) -> Result<Vec<String>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        tokens.push(collect_token(&mut chars)?);
    }

    Ok(tokens)
}

/// Collects one token, treating quoted spans as unbreakable.
fn collect_token(chars: &mut Peekable<Chars<'_>>) -> Result<String, ParseError> {
    let mut token = String::new();
    let mut in_quote = false;

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() && !in_quote {
            break;
        }
        if c == '"' {
            in_quote = !in_quote;
        }
        token.push(c);
        chars.next();
    }

    if in_quote {
        return Err(ParseError::UnterminatedStringLiteral);
    }
    Ok(token)
}

/// Splits shortcut arguments as a space-delimited record.
///
/// Fields are separated by exactly one space, so consecutive spaces produce
/// empty fields. A field beginning with `"` is quoted: it may contain spaces,
/// `""` stands for a literal quote, and the surrounding quotes are removed.
pub fn split_record(input: &str) -> Result<Vec<String>, ParseError> {
    let input = input.trim_end_matches(['\r', '\n']);
    if input.is_empty() {
        return Ok(Vec::new());
    }

    let mut fields = Vec::new();
    let mut chars = input.chars().peekable();

    loop {
        let field = if chars.peek() == Some(&'"') {
            chars.next();
            collect_quoted_field(&mut chars)?
        } else {
            collect_bare_field(&mut chars)?
        };
        fields.push(field);

        match chars.next() {
            Some(' ') => continue,
            None => break,
            // Field collectors stop only at a separator or end of input.
            Some(_) => return Err(ParseError::UnterminatedStringLiteral),
        }
    }

    Ok(fields)
}

fn collect_bare_field(chars: &mut Peekable<Chars<'_>>) -> Result<String, ParseError> {
    let mut field = String::new();
    while let Some(&c) = chars.peek() {
        match c {
            ' ' => break,
            '"' => return Err(ParseError::BareQuote),
            _ => {
                field.push(c);
                chars.next();
            }
        }
    }
    Ok(field)
}

fn collect_quoted_field(chars: &mut Peekable<Chars<'_>>) -> Result<String, ParseError> {
    let mut field = String::new();
    loop {
        match chars.next() {
            Some('"') => match chars.peek() {
                Some('"') => {
                    chars.next();
                    field.push('"');
                }
                Some(' ') | None => return Ok(field),
                Some(_) => return Err(ParseError::UnterminatedStringLiteral),
            },
            Some(c) => field.push(c),
            None => return Err(ParseError::UnterminatedStringLiteral),
        }
    }
}
