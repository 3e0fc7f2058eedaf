//! Filter-query encoding for persisted selections.
//!
//! Host screens keep selected ids in a URL query parameter using a small
//! Lucene-like syntax: `api:(api-1 OR api-2) AND method:GET`. [`FilterQuery`]
//! builds that string from per-field value lists and decodes it back, so a
//! reloaded screen can feed the ids straight into a selector.
//!
//! Values (and field names) containing whitespace, quotes or parentheses are
//! written as double-quoted strings with `\"` and `\\` escapes; a field name
//! containing `:` is quoted too. Quoted text is never split on `AND`/`OR`.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, SelectError};

const AND: &str = " AND ";
const OR: &str = " OR ";

/// An ordered set of `field -> values` filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterQuery {
    clauses: Vec<(String, Vec<String>)>,
}

impl FilterQuery {
    /// Creates an empty query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds values for a field, keeping first-seen order and skipping
    /// duplicates and empty values. A blank field name is ignored.
    pub fn insert<I, S>(&mut self, field: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let field = field.into();
        if field.is_empty() {
            return;
        }
        let index = match self.clauses.iter().position(|(f, _)| *f == field) {
            Some(index) => index,
            None => {
                self.clauses.push((field, Vec::new()));
                self.clauses.len() - 1
            }
        };

        let existing = &mut self.clauses[index].1;
        for value in values {
            let value = value.into();
            if !value.is_empty() && !existing.contains(&value) {
                existing.push(value);
            }
        }
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with<I, S>(mut self, field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(field, values);
        self
    }

    /// Removes a field. Returns its values if it was present.
    pub fn remove(&mut self, field: &str) -> Option<Vec<String>> {
        let index = self.clauses.iter().position(|(f, _)| f == field)?;
        Some(self.clauses.remove(index).1)
    }

    /// Returns the values for a field, or an empty slice.
    #[must_use]
    pub fn values(&self, field: &str) -> &[String] {
        self.clauses
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, values)| values.as_slice())
            .unwrap_or(&[])
    }

    /// Returns the values for a field as an owned selection-id list.
    #[must_use]
    pub fn selection_ids(&self, field: &str) -> Vec<String> {
        self.values(field).to_vec()
    }

    /// Iterates over field names in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.clauses.iter().map(|(f, _)| f.as_str())
    }

    /// Returns `true` when no field carries a value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.iter().all(|(_, values)| values.is_empty())
    }

    /// Renders the query string. Fields without values are skipped.
    #[must_use]
    pub fn build(&self) -> String {
        self.clauses
            .iter()
            .filter(|(_, values)| !values.is_empty())
            .map(|(field, values)| {
                let field = encode(field, &[':']);
                match values.as_slice() {
                    [single] => format!("{field}:{}", encode(single, &[])),
                    many => {
                        let many: Vec<_> = many.iter().map(|v| encode(v, &[])).collect();
                        format!("{field}:({})", many.join(OR))
                    }
                }
            })
            .collect::<Vec<_>>()
            .join(AND)
    }

    /// Decodes a query string produced by [`build`](Self::build) or written by hand.
    ///
    /// Accepts `field:a OR field:b` and parenthesised groups of full terms in
    /// addition to the `field:(a OR b)` form. Repeated fields accumulate.
    pub fn parse(query: &str) -> Result<Self> {
        let mut parsed = Self::new();
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Ok(parsed);
        }

        for clause in split_unquoted(trimmed, AND) {
            let clause = strip_parens(clause.trim());
            let (field, rest) = split_term(query, clause)?;

            if rest.starts_with('(') && rest.ends_with(')') {
                let values = split_unquoted(strip_parens(rest), OR)
                    .into_iter()
                    .map(|raw| decode_value(query, &field, raw))
                    .collect::<Result<Vec<_>>>()?;
                parsed.insert(field, values);
                continue;
            }

            for term in split_unquoted(clause, OR) {
                let (field, raw) = split_term(query, term.trim())?;
                let value = decode_value(query, &field, raw)?;
                parsed.insert(field, [value]);
            }
        }

        Ok(parsed)
    }
}

impl fmt::Display for FilterQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.build())
    }
}

impl FromStr for FilterQuery {
    type Err = SelectError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

fn strip_parens(text: &str) -> &str {
    text.strip_prefix('(')
        .and_then(|inner| inner.strip_suffix(')'))
        .unwrap_or(text)
}

/// Splits `field:rest` at the first `:` outside quotes. `rest` is returned raw.
fn split_term<'a>(query: &str, term: &'a str) -> Result<(String, &'a str)> {
    let at = find_unquoted(term, ":")
        .ok_or_else(|| malformed(query, format!("missing ':' in term '{term}'")))?;
    let field = unquote(query, &term[..at])?;
    let rest = term[at + 1..].trim();

    if field.is_empty() {
        return Err(malformed(query, format!("empty field in term '{term}'")));
    }
    if rest.is_empty() {
        return Err(malformed(query, format!("empty value for '{field}'")));
    }

    Ok((field, rest))
}

fn decode_value(query: &str, field: &str, raw: &str) -> Result<String> {
    let value = unquote(query, raw)?;
    if value.is_empty() {
        return Err(malformed(query, format!("empty value for '{field}'")));
    }
    Ok(value)
}

fn encode<'a>(text: &'a str, reserved: &[char]) -> Cow<'a, str> {
    let plain = !text.is_empty()
        && !text
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '"' | '(' | ')') || reserved.contains(&c));
    if plain {
        return Cow::Borrowed(text);
    }

    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for c in text.chars() {
        if matches!(c, '"' | '\\') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    Cow::Owned(quoted)
}

/// Undoes [`encode`]. Text not starting with a quote is taken literally.
fn unquote(query: &str, raw: &str) -> Result<String> {
    let raw = raw.trim();
    let Some(inner) = raw.strip_prefix('"') else {
        return Ok(raw.to_string());
    };

    let mut text = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(escaped) => text.push(escaped),
                None => break,
            },
            '"' if chars.as_str().is_empty() => return Ok(text),
            '"' => return Err(malformed(query, format!("text after closing quote in '{raw}'"))),
            c => text.push(c),
        }
    }
    Err(malformed(query, format!("unterminated quote in '{raw}'")))
}

/// Byte offset of the first `sep` outside a quoted string.
fn find_unquoted(text: &str, sep: &str) -> Option<usize> {
    let mut quoted = false;
    let mut escaped = false;
    for (at, c) in text.char_indices() {
        if quoted {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => quoted = false,
                _ => {}
            }
        } else if c == '"' {
            quoted = true;
        } else if text[at..].starts_with(sep) {
            return Some(at);
        }
    }
    None
}

fn split_unquoted<'a>(text: &'a str, sep: &str) -> Vec<&'a str> {
    let mut parts = Vec::new();
    let mut rest = text;
    while let Some(at) = find_unquoted(rest, sep) {
        parts.push(&rest[..at]);
        rest = &rest[at + sep.len()..];
    }
    parts.push(rest);
    parts
}

fn malformed(query: &str, reason: String) -> SelectError {
    SelectError::MalformedQuery {
        query: query.to_string(),
        reason,
    }
}
