//! String templates with `{column}` placeholders
//!
//! `\{`, `\}` and `\\` stand for literal braces and backslashes. Column
//! values are percent-encoded when a template is expanded.

use crate::iri::encode_component;
use rdflift_core::{Row, SqlValue};
use std::fmt;

/// Template grammar and expansion errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    #[error("unclosed placeholder starting at position {0}")]
    Unclosed(usize),

    #[error("empty placeholder at position {0}")]
    EmptyPlaceholder(usize),

    #[error("'{{' inside a placeholder at position {0}")]
    NestedOpen(usize),

    #[error("unmatched '}}' at position {0}")]
    UnmatchedClose(usize),

    #[error("placeholder {{{0}}} has no matching column")]
    UnresolvedColumn(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Column(String),
}

/// A parsed template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

impl Template {
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut text = String::new();
        let mut chars = source.char_indices().peekable();

        while let Some((pos, c)) = chars.next() {
            match c {
                '\\' => match chars.peek() {
                    Some(&(_, next @ ('{' | '}' | '\\'))) => {
                        text.push(next);
                        chars.next();
                    }
                    _ => text.push('\\'),
                },
                '{' => {
                    let mut column = String::new();
                    loop {
                        match chars.next() {
                            Some((_, '}')) => break,
                            Some((inner, '{')) => return Err(TemplateError::NestedOpen(inner)),
                            Some((_, other)) => column.push(other),
                            None => return Err(TemplateError::Unclosed(pos)),
                        }
                    }
                    if column.is_empty() {
                        return Err(TemplateError::EmptyPlaceholder(pos));
                    }
                    if !text.is_empty() {
                        segments.push(Segment::Text(std::mem::take(&mut text)));
                    }
                    segments.push(Segment::Column(column));
                }
                '}' => return Err(TemplateError::UnmatchedClose(pos)),
                other => text.push(other),
            }
        }
        if !text.is_empty() {
            segments.push(Segment::Text(text));
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    /// Literal prefix followed by a single placeholder
    pub fn prefixed_column(prefix: &str, column: &str) -> Self {
        let segments = vec![
            Segment::Text(prefix.to_string()),
            Segment::Column(column.to_string()),
        ];
        Self {
            source: format!("{}{{{}}}", escape(prefix), column),
            segments,
        }
    }

    /// Template text as written
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Placeholder column names in order of appearance
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Column(c) => Some(c.as_str()),
            Segment::Text(_) => None,
        })
    }

    /// Substitute row values; `Ok(None)` when a referenced value is null
    pub fn expand(&self, row: &Row) -> Result<Option<String>, TemplateError> {
        self.expand_with(|column| row.get(column))
    }

    pub fn expand_with<'a, F>(&self, mut lookup: F) -> Result<Option<String>, TemplateError>
    where
        F: FnMut(&str) -> Option<&'a SqlValue>,
    {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Column(column) => {
                    let value = lookup(column)
                        .ok_or_else(|| TemplateError::UnresolvedColumn(column.clone()))?;
                    match value.lexical() {
                        Some(v) => out.push_str(&encode_component(&v)),
                        None => return Ok(None),
                    }
                }
            }
        }
        Ok(Some(out))
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl std::str::FromStr for Template {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '{' | '}' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
