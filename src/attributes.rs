//! Attribute-list parsing
//!
//! Splits the `KEY=VALUE,KEY="VALUE"` lists carried by EXT-X-KEY,
//! EXT-X-STREAM-INF, EXT-X-MEDIA and EXT-X-I-FRAME-STREAM-INF.
//! Commas inside double quotes do not split the list.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Reasons an attribute list cannot be split
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AttributeListError {
    /// A double quote is never closed
    #[error("unbalanced quote")]
    UnbalancedQuote,

    /// An item has no `=` separating name and value
    #[error("attribute without '=': {0}")]
    MissingEquals(String),
}

/// A single `NAME=VALUE` pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    pub name: String,
    /// Value with surrounding quotes stripped
    pub value: String,
    /// Whether the value was written as a quoted-string
    pub quoted: bool,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>, quoted: bool) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            quoted,
        }
    }

    pub fn quoted(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, value, true)
    }

    pub fn plain(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, value, false)
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.quoted {
            write!(f, "{}=\"{}\"", self.name, self.value)
        } else {
            write!(f, "{}={}", self.name, self.value)
        }
    }
}

/// Ordered attribute list as it appeared on the tag line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeList {
    attrs: Vec<Attribute>,
}

impl AttributeList {
    /// Parse the text following `TAG:`.
    ///
    /// Empty items (e.g. a trailing comma) are skipped. Names are kept
    /// exactly as written; lookups are case-sensitive.
    pub fn parse(input: &str) -> Result<Self, AttributeListError> {
        let mut attrs = Vec::new();

        for item in split_unquoted_commas(input)? {
            let item = item.trim();
            if item.is_empty() {
                continue;
            }
            let (name, value) = item
                .split_once('=')
                .ok_or_else(|| AttributeListError::MissingEquals(item.to_string()))?;
            let value = value.trim();

            let attr = if let Some(inner) = value.strip_prefix('"') {
                let inner = inner
                    .strip_suffix('"')
                    .ok_or(AttributeListError::UnbalancedQuote)?;
                Attribute::quoted(name.trim(), inner)
            } else {
                Attribute::plain(name.trim(), value)
            };
            attrs.push(attr);
        }

        Ok(Self { attrs })
    }

    /// First value for `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.attrs.iter().any(|a| a.name == name)
    }

    /// Remove and return the first value for `name`
    pub fn take(&mut self, name: &str) -> Option<String> {
        let pos = self.attrs.iter().position(|a| a.name == name)?;
        Some(self.attrs.remove(pos).value)
    }

    pub fn push(&mut self, attr: Attribute) {
        self.attrs.push(attr);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.attrs.iter()
    }

    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    /// Remaining attributes, in source order
    pub fn into_vec(self) -> Vec<Attribute> {
        self.attrs
    }
}

impl From<Vec<Attribute>> for AttributeList {
    fn from(attrs: Vec<Attribute>) -> Self {
        Self { attrs }
    }
}

impl fmt::Display for AttributeList {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, attr) in self.attrs.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", attr)?;
        }
        Ok(())
    }
}

fn split_unquoted_commas(input: &str) -> Result<Vec<&str>, AttributeListError> {
    let mut items = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;

    for (i, c) in input.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                items.push(&input[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }

    if in_quotes {
        return Err(AttributeListError::UnbalancedQuote);
    }
    items.push(&input[start..]);
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_and_quoted() {
        let list =
            AttributeList::parse(r#"PROGRAM-ID=1,BANDWIDTH=1280000,CODECS="avc1.4d401f,mp4a.40.2""#)
                .unwrap();

        assert_eq!(list.len(), 3);
        assert_eq!(list.get("PROGRAM-ID"), Some("1"));
        assert_eq!(list.get("BANDWIDTH"), Some("1280000"));
        assert_eq!(list.get("CODECS"), Some("avc1.4d401f,mp4a.40.2"));
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        let list = AttributeList::parse("METHOD=AES-128,iv=0x1").unwrap();
        assert!(list.contains("iv"));
        assert!(!list.contains("IV"));
    }

    #[test]
    fn test_trailing_comma_is_skipped() {
        let list = AttributeList::parse("METHOD=NONE,").unwrap();
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_unbalanced_quote() {
        assert_eq!(
            AttributeList::parse(r#"METHOD=AES-128,URI="https://k.example.com/key"#),
            Err(AttributeListError::UnbalancedQuote)
        );
    }

    #[test]
    fn test_missing_equals() {
        assert_eq!(
            AttributeList::parse("METHOD=AES-128,BOGUS"),
            Err(AttributeListError::MissingEquals("BOGUS".to_string()))
        );
    }

    #[test]
    fn test_take_removes_first_match() {
        let mut list = AttributeList::parse(r#"URI="a",X-FOO=bar"#).unwrap();
        assert_eq!(list.take("URI").as_deref(), Some("a"));
        assert!(!list.contains("URI"));
        assert_eq!(list.into_vec(), vec![Attribute::plain("X-FOO", "bar")]);
    }

    #[test]
    fn test_display_restores_quoting() {
        let list = AttributeList::from(vec![
            Attribute::plain("TYPE", "AUDIO"),
            Attribute::quoted("NAME", "English, stereo"),
        ]);
        assert_eq!(list.to_string(), r#"TYPE=AUDIO,NAME="English, stereo""#);

        let reparsed = AttributeList::parse(&list.to_string()).unwrap();
        assert_eq!(reparsed, list);
    }
}
