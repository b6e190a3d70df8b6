//! The [`Tag`] value type.
//!
//! A tag is a name with zero or more values:
//! - a **label** has no values (`critical`)
//! - a **single-value** tag has exactly one value (`env:prod`)
//! - a **multi-value** tag has two or more unique values (`team:search,infra`)
//!
//! Tags are immutable. Validation happens in the constructors, see the
//! [`validation`] module for the rules.

pub mod validation;

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, TagError};
use crate::format::TagFormat;

pub use validation::ValidationError;
use validation::{require_values, unique_values, validate_tag_name};

/// An immutable name with zero, one or many values.
///
/// Two tags are equal when their names match and they hold the same set of
/// values; value order and repeats are ignored.
#[derive(Debug, Clone)]
pub struct Tag {
    name: String,
    values: Vec<String>,
}

impl Tag {
    /// Creates a tag with the name and values.
    ///
    /// The name cannot be blank. Blank values are dropped and repeated values
    /// are made unique; the remaining values keep their first-occurrence
    /// order.
    ///
    /// See also [`Tag::label`], [`Tag::single_value`] and [`Tag::multi_value`].
    pub fn new<N, I, V>(name: N, values: I) -> Result<Self>
    where
        N: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let name = name.into();
        validate_tag_name(&name)?;

        Ok(Self {
            name,
            values: unique_values(values),
        })
    }

    /// Creates a label (a tag without values).
    pub fn label(name: impl Into<String>) -> Result<Self> {
        Self::new(name, std::iter::empty::<String>())
    }

    /// Creates a tag with exactly one value. The value cannot be blank.
    pub fn single_value(name: impl Into<String>, value: impl Into<String>) -> Result<Self> {
        let value: String = value.into();
        let tag = Self::new(name, [value])?;
        require_values(&tag.values, 1)?;
        Ok(tag)
    }

    /// Creates a tag with at least two unique, non-blank values.
    pub fn multi_value<N, I, V>(name: N, values: I) -> Result<Self>
    where
        N: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let tag = Self::new(name, values)?;
        require_values(&tag.values, 2)?;
        Ok(tag)
    }

    /// Parses the `name[:value,...]` encoding produced by `Display`.
    ///
    /// Decoding is lenient: values are split but not deduplicated or
    /// validated. Strings with more than one `:` fail with
    /// [`TagError::Format`].
    ///
    /// ```
    /// use tagging::Tag;
    ///
    /// let tag = Tag::parse("team:search,infra").unwrap();
    /// assert_eq!(tag.name(), "team");
    /// assert_eq!(tag.values(), ["search", "infra"]);
    ///
    /// assert!(Tag::parse("critical").unwrap().is_label());
    /// assert!(Tag::parse("a:b:c").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        TagFormat::default().decode(s)
    }

    /// Builds a tag without running any validation. Decoder use only.
    pub(crate) fn from_parts(name: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Returns the tag name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the first value, or an empty string for labels.
    ///
    /// Use [`Tag::values`] to get every value of a multi-value tag.
    pub fn value(&self) -> &str {
        self.values.first().map(String::as_str).unwrap_or_default()
    }

    /// Returns all values; empty for labels.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// True when the tag has no values.
    pub fn is_label(&self) -> bool {
        self.values.is_empty()
    }

    /// True for exactly one value. Labels are not single-value tags.
    pub fn is_single_value(&self) -> bool {
        self.values.len() == 1
    }

    /// True for two or more values.
    pub fn is_multi_value(&self) -> bool {
        self.values.len() > 1
    }

    /// Returns true if the tag is named `name`.
    pub fn has_name(&self, name: &str) -> bool {
        self.name == name
    }

    /// Returns true if any of the tag's values is among `values`.
    ///
    /// This is an intersection test, not "has all of them". Labels never
    /// match.
    pub fn has_values<S: AsRef<str>>(&self, values: &[S]) -> bool {
        self.values
            .iter()
            .any(|own| values.iter().any(|v| v.as_ref() == own))
    }

    /// Returns true if the tag matches `predicate`.
    pub fn has_func<F>(&self, predicate: F) -> bool
    where
        F: FnOnce(&Tag) -> bool,
    {
        predicate(self)
    }

    fn value_set(&self) -> BTreeSet<&str> {
        self.values.iter().map(String::as_str).collect()
    }
}

impl PartialEq for Tag {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.value_set() == other.value_set()
    }
}

impl Eq for Tag {}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&TagFormat::default().encode(self))
    }
}

impl FromStr for Tag {
    type Err = TagError;

    fn from_str(s: &str) -> Result<Self> {
        Tag::parse(s)
    }
}

impl Serialize for Tag {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Tag {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        Tag::parse(&encoded).map_err(serde::de::Error::custom)
    }
}
