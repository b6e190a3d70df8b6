//! Text encoding of tags.
//!
//! ```text
//! label            := name
//! single/multi-val := name ":" value ("," value)*
//! ```
//!
//! There is no escaping: a value containing either separator cannot
//! round-trip. Encoding is canonical, decoding is lenient and does not
//! re-apply the constructor rules (no dedup, no blank filtering).

use serde::{Deserialize, Serialize};

use crate::error::{Result, TagError};
use crate::tag::{Tag, ValidationError};

const DEFAULT_NAME_VALUE_SEPARATOR: char = ':';
const DEFAULT_VALUES_SEPARATOR: char = ',';

/// Separator configuration for the tag text encoding.
///
/// The two separators always differ; [`TagFormat::new`] and deserialization
/// reject equal ones.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "FormatRecord", into = "FormatRecord")]
pub struct TagFormat {
    name_value_separator: char,
    values_separator: char,
}

/// Serialized shape of a [`TagFormat`]; missing fields fall back to defaults.
#[derive(Clone, Copy, Serialize, Deserialize)]
struct FormatRecord {
    /// Separates the name from the values (default `:`)
    #[serde(default = "default_name_value_separator")]
    name_value_separator: char,

    /// Separates values from each other (default `,`)
    #[serde(default = "default_values_separator")]
    values_separator: char,
}

fn default_name_value_separator() -> char {
    DEFAULT_NAME_VALUE_SEPARATOR
}

fn default_values_separator() -> char {
    DEFAULT_VALUES_SEPARATOR
}

impl TryFrom<FormatRecord> for TagFormat {
    type Error = TagError;

    fn try_from(record: FormatRecord) -> Result<Self> {
        TagFormat::new(record.name_value_separator, record.values_separator)
    }
}

impl From<TagFormat> for FormatRecord {
    fn from(format: TagFormat) -> Self {
        Self {
            name_value_separator: format.name_value_separator,
            values_separator: format.values_separator,
        }
    }
}

impl Default for TagFormat {
    fn default() -> Self {
        Self {
            name_value_separator: DEFAULT_NAME_VALUE_SEPARATOR,
            values_separator: DEFAULT_VALUES_SEPARATOR,
        }
    }
}

impl TagFormat {
    /// Creates a format with the given separators.
    ///
    /// Fails with [`ValidationError::SameSeparators`] when both are the same
    /// character, since encoded tags could not be decoded again.
    pub fn new(name_value_separator: char, values_separator: char) -> Result<Self> {
        if name_value_separator == values_separator {
            return Err(ValidationError::SameSeparators(name_value_separator).into());
        }
        Ok(Self {
            name_value_separator,
            values_separator,
        })
    }

    /// Separator between the name and the values.
    pub fn name_value_separator(&self) -> char {
        self.name_value_separator
    }

    /// Separator between values.
    pub fn values_separator(&self) -> char {
        self.values_separator
    }

    /// Human readable grammar, e.g. `name[:value,...]`.
    pub fn grammar(&self) -> String {
        format!(
            "name[{}value{}...]",
            self.name_value_separator, self.values_separator
        )
    }

    /// Encodes a tag: `name` for labels, `name:v1,v2,...` otherwise.
    pub fn encode(&self, tag: &Tag) -> String {
        let mut out = String::from(tag.name());
        for (i, value) in tag.values().iter().enumerate() {
            out.push(if i == 0 {
                self.name_value_separator
            } else {
                self.values_separator
            });
            out.push_str(value);
        }
        out
    }

    /// Decodes the output of [`TagFormat::encode`].
    ///
    /// Fails only when the name/value separator appears more than once.
    pub fn decode(&self, input: &str) -> Result<Tag> {
        let parts: Vec<&str> = input.split(self.name_value_separator).collect();
        match parts.as_slice() {
            [name] => Ok(Tag::from_parts(*name, Vec::new())),
            [name, values] => {
                let values = values
                    .split(self.values_separator)
                    .map(String::from)
                    .collect();
                Ok(Tag::from_parts(*name, values))
            }
            _ => Err(TagError::Format {
                input: input.to_string(),
                expected: self.grammar(),
            }),
        }
    }
}
