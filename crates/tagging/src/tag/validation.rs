//! Name and value rules for tags and tag groups.
//!
//! - Tag and group names must contain at least one non-whitespace character
//! - Blank values (empty or whitespace only) are dropped
//! - Repeated values are dropped, the first occurrence is kept
//! - Single-value tags need one value left after cleanup, multi-value tags two
//! - The two separators of a tag format must differ

/// Validates a tag name.
///
/// # Examples
/// ```
/// use tagging::tag::validation::validate_tag_name;
///
/// assert!(validate_tag_name("env").is_ok());
/// assert!(validate_tag_name(" env ").is_ok());
///
/// assert!(validate_tag_name("").is_err());
/// assert!(validate_tag_name("   ").is_err());
/// ```
pub fn validate_tag_name(name: &str) -> Result<(), ValidationError> {
    if is_blank(name) {
        return Err(ValidationError::NameRequired);
    }
    Ok(())
}

/// Validates a tag group name. Same rule as tag names, separate error so
/// callers can tell which one failed.
pub fn validate_group_name(name: &str) -> Result<(), ValidationError> {
    if is_blank(name) {
        return Err(ValidationError::GroupNameRequired);
    }
    Ok(())
}

/// Drops blank and repeated values, keeping first-occurrence order.
pub fn unique_values<I, V>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = V>,
    V: Into<String>,
{
    let mut unique: Vec<String> = Vec::new();
    for value in values {
        let value = value.into();
        if is_blank(&value) || unique.contains(&value) {
            continue;
        }
        unique.push(value);
    }
    unique
}

/// Checks that at least `min` values survived [`unique_values`].
pub fn require_values(values: &[String], min: usize) -> Result<(), ValidationError> {
    match (values.len(), min) {
        (0, 1) => Err(ValidationError::ValueRequired),
        (found, min) if found < min => Err(ValidationError::TooFewValues { found, min }),
        _ => Ok(()),
    }
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Error type for tag and group validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Tag name is empty or whitespace
    NameRequired,
    /// Group name is empty or whitespace
    GroupNameRequired,
    /// A single-value tag ended up without a value
    ValueRequired,
    /// Fewer unique values than the tag kind needs
    TooFewValues { found: usize, min: usize },
    /// Name/value and values separators are the same character
    SameSeparators(char),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::NameRequired => write!(f, "tag name required"),
            ValidationError::GroupNameRequired => write!(f, "group name required"),
            ValidationError::ValueRequired => write!(f, "value required"),
            ValidationError::TooFewValues { found, min } => {
                write!(
                    f,
                    "at least {} unique values required, found {}",
                    min, found
                )
            }
            ValidationError::SameSeparators(sep) => {
                write!(f, "separators must differ, both are '{}'", sep)
            }
        }
    }
}

impl std::error::Error for ValidationError {}
