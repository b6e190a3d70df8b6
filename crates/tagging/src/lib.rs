//! # Tagging
//!
//! Tags are immutable name/value labels used to annotate arbitrary domain
//! objects. Tag groups are named collections of tags with unique names that
//! can be queried, filtered, trimmed and sorted.
//!
//! ```text
//! critical              label (no values)
//! env:prod              single-value tag
//! team:search,infra     multi-value tag
//! ```
//!
//! ## Quick Tour
//!
//! ```
//! use tagging::{Tag, TagGroup};
//!
//! let env = Tag::single_value("env", "prod").unwrap();
//! let team = Tag::multi_value("team", ["search", "infra"]).unwrap();
//! let critical = Tag::label("critical").unwrap();
//!
//! let mut group = TagGroup::new("service-x", [env, team.clone(), critical]).unwrap();
//! assert!(group.contains_names(&["env", "team", "critical"]));
//! assert_eq!(group.find_values(&["search"]), vec![team]);
//!
//! group.remove_names(&["critical"]);
//! assert_eq!(group.len(), 2);
//! ```
//!
//! ## Errors
//!
//! Constructors and [`TagGroup::rename`] return [`TagError::Validation`] for
//! blank names or missing values; [`Tag::parse`] returns [`TagError::Format`]
//! for malformed input. The only panicking constructors are
//! [`TagGroup::with_generated_name`] and [`TagGroup::with_name_from`].
//!
//! ## Module Overview
//!
//! - [`tag`]: the [`Tag`] value type and its validation rules
//! - [`group`]: the [`TagGroup`] collection
//! - [`format`]: text encoding and its separator configuration
//! - [`id`]: short id generation for unnamed groups
//! - [`error`]: error types

pub mod error;
pub mod format;
pub mod group;
pub mod id;
pub mod tag;

pub use error::{Result, TagError};
pub use format::TagFormat;
pub use group::TagGroup;
pub use tag::{Tag, ValidationError};
