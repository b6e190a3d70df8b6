//! Named tag collections.
//!
//! A [`TagGroup`] holds at most one [`Tag`] per name. Adding a tag whose name
//! is already present replaces the member (last write wins) but keeps its
//! position.
//!
//! Members are stored in a name-keyed map for lookups plus an ordered list of
//! names. The list is what listing, finding and iteration walk, so the order
//! established by [`TagGroup::sort_names`] or [`TagGroup::sort_by`] sticks
//! until the next sort; new members are appended at the end.

use std::cmp::Ordering;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{Result, TagError};
use crate::id::short_id;
use crate::tag::validation::validate_group_name;
use crate::tag::Tag;

/// A named group of related tags with unique names.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "GroupRecord", into = "GroupRecord")]
pub struct TagGroup {
    name: String,
    tags: HashMap<String, Tag>,
    order: Vec<String>,
}

/// Serialized shape of a group: its name and its tags in group order.
#[derive(Serialize, Deserialize)]
struct GroupRecord {
    name: String,
    #[serde(default)]
    tags: Vec<Tag>,
}

impl TryFrom<GroupRecord> for TagGroup {
    type Error = TagError;

    fn try_from(record: GroupRecord) -> Result<Self> {
        TagGroup::new(record.name, record.tags)
    }
}

impl From<TagGroup> for GroupRecord {
    fn from(group: TagGroup) -> Self {
        let tags = group.tags();
        Self {
            name: group.name,
            tags,
        }
    }
}

impl TagGroup {
    /// Creates a group and adds `tags` to it.
    ///
    /// The name cannot be blank. Tags sharing a name collapse to the last one,
    /// see [`TagGroup::add`].
    pub fn new<N, I>(name: N, tags: I) -> Result<Self>
    where
        N: Into<String>,
        I: IntoIterator<Item = Tag>,
    {
        let name = name.into();
        validate_group_name(&name)?;

        let mut group = Self {
            name,
            tags: HashMap::new(),
            order: Vec::new(),
        };
        group.add(tags);
        debug!(group = %group.name, tags = group.len(), "created tag group");
        Ok(group)
    }

    /// Creates a group named with a generated short id.
    ///
    /// # Panics
    ///
    /// If the generated name is rejected. The generator never returns a
    /// blank id, so this indicates a broken environment rather than bad input.
    pub fn with_generated_name<I>(tags: I) -> Self
    where
        I: IntoIterator<Item = Tag>,
    {
        Self::with_name_from(short_id, tags)
    }

    /// Like [`TagGroup::with_generated_name`] with an explicit name generator.
    ///
    /// # Panics
    ///
    /// If `generate` returns a blank name.
    pub fn with_name_from<G, I>(generate: G, tags: I) -> Self
    where
        G: FnOnce() -> String,
        I: IntoIterator<Item = Tag>,
    {
        let name = generate();
        trace!(group = %name, "generated group name");
        match Self::new(name, tags) {
            Ok(group) => group,
            Err(err) => panic!("generated group name rejected: {err}"),
        }
    }

    /// Returns the group name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renames the group. On error the current name is kept.
    pub fn rename(&mut self, new_name: impl Into<String>) -> Result<()> {
        let new_name = new_name.into();
        validate_group_name(&new_name)?;

        debug!(from = %self.name, to = %new_name, "renamed tag group");
        self.name = new_name;
        Ok(())
    }

    /// Returns a snapshot of the members in group order.
    pub fn tags(&self) -> Vec<Tag> {
        self.iter().cloned().collect()
    }

    /// Iterates over the members in group order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            names: self.order.iter(),
            tags: &self.tags,
        }
    }

    /// Returns the number of members.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true if the group has no members.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Returns the member with the given name.
    pub fn get(&self, name: &str) -> Option<&Tag> {
        self.tags.get(name)
    }

    /// Adds tags to the group.
    ///
    /// A tag whose name is already present replaces the existing member in
    /// place, so among several tags with the same name the last one wins.
    pub fn add<I>(&mut self, tags: I)
    where
        I: IntoIterator<Item = Tag>,
    {
        for tag in tags {
            match self.tags.entry(tag.name().to_string()) {
                Entry::Occupied(mut slot) => {
                    debug!(group = %self.name, tag = %tag, "replacing tag");
                    slot.insert(tag);
                }
                Entry::Vacant(slot) => {
                    self.order.push(slot.key().clone());
                    slot.insert(tag);
                }
            }
        }
    }

    /// Returns true if every given tag is a member, matching both the name and
    /// the set of values.
    pub fn contains(&self, tags: &[Tag]) -> bool {
        tags.iter()
            .all(|tag| self.get(tag.name()).is_some_and(|member| member == tag))
    }

    /// Returns true if there is a member for every name.
    pub fn contains_names<S: AsRef<str>>(&self, names: &[S]) -> bool {
        names
            .iter()
            .all(|name| self.tags.contains_key(name.as_ref()))
    }

    /// Returns true if some member has any of the values.
    pub fn contains_values<S: AsRef<str>>(&self, values: &[S]) -> bool {
        self.contains_func(|tag| tag.has_values(values))
    }

    /// Returns true if some member matches `predicate`.
    pub fn contains_func<F>(&self, predicate: F) -> bool
    where
        F: FnMut(&Tag) -> bool,
    {
        self.iter().any(predicate)
    }

    /// Returns the members whose name is among `names`.
    pub fn find_names<S: AsRef<str>>(&self, names: &[S]) -> Vec<Tag> {
        self.find_func(|tag| names.iter().any(|name| tag.has_name(name.as_ref())))
    }

    /// Returns the members that have any of the values.
    pub fn find_values<S: AsRef<str>>(&self, values: &[S]) -> Vec<Tag> {
        self.find_func(|tag| tag.has_values(values))
    }

    /// Returns the members matching `predicate`, in group order.
    pub fn find_func<F>(&self, mut predicate: F) -> Vec<Tag>
    where
        F: FnMut(&Tag) -> bool,
    {
        self.iter().filter(|tag| predicate(*tag)).cloned().collect()
    }

    /// Removes members equal (name and values) to any of the given tags.
    pub fn remove(&mut self, tags: &[Tag]) {
        self.remove_func(|member| tags.iter().any(|tag| tag == member));
    }

    /// Removes the members whose name is among `names`.
    pub fn remove_names<S: AsRef<str>>(&mut self, names: &[S]) {
        self.remove_func(|tag| names.iter().any(|name| tag.has_name(name.as_ref())));
    }

    /// Removes the members that have any of the values.
    pub fn remove_values<S: AsRef<str>>(&mut self, values: &[S]) {
        self.remove_func(|tag| tag.has_values(values));
    }

    /// Removes every member matching `predicate`.
    pub fn remove_func<F>(&mut self, mut predicate: F)
    where
        F: FnMut(&Tag) -> bool,
    {
        // Collect first; the map is only touched once matching is done.
        let doomed: Vec<String> = self
            .iter()
            .filter(|tag| predicate(*tag))
            .map(|tag| tag.name().to_string())
            .collect();
        if doomed.is_empty() {
            return;
        }

        for name in &doomed {
            self.tags.remove(name);
        }
        self.order.retain(|name| self.tags.contains_key(name));
        debug!(group = %self.name, removed = doomed.len(), "removed tags");
    }

    /// Sorts the members by name, ascending or descending.
    pub fn sort_names(&mut self, desc: bool) {
        self.sort_by(|a, b| {
            let ordering = a.name().cmp(b.name());
            if desc {
                ordering.reverse()
            } else {
                ordering
            }
        });
    }

    /// Stable sort with a less-than predicate.
    pub fn sort_func<F>(&mut self, mut less: F)
    where
        F: FnMut(&Tag, &Tag) -> bool,
    {
        self.sort_by(|a, b| {
            if less(a, b) {
                Ordering::Less
            } else if less(b, a) {
                Ordering::Greater
            } else {
                Ordering::Equal
            }
        });
    }

    /// Stable sort with a comparator. The new order is kept for later
    /// listing and iteration.
    pub fn sort_by<F>(&mut self, mut compare: F)
    where
        F: FnMut(&Tag, &Tag) -> Ordering,
    {
        let mut members: Vec<&Tag> = self.iter().collect();
        members.sort_by(|a, b| compare(*a, *b));
        let order: Vec<String> = members.iter().map(|tag| tag.name().to_string()).collect();

        self.order = order;
        trace!(group = %self.name, order = ?self.order, "sorted tag group");
    }
}

/// Iterator over the members of a [`TagGroup`] in group order.
pub struct Iter<'a> {
    names: std::slice::Iter<'a, String>,
    tags: &'a HashMap<String, Tag>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Tag;

    fn next(&mut self) -> Option<Self::Item> {
        let tags = self.tags;
        self.names.by_ref().find_map(|name| tags.get(name))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.names.size_hint()
    }
}

// Every name in `order` has an entry in `tags`, so nothing is skipped.
impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a TagGroup {
    type Item = &'a Tag;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;

    /// Parses an encoded tag, panicking on bad input.
    pub fn tag(encoded: &str) -> Tag {
        Tag::parse(encoded).expect("fixture tag must parse")
    }

    pub struct GroupFixture {
        pub group: TagGroup,
    }

    impl Default for GroupFixture {
        fn default() -> Self {
            Self::new("fixture")
        }
    }

    impl GroupFixture {
        pub fn new(name: &str) -> Self {
            Self {
                group: TagGroup::new(name, []).expect("fixture group name must be valid"),
            }
        }

        pub fn with_tag(mut self, encoded: &str) -> Self {
            self.group.add([tag(encoded)]);
            self
        }

        pub fn with_tags(mut self, encoded: &[&str]) -> Self {
            self.group.add(encoded.iter().map(|e| tag(e)));
            self
        }

        /// Member names in group order.
        pub fn names(&self) -> Vec<String> {
            self.group
                .iter()
                .map(|tag| tag.name().to_string())
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::{tag, GroupFixture};
    use super::*;
    use crate::tag::ValidationError;

    fn names(group: &TagGroup) -> Vec<&str> {
        group.iter().map(Tag::name).collect()
    }

    #[test]
    fn test_new_rejects_blank_name() {
        assert_eq!(
            TagGroup::new("", []).unwrap_err(),
            TagError::Validation(ValidationError::GroupNameRequired)
        );
        assert!(TagGroup::new("  ", [tag("x")]).is_err());
    }

    #[test]
    fn test_new_adds_tags() {
        let group = TagGroup::new("g", [tag("b:1"), tag("a")]).unwrap();
        assert_eq!(group.name(), "g");
        assert_eq!(group.len(), 2);
        assert_eq!(names(&group), vec!["b", "a"]);
    }

    #[test]
    fn test_new_dedups_by_name_last_wins() {
        let group = TagGroup::new("g", [tag("x:1"), tag("y"), tag("x:2")]).unwrap();
        assert_eq!(group.len(), 2);
        assert_eq!(group.get("x").unwrap().value(), "2");
        assert_eq!(names(&group), vec!["x", "y"]);
    }

    #[test]
    fn test_with_generated_name() {
        let group = TagGroup::with_generated_name([tag("x")]);
        assert!(!group.name().trim().is_empty());
        assert!(group.contains_names(&["x"]));

        let other = TagGroup::with_generated_name([]);
        assert_ne!(group.name(), other.name());
    }

    #[test]
    fn test_with_name_from() {
        let group = TagGroup::with_name_from(|| "fixed".to_string(), [tag("x")]);
        assert_eq!(group.name(), "fixed");
    }

    #[test]
    #[should_panic(expected = "generated group name rejected")]
    fn test_with_name_from_panics_on_blank_name() {
        TagGroup::with_name_from(|| " ".to_string(), []);
    }

    #[test]
    fn test_rename() {
        let mut group = TagGroup::new("old", []).unwrap();
        group.rename("new").unwrap();
        assert_eq!(group.name(), "new");
    }

    #[test]
    fn test_rename_failure_keeps_name() {
        let mut group = TagGroup::new("old", []).unwrap();
        assert!(group.rename("").is_err());
        assert!(group.rename("   ").is_err());
        assert_eq!(group.name(), "old");
    }

    #[test]
    fn test_add_replaces_existing_member() {
        let mut group = GroupFixture::default().group;
        group.add([tag("x:1")]);
        group.add([tag("x:2")]);

        let found = group.find_names(&["x"]);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].value(), "2");
        assert_eq!(group.len(), 1);
    }

    #[test]
    fn test_add_keeps_position_of_replaced_member() {
        let mut fixture = GroupFixture::default().with_tags(&["a", "b", "c"]);
        fixture.group.add([tag("a:1"), tag("d")]);
        assert_eq!(fixture.names(), vec!["a", "b", "c", "d"]);
        assert_eq!(fixture.group.get("a").unwrap().value(), "1");
    }

    #[test]
    fn test_contains_matches_name_and_value_set() {
        let group = GroupFixture::default().with_tag("x:1,2").group;

        assert!(group.contains(&[Tag::new("x", ["1", "2"]).unwrap()]));
        assert!(group.contains(&[Tag::new("x", ["2", "1"]).unwrap()]));
        assert!(!group.contains(&[Tag::new("x", ["1", "2", "9"]).unwrap()]));
        assert!(!group.contains(&[Tag::new("x", ["1"]).unwrap()]));
        assert!(!group.contains(&[Tag::new("y", ["1", "2"]).unwrap()]));
    }

    #[test]
    fn test_contains_requires_every_tag() {
        let group = GroupFixture::default().with_tags(&["x:1", "y"]).group;

        assert!(group.contains(&[tag("x:1"), tag("y")]));
        assert!(!group.contains(&[tag("x:1"), tag("z")]));
        assert!(group.contains(&[]));
    }

    #[test]
    fn test_contains_names() {
        let group = GroupFixture::default().with_tags(&["x:1", "y"]).group;

        assert!(group.contains_names(&["x"]));
        assert!(group.contains_names(&["x", "y"]));
        assert!(group.contains_names(&["x", "x"]));
        assert!(!group.contains_names(&["x", "z"]));
    }

    #[test]
    fn test_contains_values_is_any_match() {
        let group = GroupFixture::default().with_tags(&["x:1,2", "y"]).group;

        assert!(group.contains_values(&["2", "9"]));
        assert!(!group.contains_values(&["9"]));
        assert!(!group.contains_values(&["y"]));
    }

    #[test]
    fn test_contains_func() {
        let group = GroupFixture::default().with_tags(&["x:1,2", "y"]).group;

        assert!(group.contains_func(Tag::is_label));
        assert!(group.contains_func(Tag::is_multi_value));
        assert!(!group.contains_func(Tag::is_single_value));
    }

    #[test]
    fn test_find_names() {
        let group = GroupFixture::default()
            .with_tags(&["x:1", "y", "z:3"])
            .group;

        let found = group.find_names(&["z", "x", "missing"]);
        let found: Vec<&str> = found.iter().map(Tag::name).collect();
        assert_eq!(found, vec!["x", "z"]);
    }

    #[test]
    fn test_find_values() {
        let group = GroupFixture::default()
            .with_tags(&["env:prod", "team:search,infra", "critical"])
            .group;

        assert_eq!(group.find_values(&["search"]), vec![tag("team:search,infra")]);
        assert_eq!(group.find_values(&["prod", "infra"]).len(), 2);
        assert!(group.find_values(&["critical"]).is_empty());
    }

    #[test]
    fn test_find_func_follows_group_order() {
        let mut group = GroupFixture::default()
            .with_tags(&["b:1", "a:1", "c"])
            .group;
        group.sort_names(false);

        let found = group.find_func(|tag| !tag.is_label());
        let found: Vec<&str> = found.iter().map(Tag::name).collect();
        assert_eq!(found, vec!["a", "b"]);
    }

    #[test]
    fn test_remove_exact_match_only() {
        let mut group = GroupFixture::default().with_tags(&["x:1,2", "y:1"]).group;

        group.remove(&[tag("x:1")]);
        assert_eq!(group.len(), 2);

        group.remove(&[tag("x:2,1"), tag("missing")]);
        assert_eq!(names(&group), vec!["y"]);
    }

    #[test]
    fn test_remove_names() {
        let mut group = GroupFixture::default().with_tags(&["x", "y"]).group;
        group.remove_names(&["x"]);
        assert_eq!(names(&group), vec!["y"]);
        assert!(group.get("x").is_none());
    }

    #[test]
    fn test_remove_values() {
        let mut group = GroupFixture::default()
            .with_tags(&["x:1,2", "y:3", "z"])
            .group;
        group.remove_values(&["2", "3"]);
        assert_eq!(names(&group), vec!["z"]);
    }

    #[test]
    fn test_remove_func_removes_every_match() {
        let mut group = GroupFixture::default()
            .with_tags(&["a", "b:1", "c", "d", "e:1,2"])
            .group;
        group.remove_func(Tag::is_label);
        assert_eq!(names(&group), vec!["b", "e"]);

        group.remove_func(|_| true);
        assert!(group.is_empty());
        assert!(group.tags().is_empty());
    }

    #[test]
    fn test_remove_nothing_matches() {
        let mut group = GroupFixture::default().with_tags(&["a", "b"]).group;
        group.remove_names(&["z"]);
        assert_eq!(names(&group), vec!["a", "b"]);
    }

    #[test]
    fn test_sort_names() {
        let mut fixture = GroupFixture::default().with_tags(&["b:1", "a:1", "c:1"]);

        fixture.group.sort_names(false);
        assert_eq!(fixture.names(), vec!["a", "b", "c"]);

        fixture.group.sort_names(true);
        assert_eq!(fixture.names(), vec!["c", "b", "a"]);

        fixture.group.sort_names(true);
        assert_eq!(fixture.names(), vec!["c", "b", "a"]);

        let listed: Vec<String> = fixture
            .group
            .tags()
            .iter()
            .map(|t| t.name().to_string())
            .collect();
        assert_eq!(listed, vec!["c", "b", "a"]);
    }

    #[test]
    fn test_sort_func_is_stable() {
        let mut fixture =
            GroupFixture::default().with_tags(&["d:1,2", "a", "c:1", "b:1,2,3", "e"]);

        // Order by value count only; equal counts keep their relative order.
        fixture
            .group
            .sort_func(|a, b| a.values().len() < b.values().len());
        assert_eq!(fixture.names(), vec!["a", "e", "c", "d", "b"]);

        fixture
            .group
            .sort_func(|a, b| a.values().len() < b.values().len());
        assert_eq!(fixture.names(), vec!["a", "e", "c", "d", "b"]);
    }

    #[test]
    fn test_sort_then_add_appends() {
        let mut fixture = GroupFixture::default().with_tags(&["b", "a"]);
        fixture.group.sort_names(false);
        fixture.group.add([tag("0")]);
        assert_eq!(fixture.names(), vec!["a", "b", "0"]);
    }

    #[test]
    fn test_iter_reports_exact_len() {
        let mut group = GroupFixture::default()
            .with_tags(&["a", "b:1", "c"])
            .group;
        assert_eq!(group.iter().len(), 3);

        group.remove_names(&["b"]);
        let mut iter = group.iter();
        assert_eq!(iter.len(), group.len());
        iter.next();
        assert_eq!(iter.size_hint(), (1, Some(1)));
    }

    #[test]
    fn test_into_iterator() {
        let group = GroupFixture::default().with_tags(&["x", "y"]).group;
        let mut seen = Vec::new();
        for tag in &group {
            seen.push(tag.name());
        }
        assert_eq!(seen, vec!["x", "y"]);
    }

    #[test]
    fn test_serialization_roundtrip() {
        let mut group = TagGroup::new(
            "service-x",
            [tag("env:prod"), tag("team:search,infra"), tag("critical")],
        )
        .unwrap();
        group.sort_names(false);

        let json = serde_json::to_string(&group).unwrap();
        assert_eq!(
            json,
            r#"{"name":"service-x","tags":["critical","env:prod","team:search,infra"]}"#
        );

        let loaded: TagGroup = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.name(), "service-x");
        assert_eq!(loaded.tags(), group.tags());
    }

    #[test]
    fn test_deserialize_validates_name() {
        let result: std::result::Result<TagGroup, _> =
            serde_json::from_str(r#"{"name":" ","tags":["x"]}"#);
        assert!(result.is_err());

        let group: TagGroup = serde_json::from_str(r#"{"name":"g"}"#).unwrap();
        assert!(group.is_empty());
    }

    #[test]
    fn test_deserialize_duplicate_names_last_wins() {
        let group: TagGroup =
            serde_json::from_str(r#"{"name":"g","tags":["x:1","x:2"]}"#).unwrap();
        assert_eq!(group.len(), 1);
        assert_eq!(group.get("x").unwrap().value(), "2");
    }
}
