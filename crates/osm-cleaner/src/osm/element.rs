use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Node,
    Way,
}

impl ElementKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Way => "way",
        }
    }
}

/// Highway values that mark a way as a government-named street.
pub const STREET_HIGHWAY_VALUES: [&str; 12] = [
    "motorway",
    "trunk",
    "primary",
    "secondary",
    "tertiary",
    "residential",
    "living_street",
    "pedestrian",
    "track",
    "road",
    "steps",
    "path",
];

/// One `<node>` or `<way>` from the export.
///
/// Tags that are not present on the element are simply absent from `tags`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedElement {
    pub kind: ElementKind,
    pub id: i64,
    /// Metadata attributes other than `id` (`lat`, `lon`, `user`, ...).
    pub attributes: BTreeMap<String, String>,
    pub tags: BTreeMap<String, String>,
    /// `<nd ref>` children of a way, in document order.
    pub node_refs: Vec<i64>,
}

impl TaggedElement {
    pub fn new(kind: ElementKind, id: i64) -> Self {
        Self {
            kind,
            id,
            attributes: BTreeMap::new(),
            tags: BTreeMap::new(),
            node_refs: Vec::new(),
        }
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn is_street(&self) -> bool {
        self.kind == ElementKind::Way
            && self
                .tag("highway")
                .is_some_and(|value| STREET_HIGHWAY_VALUES.contains(&value))
    }
}
