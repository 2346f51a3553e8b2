use crate::osm::{ElementKind, TaggedElement};
use crate::workflows::phones::is_dialable_key;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

pub const NODE_FIELDS: [&str; 8] = [
    "id",
    "lat",
    "lon",
    "user",
    "uid",
    "version",
    "changeset",
    "timestamp",
];
pub const WAY_FIELDS: [&str; 6] = ["id", "user", "uid", "version", "changeset", "timestamp"];
pub const TAG_FIELDS: [&str; 4] = ["id", "key", "value", "type"];
pub const WAY_NODE_FIELDS: [&str; 3] = ["id", "node_id", "position"];
pub const UPDATE_HISTORY_FIELDS: [&str; 3] = ["id", "element_type", "field_updated"];
pub const CLEANED_RECORD_FIELDS: [&str; 4] = ["id", "name", "phone", "element_type"];

const DEFAULT_TAG_TYPE: &str = "regular";

#[derive(Debug, Serialize)]
pub(crate) struct NodeRow<'a> {
    id: i64,
    lat: Option<&'a str>,
    lon: Option<&'a str>,
    user: Option<&'a str>,
    uid: Option<&'a str>,
    version: Option<&'a str>,
    changeset: Option<&'a str>,
    timestamp: Option<&'a str>,
}

impl<'a> NodeRow<'a> {
    pub(crate) fn from_element(element: &'a TaggedElement) -> Self {
        Self {
            id: element.id,
            lat: element.attribute("lat"),
            lon: element.attribute("lon"),
            user: element.attribute("user"),
            uid: element.attribute("uid"),
            version: element.attribute("version"),
            changeset: element.attribute("changeset"),
            timestamp: element.attribute("timestamp"),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct WayRow<'a> {
    id: i64,
    user: Option<&'a str>,
    uid: Option<&'a str>,
    version: Option<&'a str>,
    changeset: Option<&'a str>,
    timestamp: Option<&'a str>,
}

impl<'a> WayRow<'a> {
    pub(crate) fn from_element(element: &'a TaggedElement) -> Self {
        Self {
            id: element.id,
            user: element.attribute("user"),
            uid: element.attribute("uid"),
            version: element.attribute("version"),
            changeset: element.attribute("changeset"),
            timestamp: element.attribute("timestamp"),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct WayNodeRow {
    pub id: i64,
    pub node_id: i64,
    pub position: usize,
}

/// One tag, with the key split at its first colon into `type` and `key`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRow {
    pub id: i64,
    pub key: String,
    pub value: String,
    #[serde(rename = "type")]
    pub tag_type: String,
}

impl TagRow {
    /// `None` when the key contains characters a database column cannot hold.
    pub fn new(id: i64, key: &str, value: &str) -> Option<Self> {
        if has_problem_chars(key) {
            return None;
        }
        let (tag_type, key) = key.split_once(':').unwrap_or((DEFAULT_TAG_TYPE, key));
        Some(Self {
            id,
            key: key.to_string(),
            value: value.to_string(),
            tag_type: tag_type.to_string(),
        })
    }
}

fn has_problem_chars(key: &str) -> bool {
    static PROBLEM_CHARS: OnceLock<Regex> = OnceLock::new();
    PROBLEM_CHARS
        .get_or_init(|| {
            Regex::new(r#"[=\+/&<>;'"\?%#$@,\. \t\r\n]"#).expect("problem character regex")
        })
        .is_match(key)
}

/// Which cleaned field an update history row refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdatedField {
    Phone,
    Name,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateHistoryRow {
    pub id: i64,
    pub element_type: ElementKind,
    pub field_updated: UpdatedField,
}

/// Name and phone of an element after cleaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanedRecord {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    pub element_type: ElementKind,
}

impl CleanedRecord {
    /// `None` for elements that carry neither a name nor a dialable phone
    /// tag. The plain `phone` key wins over other dialable keys; `operator`
    /// and `source` never supply the phone.
    pub fn from_element(element: &TaggedElement) -> Option<Self> {
        let name = element.tag("name").map(str::to_string);
        let phone = element
            .tag("phone")
            .or_else(|| {
                element
                    .tags
                    .iter()
                    .find(|(key, _)| is_dialable_key(key))
                    .map(|(_, value)| value.as_str())
            })
            .map(str::to_string);

        if name.is_none() && phone.is_none() {
            return None;
        }
        Some(Self {
            id: element.id,
            name,
            phone,
            element_type: element.kind,
        })
    }
}
