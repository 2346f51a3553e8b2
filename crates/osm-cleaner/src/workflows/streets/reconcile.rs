use super::normalizer::{chinese_segment, english_segment, NameNormalization};
use super::reference::{ReferenceEntry, ReferenceList};
use crate::osm::{ElementKind, TaggedElement};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// The three tags of a bilingual street name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum NameTag {
    #[serde(rename = "name")]
    Name,
    #[serde(rename = "name:en")]
    NameEn,
    #[serde(rename = "name:zh")]
    NameZh,
}

impl NameTag {
    pub const ALL: [Self; 3] = [Self::Name, Self::NameEn, Self::NameZh];

    pub const fn key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::NameEn => "name:en",
            Self::NameZh => "name:zh",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    FullyMatched,
    PartiallyMissing,
    Mismatched,
    Unmatched,
}

impl MatchStatus {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::FullyMatched,
            Self::PartiallyMissing,
            Self::Mismatched,
            Self::Unmatched,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::FullyMatched => "Fully matched",
            Self::PartiallyMissing => "Partially missing",
            Self::Mismatched => "Mismatched",
            Self::Unmatched => "Unmatched",
        }
    }
}

/// A tag whose value disagrees with the official name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Discrepancy {
    pub tag: NameTag,
    pub observed: String,
    pub expected: String,
}

/// Outcome of reconciling one element against the reference list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditResult {
    pub kind: ElementKind,
    pub element_id: i64,
    pub status: MatchStatus,
    /// Observed values of the name tags that are present.
    pub values: BTreeMap<NameTag, String>,
    pub present_tags: BTreeSet<NameTag>,
    pub missing_tags: BTreeSet<NameTag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<ReferenceEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub discrepancies: Vec<Discrepancy>,
}

/// Compares an element's name tags with the official bilingual name.
///
/// The `name` tag selects the reference entry: the whole value or its
/// English part is looked up by English name, the whole value or its
/// Chinese part by Chinese name. No match, or parts pointing at different
/// streets, leaves the element unmatched. Equality is exact after the
/// list's normalization.
pub fn reconcile(element: &TaggedElement, reference: &ReferenceList) -> AuditResult {
    let values: BTreeMap<NameTag, String> = NameTag::ALL
        .into_iter()
        .filter_map(|tag| element.tag(tag.key()).map(|value| (tag, value.to_string())))
        .collect();
    let present_tags: BTreeSet<NameTag> = values.keys().copied().collect();
    let missing_tags: BTreeSet<NameTag> = NameTag::ALL
        .into_iter()
        .filter(|tag| !present_tags.contains(tag))
        .collect();

    let mut result = AuditResult {
        kind: element.kind,
        element_id: element.id,
        status: MatchStatus::Unmatched,
        values,
        present_tags,
        missing_tags,
        reference: None,
        discrepancies: Vec::new(),
    };

    let Some(entry) = element
        .tag(NameTag::Name.key())
        .and_then(|name| resolve_name(name, reference))
    else {
        return result;
    };

    let normalization = reference.normalization();
    if let Some(name) = element.tag(NameTag::Name.key()) {
        if !name_agrees(name, entry, normalization) {
            result.discrepancies.push(Discrepancy {
                tag: NameTag::Name,
                observed: name.to_string(),
                expected: format!("{} {}", entry.chinese, entry.english),
            });
        }
    }
    for (tag, expected) in [
        (NameTag::NameEn, &entry.english),
        (NameTag::NameZh, &entry.chinese),
    ] {
        if let Some(observed) = element.tag(tag.key()) {
            if !normalization.equivalent(observed, expected) {
                result.discrepancies.push(Discrepancy {
                    tag,
                    observed: observed.to_string(),
                    expected: expected.clone(),
                });
            }
        }
    }

    result.status = if result.missing_tags.contains(&NameTag::NameEn)
        || result.missing_tags.contains(&NameTag::NameZh)
    {
        MatchStatus::PartiallyMissing
    } else if !result.discrepancies.is_empty() {
        MatchStatus::Mismatched
    } else {
        MatchStatus::FullyMatched
    };
    result.reference = Some(entry.clone());
    result
}

/// Whether `name` is the official English name, the Chinese name, or both,
/// with every segment it carries spelled the official way.
fn name_agrees(name: &str, entry: &ReferenceEntry, normalization: &NameNormalization) -> bool {
    let combined = format!("{} {}", entry.chinese, entry.english);
    if [entry.english.as_str(), entry.chinese.as_str(), combined.as_str()]
        .into_iter()
        .any(|official| normalization.equivalent(name, official))
    {
        return true;
    }

    let english = english_segment(name);
    let chinese = chinese_segment(name);
    (english.is_some() || chinese.is_some())
        && english.map_or(true, |segment| normalization.equivalent(segment, &entry.english))
        && chinese.map_or(true, |segment| normalization.equivalent(segment, &entry.chinese))
}

fn resolve_name<'a>(name: &str, reference: &'a ReferenceList) -> Option<&'a ReferenceEntry> {
    let mut matches = BTreeSet::new();
    for candidate in [Some(name), english_segment(name)].into_iter().flatten() {
        matches.extend(reference.english_index(candidate));
    }
    for candidate in [Some(name), chinese_segment(name)].into_iter().flatten() {
        matches.extend(reference.chinese_index(candidate));
    }

    match matches.len() {
        1 => matches
            .first()
            .and_then(|index| reference.entries().get(*index)),
        0 => None,
        count => {
            debug!(name, count, "name resolves to conflicting street entries");
            None
        }
    }
}
