use super::views::{KeyCountEntry, PhoneAuditEntry, PhoneAuditReport};
use crate::error::ParseError;
use crate::osm::TaggedElement;
use crate::workflows::phones::{is_audited_key, looks_like_phone, normalize_phone_value};
use std::collections::{BTreeSet, HashMap};
use tracing::info;

/// Collects every `phone` or `fax` tag, and every other tag whose value looks
/// like a phone number, along with how it would be normalized.
pub fn audit_phone_numbers<I>(elements: I) -> Result<PhoneAuditReport, ParseError>
where
    I: IntoIterator<Item = Result<TaggedElement, ParseError>>,
{
    let mut entries = Vec::new();
    let mut key_counts: HashMap<String, usize> = HashMap::new();
    let mut characters = BTreeSet::new();

    for element in elements {
        let element = element?;
        for (key, value) in &element.tags {
            let candidate = is_audited_key(key) || value.split(';').any(looks_like_phone);
            if !candidate {
                continue;
            }

            *key_counts.entry(key.clone()).or_default() += 1;
            characters.extend(value.chars());
            entries.push(PhoneAuditEntry {
                kind: element.kind,
                element_id: element.id,
                key: key.clone(),
                normalization: normalize_phone_value(value),
            });
        }
    }

    let mut key_counts: Vec<KeyCountEntry> = key_counts
        .into_iter()
        .map(|(key, count)| KeyCountEntry { key, count })
        .collect();
    key_counts.sort_by(|left, right| {
        right
            .count
            .cmp(&left.count)
            .then_with(|| left.key.cmp(&right.key))
    });

    let report = PhoneAuditReport {
        entries,
        key_counts,
        characters: characters.into_iter().collect(),
    };
    info!(
        values = report.entries.len(),
        flagged = report.flagged().count(),
        "phone audit finished"
    );
    Ok(report)
}
