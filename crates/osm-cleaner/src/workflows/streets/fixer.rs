use super::reconcile::{reconcile, NameTag};
use super::reference::ReferenceList;
use crate::osm::TaggedElement;

/// Rewrites the name tags of a street that resolves to exactly one official
/// entry, adding any that are missing. `name` becomes `"<Chinese> <English>"`.
///
/// Returns whether any tag changed.
pub fn fix_street_names(element: &mut TaggedElement, reference: &ReferenceList) -> bool {
    if !element.is_street() {
        return false;
    }

    let Some(entry) = reconcile(element, reference).reference else {
        return false;
    };

    let official = [
        (NameTag::Name, format!("{} {}", entry.chinese, entry.english)),
        (NameTag::NameEn, entry.english),
        (NameTag::NameZh, entry.chinese),
    ];

    let mut updated = false;
    for (tag, value) in official {
        if element.tag(tag.key()) != Some(value.as_str()) {
            element.tags.insert(tag.key().to_string(), value);
            updated = true;
        }
    }
    updated
}
