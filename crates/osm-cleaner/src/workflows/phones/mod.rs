//! Phone number classification and rewriting.

mod patterns;

pub use patterns::{
    canonical_number, is_audited_key, is_dialable_key, is_phone_key, looks_like_phone,
    PhoneRegion, AUDITED_KEYS, DIALABLE_KEYS, PHONE_KEYS,
};

use crate::osm::TaggedElement;
use serde::Serialize;
use tracing::debug;

/// Result of normalizing a raw phone tag value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PhoneOutcome {
    /// Every number in the value was recognized; `value` is the rewrite.
    Normalized {
        value: String,
        regions: Vec<PhoneRegion>,
    },
    /// At least one number fits no accepted pattern and needs manual review.
    Flagged,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhoneNormalization {
    pub original: String,
    #[serde(flatten)]
    pub outcome: PhoneOutcome,
}

impl PhoneNormalization {
    /// The value to store: the canonical rewrite, or the original when flagged.
    pub fn value(&self) -> &str {
        match &self.outcome {
            PhoneOutcome::Normalized { value, .. } => value,
            PhoneOutcome::Flagged => &self.original,
        }
    }

    pub fn is_flagged(&self) -> bool {
        matches!(self.outcome, PhoneOutcome::Flagged)
    }

    pub fn changed(&self) -> bool {
        self.value() != self.original
    }
}

/// Normalizes a value that may hold several numbers separated by `;` or `,`.
/// Recognized numbers are rejoined with `;`.
pub fn normalize_phone_value(raw: &str) -> PhoneNormalization {
    let mut canonical = Vec::new();
    let mut regions = Vec::new();

    for segment in raw.split([';', ',']) {
        if segment.trim().is_empty() {
            continue;
        }
        match canonical_number(segment) {
            Some((region, number)) => {
                regions.push(region);
                canonical.push(number);
            }
            None => {
                return PhoneNormalization {
                    original: raw.to_string(),
                    outcome: PhoneOutcome::Flagged,
                }
            }
        }
    }

    let outcome = if canonical.is_empty() {
        PhoneOutcome::Flagged
    } else {
        PhoneOutcome::Normalized {
            value: canonical.join(";"),
            regions,
        }
    };
    PhoneNormalization {
        original: raw.to_string(),
        outcome,
    }
}

/// Rewrites every recognized phone tag of the element in place. Flagged
/// values are left untouched. Returns whether any tag changed.
pub fn fix_phone_tags(element: &mut TaggedElement) -> bool {
    let id = element.id;
    let mut updated = false;
    for (key, value) in element.tags.iter_mut() {
        if !is_phone_key(key) {
            continue;
        }
        let normalized = normalize_phone_value(value);
        if normalized.is_flagged() {
            debug!(id, key = %key, value = %value, "phone value needs manual review");
            continue;
        }
        if normalized.changed() {
            *value = normalized.value().to_string();
            updated = true;
        }
    }
    updated
}
