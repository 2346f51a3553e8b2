use crate::osm::ElementKind;
use crate::workflows::phones::PhoneNormalization;
use crate::workflows::streets::{AuditResult, MatchStatus};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct StatusTallyEntry {
    pub status: MatchStatus,
    pub status_label: &'static str,
    pub count: usize,
}

/// Street ways that are not fully matched, in scan order, with a tally over
/// every street way scanned.
#[derive(Debug, Clone, Serialize)]
pub struct StreetAuditReport {
    pub streets_scanned: usize,
    pub flagged: Vec<AuditResult>,
    pub tally: Vec<StatusTallyEntry>,
}

impl StreetAuditReport {
    pub fn count(&self, status: MatchStatus) -> usize {
        self.tally
            .iter()
            .find(|entry| entry.status == status)
            .map_or(0, |entry| entry.count)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PhoneAuditEntry {
    pub kind: ElementKind,
    pub element_id: i64,
    pub key: String,
    #[serde(flatten)]
    pub normalization: PhoneNormalization,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyCountEntry {
    pub key: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct PhoneAuditReport {
    pub entries: Vec<PhoneAuditEntry>,
    /// Most frequent key first.
    pub key_counts: Vec<KeyCountEntry>,
    /// Distinct characters across all audited values, sorted.
    pub characters: Vec<char>,
}

impl PhoneAuditReport {
    pub fn flagged(&self) -> impl Iterator<Item = &PhoneAuditEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.normalization.is_flagged())
    }
}
