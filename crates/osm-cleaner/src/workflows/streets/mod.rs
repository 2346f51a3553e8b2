//! Bilingual street name reconciliation against the Lands Department table.

mod corrections;
mod fixer;
mod normalizer;
mod reconcile;
mod reference;

pub use fixer::fix_street_names;
pub use normalizer::{capwords, CaseFold, NameNormalization};
pub use reconcile::{reconcile, AuditResult, Discrepancy, MatchStatus, NameTag};
pub use reference::{ReferenceEntry, ReferenceList, ReferenceOptions};
