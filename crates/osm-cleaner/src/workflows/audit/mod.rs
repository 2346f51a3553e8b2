//! Read-only audits that report problems without touching the data.

mod phones;
mod streets;
pub mod views;

pub use phones::audit_phone_numbers;
pub use streets::audit_street_names;
pub use views::{
    KeyCountEntry, PhoneAuditEntry, PhoneAuditReport, StatusTallyEntry, StreetAuditReport,
};
