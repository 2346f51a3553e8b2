use super::views::{StatusTallyEntry, StreetAuditReport};
use crate::error::ParseError;
use crate::osm::TaggedElement;
use crate::workflows::streets::{reconcile, MatchStatus, ReferenceList};
use std::collections::HashMap;
use tracing::{debug, info};

/// Reconciles every street way in the stream. A scan error aborts the audit.
pub fn audit_street_names<I>(
    elements: I,
    reference: &ReferenceList,
) -> Result<StreetAuditReport, ParseError>
where
    I: IntoIterator<Item = Result<TaggedElement, ParseError>>,
{
    let mut counts: HashMap<MatchStatus, usize> = HashMap::new();
    let mut flagged = Vec::new();
    let mut streets_scanned = 0;

    for element in elements {
        let element = element?;
        if !element.is_street() {
            continue;
        }
        streets_scanned += 1;

        let result = reconcile(&element, reference);
        *counts.entry(result.status).or_default() += 1;
        if result.status != MatchStatus::FullyMatched {
            debug!(id = element.id, status = result.status.label(), "street flagged");
            flagged.push(result);
        }
    }

    let tally = MatchStatus::ordered()
        .into_iter()
        .map(|status| StatusTallyEntry {
            status,
            status_label: status.label(),
            count: counts.get(&status).copied().unwrap_or_default(),
        })
        .collect();

    info!(
        streets = streets_scanned,
        flagged = flagged.len(),
        "street name audit finished"
    );
    Ok(StreetAuditReport {
        streets_scanned,
        flagged,
        tally,
    })
}
