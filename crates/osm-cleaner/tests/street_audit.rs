use osm_cleaner::error::ParseError;
use osm_cleaner::osm::OsmScanner;
use osm_cleaner::workflows::audit::{audit_phone_numbers, audit_street_names};
use osm_cleaner::workflows::streets::{
    CaseFold, MatchStatus, NameNormalization, NameTag, ReferenceList, ReferenceOptions,
};
use std::collections::BTreeSet;
use std::io::Cursor;

const STREET_TABLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Streets>
  <Row><English_Street_Name>TAI PO ROAD</English_Street_Name><Chinese_Street_Name>大埔道</Chinese_Street_Name></Row>
  <Row><English_Street_Name>NATHAN ROAD</English_Street_Name><Chinese_Street_Name>彌敦道</Chinese_Street_Name></Row>
  <Row><English_Street_Name>ABERDEENT TUNTNTEL</English_Street_Name><Chinese_Street_Name>香港仔隧道</Chinese_Street_Name></Row>
  <Row><English_Street_Name>D'AGUILAR STREET</English_Street_Name><Chinese_Street_Name>德己立街</Chinese_Street_Name></Row>
</Streets>"#;

const OSM_EXTRACT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<osm version="0.6" generator="test">
  <bounds minlat="22.1" minlon="113.8" maxlat="22.6" maxlon="114.4"/>
  <node id="100" lat="22.33" lon="114.16" user="mapper" uid="7" version="2" changeset="11" timestamp="2017-06-01T00:00:00Z">
    <tag k="amenity" v="restaurant"/>
    <tag k="phone" v="+852 2345 6789"/>
  </node>
  <node id="101" lat="22.34" lon="114.17"/>
  <way id="200" user="mapper" uid="7" version="1" changeset="12" timestamp="2017-06-02T00:00:00Z">
    <nd ref="100"/>
    <nd ref="101"/>
    <tag k="highway" v="primary"/>
    <tag k="name" v="Tai Po Road"/>
    <tag k="name:en" v="Tai Po Road"/>
  </way>
  <way id="201">
    <nd ref="101"/>
    <tag k="highway" v="trunk"/>
    <tag k="name" v="彌敦道 Nathan Road"/>
    <tag k="name:en" v="Nathan Road"/>
    <tag k="name:zh" v="彌敦道"/>
  </way>
  <way id="202">
    <tag k="highway" v="secondary"/>
    <tag k="name" v="香港仔隧道 Aberdeen Tunnel"/>
    <tag k="name:en" v="Aberdeen Tunnel"/>
    <tag k="name:zh" v="香港仔隧道口"/>
  </way>
  <way id="203">
    <tag k="highway" v="residential"/>
    <tag k="name" v="Nowhere Lane"/>
  </way>
  <way id="204">
    <tag k="building" v="yes"/>
    <tag k="name" v="Tai Po Road"/>
  </way>
  <way id="205">
    <tag k="highway" v="tertiary"/>
    <tag k="name" v="大埔道 Tai Po Rd"/>
    <tag k="name:en" v="Tai Po Road"/>
    <tag k="name:zh" v="大埔道"/>
  </way>
</osm>"#;

fn reference() -> ReferenceList {
    ReferenceList::from_xml_reader(Cursor::new(STREET_TABLE), &ReferenceOptions::default())
        .expect("street table loads")
}

#[test]
fn every_reference_entry_round_trips_through_english_lookup() {
    let list = reference();
    assert_eq!(list.len(), 4);
    for entry in list.entries() {
        assert_eq!(list.chinese_for(&entry.english), Some(entry.chinese.as_str()));
    }
    assert_eq!(list.chinese_for("Aberdeen Tunnel"), Some("香港仔隧道"));
    assert_eq!(list.chinese_for("D'Aguilar Street"), Some("德己立街"));
}

#[test]
fn audit_reports_every_street_that_is_not_fully_matched() {
    let scanner = OsmScanner::new(Cursor::new(OSM_EXTRACT));
    let report = audit_street_names(scanner, &reference()).expect("audit succeeds");

    assert_eq!(report.streets_scanned, 5);
    let flagged: Vec<(i64, MatchStatus)> = report
        .flagged
        .iter()
        .map(|result| (result.element_id, result.status))
        .collect();
    assert_eq!(
        flagged,
        vec![
            (200, MatchStatus::PartiallyMissing),
            (202, MatchStatus::Mismatched),
            (203, MatchStatus::Unmatched),
            (205, MatchStatus::Mismatched),
        ]
    );

    let tai_po = &report.flagged[0];
    assert_eq!(tai_po.missing_tags, BTreeSet::from([NameTag::NameZh]));
    assert_eq!(
        tai_po.reference.as_ref().map(|entry| entry.chinese.as_str()),
        Some("大埔道")
    );

    let tunnel = &report.flagged[1];
    assert_eq!(tunnel.discrepancies.len(), 1);
    assert_eq!(tunnel.discrepancies[0].tag, NameTag::NameZh);
    assert_eq!(tunnel.discrepancies[0].expected, "香港仔隧道");

    let misspelled = &report.flagged[3];
    assert_eq!(misspelled.discrepancies.len(), 1);
    assert_eq!(misspelled.discrepancies[0].tag, NameTag::Name);
    assert_eq!(misspelled.discrepancies[0].expected, "大埔道 Tai Po Road");

    assert_eq!(report.count(MatchStatus::FullyMatched), 1);
}

#[test]
fn stricter_normalization_turns_case_differences_into_mismatches() {
    let strict = ReferenceList::from_pairs(
        [("Nathan Road", "彌敦道")],
        &ReferenceOptions::verbatim(NameNormalization {
            case_fold: CaseFold::Preserve,
            ..NameNormalization::default()
        }),
    );
    let xml = r#"<osm><way id="1">
        <tag k="highway" v="primary"/>
        <tag k="name" v="彌敦道"/>
        <tag k="name:en" v="NATHAN ROAD"/>
        <tag k="name:zh" v="彌敦道"/>
    </way></osm>"#;

    let report =
        audit_street_names(OsmScanner::new(Cursor::new(xml)), &strict).expect("audit succeeds");
    assert_eq!(report.count(MatchStatus::Mismatched), 1);
}

#[test]
fn truncated_document_aborts_the_audit() {
    let truncated = &OSM_EXTRACT.as_bytes()[..OSM_EXTRACT.len() - 20];
    let error = audit_street_names(OsmScanner::new(Cursor::new(truncated)), &reference())
        .expect_err("truncated input fails");
    assert!(matches!(
        error,
        ParseError::Structure(_) | ParseError::Xml { .. }
    ));
}

#[test]
fn phone_audit_reports_outcomes_in_scan_order() {
    let report =
        audit_phone_numbers(OsmScanner::new(Cursor::new(OSM_EXTRACT))).expect("audit succeeds");
    assert_eq!(report.entries.len(), 1);
    let entry = &report.entries[0];
    assert_eq!(entry.element_id, 100);
    assert_eq!(entry.normalization.value(), "+852-2345-6789");
    assert_eq!(report.flagged().count(), 0);
}
