use osm_cleaner::osm::{ElementKind, OsmScanner};
use osm_cleaner::workflows::export::{
    export_map, CleanedRecord, ExportError, ExportOptions, TagRow, UpdateHistoryRow,
    UpdatedField, CLEANED_RECORDS_FILE, NODES_FILE, NODE_FIELDS, NODE_TAGS_FILE,
    UPDATE_HISTORY_FILE, WAYS_FILE, WAY_NODES_FILE, WAY_TAGS_FILE,
};
use osm_cleaner::workflows::streets::{NameNormalization, ReferenceList, ReferenceOptions};
use serde::de::DeserializeOwned;
use std::io::Cursor;
use std::path::Path;

const OSM_EXTRACT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<osm version="0.6">
  <node id="1" lat="22.3" lon="114.1" user="a" uid="5" version="3" changeset="9" timestamp="2017-01-01T00:00:00Z">
    <tag k="name" v="Tai Hing, Shop 3 &quot;Old&quot;"/>
    <tag k="contact:phone" v="(852) 2345-6789"/>
    <tag k="opening hours" v="24/7"/>
  </node>
  <node id="2" lat="22.4" lon="114.2" user="b" uid="6" version="1" changeset="9" timestamp="2017-01-02T00:00:00Z">
    <tag k="phone" v="2345 6789"/>
  </node>
  <node id="3" lat="22.5" lon="114.3" user="b" uid="6" version="1" changeset="9" timestamp="2017-01-02T00:00:00Z"/>
  <node id="4" lat="22.5" lon="114.0" user="d" uid="9" version="1" changeset="9" timestamp="2017-01-03T00:00:00Z">
    <tag k="phone" v="0755 123456"/>
  </node>
  <node id="5" lat="22.5" lon="114.0" user="d" uid="9" version="1" changeset="9" timestamp="2017-01-03T00:00:00Z">
    <tag k="fax" v="0755 １２３４５６７"/>
  </node>
  <way id="10" user="c" uid="8" version="4" changeset="10" timestamp="2017-02-01T00:00:00Z">
    <nd ref="1"/>
    <nd ref="2"/>
    <nd ref="3"/>
    <tag k="highway" v="primary"/>
    <tag k="name" v="Tai Po Road"/>
  </way>
</osm>"#;

fn reference() -> ReferenceList {
    ReferenceList::from_pairs(
        [("Tai Po Road", "大埔道")],
        &ReferenceOptions::verbatim(NameNormalization::default()),
    )
}

fn read_rows<T: DeserializeOwned>(path: &Path) -> Vec<T> {
    csv::Reader::from_path(path)
        .expect("csv opens")
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .expect("rows deserialize")
}

fn header(path: &Path) -> Vec<String> {
    csv::Reader::from_path(path)
        .expect("csv opens")
        .headers()
        .expect("header row")
        .iter()
        .map(str::to_string)
        .collect()
}

#[test]
fn export_writes_all_tables_with_cleaned_values() {
    let dir = tempfile::tempdir().expect("temp dir");
    let options = ExportOptions {
        output_dir: dir.path().to_path_buf(),
        validate: true,
    };

    let summary = export_map(OsmScanner::new(Cursor::new(OSM_EXTRACT)), &reference(), &options)
        .expect("export succeeds");
    assert_eq!(summary.nodes, 5);
    assert_eq!(summary.ways, 1);
    assert_eq!(summary.tags_skipped, 1);
    assert_eq!(summary.phones_updated, 2);
    assert_eq!(summary.names_updated, 1);

    assert_eq!(header(&dir.path().join(NODES_FILE)), NODE_FIELDS);
    for file in [WAYS_FILE, WAY_NODES_FILE, UPDATE_HISTORY_FILE] {
        assert!(dir.path().join(file).exists(), "{file} written");
    }

    let node_tags: Vec<TagRow> = read_rows(&dir.path().join(NODE_TAGS_FILE));
    assert_eq!(
        node_tags,
        vec![
            TagRow {
                id: 1,
                key: "phone".to_string(),
                value: "+852-2345-6789".to_string(),
                tag_type: "contact".to_string(),
            },
            TagRow {
                id: 1,
                key: "name".to_string(),
                value: "Tai Hing, Shop 3 \"Old\"".to_string(),
                tag_type: "regular".to_string(),
            },
            TagRow {
                id: 2,
                key: "phone".to_string(),
                value: "2345 6789".to_string(),
                tag_type: "regular".to_string(),
            },
            TagRow {
                id: 4,
                key: "phone".to_string(),
                value: "+86-755-123-456".to_string(),
                tag_type: "regular".to_string(),
            },
            TagRow {
                id: 5,
                key: "fax".to_string(),
                value: "0755 １２３４５６７".to_string(),
                tag_type: "regular".to_string(),
            },
        ]
    );

    let way_tags: Vec<TagRow> = read_rows(&dir.path().join(WAY_TAGS_FILE));
    let name_zh = way_tags
        .iter()
        .find(|row| row.tag_type == "name" && row.key == "zh")
        .expect("name:zh added");
    assert_eq!(name_zh.value, "大埔道");
    assert!(way_tags
        .iter()
        .any(|row| row.key == "name" && row.value == "大埔道 Tai Po Road"));

    let way_nodes: Vec<(i64, i64, usize)> = read_rows(&dir.path().join(WAY_NODES_FILE));
    assert_eq!(way_nodes, vec![(10, 1, 0), (10, 2, 1), (10, 3, 2)]);

    let history: Vec<UpdateHistoryRow> = read_rows(&dir.path().join(UPDATE_HISTORY_FILE));
    assert_eq!(
        history,
        vec![
            UpdateHistoryRow {
                id: 1,
                element_type: ElementKind::Node,
                field_updated: UpdatedField::Phone,
            },
            UpdateHistoryRow {
                id: 4,
                element_type: ElementKind::Node,
                field_updated: UpdatedField::Phone,
            },
            UpdateHistoryRow {
                id: 10,
                element_type: ElementKind::Way,
                field_updated: UpdatedField::Name,
            },
        ]
    );
}

#[test]
fn cleaned_records_read_back_unchanged() {
    let dir = tempfile::tempdir().expect("temp dir");
    let options = ExportOptions {
        output_dir: dir.path().to_path_buf(),
        validate: false,
    };
    export_map(OsmScanner::new(Cursor::new(OSM_EXTRACT)), &reference(), &options)
        .expect("export succeeds");

    let path = dir.path().join(CLEANED_RECORDS_FILE);
    let raw = std::fs::read_to_string(&path).expect("cleaned records readable");
    assert!(raw.contains(r#""Tai Hing, Shop 3 ""Old""""#));

    let records: Vec<CleanedRecord> = read_rows(&path);
    assert_eq!(
        records,
        vec![
            CleanedRecord {
                id: 1,
                name: Some("Tai Hing, Shop 3 \"Old\"".to_string()),
                phone: Some("+852-2345-6789".to_string()),
                element_type: ElementKind::Node,
            },
            CleanedRecord {
                id: 2,
                name: None,
                phone: Some("2345 6789".to_string()),
                element_type: ElementKind::Node,
            },
            CleanedRecord {
                id: 4,
                name: None,
                phone: Some("+86-755-123-456".to_string()),
                element_type: ElementKind::Node,
            },
            CleanedRecord {
                id: 5,
                name: None,
                phone: Some("0755 １２３４５６７".to_string()),
                element_type: ElementKind::Node,
            },
            CleanedRecord {
                id: 10,
                name: Some("大埔道 Tai Po Road".to_string()),
                phone: None,
                element_type: ElementKind::Way,
            },
        ]
    );
}

#[test]
fn validation_failure_aborts_the_export() {
    let dir = tempfile::tempdir().expect("temp dir");
    let options = ExportOptions {
        output_dir: dir.path().to_path_buf(),
        validate: true,
    };
    let xml = r#"<osm><node id="1" lat="95.0" lon="114.1"/></osm>"#;

    let error = export_map(OsmScanner::new(Cursor::new(xml)), &reference(), &options)
        .expect_err("out of range latitude");
    assert!(matches!(error, ExportError::Validation(_)));
}

#[test]
fn malformed_input_surfaces_as_parse_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let options = ExportOptions {
        output_dir: dir.path().to_path_buf(),
        validate: false,
    };
    let xml = r#"<osm><node id="1" lat="22.3" lon="114.1"><tag k="a" v="b"/></way></osm>"#;

    let error = export_map(OsmScanner::new(Cursor::new(xml)), &reference(), &options)
        .expect_err("mismatched end tag");
    assert!(matches!(error, ExportError::Parse(_)));
}
