//! Cleans every node and way and writes them out as CSV tables for a
//! database import.

mod rows;

pub use rows::{
    CleanedRecord, TagRow, UpdateHistoryRow, UpdatedField, CLEANED_RECORD_FIELDS, NODE_FIELDS,
    TAG_FIELDS, UPDATE_HISTORY_FIELDS, WAY_FIELDS, WAY_NODE_FIELDS,
};

use crate::error::ParseError;
use crate::osm::{validate_element, ElementKind, TaggedElement, ValidationError};
use crate::workflows::phones::fix_phone_tags;
use crate::workflows::streets::{fix_street_names, ReferenceList};
use rows::{NodeRow, WayNodeRow, WayRow};
use serde::Serialize;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const NODES_FILE: &str = "nodes.csv";
pub const NODE_TAGS_FILE: &str = "nodes_tags.csv";
pub const WAYS_FILE: &str = "ways.csv";
pub const WAY_NODES_FILE: &str = "ways_nodes.csv";
pub const WAY_TAGS_FILE: &str = "ways_tags.csv";
pub const UPDATE_HISTORY_FILE: &str = "update_history.csv";
pub const CLEANED_RECORDS_FILE: &str = "cleaned_records.csv";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write CSV row: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
}

#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub output_dir: PathBuf,
    /// Abort on the first element whose attributes fail validation.
    pub validate: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExportSummary {
    pub nodes: usize,
    pub ways: usize,
    pub tags_written: usize,
    pub tags_skipped: usize,
    pub phones_updated: usize,
    pub names_updated: usize,
    pub cleaned_records: usize,
}

struct CsvSink {
    path: PathBuf,
    writer: csv::Writer<File>,
}

impl CsvSink {
    fn create(dir: &Path, file_name: &str, header: &[&str]) -> Result<Self, ExportError> {
        let path = dir.join(file_name);
        let file = File::create(&path).map_err(|source| ExportError::Io {
            path: path.clone(),
            source,
        })?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.write_record(header)?;
        Ok(Self { path, writer })
    }

    fn write<T: Serialize>(&mut self, row: T) -> Result<(), ExportError> {
        self.writer.serialize(row)?;
        Ok(())
    }

    fn finish(mut self) -> Result<(), ExportError> {
        self.writer.flush().map_err(|source| ExportError::Io {
            path: self.path,
            source,
        })
    }
}

struct ExportSinks {
    nodes: CsvSink,
    node_tags: CsvSink,
    ways: CsvSink,
    way_nodes: CsvSink,
    way_tags: CsvSink,
    update_history: CsvSink,
    cleaned_records: CsvSink,
}

impl ExportSinks {
    fn create(dir: &Path) -> Result<Self, ExportError> {
        fs::create_dir_all(dir).map_err(|source| ExportError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        Ok(Self {
            nodes: CsvSink::create(dir, NODES_FILE, &NODE_FIELDS)?,
            node_tags: CsvSink::create(dir, NODE_TAGS_FILE, &TAG_FIELDS)?,
            ways: CsvSink::create(dir, WAYS_FILE, &WAY_FIELDS)?,
            way_nodes: CsvSink::create(dir, WAY_NODES_FILE, &WAY_NODE_FIELDS)?,
            way_tags: CsvSink::create(dir, WAY_TAGS_FILE, &TAG_FIELDS)?,
            update_history: CsvSink::create(dir, UPDATE_HISTORY_FILE, &UPDATE_HISTORY_FIELDS)?,
            cleaned_records: CsvSink::create(dir, CLEANED_RECORDS_FILE, &CLEANED_RECORD_FIELDS)?,
        })
    }

    fn finish(self) -> Result<(), ExportError> {
        for sink in [
            self.nodes,
            self.node_tags,
            self.ways,
            self.way_nodes,
            self.way_tags,
            self.update_history,
            self.cleaned_records,
        ] {
            sink.finish()?;
        }
        Ok(())
    }
}

/// Cleans each scanned element and appends it to the CSV tables in
/// `options.output_dir`, replacing files from earlier runs.
///
/// Phone tags are normalized on every element and street names are fixed on
/// street ways; each change is recorded in `update_history.csv`. Any error
/// aborts the export and leaves the files as far as they were written.
pub fn export_map<I>(
    elements: I,
    reference: &ReferenceList,
    options: &ExportOptions,
) -> Result<ExportSummary, ExportError>
where
    I: IntoIterator<Item = Result<TaggedElement, ParseError>>,
{
    let mut sinks = ExportSinks::create(&options.output_dir)?;
    let mut summary = ExportSummary::default();

    for element in elements {
        let mut element = element?;
        if options.validate {
            validate_element(&element)?;
        }

        let phone_updated = fix_phone_tags(&mut element);
        let name_updated = fix_street_names(&mut element, reference);

        let tag_sink = match element.kind {
            ElementKind::Node => {
                sinks.nodes.write(NodeRow::from_element(&element))?;
                summary.nodes += 1;
                &mut sinks.node_tags
            }
            ElementKind::Way => {
                sinks.ways.write(WayRow::from_element(&element))?;
                for (position, node_id) in element.node_refs.iter().enumerate() {
                    sinks.way_nodes.write(WayNodeRow {
                        id: element.id,
                        node_id: *node_id,
                        position,
                    })?;
                }
                summary.ways += 1;
                &mut sinks.way_tags
            }
        };

        for (key, value) in &element.tags {
            match TagRow::new(element.id, key, value) {
                Some(row) => {
                    tag_sink.write(row)?;
                    summary.tags_written += 1;
                }
                None => {
                    debug!(id = element.id, key = %key, "skipping tag with problem characters");
                    summary.tags_skipped += 1;
                }
            }
        }

        for (updated, field) in [
            (phone_updated, UpdatedField::Phone),
            (name_updated, UpdatedField::Name),
        ] {
            if updated {
                sinks.update_history.write(UpdateHistoryRow {
                    id: element.id,
                    element_type: element.kind,
                    field_updated: field,
                })?;
            }
        }
        summary.phones_updated += usize::from(phone_updated);
        summary.names_updated += usize::from(name_updated);

        if let Some(record) = CleanedRecord::from_element(&element) {
            sinks.cleaned_records.write(record)?;
            summary.cleaned_records += 1;
        }
    }

    sinks.finish()?;
    info!(
        output_dir = %options.output_dir.display(),
        nodes = summary.nodes,
        ways = summary.ways,
        phones_updated = summary.phones_updated,
        names_updated = summary.names_updated,
        "export finished"
    );
    Ok(summary)
}
