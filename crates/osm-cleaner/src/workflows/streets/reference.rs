use super::corrections::apply_corrections;
use super::normalizer::{capwords, NameNormalization};
use crate::error::ParseError;
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use tracing::{debug, info};

const ENGLISH_COLUMN: &str = "English_Street_Name";
const CHINESE_COLUMN: &str = "Chinese_Street_Name";

/// One official street name pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReferenceEntry {
    pub english: String,
    pub chinese: String,
}

/// Controls how the raw government table is turned into a lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceOptions {
    pub normalization: NameNormalization,
    /// Re-case English names word by word; the published table is upper case.
    pub capitalize_english: bool,
    /// Apply the built-in typo fixes and drop Shenzhen collisions.
    pub apply_corrections: bool,
}

impl Default for ReferenceOptions {
    fn default() -> Self {
        Self {
            normalization: NameNormalization::default(),
            capitalize_english: true,
            apply_corrections: true,
        }
    }
}

impl ReferenceOptions {
    /// Takes names as written, without re-casing or corrections.
    pub fn verbatim(normalization: NameNormalization) -> Self {
        Self {
            normalization,
            capitalize_english: false,
            apply_corrections: false,
        }
    }
}

/// The authoritative bilingual street list, indexed by normalized English
/// and normalized Chinese name. Both keys are unique.
#[derive(Debug, Clone)]
pub struct ReferenceList {
    entries: Vec<ReferenceEntry>,
    by_english: HashMap<String, usize>,
    by_chinese: HashMap<String, usize>,
    normalization: NameNormalization,
}

#[derive(Debug, Default)]
struct RawRow {
    english: Option<String>,
    chinese: Option<String>,
}

impl ReferenceList {
    /// Loads an `.xml` (Lands Department export) or `.csv` street list.
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        options: &ReferenceOptions,
    ) -> Result<Self, ParseError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        let list = match extension.as_deref() {
            Some("xml") => {
                let file = File::open(path).map_err(|source| ParseError::io(path, source))?;
                Self::from_xml_reader(BufReader::new(file), options)?
            }
            Some("csv") => {
                let file = File::open(path).map_err(|source| ParseError::io(path, source))?;
                Self::from_csv_reader(file, options)?
            }
            _ => return Err(ParseError::UnsupportedFormat(path.to_path_buf())),
        };

        info!(
            path = %path.display(),
            entries = list.len(),
            "loaded street name reference list"
        );
        Ok(list)
    }

    pub fn from_xml_reader<R: BufRead>(
        reader: R,
        options: &ReferenceOptions,
    ) -> Result<Self, ParseError> {
        let rows = read_xml_rows(reader)?;
        Ok(Self::build(rows, options))
    }

    pub fn from_csv_reader<R: Read>(
        reader: R,
        options: &ReferenceOptions,
    ) -> Result<Self, ParseError> {
        let rows = read_csv_rows(reader)?;
        Ok(Self::build(rows, options))
    }

    pub fn from_pairs<I, E, C>(pairs: I, options: &ReferenceOptions) -> Self
    where
        I: IntoIterator<Item = (E, C)>,
        E: Into<String>,
        C: Into<String>,
    {
        let rows = pairs
            .into_iter()
            .map(|(english, chinese)| RawRow {
                english: Some(english.into()),
                chinese: Some(chinese.into()),
            })
            .collect();
        Self::build(rows, options)
    }

    fn build(rows: Vec<RawRow>, options: &ReferenceOptions) -> Self {
        let normalization = options.normalization;
        let total = rows.len();

        let mut entries: Vec<ReferenceEntry> = rows
            .into_iter()
            .filter_map(|row| {
                let english = row.english.filter(|value| !value.trim().is_empty())?;
                let chinese = row.chinese.filter(|value| !value.trim().is_empty())?;
                let english = if options.capitalize_english {
                    capwords(&english)
                } else {
                    english
                };
                Some(ReferenceEntry { english, chinese })
            })
            .collect();
        let null_rows = total - entries.len();

        let mut seen = HashSet::new();
        entries.retain(|entry| {
            seen.insert((
                normalization.normalize(&entry.english),
                normalization.normalize(&entry.chinese),
            ))
        });

        // Once identical rows are gone, any repeated key means one name has
        // two different translations.
        let mut english_counts: HashMap<String, usize> = HashMap::new();
        let mut chinese_counts: HashMap<String, usize> = HashMap::new();
        for entry in &entries {
            *english_counts
                .entry(normalization.normalize(&entry.english))
                .or_default() += 1;
            *chinese_counts
                .entry(normalization.normalize(&entry.chinese))
                .or_default() += 1;
        }
        let before_ambiguity = entries.len();
        entries.retain(|entry| {
            english_counts[&normalization.normalize(&entry.english)] == 1
                && chinese_counts[&normalization.normalize(&entry.chinese)] == 1
        });
        let ambiguous_rows = before_ambiguity - entries.len();

        if options.apply_corrections {
            entries = apply_corrections(entries);
        }

        let mut list = Self {
            entries: Vec::with_capacity(entries.len()),
            by_english: HashMap::with_capacity(entries.len()),
            by_chinese: HashMap::with_capacity(entries.len()),
            normalization,
        };
        for entry in entries {
            let english_key = normalization.normalize(&entry.english);
            let chinese_key = normalization.normalize(&entry.chinese);
            if list.by_english.contains_key(&english_key)
                || list.by_chinese.contains_key(&chinese_key)
            {
                debug!(english = %entry.english, chinese = %entry.chinese, "skipping duplicate corrected entry");
                continue;
            }
            let index = list.entries.len();
            list.by_english.insert(english_key, index);
            list.by_chinese.insert(chinese_key, index);
            list.entries.push(entry);
        }

        debug!(
            rows = total,
            null_rows,
            ambiguous_rows,
            kept = list.entries.len(),
            "built street name index"
        );
        list
    }

    pub fn lookup_english(&self, name: &str) -> Option<&ReferenceEntry> {
        self.english_index(name).map(|index| &self.entries[index])
    }

    pub fn lookup_chinese(&self, name: &str) -> Option<&ReferenceEntry> {
        self.chinese_index(name).map(|index| &self.entries[index])
    }

    /// Official Chinese name for an English street name.
    pub fn chinese_for(&self, english: &str) -> Option<&str> {
        self.lookup_english(english)
            .map(|entry| entry.chinese.as_str())
    }

    pub(crate) fn english_index(&self, name: &str) -> Option<usize> {
        self.by_english
            .get(&self.normalization.normalize(name))
            .copied()
    }

    pub(crate) fn chinese_index(&self, name: &str) -> Option<usize> {
        self.by_chinese
            .get(&self.normalization.normalize(name))
            .copied()
    }

    pub fn entries(&self) -> &[ReferenceEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn normalization(&self) -> &NameNormalization {
        &self.normalization
    }
}

#[derive(Debug, Clone, Copy)]
enum Column {
    English,
    Chinese,
}

fn read_xml_rows<R: BufRead>(reader: R) -> Result<Vec<RawRow>, ParseError> {
    let mut reader = Reader::from_reader(reader);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut rows = Vec::new();
    let mut depth = 0usize;
    let mut seen_root = false;
    let mut current: Option<PendingRow> = None;
    let mut capturing: Option<Column> = None;

    loop {
        buf.clear();
        let event = match reader.read_event_into(&mut buf) {
            Ok(event) => event,
            Err(source) => {
                return Err(ParseError::Xml {
                    position: reader.buffer_position() as u64,
                    source,
                })
            }
        };

        match event {
            Event::Start(start) => {
                depth += 1;
                seen_root = true;
                let column = match start.name().as_ref() {
                    b"Row" => {
                        if current.is_none() {
                            current = Some((None, None));
                        }
                        None
                    }
                    b"English_Street_Name" => Some(Column::English),
                    b"Chinese_Street_Name" => Some(Column::Chinese),
                    _ => None,
                };
                if let (Some(column), Some(row)) = (column, current.as_mut()) {
                    *column_slot(row, column) = Some(None);
                    capturing = Some(column);
                }
            }
            Event::Empty(start) => {
                seen_root = true;
                let column = match start.name().as_ref() {
                    b"Row" => {
                        if current.is_none() {
                            rows.push(finish_row(rows.len() + 1, (None, None))?);
                        }
                        None
                    }
                    b"English_Street_Name" => Some(Column::English),
                    b"Chinese_Street_Name" => Some(Column::Chinese),
                    _ => None,
                };
                if let (Some(column), Some(row)) = (column, current.as_mut()) {
                    *column_slot(row, column) = Some(None);
                }
            }
            Event::Text(text) => {
                if let (Some(column), Some(row)) = (capturing, current.as_mut()) {
                    let value = text.unescape().map_err(|source| ParseError::Xml {
                        position: reader.buffer_position() as u64,
                        source,
                    })?;
                    column_slot(row, column)
                        .get_or_insert(None)
                        .get_or_insert_with(String::new)
                        .push_str(&value);
                }
            }
            Event::End(end) => {
                depth = depth.saturating_sub(1);
                match end.name().as_ref() {
                    b"English_Street_Name" | b"Chinese_Street_Name" => capturing = None,
                    b"Row" => {
                        if let Some(row) = current.take() {
                            rows.push(finish_row(rows.len() + 1, row)?);
                        }
                    }
                    _ => {}
                }
            }
            Event::Eof => {
                if depth > 0 {
                    return Err(ParseError::Structure(format!(
                        "street list ended with {depth} unclosed element(s)"
                    )));
                }
                if !seen_root {
                    return Err(ParseError::Structure(
                        "street list has no root element".to_string(),
                    ));
                }
                return Ok(rows);
            }
            _ => {}
        }
    }
}

// English then Chinese. Outer Option: column element seen; inner Option: it had text.
type PendingRow = (Option<Option<String>>, Option<Option<String>>);

fn column_slot(row: &mut PendingRow, column: Column) -> &mut Option<Option<String>> {
    match column {
        Column::English => &mut row.0,
        Column::Chinese => &mut row.1,
    }
}

fn finish_row(
    row: usize,
    (english, chinese): PendingRow,
) -> Result<RawRow, ParseError> {
    let english = english.ok_or(ParseError::MissingColumn {
        row,
        column: ENGLISH_COLUMN,
    })?;
    let chinese = chinese.ok_or(ParseError::MissingColumn {
        row,
        column: CHINESE_COLUMN,
    })?;
    Ok(RawRow { english, chinese })
}

#[derive(Debug, Deserialize)]
struct ReferenceRow {
    #[serde(
        rename = "English_Street_Name",
        alias = "english",
        alias = "English",
        deserialize_with = "empty_string_as_none"
    )]
    english: Option<String>,
    #[serde(
        rename = "Chinese_Street_Name",
        alias = "chinese",
        alias = "Chinese",
        deserialize_with = "empty_string_as_none"
    )]
    chinese: Option<String>,
}

fn read_csv_rows<R: Read>(reader: R) -> Result<Vec<RawRow>, ParseError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    for (column, accepted) in [
        (ENGLISH_COLUMN, [ENGLISH_COLUMN, "english", "English"]),
        (CHINESE_COLUMN, [CHINESE_COLUMN, "chinese", "Chinese"]),
    ] {
        if !headers.iter().any(|header| accepted.contains(&header)) {
            return Err(ParseError::MissingColumn { row: 1, column });
        }
    }

    let mut rows = Vec::new();
    for record in csv_reader.deserialize::<ReferenceRow>() {
        let row = record?;
        rows.push(RawRow {
            english: row.english,
            chinese: row.chinese,
        });
    }
    Ok(rows)
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
