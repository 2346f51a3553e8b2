use super::element::{ElementKind, TaggedElement};
use crate::error::ParseError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// Lazy, single-pass walk over the `<node>` and `<way>` elements of an OSM
/// XML document.
///
/// The iterator stops for good after the first error; scanning again means
/// opening a new scanner.
pub struct OsmScanner<R: BufRead> {
    reader: Reader<R>,
    buf: Vec<u8>,
    depth: usize,
    seen_root: bool,
    current: Option<(TaggedElement, usize)>,
    finished: bool,
}

impl OsmScanner<BufReader<File>> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ParseError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ParseError::io(path, source))?;
        debug!(path = %path.display(), "scanning OSM export");
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> OsmScanner<R> {
    pub fn new(reader: R) -> Self {
        let mut reader = Reader::from_reader(reader);
        reader.config_mut().trim_text(true);
        Self {
            reader,
            buf: Vec::new(),
            depth: 0,
            seen_root: false,
            current: None,
            finished: false,
        }
    }

    fn advance(&mut self) -> Result<Option<TaggedElement>, ParseError> {
        loop {
            self.buf.clear();
            let event = match self.reader.read_event_into(&mut self.buf) {
                Ok(event) => event,
                Err(source) => {
                    return Err(ParseError::Xml {
                        position: self.reader.buffer_position() as u64,
                        source,
                    })
                }
            };

            match event {
                Event::Start(start) => {
                    self.depth += 1;
                    self.seen_root = true;
                    if let Some((element, _)) = self.current.as_mut() {
                        attach_child(element, &start)?;
                    } else if let Some(kind) = element_kind(&start) {
                        self.current = Some((element_from(kind, &start)?, self.depth));
                    }
                }
                Event::Empty(start) => {
                    self.seen_root = true;
                    if let Some((element, _)) = self.current.as_mut() {
                        attach_child(element, &start)?;
                    } else if let Some(kind) = element_kind(&start) {
                        return element_from(kind, &start).map(Some);
                    }
                }
                Event::End(_) => {
                    let closing = matches!(self.current, Some((_, depth)) if depth == self.depth);
                    self.depth = self.depth.saturating_sub(1);
                    if closing {
                        return Ok(self.current.take().map(|(element, _)| element));
                    }
                }
                Event::Eof => {
                    if self.depth > 0 {
                        return Err(ParseError::Structure(format!(
                            "document ended with {} unclosed element(s)",
                            self.depth
                        )));
                    }
                    if !self.seen_root {
                        return Err(ParseError::Structure(
                            "document has no root element".to_string(),
                        ));
                    }
                    return Ok(None);
                }
                _ => {}
            }
        }
    }
}

impl<R: BufRead> Iterator for OsmScanner<R> {
    type Item = Result<TaggedElement, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.advance() {
            Ok(Some(element)) => Some(Ok(element)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(err) => {
                self.finished = true;
                Some(Err(err))
            }
        }
    }
}

fn element_kind(start: &BytesStart<'_>) -> Option<ElementKind> {
    match start.name().as_ref() {
        b"node" => Some(ElementKind::Node),
        b"way" => Some(ElementKind::Way),
        _ => None,
    }
}

fn element_from(kind: ElementKind, start: &BytesStart<'_>) -> Result<TaggedElement, ParseError> {
    let element = kind.label();
    let mut id = None;
    let mut attributes = Vec::new();

    for (name, value) in read_attributes(element, start)? {
        if name == "id" {
            id = Some(parse_i64(element, "id", &value)?);
        } else {
            attributes.push((name, value));
        }
    }

    let id = id.ok_or(ParseError::MissingAttribute {
        element,
        attribute: "id",
    })?;
    let mut tagged = TaggedElement::new(kind, id);
    tagged.attributes.extend(attributes);
    Ok(tagged)
}

fn attach_child(element: &mut TaggedElement, start: &BytesStart<'_>) -> Result<(), ParseError> {
    match start.name().as_ref() {
        b"tag" => {
            let attributes = read_attributes("tag", start)?;
            let key = find_attribute(&attributes, "tag", "k")?;
            let value = find_attribute(&attributes, "tag", "v")?;
            element.tags.insert(key.to_string(), value.to_string());
        }
        b"nd" if element.kind == ElementKind::Way => {
            let attributes = read_attributes("nd", start)?;
            let node_ref = find_attribute(&attributes, "nd", "ref")?;
            element.node_refs.push(parse_i64("nd", "ref", node_ref)?);
        }
        _ => {}
    }
    Ok(())
}

fn read_attributes(
    element: &'static str,
    start: &BytesStart<'_>,
) -> Result<Vec<(String, String)>, ParseError> {
    let mut attributes = Vec::new();
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|err| {
            ParseError::Structure(format!("bad attribute on <{element}>: {err}"))
        })?;
        let name = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute.unescape_value().map_err(|err| {
            ParseError::Structure(format!("bad value for '{name}' on <{element}>: {err}"))
        })?;
        attributes.push((name, value.into_owned()));
    }
    Ok(attributes)
}

fn find_attribute<'a>(
    attributes: &'a [(String, String)],
    element: &'static str,
    attribute: &'static str,
) -> Result<&'a str, ParseError> {
    attributes
        .iter()
        .find(|(name, _)| name == attribute)
        .map(|(_, value)| value.as_str())
        .ok_or(ParseError::MissingAttribute { element, attribute })
}

fn parse_i64(element: &'static str, attribute: &'static str, value: &str) -> Result<i64, ParseError> {
    value
        .trim()
        .parse()
        .map_err(|_| ParseError::InvalidAttribute {
            element,
            attribute,
            value: value.to_string(),
        })
}
