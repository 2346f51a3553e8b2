use super::element::{ElementKind, TaggedElement};

/// Shape problems found on an element before it is exported.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{kind} {id} is missing '{attribute}'")]
    MissingAttribute {
        kind: &'static str,
        id: i64,
        attribute: &'static str,
    },
    #[error("{kind} {id} has non-numeric '{attribute}' = '{value}'")]
    NotNumeric {
        kind: &'static str,
        id: i64,
        attribute: &'static str,
        value: String,
    },
    #[error("{kind} {id} has '{attribute}' = {value} outside [{min}, {max}]")]
    OutOfRange {
        kind: &'static str,
        id: i64,
        attribute: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

/// Checks the attributes a database import relies on: coordinates for
/// nodes and integer metadata for every element.
pub fn validate_element(element: &TaggedElement) -> Result<(), ValidationError> {
    let kind = element.kind.label();

    if element.kind == ElementKind::Node {
        check_coordinate(element, "lat", -90.0, 90.0)?;
        check_coordinate(element, "lon", -180.0, 180.0)?;
    }

    for attribute in ["uid", "version", "changeset"] {
        if let Some(value) = element.attribute(attribute) {
            if value.trim().parse::<i64>().is_err() {
                return Err(ValidationError::NotNumeric {
                    kind,
                    id: element.id,
                    attribute,
                    value: value.to_string(),
                });
            }
        }
    }

    Ok(())
}

fn check_coordinate(
    element: &TaggedElement,
    attribute: &'static str,
    min: f64,
    max: f64,
) -> Result<(), ValidationError> {
    let kind = element.kind.label();
    let raw = element
        .attribute(attribute)
        .ok_or(ValidationError::MissingAttribute {
            kind,
            id: element.id,
            attribute,
        })?;
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| ValidationError::NotNumeric {
            kind,
            id: element.id,
            attribute,
            value: raw.to_string(),
        })?;

    if !(min..=max).contains(&value) {
        return Err(ValidationError::OutOfRange {
            kind,
            id: element.id,
            attribute,
            value,
            min,
            max,
        });
    }
    Ok(())
}
