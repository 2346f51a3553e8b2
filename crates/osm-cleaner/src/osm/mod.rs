mod element;
mod scanner;
pub mod validate;

pub use element::{ElementKind, TaggedElement, STREET_HIGHWAY_VALUES};
pub use scanner::OsmScanner;
pub use validate::{validate_element, ValidationError};
