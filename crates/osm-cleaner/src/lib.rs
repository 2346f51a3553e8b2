//! Audit and clean a Hong Kong OpenStreetMap export.
//!
//! The crate reads an OSM XML file and the Lands Department street name
//! table, reconciles bilingual street names, normalizes phone numbers and
//! writes CSV files ready for a database import.

pub mod config;
pub mod error;
pub mod osm;
pub mod telemetry;
pub mod workflows;
