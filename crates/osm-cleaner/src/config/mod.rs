use crate::workflows::streets::{CaseFold, NameNormalization, ReferenceOptions};
use std::env;
use std::fmt;
use std::path::PathBuf;

/// Top-level configuration for a batch run.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub inputs: InputConfig,
    pub output: OutputConfig,
    pub reference: ReferenceOptions,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let osm_file = env::var("OSM_FILE").unwrap_or_else(|_| "Hong_Kong.osm".to_string());
        let street_name_file = env::var("STREET_NAME_FILE")
            .unwrap_or_else(|_| "PSI_Street Name_062017.xml".to_string());
        let output_dir = env::var("OUTPUT_DIR").unwrap_or_else(|_| ".".to_string());
        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let case_fold = match env::var("NAME_CASE_FOLD") {
            Ok(raw) => parse_case_fold(&raw)?,
            Err(_) => CaseFold::Unicode,
        };
        let normalization = NameNormalization {
            case_fold,
            collapse_whitespace: bool_var("NAME_COLLAPSE_WHITESPACE", true)?,
            strip_punctuation: bool_var("NAME_STRIP_PUNCTUATION", false)?,
        };

        Ok(Self {
            inputs: InputConfig {
                osm_file: PathBuf::from(osm_file),
                street_name_file: PathBuf::from(street_name_file),
            },
            output: OutputConfig {
                directory: PathBuf::from(output_dir),
            },
            reference: ReferenceOptions {
                normalization,
                capitalize_english: bool_var("REFERENCE_CAPWORDS", true)?,
                apply_corrections: bool_var("REFERENCE_CORRECTIONS", true)?,
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Locations of the two read-only inputs.
#[derive(Debug, Clone)]
pub struct InputConfig {
    pub osm_file: PathBuf,
    pub street_name_file: PathBuf,
}

/// Where export mode writes its CSV files.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub directory: PathBuf,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

fn bool_var(name: &'static str, default: bool) -> Result<bool, ConfigError> {
    let raw = match env::var(name) {
        Ok(raw) => raw,
        Err(_) => return Ok(default),
    };

    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool { name, value: raw }),
    }
}

fn parse_case_fold(raw: &str) -> Result<CaseFold, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "preserve" | "none" => Ok(CaseFold::Preserve),
        "ascii" => Ok(CaseFold::Ascii),
        "unicode" | "lower" => Ok(CaseFold::Unicode),
        _ => Err(ConfigError::InvalidCaseFold(raw.to_string())),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidBool { name: &'static str, value: String },
    InvalidCaseFold(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidBool { name, value } => {
                write!(f, "{name} must be a boolean, got '{value}'")
            }
            ConfigError::InvalidCaseFold(value) => write!(
                f,
                "NAME_CASE_FOLD must be one of preserve, ascii, unicode; got '{value}'"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for name in [
            "OSM_FILE",
            "STREET_NAME_FILE",
            "OUTPUT_DIR",
            "APP_LOG_LEVEL",
            "NAME_CASE_FOLD",
            "NAME_COLLAPSE_WHITESPACE",
            "NAME_STRIP_PUNCTUATION",
            "REFERENCE_CAPWORDS",
            "REFERENCE_CORRECTIONS",
        ] {
            env::remove_var(name);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.inputs.osm_file, PathBuf::from("Hong_Kong.osm"));
        assert_eq!(
            config.inputs.street_name_file,
            PathBuf::from("PSI_Street Name_062017.xml")
        );
        assert_eq!(config.output.directory, PathBuf::from("."));
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.reference.normalization, NameNormalization::default());
        assert!(config.reference.capitalize_english);
        assert!(config.reference.apply_corrections);
    }

    #[test]
    fn reads_matching_overrides() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("NAME_CASE_FOLD", "preserve");
        env::set_var("NAME_STRIP_PUNCTUATION", "yes");
        env::set_var("REFERENCE_CORRECTIONS", "0");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.reference.normalization.case_fold, CaseFold::Preserve);
        assert!(config.reference.normalization.strip_punctuation);
        assert!(!config.reference.apply_corrections);
        reset_env();
    }

    #[test]
    fn rejects_garbage_booleans() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("NAME_COLLAPSE_WHITESPACE", "maybe");
        let error = AppConfig::load().expect_err("invalid bool");
        assert!(matches!(
            error,
            ConfigError::InvalidBool {
                name: "NAME_COLLAPSE_WHITESPACE",
                ..
            }
        ));
        reset_env();
    }
}
