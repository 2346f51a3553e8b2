use regex::Regex;
use std::sync::OnceLock;

/// How letter case is folded before two names are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaseFold {
    Preserve,
    Ascii,
    #[default]
    Unicode,
}

/// Comparison rule shared by the reference index and the reconciler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameNormalization {
    pub case_fold: CaseFold,
    pub collapse_whitespace: bool,
    pub strip_punctuation: bool,
}

impl Default for NameNormalization {
    fn default() -> Self {
        Self {
            case_fold: CaseFold::Unicode,
            collapse_whitespace: true,
            strip_punctuation: false,
        }
    }
}

impl NameNormalization {
    pub fn normalize(&self, value: &str) -> String {
        let mut cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
        if self.strip_punctuation {
            cleaned.retain(|ch| !ch.is_ascii_punctuation() || ch == '\'' || ch == '-');
        }

        let spaced = if self.collapse_whitespace {
            cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
        } else {
            cleaned.trim().to_string()
        };

        match self.case_fold {
            CaseFold::Preserve => spaced,
            CaseFold::Ascii => spaced.to_ascii_lowercase(),
            CaseFold::Unicode => spaced.to_lowercase(),
        }
    }

    pub fn equivalent(&self, left: &str, right: &str) -> bool {
        self.normalize(left) == self.normalize(right)
    }
}

/// Upper-cases the first character of every whitespace separated word and
/// lower-cases the rest, joining the words with single spaces.
pub fn capwords(value: &str) -> String {
    value
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// English part of a combined `"<Chinese> <English>"` name tag.
pub(crate) fn english_segment(name: &str) -> Option<&str> {
    static ENGLISH: OnceLock<Regex> = OnceLock::new();
    let pattern = ENGLISH
        .get_or_init(|| Regex::new(r"[ ]*([A-Za-z0-9'\-,. ]{4,})").expect("english name regex"));
    pattern
        .captures(name)
        .and_then(|captures| captures.get(1))
        .map(|segment| segment.as_str().trim())
        .filter(|segment| !segment.is_empty())
}

/// Chinese part of a combined `"<Chinese> <English>"` name tag.
pub(crate) fn chinese_segment(name: &str) -> Option<&str> {
    static CHINESE: OnceLock<Regex> = OnceLock::new();
    let pattern = CHINESE.get_or_init(|| {
        Regex::new(r"([^A-Za-z'\-,. ]+[0-9]?[^A-Za-z'\-,. ]+)").expect("chinese name regex")
    });
    pattern
        .captures(name)
        .and_then(|captures| captures.get(1))
        .map(|segment| segment.as_str().trim())
        .filter(|segment| !segment.is_empty())
}
