use regex::Regex;
use std::sync::OnceLock;

/// Tag keys, or key suffixes after the first colon, that hold phone numbers.
pub const PHONE_KEYS: [&str; 7] = [
    "phone",
    "fax",
    "whatsapp",
    "mobile",
    "telephone",
    "operator",
    "source",
];

/// Keys whose values are expected to be dialable numbers. `operator` and
/// `source` are rewritten when they hold a number but are usually text.
pub const DIALABLE_KEYS: [&str; 5] = ["phone", "fax", "whatsapp", "mobile", "telephone"];

/// Keys the phone audit selects regardless of their value.
pub const AUDITED_KEYS: [&str; 2] = ["phone", "fax"];

struct StrippedPatterns {
    hong_kong: Regex,
    mainland_mobile: Regex,
    shenzhen_landline: Regex,
    separators: Regex,
}

fn stripped_patterns() -> &'static StrippedPatterns {
    static PATTERNS: OnceLock<StrippedPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| StrippedPatterns {
        hong_kong: Regex::new(r"^852([0-9]{4})([0-9]{4})$").expect("hong kong phone regex"),
        mainland_mobile: Regex::new(r"^(?:86)?(1[3-9][0-9])([0-9]{4})([0-9]{4})$")
            .expect("mainland mobile regex"),
        shenzhen_landline: Regex::new(r"^(?:86)?0?755([0-9]{6,8})$")
            .expect("shenzhen landline regex"),
        separators: Regex::new(r"[- +)(＋]+").expect("phone separator regex"),
    })
}

/// Loose patterns that accept the many ways numbers are typed into tags.
fn loose_patterns() -> &'static [Regex; 3] {
    static PATTERNS: OnceLock<[Regex; 3]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            Regex::new(r"^[＋+(]{0,2}[ ]?(852)?\)?[- ]?([0-9]{4})[- ]?([0-9]{4})$")
                .expect("loose hong kong regex"),
            Regex::new(r"^[＋+(]?(86)?\)?[- ]?\(?0?(755)\)?[- ]?([0-9]{3,4})[- ]?([0-9]{3,4})$")
                .expect("loose shenzhen regex"),
            Regex::new(r"^[＋+(]?(86)?\)?[- ]?(1[3-9][0-9])[- ]?([0-9]{4})[- ]?([0-9]{4})$")
                .expect("loose mainland mobile regex"),
        ]
    })
}

/// Region whose numbering plan a recognized number follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PhoneRegion {
    HongKong,
    MainlandMobile,
    ShenzhenLandline,
}

/// Canonical form of one number, or `None` when it fits no accepted pattern.
pub fn canonical_number(raw: &str) -> Option<(PhoneRegion, String)> {
    let patterns = stripped_patterns();
    let digits = patterns.separators.replace_all(raw.trim(), "");

    if let Some(captures) = patterns.hong_kong.captures(&digits) {
        return Some((
            PhoneRegion::HongKong,
            format!("+852-{}-{}", &captures[1], &captures[2]),
        ));
    }
    if let Some(captures) = patterns.mainland_mobile.captures(&digits) {
        return Some((
            PhoneRegion::MainlandMobile,
            format!("+86-{}-{}-{}", &captures[1], &captures[2], &captures[3]),
        ));
    }
    if let Some(captures) = patterns.shenzhen_landline.captures(&digits) {
        let local = &captures[1];
        let (head, tail) = local.split_at(local.len() / 2);
        return Some((
            PhoneRegion::ShenzhenLandline,
            format!("+86-755-{head}-{tail}"),
        ));
    }
    None
}

pub fn looks_like_phone(value: &str) -> bool {
    let value = value.trim();
    loose_patterns().iter().any(|pattern| pattern.is_match(value))
}

fn key_suffix(key: &str) -> &str {
    key.split_once(':').map_or(key, |(_, rest)| rest)
}

pub fn is_phone_key(key: &str) -> bool {
    PHONE_KEYS.contains(&key_suffix(key))
}

pub fn is_dialable_key(key: &str) -> bool {
    DIALABLE_KEYS.contains(&key_suffix(key))
}

pub fn is_audited_key(key: &str) -> bool {
    AUDITED_KEYS.contains(&key_suffix(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalizes_each_region() {
        assert_eq!(
            canonical_number("(852) 2345-6789"),
            Some((PhoneRegion::HongKong, "+852-2345-6789".to_string()))
        );
        assert_eq!(
            canonical_number("+85 22 19 21222"),
            Some((PhoneRegion::HongKong, "+852-2192-1222".to_string()))
        );
        assert_eq!(
            canonical_number("＋86 138 1234 5678"),
            Some((PhoneRegion::MainlandMobile, "+86-138-1234-5678".to_string()))
        );
        assert_eq!(
            canonical_number("0755-8888 1234"),
            Some((PhoneRegion::ShenzhenLandline, "+86-755-8888-1234".to_string()))
        );
        assert_eq!(
            canonical_number("86 755 1234567"),
            Some((PhoneRegion::ShenzhenLandline, "+86-755-123-4567".to_string()))
        );
        assert_eq!(
            canonical_number("0755 123456"),
            Some((PhoneRegion::ShenzhenLandline, "+86-755-123-456".to_string()))
        );
    }

    #[test]
    fn full_width_digits_are_not_canonical() {
        assert_eq!(canonical_number("+852 ２３４５ ６７８９"), None);
        assert_eq!(canonical_number("0755 １２３４５６７"), None);
        assert_eq!(canonical_number("＋86 １３８ 1234 5678"), None);
    }

    #[test]
    fn rejects_numbers_without_a_known_plan() {
        assert_eq!(canonical_number("1234-5678"), None);
        assert_eq!(canonical_number("+44 20 7946 0958"), None);
        assert_eq!(canonical_number("ask at counter"), None);
    }

    #[test]
    fn loose_patterns_accept_local_formats() {
        assert!(looks_like_phone("2345 6789"));
        assert!(looks_like_phone(" +852-2345-6789"));
        assert!(looks_like_phone("(0755) 8888-1234"));
        assert!(looks_like_phone("13812345678"));
        assert!(!looks_like_phone("Tai Po Road"));
        assert!(!looks_like_phone("12"));
    }

    #[test]
    fn phone_keys_match_on_suffix() {
        assert!(is_phone_key("phone"));
        assert!(is_phone_key("contact:phone"));
        assert!(is_phone_key("contact:fax"));
        assert!(!is_phone_key("phone_count"));
        assert!(!is_phone_key("name:en"));
    }

    #[test]
    fn free_text_keys_are_neither_dialable_nor_audited() {
        assert!(is_phone_key("operator"));
        assert!(is_phone_key("source"));
        assert!(!is_dialable_key("operator"));
        assert!(!is_dialable_key("source"));
        assert!(is_dialable_key("contact:mobile"));
        assert!(is_audited_key("contact:fax"));
        assert!(!is_audited_key("mobile"));
        assert!(!is_audited_key("operator"));
    }
}
