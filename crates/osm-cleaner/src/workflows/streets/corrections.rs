use super::reference::ReferenceEntry;

/// Known defects in the Lands Department table: typos, a trailing
/// ideographic space and names that word capitalisation gets wrong.
const NAME_CORRECTIONS: &[(&str, &str)] = &[
    ("Aberdeent Tuntntel", "Aberdeen Tunnel"),
    ("Wan Chai Interchantge", "Wan Chai Interchange"),
    ("半山徑\u{3000}", "半山徑"),
    ("D'aguilar Street", "D'Aguilar Street"),
    ("O'brien Road", "O'Brien Road"),
    ("Cape D'aguilar Road", "Cape D'Aguilar Road"),
    ("Mcgregor Street", "McGregor Street"),
    ("Boulevard De Cascade", "Boulevard de Cascade"),
    ("Boulevard De Fontaine", "Boulevard de Fontaine"),
    ("Boulevard De Foret", "Boulevard de Foret"),
    ("Boulevard De Mer", "Boulevard de Mer"),
    ("Boulevard Du Lac", "Boulevard du Lac"),
    ("Boulevard Du Palais", "Boulevard du Palais"),
    ("Haven Of Hope Road", "Haven of Hope Road"),
];

/// Shenzhen streets across the border that share a Chinese name with a Hong
/// Kong street in the extract.
const SHENZHEN_STREET_NAMES: &[&str] = &["文昌街", "福民路", "福祥街", "丹桂路"];

pub(crate) fn apply_corrections(entries: Vec<ReferenceEntry>) -> Vec<ReferenceEntry> {
    entries
        .into_iter()
        .map(|entry| ReferenceEntry {
            english: corrected(entry.english),
            chinese: corrected(entry.chinese),
        })
        .filter(|entry| !SHENZHEN_STREET_NAMES.contains(&entry.chinese.as_str()))
        .collect()
}

fn corrected(value: String) -> String {
    NAME_CORRECTIONS
        .iter()
        .find(|(wrong, _)| *wrong == value)
        .map(|(_, right)| right.to_string())
        .unwrap_or(value)
}
