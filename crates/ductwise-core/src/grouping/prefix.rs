use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::model::{Record, DU_DESCRIPTION};

static AB_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bAB\s*\d{3}\b").expect("valid AB code regex"));
static GB_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bGB\s*\d{3}\b").expect("valid GB code regex"));

/// `PANEL` also covers `PANELASSY`; descriptions are uppercased first.
const PANEL_TAG: &str = "PANEL";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DuctPrefix {
    Ab,
    Gb,
}

impl DuctPrefix {
    pub fn as_str(&self) -> &'static str {
        match self {
            DuctPrefix::Ab => "AB",
            DuctPrefix::Gb => "GB",
        }
    }
}

impl fmt::Display for DuctPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decide the prefix for one duct group from its descriptions.
///
/// Tiers are checked across the whole group before moving on, so an exact
/// `AB123`-style code anywhere in the block beats a loose panel match, and
/// AB beats GB at each tier.
pub fn detect_duct_prefix_for_block<'a, I>(descriptions: I) -> Option<DuctPrefix>
where
    I: IntoIterator<Item = &'a str>,
{
    let upper: Vec<String> = descriptions.into_iter().map(str::to_uppercase).collect();

    if upper.iter().any(|d| AB_CODE_RE.is_match(d)) {
        return Some(DuctPrefix::Ab);
    }
    if upper.iter().any(|d| GB_CODE_RE.is_match(d)) {
        return Some(DuctPrefix::Gb);
    }

    let panels: Vec<&String> = upper.iter().filter(|d| d.contains(PANEL_TAG)).collect();
    if panels.iter().any(|d| d.contains("AB")) {
        return Some(DuctPrefix::Ab);
    }
    if panels.iter().any(|d| d.contains("GB")) {
        return Some(DuctPrefix::Gb);
    }
    None
}

/// Compose the effective grouping key.
pub fn duct_key(prefix: Option<DuctPrefix>, duct_no: &str) -> String {
    match prefix {
        Some(p) => format!("{p}{duct_no}"),
        None => duct_no.to_string(),
    }
}

/// Resolve one prefix per duct group and broadcast the key to every row.
///
/// Rows without a duct number end up with no key.
pub fn assign_duct_keys(records: &mut [Record]) {
    let mut blocks: HashMap<String, Vec<&str>> = HashMap::new();
    for record in records.iter() {
        if let Some(duct_no) = record.duct_no.as_deref() {
            let block = blocks.entry(duct_no.to_string()).or_default();
            if let Some(desc) = record.get(DU_DESCRIPTION) {
                block.push(desc);
            }
        }
    }

    let prefixes: HashMap<String, Option<DuctPrefix>> = blocks
        .into_iter()
        .map(|(duct_no, descriptions)| {
            let prefix = detect_duct_prefix_for_block(descriptions);
            (duct_no, prefix)
        })
        .collect();

    for record in records.iter_mut() {
        record.duct_key = record.duct_no.as_deref().map(|duct_no| {
            let prefix = prefixes.get(duct_no).copied().flatten();
            duct_key(prefix, duct_no)
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(duct_no: Option<&str>, desc: Option<&str>) -> Record {
        let mut r = Record {
            duct_no: duct_no.map(String::from),
            ..Default::default()
        };
        if let Some(d) = desc {
            r.cells.insert(DU_DESCRIPTION.into(), d.into());
        }
        r
    }

    #[test]
    fn test_exact_ab_code() {
        assert_eq!(
            detect_duct_prefix_for_block(["Duct section ab 123 north"]),
            Some(DuctPrefix::Ab)
        );
        assert_eq!(detect_duct_prefix_for_block(["AB123"]), Some(DuctPrefix::Ab));
    }

    #[test]
    fn test_exact_code_needs_word_boundaries() {
        // "AB1234" has four digits and "XAB123" has no leading boundary.
        assert_eq!(detect_duct_prefix_for_block(["AB1234", "XAB123"]), None);
    }

    #[test]
    fn test_gb_code() {
        assert_eq!(
            detect_duct_prefix_for_block(["Support GB 450"]),
            Some(DuctPrefix::Gb)
        );
    }

    #[test]
    fn test_ab_beats_gb_anywhere_in_block() {
        assert_eq!(
            detect_duct_prefix_for_block(["GB123 frame", "AB123 frame"]),
            Some(DuctPrefix::Ab)
        );
    }

    #[test]
    fn test_exact_code_beats_panel_match() {
        // The panel row mentions AB, but a GB code wins at an earlier tier.
        assert_eq!(
            detect_duct_prefix_for_block(["Panel assy for LAB", "GB 321"]),
            Some(DuctPrefix::Gb)
        );
    }

    #[test]
    fn test_panel_match() {
        assert_eq!(
            detect_duct_prefix_for_block(["PanelAssy slab side"]),
            Some(DuctPrefix::Ab)
        );
        assert_eq!(
            detect_duct_prefix_for_block(["panel GB side"]),
            Some(DuctPrefix::Gb)
        );
    }

    #[test]
    fn test_panel_and_code_must_share_a_row() {
        assert_eq!(detect_duct_prefix_for_block(["PANEL", "AB side"]), None);
    }

    #[test]
    fn test_no_prefix() {
        assert_eq!(detect_duct_prefix_for_block(["Flange", "Bolt set"]), None);
        assert_eq!(detect_duct_prefix_for_block(Vec::<&str>::new()), None);
    }

    #[test]
    fn test_prefix_broadcast_to_whole_group() {
        let mut records = vec![
            record(Some("637"), Some("Flange")),
            record(Some("637"), Some("Duct AB123")),
            record(Some("637"), None),
            record(Some("512"), Some("Flange")),
            record(None, Some("AB999")),
        ];
        assign_duct_keys(&mut records);

        assert_eq!(records[0].duct_key.as_deref(), Some("AB637"));
        assert_eq!(records[1].duct_key.as_deref(), Some("AB637"));
        assert_eq!(records[2].duct_key.as_deref(), Some("AB637"));
        assert_eq!(records[3].duct_key.as_deref(), Some("512"));
        assert_eq!(records[4].duct_key, None);
    }

    #[test]
    fn test_key_defined_iff_duct_no_defined() {
        let mut records = vec![
            record(Some("100"), Some("GB 100")),
            record(None, None),
            record(Some("200"), None),
        ];
        assign_duct_keys(&mut records);
        for r in &records {
            assert_eq!(r.duct_key.is_some(), r.duct_no.is_some());
        }
    }
}
