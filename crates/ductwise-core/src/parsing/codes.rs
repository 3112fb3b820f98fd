use regex::Regex;
use std::sync::LazyLock;

/// Three-digit duct number followed by one of the known suffix shapes:
/// `P02`, `X01`/`HX01`/`ABC123`, or a plain three-digit run.
static DUCT_NO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{3})(?:P\d{2}|[A-Z]{1,3}\d{2,3}|\d{3})$").expect("valid duct number regex")
});

/// Extract the duct number from a DU code such as `AHU-04-637X01 (rev 2)`.
pub fn extract_duct_no(code: Option<&str>) -> Option<String> {
    let code = code?;
    let core = code.split('(').next().unwrap_or_default().trim();
    let upper = core.to_uppercase();
    DUCT_NO_RE
        .captures(&upper)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Split a package code like `U1-WBS20-XYZ` into `(Unit No, WBS Code)`.
pub fn extract_unit_wbs(code: Option<&str>) -> (Option<String>, Option<String>) {
    let Some(code) = code else {
        return (None, None);
    };
    let stripped = code.trim().trim_matches('-');
    let parts: Vec<&str> = stripped.split('-').collect();

    match parts.as_slice() {
        [unit, wbs, ..] => (Some(unit.to_string()), Some(format!("{unit}-{wbs}"))),
        [unit] if !unit.is_empty() => (Some(unit.to_string()), None),
        _ => (None, None),
    }
}
