use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;

use crate::grouping::cmp_nulls_last;
use crate::model::{Record, DU_CODE, MARK_NO, PO_NO};

static PANEL_NO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^P(\d+)$").expect("valid panel number regex"));
static NUMERIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+$").expect("valid numeric regex"));

/// Display tier of a row, derived from its Mark No.
///
/// Variant order is the sort order: panels first, then plain numbers, then
/// everything else. Within a tier rows compare by their number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MarkClass {
    Panel(u64),
    Numeric(u64),
    Other,
}

impl MarkClass {
    pub fn classify(mark: Option<&str>) -> MarkClass {
        let Some(mark) = mark else {
            return MarkClass::Other;
        };
        let mark = mark.trim().to_uppercase();

        if let Some(caps) = PANEL_NO_RE.captures(&mark) {
            return MarkClass::Panel(saturating_number(&caps[1]));
        }
        if NUMERIC_RE.is_match(&mark) {
            return MarkClass::Numeric(saturating_number(&mark));
        }
        MarkClass::Other
    }
}

/// Digit runs too long for u64 sort after every representable number.
fn saturating_number(digits: &str) -> u64 {
    digits.parse().unwrap_or(u64::MAX)
}

/// Master sheet order: Duct Key, Unit No, mark class, PO No, DU Code.
/// Text keys put nulls last.
fn compare_classified(a: &Record, class_a: MarkClass, b: &Record, class_b: MarkClass) -> Ordering {
    cmp_nulls_last(a.duct_key.as_deref(), b.duct_key.as_deref())
        .then_with(|| cmp_nulls_last(a.unit_no.as_deref(), b.unit_no.as_deref()))
        .then_with(|| class_a.cmp(&class_b))
        .then_with(|| cmp_nulls_last(a.get(PO_NO), b.get(PO_NO)))
        .then_with(|| cmp_nulls_last(a.get(DU_CODE), b.get(DU_CODE)))
}

/// Stable sort into master order; full ties keep their input order.
pub fn sort_master_rows(records: Vec<Record>) -> Vec<Record> {
    let mut classified: Vec<(MarkClass, Record)> = records
        .into_iter()
        .map(|r| (MarkClass::classify(r.get(MARK_NO)), r))
        .collect();
    classified.sort_by(|(ca, a), (cb, b)| compare_classified(a, *ca, b, *cb));
    classified.into_iter().map(|(_, r)| r).collect()
}
