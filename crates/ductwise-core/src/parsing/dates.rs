use chrono::{Duration, NaiveDate, NaiveDateTime};

/// Display form used in the master sheet, e.g. `05-Jan-2024`.
pub const DISPLAY_FORMAT: &str = "%d-%b-%Y";
/// Canonical text form for date-times read from or written to spreadsheets.
pub const CANONICAL_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d-%b-%Y %H:%M:%S",
];

// Month-first slash dates win over day-first ones; day-first only catches
// values like 25/12/2024 that are invalid month-first.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d-%b-%Y",
    "%d %b %Y",
    "%b %d, %Y",
    "%d.%m.%Y",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%d-%m-%Y",
];

/// Parse a date or date-time cell. Returns `None` for anything unrecognised.
pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// Convert an Excel serial date number (days since 1899-12-30) to a date-time.
pub fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    // 2_958_465 is 9999-12-31, the last date Excel can represent.
    if !serial.is_finite() || !(0.0..=2_958_466.0).contains(&serial) {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let days = serial.trunc() as i64;
    let secs = ((serial - serial.trunc()) * 86_400.0).round() as i64;
    epoch
        .checked_add_signed(Duration::days(days))?
        .checked_add_signed(Duration::seconds(secs))
}

pub fn to_canonical(dt: &NaiveDateTime) -> String {
    dt.format(CANONICAL_FORMAT).to_string()
}

pub fn to_display(dt: &NaiveDateTime) -> String {
    dt.format(DISPLAY_FORMAT).to_string()
}

/// Reformat a whole date column for display.
///
/// When at least one value parses, every parseable value becomes
/// `DD-Mon-YYYY` and every other value becomes blank. When nothing parses
/// the column is returned untouched.
pub fn format_date_column(values: &[Option<String>]) -> Vec<Option<String>> {
    let parsed: Vec<Option<NaiveDateTime>> = values
        .iter()
        .map(|v| v.as_deref().and_then(parse_datetime))
        .collect();

    if parsed.iter().all(Option::is_none) {
        return values.to_vec();
    }

    parsed.iter().map(|p| p.as_ref().map(to_display)).collect()
}
