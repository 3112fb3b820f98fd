use rust_decimal::Decimal;
use std::str::FromStr;

/// Coerce a weight cell into a number.
///
/// Handles formats like:
/// - "68" -> 68
/// - "12.50" -> 12.50
/// - "1.5e3" -> 1500
/// - "1e30" -> Decimal::MAX (out-of-range numbers saturate)
/// - "", "abc", "NaN" -> 0 (missing or unparseable weights count as zero)
pub fn parse_weight(s: Option<&str>) -> Decimal {
    s.and_then(parse_decimal).unwrap_or(Decimal::ZERO)
}

/// Parse a plain or scientific-notation number.
pub fn parse_decimal(s: &str) -> Option<Decimal> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(d) = Decimal::from_str(s) {
        return Some(d);
    }
    if let Ok(d) = Decimal::from_scientific(s) {
        return Some(d);
    }

    // Last resort for float text the decimal parser rejects (e.g. "1E+3", ".5e1")
    let f: f64 = s.parse().ok()?;
    if !f.is_finite() {
        return None;
    }
    f64_to_decimal(f).or_else(|| Some(saturate(f)))
}

/// Nearest Decimal for a finite float the Decimal range cannot hold.
fn saturate(f: f64) -> Decimal {
    if f.abs() < 1.0 {
        Decimal::ZERO
    } else if f.is_sign_negative() {
        Decimal::MIN
    } else {
        Decimal::MAX
    }
}

/// Convert f64 to Decimal without floating-point artifacts
/// (e.g., 0.0035_f64 becoming 0.00349999...).
pub fn f64_to_decimal(f: f64) -> Option<Decimal> {
    let s = format!("{f}");
    s.parse::<Decimal>().ok().or_else(|| Decimal::try_from(f).ok())
}
