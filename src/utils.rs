/// Shared utility functions for the indicators service
use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

static LABEL_NOISE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s*()]+").expect("label noise pattern is valid"));

/// Round to two decimal places (cents / hundredths of a percent)
///
/// # Examples
///
/// ```
/// use bcv_indicators::utils::round2;
///
/// assert_eq!(round2(2.678571), 2.68);
/// assert_eq!(round2(-12.344), -12.34);
/// ```
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Clean a period label taken from a date cell
///
/// BCV annotates provisional figures with asterisks and parentheses, e.g.
/// "02/01/2026 (*)". Whitespace and those markers are stripped anywhere in
/// the label.
///
/// # Examples
///
/// ```
/// use bcv_indicators::utils::clean_period_label;
///
/// assert_eq!(clean_period_label("02/01/2026 (*)"), "02/01/2026");
/// assert_eq!(clean_period_label(" 26/12/2025** "), "26/12/2025");
/// ```
pub fn clean_period_label(value: &str) -> String {
    LABEL_NOISE.replace_all(value.trim(), "").into_owned()
}

/// Parse a decimal that may use a comma as the separator ("12,34")
pub fn parse_decimal(value: &str) -> Option<f64> {
    value.trim().replace(',', ".").parse::<f64>().ok()
}

/// Parse a BCV period label (DD/MM/YYYY) into a calendar date
pub fn parse_period_date(label: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(label.trim(), "%d/%m/%Y").ok()
}
