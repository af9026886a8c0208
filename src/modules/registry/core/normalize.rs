// Value normalisation for raw workbook cells.
//
// Purpose
// - Turn Excel date serials, ISO strings and free-form dates into `yyyy-mm-dd` (or "").
// - Sanitise numeric form input so it can be parsed and re-entered safely.
//
// Serials
// - Serials use the 1899-12-30 epoch and are taken at face value. The 1900 leap-year quirk is not
//   corrected, so every date in the registry is shifted consistently.
// - Fractions are truncated toward zero, for numbers and numeric strings alike.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeDelta, Utc};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

const EXCEL_EPOCH: NaiveDate = NaiveDate::from_ymd_opt(1899, 12, 30).unwrap();

static ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid ISO date pattern"));
static NUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+(\.\d+)?$").expect("valid numeric pattern"));

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%m/%d/%Y",
    "%Y/%m/%d",
    "%d.%m.%Y",
    "%d %B %Y",
    "%d %b %Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d-%b-%Y",
];

pub fn normalize_date(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Number(number) => number.as_f64().map(serial_to_iso).unwrap_or_default(),
        Value::String(raw) => normalize_date_str(raw),
        _ => String::new(),
    }
}

pub fn normalize_date_str(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    if ISO_DATE.is_match(trimmed) {
        return NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .map(format_iso)
            .unwrap_or_default();
    }
    if NUMERIC.is_match(trimmed) {
        return trimmed
            .parse::<f64>()
            .map(serial_to_iso)
            .unwrap_or_default();
    }
    parse_generic_date(trimmed)
        .map(format_iso)
        .unwrap_or_default()
}

/// Excel serial (1899-12-30 epoch) to `yyyy-mm-dd`, or "" when out of range.
pub fn serial_to_iso(serial: f64) -> String {
    if !serial.is_finite() {
        return String::new();
    }
    let days = serial.trunc();
    if days.abs() > 4_000_000.0 {
        return String::new();
    }
    TimeDelta::try_days(days as i64)
        .and_then(|delta| EXCEL_EPOCH.checked_add_signed(delta))
        .map(format_iso)
        .unwrap_or_default()
}

fn format_iso(date: NaiveDate) -> String {
    if !(0..=9999).contains(&date.year()) {
        return String::new();
    }
    date.format("%Y-%m-%d").to_string()
}

fn parse_generic_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(date_time) = DateTime::parse_from_rfc3339(raw) {
        return Some(date_time.with_timezone(&Utc).date_naive());
    }
    if let Some(date_time) = DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
    {
        return Some(date_time.date());
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
}

/// Keeps digits and the first dot. A trailing dot survives so a value can be typed incrementally.
pub fn normalize_number(value: &str) -> String {
    let mut seen_dot = false;
    value
        .chars()
        .filter(|c| {
            if c.is_ascii_digit() {
                true
            } else if *c == '.' && !seen_dot {
                seen_dot = true;
                true
            } else {
                false
            }
        })
        .collect()
}

pub fn normalize_integer(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

/// Whole-number quantity from a cell or form string; anything unreadable counts as 0.
pub fn parse_quantity(value: &str) -> u32 {
    let number = normalize_number(value);
    let whole = number.split('.').next().unwrap_or_default();
    whole
        .parse::<u64>()
        .map(|n| u32::try_from(n).unwrap_or(u32::MAX))
        .unwrap_or(0)
}

/// Renders a cell the way the sheet displays it: integral numbers lose their `.0`.
pub fn cell_to_string(cell: &Value) -> String {
    match cell {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(number) => {
            if let Some(i) = number.as_i64() {
                i.to_string()
            } else if let Some(u) = number.as_u64() {
                u.to_string()
            } else {
                let f = number.as_f64().unwrap_or_default();
                if f.fract() == 0.0 && f.abs() < 1e15 {
                    (f as i64).to_string()
                } else {
                    f.to_string()
                }
            }
        }
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod normalize_tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(json!(null), "")]
    #[case(json!(""), "")]
    #[case(json!("   "), "")]
    #[case(json!(45000), "2023-03-15")]
    #[case(json!(45000.75), "2023-03-15")]
    #[case(json!(1), "1899-12-31")]
    #[case(json!(60), "1900-02-28")]
    #[case(json!("2024-02-29"), "2024-02-29")]
    #[case(json!("2023-02-29"), "")]
    #[case(json!("45000"), "2023-03-15")]
    #[case(json!("45000.9"), "2023-03-15")]
    #[case(json!("2024-03-05T10:15:00Z"), "2024-03-05")]
    #[case(json!("2024-03-05T10:15:00"), "2024-03-05")]
    #[case(json!("3/5/2024"), "2024-03-05")]
    #[case(json!("05.03.2024"), "2024-03-05")]
    #[case(json!("March 5, 2024"), "2024-03-05")]
    #[case(json!("5 Mar 2024"), "2024-03-05")]
    #[case(json!("not a date"), "")]
    #[case(json!(true), "")]
    fn it_should_normalize_dates(#[case] input: Value, #[case] expected: &str) {
        assert_eq!(normalize_date(&input), expected);
    }

    #[rstest]
    #[case(45000.0)]
    #[case(45000.5)]
    #[case(-1.5)]
    #[case(0.0)]
    #[case(-0.0)]
    #[case(2958465.0)]
    #[case(1e20)]
    fn it_should_treat_numbers_and_their_text_alike(#[case] n: f64) {
        assert_eq!(
            normalize_date(&json!(n)),
            normalize_date(&Value::String(n.to_string()))
        );
    }

    #[rstest]
    #[case(json!(45000))]
    #[case(json!("3/5/2024"))]
    #[case(json!("garbage"))]
    #[case(json!(3_000_000))]
    #[case(json!("2024-13-45"))]
    fn it_should_be_idempotent_on_its_output(#[case] input: Value) {
        let once = normalize_date(&input);
        assert_eq!(normalize_date(&Value::String(once.clone())), once);
    }

    #[rstest]
    #[case("1,250", "1250")]
    #[case("12.", "12.")]
    #[case("1..5", "1.5")]
    #[case("1.2.3", "1.23")]
    #[case("abc", "")]
    #[case("$ 3.50", "3.50")]
    fn it_should_normalize_numbers_idempotently(#[case] input: &str, #[case] expected: &str) {
        let once = normalize_number(input);
        assert_eq!(once, expected);
        assert_eq!(normalize_number(&once), once);
    }

    #[rstest]
    fn it_should_normalize_integers_and_parse_quantities() {
        assert_eq!(normalize_integer("1 2a3"), "123");
        assert_eq!(parse_quantity("240"), 240);
        assert_eq!(parse_quantity(" 12.7 pcs"), 12);
        assert_eq!(parse_quantity(""), 0);
        assert_eq!(parse_quantity("99999999999"), u32::MAX);
    }

    #[rstest]
    #[case(json!(100), "100")]
    #[case(json!(100.0), "100")]
    #[case(json!(2.5), "2.5")]
    #[case(json!(null), "")]
    #[case(json!(" Acme "), " Acme ")]
    #[case(json!(false), "false")]
    fn it_should_render_cells_as_text(#[case] cell: Value, #[case] expected: &str) {
        assert_eq!(cell_to_string(&cell), expected);
    }
}
