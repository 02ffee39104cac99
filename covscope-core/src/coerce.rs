//! Best-effort numeric coercion of report values
//!
//! Report cells carry formatting ("85%", "1,204", "-3.5ms"). Coercion keeps
//! only digits, `.` and `-` and parses what is left. Anything unparseable is
//! 0, never an error.

use crate::record::Record;

/// Coerce a raw cell value to a number
///
/// - Empty input is 0
/// - Every character other than an ASCII digit, `.` or `-` is dropped
/// - A remainder that is not a valid decimal ("", "-", "1.2.3", "5-3") is 0
pub fn coerce_number(value: &str) -> f64 {
    if value.is_empty() {
        return 0.0;
    }

    let stripped: String = value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    stripped.parse::<f64>().unwrap_or(0.0)
}

/// Coerce a record field; an unresolved or absent field is 0
pub fn coerce_field(record: &Record, field: Option<&str>) -> f64 {
    field.map_or(0.0, |name| coerce_number(record.value(name)))
}
