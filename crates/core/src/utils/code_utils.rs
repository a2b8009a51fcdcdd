//! Instrument code normalization and snapshot text helpers.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

use crate::constants::INSTRUMENT_CODE_LEN;

lazy_static! {
    /// First run of ASCII digits inside a raw instrument code
    static ref DIGIT_RUN_REGEX: Regex = Regex::new(r"[0-9]+").expect("Invalid regex pattern");
}

/// Extracts a clean instrument code from a raw snapshot value.
///
/// Surrounding whitespace is stripped, the first embedded digit run is taken and
/// cut to [`INSTRUMENT_CODE_LEN`] characters. Returns `None` when the input holds
/// no digits at all.
///
/// ```
/// use quantara_core::utils::normalize_instrument_code;
///
/// assert_eq!(normalize_instrument_code("000001").as_deref(), Some("000001"));
/// assert_eq!(normalize_instrument_code(" sz000001 ").as_deref(), Some("000001"));
/// assert_eq!(normalize_instrument_code("600000.SH").as_deref(), Some("600000"));
/// assert_eq!(normalize_instrument_code("N/A"), None);
/// ```
pub fn normalize_instrument_code(raw: &str) -> Option<String> {
    DIGIT_RUN_REGEX
        .find(raw.trim())
        .map(|run| run.as_str()[..run.len().min(INSTRUMENT_CODE_LEN)].to_string())
}

/// Renders a snapshot cell as trimmed text.
///
/// Strings are taken verbatim, `null` becomes empty and every other value uses
/// its JSON rendering (numeric codes written by the producer end up as digits).
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.trim().to_string(),
        other => other.to_string().trim().to_string(),
    }
}
