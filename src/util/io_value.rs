//! Convenience helpers for working with `preserves::IOValue` arguments.

use preserves::IOValue;

/// Short label for the kind of value, used in diagnostics.
pub fn value_kind(value: &IOValue) -> &'static str {
    if value.as_boolean().is_some() {
        "boolean"
    } else if value.as_signed_integer().is_some() {
        "integer"
    } else if value.as_double().is_some() {
        "double"
    } else if value.as_string().is_some() {
        "string"
    } else if value.as_symbol().is_some() {
        "symbol"
    } else if value.is_sequence() {
        "sequence"
    } else if value.is_record() {
        "record"
    } else {
        "value"
    }
}

/// Interpret the value as a UTF-8 string.
pub fn as_text(value: &IOValue) -> Option<String> {
    value.as_string().map(|s| s.to_string())
}

/// Interpret the value as an `i64`.
pub fn as_i64(value: &IOValue) -> Option<i64> {
    value
        .as_signed_integer()
        .and_then(|int| i64::try_from(int.as_ref()).ok())
}

/// Render the kinds of an argument vector, e.g. `string, integer`.
pub fn kinds(args: &[IOValue]) -> String {
    args.iter().map(value_kind).collect::<Vec<_>>().join(", ")
}
