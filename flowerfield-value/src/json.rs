//! JSON text helpers, delegating to `serde_json`.

use crate::value::Value;

/// Parses JSON text into a [`Value`].
pub fn from_str(json: &str) -> Result<Value, serde_json::Error> {
    serde_json::from_str(json)
}

/// Reads one JSON document from `reader` into a [`Value`].
pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Value, serde_json::Error> {
    serde_json::from_reader(reader)
}

/// Writes a [`Value`] to `writer` as compact JSON.
pub fn to_writer<W: std::io::Write>(writer: W, value: &Value) -> Result<(), serde_json::Error> {
    serde_json::to_writer(writer, value)
}

/// Renders a [`Value`] as compact JSON.
pub fn to_string(value: &Value) -> Result<String, serde_json::Error> {
    serde_json::to_string(value)
}

/// Renders a [`Value`] as indented JSON.
pub fn to_string_pretty(value: &Value) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ValueType, value};

    #[test]
    fn parses_numbers_by_kind() {
        let v = from_str(r#"{"i": 3, "f": 3.0, "big": 18446744073709551615}"#).unwrap();
        assert_eq!(v.get("i").map(Value::value_type), Some(ValueType::Integer));
        assert_eq!(v.get("f").map(Value::value_type), Some(ValueType::Float));
        assert_eq!(v.get("big").map(Value::value_type), Some(ValueType::Integer));
    }

    #[test]
    fn round_trips_through_text() {
        let v = value!({ "flowers": [{ "color": "#fff" }], "watered": true, "pot": null });
        let text = to_string(&v).unwrap();
        assert_eq!(
            text,
            r##"{"flowers":[{"color":"#fff"}],"watered":true,"pot":null}"##
        );
        assert_eq!(from_str(&text).unwrap(), v);
    }

    #[test]
    fn reads_and_writes_through_io() {
        let v = from_reader(&br#"{"a": [1, null]}"#[..]).unwrap();
        let mut out = Vec::new();
        to_writer(&mut out, &v).unwrap();
        assert_eq!(out, br#"{"a":[1,null]}"#);
    }

    #[test]
    fn display_matches_compact_json() {
        let v = value!({ "a": [1, 2.5, "x"], "b": { "c": false } });
        assert_eq!(v.to_string(), to_string(&v).unwrap());
    }
}
