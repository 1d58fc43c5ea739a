// Marked word entry
// A vocabulary entry flagged for review, keyed by its (eng, vnm) pair

use serde_json::{Map, Value};

/// A validated marked-word record
///
/// Always a JSON object whose `eng` field is a string. Other fields,
/// including `vnm`, are kept exactly as the client sent them.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkedWord(Map<String, Value>);

impl MarkedWord {
    /// Validate a raw JSON value; `None` if it is not an object with a string `eng`
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) if fields.get("eng").is_some_and(Value::is_string) => {
                Some(Self(fields))
            }
            _ => None,
        }
    }

    pub fn eng(&self) -> &str {
        self.0.get("eng").and_then(Value::as_str).unwrap_or_default()
    }

    pub fn vnm(&self) -> Option<&Value> {
        self.0.get("vnm")
    }

    /// Whether a stored entry carries the same (eng, vnm) key
    ///
    /// Entries that are not objects never match. An absent `vnm` only
    /// matches another absent `vnm`; an explicit `null` is a distinct value.
    pub fn same_key(&self, entry: &Value) -> bool {
        let Some(fields) = entry.as_object() else {
            return false;
        };
        fields.get("eng").and_then(Value::as_str) == Some(self.eng())
            && strict_eq(fields.get("vnm"), self.vnm())
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

/// Strict equality on optional fields
///
/// Objects and arrays are separate instances once parsed, so they never
/// compare equal to each other.
fn strict_eq(a: Option<&Value>, b: Option<&Value>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(Value::Object(_) | Value::Array(_)), _) | (_, Some(Value::Object(_) | Value::Array(_))) => {
            false
        }
        (Some(Value::Number(x)), Some(Value::Number(y))) => x.as_f64() == y.as_f64(),
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn word(value: Value) -> MarkedWord {
        MarkedWord::from_value(value).unwrap()
    }

    #[test]
    fn test_from_value_requires_string_eng() {
        assert!(MarkedWord::from_value(json!({"eng": "dog"})).is_some());
        assert!(MarkedWord::from_value(json!({})).is_none());
        assert!(MarkedWord::from_value(json!({"eng": 5})).is_none());
        assert!(MarkedWord::from_value(json!({"eng": null})).is_none());
        assert!(MarkedWord::from_value(json!("dog")).is_none());
        assert!(MarkedWord::from_value(json!(["dog"])).is_none());
        assert!(MarkedWord::from_value(Value::Null).is_none());
    }

    #[test]
    fn test_same_key_exact_match() {
        let w = word(json!({"eng": "dog", "vnm": "con chó"}));
        assert!(w.same_key(&json!({"eng": "dog", "vnm": "con chó"})));
        assert!(w.same_key(&json!({"eng": "dog", "vnm": "con chó", "note": "x"})));
        assert!(!w.same_key(&json!({"eng": "Dog", "vnm": "con chó"})));
        assert!(!w.same_key(&json!({"eng": "dog", "vnm": "con cho"})));
        assert!(!w.same_key(&json!("dog")));
    }

    #[test]
    fn test_same_key_absent_vnm() {
        let w = word(json!({"eng": "bank"}));
        assert!(w.same_key(&json!({"eng": "bank"})));
        assert!(!w.same_key(&json!({"eng": "bank", "vnm": null})));
        assert!(!w.same_key(&json!({"eng": "bank", "vnm": "ngân hàng"})));
    }

    #[test]
    fn test_same_key_structured_vnm_never_matches() {
        let w = word(json!({"eng": "bank", "vnm": ["ngân hàng"]}));
        assert!(!w.same_key(&json!({"eng": "bank", "vnm": ["ngân hàng"]})));
    }

    #[test]
    fn test_same_key_numbers() {
        let w = word(json!({"eng": "one", "vnm": 1}));
        assert!(w.same_key(&json!({"eng": "one", "vnm": 1.0})));
        assert!(!w.same_key(&json!({"eng": "one", "vnm": "1"})));
    }
}
