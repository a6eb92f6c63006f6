//! Decoders for fields the API returns in more than one shape
//!
//! Used as `#[serde(default, deserialize_with = "...")]` on the affected fields.

use serde::de::{self, Deserialize, DeserializeOwned, Deserializer};
use serde_json::Value;

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum Shape<T> {
    Scalar(T),
    Sequence(Vec<Option<T>>),
}

/// Accept a scalar, a list (null elements skipped) or null as a list
pub fn one_or_many<'de, T, D>(field: &'static str, deserializer: D) -> Result<Vec<T>, D::Error>
where
    T: DeserializeOwned,
    D: Deserializer<'de>,
{
    let shape = Option::<Shape<T>>::deserialize(deserializer).map_err(|_| {
        de::Error::custom(format!(
            "{}: expected a string or a list of strings",
            field
        ))
    })?;

    Ok(match shape {
        None => Vec::new(),
        Some(Shape::Scalar(v)) => vec![v],
        Some(Shape::Sequence(vs)) => vs.into_iter().flatten().collect(),
    })
}

/// Accept a JSON string or integer as a string
pub fn string_or_int<'de, D>(field: &'static str, deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) if n.is_i64() || n.is_u64() => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(de::Error::custom(format!(
            "{}: expected a string or an integer, got {}",
            field, other
        ))),
    }
}

/// Custom rule condition `name`
pub fn condition_name<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    one_or_many("name", d)
}

/// Custom rule condition `value`
pub fn condition_value<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    one_or_many("value", d)
}

/// Reputation profile atomic condition `name`
pub fn atomic_condition_name<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    one_or_many("name", d)
}

/// Custom deny `id`
pub fn custom_deny_id<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    string_or_int("id", d)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Condition {
        #[serde(default, deserialize_with = "super::condition_name")]
        name: Vec<String>,
    }

    #[derive(Debug, Deserialize)]
    struct Deny {
        #[serde(deserialize_with = "super::custom_deny_id")]
        id: String,
    }

    fn names(json: &str) -> Vec<String> {
        serde_json::from_str::<Condition>(json).unwrap().name
    }

    #[test]
    fn test_one_or_many_shapes() {
        assert_eq!(names(r#"{"name":"x"}"#), vec!["x"]);
        assert_eq!(names(r#"{"name":["a","b"]}"#), vec!["a", "b"]);
        assert_eq!(names(r#"{"name":["a",null,"b"]}"#), vec!["a", "b"]);
        assert!(names(r#"{"name":null}"#).is_empty());
        assert!(names(r#"{}"#).is_empty());
    }

    #[test]
    fn test_one_or_many_rejects_other_shapes() {
        let err = serde_json::from_str::<Condition>(r#"{"name":{"a":1}}"#).unwrap_err();
        assert!(err.to_string().contains("name: expected a string or a list of strings"));

        assert!(serde_json::from_str::<Condition>(r#"{"name":42}"#).is_err());
    }

    #[test]
    fn test_string_or_int() {
        let deny: Deny = serde_json::from_str(r#"{"id":"deny_custom_622918"}"#).unwrap();
        assert_eq!(deny.id, "deny_custom_622918");

        let deny: Deny = serde_json::from_str(r#"{"id":622918}"#).unwrap();
        assert_eq!(deny.id, "622918");

        let err = serde_json::from_str::<Deny>(r#"{"id":[1]}"#).unwrap_err();
        assert!(err.to_string().contains("id: expected a string or an integer"));
    }
}
