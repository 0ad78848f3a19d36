use chrono::{DateTime, NaiveDate};
use serde_json::Value;

/// Default renderer: scalars as text, related records by name, nothing for null.
pub fn plain(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::Bool(flag)) => (if *flag { "yes" } else { "no" }).to_string(),
        Some(Value::Array(_)) => join_names(value),
        Some(Value::Object(_)) => nested_name(value),
    }
}

/// Joins related records (`[{name}, ...]`) into `"A, B"`.
pub fn join_names(value: Option<&Value>) -> String {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::Object(_) => nested_name(Some(item)),
                other => plain(Some(other)),
            })
            .filter(|name| !name.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        other => plain(other),
    }
}

/// Display name of an embedded record: `name`, then `title`, then `id`.
pub fn nested_name(value: Option<&Value>) -> String {
    match value {
        Some(Value::Object(map)) => ["name", "title", "id"]
            .iter()
            .find_map(|key| map.get(*key).filter(|value| !value.is_null()))
            .map(|value| plain(Some(value)))
            .unwrap_or_default(),
        other => plain(other),
    }
}

/// Trims timestamps to their calendar date.
pub fn date_only(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(raw)) => DateTime::parse_from_rfc3339(raw)
            .map(|stamp| stamp.date_naive())
            .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|_| raw.clone()),
        other => plain(other),
    }
}

/// One decimal place for scores.
pub fn rating(value: Option<&Value>) -> String {
    match value.and_then(Value::as_f64) {
        Some(score) => format!("{score:.1}"),
        None => plain(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plain_handles_scalars() {
        assert_eq!(plain(Some(&json!(42))), "42");
        assert_eq!(plain(Some(&json!(true))), "yes");
        assert_eq!(plain(Some(&Value::Null)), "");
        assert_eq!(plain(None), "");
    }

    #[test]
    fn nested_name_falls_back_to_title() {
        assert_eq!(
            nested_name(Some(&json!({"id": 9, "title": "EarthBound"}))),
            "EarthBound"
        );
        assert_eq!(nested_name(Some(&json!({"id": 9}))), "9");
    }

    #[test]
    fn date_only_accepts_timestamps_and_dates() {
        assert_eq!(
            date_only(Some(&json!("2021-03-04T10:20:30+02:00"))),
            "2021-03-04"
        );
        assert_eq!(date_only(Some(&json!("1999-12-31"))), "1999-12-31");
        assert_eq!(date_only(Some(&json!("soon"))), "soon");
    }

    #[test]
    fn rating_rounds_to_one_decimal() {
        assert_eq!(rating(Some(&json!(9))), "9.0");
        assert_eq!(rating(Some(&json!("n/a"))), "n/a");
    }
}
