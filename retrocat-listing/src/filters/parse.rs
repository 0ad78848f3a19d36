use chrono::NaiveDate;

use super::{FilterField, FilterKind, FilterValue};
use crate::error::FilterError;

// Range syntax: `a..b`, `a..`, `..b`; a bare value means `a..a`.
fn split_range(raw: &str) -> (Option<&str>, Option<&str>) {
    fn bound(part: &str) -> Option<&str> {
        let part = part.trim();
        (!part.is_empty()).then_some(part)
    }
    match raw.split_once("..") {
        Some((lo, hi)) => (bound(lo), bound(hi)),
        None => (bound(raw), bound(raw)),
    }
}

pub(super) fn parse_value(field: &FilterField, raw: &str) -> Result<FilterValue, FilterError> {
    let fail = |reason: String| FilterError::Parse {
        key: field.key.to_string(),
        raw: raw.to_string(),
        reason,
    };

    match field.kind {
        FilterKind::Text => Ok(FilterValue::Text(raw.trim().to_string())),
        FilterKind::Status(_) => Ok(FilterValue::Status(raw.trim().to_ascii_lowercase())),
        FilterKind::Ids => raw
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.parse::<i64>()
                    .map_err(|err| fail(format!("'{part}' is not an id: {err}")))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(FilterValue::Ids),
        FilterKind::NumberRange => {
            let (min, max) = split_range(raw);
            let number = |part: Option<&str>| {
                part.map(|part| {
                    part.parse::<f64>()
                        .ok()
                        .filter(|value| value.is_finite())
                        .ok_or_else(|| fail(format!("'{part}' is not a number")))
                })
                .transpose()
            };
            Ok(FilterValue::NumberRange {
                min: number(min)?,
                max: number(max)?,
            })
        }
        FilterKind::DateRange => {
            let (from, to) = split_range(raw);
            let date = |part: Option<&str>| {
                part.map(|part| {
                    NaiveDate::parse_from_str(part, "%Y-%m-%d")
                        .map_err(|err| fail(format!("'{part}' is not a YYYY-MM-DD date: {err}")))
                })
                .transpose()
            };
            Ok(FilterValue::DateRange {
                from: date(from)?,
                to: date(to)?,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::{ARTICLES, GAMES};
    use super::*;

    #[test]
    fn parses_id_lists() {
        assert_eq!(
            GAMES.parse_value("platformIds", "1, 2,,5").unwrap(),
            FilterValue::Ids(vec![1, 2, 5])
        );
        assert!(GAMES.parse_value("platformIds", "1,snes").is_err());
    }

    #[test]
    fn parses_open_and_closed_ranges() {
        assert_eq!(
            GAMES.parse_value("releaseYear", "1990..1995").unwrap(),
            FilterValue::NumberRange {
                min: Some(1990.0),
                max: Some(1995.0)
            }
        );
        assert_eq!(
            GAMES.parse_value("rating", "8..").unwrap(),
            FilterValue::NumberRange {
                min: Some(8.0),
                max: None
            }
        );
        assert_eq!(
            GAMES.parse_value("releaseYear", "1994").unwrap(),
            FilterValue::NumberRange {
                min: Some(1994.0),
                max: Some(1994.0)
            }
        );
    }

    #[test]
    fn parse_rejects_inverted_ranges() {
        assert!(matches!(
            GAMES.parse_value("releaseYear", "1999..1990"),
            Err(FilterError::InvertedRange { .. })
        ));
    }

    #[test]
    fn parses_dates_and_statuses() {
        assert_eq!(
            ARTICLES.parse_value("publishedAt", "..2020-12-31").unwrap(),
            FilterValue::DateRange {
                from: None,
                to: NaiveDate::from_ymd_opt(2020, 12, 31)
            }
        );
        assert!(ARTICLES.parse_value("publishedAt", "31/12/2020").is_err());
        assert_eq!(
            ARTICLES.parse_value("status", "DRAFT").unwrap(),
            FilterValue::Status("draft".into())
        );
        assert!(ARTICLES.parse_value("status", "deleted").is_err());
    }

    #[test]
    fn unknown_key_is_reported() {
        assert!(matches!(
            GAMES.parse_value("author", "x"),
            Err(FilterError::UnknownField { .. })
        ));
    }
}
