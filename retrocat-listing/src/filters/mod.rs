//! Per-entity filter packages.
//!
//! A package declares which filters an entity's list endpoint accepts,
//! what they default to, and how the current values become the `filters`
//! object of a listing query. Packages are static and never mutated.

mod packages;
mod parse;

use std::collections::BTreeMap;

use chrono::NaiveDate;
use retrocat_protocol::listing::FilterPayload;
use retrocat_protocol::Entity;
use serde_json::{json, Number, Value};

use crate::error::FilterError;

pub use packages::{package_for, ARTICLES, COLLECTION, DEVELOPERS, GAMES, GENRES, PLATFORMS};

/// Control type of a declared filter field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    Text,
    Ids,
    NumberRange,
    DateRange,
    Status(&'static [&'static str]),
}

impl FilterKind {
    pub fn describe(&self) -> &'static str {
        match self {
            FilterKind::Text => "text",
            FilterKind::Ids => "a list of ids",
            FilterKind::NumberRange => "a number range",
            FilterKind::DateRange => "a date range",
            FilterKind::Status(_) => "a status value",
        }
    }

    /// Example of the text syntax accepted by [`FilterValue::parse`].
    pub fn syntax(&self) -> String {
        match self {
            FilterKind::Text => "text".to_string(),
            FilterKind::Ids => "1,2,3".to_string(),
            FilterKind::NumberRange => "min..max".to_string(),
            FilterKind::DateRange => "YYYY-MM-DD..YYYY-MM-DD".to_string(),
            FilterKind::Status(values) => values.join("|"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterField {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FilterKind,
}

/// Current value of one filter control.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    Ids(Vec<i64>),
    NumberRange { min: Option<f64>, max: Option<f64> },
    DateRange {
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    },
    Status(String),
}

impl FilterValue {
    pub fn text(value: impl Into<String>) -> Self {
        FilterValue::Text(value.into())
    }

    pub fn status(value: impl Into<String>) -> Self {
        FilterValue::Status(value.into())
    }

    /// Whether the control holds nothing worth sending.
    pub fn is_empty(&self) -> bool {
        match self {
            FilterValue::Text(text) | FilterValue::Status(text) => text.trim().is_empty(),
            FilterValue::Ids(ids) => ids.is_empty(),
            FilterValue::NumberRange { min, max } => min.is_none() && max.is_none(),
            FilterValue::DateRange { from, to } => from.is_none() && to.is_none(),
        }
    }

    fn matches(&self, kind: FilterKind) -> bool {
        matches!(
            (self, kind),
            (FilterValue::Text(_), FilterKind::Text)
                | (FilterValue::Ids(_), FilterKind::Ids)
                | (FilterValue::NumberRange { .. }, FilterKind::NumberRange)
                | (FilterValue::DateRange { .. }, FilterKind::DateRange)
                | (FilterValue::Status(_), FilterKind::Status(_))
        )
    }
}

/// Filter values keyed by field key. Ordered so serialization is stable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterValues {
    values: BTreeMap<String, FilterValue>,
}

impl FilterValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: FilterValue) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: &str, value: FilterValue) -> Option<FilterValue> {
        self.values.insert(key.to_string(), value)
    }

    pub fn remove(&mut self, key: &str) -> Option<FilterValue> {
        self.values.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&FilterValue> {
        self.values.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.values.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Declarative filter configuration for one entity.
#[derive(Debug)]
pub struct FilterPackage {
    entity: Entity,
    fields: &'static [FilterField],
    defaults: fn() -> FilterValues,
}

impl FilterPackage {
    pub const fn new(
        entity: Entity,
        fields: &'static [FilterField],
        defaults: fn() -> FilterValues,
    ) -> Self {
        Self {
            entity,
            fields,
            defaults,
        }
    }

    pub fn entity(&self) -> Entity {
        self.entity
    }

    pub fn fields(&self) -> &'static [FilterField] {
        self.fields
    }

    pub fn field(&self, key: &str) -> Option<&'static FilterField> {
        self.fields.iter().find(|field| field.key == key)
    }

    pub fn default_filters(&self) -> FilterValues {
        (self.defaults)()
    }

    /// Checks a single value against the declared field without serializing the rest.
    pub fn validate(&self, key: &str, value: &FilterValue) -> Result<(), FilterError> {
        let field = self.require_field(key)?;
        serialize_value(field, value).map(|_| ())
    }

    /// Parses CLI-style text for `key` into a value of the declared kind.
    pub fn parse_value(&self, key: &str, raw: &str) -> Result<FilterValue, FilterError> {
        let field = self.require_field(key)?;
        let value = parse::parse_value(field, raw)?;
        serialize_value(field, &value)?;
        Ok(value)
    }

    /// Maps the current filter state into the payload sent to the backend.
    ///
    /// Only declared keys appear in the output; empty controls are omitted.
    pub fn serialize(&self, values: &FilterValues) -> Result<FilterPayload, FilterError> {
        if let Some(unknown) = values.keys().find(|key| self.field(key).is_none()) {
            return Err(FilterError::UnknownField {
                entity: self.entity,
                key: unknown.to_string(),
            });
        }

        let mut payload = FilterPayload::new();
        for field in self.fields {
            let Some(value) = values.get(field.key) else {
                continue;
            };
            if let Some(serialized) = serialize_value(field, value)? {
                payload.insert(field.key.to_string(), serialized);
            }
        }
        Ok(payload)
    }

    fn require_field(&self, key: &str) -> Result<&'static FilterField, FilterError> {
        self.field(key).ok_or_else(|| FilterError::UnknownField {
            entity: self.entity,
            key: key.to_string(),
        })
    }
}

fn serialize_value(field: &FilterField, value: &FilterValue) -> Result<Option<Value>, FilterError> {
    if !value.matches(field.kind) {
        return Err(FilterError::KindMismatch {
            key: field.key.to_string(),
            expected: field.kind.describe(),
        });
    }
    if value.is_empty() {
        return Ok(None);
    }

    let serialized = match value {
        FilterValue::Text(text) => Value::String(text.trim().to_string()),
        FilterValue::Ids(ids) => {
            let mut unique = Vec::with_capacity(ids.len());
            for id in ids {
                if !unique.contains(id) {
                    unique.push(*id);
                }
            }
            json!(unique)
        }
        FilterValue::NumberRange { min, max } => {
            if min.iter().chain(max.iter()).any(|bound| !bound.is_finite()) {
                return Err(FilterError::NonFiniteBound {
                    key: field.key.to_string(),
                });
            }
            if let (Some(min), Some(max)) = (min, max) {
                if min > max {
                    return Err(FilterError::InvertedRange {
                        key: field.key.to_string(),
                    });
                }
            }
            let mut bounds = serde_json::Map::new();
            if let Some(min) = min {
                bounds.insert("min".into(), number(*min));
            }
            if let Some(max) = max {
                bounds.insert("max".into(), number(*max));
            }
            Value::Object(bounds)
        }
        FilterValue::DateRange { from, to } => {
            if let (Some(from), Some(to)) = (from, to) {
                if from > to {
                    return Err(FilterError::InvertedRange {
                        key: field.key.to_string(),
                    });
                }
            }
            let mut bounds = serde_json::Map::new();
            if let Some(from) = from {
                bounds.insert("from".into(), Value::String(from.format("%Y-%m-%d").to_string()));
            }
            if let Some(to) = to {
                bounds.insert("to".into(), Value::String(to.format("%Y-%m-%d").to_string()));
            }
            Value::Object(bounds)
        }
        FilterValue::Status(status) => {
            let allowed = match field.kind {
                FilterKind::Status(allowed) => allowed,
                _ => &[],
            };
            let status = status.trim().to_ascii_lowercase();
            if !allowed.contains(&status.as_str()) {
                return Err(FilterError::UnknownStatus {
                    key: field.key.to_string(),
                    value: status,
                    allowed: allowed.join(", "),
                });
            }
            Value::String(status)
        }
    };
    Ok(Some(serialized))
}

// Whole numbers go out as integers so year ranges read `1990`, not `1990.0`.
// Callers have already rejected non-finite bounds.
fn number(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Value::Number(Number::from(value as i64))
    } else {
        Number::from_f64(value).map_or(Value::Null, Value::Number)
    }
}
