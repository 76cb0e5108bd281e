//! JSON front end for filter sets.
//!
//! ```json
//! {
//!   "view": 10,
//!   "of_category": "OST_Walls",
//!   "is_not_type": true,
//!   "parameter_filter": { "parameter": -1001300, "greater": 10.0, "not_equals": 12.0 },
//!   "or_collector": { "of_class": "TextNote" }
//! }
//! ```
//!
//! Element references are integer ids or unique-id strings. Condition values
//! keep their JSON type: `10` builds an integer rule, `10.0` a double rule.
//! The `where` filter takes a closure and cannot be written in JSON.

use super::spec::{get_kind, is_scope_key, ValueShape};
use super::value::{FilterSpec, FilterValue};
use crate::coerce::{CategoryRef, ClassRef, ElementRef};
use crate::config::QueryConfig;
use crate::error::{QueryError, Result};
use crate::model::ParameterId;
use crate::rules::{ParameterFilter, RuleValue};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
struct RawParameterFilter {
    parameter: i64,
    #[serde(default)]
    reverse: bool,
    #[serde(default)]
    case_sensitive: Option<bool>,
    #[serde(default)]
    precision: Option<f64>,
    #[serde(flatten)]
    conditions: BTreeMap<String, Value>,
}

impl FilterSpec {
    /// Build a filter set from a JSON object.
    ///
    /// Parameter predicates are built immediately, with `config` supplying
    /// the rule defaults.
    pub fn from_json(value: &Value, config: &QueryConfig) -> Result<FilterSpec> {
        let object = value.as_object().ok_or_else(|| {
            QueryError::MalformedFilter("a filter set must be a JSON object".to_string())
        })?;
        from_object(object, config)
    }
}

fn from_object(object: &Map<String, Value>, config: &QueryConfig) -> Result<FilterSpec> {
    let mut spec = FilterSpec::new();
    for (key, value) in object {
        let shape = if is_scope_key(key) {
            if key == "view" {
                ValueShape::Element
            } else {
                ValueShape::Elements
            }
        } else {
            get_kind(key)
                .map(|kind| kind.shape)
                .ok_or_else(|| QueryError::UnknownFilter { key: key.clone() })?
        };
        spec.insert(key.as_str(), convert(key, shape, value, config)?);
    }
    Ok(spec)
}

fn convert(
    key: &str,
    shape: ValueShape,
    value: &Value,
    config: &QueryConfig,
) -> Result<FilterValue> {
    let invalid = || QueryError::invalid_value(key, shape.describe());

    match shape {
        ValueShape::Bool => value.as_bool().map(FilterValue::Bool).ok_or_else(invalid),
        ValueShape::Class => value
            .as_str()
            .map(|name| FilterValue::Class(ClassRef::Name(name.to_string())))
            .ok_or_else(invalid),
        ValueShape::Category => match value {
            Value::String(name) => Ok(FilterValue::Category(CategoryRef::Name(name.clone()))),
            Value::Number(number) => number
                .as_i64()
                .map(|raw| FilterValue::Category(CategoryRef::Id(raw)))
                .ok_or_else(invalid),
            _ => Err(invalid()),
        },
        ValueShape::Element => element_ref(value).map(FilterValue::Element).ok_or_else(invalid),
        ValueShape::Elements => match value {
            Value::Array(items) => items
                .iter()
                .map(|item| element_ref(item).ok_or_else(invalid))
                .collect::<Result<Vec<_>>>()
                .map(FilterValue::Elements),
            single => element_ref(single)
                .map(|reference| FilterValue::Elements(vec![reference]))
                .ok_or_else(invalid),
        },
        ValueShape::Parameter => parameter_filter(key, value, config).map(FilterValue::Parameter),
        ValueShape::Query => {
            let object = value.as_object().ok_or_else(invalid)?;
            Ok(FilterValue::Query(Box::new(from_object(object, config)?)))
        }
        ValueShape::Predicate => Err(invalid()),
    }
}

fn element_ref(value: &Value) -> Option<ElementRef> {
    match value {
        Value::Number(number) => number.as_i64().map(ElementRef::Int),
        Value::String(text) => Uuid::parse_str(text).ok().map(ElementRef::UniqueId),
        _ => None,
    }
}

fn parameter_filter(
    key: &str,
    value: &Value,
    config: &QueryConfig,
) -> Result<crate::rules::ParameterPredicate> {
    let raw: RawParameterFilter = serde_json::from_value(value.clone())?;

    let mut filter = ParameterFilter::new(ParameterId::new(raw.parameter)).reverse(raw.reverse);
    if let Some(case_sensitive) = raw.case_sensitive {
        filter = filter.case_sensitive(case_sensitive);
    }
    if let Some(precision) = raw.precision {
        filter = filter.precision(precision);
    }
    for (name, condition) in &raw.conditions {
        let value = rule_value(condition).ok_or_else(|| {
            QueryError::invalid_value(key, "text, number or boolean condition values")
        })?;
        filter = filter.condition(name, value);
    }
    filter.build_with(config)
}

fn rule_value(value: &Value) -> Option<RuleValue> {
    match value {
        Value::String(text) => Some(RuleValue::Text(text.clone())),
        Value::Bool(flag) => Some(RuleValue::from(*flag)),
        Value::Number(number) if number.is_f64() => number.as_f64().map(RuleValue::Double),
        Value::Number(number) => number.as_i64().map(RuleValue::Integer),
        _ => None,
    }
}
