//! Parameter condition grammar.
//!
//! A condition name is one of the comparison operators, optionally prefixed
//! with `not_`. The value's type decides which arguments the rule carries.

use crate::error::RuleError;
use crate::model::ElementId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const NEGATION_PREFIX: &str = "not_";

/// A comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Comparison {
    Equals,
    Contains,
    BeginsWith,
    EndsWith,
    Greater,
    GreaterOrEqual,
    Less,
    LessOrEqual,
}

impl Comparison {
    pub const ALL: &'static [Comparison] = &[
        Comparison::Equals,
        Comparison::Contains,
        Comparison::BeginsWith,
        Comparison::EndsWith,
        Comparison::Greater,
        Comparison::GreaterOrEqual,
        Comparison::Less,
        Comparison::LessOrEqual,
    ];

    /// The keyword used in condition names.
    pub fn keyword(self) -> &'static str {
        match self {
            Comparison::Equals => "equals",
            Comparison::Contains => "contains",
            Comparison::BeginsWith => "begins",
            Comparison::EndsWith => "ends",
            Comparison::Greater => "greater",
            Comparison::GreaterOrEqual => "greater_equal",
            Comparison::Less => "less",
            Comparison::LessOrEqual => "less_equal",
        }
    }

    /// Substring operators only make sense on text.
    pub fn is_text_only(self) -> bool {
        matches!(
            self,
            Comparison::Contains | Comparison::BeginsWith | Comparison::EndsWith
        )
    }
}

/// A parsed condition name such as `greater` or `not_begins`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConditionName {
    pub comparison: Comparison,
    pub negated: bool,
}

impl ConditionName {
    pub fn new(comparison: Comparison, negated: bool) -> Self {
        Self {
            comparison,
            negated,
        }
    }
}

impl FromStr for ConditionName {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (negated, keyword) = match s.strip_prefix(NEGATION_PREFIX) {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        Comparison::ALL
            .iter()
            .find(|comparison| comparison.keyword() == keyword)
            .map(|comparison| ConditionName::new(*comparison, negated))
            .ok_or_else(|| RuleError::UnknownCondition(s.to_string()))
    }
}

impl fmt::Display for ConditionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            f.write_str(NEGATION_PREFIX)?;
        }
        f.write_str(self.comparison.keyword())
    }
}

/// The value a condition compares against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RuleValue {
    Text(String),
    Double(f64),
    Integer(i64),
    Id(ElementId),
}

impl RuleValue {
    pub fn is_text(&self) -> bool {
        matches!(self, RuleValue::Text(_))
    }
}

impl From<&str> for RuleValue {
    fn from(value: &str) -> Self {
        RuleValue::Text(value.to_string())
    }
}

impl From<String> for RuleValue {
    fn from(value: String) -> Self {
        RuleValue::Text(value)
    }
}

impl From<f64> for RuleValue {
    fn from(value: f64) -> Self {
        RuleValue::Double(value)
    }
}

impl From<i64> for RuleValue {
    fn from(value: i64) -> Self {
        RuleValue::Integer(value)
    }
}

impl From<i32> for RuleValue {
    fn from(value: i32) -> Self {
        RuleValue::Integer(i64::from(value))
    }
}

// Yes/No parameters are stored as integers.
impl From<bool> for RuleValue {
    fn from(value: bool) -> Self {
        RuleValue::Integer(i64::from(value))
    }
}

impl From<ElementId> for RuleValue {
    fn from(value: ElementId) -> Self {
        RuleValue::Id(value)
    }
}

/// Per-call or per-condition overrides of the rule defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RuleOptions {
    pub case_sensitive: Option<bool>,
    pub precision: Option<f64>,
}

impl RuleOptions {
    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = Some(case_sensitive);
        self
    }

    pub fn precision(mut self, precision: f64) -> Self {
        self.precision = Some(precision);
        self
    }

    /// Fill unset fields from `fallback`.
    pub fn or(self, fallback: RuleOptions) -> RuleOptions {
        RuleOptions {
            case_sensitive: self.case_sensitive.or(fallback.case_sensitive),
            precision: self.precision.or(fallback.precision),
        }
    }
}

/// One named comparison with its value and optional overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub name: ConditionName,
    pub value: RuleValue,
    pub options: RuleOptions,
}

impl Condition {
    /// Parse the condition name. Unknown names are rejected here.
    pub fn parse(name: &str, value: impl Into<RuleValue>) -> Result<Self, RuleError> {
        Ok(Self {
            name: name.parse()?,
            value: value.into(),
            options: RuleOptions::default(),
        })
    }

    pub fn with_options(mut self, options: RuleOptions) -> Self {
        self.options = options;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_keyword() {
        for comparison in Comparison::ALL {
            let name: ConditionName = comparison.keyword().parse().unwrap();
            assert_eq!(name, ConditionName::new(*comparison, false));
        }
    }

    #[test]
    fn parses_negated_names() {
        let name: ConditionName = "not_begins".parse().unwrap();
        assert_eq!(name.comparison, Comparison::BeginsWith);
        assert!(name.negated);

        let name: ConditionName = "not_greater_equal".parse().unwrap();
        assert_eq!(name.comparison, Comparison::GreaterOrEqual);
        assert!(name.negated);
    }

    #[test]
    fn display_round_trips_the_keyword() {
        let name: ConditionName = "not_less_equal".parse().unwrap();
        assert_eq!(name.to_string(), "not_less_equal");
    }

    #[test]
    fn unknown_names_are_rejected() {
        assert_eq!(
            "between".parse::<ConditionName>(),
            Err(RuleError::UnknownCondition("between".into()))
        );
        assert_eq!(
            "not_".parse::<ConditionName>(),
            Err(RuleError::UnknownCondition("not_".into()))
        );
        assert_eq!(
            "not_not_equals".parse::<ConditionName>(),
            Err(RuleError::UnknownCondition("not_not_equals".into()))
        );
        assert_eq!(
            "EQUALS".parse::<ConditionName>(),
            Err(RuleError::UnknownCondition("EQUALS".into()))
        );
    }

    #[test]
    fn value_conversions() {
        assert_eq!(RuleValue::from("abc"), RuleValue::Text("abc".into()));
        assert_eq!(RuleValue::from(2.5), RuleValue::Double(2.5));
        assert_eq!(RuleValue::from(3), RuleValue::Integer(3));
        assert_eq!(RuleValue::from(true), RuleValue::Integer(1));
        assert_eq!(RuleValue::from(false), RuleValue::Integer(0));
        assert_eq!(
            RuleValue::from(ElementId::new(9)),
            RuleValue::Id(ElementId::new(9))
        );
    }

    #[test]
    fn options_fall_back_field_by_field() {
        let call = RuleOptions::default().precision(0.5);
        let condition = RuleOptions::default().case_sensitive(false);
        let merged = condition.or(call);
        assert_eq!(merged.case_sensitive, Some(false));
        assert_eq!(merged.precision, Some(0.5));
    }
}
