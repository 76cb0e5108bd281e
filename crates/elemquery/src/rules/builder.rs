//! Rule construction.
//!
//! Turns `(name, value)` conditions on one parameter into a
//! [`ParameterPredicate`]:
//!
//! 1. Every name is parsed; an unknown name is a [`RuleError`].
//! 2. Text values carry the effective case-sensitivity flag, numbers the
//!    effective tolerance. Condition options win over call options, call
//!    options win over the configured defaults.
//! 3. `not_` conditions are wrapped in an inverse rule.
//! 4. An empty condition set is a malformed filter.

use super::condition::{Condition, RuleOptions, RuleValue};
use super::rule::{FilterRule, ParameterPredicate, RuleArg};
use crate::config::QueryConfig;
use crate::error::{QueryError, Result, RuleError};
use crate::model::{Element, ParameterId};

/// Default case sensitivity of text rules.
pub const DEFAULT_CASE_SENSITIVE: bool = true;

/// Default tolerance of double rules, in the store's internal length unit.
pub const DEFAULT_PRECISION: f64 = 0.0013020833333333;

/// Build a predicate from already parsed conditions.
pub fn build_predicate(
    parameter: ParameterId,
    conditions: Vec<Condition>,
    options: RuleOptions,
    reverse: bool,
) -> Result<ParameterPredicate> {
    if conditions.is_empty() {
        return Err(QueryError::MalformedFilter(format!(
            "parameter filter on {} has no conditions",
            parameter
        )));
    }

    let rules = conditions
        .into_iter()
        .map(|condition| construct_rule(parameter, condition, options))
        .collect::<std::result::Result<Vec<_>, RuleError>>()?;

    Ok(ParameterPredicate::new(parameter, rules, reverse))
}

fn construct_rule(
    parameter: ParameterId,
    condition: Condition,
    call_options: RuleOptions,
) -> std::result::Result<FilterRule, RuleError> {
    let Condition {
        name,
        value,
        options,
    } = condition;

    if name.comparison.is_text_only() && !value.is_text() {
        return Err(RuleError::TextOnly(name.to_string()));
    }

    let options = options.or(call_options);
    let epsilon = options.precision.unwrap_or(DEFAULT_PRECISION);
    let arg = match value {
        RuleValue::Text(value) => RuleArg::Text {
            value,
            case_sensitive: options.case_sensitive.unwrap_or(DEFAULT_CASE_SENSITIVE),
        },
        RuleValue::Double(value) => RuleArg::Double { value, epsilon },
        RuleValue::Integer(value) => RuleArg::Integer { value, epsilon },
        RuleValue::Id(value) => RuleArg::Id(value),
    };

    tracing::trace!(%parameter, condition = %name, ?arg, "constructed parameter rule");

    let rule = FilterRule::Compare {
        parameter,
        comparison: name.comparison,
        arg,
    };
    Ok(if name.negated { rule.inverted() } else { rule })
}

/// Builder for a parameter predicate using the condition grammar.
///
/// ```
/// use elemquery::model::ParameterId;
/// use elemquery::rules::ParameterFilter;
///
/// let predicate = ParameterFilter::new(ParameterId::new(-1001))
///     .condition("greater", 10.0)
///     .condition("not_equals", 12.0)
///     .build()
///     .unwrap();
/// assert_eq!(predicate.rules().len(), 2);
///
/// assert!(ParameterFilter::new(ParameterId::new(-1001)).build().is_err());
/// ```
#[derive(Debug, Clone)]
pub struct ParameterFilter {
    parameter: ParameterId,
    conditions: Vec<(String, RuleValue, RuleOptions)>,
    options: RuleOptions,
    reverse: bool,
}

impl ParameterFilter {
    pub fn new(parameter: ParameterId) -> Self {
        Self {
            parameter,
            conditions: Vec::new(),
            options: RuleOptions::default(),
            reverse: false,
        }
    }

    /// Filter on a parameter looked up by name on a sample element.
    pub fn named(element: &dyn Element, name: &str) -> Result<Self> {
        let parameter = element.lookup_parameter(name).ok_or_else(|| {
            QueryError::MalformedFilter(format!(
                "element {} has no parameter named '{}'",
                element.id(),
                name
            ))
        })?;
        Ok(Self::new(parameter))
    }

    pub fn parameter(&self) -> ParameterId {
        self.parameter
    }

    pub fn condition(self, name: &str, value: impl Into<RuleValue>) -> Self {
        self.condition_with(name, value, RuleOptions::default())
    }

    /// Add a condition with its own case-sensitivity or precision.
    pub fn condition_with(
        mut self,
        name: &str,
        value: impl Into<RuleValue>,
        options: RuleOptions,
    ) -> Self {
        self.conditions
            .push((name.to_string(), value.into(), options));
        self
    }

    /// Invert the whole predicate: select elements that do NOT pass.
    pub fn reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.options.case_sensitive = Some(case_sensitive);
        self
    }

    pub fn precision(mut self, precision: f64) -> Self {
        self.options.precision = Some(precision);
        self
    }

    /// Build with the process defaults.
    pub fn build(self) -> Result<ParameterPredicate> {
        self.build_with(&QueryConfig::default())
    }

    /// Build with defaults taken from `config`.
    pub fn build_with(self, config: &QueryConfig) -> Result<ParameterPredicate> {
        let options = self.options.or(config.rule_defaults());
        let conditions = self
            .conditions
            .into_iter()
            .map(|(name, value, options)| {
                Condition::parse(&name, value).map(|c| c.with_options(options))
            })
            .collect::<std::result::Result<Vec<_>, RuleError>>()?;
        build_predicate(self.parameter, conditions, options, self.reverse)
    }
}
