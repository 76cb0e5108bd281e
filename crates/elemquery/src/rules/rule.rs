//! Constructed predicate rules and the composite parameter predicate.
//!
//! Rule evaluation is three-valued: `Some(true)`, `Some(false)`, or `None`
//! when the element has no such parameter (or stores a different type).
//! Inversion flips a definite answer and keeps `None`, so an element that
//! lacks the parameter matches neither `equals` nor `not_equals`.
//!
//! Integers and doubles are both numbers: a whole-number rule on a double
//! parameter (and the reverse) compares as doubles with the rule's tolerance.
//! A stored NaN is a definite `false` for every comparison.

use super::condition::Comparison;
use crate::model::{Element, ElementId, ParamValue, ParameterId};
use std::cmp::Ordering;

/// Rule argument after type-dependent shaping.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleArg {
    Text { value: String, case_sensitive: bool },
    Double { value: f64, epsilon: f64 },
    /// `epsilon` applies only when the stored value is a double.
    Integer { value: i64, epsilon: f64 },
    Id(ElementId),
}

/// One predicate-rule.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterRule {
    Compare {
        parameter: ParameterId,
        comparison: Comparison,
        arg: RuleArg,
    },
    Inverse(Box<FilterRule>),
}

impl FilterRule {
    pub fn inverted(self) -> FilterRule {
        FilterRule::Inverse(Box::new(self))
    }

    pub fn evaluate(&self, element: &dyn Element) -> Option<bool> {
        match self {
            FilterRule::Inverse(inner) => inner.evaluate(element).map(|passed| !passed),
            FilterRule::Compare {
                parameter,
                comparison,
                arg,
            } => {
                let stored = element.parameter(*parameter)?;
                compare(&stored, *comparison, arg)
            }
        }
    }
}

fn compare(stored: &ParamValue, comparison: Comparison, arg: &RuleArg) -> Option<bool> {
    match (stored, arg) {
        (
            ParamValue::Text(have),
            RuleArg::Text {
                value,
                case_sensitive,
            },
        ) => Some(compare_text(have, value, *case_sensitive, comparison)),
        (ParamValue::Double(have), RuleArg::Double { value, epsilon }) => {
            compare_double(*have, *value, *epsilon, comparison)
        }
        (ParamValue::Integer(have), RuleArg::Integer { value, .. }) => {
            compare_ordering(have.cmp(value), comparison)
        }
        (ParamValue::Double(have), RuleArg::Integer { value, epsilon }) => {
            compare_double(*have, *value as f64, *epsilon, comparison)
        }
        (ParamValue::Integer(have), RuleArg::Double { value, epsilon }) => {
            compare_double(*have as f64, *value, *epsilon, comparison)
        }
        (ParamValue::Id(have), RuleArg::Id(want)) => compare_ordering(have.cmp(want), comparison),
        _ => None,
    }
}

fn compare_text(have: &str, want: &str, case_sensitive: bool, comparison: Comparison) -> bool {
    let (have, want) = if case_sensitive {
        (have.to_string(), want.to_string())
    } else {
        (have.to_lowercase(), want.to_lowercase())
    };
    match comparison {
        Comparison::Equals => have == want,
        Comparison::Contains => have.contains(&want),
        Comparison::BeginsWith => have.starts_with(&want),
        Comparison::EndsWith => have.ends_with(&want),
        Comparison::Greater => have > want,
        Comparison::GreaterOrEqual => have >= want,
        Comparison::Less => have < want,
        Comparison::LessOrEqual => have <= want,
    }
}

fn compare_double(have: f64, want: f64, epsilon: f64, comparison: Comparison) -> Option<bool> {
    if comparison.is_text_only() {
        return None;
    }
    if have.is_nan() || want.is_nan() {
        return Some(false);
    }
    let diff = have - want;
    match comparison {
        Comparison::Equals => Some(diff.abs() <= epsilon),
        Comparison::Greater => Some(diff > epsilon),
        Comparison::GreaterOrEqual => Some(diff >= -epsilon),
        Comparison::Less => Some(-diff > epsilon),
        Comparison::LessOrEqual => Some(diff <= epsilon),
        Comparison::Contains | Comparison::BeginsWith | Comparison::EndsWith => None,
    }
}

fn compare_ordering(ordering: Ordering, comparison: Comparison) -> Option<bool> {
    match comparison {
        Comparison::Equals => Some(ordering == Ordering::Equal),
        Comparison::Greater => Some(ordering == Ordering::Greater),
        Comparison::GreaterOrEqual => Some(ordering != Ordering::Less),
        Comparison::Less => Some(ordering == Ordering::Less),
        Comparison::LessOrEqual => Some(ordering != Ordering::Greater),
        Comparison::Contains | Comparison::BeginsWith | Comparison::EndsWith => None,
    }
}

/// The rules built for one parameter, AND-ed, plus a whole-predicate `reverse`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterPredicate {
    parameter: ParameterId,
    rules: Vec<FilterRule>,
    reverse: bool,
}

impl ParameterPredicate {
    pub(crate) fn new(parameter: ParameterId, rules: Vec<FilterRule>, reverse: bool) -> Self {
        Self {
            parameter,
            rules,
            reverse,
        }
    }

    pub fn parameter(&self) -> ParameterId {
        self.parameter
    }

    pub fn rules(&self) -> &[FilterRule] {
        &self.rules
    }

    pub fn is_reversed(&self) -> bool {
        self.reverse
    }

    /// Membership test. With `reverse`, elements lacking the parameter pass.
    pub fn passes(&self, element: &dyn Element) -> bool {
        let all = self
            .rules
            .iter()
            .all(|rule| rule.evaluate(element) == Some(true));
        all != self.reverse
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ElementClass;
    use crate::store::memory::ElementRecord;

    const HEIGHT: ParameterId = ParameterId::new(-1001);
    const MARK: ParameterId = ParameterId::new(-1002);
    const COUNT: ParameterId = ParameterId::new(-1003);

    fn with_height(height: f64) -> ElementRecord {
        ElementRecord::new(ElementId::new(1), ElementClass::Wall).with_parameter(
            HEIGHT,
            "Height",
            ParamValue::Double(height),
        )
    }

    fn with_mark(mark: &str) -> ElementRecord {
        ElementRecord::new(ElementId::new(2), ElementClass::Wall).with_parameter(
            MARK,
            "Mark",
            ParamValue::Text(mark.into()),
        )
    }

    fn rule(parameter: ParameterId, comparison: Comparison, arg: RuleArg) -> FilterRule {
        FilterRule::Compare {
            parameter,
            comparison,
            arg,
        }
    }

    fn double(value: f64) -> RuleArg {
        RuleArg::Double {
            value,
            epsilon: 0.001,
        }
    }

    fn text(value: &str, case_sensitive: bool) -> RuleArg {
        RuleArg::Text {
            value: value.into(),
            case_sensitive,
        }
    }

    #[test]
    fn double_equals_uses_tolerance() {
        let equals = rule(HEIGHT, Comparison::Equals, double(10.0));
        assert_eq!(equals.evaluate(&with_height(10.0005)), Some(true));
        assert_eq!(equals.evaluate(&with_height(10.01)), Some(false));
    }

    #[test]
    fn double_greater_needs_to_clear_tolerance() {
        let greater = rule(HEIGHT, Comparison::Greater, double(10.0));
        assert_eq!(greater.evaluate(&with_height(10.0005)), Some(false));
        assert_eq!(greater.evaluate(&with_height(10.5)), Some(true));

        let greater_equal = rule(HEIGHT, Comparison::GreaterOrEqual, double(10.0));
        assert_eq!(greater_equal.evaluate(&with_height(9.9995)), Some(true));
        assert_eq!(greater_equal.evaluate(&with_height(9.9)), Some(false));
    }

    #[test]
    fn double_less_and_less_equal() {
        let less = rule(HEIGHT, Comparison::Less, double(10.0));
        assert_eq!(less.evaluate(&with_height(9.0)), Some(true));
        assert_eq!(less.evaluate(&with_height(9.9995)), Some(false));

        let less_equal = rule(HEIGHT, Comparison::LessOrEqual, double(10.0));
        assert_eq!(less_equal.evaluate(&with_height(10.0005)), Some(true));
        assert_eq!(less_equal.evaluate(&with_height(10.5)), Some(false));
    }

    #[test]
    fn text_case_sensitivity() {
        let sensitive = rule(MARK, Comparison::Equals, text("abc", true));
        let insensitive = rule(MARK, Comparison::Equals, text("abc", false));
        assert_eq!(sensitive.evaluate(&with_mark("ABC")), Some(false));
        assert_eq!(insensitive.evaluate(&with_mark("ABC")), Some(true));
    }

    #[test]
    fn text_substring_operators() {
        let mark = with_mark("W-101-A");
        assert_eq!(
            rule(MARK, Comparison::Contains, text("101", true)).evaluate(&mark),
            Some(true)
        );
        assert_eq!(
            rule(MARK, Comparison::BeginsWith, text("w-", false)).evaluate(&mark),
            Some(true)
        );
        assert_eq!(
            rule(MARK, Comparison::EndsWith, text("B", true)).evaluate(&mark),
            Some(false)
        );
    }

    #[test]
    fn missing_parameter_is_undetermined_even_when_inverted() {
        let equals = rule(HEIGHT, Comparison::Equals, double(10.0));
        let element = with_mark("x");
        assert_eq!(equals.evaluate(&element), None);
        assert_eq!(equals.clone().inverted().evaluate(&element), None);
    }

    fn integer(value: i64) -> RuleArg {
        RuleArg::Integer {
            value,
            epsilon: 0.001,
        }
    }

    #[test]
    fn text_against_number_is_undetermined() {
        let equals = rule(HEIGHT, Comparison::Equals, text("10", true));
        assert_eq!(equals.evaluate(&with_height(10.0)), None);
        assert_eq!(equals.inverted().evaluate(&with_height(10.0)), None);
    }

    #[test]
    fn whole_number_rule_on_double_parameter() {
        let equals = rule(HEIGHT, Comparison::Equals, integer(10));
        assert_eq!(equals.evaluate(&with_height(10.0)), Some(true));
        assert_eq!(equals.evaluate(&with_height(10.0005)), Some(true));
        assert_eq!(equals.evaluate(&with_height(11.0)), Some(false));
        assert_eq!(equals.inverted().evaluate(&with_height(11.0)), Some(true));

        let greater = rule(HEIGHT, Comparison::Greater, integer(10));
        assert_eq!(greater.evaluate(&with_height(10.5)), Some(true));
    }

    #[test]
    fn double_rule_on_integer_parameter() {
        let element = ElementRecord::new(ElementId::new(3), ElementClass::Wall).with_parameter(
            COUNT,
            "Count",
            ParamValue::Integer(4),
        );
        assert_eq!(
            rule(COUNT, Comparison::Equals, double(4.0)).evaluate(&element),
            Some(true)
        );
        assert_eq!(
            rule(COUNT, Comparison::Less, double(3.5)).evaluate(&element),
            Some(false)
        );
    }

    #[test]
    fn stored_nan_fails_every_comparison() {
        let nan = with_height(f64::NAN);
        for comparison in [Comparison::Equals, Comparison::Greater, Comparison::Less] {
            let check = rule(HEIGHT, comparison, double(10.0));
            assert_eq!(check.evaluate(&nan), Some(false));
            assert_eq!(check.inverted().evaluate(&nan), Some(true));
        }
    }

    #[test]
    fn integer_and_id_comparisons() {
        let element = ElementRecord::new(ElementId::new(3), ElementClass::Wall)
            .with_parameter(COUNT, "Count", ParamValue::Integer(4))
            .with_parameter(MARK, "Host", ParamValue::Id(ElementId::new(77)));
        assert_eq!(
            rule(COUNT, Comparison::GreaterOrEqual, integer(4)).evaluate(&element),
            Some(true)
        );
        assert_eq!(
            rule(MARK, Comparison::Equals, RuleArg::Id(ElementId::new(77))).evaluate(&element),
            Some(true)
        );
    }

    #[test]
    fn predicate_ands_rules_and_honors_reverse() {
        let rules = vec![
            rule(HEIGHT, Comparison::Greater, double(10.0)),
            rule(HEIGHT, Comparison::Less, double(14.0)),
        ];
        let predicate = ParameterPredicate::new(HEIGHT, rules.clone(), false);
        assert!(predicate.passes(&with_height(12.0)));
        assert!(!predicate.passes(&with_height(15.0)));
        assert!(!predicate.passes(&with_mark("no height")));

        let reversed = ParameterPredicate::new(HEIGHT, rules, true);
        assert!(!reversed.passes(&with_height(12.0)));
        assert!(reversed.passes(&with_height(15.0)));
        assert!(reversed.passes(&with_mark("no height")));
    }
}
