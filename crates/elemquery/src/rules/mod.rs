//! # Parameter Rules
//!
//! Parameter filters compare one parameter of each element against one or more
//! conditions. The condition grammar is small:
//!
//! | Condition | Applies to | Meaning |
//! |-----------|------------|---------|
//! | `equals` | all | value equal (within tolerance for doubles) |
//! | `contains` | text | value contains the argument |
//! | `begins` | text | value starts with the argument |
//! | `ends` | text | value ends with the argument |
//! | `greater`, `greater_equal` | all | ordered comparison |
//! | `less`, `less_equal` | all | ordered comparison |
//!
//! Every condition has a `not_` twin (`not_equals`, `not_begins`, ...).
//!
//! ## Type-dependent Arguments
//!
//! - **Text** rules carry a case-sensitivity flag (default `true`).
//! - **Double** rules carry a comparison tolerance (default
//!   [`DEFAULT_PRECISION`], the store's internal length precision).
//! - **Integer** and **element id** rules compare exactly.
//!
//! Both defaults come from [`crate::config::QueryConfig`] and can be
//! overridden per call or per condition.
//!
//! ## Composite Semantics
//!
//! All rules of a predicate must pass (implicit AND). The predicate-level
//! `reverse` flag inverts the whole membership test. An element that does not
//! have the parameter never passes a rule, negated or not.
//!
//! ```ignore
//! let predicate = ParameterFilter::new(height)
//!     .condition("greater", 10.0)
//!     .condition("less", 14.0)
//!     .build()?;
//! let tall = FilterSpec::new().parameter(predicate);
//! ```

mod builder;
mod condition;
mod rule;

pub use builder::{build_predicate, ParameterFilter, DEFAULT_CASE_SENSITIVE, DEFAULT_PRECISION};
pub use condition::{Comparison, Condition, ConditionName, RuleOptions, RuleValue};
pub use rule::{FilterRule, ParameterPredicate, RuleArg};
