//! # Filter Registry & Compositor
//!
//! A [`FilterSpec`] names the filters a query applies. Each name must be a
//! registered [`FilterKind`]; the registry tags every kind with a cost tier
//! and the compositor applies them cheapest first.
//!
//! ## Tiers
//!
//! | Tier | Kinds |
//! |------|-------|
//! | SuperQuick | `of_class`, `of_category` |
//! | Quick | `is_type`, `is_not_type`, `family`, `owner_view`, `is_view_independent`, `is_curve_driven` |
//! | Slow | `symbol`, `level`, `not_level`, `parameter_filter` |
//! | SuperSlow | `where`, `exclude` |
//! | Logical | `and_collector`, `or_collector` |
//!
//! Order of application never changes which elements match; it only changes
//! how much work the store does to find them.
//!
//! ## Scope
//!
//! `view`, `elements` and `element_ids` are not filters. They choose the set
//! a query starts from and are removed by [`resolve_scope`] before
//! composition.
//!
//! ## Flags
//!
//! A `false` flag is a filter in its own right: `is_type: false` keeps
//! instances, it does not switch the filter off.
//!
//! ## Predicates
//!
//! `where` runs a caller closure on every element that survived the cheaper
//! tiers, then removes all failures with a single exclusion.

mod compose;
mod json;
mod scope;
pub mod spec;
mod value;

pub use compose::{collect, query, validate};
pub use scope::resolve_scope;
pub use spec::{get_kind, FilterKind, FilterOp, Tier, ValueShape, FILTERS, SCOPE_KEYS};
pub use value::{ElementPredicate, FilterSpec, FilterValue};
