//! Filter kind specifications and registry.
//!
//! Every named filter a [`FilterSpec`](super::FilterSpec) may carry is declared
//! here, together with its cost tier and the operation it dispatches to.

use once_cell::sync::Lazy;

/// Cost class of a filter kind. Kinds are applied in ascending tier order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    /// Index-backed membership tests (class, category).
    SuperQuick,
    /// Cheap per-element flags that need no element expansion.
    Quick,
    /// Filters that inspect element data (levels, parameters).
    Slow,
    /// Caller-supplied predicates that materialize every match.
    SuperSlow,
    /// AND/OR combinators, applied to the fully narrowed handle.
    Logical,
}

/// What a filter kind does to the query handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Class,
    Category,
    /// Type/instance split. `negated` flips the caller's flag.
    ElementType { negated: bool },
    FamilySymbols,
    OwnerView,
    ViewIndependent,
    CurveDriven,
    FamilyInstances,
    Level { inverted: bool },
    Parameter,
    Where,
    Exclude,
    And,
    Or,
}

/// The value shape a filter kind accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueShape {
    Bool,
    Class,
    Category,
    Element,
    Elements,
    Parameter,
    Predicate,
    Query,
}

impl ValueShape {
    pub fn describe(self) -> &'static str {
        match self {
            ValueShape::Bool => "a boolean",
            ValueShape::Class => "an element class or class name",
            ValueShape::Category => "a category, category name, category id or element",
            ValueShape::Element => "an element reference",
            ValueShape::Elements => "a list of element references",
            ValueShape::Parameter => "a parameter predicate",
            ValueShape::Predicate => "an element predicate",
            ValueShape::Query => "a nested filter set",
        }
    }
}

/// Specification for a single filter kind.
#[derive(Debug, Clone)]
pub struct FilterKind {
    /// The key used in a filter set (e.g. "of_class", "is_type").
    pub name: &'static str,
    pub tier: Tier,
    pub op: FilterOp,
    pub shape: ValueShape,
}

impl FilterKind {
    const fn new(name: &'static str, tier: Tier, op: FilterOp) -> Self {
        Self {
            name,
            tier,
            op,
            shape: ValueShape::Bool,
        }
    }

    const fn takes(mut self, shape: ValueShape) -> Self {
        self.shape = shape;
        self
    }
}

/// Registry of all composable filter kinds.
///
/// Adding a filter means adding an entry here and handling its [`FilterOp`]
/// in the compositor.
pub const FILTERS: &[FilterKind] = &[
    // Super-quick
    FilterKind::new("of_class", Tier::SuperQuick, FilterOp::Class).takes(ValueShape::Class),
    FilterKind::new("of_category", Tier::SuperQuick, FilterOp::Category)
        .takes(ValueShape::Category),
    // Quick
    FilterKind::new(
        "is_type",
        Tier::Quick,
        FilterOp::ElementType { negated: false },
    ),
    FilterKind::new(
        "is_not_type",
        Tier::Quick,
        FilterOp::ElementType { negated: true },
    ),
    FilterKind::new("family", Tier::Quick, FilterOp::FamilySymbols).takes(ValueShape::Element),
    FilterKind::new("owner_view", Tier::Quick, FilterOp::OwnerView).takes(ValueShape::Element),
    FilterKind::new("is_view_independent", Tier::Quick, FilterOp::ViewIndependent),
    FilterKind::new("is_curve_driven", Tier::Quick, FilterOp::CurveDriven),
    // Slow
    FilterKind::new("symbol", Tier::Slow, FilterOp::FamilyInstances).takes(ValueShape::Element),
    FilterKind::new("level", Tier::Slow, FilterOp::Level { inverted: false })
        .takes(ValueShape::Element),
    FilterKind::new("not_level", Tier::Slow, FilterOp::Level { inverted: true })
        .takes(ValueShape::Element),
    FilterKind::new("parameter_filter", Tier::Slow, FilterOp::Parameter)
        .takes(ValueShape::Parameter),
    // Super-slow
    FilterKind::new("where", Tier::SuperSlow, FilterOp::Where).takes(ValueShape::Predicate),
    FilterKind::new("exclude", Tier::SuperSlow, FilterOp::Exclude).takes(ValueShape::Elements),
    // Combinators
    FilterKind::new("and_collector", Tier::Logical, FilterOp::And).takes(ValueShape::Query),
    FilterKind::new("or_collector", Tier::Logical, FilterOp::Or).takes(ValueShape::Query),
];

/// Keys that select the query scope, in precedence order.
pub const SCOPE_KEYS: &[&str] = &["view", "elements", "element_ids"];

static BY_TIER: Lazy<Vec<&'static FilterKind>> = Lazy::new(|| {
    let mut kinds: Vec<_> = FILTERS.iter().collect();
    kinds.sort_by_key(|kind| kind.tier);
    kinds
});

/// Look up a filter kind by name.
pub fn get_kind(name: &str) -> Option<&'static FilterKind> {
    FILTERS.iter().find(|kind| kind.name == name)
}

pub fn is_scope_key(name: &str) -> bool {
    SCOPE_KEYS.contains(&name)
}

/// All filter kinds, cheapest tier first. Registry order is kept within a tier.
pub fn kinds_by_tier() -> &'static [&'static FilterKind] {
    &BY_TIER
}

/// Names of every filter kind in one tier.
pub fn tier_members(tier: Tier) -> impl Iterator<Item = &'static str> {
    FILTERS
        .iter()
        .filter(move |kind| kind.tier == tier)
        .map(|kind| kind.name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_names_are_unique() {
        for (i, kind) in FILTERS.iter().enumerate() {
            assert!(
                FILTERS[i + 1..].iter().all(|other| other.name != kind.name),
                "duplicate filter kind {}",
                kind.name
            );
        }
    }

    #[test]
    fn scope_keys_are_not_filter_kinds() {
        for key in SCOPE_KEYS {
            assert!(get_kind(key).is_none());
            assert!(is_scope_key(key));
        }
        assert!(!is_scope_key("of_class"));
    }

    #[test]
    fn unknown_kind_returns_none() {
        assert!(get_kind("nonexistent_filter").is_none());
    }

    #[test]
    fn tiers_group_as_documented() {
        let super_quick: Vec<_> = tier_members(Tier::SuperQuick).collect();
        assert_eq!(super_quick, vec!["of_class", "of_category"]);

        let slow: Vec<_> = tier_members(Tier::Slow).collect();
        assert_eq!(slow, vec!["symbol", "level", "not_level", "parameter_filter"]);

        let logical: Vec<_> = tier_members(Tier::Logical).collect();
        assert_eq!(logical, vec!["and_collector", "or_collector"]);
    }

    #[test]
    fn tier_order_is_ascending() {
        let tiers: Vec<_> = kinds_by_tier().iter().map(|kind| kind.tier).collect();
        assert!(tiers.windows(2).all(|pair| pair[0] <= pair[1]));
        assert_eq!(kinds_by_tier().len(), FILTERS.len());
    }

    #[test]
    fn type_flags_dispatch_differently() {
        let is_type = get_kind("is_type").unwrap();
        let is_not_type = get_kind("is_not_type").unwrap();
        assert_eq!(is_type.op, FilterOp::ElementType { negated: false });
        assert_eq!(is_not_type.op, FilterOp::ElementType { negated: true });
        assert_eq!(is_type.shape, ValueShape::Bool);
    }

    #[test]
    fn level_negation_is_its_own_kind() {
        let spec = get_kind("not_level").unwrap();
        assert_eq!(spec.tier, Tier::Slow);
        assert_eq!(spec.op, FilterOp::Level { inverted: true });
        assert_eq!(spec.shape, ValueShape::Element);
    }
}
