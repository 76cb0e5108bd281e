//! The compositor: applies a filter set to a store query, cheapest tier first.
//!
//! Composition runs in two passes. Planning checks every key (nested sets
//! included) and resolves every value against the store, so a bad filter set
//! fails before any query is opened and no caller predicate ever runs. The
//! plan is then applied in tier order.

use super::scope::resolve_scope;
use super::spec::{get_kind, is_scope_key, kinds_by_tier, FilterKind, FilterOp};
use super::value::{ElementPredicate, FilterSpec, FilterValue};
use crate::coerce::{to_category, to_class, to_element_id, to_element_ids, CategoryRef, ClassRef};
use crate::config::QueryConfig;
use crate::error::{CoercionError, QueryError, Result};
use crate::model::{Element, ElementId};
use crate::store::{ElementStore, NativeOp, NativeQuery, Scope};
use std::collections::BTreeSet;

/// Check every key against the registry, descending into nested sets.
///
/// Scope keys are rejected at the top level: they must be resolved first.
/// Nested sets may carry their own scope.
pub fn validate(filters: &FilterSpec) -> Result<()> {
    check_keys(filters, false)
}

fn check_keys(filters: &FilterSpec, nested: bool) -> Result<()> {
    for key in filters.keys() {
        if is_scope_key(key) {
            if !nested {
                return Err(QueryError::MalformedFilter(format!(
                    "scope filter '{}' must be resolved before composition",
                    key
                )));
            }
        } else if get_kind(key).is_none() {
            return Err(QueryError::UnknownFilter {
                key: key.to_string(),
            });
        }
        if let Some(FilterValue::Query(inner)) = filters.get(key) {
            check_keys(inner, true)?;
        }
    }
    Ok(())
}

/// A filter value resolved to what the store will be asked to do.
enum Step {
    Native(NativeOp),
    Where(ElementPredicate),
    Exclude(BTreeSet<ElementId>),
    And(Plan),
    Or(Plan),
}

struct Plan {
    scope: Scope,
    steps: Vec<(&'static FilterKind, Step)>,
}

/// Apply `filters` to a fresh query over `scope`.
pub fn collect<'a, S: ElementStore>(
    store: &'a S,
    scope: &Scope,
    filters: FilterSpec,
    config: &QueryConfig,
) -> Result<S::Query<'a>> {
    validate(&filters)?;
    let plan = plan_filters(store, scope.clone(), filters, config)?;
    run_plan(store, plan)
}

fn plan_filters<S: ElementStore>(
    store: &S,
    scope: Scope,
    mut filters: FilterSpec,
    config: &QueryConfig,
) -> Result<Plan> {
    let mut steps = Vec::with_capacity(filters.len());
    for kind in kinds_by_tier() {
        if filters.is_empty() {
            break;
        }
        let Some(value) = filters.remove(kind.name) else {
            continue;
        };
        steps.push((*kind, plan_step(store, &scope, kind, value, config)?));
    }
    Ok(Plan { scope, steps })
}

fn plan_step<S: ElementStore>(
    store: &S,
    scope: &Scope,
    kind: &FilterKind,
    value: FilterValue,
    config: &QueryConfig,
) -> Result<Step> {
    let invalid = || QueryError::invalid_value(kind.name, kind.shape.describe());
    let flag = |value: FilterValue, negated: bool| match value {
        FilterValue::Bool(flag) => Ok(flag != negated),
        _ => Err(invalid()),
    };
    let element = |value: FilterValue| -> Result<ElementId> {
        let reference = value.into_element_ref().ok_or_else(invalid)?;
        Ok(to_element_id(store, reference)?)
    };

    let op = match kind.op {
        FilterOp::Class => {
            let reference = match value {
                FilterValue::Class(reference) => reference,
                FilterValue::Text(name) => ClassRef::Name(name),
                _ => return Err(invalid()),
            };
            NativeOp::OfClass(to_class(reference)?)
        }
        FilterOp::Category => {
            let reference = match value {
                FilterValue::Category(reference) => reference,
                FilterValue::Text(name) => CategoryRef::Name(name),
                FilterValue::Integer(raw) => CategoryRef::Id(raw),
                FilterValue::Element(reference) => {
                    let id = to_element_id(store, reference)?;
                    let sample = store
                        .element(id)
                        .ok_or(CoercionError::UnknownElement(id))?;
                    CategoryRef::of(&sample)
                }
                _ => return Err(invalid()),
            };
            NativeOp::OfCategory(to_category(reference)?)
        }
        // A false flag is the complementary native filter, not a no-op.
        FilterOp::ElementType { negated } => NativeOp::ElementType(flag(value, negated)?),
        FilterOp::ViewIndependent => NativeOp::ViewIndependent(flag(value, false)?),
        FilterOp::CurveDriven => NativeOp::CurveDriven(flag(value, false)?),
        FilterOp::FamilySymbols => NativeOp::FamilySymbols(element(value)?),
        FilterOp::OwnerView => NativeOp::OwnedByView(element(value)?),
        FilterOp::FamilyInstances => NativeOp::FamilyInstances(element(value)?),
        FilterOp::Level { inverted } => NativeOp::Level {
            level: element(value)?,
            inverted,
        },
        FilterOp::Parameter => match value {
            FilterValue::Parameter(predicate) => NativeOp::Parameter(predicate),
            _ => return Err(invalid()),
        },
        FilterOp::Where => match value {
            FilterValue::Predicate(predicate) => return Ok(Step::Where(predicate)),
            _ => return Err(invalid()),
        },
        FilterOp::Exclude => {
            let references = value.into_element_refs().ok_or_else(invalid)?;
            let ids = to_element_ids(store, references)?.into_iter().collect();
            return Ok(Step::Exclude(ids));
        }
        FilterOp::And | FilterOp::Or => {
            let FilterValue::Query(nested) = value else {
                return Err(invalid());
            };
            let nested = plan_nested(store, scope, *nested, config)?;
            return Ok(if kind.op == FilterOp::And {
                Step::And(nested)
            } else {
                Step::Or(nested)
            });
        }
    };

    Ok(Step::Native(op))
}

/// Plan a combinator's nested filter set.
///
/// A nested set without scope keys runs over the outer scope.
fn plan_nested<S: ElementStore>(
    store: &S,
    outer: &Scope,
    mut nested: FilterSpec,
    config: &QueryConfig,
) -> Result<Plan> {
    let scope = resolve_scope(store, &mut nested, config)?.unwrap_or_else(|| outer.clone());
    plan_filters(store, scope, nested, config)
}

fn run_plan<'a, S: ElementStore>(store: &'a S, plan: Plan) -> Result<S::Query<'a>> {
    let mut query = store.query(&plan.scope)?;
    for (kind, step) in plan.steps {
        tracing::debug!(filter = kind.name, tier = ?kind.tier, "applying filter");
        query = match step {
            Step::Native(op) => query.apply(&op)?,
            Step::Where(predicate) => exclude_failing(query, &predicate)?,
            Step::Exclude(ids) if ids.is_empty() => query,
            Step::Exclude(ids) => query.exclude(&ids)?,
            Step::And(nested) => query.intersect(run_plan(store, nested)?)?,
            Step::Or(nested) => query.union(run_plan(store, nested)?)?,
        };
    }
    Ok(query)
}

/// Materialize the matches, test each, and exclude all failures at once.
fn exclude_failing<Q: NativeQuery>(query: Q, predicate: &ElementPredicate) -> Result<Q> {
    let failing: BTreeSet<_> = query
        .elements()
        .filter(|element| !predicate.test(element))
        .map(|element| element.id())
        .collect();
    tracing::debug!(excluded = failing.len(), "predicate filter evaluated");
    if failing.is_empty() {
        return Ok(query);
    }
    query.exclude(&failing)
}

/// Resolve the scope named in `filters` (document by default) and compose.
pub fn query<'a, S: ElementStore>(
    store: &'a S,
    mut filters: FilterSpec,
    config: &QueryConfig,
) -> Result<(Scope, S::Query<'a>)> {
    let scope = resolve_scope(store, &mut filters, config)?.unwrap_or_default();
    let query = collect(store, &scope, filters, config)?;
    Ok((scope, query))
}
