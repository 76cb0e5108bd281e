//! Scope resolution.
//!
//! Pulls the scope keys (`view`, `elements`, `element_ids`) out of a filter
//! set before composition. At most one may be given unless the config turns
//! on `scope_precedence`, in which case the first in [`SCOPE_KEYS`] order wins
//! and the rest are dropped with a warning.

use super::spec::SCOPE_KEYS;
use super::value::{FilterSpec, FilterValue};
use crate::coerce::{to_element_id, to_element_ids};
use crate::config::QueryConfig;
use crate::error::{QueryError, Result};
use crate::store::{ElementStore, Scope};

/// Remove every scope key from `filters` and return the scope they select.
///
/// Returns `None` when the set names no scope.
pub fn resolve_scope<S: ElementStore>(
    store: &S,
    filters: &mut FilterSpec,
    config: &QueryConfig,
) -> Result<Option<Scope>> {
    let mut present: Vec<(&'static str, FilterValue)> = SCOPE_KEYS
        .iter()
        .filter_map(|key| filters.remove(key).map(|value| (*key, value)))
        .collect();

    if present.len() > 1 {
        let names: Vec<String> = present.iter().map(|(key, _)| key.to_string()).collect();
        if !config.scope_precedence {
            return Err(QueryError::AmbiguousScope(names));
        }
        tracing::warn!(
            given = ?names,
            using = present[0].0,
            "multiple scope filters given, resolving by precedence"
        );
        present.truncate(1);
    }

    let Some((key, value)) = present.pop() else {
        return Ok(None);
    };

    let scope = match key {
        "view" => {
            let reference = value
                .into_element_ref()
                .ok_or_else(|| QueryError::invalid_value(key, "an element reference"))?;
            Scope::View(to_element_id(store, reference)?)
        }
        _ => {
            let references = value
                .into_element_refs()
                .ok_or_else(|| QueryError::invalid_value(key, "a list of element references"))?;
            Scope::Elements(to_element_ids(store, references)?)
        }
    };

    tracing::debug!(from = key, ?scope, "resolved query scope");
    Ok(Some(scope))
}
