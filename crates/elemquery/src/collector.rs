//! # Query Facade
//!
//! [`Collector`] is the entry point for querying a store. It owns scope
//! selection, hands the remaining filters to the compositor, and keeps the
//! finished native query handle.
//!
//! ## Role and Responsibilities
//!
//! The collector:
//! - **Selects the scope** from `view` / `elements` / `element_ids`, or the whole document
//! - **Composes** the filter set through [`crate::filters::collect`]
//! - **Exposes results** as a restartable sequence plus convenience accessors
//!
//! ## Results
//!
//! | Accessor | Returns | Materializes |
//! |----------|---------|--------------|
//! | `elements()` | fresh iterator on every call | lazily |
//! | `to_vec()` | all matches | yes |
//! | `element_ids()` | matched ids | no |
//! | `first()` | `Option` | one element |
//! | `count()` | native count | no |
//! | `get(i)` | `Option` | up to `i + 1` elements |
//! | `try_get(i)` | `Result`, `IndexOutOfRange` past the end | up to `i + 1` elements |
//!
//! An empty result is never an error: `first()` and `get()` return `None`.
//!
//! ## Generic Over ElementStore
//!
//! `Collector<'a, S: ElementStore>` borrows the store for as long as the
//! query lives. Tests use [`crate::store::memory::MemStore`].
//!
//! ## Escape Hatch
//!
//! [`Collector::native`] and [`Collector::into_native`] give access to the
//! store's own query handle for operations this layer does not wrap.

use crate::config::QueryConfig;
use crate::error::{QueryError, Result};
use crate::filters::{collect, resolve_scope, FilterSpec};
use crate::model::ElementId;
use crate::store::{ElementStore, NativeQuery, Scope};

/// A composed query over an element store.
pub struct Collector<'a, S: ElementStore + 'a> {
    store: &'a S,
    scope: Scope,
    query: S::Query<'a>,
}

impl<'a, S: ElementStore + 'a> Collector<'a, S> {
    /// Query with the compiled-in defaults.
    pub fn new(store: &'a S, filters: FilterSpec) -> Result<Self> {
        Self::with_config(store, filters, &QueryConfig::default())
    }

    /// Query with explicit configuration. Scope keys in `filters` pick the scope.
    pub fn with_config(
        store: &'a S,
        mut filters: FilterSpec,
        config: &QueryConfig,
    ) -> Result<Self> {
        let scope = resolve_scope(store, &mut filters, config)?.unwrap_or_default();
        Self::in_scope(store, scope, filters, config)
    }

    /// Query an explicit scope. `filters` must not carry scope keys.
    pub fn in_scope(
        store: &'a S,
        scope: Scope,
        filters: FilterSpec,
        config: &QueryConfig,
    ) -> Result<Self> {
        let query = collect(store, &scope, filters, config)?;
        Ok(Self {
            store,
            scope,
            query,
        })
    }

    /// The matched elements. Every call starts a fresh traversal.
    pub fn elements(&self) -> Box<dyn Iterator<Item = S::Element> + '_> {
        self.query.elements()
    }

    pub fn to_vec(&self) -> Vec<S::Element> {
        self.elements().collect()
    }

    pub fn element_ids(&self) -> Vec<ElementId> {
        self.query.ids()
    }

    pub fn first(&self) -> Option<S::Element> {
        self.query.first()
    }

    /// Number of matches, answered by the store.
    pub fn count(&self) -> usize {
        self.query.count()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    pub fn get(&self, index: usize) -> Option<S::Element> {
        self.elements().nth(index)
    }

    pub fn try_get(&self, index: usize) -> Result<S::Element> {
        self.get(index).ok_or_else(|| QueryError::IndexOutOfRange {
            index,
            len: self.count(),
        })
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn store(&self) -> &'a S {
        self.store
    }

    pub fn native(&self) -> &S::Query<'a> {
        &self.query
    }

    pub fn into_native(self) -> S::Query<'a> {
        self.query
    }

    /// Elements matched by both collectors. Keeps this collector's scope.
    pub fn and(self, other: Self) -> Result<Self> {
        Ok(Self {
            store: self.store,
            scope: self.scope,
            query: self.query.intersect(other.query)?,
        })
    }

    /// Elements matched by either collector. Keeps this collector's scope.
    pub fn or(self, other: Self) -> Result<Self> {
        Ok(Self {
            store: self.store,
            scope: self.scope,
            query: self.query.union(other.query)?,
        })
    }
}
