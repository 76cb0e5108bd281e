//! # Storage Layer
//!
//! The element store itself is external. This module defines the narrow
//! contract the query core needs from it:
//!
//! - [`ElementStore`]: opens a native query over a [`Scope`] and resolves unique ids.
//! - [`NativeQuery`]: the store's filter-chain handle. Each native operation
//!   consumes the handle and returns the narrowed one.
//! - [`NativeOp`]: the native filter operations the registry maps onto.
//!
//! ## Handle Ownership
//!
//! A query handle is owned by exactly one composition at a time. It is moved
//! through every `apply`, never shared, and handed to the collector fully built.
//! Traversal (`elements`) borrows it and starts afresh on every call.
//!
//! ## Implementations
//!
//! - [`memory::MemStore`]: an in-memory document, used for tests and for
//!   embedding the query layer without a host application.

use crate::error::Result;
use crate::model::{Category, Element, ElementClass, ElementId};
use crate::rules::ParameterPredicate;
use std::collections::BTreeSet;
use uuid::Uuid;

pub mod memory;

/// The base set of elements a query starts from.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Scope {
    /// Every element in the document.
    #[default]
    Document,
    /// Elements visible in one view.
    View(ElementId),
    /// An explicit subset.
    Elements(Vec<ElementId>),
}

/// A native filter operation.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeOp {
    OfClass(ElementClass),
    OfCategory(Category),
    /// `true` keeps element types, `false` keeps instances.
    ElementType(bool),
    /// Family symbols of a family.
    FamilySymbols(ElementId),
    OwnedByView(ElementId),
    ViewIndependent(bool),
    CurveDriven(bool),
    /// Family instances of a family symbol.
    FamilyInstances(ElementId),
    Level { level: ElementId, inverted: bool },
    Parameter(ParameterPredicate),
}

/// Abstract interface to the element store.
pub trait ElementStore {
    type Element: Element + Clone;

    type Query<'a>: NativeQuery<Element = Self::Element>
    where
        Self: 'a;

    /// Open a query over `scope`.
    fn query(&self, scope: &Scope) -> Result<Self::Query<'_>>;

    fn element(&self, id: ElementId) -> Option<Self::Element>;

    fn resolve_unique_id(&self, unique_id: &Uuid) -> Option<ElementId>;
}

/// The store's stateful filter chain.
pub trait NativeQuery: Sized {
    type Element: Element;

    fn apply(self, op: &NativeOp) -> Result<Self>;

    fn exclude(self, ids: &BTreeSet<ElementId>) -> Result<Self>;

    fn intersect(self, other: Self) -> Result<Self>;

    fn union(self, other: Self) -> Result<Self>;

    /// A fresh traversal over the current matches.
    fn elements(&self) -> Box<dyn Iterator<Item = Self::Element> + '_>;

    fn ids(&self) -> Vec<ElementId>;

    /// Number of matches, answered without materializing elements.
    fn count(&self) -> usize;

    fn first(&self) -> Option<Self::Element> {
        self.elements().next()
    }
}
