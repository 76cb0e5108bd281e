//! # Elemquery Architecture
//!
//! Elemquery is a **declarative query layer** over an element store (a CAD
//! document's in-memory element database). Callers name the filters they want;
//! the library turns them into a correctly ordered chain of the store's own
//! filter operations and hands back a lazy result set.
//!
//! The store itself is not part of this crate. It is reached through the
//! [`store::ElementStore`] trait; [`store::memory::MemStore`] is an in-memory
//! implementation for tests and embedding.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Query Facade (collector.rs)                                │
//! │  - Picks the scope (document / view / explicit elements)    │
//! │  - Exposes elements, first, count, indexed access           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Filter Registry & Compositor (filters/)                    │
//! │  - Static registry of filter kinds, each with a cost tier   │
//! │  - Validates keys, applies filters cheapest tier first      │
//! └─────────────────────────────────────────────────────────────┘
//!                 │                            │
//!                 ▼                            ▼
//! ┌───────────────────────────────┐ ┌───────────────────────────┐
//! │  Rule Builder (rules/)        │ │  Coercion (coerce.rs)     │
//! │  - Condition grammar          │ │  - Names, ids, elements   │
//! │  - Parameter predicates       │ │    → canonical tokens     │
//! └───────────────────────────────┘ └───────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - ElementStore / NativeQuery traits                        │
//! │  - MemStore (in-memory)                                     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use elemquery::collector::Collector;
//! use elemquery::filters::FilterSpec;
//! use elemquery::model::{Category, ElementClass, ElementId, ParamValue, ParameterId};
//! use elemquery::rules::ParameterFilter;
//! use elemquery::store::memory::{ElementRecord, MemStore};
//!
//! let height = ParameterId::new(-1001300);
//! let store: MemStore = (1..=4)
//!     .map(|i| {
//!         ElementRecord::new(ElementId::new(i), ElementClass::Wall)
//!             .with_category(Category::WALLS)
//!             .with_parameter(height, "Height", ParamValue::Double(8.0 + i as f64 * 2.0))
//!     })
//!     .collect();
//!
//! let tall = ParameterFilter::new(height).condition("greater", 11.0).build().unwrap();
//! let walls = Collector::new(
//!     &store,
//!     FilterSpec::new().of_category("Walls").parameter(tall),
//! )
//! .unwrap();
//!
//! // Heights are 10, 12, 14 and 16.
//! assert_eq!(walls.count(), 3);
//! assert_eq!(
//!     walls.element_ids(),
//!     vec![ElementId::new(2), ElementId::new(3), ElementId::new(4)]
//! );
//! ```
//!
//! ## Error Policy
//!
//! Construction errors (unknown filters, unresolvable references, malformed
//! conditions) are returned before the store is queried. An empty result only
//! ever means the filters matched nothing.
//!
//! ## Module Overview
//!
//! - [`collector`]: The query facade, entry point for all queries
//! - [`filters`]: Filter registry, scope resolution, compositor, JSON front end
//! - [`rules`]: Parameter condition grammar and predicate construction
//! - [`coerce`]: Reference normalization
//! - [`store`]: Store abstraction and the in-memory store
//! - [`model`]: Ids, classes, categories, the `Element` trait
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod coerce;
pub mod collector;
pub mod config;
pub mod error;
pub mod filters;
pub mod model;
pub mod rules;
pub mod store;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;

pub use collector::Collector;
pub use config::QueryConfig;
pub use error::{QueryError, Result};
pub use filters::FilterSpec;
