//! Filter values and the filter set.
//!
//! A [`FilterSpec`] maps filter-kind names to [`FilterValue`]s. The value's
//! shape depends on the kind; it is checked when the kind is applied.

use crate::coerce::{CategoryRef, ClassRef, ElementRef};
use crate::model::{Category, Element, ElementClass, ElementId};
use crate::rules::ParameterPredicate;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use uuid::Uuid;

/// A caller-supplied per-element test for the `where` filter.
#[derive(Clone)]
pub struct ElementPredicate(Rc<dyn Fn(&dyn Element) -> bool>);

impl ElementPredicate {
    pub fn new(f: impl Fn(&dyn Element) -> bool + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn test(&self, element: &dyn Element) -> bool {
        (self.0)(element)
    }
}

impl fmt::Debug for ElementPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ElementPredicate(..)")
    }
}

/// The value of one filter entry.
#[derive(Debug, Clone)]
pub enum FilterValue {
    Bool(bool),
    /// An integer id: a category id or an element id, depending on the kind.
    Integer(i64),
    /// A name: a class or category name, depending on the kind.
    Text(String),
    Class(ClassRef),
    Category(CategoryRef),
    Element(ElementRef),
    Elements(Vec<ElementRef>),
    Parameter(ParameterPredicate),
    Predicate(ElementPredicate),
    /// A nested query for the AND/OR combinators.
    Query(Box<FilterSpec>),
}

impl FilterValue {
    /// A short description of the value's shape, for error messages and logs.
    pub fn shape(&self) -> &'static str {
        match self {
            FilterValue::Bool(_) => "bool",
            FilterValue::Integer(_) => "integer",
            FilterValue::Text(_) => "text",
            FilterValue::Class(_) => "class",
            FilterValue::Category(_) => "category",
            FilterValue::Element(_) => "element",
            FilterValue::Elements(_) => "element list",
            FilterValue::Parameter(_) => "parameter predicate",
            FilterValue::Predicate(_) => "predicate",
            FilterValue::Query(_) => "query",
        }
    }

    pub(crate) fn into_element_ref(self) -> Option<ElementRef> {
        match self {
            FilterValue::Element(reference) => Some(reference),
            FilterValue::Integer(raw) => Some(ElementRef::Int(raw)),
            _ => None,
        }
    }

    /// A single reference is accepted as a one-element list.
    pub(crate) fn into_element_refs(self) -> Option<Vec<ElementRef>> {
        match self {
            FilterValue::Elements(references) => Some(references),
            other => other.into_element_ref().map(|reference| vec![reference]),
        }
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        FilterValue::Bool(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Integer(value)
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Text(value)
    }
}

impl From<ElementClass> for FilterValue {
    fn from(value: ElementClass) -> Self {
        FilterValue::Class(ClassRef::Token(value))
    }
}

impl From<ClassRef> for FilterValue {
    fn from(value: ClassRef) -> Self {
        FilterValue::Class(value)
    }
}

impl From<Category> for FilterValue {
    fn from(value: Category) -> Self {
        FilterValue::Category(CategoryRef::Token(value))
    }
}

impl From<CategoryRef> for FilterValue {
    fn from(value: CategoryRef) -> Self {
        FilterValue::Category(value)
    }
}

impl From<ElementId> for FilterValue {
    fn from(value: ElementId) -> Self {
        FilterValue::Element(ElementRef::Id(value))
    }
}

impl From<ElementRef> for FilterValue {
    fn from(value: ElementRef) -> Self {
        FilterValue::Element(value)
    }
}

impl From<Uuid> for FilterValue {
    fn from(value: Uuid) -> Self {
        FilterValue::Element(ElementRef::UniqueId(value))
    }
}

impl From<Vec<ElementId>> for FilterValue {
    fn from(value: Vec<ElementId>) -> Self {
        FilterValue::Elements(value.into_iter().map(ElementRef::Id).collect())
    }
}

impl From<Vec<ElementRef>> for FilterValue {
    fn from(value: Vec<ElementRef>) -> Self {
        FilterValue::Elements(value)
    }
}

impl From<ParameterPredicate> for FilterValue {
    fn from(value: ParameterPredicate) -> Self {
        FilterValue::Parameter(value)
    }
}

impl From<ElementPredicate> for FilterValue {
    fn from(value: ElementPredicate) -> Self {
        FilterValue::Predicate(value)
    }
}

impl From<FilterSpec> for FilterValue {
    fn from(value: FilterSpec) -> Self {
        FilterValue::Query(Box::new(value))
    }
}

/// A set of named filters, implicitly AND-ed.
///
/// Keys are not checked on insertion; unknown keys fail when the set is
/// composed, before any filter is applied.
#[derive(Debug, Clone, Default)]
pub struct FilterSpec {
    entries: BTreeMap<String, FilterValue>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a filter by name.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FilterValue>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn of_class(self, class: impl Into<ClassRef>) -> Self {
        self.set("of_class", FilterValue::Class(class.into()))
    }

    pub fn of_category(self, category: impl Into<CategoryRef>) -> Self {
        self.set("of_category", FilterValue::Category(category.into()))
    }

    pub fn is_type(self, value: bool) -> Self {
        self.set("is_type", value)
    }

    pub fn is_not_type(self, value: bool) -> Self {
        self.set("is_not_type", value)
    }

    pub fn level(self, level: impl Into<ElementRef>) -> Self {
        self.set("level", FilterValue::Element(level.into()))
    }

    pub fn parameter(self, predicate: ParameterPredicate) -> Self {
        self.set("parameter_filter", predicate)
    }

    /// Keep only elements for which `f` returns true.
    pub fn where_fn(self, f: impl Fn(&dyn Element) -> bool + 'static) -> Self {
        self.set("where", ElementPredicate::new(f))
    }

    pub fn exclude(self, ids: Vec<ElementId>) -> Self {
        self.set("exclude", ids)
    }

    pub fn view(self, view: impl Into<ElementRef>) -> Self {
        self.set("view", FilterValue::Element(view.into()))
    }

    pub fn element_ids(self, ids: Vec<ElementId>) -> Self {
        self.set("element_ids", ids)
    }

    pub fn and_collector(self, other: FilterSpec) -> Self {
        self.set("and_collector", other)
    }

    pub fn or_collector(self, other: FilterSpec) -> Self {
        self.set("or_collector", other)
    }

    pub fn get(&self, key: &str) -> Option<&FilterValue> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<FilterValue> {
        self.entries.remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<FilterValue>> FromIterator<(K, V)> for FilterSpec {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut spec = FilterSpec::new();
        for (key, value) in iter {
            spec.insert(key, value);
        }
        spec
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_set_replaces_earlier() {
        let spec = FilterSpec::new().is_type(true).is_type(false);
        assert_eq!(spec.len(), 1);
        assert!(matches!(spec.get("is_type"), Some(FilterValue::Bool(false))));
    }

    #[test]
    fn typed_setters_use_registry_names() {
        let spec = FilterSpec::new()
            .of_class(ElementClass::Wall)
            .of_category("Walls")
            .where_fn(|_| true)
            .exclude(vec![ElementId::new(1)]);
        let keys: Vec<_> = spec.keys().collect();
        assert_eq!(keys, vec!["exclude", "of_category", "of_class", "where"]);
    }

    #[test]
    fn from_iterator_builds_a_spec() {
        let spec: FilterSpec = vec![("is_type", true), ("is_curve_driven", false)]
            .into_iter()
            .collect();
        assert!(spec.contains("is_type"));
        assert!(spec.contains("is_curve_driven"));
    }

    #[test]
    fn predicate_is_callable() {
        use crate::store::memory::ElementRecord;
        let predicate = ElementPredicate::new(|e| e.class() == ElementClass::Wall);
        let wall = ElementRecord::new(ElementId::new(1), ElementClass::Wall);
        let level = ElementRecord::new(ElementId::new(2), ElementClass::Level);
        assert!(predicate.test(&wall));
        assert!(!predicate.test(&level));
    }

    #[test]
    fn shapes_name_the_variant() {
        assert_eq!(FilterValue::from(true).shape(), "bool");
        assert_eq!(FilterValue::from("x").shape(), "text");
        assert_eq!(FilterValue::from(FilterSpec::new()).shape(), "query");
    }
}
