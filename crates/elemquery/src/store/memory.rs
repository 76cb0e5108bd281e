use super::{ElementStore, NativeOp, NativeQuery, Scope};
use crate::error::{QueryError, Result};
use crate::model::{Category, Element, ElementClass, ElementId, ParamValue, ParameterId};
use std::cell::Cell;
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct StoredParameter {
    pub name: String,
    pub value: ParamValue,
}

/// One element of an in-memory document.
#[derive(Debug, Clone)]
pub struct ElementRecord {
    pub id: ElementId,
    pub unique_id: Uuid,
    pub name: String,
    pub class: ElementClass,
    pub category: Option<Category>,
    pub is_type: bool,
    pub type_id: Option<ElementId>,
    pub family_id: Option<ElementId>,
    pub owner_view: Option<ElementId>,
    pub level: Option<ElementId>,
    pub curve_driven: bool,
    /// Views this (model) element is visible in.
    pub visible_in: BTreeSet<ElementId>,
    pub parameters: BTreeMap<ParameterId, StoredParameter>,
}

impl ElementRecord {
    /// A new record. Type classes (`WallType`, `FloorType`, `FamilySymbol`) start as element types.
    pub fn new(id: ElementId, class: ElementClass) -> Self {
        Self {
            id,
            unique_id: Uuid::new_v4(),
            name: format!("{} {}", class, id),
            class,
            category: None,
            is_type: matches!(
                class,
                ElementClass::WallType | ElementClass::FloorType | ElementClass::FamilySymbol
            ),
            type_id: None,
            family_id: None,
            owner_view: None,
            level: None,
            curve_driven: false,
            visible_in: BTreeSet::new(),
            parameters: BTreeMap::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_element_type(mut self, is_type: bool) -> Self {
        self.is_type = is_type;
        self
    }

    pub fn with_type(mut self, type_id: ElementId) -> Self {
        self.type_id = Some(type_id);
        self
    }

    pub fn with_family(mut self, family_id: ElementId) -> Self {
        self.family_id = Some(family_id);
        self
    }

    pub fn with_owner_view(mut self, view: ElementId) -> Self {
        self.owner_view = Some(view);
        self
    }

    pub fn with_level(mut self, level: ElementId) -> Self {
        self.level = Some(level);
        self
    }

    pub fn with_curve_driven(mut self, curve_driven: bool) -> Self {
        self.curve_driven = curve_driven;
        self
    }

    pub fn visible_in(mut self, view: ElementId) -> Self {
        self.visible_in.insert(view);
        self
    }

    pub fn with_parameter(
        mut self,
        id: ParameterId,
        name: impl Into<String>,
        value: ParamValue,
    ) -> Self {
        self.parameters.insert(
            id,
            StoredParameter {
                name: name.into(),
                value,
            },
        );
        self
    }

    fn matches(&self, op: &NativeOp) -> bool {
        match op {
            NativeOp::OfClass(class) => self.class == *class,
            NativeOp::OfCategory(category) => self.category == Some(*category),
            NativeOp::ElementType(types) => self.is_type == *types,
            NativeOp::FamilySymbols(family) => {
                self.class == ElementClass::FamilySymbol && self.family_id == Some(*family)
            }
            NativeOp::OwnedByView(view) => self.owner_view == Some(*view),
            NativeOp::ViewIndependent(independent) => self.owner_view.is_none() == *independent,
            NativeOp::CurveDriven(driven) => self.curve_driven == *driven,
            NativeOp::FamilyInstances(symbol) => {
                self.class == ElementClass::FamilyInstance && self.type_id == Some(*symbol)
            }
            NativeOp::Level { level, inverted } => (self.level == Some(*level)) != *inverted,
            NativeOp::Parameter(predicate) => predicate.passes(self),
        }
    }

    fn in_view(&self, view: ElementId) -> bool {
        !self.is_type && (self.owner_view == Some(view) || self.visible_in.contains(&view))
    }
}

impl Element for ElementRecord {
    fn id(&self) -> ElementId {
        self.id
    }

    fn unique_id(&self) -> Uuid {
        self.unique_id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn class(&self) -> ElementClass {
        self.class
    }

    fn category(&self) -> Option<Category> {
        self.category
    }

    fn is_element_type(&self) -> bool {
        self.is_type
    }

    fn type_id(&self) -> Option<ElementId> {
        self.type_id
    }

    fn family_id(&self) -> Option<ElementId> {
        self.family_id
    }

    fn owner_view(&self) -> Option<ElementId> {
        self.owner_view
    }

    fn level(&self) -> Option<ElementId> {
        self.level
    }

    fn is_curve_driven(&self) -> bool {
        self.curve_driven
    }

    fn parameter(&self, id: ParameterId) -> Option<ParamValue> {
        self.parameters.get(&id).map(|p| p.value.clone())
    }

    fn lookup_parameter(&self, name: &str) -> Option<ParameterId> {
        self.parameters
            .iter()
            .find(|(_, p)| p.name == name)
            .map(|(id, _)| *id)
    }
}

/// In-memory element store.
///
/// Uses a `Cell` counter since queries are single-threaded; it records how
/// many elements traversals have materialized, so tests can check that a
/// count was answered natively.
#[derive(Debug, Default)]
pub struct MemStore {
    records: BTreeMap<ElementId, ElementRecord>,
    materialized: Cell<usize>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, returning the one it replaced.
    pub fn insert(&mut self, record: ElementRecord) -> Option<ElementRecord> {
        self.records.insert(record.id, record)
    }

    pub fn record(&self, id: ElementId) -> Option<&ElementRecord> {
        self.records.get(&id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Elements materialized by traversals so far.
    pub fn materialized(&self) -> usize {
        self.materialized.get()
    }

    pub fn reset_materialized(&self) {
        self.materialized.set(0);
    }

    fn scope_ids(&self, scope: &Scope) -> Result<BTreeSet<ElementId>> {
        match scope {
            Scope::Document => Ok(self.records.keys().copied().collect()),
            Scope::View(view) => {
                let is_view = self
                    .records
                    .get(view)
                    .is_some_and(|record| record.class.is_view());
                if !is_view {
                    return Err(QueryError::Store(format!("{} is not a view", view)));
                }
                Ok(self
                    .records
                    .values()
                    .filter(|record| record.in_view(*view))
                    .map(|record| record.id)
                    .collect())
            }
            Scope::Elements(ids) => ids
                .iter()
                .map(|id| {
                    if self.records.contains_key(id) {
                        Ok(*id)
                    } else {
                        Err(QueryError::Store(format!("element {} not found", id)))
                    }
                })
                .collect(),
        }
    }
}

impl FromIterator<ElementRecord> for MemStore {
    fn from_iter<I: IntoIterator<Item = ElementRecord>>(iter: I) -> Self {
        let mut store = MemStore::new();
        for record in iter {
            store.insert(record);
        }
        store
    }
}

impl ElementStore for MemStore {
    type Element = ElementRecord;
    type Query<'a> = MemQuery<'a>;

    fn query(&self, scope: &Scope) -> Result<MemQuery<'_>> {
        Ok(MemQuery {
            store: self,
            ids: self.scope_ids(scope)?,
        })
    }

    fn element(&self, id: ElementId) -> Option<ElementRecord> {
        self.records.get(&id).cloned()
    }

    fn resolve_unique_id(&self, unique_id: &Uuid) -> Option<ElementId> {
        self.records
            .values()
            .find(|record| record.unique_id == *unique_id)
            .map(|record| record.id)
    }
}

/// Query handle over a [`MemStore`]. Matches iterate in ascending id order.
#[derive(Debug, Clone)]
pub struct MemQuery<'a> {
    store: &'a MemStore,
    ids: BTreeSet<ElementId>,
}

impl MemQuery<'_> {
    fn check_same_store(&self, other: &Self) -> Result<()> {
        if std::ptr::eq(self.store, other.store) {
            Ok(())
        } else {
            Err(QueryError::Store(
                "cannot combine queries from different documents".to_string(),
            ))
        }
    }
}

impl NativeQuery for MemQuery<'_> {
    type Element = ElementRecord;

    fn apply(mut self, op: &NativeOp) -> Result<Self> {
        let records = &self.store.records;
        self.ids
            .retain(|id| records.get(id).is_some_and(|record| record.matches(op)));
        Ok(self)
    }

    fn exclude(mut self, ids: &BTreeSet<ElementId>) -> Result<Self> {
        self.ids.retain(|id| !ids.contains(id));
        Ok(self)
    }

    fn intersect(mut self, other: Self) -> Result<Self> {
        self.check_same_store(&other)?;
        self.ids.retain(|id| other.ids.contains(id));
        Ok(self)
    }

    fn union(mut self, other: Self) -> Result<Self> {
        self.check_same_store(&other)?;
        self.ids.extend(other.ids);
        Ok(self)
    }

    fn elements(&self) -> Box<dyn Iterator<Item = ElementRecord> + '_> {
        let store = self.store;
        Box::new(self.ids.iter().filter_map(move |id| {
            store.materialized.set(store.materialized.get() + 1);
            store.records.get(id).cloned()
        }))
    }

    fn ids(&self) -> Vec<ElementId> {
        self.ids.iter().copied().collect()
    }

    fn count(&self) -> usize {
        self.ids.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{ids, sample_store};

    fn query_ids(store: &MemStore, scope: &Scope, op: NativeOp) -> Vec<ElementId> {
        store.query(scope).unwrap().apply(&op).unwrap().ids()
    }

    #[test]
    fn document_scope_contains_everything() {
        let store = sample_store();
        let query = store.query(&Scope::Document).unwrap();
        assert_eq!(query.count(), store.len());
    }

    #[test]
    fn view_scope_excludes_types_and_foreign_view_elements() {
        let store = sample_store();
        let query = store.query(&Scope::View(ids::PLAN_1)).unwrap();
        let found = query.ids();
        assert!(found.contains(&ids::WALL_A));
        assert!(found.contains(&ids::TEXT_1));
        assert!(!found.contains(&ids::WALL_TYPE));
        assert!(!found.contains(&ids::TEXT_2));
    }

    #[test]
    fn view_scope_requires_a_view() {
        let store = sample_store();
        let err = store.query(&Scope::View(ids::WALL_A)).unwrap_err();
        assert!(matches!(err, QueryError::Store(_)));
    }

    #[test]
    fn element_scope_requires_existing_elements() {
        let store = sample_store();
        let query = store
            .query(&Scope::Elements(vec![ids::WALL_A, ids::DOOR_1]))
            .unwrap();
        assert_eq!(query.count(), 2);

        let err = store
            .query(&Scope::Elements(vec![ElementId::new(9999)]))
            .unwrap_err();
        assert!(matches!(err, QueryError::Store(_)));
    }

    #[test]
    fn of_class_is_exact() {
        let store = sample_store();
        let walls = query_ids(&store, &Scope::Document, NativeOp::OfClass(ElementClass::Wall));
        assert_eq!(walls, vec![ids::WALL_A, ids::WALL_B, ids::WALL_C]);
    }

    #[test]
    fn element_type_true_and_false_partition() {
        let store = sample_store();
        let types = query_ids(&store, &Scope::Document, NativeOp::ElementType(true));
        let instances = query_ids(&store, &Scope::Document, NativeOp::ElementType(false));
        assert_eq!(types.len() + instances.len(), store.len());
        assert!(types.iter().all(|id| !instances.contains(id)));
    }

    #[test]
    fn family_symbols_and_instances() {
        let store = sample_store();
        let symbols = query_ids(
            &store,
            &Scope::Document,
            NativeOp::FamilySymbols(ids::DOOR_FAMILY),
        );
        assert_eq!(symbols, vec![ids::DOOR_SYMBOL_A, ids::DOOR_SYMBOL_B]);

        let instances = query_ids(
            &store,
            &Scope::Document,
            NativeOp::FamilyInstances(ids::DOOR_SYMBOL_A),
        );
        assert_eq!(instances, vec![ids::DOOR_1, ids::DOOR_2]);
    }

    #[test]
    fn level_and_inverted_level() {
        let store = sample_store();
        let on_level = query_ids(
            &store,
            &Scope::Document,
            NativeOp::Level {
                level: ids::LEVEL_1,
                inverted: false,
            },
        );
        let off_level = query_ids(
            &store,
            &Scope::Document,
            NativeOp::Level {
                level: ids::LEVEL_1,
                inverted: true,
            },
        );
        assert_eq!(on_level.len() + off_level.len(), store.len());
        assert!(on_level.contains(&ids::WALL_A));
        assert!(off_level.contains(&ids::WALL_C));
    }

    #[test]
    fn exclude_union_and_intersect() {
        let store = sample_store();
        let walls = store
            .query(&Scope::Document)
            .unwrap()
            .apply(&NativeOp::OfClass(ElementClass::Wall))
            .unwrap();
        let doors = store
            .query(&Scope::Document)
            .unwrap()
            .apply(&NativeOp::OfCategory(Category::DOORS))
            .unwrap();

        let both = walls.clone().union(doors.clone()).unwrap();
        // 3 walls plus 2 door symbols and 3 door instances
        assert_eq!(both.count(), 8);

        let none = walls.clone().intersect(doors).unwrap();
        assert_eq!(none.count(), 0);

        let excluded = walls
            .exclude(&BTreeSet::from([ids::WALL_A]))
            .unwrap();
        assert_eq!(excluded.ids(), vec![ids::WALL_B, ids::WALL_C]);
    }

    #[test]
    fn combining_queries_from_different_stores_fails() {
        let first = sample_store();
        let second = sample_store();
        let a = first.query(&Scope::Document).unwrap();
        let b = second.query(&Scope::Document).unwrap();
        assert!(matches!(a.union(b), Err(QueryError::Store(_))));
    }

    #[test]
    fn count_does_not_materialize_but_traversal_does() {
        let store = sample_store();
        let query = store
            .query(&Scope::Document)
            .unwrap()
            .apply(&NativeOp::OfClass(ElementClass::Wall))
            .unwrap();

        assert_eq!(query.count(), 3);
        assert_eq!(store.materialized(), 0);

        assert_eq!(query.elements().count(), 3);
        assert_eq!(store.materialized(), 3);

        // A second traversal starts over.
        assert_eq!(query.elements().count(), 3);
        assert_eq!(store.materialized(), 6);

        store.reset_materialized();
        assert_eq!(query.count(), 3);
        assert_eq!(store.materialized(), 0);
    }

    #[test]
    fn lookup_parameter_by_name() {
        let store = sample_store();
        let wall = store.record(ids::WALL_A).unwrap();
        assert_eq!(wall.lookup_parameter("Height"), Some(crate::test_utils::HEIGHT));
        assert_eq!(wall.lookup_parameter("Nope"), None);
    }
}
