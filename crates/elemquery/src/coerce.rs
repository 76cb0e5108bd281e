//! # Coercion Layer
//!
//! Normalizes caller-supplied references into canonical tokens:
//!
//! | Function | Accepts | Produces |
//! |----------|---------|----------|
//! | [`to_class`] | token, element, name | [`ElementClass`] |
//! | [`to_category`] | token, element, integer id, name | [`Category`] |
//! | [`to_element_id`] | id, element, integer, unique id | [`ElementId`] |
//! | [`to_element_ids`] | any iterable of the above | `Vec<ElementId>` |
//!
//! ## Name Matching
//!
//! Names are matched case-insensitively, ignoring spaces and underscores, and
//! with the namespace prefix optional. `"Walls"`, `"OST_Walls"`, `"ost_walls"`
//! and `"BuiltInCategory.OST_Walls"` all resolve to [`Category::WALLS`];
//! `"Wall"` and `"DB.Wall"` resolve to [`ElementClass::Wall`].
//!
//! Anything that does not resolve is a [`CoercionError`]. There is no fallback
//! token.

use crate::error::CoercionError;
use crate::model::{Category, Element, ElementClass, ElementId, CATEGORIES};
use crate::store::ElementStore;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use uuid::Uuid;

const CLASS_PREFIXES: &[&str] = &["Autodesk.Revit.DB.", "DB."];
const CATEGORY_PREFIXES: &[&str] = &["BuiltInCategory.", "OST_"];

static CLASS_INDEX: Lazy<HashMap<String, ElementClass>> = Lazy::new(|| {
    ElementClass::ALL
        .iter()
        .map(|class| (normalize_name(class.name()), *class))
        .collect()
});

static CATEGORY_INDEX: Lazy<HashMap<String, Category>> = Lazy::new(|| {
    CATEGORIES
        .iter()
        .map(|spec| (normalize_name(spec.name), spec.category))
        .collect()
});

/// A reference to an element class.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassRef {
    Token(ElementClass),
    Name(String),
}

impl ClassRef {
    /// The class of a live element.
    pub fn of(element: &dyn Element) -> Self {
        ClassRef::Token(element.class())
    }
}

impl From<ElementClass> for ClassRef {
    fn from(class: ElementClass) -> Self {
        ClassRef::Token(class)
    }
}

impl From<&str> for ClassRef {
    fn from(name: &str) -> Self {
        ClassRef::Name(name.to_string())
    }
}

impl From<String> for ClassRef {
    fn from(name: String) -> Self {
        ClassRef::Name(name)
    }
}

/// A reference to a built-in category.
#[derive(Debug, Clone, PartialEq)]
pub enum CategoryRef {
    Token(Category),
    Id(i64),
    Name(String),
    /// The category of a live element, which may have none.
    Element {
        id: ElementId,
        category: Option<Category>,
    },
}

impl CategoryRef {
    pub fn of(element: &dyn Element) -> Self {
        CategoryRef::Element {
            id: element.id(),
            category: element.category(),
        }
    }
}

impl From<Category> for CategoryRef {
    fn from(category: Category) -> Self {
        CategoryRef::Token(category)
    }
}

impl From<i64> for CategoryRef {
    fn from(id: i64) -> Self {
        CategoryRef::Id(id)
    }
}

impl From<&str> for CategoryRef {
    fn from(name: &str) -> Self {
        CategoryRef::Name(name.to_string())
    }
}

impl From<String> for CategoryRef {
    fn from(name: String) -> Self {
        CategoryRef::Name(name)
    }
}

/// A reference to a single element.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementRef {
    Id(ElementId),
    Int(i64),
    UniqueId(Uuid),
}

impl ElementRef {
    pub fn of(element: &dyn Element) -> Self {
        ElementRef::Id(element.id())
    }
}

impl From<ElementId> for ElementRef {
    fn from(id: ElementId) -> Self {
        ElementRef::Id(id)
    }
}

impl From<i64> for ElementRef {
    fn from(id: i64) -> Self {
        ElementRef::Int(id)
    }
}

impl From<Uuid> for ElementRef {
    fn from(uid: Uuid) -> Self {
        ElementRef::UniqueId(uid)
    }
}

/// Resolve a class reference.
pub fn to_class(reference: impl Into<ClassRef>) -> Result<ElementClass, CoercionError> {
    match reference.into() {
        ClassRef::Token(class) => Ok(class),
        ClassRef::Name(name) => {
            let key = normalize_name(strip_prefixes(&name, CLASS_PREFIXES));
            CLASS_INDEX
                .get(&key)
                .copied()
                .ok_or(CoercionError::UnknownClass(name))
        }
    }
}

/// Resolve a category reference against the built-in catalog.
pub fn to_category(reference: impl Into<CategoryRef>) -> Result<Category, CoercionError> {
    match reference.into() {
        CategoryRef::Token(category) => Ok(category),
        CategoryRef::Id(raw) => CATEGORIES
            .iter()
            .find(|spec| spec.category.raw() == raw)
            .map(|spec| spec.category)
            .ok_or_else(|| CoercionError::UnknownCategory(raw.to_string())),
        CategoryRef::Name(name) => {
            let key = normalize_name(strip_prefixes(&name, CATEGORY_PREFIXES));
            CATEGORY_INDEX
                .get(&key)
                .copied()
                .ok_or(CoercionError::UnknownCategory(name))
        }
        CategoryRef::Element { id, category } => category.ok_or(CoercionError::NoCategory(id)),
    }
}

/// Resolve an element reference. Unique ids are looked up in `store`.
pub fn to_element_id<S: ElementStore>(
    store: &S,
    reference: impl Into<ElementRef>,
) -> Result<ElementId, CoercionError> {
    let id = match reference.into() {
        ElementRef::Id(id) => id,
        ElementRef::Int(raw) => ElementId::new(raw),
        ElementRef::UniqueId(uid) => store
            .resolve_unique_id(&uid)
            .ok_or(CoercionError::UnknownUniqueId(uid))?,
    };
    if !id.is_valid() {
        return Err(CoercionError::InvalidElementId(id.raw()));
    }
    Ok(id)
}

/// Resolve every reference, failing on the first one that does not resolve.
pub fn to_element_ids<S, I, R>(store: &S, references: I) -> Result<Vec<ElementId>, CoercionError>
where
    S: ElementStore,
    I: IntoIterator<Item = R>,
    R: Into<ElementRef>,
{
    references
        .into_iter()
        .map(|reference| to_element_id(store, reference))
        .collect()
}

fn strip_prefixes<'a>(name: &'a str, prefixes: &[&str]) -> &'a str {
    let mut rest = name.trim();
    for prefix in prefixes {
        if let Some(head) = rest.get(..prefix.len()) {
            if head.eq_ignore_ascii_case(prefix) {
                rest = &rest[prefix.len()..];
            }
        }
    }
    rest
}

fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}
