//! # Domain Model: Elements, Classes and Categories
//!
//! This module defines the canonical tokens the rest of the crate works with:
//! [`ElementId`], [`ParameterId`], [`ElementClass`] and [`Category`], plus the
//! [`Element`] trait through which filters read the external element store.
//!
//! ## Tokens vs References
//!
//! Callers refer to things loosely: a class by name, a category as `"OST_Walls"`
//! or `"walls"`, an element by its integer id or a live element. The coercion
//! layer ([`crate::coerce`]) turns those references into the tokens defined here.
//! Nothing above the coercion layer ever sees a raw name.
//!
//! ## Static Catalogs
//!
//! Classes and built-in categories are closed sets known at compile time:
//!
//! - [`ElementClass::ALL`]: every element class the store can report
//! - [`CATEGORIES`]: the built-in category catalog (id + canonical name)
//!
//! Adding a category means adding an entry to [`CATEGORIES`].

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier of an element inside one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(i64);

impl ElementId {
    /// The store's "no element" id.
    pub const INVALID: ElementId = ElementId(-1);

    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> i64 {
        self.0
    }

    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a parameter definition. Built-in parameters use negative ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterId(i64);

impl ParameterId {
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ParameterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored parameter value, tagged with its storage type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParamValue {
    Text(String),
    Double(f64),
    Integer(i64),
    Id(ElementId),
}

/// The runtime class of an element.
///
/// Class membership is exact: a `ViewPlan` is not an `OfClass(View)` match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ElementClass {
    Wall,
    WallType,
    Floor,
    FloorType,
    Ceiling,
    RoofBase,
    FamilyInstance,
    FamilySymbol,
    Family,
    Level,
    Grid,
    View,
    ViewPlan,
    ViewSection,
    View3D,
    ViewSheet,
    Room,
    Area,
    TextNote,
    Dimension,
    ModelCurve,
    DetailCurve,
    Group,
    ImportInstance,
    Material,
}

impl ElementClass {
    pub const ALL: &'static [ElementClass] = &[
        ElementClass::Wall,
        ElementClass::WallType,
        ElementClass::Floor,
        ElementClass::FloorType,
        ElementClass::Ceiling,
        ElementClass::RoofBase,
        ElementClass::FamilyInstance,
        ElementClass::FamilySymbol,
        ElementClass::Family,
        ElementClass::Level,
        ElementClass::Grid,
        ElementClass::View,
        ElementClass::ViewPlan,
        ElementClass::ViewSection,
        ElementClass::View3D,
        ElementClass::ViewSheet,
        ElementClass::Room,
        ElementClass::Area,
        ElementClass::TextNote,
        ElementClass::Dimension,
        ElementClass::ModelCurve,
        ElementClass::DetailCurve,
        ElementClass::Group,
        ElementClass::ImportInstance,
        ElementClass::Material,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ElementClass::Wall => "Wall",
            ElementClass::WallType => "WallType",
            ElementClass::Floor => "Floor",
            ElementClass::FloorType => "FloorType",
            ElementClass::Ceiling => "Ceiling",
            ElementClass::RoofBase => "RoofBase",
            ElementClass::FamilyInstance => "FamilyInstance",
            ElementClass::FamilySymbol => "FamilySymbol",
            ElementClass::Family => "Family",
            ElementClass::Level => "Level",
            ElementClass::Grid => "Grid",
            ElementClass::View => "View",
            ElementClass::ViewPlan => "ViewPlan",
            ElementClass::ViewSection => "ViewSection",
            ElementClass::View3D => "View3D",
            ElementClass::ViewSheet => "ViewSheet",
            ElementClass::Room => "Room",
            ElementClass::Area => "Area",
            ElementClass::TextNote => "TextNote",
            ElementClass::Dimension => "Dimension",
            ElementClass::ModelCurve => "ModelCurve",
            ElementClass::DetailCurve => "DetailCurve",
            ElementClass::Group => "Group",
            ElementClass::ImportInstance => "ImportInstance",
            ElementClass::Material => "Material",
        }
    }

    /// Whether elements of this class can act as a view scope.
    pub fn is_view(self) -> bool {
        matches!(
            self,
            ElementClass::View
                | ElementClass::ViewPlan
                | ElementClass::ViewSection
                | ElementClass::View3D
                | ElementClass::ViewSheet
        )
    }
}

impl fmt::Display for ElementClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A built-in category token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(i64);

impl Category {
    pub const WALLS: Category = Category(-2000011);
    pub const WINDOWS: Category = Category(-2000014);
    pub const DOORS: Category = Category(-2000023);
    pub const FLOORS: Category = Category(-2000032);
    pub const ROOFS: Category = Category(-2000035);
    pub const CEILINGS: Category = Category(-2000038);
    pub const LINES: Category = Category(-2000051);
    pub const FURNITURE: Category = Category(-2000080);
    pub const COLUMNS: Category = Category(-2000100);
    pub const STAIRS: Category = Category(-2000120);
    pub const RAILINGS: Category = Category(-2000126);
    pub const GENERIC_MODEL: Category = Category(-2000151);
    pub const ROOMS: Category = Category(-2000160);
    pub const CURTAIN_WALL_PANELS: Category = Category(-2000170);
    pub const GRIDS: Category = Category(-2000220);
    pub const LEVELS: Category = Category(-2000240);
    pub const DIMENSIONS: Category = Category(-2000260);
    pub const VIEWS: Category = Category(-2000279);
    pub const TEXT_NOTES: Category = Category(-2000300);
    pub const CASEWORK: Category = Category(-2001000);
    pub const ELECTRICAL_EQUIPMENT: Category = Category(-2001040);
    pub const LIGHTING_FIXTURES: Category = Category(-2001120);
    pub const MECHANICAL_EQUIPMENT: Category = Category(-2001140);
    pub const PLUMBING_FIXTURES: Category = Category(-2001160);
    pub const STRUCTURAL_FRAMING: Category = Category(-2001320);
    pub const STRUCTURAL_COLUMNS: Category = Category(-2001330);
    pub const SHEETS: Category = Category(-2003100);
    pub const AREAS: Category = Category(-2003200);

    pub const fn raw(self) -> i64 {
        self.0
    }

    /// Look up the catalog entry for this category.
    pub fn spec(self) -> Option<&'static CategorySpec> {
        CATEGORIES.iter().find(|spec| spec.category == self)
    }

    /// The canonical (unprefixed) name, e.g. `"Walls"`.
    pub fn name(self) -> Option<&'static str> {
        self.spec().map(|spec| spec.name)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "OST_{}", name),
            None => write!(f, "{}", self.0),
        }
    }
}

/// Catalog entry for a built-in category.
#[derive(Debug, Clone)]
pub struct CategorySpec {
    pub category: Category,
    /// Name without the `OST_` prefix.
    pub name: &'static str,
}

impl CategorySpec {
    const fn new(category: Category, name: &'static str) -> Self {
        Self { category, name }
    }
}

/// The built-in category catalog.
pub const CATEGORIES: &[CategorySpec] = &[
    CategorySpec::new(Category::WALLS, "Walls"),
    CategorySpec::new(Category::WINDOWS, "Windows"),
    CategorySpec::new(Category::DOORS, "Doors"),
    CategorySpec::new(Category::FLOORS, "Floors"),
    CategorySpec::new(Category::ROOFS, "Roofs"),
    CategorySpec::new(Category::CEILINGS, "Ceilings"),
    CategorySpec::new(Category::LINES, "Lines"),
    CategorySpec::new(Category::FURNITURE, "Furniture"),
    CategorySpec::new(Category::COLUMNS, "Columns"),
    CategorySpec::new(Category::STAIRS, "Stairs"),
    CategorySpec::new(Category::RAILINGS, "Railings"),
    CategorySpec::new(Category::GENERIC_MODEL, "GenericModel"),
    CategorySpec::new(Category::ROOMS, "Rooms"),
    CategorySpec::new(Category::CURTAIN_WALL_PANELS, "CurtainWallPanels"),
    CategorySpec::new(Category::GRIDS, "Grids"),
    CategorySpec::new(Category::LEVELS, "Levels"),
    CategorySpec::new(Category::DIMENSIONS, "Dimensions"),
    CategorySpec::new(Category::VIEWS, "Views"),
    CategorySpec::new(Category::TEXT_NOTES, "TextNotes"),
    CategorySpec::new(Category::CASEWORK, "Casework"),
    CategorySpec::new(Category::ELECTRICAL_EQUIPMENT, "ElectricalEquipment"),
    CategorySpec::new(Category::LIGHTING_FIXTURES, "LightingFixtures"),
    CategorySpec::new(Category::MECHANICAL_EQUIPMENT, "MechanicalEquipment"),
    CategorySpec::new(Category::PLUMBING_FIXTURES, "PlumbingFixtures"),
    CategorySpec::new(Category::STRUCTURAL_FRAMING, "StructuralFraming"),
    CategorySpec::new(Category::STRUCTURAL_COLUMNS, "StructuralColumns"),
    CategorySpec::new(Category::SHEETS, "Sheets"),
    CategorySpec::new(Category::AREAS, "Areas"),
];

/// Read access to one element of the external store.
///
/// This is the only view of an element that filters, parameter rules and
/// `where` predicates get. It is object safe so predicates can be stored as
/// `dyn Fn(&dyn Element) -> bool`.
pub trait Element {
    fn id(&self) -> ElementId;

    fn unique_id(&self) -> Uuid;

    fn name(&self) -> &str;

    fn class(&self) -> ElementClass;

    fn category(&self) -> Option<Category>;

    /// True for element types (wall types, family symbols, ...), false for instances.
    fn is_element_type(&self) -> bool;

    /// The element's type. For family instances this is their family symbol.
    fn type_id(&self) -> Option<ElementId>;

    /// The owning family, for family symbols.
    fn family_id(&self) -> Option<ElementId>;

    /// The view that owns this element, for view-specific elements.
    fn owner_view(&self) -> Option<ElementId>;

    fn level(&self) -> Option<ElementId>;

    fn is_curve_driven(&self) -> bool;

    /// Read a parameter value. `None` when the element does not have it.
    fn parameter(&self, id: ParameterId) -> Option<ParamValue>;

    /// Resolve a parameter by its display name.
    fn lookup_parameter(&self, name: &str) -> Option<ParameterId>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn invalid_element_id_is_not_valid() {
        assert!(!ElementId::INVALID.is_valid());
        assert!(ElementId::new(0).is_valid());
        assert!(ElementId::new(42).is_valid());
    }

    #[test]
    fn category_catalog_has_unique_ids_and_names() {
        let ids: HashSet<_> = CATEGORIES.iter().map(|spec| spec.category).collect();
        let names: HashSet<_> = CATEGORIES.iter().map(|spec| spec.name).collect();
        assert_eq!(ids.len(), CATEGORIES.len());
        assert_eq!(names.len(), CATEGORIES.len());
    }

    #[test]
    fn category_display_uses_ost_prefix() {
        assert_eq!(Category::WALLS.to_string(), "OST_Walls");
        assert_eq!(Category::STRUCTURAL_COLUMNS.name(), Some("StructuralColumns"));
    }

    #[test]
    fn all_classes_have_distinct_names() {
        let names: HashSet<_> = ElementClass::ALL.iter().map(|c| c.name()).collect();
        assert_eq!(names.len(), ElementClass::ALL.len());
    }

    #[test]
    fn view_classes() {
        assert!(ElementClass::ViewPlan.is_view());
        assert!(ElementClass::View3D.is_view());
        assert!(!ElementClass::Wall.is_view());
        assert!(!ElementClass::Level.is_view());
    }
}
