#![allow(dead_code)]

use elemquery::model::{Category, ElementClass, ElementId, ParamValue, ParameterId};
use elemquery::store::memory::{ElementRecord, MemStore};

pub const HEIGHT: ParameterId = ParameterId::new(-1001300);
pub const NAME: ParameterId = ParameterId::new(-1002002);

pub const LEVEL_1: ElementId = ElementId::new(900);
pub const LEVEL_2: ElementId = ElementId::new(901);

/// The category a fixture element of `class` is filed under.
pub fn category_of(class: ElementClass) -> Category {
    match class {
        ElementClass::Wall | ElementClass::WallType => Category::WALLS,
        ElementClass::Floor | ElementClass::FloorType => Category::FLOORS,
        ElementClass::FamilyInstance | ElementClass::FamilySymbol => Category::DOORS,
        ElementClass::Level => Category::LEVELS,
        ElementClass::TextNote => Category::TEXT_NOTES,
        _ => Category::GENERIC_MODEL,
    }
}

pub fn record(id: i64, class: ElementClass) -> ElementRecord {
    ElementRecord::new(ElementId::new(id), class).with_category(category_of(class))
}

pub fn with_height(id: i64, height: f64) -> ElementRecord {
    record(id, ElementClass::Wall).with_parameter(HEIGHT, "Height", ParamValue::Double(height))
}

pub fn with_name(id: i64, name: &str) -> ElementRecord {
    record(id, ElementClass::Wall).with_parameter(NAME, "Name", ParamValue::Text(name.into()))
}

pub fn ids(raw: &[i64]) -> Vec<ElementId> {
    raw.iter().copied().map(ElementId::new).collect()
}

/// Ten elements: four wall instances, two wall types, two floors, two levels.
pub fn ten_elements() -> MemStore {
    [
        record(1, ElementClass::Wall),
        record(2, ElementClass::Wall),
        record(3, ElementClass::WallType),
        record(4, ElementClass::Wall),
        record(5, ElementClass::Floor),
        record(6, ElementClass::WallType),
        record(7, ElementClass::Wall),
        record(8, ElementClass::Floor),
        ElementRecord::new(LEVEL_1, ElementClass::Level).with_category(Category::LEVELS),
        ElementRecord::new(LEVEL_2, ElementClass::Level).with_category(Category::LEVELS),
    ]
    .into_iter()
    .collect()
}
