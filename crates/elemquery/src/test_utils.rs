use crate::model::{Category, ElementClass, ElementId, ParamValue, ParameterId};
use crate::store::memory::{ElementRecord, MemStore};

pub const HEIGHT: ParameterId = ParameterId::new(-1001300);
pub const MARK: ParameterId = ParameterId::new(-1001203);

pub mod ids {
    use crate::model::ElementId;

    pub const LEVEL_1: ElementId = ElementId::new(1);
    pub const LEVEL_2: ElementId = ElementId::new(2);
    pub const PLAN_1: ElementId = ElementId::new(10);
    pub const PLAN_2: ElementId = ElementId::new(11);
    pub const WALL_TYPE: ElementId = ElementId::new(20);
    pub const WALL_A: ElementId = ElementId::new(21);
    pub const WALL_B: ElementId = ElementId::new(22);
    pub const WALL_C: ElementId = ElementId::new(23);
    pub const DOOR_FAMILY: ElementId = ElementId::new(30);
    pub const DOOR_SYMBOL_A: ElementId = ElementId::new(31);
    pub const DOOR_SYMBOL_B: ElementId = ElementId::new(32);
    pub const DOOR_1: ElementId = ElementId::new(33);
    pub const DOOR_2: ElementId = ElementId::new(34);
    pub const DOOR_3: ElementId = ElementId::new(35);
    pub const TEXT_1: ElementId = ElementId::new(40);
    pub const TEXT_2: ElementId = ElementId::new(41);
    pub const LINE_1: ElementId = ElementId::new(50);
    pub const LINE_2: ElementId = ElementId::new(51);
}

fn wall(
    id: ElementId,
    level: ElementId,
    view: ElementId,
    height: f64,
    mark: &str,
) -> ElementRecord {
    ElementRecord::new(id, ElementClass::Wall)
        .with_category(Category::WALLS)
        .with_type(ids::WALL_TYPE)
        .with_level(level)
        .visible_in(view)
        .with_parameter(HEIGHT, "Height", ParamValue::Double(height))
        .with_parameter(MARK, "Mark", ParamValue::Text(mark.into()))
}

fn door(id: ElementId, symbol: ElementId, level: ElementId, view: ElementId) -> ElementRecord {
    ElementRecord::new(id, ElementClass::FamilyInstance)
        .with_category(Category::DOORS)
        .with_type(symbol)
        .with_level(level)
        .visible_in(view)
}

/// A small two-level document: walls, doors, views and annotations.
pub fn sample_store() -> MemStore {
    [
        ElementRecord::new(ids::LEVEL_1, ElementClass::Level).with_category(Category::LEVELS),
        ElementRecord::new(ids::LEVEL_2, ElementClass::Level).with_category(Category::LEVELS),
        ElementRecord::new(ids::PLAN_1, ElementClass::ViewPlan)
            .with_category(Category::VIEWS)
            .with_level(ids::LEVEL_1),
        ElementRecord::new(ids::PLAN_2, ElementClass::ViewPlan)
            .with_category(Category::VIEWS)
            .with_level(ids::LEVEL_2),
        ElementRecord::new(ids::WALL_TYPE, ElementClass::WallType).with_category(Category::WALLS),
        wall(ids::WALL_A, ids::LEVEL_1, ids::PLAN_1, 10.0, "W-A"),
        wall(ids::WALL_B, ids::LEVEL_1, ids::PLAN_1, 12.0, "W-B"),
        wall(ids::WALL_C, ids::LEVEL_2, ids::PLAN_2, 15.0, "X-C"),
        ElementRecord::new(ids::DOOR_FAMILY, ElementClass::Family),
        ElementRecord::new(ids::DOOR_SYMBOL_A, ElementClass::FamilySymbol)
            .with_category(Category::DOORS)
            .with_family(ids::DOOR_FAMILY),
        ElementRecord::new(ids::DOOR_SYMBOL_B, ElementClass::FamilySymbol)
            .with_category(Category::DOORS)
            .with_family(ids::DOOR_FAMILY),
        door(ids::DOOR_1, ids::DOOR_SYMBOL_A, ids::LEVEL_1, ids::PLAN_1),
        door(ids::DOOR_2, ids::DOOR_SYMBOL_A, ids::LEVEL_2, ids::PLAN_2),
        door(ids::DOOR_3, ids::DOOR_SYMBOL_B, ids::LEVEL_1, ids::PLAN_1),
        ElementRecord::new(ids::TEXT_1, ElementClass::TextNote)
            .with_category(Category::TEXT_NOTES)
            .with_owner_view(ids::PLAN_1),
        ElementRecord::new(ids::TEXT_2, ElementClass::TextNote)
            .with_category(Category::TEXT_NOTES)
            .with_owner_view(ids::PLAN_2),
        ElementRecord::new(ids::LINE_1, ElementClass::DetailCurve)
            .with_category(Category::LINES)
            .with_owner_view(ids::PLAN_1)
            .with_curve_driven(true),
        ElementRecord::new(ids::LINE_2, ElementClass::ModelCurve)
            .with_category(Category::LINES)
            .with_level(ids::LEVEL_1)
            .visible_in(ids::PLAN_1)
            .with_curve_driven(true),
    ]
    .into_iter()
    .collect()
}
