use shared::MealSlot;

/// Description of one meal served on one day
#[derive(Debug, Clone, PartialEq)]
pub struct MenuEntry {
    pub date: String,
    pub slot: MealSlot,
    pub description: String,
}
