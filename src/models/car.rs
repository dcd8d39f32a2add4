//! Client cars

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::EntityId;

/// A client's car. Soft-deleted via `is_removed` so past bookings keep
/// resolving.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Car {
    pub id: EntityId,
    pub manufacturer: String,
    pub model: String,
    pub year_of_production: i32,
    pub user_id: EntityId,
    pub is_removed: bool,
}

impl Car {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.manufacturer, self.model)
    }
}

/// Add car request
#[derive(Debug, Deserialize, Validate)]
pub struct AddCar {
    #[validate(length(min = 1, max = 50))]
    pub manufacturer: String,
    #[validate(length(min = 1, max = 50))]
    pub model: String,
    #[validate(range(min = 1900, max = 2100))]
    pub year_of_production: i32,
}
