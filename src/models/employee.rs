//! Detailer employees

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::EntityId;

/// An employee of a detailer, soft-deleted via `is_removed`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub id: EntityId,
    pub first_name: String,
    pub last_name: String,
    pub description: String,
    /// Years of experience
    pub experience: i32,
    pub detailer_id: EntityId,
    pub is_removed: bool,
}

impl Employee {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Add employee request
#[derive(Debug, Deserialize, Validate)]
pub struct AddEmployee {
    #[validate(length(min = 1, max = 150))]
    pub first_name: String,
    #[validate(length(min = 1, max = 150))]
    pub last_name: String,
    pub description: String,
    #[validate(range(min = 0, max = 80))]
    pub experience: i32,
}
