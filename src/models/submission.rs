//! Booking submissions and their statuses

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::EntityId;

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_IN_PROGRESS: &str = "in progress";
pub const STATUS_DONE: &str = "done";

/// A concrete booking of one weekly schedule instance on one date.
/// The store enforces uniqueness of (schedule_id, date).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub id: EntityId,
    pub date: NaiveDateTime,
    pub schedule_id: EntityId,
    pub service_id: EntityId,
    pub user_id: EntityId,
    pub car_id: EntityId,
    pub status_id: EntityId,
    pub employee_id: Option<EntityId>,
}

/// Named submission state, resolved by name at request time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitStatus {
    pub id: EntityId,
    pub name: String,
}

/// A client's own upcoming booking, joined for display
#[derive(Debug, Clone, Serialize)]
pub struct UserSubmission {
    pub service_id: EntityId,
    pub service_name: String,
    pub service_price: f64,
    pub service_image: Option<String>,
    pub date: NaiveDateTime,
    pub submit_id: EntityId,
    pub car_id: EntityId,
    pub car_name: String,
}
