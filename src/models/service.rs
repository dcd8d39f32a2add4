//! Detailing service offering

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::EntityId;

pub const DEFAULT_LABEL_COLOR: &str = "#6aa84f";

/// A service offered by a detailer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailService {
    pub id: EntityId,
    pub name: String,
    pub price: f64,
    pub description: String,
    /// Stored media reference, e.g. "3f1a….png"
    pub image: Option<String>,
    pub detailer_id: EntityId,
    /// Duration in minutes
    pub duration: i64,
    /// Calendar display color
    pub label_color: String,
    pub view_count: i64,
}

/// One recurring weekly opening supplied alongside a new service
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceDay {
    /// Day of week, Monday=1 .. Sunday=7
    pub day: u8,
    /// Time of day, "HH:MM" or "HH:MM:SS"
    pub time: String,
}

/// Create service request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateService {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(range(min = 0.0))]
    pub price: f64,
    pub description: String,
    #[validate(range(min = 1))]
    pub duration: i64,
    /// Base64 data URL ("data:image/png;base64,…")
    pub image_file: Option<String>,
    pub label_color: Option<String>,
    #[serde(default)]
    pub service_days: Vec<ServiceDay>,
}
