//! Weekly schedule and computed availability slots

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use super::EntityId;

/// A recurring weekly time slot offered for a service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklySchedule {
    pub id: EntityId,
    pub service_id: EntityId,
    /// Day of week, Monday=1 .. Sunday=7
    pub day_of_week: u8,
    pub time: NaiveTime,
}

/// A bookable time window computed by the availability engine.
/// Field spellings match the calendar widget the platform feeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailableSlot {
    /// Display label, "HH:MM <service name>"
    pub text: String,
    /// Slot start, "YYYY-MM-DDTHH:MM:SS"
    pub start: String,
    /// Slot end, start + service duration
    pub end: String,
    #[serde(rename = "backColor")]
    pub back_color: String,
}
