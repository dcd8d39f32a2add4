//! Data models for the detailing core

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod car;
pub mod employee;
pub mod invoice;
pub mod order;
pub mod schedule;
pub mod service;
pub mod submission;
pub mod user;

// Re-export commonly used types
pub use car::{AddCar, Car};
pub use employee::{AddEmployee, Employee};
pub use invoice::{CreateInvoice, Invoice};
pub use order::{AnalyticsReport, DetailerStats, OrderList, OrderRecord};
pub use schedule::{AvailableSlot, WeeklySchedule};
pub use service::{CreateService, DetailService};
pub use submission::{SubmitStatus, Submission};
pub use user::{AppUser, RegisterUser, Role, RoleName};

/// Opaque entity identifier wrapping a canonical string form. Used
/// uniformly across all entities; new records get a UUIDv4.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for EntityId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}
