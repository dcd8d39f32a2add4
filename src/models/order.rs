//! Aggregated order and analytics records for the detailer role

use serde::Serialize;

use super::EntityId;

/// One fully joined order row
#[derive(Debug, Clone, Serialize)]
pub struct OrderRecord {
    pub id: EntityId,
    pub client_id: EntityId,
    pub client_phone: Option<String>,
    pub client_full_name: String,
    /// Car display name, "<manufacturer> <model>"
    pub car: String,
    pub service_name: String,
    pub service_id: EntityId,
    pub service_price: f64,
    /// "YYYY-MM-DD HH:MM"
    pub due_date: String,
    pub status_id: EntityId,
    pub employee_id: Option<EntityId>,
}

/// Joined order listing. Rows whose references failed to resolve are
/// dropped; `skipped` makes the drop observable to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct OrderList {
    pub orders: Vec<OrderRecord>,
    pub skipped: usize,
}

/// Dashboard counts per named status
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailerStats {
    pub pending_count: usize,
    pub in_progress_count: usize,
    pub done_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DailyOrderCount {
    /// "YYYY-MM-DD"
    pub date: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmployeeOrderCount {
    pub employee_id: EntityId,
    pub employee: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClientOrderCount {
    pub client_id: EntityId,
    pub client: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceViewCount {
    pub service_id: EntityId,
    pub service: String,
    pub view_count: i64,
}

/// Time-bucketed analytics over a date range
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsReport {
    pub orders: Vec<DailyOrderCount>,
    pub employees: Vec<EmployeeOrderCount>,
    pub clients: Vec<ClientOrderCount>,
    pub services: Vec<ServiceViewCount>,
}

/// One client's submission against a detailer's services. Car, status and
/// employee are tolerated as missing and rendered absent.
#[derive(Debug, Clone, Serialize)]
pub struct ClientSubmission {
    pub id: EntityId,
    pub client_id: EntityId,
    pub car: Option<String>,
    pub service_name: String,
    pub service_id: EntityId,
    pub service_price: f64,
    pub due_date: String,
    pub status: Option<String>,
    pub employee: Option<String>,
}
