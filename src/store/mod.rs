//! Entity store boundary
//!
//! The persistence layer is an external collaborator reached through the
//! traits below: equality filters, id-set lookups and plain CRUD, nothing
//! store-specific. Services receive a [`Store`] handle at construction.
//! The store owns the uniqueness constraint on `(schedule_id, date)` for
//! submissions and reports violations as [`StoreError::Duplicate`].

pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDateTime, NaiveTime};
use thiserror::Error;

use crate::models::{
    car::Car,
    employee::Employee,
    invoice::Invoice,
    schedule::WeeklySchedule,
    service::DetailService,
    submission::{SubmitStatus, Submission},
    user::{AppUser, Role},
    EntityId,
};

/// Errors surfaced by the persistence collaborator
#[derive(Error, Debug)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write
    #[error("duplicate key: {0}")]
    Duplicate(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert(&self, user: AppUser) -> StoreResult<()>;
    async fn get(&self, id: &EntityId) -> StoreResult<Option<AppUser>>;
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<AppUser>>;
    async fn list_by_ids(&self, ids: &[EntityId]) -> StoreResult<Vec<AppUser>>;
    /// Replace the stored record; false when the id is unknown
    async fn update(&self, user: &AppUser) -> StoreResult<bool>;
}

#[async_trait]
pub trait RoleStore: Send + Sync {
    async fn insert(&self, role: Role) -> StoreResult<()>;
    async fn get(&self, id: &EntityId) -> StoreResult<Option<Role>>;
    async fn find_by_name(&self, name: &str) -> StoreResult<Option<Role>>;
}

#[async_trait]
pub trait ServiceStore: Send + Sync {
    async fn insert(&self, service: DetailService) -> StoreResult<()>;
    async fn get(&self, id: &EntityId) -> StoreResult<Option<DetailService>>;
    async fn list_all(&self) -> StoreResult<Vec<DetailService>>;
    async fn list_for_detailer(&self, detailer_id: &EntityId) -> StoreResult<Vec<DetailService>>;
    async fn increment_view_count(&self, id: &EntityId) -> StoreResult<bool>;
}

#[async_trait]
pub trait ScheduleStore: Send + Sync {
    async fn insert(&self, schedule: WeeklySchedule) -> StoreResult<()>;
    async fn get(&self, id: &EntityId) -> StoreResult<Option<WeeklySchedule>>;
    async fn list_for_service(&self, service_id: &EntityId) -> StoreResult<Vec<WeeklySchedule>>;
    async fn list_for_service_day(
        &self,
        service_id: &EntityId,
        day_of_week: u8,
    ) -> StoreResult<Vec<WeeklySchedule>>;
    async fn find_for_service_time(
        &self,
        service_id: &EntityId,
        time: NaiveTime,
    ) -> StoreResult<Option<WeeklySchedule>>;
}

#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Insert, enforcing uniqueness of `(schedule_id, date)`
    async fn insert(&self, submission: Submission) -> StoreResult<()>;
    async fn get(&self, id: &EntityId) -> StoreResult<Option<Submission>>;
    async fn find_for_schedule_at(
        &self,
        schedule_id: &EntityId,
        at: NaiveDateTime,
    ) -> StoreResult<Option<Submission>>;
    async fn list_for_schedule(&self, schedule_id: &EntityId) -> StoreResult<Vec<Submission>>;
    async fn list_for_services(&self, service_ids: &[EntityId]) -> StoreResult<Vec<Submission>>;
    async fn list_future_for_user(
        &self,
        user_id: &EntityId,
        after: NaiveDateTime,
    ) -> StoreResult<Vec<Submission>>;
    async fn has_future_for_car(
        &self,
        car_id: &EntityId,
        after: NaiveDateTime,
    ) -> StoreResult<bool>;
    async fn update(&self, submission: &Submission) -> StoreResult<bool>;
    async fn delete(&self, id: &EntityId) -> StoreResult<bool>;
}

#[async_trait]
pub trait CarStore: Send + Sync {
    async fn insert(&self, car: Car) -> StoreResult<()>;
    async fn get(&self, id: &EntityId) -> StoreResult<Option<Car>>;
    async fn list_active_for_user(&self, user_id: &EntityId) -> StoreResult<Vec<Car>>;
    async fn list_by_ids(&self, ids: &[EntityId]) -> StoreResult<Vec<Car>>;
    async fn update(&self, car: &Car) -> StoreResult<bool>;
}

#[async_trait]
pub trait EmployeeStore: Send + Sync {
    async fn insert(&self, employee: Employee) -> StoreResult<()>;
    async fn get(&self, id: &EntityId) -> StoreResult<Option<Employee>>;
    async fn list_active_for_detailer(&self, detailer_id: &EntityId) -> StoreResult<Vec<Employee>>;
    async fn list_by_ids(&self, ids: &[EntityId]) -> StoreResult<Vec<Employee>>;
    async fn update(&self, employee: &Employee) -> StoreResult<bool>;
}

#[async_trait]
pub trait StatusStore: Send + Sync {
    async fn insert(&self, status: SubmitStatus) -> StoreResult<()>;
    async fn get(&self, id: &EntityId) -> StoreResult<Option<SubmitStatus>>;
    async fn find_by_name(&self, name: &str) -> StoreResult<Option<SubmitStatus>>;
    async fn list_by_ids(&self, ids: &[EntityId]) -> StoreResult<Vec<SubmitStatus>>;
    async fn list_all(&self) -> StoreResult<Vec<SubmitStatus>>;
}

#[async_trait]
pub trait InvoiceStore: Send + Sync {
    async fn insert(&self, invoice: Invoice) -> StoreResult<()>;
    async fn get(&self, id: &EntityId) -> StoreResult<Option<Invoice>>;
    async fn list_for_detailer(&self, detailer_id: &EntityId) -> StoreResult<Vec<Invoice>>;
    async fn delete(&self, id: &EntityId) -> StoreResult<bool>;
    /// Next sequence number for the detailer within the given year
    async fn next_number(&self, detailer_id: &EntityId, year: i32) -> StoreResult<i32>;
}

#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn save(&self, name: &str, bytes: Vec<u8>) -> StoreResult<()>;
}

/// Handle bundling every entity collection, passed into each service at
/// construction
#[derive(Clone)]
pub struct Store {
    pub users: Arc<dyn UserStore>,
    pub roles: Arc<dyn RoleStore>,
    pub services: Arc<dyn ServiceStore>,
    pub schedules: Arc<dyn ScheduleStore>,
    pub submissions: Arc<dyn SubmissionStore>,
    pub cars: Arc<dyn CarStore>,
    pub employees: Arc<dyn EmployeeStore>,
    pub statuses: Arc<dyn StatusStore>,
    pub invoices: Arc<dyn InvoiceStore>,
    pub media: Arc<dyn MediaStore>,
}
