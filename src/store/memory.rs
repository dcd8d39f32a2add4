//! In-memory entity store
//!
//! Backs the test suite and lightweight embeddings. Collections are
//! `RwLock`-guarded maps; the submission collection checks the
//! `(schedule_id, date)` uniqueness constraint inside its write lock, so a
//! race between two submits resolves into one success and one
//! [`StoreError::Duplicate`], exactly like a database constraint would.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{Datelike, NaiveDateTime, NaiveTime};

use super::{
    CarStore, EmployeeStore, InvoiceStore, MediaStore, RoleStore, ScheduleStore, ServiceStore,
    StatusStore, Store, StoreError, StoreResult, SubmissionStore, UserStore,
};
use crate::models::{
    car::Car,
    employee::Employee,
    invoice::Invoice,
    schedule::WeeklySchedule,
    service::DetailService,
    submission::{SubmitStatus, Submission, STATUS_DONE, STATUS_IN_PROGRESS, STATUS_PENDING},
    user::{AppUser, Role, RoleName},
    EntityId,
};

struct Table<T> {
    rows: Arc<RwLock<HashMap<EntityId, T>>>,
}

impl<T> Clone for Table<T> {
    fn clone(&self) -> Self {
        Self { rows: self.rows.clone() }
    }
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self { rows: Arc::new(RwLock::new(HashMap::new())) }
    }
}

impl<T: Clone> Table<T> {
    fn read(&self) -> RwLockReadGuard<'_, HashMap<EntityId, T>> {
        self.rows.read().expect("store lock poisoned")
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<EntityId, T>> {
        self.rows.write().expect("store lock poisoned")
    }

    fn get(&self, id: &EntityId) -> Option<T> {
        self.read().get(id).cloned()
    }

    fn by_ids(&self, ids: &[EntityId]) -> Vec<T> {
        let rows = self.read();
        ids.iter().filter_map(|id| rows.get(id).cloned()).collect()
    }

    fn replace(&self, id: &EntityId, row: T) -> bool {
        let mut rows = self.write();
        if !rows.contains_key(id) {
            return false;
        }
        rows.insert(id.clone(), row);
        true
    }
}

// ---------------------------------------------------------------------------
// Users / roles
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
pub struct MemoryUsers {
    table: Table<AppUser>,
}

#[async_trait]
impl UserStore for MemoryUsers {
    async fn insert(&self, user: AppUser) -> StoreResult<()> {
        self.table.write().insert(user.id.clone(), user);
        Ok(())
    }

    async fn get(&self, id: &EntityId) -> StoreResult<Option<AppUser>> {
        Ok(self.table.get(id))
    }

    async fn find_by_username(&self, username: &str) -> StoreResult<Option<AppUser>> {
        Ok(self
            .table
            .read()
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn list_by_ids(&self, ids: &[EntityId]) -> StoreResult<Vec<AppUser>> {
        let mut users = self.table.by_ids(ids);
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(users)
    }

    async fn update(&self, user: &AppUser) -> StoreResult<bool> {
        Ok(self.table.replace(&user.id, user.clone()))
    }
}

#[derive(Clone, Default)]
pub struct MemoryRoles {
    table: Table<Role>,
}

#[async_trait]
impl RoleStore for MemoryRoles {
    async fn insert(&self, role: Role) -> StoreResult<()> {
        self.table.write().insert(role.id.clone(), role);
        Ok(())
    }

    async fn get(&self, id: &EntityId) -> StoreResult<Option<Role>> {
        Ok(self.table.get(id))
    }

    async fn find_by_name(&self, name: &str) -> StoreResult<Option<Role>> {
        Ok(self.table.read().values().find(|r| r.name == name).cloned())
    }
}

// ---------------------------------------------------------------------------
// Services / schedules
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
pub struct MemoryServices {
    table: Table<DetailService>,
}

#[async_trait]
impl ServiceStore for MemoryServices {
    async fn insert(&self, service: DetailService) -> StoreResult<()> {
        self.table.write().insert(service.id.clone(), service);
        Ok(())
    }

    async fn get(&self, id: &EntityId) -> StoreResult<Option<DetailService>> {
        Ok(self.table.get(id))
    }

    async fn list_all(&self) -> StoreResult<Vec<DetailService>> {
        let mut services: Vec<_> = self.table.read().values().cloned().collect();
        services.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(services)
    }

    async fn list_for_detailer(&self, detailer_id: &EntityId) -> StoreResult<Vec<DetailService>> {
        let mut services: Vec<_> = self
            .table
            .read()
            .values()
            .filter(|s| &s.detailer_id == detailer_id)
            .cloned()
            .collect();
        services.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(services)
    }

    async fn increment_view_count(&self, id: &EntityId) -> StoreResult<bool> {
        let mut rows = self.table.write();
        match rows.get_mut(id) {
            Some(service) => {
                service.view_count += 1;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[derive(Clone, Default)]
pub struct MemorySchedules {
    table: Table<WeeklySchedule>,
}

#[async_trait]
impl ScheduleStore for MemorySchedules {
    async fn insert(&self, schedule: WeeklySchedule) -> StoreResult<()> {
        self.table.write().insert(schedule.id.clone(), schedule);
        Ok(())
    }

    async fn get(&self, id: &EntityId) -> StoreResult<Option<WeeklySchedule>> {
        Ok(self.table.get(id))
    }

    async fn list_for_service(&self, service_id: &EntityId) -> StoreResult<Vec<WeeklySchedule>> {
        let mut schedules: Vec<_> = self
            .table
            .read()
            .values()
            .filter(|s| &s.service_id == service_id)
            .cloned()
            .collect();
        schedules.sort_by_key(|s| (s.day_of_week, s.time));
        Ok(schedules)
    }

    async fn list_for_service_day(
        &self,
        service_id: &EntityId,
        day_of_week: u8,
    ) -> StoreResult<Vec<WeeklySchedule>> {
        let mut schedules: Vec<_> = self
            .table
            .read()
            .values()
            .filter(|s| &s.service_id == service_id && s.day_of_week == day_of_week)
            .cloned()
            .collect();
        schedules.sort_by_key(|s| s.time);
        Ok(schedules)
    }

    async fn find_for_service_time(
        &self,
        service_id: &EntityId,
        time: NaiveTime,
    ) -> StoreResult<Option<WeeklySchedule>> {
        Ok(self
            .table
            .read()
            .values()
            .find(|s| &s.service_id == service_id && s.time == time)
            .cloned())
    }
}

// ---------------------------------------------------------------------------
// Submissions
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
pub struct MemorySubmissions {
    table: Table<Submission>,
}

#[async_trait]
impl SubmissionStore for MemorySubmissions {
    async fn insert(&self, submission: Submission) -> StoreResult<()> {
        let mut rows = self.table.write();
        let taken = rows
            .values()
            .any(|s| s.schedule_id == submission.schedule_id && s.date == submission.date);
        if taken {
            return Err(StoreError::Duplicate(format!(
                "submission for schedule {} at {}",
                submission.schedule_id, submission.date
            )));
        }
        rows.insert(submission.id.clone(), submission);
        Ok(())
    }

    async fn get(&self, id: &EntityId) -> StoreResult<Option<Submission>> {
        Ok(self.table.get(id))
    }

    async fn find_for_schedule_at(
        &self,
        schedule_id: &EntityId,
        at: NaiveDateTime,
    ) -> StoreResult<Option<Submission>> {
        Ok(self
            .table
            .read()
            .values()
            .find(|s| &s.schedule_id == schedule_id && s.date == at)
            .cloned())
    }

    async fn list_for_schedule(&self, schedule_id: &EntityId) -> StoreResult<Vec<Submission>> {
        let mut submissions: Vec<_> = self
            .table
            .read()
            .values()
            .filter(|s| &s.schedule_id == schedule_id)
            .cloned()
            .collect();
        submissions.sort_by_key(|s| s.date);
        Ok(submissions)
    }

    async fn list_for_services(&self, service_ids: &[EntityId]) -> StoreResult<Vec<Submission>> {
        let mut submissions: Vec<_> = self
            .table
            .read()
            .values()
            .filter(|s| service_ids.contains(&s.service_id))
            .cloned()
            .collect();
        submissions.sort_by_key(|s| s.date);
        Ok(submissions)
    }

    async fn list_future_for_user(
        &self,
        user_id: &EntityId,
        after: NaiveDateTime,
    ) -> StoreResult<Vec<Submission>> {
        let mut submissions: Vec<_> = self
            .table
            .read()
            .values()
            .filter(|s| &s.user_id == user_id && s.date > after)
            .cloned()
            .collect();
        submissions.sort_by_key(|s| s.date);
        Ok(submissions)
    }

    async fn has_future_for_car(
        &self,
        car_id: &EntityId,
        after: NaiveDateTime,
    ) -> StoreResult<bool> {
        Ok(self
            .table
            .read()
            .values()
            .any(|s| &s.car_id == car_id && s.date > after))
    }

    async fn update(&self, submission: &Submission) -> StoreResult<bool> {
        Ok(self.table.replace(&submission.id, submission.clone()))
    }

    async fn delete(&self, id: &EntityId) -> StoreResult<bool> {
        Ok(self.table.write().remove(id).is_some())
    }
}

// ---------------------------------------------------------------------------
// Cars / employees / statuses
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
pub struct MemoryCars {
    table: Table<Car>,
}

#[async_trait]
impl CarStore for MemoryCars {
    async fn insert(&self, car: Car) -> StoreResult<()> {
        self.table.write().insert(car.id.clone(), car);
        Ok(())
    }

    async fn get(&self, id: &EntityId) -> StoreResult<Option<Car>> {
        Ok(self.table.get(id))
    }

    async fn list_active_for_user(&self, user_id: &EntityId) -> StoreResult<Vec<Car>> {
        let mut cars: Vec<_> = self
            .table
            .read()
            .values()
            .filter(|c| &c.user_id == user_id && !c.is_removed)
            .cloned()
            .collect();
        cars.sort_by(|a, b| a.display_name().cmp(&b.display_name()));
        Ok(cars)
    }

    async fn list_by_ids(&self, ids: &[EntityId]) -> StoreResult<Vec<Car>> {
        Ok(self.table.by_ids(ids))
    }

    async fn update(&self, car: &Car) -> StoreResult<bool> {
        Ok(self.table.replace(&car.id, car.clone()))
    }
}

#[derive(Clone, Default)]
pub struct MemoryEmployees {
    table: Table<Employee>,
}

#[async_trait]
impl EmployeeStore for MemoryEmployees {
    async fn insert(&self, employee: Employee) -> StoreResult<()> {
        self.table.write().insert(employee.id.clone(), employee);
        Ok(())
    }

    async fn get(&self, id: &EntityId) -> StoreResult<Option<Employee>> {
        Ok(self.table.get(id))
    }

    async fn list_active_for_detailer(&self, detailer_id: &EntityId) -> StoreResult<Vec<Employee>> {
        let mut employees: Vec<_> = self
            .table
            .read()
            .values()
            .filter(|e| &e.detailer_id == detailer_id && !e.is_removed)
            .cloned()
            .collect();
        employees.sort_by(|a, b| a.full_name().cmp(&b.full_name()));
        Ok(employees)
    }

    async fn list_by_ids(&self, ids: &[EntityId]) -> StoreResult<Vec<Employee>> {
        Ok(self.table.by_ids(ids))
    }

    async fn update(&self, employee: &Employee) -> StoreResult<bool> {
        Ok(self.table.replace(&employee.id, employee.clone()))
    }
}

#[derive(Clone, Default)]
pub struct MemoryStatuses {
    table: Table<SubmitStatus>,
}

#[async_trait]
impl StatusStore for MemoryStatuses {
    async fn insert(&self, status: SubmitStatus) -> StoreResult<()> {
        self.table.write().insert(status.id.clone(), status);
        Ok(())
    }

    async fn get(&self, id: &EntityId) -> StoreResult<Option<SubmitStatus>> {
        Ok(self.table.get(id))
    }

    async fn find_by_name(&self, name: &str) -> StoreResult<Option<SubmitStatus>> {
        Ok(self.table.read().values().find(|s| s.name == name).cloned())
    }

    async fn list_by_ids(&self, ids: &[EntityId]) -> StoreResult<Vec<SubmitStatus>> {
        Ok(self.table.by_ids(ids))
    }

    async fn list_all(&self) -> StoreResult<Vec<SubmitStatus>> {
        let mut statuses: Vec<_> = self.table.read().values().cloned().collect();
        statuses.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(statuses)
    }
}

// ---------------------------------------------------------------------------
// Invoices / media
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
pub struct MemoryInvoices {
    table: Table<Invoice>,
}

#[async_trait]
impl InvoiceStore for MemoryInvoices {
    async fn insert(&self, invoice: Invoice) -> StoreResult<()> {
        self.table.write().insert(invoice.id.clone(), invoice);
        Ok(())
    }

    async fn get(&self, id: &EntityId) -> StoreResult<Option<Invoice>> {
        Ok(self.table.get(id))
    }

    async fn list_for_detailer(&self, detailer_id: &EntityId) -> StoreResult<Vec<Invoice>> {
        let mut invoices: Vec<_> = self
            .table
            .read()
            .values()
            .filter(|i| &i.detailer_id == detailer_id)
            .cloned()
            .collect();
        invoices.sort_by(|a, b| b.date_created.cmp(&a.date_created));
        Ok(invoices)
    }

    async fn delete(&self, id: &EntityId) -> StoreResult<bool> {
        Ok(self.table.write().remove(id).is_some())
    }

    async fn next_number(&self, detailer_id: &EntityId, year: i32) -> StoreResult<i32> {
        let max = self
            .table
            .read()
            .values()
            .filter(|i| &i.detailer_id == detailer_id && i.date_created.year() == year)
            .map(|i| i.number)
            .max()
            .unwrap_or(0);
        Ok(max + 1)
    }
}

#[derive(Clone, Default)]
pub struct MemoryMedia {
    blobs: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

#[async_trait]
impl MediaStore for MemoryMedia {
    async fn save(&self, name: &str, bytes: Vec<u8>) -> StoreResult<()> {
        self.blobs
            .write()
            .expect("store lock poisoned")
            .insert(name.to_string(), bytes);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

pub struct MemoryStore;

impl MemoryStore {
    /// Build an empty in-memory store
    pub fn build() -> Store {
        Store {
            users: Arc::new(MemoryUsers::default()),
            roles: Arc::new(MemoryRoles::default()),
            services: Arc::new(MemoryServices::default()),
            schedules: Arc::new(MemorySchedules::default()),
            submissions: Arc::new(MemorySubmissions::default()),
            cars: Arc::new(MemoryCars::default()),
            employees: Arc::new(MemoryEmployees::default()),
            statuses: Arc::new(MemoryStatuses::default()),
            invoices: Arc::new(MemoryInvoices::default()),
            media: Arc::new(MemoryMedia::default()),
        }
    }

    /// Build a store pre-seeded with the reference tables
    pub async fn build_seeded() -> StoreResult<Store> {
        let store = Self::build();
        seed_reference_data(&store).await?;
        Ok(store)
    }
}

/// Insert the role and status reference rows the platform expects
pub async fn seed_reference_data(store: &Store) -> StoreResult<()> {
    for role in [RoleName::Detailer, RoleName::Client] {
        if store.roles.find_by_name(role.as_str()).await?.is_none() {
            store
                .roles
                .insert(Role {
                    id: EntityId::new(),
                    name: role.as_str().to_string(),
                    display_name: capitalize(role.as_str()),
                })
                .await?;
        }
    }

    for name in [STATUS_PENDING, STATUS_IN_PROGRESS, STATUS_DONE] {
        if store.statuses.find_by_name(name).await?.is_none() {
            store
                .statuses
                .insert(SubmitStatus {
                    id: EntityId::new(),
                    name: name.to_string(),
                })
                .await?;
        }
    }

    Ok(())
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
