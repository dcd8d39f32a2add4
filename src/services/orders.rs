//! Order and stats aggregation for the detailer role
//!
//! Joins a detailer's services with the submissions against them and
//! batch-resolves the referenced clients, cars, statuses and employees by
//! collected id sets, bounding the number of store round trips.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::{
    dates,
    error::{AppError, AppResult},
    models::{
        order::{
            AnalyticsReport, ClientOrderCount, ClientSubmission, DailyOrderCount, DetailerStats,
            EmployeeOrderCount, OrderList, OrderRecord, ServiceViewCount,
        },
        service::DetailService,
        submission::{Submission, STATUS_DONE, STATUS_IN_PROGRESS, STATUS_PENDING},
        user::{AppUser, ClientContact},
        EntityId,
    },
    store::Store,
};

const DUE_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Clone)]
pub struct OrdersService {
    store: Store,
}

impl OrdersService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// All orders against the detailer's services, fully joined. Rows with
    /// unresolved references are dropped; the drop is returned as
    /// `skipped` and logged.
    pub async fn all_orders(&self, detailer_id: &EntityId) -> AppResult<OrderList> {
        let (services, submits) = self.detailer_submissions(detailer_id).await?;
        let service_map = by_id(services, |s| s.id.clone());

        let user_ids = collect_ids(&submits, |s| Some(s.user_id.clone()));
        let car_ids = collect_ids(&submits, |s| Some(s.car_id.clone()));
        let status_ids = collect_ids(&submits, |s| Some(s.status_id.clone()));

        let users = by_id(self.store.users.list_by_ids(&user_ids).await?, |u| u.id.clone());
        let cars = by_id(self.store.cars.list_by_ids(&car_ids).await?, |c| c.id.clone());
        let statuses = by_id(self.store.statuses.list_by_ids(&status_ids).await?, |s| {
            s.id.clone()
        });

        let mut orders = Vec::with_capacity(submits.len());
        let mut skipped = 0usize;
        for submit in submits {
            let client = users.get(&submit.user_id);
            let car = cars.get(&submit.car_id);
            let service = service_map.get(&submit.service_id);
            let status = statuses.get(&submit.status_id);

            match (client, car, service, status) {
                (Some(client), Some(car), Some(service), Some(status)) => {
                    orders.push(OrderRecord {
                        id: submit.id,
                        client_id: submit.user_id,
                        client_phone: client.phone.clone(),
                        client_full_name: client.full_name(),
                        car: car.display_name(),
                        service_name: service.name.clone(),
                        service_id: service.id.clone(),
                        service_price: service.price,
                        due_date: submit.date.format(DUE_DATE_FORMAT).to_string(),
                        status_id: status.id.clone(),
                        employee_id: submit.employee_id,
                    });
                }
                _ => skipped += 1,
            }
        }

        if skipped > 0 {
            tracing::warn!(skipped, %detailer_id, "orders listing dropped records with unresolved references");
        }
        Ok(OrderList { orders, skipped })
    }

    /// Dashboard counts per named status
    pub async fn detailer_stats(&self, detailer_id: &EntityId) -> AppResult<DetailerStats> {
        let (_, submits) = self.detailer_submissions(detailer_id).await?;

        let pending = self.status_id_by_name(STATUS_PENDING).await?;
        let in_progress = self.status_id_by_name(STATUS_IN_PROGRESS).await?;
        let done = self.status_id_by_name(STATUS_DONE).await?;

        let count = |id: &EntityId| submits.iter().filter(|s| &s.status_id == id).count();
        Ok(DetailerStats {
            pending_count: count(&pending),
            in_progress_count: count(&in_progress),
            done_count: count(&done),
        })
    }

    /// Time-bucketed order counts and per-service view counts over a date
    /// range
    pub async fn analytics(
        &self,
        detailer_id: &EntityId,
        date_from: &str,
        date_to: &str,
    ) -> AppResult<AnalyticsReport> {
        let from = dates::parse_iso_datetime(date_from)?;
        let to = dates::parse_iso_datetime(date_to)?;

        let (services, submits) = self.detailer_submissions(detailer_id).await?;
        let submits: Vec<Submission> = submits
            .into_iter()
            .filter(|s| s.date >= from && s.date <= to)
            .collect();

        let mut order_days: BTreeMap<String, i64> = BTreeMap::new();
        let mut employee_counts: HashMap<EntityId, i64> = HashMap::new();
        let mut client_counts: HashMap<EntityId, i64> = HashMap::new();
        for submit in &submits {
            *order_days
                .entry(submit.date.date().format("%Y-%m-%d").to_string())
                .or_insert(0) += 1;
            if let Some(employee_id) = &submit.employee_id {
                *employee_counts.entry(employee_id.clone()).or_insert(0) += 1;
            }
            *client_counts.entry(submit.user_id.clone()).or_insert(0) += 1;
        }

        let employee_ids: Vec<EntityId> = employee_counts.keys().cloned().collect();
        let employees = by_id(self.store.employees.list_by_ids(&employee_ids).await?, |e| {
            e.id.clone()
        });
        let client_ids: Vec<EntityId> = client_counts.keys().cloned().collect();
        let clients = by_id(self.store.users.list_by_ids(&client_ids).await?, |u| u.id.clone());

        let mut employee_rows: Vec<EmployeeOrderCount> = employee_counts
            .into_iter()
            .filter_map(|(id, count)| match employees.get(&id) {
                Some(employee) => Some(EmployeeOrderCount {
                    employee: employee.full_name(),
                    employee_id: id,
                    count,
                }),
                None => {
                    tracing::warn!(employee = %id, "analytics skipped missing employee");
                    None
                }
            })
            .collect();
        employee_rows.sort_by(|a, b| b.count.cmp(&a.count).then(a.employee_id.cmp(&b.employee_id)));

        let mut client_rows: Vec<ClientOrderCount> = client_counts
            .into_iter()
            .filter_map(|(id, count)| match clients.get(&id) {
                Some(client) => Some(ClientOrderCount {
                    client: client_display_name(client),
                    client_id: id,
                    count,
                }),
                None => {
                    tracing::warn!(client = %id, "analytics skipped missing client");
                    None
                }
            })
            .collect();
        client_rows.sort_by(|a, b| b.count.cmp(&a.count).then(a.client_id.cmp(&b.client_id)));

        let orders = order_days
            .into_iter()
            .map(|(date, count)| DailyOrderCount { date, count })
            .collect();

        let service_rows = services
            .iter()
            .filter(|s| s.view_count > 0)
            .map(|s| ServiceViewCount {
                service_id: s.id.clone(),
                service: s.name.clone(),
                view_count: s.view_count,
            })
            .collect();

        Ok(AnalyticsReport {
            orders,
            employees: employee_rows,
            clients: client_rows,
            services: service_rows,
        })
    }

    /// Distinct clients who booked any of the detailer's services
    pub async fn detailer_clients(&self, detailer_id: &EntityId) -> AppResult<Vec<ClientContact>> {
        let (_, submits) = self.detailer_submissions(detailer_id).await?;
        let client_ids = collect_ids(&submits, |s| Some(s.user_id.clone()));
        let clients = self.store.users.list_by_ids(&client_ids).await?;

        Ok(clients
            .into_iter()
            .map(|c| ClientContact {
                id: c.id,
                email: c.email,
                first_name: c.first_name,
                last_name: c.last_name,
                phone: c.phone,
            })
            .collect())
    }

    /// One client's submissions against the detailer's services. Car,
    /// status and employee are rendered absent when unresolved; a missing
    /// service drops the row.
    pub async fn client_submits(
        &self,
        detailer_id: &EntityId,
        client_id: &EntityId,
    ) -> AppResult<Vec<ClientSubmission>> {
        let (services, submits) = self.detailer_submissions(detailer_id).await?;
        let service_map = by_id(services, |s| s.id.clone());
        let submits: Vec<Submission> = submits
            .into_iter()
            .filter(|s| &s.user_id == client_id)
            .collect();

        let car_ids = collect_ids(&submits, |s| Some(s.car_id.clone()));
        let status_ids = collect_ids(&submits, |s| Some(s.status_id.clone()));
        let employee_ids = collect_ids(&submits, |s| s.employee_id.clone());

        let cars = by_id(self.store.cars.list_by_ids(&car_ids).await?, |c| c.id.clone());
        let statuses = by_id(self.store.statuses.list_by_ids(&status_ids).await?, |s| {
            s.id.clone()
        });
        let employees = by_id(self.store.employees.list_by_ids(&employee_ids).await?, |e| {
            e.id.clone()
        });

        let mut result = Vec::with_capacity(submits.len());
        for submit in submits {
            let Some(service) = service_map.get(&submit.service_id) else {
                tracing::warn!(submit = %submit.id, "client listing skipped submission with missing service");
                continue;
            };
            result.push(ClientSubmission {
                car: cars.get(&submit.car_id).map(|c| c.display_name()),
                status: statuses.get(&submit.status_id).map(|s| s.name.clone()),
                employee: submit
                    .employee_id
                    .as_ref()
                    .and_then(|id| employees.get(id))
                    .map(|e| e.full_name()),
                id: submit.id,
                client_id: submit.user_id,
                service_name: service.name.clone(),
                service_id: service.id.clone(),
                service_price: service.price,
                due_date: submit.date.format(DUE_DATE_FORMAT).to_string(),
            });
        }
        Ok(result)
    }

    /// A detailer's services and every submission made against them
    async fn detailer_submissions(
        &self,
        detailer_id: &EntityId,
    ) -> AppResult<(Vec<DetailService>, Vec<Submission>)> {
        let services = self.store.services.list_for_detailer(detailer_id).await?;
        let ids: Vec<EntityId> = services.iter().map(|s| s.id.clone()).collect();
        let submits = self.store.submissions.list_for_services(&ids).await?;
        Ok((services, submits))
    }

    async fn status_id_by_name(&self, name: &str) -> AppResult<EntityId> {
        self.store
            .statuses
            .find_by_name(name)
            .await?
            .map(|s| s.id)
            .ok_or_else(|| AppError::Integrity(format!("Status '{}' not exists", name)))
    }
}

fn by_id<T>(rows: Vec<T>, key: impl Fn(&T) -> EntityId) -> HashMap<EntityId, T> {
    rows.into_iter().map(|row| (key(&row), row)).collect()
}

fn collect_ids(
    submits: &[Submission],
    key: impl Fn(&Submission) -> Option<EntityId>,
) -> Vec<EntityId> {
    let set: HashSet<EntityId> = submits.iter().filter_map(key).collect();
    set.into_iter().collect()
}

fn client_display_name(user: &AppUser) -> String {
    if user.first_name.is_empty() {
        format!("Client {}", user.id)
    } else {
        user.full_name()
    }
}
