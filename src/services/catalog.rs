//! Service offering catalog
//!
//! Detailers create and list their offerings; clients browse them. A
//! detail view bumps the service's view counter, which feeds the
//! analytics report.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::NaiveTime;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        schedule::WeeklySchedule,
        service::{CreateService, DetailService, DEFAULT_LABEL_COLOR},
        user::{AppUser, RoleName},
        EntityId,
    },
    services::permissions::RoleGate,
    store::Store,
};

#[derive(Clone)]
pub struct CatalogService {
    store: Store,
    gate: RoleGate,
}

impl CatalogService {
    pub fn new(store: Store, gate: RoleGate) -> Self {
        Self { store, gate }
    }

    /// Create a service offering, detailer-only. An optional base64 data
    /// URL is decoded and stored under a generated name; optional
    /// `service_days` become weekly schedule entries.
    pub async fn add_service(
        &self,
        actor: &AppUser,
        data: CreateService,
    ) -> AppResult<DetailService> {
        self.gate.require(actor, RoleName::Detailer).await?;
        data.validate()?;

        // resolve every schedule entry before the first write
        let mut days = Vec::with_capacity(data.service_days.len());
        for day in &data.service_days {
            if !(1..=7).contains(&day.day) {
                return Err(AppError::Validation(format!(
                    "Invalid day of week: {}",
                    day.day
                )));
            }
            days.push((day.day, parse_time(&day.time)?));
        }

        let image = match &data.image_file {
            Some(data_url) => {
                let (bytes, ext) = decode_image_data_url(data_url)?;
                let name = format!("{}.{}", Uuid::new_v4().simple(), ext);
                self.store.media.save(&name, bytes).await?;
                Some(name)
            }
            None => None,
        };

        let service = DetailService {
            id: EntityId::new(),
            name: data.name,
            price: data.price,
            description: data.description,
            image,
            detailer_id: actor.id.clone(),
            duration: data.duration,
            label_color: data
                .label_color
                .unwrap_or_else(|| DEFAULT_LABEL_COLOR.to_string()),
            view_count: 0,
        };
        self.store.services.insert(service.clone()).await?;

        for (day_of_week, time) in days {
            self.store
                .schedules
                .insert(WeeklySchedule {
                    id: EntityId::new(),
                    service_id: service.id.clone(),
                    day_of_week,
                    time,
                })
                .await?;
        }

        Ok(service)
    }

    /// Public catalog listing
    pub async fn list_services(&self) -> AppResult<Vec<DetailService>> {
        Ok(self.store.services.list_all().await?)
    }

    /// A detailer's own offerings
    pub async fn detailer_services(&self, detailer_id: &EntityId) -> AppResult<Vec<DetailService>> {
        Ok(self.store.services.list_for_detailer(detailer_id).await?)
    }

    /// Detail view; counts the view
    pub async fn service_details(&self, service_id: &EntityId) -> AppResult<DetailService> {
        if !self.store.services.increment_view_count(service_id).await? {
            return Err(AppError::NotFound(format!("Service {} not found", service_id)));
        }
        self.store
            .services
            .get(service_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Service {} not found", service_id)))
    }

    /// Weekly schedule entries of a service
    pub async fn service_schedules(&self, service_id: &EntityId) -> AppResult<Vec<WeeklySchedule>> {
        self.store
            .services
            .get(service_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Service {} not found", service_id)))?;
        Ok(self.store.schedules.list_for_service(service_id).await?)
    }
}

/// Decode a "data:image/<ext>;base64,<payload>" URL into bytes + extension
fn decode_image_data_url(data_url: &str) -> AppResult<(Vec<u8>, String)> {
    let invalid = || AppError::Validation("Invalid image data".to_string());

    let (format, payload) = data_url.split_once(";base64,").ok_or_else(invalid)?;
    let ext = format.rsplit('/').next().filter(|e| !e.is_empty()).ok_or_else(invalid)?;
    let bytes = STANDARD.decode(payload).map_err(|_| invalid())?;
    Ok((bytes, ext.to_string()))
}

fn parse_time(value: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .map_err(|_| AppError::Validation("Invalid time format, use HH:MM".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::service::ServiceDay,
        store::memory::MemoryStore,
    };

    async fn fixture() -> (Store, CatalogService, AppUser, AppUser) {
        let store = MemoryStore::build_seeded().await.unwrap();
        let gate = RoleGate::new(store.clone());
        let catalog = CatalogService::new(store.clone(), gate);

        let detailer_role = store.roles.find_by_name("detailer").await.unwrap().unwrap();
        let client_role = store.roles.find_by_name("client").await.unwrap().unwrap();
        let detailer = test_user("detailer1", detailer_role.id);
        let client = test_user("client1", client_role.id);
        store.users.insert(detailer.clone()).await.unwrap();
        store.users.insert(client.clone()).await.unwrap();

        (store, catalog, detailer, client)
    }

    fn test_user(username: &str, role_id: EntityId) -> AppUser {
        AppUser {
            id: EntityId::new(),
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password_hash: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            phone: None,
            street: None,
            city: None,
            zip_code: None,
            nip: None,
            company_name: None,
            role_id,
        }
    }

    fn create_data() -> CreateService {
        CreateService {
            name: "Paint Correction".to_string(),
            price: 1200.0,
            description: "Multi-stage paint correction".to_string(),
            duration: 240,
            image_file: None,
            label_color: None,
            service_days: vec![
                ServiceDay { day: 1, time: "09:00".to_string() },
                ServiceDay { day: 5, time: "14:30:00".to_string() },
            ],
        }
    }

    #[tokio::test]
    async fn test_add_service_creates_schedules() {
        let (store, catalog, detailer, _client) = fixture().await;
        let service = catalog.add_service(&detailer, create_data()).await.unwrap();

        assert_eq!(service.label_color, DEFAULT_LABEL_COLOR);
        assert_eq!(service.view_count, 0);

        let schedules = store.schedules.list_for_service(&service.id).await.unwrap();
        assert_eq!(schedules.len(), 2);
        assert_eq!(schedules[0].day_of_week, 1);
        assert_eq!(schedules[1].time, NaiveTime::from_hms_opt(14, 30, 0).unwrap());
    }

    #[tokio::test]
    async fn test_add_service_denied_for_client() {
        let (_store, catalog, _detailer, client) = fixture().await;
        let err = catalog.add_service(&client, create_data()).await.unwrap_err();
        assert!(matches!(err, AppError::Authorization(_)));
    }

    #[tokio::test]
    async fn test_add_service_with_image() {
        let (_store, catalog, detailer, _client) = fixture().await;
        let mut data = create_data();
        data.image_file = Some(format!("data:image/png;base64,{}", STANDARD.encode([137u8, 80, 78, 71])));

        let service = catalog.add_service(&detailer, data).await.unwrap();
        let image = service.image.unwrap();
        assert!(image.ends_with(".png"));
    }

    #[tokio::test]
    async fn test_add_service_rejects_bad_image_and_day() {
        let (_store, catalog, detailer, _client) = fixture().await;

        let mut bad_image = create_data();
        bad_image.image_file = Some("not a data url".to_string());
        let err = catalog.add_service(&detailer, bad_image).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let mut bad_day = create_data();
        bad_day.service_days = vec![ServiceDay { day: 8, time: "09:00".to_string() }];
        let err = catalog.add_service(&detailer, bad_day).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_service_details_counts_views() {
        let (_store, catalog, detailer, _client) = fixture().await;
        let service = catalog.add_service(&detailer, create_data()).await.unwrap();

        catalog.service_details(&service.id).await.unwrap();
        let viewed = catalog.service_details(&service.id).await.unwrap();
        assert_eq!(viewed.view_count, 2);

        let err = catalog.service_details(&EntityId::new()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
