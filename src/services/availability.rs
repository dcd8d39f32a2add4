//! Availability engine
//!
//! Computes open slots for a service across an inclusive date range by
//! crossing the weekly schedule entries against existing submissions.

use chrono::{Days, Duration, Utc};

use crate::{
    config::BookingConfig,
    dates,
    error::{AppError, AppResult},
    models::{schedule::AvailableSlot, EntityId},
    store::Store,
};

#[derive(Clone)]
pub struct AvailabilityService {
    store: Store,
    config: BookingConfig,
}

impl AvailabilityService {
    pub fn new(store: Store, config: BookingConfig) -> Self {
        Self { store, config }
    }

    /// List bookable time windows for a service between `date_from` and
    /// `date_to`, inclusive.
    ///
    /// Rejects malformed dates and ranges over the configured bound before
    /// any store lookup. A window is emitted when the day's weekday
    /// matches a schedule entry, no submission exists for that schedule on
    /// that calendar date, and the slot start is not in the past.
    pub async fn available_slots(
        &self,
        service_id: &EntityId,
        date_from: &str,
        date_to: &str,
    ) -> AppResult<Vec<AvailableSlot>> {
        let from = dates::parse_iso_datetime(date_from)?;
        let to = dates::parse_iso_datetime(date_to)?;
        if (to - from).num_days().abs() > self.config.max_range_days {
            return Err(AppError::Validation("Date range is too large".to_string()));
        }

        let service = self
            .store
            .services
            .get(service_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Service {} not found", service_id)))?;

        let now = Utc::now().naive_utc();
        let last = to.date();
        let mut day = from.date();
        let mut slots = Vec::new();

        while day <= last {
            let schedules = self
                .store
                .schedules
                .list_for_service_day(service_id, dates::weekday_number(day))
                .await?;

            for schedule in schedules {
                let submissions = self.store.submissions.list_for_schedule(&schedule.id).await?;
                if submissions.iter().any(|s| s.date.date() == day) {
                    continue;
                }

                let start = day.and_time(schedule.time);
                if start < now {
                    continue;
                }

                let end = start + Duration::minutes(service.duration);
                slots.push(AvailableSlot {
                    text: format!("{} {}", start.format("%H:%M"), service.name),
                    start: start.format("%Y-%m-%dT%H:%M:%S").to_string(),
                    end: end.format("%Y-%m-%dT%H:%M:%S").to_string(),
                    back_color: service.label_color.clone(),
                });
            }

            day = day + Days::new(1);
        }

        Ok(slots)
    }
}
