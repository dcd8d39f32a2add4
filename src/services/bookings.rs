//! Booking manager
//!
//! Creates, reschedules and cancels booking submissions against the
//! weekly schedule, enforcing conflict and ownership rules. Every check
//! precedes the mutating call; the first violation aborts the operation.

use chrono::Utc;

use crate::{
    dates,
    error::{AppError, AppResult},
    models::{
        schedule::WeeklySchedule,
        service::DetailService,
        submission::{SubmitStatus, Submission, UserSubmission, STATUS_PENDING},
        EntityId,
    },
    store::{Store, StoreError},
};

#[derive(Clone)]
pub struct BookingService {
    store: Store,
}

impl BookingService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Book a slot: the service must offer a weekly schedule entry whose
    /// time-of-day equals the requested date-time's time exactly, and the
    /// (schedule, date) pair must be free.
    ///
    /// The pre-check and the insert are not atomic; a duplicate-key store
    /// error from a racing submit reports as the same "not available"
    /// outcome as the pre-check.
    pub async fn submit(
        &self,
        service_id: &EntityId,
        date: &str,
        user_id: &EntityId,
        car_id: &EntityId,
    ) -> AppResult<Submission> {
        let pending = self
            .store
            .statuses
            .find_by_name(STATUS_PENDING)
            .await?
            .ok_or_else(|| AppError::Integrity("Pending status not exists".to_string()))?;

        let service = self
            .store
            .services
            .get(service_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Service {} not found", service_id)))?;

        let confirmed_date = dates::parse_iso_datetime(date)?;
        if confirmed_date < Utc::now().naive_utc() {
            return Err(AppError::Validation(
                "Date in the past is not allowed".to_string(),
            ));
        }

        let schedule = self
            .store
            .schedules
            .find_for_service_time(&service.id, confirmed_date.time())
            .await?
            .ok_or_else(|| AppError::Validation("Service time not found".to_string()))?;

        if self
            .store
            .submissions
            .find_for_schedule_at(&schedule.id, confirmed_date)
            .await?
            .is_some()
        {
            return Err(AppError::Validation(
                "Selected schedule is not available".to_string(),
            ));
        }

        let car = self
            .store
            .cars
            .get(car_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Car not found".to_string()))?;

        let submission = Submission {
            id: EntityId::new(),
            date: confirmed_date,
            schedule_id: schedule.id,
            service_id: service.id,
            user_id: user_id.clone(),
            car_id: car.id,
            status_id: pending.id,
            employee_id: None,
        };

        match self.store.submissions.insert(submission.clone()).await {
            Ok(()) => Ok(submission),
            Err(StoreError::Duplicate(_)) => Err(AppError::Validation(
                "Selected schedule is not available".to_string(),
            )),
            Err(e) => Err(e.into()),
        }
    }

    /// A client's upcoming bookings, joined for display. Submissions with
    /// dangling references are skipped with a warning.
    pub async fn user_submits(&self, user_id: &EntityId) -> AppResult<Vec<UserSubmission>> {
        let submits = self
            .store
            .submissions
            .list_future_for_user(user_id, Utc::now().naive_utc())
            .await?;

        let mut result = Vec::with_capacity(submits.len());
        for submit in submits {
            let Some(schedule) = self.store.schedules.get(&submit.schedule_id).await? else {
                tracing::warn!(submit = %submit.id, "submission references missing schedule");
                continue;
            };
            let Some(service) = self.store.services.get(&schedule.service_id).await? else {
                tracing::warn!(submit = %submit.id, "submission references missing service");
                continue;
            };
            let Some(car) = self.store.cars.get(&submit.car_id).await? else {
                tracing::warn!(submit = %submit.id, "submission references missing car");
                continue;
            };

            result.push(UserSubmission {
                service_id: service.id,
                service_name: service.name,
                service_price: service.price,
                service_image: service.image,
                date: submit.date,
                submit_id: submit.id,
                car_id: submit.car_id,
                car_name: car.display_name(),
            });
        }
        Ok(result)
    }

    /// Cancel a booking. Only the owning client may cancel; the record is
    /// deleted permanently.
    pub async fn cancel(&self, user_id: &EntityId, submit_id: &EntityId) -> AppResult<()> {
        let submit = self.get_submit(submit_id).await?;
        Self::check_owner(user_id, &submit)?;
        self.store.submissions.delete(&submit.id).await?;
        Ok(())
    }

    /// Move a booking to a new date and car. The conflict probe ignores
    /// the submission being rescheduled.
    pub async fn reschedule(
        &self,
        user_id: &EntityId,
        submit_id: &EntityId,
        new_date: &str,
        car_id: &EntityId,
    ) -> AppResult<Submission> {
        let confirmed_date = dates::parse_iso_datetime(new_date)?;

        let mut submit = self.get_submit(submit_id).await?;
        Self::check_owner(user_id, &submit)?;

        let existing = self
            .store
            .submissions
            .find_for_schedule_at(&submit.schedule_id, confirmed_date)
            .await?;
        if existing.is_some_and(|other| other.id != submit.id) {
            return Err(AppError::Validation("Schedule is not available".to_string()));
        }

        let car = self
            .store
            .cars
            .get(car_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Car not found".to_string()))?;

        submit.date = confirmed_date;
        submit.car_id = car.id;
        self.store.submissions.update(&submit).await?;
        Ok(submit)
    }

    /// Assign an employee to a booking. Detailer-only: the actor must own
    /// the service the booking was made against.
    pub async fn assign_employee(
        &self,
        user_id: &EntityId,
        submit_id: &EntityId,
        employee_id: &EntityId,
    ) -> AppResult<()> {
        let (mut submit, _, service) = self.resolve_chain(submit_id).await?;
        Self::check_detailer(user_id, &service)?;

        self.store
            .employees
            .get(employee_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))?;

        submit.employee_id = Some(employee_id.clone());
        self.store.submissions.update(&submit).await?;
        Ok(())
    }

    /// Set a booking's status. Detailer-only, same ownership rule as
    /// employee assignment.
    pub async fn set_status(
        &self,
        user_id: &EntityId,
        submit_id: &EntityId,
        status_id: &EntityId,
    ) -> AppResult<()> {
        let (mut submit, _, service) = self.resolve_chain(submit_id).await?;
        Self::check_detailer(user_id, &service)?;

        let status = self
            .store
            .statuses
            .get(status_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Status not found".to_string()))?;

        submit.status_id = status.id;
        self.store.submissions.update(&submit).await?;
        Ok(())
    }

    /// Status reference rows, for the detailer's order management views
    pub async fn statuses(&self) -> AppResult<Vec<SubmitStatus>> {
        Ok(self.store.statuses.list_all().await?)
    }

    async fn get_submit(&self, submit_id: &EntityId) -> AppResult<Submission> {
        self.store
            .submissions
            .get(submit_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Service submit not found".to_string()))
    }

    /// Resolve submission -> schedule -> service for ownership checks
    async fn resolve_chain(
        &self,
        submit_id: &EntityId,
    ) -> AppResult<(Submission, WeeklySchedule, DetailService)> {
        let submit = self.get_submit(submit_id).await?;
        let schedule = self
            .store
            .schedules
            .get(&submit.schedule_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Schedule not found".to_string()))?;
        let service = self
            .store
            .services
            .get(&schedule.service_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Service not found".to_string()))?;
        Ok((submit, schedule, service))
    }

    fn check_owner(user_id: &EntityId, submit: &Submission) -> AppResult<()> {
        if &submit.user_id != user_id {
            return Err(AppError::Authorization(
                "User is not authorized for this action".to_string(),
            ));
        }
        Ok(())
    }

    fn check_detailer(user_id: &EntityId, service: &DetailService) -> AppResult<()> {
        if &service.detailer_id != user_id {
            return Err(AppError::Authorization(
                "User has not permission to do this action".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Days, NaiveDate, NaiveTime, Weekday};

    use crate::{
        dates::weekday_number,
        models::{
            car::Car,
            employee::Employee,
            service::{DetailService, DEFAULT_LABEL_COLOR},
            schedule::WeeklySchedule,
            submission::STATUS_DONE,
        },
        store::memory::MemoryStore,
    };

    struct Fixture {
        store: Store,
        bookings: BookingService,
        detailer_id: EntityId,
        client_id: EntityId,
        service_id: EntityId,
        car_id: EntityId,
        /// A future date-time matching the service's 09:00 weekly slot
        slot_date: String,
    }

    async fn fixture() -> Fixture {
        let store = MemoryStore::build_seeded().await.unwrap();
        let detailer_id = EntityId::new();
        let client_id = EntityId::new();

        let service = DetailService {
            id: EntityId::new(),
            name: "Ceramic Coating".to_string(),
            price: 899.0,
            description: "Two-layer ceramic coating".to_string(),
            image: None,
            detailer_id: detailer_id.clone(),
            duration: 120,
            label_color: DEFAULT_LABEL_COLOR.to_string(),
            view_count: 0,
        };
        let service_id = service.id.clone();
        store.services.insert(service).await.unwrap();

        // one slot per weekday at 09:00 so any future date matches
        for day in 1..=7 {
            store
                .schedules
                .insert(WeeklySchedule {
                    id: EntityId::new(),
                    service_id: service_id.clone(),
                    day_of_week: day,
                    time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                })
                .await
                .unwrap();
        }

        let car = Car {
            id: EntityId::new(),
            manufacturer: "Skoda".to_string(),
            model: "Octavia".to_string(),
            year_of_production: 2021,
            user_id: client_id.clone(),
            is_removed: false,
        };
        let car_id = car.id.clone();
        store.cars.insert(car).await.unwrap();

        let slot_date = (Utc::now().date_naive() + Days::new(7))
            .format("%Y-%m-%dT09:00:00")
            .to_string();

        Fixture {
            bookings: BookingService::new(store.clone()),
            store,
            detailer_id,
            client_id,
            service_id,
            car_id,
            slot_date,
        }
    }

    #[tokio::test]
    async fn test_submit_creates_pending_submission() {
        let f = fixture().await;
        let submission = f
            .bookings
            .submit(&f.service_id, &f.slot_date, &f.client_id, &f.car_id)
            .await
            .unwrap();

        assert_eq!(submission.user_id, f.client_id);
        assert_eq!(submission.car_id, f.car_id);
        assert!(submission.employee_id.is_none());

        let pending = f.store.statuses.find_by_name(STATUS_PENDING).await.unwrap().unwrap();
        assert_eq!(submission.status_id, pending.id);
    }

    #[tokio::test]
    async fn test_submit_conflict_rejected() {
        let f = fixture().await;
        f.bookings
            .submit(&f.service_id, &f.slot_date, &f.client_id, &f.car_id)
            .await
            .unwrap();

        let err = f
            .bookings
            .submit(&f.service_id, &f.slot_date, &f.client_id, &f.car_id)
            .await
            .unwrap_err();
        assert!(
            matches!(err, AppError::Validation(ref msg) if msg == "Selected schedule is not available")
        );
    }

    #[tokio::test]
    async fn test_concurrent_submits_leave_one_submission() {
        let f = fixture().await;
        let (a, b) = tokio::join!(
            f.bookings
                .submit(&f.service_id, &f.slot_date, &f.client_id, &f.car_id),
            f.bookings
                .submit(&f.service_id, &f.slot_date, &f.client_id, &f.car_id),
        );

        assert_eq!(a.is_ok() as u8 + b.is_ok() as u8, 1);
        let failure = if a.is_err() { a.unwrap_err() } else { b.unwrap_err() };
        assert!(matches!(failure, AppError::Validation(_)));

        let winner = f
            .store
            .submissions
            .list_future_for_user(&f.client_id, Utc::now().naive_utc())
            .await
            .unwrap();
        assert_eq!(winner.len(), 1);
    }

    #[tokio::test]
    async fn test_submit_rejects_past_date() {
        let f = fixture().await;
        let past = (Utc::now().date_naive() - Days::new(7))
            .format("%Y-%m-%dT09:00:00")
            .to_string();
        let err = f
            .bookings
            .submit(&f.service_id, &past, &f.client_id, &f.car_id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(ref msg) if msg == "Date in the past is not allowed"));
    }

    #[tokio::test]
    async fn test_submit_unmatched_time() {
        let f = fixture().await;
        let date = (Utc::now().date_naive() + Days::new(7))
            .format("%Y-%m-%dT11:30:00")
            .to_string();
        let err = f
            .bookings
            .submit(&f.service_id, &date, &f.client_id, &f.car_id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(ref msg) if msg == "Service time not found"));
    }

    #[tokio::test]
    async fn test_submit_requires_pending_status() {
        // unseeded store: the pending reference row is missing
        let store = MemoryStore::build();
        let bookings = BookingService::new(store);
        let err = bookings
            .submit(&EntityId::new(), "2030-01-01T09:00:00", &EntityId::new(), &EntityId::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Integrity(_)));
    }

    #[tokio::test]
    async fn test_submit_unknown_car() {
        let f = fixture().await;
        let err = f
            .bookings
            .submit(&f.service_id, &f.slot_date, &f.client_id, &EntityId::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref msg) if msg == "Car not found"));
    }

    #[tokio::test]
    async fn test_cancel_by_owner() {
        let f = fixture().await;
        let submission = f
            .bookings
            .submit(&f.service_id, &f.slot_date, &f.client_id, &f.car_id)
            .await
            .unwrap();

        f.bookings.cancel(&f.client_id, &submission.id).await.unwrap();
        assert!(f.store.submissions.get(&submission.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_cancel_by_non_owner_leaves_submission() {
        let f = fixture().await;
        let submission = f
            .bookings
            .submit(&f.service_id, &f.slot_date, &f.client_id, &f.car_id)
            .await
            .unwrap();

        let err = f
            .bookings
            .cancel(&EntityId::new(), &submission.id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Authorization(_)));
        assert!(f.store.submissions.get(&submission.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_cancel_unknown_submission_is_not_found() {
        let f = fixture().await;
        let err = f.bookings.cancel(&f.client_id, &EntityId::new()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_reschedule_moves_date_and_car() {
        let f = fixture().await;
        let submission = f
            .bookings
            .submit(&f.service_id, &f.slot_date, &f.client_id, &f.car_id)
            .await
            .unwrap();

        let new_date = (Utc::now().date_naive() + Days::new(14))
            .format("%Y-%m-%dT09:00:00")
            .to_string();
        let updated = f
            .bookings
            .reschedule(&f.client_id, &submission.id, &new_date, &f.car_id)
            .await
            .unwrap();

        assert_eq!(updated.date, dates::parse_iso_datetime(&new_date).unwrap());
        let stored = f.store.submissions.get(&submission.id).await.unwrap().unwrap();
        assert_eq!(stored.date, updated.date);
    }

    #[tokio::test]
    async fn test_reschedule_to_taken_slot_rejected() {
        let f = fixture().await;
        let first = f
            .bookings
            .submit(&f.service_id, &f.slot_date, &f.client_id, &f.car_id)
            .await
            .unwrap();
        let other_date = (Utc::now().date_naive() + Days::new(8))
            .format("%Y-%m-%dT09:00:00")
            .to_string();
        let second = f
            .bookings
            .submit(&f.service_id, &other_date, &f.client_id, &f.car_id)
            .await
            .unwrap();

        // second tries to move onto first's slot
        let err = f
            .bookings
            .reschedule(&f.client_id, &second.id, &f.slot_date, &f.car_id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(ref msg) if msg == "Schedule is not available"));

        // moving onto its own slot is a no-op conflict-wise
        f.bookings
            .reschedule(&f.client_id, &first.id, &f.slot_date, &f.car_id)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_reschedule_by_non_owner_leaves_submission() {
        let f = fixture().await;
        let submission = f
            .bookings
            .submit(&f.service_id, &f.slot_date, &f.client_id, &f.car_id)
            .await
            .unwrap();

        let new_date = (Utc::now().date_naive() + Days::new(14))
            .format("%Y-%m-%dT09:00:00")
            .to_string();
        let err = f
            .bookings
            .reschedule(&EntityId::new(), &submission.id, &new_date, &f.car_id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Authorization(_)));

        let stored = f.store.submissions.get(&submission.id).await.unwrap().unwrap();
        assert_eq!(stored.date, submission.date);
    }

    #[tokio::test]
    async fn test_assign_employee_checks_service_owner() {
        let f = fixture().await;
        let submission = f
            .bookings
            .submit(&f.service_id, &f.slot_date, &f.client_id, &f.car_id)
            .await
            .unwrap();

        let employee = Employee {
            id: EntityId::new(),
            first_name: "Anna".to_string(),
            last_name: "Nowak".to_string(),
            description: "Senior detailer".to_string(),
            experience: 6,
            detailer_id: f.detailer_id.clone(),
            is_removed: false,
        };
        f.store.employees.insert(employee.clone()).await.unwrap();

        let err = f
            .bookings
            .assign_employee(&EntityId::new(), &submission.id, &employee.id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Authorization(_)));

        f.bookings
            .assign_employee(&f.detailer_id, &submission.id, &employee.id)
            .await
            .unwrap();
        let stored = f.store.submissions.get(&submission.id).await.unwrap().unwrap();
        assert_eq!(stored.employee_id, Some(employee.id));
    }

    #[tokio::test]
    async fn test_set_status() {
        let f = fixture().await;
        let submission = f
            .bookings
            .submit(&f.service_id, &f.slot_date, &f.client_id, &f.car_id)
            .await
            .unwrap();
        let done = f.store.statuses.find_by_name(STATUS_DONE).await.unwrap().unwrap();

        let err = f
            .bookings
            .set_status(&f.client_id, &submission.id, &done.id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Authorization(_)));

        f.bookings
            .set_status(&f.detailer_id, &submission.id, &done.id)
            .await
            .unwrap();
        let stored = f.store.submissions.get(&submission.id).await.unwrap().unwrap();
        assert_eq!(stored.status_id, done.id);
    }

    #[tokio::test]
    async fn test_user_submits_joined() {
        let f = fixture().await;
        f.bookings
            .submit(&f.service_id, &f.slot_date, &f.client_id, &f.car_id)
            .await
            .unwrap();

        let submits = f.bookings.user_submits(&f.client_id).await.unwrap();
        assert_eq!(submits.len(), 1);
        assert_eq!(submits[0].service_name, "Ceramic Coating");
        assert_eq!(submits[0].car_name, "Skoda Octavia");
    }

    #[test]
    fn test_weekday_matches_slot_fixture() {
        // the fixture relies on one schedule per weekday; sanity-check the
        // Monday mapping used throughout
        let monday = NaiveDate::from_ymd_opt(2030, 3, 4).unwrap();
        assert_eq!(monday.weekday(), Weekday::Mon);
        assert_eq!(weekday_number(monday), 1);
    }
}
