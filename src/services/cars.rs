//! Client car management

use chrono::Utc;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        car::{AddCar, Car},
        EntityId,
    },
    store::Store,
};

#[derive(Clone)]
pub struct CarsService {
    store: Store,
}

impl CarsService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn add_car(&self, user_id: &EntityId, data: AddCar) -> AppResult<Car> {
        data.validate()?;
        let car = Car {
            id: EntityId::new(),
            manufacturer: data.manufacturer,
            model: data.model,
            year_of_production: data.year_of_production,
            user_id: user_id.clone(),
            is_removed: false,
        };
        self.store.cars.insert(car.clone()).await?;
        Ok(car)
    }

    /// The client's cars, soft-removed ones excluded
    pub async fn my_cars(&self, user_id: &EntityId) -> AppResult<Vec<Car>> {
        Ok(self.store.cars.list_active_for_user(user_id).await?)
    }

    /// Soft-remove a car. A car still referenced by upcoming bookings
    /// cannot be removed; history keeps resolving through the flag.
    pub async fn remove_car(&self, user_id: &EntityId, car_id: &EntityId) -> AppResult<()> {
        let mut car = self
            .store
            .cars
            .get(car_id)
            .await?
            .filter(|c| &c.user_id == user_id)
            .ok_or_else(|| AppError::NotFound("Car not found".to_string()))?;

        let has_pending = self
            .store
            .submissions
            .has_future_for_car(car_id, Utc::now().naive_utc())
            .await?;
        if has_pending {
            return Err(AppError::Validation(
                "Car is connected with pending services".to_string(),
            ));
        }

        car.is_removed = true;
        self.store.cars.update(&car).await?;
        Ok(())
    }
}
