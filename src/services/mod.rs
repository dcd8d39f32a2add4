//! Business logic services

pub mod availability;
pub mod bookings;
pub mod cars;
pub mod catalog;
pub mod employees;
pub mod invoices;
pub mod orders;
pub mod permissions;
pub mod users;

use crate::{config::AppConfig, store::Store};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub availability: availability::AvailabilityService,
    pub bookings: bookings::BookingService,
    pub orders: orders::OrdersService,
    pub catalog: catalog::CatalogService,
    pub cars: cars::CarsService,
    pub employees: employees::EmployeesService,
    pub invoices: invoices::InvoicesService,
    pub users: users::UsersService,
    pub gate: permissions::RoleGate,
}

impl Services {
    /// Create all services with the given store handle
    pub fn new(store: Store, config: &AppConfig) -> Self {
        let gate = permissions::RoleGate::new(store.clone());
        Self {
            availability: availability::AvailabilityService::new(
                store.clone(),
                config.booking.clone(),
            ),
            bookings: bookings::BookingService::new(store.clone()),
            orders: orders::OrdersService::new(store.clone()),
            catalog: catalog::CatalogService::new(store.clone(), gate.clone()),
            cars: cars::CarsService::new(store.clone()),
            employees: employees::EmployeesService::new(store.clone()),
            invoices: invoices::InvoicesService::new(store.clone()),
            users: users::UsersService::new(store),
            gate,
        }
    }
}
