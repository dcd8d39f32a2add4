//! Detailer employee management

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        employee::{AddEmployee, Employee},
        EntityId,
    },
    store::Store,
};

#[derive(Clone)]
pub struct EmployeesService {
    store: Store,
}

impl EmployeesService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn add_employee(
        &self,
        detailer_id: &EntityId,
        data: AddEmployee,
    ) -> AppResult<Employee> {
        data.validate()?;
        let employee = Employee {
            id: EntityId::new(),
            first_name: data.first_name,
            last_name: data.last_name,
            description: data.description,
            experience: data.experience,
            detailer_id: detailer_id.clone(),
            is_removed: false,
        };
        self.store.employees.insert(employee.clone()).await?;
        Ok(employee)
    }

    /// The detailer's staff, soft-removed ones excluded
    pub async fn employees(&self, detailer_id: &EntityId) -> AppResult<Vec<Employee>> {
        Ok(self
            .store
            .employees
            .list_active_for_detailer(detailer_id)
            .await?)
    }

    /// Soft-remove an employee; past assignments keep resolving
    pub async fn remove_employee(
        &self,
        detailer_id: &EntityId,
        employee_id: &EntityId,
    ) -> AppResult<()> {
        let mut employee = self
            .store
            .employees
            .get(employee_id)
            .await?
            .filter(|e| &e.detailer_id == detailer_id)
            .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))?;

        employee.is_removed = true;
        self.store.employees.update(&employee).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    fn add_data() -> AddEmployee {
        AddEmployee {
            first_name: "Tomasz".to_string(),
            last_name: "Lis".to_string(),
            description: "Polish and wax specialist".to_string(),
            experience: 4,
        }
    }

    #[tokio::test]
    async fn test_add_list_remove() {
        let store = MemoryStore::build_seeded().await.unwrap();
        let employees = EmployeesService::new(store);
        let detailer_id = EntityId::new();

        let employee = employees.add_employee(&detailer_id, add_data()).await.unwrap();
        assert_eq!(employees.employees(&detailer_id).await.unwrap().len(), 1);

        employees.remove_employee(&detailer_id, &employee.id).await.unwrap();
        assert!(employees.employees(&detailer_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remove_checks_ownership() {
        let store = MemoryStore::build_seeded().await.unwrap();
        let employees = EmployeesService::new(store);
        let detailer_id = EntityId::new();
        let employee = employees.add_employee(&detailer_id, add_data()).await.unwrap();

        let err = employees
            .remove_employee(&EntityId::new(), &employee.id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(employees.employees(&detailer_id).await.unwrap().len(), 1);
    }
}
