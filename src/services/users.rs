//! User registration and profile management

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        user::{AppUser, RegisterUser, RoleInfo, RoleName, UpdateProfile},
        EntityId,
    },
    store::Store,
};

#[derive(Clone)]
pub struct UsersService {
    store: Store,
}

impl UsersService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Register a new user under one of the platform roles
    pub async fn register(&self, data: RegisterUser) -> AppResult<AppUser> {
        data.validate()?;

        let role_name: RoleName = data
            .role
            .parse()
            .map_err(|e: String| AppError::Validation(e))?;
        let role = self
            .store
            .roles
            .find_by_name(role_name.as_str())
            .await?
            .ok_or_else(|| {
                AppError::Integrity(format!("Role '{}' missing from reference data", role_name))
            })?;

        if self
            .store
            .users
            .find_by_username(&data.username)
            .await?
            .is_some()
        {
            return Err(AppError::Validation("User already exists!".to_string()));
        }

        let user = AppUser {
            id: EntityId::new(),
            username: data.username,
            email: data.email,
            password_hash: self.hash_password(&data.password)?,
            first_name: String::new(),
            last_name: String::new(),
            phone: None,
            street: None,
            city: None,
            zip_code: None,
            nip: None,
            company_name: None,
            role_id: role.id,
        };
        self.store.users.insert(user.clone()).await?;
        Ok(user)
    }

    /// Change a user's password; the confirmation must match
    pub async fn change_password(
        &self,
        user_id: &EntityId,
        password: &str,
        password_confirm: &str,
    ) -> AppResult<()> {
        if password != password_confirm {
            return Err(AppError::Validation("Password are not the same".to_string()));
        }

        let mut user = self.get_user(user_id).await?;
        user.password_hash = self.hash_password(password)?;
        self.store.users.update(&user).await?;
        Ok(())
    }

    pub async fn profile(&self, user_id: &EntityId) -> AppResult<AppUser> {
        self.get_user(user_id).await
    }

    /// Apply the provided profile fields, leaving the rest untouched
    pub async fn update_profile(
        &self,
        user_id: &EntityId,
        data: UpdateProfile,
    ) -> AppResult<AppUser> {
        data.validate()?;
        let mut user = self.get_user(user_id).await?;

        if let Some(email) = data.email {
            user.email = email;
        }
        if let Some(first_name) = data.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = data.last_name {
            user.last_name = last_name;
        }
        if data.phone.is_some() {
            user.phone = data.phone;
        }
        if data.street.is_some() {
            user.street = data.street;
        }
        if data.city.is_some() {
            user.city = data.city;
        }
        if data.zip_code.is_some() {
            user.zip_code = data.zip_code;
        }
        if data.nip.is_some() {
            user.nip = data.nip;
        }
        if data.company_name.is_some() {
            user.company_name = data.company_name;
        }

        self.store.users.update(&user).await?;
        Ok(user)
    }

    /// Resolve the actor's role reference for display
    pub async fn role_info(&self, actor: &AppUser) -> AppResult<RoleInfo> {
        let role = self
            .store
            .roles
            .get(&actor.role_id)
            .await?
            .ok_or_else(|| AppError::Validation("Invalid user role".to_string()))?;
        Ok(RoleInfo {
            role_id: role.id,
            role_name: role.name,
            role_display_name: role.display_name,
        })
    }

    async fn get_user(&self, user_id: &EntityId) -> AppResult<AppUser> {
        self.store
            .users
            .get(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))
    }

    /// Hash a password using Argon2
    fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::Integrity(format!("Password hashing failed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    fn register_data(username: &str, role: &str) -> RegisterUser {
        RegisterUser {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password: "correct horse battery".to_string(),
            role: role.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_and_role_info() {
        let store = MemoryStore::build_seeded().await.unwrap();
        let users = UsersService::new(store);

        let user = users.register(register_data("kowalski", "client")).await.unwrap();
        assert!(!user.password_hash.is_empty());
        assert_ne!(user.password_hash, "correct horse battery");

        let info = users.role_info(&user).await.unwrap();
        assert_eq!(info.role_name, "client");
    }

    #[tokio::test]
    async fn test_register_duplicate_username() {
        let store = MemoryStore::build_seeded().await.unwrap();
        let users = UsersService::new(store);

        users.register(register_data("kowalski", "client")).await.unwrap();
        let err = users
            .register(register_data("kowalski", "detailer"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(ref msg) if msg == "User already exists!"));
    }

    #[tokio::test]
    async fn test_register_unknown_role() {
        let store = MemoryStore::build_seeded().await.unwrap();
        let users = UsersService::new(store);
        let err = users
            .register(register_data("kowalski", "manager"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_register_missing_reference_role() {
        // roles never seeded
        let store = MemoryStore::build();
        let users = UsersService::new(store);
        let err = users
            .register(register_data("kowalski", "client"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Integrity(_)));
    }

    #[tokio::test]
    async fn test_change_password_requires_matching_confirm() {
        let store = MemoryStore::build_seeded().await.unwrap();
        let users = UsersService::new(store);
        let user = users.register(register_data("kowalski", "client")).await.unwrap();

        let err = users
            .change_password(&user.id, "new password one", "new password two")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        users
            .change_password(&user.id, "new password one", "new password one")
            .await
            .unwrap();
        let updated = users.profile(&user.id).await.unwrap();
        assert_ne!(updated.password_hash, user.password_hash);
    }

    #[tokio::test]
    async fn test_update_profile_partial() {
        let store = MemoryStore::build_seeded().await.unwrap();
        let users = UsersService::new(store);
        let user = users.register(register_data("kowalski", "detailer")).await.unwrap();

        let updated = users
            .update_profile(
                &user.id,
                UpdateProfile {
                    first_name: Some("Jan".to_string()),
                    last_name: Some("Kowalski".to_string()),
                    phone: Some("+48 700 800 900".to_string()),
                    nip: Some("1234567890".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.full_name(), "Jan Kowalski");
        assert_eq!(updated.email, "kowalski@example.com");
        assert_eq!(updated.nip.as_deref(), Some("1234567890"));
    }
}
