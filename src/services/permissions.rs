//! Role resolution and permission gating

use crate::{
    error::{AppError, AppResult},
    models::user::{AppUser, RoleName},
    store::Store,
};

/// Resolves an actor's role reference and gates role-restricted
/// operations. Denial is binary: no partial or elevated grants.
#[derive(Clone)]
pub struct RoleGate {
    store: Store,
}

impl RoleGate {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Resolve the actor's role reference into the closed role set.
    /// A dangling or unknown reference resolves to `None`.
    pub async fn resolve(&self, actor: &AppUser) -> AppResult<Option<RoleName>> {
        let role = self.store.roles.get(&actor.role_id).await?;
        Ok(role.and_then(|r| r.name.parse().ok()))
    }

    /// Deny unless the actor's resolved role matches `required`
    pub async fn require(&self, actor: &AppUser, required: RoleName) -> AppResult<()> {
        match self.resolve(actor).await? {
            Some(role) if role == required => Ok(()),
            _ => Err(AppError::Authorization(required.denial_message().to_string())),
        }
    }
}
