//! User model and role types

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::EntityId;

/// Closed set of platform roles, resolved once at the boundary and passed
/// as a typed value into gated operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleName {
    Detailer,
    Client,
}

impl RoleName {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleName::Detailer => "detailer",
            RoleName::Client => "client",
        }
    }

    /// Denial message used by the permission gate
    pub fn denial_message(&self) -> &'static str {
        match self {
            RoleName::Detailer => "This action is only for detailer.",
            RoleName::Client => "This action is only for client.",
        }
    }
}

impl std::fmt::Display for RoleName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for RoleName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "detailer" => Ok(RoleName::Detailer),
            "client" => Ok(RoleName::Client),
            _ => Err(format!("Invalid role name: {}", s)),
        }
    }
}

/// Role reference record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: EntityId,
    pub name: String,
    pub display_name: String,
}

/// Platform user with profile and company fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppUser {
    pub id: EntityId,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub zip_code: Option<String>,
    /// Tax identification number
    pub nip: Option<String>,
    pub company_name: Option<String>,
    pub role_id: EntityId,
}

impl AppUser {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Registration request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterUser {
    #[validate(length(min = 3, max = 150))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    /// Role name ("detailer" or "client")
    pub role: String,
}

/// Profile update request
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateProfile {
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 150))]
    pub first_name: Option<String>,
    #[validate(length(max = 150))]
    pub last_name: Option<String>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    #[validate(length(max = 50))]
    pub street: Option<String>,
    #[validate(length(max = 50))]
    pub city: Option<String>,
    #[validate(length(max = 10))]
    pub zip_code: Option<String>,
    #[validate(length(max = 11))]
    pub nip: Option<String>,
    #[validate(length(max = 200))]
    pub company_name: Option<String>,
}

/// Resolved role of an actor, as returned to the presentation layer
#[derive(Debug, Clone, Serialize)]
pub struct RoleInfo {
    pub role_id: EntityId,
    pub role_name: String,
    pub role_display_name: String,
}

/// Client contact info shown to a detailer
#[derive(Debug, Clone, Serialize)]
pub struct ClientContact {
    pub id: EntityId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
}
