//! User account entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{ROLE_ADMIN, ROLE_STAFF, ROLE_STUDENT};

/// User roles enumeration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Student,
    Staff,
    Admin,
}

impl UserRole {
    /// Check if this role has admin privileges
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    /// Check if this role may view every student record
    pub fn is_staff(&self) -> bool {
        matches!(self, UserRole::Staff | UserRole::Admin)
    }
}

impl From<&str> for UserRole {
    fn from(s: &str) -> Self {
        match s {
            ROLE_ADMIN => UserRole::Admin,
            ROLE_STAFF => UserRole::Staff,
            _ => UserRole::Student,
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Admin => write!(f, "{}", ROLE_ADMIN),
            UserRole::Staff => write!(f, "{}", ROLE_STAFF),
            UserRole::Student => write!(f, "{}", ROLE_STUDENT),
        }
    }
}

/// User account entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub full_name: String,
    pub role: UserRole,
    /// Deactivated accounts cannot authenticate
    pub is_active: bool,
    pub date_joined: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new active account with the default role
    pub fn new(
        id: Uuid,
        username: String,
        email: String,
        password_hash: String,
        full_name: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            username,
            email,
            password_hash,
            full_name,
            role: UserRole::Student,
            is_active: true,
            date_joined: now,
            updated_at: now,
        }
    }

    /// Check if the account has admin privileges
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Deactivate the account (admin "delete")
    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.updated_at = Utc::now();
    }

    /// Reactivate a deactivated account
    pub fn activate(&mut self) {
        self.is_active = true;
        self.updated_at = Utc::now();
    }
}

/// Profile update payload
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateProfile {
    /// New display name
    #[schema(example = "Jane Doe")]
    pub full_name: Option<String>,
    /// New email address
    #[schema(example = "jane@students.example.edu")]
    pub email: Option<String>,
}

/// Admin-side account update payload
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateAccount {
    /// New role (student, staff or admin)
    #[schema(example = "staff")]
    pub role: Option<String>,
    /// Enable or disable the account
    pub is_active: Option<bool>,
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    /// Unique account identifier
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    /// Login name
    #[schema(example = "jdoe")]
    pub username: String,
    /// Email address
    #[schema(example = "jdoe@students.example.edu")]
    pub email: String,
    /// Display name
    #[schema(example = "John Doe")]
    pub full_name: String,
    /// Account role
    #[schema(example = "student")]
    pub role: String,
    /// Whether the account may authenticate
    pub is_active: bool,
    /// Account creation timestamp
    pub date_joined: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            full_name: user.full_name,
            role: user.role.to_string(),
            is_active: user.is_active,
            date_joined: user.date_joined,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_strings() {
        assert_eq!(UserRole::from("admin"), UserRole::Admin);
        assert_eq!(UserRole::from("staff"), UserRole::Staff);
        assert_eq!(UserRole::from("student"), UserRole::Student);
        // Unknown values default to Student
        assert_eq!(UserRole::from("wizard"), UserRole::Student);
        assert_eq!(UserRole::Staff.to_string(), "staff");
    }

    #[test]
    fn staff_check_includes_admins() {
        assert!(UserRole::Admin.is_staff());
        assert!(UserRole::Staff.is_staff());
        assert!(!UserRole::Student.is_staff());
    }

    #[test]
    fn deactivate_flips_active_flag() {
        let mut user = User::new(
            Uuid::new_v4(),
            "jdoe".into(),
            "jdoe@example.edu".into(),
            "hash".into(),
            "John Doe".into(),
        );
        assert!(user.is_active);
        user.deactivate();
        assert!(!user.is_active);
        user.activate();
        assert!(user.is_active);
    }
}
