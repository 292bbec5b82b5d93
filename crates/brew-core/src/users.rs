//! # User Types
//!
//! Users, roles, and the fixed role→permission mapping.
//!
//! Accessibility preferences are carried as plain per-user configuration
//! flags; they have no behavioral coupling to the ledger and are simply
//! stored and round-tripped for the frontend to honor.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};

// =============================================================================
// Role
// =============================================================================

/// Closed set of user roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Full system access.
    Owner,
    /// Inventory and sales management.
    Manager,
    /// Basic sales and inventory operations.
    Staff,
    /// Same privileges as Staff, with the accessible interface enabled.
    PwdStaff,
}

impl Role {
    /// Human-readable role name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Role::Owner => "Owner",
            Role::Manager => "Manager",
            Role::Staff => "Staff",
            Role::PwdStaff => "PWD Staff",
        }
    }
}

// =============================================================================
// Action
// =============================================================================

/// Actions subject to permission checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    ViewInventory,
    UpdateStock,
    ProcessSale,
    ViewSales,
    ManageProducts,
    ManageUsers,
    ViewReports,
    DeleteUser,
    SystemSettings,
}

// =============================================================================
// User
// =============================================================================

/// A user account.
///
/// Credentials are stored as an argon2 PHC hash string; hashing and
/// verification live in the persistence crate's auth module, so the
/// plaintext never reaches these types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub id: String,
    pub username: String,

    /// Argon2 PHC-format hash, e.g. "$argon2id$v=19$...".
    #[serde(skip_serializing)]
    pub password_hash: String,

    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub role: Role,

    pub last_login: Option<DateTime<Utc>>,
    pub is_active: bool,

    // Accessibility preferences (configuration data only)
    pub high_contrast_mode: bool,
    pub large_text_mode: bool,
    pub screen_reader_enabled: bool,
    pub keyboard_navigation_enabled: bool,
    pub preferred_language: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new active user with default accessibility preferences.
    /// `password_hash` must already be hashed.
    pub fn new(
        username: impl Into<String>,
        password_hash: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        role: Role,
    ) -> Self {
        let now = Utc::now();
        User {
            id: Uuid::new_v4().to_string(),
            username: username.into(),
            password_hash: password_hash.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: None,
            role,
            last_login: None,
            is_active: true,
            high_contrast_mode: false,
            large_text_mode: false,
            screen_reader_enabled: false,
            keyboard_navigation_enabled: true,
            preferred_language: "en".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Full display name.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Whether the accessible interface should be offered by default.
    #[inline]
    pub fn is_pwd_staff(&self) -> bool {
        self.role == Role::PwdStaff
    }

    /// Role-based permission check.
    ///
    /// Fixed mapping:
    /// - inactive users: nothing, regardless of role
    /// - Owner: everything
    /// - Manager: everything except `DeleteUser` and `SystemSettings`
    /// - Staff / PwdStaff: view inventory, process sales, view sales,
    ///   update stock
    pub fn has_permission(&self, action: Action) -> bool {
        if !self.is_active {
            return false;
        }

        match self.role {
            Role::Owner => true,
            Role::Manager => !matches!(action, Action::DeleteUser | Action::SystemSettings),
            Role::Staff | Role::PwdStaff => matches!(
                action,
                Action::ViewInventory
                    | Action::ProcessSale
                    | Action::ViewSales
                    | Action::UpdateStock
            ),
        }
    }

    /// Like [`has_permission`](Self::has_permission), but as a guard that
    /// callers can `?` at the top of a protected operation.
    pub fn require_permission(&self, action: Action) -> CoreResult<()> {
        if self.has_permission(action) {
            Ok(())
        } else {
            Err(CoreError::PermissionDenied {
                role: self.role.display_name().to_string(),
                action: format!("{:?}", action),
            })
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with_role(role: Role) -> User {
        User::new("test", "$argon2id$stub", "Test", "User", role)
    }

    #[test]
    fn test_owner_has_all_permissions() {
        let owner = user_with_role(Role::Owner);
        assert!(owner.has_permission(Action::DeleteUser));
        assert!(owner.has_permission(Action::SystemSettings));
        assert!(owner.has_permission(Action::ProcessSale));
    }

    #[test]
    fn test_manager_cannot_delete_users() {
        let manager = user_with_role(Role::Manager);
        assert!(manager.has_permission(Action::ManageProducts));
        assert!(manager.has_permission(Action::ManageUsers));
        assert!(manager.has_permission(Action::ViewReports));
        assert!(!manager.has_permission(Action::DeleteUser));
        assert!(!manager.has_permission(Action::SystemSettings));
    }

    #[test]
    fn test_staff_permissions() {
        for role in [Role::Staff, Role::PwdStaff] {
            let staff = user_with_role(role);
            assert!(staff.has_permission(Action::ViewInventory));
            assert!(staff.has_permission(Action::ProcessSale));
            assert!(staff.has_permission(Action::ViewSales));
            assert!(staff.has_permission(Action::UpdateStock));
            assert!(!staff.has_permission(Action::ManageProducts));
            assert!(!staff.has_permission(Action::DeleteUser));
            assert!(!staff.has_permission(Action::SystemSettings));
        }
    }

    #[test]
    fn test_require_permission_guard() {
        let staff = user_with_role(Role::Staff);
        assert!(staff.require_permission(Action::ProcessSale).is_ok());

        let err = staff.require_permission(Action::DeleteUser).unwrap_err();
        assert!(matches!(err, CoreError::PermissionDenied { .. }));
        assert_eq!(
            err.to_string(),
            "Role Staff is not permitted to perform DeleteUser"
        );
    }

    #[test]
    fn test_inactive_user_has_no_permissions() {
        let mut owner = user_with_role(Role::Owner);
        owner.is_active = false;
        assert!(!owner.has_permission(Action::ViewInventory));
        assert!(!owner.has_permission(Action::DeleteUser));
    }

    #[test]
    fn test_full_name_and_pwd_flag() {
        let user = User::new("m.cruz", "$hash", "Maria", "Cruz", Role::PwdStaff);
        assert_eq!(user.full_name(), "Maria Cruz");
        assert!(user.is_pwd_staff());
        assert!(user.keyboard_navigation_enabled);
        assert_eq!(user.preferred_language, "en");
    }
}
