//! # User Repository
//!
//! The user directory: accounts, credentials, and role data.
//!
//! Passwords are hashed with argon2 before they reach a statement; the
//! plaintext is never stored or logged. Authentication is a fetch plus a
//! constant-time hash verification, with `last_login` stamped on success
//! and nothing mutated on failure.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::auth::{hash_password, verify_password};
use crate::error::{DbError, DbResult, StoreError, StoreResult};
use brew_core::validation::{validate_email, validate_username};
use brew_core::{CoreError, Role, User};

const USER_COLUMNS: &str = "id, username, password_hash, first_name, last_name, email, role, \
     last_login, is_active, high_contrast_mode, large_text_mode, screen_reader_enabled, \
     keyboard_navigation_enabled, preferred_language, created_at, updated_at";

/// Repository for user directory operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Creates a user account from a plaintext password.
    ///
    /// Validates the username and email, hashes the password, and inserts
    /// the account. Returns the stored user.
    ///
    /// ## Returns
    /// * `Err(StoreError::Db(UniqueViolation))` - username taken
    pub async fn create(
        &self,
        username: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
        role: Role,
    ) -> StoreResult<User> {
        validate_username(username)?;

        let password_hash = hash_password(password)?;
        let user = User::new(username, password_hash, first_name, last_name, role);

        self.insert(&user).await?;
        Ok(user)
    }

    /// Inserts a pre-built user (password already hashed).
    pub async fn insert(&self, user: &User) -> DbResult<()> {
        debug!(id = %user.id, username = %user.username, "Inserting user");

        sqlx::query(
            r#"
            INSERT INTO users (
                id, username, password_hash, first_name, last_name, email, role,
                last_login, is_active, high_contrast_mode, large_text_mode,
                screen_reader_enabled, keyboard_navigation_enabled,
                preferred_language, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
            "#,
        )
        .bind(&user.id)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(user.role)
        .bind(user.last_login)
        .bind(user.is_active)
        .bind(user.high_contrast_mode)
        .bind(user.large_text_mode)
        .bind(user.screen_reader_enabled)
        .bind(user.keyboard_navigation_enabled)
        .bind(&user.preferred_language)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a user by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Gets a user by username.
    pub async fn get_by_username(&self, username: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = ?1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Authenticates a username/password pair.
    ///
    /// On success, stamps `last_login` and returns the user. Every failure
    /// path — unknown username, inactive account, wrong password — returns
    /// the same opaque [`CoreError::InvalidCredentials`] and changes no
    /// state.
    pub async fn authenticate(&self, username: &str, password: &str) -> StoreResult<User> {
        let user = self.get_by_username(username).await?;

        let Some(mut user) = user.filter(|u| u.is_active) else {
            warn!(username = %username, "Authentication failed: unknown or inactive user");
            return Err(StoreError::Core(CoreError::InvalidCredentials));
        };

        if !verify_password(password, &user.password_hash) {
            warn!(username = %username, "Authentication failed: bad credentials");
            return Err(StoreError::Core(CoreError::InvalidCredentials));
        }

        let now = Utc::now();
        sqlx::query("UPDATE users SET last_login = ?2, updated_at = ?2 WHERE id = ?1")
            .bind(&user.id)
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(DbError::from)?;
        user.last_login = Some(now);
        user.updated_at = now;

        info!(username = %username, "User authenticated");
        Ok(user)
    }

    /// Updates a user's profile, role, active flag, and accessibility
    /// preferences. Credentials change through `set_password` only.
    pub async fn update(&self, user: &User) -> StoreResult<()> {
        if let Some(email) = &user.email {
            validate_email(email)?;
        }

        debug!(id = %user.id, "Updating user");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE users SET
                first_name = ?2,
                last_name = ?3,
                email = ?4,
                role = ?5,
                is_active = ?6,
                high_contrast_mode = ?7,
                large_text_mode = ?8,
                screen_reader_enabled = ?9,
                keyboard_navigation_enabled = ?10,
                preferred_language = ?11,
                updated_at = ?12
            WHERE id = ?1
            "#,
        )
        .bind(&user.id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(user.role)
        .bind(user.is_active)
        .bind(user.high_contrast_mode)
        .bind(user.large_text_mode)
        .bind(user.screen_reader_enabled)
        .bind(user.keyboard_navigation_enabled)
        .bind(&user.preferred_language)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(DbError::from)?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", &user.id).into());
        }

        Ok(())
    }

    /// Replaces a user's password with a freshly salted hash.
    pub async fn set_password(&self, id: &str, new_password: &str) -> StoreResult<()> {
        let password_hash = hash_password(new_password)?;
        let now = Utc::now();

        let result =
            sqlx::query("UPDATE users SET password_hash = ?2, updated_at = ?3 WHERE id = ?1")
                .bind(id)
                .bind(&password_hash)
                .bind(now)
                .execute(&self.pool)
                .await
                .map_err(DbError::from)?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id).into());
        }

        info!(id = %id, "Password changed");
        Ok(())
    }

    /// Lists users, optionally filtered by role, sorted by username.
    pub async fn list(&self, role_filter: Option<Role>) -> DbResult<Vec<User>> {
        let users = match role_filter {
            Some(role) => {
                sqlx::query_as::<_, User>(&format!(
                    "SELECT {USER_COLUMNS} FROM users WHERE role = ?1 ORDER BY username"
                ))
                .bind(role)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, User>(&format!(
                    "SELECT {USER_COLUMNS} FROM users ORDER BY username"
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(users)
    }

    /// Deactivates a user account.
    ///
    /// The account keeps its history but loses all permissions immediately
    /// (`has_permission` returns false for inactive users) and can no
    /// longer authenticate.
    pub async fn deactivate(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deactivating user");

        let now = Utc::now();

        let result = sqlx::query("UPDATE users SET is_active = 0, updated_at = ?2 WHERE id = ?1")
            .bind(id)
            .bind(now)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use brew_core::Action;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_hashes_password() {
        let db = test_db().await;
        let user = db
            .users()
            .create("staffuser", "s3cret!", "Ana", "Reyes", Role::Staff)
            .await
            .unwrap();

        assert_ne!(user.password_hash, "s3cret!");
        assert!(user.password_hash.starts_with("$argon2"));
    }

    #[tokio::test]
    async fn test_authenticate_success_stamps_last_login() {
        let db = test_db().await;
        db.users()
            .create("staffuser", "s3cret!", "Ana", "Reyes", Role::Staff)
            .await
            .unwrap();

        let user = db.users().authenticate("staffuser", "s3cret!").await.unwrap();
        assert_eq!(user.username, "staffuser");
        assert!(user.last_login.is_some());

        let reloaded = db
            .users()
            .get_by_username("staffuser")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reloaded.last_login, user.last_login);
    }

    #[tokio::test]
    async fn test_authenticate_wrong_password_changes_nothing() {
        let db = test_db().await;
        db.users()
            .create("staffuser", "s3cret!", "Ana", "Reyes", Role::Staff)
            .await
            .unwrap();

        let err = db
            .users()
            .authenticate("staffuser", "wrongpw")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Core(CoreError::InvalidCredentials)
        ));

        let user = db
            .users()
            .get_by_username("staffuser")
            .await
            .unwrap()
            .unwrap();
        assert!(user.last_login.is_none());
    }

    #[tokio::test]
    async fn test_authenticate_unknown_and_inactive_users() {
        let db = test_db().await;
        let user = db
            .users()
            .create("oldstaff", "pw", "Old", "Staff", Role::Staff)
            .await
            .unwrap();

        assert!(matches!(
            db.users().authenticate("nobody", "pw").await.unwrap_err(),
            StoreError::Core(CoreError::InvalidCredentials)
        ));

        db.users().deactivate(&user.id).await.unwrap();
        assert!(matches!(
            db.users().authenticate("oldstaff", "pw").await.unwrap_err(),
            StoreError::Core(CoreError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let db = test_db().await;
        db.users()
            .create("maria", "pw1", "Maria", "Cruz", Role::Manager)
            .await
            .unwrap();

        let err = db
            .users()
            .create("maria", "pw2", "Other", "Maria", Role::Staff)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Db(DbError::UniqueViolation { .. })
        ));
    }

    #[tokio::test]
    async fn test_accessibility_prefs_round_trip() {
        let db = test_db().await;
        let mut user = db
            .users()
            .create("pwd.staff", "pw", "Jun", "Santos", Role::PwdStaff)
            .await
            .unwrap();

        user.high_contrast_mode = true;
        user.large_text_mode = true;
        user.screen_reader_enabled = true;
        user.preferred_language = "fil".to_string();
        db.users().update(&user).await.unwrap();

        let loaded = db.users().get_by_id(&user.id).await.unwrap().unwrap();
        assert!(loaded.high_contrast_mode);
        assert!(loaded.large_text_mode);
        assert!(loaded.screen_reader_enabled);
        assert!(loaded.keyboard_navigation_enabled);
        assert_eq!(loaded.preferred_language, "fil");
        assert!(loaded.is_pwd_staff());
    }

    #[tokio::test]
    async fn test_permission_check_through_directory() {
        let db = test_db().await;
        let staff = db
            .users()
            .create("staffuser", "pw", "Ana", "Reyes", Role::Staff)
            .await
            .unwrap();

        assert!(!staff.has_permission(Action::DeleteUser));
        assert!(staff.has_permission(Action::ProcessSale));
    }

    #[tokio::test]
    async fn test_list_by_role() {
        let db = test_db().await;
        db.users()
            .create("owner", "pw", "O", "Wner", Role::Owner)
            .await
            .unwrap();
        db.users()
            .create("staff1", "pw", "S", "One", Role::Staff)
            .await
            .unwrap();
        db.users()
            .create("staff2", "pw", "S", "Two", Role::Staff)
            .await
            .unwrap();

        assert_eq!(db.users().list(None).await.unwrap().len(), 3);
        assert_eq!(db.users().list(Some(Role::Staff)).await.unwrap().len(), 2);
        assert_eq!(db.users().list(Some(Role::Manager)).await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_set_password_rotates_hash() {
        let db = test_db().await;
        let user = db
            .users()
            .create("maria", "old-pw", "Maria", "Cruz", Role::Manager)
            .await
            .unwrap();

        db.users().set_password(&user.id, "new-pw").await.unwrap();

        assert!(db.users().authenticate("maria", "old-pw").await.is_err());
        assert!(db.users().authenticate("maria", "new-pw").await.is_ok());
    }

    #[tokio::test]
    async fn test_invalid_email_rejected_on_update() {
        let db = test_db().await;
        let mut user = db
            .users()
            .create("maria", "pw", "Maria", "Cruz", Role::Manager)
            .await
            .unwrap();

        user.email = Some("not-an-email".to_string());
        assert!(db.users().update(&user).await.is_err());

        user.email = Some("maria@example.com".to_string());
        db.users().update(&user).await.unwrap();
    }
}
