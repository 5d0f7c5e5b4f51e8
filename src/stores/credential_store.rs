use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version, password_hash::SaltString};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set, SqlErr,
};
use uuid::Uuid;

use crate::errors::InternalError;
use crate::errors::internal::CredentialError;
use crate::types::db::user::{self, ActiveModel, Entity as User};
use crate::types::internal::Role;

/// Fields required to create an account
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub display_name: String,
    pub role: Role,
}

/// Changes applied by the edit-user form; the username is immutable
#[derive(Debug, Clone)]
pub struct UserUpdate {
    pub display_name: String,
    pub role: Role,
    /// Re-hashed only when present and non-empty
    pub new_password: Option<String>,
}

/// CredentialStore manages user accounts and verifies login attempts
pub struct CredentialStore {
    password_pepper: String,
}

impl CredentialStore {
    /// Create a new CredentialStore
    ///
    /// # Arguments
    /// * `password_pepper` - Server-side secret mixed into every Argon2 hash; may be empty
    pub fn new(password_pepper: String) -> Self {
        Self { password_pepper }
    }

    fn argon2(&self) -> Result<Argon2<'_>, InternalError> {
        if self.password_pepper.is_empty() {
            return Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, Params::default()));
        }

        Argon2::new_with_secret(
            self.password_pepper.as_bytes(),
            Algorithm::Argon2id,
            Version::V0x13,
            Params::default(),
        )
        .map_err(|e| InternalError::crypto("argon2_init", e.to_string()))
    }

    /// Hash a password with Argon2id and a fresh random salt
    pub fn hash_password(&self, password: &str) -> Result<String, InternalError> {
        let salt = SaltString::generate(&mut rand_core::OsRng);

        let hash = self
            .argon2()?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| CredentialError::PasswordHashingFailed(e.to_string()))?
            .to_string();

        Ok(hash)
    }

    /// True iff `password` hashes to the stored credential of `user`
    pub fn verify(&self, user: &user::Model, password: &str) -> bool {
        let Ok(parsed_hash) = PasswordHash::new(&user.password_hash) else {
            tracing::warn!("Stored password hash for {} is malformed", user.username);
            return false;
        };

        match self.argon2() {
            Ok(argon2) => argon2.verify_password(password.as_bytes(), &parsed_hash).is_ok(),
            Err(e) => {
                tracing::error!("Failed to initialize Argon2: {}", e);
                false
            }
        }
    }

    /// Look a user up by exact, case-sensitive username
    pub async fn find_by_username(
        &self,
        conn: &impl ConnectionTrait,
        username: &str,
    ) -> Result<Option<user::Model>, InternalError> {
        User::find()
            .filter(user::Column::Username.eq(username))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_user_by_username", e))
    }

    pub async fn find_by_id(
        &self,
        conn: &impl ConnectionTrait,
        user_id: &str,
    ) -> Result<Option<user::Model>, InternalError> {
        User::find_by_id(user_id.to_string())
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_user_by_id", e))
    }

    /// All accounts ordered by username
    pub async fn list_users(&self, conn: &impl ConnectionTrait) -> Result<Vec<user::Model>, InternalError> {
        User::find()
            .order_by_asc(user::Column::Username)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_users", e))
    }

    pub async fn count_users(&self, conn: &impl ConnectionTrait) -> Result<u64, InternalError> {
        User::find()
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_users", e))
    }

    /// Verify a login attempt
    ///
    /// # Returns
    /// * `Ok(Model)` - The matching user
    /// * `Err(InternalError)` - InvalidCredentials when the user is unknown or the password is wrong
    pub async fn verify_credentials(
        &self,
        conn: &impl ConnectionTrait,
        username: &str,
        password: &str,
    ) -> Result<user::Model, InternalError> {
        let user = self
            .find_by_username(conn, username)
            .await?
            .ok_or(CredentialError::InvalidCredentials)?;

        if !self.verify(&user, password) {
            return Err(CredentialError::InvalidCredentials.into());
        }

        Ok(user)
    }

    /// Create a new account
    ///
    /// # Returns
    /// * `Ok(String)` - The id (UUID) of the created user
    /// * `Err(InternalError)` - DuplicateUsername if the username is taken, EmptyPassword, or a database error
    pub async fn create_user(
        &self,
        conn: &impl ConnectionTrait,
        new_user: NewUser,
    ) -> Result<String, InternalError> {
        if new_user.password.is_empty() {
            return Err(CredentialError::EmptyPassword.into());
        }

        if self.find_by_username(conn, &new_user.username).await?.is_some() {
            return Err(CredentialError::DuplicateUsername(new_user.username).into());
        }

        let user_id = Uuid::new_v4().to_string();
        let password_hash = self.hash_password(&new_user.password)?;
        let now = Utc::now().timestamp();

        let model = ActiveModel {
            id: Set(user_id.clone()),
            username: Set(new_user.username.clone()),
            password_hash: Set(password_hash),
            display_name: Set(new_user.display_name),
            role: Set(new_user.role.as_str().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        model
            .insert(conn)
            .await
            .map_err(|e| insert_error(&new_user.username, e))?;

        tracing::info!("Created user {} with role {}", new_user.username, new_user.role);

        Ok(user_id)
    }

    /// Update display name, role and optionally the password of an account
    pub async fn update_user(
        &self,
        conn: &impl ConnectionTrait,
        user_id: &str,
        update: UserUpdate,
    ) -> Result<(), InternalError> {
        let user = self
            .find_by_id(conn, user_id)
            .await?
            .ok_or_else(|| CredentialError::UserNotFound(user_id.to_string()))?;

        let mut model: ActiveModel = user.into();
        model.display_name = Set(update.display_name);
        model.role = Set(update.role.as_str().to_string());
        if let Some(password) = update.new_password.filter(|p| !p.is_empty()) {
            model.password_hash = Set(self.hash_password(&password)?);
        }
        model.updated_at = Set(Utc::now().timestamp());

        model
            .update(conn)
            .await
            .map_err(|e| InternalError::database("update_user", e))?;

        Ok(())
    }

    /// Delete an account on behalf of `requester_id`
    ///
    /// # Returns
    /// * `Ok(bool)` - Whether a row was removed
    /// * `Err(InternalError)` - SelfDeletion when a user targets their own account
    pub async fn delete_user(
        &self,
        conn: &impl ConnectionTrait,
        user_id: &str,
        requester_id: &str,
    ) -> Result<bool, InternalError> {
        if user_id == requester_id {
            return Err(CredentialError::SelfDeletion.into());
        }

        let result = User::delete_by_id(user_id.to_string())
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_user", e))?;

        Ok(result.rows_affected > 0)
    }
}

/// A unique violation means a concurrent insert of the same username won
fn insert_error(username: &str, err: DbErr) -> InternalError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => CredentialError::DuplicateUsername(username.to_string()).into(),
        _ => InternalError::database("create_user", err),
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("password_pepper", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{Database, DatabaseConnection};

    async fn setup_test_db() -> (DatabaseConnection, CredentialStore) {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");

        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        let credential_store = CredentialStore::new("test-pepper-for-unit-tests".to_string());

        (db, credential_store)
    }

    fn new_user(username: &str, password: &str, role: Role) -> NewUser {
        NewUser {
            username: username.to_string(),
            password: password.to_string(),
            display_name: format!("{} display", username),
            role,
        }
    }

    #[tokio::test]
    async fn test_create_user_hashes_password() {
        let (db, store) = setup_test_db().await;

        store
            .create_user(&db, new_user("testuser", "mysecretpassword", Role::Viewer))
            .await
            .expect("Failed to create user");

        let user = store
            .find_by_username(&db, "testuser")
            .await
            .unwrap()
            .expect("User not found");

        assert_ne!(user.password_hash, "mysecretpassword");
        assert!(user.password_hash.starts_with("$argon2id"));
        assert_eq!(user.role, "viewer");
        assert_eq!(user.display_name, "testuser display");
    }

    #[tokio::test]
    async fn test_verify_credentials_accepts_correct_password() {
        let (db, store) = setup_test_db().await;

        let user_id = store
            .create_user(&db, new_user("validuser", "correctpass", Role::Editor))
            .await
            .unwrap();

        let user = store.verify_credentials(&db, "validuser", "correctpass").await.unwrap();
        assert_eq!(user.id, user_id);
    }

    #[tokio::test]
    async fn test_verify_credentials_rejects_wrong_password_and_unknown_user() {
        let (db, store) = setup_test_db().await;

        store
            .create_user(&db, new_user("validuser", "correctpass", Role::Editor))
            .await
            .unwrap();

        let wrong = store.verify_credentials(&db, "validuser", "wrongpass").await;
        assert!(matches!(wrong, Err(InternalError::Credential(CredentialError::InvalidCredentials))));

        let unknown = store.verify_credentials(&db, "nobody", "correctpass").await;
        assert!(matches!(unknown, Err(InternalError::Credential(CredentialError::InvalidCredentials))));
    }

    #[tokio::test]
    async fn test_username_lookup_is_case_sensitive() {
        let (db, store) = setup_test_db().await;

        store.create_user(&db, new_user("Reza", "pw", Role::Viewer)).await.unwrap();

        assert!(store.find_by_username(&db, "Reza").await.unwrap().is_some());
        assert!(store.find_by_username(&db, "reza").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_pepper_is_part_of_the_hash() {
        let (db, store) = setup_test_db().await;

        store.create_user(&db, new_user("peppered", "pw", Role::Viewer)).await.unwrap();
        let user = store.find_by_username(&db, "peppered").await.unwrap().unwrap();

        let other_pepper = CredentialStore::new("another-pepper".to_string());
        assert!(store.verify(&user, "pw"));
        assert!(!other_pepper.verify(&user, "pw"));
    }

    #[tokio::test]
    async fn test_empty_password_is_rejected() {
        let (db, store) = setup_test_db().await;

        let result = store.create_user(&db, new_user("nopass", "", Role::Viewer)).await;
        assert!(matches!(result, Err(InternalError::Credential(CredentialError::EmptyPassword))));
        assert_eq!(store.count_users(&db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_user_keeps_password_when_blank() {
        let (db, store) = setup_test_db().await;

        let id = store.create_user(&db, new_user("editme", "original", Role::Viewer)).await.unwrap();

        store
            .update_user(&db, &id, UserUpdate {
                display_name: "New Name".to_string(),
                role: Role::Editor,
                new_password: Some(String::new()),
            })
            .await
            .unwrap();

        let user = store.find_by_id(&db, &id).await.unwrap().unwrap();
        assert_eq!(user.display_name, "New Name");
        assert_eq!(user.role, "editor");
        assert!(store.verify(&user, "original"));

        store
            .update_user(&db, &id, UserUpdate {
                display_name: "New Name".to_string(),
                role: Role::Editor,
                new_password: Some("changed".to_string()),
            })
            .await
            .unwrap();

        let user = store.find_by_id(&db, &id).await.unwrap().unwrap();
        assert!(store.verify(&user, "changed"));
        assert!(!store.verify(&user, "original"));
    }

    #[tokio::test]
    async fn test_unique_violation_maps_to_duplicate_username() {
        let (db, store) = setup_test_db().await;
        let id = store
            .create_user(&db, new_user("testuser", "pw", Role::Viewer))
            .await
            .unwrap();
        let existing = store.find_by_id(&db, &id).await.unwrap().unwrap();

        // Same username under a fresh id, skipping the lookup in create_user
        let clash = ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            ..existing.into()
        };
        let err = clash.insert(&db).await.unwrap_err();

        assert!(matches!(
            insert_error("testuser", err),
            InternalError::Credential(CredentialError::DuplicateUsername(ref name)) if name == "testuser"
        ));
    }

    #[tokio::test]
    async fn test_update_missing_user_fails() {
        let (db, store) = setup_test_db().await;

        let result = store
            .update_user(&db, "missing", UserUpdate {
                display_name: "x".to_string(),
                role: Role::Viewer,
                new_password: None,
            })
            .await;

        assert!(matches!(result, Err(InternalError::Credential(CredentialError::UserNotFound(_)))));
    }

    #[tokio::test]
    async fn test_delete_user_is_idempotent() {
        let (db, store) = setup_test_db().await;

        let admin = store.create_user(&db, new_user("admin", "pw", Role::Admin)).await.unwrap();
        let victim = store.create_user(&db, new_user("victim", "pw", Role::Viewer)).await.unwrap();

        assert!(store.delete_user(&db, &victim, &admin).await.unwrap());
        assert!(!store.delete_user(&db, &victim, &admin).await.unwrap());
        assert_eq!(store.list_users(&db).await.unwrap().len(), 1);
    }
}
