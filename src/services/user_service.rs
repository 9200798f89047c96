//! User service - registration, lookup and credential checks.
//!
//! Passwords are stored as `hex(HMAC-SHA256(key = salt, password))`. The salt
//! comes from configuration and is passed in by the caller.

use std::collections::HashMap;

use hmac::{Hmac, Mac};
use sha2::Sha256;
use uuid::Uuid;

use crate::{
    db::DbPool,
    error::AppError,
    middleware::check_user::OwnerLookup,
    models::user::{Credentials, DEFAULT_AVATAR_PATH, NewUser, User, UserResponse},
};

type HmacSha256 = Hmac<Sha256>;

fn password_mac(password: &str, salt: &str) -> HmacSha256 {
    // HMAC accepts keys of any length, including empty ones
    let mut mac = HmacSha256::new_from_slice(salt.as_bytes()).expect("HMAC key length is valid");
    mac.update(password.as_bytes());
    mac
}

/// Hash a password with the configured salt.
pub fn hash_password(password: &str, salt: &str) -> String {
    hex::encode(password_mac(password, salt).finalize().into_bytes())
}

/// Check a password against a stored digest in constant time.
pub fn verify_password(password: &str, salt: &str, password_hash: &str) -> bool {
    let Ok(expected) = hex::decode(password_hash) else {
        return false;
    };

    password_mac(password, salt).verify_slice(&expected).is_ok()
}

#[derive(Debug, Clone)]
pub struct UserService {
    pool: DbPool,
}

impl UserService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Register a new user with the default avatar.
    ///
    /// # Errors
    ///
    /// - `Database`: includes unique violations on `email`; callers check
    ///   [`find_by_email`](Self::find_by_email) first
    pub async fn create(&self, new_user: NewUser, salt: &str) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username, email, password_hash, avatar_path)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new_user.username)
        .bind(&new_user.email)
        .bind(hash_password(&new_user.password, salt))
        .bind(DEFAULT_AVATAR_PATH)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("New user created: {}", user.email);

        Ok(user)
    }

    pub async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Return the user registered under `new_user.email`, creating it first if
    /// no such user exists. Calling this twice yields the same record.
    pub async fn find_by_email_or_create(
        &self,
        new_user: NewUser,
        salt: &str,
    ) -> Result<User, AppError> {
        if let Some(existing) = self.find_by_email(&new_user.email).await? {
            return Ok(existing);
        }

        self.create(new_user, salt).await
    }

    /// Look up a user by email and check the password.
    ///
    /// Returns `None` both for unknown emails and for wrong passwords.
    pub async fn verify_user(
        &self,
        credentials: &Credentials,
        salt: &str,
    ) -> Result<Option<User>, AppError> {
        let Some(user) = self.find_by_email(&credentials.email).await? else {
            return Ok(None);
        };

        if verify_password(&credentials.password, salt, &user.password_hash) {
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }

    pub async fn update_avatar(&self, user_id: Uuid, avatar_path: &str) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET avatar_path = $1, updated_at = NOW() WHERE id = $2 RETURNING *",
        )
        .bind(avatar_path)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| {
            AppError::not_found(format!("User with id {} not found.", user_id), "UserService")
        })
    }

    /// Load the public view of every referenced user, keyed by id.
    ///
    /// Used to populate the `user` field of films and comments.
    pub async fn find_by_ids(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, UserResponse>, AppError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let users = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;

        Ok(users
            .into_iter()
            .map(|user| (user.id, UserResponse::from(user)))
            .collect())
    }

    /// Public view of a single user, if it still exists.
    pub async fn find_response(&self, user_id: Uuid) -> Result<Option<UserResponse>, AppError> {
        Ok(self.find_by_id(user_id).await?.map(UserResponse::from))
    }
}

/// A user record is owned by the user itself.
impl OwnerLookup for UserService {
    async fn find_owner(&self, id: Uuid) -> Result<Option<Uuid>, AppError> {
        Ok(self.find_by_id(id).await?.map(|user| user.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_depends_on_salt() {
        let first = hash_password("secret42", "salt-a");
        let second = hash_password("secret42", "salt-b");

        assert_eq!(first.len(), 64);
        assert_ne!(first, second);
        assert_eq!(first, hash_password("secret42", "salt-a"));
    }

    #[test]
    fn verifies_matching_password_only() {
        let hash = hash_password("secret42", "salt");

        assert!(verify_password("secret42", "salt", &hash));
        assert!(!verify_password("secret43", "salt", &hash));
        assert!(!verify_password("secret42", "other", &hash));
        assert!(!verify_password("secret42", "salt", "not-hex"));
    }
}
