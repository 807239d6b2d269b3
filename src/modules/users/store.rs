use sqlx::SqlitePool;

use crate::error::StoreError;

use super::models::{NewUser, User};

/// SQL-backed account store. Passwords are bcrypt-hashed before they reach
/// the database; hashing runs on the blocking pool since a cost-12 round
/// takes long enough to stall the async executor.
#[derive(Clone)]
pub struct UserStore {
    pool: SqlitePool,
    bcrypt_cost: u32,
}

impl UserStore {
    pub fn new(pool: SqlitePool, bcrypt_cost: u32) -> Self {
        Self { pool, bcrypt_cost }
    }

    /// Validate and register a new account.
    ///
    /// The pre-insert email lookup exists for the friendly error; the UNIQUE
    /// constraint on `users.email` is what actually guarantees uniqueness,
    /// so a concurrent duplicate insert still surfaces as [`StoreError::DuplicateEmail`].
    pub async fn register(&self, new: NewUser) -> Result<User, StoreError> {
        let first_name = require(&new.first_name, "firstName", "First name must not be blank")?;
        let last_name = require(&new.last_name, "lastName", "Last name must not be blank")?;
        let email = require(&new.email, "email", "Email must not be blank")?;

        let password = match &new.password {
            Some(p) if p.len() >= 8 => p.clone(),
            _ => {
                return Err(StoreError::invalid_input(
                    "password",
                    "Password must be at least 8 characters long",
                ))
            }
        };

        let taken: Option<i64> = sqlx::query_scalar("SELECT 1 FROM users WHERE email = ?")
            .bind(&email)
            .fetch_optional(&self.pool)
            .await?;
        if taken.is_some() {
            return Err(StoreError::DuplicateEmail);
        }

        let cost = self.bcrypt_cost;
        let password_hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(anyhow::Error::new)?
            .map_err(anyhow::Error::new)?;

        let inserted = sqlx::query_as::<_, User>(
            "INSERT INTO users (first_name, last_name, email, hashed_password)
             VALUES (?, ?, ?, ?)
             RETURNING id, first_name, last_name, email",
        )
        .bind(&first_name)
        .bind(&last_name)
        .bind(&email)
        .bind(&password_hash)
        .fetch_one(&self.pool)
        .await;

        match inserted {
            Ok(user) => {
                tracing::info!(user_id = user.id, "user registered");
                Ok(user)
            }
            Err(err) if bookshelf_db::is_unique_violation(&err) => Err(StoreError::DuplicateEmail),
            Err(err) => Err(err.into()),
        }
    }
}

fn require(value: &Option<String>, field: &str, message: &str) -> Result<String, StoreError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.clone()),
        _ => Err(StoreError::invalid_input(field, message)),
    }
}

#[cfg(test)]
mod tests {
    use bookshelf_kernel::Module;

    use crate::modules::users::UsersModule;

    use super::*;

    // Cost 4 keeps the hashing rounds fast; production cost comes from settings.
    async fn store() -> UserStore {
        let pool = bookshelf_db::connect_memory().await.unwrap();
        let migrations: Vec<_> = UsersModule::new(pool.clone(), 4)
            .migrations()
            .into_iter()
            .map(|m| ("users".to_string(), m))
            .collect();
        bookshelf_db::run_migrations(&pool, &migrations).await.unwrap();
        UserStore::new(pool, 4)
    }

    fn alice() -> NewUser {
        NewUser {
            first_name: Some("Alice".to_string()),
            last_name: Some("Liddell".to_string()),
            email: Some("alice@example.com".to_string()),
            password: Some("wonderland".to_string()),
        }
    }

    #[tokio::test]
    async fn register_returns_user_without_password() {
        let store = store().await;

        let user = store.register(alice()).await.unwrap();
        assert_eq!(user.email, "alice@example.com");
        assert!(user.id >= 1);

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["firstName"], "Alice");
    }

    #[tokio::test]
    async fn stored_password_is_a_verifiable_bcrypt_hash() {
        let store = store().await;
        let user = store.register(alice()).await.unwrap();

        let hash: String = sqlx::query_scalar("SELECT hashed_password FROM users WHERE id = ?")
            .bind(user.id)
            .fetch_one(&store.pool)
            .await
            .unwrap();

        assert_ne!(hash, "wonderland");
        assert!(bcrypt::verify("wonderland", &hash).unwrap());
    }

    #[tokio::test]
    async fn validation_reports_first_missing_field_in_order() {
        let store = store().await;

        let err = store.register(NewUser::default()).await.unwrap_err();
        match err {
            StoreError::InvalidInput { field, message } => {
                assert_eq!(field, "firstName");
                assert_eq!(message, "First name must not be blank");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err = store
            .register(NewUser {
                last_name: Some("".to_string()),
                ..alice()
            })
            .await
            .unwrap_err();
        match err {
            StoreError::InvalidInput { field, message } => {
                assert_eq!(field, "lastName");
                assert_eq!(message, "Last name must not be blank");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn short_password_is_rejected() {
        let store = store().await;

        let err = store
            .register(NewUser {
                password: Some("short".to_string()),
                ..alice()
            })
            .await
            .unwrap_err();

        match err {
            StoreError::InvalidInput { field, message } => {
                assert_eq!(field, "password");
                assert_eq!(message, "Password must be at least 8 characters long");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let store = store().await;
        store.register(alice()).await.unwrap();

        let err = store
            .register(NewUser {
                first_name: Some("Another".to_string()),
                ..alice()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::DuplicateEmail));
    }

    #[tokio::test]
    async fn unique_constraint_backstops_the_precheck() {
        let store = store().await;
        store.register(alice()).await.unwrap();

        // Bypass the advisory lookup and hit the constraint directly.
        let err = sqlx::query(
            "INSERT INTO users (first_name, last_name, email, hashed_password)
             VALUES ('A', 'B', 'alice@example.com', 'x')",
        )
        .execute(&store.pool)
        .await
        .unwrap_err();

        assert!(bookshelf_db::is_unique_violation(&err));
    }
}
