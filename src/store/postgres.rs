use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;

use crate::core::error::{ConfigError, Error};
use crate::store::CredentialStore;
use crate::types::{NewUser, Role, User, UserId};

const USER_COLUMNS: &str = "id, email, password_hash, role, is_verified";

#[derive(Clone, Debug)]
pub(crate) struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub(crate) async fn connect(database_url: &str) -> Result<Self, ConfigError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    pub(crate) async fn migrate(&self) -> Result<(), ConfigError> {
        sqlx::migrate!().run(&self.pool).await?;

        Ok(())
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, Error> {
        Ok(
            sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1;"))
                .bind(email)
                .try_map(map_user)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, Error> {
        Ok(
            sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1;"))
                .bind(id)
                .try_map(map_user)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn create(&self, user: NewUser) -> Result<User, Error> {
        match sqlx::query(&format!(
            "INSERT INTO users (email, password_hash, role, is_verified)
            VALUES ($1, $2, $3, $4)
            RETURNING {USER_COLUMNS};"
        ))
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.is_verified)
        .try_map(map_user)
        .fetch_one(&self.pool)
        .await
        {
            Ok(user) => Ok(user),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(Error::UserAlreadyExists)
            }
            Err(e) => Err(Error::Sql(e)),
        }
    }

    async fn update_password(&self, id: UserId, password_hash: &str) -> Result<(), Error> {
        let result = sqlx::query(
            "UPDATE users SET password_hash = $1, modified_at = now() WHERE id = $2;",
        )
        .bind(password_hash)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::UserNotFound);
        }

        Ok(())
    }

    async fn mark_verified(&self, id: UserId) -> Result<bool, Error> {
        let result = sqlx::query(
            "UPDATE users SET is_verified = TRUE, modified_at = now() WHERE id = $1;",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn list(&self) -> Result<Vec<User>, Error> {
        Ok(
            sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id;"))
                .try_map(map_user)
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn update_role(&self, id: UserId, role: Role) -> Result<Option<User>, Error> {
        Ok(sqlx::query(&format!(
            "UPDATE users SET role = $1, modified_at = now() WHERE id = $2 RETURNING {USER_COLUMNS};"
        ))
        .bind(role.as_str())
        .bind(id)
        .try_map(map_user)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn delete(&self, id: UserId) -> Result<bool, Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1;")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn consume_reset_token(
        &self,
        jti: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<bool, Error> {
        sqlx::query("DELETE FROM consumed_reset_tokens WHERE expires_at < now();")
            .execute(&self.pool)
            .await?;

        let result = sqlx::query(
            "INSERT INTO consumed_reset_tokens (jti, expires_at) VALUES ($1, $2)
            ON CONFLICT (jti) DO NOTHING;",
        )
        .bind(jti)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn release_reset_token(&self, jti: &str) -> Result<(), Error> {
        sqlx::query("DELETE FROM consumed_reset_tokens WHERE jti = $1;")
            .bind(jti)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

fn map_user(row: PgRow) -> Result<User, sqlx::Error> {
    let role: String = row.try_get("role")?;

    Ok(User {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        role: role.parse().map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
        is_verified: row.try_get("is_verified")?,
    })
}
