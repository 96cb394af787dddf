//! Credential store: the persistence seam for user rows and consumed reset tokens.

pub(crate) mod memory;
pub(crate) mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::core::error::Error;
use crate::types::{NewUser, Role, User, UserId};

pub(crate) use memory::MemoryCredentialStore;
pub(crate) use postgres::PgCredentialStore;

#[async_trait]
pub(crate) trait CredentialStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, Error>;

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, Error>;

    /// Fails with [`Error::UserAlreadyExists`] when the email is taken.
    async fn create(&self, user: NewUser) -> Result<User, Error>;

    async fn update_password(&self, id: UserId, password_hash: &str) -> Result<(), Error>;

    /// Returns `false` when no row has this id.
    async fn mark_verified(&self, id: UserId) -> Result<bool, Error>;

    async fn list(&self) -> Result<Vec<User>, Error>;

    async fn update_role(&self, id: UserId, role: Role) -> Result<Option<User>, Error>;

    /// Returns `false` when no row has this id.
    async fn delete(&self, id: UserId) -> Result<bool, Error>;

    /// Records `jti` as used. Returns `true` only for the first caller; the
    /// check and the insert happen as one step.
    async fn consume_reset_token(
        &self,
        jti: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<bool, Error>;

    /// Forgets a consumed `jti` so the token can be used again.
    async fn release_reset_token(&self, jti: &str) -> Result<(), Error>;
}
