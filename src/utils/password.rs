//! Password hashing via bcrypt, run off the async executor.

use crate::core::error::{ConfigError, Error};

pub(crate) const DEFAULT_BCRYPT_COST: u32 = 10;
pub(crate) const MIN_BCRYPT_COST: u32 = 4;
const MAX_BCRYPT_COST: u32 = 31;

#[derive(Clone)]
pub(crate) struct PasswordHasher {
    cost: u32,
    // checked in place of a real hash for unknown accounts
    dummy_hash: String,
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher")
            .field("cost", &self.cost)
            .finish()
    }
}

impl PasswordHasher {
    pub(crate) fn new(cost: u32) -> Result<Self, ConfigError> {
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&cost) {
            return Err(ConfigError::InvalidBcryptCost(cost));
        }

        Ok(Self {
            cost,
            dummy_hash: bcrypt::hash("yolohome-dummy-password", cost)?,
        })
    }

    pub(crate) async fn hash(&self, password: &str) -> Result<String, Error> {
        let password = password.to_owned();
        let cost = self.cost;

        Ok(tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??)
    }

    pub(crate) async fn verify(&self, password: &str, hash: &str) -> Result<bool, Error> {
        let password = password.to_owned();
        let hash = hash.to_owned();

        Ok(tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await??)
    }

    /// Burns the same work as [`verify`](Self::verify) and always reports a mismatch.
    pub(crate) async fn verify_absent(&self, password: &str) -> Result<bool, Error> {
        self.verify(password, &self.dummy_hash).await?;

        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hashes_are_salted_and_verifiable() {
        let hasher = PasswordHasher::new(MIN_BCRYPT_COST).unwrap();

        let first = hasher.hash("secret1").await.unwrap();
        let second = hasher.hash("secret1").await.unwrap();

        assert_ne!(first, "secret1");
        assert_ne!(first, second);
        assert!(hasher.verify("secret1", &first).await.unwrap());
        assert!(!hasher.verify("secret2", &first).await.unwrap());
    }

    #[tokio::test]
    async fn absent_accounts_never_match() {
        let hasher = PasswordHasher::new(MIN_BCRYPT_COST).unwrap();

        assert!(!hasher.verify_absent("yolohome-dummy-password").await.unwrap());
    }

    #[test]
    fn cost_is_range_checked() {
        assert!(matches!(
            PasswordHasher::new(2),
            Err(ConfigError::InvalidBcryptCost(2))
        ));
        assert!(PasswordHasher::new(DEFAULT_BCRYPT_COST).is_ok());
    }
}
