use std::sync::Arc;

use tracing::instrument;

use crate::core::error::Error;
use crate::store::CredentialStore;
use crate::token::Claims;
use crate::types::{Role, User, UserId, UserSummary};

/// Account administration over the credential store.
#[derive(Clone)]
pub(crate) struct UserController {
    store: Arc<dyn CredentialStore>,
}

impl std::fmt::Debug for UserController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserController").finish_non_exhaustive()
    }
}

impl UserController {
    pub(crate) fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// Re-reads the token's subject so a demoted or deleted admin loses access
    /// before their session expires.
    pub(crate) async fn authorize_admin(&self, session: &Claims) -> Result<User, Error> {
        let user = self
            .store
            .find_by_id(session.id)
            .await?
            .ok_or(Error::Unauthorized)?;

        if user.role != Role::Admin {
            return Err(Error::Forbidden);
        }

        Ok(user)
    }

    pub(crate) async fn list(&self) -> Result<Vec<UserSummary>, Error> {
        Ok(self
            .store
            .list()
            .await?
            .iter()
            .map(UserSummary::from)
            .collect())
    }

    #[instrument(skip_all, fields(actor = actor.id, target = id))]
    pub(crate) async fn set_role(
        &self,
        actor: &User,
        id: UserId,
        role: Role,
    ) -> Result<UserSummary, Error> {
        if actor.id == id {
            return Err(Error::Validation("You cannot change your own role.".into()));
        }

        let user = self
            .store
            .update_role(id, role)
            .await?
            .ok_or(Error::UserNotFound)?;

        tracing::info!(%role, "role updated");

        Ok(UserSummary::from(&user))
    }

    #[instrument(skip_all, fields(actor = actor.id, target = id))]
    pub(crate) async fn delete(&self, actor: &User, id: UserId) -> Result<(), Error> {
        if actor.id == id {
            return Err(Error::Validation("You cannot delete your own account.".into()));
        }

        if !self.store.delete(id).await? {
            return Err(Error::UserNotFound);
        }

        tracing::info!("user deleted");

        Ok(())
    }
}
