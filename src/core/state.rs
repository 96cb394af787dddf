use std::sync::Arc;

use crate::controllers::auth::AuthController;
use crate::controllers::user::UserController;
use crate::core::config::Args;
use crate::core::error::ConfigError;
use crate::mail::{Mailer, NotificationGateway};
use crate::store::CredentialStore;
use crate::token::TokenService;
use crate::utils::password::PasswordHasher;

#[derive(Clone, Debug)]
pub(crate) struct AppState {
    pub(crate) auth_controller: AuthController,
    pub(crate) user_controller: UserController,
}

impl AppState {
    pub(crate) fn new(
        config: &Args,
        store: Arc<dyn CredentialStore>,
        mailer: Arc<dyn Mailer>,
    ) -> Result<Self, ConfigError> {
        let tokens = TokenService::new(&config.secret()?)?;
        let notifier = NotificationGateway::new(mailer, config.base_url.clone());
        let hasher = PasswordHasher::new(config.bcrypt_cost)?;

        Ok(AppState {
            auth_controller: AuthController::new(store.clone(), tokens, notifier, hasher)?,
            user_controller: UserController::new(store),
        })
    }
}
