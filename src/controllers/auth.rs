use std::sync::Arc;

use tracing::instrument;

use crate::core::error::{ConfigError, Error};
use crate::mail::NotificationGateway;
use crate::store::CredentialStore;
use crate::token::{Claims, Purpose, TokenService};
use crate::types::{NewUser, PublicUser, Role, User};
use crate::utils::password::PasswordHasher;
use crate::utils::validate::{canonical_email, Validator};

pub(crate) const SIGNUP_MESSAGE: &str =
    "User created successfully. Please check your email to verify your account.";
pub(crate) const FORGOT_PASSWORD_MESSAGE: &str =
    "If an account with that email exists, a password reset link has been sent.";
pub(crate) const SAME_PASSWORD_MESSAGE: &str =
    "New password must be different from the current password.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Session {
    pub(crate) token: String,
    pub(crate) user: PublicUser,
}

#[derive(Clone)]
pub(crate) struct AuthController {
    store: Arc<dyn CredentialStore>,
    tokens: TokenService,
    notifier: NotificationGateway,
    hasher: PasswordHasher,
    validator: Validator,
}

impl std::fmt::Debug for AuthController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthController")
            .field("notifier", &self.notifier)
            .field("hasher", &self.hasher)
            .finish_non_exhaustive()
    }
}

impl AuthController {
    pub(crate) fn new(
        store: Arc<dyn CredentialStore>,
        tokens: TokenService,
        notifier: NotificationGateway,
        hasher: PasswordHasher,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            store,
            tokens,
            notifier,
            hasher,
            validator: Validator::new()?,
        })
    }

    /// Creates an unverified account and mails its verification link. If the
    /// link cannot be issued or delivered the new row is removed again.
    #[instrument(skip_all)]
    pub(crate) async fn signup(&self, email: &str, password: &str) -> Result<User, Error> {
        let email = self.validator.email(email)?;

        if self.store.find_by_email(&email).await?.is_some() {
            return Err(Error::UserAlreadyExists);
        }

        self.validator.new_password(password)?;

        let password_hash = self.hasher.hash(password).await?;

        let user = self
            .store
            .create(NewUser {
                email,
                password_hash,
                role: Role::User,
                is_verified: false,
            })
            .await?;

        if let Err(e) = self.send_verification(&user).await {
            tracing::warn!(user_id = user.id, "verification email failed, removing new account");

            if let Err(cleanup) = self.store.delete(user.id).await {
                tracing::error!(user_id = user.id, "could not remove account: {:?}", cleanup);
            }

            return Err(e);
        }

        tracing::info!(user_id = user.id, "user signed up");

        Ok(user)
    }

    async fn send_verification(&self, user: &User) -> Result<(), Error> {
        let purpose = Purpose::Verification;
        let token = self.tokens.issue(&Claims::verification(user), purpose.ttl())?;

        self.notifier.send_verification(&user.email, &token).await
    }

    /// Unknown email and wrong password are indistinguishable; an unverified
    /// account is refused whether or not the password matched.
    #[instrument(skip_all)]
    pub(crate) async fn login(&self, email: &str, password: &str) -> Result<Session, Error> {
        let email = canonical_email(email);

        let user = match self.store.find_by_email(&email).await? {
            Some(user) => user,
            None => {
                self.hasher.verify_absent(password).await?;
                return Err(Error::InvalidCredentials);
            }
        };

        let matched = self.hasher.verify(password, &user.password_hash).await?;

        if !user.is_verified {
            return Err(Error::Unverified);
        }

        if !matched {
            return Err(Error::InvalidCredentials);
        }

        let purpose = Purpose::Session;
        let token = self.tokens.issue(&Claims::session(&user), purpose.ttl())?;

        tracing::info!(user_id = user.id, "user logged in");

        Ok(Session {
            token,
            user: PublicUser::from(&user),
        })
    }

    /// Mails a reset link to verified accounts only. The caller sees the same
    /// outcome for unknown, unverified and verified emails unless delivery fails.
    #[instrument(skip_all)]
    pub(crate) async fn forgot_password(&self, email: &str) -> Result<(), Error> {
        let email = canonical_email(email);

        match self.store.find_by_email(&email).await? {
            Some(user) if user.is_verified => {
                let purpose = Purpose::PasswordReset;
                let token = self
                    .tokens
                    .issue(&Claims::password_reset(&user), purpose.ttl())?;

                self.notifier
                    .send_password_reset(&user.email, &token)
                    .await?;

                tracing::info!(user_id = user.id, "password reset link sent");
            }
            _ => tracing::debug!("password reset requested for unknown or unverified account"),
        }

        Ok(())
    }

    /// `session` is the verified bearer token; its subject is the only account touched.
    #[instrument(skip_all, fields(user_id = session.id))]
    pub(crate) async fn change_password(
        &self,
        session: &Claims,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), Error> {
        let user = self
            .store
            .find_by_id(session.id)
            .await?
            .ok_or(Error::UserNotFound)?;

        if !self
            .hasher
            .verify(current_password, &user.password_hash)
            .await?
        {
            return Err(Error::WrongPassword);
        }

        if current_password == new_password {
            return Err(Error::Validation(SAME_PASSWORD_MESSAGE.into()));
        }

        self.validator.new_password(new_password)?;

        let password_hash = self.hasher.hash(new_password).await?;
        self.store.update_password(user.id, &password_hash).await?;

        tracing::info!("password changed");

        Ok(())
    }

    /// Every failure to identify the account collapses into [`Error::InvalidToken`].
    #[instrument(skip_all)]
    pub(crate) async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), Error> {
        let verified = self
            .tokens
            .verify_for(token, Purpose::PasswordReset)
            .ok_or(Error::InvalidToken)?;

        self.validator.new_password(new_password)?;

        let jti = verified.claims.jti.as_deref().ok_or(Error::InvalidToken)?;

        let user = self
            .store
            .find_by_id(verified.claims.id)
            .await?
            .ok_or(Error::InvalidToken)?;

        let password_hash = self.hasher.hash(new_password).await?;

        if !self
            .store
            .consume_reset_token(jti, verified.expires_at)
            .await?
        {
            tracing::warn!(user_id = user.id, "reset token replayed");
            return Err(Error::InvalidToken);
        }

        if let Err(e) = self.store.update_password(user.id, &password_hash).await {
            if let Err(release) = self.store.release_reset_token(jti).await {
                tracing::error!(user_id = user.id, "could not release reset token: {:?}", release);
            }

            return Err(e);
        }

        tracing::info!(user_id = user.id, "password reset");

        Ok(())
    }

    #[instrument(skip_all)]
    pub(crate) async fn verify_email(&self, token: &str) -> Result<(), Error> {
        let verified = self
            .tokens
            .verify_for(token, Purpose::Verification)
            .ok_or(Error::InvalidToken)?;

        let user = self
            .store
            .find_by_id(verified.claims.id)
            .await?
            .ok_or(Error::InvalidToken)?;

        if verified.claims.email.as_deref() != Some(user.email.as_str()) {
            return Err(Error::InvalidToken);
        }

        if !self.store.mark_verified(user.id).await? {
            return Err(Error::InvalidToken);
        }

        tracing::info!(user_id = user.id, "email verified");

        Ok(())
    }

    pub(crate) fn authenticate(&self, token: &str) -> Result<Claims, Error> {
        self.tokens
            .verify_for(token, Purpose::Session)
            .map(|verified| verified.claims)
            .ok_or(Error::Unauthorized)
    }

    /// Creates a verified admin unless the email is already registered.
    pub(crate) async fn bootstrap_admin(&self, email: &str, password: &str) -> Result<(), Error> {
        let email = self.validator.email(email)?;
        self.validator.new_password(password)?;

        if self.store.find_by_email(&email).await?.is_some() {
            tracing::debug!("bootstrap admin already present");
            return Ok(());
        }

        let password_hash = self.hasher.hash(password).await?;

        let user = self
            .store
            .create(NewUser {
                email,
                password_hash,
                role: Role::Admin,
                is_verified: true,
            })
            .await?;

        tracing::info!(user_id = user.id, "bootstrap admin created");

        Ok(())
    }
}
