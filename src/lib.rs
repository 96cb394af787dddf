pub(crate) mod controllers;
pub(crate) mod core;
pub(crate) mod mail;
pub(crate) mod routes;
pub(crate) mod store;
pub(crate) mod token;
pub(crate) mod types;
pub(crate) mod utils;

#[cfg(test)]
mod testing;

use std::sync::Arc;
use std::time::Duration;

use config::Config;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::core::error::ConfigError as Error;
use crate::core::{config::Args, state::AppState};
use crate::mail::smtp::SmtpMailer;
use crate::mail::{LogMailer, Mailer};
use crate::store::{CredentialStore, MemoryCredentialStore, PgCredentialStore};

pub async fn run() -> Result<(), Error> {
    let config = Config::builder()
        .add_source(config::Environment::with_prefix("YOLOHOME"))
        .build()
        .map_err(Error::Config)?;

    let config = config.try_deserialize::<Args>().map_err(Error::Config)?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_new(&config.log_level).unwrap_or_default())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let store: Arc<dyn CredentialStore> = match &config.database_url {
        Some(database_url) => {
            let store = PgCredentialStore::connect(database_url).await?;
            store.migrate().await?;
            Arc::new(store)
        }
        None => {
            tracing::warn!("no database_url configured, accounts are kept in memory");
            Arc::new(MemoryCredentialStore::default())
        }
    };

    let mailer: Arc<dyn Mailer> = match config.smtp() {
        Some(settings) => Arc::new(SmtpMailer::new(settings)?),
        None => {
            tracing::warn!("no smtp_host configured, outgoing mail is only logged");
            Arc::new(LogMailer)
        }
    };

    let state = AppState::new(&config, store, mailer)?;

    if let Some((email, password)) = config.bootstrap_admin() {
        state
            .auth_controller
            .bootstrap_admin(email, password)
            .await
            .map_err(Error::Bootstrap)?;
    }

    let app = routes::router::routes(
        state,
        config.requests_per_second,
        Duration::from_secs(config.request_timeout_secs),
    );

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .map_err(Error::IO)?;

    tracing::info!("listening on port {}", config.port);

    axum::serve(listener, app).await.map_err(Error::IO)?;

    Ok(())
}
