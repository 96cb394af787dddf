use serde::Deserialize;

use crate::core::error::ConfigError;
use crate::mail::smtp::SmtpSettings;
use crate::utils::password::DEFAULT_BCRYPT_COST;

/// Settings read from `YOLOHOME_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub(crate) struct Args {
    #[serde(default = "default_log_level")]
    pub(crate) log_level: String,
    #[serde(default = "default_port")]
    pub(crate) port: u16,
    secret: Option<String>,
    pub(crate) base_url: String,
    pub(crate) database_url: Option<String>,
    #[serde(default = "default_bcrypt_cost")]
    pub(crate) bcrypt_cost: u32,
    pub(crate) smtp_host: Option<String>,
    #[serde(default = "default_smtp_port")]
    pub(crate) smtp_port: u16,
    pub(crate) smtp_username: Option<String>,
    pub(crate) smtp_password: Option<String>,
    #[serde(default = "default_mail_from")]
    pub(crate) mail_from: String,
    #[serde(default = "default_requests_per_second")]
    pub(crate) requests_per_second: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub(crate) request_timeout_secs: u64,
    pub(crate) admin_email: Option<String>,
    pub(crate) admin_password: Option<String>,
}

impl Args {
    /// The signing secret. There is no fallback value.
    pub(crate) fn secret(&self) -> Result<String, ConfigError> {
        match self.secret.as_deref().map(str::trim) {
            Some(secret) if !secret.is_empty() => Ok(secret.to_owned()),
            _ => Err(ConfigError::MissingSecret),
        }
    }

    pub(crate) fn smtp(&self) -> Option<SmtpSettings> {
        self.smtp_host.as_ref().map(|host| SmtpSettings {
            host: host.clone(),
            port: self.smtp_port,
            username: self.smtp_username.clone(),
            password: self.smtp_password.clone(),
            from: self.mail_from.clone(),
        })
    }

    pub(crate) fn bootstrap_admin(&self) -> Option<(&str, &str)> {
        match (&self.admin_email, &self.admin_password) {
            (Some(email), Some(password)) => Some((email.as_str(), password.as_str())),
            _ => None,
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}

fn default_port() -> u16 {
    3000
}

fn default_bcrypt_cost() -> u32 {
    DEFAULT_BCRYPT_COST
}

fn default_smtp_port() -> u16 {
    587
}

fn default_mail_from() -> String {
    "Yolo Home <no-reply@yolohome.local>".into()
}

fn default_requests_per_second() -> u64 {
    10
}

fn default_request_timeout_secs() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{Config, File, FileFormat};

    fn parse(toml: &str) -> Args {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn defaults_fill_in_optional_settings() {
        let args = parse(r#"
            secret = "s3cret"
            base_url = "http://localhost:3000"
        "#);

        assert_eq!(args.port, 3000);
        assert_eq!(args.bcrypt_cost, 10);
        assert_eq!(args.secret().unwrap(), "s3cret");
        assert!(args.database_url.is_none());
        assert!(args.smtp().is_none());
        assert!(args.bootstrap_admin().is_none());
    }

    #[test]
    fn a_missing_or_blank_secret_is_fatal() {
        let missing = parse(r#"base_url = "http://localhost:3000""#);
        let blank = parse(r#"
            secret = "  "
            base_url = "http://localhost:3000"
        "#);

        assert!(matches!(missing.secret(), Err(ConfigError::MissingSecret)));
        assert!(matches!(blank.secret(), Err(ConfigError::MissingSecret)));
    }

    #[test]
    fn smtp_is_enabled_by_its_host() {
        let args = parse(r#"
            secret = "s3cret"
            base_url = "http://localhost:3000"
            smtp_host = "smtp.example.com"
            smtp_username = "mailer"
            smtp_password = "app-password"
        "#);

        let smtp = args.smtp().unwrap();
        assert_eq!(smtp.host, "smtp.example.com");
        assert_eq!(smtp.port, 587);
        assert_eq!(smtp.username.as_deref(), Some("mailer"));
    }
}
