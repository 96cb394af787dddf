use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{BoxError, Json};

use crate::mail::MailError;
use crate::types::response::Message;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("No signing secret configured (set YOLOHOME_SECRET)")]
    MissingSecret,
    #[error("bcrypt cost must be between 4 and 31, got {0}")]
    InvalidBcryptCost(u32),
    #[error("Bcrypt error: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),
    #[error("Database migration error: {0}")]
    DatabaseMigration(#[from] sqlx::migrate::MigrateError),
    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),
    #[error("SQL error: {0}")]
    Sql(#[from] sqlx::Error),
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
    #[error("Invalid mailbox: {0}")]
    Mailbox(#[from] lettre::address::AddressError),
    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
    #[error("Bootstrap error: {0}")]
    Bootstrap(#[source] Error),
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Invalid request body: {0}")]
    Body(#[from] JsonRejection),
    #[error("Invalid path: {0}")]
    Path(#[from] PathRejection),
    #[error("User already exists")]
    UserAlreadyExists,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Email not verified")]
    Unverified,
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Wrong current password")]
    WrongPassword,
    #[error("Forbidden")]
    Forbidden,
    #[error("User not found")]
    UserNotFound,
    #[error("Invalid or expired token")]
    InvalidToken,
    #[error("Delivery error: {0}")]
    Delivery(#[from] MailError),
    #[error("SQL error: {0}")]
    Sql(#[from] sqlx::Error),
    #[error("Bcrypt error: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("Blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    pub(crate) fn status(&self) -> StatusCode {
        match self {
            Error::Validation(_)
            | Error::Body(_)
            | Error::Path(_)
            | Error::UserAlreadyExists
            | Error::InvalidCredentials
            | Error::InvalidToken => StatusCode::BAD_REQUEST,
            Error::Unauthorized => StatusCode::UNAUTHORIZED,
            Error::Unverified | Error::WrongPassword | Error::Forbidden => StatusCode::FORBIDDEN,
            Error::UserNotFound => StatusCode::NOT_FOUND,
            Error::Delivery(_)
            | Error::Sql(_)
            | Error::Bcrypt(_)
            | Error::Jwt(_)
            | Error::Join(_)
            | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            Error::Validation(message) => message.clone(),
            Error::Body(_) => "Invalid request body.".into(),
            Error::Path(_) => "Invalid path parameter.".into(),
            Error::UserAlreadyExists => "User already exists.".into(),
            Error::InvalidCredentials => "Invalid email or password.".into(),
            Error::Unverified => "Please verify your email address before logging in.".into(),
            Error::Unauthorized => "Unauthorized: Invalid or missing token.".into(),
            Error::WrongPassword => "Invalid current password.".into(),
            Error::Forbidden => "Forbidden.".into(),
            Error::UserNotFound => "User not found.".into(),
            Error::InvalidToken => "Invalid or expired token.".into(),
            Error::Delivery(_) => "Error sending email.".into(),
            Error::Sql(_)
            | Error::Bcrypt(_)
            | Error::Jwt(_)
            | Error::Join(_)
            | Error::Internal(_) => "Internal server error.".into(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!("{:?}", self);
        } else {
            tracing::debug!("{}", self);
        }

        (status, Json(Message::failure(self.message()))).into_response()
    }
}

pub(crate) async fn handle_middleware_errors(err: BoxError) -> (StatusCode, Json<Message>) {
    if err.is::<tower::timeout::error::Elapsed>() {
        tracing::warn!("Request timed out");
        return (
            StatusCode::REQUEST_TIMEOUT,
            Json(Message::failure("Request timed out.")),
        );
    }

    tracing::error!("Unhandled error: {:?}", err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(Message::failure("Internal server error.")),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn internal_causes_stay_out_of_the_body() {
        let response = Error::Internal("connection reset by peer".into()).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Internal server error.");
    }

    #[test]
    fn statuses_follow_the_error_taxonomy() {
        assert_eq!(Error::UserAlreadyExists.status(), StatusCode::BAD_REQUEST);
        assert_eq!(Error::InvalidCredentials.status(), StatusCode::BAD_REQUEST);
        assert_eq!(Error::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(Error::Unverified.status(), StatusCode::FORBIDDEN);
        assert_eq!(Error::WrongPassword.status(), StatusCode::FORBIDDEN);
        assert_eq!(Error::UserNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            Error::Delivery(MailError::Rejected("smtp down".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
