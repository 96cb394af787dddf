use axum::extract::{Extension, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::instrument;

use crate::controllers::auth::{FORGOT_PASSWORD_MESSAGE, SIGNUP_MESSAGE};
use crate::core::error::Error;
use crate::core::state::AppState;
use crate::types::request::{
    AuthAction, ChangePasswordData, JsonBody, ResetPasswordData, TokenQuery,
};
use crate::types::response;
use crate::utils::auth::Authenticated;
use crate::utils::validate::required;

const MISSING_CREDENTIALS: &str = "Missing email or password.";

/// `POST /api/auth`, dispatched on `action`.
#[instrument(skip_all, fields(action = tracing::field::Empty))]
pub(crate) async fn action(
    State(state): State<AppState>,
    JsonBody(params): JsonBody<AuthAction>,
) -> Result<Response, Error> {
    let action = required(&params.action, "Missing action field in request body.")?;
    tracing::Span::current().record("action", action);

    match action {
        "signup" => signup(&state, &params).await,
        "login" => login(&state, &params).await,
        "forgot-password" => forgot_password(&state, &params).await,
        _ => Err(Error::Validation("Invalid action.".into())),
    }
}

async fn signup(state: &AppState, params: &AuthAction) -> Result<Response, Error> {
    let email = required(&params.email, MISSING_CREDENTIALS)?;
    let password = required(&params.password, MISSING_CREDENTIALS)?;

    state.auth_controller.signup(email, password).await?;

    Ok((StatusCode::CREATED, Json(response::Message::ok(SIGNUP_MESSAGE))).into_response())
}

async fn login(state: &AppState, params: &AuthAction) -> Result<Response, Error> {
    let email = required(&params.email, MISSING_CREDENTIALS)?;
    let password = required(&params.password, MISSING_CREDENTIALS)?;

    let session = state.auth_controller.login(email, password).await?;

    Ok(Json(response::Login::new(session.token, session.user)).into_response())
}

async fn forgot_password(state: &AppState, params: &AuthAction) -> Result<Response, Error> {
    let email = required(&params.email, "Missing email.")?;

    state.auth_controller.forgot_password(email).await?;

    Ok(Json(response::Message::ok(FORGOT_PASSWORD_MESSAGE)).into_response())
}

/// `PUT /api/auth`, behind [`crate::utils::auth::authenticate`].
#[instrument(skip_all)]
pub(crate) async fn change_password(
    State(state): State<AppState>,
    Extension(Authenticated(claims)): Extension<Authenticated>,
    JsonBody(params): JsonBody<ChangePasswordData>,
) -> Result<impl IntoResponse, Error> {
    let message = "Missing current password or new password.";
    let current_password = required(&params.current_password, message)?;
    let new_password = required(&params.new_password, message)?;

    state
        .auth_controller
        .change_password(&claims, current_password, new_password)
        .await?;

    Ok(Json(response::Message::ok("Password updated successfully.")))
}

/// The token may arrive in the body or the query string; the body wins.
#[instrument(skip_all)]
pub(crate) async fn reset_password(
    State(state): State<AppState>,
    Query(query): Query<TokenQuery>,
    JsonBody(params): JsonBody<ResetPasswordData>,
) -> Result<impl IntoResponse, Error> {
    let token = params.token.or(query.token);
    let token = required(&token, "Missing token or new password.")?;
    let new_password = required(&params.new_password, "Missing token or new password.")?;

    state
        .auth_controller
        .reset_password(token, new_password)
        .await?;

    Ok(Json(response::Message::ok(
        "Password has been reset successfully.",
    )))
}

#[instrument(skip_all)]
pub(crate) async fn verify(
    State(state): State<AppState>,
    Query(query): Query<TokenQuery>,
) -> Result<impl IntoResponse, Error> {
    let token = query.token.as_deref().ok_or(Error::InvalidToken)?;

    state.auth_controller.verify_email(token).await?;

    Ok(Json(response::Message::ok(
        "Email verified successfully. You can now log in.",
    )))
}
