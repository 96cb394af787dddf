use axum::extract::{Extension, State};
use axum::response::IntoResponse;
use axum::Json;
use tracing::instrument;

use crate::core::error::Error;
use crate::core::state::AppState;
use crate::types::request::{JsonBody, PathParam, UpdateRoleData};
use crate::types::{response, UserId};
use crate::utils::auth::AuthorizedUser;

#[instrument(skip_all)]
pub(crate) async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, Error> {
    let users = state.user_controller.list().await?;

    Ok(Json(response::Users {
        success: true,
        users,
    }))
}

#[instrument(skip_all)]
pub(crate) async fn set_role(
    State(state): State<AppState>,
    Extension(AuthorizedUser(actor)): Extension<AuthorizedUser>,
    PathParam(id): PathParam<UserId>,
    JsonBody(params): JsonBody<UpdateRoleData>,
) -> Result<impl IntoResponse, Error> {
    let user = state
        .user_controller
        .set_role(&actor, id, params.role)
        .await?;

    Ok(Json(response::UpdatedUser {
        success: true,
        user,
    }))
}

#[instrument(skip_all)]
pub(crate) async fn delete(
    State(state): State<AppState>,
    Extension(AuthorizedUser(actor)): Extension<AuthorizedUser>,
    PathParam(id): PathParam<UserId>,
) -> Result<impl IntoResponse, Error> {
    state.user_controller.delete(&actor, id).await?;

    Ok(Json(response::Message::ok("User deleted successfully.")))
}
