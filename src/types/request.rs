use axum_macros::{FromRequest, FromRequestParts};
use serde::Deserialize;

use crate::core::error::Error;
use crate::types::Role;

/// `axum::Json` with rejections reported through [`Error`].
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub(crate) struct JsonBody<T>(pub(crate) T);

/// `axum::extract::Path` with rejections reported through [`Error`].
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(Error))]
pub(crate) struct PathParam<T>(pub(crate) T);

/// Body of `POST /api/auth`; `action` selects the flow.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct AuthAction {
    pub(crate) action: Option<String>,
    pub(crate) email: Option<String>,
    pub(crate) password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChangePasswordData {
    pub(crate) current_password: Option<String>,
    pub(crate) new_password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ResetPasswordData {
    pub(crate) token: Option<String>,
    pub(crate) new_password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct TokenQuery {
    pub(crate) token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UpdateRoleData {
    pub(crate) role: Role,
}
