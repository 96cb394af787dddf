use axum::extract::{Request, State};
use axum::http::{header, HeaderMap};
use axum::middleware::Next;
use axum::response::Response;

use crate::core::error::Error;
use crate::core::state::AppState;
use crate::token::Claims;
use crate::types::User;

/// Verified session claims, inserted by [`authenticate`].
#[derive(Clone, Debug)]
pub(crate) struct Authenticated(pub(crate) Claims);

/// The caller's own row, inserted by [`authorize_admin`].
#[derive(Clone, Debug)]
pub(crate) struct AuthorizedUser(pub(crate) User);

pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();

    (!token.is_empty()).then_some(token)
}

pub(crate) async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, Error> {
    let token = bearer_token(request.headers()).ok_or(Error::Unauthorized)?;
    let claims = state.auth_controller.authenticate(token)?;

    request.extensions_mut().insert(Authenticated(claims));

    Ok(next.run(request).await)
}

pub(crate) async fn authorize_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, Error> {
    let token = bearer_token(request.headers()).ok_or(Error::Unauthorized)?;
    let claims = state.auth_controller.authenticate(token)?;
    let user = state.user_controller.authorize_admin(&claims).await?;

    request.extensions_mut().insert(AuthorizedUser(user));

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extracts_bearer_tokens_only() {
        assert_eq!(bearer_token(&headers("Bearer abc.def")), Some("abc.def"));
        assert_eq!(bearer_token(&headers("Basic abc")), None);
        assert_eq!(bearer_token(&headers("Bearer ")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
