use crate::core::error;
use crate::core::state::AppState;
use crate::routes::{admin, auth};
use crate::utils;
use axum::error_handling::HandleErrorLayer;
use axum::{
    extract::{MatchedPath, Request},
    http::{header, Method},
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    cors::{self, CorsLayer},
    trace::TraceLayer,
};
use tracing::info_span;

pub(crate) fn routes(state: AppState, requests_per_second: u64, timeout: Duration) -> Router {
    let authenticate = middleware::from_fn_with_state(state.clone(), utils::auth::authenticate);
    let authorize_admin =
        middleware::from_fn_with_state(state.clone(), utils::auth::authorize_admin);

    // /api/users/...
    let user_router = Router::new()
        .route("/api/users", get(admin::list))
        .route("/api/users/{id}", delete(admin::delete))
        .route("/api/users/{id}/role", put(admin::set_role))
        .route_layer(authorize_admin);

    Router::new()
        .route(
            "/api/auth",
            post(auth::action).merge(put(auth::change_password).route_layer(authenticate)),
        )
        .route("/api/auth/verify", get(auth::verify))
        .route("/api/auth/reset-password", post(auth::reset_password))
        .merge(user_router)
        .with_state(state)
        .route_layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                        let matched_path = request
                            .extensions()
                            .get::<MatchedPath>()
                            .map(MatchedPath::as_str);

                        info_span!(
                            "request",
                            method = ?request.method(),
                            matched_path,
                        )
                    }),
                )
                .layer(HandleErrorLayer::new(error::handle_middleware_errors))
                .timeout(timeout)
                .buffer(128)
                .rate_limit(requests_per_second.max(1), Duration::from_secs(1))
                .layer(
                    CorsLayer::new()
                        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
                        .allow_origin(cors::Any),
                ),
        )
}
