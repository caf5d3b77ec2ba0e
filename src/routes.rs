// src/routes.rs

use axum::{
    Router, http::Method, middleware,
    routing::{delete, get, post, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{admin, auth, catalog, quiz},
    state::AppState,
    utils::jwt::{admin_middleware, auth_middleware, whitelist_middleware},
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (auth, catalog, quiz, admin).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (pool, config, session registry).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        "http://localhost:3000".parse().unwrap(),
        "http://127.0.0.1:3000".parse().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    // Valid token required; whitelist membership is what this route reports.
    let auth_routes = Router::new()
        .route("/me", get(auth::me))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let catalog_routes = Router::new()
        .route("/birds", get(catalog::list_species))
        .route("/birds/{id}", get(catalog::get_species));

    let quiz_routes = Router::new()
        .route("/official-test", get(quiz::official_test_status))
        .route("/sessions", post(quiz::start_session))
        .route(
            "/sessions/{id}",
            get(quiz::get_session).delete(quiz::abandon_session),
        )
        .route("/sessions/{id}/select", post(quiz::select_answer))
        .route("/sessions/{id}/skip", post(quiz::skip_question))
        .route("/history", get(quiz::history));

    let admin_routes = Router::new()
        .route(
            "/allowed-users",
            get(admin::list_allowed_users).post(admin::create_allowed_user),
        )
        .route("/allowed-users/{email}", delete(admin::delete_allowed_user))
        .route(
            "/official-test",
            get(admin::get_official_window).put(admin::put_official_window),
        )
        .route("/birds", post(admin::create_species))
        .route(
            "/birds/{id}",
            put(admin::update_species).delete(admin::delete_species),
        )
        .route("/analytics", get(admin::analytics))
        // Admin check runs after token verification and whitelist lookup.
        .layer(middleware::from_fn(admin_middleware));

    // Token verification first, then the whitelist gate, for everything a
    // regular user touches.
    let protected = Router::new()
        .nest("/api/catalog", catalog_routes)
        .nest("/api/quiz", quiz_routes)
        .nest("/api/admin", admin_routes)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            whitelist_middleware,
        ))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .nest("/api/auth", auth_routes)
        .merge(protected)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
