// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{auth, health, quiz, submission},
    state::AppState,
    utils::jwt::optional_auth_middleware,
};

/// Builds the CORS layer from the configured origins.
/// Origins that are not valid header values are skipped with a warning.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

/// Assembles the main application router.
///
/// * Merges the auth, quiz and submission routes under `/api`.
/// * Submit accepts an optional bearer token.
/// * Applies global middleware (Trace, CORS).
pub fn create_router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    let quiz_routes = Router::new()
        .route("/quizzes", get(quiz::list_quizzes).post(quiz::create_quiz))
        .route("/quizzes/{id}", get(quiz::get_quiz))
        .route(
            "/quizzes/{id}/results/{submission_id}",
            get(submission::get_results),
        )
        .merge(
            Router::new()
                .route("/quizzes/{id}/submit", post(submission::submit))
                .layer(middleware::from_fn_with_state(
                    state.clone(),
                    optional_auth_middleware,
                )),
        );

    let api_routes = Router::new().merge(auth_routes).merge(quiz_routes);

    Router::new()
        .route("/health", get(health::health))
        .nest("/api", api_routes)
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&state.config.cors_origins)),
        )
        .with_state(state)
}
