use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{handlers, state::AppState};

/// Create the main application router with all API endpoints
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/home", get(handlers::home))
        // Auth
        .route("/api/auth/sign-up", post(handlers::sign_up))
        .route("/api/auth/sign-in", post(handlers::sign_in))
        .route("/api/auth/sign-out", post(handlers::sign_out))
        .route("/api/auth/user", get(handlers::current_user))
        .route("/api/auth/check-email", get(handlers::check_email))
        // Pages
        .route("/api/dashboard", get(handlers::get_dashboard))
        .route(
            "/api/funds",
            get(handlers::get_funds).post(handlers::save_funds),
        )
        .route("/api/gamification", get(handlers::get_gamification))
        .route("/api/notifications", get(handlers::list_notifications))
        .route(
            "/api/notifications/:id/read",
            post(handlers::mark_notification_read),
        )
        .route("/api/notifications/:id", delete(handlers::delete_notification))
        .route(
            "/api/expenses",
            get(handlers::list_expenses).post(handlers::add_expense),
        )
        .route("/api/expenses/:id", delete(handlers::remove_expense))
        .route(
            "/api/profile",
            get(handlers::get_profile).put(handlers::update_profile),
        )
        .route("/api/setup", post(handlers::setup))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
