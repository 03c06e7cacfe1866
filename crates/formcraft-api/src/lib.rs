//! FormCraft API
//!
//! Thin axum surface over the form, analytics and account services.
//! Handlers translate between the wire and the services; every rule
//! (validation, gating, quotas) lives below this crate.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use formcraft_accounts::{AccountDirectory, SubscriptionService};
use formcraft_forms::{FormService, PublicFormService};

pub mod auth;
pub mod error;
pub mod models;
pub mod routes;

/// Shared service handles.
#[derive(Clone)]
pub struct AppState {
    pub forms: Arc<FormService>,
    pub public: Arc<PublicFormService>,
    pub accounts: Arc<dyn AccountDirectory>,
    pub subscriptions: Arc<SubscriptionService>,
}

/// Build the API router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health))
        // Account
        .route("/api/user", get(routes::account::get_user))
        .route(
            "/api/subscription/upgrade",
            post(routes::account::upgrade_subscription),
        )
        .route(
            "/api/subscription/webhook",
            post(routes::account::subscription_webhook),
        )
        // Owner forms
        .route(
            "/api/forms",
            get(routes::forms::list_forms).post(routes::forms::create_form),
        )
        .route(
            "/api/forms/:id",
            get(routes::forms::get_form)
                .put(routes::forms::update_form)
                .delete(routes::forms::delete_form),
        )
        .route("/api/forms/:id/analytics", get(routes::forms::form_analytics))
        // Public
        .route("/api/public/forms/:slug", get(routes::public::get_public_form))
        .route(
            "/api/public/forms/:slug/submit",
            post(routes::public::submit_form),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}
