//! FormCraft API server
//!
//! Wires the in-memory adapters to the services and serves the router.
//! A demo owner account is seeded at startup so the API is usable out
//! of the box; its bearer token is printed to the log.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use formcraft_accounts::{
    Account, AccountDirectory, InMemoryAccountDirectory, StaticBillingProvider,
    SubscriptionService,
};
use formcraft_analytics::AnalyticsEngine;
use formcraft_api::{auth, build_router, AppState};
use formcraft_forms::{
    FieldTypeRegistry, FormService, InMemoryFormRepository, InMemorySubmissionRepository,
    PublicFormService, TracingNotificationSender,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let registry = Arc::new(FieldTypeRegistry::builtin());
    let forms = Arc::new(InMemoryFormRepository::new());
    let submissions = Arc::new(InMemorySubmissionRepository::new());
    let accounts: Arc<InMemoryAccountDirectory> = Arc::new(InMemoryAccountDirectory::new());
    let analytics = Arc::new(AnalyticsEngine::new());

    let demo = Account::new("demo@formcraft.dev", "demo");
    let demo_id = demo.id;
    let demo_email = demo.email.clone();
    if let Err(err) = accounts.insert(demo).await {
        tracing::warn!(error = %err, "demo account not seeded");
    } else if let Ok(token) = auth::create_token(demo_id, &demo_email) {
        tracing::info!(account = %demo_id, token, "demo account ready");
    }

    let state = AppState {
        forms: Arc::new(FormService::new(
            registry,
            forms.clone(),
            submissions.clone(),
            accounts.clone(),
            analytics.clone(),
        )),
        public: Arc::new(PublicFormService::new(
            forms,
            submissions,
            accounts.clone(),
            analytics,
            Arc::new(TracingNotificationSender),
        )),
        accounts: accounts.clone(),
        subscriptions: Arc::new(SubscriptionService::new(
            accounts,
            Arc::new(StaticBillingProvider),
        )),
    };

    let app = build_router(state);

    let addr = "0.0.0.0:8080";
    tracing::info!("FormCraft API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("bind listener");
    axum::serve(listener, app).await.expect("serve");
}
