//! End-to-end API flows

use std::sync::Arc;

use axum::http::{header, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};

use formcraft_accounts::{
    Account, AccountDirectory, AccountId, BillingEvent, InMemoryAccountDirectory, PlanTier,
    StaticBillingProvider, SubscriptionService,
};
use formcraft_analytics::AnalyticsEngine;
use formcraft_api::{auth, build_router, AppState};
use formcraft_forms::{
    FieldTypeRegistry, FormService, InMemoryFormRepository, InMemorySubmissionRepository,
    PublicFormService, TracingNotificationSender,
};

struct TestApp {
    server: TestServer,
    analytics: Arc<AnalyticsEngine>,
    accounts: Arc<InMemoryAccountDirectory>,
}

impl TestApp {
    async fn owner(&self, tier: PlanTier) -> (AccountId, String) {
        let mut account = Account::new(format!("{}@example.com", uuid::Uuid::new_v4()), "owner");
        account.plan = tier;
        let id = account.id;
        let email = account.email.clone();
        self.accounts.insert(account).await.unwrap();
        (id, auth::create_token(id, &email).unwrap())
    }
}

fn app() -> TestApp {
    let registry = Arc::new(FieldTypeRegistry::builtin());
    let forms = Arc::new(InMemoryFormRepository::new());
    let submissions = Arc::new(InMemorySubmissionRepository::new());
    let accounts = Arc::new(InMemoryAccountDirectory::new());
    let analytics = Arc::new(AnalyticsEngine::new());

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
            analytics.clone(),
            Arc::new(TracingNotificationSender),
        )),
        accounts: accounts.clone(),
        subscriptions: Arc::new(SubscriptionService::new(
            accounts.clone(),
            Arc::new(StaticBillingProvider),
        )),
    };

    TestApp {
        server: TestServer::new(build_router(state)).unwrap(),
        analytics,
        accounts,
    }
}

fn bearer(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {token}")).unwrap()
}

/// Create a published form and return its id and slug.
async fn publish_form(app: &TestApp, token: &str, body: Value) -> (String, String) {
    let created = app
        .server
        .post("/api/forms")
        .add_header(header::AUTHORIZATION, bearer(token))
        .json(&body)
        .await;
    assert_eq!(created.status_code(), StatusCode::CREATED);
    let form: Value = created.json();
    let id = form["id"].as_str().unwrap().to_string();

    let mut publish = body;
    publish["isPublished"] = json!(true);
    let updated = app
        .server
        .put(&format!("/api/forms/{id}"))
        .add_header(header::AUTHORIZATION, bearer(token))
        .json(&publish)
        .await;
    assert_eq!(updated.status_code(), StatusCode::OK);
    let form: Value = updated.json();

    (id, form["slug"].as_str().unwrap().to_string())
}

fn email_form() -> Value {
    json!({
        "title": "Contact us",
        "fields": [
            { "id": "email", "type": "email", "label": "Email", "required": true }
        ]
    })
}

#[tokio::test]
async fn health_check() {
    let app = app();
    let response = app.server.get("/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.text(), "OK");
}

#[tokio::test]
async fn owner_routes_require_a_token() {
    let app = app();
    let response = app.server.get("/api/forms").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    let response = app
        .server
        .get("/api/forms")
        .add_header(header::AUTHORIZATION, HeaderValue::from_static("Bearer junk"))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_list_and_public_fetch() {
    let app = app();
    let (_, token) = app.owner(PlanTier::Free).await;

    let (_, slug) = publish_form(&app, &token, email_form()).await;
    assert_eq!(slug, "contact-us");

    let listed = app
        .server
        .get("/api/forms")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .await;
    let forms: Value = listed.json();
    assert_eq!(forms.as_array().unwrap().len(), 1);

    let public = app.server.get("/api/public/forms/contact-us").await;
    assert_eq!(public.status_code(), StatusCode::OK);
    let body: Value = public.json();
    assert_eq!(body["title"], json!("Contact us"));
    assert_eq!(body["fields"][0]["type"], json!("email"));
    // Owner-only data never leaks into the public projection.
    assert!(body.get("ownerId").is_none());
}

#[tokio::test]
async fn unpublished_forms_are_not_public() {
    let app = app();
    let (_, token) = app.owner(PlanTier::Free).await;

    let created = app
        .server
        .post("/api/forms")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .json(&email_form())
        .await;
    assert_eq!(created.status_code(), StatusCode::CREATED);

    let response = app.server.get("/api/public/forms/contact-us").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn expired_forms_reject_with_403() {
    let app = app();
    let (_, token) = app.owner(PlanTier::Pro).await;

    let mut body = email_form();
    let (id, slug) = publish_form(&app, &token, body.clone()).await;

    body["isPublished"] = json!(true);
    body["expiresAt"] = json!("2020-01-01T00:00:00Z");
    let updated = app
        .server
        .put(&format!("/api/forms/{id}"))
        .add_header(header::AUTHORIZATION, bearer(&token))
        .json(&body)
        .await;
    assert_eq!(updated.status_code(), StatusCode::OK);

    let response = app.server.get(&format!("/api/public/forms/{slug}")).await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    let message: Value = response.json();
    assert_eq!(message["message"], json!("This form has expired"));

    let response = app
        .server
        .post(&format!("/api/public/forms/{slug}/submit"))
        .json(&json!({ "email": "ada@example.com" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn scenario_a_invalid_email() {
    let app = app();
    let (_, token) = app.owner(PlanTier::Free).await;
    let (_, slug) = publish_form(&app, &token, email_form()).await;

    let response = app
        .server
        .post(&format!("/api/public/forms/{slug}/submit"))
        .json(&json!({ "email": "not-an-email" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    let errors = body["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["fieldId"], json!("email"));
    assert_eq!(errors[0]["message"], json!("Please enter a valid email address"));
}

#[tokio::test]
async fn scenario_b_number_bounds() {
    let app = app();
    let (_, token) = app.owner(PlanTier::Free).await;
    let (id, slug) = publish_form(
        &app,
        &token,
        json!({
            "title": "Rate us",
            "fields": [
                { "id": "rating", "type": "number", "label": "Rating",
                  "required": true, "min": 1, "max": 10 }
            ]
        }),
    )
    .await;

    let response = app
        .server
        .post(&format!("/api/public/forms/{slug}/submit"))
        .json(&json!({ "rating": 15 }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["errors"][0]["message"], json!("Value must be at most 10"));

    let response = app
        .server
        .post(&format!("/api/public/forms/{slug}/submit"))
        .json(&json!({ "rating": 5 }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let analytics = app
        .server
        .get(&format!("/api/forms/{id}/analytics"))
        .add_header(header::AUTHORIZATION, bearer(&token))
        .await;
    assert_eq!(analytics.status_code(), StatusCode::OK);
    let view: Value = analytics.json();
    assert_eq!(view["analytics"]["submissions"], json!(1));
    assert_eq!(view["submissions"][0]["data"]["rating"], json!(5));
    assert_eq!(view["fieldCompletion"][0]["rate"], json!(100.0));
}

#[tokio::test]
async fn scenario_c_submission_cap_before_validation() {
    let app = app();
    let (_, token) = app.owner(PlanTier::Free).await;
    let (id, slug) = publish_form(&app, &token, email_form()).await;
    let form_id = id.parse().unwrap();

    for _ in 0..100 {
        app.analytics.record_submission(&form_id);
    }

    // An invalid payload still gets the cap error, not field errors.
    let response = app
        .server
        .post(&format!("/api/public/forms/{slug}/submit"))
        .json(&json!({ "email": "not-an-email" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    let body: Value = response.json();
    assert_eq!(body["limitReached"], json!(true));
    assert!(body.get("errors").is_none());
}

#[tokio::test]
async fn scenario_d_form_quota_and_upgrade() {
    let app = app();
    let (owner, token) = app.owner(PlanTier::Free).await;

    for _ in 0..3 {
        let response = app
            .server
            .post("/api/forms")
            .add_header(header::AUTHORIZATION, bearer(&token))
            .json(&email_form())
            .await;
        assert_eq!(response.status_code(), StatusCode::CREATED);
    }

    let response = app
        .server
        .post("/api/forms")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .json(&email_form())
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    let body: Value = response.json();
    assert!(body["message"].as_str().unwrap().contains("upgrade"));

    // Upgrade via the billing webhook, then the fourth form goes through.
    let webhook = app
        .server
        .post("/api/subscription/webhook")
        .json(&BillingEvent::Activated { account_id: owner })
        .await;
    assert_eq!(webhook.status_code(), StatusCode::OK);

    let profile = app
        .server
        .get("/api/user")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .await;
    let profile: Value = profile.json();
    assert_eq!(profile["planType"], json!("pro"));

    let response = app
        .server
        .post("/api/forms")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .json(&email_form())
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
}

#[tokio::test]
async fn malformed_drafts_return_field_scoped_issues() {
    let app = app();
    let (_, token) = app.owner(PlanTier::Free).await;

    let response = app
        .server
        .post("/api/forms")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .json(&json!({
            "title": "Broken",
            "fields": [
                { "id": "pick", "type": "select", "label": "Pick one" }
            ]
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["errors"][0]["fieldId"], json!("pick"));
}

#[tokio::test]
async fn deleting_a_form_removes_its_public_address() {
    let app = app();
    let (_, token) = app.owner(PlanTier::Free).await;
    let (id, slug) = publish_form(&app, &token, email_form()).await;

    let response = app
        .server
        .delete(&format!("/api/forms/{id}"))
        .add_header(header::AUTHORIZATION, bearer(&token))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let response = app.server.get(&format!("/api/public/forms/{slug}")).await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}
