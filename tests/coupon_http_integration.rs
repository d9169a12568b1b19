//! Integration tests for the coupon back-office screens.
//!
//! Drives the full router (auth middleware, permission checks, form
//! handling, handlers, event bus, admin log) over in-memory adapters.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use coupon_admin::adapters::auth::MockSessionValidator;
use coupon_admin::adapters::events::InMemoryEventBus;
use coupon_admin::adapters::http::{
    build_router, CouponHandlers, CouponScreenSettings, HttpSettings,
};
use coupon_admin::adapters::memory::{InMemoryAdminLog, InMemoryCouponStore};
use coupon_admin::application::{
    CreateCouponHandler, GetCouponHandler, ListCouponsHandler, UpdateCouponHandler,
};
use coupon_admin::domain::foundation::{
    CouponId, DomainError, ErrorCode, EventEnvelope, Lang, Timestamp,
};
use coupon_admin::ports::{AdminAction, CouponRepository, EventHandler, EventSubscriber};

// =============================================================================
// Test Infrastructure
// =============================================================================

const ADMIN_TOKEN: &str = "admin-token";
const VIEWER_TOKEN: &str = "viewer-token";

struct TestApp {
    router: Router,
    store: Arc<InMemoryCouponStore>,
    admin_log: Arc<InMemoryAdminLog>,
    bus: Arc<InMemoryEventBus>,
}

impl TestApp {
    fn new() -> Self {
        let store = Arc::new(InMemoryCouponStore::new());
        let admin_log = Arc::new(InMemoryAdminLog::new());
        let bus = Arc::new(InMemoryEventBus::new());

        let handlers = CouponHandlers::new(
            Arc::new(CreateCouponHandler::new(store.clone(), bus.clone())),
            Arc::new(UpdateCouponHandler::new(store.clone(), bus.clone())),
            Arc::new(GetCouponHandler::new(store.clone())),
            Arc::new(ListCouponsHandler::new(store.clone(), 20)),
            admin_log.clone(),
            CouponScreenSettings::default(),
        );

        let validator = MockSessionValidator::new()
            .with_admin(ADMIN_TOKEN, "admin-1", ["*"])
            .with_admin(VIEWER_TOKEN, "viewer-1", ["admin.coupon.view"]);

        let router = build_router(handlers, Arc::new(validator), &HttpSettings::default());

        Self {
            router,
            store,
            admin_log,
            bus,
        }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Option<String>, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, location, body)
    }

    async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Option<String>, Value) {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    async fn post_form(
        &self,
        uri: &str,
        token: &str,
        fields: &[(&str, &str)],
    ) -> (StatusCode, Option<String>, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(encode_form(fields)))
            .unwrap();
        self.send(request).await
    }

    /// Creates a coupon through the create screen and returns its id.
    async fn create(&self, code: &str, title: &str) -> CouponId {
        let fields = coupon_fields(code, title);
        let (status, location, _) = self
            .post_form("/admin/coupon/create", ADMIN_TOKEN, &fields)
            .await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        id_from_location(&location.unwrap())
    }
}

fn encode_form(fields: &[(&str, &str)]) -> String {
    fn encode(value: &str) -> String {
        value
            .bytes()
            .map(|b| match b {
                b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' => {
                    (b as char).to_string()
                }
                b' ' => "+".to_string(),
                other => format!("%{:02X}", other),
            })
            .collect()
    }

    fields
        .iter()
        .map(|(k, v)| format!("{}={}", encode(k), encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

fn coupon_fields<'a>(code: &'a str, title: &'a str) -> Vec<(&'a str, &'a str)> {
    vec![
        ("code", code),
        ("title", title),
        ("amount", "15"),
        ("effect", "remove_x_percent"),
        ("shortDescription", "Fifteen percent off"),
        ("description", "Valid on the whole catalogue"),
        ("isEnabled", "on"),
        ("expirationDate", "12/24/2031"),
        ("isCumulative", "on"),
        ("maxUsage", "-1"),
        ("locale", "en_US"),
    ]
}

fn id_from_location(location: &str) -> CouponId {
    location
        .strip_prefix("/admin/coupon/read/")
        .expect("redirect to read screen")
        .parse()
        .unwrap()
}

// =============================================================================
// Authentication and permissions
// =============================================================================

#[tokio::test]
async fn health_is_public() {
    let app = TestApp::new();
    let (status, _, body) = app.get("/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn screens_require_authentication() {
    let app = TestApp::new();

    let (status, _, _) = app.get("/admin/coupon", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _, _) = app.get("/admin/coupon", Some("unknown-token")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn missing_permission_is_forbidden_before_any_change() {
    let app = TestApp::new();

    let (status, _, body) = app.get("/admin/coupon/create", Some(VIEWER_TOKEN)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["details"]["permission"], "admin.coupon.create");

    let fields = coupon_fields("SPRING", "Spring sale");
    let (status, _, _) = app
        .post_form("/admin/coupon/create", VIEWER_TOKEN, &fields)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(app.store.is_empty());
    assert!(app.admin_log.entries().is_empty());
}

#[tokio::test]
async fn forbidden_post_is_rejected_before_its_body_is_read() {
    let app = TestApp::new();
    let id = app.create("SPRING", "Spring sale").await;

    for uri in ["/admin/coupon/create".to_string(), format!("/admin/coupon/update/{}", id)] {
        let request = Request::builder()
            .method("POST")
            .uri(uri.as_str())
            .header(header::AUTHORIZATION, format!("Bearer {}", VIEWER_TOKEN))
            .header(header::CONTENT_TYPE, "text/plain")
            .body(Body::from("not a form"))
            .unwrap();

        let (status, _, body) = app.send(request).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{}", uri);
        assert!(body["details"]["permission"].is_string());
    }

    assert_eq!(app.store.len(), 1);
}

#[tokio::test]
async fn authorized_post_without_form_body_is_refused() {
    let app = TestApp::new();
    let request = Request::builder()
        .method("POST")
        .uri("/admin/coupon/create")
        .header(header::AUTHORIZATION, format!("Bearer {}", ADMIN_TOKEN))
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from("code=SPRING"))
        .unwrap();

    let (status, _, _) = app.send(request).await;

    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert!(app.store.is_empty());
}

#[tokio::test]
async fn viewer_can_browse() {
    let app = TestApp::new();
    let (status, _, body) = app.get("/admin/coupon", Some(VIEWER_TOKEN)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["view"], "coupon-list");
    assert_eq!(body["total"], 0);
}

// =============================================================================
// Create
// =============================================================================

#[tokio::test]
async fn create_form_proposes_default_expiration_in_admin_language() {
    let app = TestApp::new();
    let (status, _, body) = app
        .get("/admin/coupon/create?lang=fr_FR", Some(ADMIN_TOKEN))
        .await;

    let expected = Lang::FrFr.format_date(&Timestamp::now().add_months(2));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["view"], "coupon-create");
    assert_eq!(body["formAction"], "admin/coupon/create");
    assert_eq!(body["defaultDate"], expected.as_str());
    assert_eq!(body["form"]["locale"], "fr_FR");
}

#[tokio::test]
async fn valid_submission_creates_coupon_and_redirects_to_read_screen() {
    let app = TestApp::new();
    let fields = coupon_fields("spring", "Spring sale");

    let (status, location, _) = app
        .post_form("/admin/coupon/create", ADMIN_TOKEN, &fields)
        .await;

    assert_eq!(status, StatusCode::SEE_OTHER);
    let id = id_from_location(&location.unwrap());

    let stored = app.store.find_by_id(&id).await.unwrap().unwrap();
    assert_eq!(stored.code().as_str(), "SPRING");
    assert_eq!(stored.expiration_date().date().to_string(), "2031-12-24");
    assert!(stored.is_enabled());
    assert!(stored.is_cumulative());
    assert!(!stored.is_removing_postage());

    let entries = app.admin_log.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].action, AdminAction::Create);
    assert_eq!(
        entries[0].message,
        format!("Coupon Spring sale (ID {}) created", id)
    );
    assert_eq!(entries[0].admin_id.as_str(), "admin-1");

    let events = app.bus.events_of_type("coupon.created.v1");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].aggregate_id, id.to_string());
    assert_eq!(events[0].metadata.user_id.as_deref(), Some("admin-1"));
}

#[tokio::test]
async fn invalid_submission_rerenders_form_with_every_violation() {
    let app = TestApp::new();
    let mut fields = coupon_fields("SPRING", "");
    fields[2] = ("amount", "abc");

    let (status, location, body) = app
        .post_form("/admin/coupon/create", ADMIN_TOKEN, &fields)
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(location.is_none());
    assert_eq!(body["view"], "coupon-create");
    assert_eq!(body["generalError"], "Please check your input:");
    assert_eq!(body["form"]["code"], "SPRING");

    let fields: Vec<&str> = body["violations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"title"));
    assert!(fields.contains(&"amount"));

    assert!(app.store.is_empty());
    assert!(app.admin_log.entries().is_empty());
    assert_eq!(app.bus.event_count(), 0);
}

/// Subscriber that always fails, standing in for a broken downstream consumer.
struct BrokenSubscriber;

#[async_trait]
impl EventHandler for BrokenSubscriber {
    async fn handle(&self, _event: EventEnvelope) -> Result<(), DomainError> {
        Err(DomainError::new(ErrorCode::InternalError, "search index unavailable"))
    }

    fn name(&self) -> &'static str {
        "broken_subscriber"
    }
}

#[tokio::test]
async fn failing_subscriber_does_not_fail_the_stored_creation() {
    let app = TestApp::new();
    app.bus
        .subscribe("coupon.created.v1", Arc::new(BrokenSubscriber));

    let fields = coupon_fields("SPRING", "Spring sale");
    let (status, location, _) = app
        .post_form("/admin/coupon/create", ADMIN_TOKEN, &fields)
        .await;

    assert_eq!(status, StatusCode::SEE_OTHER);
    let id = id_from_location(&location.unwrap());
    assert!(app.store.find_by_id(&id).await.unwrap().is_some());
    assert_eq!(app.admin_log.entries().len(), 1);
    assert!(app.bus.has_event("coupon.created.v1"));

    // Resubmitting is now a plain duplicate, not a hidden success
    let (status, _, body) = app
        .post_form("/admin/coupon/create", ADMIN_TOKEN, &fields)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["violations"][0]["field"], "code");
    assert_eq!(app.store.len(), 1);
}

#[tokio::test]
async fn duplicate_code_is_an_input_error() {
    let app = TestApp::new();
    app.create("SPRING", "Spring sale").await;

    let fields = coupon_fields("spring", "Another spring sale");
    let (status, _, body) = app
        .post_form("/admin/coupon/create", ADMIN_TOKEN, &fields)
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["generalError"], "Please check your input:");
    assert_eq!(body["violations"][0]["field"], "code");
    assert_eq!(app.store.len(), 1);
}

#[tokio::test]
async fn foreign_success_url_falls_back_to_read_screen() {
    let app = TestApp::new();
    let mut fields = coupon_fields("SPRING", "Spring sale");
    fields.push(("successUrl", "https://elsewhere.example/{id}"));

    let (status, location, _) = app
        .post_form("/admin/coupon/create", ADMIN_TOKEN, &fields)
        .await;

    assert_eq!(status, StatusCode::SEE_OTHER);
    assert!(location.unwrap().starts_with("/admin/coupon/read/"));
}

// =============================================================================
// Read and update
// =============================================================================

#[tokio::test]
async fn read_screen_shows_coupon() {
    let app = TestApp::new();
    let id = app.create("SPRING", "Spring sale").await;

    let (status, _, body) = app
        .get(&format!("/admin/coupon/read/{}?lang=de_DE", id), Some(ADMIN_TOKEN))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["view"], "coupon-read");
    assert_eq!(body["couponId"], id.to_string());
    assert_eq!(body["coupon"]["code"], "SPRING");
    assert_eq!(body["coupon"]["expirationDate"], "24.12.2031");
}

#[tokio::test]
async fn unknown_or_malformed_ids_are_rejected() {
    let app = TestApp::new();

    let (status, _, _) = app
        .get(&format!("/admin/coupon/read/{}", CouponId::new()), Some(ADMIN_TOKEN))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _, _) = app
        .get("/admin/coupon/update/not-a-uuid", Some(ADMIN_TOKEN))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let fields = coupon_fields("SPRING", "Spring sale");
    let (status, _, _) = app
        .post_form(
            &format!("/admin/coupon/update/{}", CouponId::new()),
            ADMIN_TOKEN,
            &fields,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_update_of_unknown_coupon_is_not_found() {
    let app = TestApp::new();
    let mut fields = coupon_fields("SPRING", "");
    fields[2] = ("amount", "abc");

    let (status, location, body) = app
        .post_form(
            &format!("/admin/coupon/update/{}", CouponId::new()),
            ADMIN_TOKEN,
            &fields,
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(location.is_none());
    assert!(body["violations"].is_null());
}

#[tokio::test]
async fn update_form_is_hydrated_from_stored_coupon() {
    let app = TestApp::new();
    let id = app.create("SPRING", "Spring sale").await;

    let (status, _, body) = app
        .get(&format!("/admin/coupon/update/{}", id), Some(ADMIN_TOKEN))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["view"], "coupon-update");
    assert_eq!(body["formAction"], format!("admin/coupon/update/{}", id));
    assert_eq!(body["form"]["code"], "SPRING");
    assert_eq!(body["form"]["expirationDate"], "12/24/2031");
    assert_eq!(body["form"]["isEnabled"], true);
    assert_eq!(body["form"]["isRemovingPostage"], false);
}

#[tokio::test]
async fn update_submission_applies_changes_and_logs() {
    let app = TestApp::new();
    let id = app.create("SPRING", "Spring sale").await;

    let mut fields = coupon_fields("SPRING", "Spring clearance");
    fields.push(("successUrl", "/admin/coupon"));
    let (status, location, _) = app
        .post_form(&format!("/admin/coupon/update/{}", id), ADMIN_TOKEN, &fields)
        .await;

    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/admin/coupon"));

    let stored = app.store.find_by_id(&id).await.unwrap().unwrap();
    assert_eq!(stored.title(), "Spring clearance");

    let entries = app.admin_log.entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].action, AdminAction::Update);
    assert_eq!(
        entries[1].message,
        format!("Coupon Spring clearance (ID {}) updated", id)
    );
    assert!(app.bus.has_event("coupon.updated.v1"));
}

#[tokio::test]
async fn update_to_code_of_another_coupon_is_rejected() {
    let app = TestApp::new();
    app.create("SPRING", "Spring sale").await;
    let summer = app.create("SUMMER", "Summer sale").await;

    let fields = coupon_fields("SPRING", "Summer sale");
    let (status, _, body) = app
        .post_form(&format!("/admin/coupon/update/{}", summer), ADMIN_TOKEN, &fields)
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["view"], "coupon-update");
    assert_eq!(body["violations"][0]["field"], "code");

    let stored = app.store.find_by_id(&summer).await.unwrap().unwrap();
    assert_eq!(stored.code().as_str(), "SUMMER");
}

#[tokio::test]
async fn browse_lists_created_coupons() {
    let app = TestApp::new();
    app.create("SPRING", "Spring sale").await;
    app.create("SUMMER", "Summer sale").await;

    let (status, _, body) = app
        .get("/admin/coupon?per_page=1", Some(ADMIN_TOKEN))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
    assert_eq!(body["hasMore"], true);
}
