//! Router-level checks that are settled before any query runs, so the pool
//! behind the state is lazy and never actually connects.

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use marketplace_api::{
    config::AppConfig, entity::users::UserRole, routes::create_router, state::AppState,
};
use serde_json::{Value, json};
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

const SECRET: &str = "router-test-secret";

fn state() -> AppState {
    let config = AppConfig::from_lookup(|key| match key {
        "DATABASE_URL" => Some("postgres://localhost:1/unused".to_string()),
        "JWT_SECRET" => Some(SECRET.to_string()),
        _ => None,
    })
    .expect("config");
    let pool = PgPoolOptions::new()
        .connect_lazy(&config.database_url)
        .expect("lazy pool");
    AppState::new(pool, &config)
}

fn app() -> (Router, AppState) {
    let state = state();
    (create_router(state.clone()), state)
}

fn bearer(state: &AppState, user_id: i64, role: UserRole) -> String {
    let token = state.tokens.issue(user_id, role).expect("token");
    format!("Bearer {token}")
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    auth: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    };

    let response = app.oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    let routes = [
        (Method::GET, "/api/auth/allusers"),
        (Method::GET, "/api/admin/vendors"),
        (Method::PUT, "/api/admin/vendor-toggle/1"),
        (Method::GET, "/api/admin/products"),
        (Method::PUT, "/api/admin/product-toggle/1"),
        (Method::GET, "/api/admin/orders"),
        (Method::GET, "/api/admin/sales"),
        (Method::GET, "/api/vendor/products"),
        (Method::GET, "/api/vendor/orders"),
        (Method::GET, "/api/vendor/invoice/1"),
    ];

    for (method, uri) in routes {
        let (app, _) = app();
        let (status, body) = send(app, method.clone(), uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri}");
        assert_eq!(body["data"]["error"], "unauthorized");
    }
}

#[tokio::test]
async fn malformed_and_forged_tokens_are_rejected() {
    let (app, _) = app();
    let (status, _) = send(
        app,
        Method::GET,
        "/api/admin/vendors",
        Some("Token abc"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (app, _) = self::app();
    let (status, body) = send(
        app,
        Method::GET,
        "/api/admin/vendors",
        Some("Bearer not.a.jwt"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid or expired token");

    let other = marketplace_api::security::TokenService::new(
        b"some-other-secret",
        chrono::Duration::hours(1),
    );
    let forged = format!("Bearer {}", other.issue(1, UserRole::Admin).expect("token"));
    let (app, _) = self::app();
    let (status, _) = send(app, Method::GET, "/api/admin/vendors", Some(&forged), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn vendors_cannot_reach_admin_routes() {
    let (app, state) = app();
    let auth = bearer(&state, 7, UserRole::Vendor);

    let (status, body) = send(app, Method::GET, "/api/admin/sales", Some(&auth), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Admin only");

    let app = create_router(state.clone());
    let (status, _) = send(
        app,
        Method::POST,
        "/api/admin/orders",
        Some(&auth),
        Some(json!({ "product_id": 1, "vendor_id": 1, "quantity": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let app = create_router(state);
    let (status, _) = send(app, Method::GET, "/api/auth/allusers", Some(&auth), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admins_cannot_reach_vendor_routes() {
    let (app, state) = app();
    let auth = bearer(&state, 1, UserRole::Admin);

    let (status, body) = send(
        app,
        Method::POST,
        "/api/vendor/product",
        Some(&auth),
        Some(json!({ "name": "Lamp", "price": "10.00" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Vendor only");

    let app = create_router(state);
    let (status, _) = send(app, Method::GET, "/api/vendor/invoice/3", Some(&auth), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn order_quantity_is_validated_before_storage() {
    let (_, state) = app();
    let auth = bearer(&state, 1, UserRole::Admin);

    let cases = [
        json!({ "product_id": 1, "vendor_id": 1, "quantity": 0 }),
        json!({ "product_id": 1, "vendor_id": 1, "quantity": -4 }),
        json!({ "product_id": 1, "vendor_id": 1, "quantity": "abc" }),
        json!({ "product_id": 1, "vendor_id": 1, "quantity": 2.5 }),
        json!({ "product_id": 1, "vendor_id": 1 }),
    ];

    for payload in cases {
        let app = create_router(state.clone());
        let (status, body) = send(
            app,
            Method::POST,
            "/api/admin/orders",
            Some(&auth),
            Some(payload.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{payload}");
        assert_eq!(body["data"]["error"], "validation_error");
    }
}

#[tokio::test]
async fn non_positive_path_ids_are_rejected() {
    let (_, state) = app();
    let admin = bearer(&state, 1, UserRole::Admin);

    let app = create_router(state.clone());
    let (status, body) = send(
        app,
        Method::PUT,
        "/api/admin/vendor-toggle/0",
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["data"]["error"], "validation_error");

    let app = create_router(state.clone());
    let (status, body) = send(
        app,
        Method::PUT,
        "/api/admin/product-toggle/abc",
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["data"]["fields"]["path"].is_string());
}

#[tokio::test]
async fn registration_rejects_bad_input_before_storage() {
    let (app, _) = app();
    let (status, body) = send(
        app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({ "name": "A", "email": "not-an-email", "password": "123" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields = &body["data"]["fields"];
    assert!(fields["name"].is_string());
    assert!(fields["email"].is_string());
    assert!(fields["password"].is_string());
}

#[tokio::test]
async fn unknown_paths_get_a_json_404() {
    let (app, _) = app();
    let (status, body) = send(app, Method::GET, "/api/nowhere", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Route not found");
    assert_eq!(body["data"]["error"], "not_found");
}

#[tokio::test]
async fn malformed_paging_gets_the_json_validation_envelope() {
    let (_, state) = app();
    let auth = bearer(&state, 1, UserRole::Admin);

    for uri in [
        "/api/admin/orders?page=abc",
        "/api/admin/products?per_page=-3",
    ] {
        let app = create_router(state.clone());
        let (status, body) = send(app, Method::GET, uri, Some(&auth), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["message"], "Validation failed");
        assert_eq!(body["data"]["error"], "validation_error");
        assert!(body["data"]["fields"]["query"].is_string(), "{uri}");
    }
}

#[tokio::test]
async fn health_is_public() {
    let (app, _) = app();
    let (status, body) = send(app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");
}
