//! End-to-end tests against an in-process axum backend.
//!
//! The mock mirrors the admin REST contract: JSON collections, `{"error"}`
//! bodies on failure, and a session cookie issued by `/admin/login`.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use fabclean_admin::config::ReconcilePolicy;
use fabclean_admin::credentials::{CredentialStore, SESSION_KEY, TOKEN_KEY};
use fabclean_admin::errors::{ConsoleError, GatewayErrorKind};
use fabclean_admin::gateway::session::admin_logout;
use fabclean_admin::gateway::{
    self, AuthClient, AuthKind, AuthStrategy, Gateway, HttpGateway, Method,
};
use fabclean_admin::models::{Customer, NewCustomer};
use fabclean_admin::notify::{Notifier, drain};
use fabclean_admin::pages::{CustomersPage, OrdersPage};

const SESSION: &str = "connect.sid=s%3Aabc";

#[derive(Clone, Default)]
struct Backend {
    customers: Arc<Mutex<Vec<Value>>>,
    orders: Arc<Mutex<Vec<Value>>>,
    /// (method, path, cookie, authorization) per request.
    seen: Arc<Mutex<Vec<(String, String, Option<String>, Option<String>)>>>,
}

impl Backend {
    fn seeded() -> Self {
        let backend = Backend::default();
        *backend.customers.lock().unwrap() = vec![
            json!({"id": 1, "name": "Asha", "email": "asha@x.com", "phone": "555"}),
            json!({"id": 2, "name": "Ravi", "email": "ravi@x.com", "phone": "777"}),
        ];
        *backend.orders.lock().unwrap() = vec![json!({
            "id": "O1",
            "customerName": "Asha",
            "customerPhone": "555",
            "service": "Dry Clean",
            "pickupDate": "2024-01-01",
            "total": 300.0,
            "specialInstructions": null
        })];
        backend
    }

    fn record(&self, method: &str, path: &str, headers: &HeaderMap) {
        let text = |name| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        self.seen.lock().unwrap().push((
            method.to_string(),
            path.to_string(),
            text(header::COOKIE),
            text(header::AUTHORIZATION),
        ));
    }

    fn count(&self, method: &str, path: &str) -> usize {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .filter(|(m, p, _, _)| m == method && p == path)
            .count()
    }
}

fn error(status: StatusCode, msg: &str) -> Response {
    (status, Json(json!({ "error": msg }))).into_response()
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|c| c.contains(SESSION))
}

async fn list_customers(State(b): State<Backend>, headers: HeaderMap) -> Response {
    b.record("GET", "/admin/api/customers", &headers);
    if !authorized(&headers) {
        return error(StatusCode::UNAUTHORIZED, "Unauthorized");
    }
    Json(Value::Array(b.customers.lock().unwrap().clone())).into_response()
}

async fn create_customer(
    State(b): State<Backend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    b.record("POST", "/admin/api/customers", &headers);
    let mut customers = b.customers.lock().unwrap();
    if customers.iter().any(|c| c["email"] == body["email"]) {
        return error(StatusCode::BAD_REQUEST, "Email already registered");
    }
    let id = customers.len() as i64 + 10;
    let mut created = body.clone();
    created["id"] = json!(id);
    customers.push(created.clone());
    (StatusCode::CREATED, Json(created)).into_response()
}

async fn update_customer(
    State(b): State<Backend>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    b.record("PUT", &format!("/admin/api/customers/{}", id), &headers);
    let mut customers = b.customers.lock().unwrap();
    match customers.iter_mut().find(|c| c["id"] == json!(id)) {
        Some(c) => {
            *c = body.clone();
            Json(body).into_response()
        }
        None => error(StatusCode::NOT_FOUND, "Customer not found"),
    }
}

async fn delete_customer(
    State(b): State<Backend>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    b.record("DELETE", &format!("/admin/api/customers/{}", id), &headers);
    if id == 2 {
        return error(StatusCode::INTERNAL_SERVER_ERROR, "Database locked");
    }
    b.customers.lock().unwrap().retain(|c| c["id"] != json!(id));
    Json(json!({"message": "Customer deleted"})).into_response()
}

async fn list_orders(State(b): State<Backend>, headers: HeaderMap) -> Response {
    b.record("GET", "/admin/api/orders", &headers);
    Json(Value::Array(b.orders.lock().unwrap().clone())).into_response()
}

async fn update_order(
    State(b): State<Backend>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    b.record("PUT", &format!("/admin/api/orders/{}", id), &headers);
    let mut orders = b.orders.lock().unwrap();
    let Some(order) = orders.iter_mut().find(|o| o["id"] == json!(id)) else {
        return error(StatusCode::NOT_FOUND, "Order not found");
    };
    for key in ["pickupDate", "total", "specialInstructions"] {
        order[key] = body[key].clone();
    }
    Json(json!({
        "id": id,
        "pickupDate": body["pickupDate"],
        "total": body["total"],
        "specialInstructions": body["specialInstructions"]
    }))
    .into_response()
}

async fn admin_login(State(b): State<Backend>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    b.record("POST", "/admin/login", &headers);
    if body["username"] == "admin" && body["password"] == "secret" {
        (
            [(header::SET_COOKIE, format!("{}; Path=/; HttpOnly", SESSION))],
            Json(json!({"success": true})),
        )
            .into_response()
    } else {
        error(StatusCode::UNAUTHORIZED, "Invalid credentials")
    }
}

async fn admin_logout_handler(State(b): State<Backend>, headers: HeaderMap) -> Response {
    b.record("POST", "/admin/logout", &headers);
    Json(json!({"success": true})).into_response()
}

async fn customer_login(Json(body): Json<Value>) -> Response {
    if body["password"] == "pw" {
        Json(json!({
            "token": "jwt-1",
            "customer": {"id": 1, "name": "Asha", "email": body["email"], "phone": "555"}
        }))
        .into_response()
    } else {
        error(StatusCode::UNAUTHORIZED, "Invalid email or password")
    }
}

async fn not_json() -> Response {
    (StatusCode::OK, "<html>oops</html>").into_response()
}

async fn plain_failure() -> Response {
    (StatusCode::BAD_GATEWAY, "upstream down").into_response()
}

async fn slow() -> Response {
    tokio::time::sleep(Duration::from_secs(2)).await;
    Json(json!([])).into_response()
}

async fn spawn(backend: Backend) -> String {
    let app = Router::new()
        .route("/admin/api/customers", get(list_customers).post(create_customer))
        .route(
            "/admin/api/customers/{id}",
            put(update_customer).delete(delete_customer),
        )
        .route("/admin/api/orders", get(list_orders))
        .route("/admin/api/orders/{id}", put(update_order))
        .route("/admin/login", post(admin_login))
        .route("/admin/logout", post(admin_logout_handler))
        .route("/auth/login", post(customer_login))
        .route("/broken", get(not_json))
        .route("/bad-gateway", get(plain_failure))
        .route("/slow", get(slow))
        .with_state(backend);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn session_gateway(base: &str) -> Arc<dyn Gateway> {
    let auth = AuthStrategy::Session(Some(SESSION.to_string()));
    Arc::new(HttpGateway::new(base, auth, Duration::from_secs(5)).unwrap())
}

// =============================================================================
// Gateway normalization
// =============================================================================

#[tokio::test]
async fn error_body_message_is_surfaced() {
    let base = spawn(Backend::seeded()).await;
    let gw = session_gateway(&base);

    let err = gw
        .send(Method::Delete, "/admin/api/customers/2", None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, GatewayErrorKind::Status);
    assert_eq!(err.status_code, Some(500));
    assert_eq!(err.message, "Database locked");
}

#[tokio::test]
async fn non_json_error_falls_back_to_status_text() {
    let base = spawn(Backend::seeded()).await;
    let err = session_gateway(&base)
        .send(Method::Get, "/bad-gateway", None)
        .await
        .unwrap_err();
    assert_eq!(err.status_code, Some(502));
    assert!(err.message.contains("502"));
}

#[tokio::test]
async fn invalid_success_body_is_a_decode_error() {
    let base = spawn(Backend::seeded()).await;
    let err = session_gateway(&base)
        .send(Method::Get, "/broken", None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, GatewayErrorKind::Decode);
}

#[tokio::test]
async fn missing_session_is_unauthorized() {
    let base = spawn(Backend::seeded()).await;
    let gw = HttpGateway::new(&base, AuthStrategy::Session(None), Duration::from_secs(5)).unwrap();
    let err = gateway::fetch_list::<Customer>(&gw).await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.message, "Unauthorized");
}

#[tokio::test]
async fn timeout_is_a_transport_error() {
    let base = spawn(Backend::seeded()).await;
    let gw = HttpGateway::new(&base, AuthStrategy::Anonymous, Duration::from_millis(200)).unwrap();
    let err = gw.send(Method::Get, "/slow", None).await.unwrap_err();
    assert_eq!(err.kind, GatewayErrorKind::Transport);
    assert_eq!(err.status_code, None);
}

#[tokio::test]
async fn bearer_token_is_attached() {
    let backend = Backend::seeded();
    let base = spawn(backend.clone()).await;
    let mut store = CredentialStore::in_memory();
    store.set(TOKEN_KEY, "jwt-1");
    let gw = HttpGateway::new(
        &base,
        AuthStrategy::from_store(AuthKind::Bearer, &store),
        Duration::from_secs(5),
    )
    .unwrap();

    gw.send(Method::Get, "/admin/api/orders", None).await.unwrap();
    let seen = backend.seen.lock().unwrap();
    assert_eq!(seen[0].3.as_deref(), Some("Bearer jwt-1"));
    assert_eq!(seen[0].2, None);
}

// =============================================================================
// Pages over HTTP
// =============================================================================

#[tokio::test]
async fn customers_page_round_trip() {
    let backend = Backend::seeded();
    let base = spawn(backend.clone()).await;
    let notifier = Notifier::default();
    let mut rx = notifier.subscribe();
    let mut page = CustomersPage::new(session_gateway(&base), notifier, ReconcilePolicy::Refetch);

    page.mount().await.unwrap();
    assert_eq!(page.total(), 2);

    page.create.form = NewCustomer {
        name: "Meera".into(),
        email: "meera@x.com".into(),
        phone: "999".into(),
    };
    page.create_customer().await.unwrap();
    assert_eq!(page.total(), 3);

    page.open_edit(1);
    page.edit.draft_mut().unwrap().phone = "111".into();
    page.save_edit().await.unwrap();
    assert_eq!(page.list().get(&1).unwrap().phone, "111");

    page.request_delete(1);
    page.confirm_delete().await.unwrap();
    assert!(page.list().get(&1).is_none());

    page.request_delete(2);
    let err = page.confirm_delete().await.unwrap_err();
    assert!(matches!(err, ConsoleError::Gateway(_)));
    assert!(page.list().get(&2).is_some());

    let titles: Vec<String> = drain(&mut rx).into_iter().map(|n| n.title).collect();
    assert_eq!(
        titles,
        vec![
            "Customer Created",
            "Customer updated successfully",
            "Customer deleted",
            "Error"
        ]
    );
    // mount + one re-fetch after each successful mutation
    assert_eq!(backend.count("GET", "/admin/api/customers"), 4);
}

#[tokio::test]
async fn duplicate_email_keeps_form() {
    let base = spawn(Backend::seeded()).await;
    let notifier = Notifier::default();
    let mut rx = notifier.subscribe();
    let mut page = CustomersPage::new(session_gateway(&base), notifier, ReconcilePolicy::Refetch);

    page.create.form = NewCustomer {
        name: "Asha Again".into(),
        email: "asha@x.com".into(),
        phone: "555".into(),
    };
    page.create_customer().await.unwrap_err();
    assert_eq!(page.create.form.name, "Asha Again");
    let notes = drain(&mut rx);
    assert_eq!(
        notes[0].description.as_deref(),
        Some("Email already registered")
    );
}

#[tokio::test]
async fn order_edit_patches_without_refetch() {
    let backend = Backend::seeded();
    let base = spawn(backend.clone()).await;
    let mut page = OrdersPage::new(
        session_gateway(&base),
        Notifier::default(),
        ReconcilePolicy::EchoPatch,
    );
    page.mount().await.unwrap();

    page.open_edit("O1");
    {
        let draft = page.edit.draft_mut().unwrap();
        draft.pickup_date = Some("2024-01-02".into());
        draft.total = 500.0;
        draft.special_instructions = Some("rush".into());
    }
    page.save_edit().await.unwrap();

    let o1 = page.view("O1").unwrap();
    assert_eq!(o1.total, 500.0);
    assert_eq!(o1.special_instructions.as_deref(), Some("rush"));
    assert_eq!(o1.service.as_deref(), Some("Dry Clean"));
    assert_eq!(backend.count("GET", "/admin/api/orders"), 1);
}

// =============================================================================
// Session handling
// =============================================================================

#[tokio::test]
async fn admin_login_returns_session_cookie() {
    let backend = Backend::seeded();
    let base = spawn(backend.clone()).await;
    let client = AuthClient::new(&base, Duration::from_secs(5)).unwrap();

    let cookie = client.admin_login("admin", "secret").await.unwrap();
    assert_eq!(cookie, SESSION);

    let mut store = CredentialStore::in_memory();
    store.set(SESSION_KEY, cookie);
    let gw = HttpGateway::new(
        &base,
        AuthStrategy::from_store(AuthKind::Session, &store),
        Duration::from_secs(5),
    )
    .unwrap();
    let customers = gateway::fetch_list::<Customer>(&gw).await.unwrap();
    assert_eq!(customers.len(), 2);

    admin_logout(&gw).await.unwrap();
    assert_eq!(backend.count("POST", "/admin/logout"), 1);
}

#[tokio::test]
async fn wrong_admin_password_is_rejected() {
    let base = spawn(Backend::seeded()).await;
    let client = AuthClient::new(&base, Duration::from_secs(5)).unwrap();
    let err = client.admin_login("admin", "nope").await.unwrap_err();
    assert_eq!(err.status_code, Some(401));
    assert_eq!(err.message, "Invalid credentials");
}

#[tokio::test]
async fn customer_login_returns_token() {
    let base = spawn(Backend::seeded()).await;
    let client = AuthClient::new(&base, Duration::from_secs(5)).unwrap();
    let login = client.customer_login("asha@x.com", "pw").await.unwrap();
    assert_eq!(login.token, "jwt-1");
    assert_eq!(login.customer.email, "asha@x.com");
}
