//! Router tests driven through `tower::ServiceExt::oneshot`.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::mysql::MySqlPool;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use usergate_config::ServerConfig;
use usergate_core::{
    OrderQuery, PageQuery, PageResult, User, UserQuery, UsergateError, UsergateResult,
};
use usergate_repository::DatabasePoolInterface;
use usergate_rest::{build_router, AppState};
use usergate_service::{NewUser, PasswordCheck, UserService, UserUpdate};

#[derive(Default)]
struct FakeUserService {
    users: Mutex<HashMap<String, User>>,
    stall: bool,
}

impl FakeUserService {
    fn find(&self, username: &str) -> UsergateResult<User> {
        self.users
            .lock()
            .unwrap()
            .get(username)
            .cloned()
            .ok_or_else(|| UsergateError::not_found("User", username))
    }
}

#[async_trait]
impl UserService for FakeUserService {
    async fn create(&self, new_user: NewUser) -> UsergateResult<User> {
        let mut users = self.users.lock().unwrap();
        if users.contains_key(&new_user.username) {
            return Err(UsergateError::conflict(format!(
                "user {} already exists",
                new_user.username
            )));
        }
        let now = Utc::now();
        let user = User {
            id: i64::try_from(users.len()).unwrap() + 1,
            username: new_user.username.clone(),
            status: new_user.status,
            email: new_user.email,
            password_hash: String::new(),
            description: new_user.description,
            created_at: now,
            updated_at: now,
        };
        users.insert(new_user.username, user.clone());
        Ok(user)
    }

    async fn get(&self, username: &str) -> UsergateResult<User> {
        self.find(username)
    }

    async fn cache_get(&self, username: &str) -> UsergateResult<User> {
        if self.stall {
            std::future::pending::<()>().await;
        }
        self.find(username)
    }

    async fn query(
        &self,
        page: PageQuery,
        _order: OrderQuery,
        filter: UserQuery,
    ) -> UsergateResult<(Vec<User>, PageResult)> {
        let users = self.users.lock().unwrap();
        let mut matches: Vec<User> = users
            .values()
            .filter(|u| filter.username().map_or(true, |name| u.username == name))
            .filter(|u| filter.status.map_or(true, |status| u.status == status))
            .filter(|u| filter.email().map_or(true, |email| u.email == email))
            .cloned()
            .collect();
        matches.sort_by(|a, b| a.username.cmp(&b.username));

        let total = matches.len() as u64;
        let offset = usize::try_from(page.offset()).unwrap();
        let limit = usize::try_from(page.limit()).unwrap();
        let result = matches.into_iter().skip(offset).take(limit).collect();
        Ok((result, PageResult::new(page, total)))
    }

    async fn update(&self, update: UserUpdate) -> UsergateResult<User> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .get_mut(&update.username)
            .ok_or_else(|| UsergateError::not_found("User", &update.username))?;
        if let Some(status) = update.status {
            user.status = status;
        }
        if !update.email.is_empty() {
            user.email = update.email;
        }
        if !update.description.is_empty() {
            user.description = update.description;
        }
        Ok(user.clone())
    }

    async fn delete(&self, username: &str) -> UsergateResult<()> {
        self.users.lock().unwrap().remove(username);
        Ok(())
    }

    async fn authenticate_password(
        &self,
        username: &str,
        _password: &str,
    ) -> UsergateResult<PasswordCheck> {
        Ok(match self.find(username) {
            Ok(_) => PasswordCheck::Verified,
            Err(_) => PasswordCheck::UserNotFound,
        })
    }
}

struct FakeDatabase {
    pool: MySqlPool,
    healthy: bool,
}

#[async_trait]
impl DatabasePoolInterface for FakeDatabase {
    fn inner(&self) -> &MySqlPool {
        &self.pool
    }

    async fn health_check(&self) -> UsergateResult<()> {
        if self.healthy {
            Ok(())
        } else {
            Err(UsergateError::Database("connection refused".into()))
        }
    }

    async fn run_migrations(&self) -> UsergateResult<()> {
        Ok(())
    }

    async fn close(&self) {}
}

fn fake_database(healthy: bool) -> Arc<FakeDatabase> {
    let pool = MySqlPool::connect_lazy("mysql://usergate@127.0.0.1:1/usergate").unwrap();
    Arc::new(FakeDatabase { pool, healthy })
}

fn app_with(service: FakeUserService, healthy: bool, server: &ServerConfig) -> Router {
    let state = AppState::new(Arc::new(service), fake_database(healthy));
    build_router(state, server)
}

fn app() -> Router {
    app_with(FakeUserService::default(), true, &ServerConfig::default())
}

fn json_request(method: Method, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Option<String>, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let request_id = response
        .headers()
        .get("x-request-id")
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, request_id, body)
}

fn alice() -> Value {
    json!({
        "username": "alice",
        "email": "alice@example.com",
        "description": "first",
        "password": "passw0rd!",
        "confirmPassword": "passw0rd!"
    })
}

#[tokio::test]
async fn test_create_user_returns_user_without_hash() {
    let app = app();

    let (status, request_id, body) =
        send(&app, json_request(Method::POST, "/v1/users", &alice())).await;

    assert_eq!(status, StatusCode::OK);
    assert!(request_id.is_some());
    assert_eq!(body["username"], "alice");
    assert_eq!(body["status"], 1);
    assert_eq!(body["email"], "alice@example.com");
    assert!(body.get("passwordHash").is_none());
    assert!(body.get("password").is_none());
    assert!(body.get("id").is_none());
}

#[tokio::test]
async fn test_create_user_with_weak_password_is_bad_request() {
    let app = app();
    let mut request = alice();
    request["password"] = json!("password");
    request["confirmPassword"] = json!("password");

    let (status, request_id, body) =
        send(&app, json_request(Method::POST, "/v1/users", &request)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
    assert_eq!(
        body["message"],
        "password must contain at least one number, one letter, and one special character"
    );
    assert_eq!(body["requestId"].as_str(), request_id.as_deref());
}

#[tokio::test]
async fn test_create_user_with_mismatched_confirmation_is_bad_request() {
    let app = app();
    let mut request = alice();
    request["confirmPassword"] = json!("passw0rd?");

    let (status, _, body) = send(&app, json_request(Method::POST, "/v1/users", &request)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "password and confirm password do not match");
}

#[tokio::test]
async fn test_create_user_with_invalid_fields_is_bad_request() {
    let app = app();
    for (field, value) in [
        ("username", json!("al ice")),
        ("username", json!("")),
        ("email", json!("not-an-email")),
        ("description", json!("x".repeat(141))),
    ] {
        let mut request = alice();
        request[field] = value;
        let (status, _, body) =
            send(&app, json_request(Method::POST, "/v1/users", &request)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "field {field}");
        assert_eq!(body["code"], "BAD_REQUEST");
    }
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/v1/users")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"username\":"))
        .unwrap();

    let (status, _, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "invalid request body");
}

#[tokio::test]
async fn test_duplicate_create_is_conflict() {
    let app = app();
    send(&app, json_request(Method::POST, "/v1/users", &alice())).await;

    let (status, _, body) = send(&app, json_request(Method::POST, "/v1/users", &alice())).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");
}

#[tokio::test]
async fn test_get_user() {
    let app = app();
    send(&app, json_request(Method::POST, "/v1/users", &alice())).await;

    let (status, _, body) = send(&app, get("/v1/users/alice")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alice");

    let (status, request_id, body) = send(&app, get("/v1/users/bob")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
    assert_eq!(body["requestId"].as_str(), request_id.as_deref());
}

#[tokio::test]
async fn test_incoming_request_id_is_kept() {
    let app = app();
    let request = Request::builder()
        .uri("/v1/users/nobody")
        .header("x-request-id", "trace-123")
        .body(Body::empty())
        .unwrap();

    let (status, request_id, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(request_id.as_deref(), Some("trace-123"));
    assert_eq!(body["requestId"], "trace-123");
}

#[tokio::test]
async fn test_list_users_defaults_and_filters() {
    let app = app();
    for name in ["carol", "alice", "bob"] {
        let mut request = alice();
        request["username"] = json!(name);
        request["email"] = json!(format!("{name}@example.com"));
        send(&app, json_request(Method::POST, "/v1/users", &request)).await;
    }

    let (status, _, body) = send(&app, get("/v1/users")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pageNo"], 1);
    assert_eq!(body["pageSize"], 100);
    assert_eq!(body["totalCount"], 3);
    assert_eq!(body["result"].as_array().unwrap().len(), 3);

    let (_, _, body) = send(&app, get("/v1/users?pageNo=2&pageSize=2&orderBy=username")).await;
    assert_eq!(body["totalCount"], 3);
    assert_eq!(body["result"][0]["username"], "carol");

    let (_, _, body) = send(&app, get("/v1/users?email=bob%40example.com&username=")).await;
    assert_eq!(body["totalCount"], 1);
    assert_eq!(body["result"][0]["username"], "bob");
}

#[tokio::test]
async fn test_list_users_rejects_bad_parameters() {
    let app = app();
    for uri in [
        "/v1/users?orderBy=password_hash",
        "/v1/users?order=sideways",
        "/v1/users?status=3",
        "/v1/users?pageNo=0",
        "/v1/users?pageSize=abc",
        "/v1/users?username=a%20b",
    ] {
        let (status, _, body) = send(&app, get(uri)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["code"], "BAD_REQUEST");
    }
}

#[tokio::test]
async fn test_update_user() {
    let app = app();
    send(&app, json_request(Method::POST, "/v1/users", &alice())).await;

    let (status, _, body) = send(
        &app,
        json_request(Method::PUT, "/v1/users/alice", &json!({"status": 2})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], 2);
    assert_eq!(body["email"], "alice@example.com");
    assert_eq!(body["description"], "first");

    let (status, _, _) = send(
        &app,
        json_request(
            Method::PUT,
            "/v1/users/alice",
            &json!({"password": "newpassw0rd!", "confirmPassword": "newpassw0rd!"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_update_user_validation() {
    let app = app();
    send(&app, json_request(Method::POST, "/v1/users", &alice())).await;

    for body in [
        json!({"status": 3}),
        json!({"email": "nope"}),
        json!({"description": "x".repeat(141)}),
        json!({"confirmPassword": "passw0rd!"}),
        json!({"password": "short", "confirmPassword": "short"}),
    ] {
        let (status, _, _) =
            send(&app, json_request(Method::PUT, "/v1/users/alice", &body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    }
}

#[tokio::test]
async fn test_update_missing_user_is_not_found() {
    let app = app();

    let (status, _, body) = send(
        &app,
        json_request(Method::PUT, "/v1/users/ghost", &json!({"description": "x"})),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let app = app();
    send(&app, json_request(Method::POST, "/v1/users", &alice())).await;

    let delete = || {
        Request::builder()
            .method(Method::DELETE)
            .uri("/v1/users/alice")
            .body(Body::empty())
            .unwrap()
    };

    let (status, _, _) = send(&app, delete()).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _, _) = send(&app, delete()).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _, _) = send(&app, get("/v1/users/alice")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_healthz() {
    let (status, _, body) = send(&app(), get("/healthz")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let unhealthy = app_with(FakeUserService::default(), false, &ServerConfig::default());
    let (status, _, body) = send(&unhealthy, get("/healthz")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "unavailable");
}

#[tokio::test]
async fn test_slow_request_times_out() {
    let server = ServerConfig {
        request_timeout_secs: 1,
        ..ServerConfig::default()
    };
    let service = FakeUserService {
        stall: true,
        ..FakeUserService::default()
    };
    let app = app_with(service, true, &server);

    let (status, request_id, body) = send(&app, get("/v1/users/alice")).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "TIMEOUT");
    assert_eq!(body["requestId"].as_str(), request_id.as_deref());
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let (status, _, body) = send(&app(), get("/api-docs/openapi.json")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/v1/users"].is_object());
    assert!(body["paths"]["/v1/users/{username}"].is_object());
}
