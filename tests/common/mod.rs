#![allow(dead_code)]

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{test, web};
use serde_json::{json, Value};
use task_organizer::auth::{provision_account, TokenResponse, TokenService};
use task_organizer::config::JwtSettings;
use task_organizer::storage::Storage;

pub const USERNAME: &str = "admin";
pub const PASSWORD: &str = "123456";

pub fn jwt_settings() -> JwtSettings {
    JwtSettings {
        secret: "integration-test-secret-0123456789abcdef".to_string(),
        issuer: "task-organizer-tests".to_string(),
        audience: "task-organizer-clients".to_string(),
    }
}

pub fn token_service() -> web::Data<TokenService> {
    web::Data::new(TokenService::new(&jwt_settings()))
}

/// In-memory storage holding the `admin` / `123456` account.
pub async fn seeded_storage() -> Storage {
    let storage = Storage::memory();
    provision_account(storage.credentials.as_ref(), USERNAME, PASSWORD)
        .await
        .expect("Failed to provision test account");
    storage
}

/// Builds the full app the way `main.rs` does, minus CORS.
#[macro_export]
macro_rules! init_app {
    ($storage:expr, $tokens:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .configure(|cfg| $storage.configure(cfg))
                .app_data($tokens.clone())
                .wrap(actix_web::middleware::Logger::default())
                .service(task_organizer::routes::health::health)
                .configure(task_organizer::routes::config),
        )
    };
}

pub async fn login<S, B>(app: &S, username: &str, password: &str) -> ServiceResponse<B>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({ "username": username, "password": password }))
        .to_request();
    test::call_service(app, req).await
}

pub async fn login_token<S, B>(app: &S) -> String
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let resp = login(app, USERNAME, PASSWORD).await;
    assert_eq!(resp.status(), StatusCode::OK, "Login with the seeded account failed");
    let body: TokenResponse = test::read_body_json(resp).await;
    body.token
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

pub fn task_payload(title: &str, data: &str, status: &str) -> Value {
    json!({
        "titulo": title,
        "descricao": format!("{} description", title),
        "data": data,
        "status": status
    })
}

/// Creates a task and returns the stored record.
pub async fn create_task<S, B>(app: &S, token: &str, payload: &Value) -> Value
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/tarefa")
        .append_header(bearer(token))
        .set_json(payload)
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED, "Task creation failed");
    test::read_body_json(resp).await
}

pub async fn get_json<S, B>(app: &S, token: &str, uri: &str) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::get()
        .uri(uri)
        .append_header(bearer(token))
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("Response body is not JSON")
    };
    (status, json)
}

pub fn titles(list: &Value) -> Vec<String> {
    list.as_array()
        .expect("Expected a JSON array")
        .iter()
        .map(|task| task["titulo"].as_str().unwrap_or_default().to_string())
        .collect()
}
