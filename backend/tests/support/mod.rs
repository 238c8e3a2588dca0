//! Shared helpers for integration tests driving the full Actix app against
//! in-memory storage.
#![allow(
    dead_code,
    reason = "each integration test crate uses a different subset of helpers"
)]

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

use actix_http::Request;
use actix_web::body::{BoxBody, EitherBody};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::http::header::HeaderMap;
use actix_web::{test, web};
use mockable::DefaultClock;
use serde_json::{Value, json};

use lejio::inbound::http::health::HealthState;
use lejio::inbound::http::state::HttpState;
use lejio::server::{Repositories, ServerConfig, build_app, build_http_state};

pub type AppResponse = ServiceResponse<EitherBody<BoxBody>>;

/// Captured response for assertions.
pub struct Reply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
    pub text: String,
}

impl Reply {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }
}

/// Handler state over fresh in-memory storage.
pub fn state(token_secret: Option<&[u8]>) -> web::Data<HttpState> {
    let config = ServerConfig::new(
        SocketAddr::from((Ipv4Addr::LOCALHOST, 0)),
        Repositories::in_memory(),
    )
    .with_token_secret(token_secret);
    web::Data::new(build_http_state(&config, Arc::new(DefaultClock)))
}

/// Initialise the full application around `state`.
pub async fn init(
    state: web::Data<HttpState>,
) -> impl Service<Request, Response = AppResponse, Error = actix_web::Error> {
    let health = web::Data::new(HealthState::new());
    health.mark_ready();
    test::init_service(build_app(health, state)).await
}

pub async fn send<S>(app: &S, req: Request) -> Reply
where
    S: Service<Request, Response = AppResponse, Error = actix_web::Error>,
{
    let res = test::call_service(app, req).await;
    let status = res.status();
    let headers = res.headers().clone();
    let bytes = test::read_body(res).await;
    let text = String::from_utf8_lossy(&bytes).into_owned();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    Reply {
        status,
        headers,
        body,
        text,
    }
}

/// Sign up `subdomain` and return the tenant JSON.
pub async fn signup<S>(app: &S, subdomain: &str) -> Value
where
    S: Service<Request, Response = AppResponse, Error = actix_web::Error>,
{
    let req = test::TestRequest::post()
        .uri("/api/TenantSignup")
        .set_json(json!({
            "company_name": format!("{subdomain} biler"),
            "email": format!("owner@{subdomain}.dk"),
            "subdomain": subdomain,
        }))
        .to_request();
    let reply = send(app, req).await;
    assert_eq!(reply.status, StatusCode::CREATED, "{}", reply.text);
    reply.body
}

pub fn id_of(value: &Value) -> String {
    value["id"].as_str().expect("id").to_owned()
}
