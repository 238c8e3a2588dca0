//! Test helpers for inbound HTTP components.

use std::net::{Ipv4Addr, SocketAddr};

use actix_web::web;

use crate::domain::test_fixtures::fixture_clock;
use crate::domain::{Tenant, TenantSignup};
use crate::inbound::http::state::HttpState;
use crate::server::{Repositories, ServerConfig, build_http_state};

/// Handler state over empty in-memory repositories, token checks disabled,
/// and the fixture clock.
pub fn in_memory_state() -> web::Data<HttpState> {
    let config = ServerConfig::new(
        SocketAddr::from((Ipv4Addr::LOCALHOST, 0)),
        Repositories::in_memory(),
    );
    web::Data::new(build_http_state(&config, fixture_clock()))
}

/// Register a tenant owned by `owner@acme.dk` under `subdomain`.
pub async fn signup_tenant(state: &HttpState, subdomain: &str) -> Tenant {
    let signup =
        TenantSignup::new("Acme Biler", "owner@acme.dk", subdomain).expect("valid signup");
    state
        .tenants
        .signup(signup)
        .await
        .expect("tenant signup")
        .tenant
}

