//! Access token issuing.
//!
//! ```text
//! POST /api/AuthToken {"tenant_id":"...","email":"owner@acme.dk","owner_key":"..."}
//! ```
//!
//! The owner key is returned once by `POST /api/TenantSignup`. Tokens are
//! sent back as `Authorization: Bearer <token>` on tenant-scoped routes.

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, TenantId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{require, require_tenant_id};

/// Request payload for issuing an access token.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct AuthTokenRequest {
    pub tenant_id: Option<String>,
    #[schema(example = "owner@acme.dk")]
    pub email: Option<String>,
    /// Key from the signup response.
    pub owner_key: Option<String>,
}

/// Token issued to a tenant owner.
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthTokenResponse {
    pub token: String,
    #[schema(value_type = String, format = DateTime)]
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

fn parse_request(payload: AuthTokenRequest) -> Result<(TenantId, String, String), Error> {
    let tenant_id = require_tenant_id(payload.tenant_id)?;
    let email = require(payload.email, "email")?;
    let owner_key = require(payload.owner_key, "owner_key")?;
    Ok((tenant_id, email, owner_key))
}

/// Issue a bearer token to the tenant owner.
#[utoipa::path(
    post,
    path = "/api/AuthToken",
    request_body = AuthTokenRequest,
    responses(
        (status = 201, description = "Token issued", body = AuthTokenResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Owner credentials do not match", body = ErrorSchema),
        (status = 404, description = "Tenant not found", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "authToken",
    security([])
)]
#[post("/AuthToken")]
pub async fn issue_token(
    state: web::Data<HttpState>,
    payload: web::Json<AuthTokenRequest>,
) -> ApiResult<HttpResponse> {
    let (tenant_id, email, owner_key) = parse_request(payload.into_inner())?;
    let issued = state
        .access
        .issue_token(&tenant_id, &email, &owner_key)
        .await?;
    Ok(HttpResponse::Created().json(AuthTokenResponse {
        token: issued.token,
        expires_at: issued.expires_at,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn request() -> AuthTokenRequest {
        AuthTokenRequest {
            tenant_id: Some("t1".to_owned()),
            email: Some("a@b.dk".to_owned()),
            owner_key: Some("key".to_owned()),
        }
    }

    #[rstest]
    fn accepts_complete_request() {
        let (tenant_id, email, owner_key) = parse_request(request()).expect("valid request");

        assert_eq!(tenant_id.as_str(), "t1");
        assert_eq!(email, "a@b.dk");
        assert_eq!(owner_key, "key");
    }

    #[rstest]
    #[case(AuthTokenRequest { tenant_id: None, ..request() }, "tenant_id")]
    #[case(AuthTokenRequest { email: Some("  ".to_owned()), ..request() }, "email")]
    #[case(AuthTokenRequest { owner_key: None, ..request() }, "owner_key")]
    fn rejects_missing_fields(#[case] payload: AuthTokenRequest, #[case] field: &str) {
        let err = parse_request(payload).expect_err("missing field");

        assert_eq!(err.details().expect("details")["field"], field);
    }
}
