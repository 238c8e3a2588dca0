//! Tenant signup and lookup HTTP handlers.
//!
//! ```text
//! POST /api/TenantSignup
//! GET  /api/Tenant?subdomain=
//! GET  /api/ResolveTenant
//! ```

use actix_web::{HttpRequest, HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    Error, PlanTier, Subdomain, Tenant, TenantId, TenantRegistration, TenantSignup,
    TenantStatus, TenantValidationError, ThemeColor,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::tenant_context::resolve_request_tenant;
use crate::inbound::http::validation::{invalid_field_error, require};

/// Request payload for registering a lessor.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct TenantSignupRequest {
    #[schema(example = "Acme Biler")]
    pub company_name: Option<String>,
    #[schema(example = "owner@acme.dk")]
    pub email: Option<String>,
    #[schema(example = "acme")]
    pub subdomain: Option<String>,
}

/// Query parameters for tenant lookup.
#[derive(Debug, Default, Deserialize)]
pub struct TenantQuery {
    pub subdomain: Option<String>,
}

/// Public view of a tenant. Owner contact details and credentials stay
/// server side.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TenantResponse {
    #[schema(value_type = String)]
    pub id: TenantId,
    #[schema(example = "Acme Biler")]
    pub name: String,
    #[schema(value_type = String, example = "acme")]
    pub subdomain: Subdomain,
    #[schema(example = "acme.lejio-fri.dk")]
    pub domain: String,
    #[schema(value_type = String, example = "trial")]
    pub plan: PlanTier,
    #[schema(value_type = String, example = "active")]
    pub status: TenantStatus,
    #[schema(value_type = String, example = "#3b82f6")]
    pub primary_color: ThemeColor,
    pub logo_url: Option<String>,
    #[schema(value_type = String, format = DateTime)]
    pub trial_end_date: chrono::DateTime<chrono::Utc>,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<Tenant> for TenantResponse {
    fn from(tenant: Tenant) -> Self {
        Self {
            id: tenant.id,
            name: tenant.name,
            subdomain: tenant.subdomain,
            domain: tenant.domain,
            plan: tenant.plan,
            status: tenant.status,
            primary_color: tenant.primary_color,
            logo_url: tenant.logo_url,
            trial_end_date: tenant.trial_end_date,
            created_at: tenant.created_at,
            updated_at: tenant.updated_at,
        }
    }
}

/// Signup result returned to the new owner. `owner_key` is shown only here
/// and is required by `POST /api/AuthToken`.
#[derive(Debug, Serialize, ToSchema)]
pub struct TenantSignupResponse {
    #[serde(flatten)]
    pub tenant: TenantResponse,
    #[schema(example = "owner@acme.dk")]
    pub owner_email: String,
    pub owner_key: String,
}

impl From<TenantRegistration> for TenantSignupResponse {
    fn from(registration: TenantRegistration) -> Self {
        let TenantRegistration { tenant, owner_key } = registration;
        Self {
            owner_email: tenant.owner_email.as_str().to_owned(),
            owner_key: owner_key.as_str().to_owned(),
            tenant: tenant.into(),
        }
    }
}

/// Tenant addressed by the request host.
#[derive(Debug, Serialize, ToSchema)]
pub struct ResolvedTenantResponse {
    /// `null` in the global context.
    pub subdomain: Option<String>,
    pub tenant: Option<TenantResponse>,
}

fn signup_field(err: &TenantValidationError) -> &'static str {
    match err {
        TenantValidationError::EmptyName => "company_name",
        TenantValidationError::InvalidEmail => "email",
        _ => "subdomain",
    }
}

fn parse_signup(payload: TenantSignupRequest) -> Result<TenantSignup, Error> {
    let company_name = require(payload.company_name, "company_name")?;
    let email = require(payload.email, "email")?;
    let subdomain = require(payload.subdomain, "subdomain")?
        .trim()
        .to_ascii_lowercase();
    TenantSignup::new(company_name, email.trim(), subdomain)
        .map_err(|err| invalid_field_error(signup_field(&err), err))
}

/// Register a lessor on a trial plan.
#[utoipa::path(
    post,
    path = "/api/TenantSignup",
    request_body = TenantSignupRequest,
    responses(
        (status = 201, description = "Tenant created", body = TenantSignupResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Subdomain already taken", body = ErrorSchema)
    ),
    tags = ["tenants"],
    operation_id = "tenantSignup"
)]
#[post("/TenantSignup")]
pub async fn signup(
    state: web::Data<HttpState>,
    payload: web::Json<TenantSignupRequest>,
) -> ApiResult<HttpResponse> {
    let signup = parse_signup(payload.into_inner())?;
    let registration = state.tenants.signup(signup).await?;
    Ok(HttpResponse::Created().json(TenantSignupResponse::from(registration)))
}

/// Fetch tenant metadata by subdomain.
#[utoipa::path(
    get,
    path = "/api/Tenant",
    params(("subdomain" = String, Query, description = "Tenant subdomain")),
    responses(
        (status = 200, description = "Tenant", body = TenantResponse),
        (status = 400, description = "Missing subdomain", body = ErrorSchema),
        (status = 404, description = "Tenant not found", body = ErrorSchema)
    ),
    tags = ["tenants"],
    operation_id = "getTenant"
)]
#[get("/Tenant")]
pub async fn get_tenant(
    state: web::Data<HttpState>,
    query: web::Query<TenantQuery>,
) -> ApiResult<web::Json<TenantResponse>> {
    let subdomain = require(query.into_inner().subdomain, "subdomain")?;
    let tenant = state.tenants.by_subdomain(subdomain.trim()).await?;
    Ok(web::Json(tenant.into()))
}

/// Resolve the tenant addressed by the `Host` header.
#[utoipa::path(
    get,
    path = "/api/ResolveTenant",
    responses(
        (status = 200, description = "Resolution result", body = ResolvedTenantResponse),
        (status = 404, description = "Unknown subdomain", body = ErrorSchema)
    ),
    tags = ["tenants"],
    operation_id = "resolveTenant"
)]
#[get("/ResolveTenant")]
pub async fn resolve_tenant(
    state: web::Data<HttpState>,
    req: HttpRequest,
) -> ApiResult<web::Json<ResolvedTenantResponse>> {
    let resolved = resolve_request_tenant(&state, &req).await?;
    Ok(web::Json(ResolvedTenantResponse {
        subdomain: resolved.subdomain,
        tenant: resolved.tenant.map(TenantResponse::from),
    }))
}
