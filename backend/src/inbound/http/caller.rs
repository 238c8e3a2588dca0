//! Bearer token extraction and tenant authorisation for handlers.

use actix_web::HttpRequest;
use actix_web::http::header::AUTHORIZATION;

use crate::domain::{Error, Page, PageId, TenantId};
use crate::inbound::http::state::HttpState;

const BEARER_PREFIX: &str = "Bearer ";

/// Token carried in `Authorization: Bearer <token>`, if any.
pub(crate) fn bearer_token(req: &HttpRequest) -> Option<&str> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let token = value
        .strip_prefix(BEARER_PREFIX)
        .or_else(|| value.strip_prefix("bearer "))?
        .trim();
    (!token.is_empty()).then_some(token)
}

/// Check that the caller may act for `tenant_id`.
pub(crate) fn authorize_tenant(
    state: &HttpState,
    req: &HttpRequest,
    tenant_id: &TenantId,
) -> Result<(), Error> {
    state.access.authorize(bearer_token(req), tenant_id)
}

/// Load a page and check that the caller may act for its tenant.
pub(crate) async fn authorize_page(
    state: &HttpState,
    req: &HttpRequest,
    page_id: PageId,
) -> Result<Page, Error> {
    let page = state.pages_query.get_page(page_id).await?;
    authorize_tenant(state, req, &page.tenant_id)?;
    Ok(page)
}
