//! Host-based tenant resolution with a per-request cache.
//!
//! The resolved tenant is stored in the request extensions so several
//! consumers within one request share a single directory lookup. Nothing is
//! cached across requests.

use actix_web::{HttpMessage, HttpRequest};

use crate::domain::{Error, Tenant};
use crate::inbound::http::state::HttpState;

/// Outcome of resolving the request host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTenant {
    /// Subdomain extracted from the host, `None` in the global context.
    pub subdomain: Option<String>,
    /// Tenant routed at the subdomain.
    pub tenant: Option<Tenant>,
}

/// Resolve the tenant addressed by the request's `Host` header.
///
/// An unknown subdomain fails with `not_found`; the root domain, `www`, and
/// foreign hosts resolve to the global context.
pub async fn resolve_request_tenant(
    state: &HttpState,
    req: &HttpRequest,
) -> Result<RequestTenant, Error> {
    if let Some(cached) = req.extensions().get::<RequestTenant>() {
        return Ok(cached.clone());
    }

    let host = req.connection_info().host().to_owned();
    let subdomain = state.resolver.subdomain_of(&host);
    let tenant = match subdomain.as_deref() {
        Some(subdomain) => Some(state.resolver.tenant_for(subdomain).await?),
        None => None,
    };
    let resolved = RequestTenant { subdomain, tenant };
    req.extensions_mut().insert(resolved.clone());
    Ok(resolved)
}
