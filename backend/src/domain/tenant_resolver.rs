//! Host-based tenant resolution.
//!
//! Tenant sites are served from `<subdomain>.<root domain>`. The bare root
//! domain and `www` are the global marketing context and carry no tenant.

use std::sync::Arc;

use tracing::debug;

use crate::domain::ports::TenantDirectory;
use crate::domain::{Error, Tenant};

/// Subdomain that always maps to the global context.
const GLOBAL_SUBDOMAIN: &str = "www";

/// Extract the tenant subdomain from a `Host` value.
///
/// The port is ignored and comparison is case-insensitive. Returns `None` for
/// the root domain, `www`, hosts outside the root domain, and nested
/// subdomains.
///
/// # Examples
/// ```
/// use lejio::domain::resolve_subdomain;
///
/// assert_eq!(resolve_subdomain("acme.lejio-fri.dk", "lejio-fri.dk"), Some("acme".into()));
/// assert_eq!(resolve_subdomain("ACME.lejio-fri.dk:8080", "lejio-fri.dk"), Some("acme".into()));
/// assert_eq!(resolve_subdomain("www.lejio-fri.dk", "lejio-fri.dk"), None);
/// assert_eq!(resolve_subdomain("lejio-fri.dk", "lejio-fri.dk"), None);
/// ```
pub fn resolve_subdomain(host: &str, root_domain: &str) -> Option<String> {
    let hostname = host
        .split(':')
        .next()
        .unwrap_or_default()
        .trim()
        .trim_end_matches('.')
        .to_ascii_lowercase();
    let root = root_domain.trim().trim_end_matches('.').to_ascii_lowercase();
    let prefix = hostname.strip_suffix(root.as_str())?.strip_suffix('.')?;
    if prefix.is_empty() || prefix.contains('.') || prefix == GLOBAL_SUBDOMAIN {
        return None;
    }
    Some(prefix.to_owned())
}

/// Resolves request hosts to tenants through a [`TenantDirectory`].
#[derive(Clone)]
pub struct TenantResolver {
    root_domain: String,
    directory: Arc<dyn TenantDirectory>,
}

impl TenantResolver {
    /// Create a resolver for hosts under `root_domain`.
    pub fn new(root_domain: impl Into<String>, directory: Arc<dyn TenantDirectory>) -> Self {
        Self {
            root_domain: root_domain.into(),
            directory,
        }
    }

    /// Platform root domain.
    pub fn root_domain(&self) -> &str {
        &self.root_domain
    }

    /// Subdomain carried by `host`, if any.
    pub fn subdomain_of(&self, host: &str) -> Option<String> {
        resolve_subdomain(host, &self.root_domain)
    }

    /// Load the tenant for `subdomain`, failing with `not_found` when unknown.
    pub async fn tenant_for(&self, subdomain: &str) -> Result<Tenant, Error> {
        self.directory.by_subdomain(subdomain).await
    }

    /// Resolve a host to its tenant. The global context yields `Ok(None)`.
    pub async fn resolve_host(&self, host: &str) -> Result<Option<Tenant>, Error> {
        let Some(subdomain) = self.subdomain_of(host) else {
            debug!(%host, "host resolves to the global context");
            return Ok(None);
        };
        self.tenant_for(&subdomain).await.map(Some)
    }
}
