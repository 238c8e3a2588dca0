//! Driving port for tenant signup and lookup.

use async_trait::async_trait;

use crate::domain::{Error, Tenant, TenantId, TenantRegistration, TenantSignup};

/// Tenant registration and lookup use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TenantDirectory: Send + Sync {
    /// Register a trial tenant and mint its owner key; fails with `conflict`
    /// when the subdomain is taken.
    async fn signup(&self, signup: TenantSignup) -> Result<TenantRegistration, Error>;

    /// Find the tenant routed at `subdomain`; fails with `not_found`.
    async fn by_subdomain(&self, subdomain: &str) -> Result<Tenant, Error>;

    /// Find a tenant by identifier; fails with `not_found`.
    async fn by_id(&self, id: &TenantId) -> Result<Tenant, Error>;
}
