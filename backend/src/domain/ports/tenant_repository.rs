//! Driven port for tenant persistence.

use async_trait::async_trait;

use crate::domain::{Subdomain, Tenant, TenantId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by tenant persistence adapters.
    pub enum TenantRepositoryError {
        /// The backing store could not be reached.
        Connection { message: String } => "tenant store connection failed: {message}",
        /// A read or write failed.
        Query { message: String } => "tenant store query failed: {message}",
        /// The subdomain is already registered.
        DuplicateSubdomain { subdomain: String } => "subdomain {subdomain} is already taken",
    }
}

/// Storage for tenants.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TenantRepository: Send + Sync {
    /// Insert a new tenant. Subdomains are unique.
    async fn insert(&self, tenant: &Tenant) -> Result<(), TenantRepositoryError>;

    /// Look up a tenant by routing subdomain.
    async fn find_by_subdomain(
        &self,
        subdomain: &Subdomain,
    ) -> Result<Option<Tenant>, TenantRepositoryError>;

    /// Look up a tenant by identifier.
    async fn find_by_id(&self, id: &TenantId) -> Result<Option<Tenant>, TenantRepositoryError>;
}
