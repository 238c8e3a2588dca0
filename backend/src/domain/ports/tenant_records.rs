//! Driving port for tenant-scoped record CRUD.
//!
//! Every call names the caller's tenant. Reads and writes of a record owned
//! by another tenant fail with `forbidden`; unknown identifiers fail with
//! `not_found`.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Error, TenantId, TenantRecord};

/// CRUD over records of type `R` on behalf of a tenant.
#[async_trait]
pub trait TenantRecords<R: TenantRecord>: Send + Sync {
    /// Create a record owned by `caller`.
    async fn create(&self, caller: &TenantId, draft: R::Draft) -> Result<R, Error>;

    /// List records owned by `caller`.
    async fn list(&self, caller: &TenantId) -> Result<Vec<R>, Error>;

    /// Load one record owned by `caller`.
    async fn get(&self, caller: &TenantId, id: Uuid) -> Result<R, Error>;

    /// Merge a patch into a record owned by `caller`.
    async fn update(&self, caller: &TenantId, id: Uuid, patch: R::Patch) -> Result<R, Error>;

    /// Delete a record owned by `caller`.
    async fn delete(&self, caller: &TenantId, id: Uuid) -> Result<(), Error>;
}
