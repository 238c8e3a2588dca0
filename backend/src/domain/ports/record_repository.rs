//! Driven port for tenant-owned records.
//!
//! One generic contract covers vehicles, bookings, and invoices; adapters
//! implement it once per record type.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{TenantId, TenantRecord};

use super::define_port_error;

define_port_error! {
    /// Errors raised by record persistence adapters.
    pub enum RecordRepositoryError {
        /// The backing store could not be reached.
        Connection { message: String } => "record store connection failed: {message}",
        /// A read or write failed.
        Query { message: String } => "record store query failed: {message}",
    }
}

/// Storage for records of type `R`.
#[async_trait]
pub trait RecordRepository<R: TenantRecord>: Send + Sync {
    /// Insert or replace a record.
    async fn save(&self, record: &R) -> Result<(), RecordRepositoryError>;

    /// Load a record by identifier regardless of owner.
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<R>, RecordRepositoryError>;

    /// List a tenant's records, newest first.
    async fn list_for_tenant(&self, tenant_id: &TenantId) -> Result<Vec<R>, RecordRepositoryError>;

    /// Delete a record. Returns `false` when nothing was stored.
    async fn delete(&self, id: &Uuid) -> Result<bool, RecordRepositoryError>;
}
