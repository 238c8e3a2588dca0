//! Tenant-scoped CRUD for vehicles, bookings, and invoices.
//!
//! Ownership is checked here rather than in adapters: a record is loaded by
//! identifier and compared with the caller's tenant before anything is
//! returned or changed.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::domain::ports::{RecordRepository, RecordRepositoryError, TenantRecords};
use crate::domain::{Error, RecordValidationError, TenantId, TenantRecord};

fn map_repository_error(error: RecordRepositoryError) -> Error {
    let message = match error {
        RecordRepositoryError::Connection { message } | RecordRepositoryError::Query { message } => {
            message
        }
    };
    error!(%message, "record store failure");
    Error::internal(message)
}

fn map_validation_error(error: RecordValidationError) -> Error {
    Error::invalid_request(error.to_string()).with_details(json!({
        "field": error.field,
        "code": "invalid_field",
    }))
}

/// CRUD service for one record type.
pub struct TenantRecordService<R, Repo: ?Sized> {
    records: Arc<Repo>,
    clock: Arc<dyn Clock>,
    _record: PhantomData<fn() -> R>,
}

impl<R, Repo: ?Sized> TenantRecordService<R, Repo> {
    /// Create a service over `records`.
    pub fn new(records: Arc<Repo>, clock: Arc<dyn Clock>) -> Self {
        Self {
            records,
            clock,
            _record: PhantomData,
        }
    }
}

impl<R, Repo> TenantRecordService<R, Repo>
where
    R: TenantRecord,
    Repo: RecordRepository<R> + ?Sized,
{
    fn not_found() -> Error {
        Error::not_found(format!("{} not found", capitalise(R::KIND)))
    }

    async fn load_owned(&self, caller: &TenantId, id: Uuid) -> Result<R, Error> {
        let record = self
            .records
            .find_by_id(&id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(Self::not_found)?;
        if record.tenant_id() != caller {
            return Err(Error::forbidden(format!(
                "{} belongs to another tenant",
                capitalise(R::KIND)
            )));
        }
        Ok(record)
    }
}

fn capitalise(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

#[async_trait]
impl<R, Repo> TenantRecords<R> for TenantRecordService<R, Repo>
where
    R: TenantRecord,
    Repo: RecordRepository<R> + ?Sized,
{
    async fn create(&self, caller: &TenantId, draft: R::Draft) -> Result<R, Error> {
        let record =
            R::create(caller.clone(), draft, self.clock.utc()).map_err(map_validation_error)?;
        self.records
            .save(&record)
            .await
            .map_err(map_repository_error)?;
        info!(kind = R::KIND, id = %record.id(), tenant_id = %caller, "record created");
        Ok(record)
    }

    async fn list(&self, caller: &TenantId) -> Result<Vec<R>, Error> {
        self.records
            .list_for_tenant(caller)
            .await
            .map_err(map_repository_error)
    }

    async fn get(&self, caller: &TenantId, id: Uuid) -> Result<R, Error> {
        self.load_owned(caller, id).await
    }

    async fn update(&self, caller: &TenantId, id: Uuid, patch: R::Patch) -> Result<R, Error> {
        let mut record = self.load_owned(caller, id).await?;
        record
            .apply(patch, self.clock.utc())
            .map_err(map_validation_error)?;
        self.records
            .save(&record)
            .await
            .map_err(map_repository_error)?;
        Ok(record)
    }

    async fn delete(&self, caller: &TenantId, id: Uuid) -> Result<(), Error> {
        self.load_owned(caller, id).await?;
        let removed = self
            .records
            .delete(&id)
            .await
            .map_err(map_repository_error)?;
        if !removed {
            return Err(Self::not_found());
        }
        info!(kind = R::KIND, %id, tenant_id = %caller, "record deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "tenant_record_service_tests.rs"]
mod tests;
