//! PostgreSQL-backed `TenantRepository` using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{TenantRepository, TenantRepositoryError};
use crate::domain::{ContactEmail, OwnerKeyDigest, Subdomain, Tenant, TenantId, ThemeColor};

use super::diesel_error_mapping::{map_diesel_failure, map_pool_failure, unique_violation};
use super::models::TenantRow;
use super::pool::{DbPool, PoolError};
use super::schema::tenants;

/// Diesel implementation of the tenant repository port.
#[derive(Clone)]
pub struct DieselTenantRepository {
    pool: DbPool,
}

impl DieselTenantRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> TenantRepositoryError {
    map_pool_failure(error, TenantRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> TenantRepositoryError {
    map_diesel_failure(
        error,
        TenantRepositoryError::query,
        TenantRepositoryError::connection,
    )
}

fn tenant_to_row(tenant: &Tenant) -> TenantRow {
    TenantRow {
        id: tenant.id.as_str().to_owned(),
        name: tenant.name.clone(),
        subdomain: tenant.subdomain.as_str().to_owned(),
        domain: tenant.domain.clone(),
        plan: tenant.plan.as_str().to_owned(),
        status: tenant.status.as_str().to_owned(),
        owner_email: tenant.owner_email.as_str().to_owned(),
        owner_key_digest: tenant.owner_key_digest.as_str().to_owned(),
        primary_color: tenant.primary_color.to_string(),
        logo_url: tenant.logo_url.clone(),
        trial_end_date: tenant.trial_end_date,
        created_at: tenant.created_at,
        updated_at: tenant.updated_at,
    }
}

fn row_to_tenant(row: TenantRow) -> Result<Tenant, TenantRepositoryError> {
    let invalid = |err: crate::domain::TenantValidationError| {
        TenantRepositoryError::query(format!("stored tenant is invalid: {err}"))
    };
    Ok(Tenant {
        id: TenantId::new(row.id).map_err(invalid)?,
        name: row.name,
        subdomain: Subdomain::new(row.subdomain).map_err(invalid)?,
        domain: row.domain,
        plan: row.plan.parse().map_err(invalid)?,
        status: row.status.parse().map_err(invalid)?,
        owner_email: ContactEmail::new(row.owner_email).map_err(invalid)?,
        owner_key_digest: OwnerKeyDigest::from_stored(row.owner_key_digest).map_err(|err| {
            TenantRepositoryError::query(format!("stored tenant is invalid: {err}"))
        })?,
        primary_color: ThemeColor::new(row.primary_color).map_err(invalid)?,
        logo_url: row.logo_url,
        trial_end_date: row.trial_end_date,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

#[async_trait]
impl TenantRepository for DieselTenantRepository {
    async fn insert(&self, tenant: &Tenant) -> Result<(), TenantRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(tenants::table)
            .values(&tenant_to_row(tenant))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|error| match unique_violation(&error) {
                Some(_) => TenantRepositoryError::duplicate_subdomain(tenant.subdomain.as_str()),
                None => map_diesel_error(error),
            })
    }

    async fn find_by_subdomain(
        &self,
        subdomain: &Subdomain,
    ) -> Result<Option<Tenant>, TenantRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = tenants::table
            .filter(tenants::subdomain.eq(subdomain.as_str()))
            .select(TenantRow::as_select())
            .first::<TenantRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_tenant).transpose()
    }

    async fn find_by_id(&self, id: &TenantId) -> Result<Option<Tenant>, TenantRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = tenants::table
            .filter(tenants::id.eq(id.as_str()))
            .select(TenantRow::as_select())
            .first::<TenantRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_tenant).transpose()
    }
}
