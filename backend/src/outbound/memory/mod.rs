//! In-memory adapters for every repository port.
//!
//! Used by the `memory` storage mode and by integration tests. Each store is
//! a single mutex-guarded map; a poisoned lock surfaces as a query error
//! rather than a panic.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::ports::{
    PageRepository, PageRepositoryError, RecordRepository, RecordRepositoryError,
    TenantRepository, TenantRepositoryError,
};
use crate::domain::{Page, PageId, Slug, Subdomain, Tenant, TenantId, TenantRecord};

fn lock<'a, T>(mutex: &'a Mutex<T>, store: &str) -> Result<MutexGuard<'a, T>, String> {
    mutex
        .lock()
        .map_err(|_| format!("{store} store lock poisoned"))
}

/// Page aggregates held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryPageRepository {
    pages: Mutex<HashMap<PageId, Page>>,
}

impl InMemoryPageRepository {
    fn guard(&self) -> Result<MutexGuard<'_, HashMap<PageId, Page>>, PageRepositoryError> {
        lock(&self.pages, "page").map_err(PageRepositoryError::query)
    }
}

#[async_trait]
impl PageRepository for InMemoryPageRepository {
    async fn save(&self, page: &Page) -> Result<(), PageRepositoryError> {
        let mut pages = self.guard()?;
        let clash = pages.values().any(|stored| {
            stored.id != page.id && stored.tenant_id == page.tenant_id && stored.slug == page.slug
        });
        if clash {
            return Err(PageRepositoryError::duplicate_slug(page.slug.as_str()));
        }
        pages.insert(page.id, page.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &PageId) -> Result<Option<Page>, PageRepositoryError> {
        Ok(self.guard()?.get(id).cloned())
    }

    async fn find_by_slug(
        &self,
        tenant_id: &TenantId,
        slug: &Slug,
    ) -> Result<Option<Page>, PageRepositoryError> {
        Ok(self
            .guard()?
            .values()
            .find(|page| &page.tenant_id == tenant_id && &page.slug == slug)
            .cloned())
    }

    async fn list_for_tenant(&self, tenant_id: &TenantId) -> Result<Vec<Page>, PageRepositoryError> {
        let mut pages: Vec<Page> = self
            .guard()?
            .values()
            .filter(|page| &page.tenant_id == tenant_id)
            .cloned()
            .collect();
        pages.sort_by(|left, right| right.created_at.cmp(&left.created_at));
        Ok(pages)
    }

    async fn delete(&self, id: &PageId) -> Result<bool, PageRepositoryError> {
        Ok(self.guard()?.remove(id).is_some())
    }
}

/// Tenants held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryTenantRepository {
    tenants: Mutex<HashMap<TenantId, Tenant>>,
}

impl InMemoryTenantRepository {
    fn guard(&self) -> Result<MutexGuard<'_, HashMap<TenantId, Tenant>>, TenantRepositoryError> {
        lock(&self.tenants, "tenant").map_err(TenantRepositoryError::query)
    }
}

#[async_trait]
impl TenantRepository for InMemoryTenantRepository {
    async fn insert(&self, tenant: &Tenant) -> Result<(), TenantRepositoryError> {
        let mut tenants = self.guard()?;
        if tenants
            .values()
            .any(|stored| stored.subdomain == tenant.subdomain)
        {
            return Err(TenantRepositoryError::duplicate_subdomain(
                tenant.subdomain.as_str(),
            ));
        }
        tenants.insert(tenant.id.clone(), tenant.clone());
        Ok(())
    }

    async fn find_by_subdomain(
        &self,
        subdomain: &Subdomain,
    ) -> Result<Option<Tenant>, TenantRepositoryError> {
        Ok(self
            .guard()?
            .values()
            .find(|tenant| &tenant.subdomain == subdomain)
            .cloned())
    }

    async fn find_by_id(&self, id: &TenantId) -> Result<Option<Tenant>, TenantRepositoryError> {
        Ok(self.guard()?.get(id).cloned())
    }
}

/// Tenant-owned records of one type held in process memory.
#[derive(Debug)]
pub struct InMemoryRecordRepository<R> {
    records: Mutex<HashMap<Uuid, R>>,
}

impl<R> Default for InMemoryRecordRepository<R> {
    fn default() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
        }
    }
}

impl<R: TenantRecord> InMemoryRecordRepository<R> {
    fn guard(&self) -> Result<MutexGuard<'_, HashMap<Uuid, R>>, RecordRepositoryError> {
        lock(&self.records, R::KIND).map_err(RecordRepositoryError::query)
    }
}

#[async_trait]
impl<R: TenantRecord> RecordRepository<R> for InMemoryRecordRepository<R> {
    async fn save(&self, record: &R) -> Result<(), RecordRepositoryError> {
        self.guard()?.insert(record.id(), record.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<R>, RecordRepositoryError> {
        Ok(self.guard()?.get(id).cloned())
    }

    async fn list_for_tenant(&self, tenant_id: &TenantId) -> Result<Vec<R>, RecordRepositoryError> {
        let mut records: Vec<R> = self
            .guard()?
            .values()
            .filter(|record| record.tenant_id() == tenant_id)
            .cloned()
            .collect();
        records.sort_by_key(|record| std::cmp::Reverse(record.created_at()));
        Ok(records)
    }

    async fn delete(&self, id: &Uuid) -> Result<bool, RecordRepositoryError> {
        Ok(self.guard()?.remove(id).is_some())
    }
}

#[cfg(test)]
mod tests;
