//! Driven port for page persistence.
//!
//! Pages are stored as aggregates: saving a page writes its blocks too, and
//! deleting a page removes them.

use async_trait::async_trait;

use crate::domain::{Page, PageId, Slug, TenantId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by page persistence adapters.
    pub enum PageRepositoryError {
        /// The backing store could not be reached.
        Connection { message: String } => "page store connection failed: {message}",
        /// A read or write failed.
        Query { message: String } => "page store query failed: {message}",
        /// Another page of the same tenant already uses the slug.
        DuplicateSlug { slug: String } => "slug {slug} is already used by this tenant",
    }
}

/// Storage for page aggregates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageRepository: Send + Sync {
    /// Insert or replace a page together with its blocks.
    async fn save(&self, page: &Page) -> Result<(), PageRepositoryError>;

    /// Load a page by identifier.
    async fn find_by_id(&self, id: &PageId) -> Result<Option<Page>, PageRepositoryError>;

    /// Load a tenant's page by slug.
    async fn find_by_slug(
        &self,
        tenant_id: &TenantId,
        slug: &Slug,
    ) -> Result<Option<Page>, PageRepositoryError>;

    /// List every page owned by a tenant, newest first.
    async fn list_for_tenant(&self, tenant_id: &TenantId)
    -> Result<Vec<Page>, PageRepositoryError>;

    /// Delete a page and its blocks. Returns `false` when nothing was stored.
    async fn delete(&self, id: &PageId) -> Result<bool, PageRepositoryError>;
}
