//! Driving ports for the page builder.
//!
//! Commands mutate pages and their blocks; queries read them. Both are
//! implemented by [`crate::domain::PageService`].

use async_trait::async_trait;

use crate::domain::{
    Block, BlockDraft, BlockId, BlockPatch, Error, Page, PageDraft, PageId, PagePatch, Slug,
    TenantId,
};

/// Page and block mutations.
#[async_trait]
pub trait PageCommand: Send + Sync {
    /// Create a page; fails with `conflict` when the tenant already uses the
    /// slug.
    async fn create_page(&self, draft: PageDraft) -> Result<Page, Error>;

    /// Merge supplied fields into a page.
    async fn update_page(&self, page_id: PageId, patch: PagePatch) -> Result<Page, Error>;

    /// Mark a page as published.
    async fn publish_page(&self, page_id: PageId) -> Result<Page, Error>;

    /// Delete a page and every block on it.
    async fn delete_page(&self, page_id: PageId) -> Result<(), Error>;

    /// Append a block to a page.
    async fn add_block(&self, page_id: PageId, draft: BlockDraft) -> Result<Block, Error>;

    /// Merge supplied fields into a block.
    async fn update_block(
        &self,
        page_id: PageId,
        block_id: BlockId,
        patch: BlockPatch,
    ) -> Result<Block, Error>;

    /// Remove a block from a page.
    async fn delete_block(&self, page_id: PageId, block_id: BlockId) -> Result<(), Error>;
}

/// Page reads.
#[async_trait]
pub trait PageQuery: Send + Sync {
    /// List a tenant's pages, optionally narrowed to one page.
    async fn list_pages(
        &self,
        tenant_id: &TenantId,
        page_id: Option<PageId>,
    ) -> Result<Vec<Page>, Error>;

    /// Load one page.
    async fn get_page(&self, page_id: PageId) -> Result<Page, Error>;

    /// Load a tenant's published page by slug.
    async fn published_page(&self, tenant_id: &TenantId, slug: &Slug) -> Result<Page, Error>;
}
