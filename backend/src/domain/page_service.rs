//! Page builder domain service.
//!
//! Implements [`PageCommand`] and [`PageQuery`] over any [`PageRepository`].
//! Each operation loads the page aggregate, mutates it, and saves it back in
//! one repository write.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{error, info};

use crate::domain::ports::{PageCommand, PageQuery, PageRepository, PageRepositoryError};
use crate::domain::{
    Block, BlockDraft, BlockId, BlockPatch, Error, Page, PageDraft, PageId, PagePatch, Slug,
    TenantId,
};

const SLUG_TAKEN: &str = "Slug already exists for this tenant";

fn map_repository_error(error: PageRepositoryError) -> Error {
    match error {
        PageRepositoryError::DuplicateSlug { slug } => Error::conflict(SLUG_TAKEN)
            .with_details(json!({ "field": "slug", "value": slug, "code": "duplicate_slug" })),
        PageRepositoryError::Connection { message } | PageRepositoryError::Query { message } => {
            error!(%message, "page store failure");
            Error::internal(message)
        }
    }
}

fn page_not_found(page_id: PageId) -> Error {
    Error::not_found("Page not found").with_details(json!({ "page_id": page_id.to_string() }))
}

/// Page and block use-cases.
pub struct PageService<R: ?Sized> {
    pages: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R: ?Sized> PageService<R> {
    /// Create a service over a page repository.
    pub fn new(pages: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { pages, clock }
    }
}

impl<R> PageService<R>
where
    R: PageRepository + ?Sized,
{
    async fn load(&self, page_id: PageId) -> Result<Page, Error> {
        self.pages
            .find_by_id(&page_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| page_not_found(page_id))
    }

    async fn ensure_slug_available(
        &self,
        tenant_id: &TenantId,
        slug: &Slug,
        owner: Option<PageId>,
    ) -> Result<(), Error> {
        let existing = self
            .pages
            .find_by_slug(tenant_id, slug)
            .await
            .map_err(map_repository_error)?;
        match existing {
            Some(page) if Some(page.id) != owner => {
                Err(map_repository_error(PageRepositoryError::duplicate_slug(
                    slug.as_str(),
                )))
            }
            _ => Ok(()),
        }
    }

    async fn store(&self, page: &Page) -> Result<(), Error> {
        self.pages.save(page).await.map_err(map_repository_error)
    }
}

#[async_trait]
impl<R> PageCommand for PageService<R>
where
    R: PageRepository + ?Sized,
{
    async fn create_page(&self, draft: PageDraft) -> Result<Page, Error> {
        self.ensure_slug_available(&draft.tenant_id, &draft.slug, None)
            .await?;
        let page = Page::new(draft, self.clock.utc());
        self.store(&page).await?;
        info!(page_id = %page.id, tenant_id = %page.tenant_id, slug = %page.slug, "page created");
        Ok(page)
    }

    async fn update_page(&self, page_id: PageId, patch: PagePatch) -> Result<Page, Error> {
        let mut page = self.load(page_id).await?;
        if let Some(slug) = patch.slug.as_ref() {
            if slug != &page.slug {
                self.ensure_slug_available(&page.tenant_id, slug, Some(page.id))
                    .await?;
            }
        }
        page.apply(patch, self.clock.utc());
        self.store(&page).await?;
        Ok(page)
    }

    async fn publish_page(&self, page_id: PageId) -> Result<Page, Error> {
        let mut page = self.load(page_id).await?;
        page.publish(self.clock.utc());
        self.store(&page).await?;
        info!(page_id = %page.id, tenant_id = %page.tenant_id, "page published");
        Ok(page)
    }

    async fn delete_page(&self, page_id: PageId) -> Result<(), Error> {
        let removed = self
            .pages
            .delete(&page_id)
            .await
            .map_err(map_repository_error)?;
        if !removed {
            return Err(page_not_found(page_id));
        }
        info!(page_id = %page_id, "page deleted");
        Ok(())
    }

    async fn add_block(&self, page_id: PageId, draft: BlockDraft) -> Result<Block, Error> {
        let mut page = self.load(page_id).await?;
        let block = page.add_block(draft, self.clock.utc());
        self.store(&page).await?;
        Ok(block)
    }

    async fn update_block(
        &self,
        page_id: PageId,
        block_id: BlockId,
        patch: BlockPatch,
    ) -> Result<Block, Error> {
        let mut page = self.load(page_id).await?;
        let block = page
            .update_block(block_id, patch, self.clock.utc())
            .ok_or_else(|| Error::not_found("Block not found"))?;
        self.store(&page).await?;
        Ok(block)
    }

    async fn delete_block(&self, page_id: PageId, block_id: BlockId) -> Result<(), Error> {
        let mut page = self.load(page_id).await?;
        page.remove_block(block_id, self.clock.utc())
            .ok_or_else(|| Error::not_found("Block not found"))?;
        self.store(&page).await
    }
}

#[async_trait]
impl<R> PageQuery for PageService<R>
where
    R: PageRepository + ?Sized,
{
    async fn list_pages(
        &self,
        tenant_id: &TenantId,
        page_id: Option<PageId>,
    ) -> Result<Vec<Page>, Error> {
        let pages = self
            .pages
            .list_for_tenant(tenant_id)
            .await
            .map_err(map_repository_error)?;
        Ok(match page_id {
            Some(id) => pages.into_iter().filter(|page| page.id == id).collect(),
            None => pages,
        })
    }

    async fn get_page(&self, page_id: PageId) -> Result<Page, Error> {
        self.load(page_id).await
    }

    async fn published_page(&self, tenant_id: &TenantId, slug: &Slug) -> Result<Page, Error> {
        self.pages
            .find_by_slug(tenant_id, slug)
            .await
            .map_err(map_repository_error)?
            .filter(|page| page.is_published)
            .ok_or_else(|| Error::not_found("Page not found"))
    }
}

#[cfg(test)]
#[path = "page_service_tests.rs"]
mod tests;
