//! JSON file page store for local development.
//!
//! Layout inside the data directory:
//! - `pages.json`: page id to page record, blocks embedded in insertion order.
//! - `blocks.json`: block id to owning page id.
//!
//! Every write rewrites both files through a staged copy followed by a
//! rename. Writes are serialised within the process only; two processes
//! sharing a directory will lose updates.

use std::collections::BTreeMap;
use std::io;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{PageRepository, PageRepositoryError};
use crate::domain::{BlockId, Page, PageId, Slug, TenantId};

/// File holding page records.
pub const PAGES_FILE: &str = "pages.json";
/// File holding the block index.
pub const BLOCKS_FILE: &str = "blocks.json";

type PageMap = BTreeMap<PageId, Page>;

fn io_error(file: &str, error: io::Error) -> PageRepositoryError {
    PageRepositoryError::query(format!("{file}: {error}"))
}

/// Page repository persisted as JSON documents.
#[derive(Debug)]
pub struct JsonFilePageRepository {
    dir: Dir,
    write_lock: Mutex<()>,
}

impl JsonFilePageRepository {
    /// Open (creating if needed) the data directory at `path`.
    pub fn open(path: &Path) -> io::Result<Self> {
        Dir::create_ambient_dir_all(path, ambient_authority())?;
        let dir = Dir::open_ambient_dir(path, ambient_authority())?;
        Ok(Self {
            dir,
            write_lock: Mutex::new(()),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>, PageRepositoryError> {
        self.write_lock
            .lock()
            .map_err(|_| PageRepositoryError::query("page file lock poisoned"))
    }

    fn read_json<T: DeserializeOwned + Default>(&self, file: &str) -> Result<T, PageRepositoryError> {
        match self.dir.read_to_string(file) {
            Ok(text) if text.trim().is_empty() => Ok(T::default()),
            Ok(text) => serde_json::from_str(&text)
                .map_err(|error| PageRepositoryError::query(format!("{file}: {error}"))),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(T::default()),
            Err(error) => Err(io_error(file, error)),
        }
    }

    fn write_json<T: Serialize>(&self, file: &str, value: &T) -> Result<(), PageRepositoryError> {
        let body = serde_json::to_vec_pretty(value)
            .map_err(|error| PageRepositoryError::query(format!("{file}: {error}")))?;
        let staged = format!(".{file}.{}.tmp", Uuid::new_v4().simple());
        self.dir
            .write(&staged, body)
            .map_err(|error| io_error(file, error))?;
        self.dir.rename(&staged, &self.dir, file).map_err(|error| {
            let _cleanup = self.dir.remove_file(&staged);
            io_error(file, error)
        })
    }

    fn read_pages(&self) -> Result<PageMap, PageRepositoryError> {
        self.read_json(PAGES_FILE)
    }

    fn persist(&self, pages: &PageMap) -> Result<(), PageRepositoryError> {
        let index: BTreeMap<BlockId, PageId> = pages
            .values()
            .flat_map(|page| page.blocks.iter().map(move |block| (block.id, page.id)))
            .collect();
        self.write_json(PAGES_FILE, pages)?;
        self.write_json(BLOCKS_FILE, &index)?;
        debug!(pages = pages.len(), blocks = index.len(), "page files written");
        Ok(())
    }

    /// Look up the page that owns `block_id` through the block index.
    #[cfg(test)]
    pub(crate) fn page_of_block(&self, block_id: &BlockId) -> Result<Option<PageId>, PageRepositoryError> {
        let index: BTreeMap<BlockId, PageId> = self.read_json(BLOCKS_FILE)?;
        Ok(index.get(block_id).copied())
    }
}

#[async_trait]
impl PageRepository for JsonFilePageRepository {
    async fn save(&self, page: &Page) -> Result<(), PageRepositoryError> {
        let _guard = self.lock()?;
        let mut pages = self.read_pages()?;
        let clash = pages.values().any(|stored| {
            stored.id != page.id && stored.tenant_id == page.tenant_id && stored.slug == page.slug
        });
        if clash {
            return Err(PageRepositoryError::duplicate_slug(page.slug.as_str()));
        }
        pages.insert(page.id, page.clone());
        self.persist(&pages)
    }

    async fn find_by_id(&self, id: &PageId) -> Result<Option<Page>, PageRepositoryError> {
        Ok(self.read_pages()?.remove(id))
    }

    async fn find_by_slug(
        &self,
        tenant_id: &TenantId,
        slug: &Slug,
    ) -> Result<Option<Page>, PageRepositoryError> {
        Ok(self
            .read_pages()?
            .into_values()
            .find(|page| &page.tenant_id == tenant_id && &page.slug == slug))
    }

    async fn list_for_tenant(&self, tenant_id: &TenantId) -> Result<Vec<Page>, PageRepositoryError> {
        let mut pages: Vec<Page> = self
            .read_pages()?
            .into_values()
            .filter(|page| &page.tenant_id == tenant_id)
            .collect();
        pages.sort_by(|left, right| right.created_at.cmp(&left.created_at));
        Ok(pages)
    }

    async fn delete(&self, id: &PageId) -> Result<bool, PageRepositoryError> {
        let _guard = self.lock()?;
        let mut pages = self.read_pages()?;
        if pages.remove(id).is_none() {
            return Ok(false);
        }
        self.persist(&pages)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests;
