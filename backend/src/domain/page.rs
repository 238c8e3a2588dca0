//! Tenant pages built from ordered blocks.
//!
//! A page is an aggregate: its blocks are stored with it and removed with
//! it. Blocks are kept in insertion order; render order is obtained through
//! [`Page::ordered_blocks`], which sorts by position and keeps insertion order
//! for ties.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Block, BlockDraft, BlockId, BlockPatch, Slug, TenantId};

/// Maximum accepted title length in characters.
pub const TITLE_MAX: usize = 200;

/// Validation failures for page input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PageValidationError {
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("title must be at most {max} characters")]
    TitleTooLong { max: usize },
}

/// Identifier of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(Uuid);

impl PageId {
    /// Generate a fresh identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Validated page title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PageTitle(String);

impl PageTitle {
    /// Validate and construct a title. Surrounding whitespace is trimmed.
    pub fn new(value: impl Into<String>) -> Result<Self, PageValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(PageValidationError::EmptyTitle);
        }
        if trimmed.chars().count() > TITLE_MAX {
            return Err(PageValidationError::TitleTooLong { max: TITLE_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the title text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<PageTitle> for String {
    fn from(value: PageTitle) -> Self {
        value.0
    }
}

impl TryFrom<String> for PageTitle {
    type Error = PageValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Input for creating a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageDraft {
    pub tenant_id: TenantId,
    pub title: PageTitle,
    pub slug: Slug,
    pub meta_description: Option<String>,
}

/// Partial page update; `None` fields keep their stored values.
///
/// An empty `meta_description` clears the stored description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PagePatch {
    pub title: Option<PageTitle>,
    pub slug: Option<Slug>,
    pub meta_description: Option<String>,
    pub is_published: Option<bool>,
}

/// A tenant-owned page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: PageId,
    pub tenant_id: TenantId,
    pub slug: Slug,
    pub title: PageTitle,
    pub meta_description: Option<String>,
    pub is_published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub blocks: Vec<Block>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn normalise_description(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

impl Page {
    /// Create an unpublished page without blocks.
    pub fn new(draft: PageDraft, now: DateTime<Utc>) -> Self {
        let PageDraft {
            tenant_id,
            title,
            slug,
            meta_description,
        } = draft;
        Self {
            id: PageId::random(),
            tenant_id,
            slug,
            title,
            meta_description: meta_description.and_then(normalise_description),
            is_published: false,
            published_at: None,
            blocks: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge a patch into the page and refresh `updated_at`.
    pub fn apply(&mut self, patch: PagePatch, now: DateTime<Utc>) {
        let PagePatch {
            title,
            slug,
            meta_description,
            is_published,
        } = patch;
        if let Some(title) = title {
            self.title = title;
        }
        if let Some(slug) = slug {
            self.slug = slug;
        }
        if let Some(description) = meta_description {
            self.meta_description = normalise_description(description);
        }
        if let Some(published) = is_published {
            self.set_published(published, now);
        }
        self.updated_at = now;
    }

    /// Publish the page, keeping the original `published_at` when already
    /// published.
    pub fn publish(&mut self, now: DateTime<Utc>) {
        self.set_published(true, now);
        self.updated_at = now;
    }

    fn set_published(&mut self, published: bool, now: DateTime<Utc>) {
        match (self.is_published, published) {
            (false, true) => self.published_at = Some(now),
            (_, false) => self.published_at = None,
            (true, true) => {}
        }
        self.is_published = published;
    }

    /// Position assigned to a block appended without an explicit position.
    pub fn next_position(&self) -> u32 {
        u32::try_from(self.blocks.len()).unwrap_or(u32::MAX)
    }

    /// Append a block and return a copy of it.
    pub fn add_block(&mut self, draft: BlockDraft, now: DateTime<Utc>) -> Block {
        let BlockDraft {
            block_type,
            position,
            config,
        } = draft;
        let block = Block {
            id: BlockId::random(),
            page_id: self.id,
            block_type,
            position: position.unwrap_or_else(|| self.next_position()),
            config,
            created_at: now,
            updated_at: now,
        };
        self.blocks.push(block.clone());
        self.updated_at = now;
        block
    }

    /// Patch a block in place, returning the updated copy.
    pub fn update_block(
        &mut self,
        block_id: BlockId,
        patch: BlockPatch,
        now: DateTime<Utc>,
    ) -> Option<Block> {
        let block = self.blocks.iter_mut().find(|block| block.id == block_id)?;
        block.apply(patch, now);
        let updated = block.clone();
        self.updated_at = now;
        Some(updated)
    }

    /// Remove a block, returning it when present.
    pub fn remove_block(&mut self, block_id: BlockId, now: DateTime<Utc>) -> Option<Block> {
        let index = self.blocks.iter().position(|block| block.id == block_id)?;
        let removed = self.blocks.remove(index);
        self.updated_at = now;
        Some(removed)
    }

    /// Blocks in render order: ascending position, then insertion order.
    pub fn ordered_blocks(&self) -> Vec<&Block> {
        let mut ordered: Vec<&Block> = self.blocks.iter().collect();
        ordered.sort_by_key(|block| block.position);
        ordered
    }
}
