//! PostgreSQL-backed `PageRepository` using Diesel.
//!
//! A page is written in one transaction: the page row is upserted, then its
//! block rows are replaced. `ordinal` preserves the in-memory block order.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::{AsyncConnection, RunQueryDsl};
use diesel_async::scoped_futures::ScopedFutureExt as _;
use uuid::Uuid;

use crate::domain::ports::{PageRepository, PageRepositoryError};
use crate::domain::{
    Block, BlockConfig, BlockId, BlockKind, Page, PageId, PageTitle, Slug, TenantId,
};

use super::diesel_error_mapping::{map_diesel_failure, map_pool_failure, unique_violation};
use super::models::{BlockRow, NewPageRow, PageRow, PageUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::{page_blocks, pages};

const SLUG_CONSTRAINT: &str = "pages_tenant_slug_key";

/// Diesel implementation of the page repository port.
#[derive(Clone)]
pub struct DieselPageRepository {
    pool: DbPool,
}

impl DieselPageRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PageRepositoryError {
    map_pool_failure(error, PageRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> PageRepositoryError {
    map_diesel_failure(
        error,
        PageRepositoryError::query,
        PageRepositoryError::connection,
    )
}

fn corrupt(field: &str, error: impl std::fmt::Display) -> PageRepositoryError {
    PageRepositoryError::query(format!("stored {field} is invalid: {error}"))
}

fn block_rows(page: &Page) -> Result<Vec<BlockRow>, PageRepositoryError> {
    page.blocks
        .iter()
        .enumerate()
        .map(|(ordinal, block)| {
            Ok(BlockRow {
                id: *block.id.as_uuid(),
                page_id: *page.id.as_uuid(),
                block_type: block.block_type.as_str().to_owned(),
                position: i32::try_from(block.position)
                    .map_err(|err| corrupt("block position", err))?,
                config: serde_json::to_value(&block.config)
                    .map_err(|err| corrupt("block config", err))?,
                ordinal: i32::try_from(ordinal).map_err(|err| corrupt("block ordinal", err))?,
                created_at: block.created_at,
                updated_at: block.updated_at,
            })
        })
        .collect()
}

fn row_to_block(row: BlockRow) -> Result<Block, PageRepositoryError> {
    Ok(Block {
        id: BlockId::from_uuid(row.id),
        page_id: PageId::from_uuid(row.page_id),
        block_type: BlockKind::parse(&row.block_type).map_err(|err| corrupt("block type", err))?,
        position: u32::try_from(row.position).map_err(|err| corrupt("block position", err))?,
        config: serde_json::from_value::<BlockConfig>(row.config)
            .map_err(|err| corrupt("block config", err))?,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn row_to_page(row: PageRow, blocks: Vec<BlockRow>) -> Result<Page, PageRepositoryError> {
    Ok(Page {
        id: PageId::from_uuid(row.id),
        tenant_id: TenantId::new(row.tenant_id).map_err(|err| corrupt("tenant id", err))?,
        slug: Slug::new(row.slug).map_err(|err| corrupt("slug", err))?,
        title: PageTitle::new(row.title).map_err(|err| corrupt("title", err))?,
        meta_description: row.meta_description,
        is_published: row.is_published,
        published_at: row.published_at,
        blocks: blocks
            .into_iter()
            .map(row_to_block)
            .collect::<Result<_, _>>()?,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

impl DieselPageRepository {
    async fn attach_blocks(&self, rows: Vec<PageRow>) -> Result<Vec<Page>, PageRepositoryError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let block_rows: Vec<BlockRow> = page_blocks::table
            .filter(page_blocks::page_id.eq_any(&ids))
            .order((page_blocks::page_id, page_blocks::ordinal))
            .select(BlockRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let mut by_page: HashMap<Uuid, Vec<BlockRow>> = HashMap::new();
        for block in block_rows {
            by_page.entry(block.page_id).or_default().push(block);
        }
        rows.into_iter()
            .map(|row| {
                let blocks = by_page.remove(&row.id).unwrap_or_default();
                row_to_page(row, blocks)
            })
            .collect()
    }

    async fn with_blocks(&self, row: Option<PageRow>) -> Result<Option<Page>, PageRepositoryError> {
        let Some(row) = row else {
            return Ok(None);
        };
        Ok(self.attach_blocks(vec![row]).await?.pop())
    }
}

#[async_trait]
impl PageRepository for DieselPageRepository {
    async fn save(&self, page: &Page) -> Result<(), PageRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let blocks = block_rows(page)?;
        let page_id = *page.id.as_uuid();
        let new_row = NewPageRow {
            id: page_id,
            tenant_id: page.tenant_id.as_str(),
            slug: page.slug.as_str(),
            title: page.title.as_str(),
            meta_description: page.meta_description.as_deref(),
            is_published: page.is_published,
            published_at: page.published_at,
            created_at: page.created_at,
            updated_at: page.updated_at,
        };
        let update = PageUpdate {
            slug: page.slug.as_str(),
            title: page.title.as_str(),
            meta_description: page.meta_description.as_deref(),
            is_published: page.is_published,
            published_at: page.published_at,
            updated_at: page.updated_at,
        };

        let result = conn
            .transaction(|conn| {
                async move {
                    diesel::insert_into(pages::table)
                        .values(&new_row)
                        .on_conflict(pages::id)
                        .do_update()
                        .set(&update)
                        .execute(conn)
                        .await?;
                    diesel::delete(page_blocks::table.filter(page_blocks::page_id.eq(page_id)))
                        .execute(conn)
                        .await?;
                    if !blocks.is_empty() {
                        diesel::insert_into(page_blocks::table)
                            .values(&blocks)
                            .execute(conn)
                            .await?;
                    }
                    Ok::<_, diesel::result::Error>(())
                }
                .scope_boxed()
            })
            .await;

        result.map_err(|error| match unique_violation(&error) {
            Some(SLUG_CONSTRAINT) => PageRepositoryError::duplicate_slug(page.slug.as_str()),
            _ => map_diesel_error(error),
        })
    }

    async fn find_by_id(&self, id: &PageId) -> Result<Option<Page>, PageRepositoryError> {
        let row = {
            let mut conn = self.pool.get().await.map_err(map_pool_error)?;
            pages::table
                .filter(pages::id.eq(*id.as_uuid()))
                .select(PageRow::as_select())
                .first::<PageRow>(&mut conn)
                .await
                .optional()
                .map_err(map_diesel_error)?
        };
        self.with_blocks(row).await
    }

    async fn find_by_slug(
        &self,
        tenant_id: &TenantId,
        slug: &Slug,
    ) -> Result<Option<Page>, PageRepositoryError> {
        let row = {
            let mut conn = self.pool.get().await.map_err(map_pool_error)?;
            pages::table
                .filter(pages::tenant_id.eq(tenant_id.as_str()))
                .filter(pages::slug.eq(slug.as_str()))
                .select(PageRow::as_select())
                .first::<PageRow>(&mut conn)
                .await
                .optional()
                .map_err(map_diesel_error)?
        };
        self.with_blocks(row).await
    }

    async fn list_for_tenant(&self, tenant_id: &TenantId) -> Result<Vec<Page>, PageRepositoryError> {
        let rows: Vec<PageRow> = {
            let mut conn = self.pool.get().await.map_err(map_pool_error)?;
            pages::table
                .filter(pages::tenant_id.eq(tenant_id.as_str()))
                .order((pages::created_at.desc(), pages::id.desc()))
                .select(PageRow::as_select())
                .load(&mut conn)
                .await
                .map_err(map_diesel_error)?
        };
        self.attach_blocks(rows).await
    }

    async fn delete(&self, id: &PageId) -> Result<bool, PageRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(pages::table.filter(pages::id.eq(*id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }
}
