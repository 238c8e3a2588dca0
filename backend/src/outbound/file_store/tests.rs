//! Tests for the JSON file page store.

use chrono::{TimeZone, Utc};
use rstest::{fixture, rstest};
use tempfile::TempDir;

use super::*;
use crate::domain::{BlockConfig, BlockDraft, BlockKind, PageDraft, PageTitle};

struct Store {
    _root: TempDir,
    path: std::path::PathBuf,
    repo: JsonFilePageRepository,
}

#[fixture]
fn store() -> Store {
    let root = TempDir::new().expect("temp dir");
    let path = root.path().join("data");
    let repo = JsonFilePageRepository::open(&path).expect("open store");
    Store {
        _root: root,
        path,
        repo,
    }
}

fn page(tenant: &str, slug: &str) -> Page {
    let now = Utc
        .with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
        .single()
        .expect("timestamp");
    let mut page = Page::new(
        PageDraft {
            tenant_id: TenantId::new(tenant).expect("tenant"),
            title: PageTitle::new("Forside").expect("title"),
            slug: Slug::new(slug).expect("slug"),
            meta_description: None,
        },
        now,
    );
    for kind in [BlockKind::Hero, BlockKind::Text] {
        page.add_block(
            BlockDraft {
                block_type: kind,
                position: None,
                config: BlockConfig::default(),
            },
            now,
        );
    }
    page
}

#[rstest]
#[tokio::test]
async fn empty_directory_reads_as_no_pages(store: Store) {
    let pages = store
        .repo
        .list_for_tenant(&TenantId::new("t1").expect("tenant"))
        .await
        .expect("list");
    assert!(pages.is_empty());
}

#[rstest]
#[tokio::test]
async fn pages_survive_reopening(store: Store) {
    let stored = page("t1", "home");
    store.repo.save(&stored).await.expect("save");

    let reopened = JsonFilePageRepository::open(&store.path).expect("reopen");
    let loaded = reopened
        .find_by_id(&stored.id)
        .await
        .expect("load")
        .expect("page present");

    assert_eq!(loaded, stored);
    let kinds: Vec<&BlockKind> = loaded.blocks.iter().map(|block| &block.block_type).collect();
    assert_eq!(kinds, vec![&BlockKind::Hero, &BlockKind::Text]);
}

#[rstest]
#[tokio::test]
async fn block_index_tracks_owning_page(store: Store) {
    let stored = page("t1", "home");
    store.repo.save(&stored).await.expect("save");
    let block_id = stored.blocks[0].id;

    assert_eq!(
        store.repo.page_of_block(&block_id).expect("index"),
        Some(stored.id)
    );

    store.repo.delete(&stored.id).await.expect("delete");
    assert_eq!(store.repo.page_of_block(&block_id).expect("index"), None);
}

#[rstest]
#[tokio::test]
async fn duplicate_slug_is_rejected(store: Store) {
    store.repo.save(&page("t1", "home")).await.expect("save");

    let error = store
        .repo
        .save(&page("t1", "home"))
        .await
        .expect_err("duplicate");

    assert!(matches!(error, PageRepositoryError::DuplicateSlug { .. }));
}

#[rstest]
#[tokio::test]
async fn corrupt_file_surfaces_query_error(store: Store) {
    let dir = Dir::open_ambient_dir(&store.path, ambient_authority()).expect("dir");
    dir.write(PAGES_FILE, b"{ not json").expect("write");

    let error = store
        .repo
        .find_by_id(&PageId::random())
        .await
        .expect_err("corrupt");

    assert!(matches!(error, PageRepositoryError::Query { .. }));
}
