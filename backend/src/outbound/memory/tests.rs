//! Behavioural coverage for the in-memory stores.

use chrono::{Duration, TimeZone, Utc};
use rstest::{fixture, rstest};

use super::*;
use crate::domain::{OwnerKey, PageDraft, PageTitle, TenantSignup, Vehicle, VehicleDraft};

fn timestamp() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

fn page(tenant: &str, slug: &str, offset_minutes: i64) -> Page {
    Page::new(
        PageDraft {
            tenant_id: TenantId::new(tenant).expect("tenant"),
            title: PageTitle::new("Forside").expect("title"),
            slug: Slug::new(slug).expect("slug"),
            meta_description: None,
        },
        timestamp() + Duration::minutes(offset_minutes),
    )
}

#[fixture]
fn pages() -> InMemoryPageRepository {
    InMemoryPageRepository::default()
}

#[rstest]
#[tokio::test]
async fn same_slug_in_same_tenant_conflicts(pages: InMemoryPageRepository) {
    pages.save(&page("t1", "home", 0)).await.expect("first save");

    let error = pages
        .save(&page("t1", "home", 1))
        .await
        .expect_err("duplicate slug");

    assert!(matches!(error, PageRepositoryError::DuplicateSlug { .. }));
}

#[rstest]
#[tokio::test]
async fn same_slug_in_other_tenant_is_allowed(pages: InMemoryPageRepository) {
    pages.save(&page("t1", "home", 0)).await.expect("first save");
    pages.save(&page("t2", "home", 0)).await.expect("second save");
}

#[rstest]
#[tokio::test]
async fn resaving_a_page_keeps_its_slug(pages: InMemoryPageRepository) {
    let mut stored = page("t1", "home", 0);
    pages.save(&stored).await.expect("first save");
    stored.title = PageTitle::new("Velkommen").expect("title");

    pages.save(&stored).await.expect("update");

    let loaded = pages.find_by_id(&stored.id).await.expect("load");
    assert_eq!(loaded.map(|page| page.title), Some(stored.title));
}

#[rstest]
#[tokio::test]
async fn lists_newest_first(pages: InMemoryPageRepository) {
    let older = page("t1", "older", 0);
    let newer = page("t1", "newer", 5);
    pages.save(&older).await.expect("save");
    pages.save(&newer).await.expect("save");
    pages.save(&page("t2", "other", 10)).await.expect("save");

    let listed = pages
        .list_for_tenant(&TenantId::new("t1").expect("tenant"))
        .await
        .expect("list");

    let ids: Vec<PageId> = listed.iter().map(|page| page.id).collect();
    assert_eq!(ids, vec![newer.id, older.id]);
}

#[rstest]
#[tokio::test]
async fn delete_reports_whether_anything_was_removed(pages: InMemoryPageRepository) {
    let stored = page("t1", "home", 0);
    pages.save(&stored).await.expect("save");

    assert!(pages.delete(&stored.id).await.expect("delete"));
    assert!(!pages.delete(&stored.id).await.expect("second delete"));
}

#[tokio::test]
async fn tenant_subdomains_are_unique() {
    let tenants = InMemoryTenantRepository::default();
    let signup = || TenantSignup::new("Acme", "owner@acme.dk", "acme").expect("signup");
    let register = || {
        let owner_key = OwnerKey::generate();
        Tenant::from_signup(signup(), &owner_key, "lejio-fri.dk", 30, timestamp())
    };
    let first = register();
    let second = register();
    tenants.insert(&first).await.expect("insert");

    let error = tenants.insert(&second).await.expect_err("duplicate");

    assert!(matches!(
        error,
        TenantRepositoryError::DuplicateSubdomain { .. }
    ));
    let found = tenants
        .find_by_subdomain(&first.subdomain)
        .await
        .expect("lookup");
    assert_eq!(found.map(|tenant| tenant.id), Some(first.id));
}

#[tokio::test]
async fn records_are_listed_per_tenant() {
    let vehicles = InMemoryRecordRepository::<Vehicle>::default();
    let draft = || VehicleDraft {
        make: "Toyota".to_owned(),
        model: "Yaris".to_owned(),
        license_plate: "AB12345".to_owned(),
        ..VehicleDraft::default()
    };
    let own = Vehicle::create(TenantId::new("t1").expect("tenant"), draft(), timestamp())
        .expect("vehicle");
    let foreign = Vehicle::create(TenantId::new("t2").expect("tenant"), draft(), timestamp())
        .expect("vehicle");
    vehicles.save(&own).await.expect("save");
    vehicles.save(&foreign).await.expect("save");

    let listed = vehicles.list_for_tenant(&own.tenant_id).await.expect("list");

    assert_eq!(listed, vec![own]);
}
