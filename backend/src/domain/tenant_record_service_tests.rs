//! Tests for tenant-scoped record CRUD.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::mock;

use super::*;
use crate::domain::test_fixtures::{fixture_clock, fixture_timestamp, tenant_id};
use crate::domain::{ErrorCode, Vehicle, VehicleDraft, VehiclePatch, VehicleStatus};

mock! {
    VehicleStore {}

    #[async_trait]
    impl RecordRepository<Vehicle> for VehicleStore {
        async fn save(&self, record: &Vehicle) -> Result<(), RecordRepositoryError>;
        async fn find_by_id(&self, id: &Uuid) -> Result<Option<Vehicle>, RecordRepositoryError>;
        async fn list_for_tenant(
            &self,
            tenant_id: &TenantId,
        ) -> Result<Vec<Vehicle>, RecordRepositoryError>;
        async fn delete(&self, id: &Uuid) -> Result<bool, RecordRepositoryError>;
    }
}

type VehicleService = TenantRecordService<Vehicle, MockVehicleStore>;

fn service(store: MockVehicleStore) -> VehicleService {
    TenantRecordService::new(Arc::new(store), fixture_clock())
}

fn draft() -> VehicleDraft {
    VehicleDraft {
        make: "Toyota".to_owned(),
        model: "Corolla".to_owned(),
        license_plate: "ab 12 345".to_owned(),
        daily_rate: Some(45_000),
        ..VehicleDraft::default()
    }
}

fn stored_vehicle(owner: &str) -> Vehicle {
    Vehicle::create(tenant_id(owner), draft(), fixture_timestamp()).expect("valid vehicle")
}

#[tokio::test]
async fn create_assigns_caller_as_owner() {
    let mut store = MockVehicleStore::new();
    store.expect_save().times(1).return_once(|_| Ok(()));

    let vehicle = service(store)
        .create(&tenant_id("tenant-a"), draft())
        .await
        .expect("created");

    assert_eq!(vehicle.tenant_id, tenant_id("tenant-a"));
    assert_eq!(vehicle.license_plate, "AB 12 345");
    assert_eq!(vehicle.availability_status, VehicleStatus::Available);
}

#[tokio::test]
async fn create_rejects_invalid_draft_without_saving() {
    let mut store = MockVehicleStore::new();
    store.expect_save().times(0);
    let invalid = VehicleDraft {
        make: "  ".to_owned(),
        ..draft()
    };

    let error = service(store)
        .create(&tenant_id("tenant-a"), invalid)
        .await
        .expect_err("invalid");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(
        error.details().and_then(|details| details.get("field")),
        Some(&serde_json::json!("make"))
    );
}

#[tokio::test]
async fn get_foreign_record_is_forbidden() {
    let vehicle = stored_vehicle("tenant-b");
    let id = vehicle.id;
    let mut store = MockVehicleStore::new();
    store
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(vehicle)));

    let error = service(store)
        .get(&tenant_id("tenant-a"), id)
        .await
        .expect_err("foreign");

    assert_eq!(error.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn get_unknown_record_is_not_found() {
    let mut store = MockVehicleStore::new();
    store.expect_find_by_id().times(1).return_once(|_| Ok(None));

    let error = service(store)
        .get(&tenant_id("tenant-a"), Uuid::new_v4())
        .await
        .expect_err("missing");

    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(error.message(), "Vehicle not found");
}

#[tokio::test]
async fn update_foreign_record_never_saves() {
    let vehicle = stored_vehicle("tenant-b");
    let id = vehicle.id;
    let mut store = MockVehicleStore::new();
    store
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(vehicle)));
    store.expect_save().times(0);

    let error = service(store)
        .update(&tenant_id("tenant-a"), id, VehiclePatch::default())
        .await
        .expect_err("foreign");

    assert_eq!(error.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn update_merges_patch_and_saves() {
    let vehicle = stored_vehicle("tenant-a");
    let id = vehicle.id;
    let mut store = MockVehicleStore::new();
    store
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(vehicle)));
    store
        .expect_save()
        .withf(|saved: &Vehicle| saved.availability_status == VehicleStatus::Maintenance)
        .times(1)
        .return_once(|_| Ok(()));

    let patch = VehiclePatch {
        availability_status: Some(VehicleStatus::Maintenance),
        ..VehiclePatch::default()
    };
    let updated = service(store)
        .update(&tenant_id("tenant-a"), id, patch)
        .await
        .expect("updated");

    assert_eq!(updated.make, "Toyota");
}

#[tokio::test]
async fn delete_foreign_record_is_forbidden() {
    let vehicle = stored_vehicle("tenant-b");
    let id = vehicle.id;
    let mut store = MockVehicleStore::new();
    store
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(vehicle)));
    store.expect_delete().times(0);

    let error = service(store)
        .delete(&tenant_id("tenant-a"), id)
        .await
        .expect_err("foreign");

    assert_eq!(error.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn list_maps_store_failure_to_internal() {
    let mut store = MockVehicleStore::new();
    store
        .expect_list_for_tenant()
        .times(1)
        .return_once(|_| Err(RecordRepositoryError::query("relation missing")));

    let error = service(store)
        .list(&tenant_id("tenant-a"))
        .await
        .expect_err("failure");

    assert_eq!(error.code(), ErrorCode::InternalError);
}
