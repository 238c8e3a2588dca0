//! Fleet HTTP handlers.
//!
//! ```text
//! POST   /api/CreateVehicle
//! GET    /api/GetVehicles?tenant_id=&vehicle_id=
//! PUT    /api/UpdateVehicle
//! DELETE /api/DeleteVehicle?tenant_id=&vehicle_id=
//! ```

use actix_web::{HttpRequest, HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{Error, TenantId, Vehicle, VehicleDraft, VehiclePatch};
use crate::inbound::http::ApiResult;
use crate::inbound::http::caller::authorize_tenant;
use crate::inbound::http::records::{DeletedResponse, list_or_get, optional_status, optional_uuid};
use crate::inbound::http::schemas::{ErrorSchema, VehicleSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{require, require_tenant_id, require_uuid};

/// Request payload for adding a vehicle to the fleet.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct CreateVehicleRequest {
    pub tenant_id: Option<String>,
    #[schema(example = "Toyota")]
    pub make: Option<String>,
    #[schema(example = "Yaris")]
    pub model: Option<String>,
    pub year: Option<i32>,
    #[schema(example = "AB 12 345")]
    pub license_plate: Option<String>,
    pub vin: Option<String>,
    /// Price per day in øre.
    pub daily_rate: Option<i64>,
    pub mileage_limit: Option<i32>,
    #[schema(example = "available")]
    pub availability_status: Option<String>,
}

/// Request payload for updating a vehicle. Omitted fields keep their values.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateVehicleRequest {
    pub tenant_id: Option<String>,
    pub vehicle_id: Option<String>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub license_plate: Option<String>,
    pub vin: Option<String>,
    pub daily_rate: Option<i64>,
    pub mileage_limit: Option<i32>,
    pub availability_status: Option<String>,
}

/// Query parameters for vehicle lookups.
#[derive(Debug, Default, Deserialize)]
pub struct VehicleQuery {
    pub tenant_id: Option<String>,
    pub vehicle_id: Option<String>,
}

fn parse_create_request(payload: CreateVehicleRequest) -> Result<(TenantId, VehicleDraft), Error> {
    let tenant_id = require_tenant_id(payload.tenant_id)?;
    let draft = VehicleDraft {
        make: require(payload.make, "make")?,
        model: require(payload.model, "model")?,
        year: payload.year,
        license_plate: require(payload.license_plate, "license_plate")?,
        vin: payload.vin,
        daily_rate: payload.daily_rate,
        mileage_limit: payload.mileage_limit,
        availability_status: optional_status(payload.availability_status, "availability_status")?,
    };
    Ok((tenant_id, draft))
}

fn parse_update_request(
    payload: UpdateVehicleRequest,
) -> Result<(TenantId, Uuid, VehiclePatch), Error> {
    let tenant_id = require_tenant_id(payload.tenant_id)?;
    let vehicle_id = require_uuid(payload.vehicle_id, "vehicle_id")?;
    let patch = VehiclePatch {
        make: payload.make,
        model: payload.model,
        year: payload.year,
        license_plate: payload.license_plate,
        vin: payload.vin,
        daily_rate: payload.daily_rate,
        mileage_limit: payload.mileage_limit,
        availability_status: optional_status(payload.availability_status, "availability_status")?,
    };
    Ok((tenant_id, vehicle_id, patch))
}

/// Add a vehicle to the tenant's fleet.
#[utoipa::path(
    post,
    path = "/api/CreateVehicle",
    request_body = CreateVehicleRequest,
    responses(
        (status = 201, description = "Vehicle created", body = VehicleSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema),
        (status = 403, description = "Token is for another tenant", body = ErrorSchema)
    ),
    tags = ["vehicles"],
    operation_id = "createVehicle"
)]
#[post("/CreateVehicle")]
pub async fn create_vehicle(
    state: web::Data<HttpState>,
    req: HttpRequest,
    payload: web::Json<CreateVehicleRequest>,
) -> ApiResult<HttpResponse> {
    let (tenant_id, draft) = parse_create_request(payload.into_inner())?;
    authorize_tenant(&state, &req, &tenant_id)?;
    let vehicle = state.vehicles.create(&tenant_id, draft).await?;
    Ok(HttpResponse::Created().json(vehicle))
}

/// List the tenant's vehicles, newest first, or fetch one.
#[utoipa::path(
    get,
    path = "/api/GetVehicles",
    params(
        ("tenant_id" = String, Query, description = "Owning tenant"),
        ("vehicle_id" = Option<String>, Query, description = "Fetch a single vehicle")
    ),
    responses(
        (status = 200, description = "Vehicles", body = [VehicleSchema]),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Vehicle belongs to another tenant", body = ErrorSchema),
        (status = 404, description = "Vehicle not found", body = ErrorSchema)
    ),
    tags = ["vehicles"],
    operation_id = "getVehicles"
)]
#[get("/GetVehicles")]
pub async fn get_vehicles(
    state: web::Data<HttpState>,
    req: HttpRequest,
    query: web::Query<VehicleQuery>,
) -> ApiResult<web::Json<Vec<Vehicle>>> {
    let VehicleQuery {
        tenant_id,
        vehicle_id,
    } = query.into_inner();
    let tenant_id = require_tenant_id(tenant_id)?;
    let vehicle_id = optional_uuid(vehicle_id, "vehicle_id")?;
    authorize_tenant(&state, &req, &tenant_id)?;
    let vehicles = list_or_get(state.vehicles.as_ref(), &tenant_id, vehicle_id).await?;
    Ok(web::Json(vehicles))
}

/// Merge supplied fields into a vehicle.
#[utoipa::path(
    put,
    path = "/api/UpdateVehicle",
    request_body = UpdateVehicleRequest,
    responses(
        (status = 200, description = "Updated vehicle", body = VehicleSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Vehicle belongs to another tenant", body = ErrorSchema),
        (status = 404, description = "Vehicle not found", body = ErrorSchema)
    ),
    tags = ["vehicles"],
    operation_id = "updateVehicle"
)]
#[put("/UpdateVehicle")]
pub async fn update_vehicle(
    state: web::Data<HttpState>,
    req: HttpRequest,
    payload: web::Json<UpdateVehicleRequest>,
) -> ApiResult<web::Json<Vehicle>> {
    let (tenant_id, vehicle_id, patch) = parse_update_request(payload.into_inner())?;
    authorize_tenant(&state, &req, &tenant_id)?;
    let vehicle = state.vehicles.update(&tenant_id, vehicle_id, patch).await?;
    Ok(web::Json(vehicle))
}

/// Remove a vehicle from the fleet.
#[utoipa::path(
    delete,
    path = "/api/DeleteVehicle",
    params(
        ("tenant_id" = String, Query, description = "Owning tenant"),
        ("vehicle_id" = String, Query, description = "Vehicle to delete")
    ),
    responses(
        (status = 200, description = "Vehicle deleted", body = DeletedResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Vehicle belongs to another tenant", body = ErrorSchema),
        (status = 404, description = "Vehicle not found", body = ErrorSchema)
    ),
    tags = ["vehicles"],
    operation_id = "deleteVehicle"
)]
#[delete("/DeleteVehicle")]
pub async fn delete_vehicle(
    state: web::Data<HttpState>,
    req: HttpRequest,
    query: web::Query<VehicleQuery>,
) -> ApiResult<web::Json<DeletedResponse>> {
    let VehicleQuery {
        tenant_id,
        vehicle_id,
    } = query.into_inner();
    let tenant_id = require_tenant_id(tenant_id)?;
    let vehicle_id = require_uuid(vehicle_id, "vehicle_id")?;
    authorize_tenant(&state, &req, &tenant_id)?;
    state.vehicles.delete(&tenant_id, vehicle_id).await?;
    Ok(web::Json(DeletedResponse::new("Vehicle deleted successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::VehicleStatus;
    use rstest::rstest;

    fn create_request() -> CreateVehicleRequest {
        CreateVehicleRequest {
            tenant_id: Some("tenant-a".to_owned()),
            make: Some("Toyota".to_owned()),
            model: Some("Yaris".to_owned()),
            license_plate: Some("AB 12 345".to_owned()),
            availability_status: Some("maintenance".to_owned()),
            ..CreateVehicleRequest::default()
        }
    }

    #[rstest]
    fn create_request_parses_status() {
        let (tenant_id, draft) = parse_create_request(create_request()).expect("valid vehicle");

        assert_eq!(tenant_id.as_str(), "tenant-a");
        assert_eq!(draft.availability_status, Some(VehicleStatus::Maintenance));
    }

    #[rstest]
    #[case(CreateVehicleRequest { make: None, ..create_request() }, "make")]
    #[case(CreateVehicleRequest { license_plate: Some(" ".to_owned()), ..create_request() }, "license_plate")]
    #[case(CreateVehicleRequest { availability_status: Some("stolen".to_owned()), ..create_request() }, "availability_status")]
    fn create_request_reports_field(#[case] payload: CreateVehicleRequest, #[case] field: &str) {
        let err = parse_create_request(payload).expect_err("invalid vehicle");

        assert_eq!(err.details().expect("details")["field"], field);
    }

    #[rstest]
    fn update_request_requires_vehicle_id() {
        let payload = UpdateVehicleRequest {
            tenant_id: Some("tenant-a".to_owned()),
            daily_rate: Some(45_000),
            ..UpdateVehicleRequest::default()
        };

        let err = parse_update_request(payload).expect_err("missing id");

        assert_eq!(err.details().expect("details")["field"], "vehicle_id");
    }
}
