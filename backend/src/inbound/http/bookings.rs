//! Booking HTTP handlers.
//!
//! ```text
//! POST   /api/CreateBooking
//! GET    /api/GetBookings?tenant_id=&booking_id=
//! PUT    /api/UpdateBooking
//! DELETE /api/DeleteBooking?tenant_id=&booking_id=
//! ```
//!
//! Dates are calendar days written as `YYYY-MM-DD`. When no total is given it
//! is derived from the daily rate and the rental length.

use actix_web::{HttpRequest, HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{Booking, BookingDraft, BookingPatch, Error, TenantId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::caller::authorize_tenant;
use crate::inbound::http::records::{
    DeletedResponse, list_or_get, optional_date, optional_email, optional_status, optional_uuid,
    parse_date, parse_email,
};
use crate::inbound::http::schemas::{BookingSchema, ErrorSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{require, require_tenant_id, require_uuid};

/// Request payload for creating a booking.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct CreateBookingRequest {
    pub tenant_id: Option<String>,
    pub vehicle_id: Option<String>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    #[schema(example = "2026-03-01")]
    pub start_date: Option<String>,
    #[schema(example = "2026-03-04")]
    pub end_date: Option<String>,
    #[schema(example = "pending")]
    pub status: Option<String>,
    pub daily_rate: Option<i64>,
    pub total_price: Option<i64>,
    pub notes: Option<String>,
}

/// Request payload for updating a booking. Omitted fields keep their values.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateBookingRequest {
    pub tenant_id: Option<String>,
    pub booking_id: Option<String>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub status: Option<String>,
    pub daily_rate: Option<i64>,
    pub total_price: Option<i64>,
    pub notes: Option<String>,
}

/// Query parameters for booking lookups.
#[derive(Debug, Default, Deserialize)]
pub struct BookingQuery {
    pub tenant_id: Option<String>,
    pub booking_id: Option<String>,
}

fn parse_create_request(payload: CreateBookingRequest) -> Result<(TenantId, BookingDraft), Error> {
    let tenant_id = require_tenant_id(payload.tenant_id)?;
    let draft = BookingDraft {
        vehicle_id: require_uuid(payload.vehicle_id, "vehicle_id")?,
        customer_name: require(payload.customer_name, "customer_name")?,
        customer_email: parse_email(
            require(payload.customer_email, "customer_email")?,
            "customer_email",
        )?,
        customer_phone: require(payload.customer_phone, "customer_phone")?,
        start_date: parse_date(&require(payload.start_date, "start_date")?, "start_date")?,
        end_date: parse_date(&require(payload.end_date, "end_date")?, "end_date")?,
        status: optional_status(payload.status, "status")?,
        daily_rate: payload.daily_rate,
        total_price: payload.total_price,
        notes: payload.notes,
    };
    Ok((tenant_id, draft))
}

fn parse_update_request(
    payload: UpdateBookingRequest,
) -> Result<(TenantId, Uuid, BookingPatch), Error> {
    let tenant_id = require_tenant_id(payload.tenant_id)?;
    let booking_id = require_uuid(payload.booking_id, "booking_id")?;
    let patch = BookingPatch {
        customer_name: payload.customer_name,
        customer_email: optional_email(payload.customer_email, "customer_email")?,
        customer_phone: payload.customer_phone,
        start_date: optional_date(payload.start_date, "start_date")?,
        end_date: optional_date(payload.end_date, "end_date")?,
        status: optional_status(payload.status, "status")?,
        daily_rate: payload.daily_rate,
        total_price: payload.total_price,
        notes: payload.notes,
    };
    Ok((tenant_id, booking_id, patch))
}

/// Book a vehicle for a customer.
#[utoipa::path(
    post,
    path = "/api/CreateBooking",
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Booking created", body = BookingSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema),
        (status = 403, description = "Token is for another tenant", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "createBooking"
)]
#[post("/CreateBooking")]
pub async fn create_booking(
    state: web::Data<HttpState>,
    req: HttpRequest,
    payload: web::Json<CreateBookingRequest>,
) -> ApiResult<HttpResponse> {
    let (tenant_id, draft) = parse_create_request(payload.into_inner())?;
    authorize_tenant(&state, &req, &tenant_id)?;
    let booking = state.bookings.create(&tenant_id, draft).await?;
    Ok(HttpResponse::Created().json(booking))
}

/// List the tenant's bookings, newest first, or fetch one.
#[utoipa::path(
    get,
    path = "/api/GetBookings",
    params(
        ("tenant_id" = String, Query, description = "Owning tenant"),
        ("booking_id" = Option<String>, Query, description = "Fetch a single booking")
    ),
    responses(
        (status = 200, description = "Bookings", body = [BookingSchema]),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Booking belongs to another tenant", body = ErrorSchema),
        (status = 404, description = "Booking not found", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "getBookings"
)]
#[get("/GetBookings")]
pub async fn get_bookings(
    state: web::Data<HttpState>,
    req: HttpRequest,
    query: web::Query<BookingQuery>,
) -> ApiResult<web::Json<Vec<Booking>>> {
    let BookingQuery {
        tenant_id,
        booking_id,
    } = query.into_inner();
    let tenant_id = require_tenant_id(tenant_id)?;
    let booking_id = optional_uuid(booking_id, "booking_id")?;
    authorize_tenant(&state, &req, &tenant_id)?;
    let bookings = list_or_get(state.bookings.as_ref(), &tenant_id, booking_id).await?;
    Ok(web::Json(bookings))
}

/// Merge supplied fields into a booking.
#[utoipa::path(
    put,
    path = "/api/UpdateBooking",
    request_body = UpdateBookingRequest,
    responses(
        (status = 200, description = "Updated booking", body = BookingSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Booking belongs to another tenant", body = ErrorSchema),
        (status = 404, description = "Booking not found", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "updateBooking"
)]
#[put("/UpdateBooking")]
pub async fn update_booking(
    state: web::Data<HttpState>,
    req: HttpRequest,
    payload: web::Json<UpdateBookingRequest>,
) -> ApiResult<web::Json<Booking>> {
    let (tenant_id, booking_id, patch) = parse_update_request(payload.into_inner())?;
    authorize_tenant(&state, &req, &tenant_id)?;
    let booking = state.bookings.update(&tenant_id, booking_id, patch).await?;
    Ok(web::Json(booking))
}

/// Delete a booking.
#[utoipa::path(
    delete,
    path = "/api/DeleteBooking",
    params(
        ("tenant_id" = String, Query, description = "Owning tenant"),
        ("booking_id" = String, Query, description = "Booking to delete")
    ),
    responses(
        (status = 200, description = "Booking deleted", body = DeletedResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Booking belongs to another tenant", body = ErrorSchema),
        (status = 404, description = "Booking not found", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "deleteBooking"
)]
#[delete("/DeleteBooking")]
pub async fn delete_booking(
    state: web::Data<HttpState>,
    req: HttpRequest,
    query: web::Query<BookingQuery>,
) -> ApiResult<web::Json<DeletedResponse>> {
    let BookingQuery {
        tenant_id,
        booking_id,
    } = query.into_inner();
    let tenant_id = require_tenant_id(tenant_id)?;
    let booking_id = require_uuid(booking_id, "booking_id")?;
    authorize_tenant(&state, &req, &tenant_id)?;
    state.bookings.delete(&tenant_id, booking_id).await?;
    Ok(web::Json(DeletedResponse::new("Booking deleted successfully")))
}
