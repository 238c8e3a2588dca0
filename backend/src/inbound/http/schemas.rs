//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. The
//! wrappers here mirror their serialised shape and register under the domain
//! type's path via `#[schema(as = ...)]`.

#![expect(
    dead_code,
    reason = "Schema wrappers are only read by utoipa when generating OpenAPI"
)]

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// A required field is missing or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// The caller may not act for the referenced tenant.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// A uniqueness rule was violated.
    #[schema(rename = "conflict")]
    Conflict,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
pub struct ErrorSchema {
    /// Human-readable message.
    #[schema(example = "Slug already exists")]
    error: String,
    /// Stable machine-readable error code.
    #[schema(example = "conflict")]
    code: ErrorCodeSchema,
    /// Correlation identifier matching the `trace-id` response header.
    #[schema(example = "00000000-0000-0000-0000-000000000000")]
    trace_id: Option<String>,
    /// Supplementary error details.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::Block`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Block)]
pub struct BlockSchema {
    #[schema(value_type = String, format = Uuid)]
    id: String,
    #[schema(value_type = String, format = Uuid)]
    page_id: String,
    #[schema(example = "hero")]
    block_type: String,
    #[schema(example = 0)]
    position: u32,
    /// Flat map of primitive values.
    #[schema(value_type = Object)]
    config: serde_json::Value,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

/// OpenAPI schema for [`crate::domain::Page`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Page)]
pub struct PageSchema {
    #[schema(value_type = String, format = Uuid)]
    id: String,
    #[schema(example = "t1")]
    tenant_id: String,
    #[schema(example = "home")]
    slug: String,
    #[schema(example = "Home")]
    title: String,
    meta_description: Option<String>,
    is_published: bool,
    published_at: Option<chrono::DateTime<chrono::Utc>>,
    /// Blocks in insertion order.
    blocks: Vec<BlockSchema>,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

/// OpenAPI schema for [`crate::domain::Vehicle`]. Money is in øre.
#[derive(ToSchema)]
#[schema(as = crate::domain::Vehicle)]
pub struct VehicleSchema {
    #[schema(value_type = String, format = Uuid)]
    id: String,
    tenant_id: String,
    #[schema(example = "Volkswagen")]
    make: String,
    #[schema(example = "ID.3")]
    model: String,
    year: Option<i32>,
    #[schema(example = "AB12345")]
    license_plate: String,
    vin: Option<String>,
    daily_rate: Option<i64>,
    mileage_limit: Option<i32>,
    #[schema(example = "available")]
    availability_status: String,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

/// OpenAPI schema for [`crate::domain::Booking`]. Money is in øre.
#[derive(ToSchema)]
#[schema(as = crate::domain::Booking)]
pub struct BookingSchema {
    #[schema(value_type = String, format = Uuid)]
    id: String,
    tenant_id: String,
    #[schema(value_type = String, format = Uuid)]
    vehicle_id: String,
    customer_name: String,
    customer_email: String,
    customer_phone: String,
    start_date: chrono::NaiveDate,
    end_date: chrono::NaiveDate,
    #[schema(example = "pending")]
    status: String,
    daily_rate: Option<i64>,
    total_price: Option<i64>,
    notes: Option<String>,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

/// OpenAPI schema for [`crate::domain::Invoice`]. Money is in øre.
#[derive(ToSchema)]
#[schema(as = crate::domain::Invoice)]
pub struct InvoiceSchema {
    #[schema(value_type = String, format = Uuid)]
    id: String,
    tenant_id: String,
    #[schema(value_type = Option<String>, format = Uuid)]
    booking_id: Option<String>,
    #[schema(example = "INV-202603-0042")]
    invoice_number: String,
    customer_name: String,
    customer_email: String,
    amount: i64,
    tax_amount: i64,
    discount_amount: i64,
    total_amount: i64,
    description: Option<String>,
    issued_date: chrono::NaiveDate,
    due_date: chrono::NaiveDate,
    #[schema(example = "draft")]
    status: String,
    payment_method: Option<String>,
    paid_date: Option<chrono::NaiveDate>,
    notes: Option<String>,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}
