//! Diesel row types for the PostgreSQL adapters.
//!
//! Rows carry plain column values; conversion to and from domain types lives
//! in the repository modules so validation errors map onto port errors.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{bookings, invoices, page_blocks, pages, tenants, vehicles};

/// Row read from and written to `tenants`.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = tenants)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TenantRow {
    pub id: String,
    pub name: String,
    pub subdomain: String,
    pub domain: String,
    pub plan: String,
    pub status: String,
    pub owner_email: String,
    pub owner_key_digest: String,
    pub primary_color: String,
    pub logo_url: Option<String>,
    pub trial_end_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row read from `pages`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = pages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PageRow {
    pub id: Uuid,
    pub tenant_id: String,
    pub slug: String,
    pub title: String,
    pub meta_description: Option<String>,
    pub is_published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable page row.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = pages)]
pub(crate) struct NewPageRow<'a> {
    pub id: Uuid,
    pub tenant_id: &'a str,
    pub slug: &'a str,
    pub title: &'a str,
    pub meta_description: Option<&'a str>,
    pub is_published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset applied when a page is saved again.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = pages)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct PageUpdate<'a> {
    pub slug: &'a str,
    pub title: &'a str,
    pub meta_description: Option<&'a str>,
    pub is_published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

/// Row read from and written to `page_blocks`.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = page_blocks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BlockRow {
    pub id: Uuid,
    pub page_id: Uuid,
    pub block_type: String,
    pub position: i32,
    pub config: serde_json::Value,
    pub ordinal: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row read from and written to `vehicles`.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = vehicles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub(crate) struct VehicleRow {
    pub id: Uuid,
    pub tenant_id: String,
    pub make: String,
    pub model: String,
    pub year: Option<i32>,
    pub license_plate: String,
    pub vin: Option<String>,
    pub daily_rate: Option<i64>,
    pub mileage_limit: Option<i32>,
    pub availability_status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row read from and written to `bookings`.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = bookings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub(crate) struct BookingRow {
    pub id: Uuid,
    pub tenant_id: String,
    pub vehicle_id: Uuid,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: String,
    pub daily_rate: Option<i64>,
    pub total_price: Option<i64>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row read from and written to `invoices`.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = invoices)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub(crate) struct InvoiceRow {
    pub id: Uuid,
    pub tenant_id: String,
    pub booking_id: Option<Uuid>,
    pub invoice_number: String,
    pub customer_name: String,
    pub customer_email: String,
    pub amount: i64,
    pub tax_amount: i64,
    pub discount_amount: i64,
    pub total_amount: i64,
    pub description: Option<String>,
    pub issued_date: NaiveDate,
    pub due_date: NaiveDate,
    pub status: String,
    pub payment_method: Option<String>,
    pub paid_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
