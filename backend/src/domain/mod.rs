//! Domain primitives, aggregates, and services.
//!
//! Purpose: define the strongly typed entities of the rental platform
//! (tenants, pages and blocks, vehicles, bookings, invoices) and the services
//! that orchestrate them through [`ports`]. Nothing here knows about HTTP or
//! a particular storage backend.
//!
//! Public surface:
//! - [`Error`] and [`ErrorCode`]: transport-agnostic failure payload.
//! - [`Page`] and [`Block`]: the page builder aggregate.
//! - [`Tenant`]: a lessor organisation reached through its subdomain.
//! - [`Vehicle`], [`Booking`], [`Invoice`]: tenant-owned records.
//! - Services: [`PageService`], [`TenantService`], [`TenantRecordService`],
//!   [`AccessService`], [`TenantResolver`], [`PublicSite`].

pub mod ports;

mod access_service;
mod block;
mod booking;
mod error;
mod invoice;
mod owner_key;
mod page;
mod page_service;
mod public_site;
mod render;
mod slug;
mod tenant;
mod tenant_record;
mod tenant_record_service;
mod tenant_resolver;
mod tenant_service;
mod trace_id;
mod vehicle;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use self::access_service::AccessService;
pub use self::block::{
    Block, BlockConfig, BlockConfigPatch, BlockDraft, BlockId, BlockKind, BlockPatch,
    BlockValidationError, ConfigValue,
};
pub use self::booking::{Booking, BookingDraft, BookingPatch, BookingStatus, rental_days};
pub use self::error::{Error, ErrorCode};
pub use self::invoice::{
    Invoice, InvoiceDraft, InvoicePatch, InvoiceStatus, generate_invoice_number,
};
pub use self::owner_key::{OwnerKey, OwnerKeyDigest, OwnerKeyDigestError};
pub use self::page::{
    Page, PageDraft, PageId, PagePatch, PageTitle, PageValidationError, TITLE_MAX,
};
pub use self::page_service::PageService;
pub use self::public_site::{HOME_SLUG, PublicSite};
pub use self::render::{RenderContext, render_block, render_document, render_page_body};
pub use self::slug::{SLUG_MAX, Slug, SlugValidationError};
pub use self::tenant::{
    ContactEmail, DEFAULT_PRIMARY_COLOR, PlanTier, Subdomain, Tenant, TenantId, TenantSignup,
    TenantRegistration, TenantStatus, TenantValidationError, ThemeColor,
};
pub use self::tenant_record::{RecordValidationError, TenantRecord};
pub use self::tenant_record_service::TenantRecordService;
pub use self::tenant_resolver::{TenantResolver, resolve_subdomain};
pub use self::tenant_service::TenantService;
pub use self::trace_id::TraceId;
pub use self::vehicle::{Vehicle, VehicleDraft, VehiclePatch, VehicleStatus};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use lejio::domain::{ApiResult, Error};
///
/// fn lookup() -> ApiResult<()> {
///     Err(Error::forbidden("vehicle belongs to another tenant"))
/// }
/// assert!(lookup().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
