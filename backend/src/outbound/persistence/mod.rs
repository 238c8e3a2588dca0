//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repository implementations translate between Diesel row structs and domain
//! types. Rows (`models.rs`) and the schema (`schema.rs`) stay private to this
//! module. Connections come from a `bb8` pool through `diesel-async`, and every
//! database failure is mapped onto the owning port's error type.
//!
//! # Example
//!
//! ```ignore
//! use lejio::outbound::persistence::{DbPool, DieselPageRepository, PoolConfig};
//!
//! let pool = DbPool::connect(PoolConfig::new("postgres://localhost/lejio")).await?;
//! let pages = DieselPageRepository::new(pool);
//! ```

mod diesel_error_mapping;
mod diesel_page_repository;
mod diesel_record_repositories;
mod diesel_tenant_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_page_repository::DieselPageRepository;
pub use diesel_record_repositories::{
    DieselBookingRepository, DieselInvoiceRepository, DieselVehicleRepository,
};
pub use diesel_tenant_repository::DieselTenantRepository;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
