//! Domain ports for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`AccessTokens`]) are implemented by outbound
//! adapters. Driving ports ([`PageCommand`], [`PageQuery`],
//! [`TenantDirectory`], [`TenantRecords`], [`AccessControl`]) are implemented
//! by domain services and consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod access;
mod page_command;
mod page_repository;
mod record_repository;
mod tenant_directory;
mod tenant_records;
mod tenant_repository;

#[cfg(test)]
pub use access::MockAccessTokens;
pub use access::{AccessClaims, AccessControl, AccessTokenError, AccessTokens, IssuedToken};
pub use page_command::{PageCommand, PageQuery};
#[cfg(test)]
pub use page_repository::MockPageRepository;
pub use page_repository::{PageRepository, PageRepositoryError};
pub use record_repository::{RecordRepository, RecordRepositoryError};
#[cfg(test)]
pub use tenant_directory::MockTenantDirectory;
pub use tenant_directory::TenantDirectory;
pub use tenant_records::TenantRecords;
#[cfg(test)]
pub use tenant_repository::MockTenantRepository;
pub use tenant_repository::{TenantRepository, TenantRepositoryError};
