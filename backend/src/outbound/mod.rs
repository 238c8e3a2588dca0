//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **memory**: process-local repositories for development and tests
//! - **file_store**: JSON page storage under a capability-scoped directory
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **tokens**: HMAC-signed bearer tokens
//!
//! Adapters convert between domain types and storage representations. They
//! contain no business logic.

pub mod file_store;
pub mod memory;
pub mod persistence;
pub mod tokens;
