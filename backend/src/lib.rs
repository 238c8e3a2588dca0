//! Lejio backend: multi-tenant car rental platform.
//!
//! Lessors sign up under a subdomain, build their public site from content
//! blocks, and manage their fleet, bookings, and invoices over a JSON API.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
