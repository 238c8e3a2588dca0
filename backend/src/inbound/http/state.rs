//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{AccessControl, PageCommand, PageQuery, TenantDirectory, TenantRecords};
use crate::domain::{Booking, Invoice, PublicSite, TenantResolver, Vehicle};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub pages: Arc<dyn PageCommand>,
    pub pages_query: Arc<dyn PageQuery>,
    pub tenants: Arc<dyn TenantDirectory>,
    pub access: Arc<dyn AccessControl>,
    pub vehicles: Arc<dyn TenantRecords<Vehicle>>,
    pub bookings: Arc<dyn TenantRecords<Booking>>,
    pub invoices: Arc<dyn TenantRecords<Invoice>>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub pages: Arc<dyn PageCommand>,
    pub pages_query: Arc<dyn PageQuery>,
    pub tenants: Arc<dyn TenantDirectory>,
    pub access: Arc<dyn AccessControl>,
    pub vehicles: Arc<dyn TenantRecords<Vehicle>>,
    pub bookings: Arc<dyn TenantRecords<Booking>>,
    pub invoices: Arc<dyn TenantRecords<Invoice>>,
    pub resolver: TenantResolver,
    pub site: PublicSite,
}

impl HttpState {
    /// Build handler state; `root_domain` drives host-based tenant resolution.
    pub fn new(ports: HttpStatePorts, root_domain: impl Into<String>) -> Self {
        let HttpStatePorts {
            pages,
            pages_query,
            tenants,
            access,
            vehicles,
            bookings,
            invoices,
        } = ports;
        let resolver = TenantResolver::new(root_domain, tenants.clone());
        let site = PublicSite::new(pages_query.clone(), vehicles.clone());
        Self {
            pages,
            pages_query,
            tenants,
            access,
            vehicles,
            bookings,
            invoices,
            resolver,
            site,
        }
    }
}
