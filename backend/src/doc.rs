//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every `/api` handler and the health probes, the
//! schema wrappers from [`crate::inbound::http::schemas`] and the request
//! payloads, plus the bearer token security scheme. Swagger UI serves it in
//! debug builds.

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::auth::{AuthTokenRequest, AuthTokenResponse};
use crate::inbound::http::blocks::{AddBlockRequest, BlockTypeResponse, UpdateBlockRequest};
use crate::inbound::http::bookings::{CreateBookingRequest, UpdateBookingRequest};
use crate::inbound::http::invoices::{CreateInvoiceRequest, UpdateInvoiceRequest};
use crate::inbound::http::pages::{CreatePageRequest, MessageResponse, UpdatePageRequest};
use crate::inbound::http::records::DeletedResponse;
use crate::inbound::http::schemas::{
    BlockSchema, BookingSchema, ErrorCodeSchema, ErrorSchema, InvoiceSchema, PageSchema,
    VehicleSchema,
};
use crate::inbound::http::tenants::{
    ResolvedTenantResponse, TenantResponse, TenantSignupRequest, TenantSignupResponse,
};
use crate::inbound::http::vehicles::{CreateVehicleRequest, UpdateVehicleRequest};

/// Adds the bearer token scheme issued by `POST /api/AuthToken`.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Lejio backend API",
        description = "Multi-tenant car rental platform: page builder, fleet, bookings, and invoices."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::pages::create_page,
        crate::inbound::http::pages::get_pages,
        crate::inbound::http::pages::update_page,
        crate::inbound::http::pages::publish_page,
        crate::inbound::http::pages::delete_page,
        crate::inbound::http::blocks::add_block,
        crate::inbound::http::blocks::update_block,
        crate::inbound::http::blocks::delete_block,
        crate::inbound::http::blocks::block_types,
        crate::inbound::http::tenants::signup,
        crate::inbound::http::tenants::get_tenant,
        crate::inbound::http::tenants::resolve_tenant,
        crate::inbound::http::auth::issue_token,
        crate::inbound::http::site::render_page,
        crate::inbound::http::vehicles::create_vehicle,
        crate::inbound::http::vehicles::get_vehicles,
        crate::inbound::http::vehicles::update_vehicle,
        crate::inbound::http::vehicles::delete_vehicle,
        crate::inbound::http::bookings::create_booking,
        crate::inbound::http::bookings::get_bookings,
        crate::inbound::http::bookings::update_booking,
        crate::inbound::http::bookings::delete_booking,
        crate::inbound::http::invoices::create_invoice,
        crate::inbound::http::invoices::get_invoices,
        crate::inbound::http::invoices::update_invoice,
        crate::inbound::http::invoices::delete_invoice,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        PageSchema,
        BlockSchema,
        TenantResponse,
        TenantSignupResponse,
        VehicleSchema,
        BookingSchema,
        InvoiceSchema,
        MessageResponse,
        DeletedResponse,
        BlockTypeResponse,
        ResolvedTenantResponse,
        AuthTokenResponse,
        CreatePageRequest,
        UpdatePageRequest,
        AddBlockRequest,
        UpdateBlockRequest,
        TenantSignupRequest,
        AuthTokenRequest,
        CreateVehicleRequest,
        UpdateVehicleRequest,
        CreateBookingRequest,
        UpdateBookingRequest,
        CreateInvoiceRequest,
        UpdateInvoiceRequest,
    )),
    tags(
        (name = "pages", description = "Tenant page builder"),
        (name = "blocks", description = "Content blocks within pages"),
        (name = "tenants", description = "Lessor signup and lookup"),
        (name = "auth", description = "Access tokens for tenant owners"),
        (name = "site", description = "Public tenant site rendering"),
        (name = "vehicles", description = "Fleet management"),
        (name = "bookings", description = "Rental bookings"),
        (name = "invoices", description = "Customer invoices"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case("/api/CreatePage")]
    #[case("/api/AddPageBlock")]
    #[case("/api/TenantSignup")]
    #[case("/api/GetVehicles")]
    #[case("/api/DeleteInvoice")]
    #[case("/api/RenderPage")]
    #[case("/health/ready")]
    fn registers_paths(#[case] path: &str) {
        let doc = ApiDoc::openapi();

        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[test]
    fn error_schema_uses_error_envelope() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = schemas.get("crate.domain.Error").expect("Error schema");

        assert_object_schema_has_field(error_schema, "error");
        assert_object_schema_has_field(error_schema, "code");
    }

    #[test]
    fn public_tenant_schema_has_no_owner_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let tenant = schemas.get("TenantResponse").expect("TenantResponse schema");

        assert_object_schema_has_field(tenant, "subdomain");
        match tenant {
            RefOr::T(Schema::Object(obj)) => {
                assert!(!obj.properties.contains_key("owner_email"));
                assert!(!obj.properties.contains_key("owner_key_digest"));
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[test]
    fn bearer_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");

        assert!(components.security_schemes.contains_key("BearerToken"));
    }
}
