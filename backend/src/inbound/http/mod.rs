//! HTTP inbound adapter exposing the REST endpoints under `/api`.

pub mod auth;
pub mod blocks;
pub mod bookings;
pub mod caller;
pub mod error;
pub mod health;
pub mod invoices;
pub mod pages;
pub mod records;
pub mod schemas;
pub mod site;
pub mod state;
pub mod tenant_context;
pub mod tenants;
#[cfg(test)]
pub mod test_utils;
pub mod validation;
pub mod vehicles;

use actix_web::{Scope, web};

pub use error::ApiResult;

/// Build the `/api` scope with every handler and the JSON error envelopes for
/// malformed bodies and query strings.
pub fn api_scope() -> Scope {
    web::scope("/api")
        .app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(error::query_error_handler))
        .service(pages::create_page)
        .service(pages::get_pages)
        .service(pages::update_page)
        .service(pages::publish_page)
        .service(pages::delete_page)
        .service(blocks::add_block)
        .service(blocks::update_block)
        .service(blocks::delete_block)
        .service(blocks::block_types)
        .service(tenants::signup)
        .service(tenants::get_tenant)
        .service(tenants::resolve_tenant)
        .service(auth::issue_token)
        .service(site::render_page)
        .service(vehicles::create_vehicle)
        .service(vehicles::get_vehicles)
        .service(vehicles::update_vehicle)
        .service(vehicles::delete_vehicle)
        .service(bookings::create_booking)
        .service(bookings::get_bookings)
        .service(bookings::update_booking)
        .service(bookings::delete_booking)
        .service(invoices::create_invoice)
        .service(invoices::get_invoices)
        .service(invoices::update_invoice)
        .service(invoices::delete_invoice)
}
