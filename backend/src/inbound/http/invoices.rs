//! Invoice HTTP handlers.
//!
//! ```text
//! POST   /api/CreateInvoice
//! GET    /api/GetInvoices?tenant_id=&invoice_id=
//! PUT    /api/UpdateInvoice
//! DELETE /api/DeleteInvoice?tenant_id=&invoice_id=
//! ```
//!
//! Amounts are in øre. A number of the form `INV-YYYYMM-NNNN` is generated
//! when none is supplied.

use actix_web::{HttpRequest, HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{Error, Invoice, InvoiceDraft, InvoicePatch, TenantId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::caller::authorize_tenant;
use crate::inbound::http::records::{
    DeletedResponse, list_or_get, optional_date, optional_email, optional_status, optional_uuid,
    parse_date, parse_email,
};
use crate::inbound::http::schemas::{ErrorSchema, InvoiceSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    missing_field_error, require, require_tenant_id, require_uuid,
};

/// Request payload for creating an invoice.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct CreateInvoiceRequest {
    pub tenant_id: Option<String>,
    pub booking_id: Option<String>,
    pub invoice_number: Option<String>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub amount: Option<i64>,
    pub tax_amount: Option<i64>,
    pub discount_amount: Option<i64>,
    pub description: Option<String>,
    #[schema(example = "2026-03-01")]
    pub issued_date: Option<String>,
    #[schema(example = "2026-03-15")]
    pub due_date: Option<String>,
    #[schema(example = "draft")]
    pub status: Option<String>,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
}

/// Request payload for updating an invoice. Omitted fields keep their values.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateInvoiceRequest {
    pub tenant_id: Option<String>,
    pub invoice_id: Option<String>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub amount: Option<i64>,
    pub tax_amount: Option<i64>,
    pub discount_amount: Option<i64>,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub status: Option<String>,
    pub payment_method: Option<String>,
    pub paid_date: Option<String>,
    pub notes: Option<String>,
}

/// Query parameters for invoice lookups.
#[derive(Debug, Default, Deserialize)]
pub struct InvoiceQuery {
    pub tenant_id: Option<String>,
    pub invoice_id: Option<String>,
}

fn parse_create_request(payload: CreateInvoiceRequest) -> Result<(TenantId, InvoiceDraft), Error> {
    let tenant_id = require_tenant_id(payload.tenant_id)?;
    let draft = InvoiceDraft {
        booking_id: optional_uuid(payload.booking_id, "booking_id")?,
        invoice_number: payload.invoice_number,
        customer_name: require(payload.customer_name, "customer_name")?,
        customer_email: parse_email(
            require(payload.customer_email, "customer_email")?,
            "customer_email",
        )?,
        amount: payload.amount.ok_or_else(|| missing_field_error("amount"))?,
        tax_amount: payload.tax_amount,
        discount_amount: payload.discount_amount,
        description: payload.description,
        issued_date: optional_date(payload.issued_date, "issued_date")?,
        due_date: parse_date(&require(payload.due_date, "due_date")?, "due_date")?,
        status: optional_status(payload.status, "status")?,
        payment_method: payload.payment_method,
        notes: payload.notes,
    };
    Ok((tenant_id, draft))
}

fn parse_update_request(
    payload: UpdateInvoiceRequest,
) -> Result<(TenantId, Uuid, InvoicePatch), Error> {
    let tenant_id = require_tenant_id(payload.tenant_id)?;
    let invoice_id = require_uuid(payload.invoice_id, "invoice_id")?;
    let patch = InvoicePatch {
        customer_name: payload.customer_name,
        customer_email: optional_email(payload.customer_email, "customer_email")?,
        amount: payload.amount,
        tax_amount: payload.tax_amount,
        discount_amount: payload.discount_amount,
        description: payload.description,
        due_date: optional_date(payload.due_date, "due_date")?,
        status: optional_status(payload.status, "status")?,
        payment_method: payload.payment_method,
        paid_date: optional_date(payload.paid_date, "paid_date")?,
        notes: payload.notes,
    };
    Ok((tenant_id, invoice_id, patch))
}

/// Issue an invoice.
#[utoipa::path(
    post,
    path = "/api/CreateInvoice",
    request_body = CreateInvoiceRequest,
    responses(
        (status = 201, description = "Invoice created", body = InvoiceSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema),
        (status = 403, description = "Token is for another tenant", body = ErrorSchema)
    ),
    tags = ["invoices"],
    operation_id = "createInvoice"
)]
#[post("/CreateInvoice")]
pub async fn create_invoice(
    state: web::Data<HttpState>,
    req: HttpRequest,
    payload: web::Json<CreateInvoiceRequest>,
) -> ApiResult<HttpResponse> {
    let (tenant_id, draft) = parse_create_request(payload.into_inner())?;
    authorize_tenant(&state, &req, &tenant_id)?;
    let invoice = state.invoices.create(&tenant_id, draft).await?;
    Ok(HttpResponse::Created().json(invoice))
}

/// List the tenant's invoices, newest first, or fetch one.
#[utoipa::path(
    get,
    path = "/api/GetInvoices",
    params(
        ("tenant_id" = String, Query, description = "Owning tenant"),
        ("invoice_id" = Option<String>, Query, description = "Fetch a single invoice")
    ),
    responses(
        (status = 200, description = "Invoices", body = [InvoiceSchema]),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Invoice belongs to another tenant", body = ErrorSchema),
        (status = 404, description = "Invoice not found", body = ErrorSchema)
    ),
    tags = ["invoices"],
    operation_id = "getInvoices"
)]
#[get("/GetInvoices")]
pub async fn get_invoices(
    state: web::Data<HttpState>,
    req: HttpRequest,
    query: web::Query<InvoiceQuery>,
) -> ApiResult<web::Json<Vec<Invoice>>> {
    let InvoiceQuery {
        tenant_id,
        invoice_id,
    } = query.into_inner();
    let tenant_id = require_tenant_id(tenant_id)?;
    let invoice_id = optional_uuid(invoice_id, "invoice_id")?;
    authorize_tenant(&state, &req, &tenant_id)?;
    let invoices = list_or_get(state.invoices.as_ref(), &tenant_id, invoice_id).await?;
    Ok(web::Json(invoices))
}

/// Merge supplied fields into an invoice and recompute its total.
#[utoipa::path(
    put,
    path = "/api/UpdateInvoice",
    request_body = UpdateInvoiceRequest,
    responses(
        (status = 200, description = "Updated invoice", body = InvoiceSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Invoice belongs to another tenant", body = ErrorSchema),
        (status = 404, description = "Invoice not found", body = ErrorSchema)
    ),
    tags = ["invoices"],
    operation_id = "updateInvoice"
)]
#[put("/UpdateInvoice")]
pub async fn update_invoice(
    state: web::Data<HttpState>,
    req: HttpRequest,
    payload: web::Json<UpdateInvoiceRequest>,
) -> ApiResult<web::Json<Invoice>> {
    let (tenant_id, invoice_id, patch) = parse_update_request(payload.into_inner())?;
    authorize_tenant(&state, &req, &tenant_id)?;
    let invoice = state.invoices.update(&tenant_id, invoice_id, patch).await?;
    Ok(web::Json(invoice))
}

/// Delete an invoice.
#[utoipa::path(
    delete,
    path = "/api/DeleteInvoice",
    params(
        ("tenant_id" = String, Query, description = "Owning tenant"),
        ("invoice_id" = String, Query, description = "Invoice to delete")
    ),
    responses(
        (status = 200, description = "Invoice deleted", body = DeletedResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Invoice belongs to another tenant", body = ErrorSchema),
        (status = 404, description = "Invoice not found", body = ErrorSchema)
    ),
    tags = ["invoices"],
    operation_id = "deleteInvoice"
)]
#[delete("/DeleteInvoice")]
pub async fn delete_invoice(
    state: web::Data<HttpState>,
    req: HttpRequest,
    query: web::Query<InvoiceQuery>,
) -> ApiResult<web::Json<DeletedResponse>> {
    let InvoiceQuery {
        tenant_id,
        invoice_id,
    } = query.into_inner();
    let tenant_id = require_tenant_id(tenant_id)?;
    let invoice_id = require_uuid(invoice_id, "invoice_id")?;
    authorize_tenant(&state, &req, &tenant_id)?;
    state.invoices.delete(&tenant_id, invoice_id).await?;
    Ok(web::Json(DeletedResponse::new("Invoice deleted successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::InvoiceStatus;
    use rstest::rstest;

    fn create_request() -> CreateInvoiceRequest {
        CreateInvoiceRequest {
            tenant_id: Some("tenant-a".to_owned()),
            customer_name: Some("Jens Hansen".to_owned()),
            customer_email: Some("jens@example.dk".to_owned()),
            amount: Some(150_000),
            tax_amount: Some(37_500),
            due_date: Some("2026-03-15".to_owned()),
            ..CreateInvoiceRequest::default()
        }
    }

    #[rstest]
    fn create_request_keeps_optional_fields_empty() {
        let (_, draft) = parse_create_request(create_request()).expect("valid invoice");

        assert_eq!(draft.amount, 150_000);
        assert_eq!(draft.invoice_number, None);
        assert_eq!(draft.booking_id, None);
        assert_eq!(draft.issued_date, None);
    }

    #[rstest]
    #[case(CreateInvoiceRequest { amount: None, ..create_request() }, "amount")]
    #[case(CreateInvoiceRequest { due_date: None, ..create_request() }, "due_date")]
    #[case(CreateInvoiceRequest { booking_id: Some("x".to_owned()), ..create_request() }, "booking_id")]
    #[case(CreateInvoiceRequest { status: Some("refunded".to_owned()), ..create_request() }, "status")]
    fn create_request_reports_field(#[case] payload: CreateInvoiceRequest, #[case] field: &str) {
        let err = parse_create_request(payload).expect_err("invalid invoice");

        assert_eq!(err.details().expect("details")["field"], field);
    }

    #[rstest]
    fn update_request_parses_paid_state() {
        let payload = UpdateInvoiceRequest {
            tenant_id: Some("tenant-a".to_owned()),
            invoice_id: Some(Uuid::nil().to_string()),
            status: Some("paid".to_owned()),
            paid_date: Some("2026-03-10".to_owned()),
            ..UpdateInvoiceRequest::default()
        };

        let (_, _, patch) = parse_update_request(payload).expect("valid patch");

        assert_eq!(patch.status, Some(InvoiceStatus::Paid));
        assert!(patch.paid_date.is_some());
    }
}
