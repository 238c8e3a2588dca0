//! Customer invoices.
//!
//! Totals are derived on every write as `amount + tax - discount` and must
//! not go negative. Numbers default to `INV-YYYYMM-NNNN`.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::tenant_record::{
    RecordValidationError, TenantRecord, non_negative, optional_text, record_status,
    required_text,
};
use super::{ContactEmail, TenantId};

record_status! {
    /// Invoice payment state.
    pub enum InvoiceStatus {
        Draft => "draft",
        Sent => "sent",
        Paid => "paid",
        Overdue => "overdue",
        Cancelled => "cancelled",
    }
}

/// An invoice issued by a tenant, optionally tied to a booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: Uuid,
    pub tenant_id: TenantId,
    pub booking_id: Option<Uuid>,
    pub invoice_number: String,
    pub customer_name: String,
    pub customer_email: ContactEmail,
    pub amount: i64,
    pub tax_amount: i64,
    pub discount_amount: i64,
    pub total_amount: i64,
    pub description: Option<String>,
    pub issued_date: NaiveDate,
    pub due_date: NaiveDate,
    pub status: InvoiceStatus,
    pub payment_method: Option<String>,
    pub paid_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Creation input for an invoice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceDraft {
    pub booking_id: Option<Uuid>,
    pub invoice_number: Option<String>,
    pub customer_name: String,
    pub customer_email: ContactEmail,
    pub amount: i64,
    pub tax_amount: Option<i64>,
    pub discount_amount: Option<i64>,
    pub description: Option<String>,
    pub issued_date: Option<NaiveDate>,
    pub due_date: NaiveDate,
    pub status: Option<InvoiceStatus>,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
}

/// Partial invoice update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvoicePatch {
    pub customer_name: Option<String>,
    pub customer_email: Option<ContactEmail>,
    pub amount: Option<i64>,
    pub tax_amount: Option<i64>,
    pub discount_amount: Option<i64>,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub status: Option<InvoiceStatus>,
    pub payment_method: Option<String>,
    pub paid_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Generate an invoice number for the month of `today`.
pub fn generate_invoice_number(today: NaiveDate) -> String {
    let suffix: u16 = rand::thread_rng().gen_range(0..10_000);
    format!("INV-{:04}{:02}-{suffix:04}", today.year(), today.month())
}

fn total(amount: i64, tax: i64, discount: i64) -> Result<i64, RecordValidationError> {
    let total = amount
        .checked_add(tax)
        .and_then(|gross| gross.checked_sub(discount))
        .ok_or_else(|| RecordValidationError::new("total_amount", "amount overflows"))?;
    if total < 0 {
        return Err(RecordValidationError::new(
            "discount_amount",
            "must not exceed amount plus tax",
        ));
    }
    Ok(total)
}

fn check_due(issued: NaiveDate, due: NaiveDate) -> Result<(), RecordValidationError> {
    if due < issued {
        return Err(RecordValidationError::new(
            "due_date",
            "must not be before issued_date",
        ));
    }
    Ok(())
}

impl TenantRecord for Invoice {
    type Draft = InvoiceDraft;
    type Patch = InvoicePatch;

    const KIND: &'static str = "invoice";

    fn id(&self) -> Uuid {
        self.id
    }

    fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn create(
        tenant_id: TenantId,
        draft: InvoiceDraft,
        now: DateTime<Utc>,
    ) -> Result<Self, RecordValidationError> {
        let today = now.date_naive();
        let issued_date = draft.issued_date.unwrap_or(today);
        check_due(issued_date, draft.due_date)?;
        let amount = non_negative("amount", draft.amount)?;
        let tax_amount = non_negative("tax_amount", draft.tax_amount.unwrap_or(0))?;
        let discount_amount = non_negative("discount_amount", draft.discount_amount.unwrap_or(0))?;
        let status = draft.status.unwrap_or(InvoiceStatus::Draft);
        let invoice_number = optional_text(draft.invoice_number)
            .unwrap_or_else(|| generate_invoice_number(today));
        Ok(Self {
            id: Uuid::new_v4(),
            tenant_id,
            booking_id: draft.booking_id,
            invoice_number,
            customer_name: required_text("customer_name", draft.customer_name)?,
            customer_email: draft.customer_email,
            amount,
            tax_amount,
            discount_amount,
            total_amount: total(amount, tax_amount, discount_amount)?,
            description: optional_text(draft.description),
            issued_date,
            due_date: draft.due_date,
            status,
            payment_method: optional_text(draft.payment_method),
            paid_date: (status == InvoiceStatus::Paid).then_some(today),
            notes: optional_text(draft.notes),
            created_at: now,
            updated_at: now,
        })
    }

    /// Marking an invoice paid stamps `paid_date` with today unless given.
    fn apply(&mut self, patch: InvoicePatch, now: DateTime<Utc>) -> Result<(), RecordValidationError> {
        let due_date = patch.due_date.unwrap_or(self.due_date);
        check_due(self.issued_date, due_date)?;
        let amount = non_negative("amount", patch.amount.unwrap_or(self.amount))?;
        let tax_amount = non_negative("tax_amount", patch.tax_amount.unwrap_or(self.tax_amount))?;
        let discount_amount = non_negative(
            "discount_amount",
            patch.discount_amount.unwrap_or(self.discount_amount),
        )?;
        let total_amount = total(amount, tax_amount, discount_amount)?;

        if let Some(name) = patch.customer_name {
            self.customer_name = required_text("customer_name", name)?;
        }
        if let Some(email) = patch.customer_email {
            self.customer_email = email;
        }
        if let Some(description) = patch.description {
            self.description = optional_text(Some(description));
        }
        if let Some(method) = patch.payment_method {
            self.payment_method = optional_text(Some(method));
        }
        if let Some(notes) = patch.notes {
            self.notes = optional_text(Some(notes));
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(paid) = patch.paid_date {
            self.paid_date = Some(paid);
        } else if self.status == InvoiceStatus::Paid && self.paid_date.is_none() {
            self.paid_date = Some(now.date_naive());
        }
        self.amount = amount;
        self.tax_amount = tax_amount;
        self.discount_amount = discount_amount;
        self.total_amount = total_amount;
        self.due_date = due_date;
        self.updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    #[fixture]
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 7, 15, 10, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    #[fixture]
    fn draft(now: DateTime<Utc>) -> InvoiceDraft {
        InvoiceDraft {
            booking_id: None,
            invoice_number: None,
            customer_name: "Jens Hansen".to_owned(),
            customer_email: ContactEmail::new("jens@example.dk").expect("email"),
            amount: 100_000,
            tax_amount: Some(25_000),
            discount_amount: Some(5_000),
            description: Some("Weekend rental".to_owned()),
            issued_date: None,
            due_date: now.date_naive() + chrono::Duration::days(14),
            status: None,
            payment_method: None,
            notes: None,
        }
    }

    fn tenant() -> TenantId {
        TenantId::new("t1").expect("tenant id")
    }

    #[rstest]
    fn generated_number_encodes_month() {
        let today = NaiveDate::from_ymd_opt(2026, 7, 15).expect("valid date");
        let number = generate_invoice_number(today);
        assert!(number.starts_with("INV-202607-"), "unexpected number {number}");
        assert_eq!(number.len(), "INV-202607-0000".len());
        assert!(number.chars().skip(11).all(|ch| ch.is_ascii_digit()));
    }

    #[rstest]
    fn create_derives_total_and_defaults(draft: InvoiceDraft, now: DateTime<Utc>) {
        let invoice = Invoice::create(tenant(), draft, now).expect("valid invoice");

        assert_eq!(invoice.total_amount, 120_000);
        assert_eq!(invoice.status, InvoiceStatus::Draft);
        assert_eq!(invoice.issued_date, now.date_naive());
        assert!(invoice.invoice_number.starts_with("INV-"));
        assert!(invoice.paid_date.is_none());
    }

    #[rstest]
    fn create_rejects_discount_above_gross(draft: InvoiceDraft, now: DateTime<Utc>) {
        let input = InvoiceDraft {
            discount_amount: Some(200_000),
            ..draft
        };
        let err = Invoice::create(tenant(), input, now).expect_err("negative total");
        assert_eq!(err.field, "discount_amount");
    }

    #[rstest]
    fn marking_paid_stamps_paid_date(draft: InvoiceDraft, now: DateTime<Utc>) {
        let mut invoice = Invoice::create(tenant(), draft, now).expect("valid invoice");

        invoice
            .apply(
                InvoicePatch {
                    status: Some(InvoiceStatus::Paid),
                    payment_method: Some("mobilepay".to_owned()),
                    ..InvoicePatch::default()
                },
                now,
            )
            .expect("valid patch");

        assert_eq!(invoice.paid_date, Some(now.date_naive()));
        assert_eq!(invoice.payment_method.as_deref(), Some("mobilepay"));
        assert_eq!(invoice.total_amount, 120_000);
    }

    #[rstest]
    fn apply_recomputes_total(draft: InvoiceDraft, now: DateTime<Utc>) {
        let mut invoice = Invoice::create(tenant(), draft, now).expect("valid invoice");
        invoice
            .apply(
                InvoicePatch {
                    discount_amount: Some(0),
                    ..InvoicePatch::default()
                },
                now,
            )
            .expect("valid patch");
        assert_eq!(invoice.total_amount, 125_000);
    }
}
