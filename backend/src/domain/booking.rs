//! Vehicle bookings.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::tenant_record::{
    RecordValidationError, TenantRecord, non_negative, optional_text, record_status,
    required_text,
};
use super::{ContactEmail, TenantId};

record_status! {
    /// Booking lifecycle state.
    pub enum BookingStatus {
        Pending => "pending",
        Confirmed => "confirmed",
        Active => "active",
        Completed => "completed",
        Cancelled => "cancelled",
    }
}

/// A customer's reservation of one vehicle over a date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub tenant_id: TenantId,
    pub vehicle_id: Uuid,
    pub customer_name: String,
    pub customer_email: ContactEmail,
    pub customer_phone: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: BookingStatus,
    pub daily_rate: Option<i64>,
    pub total_price: Option<i64>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Creation input for a booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingDraft {
    pub vehicle_id: Uuid,
    pub customer_name: String,
    pub customer_email: ContactEmail,
    pub customer_phone: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: Option<BookingStatus>,
    pub daily_rate: Option<i64>,
    pub total_price: Option<i64>,
    pub notes: Option<String>,
}

/// Partial booking update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingPatch {
    pub customer_name: Option<String>,
    pub customer_email: Option<ContactEmail>,
    pub customer_phone: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: Option<BookingStatus>,
    pub daily_rate: Option<i64>,
    pub total_price: Option<i64>,
    pub notes: Option<String>,
}

/// Number of billable days, counting same-day returns as one day.
pub fn rental_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days().max(1)
}

fn check_range(start: NaiveDate, end: NaiveDate) -> Result<(), RecordValidationError> {
    if end < start {
        return Err(RecordValidationError::new(
            "end_date",
            "must not be before start_date",
        ));
    }
    Ok(())
}

fn resolve_total(
    explicit: Option<i64>,
    daily_rate: Option<i64>,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Option<i64>, RecordValidationError> {
    if let Some(total) = explicit {
        return non_negative("total_price", total).map(Some);
    }
    daily_rate
        .map(|rate| {
            rate.checked_mul(rental_days(start, end))
                .ok_or_else(|| RecordValidationError::new("total_price", "amount overflows"))
        })
        .transpose()
}

impl TenantRecord for Booking {
    type Draft = BookingDraft;
    type Patch = BookingPatch;

    const KIND: &'static str = "booking";

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
        draft: BookingDraft,
        now: DateTime<Utc>,
    ) -> Result<Self, RecordValidationError> {
        check_range(draft.start_date, draft.end_date)?;
        let daily_rate = draft
            .daily_rate
            .map(|rate| non_negative("daily_rate", rate))
            .transpose()?;
        let total_price =
            resolve_total(draft.total_price, daily_rate, draft.start_date, draft.end_date)?;
        Ok(Self {
            id: Uuid::new_v4(),
            tenant_id,
            vehicle_id: draft.vehicle_id,
            customer_name: required_text("customer_name", draft.customer_name)?,
            customer_email: draft.customer_email,
            customer_phone: required_text("customer_phone", draft.customer_phone)?,
            start_date: draft.start_date,
            end_date: draft.end_date,
            status: draft.status.unwrap_or(BookingStatus::Pending),
            daily_rate,
            total_price,
            notes: optional_text(draft.notes),
            created_at: now,
            updated_at: now,
        })
    }

    /// Date or rate changes recompute the total unless one is supplied.
    fn apply(&mut self, patch: BookingPatch, now: DateTime<Utc>) -> Result<(), RecordValidationError> {
        let start = patch.start_date.unwrap_or(self.start_date);
        let end = patch.end_date.unwrap_or(self.end_date);
        check_range(start, end)?;
        let pricing_changed =
            patch.start_date.is_some() || patch.end_date.is_some() || patch.daily_rate.is_some();

        if let Some(name) = patch.customer_name {
            self.customer_name = required_text("customer_name", name)?;
        }
        if let Some(email) = patch.customer_email {
            self.customer_email = email;
        }
        if let Some(phone) = patch.customer_phone {
            self.customer_phone = required_text("customer_phone", phone)?;
        }
        if let Some(rate) = patch.daily_rate {
            self.daily_rate = Some(non_negative("daily_rate", rate)?);
        }
        self.start_date = start;
        self.end_date = end;
        if patch.total_price.is_some() || pricing_changed {
            let recomputed = resolve_total(patch.total_price, self.daily_rate, start, end)?;
            if recomputed.is_some() {
                self.total_price = recomputed;
            }
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(notes) = patch.notes {
            self.notes = optional_text(Some(notes));
        }
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

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[fixture]
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    #[fixture]
    fn draft() -> BookingDraft {
        BookingDraft {
            vehicle_id: Uuid::new_v4(),
            customer_name: "Mette Jensen".to_owned(),
            customer_email: ContactEmail::new("mette@example.dk").expect("email"),
            customer_phone: "+45 12 34 56 78".to_owned(),
            start_date: date(2026, 6, 1),
            end_date: date(2026, 6, 4),
            status: None,
            daily_rate: Some(50_000),
            total_price: None,
            notes: None,
        }
    }

    fn tenant() -> TenantId {
        TenantId::new("t1").expect("tenant id")
    }

    #[rstest]
    #[case(date(2026, 6, 1), date(2026, 6, 1), 1)]
    #[case(date(2026, 6, 1), date(2026, 6, 2), 1)]
    #[case(date(2026, 6, 1), date(2026, 6, 8), 7)]
    fn rental_days_has_one_day_minimum(
        #[case] start: NaiveDate,
        #[case] end: NaiveDate,
        #[case] expected: i64,
    ) {
        assert_eq!(rental_days(start, end), expected);
    }

    #[rstest]
    fn create_computes_total_from_rate(draft: BookingDraft, now: DateTime<Utc>) {
        let booking = Booking::create(tenant(), draft, now).expect("valid booking");
        assert_eq!(booking.total_price, Some(150_000));
        assert_eq!(booking.status, BookingStatus::Pending);
    }

    #[rstest]
    fn create_keeps_explicit_total(draft: BookingDraft, now: DateTime<Utc>) {
        let input = BookingDraft {
            total_price: Some(99_000),
            ..draft
        };
        let booking = Booking::create(tenant(), input, now).expect("valid booking");
        assert_eq!(booking.total_price, Some(99_000));
    }

    #[rstest]
    fn create_rejects_reversed_dates(draft: BookingDraft, now: DateTime<Utc>) {
        let input = BookingDraft {
            end_date: date(2026, 5, 30),
            ..draft
        };
        let err = Booking::create(tenant(), input, now).expect_err("reversed range");
        assert_eq!(err.field, "end_date");
    }

    #[rstest]
    fn apply_recomputes_total_when_dates_move(draft: BookingDraft, now: DateTime<Utc>) {
        let mut booking = Booking::create(tenant(), draft, now).expect("valid booking");
        booking
            .apply(
                BookingPatch {
                    end_date: Some(date(2026, 6, 6)),
                    ..BookingPatch::default()
                },
                now,
            )
            .expect("valid patch");
        assert_eq!(booking.total_price, Some(250_000));
        assert_eq!(booking.customer_name, "Mette Jensen");
    }

    #[rstest]
    fn apply_rejects_end_before_existing_start(draft: BookingDraft, now: DateTime<Utc>) {
        let mut booking = Booking::create(tenant(), draft, now).expect("valid booking");
        let result = booking.apply(
            BookingPatch {
                end_date: Some(date(2026, 5, 1)),
                ..BookingPatch::default()
            },
            now,
        );
        assert!(result.is_err());
        assert_eq!(booking.end_date, date(2026, 6, 4));
    }
}
