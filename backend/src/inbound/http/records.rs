//! Request parsing shared by the vehicle, booking, and invoice handlers.

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ports::TenantRecords;
use crate::domain::{ContactEmail, Error, RecordValidationError, TenantId, TenantRecord};
use crate::inbound::http::validation::{invalid_field_error, parse_uuid};

/// Confirmation body for record deletions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DeletedResponse {
    #[schema(example = "Vehicle deleted successfully")]
    pub message: String,
}

impl DeletedResponse {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Parse an optional record id, treating blank values as absent.
pub(crate) fn optional_uuid(value: Option<String>, field: &str) -> Result<Option<Uuid>, Error> {
    value
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| parse_uuid(&raw, field))
        .transpose()
}

pub(crate) fn parse_status<S>(raw: &str, field: &str) -> Result<S, Error>
where
    S: FromStr<Err = RecordValidationError>,
{
    raw.trim()
        .parse()
        .map_err(|err: RecordValidationError| invalid_field_error(field, err.message))
}

pub(crate) fn optional_status<S>(value: Option<String>, field: &str) -> Result<Option<S>, Error>
where
    S: FromStr<Err = RecordValidationError>,
{
    value.map(|raw| parse_status(&raw, field)).transpose()
}

/// Parse a calendar date written as `YYYY-MM-DD`.
pub(crate) fn parse_date(raw: &str, field: &str) -> Result<NaiveDate, Error> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| invalid_field_error(field, "must be a date formatted as YYYY-MM-DD"))
}

pub(crate) fn optional_date(value: Option<String>, field: &str) -> Result<Option<NaiveDate>, Error> {
    value.map(|raw| parse_date(&raw, field)).transpose()
}

pub(crate) fn parse_email(raw: String, field: &str) -> Result<ContactEmail, Error> {
    ContactEmail::new(raw).map_err(|err| invalid_field_error(field, err))
}

pub(crate) fn optional_email(
    value: Option<String>,
    field: &str,
) -> Result<Option<ContactEmail>, Error> {
    value.map(|raw| parse_email(raw, field)).transpose()
}

/// List a tenant's records, or the single record named by `id`.
pub(crate) async fn list_or_get<R: TenantRecord>(
    records: &dyn TenantRecords<R>,
    tenant_id: &TenantId,
    id: Option<Uuid>,
) -> Result<Vec<R>, Error> {
    match id {
        Some(id) => Ok(vec![records.get(tenant_id, id).await?]),
        None => records.list(tenant_id).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BookingStatus, VehicleStatus};
    use rstest::rstest;

    #[rstest]
    fn status_errors_name_the_request_field() {
        let err = parse_status::<VehicleStatus>("stolen", "availability_status")
            .expect_err("unknown status");

        assert_eq!(err.details().expect("details")["field"], "availability_status");
        assert!(err.message().contains("stolen"));
    }

    #[rstest]
    fn statuses_are_trimmed() {
        let status: BookingStatus = parse_status(" confirmed ", "status").expect("status");

        assert_eq!(status, BookingStatus::Confirmed);
    }

    #[rstest]
    #[case("2026-03-01", true)]
    #[case("01-03-2026", false)]
    #[case("2026-02-30", false)]
    fn parses_iso_dates(#[case] raw: &str, #[case] ok: bool) {
        assert_eq!(parse_date(raw, "start_date").is_ok(), ok);
    }

    #[rstest]
    #[case(None)]
    #[case(Some(String::new()))]
    #[case(Some("  ".to_owned()))]
    fn blank_ids_are_absent(#[case] value: Option<String>) {
        assert_eq!(optional_uuid(value, "vehicle_id").expect("absent"), None);
    }
}
