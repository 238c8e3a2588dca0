//! Shared validation helpers for inbound HTTP adapters.
//!
//! Failures become `invalid_request` errors whose details name the field and
//! a machine-readable code.

use std::fmt::Display;

use serde_json::json;
use uuid::Uuid;

use crate::domain::{Error, TenantId};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    InvalidField,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidField => "invalid_field",
        }
    }
}

fn field_error(field: &str, message: String, code: ErrorCode) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: &str) -> Error {
    field_error(
        field,
        format!("missing required field: {field}"),
        ErrorCode::MissingField,
    )
}

pub(crate) fn invalid_field_error(field: &str, reason: impl Display) -> Error {
    field_error(field, format!("{field}: {reason}"), ErrorCode::InvalidField)
}

/// Require an optional field, treating blank strings as missing.
pub(crate) fn require<T>(value: Option<T>, field: &str) -> Result<T, Error>
where
    T: AsRef<str>,
{
    value
        .filter(|text| !text.as_ref().trim().is_empty())
        .ok_or_else(|| missing_field_error(field))
}

/// Require a field and parse it as a UUID.
pub(crate) fn require_uuid(value: Option<String>, field: &str) -> Result<Uuid, Error> {
    let raw = require(value, field)?;
    parse_uuid(&raw, field)
}

pub(crate) fn parse_uuid(raw: &str, field: &str) -> Result<Uuid, Error> {
    Uuid::parse_str(raw.trim()).map_err(|_| {
        Error::invalid_request(format!("{field} must be a valid UUID")).with_details(json!({
            "field": field,
            "value": raw,
            "code": ErrorCode::InvalidUuid.as_str(),
        }))
    })
}

/// Require a field and parse it as a tenant identifier.
pub(crate) fn require_tenant_id(value: Option<String>) -> Result<TenantId, Error> {
    let raw = require(value, "tenant_id")?;
    TenantId::new(raw).map_err(|err| invalid_field_error("tenant_id", err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode as DomainCode;
    use rstest::rstest;

    #[rstest]
    #[case(None)]
    #[case(Some("   ".to_owned()))]
    fn missing_and_blank_values_are_rejected(#[case] value: Option<String>) {
        let err = require(value, "title").expect_err("missing title");

        assert_eq!(err.code(), DomainCode::InvalidRequest);
        assert_eq!(err.message(), "missing required field: title");
        assert_eq!(
            err.details(),
            Some(&json!({"field": "title", "code": "missing_field"}))
        );
    }

    #[rstest]
    fn malformed_uuid_reports_value() {
        let err = require_uuid(Some("nope".to_owned()), "page_id").expect_err("bad uuid");

        let details = err.details().expect("details");
        assert_eq!(details["code"], "invalid_uuid");
        assert_eq!(details["value"], "nope");
    }

    #[rstest]
    fn tenant_id_is_parsed() {
        let id = require_tenant_id(Some("t1".to_owned())).expect("tenant id");
        assert_eq!(id.as_str(), "t1");
    }
}
