//! Shared contract for tenant-owned records (vehicles, bookings, invoices).
//!
//! Each record type knows how to build itself from a validated draft and how
//! to merge a partial update. Storage and ownership checks are generic over
//! this trait; see [`crate::domain::TenantRecordService`].

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use super::TenantId;

/// Validation failure raised while building or patching a record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct RecordValidationError {
    pub field: &'static str,
    pub message: String,
}

impl RecordValidationError {
    /// Build an error for `field`.
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// A record owned by exactly one tenant.
pub trait TenantRecord:
    Clone + std::fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Validated creation input.
    type Draft: Send + Sync + 'static;
    /// Partial update input.
    type Patch: Send + Sync + 'static;

    /// Singular noun used in messages, such as `vehicle`.
    const KIND: &'static str;

    /// Record identifier.
    fn id(&self) -> Uuid;

    /// Owning tenant.
    fn tenant_id(&self) -> &TenantId;

    /// Creation timestamp, used for newest-first listings.
    fn created_at(&self) -> DateTime<Utc>;

    /// Build a new record.
    fn create(
        tenant_id: TenantId,
        draft: Self::Draft,
        now: DateTime<Utc>,
    ) -> Result<Self, RecordValidationError>;

    /// Merge a patch into the record and refresh its update timestamp.
    fn apply(&mut self, patch: Self::Patch, now: DateTime<Utc>)
    -> Result<(), RecordValidationError>;
}

/// Require a trimmed, non-empty text value.
pub(crate) fn required_text(
    field: &'static str,
    value: String,
) -> Result<String, RecordValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(RecordValidationError::new(field, "must not be empty"));
    }
    Ok(trimmed.to_owned())
}

/// Collapse blank optional text to `None`.
pub(crate) fn optional_text(value: Option<String>) -> Option<String> {
    value.and_then(|text| {
        let trimmed = text.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_owned())
    })
}

/// Require a non-negative amount in minor currency units.
pub(crate) fn non_negative(field: &'static str, value: i64) -> Result<i64, RecordValidationError> {
    if value < 0 {
        return Err(RecordValidationError::new(field, "must not be negative"));
    }
    Ok(value)
}

/// Declare a lowercase status enum with storage conversions.
macro_rules! record_status {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $( $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $( $variant, )+
        }

        impl $name {
            /// Stable storage representation.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $text, )+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::domain::RecordValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $text => Ok(Self::$variant), )+
                    other => Err($crate::domain::RecordValidationError::new(
                        "status",
                        format!("unknown value {other}"),
                    )),
                }
            }
        }
    };
}

pub(crate) use record_status;
