//! Error taxonomy shared by every operation.
//!
//! Nothing here knows about HTTP; the inbound adapter picks status codes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::TraceId;

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// A required field is missing or fails validation.
    InvalidRequest,
    /// Authentication failed or is missing.
    Unauthorized,
    /// The caller does not own the referenced resource.
    Forbidden,
    /// The referenced entity does not exist.
    NotFound,
    /// A uniqueness rule was violated, such as a duplicate page slug.
    Conflict,
    /// An unexpected failure, typically from the backing store.
    InternalError,
}

/// Failure returned by every Lejio operation.
///
/// Serialises as `{ "error", "code", "trace_id"?, "details"? }`, the envelope
/// the admin dashboard and the public site both read.
///
/// # Examples
/// ```
/// use lejio::domain::{Error, ErrorCode};
///
/// let err = Error::not_found("page not found");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// assert_eq!(err.message(), "page not found");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Error {
    #[serde(rename = "error")]
    message: String,
    code: ErrorCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    trace_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl Error {
    /// Build an error, stamping it with the request's trace id when one is
    /// in scope.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code,
            trace_id: TraceId::current().map(|id| id.to_string()),
            details: None,
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Message shown to admin users, serialised as `error`.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// Field-level context such as `{"field": "slug"}`.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    #[must_use]
    pub fn with_trace_id(mut self, id: impl Into<String>) -> Self {
        self.trace_id = Some(id.into());
        self
    }

    /// Attach field-level context.
    ///
    /// # Examples
    /// ```
    /// use lejio::domain::Error;
    /// use serde_json::json;
    ///
    /// let err = Error::conflict("Slug already exists").with_details(json!({ "field": "slug" }));
    /// assert_eq!(err.details().map(|d| &d["field"]), Some(&json!("slug")));
    /// ```
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}

macro_rules! shorthand {
    ($($name:ident => $code:ident),+ $(,)?) => {
        impl Error {
            $(
                #[doc = concat!("Error with [`ErrorCode::", stringify!($code), "`].")]
                pub fn $name(message: impl Into<String>) -> Self {
                    Self::new(ErrorCode::$code, message)
                }
            )+
        }
    };
}

shorthand! {
    invalid_request => InvalidRequest,
    unauthorized => Unauthorized,
    forbidden => Forbidden,
    not_found => NotFound,
    conflict => Conflict,
    internal => InternalError,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}
