//! Tenant (lessor) data model.
//!
//! A tenant is a rental business with its own site under the platform root
//! domain. Tenants are created at signup and looked up by subdomain on every
//! public request. There is no deletion flow; `status` is the only lifecycle
//! switch.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, Duration, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{OwnerKey, OwnerKeyDigest};

/// Theme colour assigned to new tenants.
pub const DEFAULT_PRIMARY_COLOR: &str = "#3b82f6";

/// Subdomains that can never belong to a tenant.
const RESERVED_SUBDOMAINS: &[&str] = &["www"];

/// Validation errors raised while constructing tenant values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TenantValidationError {
    #[error("tenant id must not be empty")]
    EmptyId,
    #[error("tenant id must not contain whitespace")]
    InvalidId,
    #[error("subdomain must be 3-50 characters of lowercase letters, digits, or hyphens")]
    InvalidSubdomain,
    #[error("subdomain {0} is reserved")]
    ReservedSubdomain(String),
    #[error("company name must not be empty")]
    EmptyName,
    #[error("email must be a valid address")]
    InvalidEmail,
    #[error("colour must be a hex value such as #3b82f6")]
    InvalidColor,
    #[error("unknown plan tier: {0}")]
    UnknownPlan(String),
    #[error("unknown tenant status: {0}")]
    UnknownStatus(String),
}

macro_rules! string_newtype_conversions {
    ($name:ident) => {
        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.0.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.0.as_str())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = TenantValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }
    };
}

/// Identifier of the tenant owning pages, vehicles, bookings, and invoices.
///
/// Signup issues identifiers of the form `tenant-<uuid>`, but any opaque
/// non-empty token is accepted so records created by other tools still load.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TenantId(String);

impl TenantId {
    /// Validate and construct an identifier.
    pub fn new(value: impl Into<String>) -> Result<Self, TenantValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(TenantValidationError::EmptyId);
        }
        if value.chars().any(char::is_whitespace) {
            return Err(TenantValidationError::InvalidId);
        }
        Ok(Self(value))
    }

    /// Generate a fresh `tenant-<uuid>` identifier.
    pub fn generate() -> Self {
        Self(format!("tenant-{}", Uuid::new_v4()))
    }

    /// Borrow the identifier text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

string_newtype_conversions!(TenantId);

static SUBDOMAIN_RE: OnceLock<Regex> = OnceLock::new();

fn subdomain_regex() -> &'static Regex {
    SUBDOMAIN_RE.get_or_init(|| {
        Regex::new("^[a-z0-9-]{3,50}$")
            .unwrap_or_else(|error| panic!("subdomain regex failed to compile: {error}"))
    })
}

/// Routing key placed in front of the platform root domain.
///
/// # Examples
/// ```
/// use lejio::domain::Subdomain;
///
/// assert!(Subdomain::new("acme").is_ok());
/// assert!(Subdomain::new("www").is_err());
/// assert!(Subdomain::new("Acme").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Subdomain(String);

impl Subdomain {
    /// Validate and construct a subdomain.
    pub fn new(value: impl Into<String>) -> Result<Self, TenantValidationError> {
        let value = value.into();
        if !subdomain_regex().is_match(&value) {
            return Err(TenantValidationError::InvalidSubdomain);
        }
        if RESERVED_SUBDOMAINS.contains(&value.as_str()) {
            return Err(TenantValidationError::ReservedSubdomain(value));
        }
        Ok(Self(value))
    }

    /// Borrow the subdomain text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Full host name of the tenant site under `root_domain`.
    pub fn domain_under(&self, root_domain: &str) -> String {
        format!("{}.{root_domain}", self.0)
    }
}

string_newtype_conversions!(Subdomain);

/// Owner contact address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContactEmail(String);

impl ContactEmail {
    /// Validate and construct an address. Only the basic `local@domain`
    /// shape is checked; deliverability is not.
    pub fn new(value: impl Into<String>) -> Result<Self, TenantValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        let Some((local, domain)) = trimmed.split_once('@') else {
            return Err(TenantValidationError::InvalidEmail);
        };
        let well_formed = !local.is_empty()
            && domain.contains('.')
            && !domain.starts_with('.')
            && !domain.ends_with('.')
            && !trimmed.chars().any(char::is_whitespace)
            && !domain.contains('@');
        if !well_formed {
            return Err(TenantValidationError::InvalidEmail);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the address text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Case-insensitive comparison used when issuing access tokens.
    pub fn matches(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other.trim())
    }
}

string_newtype_conversions!(ContactEmail);

static COLOR_RE: OnceLock<Regex> = OnceLock::new();

fn color_regex() -> &'static Regex {
    COLOR_RE.get_or_init(|| {
        Regex::new("^#[0-9a-fA-F]{6}$")
            .unwrap_or_else(|error| panic!("colour regex failed to compile: {error}"))
    })
}

/// Site theming colour as a `#rrggbb` hex string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ThemeColor(String);

impl ThemeColor {
    /// Validate and construct a colour.
    pub fn new(value: impl Into<String>) -> Result<Self, TenantValidationError> {
        let value = value.into();
        if !color_regex().is_match(&value) {
            return Err(TenantValidationError::InvalidColor);
        }
        Ok(Self(value.to_ascii_lowercase()))
    }
}

impl Default for ThemeColor {
    fn default() -> Self {
        Self(DEFAULT_PRIMARY_COLOR.to_owned())
    }
}

string_newtype_conversions!(ThemeColor);

/// Subscription tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanTier {
    Trial,
    Basic,
    Pro,
    Enterprise,
}

impl PlanTier {
    /// Stable storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trial => "trial",
            Self::Basic => "basic",
            Self::Pro => "pro",
            Self::Enterprise => "enterprise",
        }
    }
}

impl FromStr for PlanTier {
    type Err = TenantValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trial" => Ok(Self::Trial),
            "basic" => Ok(Self::Basic),
            "pro" => Ok(Self::Pro),
            "enterprise" => Ok(Self::Enterprise),
            other => Err(TenantValidationError::UnknownPlan(other.to_owned())),
        }
    }
}

/// Account status. Suspended and cancelled tenants keep their data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TenantStatus {
    Active,
    Suspended,
    Cancelled,
}

impl TenantStatus {
    /// Stable storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Suspended => "suspended",
            Self::Cancelled => "cancelled",
        }
    }
}

impl FromStr for TenantStatus {
    type Err = TenantValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "suspended" => Ok(Self::Suspended),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(TenantValidationError::UnknownStatus(other.to_owned())),
        }
    }
}

/// Validated signup request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantSignup {
    pub company_name: String,
    pub email: ContactEmail,
    pub subdomain: Subdomain,
}

impl TenantSignup {
    /// Validate raw signup fields.
    pub fn new(
        company_name: impl Into<String>,
        email: impl Into<String>,
        subdomain: impl Into<String>,
    ) -> Result<Self, TenantValidationError> {
        let company_name = company_name.into().trim().to_owned();
        if company_name.is_empty() {
            return Err(TenantValidationError::EmptyName);
        }
        Ok(Self {
            company_name,
            email: ContactEmail::new(email)?,
            subdomain: Subdomain::new(subdomain)?,
        })
    }
}

/// A lessor organisation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    pub id: TenantId,
    pub name: String,
    pub subdomain: Subdomain,
    pub domain: String,
    pub plan: PlanTier,
    pub status: TenantStatus,
    pub owner_email: ContactEmail,
    /// Digest of the owner key handed out at signup.
    pub owner_key_digest: OwnerKeyDigest,
    pub primary_color: ThemeColor,
    pub logo_url: Option<String>,
    pub trial_end_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tenant {
    /// Build a new trial tenant from a signup, keeping only the digest of
    /// `owner_key`.
    pub fn from_signup(
        signup: TenantSignup,
        owner_key: &OwnerKey,
        root_domain: &str,
        trial_days: u32,
        now: DateTime<Utc>,
    ) -> Self {
        let TenantSignup {
            company_name,
            email,
            subdomain,
        } = signup;
        Self {
            id: TenantId::generate(),
            name: company_name,
            domain: subdomain.domain_under(root_domain),
            subdomain,
            plan: PlanTier::Trial,
            status: TenantStatus::Active,
            owner_email: email,
            owner_key_digest: owner_key.digest(),
            primary_color: ThemeColor::default(),
            logo_url: None,
            trial_end_date: now + Duration::days(i64::from(trial_days)),
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether a trial tenant has run past its expiry.
    pub fn trial_expired(&self, now: DateTime<Utc>) -> bool {
        self.plan == PlanTier::Trial && now >= self.trial_end_date
    }

    /// Whether `email` and `owner_key` both belong to the owner.
    pub fn owner_credentials_match(&self, email: &str, owner_key: &str) -> bool {
        let email_matches = self.owner_email.matches(email);
        let key_matches = self.owner_key_digest.matches(owner_key);
        email_matches && key_matches
    }
}

/// Result of a signup: the stored tenant and the owner key, which is not
/// kept anywhere and cannot be recovered later.
#[derive(Debug, Clone)]
pub struct TenantRegistration {
    pub tenant: Tenant,
    pub owner_key: OwnerKey,
}
