//! Fleet vehicles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::TenantId;
use super::tenant_record::{
    RecordValidationError, TenantRecord, non_negative, optional_text, record_status,
    required_text,
};

const YEAR_MIN: i32 = 1900;
const YEAR_MAX: i32 = 2100;

record_status! {
    /// Whether a vehicle can currently be booked.
    pub enum VehicleStatus {
        Available => "available",
        Rented => "rented",
        Maintenance => "maintenance",
        Retired => "retired",
    }
}

/// A vehicle offered for rent by a tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: Uuid,
    pub tenant_id: TenantId,
    pub make: String,
    pub model: String,
    pub year: Option<i32>,
    pub license_plate: String,
    pub vin: Option<String>,
    /// Price per day in minor currency units.
    pub daily_rate: Option<i64>,
    /// Included kilometres per day.
    pub mileage_limit: Option<i32>,
    pub availability_status: VehicleStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Creation input for a vehicle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VehicleDraft {
    pub make: String,
    pub model: String,
    pub year: Option<i32>,
    pub license_plate: String,
    pub vin: Option<String>,
    pub daily_rate: Option<i64>,
    pub mileage_limit: Option<i32>,
    pub availability_status: Option<VehicleStatus>,
}

/// Partial vehicle update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VehiclePatch {
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub license_plate: Option<String>,
    pub vin: Option<String>,
    pub daily_rate: Option<i64>,
    pub mileage_limit: Option<i32>,
    pub availability_status: Option<VehicleStatus>,
}

fn validate_year(year: i32) -> Result<i32, RecordValidationError> {
    if !(YEAR_MIN..=YEAR_MAX).contains(&year) {
        return Err(RecordValidationError::new(
            "year",
            format!("must be between {YEAR_MIN} and {YEAR_MAX}"),
        ));
    }
    Ok(year)
}

fn validate_mileage(limit: i32) -> Result<i32, RecordValidationError> {
    if limit < 0 {
        return Err(RecordValidationError::new(
            "mileage_limit",
            "must not be negative",
        ));
    }
    Ok(limit)
}

fn normalise_plate(plate: String) -> Result<String, RecordValidationError> {
    required_text("license_plate", plate).map(|plate| plate.to_uppercase())
}

impl TenantRecord for Vehicle {
    type Draft = VehicleDraft;
    type Patch = VehiclePatch;

    const KIND: &'static str = "vehicle";

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
        draft: VehicleDraft,
        now: DateTime<Utc>,
    ) -> Result<Self, RecordValidationError> {
        Ok(Self {
            id: Uuid::new_v4(),
            tenant_id,
            make: required_text("make", draft.make)?,
            model: required_text("model", draft.model)?,
            year: draft.year.map(validate_year).transpose()?,
            license_plate: normalise_plate(draft.license_plate)?,
            vin: optional_text(draft.vin),
            daily_rate: draft
                .daily_rate
                .map(|rate| non_negative("daily_rate", rate))
                .transpose()?,
            mileage_limit: draft.mileage_limit.map(validate_mileage).transpose()?,
            availability_status: draft
                .availability_status
                .unwrap_or(VehicleStatus::Available),
            created_at: now,
            updated_at: now,
        })
    }

    fn apply(&mut self, patch: VehiclePatch, now: DateTime<Utc>) -> Result<(), RecordValidationError> {
        if let Some(make) = patch.make {
            self.make = required_text("make", make)?;
        }
        if let Some(model) = patch.model {
            self.model = required_text("model", model)?;
        }
        if let Some(year) = patch.year {
            self.year = Some(validate_year(year)?);
        }
        if let Some(plate) = patch.license_plate {
            self.license_plate = normalise_plate(plate)?;
        }
        if let Some(vin) = patch.vin {
            self.vin = optional_text(Some(vin));
        }
        if let Some(rate) = patch.daily_rate {
            self.daily_rate = Some(non_negative("daily_rate", rate)?);
        }
        if let Some(limit) = patch.mileage_limit {
            self.mileage_limit = Some(validate_mileage(limit)?);
        }
        if let Some(status) = patch.availability_status {
            self.availability_status = status;
        }
        self.updated_at = now;
        Ok(())
    }
}
