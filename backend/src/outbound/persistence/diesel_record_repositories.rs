//! PostgreSQL-backed `RecordRepository` implementations for vehicles,
//! bookings, and invoices.
//!
//! The three tables share one access pattern (upsert by id, load by id, list
//! by tenant newest first, delete by id), so the adapters are generated by
//! [`record_repository!`] from a row type and a pair of conversions.

use std::fmt::Display;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::RecordRepositoryError;
use crate::domain::{Booking, ContactEmail, Invoice, TenantId, Vehicle};

use super::diesel_error_mapping::{map_diesel_failure, map_pool_failure};
use super::models::{BookingRow, InvoiceRow, VehicleRow};
use super::pool::{DbPool, PoolError};
use super::schema::{bookings, invoices, vehicles};

fn map_pool_error(error: PoolError) -> RecordRepositoryError {
    map_pool_failure(error, RecordRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> RecordRepositoryError {
    map_diesel_failure(
        error,
        RecordRepositoryError::query,
        RecordRepositoryError::connection,
    )
}

fn corrupt(kind: &str, error: impl Display) -> RecordRepositoryError {
    RecordRepositoryError::query(format!("stored {kind} is invalid: {error}"))
}

macro_rules! record_repository {
    (
        $(#[$meta:meta])*
        $repo:ident for $record:ty {
            row: $row:ty,
            table: $table:ident,
            to_row: $to_row:path,
            from_row: $from_row:path $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone)]
        pub struct $repo {
            pool: DbPool,
        }

        impl $repo {
            /// Create a repository over `pool`.
            pub fn new(pool: DbPool) -> Self {
                Self { pool }
            }
        }

        #[async_trait::async_trait]
        impl crate::domain::ports::RecordRepository<$record> for $repo {
            async fn save(&self, record: &$record) -> Result<(), RecordRepositoryError> {
                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                let row = $to_row(record);
                diesel::insert_into($table::table)
                    .values(&row)
                    .on_conflict($table::id)
                    .do_update()
                    .set(&row)
                    .execute(&mut conn)
                    .await
                    .map(|_| ())
                    .map_err(map_diesel_error)
            }

            async fn find_by_id(
                &self,
                id: &uuid::Uuid,
            ) -> Result<Option<$record>, RecordRepositoryError> {
                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                let row = $table::table
                    .filter($table::id.eq(*id))
                    .select(<$row>::as_select())
                    .first::<$row>(&mut conn)
                    .await
                    .optional()
                    .map_err(map_diesel_error)?;
                row.map($from_row).transpose()
            }

            async fn list_for_tenant(
                &self,
                tenant_id: &TenantId,
            ) -> Result<Vec<$record>, RecordRepositoryError> {
                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                let rows: Vec<$row> = $table::table
                    .filter($table::tenant_id.eq(tenant_id.as_str()))
                    .order(($table::created_at.desc(), $table::id.desc()))
                    .select(<$row>::as_select())
                    .load(&mut conn)
                    .await
                    .map_err(map_diesel_error)?;
                rows.into_iter().map($from_row).collect()
            }

            async fn delete(&self, id: &uuid::Uuid) -> Result<bool, RecordRepositoryError> {
                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                let removed = diesel::delete($table::table.filter($table::id.eq(*id)))
                    .execute(&mut conn)
                    .await
                    .map_err(map_diesel_error)?;
                Ok(removed > 0)
            }
        }
    };
}

fn vehicle_to_row(vehicle: &Vehicle) -> VehicleRow {
    VehicleRow {
        id: vehicle.id,
        tenant_id: vehicle.tenant_id.as_str().to_owned(),
        make: vehicle.make.clone(),
        model: vehicle.model.clone(),
        year: vehicle.year,
        license_plate: vehicle.license_plate.clone(),
        vin: vehicle.vin.clone(),
        daily_rate: vehicle.daily_rate,
        mileage_limit: vehicle.mileage_limit,
        availability_status: vehicle.availability_status.as_str().to_owned(),
        created_at: vehicle.created_at,
        updated_at: vehicle.updated_at,
    }
}

fn row_to_vehicle(row: VehicleRow) -> Result<Vehicle, RecordRepositoryError> {
    Ok(Vehicle {
        id: row.id,
        tenant_id: TenantId::new(row.tenant_id).map_err(|err| corrupt("vehicle", err))?,
        make: row.make,
        model: row.model,
        year: row.year,
        license_plate: row.license_plate,
        vin: row.vin,
        daily_rate: row.daily_rate,
        mileage_limit: row.mileage_limit,
        availability_status: row
            .availability_status
            .parse()
            .map_err(|err| corrupt("vehicle", err))?,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn booking_to_row(booking: &Booking) -> BookingRow {
    BookingRow {
        id: booking.id,
        tenant_id: booking.tenant_id.as_str().to_owned(),
        vehicle_id: booking.vehicle_id,
        customer_name: booking.customer_name.clone(),
        customer_email: booking.customer_email.as_str().to_owned(),
        customer_phone: booking.customer_phone.clone(),
        start_date: booking.start_date,
        end_date: booking.end_date,
        status: booking.status.as_str().to_owned(),
        daily_rate: booking.daily_rate,
        total_price: booking.total_price,
        notes: booking.notes.clone(),
        created_at: booking.created_at,
        updated_at: booking.updated_at,
    }
}

fn row_to_booking(row: BookingRow) -> Result<Booking, RecordRepositoryError> {
    Ok(Booking {
        id: row.id,
        tenant_id: TenantId::new(row.tenant_id).map_err(|err| corrupt("booking", err))?,
        vehicle_id: row.vehicle_id,
        customer_name: row.customer_name,
        customer_email: ContactEmail::new(row.customer_email)
            .map_err(|err| corrupt("booking", err))?,
        customer_phone: row.customer_phone,
        start_date: row.start_date,
        end_date: row.end_date,
        status: row.status.parse().map_err(|err| corrupt("booking", err))?,
        daily_rate: row.daily_rate,
        total_price: row.total_price,
        notes: row.notes,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn invoice_to_row(invoice: &Invoice) -> InvoiceRow {
    InvoiceRow {
        id: invoice.id,
        tenant_id: invoice.tenant_id.as_str().to_owned(),
        booking_id: invoice.booking_id,
        invoice_number: invoice.invoice_number.clone(),
        customer_name: invoice.customer_name.clone(),
        customer_email: invoice.customer_email.as_str().to_owned(),
        amount: invoice.amount,
        tax_amount: invoice.tax_amount,
        discount_amount: invoice.discount_amount,
        total_amount: invoice.total_amount,
        description: invoice.description.clone(),
        issued_date: invoice.issued_date,
        due_date: invoice.due_date,
        status: invoice.status.as_str().to_owned(),
        payment_method: invoice.payment_method.clone(),
        paid_date: invoice.paid_date,
        notes: invoice.notes.clone(),
        created_at: invoice.created_at,
        updated_at: invoice.updated_at,
    }
}

fn row_to_invoice(row: InvoiceRow) -> Result<Invoice, RecordRepositoryError> {
    Ok(Invoice {
        id: row.id,
        tenant_id: TenantId::new(row.tenant_id).map_err(|err| corrupt("invoice", err))?,
        booking_id: row.booking_id,
        invoice_number: row.invoice_number,
        customer_name: row.customer_name,
        customer_email: ContactEmail::new(row.customer_email)
            .map_err(|err| corrupt("invoice", err))?,
        amount: row.amount,
        tax_amount: row.tax_amount,
        discount_amount: row.discount_amount,
        total_amount: row.total_amount,
        description: row.description,
        issued_date: row.issued_date,
        due_date: row.due_date,
        status: row.status.parse().map_err(|err| corrupt("invoice", err))?,
        payment_method: row.payment_method,
        paid_date: row.paid_date,
        notes: row.notes,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

record_repository! {
    /// Diesel implementation of the vehicle repository.
    DieselVehicleRepository for Vehicle {
        row: VehicleRow,
        table: vehicles,
        to_row: vehicle_to_row,
        from_row: row_to_vehicle,
    }
}

record_repository! {
    /// Diesel implementation of the booking repository.
    DieselBookingRepository for Booking {
        row: BookingRow,
        table: bookings,
        to_row: booking_to_row,
        from_row: row_to_booking,
    }
}

record_repository! {
    /// Diesel implementation of the invoice repository.
    DieselInvoiceRepository for Invoice {
        row: InvoiceRow,
        table: invoices,
        to_row: invoice_to_row,
        from_row: row_to_invoice,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{TenantRecord, VehicleDraft};
    use chrono::{TimeZone, Utc};

    #[test]
    fn vehicle_rows_round_trip_through_conversions() {
        let now = Utc
            .with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
            .single()
            .expect("timestamp");
        let vehicle = Vehicle::create(
            TenantId::new("tenant-a").expect("tenant"),
            VehicleDraft {
                make: "Tesla".to_owned(),
                model: "Model 3".to_owned(),
                license_plate: "EL 12 345".to_owned(),
                year: Some(2023),
                ..VehicleDraft::default()
            },
            now,
        )
        .expect("vehicle");

        let restored = row_to_vehicle(vehicle_to_row(&vehicle)).expect("restored");

        assert_eq!(restored, vehicle);
    }

    #[test]
    fn unknown_status_is_reported_as_query_error() {
        let now = Utc
            .with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
            .single()
            .expect("timestamp");
        let row = VehicleRow {
            id: uuid::Uuid::new_v4(),
            tenant_id: "tenant-a".to_owned(),
            make: "Tesla".to_owned(),
            model: "Model 3".to_owned(),
            year: None,
            license_plate: "EL12345".to_owned(),
            vin: None,
            daily_rate: None,
            mileage_limit: None,
            availability_status: "stolen".to_owned(),
            created_at: now,
            updated_at: now,
        };

        let error = row_to_vehicle(row).expect_err("invalid status");

        assert!(matches!(error, RecordRepositoryError::Query { .. }));
    }
}
