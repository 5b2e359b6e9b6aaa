//! CRUD query implementations for patients and payments.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx_core::query::query;
use sqlx_core::query_as::query_as;
use sqlx_core::query_scalar::query_scalar;
use sqlx_postgres::PgPool;
use time::{Date, OffsetDateTime};

use portal_core::{Patient, PatientDraft, Payment, PaymentDraft, PaymentStatus};
use portal_storage::StorageError;

use crate::error::is_foreign_key_violation;

/// Converts a chrono DateTime to a time OffsetDateTime.
fn chrono_to_time(dt: DateTime<Utc>) -> OffsetDateTime {
    OffsetDateTime::from_unix_timestamp(dt.timestamp()).unwrap_or(OffsetDateTime::UNIX_EPOCH)
        + time::Duration::nanoseconds(i64::from(dt.timestamp_subsec_nanos()))
}

/// Converts a chrono NaiveDate to a time Date.
fn chrono_date_to_time(date: NaiveDate) -> Date {
    Date::from_ordinal_date(date.year(), date.ordinal() as u16).unwrap_or(Date::MIN)
}

/// Converts a time Date to a chrono NaiveDate for binding.
fn time_date_to_chrono(date: Date) -> NaiveDate {
    NaiveDate::from_ymd_opt(
        date.year(),
        u32::from(u8::from(date.month())),
        u32::from(date.day()),
    )
    .unwrap_or_default()
}

type PatientRow = (i32, String, NaiveDate, String);
type PaymentRow = (
    i32,
    String,
    Decimal,
    String,
    i32,
    DateTime<Utc>,
    Option<DateTime<Utc>>,
);

fn patient_from_row(row: PatientRow) -> Patient {
    Patient {
        id: row.0,
        name: row.1,
        date_of_birth: chrono_date_to_time(row.2),
        email: row.3,
    }
}

fn payment_from_row(row: PaymentRow) -> Result<Payment, StorageError> {
    let status: PaymentStatus = row
        .3
        .parse()
        .map_err(|e| StorageError::internal(format!("Stored payment status is invalid: {e}")))?;
    Ok(Payment {
        id: row.0,
        check_number: row.1,
        amount: row.2,
        status,
        patient_id: row.4,
        created_date: chrono_to_time(row.5),
        updated_date: row.6.map(chrono_to_time),
    })
}

/// Lists all patients in insertion order.
pub async fn list_patients(pool: &PgPool) -> Result<Vec<Patient>, StorageError> {
    let rows: Vec<PatientRow> =
        query_as("SELECT id, name, date_of_birth, email FROM patients ORDER BY id")
            .fetch_all(pool)
            .await
            .map_err(|e| StorageError::internal(format!("Failed to list patients: {e}")))?;

    Ok(rows.into_iter().map(patient_from_row).collect())
}

/// Reads a patient by id. Returns `None` when the row does not exist.
pub async fn get_patient(pool: &PgPool, id: i32) -> Result<Option<Patient>, StorageError> {
    let row: Option<PatientRow> =
        query_as("SELECT id, name, date_of_birth, email FROM patients WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| StorageError::internal(format!("Failed to read patient: {e}")))?;

    Ok(row.map(patient_from_row))
}

/// Inserts a new patient and returns the fully populated record.
pub async fn create_patient(
    pool: &PgPool,
    draft: &PatientDraft,
) -> Result<Patient, StorageError> {
    let row: PatientRow = query_as(
        r#"INSERT INTO patients (name, date_of_birth, email)
           VALUES ($1, $2, $3)
           RETURNING id, name, date_of_birth, email"#,
    )
    .bind(&draft.name)
    .bind(time_date_to_chrono(draft.date_of_birth))
    .bind(&draft.email)
    .fetch_one(pool)
    .await
    .map_err(|e| StorageError::internal(format!("Failed to create patient: {e}")))?;

    Ok(patient_from_row(row))
}

/// Overwrites all mutable fields of an existing patient.
///
/// Returns `StorageError::NotFound` when the row does not exist.
pub async fn update_patient(pool: &PgPool, patient: &Patient) -> Result<Patient, StorageError> {
    let row: Option<PatientRow> = query_as(
        r#"UPDATE patients
           SET name = $1, date_of_birth = $2, email = $3
           WHERE id = $4
           RETURNING id, name, date_of_birth, email"#,
    )
    .bind(&patient.name)
    .bind(time_date_to_chrono(patient.date_of_birth))
    .bind(&patient.email)
    .bind(patient.id)
    .fetch_optional(pool)
    .await
    .map_err(|e| StorageError::internal(format!("Failed to update patient: {e}")))?;

    match row {
        Some(row) => Ok(patient_from_row(row)),
        None => Err(StorageError::not_found("patient", patient.id)),
    }
}

/// Deletes a patient; the schema cascade removes its payments.
///
/// A no-op when the id does not exist.
pub async fn delete_patient(pool: &PgPool, id: i32) -> Result<(), StorageError> {
    query("DELETE FROM patients WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| StorageError::internal(format!("Failed to delete patient: {e}")))?;

    Ok(())
}

/// Existence predicate without a full fetch.
pub async fn patient_exists(pool: &PgPool, id: i32) -> Result<bool, StorageError> {
    let exists: bool = query_scalar("SELECT EXISTS (SELECT 1 FROM patients WHERE id = $1)")
        .bind(id)
        .fetch_one(pool)
        .await
        .map_err(|e| StorageError::internal(format!("Failed to check patient existence: {e}")))?;

    Ok(exists)
}

/// Inserts a new payment for an existing patient.
///
/// Returns `StorageError::ForeignKey` when `patient_id` does not resolve.
pub async fn create_payment(
    pool: &PgPool,
    draft: &PaymentDraft,
) -> Result<Payment, StorageError> {
    let row: PaymentRow = query_as(
        r#"INSERT INTO payments (check_number, amount, status, patient_id, created_date)
           VALUES ($1, $2, $3, $4, $5)
           RETURNING id, check_number, amount, status, patient_id, created_date, updated_date"#,
    )
    .bind(&draft.check_number)
    .bind(draft.amount.round_dp(2))
    .bind(draft.status.as_str())
    .bind(draft.patient_id)
    .bind(Utc::now())
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if is_foreign_key_violation(&e) {
            StorageError::foreign_key(format!(
                "payments.patient_id does not resolve: {}",
                draft.patient_id
            ))
        } else {
            StorageError::internal(format!("Failed to create payment: {e}"))
        }
    })?;

    payment_from_row(row)
}

/// Reads a payment by id. Returns `None` when the row does not exist.
pub async fn get_payment(pool: &PgPool, id: i32) -> Result<Option<Payment>, StorageError> {
    let row: Option<PaymentRow> = query_as(
        r#"SELECT id, check_number, amount, status, patient_id, created_date, updated_date
           FROM payments
           WHERE id = $1"#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(|e| StorageError::internal(format!("Failed to read payment: {e}")))?;

    row.map(payment_from_row).transpose()
}

/// Lists the payments owned by one patient, ascending id.
pub async fn list_payments_for_patient(
    pool: &PgPool,
    patient_id: i32,
) -> Result<Vec<Payment>, StorageError> {
    let rows: Vec<PaymentRow> = query_as(
        r#"SELECT id, check_number, amount, status, patient_id, created_date, updated_date
           FROM payments
           WHERE patient_id = $1
           ORDER BY id"#,
    )
    .bind(patient_id)
    .fetch_all(pool)
    .await
    .map_err(|e| StorageError::internal(format!("Failed to list payments: {e}")))?;

    rows.into_iter().map(payment_from_row).collect()
}
