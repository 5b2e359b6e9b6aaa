//! Wire DTOs exchanged with the API layer.
//!
//! All fields use camelCase on the wire. Views carry derived data (age);
//! payloads carry only the caller-mutable fields.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use portal_core::{Patient, PatientDraft, Payment, PaymentDraft, PaymentStatus, age_on};

/// Inbound patient fields for create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientPayload {
    pub name: String,
    pub date_of_birth: Date,
    pub email: String,
}

impl PatientPayload {
    pub fn into_draft(self) -> PatientDraft {
        PatientDraft {
            name: self.name,
            date_of_birth: self.date_of_birth,
            email: self.email,
        }
    }
}

/// Outbound patient representation, including the derived age.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientView {
    pub id: i32,
    pub name: String,
    pub date_of_birth: Date,
    pub email: String,
    pub age: i32,
}

impl PatientView {
    /// Builds a view from a stored patient, deriving `age` as of `today`.
    pub fn from_patient(patient: &Patient, today: Date) -> Self {
        Self {
            id: patient.id,
            name: patient.name.clone(),
            date_of_birth: patient.date_of_birth,
            email: patient.email.clone(),
            age: age_on(patient.date_of_birth, today),
        }
    }
}

/// Inbound payment fields for create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPayload {
    pub check_number: String,
    pub amount: Decimal,
    pub status: PaymentStatus,
    pub patient_id: i32,
}

impl PaymentPayload {
    pub fn into_draft(self) -> PaymentDraft {
        PaymentDraft {
            check_number: self.check_number,
            amount: self.amount,
            status: self.status,
            patient_id: self.patient_id,
        }
    }
}

/// Outbound payment representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentView {
    pub id: i32,
    pub check_number: String,
    pub amount: Decimal,
    pub status: PaymentStatus,
    pub patient_id: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_date: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub updated_date: Option<OffsetDateTime>,
}

impl From<Payment> for PaymentView {
    fn from(payment: Payment) -> Self {
        Self {
            id: payment.id,
            check_number: payment.check_number,
            amount: payment.amount,
            status: payment.status,
            patient_id: payment.patient_id,
            created_date: payment.created_date,
            updated_date: payment.updated_date,
        }
    }
}
