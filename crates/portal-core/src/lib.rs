//! Core domain types and validation rules for the patient portal.
//!
//! This crate holds the entities (patients, payments), the boundary
//! validation rules, age derivation, and the clock abstraction that keeps
//! the current time out of the validation logic itself.

pub mod clock;
pub mod error;
pub mod patient;
pub mod payment;
pub mod validation;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{CoreError, Result};
pub use patient::{Patient, PatientDraft, age_on};
pub use payment::{Payment, PaymentDraft, PaymentStatus};
pub use validation::{
    MAX_NAME_LEN, validate_date_of_birth, validate_email, validate_name, validate_patient_draft,
};
