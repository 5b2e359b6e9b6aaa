//! Storage traits for the patient-portal persistence layer.
//!
//! This module defines the contract that all storage backends must implement.

use async_trait::async_trait;

use portal_core::{Patient, PatientDraft, Payment, PaymentDraft};

use crate::error::StorageError;

/// The storage gateway trait for patients and their payments.
///
/// Implementations must be thread-safe (`Send + Sync`). Absent records are
/// signalled with `None`, never with an error; errors are reserved for
/// infrastructure failures and contract violations.
///
/// # Example
///
/// ```ignore
/// use portal_storage::{PatientStore, StorageError};
///
/// async fn require_patient(store: &dyn PatientStore, id: i32) -> Result<Patient, StorageError> {
///     store
///         .get_patient(id)
///         .await?
///         .ok_or_else(|| StorageError::not_found("patient", id))
/// }
/// ```
#[async_trait]
pub trait PatientStore: Send + Sync {
    // ==================== Patients ====================

    /// Lists all patients in insertion order (ascending id).
    async fn list_patients(&self) -> Result<Vec<Patient>, StorageError>;

    /// Reads a patient by id.
    ///
    /// Returns `None` if no such patient exists.
    async fn get_patient(&self, id: i32) -> Result<Option<Patient>, StorageError>;

    /// Creates a new patient, assigning a fresh unique id.
    ///
    /// Returns the fully populated record.
    async fn create_patient(&self, draft: &PatientDraft) -> Result<Patient, StorageError>;

    /// Overwrites all mutable fields of an existing patient.
    ///
    /// Callers check existence first; if the row vanished in between,
    /// `StorageError::NotFound` is returned. The write is atomic from the
    /// caller's perspective - no partial field updates.
    async fn update_patient(&self, patient: &Patient) -> Result<Patient, StorageError>;

    /// Deletes a patient and, via cascade, all of its payments.
    ///
    /// A no-op (not an error) when the id does not exist.
    async fn delete_patient(&self, id: i32) -> Result<(), StorageError>;

    /// Pure existence predicate, used to short-circuit update/delete paths
    /// without a full fetch.
    async fn patient_exists(&self, id: i32) -> Result<bool, StorageError>;

    // ==================== Payments ====================

    /// Creates a new payment referencing an existing patient.
    ///
    /// Returns `StorageError::ForeignKey` when `patient_id` does not resolve.
    async fn create_payment(&self, draft: &PaymentDraft) -> Result<Payment, StorageError>;

    /// Reads a payment by id.
    ///
    /// Returns `None` if no such payment exists.
    async fn get_payment(&self, id: i32) -> Result<Option<Payment>, StorageError>;

    /// Lists the payments owned by one patient, ascending id.
    ///
    /// Returns an empty list both for a patient without payments and for an
    /// unknown patient id; callers that care about the distinction check
    /// `patient_exists` first.
    async fn list_payments_for_patient(&self, patient_id: i32)
    -> Result<Vec<Payment>, StorageError>;

    // ==================== Metadata ====================

    /// Returns the name of this storage backend for logging/debugging.
    fn backend_name(&self) -> &'static str;
}

// Ensure the trait stays object-safe; the service holds it as a trait object.
#[cfg(test)]
mod tests {
    use super::*;

    fn _assert_store_object_safe(_: &dyn PatientStore) {}
}
