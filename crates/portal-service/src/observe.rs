//! Observability wrapper around the record service.
//!
//! Logging stays out of the business operations; this decorator emits a
//! structured event naming the action and identifying key before and after
//! each call, then delegates.

use tracing::{debug, info, warn};

use crate::dto::{PatientPayload, PatientView, PaymentPayload, PaymentView};
use crate::error::Result;
use crate::service::PatientService;

/// [`PatientService`] with structured logging around every operation.
pub struct Logged {
    inner: PatientService,
}

impl Logged {
    pub fn new(inner: PatientService) -> Self {
        Self { inner }
    }

    /// The undecorated service.
    pub fn inner(&self) -> &PatientService {
        &self.inner
    }

    pub async fn list_patients(&self) -> Result<Vec<PatientView>> {
        debug!(action = "list_patients", "listing patients");
        let result = self.inner.list_patients().await;
        match &result {
            Ok(patients) => info!(action = "list_patients", count = patients.len(), "patients listed"),
            Err(err) => warn!(action = "list_patients", category = err.category(), error = %err, "listing patients failed"),
        }
        result
    }

    pub async fn get_patient(&self, id: i32) -> Result<Option<PatientView>> {
        debug!(action = "get_patient", patient.id = id, "retrieving patient");
        let result = self.inner.get_patient(id).await;
        match &result {
            Ok(Some(_)) => info!(action = "get_patient", patient.id = id, "patient retrieved"),
            Ok(None) => info!(action = "get_patient", patient.id = id, "patient absent"),
            Err(err) => warn!(action = "get_patient", patient.id = id, category = err.category(), error = %err, "retrieving patient failed"),
        }
        result
    }

    pub async fn create_patient(&self, payload: PatientPayload) -> Result<PatientView> {
        debug!(action = "create_patient", patient.email = %payload.email, "creating patient");
        let email = payload.email.clone();
        let result = self.inner.create_patient(payload).await;
        match &result {
            Ok(created) => info!(action = "create_patient", patient.id = created.id, "patient created"),
            Err(err) => warn!(action = "create_patient", patient.email = %email, category = err.category(), error = %err, "creating patient failed"),
        }
        result
    }

    pub async fn update_patient(&self, id: i32, payload: PatientPayload) -> Result<PatientView> {
        debug!(action = "update_patient", patient.id = id, "updating patient");
        let result = self.inner.update_patient(id, payload).await;
        match &result {
            Ok(_) => info!(action = "update_patient", patient.id = id, "patient updated"),
            Err(err) => warn!(action = "update_patient", patient.id = id, category = err.category(), error = %err, "updating patient failed"),
        }
        result
    }

    pub async fn delete_patient(&self, id: i32) -> Result<()> {
        debug!(action = "delete_patient", patient.id = id, "deleting patient");
        let result = self.inner.delete_patient(id).await;
        match &result {
            Ok(()) => info!(action = "delete_patient", patient.id = id, "patient deleted"),
            Err(err) => warn!(action = "delete_patient", patient.id = id, category = err.category(), error = %err, "deleting patient failed"),
        }
        result
    }

    pub async fn list_payments(&self, patient_id: i32) -> Result<Vec<PaymentView>> {
        debug!(action = "list_payments", patient.id = patient_id, "listing payments");
        let result = self.inner.list_payments(patient_id).await;
        match &result {
            Ok(payments) => info!(action = "list_payments", patient.id = patient_id, count = payments.len(), "payments listed"),
            Err(err) => warn!(action = "list_payments", patient.id = patient_id, category = err.category(), error = %err, "listing payments failed"),
        }
        result
    }

    pub async fn add_payment(&self, payload: PaymentPayload) -> Result<PaymentView> {
        let patient_id = payload.patient_id;
        debug!(action = "add_payment", patient.id = patient_id, "recording payment");
        let result = self.inner.add_payment(payload).await;
        match &result {
            Ok(created) => info!(action = "add_payment", payment.id = created.id, patient.id = patient_id, "payment recorded"),
            Err(err) => warn!(action = "add_payment", patient.id = patient_id, category = err.category(), error = %err, "recording payment failed"),
        }
        result
    }
}
