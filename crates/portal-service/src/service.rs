//! The record service: business rules between the API layer and storage.

use std::sync::Arc;

use portal_core::{Clock, CoreError, Patient, SystemClock, validate_patient_draft};
use portal_storage::{DynStore, StorageError};

use crate::dto::{PatientPayload, PatientView, PaymentPayload, PaymentView};
use crate::error::{Result, ServiceError};

/// Validation and lifecycle rules for patients and their payments.
///
/// Holds the storage gateway as a trait object and a [`Clock`] supplying the
/// current moment to validation, so tests can pin time. The service itself
/// carries no logging; wrap it in [`crate::Logged`] for observability.
pub struct PatientService {
    store: DynStore,
    clock: Arc<dyn Clock>,
}

impl PatientService {
    /// Creates a service over `store` using the system clock.
    pub fn new(store: DynStore) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    /// Creates a service over `store` with an explicit clock.
    pub fn with_clock(store: DynStore, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// All patients in insertion order, each with its derived age.
    pub async fn list_patients(&self) -> Result<Vec<PatientView>> {
        let today = self.clock.today();
        let patients = self.store.list_patients().await?;
        Ok(patients
            .iter()
            .map(|patient| PatientView::from_patient(patient, today))
            .collect())
    }

    /// The matching patient, or `None` when the id does not exist.
    pub async fn get_patient(&self, id: i32) -> Result<Option<PatientView>> {
        let today = self.clock.today();
        let patient = self.store.get_patient(id).await?;
        Ok(patient.map(|p| PatientView::from_patient(&p, today)))
    }

    /// Validates and persists a new patient, returning it with its assigned id.
    pub async fn create_patient(&self, payload: PatientPayload) -> Result<PatientView> {
        let today = self.clock.today();
        let draft = payload.into_draft();
        validate_patient_draft(&draft, today)?;

        let created = self.store.create_patient(&draft).await?;
        Ok(PatientView::from_patient(&created, today))
    }

    /// Overwrites all mutable fields of an existing patient.
    pub async fn update_patient(&self, id: i32, payload: PatientPayload) -> Result<PatientView> {
        let today = self.clock.today();
        if self.store.get_patient(id).await?.is_none() {
            return Err(ServiceError::not_found("patient", id));
        }

        let draft = payload.into_draft();
        validate_patient_draft(&draft, today)?;

        let patient = Patient {
            id,
            name: draft.name,
            date_of_birth: draft.date_of_birth,
            email: draft.email,
        };
        let updated = self.store.update_patient(&patient).await?;
        Ok(PatientView::from_patient(&updated, today))
    }

    /// Removes a patient and, via storage cascade, all of its payments.
    pub async fn delete_patient(&self, id: i32) -> Result<()> {
        if !self.store.patient_exists(id).await? {
            return Err(ServiceError::not_found("patient", id));
        }
        self.store.delete_patient(id).await?;
        Ok(())
    }

    /// The payments owned by one patient. Storage pass-through apart from
    /// the existence check on the owning patient.
    pub async fn list_payments(&self, patient_id: i32) -> Result<Vec<PaymentView>> {
        if !self.store.patient_exists(patient_id).await? {
            return Err(ServiceError::not_found("patient", patient_id));
        }
        let payments = self.store.list_payments_for_patient(patient_id).await?;
        Ok(payments.into_iter().map(PaymentView::from).collect())
    }

    /// Records a payment against an existing patient. Storage pass-through
    /// apart from the check-number presence rule and the foreign key.
    pub async fn add_payment(&self, payload: PaymentPayload) -> Result<PaymentView> {
        if payload.check_number.trim().is_empty() {
            return Err(CoreError::EmptyCheckNumber.into());
        }
        let patient_id = payload.patient_id;
        if !self.store.patient_exists(patient_id).await? {
            return Err(ServiceError::not_found("patient", patient_id));
        }

        let created = self.store.create_payment(&payload.into_draft()).await;
        match created {
            Ok(payment) => Ok(PaymentView::from(payment)),
            // The patient can vanish between the existence check and the
            // insert; surface the violated reference the same way.
            Err(StorageError::ForeignKey { .. }) => {
                Err(ServiceError::not_found("patient", patient_id))
            }
            Err(other) => Err(other.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portal_core::{FixedClock, PaymentStatus};
    use portal_db_memory::InMemoryStore;
    use portal_storage::PatientStore;
    use rust_decimal::Decimal;
    use time::macros::{date, datetime};

    fn service() -> PatientService {
        let store = Arc::new(InMemoryStore::new());
        let clock = Arc::new(FixedClock(datetime!(2024-06-01 12:00:00 UTC)));
        PatientService::with_clock(store, clock)
    }

    fn payload(name: &str, email: &str) -> PatientPayload {
        PatientPayload {
            name: name.into(),
            date_of_birth: date!(1990 - 01 - 01),
            email: email.into(),
        }
    }

    fn payment_payload(patient_id: i32) -> PaymentPayload {
        PaymentPayload {
            check_number: "CHK1001".into(),
            amount: Decimal::new(10000, 2),
            status: PaymentStatus::ReadyForRelease,
            patient_id,
        }
    }

    #[tokio::test]
    async fn test_create_then_get_round_trip() {
        let svc = service();
        let created = svc
            .create_patient(payload("John Doe", "john@test.com"))
            .await
            .unwrap();
        assert!(created.id > 0);

        let fetched = svc.get_patient(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.name, "John Doe");
        assert_eq!(fetched.email, "john@test.com");
    }

    #[tokio::test]
    async fn test_create_rejects_future_date_of_birth() {
        let svc = service();
        // Clock is pinned to 2024-06-01; one day later must fail.
        let mut p = payload("Test Patient", "test@example.com");
        p.date_of_birth = date!(2024 - 06 - 02);

        let err = svc.create_patient(p).await.unwrap_err();
        match err {
            ServiceError::Validation { message } => {
                assert!(message.contains("Date of birth cannot be in the future"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_rejects_bad_name_and_email() {
        let svc = service();

        let mut blank = payload("", "ok@example.com");
        blank.name = "".into();
        assert!(matches!(
            svc.create_patient(blank).await,
            Err(ServiceError::Validation { .. })
        ));

        let long = payload(&"x".repeat(101), "ok@example.com");
        assert!(matches!(
            svc.create_patient(long).await,
            Err(ServiceError::Validation { .. })
        ));

        let bad_email = payload("Fine Name", "not-an-address");
        assert!(matches!(
            svc.create_patient(bad_email).await,
            Err(ServiceError::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found_even_with_valid_payload() {
        let svc = service();
        let err = svc
            .update_patient(404, payload("Valid", "valid@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::NotFound {
                entity: "patient",
                id: 404
            }
        ));
    }

    #[tokio::test]
    async fn test_update_overwrites_and_revalidates() {
        let svc = service();
        let created = svc
            .create_patient(payload("Before", "before@example.com"))
            .await
            .unwrap();

        let mut next = payload("After", "after@example.com");
        next.date_of_birth = date!(1985 - 03 - 15);
        let updated = svc.update_patient(created.id, next).await.unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "After");
        assert_eq!(updated.date_of_birth, date!(1985 - 03 - 15));

        // Date rule applies on update too.
        let mut future = payload("After", "after@example.com");
        future.date_of_birth = date!(2030 - 01 - 01);
        assert!(matches!(
            svc.update_patient(created.id, future).await,
            Err(ServiceError::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let svc = service();
        assert!(matches!(
            svc.delete_patient(77).await,
            Err(ServiceError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_removes_patient_and_payments() {
        let store = Arc::new(InMemoryStore::new());
        let clock = Arc::new(FixedClock(datetime!(2024-06-01 12:00:00 UTC)));
        let svc = PatientService::with_clock(store.clone(), clock);

        let patient = svc
            .create_patient(payload("Doomed", "doomed@example.com"))
            .await
            .unwrap();
        let payment = svc.add_payment(payment_payload(patient.id)).await.unwrap();

        svc.delete_patient(patient.id).await.unwrap();

        assert!(svc.get_patient(patient.id).await.unwrap().is_none());
        assert!(store.get_payment(payment.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_age_derivation_on_views() {
        let store = Arc::new(InMemoryStore::new());

        let birthday_passed = PatientService::with_clock(
            store.clone(),
            Arc::new(FixedClock(datetime!(2024-01-01 00:00:00 UTC))),
        );
        let created = birthday_passed
            .create_patient(payload("Aged", "aged@example.com"))
            .await
            .unwrap();
        assert_eq!(created.age, 34);

        let birthday_pending = PatientService::with_clock(
            store,
            Arc::new(FixedClock(datetime!(2023-12-31 00:00:00 UTC))),
        );
        let fetched = birthday_pending
            .get_patient(created.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.age, 33);
    }

    #[tokio::test]
    async fn test_list_returns_all_created_patients() {
        let svc = service();
        let mut ids = Vec::new();
        for i in 0..4 {
            let created = svc
                .create_patient(payload(&format!("P{i}"), &format!("p{i}@example.com")))
                .await
                .unwrap();
            ids.push(created.id);
        }

        let listed = svc.list_patients().await.unwrap();
        assert_eq!(listed.len(), 4);
        assert_eq!(listed.iter().map(|p| p.id).collect::<Vec<_>>(), ids);

        for id in ids {
            assert!(svc.get_patient(id).await.unwrap().is_some());
        }
    }

    #[tokio::test]
    async fn test_payments_for_unknown_patient_are_not_found() {
        let svc = service();
        assert!(matches!(
            svc.list_payments(5).await,
            Err(ServiceError::NotFound { .. })
        ));
        assert!(matches!(
            svc.add_payment(payment_payload(5)).await,
            Err(ServiceError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_payment_pass_through() {
        let svc = service();
        let patient = svc
            .create_patient(payload("Payee", "payee@example.com"))
            .await
            .unwrap();

        let created = svc.add_payment(payment_payload(patient.id)).await.unwrap();
        assert_eq!(created.status, PaymentStatus::ReadyForRelease);
        assert_eq!(created.amount.to_string(), "100.00");
        assert!(created.updated_date.is_none());

        let listed = svc.list_payments(patient.id).await.unwrap();
        assert_eq!(listed, vec![created]);
    }

    #[tokio::test]
    async fn test_payment_rejects_blank_check_number() {
        let svc = service();
        let patient = svc
            .create_patient(payload("Payee", "payee@example.com"))
            .await
            .unwrap();

        let mut p = payment_payload(patient.id);
        p.check_number = "  ".into();
        assert!(matches!(
            svc.add_payment(p).await,
            Err(ServiceError::Validation { .. })
        ));
    }
}
