//! In-memory implementation of the storage gateway.
//!
//! Ordered maps keep listing in insertion order (ids are assigned
//! sequentially), and the payment cascade on patient delete is mirrored by
//! hand to match the postgres backend's `ON DELETE CASCADE`.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use portal_core::{Clock, Patient, PatientDraft, Payment, PaymentDraft, SystemClock};
use portal_storage::{PatientStore, StorageError};

#[derive(Debug, Default)]
struct State {
    patients: BTreeMap<i32, Patient>,
    payments: BTreeMap<i32, Payment>,
}

/// In-memory storage backend for tests and local development.
pub struct InMemoryStore {
    state: RwLock<State>,
    next_patient_id: AtomicI32,
    next_payment_id: AtomicI32,
    clock: Arc<dyn Clock>,
}

impl InMemoryStore {
    /// Creates an empty store stamping records with the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an empty store stamping records with the given clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: RwLock::new(State::default()),
            next_patient_id: AtomicI32::new(1),
            next_payment_id: AtomicI32::new(1),
            clock,
        }
    }

    /// Number of payment rows currently held, across all patients.
    pub async fn payment_count(&self) -> usize {
        self.state.read().await.payments.len()
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PatientStore for InMemoryStore {
    async fn list_patients(&self) -> Result<Vec<Patient>, StorageError> {
        let state = self.state.read().await;
        Ok(state.patients.values().cloned().collect())
    }

    async fn get_patient(&self, id: i32) -> Result<Option<Patient>, StorageError> {
        let state = self.state.read().await;
        Ok(state.patients.get(&id).cloned())
    }

    async fn create_patient(&self, draft: &PatientDraft) -> Result<Patient, StorageError> {
        let id = self.next_patient_id.fetch_add(1, Ordering::SeqCst);
        let patient = Patient {
            id,
            name: draft.name.clone(),
            date_of_birth: draft.date_of_birth,
            email: draft.email.clone(),
        };
        let mut state = self.state.write().await;
        state.patients.insert(id, patient.clone());
        Ok(patient)
    }

    async fn update_patient(&self, patient: &Patient) -> Result<Patient, StorageError> {
        let mut state = self.state.write().await;
        match state.patients.get_mut(&patient.id) {
            Some(existing) => {
                *existing = patient.clone();
                Ok(patient.clone())
            }
            None => Err(StorageError::not_found("patient", patient.id)),
        }
    }

    async fn delete_patient(&self, id: i32) -> Result<(), StorageError> {
        let mut state = self.state.write().await;
        if state.patients.remove(&id).is_some() {
            state.payments.retain(|_, payment| payment.patient_id != id);
        }
        Ok(())
    }

    async fn patient_exists(&self, id: i32) -> Result<bool, StorageError> {
        let state = self.state.read().await;
        Ok(state.patients.contains_key(&id))
    }

    async fn create_payment(&self, draft: &PaymentDraft) -> Result<Payment, StorageError> {
        let mut state = self.state.write().await;
        if !state.patients.contains_key(&draft.patient_id) {
            return Err(StorageError::foreign_key(format!(
                "payments.patient_id does not resolve: {}",
                draft.patient_id
            )));
        }
        let id = self.next_payment_id.fetch_add(1, Ordering::SeqCst);
        let payment = Payment {
            id,
            check_number: draft.check_number.clone(),
            amount: draft.amount.round_dp(2),
            status: draft.status,
            patient_id: draft.patient_id,
            created_date: self.clock.now(),
            updated_date: None,
        };
        state.payments.insert(id, payment.clone());
        Ok(payment)
    }

    async fn get_payment(&self, id: i32) -> Result<Option<Payment>, StorageError> {
        let state = self.state.read().await;
        Ok(state.payments.get(&id).cloned())
    }

    async fn list_payments_for_patient(
        &self,
        patient_id: i32,
    ) -> Result<Vec<Payment>, StorageError> {
        let state = self.state.read().await;
        Ok(state
            .payments
            .values()
            .filter(|payment| payment.patient_id == patient_id)
            .cloned()
            .collect())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portal_core::{FixedClock, PaymentStatus};
    use rust_decimal::Decimal;
    use time::macros::{date, datetime};

    fn draft(name: &str, email: &str) -> PatientDraft {
        PatientDraft::new(name, date!(1990 - 01 - 01), email)
    }

    fn payment_draft(patient_id: i32, check: &str) -> PaymentDraft {
        PaymentDraft {
            check_number: check.into(),
            amount: Decimal::new(10000, 2),
            status: PaymentStatus::ReadyForRelease,
            patient_id,
        }
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let store = InMemoryStore::new();
        let a = store.create_patient(&draft("A", "a@x.com")).await.unwrap();
        let b = store.create_patient(&draft("B", "b@x.com")).await.unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
    }

    #[tokio::test]
    async fn test_list_is_insertion_ordered() {
        let store = InMemoryStore::new();
        for i in 0..5 {
            store
                .create_patient(&draft(&format!("P{i}"), &format!("p{i}@x.com")))
                .await
                .unwrap();
        }
        let patients = store.list_patients().await.unwrap();
        let ids: Vec<i32> = patients.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let store = InMemoryStore::new();
        assert!(store.get_patient(99).await.unwrap().is_none());
        assert!(!store.patient_exists(99).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_overwrites_all_fields() {
        let store = InMemoryStore::new();
        let created = store.create_patient(&draft("Old", "old@x.com")).await.unwrap();

        let updated = Patient {
            id: created.id,
            name: "New".into(),
            date_of_birth: date!(1985 - 05 - 05),
            email: "new@x.com".into(),
        };
        store.update_patient(&updated).await.unwrap();

        let fetched = store.get_patient(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, updated);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let store = InMemoryStore::new();
        let ghost = Patient {
            id: 404,
            name: "Ghost".into(),
            date_of_birth: date!(1990 - 01 - 01),
            email: "ghost@x.com".into(),
        };
        let err = store.update_patient(&ghost).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_missing_is_noop() {
        let store = InMemoryStore::new();
        store.delete_patient(12345).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_cascades_to_payments() {
        let store = InMemoryStore::new();
        let keep = store.create_patient(&draft("Keep", "keep@x.com")).await.unwrap();
        let gone = store.create_patient(&draft("Gone", "gone@x.com")).await.unwrap();

        store.create_payment(&payment_draft(keep.id, "CHK1")).await.unwrap();
        let doomed = store.create_payment(&payment_draft(gone.id, "CHK2")).await.unwrap();
        store.create_payment(&payment_draft(gone.id, "CHK3")).await.unwrap();

        store.delete_patient(gone.id).await.unwrap();

        assert!(store.get_patient(gone.id).await.unwrap().is_none());
        assert!(store.get_payment(doomed.id).await.unwrap().is_none());
        assert!(store.list_payments_for_patient(gone.id).await.unwrap().is_empty());
        assert_eq!(store.payment_count().await, 1);
        assert_eq!(
            store.list_payments_for_patient(keep.id).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn test_payment_requires_live_patient() {
        let store = InMemoryStore::new();
        let err = store.create_payment(&payment_draft(7, "CHK9")).await.unwrap_err();
        assert!(err.is_foreign_key());
    }

    #[tokio::test]
    async fn test_payment_stamped_with_clock_and_rescaled() {
        let instant = datetime!(2024-06-01 09:30:00 UTC);
        let store = InMemoryStore::with_clock(Arc::new(FixedClock(instant)));
        let patient = store.create_patient(&draft("P", "p@x.com")).await.unwrap();

        let mut draft = payment_draft(patient.id, "CHK10");
        draft.amount = Decimal::new(100255, 3); // 100.255 -> 100.26
        let payment = store.create_payment(&draft).await.unwrap();

        assert_eq!(payment.created_date, instant);
        assert_eq!(payment.updated_date, None);
        assert_eq!(payment.amount.to_string(), "100.26");
    }
}
