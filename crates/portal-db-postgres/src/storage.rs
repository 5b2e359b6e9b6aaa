//! PostgreSQL implementation of the storage gateway.

use async_trait::async_trait;
use sqlx_postgres::PgPool;

use portal_core::{Patient, PatientDraft, Payment, PaymentDraft};
use portal_storage::{PatientStore, StorageError};

use crate::config::PostgresConfig;
use crate::migrations;
use crate::pool;
use crate::queries;
use crate::seed;

/// PostgreSQL storage backend for patients and payments.
///
/// Referential integrity is enforced by the schema: payments carry a
/// required foreign key to patients with `ON DELETE CASCADE`.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a new `PostgresStore` from the given configuration.
    ///
    /// Creates the connection pool, runs migrations (if configured), and
    /// seeds the demo data set (if configured and the tables are empty).
    ///
    /// # Errors
    ///
    /// Returns an error if the pool cannot be created or migrations fail.
    pub async fn new(config: &PostgresConfig) -> Result<Self, StorageError> {
        let pool = pool::create_pool(config).await?;

        if config.run_migrations {
            migrations::run(&pool).await?;
        }
        if config.seed_demo_data {
            seed::run(&pool).await?;
        }

        Ok(Self { pool })
    }

    /// Creates a new `PostgresStore` from an existing connection pool.
    ///
    /// Migrations and seeding are not run when using this constructor.
    #[must_use]
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl PatientStore for PostgresStore {
    async fn list_patients(&self) -> Result<Vec<Patient>, StorageError> {
        queries::list_patients(&self.pool).await
    }

    async fn get_patient(&self, id: i32) -> Result<Option<Patient>, StorageError> {
        queries::get_patient(&self.pool, id).await
    }

    async fn create_patient(&self, draft: &PatientDraft) -> Result<Patient, StorageError> {
        queries::create_patient(&self.pool, draft).await
    }

    async fn update_patient(&self, patient: &Patient) -> Result<Patient, StorageError> {
        queries::update_patient(&self.pool, patient).await
    }

    async fn delete_patient(&self, id: i32) -> Result<(), StorageError> {
        queries::delete_patient(&self.pool, id).await
    }

    async fn patient_exists(&self, id: i32) -> Result<bool, StorageError> {
        queries::patient_exists(&self.pool, id).await
    }

    async fn create_payment(&self, draft: &PaymentDraft) -> Result<Payment, StorageError> {
        queries::create_payment(&self.pool, draft).await
    }

    async fn get_payment(&self, id: i32) -> Result<Option<Payment>, StorageError> {
        queries::get_payment(&self.pool, id).await
    }

    async fn list_payments_for_patient(
        &self,
        patient_id: i32,
    ) -> Result<Vec<Payment>, StorageError> {
        queries::list_payments_for_patient(&self.pool, patient_id).await
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
