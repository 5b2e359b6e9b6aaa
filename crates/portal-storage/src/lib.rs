//! # portal-storage
//!
//! Storage abstraction layer for the patient portal.
//!
//! This crate defines the [`PatientStore`] trait and error types that all
//! storage backends implement. It contains no implementations - those live
//! in `portal-db-postgres` and `portal-db-memory`.

mod error;
mod traits;

pub use error::{ErrorCategory, StorageError};
pub use traits::PatientStore;

/// Type alias for a storage result.
pub type StorageResult<T> = Result<T, StorageError>;

/// Type alias for a shared storage trait object.
pub type DynStore = std::sync::Arc<dyn PatientStore>;
