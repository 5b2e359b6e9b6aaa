//! # portal-service
//!
//! The record service for the patient portal: validates input, applies the
//! domain invariants, translates between wire DTOs and storage entities,
//! and raises typed failures for the API layer to map onto status codes.
//!
//! The service is constructed over any [`portal_storage::PatientStore`]
//! backend and an explicit clock, and wrapped in [`Logged`] for structured
//! operation logging.

mod dto;
mod error;
mod observe;
mod service;

pub use dto::{PatientPayload, PatientView, PaymentPayload, PaymentView};
pub use error::{Result, ServiceError};
pub use observe::Logged;
pub use service::PatientService;
