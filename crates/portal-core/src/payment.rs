//! Payment entity and lifecycle status labels.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::CoreError;

/// Lifecycle status of a payment check.
///
/// The set is closed; unknown labels are rejected at the boundary. No
/// transition order is enforced between the states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentStatus {
    #[serde(rename = "Ready for Release")]
    ReadyForRelease,
    #[serde(rename = "Out for Payment")]
    OutForPayment,
    #[serde(rename = "Shipped")]
    Shipped,
    #[serde(rename = "Cashed")]
    Cashed,
    #[serde(rename = "Released")]
    Released,
    #[serde(rename = "Determining Path")]
    DeterminingPath,
    #[serde(rename = "Escheatment")]
    Escheatment,
}

impl PaymentStatus {
    /// The wire/storage label for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ReadyForRelease => "Ready for Release",
            Self::OutForPayment => "Out for Payment",
            Self::Shipped => "Shipped",
            Self::Cashed => "Cashed",
            Self::Released => "Released",
            Self::DeterminingPath => "Determining Path",
            Self::Escheatment => "Escheatment",
        }
    }

    /// All statuses, in no particular lifecycle order.
    pub fn all() -> &'static [PaymentStatus] {
        &[
            Self::ReadyForRelease,
            Self::OutForPayment,
            Self::Shipped,
            Self::Cashed,
            Self::Released,
            Self::DeterminingPath,
            Self::Escheatment,
        ]
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| CoreError::unknown_status(s))
    }
}

/// A payment record as held by storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    /// Storage-assigned identifier.
    pub id: i32,
    pub check_number: String,
    /// Currency amount, two fractional digits.
    pub amount: Decimal,
    pub status: PaymentStatus,
    /// Must reference a live patient at all times.
    pub patient_id: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_date: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub updated_date: Option<OffsetDateTime>,
}

/// Payment fields supplied by a caller before storage assigns id and timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentDraft {
    pub check_number: String,
    pub amount: Decimal,
    pub status: PaymentStatus,
    pub patient_id: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_labels_round_trip() {
        for status in PaymentStatus::all() {
            let parsed: PaymentStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, *status);
        }
    }

    #[test]
    fn test_status_rejects_unknown_label() {
        let err = "Lost in Mail".parse::<PaymentStatus>().unwrap_err();
        assert!(matches!(err, CoreError::UnknownStatus(_)));
    }

    #[test]
    fn test_status_serde_uses_display_labels() {
        let json = serde_json::to_string(&PaymentStatus::ReadyForRelease).unwrap();
        assert_eq!(json, "\"Ready for Release\"");

        let status: PaymentStatus = serde_json::from_str("\"Determining Path\"").unwrap();
        assert_eq!(status, PaymentStatus::DeterminingPath);
    }

    #[test]
    fn test_status_serde_rejects_unknown_label() {
        assert!(serde_json::from_str::<PaymentStatus>("\"Pending\"").is_err());
    }

    #[test]
    fn test_amount_keeps_two_fraction_digits() {
        let amount = Decimal::new(15050, 2); // 150.50
        assert_eq!(amount.to_string(), "150.50");
        assert_eq!(amount.scale(), 2);
    }
}
