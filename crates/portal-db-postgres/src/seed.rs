//! Demo data seeding.
//!
//! Inserts a fixed set of patients and payments when the corresponding
//! tables are empty. Each table is checked separately so re-running against
//! a partially seeded database completes the missing half.

use rust_decimal::Decimal;
use sqlx_core::query_scalar::query_scalar;
use sqlx_postgres::PgPool;
use time::{Date, Month};
use tracing::{info, instrument};

use portal_core::{PatientDraft, PaymentDraft, PaymentStatus};
use portal_storage::StorageError;

use crate::queries;

const DEMO_PATIENTS: &[(&str, (i32, u8, u8), &str)] = &[
    ("Salvador Dali", (1904, 5, 11), "melting.clocks@surreal.com"),
    ("Frida Kahlo", (1907, 7, 6), "self.portraits@mexico.art"),
    ("Vincent van Gogh", (1853, 3, 30), "starry.night@postimpressionist.com"),
    ("Benjamin Reichwald", (1994, 9, 4), "bladee.city@bladeeRadio.2real"),
    ("Andy Warhol", (1928, 8, 6), "campbell.soup@popart.com"),
    ("Marina Abramović", (1946, 11, 30), "rhythm.zero@performance.art"),
    ("Jean-Michel Basquiat", (1960, 12, 22), "neo.expressionist@nyc.com"),
    ("Tracey Emin", (1963, 7, 3), "unmade.bed@yba.com"),
    ("Damien Hirst", (1965, 6, 7), "shark.tank@yba.com"),
    ("Banksy", (1974, 7, 28), "anonymous@street.art"),
    ("Yayoi Kusama", (1929, 3, 22), "infinity.dots@polka.com"),
    ("Ai Weiwei", (1957, 8, 28), "sunflower.seeds@contemporary.com"),
    ("Cindy Sherman", (1954, 1, 19), "untitled.film@stills.com"),
    ("Jeff Koons", (1955, 1, 21), "balloon.dog@kitsch.com"),
    ("Kara Walker", (1969, 11, 26), "silhouettes@history.com"),
    ("Maurizio Cattelan", (1960, 9, 21), "banana.tape@contemporary.com"),
    ("Olafur Eliasson", (1967, 2, 5), "weather.project@tate.org"),
    ("Anish Kapoor", (1954, 3, 12), "void@sculpture.com"),
    ("Jenny Holzer", (1950, 7, 29), "truisms@led.com"),
    ("Chris Ofili", (1968, 10, 10), "elephant.dung@painting.com"),
];

/// (check number, amount in cents, status, index into the demo patients).
const DEMO_PAYMENTS: &[(&str, i64, PaymentStatus, usize)] = &[
    ("CHK1001", 100_00, PaymentStatus::ReadyForRelease, 0),
    ("CHK1002", 150_50, PaymentStatus::Released, 1),
    ("CHK1003", 200_75, PaymentStatus::DeterminingPath, 2),
    ("CHK1004", 250_00, PaymentStatus::OutForPayment, 3),
    ("CHK1005", 300_25, PaymentStatus::Shipped, 4),
    ("CHK1006", 75_10, PaymentStatus::Cashed, 5),
    ("CHK1007", 500_00, PaymentStatus::Escheatment, 6),
    ("CHK1008", 425_75, PaymentStatus::Released, 7),
    ("CHK1009", 80_00, PaymentStatus::OutForPayment, 8),
    ("CHK1010", 999_99, PaymentStatus::ReadyForRelease, 9),
];

fn demo_date((year, month, day): (i32, u8, u8)) -> Date {
    let month = Month::try_from(month).unwrap_or(Month::January);
    Date::from_calendar_date(year, month, day).unwrap_or(Date::MIN)
}

async fn count(pool: &PgPool, table: &str) -> Result<i64, StorageError> {
    // Table names come from the two literals below, never from input.
    query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .map_err(|e| StorageError::internal(format!("Failed to count {table}: {e}")))
}

/// Seeds the demo data set into empty tables.
#[instrument(skip(pool))]
pub async fn run(pool: &PgPool) -> Result<(), StorageError> {
    let mut patient_ids = Vec::with_capacity(DEMO_PATIENTS.len());

    if count(pool, "patients").await? == 0 {
        for (name, dob, email) in DEMO_PATIENTS {
            let draft = PatientDraft::new(*name, demo_date(*dob), *email);
            let created = queries::create_patient(pool, &draft).await?;
            patient_ids.push(created.id);
        }
        info!(count = patient_ids.len(), "Seeded demo patients");
    } else {
        let existing = queries::list_patients(pool).await?;
        patient_ids.extend(existing.iter().map(|p| p.id));
    }

    if count(pool, "payments").await? == 0 && patient_ids.len() >= 10 {
        for (check_number, cents, status, patient_index) in DEMO_PAYMENTS {
            let draft = PaymentDraft {
                check_number: (*check_number).into(),
                amount: Decimal::new(*cents, 2),
                status: *status,
                patient_id: patient_ids[*patient_index],
            };
            queries::create_payment(pool, &draft).await?;
        }
        info!(count = DEMO_PAYMENTS.len(), "Seeded demo payments");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_demo_data_shape() {
        assert_eq!(DEMO_PATIENTS.len(), 20);
        assert_eq!(DEMO_PAYMENTS.len(), 10);
        for (_, _, _, index) in DEMO_PAYMENTS {
            assert!(*index < 10);
        }
    }

    #[test]
    fn test_demo_dates_resolve() {
        assert_eq!(demo_date((1904, 5, 11)), date!(1904 - 05 - 11));
        for (_, dob, _) in DEMO_PATIENTS {
            assert_ne!(demo_date(*dob), Date::MIN);
        }
    }

    #[test]
    fn test_demo_drafts_pass_validation() {
        let today = date!(2024 - 06 - 01);
        for (name, dob, email) in DEMO_PATIENTS {
            let draft = PatientDraft::new(*name, demo_date(*dob), *email);
            portal_core::validate_patient_draft(&draft, today).unwrap();
        }
    }
}
