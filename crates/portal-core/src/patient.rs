//! Patient entity and age derivation.

use serde::{Deserialize, Serialize};
use time::Date;

/// A patient record as held by storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    /// Storage-assigned identifier, immutable after creation.
    pub id: i32,
    pub name: String,
    pub date_of_birth: Date,
    pub email: String,
}

/// Patient fields supplied by a caller before storage assigns an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientDraft {
    pub name: String,
    pub date_of_birth: Date,
    pub email: String,
}

impl PatientDraft {
    pub fn new(name: impl Into<String>, date_of_birth: Date, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            date_of_birth,
            email: email.into(),
        }
    }
}

impl Patient {
    /// Whole years elapsed since `date_of_birth` as of `today`.
    ///
    /// The age does not increment until the birthday has occurred in the
    /// current year. A Feb-29 birthday counts from Mar 1 in non-leap years.
    pub fn age_on(&self, today: Date) -> i32 {
        age_on(self.date_of_birth, today)
    }
}

/// See [`Patient::age_on`].
pub fn age_on(date_of_birth: Date, today: Date) -> i32 {
    let mut age = today.year() - date_of_birth.year();
    let birthday = (u8::from(date_of_birth.month()), date_of_birth.day());
    if (u8::from(today.month()), today.day()) < birthday {
        age -= 1;
    }
    age
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_age_after_birthday_in_year() {
        assert_eq!(age_on(date!(1990 - 01 - 01), date!(2024 - 01 - 01)), 34);
    }

    #[test]
    fn test_age_before_birthday_in_year() {
        assert_eq!(age_on(date!(1990 - 01 - 01), date!(2023 - 12 - 31)), 33);
    }

    #[test]
    fn test_age_on_exact_birthday() {
        assert_eq!(age_on(date!(1990 - 06 - 15), date!(2020 - 06 - 15)), 30);
        assert_eq!(age_on(date!(1990 - 06 - 15), date!(2020 - 06 - 14)), 29);
    }

    #[test]
    fn test_age_newborn() {
        assert_eq!(age_on(date!(2024 - 03 - 01), date!(2024 - 06 - 01)), 0);
    }

    #[test]
    fn test_age_leap_day_birthday() {
        let dob = date!(2000 - 02 - 29);
        // Non-leap year: birthday treated as not yet reached on Feb 28.
        assert_eq!(age_on(dob, date!(2023 - 02 - 28)), 22);
        assert_eq!(age_on(dob, date!(2023 - 03 - 01)), 23);
        // Leap year: increments on the day itself.
        assert_eq!(age_on(dob, date!(2024 - 02 - 28)), 23);
        assert_eq!(age_on(dob, date!(2024 - 02 - 29)), 24);
    }

    #[test]
    fn test_patient_age_on_delegates() {
        let patient = Patient {
            id: 7,
            name: "Frida Kahlo".into(),
            date_of_birth: date!(1907 - 07 - 06),
            email: "self.portraits@mexico.art".into(),
        };
        assert_eq!(patient.age_on(date!(2024 - 07 - 06)), 117);
        assert_eq!(patient.age_on(date!(2024 - 07 - 05)), 116);
    }

    #[test]
    fn test_draft_constructor() {
        let draft = PatientDraft::new("Banksy", date!(1974 - 07 - 28), "anonymous@street.art");
        assert_eq!(draft.name, "Banksy");
        assert_eq!(draft.email, "anonymous@street.art");
    }
}
