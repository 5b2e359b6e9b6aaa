//! Boundary validation for caller-supplied patient data.

use std::sync::OnceLock;

use regex::Regex;
use time::Date;

use crate::error::{CoreError, Result};
use crate::patient::PatientDraft;

/// Maximum accepted length for a patient name.
pub const MAX_NAME_LEN: usize = 100;

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    // Syntax check only: one '@', no whitespace, dotted domain.
    EMAIL.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"))
}

/// Checks that `name` is non-empty (ignoring surrounding whitespace) and
/// within [`MAX_NAME_LEN`] characters.
pub fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(CoreError::invalid_name("name is empty", MAX_NAME_LEN));
    }
    let len = name.chars().count();
    if len > MAX_NAME_LEN {
        return Err(CoreError::invalid_name(
            format!("name is {len} characters"),
            MAX_NAME_LEN,
        ));
    }
    Ok(())
}

/// Checks that `email` is syntactically an email address.
pub fn validate_email(email: &str) -> Result<()> {
    if !email_regex().is_match(email) {
        return Err(CoreError::invalid_email(email));
    }
    Ok(())
}

/// Checks that `date_of_birth` is not after `today`.
///
/// `today` is supplied by the caller's clock; this function never reads
/// ambient time.
pub fn validate_date_of_birth(date_of_birth: Date, today: Date) -> Result<()> {
    if date_of_birth > today {
        return Err(CoreError::future_date_of_birth(date_of_birth, today));
    }
    Ok(())
}

/// Validates a full patient draft against all boundary rules.
pub fn validate_patient_draft(draft: &PatientDraft, today: Date) -> Result<()> {
    validate_name(&draft.name)?;
    validate_email(&draft.email)?;
    validate_date_of_birth(draft.date_of_birth, today)
}
