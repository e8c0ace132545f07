//! Input checks for KAM and contact details

use once_cell::sync::Lazy;
use regex::Regex;

use kam_leads_core::{Error, Result};

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9+_.-]+@(.+)$").expect("email pattern is valid"));

/// Optional leading `+`, then 10 to 15 digits
static PHONE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9]{10,15}$").expect("phone pattern is valid"));

pub fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::validation(format!("{} must not be empty", field)));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<()> {
    if !EMAIL.is_match(email.trim()) {
        return Err(Error::validation(format!("Invalid email format: {}", email)));
    }
    Ok(())
}

pub fn validate_phone(phone: &str) -> Result<()> {
    if !PHONE.is_match(phone.trim()) {
        return Err(Error::validation(format!("Invalid phone number format: {}", phone)));
    }
    Ok(())
}
