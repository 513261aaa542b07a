//! Client-side input validation.
//!
//! These checks run before a request is sent so obviously bad input never
//! reaches the server. Each validator reports the first failing field.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::{LoginRequest, RegistrationForm, TransferRequest};

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid email regex")
});

static PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{10,11}$").expect("Invalid phone regex"));

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MIN_NAME_LEN: usize = 2;
pub const MIN_TRANSFER_AMOUNT: f64 = 1.0;

/// A rejected input field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// Wire name of the offending field.
    pub field: &'static str,
    pub message: &'static str,
}

impl ValidationError {
    const fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

fn check(ok: bool, field: &'static str, message: &'static str) -> Result<(), ValidationError> {
    if ok {
        Ok(())
    } else {
        Err(ValidationError::new(field, message))
    }
}

fn is_email(value: &str) -> bool {
    EMAIL_REGEX.is_match(value.trim())
}

fn char_len(value: &str) -> usize {
    value.trim().chars().count()
}

pub fn validate_login(request: &LoginRequest) -> Result<(), ValidationError> {
    check(is_email(&request.email), "email", "Please enter a valid email address")?;
    check(
        request.password.chars().count() >= MIN_PASSWORD_LEN,
        "password",
        "Password must be at least 8 characters",
    )
}

pub fn validate_registration(form: &RegistrationForm) -> Result<(), ValidationError> {
    check(
        char_len(&form.name) >= MIN_NAME_LEN,
        "name",
        "Name must be at least 2 characters",
    )?;
    check(is_email(&form.email), "email", "Please enter a valid email address")?;
    check(
        PHONE_REGEX.is_match(form.phone_number.trim()),
        "phoneNumber",
        "Phone number must be 10-11 digits",
    )?;
    check(
        form.password.chars().count() >= MIN_PASSWORD_LEN,
        "password",
        "Password must be at least 8 characters",
    )?;
    check(
        form.password == form.confirm_password,
        "confirmPassword",
        "Passwords do not match",
    )
}

pub fn validate_transfer(request: &TransferRequest) -> Result<(), ValidationError> {
    check(
        !request.from_account_id.trim().is_empty(),
        "fromAccountId",
        "Please select an account",
    )?;
    check(
        !request.to_account_id.trim().is_empty(),
        "toAccountId",
        "Recipient account is required",
    )?;
    check(
        char_len(&request.recipient_name) >= MIN_NAME_LEN,
        "recipientName",
        "Recipient name is required",
    )?;
    check(
        request.amount.is_finite() && request.amount >= MIN_TRANSFER_AMOUNT,
        "amount",
        "Amount must be greater than 0",
    )
}
