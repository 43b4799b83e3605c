//! User domain models and registration input handling.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::accounts::Account;
use crate::errors::ValidationError;
use crate::{Error, Result};

const PASSWORD_MIN_LEN: usize = 6;
const PASSWORD_MAX_LEN: usize = 10;
const ACCOUNT_NUMBER_MIN_DIGITS: usize = 6;
const ACCOUNT_NUMBER_MAX_DIGITS: usize = 8;
const NATIONAL_ID_DIGITS: usize = 11;

/// A registered customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    pub display_name: String,
    pub phone: String,
    pub email: String,
    pub national_id: String,
    pub birth_date: NaiveDate,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub account_numbers: Vec<String>,
}

impl User {
    /// Accounts are owned by display name, the `titular` stored on each account.
    pub fn owns(&self, account: &Account) -> bool {
        account.owner == self.display_name
    }
}

/// Identity established by a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSession {
    pub username: String,
    pub display_name: String,
    pub account_number: String,
}

/// Raw registration input as submitted by the client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationForm {
    pub display_name: String,
    pub phone: String,
    pub email: String,
    pub national_id: String,
    pub birth_date: String,
    pub password: String,
    pub account_number: String,
    #[serde(default)]
    pub accept_privacy_policy: bool,
}

/// Registration input after validation and normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRegistration {
    pub username: String,
    pub display_name: String,
    pub phone: String,
    pub email: String,
    pub national_id: String,
    pub birth_date: NaiveDate,
    pub password: String,
    pub account_number: String,
}

impl RegistrationForm {
    /// Validates every field and returns the normalized values to store.
    pub fn validate(&self) -> Result<ValidatedRegistration> {
        let display_name = self.display_name.trim();
        let email = self.email.trim();
        let required = [
            ("displayName", display_name),
            ("phone", self.phone.trim()),
            ("email", email),
            ("nationalId", self.national_id.trim()),
            ("birthDate", self.birth_date.trim()),
            ("password", self.password.as_str()),
            ("accountNumber", self.account_number.trim()),
        ];
        if let Some((field, _)) = required.iter().find(|(_, value)| value.is_empty()) {
            return Err(Error::Validation(ValidationError::MissingField(
                field.to_string(),
            )));
        }

        if !self.accept_privacy_policy {
            return Err(Error::invalid_input("The privacy policy must be accepted"));
        }

        let national_id = digits_only(&self.national_id);
        if national_id.len() != NATIONAL_ID_DIGITS {
            return Err(Error::invalid_input(
                "National id (CPF) must contain 11 digits",
            ));
        }

        let phone = digits_only(&self.phone);
        if phone.len() != 10 && phone.len() != 11 {
            return Err(Error::invalid_input("Phone must contain 10 or 11 digits"));
        }

        // Bounds count UTF-8 bytes, so accented letters weigh two.
        if !(PASSWORD_MIN_LEN..=PASSWORD_MAX_LEN).contains(&self.password.len()) {
            return Err(Error::invalid_input(format!(
                "Password must have between {PASSWORD_MIN_LEN} and {PASSWORD_MAX_LEN} bytes"
            )));
        }

        let account_digits = digits_only(&self.account_number);
        if !(ACCOUNT_NUMBER_MIN_DIGITS..=ACCOUNT_NUMBER_MAX_DIGITS).contains(&account_digits.len())
        {
            return Err(Error::invalid_input(format!(
                "Account number must have between {ACCOUNT_NUMBER_MIN_DIGITS} and {ACCOUNT_NUMBER_MAX_DIGITS} digits"
            )));
        }

        if !email.contains('@') {
            return Err(Error::invalid_input("Email address is not valid"));
        }

        let birth_date = NaiveDate::parse_from_str(self.birth_date.trim(), "%Y-%m-%d")
            .map_err(|_| Error::invalid_input("Birth date must be formatted as YYYY-MM-DD"))?;

        Ok(ValidatedRegistration {
            username: derive_username(display_name),
            display_name: display_name.to_string(),
            phone: format_phone(&phone),
            email: email.to_string(),
            national_id: format_national_id(&national_id),
            birth_date,
            password: self.password.clone(),
            account_number: normalize_account_number(&account_digits),
        })
    }
}

/// Username derived from a display name: lowercased, spaces replaced by `_`.
pub fn derive_username(display_name: &str) -> String {
    display_name.trim().to_lowercase().replace(' ', "_")
}

/// Strips formatting and splits off the check digit: `1234567` -> `123456-7`.
///
/// Inputs with fewer than two digits are returned as bare digits.
pub fn normalize_account_number(raw: &str) -> String {
    let digits = digits_only(raw);
    if digits.len() < 2 {
        return digits;
    }
    let (base, check) = digits.split_at(digits.len() - 1);
    format!("{base}-{check}")
}

fn digits_only(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// `12345678901` -> `123.456.789-01`.
fn format_national_id(digits: &str) -> String {
    if digits.len() != NATIONAL_ID_DIGITS {
        return digits.to_string();
    }
    format!(
        "{}.{}.{}-{}",
        &digits[0..3],
        &digits[3..6],
        &digits[6..9],
        &digits[9..11]
    )
}

/// `81984792068` -> `(81) 98479-2068`, `8134792068` -> `(81) 3479-2068`.
fn format_phone(digits: &str) -> String {
    match digits.len() {
        11 => format!("({}) {}-{}", &digits[0..2], &digits[2..7], &digits[7..11]),
        10 => format!("({}) {}-{}", &digits[0..2], &digits[2..6], &digits[6..10]),
        _ => digits.to_string(),
    }
}
