//! Local form checks that run before any request is sent.
//!
//! The backend enforces the real rules. The hint strings below are shown
//! next to inputs and are not checked here.

use std::fmt;

use crate::api::{Credentials, NewStore, NewUser, PasswordUpdate, RatingSubmission, Registration};
use crate::session::Role;

pub const NAME_HINT: &str = "20-60 characters";
pub const ADDRESS_HINT: &str = "Maximum 400 characters";
pub const PASSWORD_HINT: &str = "8-16 characters with uppercase and special character";
pub const NEW_PASSWORD_HINT: &str =
    "8-16 characters with at least one uppercase letter and one special character";

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    PasswordMismatch,
    Missing(&'static str),
    RatingOutOfRange(u8),
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormError::PasswordMismatch => f.write_str("New passwords don't match"),
            FormError::Missing(field) => write!(f, "{field} is required"),
            FormError::RatingOutOfRange(value) => {
                write!(
                    f,
                    "Rating must be between {MIN_RATING} and {MAX_RATING} (got {value})"
                )
            }
        }
    }
}

impl std::error::Error for FormError {}

fn required(value: &str, field: &'static str) -> Result<String, FormError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(FormError::Missing(field))
    } else {
        Ok(trimmed.to_string())
    }
}

// Passwords are sent as typed.
fn required_secret(value: &str, field: &'static str) -> Result<String, FormError> {
    if value.is_empty() {
        Err(FormError::Missing(field))
    } else {
        Ok(value.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    /// # Errors
    /// Returns [`FormError::Missing`] for an empty field.
    pub fn validate(&self) -> Result<Credentials, FormError> {
        Ok(Credentials {
            email: required(&self.email, "Email")?,
            password: required_secret(&self.password, "Password")?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub address: String,
    pub password: String,
}

impl SignupForm {
    /// # Errors
    /// Returns [`FormError::Missing`] for an empty field.
    pub fn validate(&self) -> Result<Registration, FormError> {
        Ok(Registration {
            name: required(&self.name, "Name")?,
            email: required(&self.email, "Email")?,
            address: required(&self.address, "Address")?,
            password: required_secret(&self.password, "Password")?,
        })
    }
}

/// Admin "Add User" form. Role defaults to `user`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub address: String,
    pub role: Role,
}

impl Default for UserForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            password: String::new(),
            address: String::new(),
            role: Role::User,
        }
    }
}

impl UserForm {
    /// # Errors
    /// Returns [`FormError::Missing`] for an empty field.
    pub fn validate(&self) -> Result<NewUser, FormError> {
        Ok(NewUser {
            name: required(&self.name, "Name")?,
            email: required(&self.email, "Email")?,
            password: required_secret(&self.password, "Password")?,
            address: required(&self.address, "Address")?,
            role: self.role,
        })
    }
}

/// Admin "Add Store" form, optionally creating the owner account too.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreForm {
    pub name: String,
    pub email: String,
    pub address: String,
    pub create_owner: bool,
    pub owner_email: String,
    pub owner_password: String,
}

impl StoreForm {
    /// Owner fields are only sent when `create_owner` is set.
    ///
    /// # Errors
    /// Returns [`FormError::Missing`] for an empty field.
    pub fn validate(&self) -> Result<NewStore, FormError> {
        let name = required(&self.name, "Store name")?;
        let email = required(&self.email, "Store email")?;
        let address = required(&self.address, "Store address")?;
        let (owner_email, owner_password) = if self.create_owner {
            (
                Some(required(&self.owner_email, "Owner email")?),
                Some(required_secret(&self.owner_password, "Owner password")?),
            )
        } else {
            (None, None)
        };

        Ok(NewStore {
            name,
            email,
            address,
            owner_email,
            owner_password,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl PasswordChange {
    /// Mismatch is checked first so it is always the error shown when the
    /// two new passwords differ.
    ///
    /// # Errors
    /// Returns [`FormError::PasswordMismatch`] or [`FormError::Missing`].
    pub fn validate(&self) -> Result<PasswordUpdate, FormError> {
        if self.new_password != self.confirm_password {
            return Err(FormError::PasswordMismatch);
        }
        Ok(PasswordUpdate {
            current_password: required_secret(&self.current_password, "Current password")?,
            new_password: required_secret(&self.new_password, "New password")?,
        })
    }
}

/// # Errors
/// Returns [`FormError::RatingOutOfRange`] outside 1..=5.
pub fn rating_submission(store_id: u64, rating: u8) -> Result<RatingSubmission, FormError> {
    if (MIN_RATING..=MAX_RATING).contains(&rating) {
        Ok(RatingSubmission { store_id, rating })
    } else {
        Err(FormError::RatingOutOfRange(rating))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_mismatch_message() {
        let form = PasswordChange {
            current_password: "Old123!x".into(),
            new_password: "New123!x".into(),
            confirm_password: "New123!y".into(),
        };
        let err = form.validate().unwrap_err();
        assert_eq!(err, FormError::PasswordMismatch);
        assert_eq!(err.to_string(), "New passwords don't match");
    }

    #[test]
    fn test_password_mismatch_wins_over_missing() {
        let form = PasswordChange {
            new_password: "a".into(),
            ..PasswordChange::default()
        };
        assert_eq!(form.validate().unwrap_err(), FormError::PasswordMismatch);
    }

    #[test]
    fn test_password_change_ok() {
        let form = PasswordChange {
            current_password: "Old123!x".into(),
            new_password: "New123!x".into(),
            confirm_password: "New123!x".into(),
        };
        let update = form.validate().unwrap();
        assert_eq!(update.new_password, "New123!x");
    }

    #[test]
    fn test_store_form_owner_fields() {
        let mut form = StoreForm {
            name: " Deli ".into(),
            email: "deli@x".into(),
            address: "1 Main".into(),
            ..StoreForm::default()
        };
        let store = form.validate().unwrap();
        assert_eq!(store.name, "Deli");
        assert!(store.owner_email.is_none());

        form.create_owner = true;
        assert_eq!(
            form.validate().unwrap_err(),
            FormError::Missing("Owner email")
        );

        form.owner_email = "o@x".into();
        form.owner_password = "Owner123!".into();
        let store = form.validate().unwrap();
        assert_eq!(store.owner_password.as_deref(), Some("Owner123!"));
    }

    #[test]
    fn test_user_form_defaults_to_user_role() {
        let form = UserForm {
            name: "Someone With A Long Name".into(),
            email: "s@x".into(),
            password: "Pass123!".into(),
            address: "Somewhere".into(),
            ..UserForm::default()
        };
        assert_eq!(form.validate().unwrap().role, Role::User);
    }

    #[test]
    fn test_login_form_requires_email() {
        let form = LoginForm {
            email: "  ".into(),
            password: "x".into(),
        };
        assert_eq!(form.validate().unwrap_err(), FormError::Missing("Email"));
    }

    #[test]
    fn test_rating_range() {
        assert!(rating_submission(1, 0).is_err());
        assert!(rating_submission(1, 6).is_err());
        assert_eq!(
            rating_submission(42, 5).unwrap(),
            RatingSubmission {
                store_id: 42,
                rating: 5
            }
        );
    }
}
