use ratedesk_core::forms::{LoginForm, SignupForm};

use crate::common::{FormFields, TextField};

const EMAIL: usize = 0;
const PASSWORD: usize = 1;

#[derive(Debug, Clone)]
pub struct LoginView {
    pub form: FormFields,
    pub error: Option<String>,
    /// Shown after a successful signup.
    pub notice: Option<String>,
}

impl LoginView {
    pub fn new() -> Self {
        Self {
            form: FormFields::new(vec![TextField::new("Email"), TextField::secret("Password")]),
            error: None,
            notice: None,
        }
    }

    pub fn to_form(&self) -> LoginForm {
        LoginForm {
            email: self.form.value(EMAIL).to_string(),
            password: self.form.value(PASSWORD).to_string(),
        }
    }
}

impl Default for LoginView {
    fn default() -> Self {
        Self::new()
    }
}

const NAME: usize = 0;
const SIGNUP_EMAIL: usize = 1;
const ADDRESS: usize = 2;
const SIGNUP_PASSWORD: usize = 3;

#[derive(Debug, Clone)]
pub struct SignupView {
    pub form: FormFields,
    pub error: Option<String>,
}

impl SignupView {
    pub fn new() -> Self {
        Self {
            form: FormFields::new(vec![
                TextField::new("Full Name"),
                TextField::new("Email"),
                TextField::new("Address"),
                TextField::secret("Password"),
            ]),
            error: None,
        }
    }

    pub fn to_form(&self) -> SignupForm {
        SignupForm {
            name: self.form.value(NAME).to_string(),
            email: self.form.value(SIGNUP_EMAIL).to_string(),
            address: self.form.value(ADDRESS).to_string(),
            password: self.form.value(SIGNUP_PASSWORD).to_string(),
        }
    }
}

impl Default for SignupView {
    fn default() -> Self {
        Self::new()
    }
}
