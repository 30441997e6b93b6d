//! Contact form. Validation only; the site has no contact endpoint.

use crate::models::is_plausible_email;

pub const CONTACT_SUCCESS_NOTICE: &str = "Message sent successfully! We'll get back to you soon.";

/// Why a submission was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactError {
    MissingField(&'static str),
    InvalidEmail,
}

impl std::fmt::Display for ContactError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContactError::MissingField(field) => write!(f, "Please fill in your {}", field),
            ContactError::InvalidEmail => f.write_str("Please enter a valid email address"),
        }
    }
}

impl std::error::Error for ContactError {}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub service: String,
    pub message: String,
    /// Inline error from the last submission
    pub error: Option<String>,
}

impl ContactForm {
    pub fn validate(&self) -> Result<(), ContactError> {
        if self.name.trim().is_empty() {
            return Err(ContactError::MissingField("name"));
        }
        if self.email.trim().is_empty() {
            return Err(ContactError::MissingField("email"));
        }
        if !is_plausible_email(&self.email) {
            return Err(ContactError::InvalidEmail);
        }
        if self.message.trim().is_empty() {
            return Err(ContactError::MissingField("message"));
        }
        Ok(())
    }

    /// Submit the form. Success resets every field; failure keeps them and records the error.
    pub fn submit(&mut self) -> Result<&'static str, ContactError> {
        match self.validate() {
            Ok(()) => {
                tracing::info!("Contact request accepted");
                *self = Self::default();
                Ok(CONTACT_SUCCESS_NOTICE)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> ContactForm {
        ContactForm {
            name: "Priya".into(),
            email: "priya@example.com".into(),
            service: "azure".into(),
            message: "We need a migration plan.".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_submission_resets_form() {
        let mut form = filled();
        assert_eq!(form.submit(), Ok(CONTACT_SUCCESS_NOTICE));
        assert_eq!(form, ContactForm::default());
    }

    #[test]
    fn test_missing_message_keeps_state() {
        let mut form = filled();
        form.message = "   ".into();
        assert_eq!(form.submit(), Err(ContactError::MissingField("message")));
        assert_eq!(form.name, "Priya");
        assert_eq!(form.error.as_deref(), Some("Please fill in your message"));
    }

    #[test]
    fn test_invalid_email() {
        let mut form = filled();
        form.email = "priya".into();
        assert_eq!(form.validate(), Err(ContactError::InvalidEmail));
    }
}
