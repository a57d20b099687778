use crate::error::{AppError, Result};
use crate::models::{
    AppointmentRequest, AppointmentStatus, ContactRequest, NewAppointment, NewContact,
    DEFAULT_SERVICE,
};

const MAX_NAME_LEN: usize = 100;
const MAX_EMAIL_LEN: usize = 254;
const MAX_PHONE_LEN: usize = 40;
const MAX_SERVICE_LEN: usize = 100;
const MAX_SLOT_LEN: usize = 50;
const MAX_MESSAGE_LEN: usize = 5000;

/// Validation utilities for form submissions
#[derive(Debug, Copy, Clone)]
pub struct InputValidator;

impl InputValidator {
    /// Validate a booking form and normalize it for storage.
    ///
    /// Name, email and phone are required after trimming; the email is
    /// lower-cased and a blank service falls back to [`DEFAULT_SERVICE`].
    pub fn validate_appointment(request: AppointmentRequest) -> Result<NewAppointment> {
        let (Some(name), Some(email), Some(phone)) = (
            Self::optional(request.name.as_deref()),
            Self::optional(request.email.as_deref()),
            Self::optional(request.phone.as_deref()),
        ) else {
            return Err(AppError::Validation(
                "Name, email, and phone are required".to_string(),
            ));
        };

        Self::validate_name(&name)?;
        let email = Self::normalize_email(&email)?;
        Self::validate_phone(&phone)?;

        let service = Self::optional(request.service.as_deref())
            .unwrap_or_else(|| DEFAULT_SERVICE.to_string());
        Self::validate_length("Service", &service, MAX_SERVICE_LEN)?;

        let preferred_date = Self::optional(request.date.as_deref());
        let preferred_time = Self::optional(request.time.as_deref());
        for slot in preferred_date.iter().chain(preferred_time.iter()) {
            Self::validate_length("Preferred date/time", slot, MAX_SLOT_LEN)?;
        }

        let message = Self::optional(request.message.as_deref()).unwrap_or_default();
        Self::validate_length("Message", &message, MAX_MESSAGE_LEN)?;

        Ok(NewAppointment {
            name,
            email,
            phone,
            service,
            preferred_date,
            preferred_time,
            message,
        })
    }

    /// Validate a contact form and normalize it for storage
    pub fn validate_contact(request: ContactRequest) -> Result<NewContact> {
        let (Some(name), Some(email), Some(message)) = (
            Self::optional(request.name.as_deref()),
            Self::optional(request.email.as_deref()),
            Self::optional(request.message.as_deref()),
        ) else {
            return Err(AppError::Validation(
                "Name, email, and message are required".to_string(),
            ));
        };

        Self::validate_name(&name)?;
        let email = Self::normalize_email(&email)?;
        Self::validate_length("Message", &message, MAX_MESSAGE_LEN)?;

        let phone = Self::optional(request.phone.as_deref());
        if let Some(phone) = &phone {
            Self::validate_phone(phone)?;
        }

        let service = Self::optional(request.service.as_deref());
        if let Some(service) = &service {
            Self::validate_length("Service", service, MAX_SERVICE_LEN)?;
        }

        Ok(NewContact {
            name,
            email,
            phone,
            service,
            message,
        })
    }

    /// Parse a requested appointment status
    pub fn validate_status(status: Option<&str>) -> Result<AppointmentStatus> {
        let raw = status.map(str::trim).unwrap_or_default();
        raw.parse().map_err(|_| {
            let allowed: Vec<&str> = AppointmentStatus::ALL
                .iter()
                .map(AppointmentStatus::as_str)
                .collect();
            AppError::InvalidStatus(format!(
                "'{raw}'. Must be one of: {}",
                allowed.join(", ")
            ))
        })
    }

    /// Validate a person's name
    pub fn validate_name(name: &str) -> Result<()> {
        Self::validate_length("Name", name, MAX_NAME_LEN)?;

        if name.contains('\n') || name.contains('\r') || name.contains('\t') {
            return Err(AppError::Validation(
                "Name contains invalid characters".to_string(),
            ));
        }

        Ok(())
    }

    /// Validate email shape and return it lower-cased
    pub fn normalize_email(email: &str) -> Result<String> {
        let email = email.to_lowercase();
        Self::validate_length("Email", &email, MAX_EMAIL_LEN)?;

        let Some((local, domain)) = email.split_once('@') else {
            return Err(AppError::Validation("Email must contain @ symbol".to_string()));
        };

        if domain.contains('@') {
            return Err(AppError::Validation(
                "Email must have exactly one @ symbol".to_string(),
            ));
        }

        if local.is_empty() || local.len() > 64 {
            return Err(AppError::Validation("Email local part invalid".to_string()));
        }

        if domain.is_empty() || !domain.contains('.') || domain.chars().any(char::is_whitespace) {
            return Err(AppError::Validation("Email domain invalid".to_string()));
        }

        Ok(email)
    }

    /// Validate phone number. Formatting is free-form; only size and line
    /// breaks are checked.
    pub fn validate_phone(phone: &str) -> Result<()> {
        Self::validate_length("Phone", phone, MAX_PHONE_LEN)?;

        if phone.contains('\n') || phone.contains('\r') {
            return Err(AppError::Validation(
                "Phone number contains invalid characters".to_string(),
            ));
        }

        Ok(())
    }

    /// Sanitize text input
    #[must_use]
    pub fn sanitize_text(text: &str) -> String {
        text.chars()
            .filter(|c| !c.is_control() || *c == '\n' || *c == '\t' || *c == '\r')
            .collect::<String>()
            .trim()
            .to_string()
    }

    /// Validate database URL
    pub fn validate_database_url(url: &str) -> Result<()> {
        if url.trim().is_empty() {
            return Err(AppError::Validation("Database URL cannot be empty".to_string()));
        }

        if !url.starts_with("sqlite:") {
            return Err(AppError::Validation(
                "Only SQLite databases are supported".to_string(),
            ));
        }

        if url.len() > 1000 {
            return Err(AppError::Validation("Database URL too long".to_string()));
        }

        Ok(())
    }

    fn optional(value: Option<&str>) -> Option<String> {
        value
            .map(Self::sanitize_text)
            .filter(|cleaned| !cleaned.is_empty())
    }

    fn validate_length(field: &str, value: &str, max: usize) -> Result<()> {
        if value.chars().count() > max {
            return Err(AppError::Validation(format!(
                "{field} too long (max {max} characters)"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booking(name: &str, email: &str, phone: &str) -> AppointmentRequest {
        AppointmentRequest {
            name: Some(name.into()),
            email: Some(email.into()),
            phone: Some(phone.into()),
            ..AppointmentRequest::default()
        }
    }

    #[test]
    fn test_appointment_normalization() {
        let new = InputValidator::validate_appointment(booking("  Jane ", "JANE@X.COM", " 555-1 "))
            .unwrap();
        assert_eq!(new.name, "Jane");
        assert_eq!(new.email, "jane@x.com");
        assert_eq!(new.phone, "555-1");
        assert_eq!(new.service, DEFAULT_SERVICE);
        assert_eq!(new.message, "");
        assert!(new.preferred_date.is_none());
    }

    #[test]
    fn test_blank_service_uses_default() {
        let mut request = booking("Jane", "jane@x.com", "555");
        request.service = Some("   ".into());
        let new = InputValidator::validate_appointment(request).unwrap();
        assert_eq!(new.service, DEFAULT_SERVICE);
    }

    #[test]
    fn test_whitespace_required_field_rejected() {
        let err = InputValidator::validate_appointment(booking("Jane", "jane@x.com", "   "))
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_contact_requires_message() {
        let request = ContactRequest {
            name: Some("Sam".into()),
            email: Some("sam@example.com".into()),
            message: Some(String::new()),
            ..ContactRequest::default()
        };
        assert!(InputValidator::validate_contact(request).is_err());
    }

    #[test]
    fn test_status_validation() {
        assert_eq!(
            InputValidator::validate_status(Some("confirmed")).unwrap(),
            AppointmentStatus::Confirmed
        );
        assert!(matches!(
            InputValidator::validate_status(Some("archived")),
            Err(AppError::InvalidStatus(_))
        ));
        assert!(InputValidator::validate_status(None).is_err());
    }
}
