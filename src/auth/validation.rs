use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

use crate::error::{AppError, AppResult, FieldError};

use super::repo_types::NewUser;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    static ref PHONE_RE: Regex = Regex::new(r"^(\+84|0)[3-9]\d{8}$").unwrap();
    static ref NAME_RE: Regex = Regex::new(r"^[a-zA-ZÀ-ỹ\s]{2,50}$").unwrap();
}

const PASSWORD_SPECIALS: &str = "@$!%*?&";

pub(crate) const MSG_REQUIRED: &str = "Trường này là bắt buộc";
const MSG_EMAIL: &str = "Email không hợp lệ";
pub(crate) const MSG_PHONE: &str = "Số điện thoại không hợp lệ (VD: 0901234567)";
const MSG_PASSWORD: &str =
    "Mật khẩu phải có ít nhất 8 ký tự, bao gồm chữ hoa, chữ thường, số và ký tự đặc biệt";
const MSG_NAME: &str = "Họ tên phải từ 2-50 ký tự và chỉ chứa chữ cái";

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Empty phone numbers are allowed; the field is optional.
pub fn is_valid_phone(phone: &str) -> bool {
    phone.is_empty() || PHONE_RE.is_match(phone)
}

pub fn is_valid_name(name: &str) -> bool {
    NAME_RE.is_match(name)
}

/// At least 8 characters drawn from letters, digits and `@$!%*?&`, with one
/// of each class.
pub fn is_strong_password(password: &str) -> bool {
    password.chars().count() >= 8
        && password
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || PASSWORD_SPECIALS.contains(c))
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| PASSWORD_SPECIALS.contains(c))
}

/// Number of strength criteria met, `0..=5`, for a strength meter.
pub fn password_strength(password: &str) -> u8 {
    [
        password.chars().count() >= 8,
        password.chars().any(|c| c.is_ascii_lowercase()),
        password.chars().any(|c| c.is_ascii_uppercase()),
        password.chars().any(|c| c.is_ascii_digit()),
        password.chars().any(|c| PASSWORD_SPECIALS.contains(c)),
    ]
    .into_iter()
    .filter(|met| *met)
    .count() as u8
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub agree_terms: bool,
}

impl RegisterForm {
    /// Field checks first, then the confirmation, then the terms box.
    pub fn validate(&self) -> AppResult<NewUser> {
        let name = self.name.trim();
        let email = self.email.trim();
        let phone = self.phone.trim();
        let mut errors = Vec::new();

        if name.is_empty() {
            errors.push(FieldError::new("registerName", MSG_REQUIRED));
        } else if !is_valid_name(name) {
            errors.push(FieldError::new("registerName", MSG_NAME));
        }

        if email.is_empty() {
            errors.push(FieldError::new("registerEmail", MSG_REQUIRED));
        } else if !is_valid_email(email) {
            errors.push(FieldError::new("registerEmail", MSG_EMAIL));
        }

        if self.password.trim().is_empty() {
            errors.push(FieldError::new("registerPassword", MSG_REQUIRED));
        } else if !is_strong_password(&self.password) {
            errors.push(FieldError::new("registerPassword", MSG_PASSWORD));
        }

        if self.confirm_password.trim().is_empty() {
            errors.push(FieldError::new("confirmPassword", MSG_REQUIRED));
        }

        if !is_valid_phone(phone) {
            errors.push(FieldError::new("registerPhone", MSG_PHONE));
        }

        if !errors.is_empty() {
            return Err(AppError::ValidationFailed(errors));
        }
        if self.password != self.confirm_password {
            return Err(AppError::PasswordMismatch);
        }
        if !self.agree_terms {
            return Err(AppError::TermsNotAccepted);
        }

        Ok(NewUser {
            name: name.to_string(),
            email: email.to_string(),
            password: self.password.clone(),
            phone: phone.to_string(),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    /// Returns the trimmed email.
    pub fn validate(&self) -> AppResult<String> {
        let email = self.email.trim();
        let mut errors = Vec::new();

        if email.is_empty() {
            errors.push(FieldError::new("loginEmail", MSG_REQUIRED));
        } else if !is_valid_email(email) {
            errors.push(FieldError::new("loginEmail", MSG_EMAIL));
        }
        if self.password.trim().is_empty() {
            errors.push(FieldError::new("loginPassword", MSG_REQUIRED));
        }

        if !errors.is_empty() {
            return Err(AppError::ValidationFailed(errors));
        }
        Ok(email.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> RegisterForm {
        RegisterForm {
            name: "Nguyễn Văn An".into(),
            email: " user@x.com ".into(),
            password: "Secret123!".into(),
            confirm_password: "Secret123!".into(),
            phone: "0901234567".into(),
            agree_terms: true,
        }
    }

    #[test]
    fn valid_registration_trims_fields() {
        let user = form().validate().unwrap();
        assert_eq!(user.email, "user@x.com");
        assert_eq!(user.name, "Nguyễn Văn An");
        assert_eq!(user.phone, "0901234567");
    }

    #[test]
    fn patterns() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.d"));

        assert!(is_valid_phone(""));
        assert!(is_valid_phone("+84912345678"));
        assert!(!is_valid_phone("0123456789"));
        assert!(!is_valid_phone("090123456"));

        assert!(is_valid_name("Trần Thị Bích"));
        assert!(!is_valid_name("A"));
        assert!(!is_valid_name("R2D2"));

        assert!(is_strong_password("Secret123!"));
        assert!(!is_strong_password("secret123!"));
        assert!(!is_strong_password("Secret123"));
        assert!(!is_strong_password("Sec12!"));
        assert!(!is_strong_password("Secret 123!"));
    }

    #[test]
    fn strength_counts_criteria() {
        assert_eq!(password_strength(""), 0);
        assert_eq!(password_strength("abc"), 1);
        assert_eq!(password_strength("abcDEF12"), 4);
        assert_eq!(password_strength("Secret123!"), 5);
    }

    #[test]
    fn field_errors_take_precedence_over_mismatch_and_terms() {
        let mut f = form();
        f.email = "not-an-email".into();
        f.phone = "12345".into();
        f.confirm_password = "Other123!".into();
        f.agree_terms = false;
        let AppError::ValidationFailed(errors) = f.validate().unwrap_err() else {
            panic!("expected validation failure");
        };
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["registerEmail", "registerPhone"]);
    }

    #[test]
    fn mismatch_then_terms() {
        let mut f = form();
        f.confirm_password = "Other123!".into();
        f.agree_terms = false;
        assert!(matches!(f.validate(), Err(AppError::PasswordMismatch)));

        f.confirm_password = f.password.clone();
        assert!(matches!(f.validate(), Err(AppError::TermsNotAccepted)));
    }

    #[test]
    fn login_form_requires_both_fields() {
        let err = LoginForm::default().validate().unwrap_err();
        assert_eq!(err.field_errors().len(), 2);

        let email = LoginForm {
            email: " user@x.com".into(),
            password: "wrongpw".into(),
        }
        .validate()
        .unwrap();
        assert_eq!(email, "user@x.com");
    }
}
