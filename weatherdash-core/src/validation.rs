//! Client-side form checks. Nothing here touches the network.

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;
use url::Url;

use crate::archive::AVAILABLE_TAGS;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Name is required")]
    NameRequired,

    #[error("Enter a valid email address")]
    InvalidEmail,

    #[error("Question is required")]
    QuestionRequired,

    #[error("You must agree to the terms")]
    AgreementRequired,

    #[error("Link name must be at least {0} characters")]
    LinkNameTooShort(usize),

    #[error("Link URL is required")]
    UrlRequired,

    #[error("Enter a valid URL")]
    InvalidUrl,

    #[error("Select at least one tag")]
    TagsRequired,

    #[error("Unknown tag '{0}'")]
    UnknownTag(String),

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Password must be at least {0} characters")]
    PasswordTooShort(usize),

    #[error("First name must be at least {0} characters")]
    FirstNameTooShort(usize),

    #[error("Last name must be at least {0} characters")]
    LastNameTooShort(usize),

    #[error("Email is required")]
    EmailRequired,

    #[error("Telegram link must look like https://t.me/username")]
    InvalidTelegramUrl,
}

const MIN_LINK_NAME: usize = 3;
const MIN_PASSWORD: usize = 6;
const MIN_PERSON_NAME: usize = 2;

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static regex"))
}

fn telegram_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^https://t\.me/\w+$").expect("static regex"))
}

fn trimmed_len(s: &str) -> usize {
    s.trim().chars().count()
}

#[derive(Debug, Clone, Default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub question: String,
    pub agreed: bool,
}

impl ContactForm {
    /// Every failing field is reported, so all of them can be highlighted at once.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push(ValidationError::NameRequired);
        }
        if !email_regex().is_match(&self.email) {
            errors.push(ValidationError::InvalidEmail);
        }
        if self.question.trim().is_empty() {
            errors.push(ValidationError::QuestionRequired);
        }
        if !self.agreed {
            errors.push(ValidationError::AgreementRequired);
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LinkForm {
    pub link_name: String,
    pub url: String,
    pub tags: Vec<String>,
}

impl LinkForm {
    /// Stops at the first problem, in field order.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if trimmed_len(&self.link_name) < MIN_LINK_NAME {
            return Err(ValidationError::LinkNameTooShort(MIN_LINK_NAME));
        }
        if self.url.trim().is_empty() {
            return Err(ValidationError::UrlRequired);
        }
        Url::parse(self.url.trim()).map_err(|_| ValidationError::InvalidUrl)?;

        if self.tags.is_empty() {
            return Err(ValidationError::TagsRequired);
        }
        if let Some(unknown) = self.tags.iter().find(|t| !AVAILABLE_TAGS.contains(&t.as_str())) {
            return Err(ValidationError::UnknownTag(unknown.clone()));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub first_name: String,
    pub last_name: String,
    pub telegram_url: Option<String>,
}

impl RegistrationForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }
        if self.password.chars().count() < MIN_PASSWORD {
            return Err(ValidationError::PasswordTooShort(MIN_PASSWORD));
        }
        if trimmed_len(&self.first_name) < MIN_PERSON_NAME {
            return Err(ValidationError::FirstNameTooShort(MIN_PERSON_NAME));
        }
        if trimmed_len(&self.last_name) < MIN_PERSON_NAME {
            return Err(ValidationError::LastNameTooShort(MIN_PERSON_NAME));
        }
        if self.email.trim().is_empty() {
            return Err(ValidationError::EmailRequired);
        }
        validate_telegram_url(self.telegram_url.as_deref())
    }
}

/// Blank or absent is fine; anything else must be a `t.me` profile link.
pub fn validate_telegram_url(url: Option<&str>) -> Result<(), ValidationError> {
    match url.map(str::trim) {
        None | Some("") => Ok(()),
        Some(url) if telegram_regex().is_match(url) => Ok(()),
        Some(_) => Err(ValidationError::InvalidTelegramUrl),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_contact() -> ContactForm {
        ContactForm {
            name: "Ann".into(),
            email: "ann@example.com".into(),
            question: "Do you ship?".into(),
            agreed: true,
        }
    }

    #[test]
    fn contact_form_accepts_complete_input() {
        assert_eq!(valid_contact().validate(), Ok(()));
    }

    #[test]
    fn contact_form_reports_every_bad_field() {
        let form = ContactForm { email: "ann@example".into(), question: "  ".into(), agreed: false, ..valid_contact() };

        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::InvalidEmail,
                ValidationError::QuestionRequired,
                ValidationError::AgreementRequired,
            ]
        );
    }

    #[test]
    fn email_pattern() {
        for ok in ["a@b.co", "first.last@sub.example.org"] {
            assert!(email_regex().is_match(ok), "{ok}");
        }
        for bad in ["", "a@b", "a b@c.d", "@b.co", "a@@b.co"] {
            assert!(!email_regex().is_match(bad), "{bad}");
        }
    }

    #[test]
    fn link_form_checks_in_order() {
        let mut form = LinkForm {
            link_name: "ab".into(),
            url: "https://user.github.io/repo".into(),
            tags: vec!["rust".into()],
        };
        assert_eq!(form.validate(), Err(ValidationError::LinkNameTooShort(3)));

        form.link_name = "Portfolio".into();
        assert_eq!(form.validate(), Ok(()));

        form.url = "user.github.io".into();
        assert_eq!(form.validate(), Err(ValidationError::InvalidUrl));

        form.url = "   ".into();
        assert_eq!(form.validate(), Err(ValidationError::UrlRequired));

        form.url = "https://user.github.io/repo".into();
        form.tags.clear();
        assert_eq!(form.validate(), Err(ValidationError::TagsRequired));

        form.tags = vec!["cobol".into()];
        assert_eq!(form.validate(), Err(ValidationError::UnknownTag("cobol".into())));
    }

    #[test]
    fn registration_rules() {
        let mut form = RegistrationForm {
            email: "ann@example.com".into(),
            password: "secret1".into(),
            confirm_password: "secret1".into(),
            first_name: "Ann".into(),
            last_name: "Lee".into(),
            telegram_url: None,
        };
        assert_eq!(form.validate(), Ok(()));

        form.confirm_password = "other".into();
        assert_eq!(form.validate(), Err(ValidationError::PasswordMismatch));

        form.password = "short".into();
        form.confirm_password = "short".into();
        assert_eq!(form.validate(), Err(ValidationError::PasswordTooShort(6)));

        form.password = "longenough".into();
        form.confirm_password = "longenough".into();
        form.last_name = " L ".into();
        assert_eq!(form.validate(), Err(ValidationError::LastNameTooShort(2)));

        form.last_name = "Lee".into();
        form.telegram_url = Some("https://telegram.me/ann".into());
        assert_eq!(form.validate(), Err(ValidationError::InvalidTelegramUrl));

        form.telegram_url = Some("https://t.me/ann_lee".into());
        assert_eq!(form.validate(), Ok(()));
    }

    #[test]
    fn blank_telegram_url_is_allowed() {
        assert_eq!(validate_telegram_url(Some("  ")), Ok(()));
        assert_eq!(validate_telegram_url(None), Ok(()));
    }
}
