//! Field validation shared by every intake and admin form
//!
//! Validators push onto a [`Validator`] so a request reports every bad field
//! at once instead of failing on the first.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"));
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9\s().-]{7,20}$").expect("phone regex"));
static SLUG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").expect("slug regex"));

pub const NAME_MIN_CHARS: usize = 2;
pub const NAME_MAX_CHARS: usize = 100;
pub const EMAIL_MAX_CHARS: usize = 254;
pub const MESSAGE_MAX_CHARS: usize = 2000;
pub const CHAT_BODY_MAX_CHARS: usize = 1000;
pub const CHAT_AUTHOR_MAX_CHARS: usize = 60;
pub const TITLE_MAX_CHARS: usize = 200;

/// A single rejected form field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Collects field errors for one request
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    /// Trimmed length must fall within `[min, max]` characters
    pub fn length(&mut self, field: &str, value: &str, min: usize, max: usize) -> &mut Self {
        let len = value.trim().chars().count();
        if len < min {
            if min == 1 {
                self.push(field, "is required");
            } else {
                self.push(field, format!("must be at least {} characters", min));
            }
        } else if len > max {
            self.push(field, format!("must be at most {} characters", max));
        }
        self
    }

    pub fn name(&mut self, field: &str, value: &str) -> &mut Self {
        self.length(field, value, NAME_MIN_CHARS, NAME_MAX_CHARS)
    }

    pub fn email(&mut self, field: &str, value: &str) -> &mut Self {
        let value = value.trim();
        if value.is_empty() {
            self.push(field, "is required");
        } else if value.chars().count() > EMAIL_MAX_CHARS || !EMAIL_RE.is_match(value) {
            self.push(field, "is not a valid email address");
        }
        self
    }

    /// Empty is accepted; anything else must look like a phone number
    pub fn optional_phone(&mut self, field: &str, value: Option<&str>) -> &mut Self {
        if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
            if !PHONE_RE.is_match(value) {
                self.push(field, "is not a valid phone number");
            }
        }
        self
    }

    pub fn optional_text(&mut self, field: &str, value: Option<&str>, max: usize) -> &mut Self {
        if let Some(value) = value {
            self.length(field, value, 0, max);
        }
        self
    }

    pub fn url(&mut self, field: &str, value: &str) -> &mut Self {
        let value = value.trim();
        if value.is_empty() {
            self.push(field, "is required");
        } else if !(value.starts_with("https://")
            || value.starts_with("http://")
            || value.starts_with('/'))
        {
            self.push(field, "must be an http(s) URL or a site-relative path");
        }
        self
    }

    pub fn slug(&mut self, field: &str, value: &str) -> &mut Self {
        if !SLUG_RE.is_match(value) {
            self.push(field, "must be lowercase words separated by dashes");
        }
        self
    }

    pub fn range(&mut self, field: &str, value: i64, min: i64, max: i64) -> &mut Self {
        if value < min || value > max {
            self.push(field, format!("must be between {} and {}", min, max));
        }
        self
    }

    pub fn non_negative(&mut self, field: &str, value: i64) -> &mut Self {
        if value < 0 {
            self.push(field, "must not be negative");
        }
        self
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// `Ok(())` when nothing was rejected, otherwise [`Error::Validation`]
    pub fn finish(self) -> Result<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(self.errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_all_errors() {
        let mut v = Validator::new();
        v.name("name", "A")
            .email("email", "not-an-email")
            .optional_phone("phone", Some("call me"));
        let errors = v.errors().to_vec();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors[0].field, "name");
        assert_eq!(errors[1].field, "email");
        assert_eq!(errors[2].field, "phone");
    }

    #[test]
    fn test_valid_contact() {
        let mut v = Validator::new();
        v.name("name", "Jordan Lee")
            .email("email", "jordan@example.com")
            .optional_phone("phone", Some("(555) 123-4567"))
            .optional_text("message", Some("Looking for spring sessions"), MESSAGE_MAX_CHARS);
        assert!(v.finish().is_ok());
    }

    #[test]
    fn test_blank_phone_is_accepted() {
        let mut v = Validator::new();
        v.optional_phone("phone", Some("   ")).optional_phone("phone", None);
        assert!(v.is_valid());
    }

    #[test]
    fn test_length_counts_trimmed_chars() {
        let mut v = Validator::new();
        v.length("body", "   ", 1, 10);
        assert_eq!(v.errors()[0].message, "is required");

        let mut v = Validator::new();
        v.length("title", &"x".repeat(11), 1, 10);
        assert_eq!(v.errors()[0].message, "must be at most 10 characters");
    }

    #[test]
    fn test_url_and_slug() {
        let mut v = Validator::new();
        v.url("image_url", "/images/camp.jpg")
            .url("video_url", "https://video.example.com/1")
            .slug("slug", "skills-lab");
        assert!(v.is_valid());

        let mut v = Validator::new();
        v.url("image_url", "ftp://x").slug("slug", "Skills Lab");
        assert_eq!(v.errors().len(), 2);
    }

    #[test]
    fn test_finish_returns_validation_error() {
        let mut v = Validator::new();
        v.range("rating", 6, 1, 5);
        match v.finish() {
            Err(Error::Validation(errors)) => assert_eq!(errors[0].field, "rating"),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_email_needs_dotted_domain() {
        let mut v = Validator::new();
        v.email("email", "coach@academy.example");
        assert!(v.is_valid());

        let mut v = Validator::new();
        v.email("email", "coach@academy").email("email", "");
        assert_eq!(v.errors().len(), 2);
    }
}
