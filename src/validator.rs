use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Rejection, RejectionKind};
use crate::field::{Field, FieldType};

/// Message shown for a malformed email address.
pub const INVALID_EMAIL_MESSAGE: &str = "Please enter a valid email address";

/// Message shown for an empty required field.
pub const REQUIRED_MESSAGE: &str = "This field is required";

/// Non-whitespace non-`@` run, `@`, run, `.`, run.
#[allow(clippy::expect_used)]
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex literal")
});

/// Outcome of a single validation call.
///
/// Produced fresh for every call and never retained by the validator.
///
/// # Examples
///
/// ```
/// use form_guard::{ValidationResult, RejectionKind};
///
/// let ok = ValidationResult::accept();
/// assert!(ok.is_valid());
/// assert_eq!(ok.message(), None);
///
/// let bad = ValidationResult::reject(RejectionKind::Required, "This field is required");
/// assert!(!bad.is_valid());
/// assert_eq!(bad.message(), Some("This field is required"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    rejection: Option<Rejection>,
}

impl ValidationResult {
    /// An accepting result with no message.
    pub fn accept() -> Self {
        Self { rejection: None }
    }

    /// A rejecting result.
    pub fn reject(kind: RejectionKind, message: impl Into<String>) -> Self {
        Self {
            rejection: Some(Rejection::new(kind, message)),
        }
    }

    /// Returns true if the input was accepted.
    pub fn is_valid(&self) -> bool {
        self.rejection.is_none()
    }

    /// Returns the user-facing message, empty for accepted input.
    pub fn message(&self) -> Option<&str> {
        self.rejection.as_ref().map(|r| r.message.as_str())
    }

    /// Returns the failed rule, if any.
    pub fn kind(&self) -> Option<RejectionKind> {
        self.rejection.as_ref().map(|r| r.kind)
    }

    /// Returns the rejection, if any.
    pub fn rejection(&self) -> Option<&Rejection> {
        self.rejection.as_ref()
    }

    /// Converts into a `Result` so callers can use `?`.
    ///
    /// # Errors
    ///
    /// Returns the `Rejection` when the input was not accepted.
    pub fn into_result(self) -> Result<(), Rejection> {
        match self.rejection {
            None => Ok(()),
            Some(r) => Err(r),
        }
    }
}

/// A pure accept/reject decision over some input.
///
/// # Invariants
///
/// Implementations MUST:
/// - Only read their input, never mutate the document or error state
/// - Return a fresh `ValidationResult` on every call
/// - Not echo the rejected value in the message
pub trait Validator<T: ?Sized> {
    /// Decides whether `input` is acceptable.
    fn validate(&self, input: &T) -> ValidationResult;
}

/// Field-level rules: email format, then required.
///
/// The first failing rule wins:
/// 1. An email field whose trimmed value is non-empty and malformed
/// 2. A required field whose trimmed value is empty
///
/// # Examples
///
/// ```
/// use form_guard::{Field, FieldType, FieldValidator, NodeId, Validator};
///
/// let validator = FieldValidator;
///
/// // Empty optional email is fine
/// let email = Field::new(NodeId::new(1), FieldType::Email).with_value(" ");
/// assert!(validator.validate(&email).is_valid());
///
/// // Email format is checked before "required"
/// let email = Field::new(NodeId::new(1), FieldType::Email)
///     .with_value("a@b")
///     .required(true);
/// assert_eq!(
///     validator.validate(&email).message(),
///     Some("Please enter a valid email address")
/// );
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldValidator;

impl FieldValidator {
    /// Returns true if `value` looks like an email address.
    pub fn is_email(value: &str) -> bool {
        EMAIL_PATTERN.is_match(value)
    }
}

impl Validator<Field> for FieldValidator {
    fn validate(&self, field: &Field) -> ValidationResult {
        let value = field.trimmed_value();

        if field.field_type() == FieldType::Email && !value.is_empty() && !Self::is_email(value) {
            return ValidationResult::reject(RejectionKind::InvalidEmail, INVALID_EMAIL_MESSAGE);
        }

        if field.is_required() && value.is_empty() {
            return ValidationResult::reject(RejectionKind::Required, REQUIRED_MESSAGE);
        }

        ValidationResult::accept()
    }
}
