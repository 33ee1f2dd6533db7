//! Client-side form hardening for a hosting page.
//!
//! This crate decides whether what a user typed or picked may be submitted:
//! - **Anti-forgery token**: One per page, injected into every form exactly once
//! - **Field validation**: Email format and required-field rules, as pure predicates
//! - **Upload validation**: MIME allow-list and size ceiling for selected files
//! - **Submit gating**: Every field re-validated on submit; any failure blocks it
//! - **Feedback**: One error annotation per field, one notification per page
//!
//! Validation here is a usability layer. It is not a security boundary: a
//! client that skips this code skips every check, and the token is not a
//! server-verified secret.
//!
//! # Core Types
//!
//! - [`FieldValidator`] / [`FileUploadValidator`]: Pure [`Validator`]s
//! - [`FieldErrorState`]: The only writer of per-field error state
//! - [`FormGatekeeper`]: Wires handlers and decides submissions
//! - [`NotificationCenter`]: At-most-one, self-expiring notifications
//! - [`GuardContext`]: Per-page state (token, config, notifications, audit)
//! - [`Document`] / [`EventSource`]: The page, as an abstract collaborator
//!
//! # Examples
//!
//! ```
//! use form_guard::{
//!     Event, EventOutcome, FieldType, FormGatekeeper, GuardConfig, GuardContext,
//!     ManualClock, MemoryDocument,
//! };
//!
//! let mut doc = MemoryDocument::new();
//! let form = doc.add_form();
//! let email = doc.add_field(form, FieldType::Email, "email");
//! doc.set_value(email, "bad");
//!
//! let ctx = GuardContext::new(GuardConfig::default(), ManualClock::new());
//! let mut gate = FormGatekeeper::new(ctx);
//! gate.install(&mut doc);
//!
//! let outcome = gate.handle_event(&mut doc, Event::submit(form));
//! assert_eq!(outcome, EventOutcome::PreventDefault);
//! assert_eq!(doc.error_message(email), Some("Please enter a valid email address"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod audit;
mod config;
mod context;
mod dom;
mod enhance;
mod error;
mod error_state;
mod field;
mod gate;
mod logging;
mod notify;
mod token;
mod upload;
mod validator;

#[cfg(test)]
mod test_utils;

pub use config::{
    default_allowed_types, AllowedType, GuardConfig, GuardConfigBuilder, DEFAULT_MAX_UPLOAD_BYTES,
    DEFAULT_NOTIFICATION_TTL, DEFAULT_TOKEN_FIELD, DEFAULT_TOKEN_PREFIX,
};
pub use context::GuardContext;
pub use dom::{Document, Event, EventKind, EventOutcome, EventSource, MemoryDocument, NodeId};
pub use enhance::{mark_secure_links, PasswordToggles};
pub use error::{ConfigError, ConfigErrorKind, Error, Rejection, RejectionKind};
pub use error_state::FieldErrorState;
pub use field::{Field, FieldType};
pub use gate::{FormGatekeeper, GateState, SubmitReport, SUBMIT_BLOCKED_MESSAGE};
pub use logging::FormLog;
pub use notify::{
    Clock, ManualClock, Notification, NotificationCenter, NotificationKind, SystemClock,
};
pub use token::{CsrfToken, TokenProvider};
pub use upload::{FileDescriptor, FileUploadValidator, FILE_ACCEPTED_MESSAGE};
pub use validator::{
    FieldValidator, ValidationResult, Validator, INVALID_EMAIL_MESSAGE, REQUIRED_MESSAGE,
};
