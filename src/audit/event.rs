//! Guard event schema.

use std::fmt;

use crate::dom::NodeId;
use crate::error::RejectionKind;

/// Kind of decision being recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GuardEventKind {
    /// The page token was added to a form
    TokenInjected,
    /// A field failed validation on blur or submit
    FieldRejected,
    /// A selected file passed upload validation
    FileAccepted,
    /// A selected file was rejected and cleared
    FileRejected,
    /// A submission was allowed to proceed
    SubmitAccepted,
    /// A submission was blocked
    SubmitPrevented,
}

impl fmt::Display for GuardEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GuardEventKind::TokenInjected => write!(f, "token_injected"),
            GuardEventKind::FieldRejected => write!(f, "field_rejected"),
            GuardEventKind::FileAccepted => write!(f, "file_accepted"),
            GuardEventKind::FileRejected => write!(f, "file_rejected"),
            GuardEventKind::SubmitAccepted => write!(f, "submit_accepted"),
            GuardEventKind::SubmitPrevented => write!(f, "submit_prevented"),
        }
    }
}

/// A structured record of one guard decision.
///
/// # Safety Invariants
///
/// - No field values are stored
/// - The page token is never included
///
/// # Example
///
/// ```
/// use form_guard::audit::{GuardEvent, GuardEventKind};
/// use form_guard::{NodeId, RejectionKind};
///
/// let event = GuardEvent::new(GuardEventKind::FieldRejected)
///     .with_form(NodeId::new(1))
///     .with_field(NodeId::new(2))
///     .with_rule(RejectionKind::Required);
///
/// assert_eq!(event.field(), Some(NodeId::new(2)));
/// assert_eq!(format!("{}", event), "field_rejected form=#1 field=#2 rule=required");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardEvent {
    kind: GuardEventKind,
    form: Option<NodeId>,
    field: Option<NodeId>,
    rule: Option<RejectionKind>,
    failures: Option<usize>,
}

impl GuardEvent {
    /// Creates an event of the given kind.
    pub fn new(kind: GuardEventKind) -> Self {
        Self {
            kind,
            form: None,
            field: None,
            rule: None,
            failures: None,
        }
    }

    /// Sets the form the decision concerns.
    pub fn with_form(mut self, form: NodeId) -> Self {
        self.form = Some(form);
        self
    }

    /// Sets the field the decision concerns.
    pub fn with_field(mut self, field: NodeId) -> Self {
        self.field = Some(field);
        self
    }

    /// Sets the rule that failed.
    pub fn with_rule(mut self, rule: RejectionKind) -> Self {
        self.rule = Some(rule);
        self
    }

    /// Sets how many fields failed in a submit attempt.
    pub fn with_failures(mut self, failures: usize) -> Self {
        self.failures = Some(failures);
        self
    }

    /// Returns the event kind.
    pub fn kind(&self) -> GuardEventKind {
        self.kind
    }

    /// Returns the form, if any.
    pub fn form(&self) -> Option<NodeId> {
        self.form
    }

    /// Returns the field, if any.
    pub fn field(&self) -> Option<NodeId> {
        self.field
    }

    /// Returns the failed rule, if any.
    pub fn rule(&self) -> Option<RejectionKind> {
        self.rule
    }

    /// Returns the failure count, if any.
    pub fn failures(&self) -> Option<usize> {
        self.failures
    }

    /// Emits the event through `tracing` with structured fields.
    pub fn emit(&self) {
        tracing::info!(
            target: "form_guard_audit",
            kind = %self.kind,
            form = ?self.form.map(NodeId::get),
            field = ?self.field.map(NodeId::get),
            rule = ?self.rule,
            failures = ?self.failures,
            "guard event"
        );
    }
}

impl fmt::Display for GuardEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(form) = self.form {
            write!(f, " form={}", form)?;
        }
        if let Some(field) = self.field {
            write!(f, " field={}", field)?;
        }
        if let Some(rule) = self.rule {
            write!(f, " rule={}", rule)?;
        }
        if let Some(failures) = self.failures {
            write!(f, " failures={}", failures)?;
        }
        Ok(())
    }
}
