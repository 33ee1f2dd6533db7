use std::collections::HashMap;
use std::fmt;

use crate::audit::{GuardEvent, GuardEventKind};
use crate::context::GuardContext;
use crate::dom::{Document, Event, EventKind, EventOutcome, EventSource, NodeId};
use crate::enhance::{mark_secure_links, PasswordToggles};
use crate::error::Rejection;
use crate::error_state::FieldErrorState;
use crate::field::FieldType;
use crate::logging::FormLog;
use crate::notify::{Clock, NotificationKind};
use crate::upload::{FileUploadValidator, FILE_ACCEPTED_MESSAGE};
use crate::validator::{FieldValidator, ValidationResult, Validator};

/// Notification shown when a submission is blocked.
pub const SUBMIT_BLOCKED_MESSAGE: &str = "Please correct the errors in the form";

/// Where a form is in its submit cycle.
///
/// ```text
/// Idle --submit--> Validating --> Accepted | Rejected --> Idle
/// ```
///
/// The terminal states are transient: the gate returns to `Idle` before
/// `submit` returns, ready for the next attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// Waiting for a submit attempt
    Idle,
    /// Running every field through the validator
    Validating,
    /// All fields passed; the submission proceeds
    Accepted,
    /// At least one field failed; the submission is blocked
    Rejected,
}

impl fmt::Display for GateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateState::Idle => write!(f, "idle"),
            GateState::Validating => write!(f, "validating"),
            GateState::Accepted => write!(f, "accepted"),
            GateState::Rejected => write!(f, "rejected"),
        }
    }
}

/// Result of one submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReport {
    /// The form that was submitted
    pub form: NodeId,
    /// `Accepted` or `Rejected`
    pub outcome: GateState,
    /// Every failing field with its rejection, in field order
    pub failures: Vec<(NodeId, Rejection)>,
}

impl SubmitReport {
    /// Returns true if the submission may proceed.
    pub fn is_accepted(&self) -> bool {
        self.outcome == GateState::Accepted
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Handler {
    Submit { form: NodeId },
    Validate { form: NodeId, field: NodeId },
    ClearError { field: NodeId },
    CheckFile { field: NodeId },
}

/// Decides whether forms may submit, and keeps fields' error state current.
///
/// The gatekeeper owns the page's [`GuardContext`]. Attaching to a form
/// injects the shared token (once), and registers handlers:
/// - `submit` on the form: re-validate every field, block on any failure
/// - `blur` on each field: validate and show/clear its error
/// - `input` on each field: clear its error optimistically
/// - `change` on file inputs: run upload validation
///
/// Events are delivered through [`handle_event`](Self::handle_event); events
/// without a registered handler pass through untouched.
///
/// # Examples
///
/// ```
/// use form_guard::{
///     Event, EventOutcome, FieldType, FormGatekeeper, GuardConfig, GuardContext,
///     ManualClock, MemoryDocument,
/// };
///
/// let mut doc = MemoryDocument::new();
/// let form = doc.add_form();
/// let name = doc.add_field(form, FieldType::Text, "name");
/// doc.set_required(name, true);
///
/// let mut gate = FormGatekeeper::new(GuardContext::new(GuardConfig::default(), ManualClock::new()));
/// gate.install(&mut doc);
///
/// assert_eq!(gate.handle_event(&mut doc, Event::submit(form)), EventOutcome::PreventDefault);
///
/// doc.set_value(name, "Ada");
/// assert_eq!(gate.handle_event(&mut doc, Event::submit(form)), EventOutcome::Proceed);
/// ```
#[derive(Debug)]
pub struct FormGatekeeper<C: Clock> {
    ctx: GuardContext<C>,
    fields: FieldValidator,
    files: FileUploadValidator,
    errors: FieldErrorState,
    handlers: HashMap<(NodeId, EventKind), Handler>,
    states: HashMap<NodeId, GateState>,
    reports: HashMap<NodeId, SubmitReport>,
    toggles: PasswordToggles,
}

impl<C: Clock> FormGatekeeper<C> {
    /// Creates a gatekeeper for the page described by `ctx`.
    pub fn new(ctx: GuardContext<C>) -> Self {
        let files = FileUploadValidator::from_config(ctx.config());
        Self {
            ctx,
            fields: FieldValidator,
            files,
            errors: FieldErrorState,
            handlers: HashMap::new(),
            states: HashMap::new(),
            reports: HashMap::new(),
            toggles: PasswordToggles::new(),
        }
    }

    /// The page context.
    pub fn ctx(&self) -> &GuardContext<C> {
        &self.ctx
    }

    /// Page-load setup: forms, file inputs, secure links, password toggles.
    ///
    /// Safe to call again after the page gains new elements; existing wiring
    /// is not duplicated.
    pub fn install<D: Document + EventSource + ?Sized>(&mut self, doc: &mut D) {
        let forms = doc.forms();
        for form in &forms {
            self.attach(doc, *form);
        }

        let file_inputs = doc.file_inputs();
        for field in &file_inputs {
            self.wire_file_input(doc, *field);
        }

        let links = mark_secure_links(doc);
        let toggles = self.toggles.install(doc);

        tracing::info!(
            forms = forms.len(),
            file_inputs = file_inputs.len(),
            secure_links = links,
            password_toggles = toggles,
            "form guard installed"
        );
    }

    /// Injects the token into `form` and wires its submit and field handlers.
    ///
    /// File inputs inside the form also get their `change` handler, so a form
    /// added after [`install`](Self::install) can be attached on its own.
    ///
    /// Returns true if the token was injected by this call.
    pub fn attach<D: Document + EventSource + ?Sized>(&mut self, doc: &mut D, form: NodeId) -> bool {
        let log = FormLog::new(form);
        let injected = self.inject_token(doc, form);

        self.register(doc, form, EventKind::Submit, Handler::Submit { form });
        for field in doc.fields(form) {
            self.register(doc, field, EventKind::Blur, Handler::Validate { form, field });
            self.register(doc, field, EventKind::Input, Handler::ClearError { field });
            if doc.field(field).is_some_and(|f| f.field_type() == FieldType::File) {
                self.wire_file_input(doc, field);
            }
        }
        self.states.entry(form).or_insert(GateState::Idle);

        log.debug(format_args!("attached (token injected: {})", injected));
        injected
    }

    /// Wires upload validation to a file input's `change` event.
    pub fn wire_file_input<D: Document + EventSource + ?Sized>(&mut self, doc: &mut D, field: NodeId) {
        self.register(doc, field, EventKind::Change, Handler::CheckFile { field });
    }

    fn register<D: EventSource + ?Sized>(
        &mut self,
        doc: &mut D,
        target: NodeId,
        kind: EventKind,
        handler: Handler,
    ) {
        if self.handlers.insert((target, kind), handler).is_none() {
            doc.subscribe(target, kind);
        }
    }

    fn inject_token<D: Document + ?Sized>(&self, doc: &mut D, form: NodeId) -> bool {
        let name = self.ctx.config().token_field();
        if doc.hidden_input(form, name).is_some() {
            return false;
        }

        let injected = doc.insert_hidden_input(form, name, self.ctx.token().expose());
        if injected {
            self.ctx
                .audit()
                .record(GuardEvent::new(GuardEventKind::TokenInjected).with_form(form));
        }
        injected
    }

    /// Routes a host event to its handler.
    ///
    /// Only a blocked submission returns [`EventOutcome::PreventDefault`].
    pub fn handle_event<D: Document + ?Sized>(&mut self, doc: &mut D, event: Event) -> EventOutcome {
        if event.kind == EventKind::Click {
            if let Some(next) = self.toggles.toggle(doc, event.target) {
                tracing::debug!(toggle = %event.target, now = %next, "password visibility toggled");
            }
            return EventOutcome::Proceed;
        }

        let Some(handler) = self.handlers.get(&(event.target, event.kind)).copied() else {
            return EventOutcome::Proceed;
        };

        match handler {
            Handler::Submit { form } => {
                if self.submit(doc, form).is_accepted() {
                    EventOutcome::Proceed
                } else {
                    EventOutcome::PreventDefault
                }
            }
            Handler::Validate { form, field } => {
                self.validate_field(doc, form, field);
                EventOutcome::Proceed
            }
            Handler::ClearError { field } => {
                self.errors.clear(doc, field);
                EventOutcome::Proceed
            }
            Handler::CheckFile { field } => {
                self.check_file(doc, field);
                EventOutcome::Proceed
            }
        }
    }

    /// Validates one field and reflects the result on the page.
    pub fn validate_field<D: Document + ?Sized>(
        &mut self,
        doc: &mut D,
        form: NodeId,
        field: NodeId,
    ) -> ValidationResult {
        let Some(snapshot) = doc.field(field) else {
            return ValidationResult::accept();
        };

        let result = self.fields.validate(&snapshot);
        self.errors.reflect(doc, field, &result);

        if let Some(kind) = result.kind() {
            self.ctx.audit().record(
                GuardEvent::new(GuardEventKind::FieldRejected)
                    .with_form(form)
                    .with_field(field)
                    .with_rule(kind),
            );
        }
        result
    }

    /// Runs a submit attempt for `form`.
    ///
    /// Every field is validated again, even ones that passed on blur, since a
    /// script may have changed them since.
    pub fn submit<D: Document + ?Sized>(&mut self, doc: &mut D, form: NodeId) -> SubmitReport {
        let log = FormLog::new(form);
        self.transition(&log, form, GateState::Validating);

        let mut failures = Vec::new();
        for field in doc.fields(form) {
            let result = self.validate_field(doc, form, field);
            if let Some(rejection) = result.rejection() {
                failures.push((field, rejection.clone()));
            }
        }

        let outcome = if failures.is_empty() {
            GateState::Accepted
        } else {
            GateState::Rejected
        };
        self.transition(&log, form, outcome);

        if outcome == GateState::Accepted {
            log.info(format_args!("submission accepted"));
            self.ctx
                .audit()
                .record(GuardEvent::new(GuardEventKind::SubmitAccepted).with_form(form));
        } else {
            log.warn(format_args!("submission blocked: {} field(s) invalid", failures.len()));
            self.ctx.audit().record(
                GuardEvent::new(GuardEventKind::SubmitPrevented)
                    .with_form(form)
                    .with_failures(failures.len()),
            );
            self.ctx.notifications_mut().notify(
                doc,
                SUBMIT_BLOCKED_MESSAGE,
                NotificationKind::Error,
            );
        }

        self.transition(&log, form, GateState::Idle);

        let report = SubmitReport {
            form,
            outcome,
            failures,
        };
        self.reports.insert(form, report.clone());
        report
    }

    fn transition(&mut self, log: &FormLog, form: NodeId, to: GateState) {
        let from = self.states.insert(form, to).unwrap_or(GateState::Idle);
        log.debug(format_args!("gate {} -> {}", from, to));
    }

    /// Validates the file selected in `field`.
    ///
    /// A rejected file is cleared from the input so it cannot be submitted
    /// unnoticed; an accepted one triggers a success notification.
    pub fn check_file<D: Document + ?Sized>(&mut self, doc: &mut D, field: NodeId) -> ValidationResult {
        let selected = doc.selected_file(field);
        let result = self.files.validate(&selected);

        match (&selected, result.rejection()) {
            (None, _) => {
                self.errors.clear(doc, field);
            }
            (Some(_), Some(rejection)) => {
                doc.clear_file_selection(field);
                self.errors.show(doc, field, &rejection.message);
                self.ctx.notifications_mut().notify(
                    doc,
                    rejection.message.clone(),
                    NotificationKind::Error,
                );
                tracing::warn!(field = %field, rule = %rejection.kind, "file rejected");
                self.ctx.audit().record(
                    GuardEvent::new(GuardEventKind::FileRejected)
                        .with_field(field)
                        .with_rule(rejection.kind),
                );
            }
            (Some(_), None) => {
                self.errors.clear(doc, field);
                self.ctx.notifications_mut().notify(
                    doc,
                    FILE_ACCEPTED_MESSAGE,
                    NotificationKind::Success,
                );
                self.ctx
                    .audit()
                    .record(GuardEvent::new(GuardEventKind::FileAccepted).with_field(field));
            }
        }

        result
    }

    /// Runs due notification expiries; call from the host's timer loop.
    pub fn run_timers<D: Document + ?Sized>(&mut self, doc: &mut D) -> usize {
        self.ctx.notifications_mut().run_due(doc)
    }

    /// Current state of `form`; `None` if it was never attached or submitted.
    pub fn state(&self, form: NodeId) -> Option<GateState> {
        self.states.get(&form).copied()
    }

    /// The most recent submit report for `form`.
    pub fn last_report(&self, form: NodeId) -> Option<&SubmitReport> {
        self.reports.get(&form)
    }

    /// Returns true if a handler is registered for `kind` on `target`.
    pub fn is_wired(&self, target: NodeId, kind: EventKind) -> bool {
        self.handlers.contains_key(&(target, kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GuardConfig;
    use crate::dom::MemoryDocument;
    use crate::error::RejectionKind;
    use crate::notify::ManualClock;
    use crate::upload::FileDescriptor;
    use crate::validator::{INVALID_EMAIL_MESSAGE, REQUIRED_MESSAGE};

    fn gate() -> FormGatekeeper<ManualClock> {
        FormGatekeeper::new(GuardContext::new(GuardConfig::default(), ManualClock::new()))
    }

    #[test]
    fn attach_injects_token_once() {
        let mut doc = MemoryDocument::new();
        let form = doc.add_form();
        let mut gate = gate();

        assert!(gate.attach(&mut doc, form));
        assert!(!gate.attach(&mut doc, form));

        let hidden = doc.hidden_inputs(form);
        assert_eq!(hidden.len(), 1);
        assert_eq!(hidden[0].0, "csrf_token");
        assert!(gate.ctx().token().matches(hidden[0].1));
        assert_eq!(gate.ctx().audit().count(GuardEventKind::TokenInjected), 1);
    }

    #[test]
    fn attach_respects_existing_token_field() {
        let mut doc = MemoryDocument::new();
        let form = doc.add_form();
        doc.insert_hidden_input(form, "csrf_token", "server-issued");
        let mut gate = gate();

        assert!(!gate.attach(&mut doc, form));
        assert_eq!(doc.hidden_inputs(form), vec![("csrf_token", "server-issued")]);
    }

    #[test]
    fn attach_wires_submit_blur_and_input() {
        let mut doc = MemoryDocument::new();
        let form = doc.add_form();
        let name = doc.add_field(form, FieldType::Text, "name");
        let mut gate = gate();

        gate.attach(&mut doc, form);

        assert!(doc.is_subscribed(form, EventKind::Submit));
        assert!(doc.is_subscribed(name, EventKind::Blur));
        assert!(doc.is_subscribed(name, EventKind::Input));
        assert_eq!(gate.state(form), Some(GateState::Idle));

        let before = doc.subscription_count();
        gate.attach(&mut doc, form);
        assert_eq!(doc.subscription_count(), before);
    }

    #[test]
    fn blur_shows_error_and_input_clears_it() {
        let mut doc = MemoryDocument::new();
        let form = doc.add_form();
        let email = doc.add_field(form, FieldType::Email, "email");
        doc.set_value(email, "nope");
        let mut gate = gate();
        gate.attach(&mut doc, form);

        gate.handle_event(&mut doc, Event::blur(email));
        assert_eq!(doc.error_message(email), Some(INVALID_EMAIL_MESSAGE));

        doc.set_value(email, "nope@");
        gate.handle_event(&mut doc, Event::input(email));
        assert_eq!(doc.error_message(email), None);
        assert!(!doc.field(email).unwrap().has_error());
    }

    #[test]
    fn repeated_blur_keeps_single_annotation() {
        let mut doc = MemoryDocument::new();
        let form = doc.add_form();
        let name = doc.add_field(form, FieldType::Text, "name");
        doc.set_required(name, true);
        let mut gate = gate();
        gate.attach(&mut doc, form);

        gate.handle_event(&mut doc, Event::blur(name));
        gate.handle_event(&mut doc, Event::blur(name));

        assert_eq!(doc.annotations(name).len(), 1);
    }

    #[test]
    fn submit_blocks_and_reports_every_failure() {
        let mut doc = MemoryDocument::new();
        let form = doc.add_form();
        let name = doc.add_field(form, FieldType::Text, "name");
        let email = doc.add_field(form, FieldType::Email, "email");
        doc.set_required(name, true);
        doc.set_value(email, "bad");
        let mut gate = gate();
        gate.attach(&mut doc, form);

        let outcome = gate.handle_event(&mut doc, Event::submit(form));

        assert_eq!(outcome, EventOutcome::PreventDefault);
        assert_eq!(doc.error_message(name), Some(REQUIRED_MESSAGE));
        assert_eq!(doc.error_message(email), Some(INVALID_EMAIL_MESSAGE));

        let report = gate.last_report(form).unwrap();
        assert_eq!(report.outcome, GateState::Rejected);
        let kinds: Vec<_> = report.failures.iter().map(|(_, r)| r.kind).collect();
        assert_eq!(kinds, vec![RejectionKind::Required, RejectionKind::InvalidEmail]);

        assert_eq!(doc.notifications().len(), 1);
        assert_eq!(doc.notifications()[0].text(), SUBMIT_BLOCKED_MESSAGE);
        assert_eq!(doc.notifications()[0].kind(), NotificationKind::Error);
        assert_eq!(gate.state(form), Some(GateState::Idle));
    }

    #[test]
    fn submit_revalidates_programmatic_changes() {
        let mut doc = MemoryDocument::new();
        let form = doc.add_form();
        let name = doc.add_field(form, FieldType::Text, "name");
        doc.set_required(name, true);
        doc.set_value(name, "Ada");
        let mut gate = gate();
        gate.attach(&mut doc, form);

        gate.handle_event(&mut doc, Event::blur(name));
        assert_eq!(doc.error_message(name), None);

        // Changed by script, no blur
        doc.set_value(name, "   ");

        assert_eq!(
            gate.handle_event(&mut doc, Event::submit(form)),
            EventOutcome::PreventDefault
        );
    }

    #[test]
    fn accepted_submit_clears_stale_errors() {
        let mut doc = MemoryDocument::new();
        let form = doc.add_form();
        let name = doc.add_field(form, FieldType::Text, "name");
        doc.set_required(name, true);
        let mut gate = gate();
        gate.attach(&mut doc, form);

        gate.handle_event(&mut doc, Event::submit(form));
        doc.set_value(name, "Ada");

        let report = gate.submit(&mut doc, form);

        assert!(report.is_accepted());
        assert!(report.failures.is_empty());
        assert_eq!(doc.error_message(name), None);
        assert_eq!(gate.ctx().audit().count(GuardEventKind::SubmitAccepted), 1);
        assert_eq!(gate.ctx().audit().count(GuardEventKind::SubmitPrevented), 1);
    }

    #[test]
    fn unregistered_events_pass_through() {
        let mut doc = MemoryDocument::new();
        let form = doc.add_form();
        let mut gate = gate();

        assert_eq!(
            gate.handle_event(&mut doc, Event::submit(form)),
            EventOutcome::Proceed
        );
        assert!(gate.last_report(form).is_none());
        assert_eq!(gate.state(form), None);
    }

    #[test]
    fn rejected_file_is_cleared_and_notified() {
        let mut doc = MemoryDocument::new();
        let form = doc.add_form();
        let upload = doc.add_field(form, FieldType::File, "upload");
        let mut gate = gate();
        gate.install(&mut doc);

        doc.select_file(upload, "cat.gif", FileDescriptor::new("image/gif", 1024));
        gate.handle_event(&mut doc, Event::change(upload));

        assert!(doc.selected_file(upload).is_none());
        assert_eq!(doc.field(upload).unwrap().value(), "");
        assert!(doc.error_message(upload).unwrap().starts_with("Invalid file type"));
        assert_eq!(doc.notifications()[0].kind(), NotificationKind::Error);
        assert_eq!(gate.ctx().audit().count(GuardEventKind::FileRejected), 1);
    }

    #[test]
    fn accepted_file_notifies_success() {
        let mut doc = MemoryDocument::new();
        let form = doc.add_form();
        let upload = doc.add_field(form, FieldType::File, "upload");
        let mut gate = gate();
        gate.install(&mut doc);

        doc.select_file(upload, "scan.pdf", FileDescriptor::new("application/pdf", 2048));
        gate.handle_event(&mut doc, Event::change(upload));

        assert!(doc.selected_file(upload).is_some());
        assert_eq!(doc.error_message(upload), None);
        assert_eq!(doc.notifications()[0].text(), FILE_ACCEPTED_MESSAGE);
        assert_eq!(doc.notifications()[0].kind(), NotificationKind::Success);
    }

    #[test]
    fn empty_file_input_is_silent() {
        let mut doc = MemoryDocument::new();
        let form = doc.add_form();
        let upload = doc.add_field(form, FieldType::File, "upload");
        let mut gate = gate();
        gate.install(&mut doc);

        let result = gate.check_file(&mut doc, upload);

        assert!(result.is_valid());
        assert!(doc.notifications().is_empty());
    }

    #[test]
    fn click_on_toggle_flips_password_visibility() {
        let mut doc = MemoryDocument::new();
        let form = doc.add_form();
        let pw = doc.add_field(form, FieldType::Password, "pw");
        let mut gate = gate();
        gate.install(&mut doc);

        let toggle = doc.toggle_of(pw).unwrap();
        assert_eq!(
            gate.handle_event(&mut doc, Event::click(toggle)),
            EventOutcome::Proceed
        );
        assert_eq!(doc.field(pw).unwrap().field_type(), FieldType::Text);
    }

    #[test]
    fn attach_alone_wires_file_inputs() {
        let mut doc = MemoryDocument::new();
        let form = doc.add_form();
        let upload = doc.add_field(form, FieldType::File, "upload");
        let mut gate = gate();

        gate.attach(&mut doc, form);

        assert!(gate.is_wired(upload, EventKind::Change));
        assert!(doc.is_subscribed(upload, EventKind::Change));

        doc.select_file(upload, "cat.gif", FileDescriptor::new("image/gif", 1024));
        gate.handle_event(&mut doc, Event::change(upload));
        assert!(doc.selected_file(upload).is_none());
    }

    #[test]
    fn huge_notification_ttl_does_not_panic_on_submit() {
        let config = GuardConfig::builder()
            .notification_ttl(std::time::Duration::MAX)
            .build()
            .unwrap();
        let clock = ManualClock::new();
        let mut doc = MemoryDocument::new();
        let form = doc.add_form();
        let name = doc.add_field(form, FieldType::Text, "name");
        doc.set_required(name, true);
        let mut gate = FormGatekeeper::new(GuardContext::new(config, clock.clone()));
        gate.install(&mut doc);

        clock.advance(std::time::Duration::from_secs(1));
        let outcome = gate.handle_event(&mut doc, Event::submit(form));

        assert_eq!(outcome, EventOutcome::PreventDefault);
        assert_eq!(doc.notifications().len(), 1);
        assert_eq!(gate.run_timers(&mut doc), 0);
    }

    #[test]
    fn install_is_idempotent() {
        let mut doc = MemoryDocument::new();
        let form = doc.add_form();
        doc.add_field(form, FieldType::Password, "pw");
        let link = doc.add_link("https://example.com");
        let mut gate = gate();

        gate.install(&mut doc);
        let subscriptions = doc.subscription_count();
        gate.install(&mut doc);

        assert_eq!(doc.subscription_count(), subscriptions);
        assert_eq!(doc.hidden_inputs(form).len(), 1);
        assert_eq!(doc.link_markers(link), 1);
    }
}
