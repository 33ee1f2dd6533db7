//! End-to-end flows through the gatekeeper against an in-memory page.

use std::time::Duration;

use form_guard::audit::GuardEventKind;
use form_guard::{
    Document, Event, EventKind, EventOutcome, FieldType, FileDescriptor, FormGatekeeper,
    GuardConfig, GuardContext, ManualClock, MemoryDocument, NodeId, NotificationKind,
    INVALID_EMAIL_MESSAGE, REQUIRED_MESSAGE, SUBMIT_BLOCKED_MESSAGE,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

fn guard(clock: &ManualClock) -> FormGatekeeper<ManualClock> {
    FormGatekeeper::new(GuardContext::new(GuardConfig::default(), clock.clone()))
}

/// Delivers an event the way a browser host would: only if subscribed, and
/// performing the default submission unless prevented.
fn dispatch(
    gate: &mut FormGatekeeper<ManualClock>,
    doc: &mut MemoryDocument,
    event: Event,
) -> EventOutcome {
    if !doc.is_subscribed(event.target, event.kind) {
        return EventOutcome::Proceed;
    }
    let outcome = gate.handle_event(doc, event);
    if event.kind == EventKind::Submit && outcome == EventOutcome::Proceed {
        doc.record_submission(event.target);
    }
    outcome
}

#[test]
fn invalid_form_is_blocked_with_both_errors() {
    init_tracing();
    let clock = ManualClock::new();
    let mut doc = MemoryDocument::new();
    let form = doc.add_form();
    let name = doc.add_field(form, FieldType::Text, "name");
    let email = doc.add_field(form, FieldType::Email, "email");
    doc.set_required(name, true);
    doc.set_value(email, "bad");

    let mut gate = guard(&clock);
    gate.install(&mut doc);

    let outcome = dispatch(&mut gate, &mut doc, Event::submit(form));

    assert_eq!(outcome, EventOutcome::PreventDefault);
    assert_eq!(doc.submissions(form), 0);
    assert_eq!(doc.error_message(name), Some(REQUIRED_MESSAGE));
    assert_eq!(doc.error_message(email), Some(INVALID_EMAIL_MESSAGE));
    assert!(doc.field(name).unwrap().has_error());
    assert!(doc.field(email).unwrap().has_error());

    let notifications = doc.notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].text(), SUBMIT_BLOCKED_MESSAGE);
    assert_eq!(notifications[0].kind(), NotificationKind::Error);
}

#[test]
fn corrected_form_submits() {
    init_tracing();
    let clock = ManualClock::new();
    let mut doc = MemoryDocument::new();
    let form = doc.add_form();
    let name = doc.add_field(form, FieldType::Text, "name");
    let email = doc.add_field(form, FieldType::Email, "email");
    doc.set_required(name, true);
    doc.set_value(email, "bad");

    let mut gate = guard(&clock);
    gate.install(&mut doc);
    dispatch(&mut gate, &mut doc, Event::submit(form));

    // User fixes both fields
    doc.set_value(name, "Grace");
    dispatch(&mut gate, &mut doc, Event::input(name));
    doc.set_value(email, "grace@navy.mil");
    dispatch(&mut gate, &mut doc, Event::input(email));
    dispatch(&mut gate, &mut doc, Event::blur(email));

    assert_eq!(doc.error_message(name), None);
    assert_eq!(doc.error_message(email), None);

    let outcome = dispatch(&mut gate, &mut doc, Event::submit(form));

    assert_eq!(outcome, EventOutcome::Proceed);
    assert_eq!(doc.submissions(form), 1);
    assert!(gate.last_report(form).unwrap().is_accepted());
}

#[test]
fn every_form_gets_the_same_single_token() {
    let clock = ManualClock::new();
    let mut doc = MemoryDocument::new();
    let forms: Vec<NodeId> = (0..3).map(|_| doc.add_form()).collect();

    let mut gate = guard(&clock);
    gate.install(&mut doc);
    gate.install(&mut doc);

    for form in &forms {
        let hidden = doc.hidden_inputs(*form);
        assert_eq!(hidden.len(), 1, "form {form} should carry one token field");
        assert_eq!(hidden[0].0, "csrf_token");
        assert!(gate.ctx().token().matches(hidden[0].1));
    }
    assert_eq!(
        gate.ctx().audit().count(GuardEventKind::TokenInjected),
        forms.len()
    );
}

#[test]
fn custom_token_field_name_is_used() {
    let config = GuardConfig::builder()
        .token_field("_authenticity")
        .build()
        .unwrap();
    let mut doc = MemoryDocument::new();
    let form = doc.add_form();

    let mut gate = FormGatekeeper::new(GuardContext::new(config, ManualClock::new()));
    gate.install(&mut doc);

    let token = doc.hidden_input(form, "_authenticity").unwrap();
    assert!(token.starts_with("csrf_"));
    assert!(doc.hidden_input(form, "csrf_token").is_none());
}

#[test]
fn notifications_replace_each_other_and_expire() {
    init_tracing();
    let clock = ManualClock::new();
    let mut doc = MemoryDocument::new();
    let form = doc.add_form();
    let upload = doc.add_field(form, FieldType::File, "upload");

    let mut gate = guard(&clock);
    gate.install(&mut doc);

    doc.select_file(upload, "huge.png", FileDescriptor::new("image/png", 6 * 1024 * 1024));
    dispatch(&mut gate, &mut doc, Event::change(upload));
    assert_eq!(doc.notifications()[0].kind(), NotificationKind::Error);

    clock.advance(Duration::from_secs(1));
    doc.select_file(upload, "ok.png", FileDescriptor::new("image/png", 1024));
    dispatch(&mut gate, &mut doc, Event::change(upload));

    let visible = doc.notifications();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].kind(), NotificationKind::Success);

    // First notification's expiry passes without touching the second
    clock.advance(Duration::from_secs(4));
    gate.run_timers(&mut doc);
    assert_eq!(doc.notifications().len(), 1);

    // Five seconds after the second call nothing is left
    clock.advance(Duration::from_secs(1));
    gate.run_timers(&mut doc);
    assert!(doc.notifications().is_empty());
}

#[test]
fn oversized_upload_is_cleared_before_submit() {
    let clock = ManualClock::new();
    let mut doc = MemoryDocument::new();
    let form = doc.add_form();
    let upload = doc.add_field(form, FieldType::File, "upload");
    doc.set_required(upload, true);

    let mut gate = guard(&clock);
    gate.install(&mut doc);

    doc.select_file(upload, "big.pdf", FileDescriptor::new("application/pdf", 5 * 1024 * 1024 + 1));
    dispatch(&mut gate, &mut doc, Event::change(upload));

    assert!(doc.selected_file(upload).is_none());
    assert!(doc
        .error_message(upload)
        .unwrap()
        .contains("Maximum size is 5 MB"));

    // The cleared required input now blocks the submission
    let outcome = dispatch(&mut gate, &mut doc, Event::submit(form));
    assert_eq!(outcome, EventOutcome::PreventDefault);
    assert_eq!(doc.error_message(upload), Some(REQUIRED_MESSAGE));
}

#[test]
fn page_decorations_are_installed() {
    let clock = ManualClock::new();
    let mut doc = MemoryDocument::new();
    let form = doc.add_form();
    let pw = doc.add_field(form, FieldType::Password, "password");
    doc.set_value(pw, "correct horse");
    let secure = doc.add_link("https://bank.example/login");
    let plain = doc.add_link("http://example.com");

    let mut gate = guard(&clock);
    gate.install(&mut doc);

    assert_eq!(doc.link_markers(secure), 1);
    assert_eq!(doc.link_markers(plain), 0);

    let toggle = doc.toggle_of(pw).unwrap();
    dispatch(&mut gate, &mut doc, Event::click(toggle));
    assert_eq!(doc.field(pw).unwrap().field_type(), FieldType::Text);
    dispatch(&mut gate, &mut doc, Event::click(toggle));
    assert_eq!(doc.field(pw).unwrap().field_type(), FieldType::Password);
    assert_eq!(doc.field(pw).unwrap().value(), "correct horse");
}

#[test]
fn audit_trail_never_holds_values_or_token() {
    let clock = ManualClock::new();
    let mut doc = MemoryDocument::new();
    let form = doc.add_form();
    let email = doc.add_field(form, FieldType::Email, "email");
    doc.set_value(email, "leak@me");

    let mut gate = guard(&clock);
    gate.install(&mut doc);
    dispatch(&mut gate, &mut doc, Event::submit(form));

    let token = gate.ctx().token().expose().to_string();
    for event in gate.ctx().audit().events() {
        let rendered = format!("{} {:?}", event, event);
        assert!(!rendered.contains("leak@me"));
        assert!(!rendered.contains(&token));
    }
    assert_eq!(gate.ctx().audit().count(GuardEventKind::SubmitPrevented), 1);
    assert_eq!(gate.ctx().audit().count(GuardEventKind::FieldRejected), 1);
}
