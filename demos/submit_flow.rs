//! Submit flow demonstration.
//!
//! This example drives the guard against an in-memory page:
//! 1. Install the guard (token injection, handler wiring, decorations)
//! 2. Attempt a submission with invalid fields
//! 3. Fix the fields and submit again
//! 4. Pick an oversized file, then a valid one
//! 5. Let notifications expire and inspect the audit trail
//!
//! Run with: `cargo run --example submit_flow`

use std::time::Duration;

use form_guard::{
    Event, EventKind, EventOutcome, FieldType, FileDescriptor, FormGatekeeper, GuardConfig,
    GuardContext, ManualClock, MemoryDocument,
};

fn dispatch(
    gate: &mut FormGatekeeper<ManualClock>,
    doc: &mut MemoryDocument,
    event: Event,
) -> EventOutcome {
    let outcome = gate.handle_event(doc, event);
    if event.kind == EventKind::Submit && outcome == EventOutcome::Proceed {
        doc.record_submission(event.target);
    }
    outcome
}

fn print_notifications(doc: &MemoryDocument) {
    match doc.notifications().first() {
        Some(n) => println!("  notification [{}]: {}", n.kind(), n.text()),
        None => println!("  notification: (none)"),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    println!("=== Submit Flow Example ===\n");

    let clock = ManualClock::new();
    let mut doc = MemoryDocument::new();
    let form = doc.add_form();
    let name = doc.add_field(form, FieldType::Text, "name");
    let email = doc.add_field(form, FieldType::Email, "email");
    let resume = doc.add_field(form, FieldType::File, "resume");
    doc.add_field(form, FieldType::Password, "password");
    doc.add_link("https://careers.example.com/privacy");
    doc.set_required(name, true);
    doc.set_value(email, "not-an-email");

    let config = match GuardConfig::builder()
        .notification_ttl(Duration::from_secs(5))
        .build()
    {
        Ok(config) => config,
        Err(e) => {
            println!("✗ Invalid configuration: {}", e);
            return;
        }
    };

    let mut gate = FormGatekeeper::new(GuardContext::new(config, clock.clone()));

    // Scenario 1: Page load
    println!("--- Scenario 1: Install ---");
    gate.install(&mut doc);
    for (field, _) in doc.hidden_inputs(form) {
        println!("✓ Hidden field injected: {}", field);
    }
    println!("  token: {}", gate.ctx().token());

    // Scenario 2: Invalid submission
    println!("\n--- Scenario 2: Invalid submission ---");
    match dispatch(&mut gate, &mut doc, Event::submit(form)) {
        EventOutcome::PreventDefault => println!("✗ Submission blocked"),
        EventOutcome::Proceed => println!("✓ Submission sent"),
    }
    for field in [name, email] {
        if let Some(message) = doc.error_message(field) {
            println!("  {}: {}", field, message);
        }
    }
    print_notifications(&doc);

    // Scenario 3: Corrected submission
    println!("\n--- Scenario 3: Corrected submission ---");
    doc.set_value(name, "Ada Lovelace");
    dispatch(&mut gate, &mut doc, Event::input(name));
    doc.set_value(email, "ada@example.com");
    dispatch(&mut gate, &mut doc, Event::blur(email));
    match dispatch(&mut gate, &mut doc, Event::submit(form)) {
        EventOutcome::PreventDefault => println!("✗ Submission blocked"),
        EventOutcome::Proceed => println!("✓ Submission sent ({} total)", doc.submissions(form)),
    }

    // Scenario 4: File uploads
    println!("\n--- Scenario 4: File uploads ---");
    doc.select_file(resume, "scan.png", FileDescriptor::new("image/png", 8 * 1024 * 1024));
    dispatch(&mut gate, &mut doc, Event::change(resume));
    print_notifications(&doc);

    clock.advance(Duration::from_secs(2));
    doc.select_file(resume, "cv.pdf", FileDescriptor::new("application/pdf", 240 * 1024));
    dispatch(&mut gate, &mut doc, Event::change(resume));
    print_notifications(&doc);

    // Scenario 5: Expiry and audit
    println!("\n--- Scenario 5: Expiry and audit ---");
    clock.advance(Duration::from_secs(5));
    let removed = gate.run_timers(&mut doc);
    println!("✓ Expired {} notification(s)", removed);
    print_notifications(&doc);

    println!("\nAudit trail ({} events):", gate.ctx().audit().len());
    for event in gate.ctx().audit().events() {
        println!("  {}", event);
    }

    println!("\n=== Example Complete ===");
}
