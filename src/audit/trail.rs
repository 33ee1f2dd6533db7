//! In-memory audit trail recorder.

use std::cell::RefCell;

use super::{GuardEvent, GuardEventKind};

/// In-memory recorder for guard events.
///
/// Every recorded event is also emitted through `tracing`. Events are kept
/// for the page lifetime only.
///
/// # Example
///
/// ```
/// use form_guard::audit::{AuditTrail, GuardEvent, GuardEventKind};
///
/// let trail = AuditTrail::new();
/// trail.record(GuardEvent::new(GuardEventKind::SubmitAccepted));
///
/// assert_eq!(trail.len(), 1);
/// assert_eq!(trail.count(GuardEventKind::SubmitAccepted), 1);
/// ```
#[derive(Debug)]
pub struct AuditTrail {
    events: RefCell<Vec<GuardEvent>>,
}

impl AuditTrail {
    /// Creates an empty trail.
    pub fn new() -> Self {
        Self {
            events: RefCell::new(Vec::new()),
        }
    }

    /// Emits and stores an event.
    pub fn record(&self, event: GuardEvent) {
        event.emit();
        self.events.borrow_mut().push(event);
    }

    /// Returns a snapshot of all recorded events, oldest first.
    pub fn events(&self) -> Vec<GuardEvent> {
        self.events.borrow().clone()
    }

    /// Number of recorded events of `kind`.
    pub fn count(&self, kind: GuardEventKind) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|e| e.kind() == kind)
            .count()
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    /// Returns true if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    /// Drops all recorded events.
    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl Default for AuditTrail {
    fn default() -> Self {
        Self::new()
    }
}
