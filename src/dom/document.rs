//! Collaborator traits and the identifiers and events they exchange.

use std::fmt;

use crate::field::{Field, FieldType};
use crate::notify::Notification;
use crate::upload::FileDescriptor;

/// Identifier of an element owned by the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    /// Wraps a raw element id.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw id.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The browser events the guard listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Form submission
    Submit,
    /// Field lost focus
    Blur,
    /// Field value edited
    Input,
    /// File selection changed
    Change,
    /// Control clicked
    Click,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Submit => write!(f, "submit"),
            EventKind::Blur => write!(f, "blur"),
            EventKind::Input => write!(f, "input"),
            EventKind::Change => write!(f, "change"),
            EventKind::Click => write!(f, "click"),
        }
    }
}

/// A single event delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    /// Element the event fired on
    pub target: NodeId,
    /// What happened
    pub kind: EventKind,
}

impl Event {
    /// Creates an event.
    pub fn new(target: NodeId, kind: EventKind) -> Self {
        Self { target, kind }
    }

    /// A submit event on `form`.
    pub fn submit(form: NodeId) -> Self {
        Self::new(form, EventKind::Submit)
    }

    /// A blur event on `field`.
    pub fn blur(field: NodeId) -> Self {
        Self::new(field, EventKind::Blur)
    }

    /// An input event on `field`.
    pub fn input(field: NodeId) -> Self {
        Self::new(field, EventKind::Input)
    }

    /// A change event on `field`.
    pub fn change(field: NodeId) -> Self {
        Self::new(field, EventKind::Change)
    }

    /// A click event on `control`.
    pub fn click(control: NodeId) -> Self {
        Self::new(control, EventKind::Click)
    }
}

/// What the host should do with the event's default action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// Let the default action run unmodified
    Proceed,
    /// Cancel the default action (e.g. block the form submission)
    PreventDefault,
}

/// Capability to register interest in events on an element.
///
/// The host must deliver every subscribed event, in order, to
/// [`FormGatekeeper::handle_event`](crate::FormGatekeeper::handle_event).
/// Subscribing twice to the same `(target, kind)` pair must not cause the
/// event to be delivered twice.
pub trait EventSource {
    /// Subscribes to `kind` events on `target`.
    fn subscribe(&mut self, target: NodeId, kind: EventKind);
}

/// The page as the guard sees it.
///
/// Reads return snapshots; writes are the only mutations the guard ever
/// performs on the page. Implementations should treat unknown ids as no-ops.
pub trait Document {
    /// All forms on the page, in document order.
    fn forms(&self) -> Vec<NodeId>;

    /// Input and textarea elements of `form` (hidden inputs excluded).
    fn fields(&self, form: NodeId) -> Vec<NodeId>;

    /// All file inputs on the page.
    fn file_inputs(&self) -> Vec<NodeId>;

    /// All password inputs on the page.
    fn password_inputs(&self) -> Vec<NodeId>;

    /// Hyperlinks whose target scheme is secure (`https`).
    fn secure_links(&self) -> Vec<NodeId>;

    /// Reads a field snapshot.
    fn field(&self, id: NodeId) -> Option<Field>;

    /// Reads the file currently selected in a file input.
    fn selected_file(&self, field: NodeId) -> Option<FileDescriptor>;

    /// Clears a file input's selection and resets its value to empty.
    fn clear_file_selection(&mut self, field: NodeId) -> bool;

    /// Returns the value of the hidden input `name` in `form`, if present.
    fn hidden_input(&self, form: NodeId, name: &str) -> Option<String>;

    /// Inserts a hidden input into `form`.
    fn insert_hidden_input(&mut self, form: NodeId, name: &str, value: &str) -> bool;

    /// Inserts an error annotation next to `field`.
    fn insert_error_annotation(&mut self, field: NodeId, message: &str) -> bool;

    /// Removes the error annotation next to `field`; false if there was none.
    fn remove_error_annotation(&mut self, field: NodeId) -> bool;

    /// Sets or clears the field's errored marker.
    fn set_error_flag(&mut self, field: NodeId, errored: bool) -> bool;

    /// Inserts a page-level notification element and returns its id.
    fn insert_notification(&mut self, notification: &Notification) -> NodeId;

    /// Removes a notification element; false if it was already gone.
    fn remove_notification(&mut self, node: NodeId) -> bool;

    /// Returns true if the notification element is still on the page.
    fn contains_notification(&self, node: NodeId) -> bool;

    /// Returns true if `link` already carries a secure marker.
    fn has_link_marker(&self, link: NodeId) -> bool;

    /// Inserts a decorative marker after `link`.
    fn insert_link_marker(&mut self, link: NodeId) -> bool;

    /// Inserts a visibility toggle next to `field` and returns its id.
    fn insert_toggle(&mut self, field: NodeId) -> Option<NodeId>;

    /// Changes the input type of `field` (used to reveal/hide passwords).
    fn set_field_type(&mut self, field: NodeId, field_type: FieldType) -> bool;
}
