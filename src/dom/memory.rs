//! In-memory document for tests and headless hosts.

use std::collections::{BTreeMap, HashSet};

use crate::field::{Field, FieldType};
use crate::notify::Notification;
use crate::upload::FileDescriptor;

use super::{Document, EventKind, EventSource, NodeId};

#[derive(Debug, Clone)]
struct FormNode {
    fields: Vec<NodeId>,
    hidden: Vec<(String, String)>,
    submissions: usize,
}

#[derive(Debug, Clone)]
struct FieldNode {
    field: Field,
    annotations: Vec<String>,
    file: Option<FileDescriptor>,
    toggle: Option<NodeId>,
}

#[derive(Debug, Clone)]
struct LinkNode {
    href: String,
    markers: usize,
}

/// A document held entirely in memory.
///
/// `MemoryDocument` implements [`Document`] and [`EventSource`] over plain
/// owned data, so the guard can be driven without any browser. It also
/// exposes inspection helpers (annotations, notifications, subscriptions)
/// that make the guard's effects observable.
///
/// # Examples
///
/// ```
/// use form_guard::{Document, FieldType, MemoryDocument};
///
/// let mut doc = MemoryDocument::new();
/// let form = doc.add_form();
/// let email = doc.add_field(form, FieldType::Email, "email");
/// doc.set_value(email, "a@b.com");
///
/// assert_eq!(doc.fields(form), vec![email]);
/// assert_eq!(doc.field(email).unwrap().value(), "a@b.com");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    next_id: u64,
    forms: BTreeMap<NodeId, FormNode>,
    fields: BTreeMap<NodeId, FieldNode>,
    links: BTreeMap<NodeId, LinkNode>,
    notifications: Vec<(NodeId, Notification)>,
    subscriptions: HashSet<(NodeId, EventKind)>,
}

impl MemoryDocument {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&mut self) -> NodeId {
        self.next_id += 1;
        NodeId::new(self.next_id)
    }

    /// Adds an empty form.
    pub fn add_form(&mut self) -> NodeId {
        let id = self.allocate();
        self.forms.insert(
            id,
            FormNode {
                fields: Vec::new(),
                hidden: Vec::new(),
                submissions: 0,
            },
        );
        id
    }

    /// Adds a field to `form`.
    ///
    /// # Panics
    ///
    /// Panics if `form` was not created by this document.
    pub fn add_field(&mut self, form: NodeId, field_type: FieldType, name: &str) -> NodeId {
        assert!(self.forms.contains_key(&form), "unknown form {form}");

        let id = self.allocate();
        self.fields.insert(
            id,
            FieldNode {
                field: Field::new(id, field_type).with_name(name),
                annotations: Vec::new(),
                file: None,
                toggle: None,
            },
        );
        if let Some(node) = self.forms.get_mut(&form) {
            node.fields.push(id);
        }
        id
    }

    /// Adds a hyperlink.
    pub fn add_link(&mut self, href: &str) -> NodeId {
        let id = self.allocate();
        self.links.insert(
            id,
            LinkNode {
                href: href.to_string(),
                markers: 0,
            },
        );
        id
    }

    /// Sets a field's value, as typing or a script would.
    pub fn set_value(&mut self, field: NodeId, value: &str) {
        if let Some(node) = self.fields.get_mut(&field) {
            node.field = node.field.clone().with_value(value);
        }
    }

    /// Marks a field required or optional.
    pub fn set_required(&mut self, field: NodeId, required: bool) {
        if let Some(node) = self.fields.get_mut(&field) {
            node.field = node.field.clone().required(required);
        }
    }

    /// Selects a file in a file input; the input's value becomes `file_name`.
    pub fn select_file(&mut self, field: NodeId, file_name: &str, file: FileDescriptor) {
        if let Some(node) = self.fields.get_mut(&field) {
            node.field = node.field.clone().with_value(file_name);
            node.file = Some(file);
        }
    }

    /// Records that the host let `form` submit.
    pub fn record_submission(&mut self, form: NodeId) {
        if let Some(node) = self.forms.get_mut(&form) {
            node.submissions += 1;
        }
    }

    /// How many times `form` was actually submitted.
    pub fn submissions(&self, form: NodeId) -> usize {
        self.forms.get(&form).map_or(0, |f| f.submissions)
    }

    /// All hidden inputs of `form` as `(name, value)` pairs.
    pub fn hidden_inputs(&self, form: NodeId) -> Vec<(&str, &str)> {
        self.forms
            .get(&form)
            .map(|f| {
                f.hidden
                    .iter()
                    .map(|(n, v)| (n.as_str(), v.as_str()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// All error annotations currently next to `field`.
    pub fn annotations(&self, field: NodeId) -> &[String] {
        self.fields
            .get(&field)
            .map_or(&[][..], |f| f.annotations.as_slice())
    }

    /// The single error message next to `field`, if any.
    pub fn error_message(&self, field: NodeId) -> Option<&str> {
        self.annotations(field).last().map(String::as_str)
    }

    /// Notifications currently on the page, oldest first.
    pub fn notifications(&self) -> Vec<&Notification> {
        self.notifications.iter().map(|(_, n)| n).collect()
    }

    /// Number of markers inserted after `link`.
    pub fn link_markers(&self, link: NodeId) -> usize {
        self.links.get(&link).map_or(0, |l| l.markers)
    }

    /// The toggle control installed next to `field`, if any.
    pub fn toggle_of(&self, field: NodeId) -> Option<NodeId> {
        self.fields.get(&field).and_then(|f| f.toggle)
    }

    /// Returns true if something subscribed to `kind` events on `target`.
    pub fn is_subscribed(&self, target: NodeId, kind: EventKind) -> bool {
        self.subscriptions.contains(&(target, kind))
    }

    /// Number of distinct subscriptions.
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }
}

impl EventSource for MemoryDocument {
    fn subscribe(&mut self, target: NodeId, kind: EventKind) {
        self.subscriptions.insert((target, kind));
    }
}

impl Document for MemoryDocument {
    fn forms(&self) -> Vec<NodeId> {
        self.forms.keys().copied().collect()
    }

    fn fields(&self, form: NodeId) -> Vec<NodeId> {
        self.forms
            .get(&form)
            .map(|f| f.fields.clone())
            .unwrap_or_default()
    }

    fn file_inputs(&self) -> Vec<NodeId> {
        self.fields
            .iter()
            .filter(|(_, n)| n.field.field_type() == FieldType::File)
            .map(|(id, _)| *id)
            .collect()
    }

    fn password_inputs(&self) -> Vec<NodeId> {
        self.fields
            .iter()
            .filter(|(_, n)| n.field.field_type() == FieldType::Password)
            .map(|(id, _)| *id)
            .collect()
    }

    fn secure_links(&self) -> Vec<NodeId> {
        self.links
            .iter()
            .filter(|(_, l)| {
                l.href
                    .get(..6)
                    .is_some_and(|scheme| scheme.eq_ignore_ascii_case("https:"))
            })
            .map(|(id, _)| *id)
            .collect()
    }

    fn field(&self, id: NodeId) -> Option<Field> {
        self.fields.get(&id).map(|n| n.field.clone())
    }

    fn selected_file(&self, field: NodeId) -> Option<FileDescriptor> {
        self.fields.get(&field).and_then(|n| n.file.clone())
    }

    fn clear_file_selection(&mut self, field: NodeId) -> bool {
        match self.fields.get_mut(&field) {
            Some(node) => {
                node.file = None;
                node.field = node.field.clone().with_value("");
                true
            }
            None => false,
        }
    }

    fn hidden_input(&self, form: NodeId, name: &str) -> Option<String> {
        self.forms
            .get(&form)?
            .hidden
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
    }

    fn insert_hidden_input(&mut self, form: NodeId, name: &str, value: &str) -> bool {
        match self.forms.get_mut(&form) {
            Some(node) => {
                node.hidden.push((name.to_string(), value.to_string()));
                true
            }
            None => false,
        }
    }

    fn insert_error_annotation(&mut self, field: NodeId, message: &str) -> bool {
        match self.fields.get_mut(&field) {
            Some(node) => {
                node.annotations.push(message.to_string());
                true
            }
            None => false,
        }
    }

    fn remove_error_annotation(&mut self, field: NodeId) -> bool {
        self.fields
            .get_mut(&field)
            .and_then(|node| node.annotations.pop())
            .is_some()
    }

    fn set_error_flag(&mut self, field: NodeId, errored: bool) -> bool {
        match self.fields.get_mut(&field) {
            Some(node) => {
                node.field = node.field.clone().with_error_flag(errored);
                true
            }
            None => false,
        }
    }

    fn insert_notification(&mut self, notification: &Notification) -> NodeId {
        let id = self.allocate();
        self.notifications.push((id, notification.clone()));
        id
    }

    fn remove_notification(&mut self, node: NodeId) -> bool {
        let before = self.notifications.len();
        self.notifications.retain(|(id, _)| *id != node);
        self.notifications.len() != before
    }

    fn contains_notification(&self, node: NodeId) -> bool {
        self.notifications.iter().any(|(id, _)| *id == node)
    }

    fn has_link_marker(&self, link: NodeId) -> bool {
        self.link_markers(link) > 0
    }

    fn insert_link_marker(&mut self, link: NodeId) -> bool {
        match self.links.get_mut(&link) {
            Some(node) => {
                node.markers += 1;
                true
            }
            None => false,
        }
    }

    fn insert_toggle(&mut self, field: NodeId) -> Option<NodeId> {
        if !self.fields.contains_key(&field) {
            return None;
        }
        let id = self.allocate();
        if let Some(node) = self.fields.get_mut(&field) {
            node.toggle = Some(id);
        }
        Some(id)
    }

    fn set_field_type(&mut self, field: NodeId, field_type: FieldType) -> bool {
        match self.fields.get_mut(&field) {
            Some(node) => {
                let old = &node.field;
                let mut updated = Field::new(field, field_type)
                    .with_value(old.value())
                    .required(old.is_required())
                    .with_error_flag(old.has_error());
                if let Some(name) = old.name() {
                    updated = updated.with_name(name);
                }
                node.field = updated;
                true
            }
            None => false,
        }
    }
}
