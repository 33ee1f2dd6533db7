//! Presentational helpers: secure-link markers and password toggles.
//!
//! Neither helper validates anything. They only decorate the page and are
//! installed by [`FormGatekeeper::install`](crate::FormGatekeeper::install).

use std::collections::HashMap;

use crate::dom::{Document, EventKind, EventSource, NodeId};
use crate::field::FieldType;

/// Puts one marker after every `https` link; returns how many were added.
///
/// Links that already carry a marker are skipped.
pub fn mark_secure_links<D: Document + ?Sized>(doc: &mut D) -> usize {
    let mut marked = 0;
    for link in doc.secure_links() {
        if !doc.has_link_marker(link) && doc.insert_link_marker(link) {
            marked += 1;
        }
    }
    marked
}

/// Show/hide toggles installed next to password fields.
///
/// Each toggle flips its field between `password` and `text`. The field's
/// value and error state are left alone.
///
/// # Examples
///
/// ```
/// use form_guard::{Document, FieldType, MemoryDocument, PasswordToggles};
///
/// let mut doc = MemoryDocument::new();
/// let form = doc.add_form();
/// let pw = doc.add_field(form, FieldType::Password, "pw");
///
/// let mut toggles = PasswordToggles::new();
/// assert_eq!(toggles.install(&mut doc), 1);
///
/// let toggle = doc.toggle_of(pw).unwrap();
/// assert_eq!(toggles.toggle(&mut doc, toggle), Some(FieldType::Text));
/// assert_eq!(toggles.toggle(&mut doc, toggle), Some(FieldType::Password));
/// ```
#[derive(Debug, Clone, Default)]
pub struct PasswordToggles {
    by_field: HashMap<NodeId, NodeId>,
    by_toggle: HashMap<NodeId, NodeId>,
}

impl PasswordToggles {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a toggle next to every password field that lacks one.
    ///
    /// Returns how many toggles were added.
    pub fn install<D: Document + EventSource + ?Sized>(&mut self, doc: &mut D) -> usize {
        let mut installed = 0;
        for field in doc.password_inputs() {
            if self.by_field.contains_key(&field) {
                continue;
            }
            if let Some(toggle) = doc.insert_toggle(field) {
                doc.subscribe(toggle, EventKind::Click);
                self.by_field.insert(field, toggle);
                self.by_toggle.insert(toggle, field);
                installed += 1;
            }
        }
        installed
    }

    /// The field controlled by `toggle`, if it is one of ours.
    pub fn field_for(&self, toggle: NodeId) -> Option<NodeId> {
        self.by_toggle.get(&toggle).copied()
    }

    /// Flips the field behind `toggle`; returns its new type.
    pub fn toggle<D: Document + ?Sized>(&self, doc: &mut D, toggle: NodeId) -> Option<FieldType> {
        let field = self.field_for(toggle)?;
        let current = doc.field(field)?.field_type();

        let next = match current {
            FieldType::Password => FieldType::Text,
            _ => FieldType::Password,
        };

        doc.set_field_type(field, next).then_some(next)
    }

    /// Number of installed toggles.
    pub fn len(&self) -> usize {
        self.by_field.len()
    }

    /// Returns true if no toggles are installed.
    pub fn is_empty(&self) -> bool {
        self.by_field.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemoryDocument;

    #[test]
    fn secure_links_are_marked_once() {
        let mut doc = MemoryDocument::new();
        let secure = doc.add_link("https://example.com/login");
        let plain = doc.add_link("http://example.com");

        assert_eq!(mark_secure_links(&mut doc), 1);
        assert_eq!(mark_secure_links(&mut doc), 0);

        assert_eq!(doc.link_markers(secure), 1);
        assert_eq!(doc.link_markers(plain), 0);
    }

    #[test]
    fn toggles_install_once_and_subscribe_click() {
        let mut doc = MemoryDocument::new();
        let form = doc.add_form();
        let pw = doc.add_field(form, FieldType::Password, "pw");
        let mut toggles = PasswordToggles::new();

        assert_eq!(toggles.install(&mut doc), 1);
        assert_eq!(toggles.install(&mut doc), 0);

        let toggle = doc.toggle_of(pw).unwrap();
        assert!(doc.is_subscribed(toggle, EventKind::Click));
        assert_eq!(toggles.field_for(toggle), Some(pw));
        assert_eq!(toggles.len(), 1);
    }

    #[test]
    fn toggle_keeps_value() {
        let mut doc = MemoryDocument::new();
        let form = doc.add_form();
        let pw = doc.add_field(form, FieldType::Password, "pw");
        doc.set_value(pw, "s3cret");
        let mut toggles = PasswordToggles::new();
        toggles.install(&mut doc);
        let toggle = doc.toggle_of(pw).unwrap();

        toggles.toggle(&mut doc, toggle);

        let field = doc.field(pw).unwrap();
        assert_eq!(field.field_type(), FieldType::Text);
        assert_eq!(field.value(), "s3cret");
    }

    #[test]
    fn unknown_toggle_is_ignored() {
        let mut doc = MemoryDocument::new();
        let toggles = PasswordToggles::new();

        assert_eq!(toggles.toggle(&mut doc, NodeId::new(77)), None);
        assert!(toggles.is_empty());
    }
}
