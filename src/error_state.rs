use crate::dom::{Document, NodeId};
use crate::validator::ValidationResult;

/// The only writer of per-field error state.
///
/// `show` replaces any existing annotation instead of stacking a second one,
/// so a field has at most one visible error at any time. `clear` removes the
/// annotation and the errored marker. Validators never touch error state;
/// they return results and callers reflect them here.
///
/// # Examples
///
/// ```
/// use form_guard::{FieldErrorState, FieldType, MemoryDocument};
///
/// let mut doc = MemoryDocument::new();
/// let form = doc.add_form();
/// let name = doc.add_field(form, FieldType::Text, "name");
///
/// FieldErrorState.show(&mut doc, name, "first");
/// FieldErrorState.show(&mut doc, name, "second");
///
/// assert_eq!(doc.annotations(name), ["second".to_string()]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldErrorState;

impl FieldErrorState {
    /// Shows `message` next to `field`, replacing any earlier message.
    pub fn show<D: Document + ?Sized>(&self, doc: &mut D, field: NodeId, message: &str) {
        doc.remove_error_annotation(field);
        doc.insert_error_annotation(field, message);
        doc.set_error_flag(field, true);
    }

    /// Removes any message next to `field` and unmarks it.
    pub fn clear<D: Document + ?Sized>(&self, doc: &mut D, field: NodeId) {
        doc.remove_error_annotation(field);
        doc.set_error_flag(field, false);
    }

    /// Shows the rejection message or clears, depending on `result`.
    ///
    /// Returns true if the field ended up valid.
    pub fn reflect<D: Document + ?Sized>(
        &self,
        doc: &mut D,
        field: NodeId,
        result: &ValidationResult,
    ) -> bool {
        match result.message() {
            Some(message) => {
                self.show(doc, field, message);
                false
            }
            None => {
                self.clear(doc, field);
                true
            }
        }
    }

    /// Returns true if the document marks `field` as errored.
    pub fn is_errored<D: Document + ?Sized>(&self, doc: &D, field: NodeId) -> bool {
        doc.field(field).is_some_and(|f| f.has_error())
    }
}
