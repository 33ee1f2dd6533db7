use std::fmt;

use crate::dom::NodeId;

/// A logging handle scoped to one form.
///
/// Every message carries the form id so a page with several forms can be
/// traced per form. Field values and the page token are never passed to it
/// by the guard.
#[derive(Debug, Clone, Copy)]
pub struct FormLog {
    form: NodeId,
}

impl FormLog {
    /// Creates a logger for `form`.
    pub fn new(form: NodeId) -> Self {
        Self { form }
    }

    /// Returns the form this logger is scoped to.
    pub fn form(&self) -> NodeId {
        self.form
    }

    /// Logs an info-level message with the form id.
    ///
    /// ```
    /// # use form_guard::{FormLog, NodeId};
    /// let log = FormLog::new(NodeId::new(1));
    /// log.info(format_args!("submission accepted"));
    /// ```
    pub fn info(&self, args: fmt::Arguments<'_>) {
        tracing::info!(form = %self.form, "{}", args);
    }

    /// Logs a warning-level message with the form id.
    pub fn warn(&self, args: fmt::Arguments<'_>) {
        tracing::warn!(form = %self.form, "{}", args);
    }

    /// Logs a debug-level message with the form id.
    pub fn debug(&self, args: fmt::Arguments<'_>) {
        tracing::debug!(form = %self.form, "{}", args);
    }
}
