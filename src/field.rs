use std::fmt;

use crate::dom::NodeId;

/// The kind of input control a field is.
///
/// Only the distinctions the guard acts on are kept; every other HTML input
/// type folds into [`FieldType::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// Plain text input or textarea
    Text,
    /// Email address input
    Email,
    /// Password input (value hidden)
    Password,
    /// File picker
    File,
    /// Any other control
    Other,
}

impl FieldType {
    /// Maps an HTML `type` attribute to a field type.
    ///
    /// Matching is case-insensitive. A missing or empty attribute means text.
    pub fn from_attr(attr: &str) -> Self {
        match attr.trim().to_ascii_lowercase().as_str() {
            "" | "text" | "textarea" => Self::Text,
            "email" => Self::Email,
            "password" => Self::Password,
            "file" => Self::File,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Text => write!(f, "text"),
            FieldType::Email => write!(f, "email"),
            FieldType::Password => write!(f, "password"),
            FieldType::File => write!(f, "file"),
            FieldType::Other => write!(f, "other"),
        }
    }
}

/// A snapshot of a user-input control read from the document.
///
/// The document owns the element; a `Field` is what validators see. The
/// `has_error` flag reflects the document and is only ever changed through
/// [`FieldErrorState`](crate::FieldErrorState).
///
/// # Examples
///
/// ```
/// use form_guard::{Field, FieldType, NodeId};
///
/// let field = Field::new(NodeId::new(1), FieldType::Email)
///     .with_value("a@b.com")
///     .required(true);
///
/// assert!(field.is_required());
/// assert_eq!(field.trimmed_value(), "a@b.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    id: NodeId,
    name: Option<String>,
    field_type: FieldType,
    value: String,
    required: bool,
    has_error: bool,
}

impl Field {
    /// Creates an empty, optional field.
    pub fn new(id: NodeId, field_type: FieldType) -> Self {
        Self {
            id,
            name: None,
            field_type,
            value: String::new(),
            required: false,
            has_error: false,
        }
    }

    /// Sets the field's name attribute.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the current value.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Marks the field as required or optional.
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub(crate) fn with_error_flag(mut self, has_error: bool) -> Self {
        self.has_error = has_error;
        self
    }

    /// Returns the element id.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Returns the name attribute, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the field type.
    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    /// Returns the raw value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns the value with surrounding whitespace removed.
    ///
    /// A byte-order mark (U+FEFF) counts as whitespace here.
    pub fn trimmed_value(&self) -> &str {
        self.value
            .trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}')
    }

    /// Returns true if the field must be filled in.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Returns true if the field currently shows an error.
    pub fn has_error(&self) -> bool {
        self.has_error
    }
}
