use crate::config::{AllowedType, GuardConfig};
use crate::error::RejectionKind;
use crate::validator::{ValidationResult, Validator};

/// Message for the success notification after a file passes.
pub const FILE_ACCEPTED_MESSAGE: &str = "File validated successfully";

/// What the guard knows about a selected file.
///
/// Read from the file input at validation time. Validation never mutates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    /// MIME type declared by the browser for the file
    pub mime_type: String,
    /// File size in bytes
    pub size_bytes: u64,
}

impl FileDescriptor {
    /// Creates a descriptor.
    pub fn new(mime_type: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            mime_type: mime_type.into(),
            size_bytes,
        }
    }
}

/// Upload rules: type allow-list first, then size ceiling.
///
/// Validating `None` (no file selected) always accepts; an empty file input
/// is not an error by itself.
///
/// # Examples
///
/// ```
/// use form_guard::{FileDescriptor, FileUploadValidator, RejectionKind, Validator};
///
/// let validator = FileUploadValidator::default();
///
/// let png = FileDescriptor::new("image/png", 4 * 1024 * 1024);
/// assert!(validator.validate(&Some(png)).is_valid());
///
/// // Type is checked before size
/// let gif = FileDescriptor::new("image/gif", 6 * 1024 * 1024);
/// assert_eq!(
///     validator.validate(&Some(gif)).kind(),
///     Some(RejectionKind::DisallowedType)
/// );
///
/// assert!(validator.validate(&None).is_valid());
/// ```
#[derive(Debug, Clone)]
pub struct FileUploadValidator {
    allowed: Vec<AllowedType>,
    max_bytes: u64,
    type_message: String,
    size_message: String,
}

impl FileUploadValidator {
    /// Creates a validator from the guard configuration.
    pub fn from_config(config: &GuardConfig) -> Self {
        Self::new(config.allowed_types().to_vec(), config.max_upload_bytes())
    }

    /// Creates a validator from an explicit allow-list and ceiling.
    pub fn new(allowed: Vec<AllowedType>, max_bytes: u64) -> Self {
        let labels = allowed
            .iter()
            .map(|t| t.label.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let ceiling = format_size(max_bytes);

        Self {
            type_message: format!("Invalid file type. Allowed types: {labels} (max {ceiling})"),
            size_message: format!("File is too large. Maximum size is {ceiling}"),
            allowed,
            max_bytes,
        }
    }

    /// Returns true if `mime` is on the allow-list.
    ///
    /// Comparison ignores ASCII case and surrounding whitespace.
    pub fn is_allowed(&self, mime: &str) -> bool {
        let mime = mime.trim();
        self.allowed.iter().any(|t| t.mime.eq_ignore_ascii_case(mime))
    }

    /// Returns the upload ceiling in bytes.
    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Validates a selected file.
    pub fn validate_file(&self, file: &FileDescriptor) -> ValidationResult {
        if !self.is_allowed(&file.mime_type) {
            return ValidationResult::reject(RejectionKind::DisallowedType, &self.type_message);
        }

        if file.size_bytes > self.max_bytes {
            return ValidationResult::reject(RejectionKind::TooLarge, &self.size_message);
        }

        ValidationResult::accept()
    }
}

impl Default for FileUploadValidator {
    fn default() -> Self {
        Self::from_config(&GuardConfig::default())
    }
}

impl Validator<Option<FileDescriptor>> for FileUploadValidator {
    fn validate(&self, input: &Option<FileDescriptor>) -> ValidationResult {
        match input {
            None => ValidationResult::accept(),
            Some(file) => self.validate_file(file),
        }
    }
}

/// Renders a byte count the way users read limits: "5 MB", "512 KB".
fn format_size(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * 1024;

    if bytes >= MIB && bytes % MIB == 0 {
        format!("{} MB", bytes / MIB)
    } else if bytes >= KIB && bytes % KIB == 0 {
        format!("{} KB", bytes / KIB)
    } else {
        format!("{bytes} bytes")
    }
}
