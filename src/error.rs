use std::fmt;

/// Errors that can occur in the form guard crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A field or file failed validation
    Rejected(Rejection),
    /// The guard configuration is invalid
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Rejected(r) => write!(f, "Validation rejected: {}", r),
            Error::Config(c) => write!(f, "Invalid configuration: {}", c),
        }
    }
}

impl std::error::Error for Error {}

impl From<Rejection> for Error {
    fn from(r: Rejection) -> Self {
        Error::Rejected(r)
    }
}

impl From<ConfigError> for Error {
    fn from(c: ConfigError) -> Self {
        Error::Config(c)
    }
}

/// A validation rejection with the user-facing message.
///
/// The message is what gets shown next to the field or in a notification.
/// It never echoes the rejected value back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    /// The rule that failed
    pub kind: RejectionKind,
    /// Human-readable message explaining the rejection
    pub message: String,
}

impl Rejection {
    /// Creates a new rejection.
    pub fn new(kind: RejectionKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Returns true if the rejection came from a file upload rule.
    pub fn is_file_rejection(&self) -> bool {
        matches!(
            self.kind,
            RejectionKind::DisallowedType | RejectionKind::TooLarge
        )
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for Rejection {}

/// The rule that rejected a field or file.
///
/// `InvalidEmail` and `Required` are field-level failures; `DisallowedType`
/// and `TooLarge` are upload failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectionKind {
    /// Email-typed field with a malformed address
    InvalidEmail,
    /// Required field left empty or whitespace-only
    Required,
    /// File MIME type not in the allow-list
    DisallowedType,
    /// File larger than the upload ceiling
    TooLarge,
}

impl fmt::Display for RejectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectionKind::InvalidEmail => write!(f, "invalid email"),
            RejectionKind::Required => write!(f, "required"),
            RejectionKind::DisallowedType => write!(f, "disallowed file type"),
            RejectionKind::TooLarge => write!(f, "file too large"),
        }
    }
}

/// Error returned when a [`GuardConfig`](crate::GuardConfig) fails to build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    kind: ConfigErrorKind,
    message: String,
}

impl ConfigError {
    /// Creates a new configuration error.
    pub fn new(kind: ConfigErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Returns the error kind.
    pub fn kind(&self) -> ConfigErrorKind {
        self.kind
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.kind)
    }
}

impl std::error::Error for ConfigError {}

/// Kind of configuration error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigErrorKind {
    /// Token prefix is empty
    EmptyTokenPrefix,
    /// Hidden token field name is empty
    EmptyTokenField,
    /// Upload ceiling is zero
    ZeroUploadLimit,
    /// No MIME types are allowed
    EmptyAllowList,
    /// Notification lifetime is zero
    ZeroNotificationTtl,
}

impl fmt::Display for ConfigErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTokenPrefix => write!(f, "empty token prefix"),
            Self::EmptyTokenField => write!(f, "empty token field"),
            Self::ZeroUploadLimit => write!(f, "zero upload limit"),
            Self::EmptyAllowList => write!(f, "empty allow-list"),
            Self::ZeroNotificationTtl => write!(f, "zero notification ttl"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_display_includes_kind_and_message() {
        let r = Rejection::new(RejectionKind::Required, "This field is required");
        assert_eq!(format!("{}", r), "required: This field is required");
    }

    #[test]
    fn file_rejections_are_classified() {
        assert!(Rejection::new(RejectionKind::TooLarge, "x").is_file_rejection());
        assert!(Rejection::new(RejectionKind::DisallowedType, "x").is_file_rejection());
        assert!(!Rejection::new(RejectionKind::InvalidEmail, "x").is_file_rejection());
    }

    #[test]
    fn error_wraps_both_sources() {
        let err: Error = Rejection::new(RejectionKind::InvalidEmail, "bad").into();
        assert!(format!("{}", err).starts_with("Validation rejected"));

        let err: Error = ConfigError::new(ConfigErrorKind::EmptyAllowList, "no types").into();
        assert_eq!(
            format!("{}", err),
            "Invalid configuration: no types (empty allow-list)"
        );
    }
}
