use std::time::Duration;

use crate::error::{ConfigError, ConfigErrorKind};

/// Default prefix for generated tokens.
pub const DEFAULT_TOKEN_PREFIX: &str = "csrf_";

/// Default name of the hidden input carrying the token.
pub const DEFAULT_TOKEN_FIELD: &str = "csrf_token";

/// Default upload ceiling: 5 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

/// Default lifetime of a notification before it removes itself.
pub const DEFAULT_NOTIFICATION_TTL: Duration = Duration::from_secs(5);

/// A MIME type accepted for upload, with the short label shown to users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowedType {
    /// MIME type as declared by the selected file
    pub mime: String,
    /// Short label used in rejection messages (e.g. "PNG")
    pub label: String,
}

impl AllowedType {
    /// Creates an allow-list entry.
    pub fn new(mime: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            mime: mime.into(),
            label: label.into(),
        }
    }
}

/// The stock allow-list: JPEG, PNG, PDF, DOC and DOCX.
pub fn default_allowed_types() -> Vec<AllowedType> {
    vec![
        AllowedType::new("image/jpeg", "JPEG"),
        AllowedType::new("image/png", "PNG"),
        AllowedType::new("application/pdf", "PDF"),
        AllowedType::new("application/msword", "DOC"),
        AllowedType::new(
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            "DOCX",
        ),
    ]
}

/// Validated configuration for a page's guard.
///
/// Obtain one through [`GuardConfig::builder`] or [`GuardConfig::default`].
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use form_guard::GuardConfig;
///
/// let config = GuardConfig::builder()
///     .max_upload_bytes(1024 * 1024)
///     .notification_ttl(Duration::from_secs(3))
///     .build()
///     .expect("valid config");
///
/// assert_eq!(config.max_upload_bytes(), 1024 * 1024);
/// assert_eq!(config.allowed_types().len(), 5);
/// ```
#[derive(Debug, Clone)]
pub struct GuardConfig {
    token_prefix: String,
    token_field: String,
    max_upload_bytes: u64,
    allowed_types: Vec<AllowedType>,
    notification_ttl: Duration,
}

impl GuardConfig {
    /// Starts a builder seeded with the defaults.
    pub fn builder() -> GuardConfigBuilder {
        GuardConfigBuilder::new()
    }

    /// Prefix prepended to every generated token.
    pub fn token_prefix(&self) -> &str {
        &self.token_prefix
    }

    /// Name of the hidden input injected into forms.
    pub fn token_field(&self) -> &str {
        &self.token_field
    }

    /// Largest accepted upload, in bytes.
    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_bytes
    }

    /// Accepted upload types, in display order.
    pub fn allowed_types(&self) -> &[AllowedType] {
        &self.allowed_types
    }

    /// How long a notification stays visible.
    pub fn notification_ttl(&self) -> Duration {
        self.notification_ttl
    }
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            token_prefix: DEFAULT_TOKEN_PREFIX.to_string(),
            token_field: DEFAULT_TOKEN_FIELD.to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            allowed_types: default_allowed_types(),
            notification_ttl: DEFAULT_NOTIFICATION_TTL,
        }
    }
}

/// Builder for [`GuardConfig`].
///
/// Calling [`allow_type`](Self::allow_type) for the first time replaces the
/// stock allow-list; later calls extend it. Duplicate MIME types are dropped.
#[derive(Debug, Clone)]
pub struct GuardConfigBuilder {
    token_prefix: String,
    token_field: String,
    max_upload_bytes: u64,
    allowed_types: Vec<AllowedType>,
    custom_types: bool,
    notification_ttl: Duration,
}

impl GuardConfigBuilder {
    fn new() -> Self {
        let defaults = GuardConfig::default();
        Self {
            token_prefix: defaults.token_prefix,
            token_field: defaults.token_field,
            max_upload_bytes: defaults.max_upload_bytes,
            allowed_types: defaults.allowed_types,
            custom_types: false,
            notification_ttl: defaults.notification_ttl,
        }
    }

    /// Sets the token prefix.
    pub fn token_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.token_prefix = prefix.into();
        self
    }

    /// Sets the hidden input name used for the token.
    pub fn token_field(mut self, name: impl Into<String>) -> Self {
        self.token_field = name.into();
        self
    }

    /// Sets the upload ceiling in bytes.
    pub fn max_upload_bytes(mut self, bytes: u64) -> Self {
        self.max_upload_bytes = bytes;
        self
    }

    /// Adds an accepted upload type, deduplicating by MIME type.
    ///
    /// MIME types compare case-insensitively.
    pub fn allow_type(mut self, mime: impl Into<String>, label: impl Into<String>) -> Self {
        if !self.custom_types {
            self.allowed_types.clear();
            self.custom_types = true;
        }

        let entry = AllowedType::new(mime.into().to_ascii_lowercase(), label);
        if !self.allowed_types.iter().any(|t| t.mime == entry.mime) {
            self.allowed_types.push(entry);
        }
        self
    }

    /// Sets how long notifications stay visible.
    pub fn notification_ttl(mut self, ttl: Duration) -> Self {
        self.notification_ttl = ttl;
        self
    }

    /// Validates the accumulated settings and builds the config.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` for the first setting that is unusable.
    pub fn build(self) -> Result<GuardConfig, ConfigError> {
        if self.token_prefix.trim().is_empty() {
            return Err(ConfigError::new(
                ConfigErrorKind::EmptyTokenPrefix,
                "token prefix must not be empty",
            ));
        }
        if self.token_field.trim().is_empty() {
            return Err(ConfigError::new(
                ConfigErrorKind::EmptyTokenField,
                "token field name must not be empty",
            ));
        }
        if self.max_upload_bytes == 0 {
            return Err(ConfigError::new(
                ConfigErrorKind::ZeroUploadLimit,
                "upload ceiling must be greater than 0",
            ));
        }
        if self.allowed_types.is_empty() {
            return Err(ConfigError::new(
                ConfigErrorKind::EmptyAllowList,
                "at least one upload type must be allowed",
            ));
        }
        if self.notification_ttl.is_zero() {
            return Err(ConfigError::new(
                ConfigErrorKind::ZeroNotificationTtl,
                "notification lifetime must be greater than 0",
            ));
        }

        Ok(GuardConfig {
            token_prefix: self.token_prefix,
            token_field: self.token_field,
            max_upload_bytes: self.max_upload_bytes,
            allowed_types: self.allowed_types,
            notification_ttl: self.notification_ttl,
        })
    }
}
