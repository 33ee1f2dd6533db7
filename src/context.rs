use crate::audit::AuditTrail;
use crate::config::GuardConfig;
use crate::notify::{Clock, NotificationCenter};
use crate::token::{CsrfToken, TokenProvider};

/// Everything that lives for exactly one page session.
///
/// `GuardContext` replaces a process-wide manager: it is built once at page
/// load and then owned by the [`FormGatekeeper`](crate::FormGatekeeper). It
/// holds the single page token, so every form on the page shares it.
///
/// # Examples
///
/// ```
/// use form_guard::{GuardConfig, GuardContext, ManualClock};
///
/// let ctx = GuardContext::new(GuardConfig::default(), ManualClock::new());
///
/// assert!(ctx.token().expose().starts_with("csrf_"));
/// assert!(ctx.audit().is_empty());
/// ```
#[derive(Debug)]
pub struct GuardContext<C: Clock> {
    config: GuardConfig,
    token: CsrfToken,
    notifications: NotificationCenter<C>,
    audit: AuditTrail,
}

impl<C: Clock> GuardContext<C> {
    /// Creates the page context and generates the page token.
    pub fn new(config: GuardConfig, clock: C) -> Self {
        let token = TokenProvider::new(config.token_prefix()).generate();
        Self::with_token(config, clock, token)
    }

    /// Creates the page context around an existing token.
    pub fn with_token(config: GuardConfig, clock: C, token: CsrfToken) -> Self {
        let notifications = NotificationCenter::new(clock, config.notification_ttl());
        tracing::debug!(
            token_field = %config.token_field(),
            max_upload_bytes = config.max_upload_bytes(),
            "page context created"
        );

        Self {
            config,
            token,
            notifications,
            audit: AuditTrail::new(),
        }
    }

    /// The page configuration.
    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    /// The page token.
    pub fn token(&self) -> &CsrfToken {
        &self.token
    }

    /// The notification center.
    pub fn notifications(&self) -> &NotificationCenter<C> {
        &self.notifications
    }

    /// Mutable access to the notification center.
    pub fn notifications_mut(&mut self) -> &mut NotificationCenter<C> {
        &mut self.notifications
    }

    /// The audit trail.
    pub fn audit(&self) -> &AuditTrail {
        &self.audit
    }
}
