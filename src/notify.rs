//! Transient page-level status messages.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::config::DEFAULT_NOTIFICATION_TTL;
use crate::dom::{Document, NodeId};

/// Source of the event loop's time, measured from page load.
pub trait Clock {
    /// Time elapsed since the page loaded.
    fn now(&self) -> Duration;
}

/// Wall clock anchored at construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    /// Starts a clock at the current instant.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.start.elapsed()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same time, so a test can keep one handle and give
/// another to the guard.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use form_guard::{Clock, ManualClock};
///
/// let clock = ManualClock::new();
/// let shared = clock.clone();
///
/// clock.advance(Duration::from_secs(2));
/// assert_eq!(shared.now(), Duration::from_secs(2));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    /// Creates a clock at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves time forward by `by`.
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    /// Jumps to an absolute time.
    pub fn set(&self, to: Duration) {
        self.now.set(to);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// Visual category of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    /// Neutral information
    Info,
    /// Something went right
    Success,
    /// Something needs the user's attention
    Error,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationKind::Info => write!(f, "info"),
            NotificationKind::Success => write!(f, "success"),
            NotificationKind::Error => write!(f, "error"),
        }
    }
}

/// A status message shown at page level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    text: String,
    kind: NotificationKind,
    created_at: Duration,
}

impl Notification {
    /// Creates a notification stamped with `created_at`.
    pub fn new(text: impl Into<String>, kind: NotificationKind, created_at: Duration) -> Self {
        Self {
            text: text.into(),
            kind,
            created_at,
        }
    }

    /// The message text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The visual category.
    pub fn kind(&self) -> NotificationKind {
        self.kind
    }

    /// When it was shown, relative to page load.
    pub fn created_at(&self) -> Duration {
        self.created_at
    }
}

/// Shows at most one notification at a time and expires it after a delay.
///
/// A new notification evicts the current one immediately. Every shown
/// notification gets a pending expiry; when an expiry comes due, the element
/// is removed only if it still exists, so the expiry of an evicted
/// notification is a harmless no-op. There is no timer cancellation.
///
/// Expiries are drained by the host through [`run_due`](Self::run_due).
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use form_guard::{ManualClock, MemoryDocument, NotificationCenter, NotificationKind};
///
/// let clock = ManualClock::new();
/// let mut center = NotificationCenter::new(clock.clone(), Duration::from_secs(5));
/// let mut doc = MemoryDocument::new();
///
/// center.notify(&mut doc, "Saved", NotificationKind::Success);
/// center.notify(&mut doc, "Saved again", NotificationKind::Success);
/// assert_eq!(doc.notifications().len(), 1);
///
/// clock.advance(Duration::from_secs(5));
/// center.run_due(&mut doc);
/// assert!(doc.notifications().is_empty());
/// ```
#[derive(Debug)]
pub struct NotificationCenter<C: Clock> {
    clock: C,
    ttl: Duration,
    current: Option<NodeId>,
    pending: Vec<(Duration, NodeId)>,
}

impl<C: Clock> NotificationCenter<C> {
    /// Creates a center whose notifications live for `ttl`.
    pub fn new(clock: C, ttl: Duration) -> Self {
        Self {
            clock,
            ttl,
            current: None,
            pending: Vec::new(),
        }
    }

    /// Creates a center with the default five-second lifetime.
    pub fn with_default_ttl(clock: C) -> Self {
        Self::new(clock, DEFAULT_NOTIFICATION_TTL)
    }

    /// The clock driving expiry.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// How long each notification stays visible.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The notification element currently shown, if it still exists.
    pub fn current<D: Document + ?Sized>(&self, doc: &D) -> Option<NodeId> {
        self.current.filter(|id| doc.contains_notification(*id))
    }

    /// Number of expiries not yet run.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Replaces the current notification and schedules its removal.
    pub fn notify<D: Document + ?Sized>(
        &mut self,
        doc: &mut D,
        text: impl Into<String>,
        kind: NotificationKind,
    ) -> NodeId {
        if let Some(previous) = self.current.take() {
            Self::dismiss(doc, previous);
        }

        let now = self.clock.now();
        let notification = Notification::new(text, kind, now);
        let id = doc.insert_notification(&notification);

        tracing::debug!(notification = %id, kind = %kind, "notification shown");

        self.current = Some(id);
        // A lifetime past the clock's range never expires
        self.pending.push((now.saturating_add(self.ttl), id));
        id
    }

    /// Runs every expiry that is due; returns how many elements were removed.
    pub fn run_due<D: Document + ?Sized>(&mut self, doc: &mut D) -> usize {
        let now = self.clock.now();
        let mut removed = 0;

        let (due, waiting): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|(at, _)| *at <= now);
        self.pending = waiting;

        for (_, id) in due {
            if Self::dismiss(doc, id) {
                removed += 1;
            }
            if self.current == Some(id) {
                self.current = None;
            }
        }

        removed
    }

    /// Removes `id` if it is still on the page.
    fn dismiss<D: Document + ?Sized>(doc: &mut D, id: NodeId) -> bool {
        if doc.contains_notification(id) {
            tracing::debug!(notification = %id, "notification dismissed");
            doc.remove_notification(id)
        } else {
            false
        }
    }
}
