//! Document collaborator surface.
//!
//! This module is the boundary between a hosting page and the guard's
//! decision logic. It handles:
//! - Element discovery (forms, fields, file and password inputs, secure links)
//! - The narrow set of mutations the guard performs
//! - Event subscription, so handlers are registered explicitly
//!
//! # Design Principles
//!
//! 1. **No Browser Dependencies**: Nothing here binds to a real DOM. A host
//!    implements [`Document`] and [`EventSource`] for its environment.
//!
//! 2. **Snapshots Out, Intents In**: Reads return owned snapshots
//!    ([`Field`](crate::Field), [`FileDescriptor`](crate::FileDescriptor));
//!    writes are small, named operations. Validators never see the document.
//!
//! 3. **Unknown Ids Are No-ops**: Operations on ids the document does not know
//!    return `false`/`None` instead of panicking.
//!
//! # Integration Model
//!
//! ```ignore
//! // In a host integration (e.g. a wasm-bindgen shim):
//! let mut guard = FormGatekeeper::new(GuardContext::new(config, clock));
//! guard.install(&mut page);
//!
//! // For every event the page subscribed to:
//! if guard.handle_event(&mut page, event) == EventOutcome::PreventDefault {
//!     browser_event.prevent_default();
//! }
//!
//! // From the host's timer loop:
//! guard.run_timers(&mut page);
//! ```

mod document;
mod memory;

pub use document::{Document, Event, EventKind, EventOutcome, EventSource, NodeId};
pub use memory::MemoryDocument;
