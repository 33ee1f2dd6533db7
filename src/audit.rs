//! Audit trail of guard decisions.
//!
//! This module provides:
//! - `GuardEvent`: Structured record of one decision
//! - `AuditTrail`: In-memory recorder that also emits through `tracing`
//!
//! Audit events are safe by default:
//! - No field values are stored
//! - The page token is never included
//! - Only element ids, rule kinds and counts are recorded

mod event;
mod trail;

pub use event::{GuardEvent, GuardEventKind};
pub use trail::AuditTrail;
