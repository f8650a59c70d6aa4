//! # Progress Store
//!
//! Session-lifetime storage of one progress record per visitor.
//!
//! - An unknown session reads as a fresh record, never as an error
//! - Only `update` and `put` create sessions; reads and `update_existing`
//!   never allocate a slot for an id the store has not seen
//! - `update` gives exclusive read-modify-write access to one session key
//! - Every access to a live slot, reads included, refreshes its idle timer
//! - Next to the durable record, each slot carries a scratch field holding
//!   the Bitwise operands last shown to that visitor
//!
//! ## Backends
//!
//! `MemoryStore` keeps slots in a `DashMap`. The entry guard is held for the
//! whole `update` closure, so two requests racing on the same session are
//! serialized while different sessions proceed independently.

use crate::progress::ProgressRecord;
use crate::puzzle::BitwiseChallenge;
use crate::types::SessionId;
use dashmap::DashMap;
use std::time::{Duration, Instant};

// =============================================================================
// SESSION SLOT
// =============================================================================

/// Everything stored for one session.
#[derive(Debug, Clone)]
pub struct SessionSlot {
    /// Durable completion flags.
    pub record: ProgressRecord,
    /// Bitwise operands currently on display, if any.
    pub pending: Option<BitwiseChallenge>,
    last_seen: Instant,
}

impl Default for SessionSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionSlot {
    #[must_use]
    pub fn new() -> Self {
        Self {
            record: ProgressRecord::new(),
            pending: None,
            last_seen: Instant::now(),
        }
    }

    /// Back to a brand-new session: fresh record, no pending challenge.
    pub fn clear(&mut self) {
        self.record.reset();
        self.pending = None;
    }

    /// Record activity on this slot.
    pub fn touch(&mut self) {
        self.last_seen = Instant::now();
    }

    /// Time since the slot was last touched.
    #[must_use]
    pub fn idle_for(&self) -> Duration {
        self.last_seen.elapsed()
    }
}

// =============================================================================
// STORE TRAIT
// =============================================================================

/// Storage for per-session progress.
///
/// Implementations must serialize `update` and `update_existing` calls on
/// the same session key.
pub trait ProgressStore: Send + Sync {
    /// Run `f` with exclusive access to the slot for `session`, creating a
    /// fresh slot if none exists.
    fn update<R, F>(&self, session: &SessionId, f: F) -> R
    where
        F: FnOnce(&mut SessionSlot) -> R;

    /// Run `f` with exclusive access to the slot for `session` if it exists.
    /// Returns `None` without allocating anything for an unknown session.
    fn update_existing<R, F>(&self, session: &SessionId, f: F) -> Option<R>
    where
        F: FnOnce(&mut SessionSlot) -> R;

    /// Current record, or a fresh one if the session is unknown.
    fn get(&self, session: &SessionId) -> ProgressRecord;

    /// Whether `session` has a live slot.
    fn contains(&self, session: &SessionId) -> bool;

    /// End a session. Returns `true` if it existed.
    fn remove(&self, session: &SessionId) -> bool;

    /// Number of live sessions.
    fn len(&self) -> usize;

    /// Drop every session idle for longer than `idle`. Returns how many went.
    fn purge_idle(&self, idle: Duration) -> usize;

    /// Replace the stored record. The pending challenge is kept.
    fn put(&self, session: &SessionId, record: ProgressRecord) {
        self.update(session, move |slot| slot.record = record);
    }

    /// Reset a live session to a brand-new record. An unknown session
    /// already reads as brand-new, so nothing is stored for it.
    /// Returns `true` if the session existed.
    fn reset(&self, session: &SessionId) -> bool {
        self.update_existing(session, SessionSlot::clear).is_some()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// =============================================================================
// IN-MEMORY BACKEND
// =============================================================================

/// Process-local store backed by a sharded concurrent map.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: DashMap<SessionId, SessionSlot>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressStore for MemoryStore {
    fn update<R, F>(&self, session: &SessionId, f: F) -> R
    where
        F: FnOnce(&mut SessionSlot) -> R,
    {
        let mut slot = self.slots.entry(session.clone()).or_default();
        slot.touch();
        f(slot.value_mut())
    }

    fn update_existing<R, F>(&self, session: &SessionId, f: F) -> Option<R>
    where
        F: FnOnce(&mut SessionSlot) -> R,
    {
        let mut slot = self.slots.get_mut(session)?;
        slot.touch();
        Some(f(slot.value_mut()))
    }

    fn get(&self, session: &SessionId) -> ProgressRecord {
        self.update_existing(session, |slot| slot.record.clone())
            .unwrap_or_default()
    }

    fn contains(&self, session: &SessionId) -> bool {
        self.slots.contains_key(session)
    }

    fn remove(&self, session: &SessionId) -> bool {
        self.slots.remove(session).is_some()
    }

    fn len(&self) -> usize {
        self.slots.len()
    }

    fn purge_idle(&self, idle: Duration) -> usize {
        let before = self.slots.len();
        self.slots.retain(|_, slot| slot.idle_for() <= idle);
        before.saturating_sub(self.slots.len())
    }
}

// =============================================================================
// TESTS
// =============================================================================
