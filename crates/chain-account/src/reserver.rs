//! Reservation bookkeeping.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockWriteGuard};

use chain_primitives::Hash;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ReserveError;

/// How long a reservation lives unless cancelled.
pub const DEFAULT_RESERVATION_TTL_MS: u64 = 60_000;

pub type ReservationId = u64;

/// A hold on one output.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: ReservationId,
    pub output_id: Hash,
    /// Caller-chosen token. Reserving again with the same token returns
    /// the existing reservation instead of failing.
    pub client_token: Option<String>,
    pub expiry_ms: u64,
}

impl Reservation {
    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms >= self.expiry_ms
    }
}

/// Serializes concurrent attempts to spend the same output.
pub trait Reserver: Send + Sync {
    /// Reserve `output_id` until `now_ms` plus the reserver's TTL.
    fn reserve(
        &self,
        output_id: Hash,
        client_token: Option<String>,
        now_ms: u64,
    ) -> Result<Reservation, ReserveError>;

    /// Release a reservation before it expires.
    fn cancel(&self, id: ReservationId) -> Result<(), ReserveError>;

    /// Drop every reservation that has expired at `now_ms`. Returns how
    /// many were dropped.
    fn expire(&self, now_ms: u64) -> usize;
}

#[derive(Default)]
struct State {
    next_id: ReservationId,
    by_id: HashMap<ReservationId, Reservation>,
    by_output: HashMap<Hash, ReservationId>,
}

impl State {
    fn remove(&mut self, id: ReservationId) -> Option<Reservation> {
        let res = self.by_id.remove(&id)?;
        self.by_output.remove(&res.output_id);
        Some(res)
    }
}

/// In-memory reserver.
pub struct MemoryReserver {
    ttl_ms: u64,
    state: RwLock<State>,
}

impl MemoryReserver {
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_RESERVATION_TTL_MS)
    }

    pub fn with_ttl(ttl_ms: u64) -> Self {
        MemoryReserver {
            ttl_ms,
            state: RwLock::new(State::default()),
        }
    }

    pub fn ttl_ms(&self) -> u64 {
        self.ttl_ms
    }

    /// The live reservation on `output_id`, if any.
    pub fn reservation_for(&self, output_id: &Hash, now_ms: u64) -> Option<Reservation> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        let id = state.by_output.get(output_id)?;
        state.by_id.get(id).filter(|r| !r.is_expired(now_ms)).cloned()
    }

    fn write(&self) -> RwLockWriteGuard<'_, State> {
        // The state is consistent after every write, so a panic elsewhere
        // does not invalidate it.
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MemoryReserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Reserver for MemoryReserver {
    fn reserve(
        &self,
        output_id: Hash,
        client_token: Option<String>,
        now_ms: u64,
    ) -> Result<Reservation, ReserveError> {
        let mut state = self.write();

        let existing = state
            .by_output
            .get(&output_id)
            .and_then(|id| state.by_id.get(id))
            .cloned();
        if let Some(existing) = existing {
            if existing.is_expired(now_ms) {
                state.remove(existing.id);
            } else if client_token.is_some() && existing.client_token == client_token {
                return Ok(existing);
            } else {
                return Err(ReserveError::Reserved);
            }
        }

        state.next_id += 1;
        let res = Reservation {
            id: state.next_id,
            output_id,
            client_token,
            expiry_ms: now_ms.saturating_add(self.ttl_ms),
        };
        state.by_output.insert(output_id, res.id);
        state.by_id.insert(res.id, res.clone());
        debug!(reservation = res.id, output_id = %output_id, expiry_ms = res.expiry_ms, "reserved output");
        Ok(res)
    }

    fn cancel(&self, id: ReservationId) -> Result<(), ReserveError> {
        let mut state = self.write();
        state.remove(id).ok_or(ReserveError::NotFound(id))?;
        debug!(reservation = id, "cancelled reservation");
        Ok(())
    }

    fn expire(&self, now_ms: u64) -> usize {
        let mut state = self.write();
        let expired: Vec<ReservationId> = state
            .by_id
            .values()
            .filter(|r| r.is_expired(now_ms))
            .map(|r| r.id)
            .collect();
        for id in &expired {
            state.remove(*id);
        }
        if !expired.is_empty() {
            debug!(count = expired.len(), now_ms, "expired reservations");
        }
        expired.len()
    }
}
