//! Single-install gate.
//!
//! At most one program or model install runs at a time. The gate is an owned
//! value (cloneable handle over shared state) so independent orchestrators,
//! and tests, each get their own.

use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct GateState {
    held: bool,
    /// Bumped on every acquire and forced release.
    generation: u64,
}

/// Mutual-exclusion gate for install operations.
#[derive(Debug, Clone, Default)]
pub struct InstallGate {
    state: Arc<Mutex<GateState>>,
}

impl InstallGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the gate if it is free.
    ///
    /// Returns `None` when another operation holds it; the caller must retry
    /// later rather than queue.
    pub fn try_acquire(&self) -> Option<GatePermit> {
        let mut state = self.lock();
        if state.held {
            return None;
        }
        state.held = true;
        state.generation += 1;
        Some(GatePermit {
            gate: self.clone(),
            generation: state.generation,
        })
    }

    /// Whether an install currently holds the gate.
    pub fn is_held(&self) -> bool {
        self.lock().held
    }

    /// Clear the gate regardless of who holds it.
    ///
    /// Outstanding permits become stale; dropping them later is a no-op.
    pub fn force_release(&self) {
        let mut state = self.lock();
        state.held = false;
        state.generation += 1;
    }

    fn release(&self, generation: u64) {
        let mut state = self.lock();
        if state.generation == generation {
            state.held = false;
        }
    }

    fn lock(&self) -> MutexGuard<'_, GateState> {
        // The state is two plain fields; a poisoned lock still holds valid data.
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

/// Proof of holding the gate. Dropping it releases the gate.
#[derive(Debug)]
pub struct GatePermit {
    gate: InstallGate,
    generation: u64,
}

impl Drop for GatePermit {
    fn drop(&mut self) {
        self.gate.release(self.generation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_is_rejected() {
        let gate = InstallGate::new();
        let permit = gate.try_acquire().expect("first acquire");
        assert!(gate.is_held());
        assert!(gate.try_acquire().is_none());
        drop(permit);
        assert!(!gate.is_held());
        assert!(gate.try_acquire().is_some());
    }

    #[test]
    fn test_force_release_makes_old_permit_stale() {
        let gate = InstallGate::new();
        let stale = gate.try_acquire().unwrap();
        gate.force_release();
        assert!(!gate.is_held());

        let fresh = gate.try_acquire().unwrap();
        drop(stale);
        assert!(gate.is_held(), "stale permit must not release a newer holder");
        drop(fresh);
        assert!(!gate.is_held());
    }

    #[test]
    fn test_independent_gates_do_not_interfere() {
        let a = InstallGate::new();
        let b = InstallGate::new();
        let _held = a.try_acquire().unwrap();
        assert!(b.try_acquire().is_some());
    }
}
