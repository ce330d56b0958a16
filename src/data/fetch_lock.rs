use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Idle/Fetching state shared between the store and anyone watching it.
/// At most one fetch may be in flight per store; concurrent requests are
/// rejected, not queued.
#[derive(Clone, Default)]
pub struct FetchLock {
    in_flight: Arc<AtomicBool>,
}

impl FetchLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idle -> Fetching. Returns `None` when a fetch is already in flight.
    pub fn try_acquire(&self) -> Option<FetchGuard> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| FetchGuard {
                in_flight: Arc::clone(&self.in_flight),
            })
    }

    pub fn is_fetching(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }
}

/// Scoped Fetching state. Dropping the guard restores Idle on every exit
/// path, including early returns and errors.
pub struct FetchGuard {
    in_flight: Arc<AtomicBool>,
}

impl Drop for FetchGuard {
    fn drop(&mut self) {
        self.in_flight.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_is_rejected_while_guard_lives() {
        let lock = FetchLock::new();
        let guard = lock.try_acquire();
        assert!(guard.is_some());
        assert!(lock.is_fetching());
        assert!(lock.try_acquire().is_none());

        drop(guard);
        assert!(!lock.is_fetching());
        assert!(lock.try_acquire().is_some());
    }

    #[test]
    fn clones_observe_the_same_state() {
        let lock = FetchLock::new();
        let watcher = lock.clone();
        let _guard = lock.try_acquire().expect("lock starts idle");
        assert!(watcher.is_fetching());
        assert!(watcher.try_acquire().is_none());
    }
}
