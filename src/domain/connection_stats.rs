//! Lock-free WebSocket connection counters.
//!
//! Connections never coordinate with each other; these counters are the
//! only state they share, and exist for the health endpoint and logs.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Shared counters of open and accepted connections.
///
/// Cloning is cheap and all clones observe the same counters.
#[derive(Debug, Clone, Default)]
pub struct ConnectionStats {
    inner: Arc<Counters>,
}

#[derive(Debug, Default)]
struct Counters {
    active: AtomicUsize,
    total: AtomicU64,
}

impl ConnectionStats {
    /// Creates zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a newly accepted connection and returns a guard that
    /// decrements the active count when dropped.
    #[must_use]
    pub fn open(&self) -> ConnectionGuard {
        self.inner.active.fetch_add(1, Ordering::Relaxed);
        self.inner.total.fetch_add(1, Ordering::Relaxed);
        ConnectionGuard {
            stats: self.clone(),
        }
    }

    /// Number of connections currently open.
    #[must_use]
    pub fn active(&self) -> usize {
        self.inner.active.load(Ordering::Relaxed)
    }

    /// Number of connections accepted since startup.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.inner.total.load(Ordering::Relaxed)
    }
}

/// Decrements the active connection count on drop.
#[derive(Debug)]
pub struct ConnectionGuard {
    stats: ConnectionStats,
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.stats.inner.active.fetch_sub(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero() {
        let stats = ConnectionStats::new();
        assert_eq!(stats.active(), 0);
        assert_eq!(stats.total(), 0);
    }

    #[test]
    fn guard_tracks_active_connections() {
        let stats = ConnectionStats::new();
        let g1 = stats.open();
        let g2 = stats.open();
        assert_eq!(stats.active(), 2);

        drop(g1);
        assert_eq!(stats.active(), 1);
        drop(g2);
        assert_eq!(stats.active(), 0);
        assert_eq!(stats.total(), 2);
    }

    #[test]
    fn clones_share_counters() {
        let stats = ConnectionStats::new();
        let other = stats.clone();
        let _guard = other.open();
        assert_eq!(stats.active(), 1);
    }
}
