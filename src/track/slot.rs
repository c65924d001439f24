use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use super::surface::TrackSurface;

/// Publishes whole track surfaces for readers to pick up between ticks.
///
/// Readers take an `Arc` snapshot and keep querying it even if an editor
/// publishes a replacement mid-frame. Surfaces are never mutated in place.
#[derive(Debug)]
pub struct TrackSlot {
    current: RwLock<Arc<TrackSurface>>,
    revision: AtomicU64,
}

impl TrackSlot {
    pub fn new(surface: TrackSurface) -> Self {
        Self {
            current: RwLock::new(Arc::new(surface)),
            revision: AtomicU64::new(0),
        }
    }

    /// Snapshot of the live surface.
    pub fn current(&self) -> Arc<TrackSurface> {
        // The lock only guards a pointer swap, so a poisoned lock still
        // holds a complete surface.
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Replaces the live surface and returns the new revision number.
    pub fn publish(&self, surface: TrackSurface) -> u64 {
        let next = Arc::new(surface);
        {
            let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
            *guard = next;
        }
        let revision = self.revision.fetch_add(1, Ordering::AcqRel) + 1;
        log::debug!("published track surface revision {revision}");
        revision
    }

    /// Number of surfaces published since construction.
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::Acquire)
    }
}
