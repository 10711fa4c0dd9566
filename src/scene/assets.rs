//! Write-once asset slots filled by background loaders.
//!
//! A loader publishes exactly once; the tick path only ever reads a
//! ready/not-ready snapshot and never blocks. A loader that fails leaves the
//! slot empty for good, which readers treat the same as "still loading".

use std::sync::{Arc, OnceLock};
use std::thread;

/// Shared handle to an asset that may not be loaded yet
pub struct AssetSlot<T> {
    cell: Arc<OnceLock<T>>,
}

impl<T> Clone for AssetSlot<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<T> Default for AssetSlot<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> AssetSlot<T> {
    /// Slot with no loader attached (never becomes ready unless published to)
    pub fn empty() -> Self {
        Self {
            cell: Arc::new(OnceLock::new()),
        }
    }

    /// Slot that is ready from the start
    pub fn ready(value: T) -> Self {
        let cell = OnceLock::new();
        let _ = cell.set(value);
        Self {
            cell: Arc::new(cell),
        }
    }

    pub fn get(&self) -> Option<&T> {
        self.cell.get()
    }

    pub fn is_ready(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Writer half for loaders that run elsewhere
    pub fn publisher(&self) -> AssetPublisher<T> {
        AssetPublisher {
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<T: Send + Sync + 'static> AssetSlot<T> {
    /// Run `load` on a background thread and publish its result
    ///
    /// `None` from the loader is logged and leaves the slot empty.
    pub fn spawn<F>(label: &'static str, load: F) -> Self
    where
        F: FnOnce() -> Option<T> + Send + 'static,
    {
        let slot = Self::empty();
        let publisher = slot.publisher();
        let spawned = thread::Builder::new()
            .name(format!("load-{}", label))
            .spawn(move || match load() {
                Some(value) => {
                    if publisher.publish(value) {
                        log::info!("Asset '{}' ready", label);
                    }
                }
                None => log::warn!("Asset '{}' failed to load; continuing without it", label),
            });
        if let Err(e) = spawned {
            log::warn!("Could not start loader for '{}': {}", label, e);
        }
        slot
    }
}

/// Write half of an [`AssetSlot`]
pub struct AssetPublisher<T> {
    cell: Arc<OnceLock<T>>,
}

impl<T> AssetPublisher<T> {
    /// Publish the asset; returns false if it was already published
    pub fn publish(self, value: T) -> bool {
        self.cell.set(value).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn wait_until_ready<T>(slot: &AssetSlot<T>) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if slot.is_ready() {
                return true;
            }
            thread::sleep(Duration::from_millis(1));
        }
        false
    }

    #[test]
    fn test_empty_slot_never_ready() {
        let slot: AssetSlot<u32> = AssetSlot::empty();
        assert!(!slot.is_ready());
        assert!(slot.get().is_none());
    }

    #[test]
    fn test_publish_once() {
        let slot = AssetSlot::empty();
        assert!(slot.publisher().publish(7u32));
        assert!(!slot.publisher().publish(8u32));
        assert_eq!(slot.get(), Some(&7));
    }

    #[test]
    fn test_spawned_loader_publishes() {
        let slot = AssetSlot::spawn("number", || Some(41u32 + 1));
        assert!(wait_until_ready(&slot));
        let shared = slot.clone();
        assert_eq!(shared.get(), Some(&42));
    }

    #[test]
    fn test_failed_loader_leaves_slot_empty() {
        let slot: AssetSlot<u32> = AssetSlot::spawn("missing", || None);
        thread::sleep(Duration::from_millis(20));
        assert!(!slot.is_ready());
    }
}
