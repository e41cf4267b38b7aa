//! Tracking heap registry.
//!
//! Values opt into inspection by being wrapped with [`HeapRegistry::track`].
//! While the returned [`Tracked`] guard is alive the registry knows the
//! value's type name and byte size; dropping the guard forgets it. The set of
//! registered values is the "live object set" reported over HTTP.

use std::any::type_name;
use std::fmt;
use std::mem::size_of;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use dashmap::DashMap;
use itertools::Itertools;
use tracing::debug;

use crate::backend::InspectionBackend;
use crate::error::Error;
use crate::heap_size::HeapSize;
use crate::record::{ObjectHandle, TypeCount, TypeUsageRecord, to_u64};
use crate::result::Result;

/// Concurrent table of live tracked values.
#[derive(Debug, Default)]
pub struct HeapRegistry {
    next_id: AtomicU64,
    live: DashMap<u64, ObjectHandle>,
    closed: AtomicBool,
}

impl HeapRegistry {
    /// Create an empty, shareable registry.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Register `value` and return a guard that unregisters it on drop.
    pub fn track<T: HeapSize + 'static>(self: &Arc<Self>, value: T) -> Tracked<T> {
        let size = measure(&value);
        let id = self.register(type_name::<T>(), size);
        Tracked {
            value,
            registration: Registration {
                registry: Arc::clone(self),
                id,
            },
        }
    }

    /// Number of values currently tracked.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Refuse all further inspection. Tracked values still unregister on drop.
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            debug!(live = self.live.len(), "Heap registry closed");
        }
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn ensure_open(&self, operation: &'static str) -> Result<()> {
        if self.is_closed() {
            Err(Error::backend_failure(operation, "heap registry is closed"))
        } else {
            Ok(())
        }
    }

    fn register(&self, type_name: &'static str, size: usize) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.live.insert(id, ObjectHandle::new(id, type_name, size));
        id
    }

    fn unregister(&self, id: u64) {
        self.live.remove(&id);
    }

    fn resize(&self, id: u64, size: usize) {
        if let Some(mut entry) = self.live.get_mut(&id) {
            let type_name = entry.type_name();
            *entry = ObjectHandle::new(id, type_name, size);
        }
    }
}

impl InspectionBackend for HeapRegistry {
    fn enumerate_live_objects(&self) -> Result<Vec<ObjectHandle>> {
        self.ensure_open("enumerate_live_objects")?;
        Ok(self
            .live
            .iter()
            .map(|entry| *entry.value())
            .sorted_by_key(ObjectHandle::id)
            .collect())
    }

    fn summarize(&self, objects: &[ObjectHandle]) -> Result<Vec<TypeUsageRecord>> {
        self.ensure_open("summarize")?;
        Ok(objects
            .iter()
            .into_grouping_map_by(|handle| handle.type_name())
            .fold((0_u64, 0_u64), |(count, bytes), _, handle| {
                (
                    count.saturating_add(1),
                    bytes.saturating_add(to_u64(handle.size())),
                )
            })
            .into_iter()
            .map(|(name, (count, bytes))| TypeUsageRecord::new(name, count, bytes))
            .sorted_by(|a, b| {
                b.total_size
                    .cmp(&a.total_size)
                    .then_with(|| a.type_name.cmp(&b.type_name))
            })
            .collect())
    }

    fn most_common_types(&self, limit: usize) -> Result<Vec<TypeCount>> {
        self.ensure_open("most_common_types")?;
        Ok(self
            .live
            .iter()
            .map(|entry| entry.value().type_name())
            .counts()
            .into_iter()
            .map(|(name, count)| TypeCount::new(name, to_u64(count)))
            .sorted_by(|a, b| {
                b.count
                    .cmp(&a.count)
                    .then_with(|| a.type_name.cmp(&b.type_name))
            })
            .take(limit)
            .collect())
    }
}

/// A value registered with a [`HeapRegistry`].
pub struct Tracked<T> {
    value: T,
    registration: Registration,
}

impl<T: HeapSize> Tracked<T> {
    /// Re-measure the value after mutating it through `DerefMut`.
    pub fn resync(&self) {
        self.registration
            .registry
            .resize(self.registration.id, measure(&self.value));
    }

    /// Unregister and hand back the value.
    pub fn into_inner(self) -> T {
        let Self {
            value,
            registration,
        } = self;
        drop(registration);
        value
    }
}

impl<T> Tracked<T> {
    /// Registry id of this value.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.registration.id
    }
}

impl<T> Deref for Tracked<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T> DerefMut for Tracked<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.value
    }
}

impl<T: fmt::Debug> fmt::Debug for Tracked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracked")
            .field("id", &self.registration.id)
            .field("value", &self.value)
            .finish()
    }
}

struct Registration {
    registry: Arc<HeapRegistry>,
    id: u64,
}

impl Drop for Registration {
    fn drop(&mut self) {
        self.registry.unregister(self.id);
    }
}

fn measure<T: HeapSize>(value: &T) -> usize {
    size_of::<T>().saturating_add(value.heap_size())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]
    #![allow(clippy::arithmetic_side_effects)]

    use super::*;

    #[test]
    fn test_new_registry_is_empty() {
        let registry = HeapRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.enumerate_live_objects().unwrap().is_empty());
    }

    #[test]
    fn test_track_and_drop_round_trip() {
        let registry = HeapRegistry::new();
        let tracked = registry.track(String::from("hello"));
        assert_eq!(registry.len(), 1);

        drop(tracked);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_into_inner_unregisters_and_returns_value() {
        let registry = HeapRegistry::new();
        let tracked = registry.track(vec![1_u8, 2, 3]);
        let value = tracked.into_inner();

        assert_eq!(value, vec![1, 2, 3]);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_handle_records_type_name_and_size() {
        let registry = HeapRegistry::new();
        let _s = registry.track(String::with_capacity(32));

        let objects = registry.enumerate_live_objects().unwrap();
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0].type_name(), type_name::<String>());
        assert_eq!(objects[0].size(), size_of::<String>() + 32);
    }

    #[test]
    fn test_enumeration_follows_tracking_order() {
        let registry = HeapRegistry::new();
        let a = registry.track(1_u32);
        let b = registry.track(2_u32);
        let c = registry.track(3_u32);

        let ids: Vec<u64> = registry
            .enumerate_live_objects()
            .unwrap()
            .iter()
            .map(ObjectHandle::id)
            .collect();
        assert_eq!(ids, vec![a.id(), b.id(), c.id()]);
    }

    #[test]
    fn test_summarize_orders_by_total_size_descending() {
        let registry = HeapRegistry::new();
        let _small = registry.track(1_u8);
        let _big: Vec<_> = (0..3)
            .map(|_| registry.track(String::with_capacity(100)))
            .collect();

        let objects = registry.enumerate_live_objects().unwrap();
        let summary = registry.summarize(&objects).unwrap();

        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].type_name, type_name::<String>());
        assert_eq!(summary[0].count, 3);
        assert_eq!(
            summary[0].total_size,
            3 * (size_of::<String>() as u64 + 100)
        );
        assert_eq!(summary[1].type_name, "u8");
        assert_eq!(summary[1].total_size, 1);
    }

    #[test]
    fn test_summarize_sums_equal_tracked_sizes() {
        let registry = HeapRegistry::new();
        let values: Vec<_> = (1..=5)
            .map(|n| registry.track(vec![0_u64; n]))
            .collect();

        let objects = registry.enumerate_live_objects().unwrap();
        let expected: u64 = objects.iter().map(|h| h.size() as u64).sum();
        let summary = registry.summarize(&objects).unwrap();

        assert_eq!(summary.iter().map(|r| r.total_size).sum::<u64>(), expected);
        assert_eq!(summary[0].count, values.len() as u64);
    }

    #[test]
    fn test_summarize_empty_input() {
        let registry = HeapRegistry::new();
        assert!(registry.summarize(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_most_common_types_ranks_by_count_and_truncates() {
        let registry = HeapRegistry::new();
        let _a: Vec<_> = (0..3_u32).map(|n| registry.track(n)).collect();
        let _b: Vec<_> = (0..2).map(|_| registry.track(String::new())).collect();
        let _c = registry.track(true);

        let ranked = registry.most_common_types(2).unwrap();
        assert_eq!(
            ranked,
            vec![
                TypeCount::new("u32", 3),
                TypeCount::new(type_name::<String>(), 2),
            ]
        );
    }

    #[test]
    fn test_resync_updates_size_after_mutation() {
        let registry = HeapRegistry::new();
        let mut tracked = registry.track(Vec::<u64>::new());
        tracked.reserve_exact(16);
        tracked.resync();

        let objects = registry.enumerate_live_objects().unwrap();
        assert!(objects[0].size() >= size_of::<Vec<u64>>() + 16 * size_of::<u64>());
    }

    #[test]
    fn test_closed_registry_fails_every_inspection() {
        let registry = HeapRegistry::new();
        let tracked = registry.track(5_i32);
        registry.close();

        assert!(matches!(
            registry.enumerate_live_objects(),
            Err(Error::BackendFailure {
                operation: "enumerate_live_objects",
                ..
            })
        ));
        assert!(registry.summarize(&[]).is_err());
        assert!(registry.most_common_types(20).is_err());

        drop(tracked);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_concurrent_tracking_from_many_threads() {
        let registry = HeapRegistry::new();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    let kept: Vec<_> = (0..100_u64).map(|n| registry.track(n)).collect();
                    assert!(registry.len() >= kept.len());
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert!(registry.is_empty());
    }
}
