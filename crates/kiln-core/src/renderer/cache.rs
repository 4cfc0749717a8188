// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A pipeline cache keyed by full descriptor equality.
//!
//! The cache sits between callers and a [`PipelineFactory`]. Lookups use the
//! descriptor's complete `Eq`/`Hash` (every field, including the debug name),
//! and at most one compilation is in flight per distinct descriptor value:
//! concurrent callers asking for the same descriptor block on that single
//! compilation and share its result. Different descriptors compile in
//! parallel, as the map lock is released before the factory is called.

use crate::renderer::api::GraphicsPipelineDesc;
use crate::renderer::error::PipelineError;
use crate::renderer::traits::PipelineFactory;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

/// Settings for a [`PipelineCache`].
#[derive(Debug, Clone)]
pub struct PipelineCacheSettings {
    /// The number of entries to reserve room for up front.
    pub initial_capacity: usize,
    /// If `true`, a failed compilation stays cached and is returned on later
    /// lookups. If `false`, the entry is evicted so the next lookup retries.
    pub retain_failures: bool,
}

impl Default for PipelineCacheSettings {
    fn default() -> Self {
        Self {
            initial_capacity: 64,
            retain_failures: false,
        }
    }
}

/// A snapshot of a cache's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineCacheStats {
    /// Lookups that found an existing (possibly still compiling) entry.
    pub hits: u64,
    /// Lookups that inserted a new entry.
    pub misses: u64,
    /// Compilations that returned an error.
    pub failures: u64,
    /// The number of entries currently stored.
    pub entries: usize,
}

type Slot<P> = Arc<OnceLock<Result<Arc<P>, PipelineError>>>;
type Entries<P> = HashMap<GraphicsPipelineDesc, Slot<P>>;

/// Deduplicates pipeline creation by descriptor value.
#[derive(Debug)]
pub struct PipelineCache<F: PipelineFactory> {
    factory: F,
    settings: PipelineCacheSettings,
    entries: Mutex<Entries<F::Pipeline>>,
    hits: AtomicU64,
    misses: AtomicU64,
    failures: AtomicU64,
}

impl<F: PipelineFactory> PipelineCache<F> {
    /// Creates an empty cache in front of `factory` with default settings.
    pub fn new(factory: F) -> Self {
        Self::with_settings(factory, PipelineCacheSettings::default())
    }

    /// Creates an empty cache in front of `factory`.
    pub fn with_settings(factory: F, settings: PipelineCacheSettings) -> Self {
        Self {
            factory,
            entries: Mutex::new(HashMap::with_capacity(settings.initial_capacity)),
            settings,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            failures: AtomicU64::new(0),
        }
    }

    // Slots are inserted and removed whole, and creation runs outside the
    // lock, so a panic while the lock is held cannot leave the map half-updated.
    fn entries(&self) -> MutexGuard<'_, Entries<F::Pipeline>> {
        self.entries.lock().unwrap_or_else(|poisoned| {
            log::warn!("PipelineCache: recovering entries from a poisoned lock");
            self.entries.clear_poison();
            poisoned.into_inner()
        })
    }

    /// Returns the pipeline for `descriptor`, creating it through the factory on a miss.
    ///
    /// If another thread is already creating a pipeline for an equal
    /// descriptor, this call waits for it and returns the same pipeline (or
    /// the same error).
    pub fn get_or_create(
        &self,
        descriptor: &GraphicsPipelineDesc,
    ) -> Result<Arc<F::Pipeline>, PipelineError> {
        let slot = {
            let mut entries = self.entries();
            match entries.get(descriptor) {
                Some(slot) => {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    log::trace!("PipelineCache: hit for {:?}", descriptor.label());
                    Arc::clone(slot)
                }
                None => {
                    self.misses.fetch_add(1, Ordering::Relaxed);
                    log::debug!("PipelineCache: miss for {:?}", descriptor.label());
                    let slot: Slot<F::Pipeline> = Arc::new(OnceLock::new());
                    entries.insert(descriptor.clone(), Arc::clone(&slot));
                    slot
                }
            }
        };

        let result = slot.get_or_init(|| {
            self.factory
                .create_graphics_pipeline(descriptor)
                .map(Arc::new)
                .inspect_err(|err| {
                    self.failures.fetch_add(1, Ordering::Relaxed);
                    log::warn!("PipelineCache: pipeline creation failed: {err}");
                })
        });

        match result {
            Ok(pipeline) => Ok(Arc::clone(pipeline)),
            Err(err) => {
                if !self.settings.retain_failures {
                    self.evict_slot(descriptor, &slot);
                }
                Err(err.clone())
            }
        }
    }

    /// Removes `slot` if it is still the entry for `descriptor`.
    fn evict_slot(&self, descriptor: &GraphicsPipelineDesc, slot: &Slot<F::Pipeline>) {
        let mut entries = self.entries();
        if entries
            .get(descriptor)
            .is_some_and(|current| Arc::ptr_eq(current, slot))
        {
            entries.remove(descriptor);
        }
    }

    /// Returns the pipeline for `descriptor` if it has already been created successfully.
    pub fn get(&self, descriptor: &GraphicsPipelineDesc) -> Option<Arc<F::Pipeline>> {
        self.entries()
            .get(descriptor)
            .and_then(|slot| slot.get())
            .and_then(|result| result.as_ref().ok())
            .cloned()
    }

    /// Returns `true` if an entry (finished or in flight) exists for `descriptor`.
    pub fn contains(&self, descriptor: &GraphicsPipelineDesc) -> bool {
        self.entries().contains_key(descriptor)
    }

    /// Drops the cache's reference to the pipeline for `descriptor`.
    ///
    /// Callers still holding the pipeline keep it alive. An entry whose
    /// pipeline is still being created is left in place, so equal lookups keep
    /// joining that creation. Returns `true` if an entry was removed.
    pub fn evict(&self, descriptor: &GraphicsPipelineDesc) -> bool {
        let mut entries = self.entries();
        let finished = match entries.get(descriptor) {
            Some(slot) => slot.get().is_some(),
            None => return false,
        };
        if !finished {
            log::debug!(
                "PipelineCache: {:?} is still being created, not evicted",
                descriptor.label()
            );
            return false;
        }
        entries.remove(descriptor);
        log::debug!("PipelineCache: evicted {:?}", descriptor.label());
        true
    }

    /// Drops every finished entry. Entries still being created are kept.
    pub fn clear(&self) {
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|_, slot| slot.get().is_none());
        log::debug!(
            "PipelineCache: cleared {} entries, {} still being created",
            before - entries.len(),
            entries.len()
        );
    }

    /// Returns the number of stored entries.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    /// Returns `true` if no entries are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a snapshot of the cache counters.
    pub fn stats(&self) -> PipelineCacheStats {
        PipelineCacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }

    /// Returns the factory behind this cache.
    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// Returns the cache settings.
    pub fn settings(&self) -> &PipelineCacheSettings {
        &self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::api::{CullMode, Pipeline};
    use std::sync::atomic::AtomicUsize;
    use std::sync::Barrier;
    use std::thread;
    use std::time::Duration;

    #[derive(Debug, Default)]
    struct CountingFactory {
        calls: AtomicUsize,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        fail_on: Option<String>,
        delay: Duration,
    }

    impl PipelineFactory for CountingFactory {
        type Pipeline = Pipeline<usize>;

        fn create_graphics_pipeline(
            &self,
            descriptor: &GraphicsPipelineDesc,
        ) -> Result<Self::Pipeline, PipelineError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(running, Ordering::SeqCst);
            if !self.delay.is_zero() {
                thread::sleep(self.delay);
            }
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            if self.fail_on.as_deref() == Some(descriptor.debug_name.as_str()) {
                return Err(PipelineError::CompilationFailed {
                    label: descriptor.label().map(String::from),
                    details: "rejected".to_string(),
                });
            }
            Ok(Pipeline::new(descriptor.clone(), call))
        }
    }

    impl CountingFactory {
        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn in_flight(&self) -> usize {
            self.in_flight.load(Ordering::SeqCst)
        }

        fn max_in_flight(&self) -> usize {
            self.max_in_flight.load(Ordering::SeqCst)
        }
    }

    fn desc(name: &str) -> GraphicsPipelineDesc {
        GraphicsPipelineDesc::default().with_debug_name(name)
    }

    #[test]
    fn equal_descriptors_are_created_once() {
        let cache = PipelineCache::new(CountingFactory::default());
        let a = cache.get_or_create(&desc("mesh")).unwrap();
        let b = cache.get_or_create(&desc("mesh")).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.factory().calls(), 1);
        assert_eq!(
            cache.stats(),
            PipelineCacheStats {
                hits: 1,
                misses: 1,
                failures: 0,
                entries: 1,
            }
        );
    }

    #[test]
    fn differing_descriptors_are_created_separately() {
        let cache = PipelineCache::new(CountingFactory::default());
        let base = desc("mesh");
        let mut culled = base.clone();
        culled.rasterization_state.cull_mode = CullMode::None;

        let a = cache.get_or_create(&base).unwrap();
        let b = cache.get_or_create(&culled).unwrap();
        let c = cache.get_or_create(&desc("mesh_renamed")).unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(cache.len(), 3);
        assert_eq!(b.descriptor(), &culled);
    }

    #[test]
    fn failures_are_evicted_and_retried() {
        let factory = CountingFactory {
            fail_on: Some("broken".to_string()),
            ..Default::default()
        };
        let cache = PipelineCache::new(factory);
        assert!(cache.get_or_create(&desc("broken")).is_err());
        assert!(!cache.contains(&desc("broken")));
        assert!(cache.get_or_create(&desc("broken")).is_err());
        assert_eq!(cache.factory().calls(), 2);
        assert_eq!(cache.stats().failures, 2);
    }

    #[test]
    fn failures_can_be_retained() {
        let factory = CountingFactory {
            fail_on: Some("broken".to_string()),
            ..Default::default()
        };
        let settings = PipelineCacheSettings {
            retain_failures: true,
            ..Default::default()
        };
        let cache = PipelineCache::with_settings(factory, settings);
        let first = cache.get_or_create(&desc("broken")).unwrap_err();
        let second = cache.get_or_create(&desc("broken")).unwrap_err();
        assert_eq!(first, second);
        assert_eq!(cache.factory().calls(), 1);
        assert!(cache.get(&desc("broken")).is_none());
    }

    #[test]
    fn concurrent_requests_share_one_compilation() {
        const THREADS: usize = 8;
        let factory = CountingFactory {
            delay: Duration::from_millis(50),
            ..Default::default()
        };
        let cache = PipelineCache::new(factory);
        let barrier = Barrier::new(THREADS);

        let pipelines: Vec<_> = thread::scope(|scope| {
            let handles: Vec<_> = (0..THREADS)
                .map(|_| {
                    scope.spawn(|| {
                        barrier.wait();
                        cache.get_or_create(&desc("shared")).unwrap()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(cache.factory().calls(), 1);
        assert!(pipelines.iter().all(|p| Arc::ptr_eq(p, &pipelines[0])));
        let stats = cache.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, (THREADS - 1) as u64);
    }

    #[test]
    fn eviction_during_creation_does_not_start_a_second_creation() {
        let factory = CountingFactory {
            delay: Duration::from_millis(300),
            ..Default::default()
        };
        let cache = PipelineCache::new(factory);
        let slow = desc("slow");

        thread::scope(|scope| {
            let first = scope.spawn(|| cache.get_or_create(&slow).unwrap());
            while cache.factory().in_flight() == 0 {
                thread::yield_now();
            }

            assert!(!cache.evict(&slow));
            cache.clear();
            assert!(cache.contains(&slow));

            let second = scope.spawn(|| cache.get_or_create(&slow).unwrap());
            let a = first.join().unwrap();
            let b = second.join().unwrap();
            assert!(Arc::ptr_eq(&a, &b));
        });

        assert_eq!(cache.factory().calls(), 1);
        assert_eq!(cache.factory().max_in_flight(), 1);
        assert!(cache.evict(&slow));
    }

    #[test]
    fn poisoned_lock_is_recovered() {
        let cache = PipelineCache::new(CountingFactory::default());
        cache.get_or_create(&desc("a")).unwrap();

        thread::scope(|scope| {
            let result = scope
                .spawn(|| {
                    let _guard = cache.entries.lock().unwrap();
                    panic!("panicked while holding the entry lock");
                })
                .join();
            assert!(result.is_err());
        });
        assert!(cache.entries.is_poisoned());

        assert_eq!(cache.len(), 1);
        assert!(cache.get(&desc("a")).is_some());
        assert!(!cache.entries.is_poisoned());

        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.get_or_create(&desc("b")).is_ok());
    }

    #[test]
    fn evict_and_clear_drop_entries() {
        let cache = PipelineCache::new(CountingFactory::default());
        let kept = cache.get_or_create(&desc("a")).unwrap();
        cache.get_or_create(&desc("b")).unwrap();
        assert!(cache.evict(&desc("a")));
        assert!(!cache.evict(&desc("a")));
        assert_eq!(kept.descriptor().debug_name, "a");
        assert_eq!(cache.get(&desc("b")).map(|p| *p.handle()), Some(1));
        cache.clear();
        assert!(cache.is_empty());
    }
}
