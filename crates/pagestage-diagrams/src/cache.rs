//! Per-source memoization of rendered diagrams.
//!
//! [`DiagramCache`] guarantees the at-most-once contract: for a fixed diagram
//! source string, the wrapped renderer runs at most once for the lifetime of
//! the process, and every lookup of that source observes byte-identical
//! output. Failed renders are not memoized.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::DiagramError;
use crate::plantuml::DiagramRenderer;

/// The rendered bytes for one diagram source, plus the in-flight lock that
/// serializes concurrent renders of that source.
#[derive(Default)]
struct Slot {
    rendered: Mutex<Option<Arc<[u8]>>>,
}

/// Process-wide diagram render cache.
///
/// Keys are the exact diagram source text (case- and whitespace-sensitive).
/// There is no eviction and no size bound; entries live until the process
/// exits.
///
/// # Concurrency
///
/// The map lock is held only to look up or insert a key's [`Slot`]; the
/// expensive external render runs under the slot's own lock. Concurrent
/// callers for the *same* source serialize on that per-key lock — the first
/// renders, the rest wake up to the memoized bytes — while renders for
/// *different* sources proceed independently. This holds for any number of
/// threads even though the current document driver is serial.
pub struct DiagramCache {
    renderer: Box<dyn DiagramRenderer>,
    entries: Mutex<HashMap<String, Arc<Slot>>>,
}

impl DiagramCache {
    /// Create an empty cache around `renderer`.
    #[must_use]
    pub fn new(renderer: Box<dyn DiagramRenderer>) -> Self {
        Self {
            renderer,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Return the rendered bytes for `source`, invoking the renderer only on
    /// the first call for this exact source text.
    ///
    /// # Errors
    ///
    /// Propagates the renderer's error on a failed render. The failure is not
    /// cached: the next call for the same source retries.
    pub fn render_cached(&self, source: &str) -> Result<Arc<[u8]>, DiagramError> {
        let slot = {
            let mut entries = self.entries.lock().unwrap();
            match entries.get(source) {
                Some(slot) => Arc::clone(slot),
                None => {
                    let slot = Arc::new(Slot::default());
                    entries.insert(source.to_owned(), Arc::clone(&slot));
                    slot
                }
            }
        };

        let mut rendered = slot.rendered.lock().unwrap();
        if let Some(bytes) = rendered.as_ref() {
            tracing::debug!("diagram cache hit");
            return Ok(Arc::clone(bytes));
        }

        tracing::debug!("diagram cache miss");
        let bytes: Arc<[u8]> = self.renderer.render(source)?.into();
        *rendered = Some(Arc::clone(&bytes));
        Ok(bytes)
    }

    /// Number of sources with a completed render.
    #[must_use]
    pub fn len(&self) -> usize {
        let entries = self.entries.lock().unwrap();
        entries
            .values()
            .filter(|slot| slot.rendered.lock().unwrap().is_some())
            .count()
    }

    /// Whether no source has been rendered yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Barrier;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::{Duration, Instant};

    use super::*;

    /// Renderer that counts invocations and echoes the source bytes back.
    /// The counter is shared so tests can observe it after handing the
    /// renderer to the cache.
    struct Counting {
        calls: Arc<AtomicUsize>,
        delay: Duration,
    }

    impl Counting {
        fn new() -> (Self, Arc<AtomicUsize>) {
            Self::slow(Duration::ZERO)
        }

        fn slow(delay: Duration) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    calls: Arc::clone(&calls),
                    delay,
                },
                calls,
            )
        }
    }

    impl DiagramRenderer for Counting {
        fn render(&self, source: &str) -> Result<Vec<u8>, DiagramError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                thread::sleep(self.delay);
            }
            Ok(source.as_bytes().to_vec())
        }
    }

    /// Renderer that fails a fixed number of times before succeeding.
    struct Flaky {
        failures_left: AtomicUsize,
    }

    impl DiagramRenderer for Flaky {
        fn render(&self, source: &str) -> Result<Vec<u8>, DiagramError> {
            if self
                .failures_left
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
            {
                return Err(DiagramError::EmptyOutput);
            }
            Ok(source.as_bytes().to_vec())
        }
    }

    #[test]
    fn test_second_lookup_is_memoized() {
        let (renderer, calls) = Counting::new();
        let cache = DiagramCache::new(Box::new(renderer));

        let first = cache.render_cached("Alice -> Bob").unwrap();
        let second = cache.render_cached("Alice -> Bob").unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        // Same allocation, not just equal bytes.
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_renderer_invoked_once_per_key() {
        let (renderer, calls) = Counting::new();
        let cache = DiagramCache::new(Box::new(renderer));

        for _ in 0..5 {
            cache.render_cached("Alice -> Bob").unwrap();
        }
        cache.render_cached("Bob -> Alice").unwrap();

        // Two distinct sources, two renders total.
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_keys_are_exact_text() {
        let (renderer, calls) = Counting::new();
        let cache = DiagramCache::new(Box::new(renderer));

        cache.render_cached("Alice -> Bob").unwrap();
        cache.render_cached("alice -> bob").unwrap();
        cache.render_cached("Alice -> Bob ").unwrap();

        // Case and whitespace variants are distinct keys.
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_failure_is_not_cached() {
        let cache = DiagramCache::new(Box::new(Flaky {
            failures_left: AtomicUsize::new(1),
        }));

        assert!(cache.render_cached("Alice -> Bob").is_err());
        assert!(cache.is_empty());

        // The retry reaches the renderer and succeeds.
        let bytes = cache.render_cached("Alice -> Bob").unwrap();
        assert_eq!(&bytes[..], b"Alice -> Bob");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_concurrent_lookups_render_once() {
        const CALLERS: usize = 8;

        let (renderer, calls) = Counting::slow(Duration::from_millis(50));
        let cache = Arc::new(DiagramCache::new(Box::new(renderer)));
        let barrier = Arc::new(Barrier::new(CALLERS));

        let handles: Vec<_> = (0..CALLERS)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    cache.render_cached("Alice -> Bob").unwrap()
                })
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        // Exactly one render; every caller got the same bytes.
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        for bytes in &results {
            assert!(Arc::ptr_eq(bytes, &results[0]));
        }
    }

    #[test]
    fn test_distinct_keys_do_not_share_a_lock() {
        // Two slow renders for different sources finish in roughly one
        // render's time when issued from two threads.
        let delay = Duration::from_millis(100);
        let (renderer, _calls) = Counting::slow(delay);
        let cache = Arc::new(DiagramCache::new(Box::new(renderer)));

        let started = Instant::now();
        let a = {
            let cache = Arc::clone(&cache);
            thread::spawn(move || cache.render_cached("Alice -> Bob").unwrap())
        };
        let b = {
            let cache = Arc::clone(&cache);
            thread::spawn(move || cache.render_cached("Bob -> Carol").unwrap())
        };
        a.join().unwrap();
        b.join().unwrap();

        assert!(started.elapsed() < delay * 2);
        assert_eq!(cache.len(), 2);
    }
}
