//! Per-run execution context.
//!
//! Created once at the start of a run, handed by reference to every
//! component, and dropped when the run ends. Nothing in the crate keeps
//! process-wide state.

use crate::config::EtlConfig;
use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};

/// Hands out surrogate keys that are unique within one run.
///
/// Keys increase monotonically but callers must not rely on their order or
/// on them being contiguous.
#[derive(Debug, Default)]
pub struct SurrogateKeyAllocator {
    next: AtomicI64,
}

impl SurrogateKeyAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_key(&self) -> i64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }

    /// Number of keys handed out so far
    pub fn allocated(&self) -> i64 {
        self.next.load(Ordering::Relaxed)
    }
}

#[derive(Debug)]
pub struct ExecutionContext {
    config: EtlConfig,
    run_id: String,
    songplay_keys: SurrogateKeyAllocator,
}

impl ExecutionContext {
    pub fn new(config: EtlConfig) -> Self {
        Self {
            config,
            run_id: Utc::now().format("%Y%m%dT%H%M%S%.3fZ").to_string(),
            songplay_keys: SurrogateKeyAllocator::new(),
        }
    }

    pub fn config(&self) -> &EtlConfig {
        &self.config
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Allocator for `songplay_id`
    pub fn songplay_keys(&self) -> &SurrogateKeyAllocator {
        &self.songplay_keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn test_keys_are_unique_across_threads() {
        let allocator = Arc::new(SurrogateKeyAllocator::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let allocator = Arc::clone(&allocator);
                std::thread::spawn(move || (0..250).map(|_| allocator.next_key()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for key in handle.join().unwrap() {
                assert!(seen.insert(key), "duplicate key {}", key);
            }
        }
        assert_eq!(seen.len(), 1000);
        assert_eq!(allocator.allocated(), 1000);
    }

    #[test]
    fn test_each_context_has_its_own_allocator() {
        let first = ExecutionContext::new(EtlConfig::default());
        first.songplay_keys().next_key();
        first.songplay_keys().next_key();

        let second = ExecutionContext::new(EtlConfig::default());
        assert_eq!(second.songplay_keys().next_key(), 0);
        assert!(!first.run_id().is_empty());
    }
}
