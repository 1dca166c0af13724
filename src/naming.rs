//! Collision-free names for generated variables.

use std::sync::atomic::{AtomicU64, Ordering};

pub trait UniqueNameGenerator: Send + Sync {
    /// A name no earlier call on this generator has returned.
    fn unique_name(&self) -> String;
}

/// Yields `var1`, `var2`, ... Safe to share between threads.
#[derive(Debug)]
pub struct DefaultUniqueNameGenerator {
    prefix: String,
    counter: AtomicU64,
}

impl DefaultUniqueNameGenerator {
    pub fn new() -> Self {
        Self::with_prefix("var")
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: AtomicU64::new(1),
        }
    }
}

impl Default for DefaultUniqueNameGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl UniqueNameGenerator for DefaultUniqueNameGenerator {
    fn unique_name(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        format!("{}{}", self.prefix, n)
    }
}
