//! Batch run configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the batch driver.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BatchConfig {
    /// Number of worker threads. 0 or unset = rayon's default.
    pub threads: Option<usize>,
    /// Analyze records in parallel. Default: true.
    pub parallel: Option<bool>,
}

impl BatchConfig {
    /// Returns the effective thread count, defaulting to 0 (auto).
    pub fn effective_threads(&self) -> usize {
        self.threads.unwrap_or(0)
    }

    /// Returns whether the batch runs in parallel, defaulting to true.
    pub fn effective_parallel(&self) -> bool {
        self.parallel.unwrap_or(true)
    }
}
