//! Parallel execution configuration that downstream crates can serialize/deserialize.

use serde::{Deserialize, Serialize};

/// How results of independent partitions are stitched back together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeMode {
    /// Results are delivered as workers produce them; interleaving is nondeterministic.
    #[default]
    Unordered,
    /// Results are reassembled in source position order.
    Ordered,
}

impl MergeMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ordered" => Some(MergeMode::Ordered),
            "unordered" => Some(MergeMode::Unordered),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParallelConfig {
    /// Worker count. `None` means hardware concurrency.
    pub degree_of_parallelism: Option<usize>,

    /// Merge discipline for partition results.
    pub merge: MergeMode,

    /// Partitions are never split below this many source elements.
    pub min_partition_len: usize,

    /// Worker threads are named `{prefix}-{index}`.
    pub thread_name_prefix: String,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            degree_of_parallelism: None,
            merge: MergeMode::Unordered,
            min_partition_len: 1,
            thread_name_prefix: "lazyseq-worker".to_string(),
        }
    }
}

impl ParallelConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `LAZYSEQ_DEGREE_OF_PARALLELISM`: worker count
    /// - `LAZYSEQ_MERGE_MODE`: `ordered` or `unordered`
    /// - `LAZYSEQ_MIN_PARTITION_LEN`: smallest partition size
    /// - `LAZYSEQ_THREAD_NAME_PREFIX`: worker thread name prefix
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(s) = std::env::var("LAZYSEQ_DEGREE_OF_PARALLELISM") {
            if let Ok(v) = s.parse::<usize>() {
                cfg.degree_of_parallelism = Some(v);
            }
        }

        if let Ok(s) = std::env::var("LAZYSEQ_MERGE_MODE") {
            if let Some(mode) = MergeMode::parse(&s) {
                cfg.merge = mode;
            }
        }

        if let Ok(s) = std::env::var("LAZYSEQ_MIN_PARTITION_LEN") {
            if let Ok(v) = s.parse::<usize>() {
                cfg.min_partition_len = v;
            }
        }

        if let Ok(s) = std::env::var("LAZYSEQ_THREAD_NAME_PREFIX") {
            cfg.thread_name_prefix = s;
        }

        cfg
    }

    pub fn with_degree(mut self, degree: usize) -> Self {
        self.degree_of_parallelism = Some(degree);
        self
    }

    pub fn with_merge(mut self, merge: MergeMode) -> Self {
        self.merge = merge;
        self
    }

    /// Resolved worker count, never below one.
    pub fn effective_degree(&self) -> usize {
        self.degree_of_parallelism
            .unwrap_or_else(|| {
                std::thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(1)
            })
            .max(1)
    }

    /// Number of partitions to cut `len` source elements into.
    pub fn partition_count(&self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        let min_len = self.min_partition_len.max(1);
        let by_size = len.div_ceil(min_len);
        self.effective_degree().min(by_size).max(1)
    }
}
