#![forbid(unsafe_code)]
//! lazyseq-exec: parallel execution variant and metrics hooks.
//!
//! A `ParallelQuery` buffers its source, cuts it into contiguous partitions,
//! runs the stage chain for each partition on a fixed-size worker pool and
//! merges the results either in arrival order or in source order.

pub mod metrics;
pub mod parallel;
pub mod pool;

pub use parallel::{AsParallel, ParallelQuery};
pub use pool::WorkerPool;
