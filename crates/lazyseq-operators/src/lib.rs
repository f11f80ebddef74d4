#![forbid(unsafe_code)]
//! lazyseq-operators: the lazy sequence core and every sequential operator.
//!
//! Design intent:
//! - `Seq` is a restartable factory of traversals (`Source::traverse`), never
//!   a shared cursor. Operators capture their upstream and parameters and do
//!   no work until the consumer pulls.
//! - Operators fall in three evaluation categories, recorded in each
//!   sequence's `OpPlan` lineage: streaming (filter, map, take, ...),
//!   buffered-upstream (order_by, reverse, group_by, take_last) and
//!   buffered-other (join, intersect, except drain their second input).
//! - Terminal operators (count, first, aggregate, to_vec, ...) consume a
//!   traversal eagerly and return `Result`.
//! - Single-threaded; see `lazyseq-exec` for the parallel variant.

pub mod plan;
pub mod source;
pub mod traits;

pub mod cast;
pub mod concat;
pub mod distinct;
pub mod filter;
pub mod map;
pub mod partition;
pub mod set;

pub mod aggregate;
pub mod terminal;

pub mod group;
pub mod join;
pub mod sort;

mod trace;

pub use distinct::KeySet;
pub use group::{Grouping, Lookup};
pub use plan::{Evaluation, OpPlan};
pub use sort::OrderedSeq;
pub use traits::{Seq, SeqIter, Source};
