//! Convenient re-exports for downstream crates.

pub use crate::compare::{
    AsciiCaseInsensitive, Comparer, DefaultEquality, EqualityComparer, NaturalOrder,
    PartialOrder, SortDirection,
};
pub use crate::config::{MergeMode, ParallelConfig};
pub use crate::error::{Result, SeqError};
pub use crate::numeric::Numeric;
pub use crate::value::{FromValue, Value};
