#![forbid(unsafe_code)]
//! lazyseq-core: error kinds, configuration, comparers, numeric capability and
//! the dynamic `Value` used by cast-style operators.
//!
//! Nothing in here iterates. The sequence core and every operator live in
//! `lazyseq-operators`; the parallel executor lives in `lazyseq-exec`.

pub mod compare;
pub mod config;
pub mod error;
pub mod numeric;
pub mod prelude;
pub mod value;

pub use error::{Result, SeqError};
