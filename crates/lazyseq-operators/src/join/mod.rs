//! Joining operators.
//!
//! - `hash`: inner hash join (`join`).
//! - `group`: `group_join`, one result per outer element.
//! - `zip`: positional pairing.
//!
//! Both joins drain the inner sequence into a key index on the first pull
//! and stream the outer sequence.

pub mod group;
pub mod hash;
pub mod zip;

use std::collections::HashMap;
use std::hash::Hash;

use lazyseq_core::error::Result;

use crate::traits::Seq;

/// Key -> inner elements in encounter order.
pub(crate) fn build_index<'a, U: 'a, K: Hash + Eq>(
    inner: &Seq<'a, U>,
    key: &dyn Fn(&U) -> K,
) -> Result<HashMap<K, Vec<U>>> {
    let mut index: HashMap<K, Vec<U>> = HashMap::new();
    for item in inner.traverse() {
        let v = item?;
        index.entry(key(&v)).or_default().push(v);
    }
    Ok(index)
}
