//! Ordering operators.
//!
//! Sorting and reversal cannot be lazy: both drain upstream on the first
//! pull and re-expose the buffered result. Each traversal re-drains and
//! re-sorts, so a restartable upstream is re-evaluated every time.

pub mod ordered;

pub use ordered::OrderedSeq;

use lazyseq_core::compare::{Comparer, NaturalOrder, SortDirection};

use crate::plan::OpPlan;
use crate::trace::trace_buffered;
use crate::traits::{drain, fail, on_first_pull, Seq, SeqIter};

impl<'a, T: 'a> Seq<'a, T> {
    /// Stable ascending sort by `key`.
    pub fn order_by<K, F>(&self, key: F) -> OrderedSeq<'a, T>
    where
        K: Ord,
        F: Fn(&T) -> K + 'a,
    {
        OrderedSeq::new(self, key, SortDirection::Ascending, NaturalOrder)
    }

    /// Stable descending sort by `key`; equal keys keep their original order.
    pub fn order_by_descending<K, F>(&self, key: F) -> OrderedSeq<'a, T>
    where
        K: Ord,
        F: Fn(&T) -> K + 'a,
    {
        OrderedSeq::new(self, key, SortDirection::Descending, NaturalOrder)
    }

    /// Stable sort by `key` under a caller-supplied comparer.
    pub fn order_by_with<K, F, C>(&self, key: F, direction: SortDirection, comparer: C) -> OrderedSeq<'a, T>
    where
        F: Fn(&T) -> K + 'a,
        C: Comparer<K> + 'a,
    {
        OrderedSeq::new(self, key, direction, comparer)
    }

    /// Elements in reverse order. Drains upstream on first pull.
    pub fn reverse(&self) -> Seq<'a, T> {
        let up = self.clone();
        let len_up = self.clone();
        self.derive_sized(
            OpPlan::buffered("reverse"),
            move || {
                let up = up.clone();
                on_first_pull(move || -> SeqIter<'a, T> {
                    match drain(up.traverse()) {
                        Ok(items) => {
                            trace_buffered("reverse", items.len());
                            Box::new(items.into_iter().rev().map(Ok))
                        }
                        Err(e) => fail(e),
                    }
                })
            },
            move || len_up.known_len(),
        )
    }
}
