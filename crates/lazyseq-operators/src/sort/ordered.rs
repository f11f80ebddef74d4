//! `OrderedSeq`: a sequence decorated with lexicographic sort criteria.

use std::cmp::Ordering;
use std::rc::Rc;

use lazyseq_core::compare::{Comparer, NaturalOrder, SortDirection};
use lazyseq_core::error::Result;

use crate::plan::OpPlan;
use crate::trace::trace_buffered;
use crate::traits::{drain, fail, on_first_pull, Seq, SeqIter};

type CompareFn<'a, T> = Rc<dyn Fn(&T, &T) -> Ordering + 'a>;

/// Sort criteria layered over an unsorted upstream.
///
/// Immutable: `then_by*` return a new wrapper; the receiver stays usable with
/// its own criteria. Keys are computed inside each comparison, and a
/// criterion is consulted only when all earlier ones compare equal.
pub struct OrderedSeq<'a, T> {
    source: Seq<'a, T>,
    compare: CompareFn<'a, T>,
    criteria: usize,
}

impl<'a, T> Clone for OrderedSeq<'a, T> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            compare: Rc::clone(&self.compare),
            criteria: self.criteria,
        }
    }
}

fn key_compare<'a, T, K, F, C>(key: F, direction: SortDirection, comparer: C) -> CompareFn<'a, T>
where
    T: 'a,
    F: Fn(&T) -> K + 'a,
    C: Comparer<K> + 'a,
{
    Rc::new(move |a: &T, b: &T| direction.apply(comparer.compare(&key(a), &key(b))))
}

impl<'a, T: 'a> OrderedSeq<'a, T> {
    pub(crate) fn new<K, F, C>(
        source: &Seq<'a, T>,
        key: F,
        direction: SortDirection,
        comparer: C,
    ) -> Self
    where
        F: Fn(&T) -> K + 'a,
        C: Comparer<K> + 'a,
    {
        Self {
            source: source.clone(),
            compare: key_compare(key, direction, comparer),
            criteria: 1,
        }
    }

    fn layer(&self, next: CompareFn<'a, T>) -> Self {
        let prev = Rc::clone(&self.compare);
        Self {
            source: self.source.clone(),
            compare: Rc::new(move |a: &T, b: &T| prev(a, b).then_with(|| next(a, b))),
            criteria: self.criteria + 1,
        }
    }

    /// Secondary ascending key.
    pub fn then_by<K, F>(&self, key: F) -> Self
    where
        K: Ord,
        F: Fn(&T) -> K + 'a,
    {
        self.layer(key_compare(key, SortDirection::Ascending, NaturalOrder))
    }

    /// Secondary descending key.
    pub fn then_by_descending<K, F>(&self, key: F) -> Self
    where
        K: Ord,
        F: Fn(&T) -> K + 'a,
    {
        self.layer(key_compare(key, SortDirection::Descending, NaturalOrder))
    }

    /// Secondary key under a caller-supplied comparer.
    pub fn then_by_with<K, F, C>(&self, key: F, direction: SortDirection, comparer: C) -> Self
    where
        F: Fn(&T) -> K + 'a,
        C: Comparer<K> + 'a,
    {
        self.layer(key_compare(key, direction, comparer))
    }

    /// Number of sort criteria, primary included.
    pub fn criteria(&self) -> usize {
        self.criteria
    }

    /// The sorted sequence.
    pub fn seq(&self) -> Seq<'a, T> {
        let up = self.source.clone();
        let len_up = self.source.clone();
        let compare = Rc::clone(&self.compare);
        self.source.derive_sized(
            OpPlan::buffered("order_by"),
            move || {
                let up = up.clone();
                let compare = Rc::clone(&compare);
                on_first_pull(move || -> SeqIter<'a, T> {
                    match drain(up.traverse()) {
                        Ok(mut items) => {
                            trace_buffered("order_by", items.len());
                            // `sort_by` is stable.
                            items.sort_by(|a, b| compare(a, b));
                            Box::new(items.into_iter().map(Ok))
                        }
                        Err(e) => fail(e),
                    }
                })
            },
            move || len_up.known_len(),
        )
    }

    pub fn traverse(&self) -> SeqIter<'a, T> {
        self.seq().traverse()
    }

    pub fn to_vec(&self) -> Result<Vec<T>> {
        self.seq().to_vec()
    }
}

impl<'a, T: 'a> From<OrderedSeq<'a, T>> for Seq<'a, T> {
    fn from(ordered: OrderedSeq<'a, T>) -> Self {
        ordered.seq()
    }
}
