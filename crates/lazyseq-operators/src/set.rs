//! Set operators: `union`, `intersect`, `except` and their keyed forms.
//!
//! `intersect` and `except` drain the right-hand sequence into a set on the
//! first pull, then stream the left. `union` streams both sides.

use std::hash::Hash;
use std::rc::Rc;

use lazyseq_core::compare::DefaultEquality;

use crate::distinct::KeySet;
use crate::plan::OpPlan;
use crate::trace::trace_buffered;
use crate::traits::{fail, on_first_pull, Seq, SeqIter};

impl<'a, T: 'a> Seq<'a, T> {
    /// Distinct elements of `self` followed by `other`, in encounter order.
    pub fn union(&self, other: &Seq<'a, T>) -> Seq<'a, T>
    where
        T: Hash + Eq + Clone,
    {
        self.union_named("union", other, |v: &T| v.clone())
    }

    pub fn union_by<K, F>(&self, other: &Seq<'a, T>, key: F) -> Seq<'a, T>
    where
        K: Hash + Eq + 'a,
        F: Fn(&T) -> K + 'a,
    {
        self.union_named("union_by", other, key)
    }

    fn union_named<K, F>(&self, name: &'static str, other: &Seq<'a, T>, key: F) -> Seq<'a, T>
    where
        K: Hash + Eq + 'a,
        F: Fn(&T) -> K + 'a,
    {
        let left = self.clone();
        let right = other.clone();
        let key = Rc::new(key);
        self.derive(
            OpPlan::streaming(name).with_side_input(other.plan()),
            move || {
                let key = Rc::clone(&key);
                let mut seen = KeySet::new(DefaultEquality);
                Box::new(
                    left.traverse()
                        .chain(right.traverse())
                        .filter(move |item| match item {
                            Ok(v) => seen.insert(key(v)),
                            Err(_) => true,
                        }),
                )
            },
        )
    }

    /// Distinct elements of `self` that also occur in `other`.
    pub fn intersect(&self, other: &Seq<'a, T>) -> Seq<'a, T>
    where
        T: Hash + Eq + Clone,
    {
        self.membership("intersect", other, |v: &T| v.clone(), true)
    }

    pub fn intersect_by<K, F>(&self, other: &Seq<'a, T>, key: F) -> Seq<'a, T>
    where
        K: Hash + Eq + 'a,
        F: Fn(&T) -> K + 'a,
    {
        self.membership("intersect_by", other, key, true)
    }

    /// Distinct elements of `self` that do not occur in `other`.
    pub fn except(&self, other: &Seq<'a, T>) -> Seq<'a, T>
    where
        T: Hash + Eq + Clone,
    {
        self.membership("except", other, |v: &T| v.clone(), false)
    }

    pub fn except_by<K, F>(&self, other: &Seq<'a, T>, key: F) -> Seq<'a, T>
    where
        K: Hash + Eq + 'a,
        F: Fn(&T) -> K + 'a,
    {
        self.membership("except_by", other, key, false)
    }

    /// Shared body of intersect/except.
    ///
    /// intersect: keep a left element if its key is in the right set, then
    /// remove the key so later duplicates are dropped.
    /// except: keep a left element if inserting its key into the right set
    /// succeeds, which also records it against later duplicates.
    fn membership<K, F>(
        &self,
        name: &'static str,
        other: &Seq<'a, T>,
        key: F,
        keep_present: bool,
    ) -> Seq<'a, T>
    where
        K: Hash + Eq + 'a,
        F: Fn(&T) -> K + 'a,
    {
        let left = self.clone();
        let right = other.clone();
        let key = Rc::new(key);
        self.derive(
            OpPlan::buffered_other(name).with_side_input(other.plan()),
            move || {
                let left = left.clone();
                let right = right.clone();
                let key = Rc::clone(&key);
                on_first_pull(move || -> SeqIter<'a, T> {
                    let mut set = KeySet::new(DefaultEquality);
                    for item in right.traverse() {
                        match item {
                            Ok(v) => {
                                set.insert(key(&v));
                            }
                            Err(e) => return fail(e),
                        }
                    }
                    trace_buffered(name, set.len());
                    Box::new(left.traverse().filter(move |item| match item {
                        Ok(v) => {
                            let k = key(v);
                            if keep_present {
                                set.remove(&k)
                            } else {
                                set.insert(k)
                            }
                        }
                        Err(_) => true,
                    }))
                })
            },
        )
    }
}
