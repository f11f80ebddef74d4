//! `distinct`, `distinct_by`, `distinct_with`, plus the comparer-driven set
//! used by every hashing operator.

use std::collections::HashMap;
use std::rc::Rc;

use lazyseq_core::compare::{DefaultEquality, EqualityComparer};

use crate::plan::OpPlan;
use crate::traits::Seq;

/// Hash set whose equality and hashing come from an `EqualityComparer`.
pub struct KeySet<K, C> {
    buckets: HashMap<u64, Vec<K>>,
    comparer: C,
    len: usize,
}

impl<K, C: EqualityComparer<K>> KeySet<K, C> {
    pub fn new(comparer: C) -> Self {
        Self {
            buckets: HashMap::new(),
            comparer,
            len: 0,
        }
    }

    /// Returns `false` if an equal key is already present.
    pub fn insert(&mut self, key: K) -> bool {
        let bucket = self
            .buckets
            .entry(self.comparer.hash_code(&key))
            .or_default();
        if bucket.iter().any(|k| self.comparer.equals(k, &key)) {
            return false;
        }
        bucket.push(key);
        self.len += 1;
        true
    }

    pub fn contains(&self, key: &K) -> bool {
        self.buckets
            .get(&self.comparer.hash_code(key))
            .is_some_and(|b| b.iter().any(|k| self.comparer.equals(k, key)))
    }

    /// Returns `true` if an equal key was present and is now gone.
    pub fn remove(&mut self, key: &K) -> bool {
        let Some(bucket) = self.buckets.get_mut(&self.comparer.hash_code(key)) else {
            return false;
        };
        match bucket.iter().position(|k| self.comparer.equals(k, key)) {
            Some(pos) => {
                bucket.swap_remove(pos);
                self.len -= 1;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<'a, T: 'a> Seq<'a, T> {
    /// First occurrence of each distinct element, in encounter order.
    pub fn distinct(&self) -> Seq<'a, T>
    where
        T: std::hash::Hash + Eq + Clone,
    {
        self.distinct_named("distinct", DefaultEquality)
    }

    /// First occurrence of each distinct key, in encounter order.
    pub fn distinct_by<K, F>(&self, key: F) -> Seq<'a, T>
    where
        K: std::hash::Hash + Eq + 'a,
        F: Fn(&T) -> K + 'a,
    {
        let up = self.clone();
        let key = Rc::new(key);
        self.derive(OpPlan::streaming("distinct_by"), move || {
            let key = Rc::clone(&key);
            let mut seen = KeySet::new(DefaultEquality);
            Box::new(up.traverse().filter(move |item| match item {
                Ok(v) => seen.insert(key(v)),
                Err(_) => true,
            }))
        })
    }

    /// `distinct` under a caller-supplied equality.
    pub fn distinct_with<C>(&self, comparer: C) -> Seq<'a, T>
    where
        T: Clone,
        C: EqualityComparer<T> + Clone + 'a,
    {
        self.distinct_named("distinct_with", comparer)
    }

    fn distinct_named<C>(&self, name: &'static str, comparer: C) -> Seq<'a, T>
    where
        T: Clone,
        C: EqualityComparer<T> + Clone + 'a,
    {
        let up = self.clone();
        self.derive(OpPlan::streaming(name), move || {
            let mut seen = KeySet::new(comparer.clone());
            Box::new(up.traverse().filter(move |item| match item {
                Ok(v) => seen.insert(v.clone()),
                Err(_) => true,
            }))
        })
    }
}
