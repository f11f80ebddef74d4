//! Grouping: `group_by`, `Grouping`, and the materialized `Lookup`.
//!
//! A group is never emitted before upstream is exhausted, since a later
//! element may still belong to an earlier key.

use std::collections::HashMap;
use std::hash::Hash;
use std::rc::Rc;

use lazyseq_core::error::Result;

use crate::plan::OpPlan;
use crate::trace::trace_buffered;
use crate::traits::{fail, on_first_pull, Seq, SeqIter};

/// A key with the elements that share it, in encounter order.
#[derive(Debug, Clone, PartialEq)]
pub struct Grouping<K, T> {
    key: K,
    elements: Vec<T>,
}

impl<K, T> Grouping<K, T> {
    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn elements(&self) -> &[T] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn into_parts(self) -> (K, Vec<T>) {
        (self.key, self.elements)
    }

    /// The group's elements as a sequence.
    pub fn to_seq<'a>(&self) -> Seq<'a, T>
    where
        T: Clone + 'a,
    {
        Seq::from_vec(self.elements.clone())
    }
}

/// Single pass over `iter`, keeping keys in first-appearance order.
fn collect_groups<K, T>(
    iter: SeqIter<'_, T>,
    key: &dyn Fn(&T) -> K,
) -> Result<(Vec<Grouping<K, T>>, HashMap<K, usize>)>
where
    K: Hash + Eq + Clone,
{
    let mut groups: Vec<Grouping<K, T>> = Vec::new();
    let mut slots: HashMap<K, usize> = HashMap::new();
    for item in iter {
        let v = item?;
        let k = key(&v);
        match slots.get(&k) {
            Some(&slot) => groups[slot].elements.push(v),
            None => {
                slots.insert(k.clone(), groups.len());
                groups.push(Grouping {
                    key: k,
                    elements: vec![v],
                });
            }
        }
    }
    Ok((groups, slots))
}

/// Materialized key -> elements index.
#[derive(Debug, Clone)]
pub struct Lookup<K, T> {
    groups: Vec<Grouping<K, T>>,
    slots: HashMap<K, usize>,
}

impl<K: Hash + Eq, T> Lookup<K, T> {
    /// Elements for `key`; empty when the key never appeared.
    pub fn get(&self, key: &K) -> &[T] {
        self.slots
            .get(key)
            .map(|&slot| self.groups[slot].elements())
            .unwrap_or(&[])
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.slots.contains_key(key)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Groups in first-appearance key order.
    pub fn iter(&self) -> std::slice::Iter<'_, Grouping<K, T>> {
        self.groups.iter()
    }

    pub fn into_groups(self) -> Vec<Grouping<K, T>> {
        self.groups
    }
}

impl<'a, T: 'a> Seq<'a, T> {
    /// Group elements by key. Groups come out in first-appearance key order.
    pub fn group_by<K, F>(&self, key: F) -> Seq<'a, Grouping<K, T>>
    where
        K: Hash + Eq + Clone + 'a,
        F: Fn(&T) -> K + 'a,
    {
        let up = self.clone();
        let key = Rc::new(key);
        self.derive(OpPlan::buffered("group_by"), move || {
            let up = up.clone();
            let key = Rc::clone(&key);
            on_first_pull(move || -> SeqIter<'a, Grouping<K, T>> {
                match collect_groups(up.traverse(), &*key) {
                    Ok((groups, _)) => {
                        trace_buffered("group_by", groups.len());
                        Box::new(groups.into_iter().map(Ok))
                    }
                    Err(e) => fail(e),
                }
            })
        })
    }

    /// Eagerly build a `Lookup` keyed by `key`.
    pub fn to_lookup<K, F>(&self, key: F) -> Result<Lookup<K, T>>
    where
        K: Hash + Eq + Clone,
        F: Fn(&T) -> K,
    {
        let (groups, slots) = collect_groups(self.traverse(), &key)?;
        Ok(Lookup { groups, slots })
    }
}
