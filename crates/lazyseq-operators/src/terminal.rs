//! Terminal operators: element access, quantifiers, counting and conversions.
//!
//! Each call starts its own traversal and consumes it to completion or until
//! the answer is known. A non-restartable upstream is exhausted afterwards.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use lazyseq_core::error::{Result, SeqError};

use crate::traits::{drain, Seq};

impl<'a, T: 'a> Seq<'a, T> {
    pub fn to_vec(&self) -> Result<Vec<T>> {
        drain(self.traverse())
    }

    pub fn to_hash_set(&self) -> Result<HashSet<T>>
    where
        T: Hash + Eq,
    {
        self.traverse().collect()
    }

    /// Build a map; a repeated key fails with `InvalidArgument`.
    pub fn to_map<K, V, FK, FV>(&self, key: FK, value: FV) -> Result<HashMap<K, V>>
    where
        K: Hash + Eq,
        FK: Fn(&T) -> K,
        FV: Fn(T) -> V,
    {
        let mut map = HashMap::new();
        for (position, item) in self.traverse().enumerate() {
            let v = item?;
            let k = key(&v);
            if map.contains_key(&k) {
                return Err(SeqError::InvalidArgument(format!(
                    "to_map: duplicate key at position {position}"
                )));
            }
            map.insert(k, value(v));
        }
        Ok(map)
    }

    pub fn for_each<F>(&self, mut f: F) -> Result<()>
    where
        F: FnMut(T),
    {
        for item in self.traverse() {
            f(item?);
        }
        Ok(())
    }

    /// Number of elements. Uses the source's known length when it has one.
    pub fn count(&self) -> Result<usize> {
        if let Some(len) = self.known_len() {
            return Ok(len);
        }
        let mut n = 0usize;
        for item in self.traverse() {
            item?;
            n += 1;
        }
        Ok(n)
    }

    pub fn count_where<P>(&self, pred: P) -> Result<usize>
    where
        P: Fn(&T) -> bool,
    {
        let mut n = 0usize;
        for item in self.traverse() {
            if pred(&item?) {
                n += 1;
            }
        }
        Ok(n)
    }

    /// `true` iff the sequence has at least one element.
    pub fn any(&self) -> Result<bool> {
        match self.traverse().next() {
            Some(item) => item.map(|_| true),
            None => Ok(false),
        }
    }

    /// Stops at the first element satisfying `pred`.
    pub fn any_where<P>(&self, pred: P) -> Result<bool>
    where
        P: Fn(&T) -> bool,
    {
        Ok(self.find_first(&pred)?.is_some())
    }

    /// Stops at the first element falsifying `pred`; `true` on empty input.
    pub fn all<P>(&self, pred: P) -> Result<bool>
    where
        P: Fn(&T) -> bool,
    {
        Ok(self.find_first(&|v: &T| !pred(v))?.is_none())
    }

    pub fn contains(&self, value: &T) -> Result<bool>
    where
        T: PartialEq,
    {
        self.any_where(|v| v == value)
    }

    pub fn first(&self) -> Result<T> {
        self.find_first(&|_| true)?
            .ok_or(SeqError::EmptySequence { op: "first" })
    }

    pub fn first_where<P>(&self, pred: P) -> Result<T>
    where
        P: Fn(&T) -> bool,
    {
        self.find_first(&pred)?
            .ok_or(SeqError::EmptySequence { op: "first_where" })
    }

    pub fn first_or_default(&self) -> Result<T>
    where
        T: Default,
    {
        Ok(self.find_first(&|_| true)?.unwrap_or_default())
    }

    pub fn first_or_default_where<P>(&self, pred: P) -> Result<T>
    where
        T: Default,
        P: Fn(&T) -> bool,
    {
        Ok(self.find_first(&pred)?.unwrap_or_default())
    }

    pub fn last(&self) -> Result<T> {
        self.find_last(&|_| true)?
            .ok_or(SeqError::EmptySequence { op: "last" })
    }

    pub fn last_where<P>(&self, pred: P) -> Result<T>
    where
        P: Fn(&T) -> bool,
    {
        self.find_last(&pred)?
            .ok_or(SeqError::EmptySequence { op: "last_where" })
    }

    pub fn last_or_default(&self) -> Result<T>
    where
        T: Default,
    {
        Ok(self.find_last(&|_| true)?.unwrap_or_default())
    }

    pub fn last_or_default_where<P>(&self, pred: P) -> Result<T>
    where
        T: Default,
        P: Fn(&T) -> bool,
    {
        Ok(self.find_last(&pred)?.unwrap_or_default())
    }

    /// The only element. Fails on empty input and on a second element.
    pub fn single(&self) -> Result<T> {
        self.find_single("single", &|_| true)?
            .ok_or(SeqError::EmptySequence { op: "single" })
    }

    pub fn single_where<P>(&self, pred: P) -> Result<T>
    where
        P: Fn(&T) -> bool,
    {
        self.find_single("single_where", &pred)?
            .ok_or(SeqError::EmptySequence { op: "single_where" })
    }

    /// Default on empty input; still fails with `MultipleElements`.
    pub fn single_or_default(&self) -> Result<T>
    where
        T: Default,
    {
        Ok(self
            .find_single("single_or_default", &|_| true)?
            .unwrap_or_default())
    }

    pub fn single_or_default_where<P>(&self, pred: P) -> Result<T>
    where
        T: Default,
        P: Fn(&T) -> bool,
    {
        Ok(self
            .find_single("single_or_default_where", &pred)?
            .unwrap_or_default())
    }

    /// Element at zero-based `index`; `IndexOutOfRange` past the end.
    pub fn element_at(&self, index: usize) -> Result<T> {
        match self.find_at(index)? {
            Ok(v) => Ok(v),
            Err(len) => Err(SeqError::IndexOutOfRange { index, len }),
        }
    }

    pub fn element_at_or_default(&self, index: usize) -> Result<T>
    where
        T: Default,
    {
        Ok(self.find_at(index)?.unwrap_or_default())
    }

    /// Same length and pairwise equal elements.
    pub fn sequence_equal(&self, other: &Seq<'a, T>) -> Result<bool>
    where
        T: PartialEq,
    {
        if let (Some(a), Some(b)) = (self.known_len(), other.known_len()) {
            if a != b {
                return Ok(false);
            }
        }
        let mut left = self.traverse();
        let mut right = other.traverse();
        loop {
            match (left.next(), right.next()) {
                (None, None) => return Ok(true),
                (Some(a), Some(b)) => {
                    if a? != b? {
                        return Ok(false);
                    }
                }
                (Some(a), None) => {
                    a?;
                    return Ok(false);
                }
                (None, Some(b)) => {
                    b?;
                    return Ok(false);
                }
            }
        }
    }

    fn find_first(&self, pred: &dyn Fn(&T) -> bool) -> Result<Option<T>> {
        for item in self.traverse() {
            let v = item?;
            if pred(&v) {
                return Ok(Some(v));
            }
        }
        Ok(None)
    }

    /// Holds only the most recent match.
    fn find_last(&self, pred: &dyn Fn(&T) -> bool) -> Result<Option<T>> {
        let mut last = None;
        for item in self.traverse() {
            let v = item?;
            if pred(&v) {
                last = Some(v);
            }
        }
        Ok(last)
    }

    /// Short-circuits at the second match.
    fn find_single(&self, op: &'static str, pred: &dyn Fn(&T) -> bool) -> Result<Option<T>> {
        let mut found = None;
        for item in self.traverse() {
            let v = item?;
            if pred(&v) {
                if found.is_some() {
                    return Err(SeqError::MultipleElements { op });
                }
                found = Some(v);
            }
        }
        Ok(found)
    }

    /// `Ok(Ok(v))` on hit, `Ok(Err(len))` when the sequence is shorter.
    fn find_at(&self, index: usize) -> Result<std::result::Result<T, usize>> {
        if let Some(len) = self.known_len() {
            if index >= len {
                return Ok(Err(len));
            }
        }
        let mut seen = 0usize;
        for item in self.traverse() {
            let v = item?;
            if seen == index {
                return Ok(Ok(v));
            }
            seen += 1;
        }
        Ok(Err(seen))
    }
}
