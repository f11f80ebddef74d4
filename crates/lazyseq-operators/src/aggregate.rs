//! Aggregation: `aggregate`, `fold`, `max`/`min` (+ `_by`), `average`, `sum`.
//!
//! Operators with no natural identity (aggregate without seed, max, min,
//! average) fail with `EmptySequence` on empty input.

use std::cmp::Ordering;

use lazyseq_core::compare::compare_partial;
use lazyseq_core::error::{Result, SeqError};
use lazyseq_core::numeric::Numeric;

use crate::traits::Seq;

impl<'a, T: 'a> Seq<'a, T> {
    /// Left fold seeded with the first element.
    pub fn aggregate<F>(&self, f: F) -> Result<T>
    where
        F: Fn(T, T) -> T,
    {
        let mut iter = self.traverse();
        let mut acc = match iter.next() {
            Some(item) => item?,
            None => return Err(SeqError::EmptySequence { op: "aggregate" }),
        };
        for item in iter {
            acc = f(acc, item?);
        }
        Ok(acc)
    }

    /// Left fold from `seed`.
    pub fn fold<A, F>(&self, seed: A, f: F) -> Result<A>
    where
        F: Fn(A, T) -> A,
    {
        let mut acc = seed;
        for item in self.traverse() {
            acc = f(acc, item?);
        }
        Ok(acc)
    }

    /// First maximal element.
    pub fn max(&self) -> Result<T>
    where
        T: PartialOrd,
    {
        self.extreme("max", Ordering::Greater, &compare_partial::<T>)
    }

    /// First minimal element.
    pub fn min(&self) -> Result<T>
    where
        T: PartialOrd,
    {
        self.extreme("min", Ordering::Less, &compare_partial::<T>)
    }

    /// First element with the maximal key.
    pub fn max_by<K, F>(&self, key: F) -> Result<T>
    where
        K: PartialOrd,
        F: Fn(&T) -> K,
    {
        self.extreme_by_key("max_by", Ordering::Greater, &key)
    }

    /// First element with the minimal key.
    pub fn min_by<K, F>(&self, key: F) -> Result<T>
    where
        K: PartialOrd,
        F: Fn(&T) -> K,
    {
        self.extreme_by_key("min_by", Ordering::Less, &key)
    }

    fn extreme(
        &self,
        op: &'static str,
        wins: Ordering,
        cmp: &dyn Fn(&T, &T) -> Ordering,
    ) -> Result<T> {
        let mut best: Option<T> = None;
        for item in self.traverse() {
            let v = item?;
            let replace = match &best {
                Some(b) => cmp(&v, b) == wins,
                None => true,
            };
            if replace {
                best = Some(v);
            }
        }
        best.ok_or(SeqError::EmptySequence { op })
    }

    fn extreme_by_key<K: PartialOrd>(
        &self,
        op: &'static str,
        wins: Ordering,
        key: &dyn Fn(&T) -> K,
    ) -> Result<T> {
        let mut best: Option<(T, K)> = None;
        for item in self.traverse() {
            let v = item?;
            let k = key(&v);
            let replace = match &best {
                Some((_, bk)) => compare_partial(&k, bk) == wins,
                None => true,
            };
            if replace {
                best = Some((v, k));
            }
        }
        best.map(|(v, _)| v).ok_or(SeqError::EmptySequence { op })
    }

    /// Arithmetic mean of numeric elements, as `f64`.
    pub fn average(&self) -> Result<f64>
    where
        T: Numeric,
    {
        self.average_by(|v| *v)
    }

    pub fn average_by<N, F>(&self, selector: F) -> Result<f64>
    where
        N: Numeric,
        F: Fn(&T) -> N,
    {
        let mut total = 0.0f64;
        let mut n = 0usize;
        for item in self.traverse() {
            total += selector(&item?).to_f64();
            n += 1;
        }
        if n == 0 {
            return Err(SeqError::EmptySequence { op: "average" });
        }
        Ok(total / n as f64)
    }

    /// Sum with overflow detection; zero on empty input.
    pub fn sum(&self) -> Result<T>
    where
        T: Numeric,
    {
        self.sum_by(|v| *v)
    }

    pub fn sum_by<N, F>(&self, selector: F) -> Result<N>
    where
        N: Numeric,
        F: Fn(&T) -> N,
    {
        let mut total = N::zero();
        for item in self.traverse() {
            total = total
                .checked_add(selector(&item?))
                .ok_or(SeqError::ArithmeticOverflow { op: "sum" })?;
        }
        Ok(total)
    }
}
