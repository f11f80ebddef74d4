//! Element comparison and equality capabilities.
//!
//! Ordering operators take a [`Comparer`], hashing operators (distinct, set
//! operations) take an [`EqualityComparer`]. Both have a "natural" default
//! backed by `Ord` / `Hash + Eq`, and plain closures work as comparers.

use std::cmp::Ordering;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Direction of one sort criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    /// Apply this direction to an ascending comparison result.
    pub fn apply(self, ord: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    }
}

/// Total ordering over `T`.
pub trait Comparer<T: ?Sized> {
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

impl<T: ?Sized, F> Comparer<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}

/// Comparer backed by `Ord`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NaturalOrder;

impl<T: Ord + ?Sized> Comparer<T> for NaturalOrder {
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

/// Comparer for partially ordered values; incomparable pairs (NaN) compare equal.
#[derive(Debug, Clone, Copy, Default)]
pub struct PartialOrder;

impl<T: PartialOrd + ?Sized> Comparer<T> for PartialOrder {
    fn compare(&self, a: &T, b: &T) -> Ordering {
        compare_partial(a, b)
    }
}

pub fn compare_partial<T: PartialOrd + ?Sized>(a: &T, b: &T) -> Ordering {
    a.partial_cmp(b).unwrap_or(Ordering::Equal)
}

/// Equality plus a hash consistent with it.
///
/// Invariant: `equals(a, b)` implies `hash_code(a) == hash_code(b)`.
pub trait EqualityComparer<T: ?Sized> {
    fn equals(&self, a: &T, b: &T) -> bool;
    fn hash_code(&self, value: &T) -> u64;
}

/// Equality backed by `Hash + Eq`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultEquality;

impl<T: Hash + Eq + ?Sized> EqualityComparer<T> for DefaultEquality {
    fn equals(&self, a: &T, b: &T) -> bool {
        a == b
    }

    fn hash_code(&self, value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }
}

/// Case-insensitive ASCII equality for string-like elements.
#[derive(Debug, Clone, Copy, Default)]
pub struct AsciiCaseInsensitive;

impl<T: AsRef<str> + ?Sized> EqualityComparer<T> for AsciiCaseInsensitive {
    fn equals(&self, a: &T, b: &T) -> bool {
        a.as_ref().eq_ignore_ascii_case(b.as_ref())
    }

    fn hash_code(&self, value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        for b in value.as_ref().bytes() {
            hasher.write_u8(b.to_ascii_lowercase());
        }
        hasher.finish()
    }
}
