//! Positional pairing of two sequences.

use std::rc::Rc;

use crate::plan::OpPlan;
use crate::traits::Seq;

impl<'a, T: 'a> Seq<'a, T> {
    /// Pair elements by position; stops when either side is exhausted.
    pub fn zip<U: 'a>(&self, other: &Seq<'a, U>) -> Seq<'a, (T, U)> {
        self.zip_named("zip", other, |a, b| (a, b))
    }

    /// Combine elements by position; stops when either side is exhausted.
    pub fn zip_with<U, R, F>(&self, other: &Seq<'a, U>, combiner: F) -> Seq<'a, R>
    where
        U: 'a,
        R: 'a,
        F: Fn(T, U) -> R + 'a,
    {
        self.zip_named("zip_with", other, combiner)
    }

    fn zip_named<U, R, F>(&self, name: &'static str, other: &Seq<'a, U>, combiner: F) -> Seq<'a, R>
    where
        U: 'a,
        R: 'a,
        F: Fn(T, U) -> R + 'a,
    {
        let left = self.clone();
        let right = other.clone();
        let (len_left, len_right) = (self.clone(), other.clone());
        let combiner = Rc::new(combiner);
        self.derive_sized(
            OpPlan::streaming(name).with_side_input(other.plan()),
            move || {
                let combiner = Rc::clone(&combiner);
                Box::new(left.traverse().zip(right.traverse()).map(move |pair| match pair {
                    (Ok(a), Ok(b)) => Ok(combiner(a, b)),
                    (Err(e), _) | (_, Err(e)) => Err(e),
                }))
            },
            move || Some(len_left.known_len()?.min(len_right.known_len()?)),
        )
    }
}
