//! `append`, `prepend`, `concat`, `default_if_empty`.

use crate::plan::OpPlan;
use crate::traits::{on_first_pull, Seq, SeqIter};

fn add_len(a: Option<usize>, b: Option<usize>) -> Option<usize> {
    a?.checked_add(b?)
}

impl<'a, T: Clone + 'a> Seq<'a, T> {
    /// `self` followed by `value`.
    pub fn append(&self, value: T) -> Seq<'a, T> {
        let up = self.clone();
        let len_up = self.clone();
        self.derive_sized(
            OpPlan::streaming("append"),
            move || Box::new(up.traverse().chain(std::iter::once(Ok(value.clone())))),
            move || add_len(len_up.known_len(), Some(1)),
        )
    }

    /// `value` followed by `self`.
    pub fn prepend(&self, value: T) -> Seq<'a, T> {
        let up = self.clone();
        let len_up = self.clone();
        self.derive_sized(
            OpPlan::streaming("prepend"),
            move || Box::new(std::iter::once(Ok(value.clone())).chain(up.traverse())),
            move || add_len(Some(1), len_up.known_len()),
        )
    }

    /// Yield `value` once if `self` turns out to be empty.
    pub fn default_if_empty(&self, value: T) -> Seq<'a, T> {
        let up = self.clone();
        self.derive(OpPlan::streaming("default_if_empty"), move || {
            let up = up.clone();
            let value = value.clone();
            on_first_pull(move || -> SeqIter<'a, T> {
                let mut inner = up.traverse().peekable();
                let fallback = inner.peek().is_none().then_some(Ok(value));
                Box::new(inner.chain(fallback))
            })
        })
    }
}

impl<'a, T: 'a> Seq<'a, T> {
    /// `self` followed by `other`.
    pub fn concat(&self, other: &Seq<'a, T>) -> Seq<'a, T> {
        let left = self.clone();
        let right = other.clone();
        let (len_left, len_right) = (self.clone(), other.clone());
        self.derive_sized(
            OpPlan::streaming("concat").with_side_input(other.plan()),
            move || Box::new(left.traverse().chain(right.traverse())),
            move || add_len(len_left.known_len(), len_right.known_len()),
        )
    }
}
