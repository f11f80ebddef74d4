//! The lazy sequence core: the `Source` traversal protocol and `Seq`.
//!
//! A `Seq` is a restartable factory of traversals. `traverse()` begins a new,
//! independent pass and re-runs the generation logic of every operator in the
//! chain; nothing is cached between passes unless `materialize()` is used.
//!
//! Each traversal yields `Result<T>`. An `Err` element marks the point where
//! enumeration hit a failure (bad argument, type mismatch, caller error).
//! Terminal operators stop at the first `Err` and return it as-is.

use std::fmt;
use std::rc::Rc;

use lazyseq_core::error::{Result, SeqError};

use crate::plan::{Evaluation, OpPlan};

/// One traversal of a sequence.
pub type SeqIter<'a, T> = Box<dyn Iterator<Item = Result<T>> + 'a>;

/// Anything that can begin a fresh traversal.
///
/// Invariants:
/// - `traverse` must not produce elements; work starts on the first `next()`.
/// - `known_len`, when `Some`, must equal the number of elements a traversal
///   yields and must be answerable without enumerating.
pub trait Source<'a> {
    type Item;

    fn traverse(&self) -> SeqIter<'a, Self::Item>;

    fn known_len(&self) -> Option<usize> {
        None
    }
}

/// Source assembled from closures; every derived operator is one of these.
pub(crate) struct Deferred<'a, T> {
    traverse: Box<dyn Fn() -> SeqIter<'a, T> + 'a>,
    len: Box<dyn Fn() -> Option<usize> + 'a>,
}

impl<'a, T: 'a> Source<'a> for Deferred<'a, T> {
    type Item = T;

    fn traverse(&self) -> SeqIter<'a, T> {
        (self.traverse)()
    }

    fn known_len(&self) -> Option<usize> {
        (self.len)()
    }
}

/// A lazily-evaluated, possibly infinite, ordered sequence.
///
/// Cloning is cheap and shares the underlying source.
pub struct Seq<'a, T> {
    source: Rc<dyn Source<'a, Item = T> + 'a>,
    plan: Rc<Vec<OpPlan>>,
}

impl<'a, T> Clone for Seq<'a, T> {
    fn clone(&self) -> Self {
        Self {
            source: Rc::clone(&self.source),
            plan: Rc::clone(&self.plan),
        }
    }
}

impl<'a, T> fmt::Debug for Seq<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.plan.iter().map(|p| p.name).collect();
        f.debug_struct("Seq").field("plan", &names).finish()
    }
}

impl<'a, T: 'a> Seq<'a, T> {
    /// Wrap a custom source.
    pub fn from_source<S>(source: S, name: &'static str) -> Self
    where
        S: Source<'a, Item = T> + 'a,
    {
        Self {
            source: Rc::new(source),
            plan: Rc::new(vec![OpPlan::source(name)]),
        }
    }

    /// Begin a new traversal.
    pub fn traverse(&self) -> SeqIter<'a, T> {
        self.source.traverse()
    }

    /// Length if the source can report it without enumerating.
    pub fn known_len(&self) -> Option<usize> {
        self.source.known_len()
    }

    /// Lineage of operators that produced this sequence, source first.
    pub fn plan(&self) -> &[OpPlan] {
        &self.plan
    }

    /// Names of the operators in the lineage that buffer before yielding.
    pub fn buffering_steps(&self) -> Vec<&'static str> {
        self.plan
            .iter()
            .filter(|p| !p.evaluation.is_lazy())
            .map(|p| p.name)
            .collect()
    }

    pub fn explain_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&*self.plan)?)
    }

    pub(crate) fn derive<U: 'a>(
        &self,
        op: OpPlan,
        traverse: impl Fn() -> SeqIter<'a, U> + 'a,
    ) -> Seq<'a, U> {
        self.derive_sized(op, traverse, || None)
    }

    pub(crate) fn derive_sized<U: 'a>(
        &self,
        op: OpPlan,
        traverse: impl Fn() -> SeqIter<'a, U> + 'a,
        len: impl Fn() -> Option<usize> + 'a,
    ) -> Seq<'a, U> {
        let mut lineage = (*self.plan).clone();
        lineage.push(op);
        Seq {
            source: Rc::new(Deferred {
                traverse: Box::new(traverse),
                len: Box::new(len),
            }),
            plan: Rc::new(lineage),
        }
    }

    pub(crate) fn from_parts(
        name: &'static str,
        traverse: impl Fn() -> SeqIter<'a, T> + 'a,
        len: impl Fn() -> Option<usize> + 'a,
    ) -> Self {
        Self {
            source: Rc::new(Deferred {
                traverse: Box::new(traverse),
                len: Box::new(len),
            }),
            plan: Rc::new(vec![OpPlan::new(name, Evaluation::Source)]),
        }
    }
}

/// Traversal that yields one error and ends.
pub(crate) fn fail<'a, T: 'a>(err: SeqError) -> SeqIter<'a, T> {
    Box::new(std::iter::once(Err(err)))
}

/// Defer building the real traversal until the consumer first pulls.
///
/// Buffering operators use this so that `traverse()` itself stays free of work.
pub(crate) fn on_first_pull<'a, T: 'a>(
    init: impl FnOnce() -> SeqIter<'a, T> + 'a,
) -> SeqIter<'a, T> {
    Box::new(OnFirstPull {
        init: Some(Box::new(init)),
        inner: None,
    })
}

struct OnFirstPull<'a, T> {
    init: Option<Box<dyn FnOnce() -> SeqIter<'a, T> + 'a>>,
    inner: Option<SeqIter<'a, T>>,
}

impl<'a, T> Iterator for OnFirstPull<'a, T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(init) = self.init.take() {
            self.inner = Some(init());
        }
        self.inner.as_mut()?.next()
    }
}

/// Drain a traversal into a vector, stopping at the first error.
pub(crate) fn drain<T>(iter: SeqIter<'_, T>) -> Result<Vec<T>> {
    iter.collect()
}
