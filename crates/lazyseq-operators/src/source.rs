//! Sequence sources: vectors, slices, ranges, generators, one-shot iterators
//! and scoped resources.

use std::cell::RefCell;
use std::rc::Rc;

use lazyseq_core::error::{Result, SeqError};

use crate::traits::{fail, on_first_pull, Seq, SeqIter, Source};

/// Owned vector source. Each traversal clones elements out of shared storage.
pub struct VecSource<T> {
    items: Rc<Vec<T>>,
}

impl<T> VecSource<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items: Rc::new(items),
        }
    }
}

impl<'a, T: Clone + 'a> Source<'a> for VecSource<T> {
    type Item = T;

    fn traverse(&self) -> SeqIter<'a, T> {
        let items = Rc::clone(&self.items);
        Box::new((0..items.len()).map(move |i| Ok(items[i].clone())))
    }

    fn known_len(&self) -> Option<usize> {
        Some(self.items.len())
    }
}

/// Borrowed slice source.
pub struct SliceSource<'a, T> {
    items: &'a [T],
}

impl<'a, T: Clone + 'a> Source<'a> for SliceSource<'a, T> {
    type Item = T;

    fn traverse(&self) -> SeqIter<'a, T> {
        Box::new(self.items.iter().cloned().map(Ok))
    }

    fn known_len(&self) -> Option<usize> {
        Some(self.items.len())
    }
}

/// `count` consecutive integers starting at `start`.
pub struct RangeSource {
    start: i64,
    count: usize,
}

impl RangeSource {
    fn fits(&self) -> bool {
        self.count == 0
            || i64::try_from(self.count - 1)
                .ok()
                .and_then(|span| self.start.checked_add(span))
                .is_some()
    }
}

impl<'a> Source<'a> for RangeSource {
    type Item = i64;

    fn traverse(&self) -> SeqIter<'a, i64> {
        let (start, count) = (self.start, self.count);
        if !self.fits() {
            return on_first_pull(move || {
                fail(SeqError::InvalidArgument(format!(
                    "range start {start} with count {count} overflows i64"
                )))
            });
        }
        Box::new((0..count).map(move |i| Ok(start + i as i64)))
    }

    fn known_len(&self) -> Option<usize> {
        self.fits().then_some(self.count)
    }
}

/// Single-use source: the first traversal consumes the iterator, later
/// traversals are empty.
pub struct OnceSource<I> {
    iter: RefCell<Option<I>>,
}

impl<'a, I> Source<'a> for OnceSource<I>
where
    I: Iterator + 'a,
{
    type Item = I::Item;

    fn traverse(&self) -> SeqIter<'a, I::Item> {
        match self.iter.borrow_mut().take() {
            Some(iter) => Box::new(iter.map(Ok)),
            None => Box::new(std::iter::empty()),
        }
    }
}

/// Traversal over a resource that is opened on first pull and released when
/// the traversal is exhausted or dropped, whichever comes first.
struct ScopedIter<'a, R, T> {
    resource: Option<R>,
    next: Rc<dyn Fn(&mut R) -> Option<Result<T>> + 'a>,
}

impl<'a, R, T> Iterator for ScopedIter<'a, R, T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let resource = self.resource.as_mut()?;
        match (self.next)(resource) {
            Some(item) => Some(item),
            None => {
                self.resource = None;
                None
            }
        }
    }
}

impl<'a, T: 'a> Seq<'a, T> {
    pub fn from_vec(items: Vec<T>) -> Self
    where
        T: Clone,
    {
        Seq::from_source(VecSource::new(items), "from_vec")
    }

    pub fn from_slice(items: &'a [T]) -> Self
    where
        T: Clone,
    {
        Seq::from_source(SliceSource { items }, "from_slice")
    }

    pub fn empty() -> Self {
        Seq::from_parts("empty", || Box::new(std::iter::empty()), || Some(0))
    }

    /// `count` copies of `value`.
    pub fn repeat(value: T, count: usize) -> Self
    where
        T: Clone,
    {
        Seq::from_parts(
            "repeat",
            move || Box::new(std::iter::repeat(value.clone()).take(count).map(Ok)),
            move || Some(count),
        )
    }

    /// Restartable generator: `factory` is invoked once per traversal.
    pub fn restartable<F, I>(factory: F) -> Self
    where
        F: Fn() -> I + 'a,
        I: IntoIterator<Item = T>,
        I::IntoIter: 'a,
    {
        Seq::from_parts(
            "restartable",
            move || Box::new(factory().into_iter().map(Ok)),
            || None,
        )
    }

    /// Restartable generator whose elements may fail.
    pub fn from_fallible<F, I>(factory: F) -> Self
    where
        F: Fn() -> I + 'a,
        I: IntoIterator<Item = Result<T>>,
        I::IntoIter: 'a,
    {
        Seq::from_parts(
            "from_fallible",
            move || Box::new(factory().into_iter()),
            || None,
        )
    }

    /// Possibly infinite sequence `first, next(first), next(next(first)), ...`
    /// ending when `next` returns `None`.
    pub fn successors<F>(first: T, next: F) -> Self
    where
        T: Clone,
        F: Fn(&T) -> Option<T> + 'a,
    {
        let next = Rc::new(next);
        Seq::from_parts(
            "successors",
            move || {
                let next = Rc::clone(&next);
                Box::new(std::iter::successors(Some(first.clone()), move |x| next(x)).map(Ok))
            },
            || None,
        )
    }

    /// Wrap a single-use iterator.
    ///
    /// Precondition: traverse the result at most once. Operators built on top
    /// of it re-invoke this source on every traversal, and every pass after
    /// the first sees an empty sequence.
    pub fn once<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'a,
    {
        Seq::from_source(
            OnceSource {
                iter: RefCell::new(Some(iter.into_iter())),
            },
            "once",
        )
    }

    /// Sequence over a scoped resource.
    ///
    /// `open` runs on the first pull of each traversal; the resource is dropped
    /// as soon as `next` reports exhaustion, or when the traversal is dropped
    /// early. A failing `open` surfaces as the traversal's only element.
    pub fn scoped<R, O, N>(open: O, next: N) -> Self
    where
        R: 'a,
        O: Fn() -> Result<R> + 'a,
        N: Fn(&mut R) -> Option<Result<T>> + 'a,
    {
        let open = Rc::new(open);
        let next: Rc<dyn Fn(&mut R) -> Option<Result<T>> + 'a> = Rc::new(next);
        Seq::from_parts(
            "scoped",
            move || {
                let open = Rc::clone(&open);
                let next = Rc::clone(&next);
                on_first_pull(move || -> SeqIter<'a, T> {
                    match open() {
                        Ok(resource) => Box::new(ScopedIter {
                            resource: Some(resource),
                            next,
                        }),
                        Err(e) => fail(e),
                    }
                })
            },
            || None,
        )
    }

    /// Buffer one traversal and re-expose it as a restartable sequence.
    pub fn materialize(&self) -> Result<Seq<'a, T>>
    where
        T: Clone,
    {
        Ok(Seq::from_vec(self.to_vec()?))
    }
}

impl<'a> Seq<'a, i64> {
    /// `count` consecutive integers starting at `start`. A range that would
    /// overflow `i64` fails with `InvalidArgument` when first pulled.
    pub fn range(start: i64, count: usize) -> Self {
        Seq::from_source(RangeSource { start, count }, "range")
    }
}
