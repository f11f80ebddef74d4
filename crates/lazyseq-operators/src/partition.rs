//! Partitioning operators: `take`, `skip`, `take_last`, `skip_last`, `chunk`.
//!
//! `take_last` and `skip_last` hold a bounded window of at most `n`
//! elements. `take_last` must see the end of upstream before it can yield
//! anything, so over an unbounded upstream it never produces an element.

use std::collections::VecDeque;

use lazyseq_core::error::{Result, SeqError};

use crate::plan::OpPlan;
use crate::trace::trace_buffered;
use crate::traits::{fail, on_first_pull, Seq, SeqIter};

impl<'a, T: 'a> Seq<'a, T> {
    /// First `n` elements. `n == 0` yields nothing without touching upstream.
    pub fn take(&self, n: usize) -> Seq<'a, T> {
        let up = self.clone();
        let len_up = self.clone();
        self.derive_sized(
            OpPlan::streaming("take"),
            move || {
                if n == 0 {
                    return Box::new(std::iter::empty());
                }
                Box::new(up.traverse().take(n))
            },
            move || len_up.known_len().map(|len| len.min(n)),
        )
    }

    /// Everything after the first `n` elements.
    pub fn skip(&self, n: usize) -> Seq<'a, T> {
        let up = self.clone();
        let len_up = self.clone();
        self.derive_sized(
            OpPlan::streaming("skip"),
            move || {
                let mut remaining = n;
                Box::new(up.traverse().filter(move |item| {
                    if remaining == 0 || item.is_err() {
                        return true;
                    }
                    remaining -= 1;
                    false
                }))
            },
            move || len_up.known_len().map(|len| len.saturating_sub(n)),
        )
    }

    /// Last `n` elements. Drains upstream on first pull.
    pub fn take_last(&self, n: usize) -> Seq<'a, T> {
        let up = self.clone();
        let len_up = self.clone();
        self.derive_sized(
            OpPlan::buffered("take_last"),
            move || {
                if n == 0 {
                    return Box::new(std::iter::empty());
                }
                let up = up.clone();
                on_first_pull(move || -> SeqIter<'a, T> {
                    let mut window = VecDeque::with_capacity(n.min(1024));
                    for item in up.traverse() {
                        match item {
                            Ok(v) => {
                                if window.len() == n {
                                    window.pop_front();
                                }
                                window.push_back(v);
                            }
                            Err(e) => return fail(e),
                        }
                    }
                    trace_buffered("take_last", window.len());
                    Box::new(window.into_iter().map(Ok))
                })
            },
            move || len_up.known_len().map(|len| len.min(n)),
        )
    }

    /// Everything except the last `n` elements.
    ///
    /// Yields with a lag of `n`: an element is released once `n` later
    /// elements have been seen, so at most `n` elements are held.
    pub fn skip_last(&self, n: usize) -> Seq<'a, T> {
        let up = self.clone();
        let len_up = self.clone();
        self.derive_sized(
            OpPlan::streaming("skip_last"),
            move || {
                if n == 0 {
                    return up.traverse();
                }
                let mut window: VecDeque<T> = VecDeque::with_capacity(n.min(1024));
                Box::new(up.traverse().filter_map(move |item| match item {
                    Ok(v) => {
                        window.push_back(v);
                        if window.len() > n {
                            window.pop_front().map(Ok)
                        } else {
                            None
                        }
                    }
                    Err(e) => Some(Err(e)),
                }))
            },
            move || len_up.known_len().map(|len| len.saturating_sub(n)),
        )
    }

    /// Group consecutive elements into vectors of `size`; the last chunk may
    /// be shorter. `size == 0` fails with `InvalidArgument` on first pull.
    pub fn chunk(&self, size: usize) -> Seq<'a, Vec<T>> {
        let up = self.clone();
        let len_up = self.clone();
        self.derive_sized(
            OpPlan::streaming("chunk"),
            move || {
                if size == 0 {
                    return on_first_pull(|| {
                        fail(SeqError::InvalidArgument(
                            "chunk size must be at least 1".into(),
                        ))
                    });
                }
                Box::new(Chunks {
                    inner: up.traverse(),
                    size,
                    done: false,
                })
            },
            move || {
                if size == 0 {
                    return None;
                }
                len_up.known_len().map(|len| len.div_ceil(size))
            },
        )
    }
}

struct Chunks<'a, T> {
    inner: SeqIter<'a, T>,
    size: usize,
    done: bool,
}

impl<'a, T> Iterator for Chunks<'a, T> {
    type Item = Result<Vec<T>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let mut chunk = Vec::with_capacity(self.size.min(1024));
        while chunk.len() < self.size {
            match self.inner.next() {
                Some(Ok(v)) => chunk.push(v),
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e));
                }
                None => {
                    self.done = true;
                    break;
                }
            }
        }
        if chunk.is_empty() {
            None
        } else {
            Some(Ok(chunk))
        }
    }
}
