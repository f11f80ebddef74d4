//! Projection operators: `map`, `map_indexed`, `try_map`, `flat_map`,
//! `flat_map_indexed`, `inspect`.

use std::rc::Rc;

use lazyseq_core::error::Result;

use crate::plan::OpPlan;
use crate::traits::Seq;

impl<'a, T: 'a> Seq<'a, T> {
    /// Project each element 1:1. Preserves a known length.
    pub fn map<U, F>(&self, f: F) -> Seq<'a, U>
    where
        U: 'a,
        F: Fn(T) -> U + 'a,
    {
        let up = self.clone();
        let len_up = self.clone();
        let f = Rc::new(f);
        self.derive_sized(
            OpPlan::streaming("map"),
            move || {
                let f = Rc::clone(&f);
                Box::new(up.traverse().map(move |item| item.map(|v| f(v))))
            },
            move || len_up.known_len(),
        )
    }

    /// Project each element together with its zero-based consumption position.
    pub fn map_indexed<U, F>(&self, f: F) -> Seq<'a, U>
    where
        U: 'a,
        F: Fn(T, usize) -> U + 'a,
    {
        let up = self.clone();
        let len_up = self.clone();
        let f = Rc::new(f);
        self.derive_sized(
            OpPlan::streaming("map_indexed"),
            move || {
                let f = Rc::clone(&f);
                let mut index = 0usize;
                Box::new(up.traverse().map(move |item| {
                    item.map(|v| {
                        let out = f(v, index);
                        index += 1;
                        out
                    })
                }))
            },
            move || len_up.known_len(),
        )
    }

    /// Project with a fallible function; its error takes the element's place.
    pub fn try_map<U, F>(&self, f: F) -> Seq<'a, U>
    where
        U: 'a,
        F: Fn(T) -> Result<U> + 'a,
    {
        let up = self.clone();
        let f = Rc::new(f);
        self.derive(OpPlan::streaming("try_map"), move || {
            let f = Rc::clone(&f);
            Box::new(up.traverse().map(move |item| item.and_then(|v| f(v))))
        })
    }

    /// Project each element to many and flatten one level, outer order first.
    pub fn flat_map<U, I, F>(&self, f: F) -> Seq<'a, U>
    where
        U: 'a,
        I: IntoIterator<Item = U> + 'a,
        I::IntoIter: 'a,
        F: Fn(T) -> I + 'a,
    {
        self.flat_map_named("flat_map", move |v, _| f(v))
    }

    /// `flat_map` that also receives the zero-based position of the outer element.
    pub fn flat_map_indexed<U, I, F>(&self, f: F) -> Seq<'a, U>
    where
        U: 'a,
        I: IntoIterator<Item = U> + 'a,
        I::IntoIter: 'a,
        F: Fn(T, usize) -> I + 'a,
    {
        self.flat_map_named("flat_map_indexed", f)
    }

    fn flat_map_named<U, I, F>(&self, name: &'static str, f: F) -> Seq<'a, U>
    where
        U: 'a,
        I: IntoIterator<Item = U> + 'a,
        I::IntoIter: 'a,
        F: Fn(T, usize) -> I + 'a,
    {
        let up = self.clone();
        let f = Rc::new(f);
        self.derive(OpPlan::streaming(name), move || {
            let f = Rc::clone(&f);
            let mut index = 0usize;
            Box::new(up.traverse().flat_map(move |item| {
                let inner: Box<dyn Iterator<Item = Result<U>> + 'a> = match item {
                    Ok(v) => {
                        let produced = f(v, index);
                        index += 1;
                        Box::new(produced.into_iter().map(Ok))
                    }
                    Err(e) => Box::new(std::iter::once(Err(e))),
                };
                inner
            }))
        })
    }

    /// Observe elements as they are pulled, without changing them.
    pub fn inspect<F>(&self, f: F) -> Seq<'a, T>
    where
        F: Fn(&T) + 'a,
    {
        let up = self.clone();
        let len_up = self.clone();
        let f = Rc::new(f);
        self.derive_sized(
            OpPlan::streaming("inspect"),
            move || {
                let f = Rc::clone(&f);
                Box::new(up.traverse().inspect(move |item| {
                    if let Ok(v) = item {
                        f(v);
                    }
                }))
            },
            move || len_up.known_len(),
        )
    }
}
