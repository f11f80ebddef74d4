//! Filtering operators: `filter`, `filter_indexed`, `try_filter`,
//! `take_while`, `skip_while`.
//!
//! All of these are streaming: the predicate runs only when the consumer
//! pulls, and an upstream `Err` element passes through untouched.

use std::rc::Rc;

use lazyseq_core::error::Result;

use crate::plan::OpPlan;
use crate::traits::Seq;

impl<'a, T: 'a> Seq<'a, T> {
    /// Keep elements for which `pred` holds.
    pub fn filter<P>(&self, pred: P) -> Seq<'a, T>
    where
        P: Fn(&T) -> bool + 'a,
    {
        let up = self.clone();
        let pred = Rc::new(pred);
        self.derive(OpPlan::streaming("filter"), move || {
            let pred = Rc::clone(&pred);
            Box::new(up.traverse().filter(move |item| match item {
                Ok(v) => pred(v),
                Err(_) => true,
            }))
        })
    }

    /// Like `filter`, also passing the zero-based position of each upstream
    /// element in consumption order.
    pub fn filter_indexed<P>(&self, pred: P) -> Seq<'a, T>
    where
        P: Fn(&T, usize) -> bool + 'a,
    {
        let up = self.clone();
        let pred = Rc::new(pred);
        self.derive(OpPlan::streaming("filter_indexed"), move || {
            let pred = Rc::clone(&pred);
            let mut index = 0usize;
            Box::new(up.traverse().filter(move |item| match item {
                Ok(v) => {
                    let keep = pred(v, index);
                    index += 1;
                    keep
                }
                Err(_) => true,
            }))
        })
    }

    /// Filter with a fallible predicate. A predicate error replaces the
    /// element it was evaluated on.
    pub fn try_filter<P>(&self, pred: P) -> Seq<'a, T>
    where
        P: Fn(&T) -> Result<bool> + 'a,
    {
        let up = self.clone();
        let pred = Rc::new(pred);
        self.derive(OpPlan::streaming("try_filter"), move || {
            let pred = Rc::clone(&pred);
            Box::new(up.traverse().filter_map(move |item| match item {
                Ok(v) => match pred(&v) {
                    Ok(true) => Some(Ok(v)),
                    Ok(false) => None,
                    Err(e) => Some(Err(e)),
                },
                Err(e) => Some(Err(e)),
            }))
        })
    }

    /// Yield elements while `pred` holds; the first failure ends the
    /// traversal and `pred` is not consulted again.
    pub fn take_while<P>(&self, pred: P) -> Seq<'a, T>
    where
        P: Fn(&T) -> bool + 'a,
    {
        let up = self.clone();
        let pred = Rc::new(pred);
        self.derive(OpPlan::streaming("take_while"), move || {
            let pred = Rc::clone(&pred);
            Box::new(up.traverse().take_while(move |item| match item {
                Ok(v) => pred(v),
                Err(_) => true,
            }))
        })
    }

    /// Drop elements while `pred` holds; once it fails, every remaining
    /// element passes through without re-evaluating `pred`.
    pub fn skip_while<P>(&self, pred: P) -> Seq<'a, T>
    where
        P: Fn(&T) -> bool + 'a,
    {
        let up = self.clone();
        let pred = Rc::new(pred);
        self.derive(OpPlan::streaming("skip_while"), move || {
            let pred = Rc::clone(&pred);
            let mut skipping = true;
            Box::new(up.traverse().filter(move |item| {
                if !skipping {
                    return true;
                }
                match item {
                    Ok(v) if pred(v) => false,
                    _ => {
                        skipping = false;
                        true
                    }
                }
            }))
        })
    }
}
