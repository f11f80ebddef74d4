//! Group join: every outer element paired with all of its inner matches.

use std::hash::Hash;
use std::rc::Rc;

use crate::plan::OpPlan;
use crate::trace::trace_buffered;
use crate::traits::{fail, on_first_pull, Seq, SeqIter};

use super::build_index;

impl<'a, T: 'a> Seq<'a, T> {
    /// Emit exactly one `result(outer, matches)` per outer element. `matches`
    /// holds the inner elements with an equal key in encounter order and is
    /// empty when nothing matches.
    pub fn group_join<U, K, R, OK, IK, F>(
        &self,
        inner: &Seq<'a, U>,
        outer_key: OK,
        inner_key: IK,
        result: F,
    ) -> Seq<'a, R>
    where
        U: 'a,
        K: Hash + Eq + 'a,
        R: 'a,
        OK: Fn(&T) -> K + 'a,
        IK: Fn(&U) -> K + 'a,
        F: Fn(T, &[U]) -> R + 'a,
    {
        let outer = self.clone();
        let inner = inner.clone();
        let side = inner.plan().to_vec();
        let outer_key = Rc::new(outer_key);
        let inner_key = Rc::new(inner_key);
        let result = Rc::new(result);
        self.derive(
            OpPlan::buffered_other("group_join").with_side_input(&side),
            move || {
                let outer = outer.clone();
                let inner = inner.clone();
                let outer_key = Rc::clone(&outer_key);
                let inner_key = Rc::clone(&inner_key);
                let result = Rc::clone(&result);
                on_first_pull(move || -> SeqIter<'a, R> {
                    let index = match build_index(&inner, &*inner_key) {
                        Ok(index) => index,
                        Err(e) => return fail(e),
                    };
                    trace_buffered("group_join", index.values().map(Vec::len).sum());
                    Box::new(outer.traverse().map(move |item| {
                        item.map(|t| {
                            let key = outer_key(&t);
                            let matches = index.get(&key).map(Vec::as_slice).unwrap_or(&[]);
                            result(t, matches)
                        })
                    }))
                })
            },
        )
    }
}
