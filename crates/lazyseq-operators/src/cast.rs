//! Narrowing operators over dynamic values: `cast` and `of_type`.

use lazyseq_core::value::{FromValue, Value};

use crate::plan::OpPlan;
use crate::traits::Seq;

impl<'a> Seq<'a, Value> {
    /// Convert every element to `T`. An incompatible element becomes a
    /// `TypeMismatch` error at its position.
    pub fn cast<T: FromValue + 'a>(&self) -> Seq<'a, T> {
        let up = self.clone();
        self.derive(OpPlan::streaming("cast"), move || {
            Box::new(up.traverse().map(|item| item.and_then(T::from_value)))
        })
    }

    /// Keep only elements convertible to `T`.
    pub fn of_type<T: FromValue + 'a>(&self) -> Seq<'a, T> {
        let up = self.clone();
        self.derive(OpPlan::streaming("of_type"), move || {
            Box::new(up.traverse().filter_map(|item| match item {
                Ok(v) => T::from_value(v).ok().map(Ok),
                Err(e) => Some(Err(e)),
            }))
        })
    }
}
