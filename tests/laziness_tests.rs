//! Deferred execution, restartability, scoped resources and plan inspection.

use std::cell::Cell;
use std::rc::Rc;

use lazyseq_core::error::SeqError;
use lazyseq_operators::Seq;

#[test]
fn test_operators_do_no_work_before_first_pull() {
    let calls = Cell::new(0usize);
    let s = Seq::from_vec(vec![1, 2, 3, 4])
        .map(|x| {
            calls.set(calls.get() + 1);
            x * 2
        })
        .filter(|x| *x > 2)
        .reverse()
        .group_by(|x| x % 3)
        .distinct_by(|g| *g.key());
    assert_eq!(calls.get(), 0);

    let first = s.traverse();
    assert_eq!(calls.get(), 0, "traverse() alone must not enumerate");
    drop(first);

    assert_eq!(s.count().unwrap(), 3);
    assert_eq!(calls.get(), 4);
}

#[test]
fn test_each_traversal_reruns_the_chain() {
    let generated = Rc::new(Cell::new(0usize));
    let counter = Rc::clone(&generated);
    let s = Seq::restartable(move || {
        counter.set(counter.get() + 1);
        vec![1, 2, 3]
    })
    .map(|x| x + 1);

    assert_eq!(s.to_vec().unwrap(), vec![2, 3, 4]);
    assert_eq!(s.to_vec().unwrap(), vec![2, 3, 4]);
    assert_eq!(generated.get(), 2);

    let cached = s.materialize().unwrap();
    assert_eq!(generated.get(), 3);
    assert_eq!(cached.to_vec().unwrap(), vec![2, 3, 4]);
    assert_eq!(cached.count().unwrap(), 3);
    assert_eq!(generated.get(), 3);
}

#[test]
fn test_independent_traversals_do_not_share_position() {
    let s = Seq::from_vec(vec!['a', 'b', 'c']);
    let mut one = s.traverse();
    let mut two = s.traverse();
    assert_eq!(one.next().unwrap().unwrap(), 'a');
    assert_eq!(one.next().unwrap().unwrap(), 'b');
    assert_eq!(two.next().unwrap().unwrap(), 'a');
}

#[test]
fn test_once_source_is_single_use() {
    let s = Seq::once(vec![1, 2, 3]);
    assert_eq!(s.to_vec().unwrap(), vec![1, 2, 3]);
    assert_eq!(s.to_vec().unwrap(), Vec::<i32>::new());
}

#[test]
fn test_infinite_sequence_with_finite_prefix() {
    let powers = Seq::successors(1u64, |x| x.checked_mul(2));
    assert_eq!(powers.take(5).to_vec().unwrap(), vec![1, 2, 4, 8, 16]);
    // Ends once `checked_mul` overflows.
    assert_eq!(powers.count().unwrap(), 64);
}

struct Handle {
    open: Rc<Cell<usize>>,
    remaining: usize,
}

impl Drop for Handle {
    fn drop(&mut self) {
        self.open.set(self.open.get() - 1);
    }
}

fn scoped_source<'a>(open: Rc<Cell<usize>>, opened: Rc<Cell<usize>>, rows: usize) -> Seq<'a, usize> {
    Seq::scoped(
        move || {
            opened.set(opened.get() + 1);
            open.set(open.get() + 1);
            Ok(Handle {
                open: Rc::clone(&open),
                remaining: rows,
            })
        },
        |h: &mut Handle| {
            if h.remaining == 0 {
                return None;
            }
            h.remaining -= 1;
            Some(Ok(h.remaining))
        },
    )
}

#[test]
fn test_scoped_resource_released_on_early_abandonment() {
    let open = Rc::new(Cell::new(0usize));
    let opened = Rc::new(Cell::new(0usize));
    let s = scoped_source(Rc::clone(&open), Rc::clone(&opened), 1_000);

    let mut iter = s.traverse();
    assert_eq!(opened.get(), 0, "resource opens on first pull");
    assert_eq!(iter.next().unwrap().unwrap(), 999);
    assert_eq!(open.get(), 1);
    drop(iter);
    assert_eq!(open.get(), 0);

    assert!(s.any_where(|v| *v == 990).unwrap());
    assert_eq!(open.get(), 0);
    assert_eq!(opened.get(), 2);
}

#[test]
fn test_scoped_resource_released_on_exhaustion() {
    let open = Rc::new(Cell::new(0usize));
    let opened = Rc::new(Cell::new(0usize));
    let s = scoped_source(Rc::clone(&open), Rc::clone(&opened), 3);

    let mut iter = s.traverse();
    let mut seen = Vec::new();
    for item in iter.by_ref() {
        seen.push(item.unwrap());
    }
    assert_eq!(seen, vec![2, 1, 0]);
    assert_eq!(open.get(), 0, "released before the iterator is dropped");
    drop(iter);
}

#[test]
fn test_scoped_open_failure_is_the_only_element() {
    let s: Seq<'static, i32> = Seq::scoped(
        || -> lazyseq_core::Result<()> { Err(SeqError::InvalidArgument("no such file".into())) },
        |_: &mut ()| Some(Ok(1)),
    );
    let items: Vec<_> = s.traverse().collect();
    assert_eq!(items.len(), 1);
    assert!(matches!(items[0], Err(SeqError::InvalidArgument(_))));
}

#[test]
fn test_errors_stop_terminal_ops_but_not_streaming_ops() {
    let s: Seq<'static, i64> = Seq::from_fallible(|| {
        vec![Ok(1), Err(SeqError::InvalidArgument("row 2".into())), Ok(3)]
    });
    // Streaming operators pass the error along at its position.
    let items: Vec<_> = s.map(|x| x * 10).traverse().collect();
    assert_eq!(items.len(), 3);
    assert!(items[1].is_err());
    assert_eq!(*items[2].as_ref().unwrap(), 30);

    // Terminal operators stop at it.
    assert!(s.to_vec().is_err());
    assert_eq!(s.first().unwrap(), 1);
}

#[test]
fn test_plan_lineage_and_json() {
    let s = Seq::from_vec(vec![3, 1, 2])
        .filter(|x| *x > 1)
        .order_by(|x| *x)
        .seq()
        .take(1);
    let names: Vec<&str> = s.plan().iter().map(|p| p.name).collect();
    assert_eq!(names, vec!["from_vec", "filter", "order_by", "take"]);
    assert_eq!(s.buffering_steps(), vec!["order_by"]);

    let json = s.explain_json().unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed[2]["name"], "order_by");
    assert_eq!(parsed[2]["evaluation"], "buffered_upstream");
    assert_eq!(parsed[1]["evaluation"], "streaming");
}
