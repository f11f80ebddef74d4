//! Terminal operators: element access, quantifiers, aggregation, conversions.

use lazyseq_core::error::SeqError;
use lazyseq_operators::Seq;

fn nums<'a>(values: &[i64]) -> Seq<'a, i64> {
    Seq::from_vec(values.to_vec())
}

#[test]
fn test_first_and_last() {
    let s = nums(&[4, 7, 9, 12]);
    assert_eq!(s.first().unwrap(), 4);
    assert_eq!(s.last().unwrap(), 12);
    assert_eq!(s.first_where(|x| x % 3 == 0).unwrap(), 9);
    assert_eq!(s.last_where(|x| x % 2 == 1).unwrap(), 9);
}

#[test]
fn test_empty_sequence_errors_and_defaults() {
    let empty = Seq::<i64>::empty();
    assert!(matches!(
        empty.first(),
        Err(SeqError::EmptySequence { op: "first" })
    ));
    assert!(matches!(
        empty.last(),
        Err(SeqError::EmptySequence { op: "last" })
    ));
    assert_eq!(empty.first_or_default().unwrap(), 0);
    assert_eq!(empty.last_or_default().unwrap(), 0);
    assert_eq!(empty.single_or_default().unwrap(), 0);

    let s = nums(&[1, 3]);
    assert_eq!(s.first_or_default_where(|x| *x > 5).unwrap(), 0);
    assert_eq!(s.last_or_default_where(|x| *x < 3).unwrap(), 1);
    assert!(matches!(
        s.first_where(|x| *x > 5),
        Err(SeqError::EmptySequence { .. })
    ));
}

#[test]
fn test_single_variants() {
    assert_eq!(nums(&[8]).single().unwrap(), 8);
    assert!(matches!(
        nums(&[1, 2]).single(),
        Err(SeqError::MultipleElements { op: "single" })
    ));
    assert!(matches!(
        Seq::<i64>::empty().single(),
        Err(SeqError::EmptySequence { op: "single" })
    ));
    assert_eq!(nums(&[1, 2, 3]).single_where(|x| *x == 2).unwrap(), 2);
    assert!(matches!(
        nums(&[1, 2]).single_or_default(),
        Err(SeqError::MultipleElements { .. })
    ));
    assert_eq!(nums(&[1, 2]).single_or_default_where(|x| *x > 7).unwrap(), 0);
}

#[test]
fn test_single_stops_at_second_match() {
    // An infinite upstream would never terminate unless `single` stops early.
    let naturals = Seq::successors(0i64, |x| Some(x + 1));
    assert!(matches!(
        naturals.single_where(|x| x % 2 == 0),
        Err(SeqError::MultipleElements { .. })
    ));
}

#[test]
fn test_element_at() {
    let s = nums(&[10, 20, 30]);
    assert_eq!(s.element_at(1).unwrap(), 20);
    match s.element_at(3) {
        Err(SeqError::IndexOutOfRange { index, len }) => {
            assert_eq!(index, 3);
            assert_eq!(len, 3);
        }
        other => panic!("expected IndexOutOfRange, got {other:?}"),
    }
    assert_eq!(s.element_at_or_default(5).unwrap(), 0);

    // Unknown length: the miss is found by enumeration.
    let filtered = s.filter(|x| *x > 10);
    assert!(matches!(
        filtered.element_at(2),
        Err(SeqError::IndexOutOfRange { index: 2, len: 2 })
    ));
}

#[test]
fn test_quantifiers() {
    let s = nums(&[2, 4, 6]);
    assert!(s.any().unwrap());
    assert!(!Seq::<i64>::empty().any().unwrap());
    assert!(s.all(|x| x % 2 == 0).unwrap());
    assert!(!s.any_where(|x| *x > 6).unwrap());
    assert!(Seq::<i64>::empty().all(|_| false).unwrap());
    assert!(s.contains(&4).unwrap());
    assert!(!s.contains(&5).unwrap());
}

#[test]
fn test_any_short_circuits_on_infinite_input() {
    let naturals = Seq::successors(1i64, |x| Some(x + 1));
    assert!(naturals.any_where(|x| *x > 1000).unwrap());
    assert!(!naturals.all(|x| *x < 50).unwrap());
    assert!(naturals.contains(&77).unwrap());
}

#[test]
fn test_count_uses_known_length() {
    let s = nums(&[1, 2, 3, 4]);
    assert_eq!(s.known_len(), Some(4));
    assert_eq!(s.map(|x| x * 2).count().unwrap(), 4);
    assert_eq!(s.filter(|x| *x > 2).known_len(), None);
    assert_eq!(s.filter(|x| *x > 2).count().unwrap(), 2);
    assert_eq!(s.count_where(|x| x % 2 == 1).unwrap(), 2);
}

#[test]
fn test_count_propagates_element_error() {
    let s: Seq<'static, i64> = Seq::from_fallible(|| {
        vec![Ok(1), Err(SeqError::InvalidArgument("bad row".into())), Ok(3)]
    });
    assert!(matches!(s.count(), Err(SeqError::InvalidArgument(_))));
}

#[test]
fn test_aggregate_and_fold() {
    let s = nums(&[1, 2, 3, 4]);
    assert_eq!(s.aggregate(|a, b| a * b).unwrap(), 24);
    assert_eq!(s.fold(String::new(), |acc, x| acc + &x.to_string()).unwrap(), "1234");
    assert!(matches!(
        Seq::<i64>::empty().aggregate(|a, b| a + b),
        Err(SeqError::EmptySequence { op: "aggregate" })
    ));
    assert_eq!(Seq::<i64>::empty().fold(7, |a, b| a + b).unwrap(), 7);
}

#[test]
fn test_min_max() {
    let s = nums(&[3, 9, 1, 9, 4]);
    assert_eq!(s.max().unwrap(), 9);
    assert_eq!(s.min().unwrap(), 1);
    assert!(matches!(
        Seq::<i64>::empty().max(),
        Err(SeqError::EmptySequence { op: "max" })
    ));

    let words = Seq::from_vec(vec!["pear", "fig", "banana", "kiwi", "cherry"]);
    // Ties keep the first extremal element.
    assert_eq!(words.max_by(|w| w.len()).unwrap(), "banana");
    assert_eq!(words.min_by(|w| w.len()).unwrap(), "fig");
}

#[test]
fn test_float_min_max() {
    let s = Seq::from_vec(vec![2.5f64, -1.0, 7.25]);
    assert_eq!(s.max().unwrap(), 7.25);
    assert_eq!(s.min().unwrap(), -1.0);
}

#[test]
fn test_sum_and_average() {
    let s = nums(&[1, 2, 3, 4]);
    assert_eq!(s.sum().unwrap(), 10);
    assert_eq!(s.average().unwrap(), 2.5);
    assert_eq!(Seq::<i64>::empty().sum().unwrap(), 0);
    assert!(matches!(
        Seq::<i64>::empty().average(),
        Err(SeqError::EmptySequence { op: "average" })
    ));

    let words = Seq::from_vec(vec!["a", "bbb", "cc"]);
    assert_eq!(words.sum_by(|w| w.len() as u32).unwrap(), 6);
    assert_eq!(words.average_by(|w| w.len() as u32).unwrap(), 2.0);
}

#[test]
fn test_sum_overflow_is_reported() {
    let s = Seq::from_vec(vec![i32::MAX, 1]);
    assert!(matches!(
        s.sum(),
        Err(SeqError::ArithmeticOverflow { op: "sum" })
    ));
}

#[test]
fn test_sequence_equal() {
    let a = nums(&[1, 2, 3]);
    assert!(a.sequence_equal(&nums(&[1, 2, 3])).unwrap());
    assert!(!a.sequence_equal(&nums(&[1, 2])).unwrap());
    assert!(!a.sequence_equal(&nums(&[1, 2, 4])).unwrap());
    assert!(a
        .sequence_equal(&nums(&[0, 1, 2, 3]).skip(1).filter(|_| true))
        .unwrap());
}

#[test]
fn test_conversions() {
    let s = nums(&[3, 1, 3, 2]);
    let set = s.to_hash_set().unwrap();
    assert_eq!(set.len(), 3);
    assert!(set.contains(&2));

    let map = nums(&[1, 2, 3]).to_map(|x| *x, |x| x * x).unwrap();
    assert_eq!(map.get(&3), Some(&9));

    assert!(matches!(
        s.to_map(|x| *x, |x| x),
        Err(SeqError::InvalidArgument(_))
    ));

    let mut collected = Vec::new();
    s.for_each(|x| collected.push(x)).unwrap();
    assert_eq!(collected, vec![3, 1, 3, 2]);
}
