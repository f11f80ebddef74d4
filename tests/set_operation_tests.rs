//! Set operators, distinct, and dynamic-value narrowing.

use lazyseq_core::compare::AsciiCaseInsensitive;
use lazyseq_core::error::SeqError;
use lazyseq_core::value::Value;
use lazyseq_operators::{Evaluation, KeySet, Seq};

fn nums<'a>(values: &[i64]) -> Seq<'a, i64> {
    Seq::from_vec(values.to_vec())
}

#[test]
fn test_distinct_keeps_first_occurrence() {
    let s = nums(&[3, 1, 3, 2, 1, 4]);
    assert_eq!(s.distinct().to_vec().unwrap(), vec![3, 1, 2, 4]);
    assert_eq!(
        s.distinct().distinct().to_vec().unwrap(),
        s.distinct().to_vec().unwrap()
    );
}

#[test]
fn test_distinct_by_and_with() {
    let s = nums(&[10, 21, 12, 33, 24]);
    assert_eq!(s.distinct_by(|x| x % 2).to_vec().unwrap(), vec![10, 21]);

    let words = Seq::from_vec(vec!["Oslo", "LEEDS", "oslo", "leeds", "York"]);
    assert_eq!(
        words.distinct_with(AsciiCaseInsensitive).to_vec().unwrap(),
        vec!["Oslo", "LEEDS", "York"]
    );
}

#[test]
fn test_distinct_streams_over_infinite_input() {
    let cycle = Seq::successors(0i64, |x| Some((x + 1) % 3));
    // Only three distinct values exist; asking for three must terminate.
    assert_eq!(cycle.distinct().take(3).to_vec().unwrap(), vec![0, 1, 2]);
}

#[test]
fn test_union() {
    let a = nums(&[1, 2, 2, 3]);
    let b = nums(&[3, 4, 1, 5]);
    assert_eq!(a.union(&b).to_vec().unwrap(), vec![1, 2, 3, 4, 5]);

    let words = Seq::from_vec(vec!["ant", "bee"]);
    let more = Seq::from_vec(vec!["bat", "cow", "ape"]);
    assert_eq!(
        words
            .union_by(&more, |w| w.chars().next())
            .to_vec()
            .unwrap(),
        vec!["ant", "bee", "cow"]
    );
}

#[test]
fn test_intersect() {
    let a = nums(&[1, 2, 2, 3, 4]);
    let b = nums(&[4, 2, 9]);
    assert_eq!(a.intersect(&b).to_vec().unwrap(), vec![2, 4]);

    let words = Seq::from_vec(vec!["ant", "bee", "cow"]);
    let filter = Seq::from_vec(vec!["cat", "bat"]);
    assert_eq!(
        words
            .intersect_by(&filter, |w| w.chars().next())
            .to_vec()
            .unwrap(),
        vec!["bee", "cow"]
    );
}

#[test]
fn test_except() {
    let a = nums(&[5, 1, 5, 2, 3]);
    let b = nums(&[2]);
    assert_eq!(a.except(&b).to_vec().unwrap(), vec![5, 1, 3]);

    let words = Seq::from_vec(vec!["ant", "bee", "cow", "ape"]);
    let drop = Seq::from_vec(vec!["axe"]);
    assert_eq!(
        words.except_by(&drop, |w| w.chars().next()).to_vec().unwrap(),
        vec!["bee", "cow"]
    );
}

#[test]
fn test_set_plans() {
    let a = nums(&[1]);
    let b = nums(&[2]);
    assert_eq!(
        a.union(&b).plan().last().map(|p| p.evaluation),
        Some(Evaluation::Streaming)
    );
    assert_eq!(
        a.except(&b).plan().last().map(|p| p.evaluation),
        Some(Evaluation::BufferedOther)
    );
    assert_eq!(a.intersect(&b).buffering_steps(), vec!["intersect"]);
}

#[test]
fn test_except_surfaces_error_from_right_side() {
    let a = nums(&[1, 2]);
    let b: Seq<'static, i64> =
        Seq::from_fallible(|| vec![Err(SeqError::InvalidArgument("right".into()))]);
    assert!(matches!(a.except(&b).to_vec(), Err(SeqError::InvalidArgument(_))));
}

#[test]
fn test_key_set_uses_comparer() {
    let mut set = KeySet::new(AsciiCaseInsensitive);
    assert!(set.insert("Key".to_string()));
    assert!(!set.insert("KEY".to_string()));
    assert!(set.contains(&"key".to_string()));
    assert_eq!(set.len(), 1);
    assert!(set.remove(&"kEy".to_string()));
    assert!(set.is_empty());
}

#[test]
fn test_cast_converts_or_fails_at_position() {
    let values = Seq::from_vec(vec![Value::I64(1), Value::I32(2), Value::I64(3)]);
    assert_eq!(values.cast::<i64>().to_vec().unwrap(), vec![1, 2, 3]);

    let mixed = Seq::from_vec(vec![Value::I64(1), Value::Str("two".into())]);
    let mut iter = mixed.cast::<i64>().traverse();
    assert_eq!(iter.next().unwrap().unwrap(), 1);
    match iter.next() {
        Some(Err(SeqError::TypeMismatch { expected, found })) => {
            assert_eq!(expected, "i64");
            assert_eq!(found, "str");
        }
        other => panic!("expected TypeMismatch, got {other:?}"),
    }
}

#[test]
fn test_cast_is_lazy_and_has_no_known_length() {
    let mixed = Seq::from_vec(vec![Value::Bool(true), Value::Null]);
    let cast = mixed.cast::<i32>();
    assert_eq!(cast.known_len(), None);
    assert!(matches!(cast.count(), Err(SeqError::TypeMismatch { .. })));
}

#[test]
fn test_of_type_filters_silently() {
    let mixed = Seq::from_vec(vec![
        Value::Str("a".into()),
        Value::I32(1),
        Value::Null,
        Value::Str("b".into()),
        Value::F64(2.0),
    ]);
    assert_eq!(
        mixed.of_type::<String>().to_vec().unwrap(),
        vec!["a".to_string(), "b".to_string()]
    );
    assert_eq!(mixed.of_type::<f64>().to_vec().unwrap(), vec![2.0]);
    assert_eq!(
        mixed.of_type::<Option<i32>>().to_vec().unwrap(),
        vec![Some(1), None]
    );
}
