//! Algebraic properties over generated inputs.

use lazyseq_operators::Seq;
use proptest::prelude::*;
use proptest::sample::Index;

fn values() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(any::<i64>(), 0..64)
}

/// Small domain so set operations see overlapping elements.
fn small_values() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(-8i64..8, 0..32)
}

proptest! {
    #[test]
    fn test_filter_shrinks_and_satisfies_predicate(data in values()) {
        let kept = Seq::from_vec(data.clone())
            .filter(|x| x.rem_euclid(3) == 1)
            .to_vec()
            .unwrap();
        prop_assert!(kept.len() <= data.len());
        prop_assert!(kept.iter().all(|x| x.rem_euclid(3) == 1));
    }

    #[test]
    fn test_take_skip_concat_is_identity(data in values(), split in any::<Index>()) {
        let n = split.index(data.len() + 1);
        let s = Seq::from_vec(data.clone());
        let rebuilt = s.take(n).concat(&s.skip(n)).to_vec().unwrap();
        prop_assert_eq!(rebuilt, data);
    }

    #[test]
    fn test_take_last_skip_last_partition_the_input(data in values(), split in any::<Index>()) {
        let n = split.index(data.len() + 1);
        let s = Seq::from_vec(data.clone());
        let rebuilt = s.skip_last(n).concat(&s.take_last(n)).to_vec().unwrap();
        prop_assert_eq!(rebuilt, data);
    }

    #[test]
    fn test_distinct_is_idempotent(data in small_values()) {
        let s = Seq::from_vec(data);
        let once = s.distinct().to_vec().unwrap();
        let twice = s.distinct().distinct().to_vec().unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn test_reverse_is_an_involution(data in values()) {
        let s = Seq::from_vec(data.clone());
        prop_assert_eq!(s.reverse().reverse().to_vec().unwrap(), data);
    }

    #[test]
    fn test_order_by_matches_stable_sort(data in small_values()) {
        let pairs: Vec<(i64, usize)> = data.iter().copied().zip(0..).collect();
        let mut expected = pairs.clone();
        expected.sort_by_key(|p| p.0.rem_euclid(5));
        let ours = Seq::from_vec(pairs)
            .order_by(|p| p.0.rem_euclid(5))
            .to_vec()
            .unwrap();
        prop_assert_eq!(ours, expected);
    }

    #[test]
    fn test_materialize_round_trip(data in values()) {
        let cached = Seq::from_vec(data.clone())
            .filter(|_| true)
            .materialize()
            .unwrap();
        prop_assert_eq!(cached.count().unwrap(), data.len());
        let rebuilt = Seq::from_vec(cached.to_vec().unwrap()).to_vec().unwrap();
        prop_assert_eq!(rebuilt, data);
    }

    #[test]
    fn test_group_by_partitions_every_element(data in values()) {
        let groups = Seq::from_vec(data.clone())
            .group_by(|x| x.rem_euclid(4))
            .to_vec()
            .unwrap();
        let total: usize = groups.iter().map(|g| g.len()).sum();
        prop_assert_eq!(total, data.len());
        for g in &groups {
            prop_assert!(g.elements().iter().all(|x| x.rem_euclid(4) == *g.key()));
        }
    }

    #[test]
    fn test_set_ops_agree_with_membership(left in small_values(), right in small_values()) {
        let a = Seq::from_vec(left.clone());
        let b = Seq::from_vec(right.clone());
        for x in a.intersect(&b).to_vec().unwrap() {
            prop_assert!(left.contains(&x) && right.contains(&x));
        }
        for x in a.except(&b).to_vec().unwrap() {
            prop_assert!(left.contains(&x) && !right.contains(&x));
        }
        let union = a.union(&b).to_vec().unwrap();
        prop_assert_eq!(union, a.concat(&b).distinct().to_vec().unwrap());
    }
}
