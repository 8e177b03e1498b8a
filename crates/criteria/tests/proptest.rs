//! Property-based tests for criteria using proptest.

use proptest::prelude::*;
use criteria::{ClauseSet, Criteria, Dir, Number, QueryValue, Queryable, Record, Value};

// ============================================================================
// Test helpers
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
struct TestItem {
    value: i64,
    name: String,
    active: bool,
}

impl Record for TestItem {
    fn get(&self, field: &str) -> Value<'_> {
        match field {
            "value" => Value::Number(Number::I64(self.value)),
            "name" => Value::String(&self.name),
            "active" => Value::Bool(self.active),
            _ => Value::None,
        }
    }
}

fn test_item_strategy() -> impl Strategy<Value = TestItem> {
    (-1000i64..1000, "[a-z]{1,10}", any::<bool>()).prop_map(|(value, name, active)| TestItem {
        value,
        name,
        active,
    })
}

fn above(threshold: i64) -> QueryValue {
    QueryValue::predicate(move |v| matches!(v.as_number(), Some(Number::I64(n)) if n > threshold))
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// Filtering never returns more items than the source.
    #[test]
    fn filter_never_grows_collection(
        items in prop::collection::vec(test_item_strategy(), 0..100),
        threshold in -1000i64..1000,
    ) {
        let results = items.where_(("value", above(threshold))).to_vec();
        prop_assert!(results.len() <= items.len());
    }

    /// Results of `where` satisfy every clause.
    #[test]
    fn where_results_satisfy_clauses(
        items in prop::collection::vec(test_item_strategy(), 0..50),
        threshold in -1000i64..1000,
    ) {
        let clauses = ClauseSet::new().and("value", above(threshold)).and("active", true);
        for item in items.where_(clauses).iter() {
            prop_assert!(item.value > threshold);
            prop_assert!(item.active);
        }
    }

    /// `where` and `not` over the same clauses split the source in two.
    #[test]
    fn where_and_not_partition(
        items in prop::collection::vec(test_item_strategy(), 0..50),
        threshold in -1000i64..1000,
    ) {
        let clauses = ClauseSet::new().and("value", above(threshold));
        let kept = items.where_(clauses.clone()).count();
        let dropped = items.not(clauses).count();
        prop_assert_eq!(kept + dropped, items.len());
    }

    /// An empty `not` excludes nothing.
    #[test]
    fn empty_not_excludes_nothing(
        items in prop::collection::vec(test_item_strategy(), 0..50),
    ) {
        prop_assert_eq!(items.not(ClauseSet::new()).count(), items.len());
    }

    /// Offset then limit yields max(0, min(limit, len - offset)) results.
    #[test]
    fn offset_and_limit_work_together(
        items in prop::collection::vec(test_item_strategy(), 0..100),
        offset in 0usize..120,
        limit in 0usize..120,
    ) {
        let results = items.offset(offset).limit(limit).to_vec();
        let expected = limit.min(items.len().saturating_sub(offset));
        prop_assert_eq!(results.len(), expected);

        for (i, item) in results.into_iter().enumerate() {
            prop_assert_eq!(item, &items[offset + i]);
        }
    }

    /// Negative limits and offsets behave as if never set.
    #[test]
    fn negative_paging_is_ignored(
        items in prop::collection::vec(test_item_strategy(), 0..50),
        limit in i64::MIN..0,
        offset in i64::MIN..0,
    ) {
        let root = items.criteria();
        prop_assert_eq!(root.limit(limit).offset(offset).to_vec(), root.to_vec());
    }

    /// Sorting keeps source order among equal keys.
    #[test]
    fn ordering_is_stable(
        items in prop::collection::vec(test_item_strategy(), 0..50),
        dir in prop_oneof![Just(Dir::Asc), Just(Dir::Desc)],
    ) {
        let results = items.order([("active", dir)]).to_vec();
        prop_assert_eq!(results.len(), items.len());

        let position = |item: &TestItem| items.iter().position(|i| std::ptr::eq(i, item));
        for pair in results.windows(2) {
            if pair[0].active == pair[1].active {
                prop_assert!(position(pair[0]) < position(pair[1]));
            }
        }
    }

    /// Ascending order on a numeric field is non-decreasing.
    #[test]
    fn ascending_order_is_sorted(
        items in prop::collection::vec(test_item_strategy(), 0..50),
    ) {
        let values: Vec<i64> = items.order_asc("value").iter().map(|i| i.value).collect();
        prop_assert!(values.windows(2).all(|w| w[0] <= w[1]));
    }

    /// A later clause on the same field replaces the earlier one.
    #[test]
    fn repeated_field_last_write_wins(
        items in prop::collection::vec(test_item_strategy(), 0..50),
        first in -1000i64..1000,
        second in -1000i64..1000,
    ) {
        let chained = items.where_(("value", above(first))).where_(("value", above(second)));
        let direct = items.where_(("value", above(second)));
        prop_assert_eq!(chained.to_vec(), direct.to_vec());
    }

    /// Chain methods never change the criteria they are called on.
    #[test]
    fn chaining_leaves_receiver_untouched(
        items in prop::collection::vec(test_item_strategy(), 0..50),
        threshold in -1000i64..1000,
        limit in 0usize..10,
    ) {
        let root = Criteria::new(&items);
        let before = root.to_vec();
        let _ = root
            .where_(("value", above(threshold)))
            .not(("active", true))
            .order_desc("name")
            .limit(limit);

        prop_assert_eq!(root.to_vec(), before);
        prop_assert!(!root.where_active());
        prop_assert!(!root.not_active());
        prop_assert!(!root.order_active());
        prop_assert!(!root.limit_active());
    }

    /// `sum` agrees with summing the matched values directly.
    #[test]
    fn sum_matches_direct_sum(
        items in prop::collection::vec(test_item_strategy(), 0..50),
    ) {
        let expected: i64 = items.iter().filter(|i| i.active).map(|i| i.value).sum();
        prop_assert_eq!(items.where_(("active", true)).sum("value").unwrap(), Number::I64(expected));
    }

    /// `maximum` agrees with the iterator maximum.
    #[test]
    fn maximum_matches_iterator_max(
        items in prop::collection::vec(test_item_strategy(), 0..50),
    ) {
        let expected = items.iter().map(|i| i.value).max().map(|n| Value::Number(Number::I64(n)));
        prop_assert_eq!(items.maximum("value").unwrap(), expected);
    }
}

// ============================================================================
// Edge cases
// ============================================================================

#[test]
fn empty_collection_returns_empty() {
    let items: Vec<TestItem> = vec![];
    let c = items.where_(("active", true)).order_asc("value").limit(5);

    assert!(c.is_empty());
    assert_eq!(c.first(), None);
    assert_eq!(c.sum("value").unwrap(), Number::I64(0));
}

#[test]
fn offset_equal_to_length_returns_empty() {
    let items = vec![1, 2, 3]
        .into_iter()
        .map(|value| TestItem {
            value,
            name: format!("n{}", value),
            active: true,
        })
        .collect::<Vec<_>>();

    assert!(items.offset(3).is_empty());
    assert!(items.offset(30).is_empty());
}

#[test]
fn limit_zero_returns_empty() {
    let items = vec![TestItem {
        value: 1,
        name: "a".into(),
        active: false,
    }];
    assert_eq!(items.limit(0).count(), 0);
}
