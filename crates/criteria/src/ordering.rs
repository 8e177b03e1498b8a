//! Ordering types for result sorting.
//!
//! Provides [`Dir`] for sort direction, [`OrderBy`] for a single sort key and
//! [`OrderSet`] for the ordered, de-duplicated list of keys a criteria sorts by.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::CriteriaError;
use crate::record::Record;
use crate::value::Value;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dir {
    /// Ascending order (smallest first).
    #[default]
    Asc,
    /// Descending order (largest first).
    Desc,
}

impl Dir {
    /// Applies this direction to an ordering.
    ///
    /// For `Asc`, returns the ordering unchanged.
    /// For `Desc`, reverses the ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Dir::Asc => ordering,
            Dir::Desc => ordering.reverse(),
        }
    }

    /// Returns the display name of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Dir::Asc => "asc",
            Dir::Desc => "desc",
        }
    }
}

impl fmt::Display for Dir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Dir {
    type Err = CriteriaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Dir::Asc),
            "desc" | "descending" => Ok(Dir::Desc),
            _ => Err(CriteriaError::InvalidDirection(s.to_string())),
        }
    }
}

/// A single ordering clause specifying a field and direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    /// The field to sort by.
    pub field: String,
    /// The sort direction.
    pub dir: Dir,
}

impl OrderBy {
    /// Creates a new ascending ordering for the given field.
    pub fn asc(field: impl Into<String>) -> Self {
        OrderBy::new(field, Dir::Asc)
    }

    /// Creates a new descending ordering for the given field.
    pub fn desc(field: impl Into<String>) -> Self {
        OrderBy::new(field, Dir::Desc)
    }

    /// Creates a new ordering with the given direction.
    pub fn new(field: impl Into<String>, dir: Dir) -> Self {
        OrderBy {
            field: field.into(),
            dir,
        }
    }

    /// Compares two values according to this ordering.
    ///
    /// Returns `None` if the values cannot be compared (type mismatch or NaN).
    pub fn compare(&self, a: &Value<'_>, b: &Value<'_>) -> Option<Ordering> {
        let base_ordering = compare_values(a, b)?;
        Some(self.dir.apply(base_ordering))
    }
}

/// A bare field name sorts ascending.
impl From<&str> for OrderBy {
    fn from(field: &str) -> Self {
        OrderBy::asc(field)
    }
}

impl From<String> for OrderBy {
    fn from(field: String) -> Self {
        OrderBy::asc(field)
    }
}

impl<F: Into<String>> From<(F, Dir)> for OrderBy {
    fn from((field, dir): (F, Dir)) -> Self {
        OrderBy::new(field, dir)
    }
}

/// Sort keys in precedence order, at most one per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderSet {
    keys: Vec<OrderBy>,
}

impl OrderSet {
    pub fn new() -> Self {
        OrderSet::default()
    }

    /// Adds a key. A field already present keeps its position and takes the
    /// new direction.
    pub fn push(&mut self, order: OrderBy) {
        match self.keys.iter_mut().find(|k| k.field == order.field) {
            Some(existing) => existing.dir = order.dir,
            None => self.keys.push(order),
        }
    }

    /// Returns a copy of `self` with `other`'s keys merged in.
    pub fn merged(&self, other: impl IntoIterator<Item = OrderBy>) -> Self {
        let mut out = self.clone();
        for order in other {
            out.push(order);
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OrderBy> {
        self.keys.iter()
    }

    pub fn as_slice(&self) -> &[OrderBy] {
        &self.keys
    }
}

impl<O: Into<OrderBy>> FromIterator<O> for OrderSet {
    fn from_iter<I: IntoIterator<Item = O>>(iter: I) -> Self {
        OrderSet::new().merged(iter.into_iter().map(Into::into))
    }
}

impl<'a> IntoIterator for &'a OrderSet {
    type Item = &'a OrderBy;
    type IntoIter = std::slice::Iter<'a, OrderBy>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.iter()
    }
}

/// Compares two values of the same kind.
///
/// Absent values sort after present ones. Returns `None` if the kinds don't
/// match or comparison is not possible (NaN).
pub fn compare_values(a: &Value<'_>, b: &Value<'_>) -> Option<Ordering> {
    match (a, b) {
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Number(a), Value::Number(b)) => a.compare(*b),
        (Value::Timestamp(a), Value::Timestamp(b)) => Some(a.cmp(b)),
        (Value::Enum(a), Value::Enum(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),

        (Value::None, Value::None) => Some(Ordering::Equal),
        (Value::None, _) => Some(Ordering::Greater),
        (_, Value::None) => Some(Ordering::Less),

        _ => None,
    }
}

/// Compares two records using a list of ordering clauses.
///
/// Uses the first clause as the primary sort key, the second to break ties, etc.
/// If all clauses compare equal, returns `Equal`.
pub fn compare_by_orderings<R: Record + ?Sized>(a: &R, b: &R, orderings: &OrderSet) -> Ordering {
    for order_by in orderings {
        let val_a = a.get(&order_by.field);
        let val_b = b.get(&order_by.field);

        if let Some(ordering) = order_by.compare(&val_a, &val_b) {
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        // Incomparable keys (kind mismatch/NaN) tie and defer to the next key
    }
    Ordering::Equal
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Number, Timestamp};

    #[test]
    fn dir_apply() {
        assert_eq!(Dir::Asc.apply(Ordering::Less), Ordering::Less);
        assert_eq!(Dir::Asc.apply(Ordering::Equal), Ordering::Equal);
        assert_eq!(Dir::Desc.apply(Ordering::Less), Ordering::Greater);
        assert_eq!(Dir::Desc.apply(Ordering::Equal), Ordering::Equal);
    }

    #[test]
    fn dir_parse() {
        assert_eq!("asc".parse::<Dir>().unwrap(), Dir::Asc);
        assert_eq!("DESC".parse::<Dir>().unwrap(), Dir::Desc);
        assert_eq!("descending".parse::<Dir>().unwrap(), Dir::Desc);

        let err = "sideways".parse::<Dir>().unwrap_err();
        assert!(matches!(err, CriteriaError::InvalidDirection(ref s) if s == "sideways"));
    }

    #[test]
    fn order_by_conversions() {
        assert_eq!(OrderBy::from("name"), OrderBy::asc("name"));
        assert_eq!(OrderBy::from(("age", Dir::Desc)), OrderBy::desc("age"));
    }

    #[test]
    fn order_set_keeps_first_position_and_updates_direction() {
        let set: OrderSet = [OrderBy::asc("name"), OrderBy::asc("age")]
            .into_iter()
            .collect();
        let merged = set.merged([OrderBy::desc("name"), OrderBy::asc("city")]);

        assert_eq!(
            merged.as_slice(),
            &[
                OrderBy::desc("name"),
                OrderBy::asc("age"),
                OrderBy::asc("city")
            ]
        );
        // Source set untouched
        assert_eq!(set.as_slice(), &[OrderBy::asc("name"), OrderBy::asc("age")]);
    }

    #[test]
    fn compare_strings() {
        let a = Value::String("apple");
        let b = Value::String("banana");

        assert_eq!(compare_values(&a, &b), Some(Ordering::Less));
        assert_eq!(compare_values(&b, &a), Some(Ordering::Greater));
        assert_eq!(compare_values(&a, &a), Some(Ordering::Equal));
    }

    #[test]
    fn compare_numbers_nan() {
        let nan = Value::Number(Number::F64(f64::NAN));
        let num = Value::Number(Number::F64(1.0));

        assert_eq!(compare_values(&nan, &num), None);
    }

    #[test]
    fn compare_timestamps() {
        let a = Value::Timestamp(Timestamp(1000));
        let b = Value::Timestamp(Timestamp(2000));

        assert_eq!(compare_values(&a, &b), Some(Ordering::Less));
    }

    #[test]
    fn compare_none_values() {
        let none = Value::None;
        let some = Value::String("test");

        assert_eq!(compare_values(&none, &some), Some(Ordering::Greater));
        assert_eq!(compare_values(&some, &none), Some(Ordering::Less));
        assert_eq!(compare_values(&none, &none), Some(Ordering::Equal));
    }

    #[test]
    fn compare_type_mismatch() {
        let s = Value::String("test");
        let n = Value::Number(Number::I64(42));

        assert_eq!(compare_values(&s, &n), None);
    }

    #[test]
    fn compare_by_multiple_orderings() {
        struct Item {
            name: String,
            priority: i64,
        }

        impl Record for Item {
            fn get(&self, field: &str) -> Value<'_> {
                match field {
                    "name" => Value::String(&self.name),
                    "priority" => Value::Number(Number::I64(self.priority)),
                    _ => Value::None,
                }
            }
        }

        let items = [
            Item {
                name: "a".to_string(),
                priority: 1,
            },
            Item {
                name: "b".to_string(),
                priority: 1,
            },
            Item {
                name: "a".to_string(),
                priority: 2,
            },
        ];

        let orderings: OrderSet = ["priority", "name"].into_iter().collect();

        // Same priority, compare by name
        assert_eq!(
            compare_by_orderings(&items[0], &items[1], &orderings),
            Ordering::Less
        );
        assert_eq!(
            compare_by_orderings(&items[0], &items[2], &orderings),
            Ordering::Less
        );

        let desc: OrderSet = [("priority", Dir::Desc)].into_iter().collect();
        assert_eq!(
            compare_by_orderings(&items[0], &items[2], &desc),
            Ordering::Greater
        );
        assert_eq!(
            compare_by_orderings(&items[0], &items[1], &desc),
            Ordering::Equal
        );
    }
}
