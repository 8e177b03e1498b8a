//! Record access traits.
//!
//! [`Record`] is the one capability the engine needs from the data it
//! queries: read a field by name. [`Queryable`] attaches the chainable API to
//! collections of records.

use std::collections::{BTreeMap, HashMap};

use crate::clause::ClauseSet;
use crate::criteria::Criteria;
use crate::error::Result;
use crate::ordering::OrderBy;
use crate::value::{Literal, Number, Timestamp, Value};

/// Named-field read access.
///
/// This trait is typically derived with `#[derive(Record)]` (feature
/// `derive`), but is easy to implement by hand.
///
/// # Manual Implementation
///
/// ```
/// use criteria::{Number, Record, Value};
///
/// struct Person {
///     name: String,
///     age: u8,
/// }
///
/// impl Record for Person {
///     fn get(&self, field: &str) -> Value<'_> {
///         match field {
///             "name" => Value::String(&self.name),
///             "age" => Value::Number(Number::from(self.age)),
///             _ => Value::None,
///         }
///     }
/// }
/// ```
pub trait Record {
    /// Returns the value of a field, or [`Value::None`] if the field doesn't
    /// exist or is not queryable.
    fn get(&self, field: &str) -> Value<'_>;

    /// Function form of [`Record::get`], handy where a `fn` pointer is wanted.
    fn accessor<'a>(item: &'a Self, field: &str) -> Value<'a>
    where
        Self: Sized,
    {
        item.get(field)
    }
}

impl<R: Record + ?Sized> Record for &R {
    fn get(&self, field: &str) -> Value<'_> {
        (**self).get(field)
    }
}

impl<R: Record + ?Sized> Record for Box<R> {
    fn get(&self, field: &str) -> Value<'_> {
        (**self).get(field)
    }
}

/// Map-backed records, as used for fixtures and parsed documents.
impl<S: std::hash::BuildHasher> Record for HashMap<String, Literal, S> {
    fn get(&self, field: &str) -> Value<'_> {
        HashMap::get(self, field).map_or(Value::None, Literal::as_value)
    }
}

impl Record for BTreeMap<String, Literal> {
    fn get(&self, field: &str) -> Value<'_> {
        BTreeMap::get(self, field).map_or(Value::None, Literal::as_value)
    }
}

/// Converts enum types to a stable discriminant for querying.
///
/// Used by `#[derive(Record)]` for fields marked `#[record(Enum)]`.
///
/// ```
/// use criteria::RecordEnum;
///
/// #[derive(Clone, Copy)]
/// enum Status {
///     Pending,
///     Active,
/// }
///
/// impl RecordEnum for Status {
///     fn discriminant(&self) -> u32 {
///         match self {
///             Status::Pending => 0,
///             Status::Active => 1,
///         }
///     }
/// }
/// ```
pub trait RecordEnum {
    /// Returns the discriminant value for this variant. Use explicit values so
    /// queries stay stable when variants are reordered.
    fn discriminant(&self) -> u32;
}

/// Converts datetime types to a [`Timestamp`].
///
/// Used by `#[derive(Record)]` for fields marked `#[record(Timestamp)]`.
pub trait RecordTimestamp {
    fn timestamp(&self) -> Timestamp;
}

impl RecordTimestamp for Timestamp {
    fn timestamp(&self) -> Timestamp {
        *self
    }
}

impl RecordTimestamp for i64 {
    fn timestamp(&self) -> Timestamp {
        Timestamp::from_millis(*self)
    }
}

/// Values past `i64::MAX` saturate.
impl RecordTimestamp for u64 {
    fn timestamp(&self) -> Timestamp {
        Timestamp::from_millis(i64::try_from(*self).unwrap_or(i64::MAX))
    }
}

/// Attaches the criteria API to a collection of records.
///
/// Every shortcut starts from a fresh [`Criteria`], so nothing is remembered
/// on the collection between calls.
///
/// ```
/// use criteria::{Literal, Queryable};
/// use std::collections::BTreeMap;
///
/// let people: Vec<BTreeMap<String, Literal>> = vec![
///     BTreeMap::from([("name".into(), "Matt".into()), ("age".into(), 30.into())]),
///     BTreeMap::from([("name".into(), "Mark".into()), ("age".into(), 45.into())]),
/// ];
///
/// assert_eq!(people.where_(("age", 40..50)).count(), 1);
/// assert_eq!(people.order_desc("age").first().unwrap()["name"], Literal::from("Mark"));
/// ```
pub trait Queryable<R: Record> {
    /// The records, in source order.
    fn records(&self) -> &[R];

    /// Creates a root criteria with no constraints over these records.
    fn criteria(&self) -> Criteria<'_, R> {
        Criteria::new(self.records())
    }

    fn where_(&self, clauses: impl Into<ClauseSet>) -> Criteria<'_, R> {
        self.criteria().where_(clauses)
    }

    fn not(&self, clauses: impl Into<ClauseSet>) -> Criteria<'_, R> {
        self.criteria().not(clauses)
    }

    fn order<I>(&self, args: I) -> Criteria<'_, R>
    where
        I: IntoIterator,
        I::Item: Into<OrderBy>,
    {
        self.criteria().order(args)
    }

    fn order_asc(&self, field: &str) -> Criteria<'_, R> {
        self.criteria().order_asc(field)
    }

    fn order_desc(&self, field: &str) -> Criteria<'_, R> {
        self.criteria().order_desc(field)
    }

    fn limit<N: TryInto<usize>>(&self, n: N) -> Criteria<'_, R> {
        self.criteria().limit(n)
    }

    fn offset<N: TryInto<usize>>(&self, n: N) -> Criteria<'_, R> {
        self.criteria().offset(n)
    }

    fn skip<N: TryInto<usize>>(&self, n: N) -> Criteria<'_, R> {
        self.criteria().skip(n)
    }

    fn sum(&self, field: &str) -> Result<Number> {
        self.criteria().sum(field)
    }

    fn minimum<'a>(&'a self, field: &str) -> Result<Option<Value<'a>>>
    where
        R: 'a,
    {
        self.criteria().minimum(field)
    }

    fn maximum<'a>(&'a self, field: &str) -> Result<Option<Value<'a>>>
    where
        R: 'a,
    {
        self.criteria().maximum(field)
    }

    fn average(&self, field: &str) -> Result<Option<f64>> {
        self.criteria().average(field)
    }
}

impl<R: Record> Queryable<R> for [R] {
    fn records(&self) -> &[R] {
        self
    }
}

impl<R: Record> Queryable<R> for Vec<R> {
    fn records(&self) -> &[R] {
        self
    }
}

impl<R: Record, const N: usize> Queryable<R> for [R; N] {
    fn records(&self) -> &[R] {
        self
    }
}
