//! Criteria builder and evaluator.
//!
//! A [`Criteria`] accumulates filter, sort and pagination state through
//! chained calls and evaluates it against its source records only when a
//! terminal operation asks for results.

use std::fmt;

use tracing::{debug, trace};

use crate::clause::ClauseSet;
use crate::error::{CriteriaError, Result};
use crate::ordering::{compare_by_orderings, compare_values, Dir, OrderBy, OrderSet};
use crate::record::Record;
use crate::value::{Number, Value};

/// Immutable query state over a borrowed slice of records.
///
/// Chain methods take `&self` and return a new criteria; the receiver is
/// never modified, so any intermediate criteria can be reused. Terminal
/// operations run the full pipeline each time they are called:
///
/// ```text
/// filter (where ∧ ¬not) → order → offset → limit
/// ```
///
/// # Example
///
/// ```
/// use criteria::{ClauseSet, Criteria, Number, Record, Value};
///
/// struct Person {
///     name: &'static str,
///     age: i64,
/// }
///
/// impl Record for Person {
///     fn get(&self, field: &str) -> Value<'_> {
///         match field {
///             "name" => Value::String(self.name),
///             "age" => Value::Number(Number::I64(self.age)),
///             _ => Value::None,
///         }
///     }
/// }
///
/// let people = [
///     Person { name: "Matt", age: 30 },
///     Person { name: "Mark", age: 45 },
///     Person { name: "John", age: 50 },
/// ];
///
/// let root = Criteria::new(&people);
/// assert_eq!(root.where_(("age", 42..48)).first().unwrap().name, "Mark");
/// assert_eq!(root.order_asc("name").first().unwrap().name, "John");
/// assert!(root.where_(ClauseSet::new().and("name", "Matt").and("age", 40)).is_empty());
/// assert_eq!(root.maximum("age").unwrap(), Some(Value::Number(Number::I64(50))));
/// assert_eq!(root.where_(("age", 0..1)).average("age").unwrap(), None);
/// ```
pub struct Criteria<'s, R> {
    records: &'s [R],
    where_clauses: ClauseSet,
    not_clauses: ClauseSet,
    orderings: OrderSet,
    limit: Option<usize>,
    offset: Option<usize>,
}

impl<'s, R> Clone for Criteria<'s, R> {
    fn clone(&self) -> Self {
        Criteria {
            records: self.records,
            where_clauses: self.where_clauses.clone(),
            not_clauses: self.not_clauses.clone(),
            orderings: self.orderings.clone(),
            limit: self.limit,
            offset: self.offset,
        }
    }
}

impl<R> fmt::Debug for Criteria<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Criteria")
            .field("records", &self.records.len())
            .field("where_clauses", &self.where_clauses)
            .field("not_clauses", &self.not_clauses)
            .field("orderings", &self.orderings)
            .field("limit", &self.limit)
            .field("offset", &self.offset)
            .finish()
    }
}

impl<'s, R: Record> Criteria<'s, R> {
    /// Creates a criteria with no constraints over `records`.
    pub fn new(records: &'s [R]) -> Self {
        Criteria {
            records,
            where_clauses: ClauseSet::new(),
            not_clauses: ClauseSet::new(),
            orderings: OrderSet::new(),
            limit: None,
            offset: None,
        }
    }

    // ========================================================================
    // Chain methods
    // ========================================================================

    /// Keeps records matching every clause.
    ///
    /// Clauses merge into those already present; a field given again replaces
    /// its earlier value.
    pub fn where_(&self, clauses: impl Into<ClauseSet>) -> Self {
        let clauses = clauses.into();
        trace!(target: "criteria::chain", op = "where", clauses = clauses.len());
        let mut next = self.clone();
        if !clauses.is_empty() {
            next.where_clauses = self.where_clauses.merged(clauses);
        }
        next
    }

    /// Excludes records matching every clause.
    ///
    /// A record is dropped only when all `not` clauses match it.
    pub fn not(&self, clauses: impl Into<ClauseSet>) -> Self {
        let clauses = clauses.into();
        trace!(target: "criteria::chain", op = "not", clauses = clauses.len());
        let mut next = self.clone();
        if !clauses.is_empty() {
            next.not_clauses = self.not_clauses.merged(clauses);
        }
        next
    }

    /// Adds sort keys. Bare field names sort ascending; `(field, Dir)` pairs
    /// set a direction. A field already ordered keeps its precedence and takes
    /// the new direction.
    pub fn order<I>(&self, args: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<OrderBy>,
    {
        let mut next = self.clone();
        next.orderings = self.orderings.merged(args.into_iter().map(Into::into));
        trace!(target: "criteria::chain", op = "order", keys = next.orderings.len());
        next
    }

    /// Adds a single sort key with the given direction.
    pub fn order_by(&self, field: &str, dir: Dir) -> Self {
        self.order([OrderBy::new(field, dir)])
    }

    /// Adds an ascending sort key.
    pub fn order_asc(&self, field: &str) -> Self {
        self.order_by(field, Dir::Asc)
    }

    /// Adds a descending sort key.
    pub fn order_desc(&self, field: &str) -> Self {
        self.order_by(field, Dir::Desc)
    }

    /// Caps the number of results. Values that don't convert to `usize`
    /// (negative numbers) leave the limit inactive.
    pub fn limit<N: TryInto<usize>>(&self, n: N) -> Self {
        let mut next = self.clone();
        next.limit = n.try_into().ok();
        trace!(target: "criteria::chain", op = "limit", value = ?next.limit);
        next
    }

    /// Skips leading results. Values that don't convert to `usize` (negative
    /// numbers) leave the offset inactive.
    pub fn offset<N: TryInto<usize>>(&self, n: N) -> Self {
        let mut next = self.clone();
        next.offset = n.try_into().ok();
        trace!(target: "criteria::chain", op = "offset", value = ?next.offset);
        next
    }

    /// Alias for [`Criteria::offset`].
    pub fn skip<N: TryInto<usize>>(&self, n: N) -> Self {
        self.offset(n)
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Returns `true` if any `where` clause is set.
    pub fn where_active(&self) -> bool {
        !self.where_clauses.is_empty()
    }

    /// Returns `true` if any `not` clause is set.
    pub fn not_active(&self) -> bool {
        !self.not_clauses.is_empty()
    }

    /// Returns `true` if any sort key is set.
    pub fn order_active(&self) -> bool {
        !self.orderings.is_empty()
    }

    /// Returns `true` if a valid limit is set.
    pub fn limit_active(&self) -> bool {
        self.limit.is_some()
    }

    /// Returns `true` if a valid offset is set.
    pub fn offset_active(&self) -> bool {
        self.offset.is_some()
    }

    /// The accumulated `where` clauses.
    pub fn where_clauses(&self) -> &ClauseSet {
        &self.where_clauses
    }

    /// The accumulated `not` clauses.
    pub fn not_clauses(&self) -> &ClauseSet {
        &self.not_clauses
    }

    /// The sort keys, in precedence order.
    pub fn orderings(&self) -> &OrderSet {
        &self.orderings
    }

    /// The active limit, if any.
    pub fn limit_value(&self) -> Option<usize> {
        self.limit
    }

    /// The active offset, if any.
    pub fn offset_value(&self) -> Option<usize> {
        self.offset
    }

    // ========================================================================
    // Evaluation
    // ========================================================================

    /// Returns `true` if the record passes the `where` and `not` clause sets.
    pub fn keep(&self, record: &R) -> bool {
        let included = !self.where_active() || self.where_clauses.matches_all(record);
        let excluded = self.not_active() && self.not_clauses.matches_all(record);
        included && !excluded
    }

    /// Evaluates the criteria: filter, order, offset, limit.
    pub fn to_vec(&self) -> Vec<&'s R> {
        let mut results: Vec<&'s R> = self
            .records
            .iter()
            .filter(|record| self.keep(record))
            .collect();
        let matched = results.len();

        if self.order_active() {
            // sort_by is stable: full ties keep source order
            results.sort_by(|a, b| compare_by_orderings(*a, *b, &self.orderings));
        }

        if let Some(offset) = self.offset {
            results.drain(..offset.min(results.len()));
        }

        if let Some(limit) = self.limit {
            results.truncate(limit);
        }

        debug!(
            target: "criteria::eval",
            source = self.records.len(),
            matched,
            returned = results.len(),
            ordered = self.order_active(),
            offset = ?self.offset,
            limit = ?self.limit,
            "evaluated criteria"
        );

        results
    }

    /// Alias for [`Criteria::to_vec`].
    pub fn all(&self) -> Vec<&'s R> {
        self.to_vec()
    }

    /// Evaluates the criteria and returns owned copies of the results.
    pub fn cloned(&self) -> Vec<R>
    where
        R: Clone,
    {
        self.to_vec().into_iter().cloned().collect()
    }

    /// Iterates over the evaluated results.
    pub fn iter(&self) -> std::vec::IntoIter<&'s R> {
        self.to_vec().into_iter()
    }

    /// Number of results.
    pub fn count(&self) -> usize {
        self.to_vec().len()
    }

    /// Returns `true` if nothing matches.
    pub fn is_empty(&self) -> bool {
        self.to_vec().is_empty()
    }

    /// First result, after ordering and paging.
    pub fn first(&self) -> Option<&'s R> {
        self.to_vec().first().copied()
    }

    /// Last result, after ordering and paging.
    pub fn last(&self) -> Option<&'s R> {
        self.to_vec().last().copied()
    }

    /// Returns the result at `index`, counted after filtering and paging.
    pub fn get(&self, index: usize) -> Option<&'s R> {
        self.to_vec().get(index).copied()
    }

    /// Returns `true` if a result equals `record`.
    pub fn contains(&self, record: &R) -> bool
    where
        R: PartialEq,
    {
        self.to_vec().into_iter().any(|r| r == record)
    }

    /// Position of the first result equal to `record`.
    pub fn position(&self, record: &R) -> Option<usize>
    where
        R: PartialEq,
    {
        self.to_vec().into_iter().position(|r| r == record)
    }

    // ========================================================================
    // Aggregations
    // ========================================================================

    /// Sums a numeric field over the results, starting from zero.
    pub fn sum(&self, field: &str) -> Result<Number> {
        Self::sum_over(&self.to_vec(), field)
    }

    /// Smallest value of a field over the results, `None` when there are none.
    pub fn minimum(&self, field: &str) -> Result<Option<Value<'s>>> {
        self.extremum(field, std::cmp::Ordering::Less)
    }

    /// Largest value of a field over the results, `None` when there are none.
    pub fn maximum(&self, field: &str) -> Result<Option<Value<'s>>> {
        self.extremum(field, std::cmp::Ordering::Greater)
    }

    /// Mean of a numeric field, `None` when there are no results.
    pub fn average(&self, field: &str) -> Result<Option<f64>> {
        let results = self.to_vec();
        if results.is_empty() {
            return Ok(None);
        }
        let total = Self::sum_over(&results, field)?;
        Ok(Some(total.to_f64() / results.len() as f64))
    }

    fn sum_over(results: &[&'s R], field: &str) -> Result<Number> {
        results.iter().try_fold(Number::I64(0), |total, record| {
            match record.get(field) {
                Value::Number(n) => Ok(total + n),
                other => Err(CriteriaError::NotNumeric {
                    field: field.to_string(),
                    kind: other.kind_name(),
                }),
            }
        })
    }

    fn extremum(&self, field: &str, wanted: std::cmp::Ordering) -> Result<Option<Value<'s>>> {
        let mut best: Option<Value<'s>> = None;
        for record in self.to_vec() {
            let value = record.get(field);
            best = match best {
                None => Some(value),
                Some(current) => {
                    // Absent values have no natural order against present ones
                    let ordering = match (&value, &current) {
                        (Value::None, Value::None) => Some(std::cmp::Ordering::Equal),
                        (Value::None, _) | (_, Value::None) => None,
                        _ => compare_values(&value, &current),
                    };
                    match ordering {
                        Some(o) if o == wanted => Some(value),
                        Some(_) => Some(current),
                        None => {
                            return Err(CriteriaError::Incomparable {
                                field: field.to_string(),
                                left: current.kind_name(),
                                right: value.kind_name(),
                            })
                        }
                    }
                }
            };
        }
        Ok(best)
    }
}

impl<'c, 's, R: Record> IntoIterator for &'c Criteria<'s, R> {
    type Item = &'s R;
    type IntoIter = std::vec::IntoIter<&'s R>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
