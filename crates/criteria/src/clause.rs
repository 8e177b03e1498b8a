//! Clause sets: field names mapped to query values.
//!
//! A [`ClauseSet`] holds at most one [`QueryValue`] per field. Adding a field
//! that is already present replaces its value in place, so the set behaves
//! like an insertion-ordered map with last-write-wins semantics.

use crate::matcher::QueryValue;
use crate::record::Record;

/// A single field constraint.
#[derive(Debug, Clone)]
pub struct Clause {
    /// The field name to read from each record.
    pub field: String,
    /// What the field must satisfy.
    pub value: QueryValue,
}

impl Clause {
    pub fn new(field: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        Clause {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Reads the clause's field from `record` and tests it.
    pub fn matches<R: Record + ?Sized>(&self, record: &R) -> bool {
        self.value.matches(&record.get(&self.field))
    }
}

/// Field constraints combined with AND.
///
/// # Example
///
/// ```
/// use criteria::{ClauseSet, Kind};
///
/// let clauses = ClauseSet::new()
///     .and("name", "Matt")
///     .and("age", Kind::Integer)
///     .and("name", "Mark"); // replaces the first "name" clause
///
/// assert_eq!(clauses.len(), 2);
/// assert_eq!(clauses.fields().collect::<Vec<_>>(), ["name", "age"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClauseSet {
    clauses: Vec<Clause>,
}

impl ClauseSet {
    /// Creates an empty clause set.
    pub fn new() -> Self {
        ClauseSet::default()
    }

    /// Adds a clause, replacing any existing clause on the same field.
    pub fn and(mut self, field: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.insert(Clause::new(field, value));
        self
    }

    /// Inserts a clause in place, replacing any existing clause on the same field.
    pub fn insert(&mut self, clause: Clause) {
        match self.clauses.iter_mut().find(|c| c.field == clause.field) {
            Some(existing) => existing.value = clause.value,
            None => self.clauses.push(clause),
        }
    }

    /// Returns a copy of `self` with every clause of `other` merged in.
    pub fn merged(&self, other: ClauseSet) -> Self {
        let mut out = self.clone();
        for clause in other.clauses {
            out.insert(clause);
        }
        out
    }

    /// Returns the query value for a field, if constrained.
    pub fn get(&self, field: &str) -> Option<&QueryValue> {
        self.clauses
            .iter()
            .find(|c| c.field == field)
            .map(|c| &c.value)
    }

    /// Returns `true` if `record` satisfies every clause.
    ///
    /// An empty set is satisfied by every record.
    pub fn matches_all<R: Record + ?Sized>(&self, record: &R) -> bool {
        self.clauses.iter().all(|clause| clause.matches(record))
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Clause> {
        self.clauses.iter()
    }

    /// Constrained field names, in first-insertion order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.clauses.iter().map(|c| c.field.as_str())
    }
}

impl<'a> IntoIterator for &'a ClauseSet {
    type Item = &'a Clause;
    type IntoIter = std::slice::Iter<'a, Clause>;

    fn into_iter(self) -> Self::IntoIter {
        self.clauses.iter()
    }
}

impl From<Clause> for ClauseSet {
    fn from(clause: Clause) -> Self {
        let mut set = ClauseSet::new();
        set.insert(clause);
        set
    }
}

impl<K: Into<String>, V: Into<QueryValue>> From<(K, V)> for ClauseSet {
    fn from((field, value): (K, V)) -> Self {
        ClauseSet::from(Clause::new(field, value))
    }
}

impl<K: Into<String>, V: Into<QueryValue>, const N: usize> From<[(K, V); N]> for ClauseSet {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl<K: Into<String>, V: Into<QueryValue>> From<Vec<(K, V)>> for ClauseSet {
    fn from(pairs: Vec<(K, V)>) -> Self {
        pairs.into_iter().collect()
    }
}

impl<K: Into<String>, V: Into<QueryValue>> FromIterator<(K, V)> for ClauseSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = ClauseSet::new();
        for (field, value) in iter {
            set.insert(Clause::new(field, value));
        }
        set
    }
}
