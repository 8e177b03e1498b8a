//! Criteria - chainable, immutable query criteria for in-memory records.
//!
//! Criteria layers ActiveRecord-style querying onto any slice of records
//! without touching the slice or remembering anything between calls. It
//! supports:
//!
//! - Polymorphic matching: exact values, regexes, predicates, ranges, type tags
//! - Exclusion clauses with `not`
//! - Multi-field ordering with ascending/descending keys
//! - Pagination with limit and offset
//! - Aggregation: sum, minimum, maximum, average
//!
//! # Quick Start
//!
//! ```rust
//! use criteria::{ClauseSet, Kind, Number, QueryValue, Queryable, Record, Value};
//!
//! struct Person {
//!     name: String,
//!     age: u32,
//! }
//!
//! impl Record for Person {
//!     fn get(&self, field: &str) -> Value<'_> {
//!         match field {
//!             "name" => Value::String(&self.name),
//!             "age" => Value::Number(Number::from(self.age)),
//!             _ => Value::None,
//!         }
//!     }
//! }
//!
//! let people = vec![
//!     Person { name: "Matt".into(), age: 30 },
//!     Person { name: "Mark".into(), age: 45 },
//!     Person { name: "John".into(), age: 50 },
//! ];
//!
//! let seniors = people
//!     .where_(("age", 40..))
//!     .not(("name", QueryValue::pattern("^J").unwrap()))
//!     .order_desc("age");
//!
//! assert_eq!(seniors.count(), 1);
//! assert_eq!(seniors.first().unwrap().name, "Mark");
//!
//! // The intermediate criteria is still usable on its own
//! let typed = people.where_(ClauseSet::new().and("age", Kind::Integer));
//! assert_eq!(typed.sum("age").unwrap(), Number::I64(125));
//! ```
//!
//! # Matching Semantics
//!
//! ```text
//! keep = (every where clause matches, or there are none)
//!      ∧ ¬(every not clause matches, and there is at least one)
//! ```
//!
//! | Query value | Matches when |
//! |-------------|--------------|
//! | exact (`"Matt"`, `30`, `true`) | field equals it |
//! | pattern (`Regex`) | regex finds a match in the field's text |
//! | predicate (closure) | closure returns `true` |
//! | range (`42..48`, `..=10`) | field lies within bounds |
//! | type tag (`Kind`) | field is of that kind or a subtype |
//!
//! An absent field never matches.
//!
//! # Logging
//!
//! Evaluation emits `tracing` events: `debug` on target `criteria::eval` for
//! each evaluated pipeline, `trace` on target `criteria::chain` for each chain
//! call. No subscriber is installed by this crate.
//!
//! # Features
//!
//! - `derive`: re-exports `#[derive(Record)]` from `criteria-macros`.

mod clause;
mod criteria;
mod error;
mod matcher;
mod ordering;
mod record;
mod value;

// Re-export public API
pub use clause::{Clause, ClauseSet};
pub use criteria::Criteria;
pub use error::{CriteriaError, Result};
pub use matcher::{Matcher, Predicate, QueryValue, ValueRange};
pub use ordering::{compare_by_orderings, compare_values, Dir, OrderBy, OrderSet};
pub use record::{Queryable, Record, RecordEnum, RecordTimestamp};
pub use value::{Kind, Literal, Number, Timestamp, Value};

#[cfg(feature = "derive")]
pub use criteria_macros::Record;
