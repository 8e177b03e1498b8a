//! Query values and the matcher that evaluates them.
//!
//! A [`QueryValue`] describes what a single field must look like. It is one of
//! five kinds, and [`Matcher::matches`] evaluates exactly one branch per kind:
//!
//! | Kind | Matches when |
//! |------|--------------|
//! | `Exact` | the field equals the literal (numbers compare across widths) |
//! | `Pattern` | the regex matches anywhere in the field's textual form |
//! | `Predicate` | the closure returns `true` for the field value |
//! | `Range` | the field lies within the bounds, same kind only |
//! | `Kind` | the field's kind is the tag or a subtype of it |
//!
//! An absent field ([`Value::None`]) never matches, whatever the kind. A
//! predicate is not called for an absent field.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Bound, Range, RangeFrom, RangeInclusive, RangeTo, RangeToInclusive};
use std::sync::Arc;

use regex::Regex;

use crate::error::Result;
use crate::ordering::compare_values;
use crate::value::{Kind, Literal, Number, Timestamp, Value};

/// A user-supplied test on a field value.
///
/// Cloning a predicate shares the closure.
#[derive(Clone)]
pub struct Predicate(Arc<dyn Fn(&Value<'_>) -> bool + Send + Sync>);

impl Predicate {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Value<'_>) -> bool + Send + Sync + 'static,
    {
        Predicate(Arc::new(f))
    }

    pub fn call(&self, value: &Value<'_>) -> bool {
        (self.0)(value)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate(..)")
    }
}

/// An interval over an orderable kind.
///
/// Either end may be included, excluded or unbounded.
///
/// ```
/// use criteria::{Number, Value, ValueRange};
///
/// let teens = ValueRange::from(13..20);
/// assert!(teens.contains(&Value::Number(Number::I64(19))));
/// assert!(!teens.contains(&Value::Number(Number::I64(20))));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ValueRange {
    pub start: Bound<Literal>,
    pub end: Bound<Literal>,
}

impl ValueRange {
    pub fn new(start: Bound<Literal>, end: Bound<Literal>) -> Self {
        ValueRange { start, end }
    }

    /// Returns `true` if the value lies within the bounds.
    ///
    /// Values of a different kind than a bound, absent values and NaN are
    /// never contained.
    pub fn contains(&self, value: &Value<'_>) -> bool {
        if value.is_none() {
            return false;
        }

        let above_start = match &self.start {
            Bound::Included(lo) => matches!(
                compare_values(value, &lo.as_value()),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            Bound::Excluded(lo) => {
                compare_values(value, &lo.as_value()) == Some(Ordering::Greater)
            }
            Bound::Unbounded => true,
        };

        let below_end = match &self.end {
            Bound::Included(hi) => matches!(
                compare_values(value, &hi.as_value()),
                Some(Ordering::Less | Ordering::Equal)
            ),
            Bound::Excluded(hi) => compare_values(value, &hi.as_value()) == Some(Ordering::Less),
            Bound::Unbounded => true,
        };

        // A fully unbounded range still only admits comparable values
        let comparable = !matches!(value, Value::Number(Number::F64(n)) if n.is_nan());

        above_start && below_end && comparable
    }
}

macro_rules! value_range_from {
    ($($t:ty),*) => {
        $(
            impl From<Range<$t>> for ValueRange {
                fn from(r: Range<$t>) -> Self {
                    ValueRange::new(Bound::Included(r.start.into()), Bound::Excluded(r.end.into()))
                }
            }

            impl From<RangeInclusive<$t>> for ValueRange {
                fn from(r: RangeInclusive<$t>) -> Self {
                    let (start, end) = r.into_inner();
                    ValueRange::new(Bound::Included(start.into()), Bound::Included(end.into()))
                }
            }

            impl From<RangeFrom<$t>> for ValueRange {
                fn from(r: RangeFrom<$t>) -> Self {
                    ValueRange::new(Bound::Included(r.start.into()), Bound::Unbounded)
                }
            }

            impl From<RangeTo<$t>> for ValueRange {
                fn from(r: RangeTo<$t>) -> Self {
                    ValueRange::new(Bound::Unbounded, Bound::Excluded(r.end.into()))
                }
            }

            impl From<RangeToInclusive<$t>> for ValueRange {
                fn from(r: RangeToInclusive<$t>) -> Self {
                    ValueRange::new(Bound::Unbounded, Bound::Included(r.end.into()))
                }
            }

            impl From<Range<$t>> for QueryValue {
                fn from(r: Range<$t>) -> Self {
                    QueryValue::Range(r.into())
                }
            }

            impl From<RangeInclusive<$t>> for QueryValue {
                fn from(r: RangeInclusive<$t>) -> Self {
                    QueryValue::Range(r.into())
                }
            }

            impl From<RangeFrom<$t>> for QueryValue {
                fn from(r: RangeFrom<$t>) -> Self {
                    QueryValue::Range(r.into())
                }
            }

            impl From<RangeTo<$t>> for QueryValue {
                fn from(r: RangeTo<$t>) -> Self {
                    QueryValue::Range(r.into())
                }
            }

            impl From<RangeToInclusive<$t>> for QueryValue {
                fn from(r: RangeToInclusive<$t>) -> Self {
                    QueryValue::Range(r.into())
                }
            }
        )*
    };
}

value_range_from!(i32, i64, u32, u64, usize, f64, Timestamp);

impl<'a> From<Range<&'a str>> for ValueRange {
    fn from(r: Range<&'a str>) -> Self {
        ValueRange::new(Bound::Included(r.start.into()), Bound::Excluded(r.end.into()))
    }
}

impl<'a> From<RangeInclusive<&'a str>> for ValueRange {
    fn from(r: RangeInclusive<&'a str>) -> Self {
        let (start, end) = r.into_inner();
        ValueRange::new(Bound::Included(start.into()), Bound::Included(end.into()))
    }
}

impl<'a> From<Range<&'a str>> for QueryValue {
    fn from(r: Range<&'a str>) -> Self {
        QueryValue::Range(r.into())
    }
}

impl<'a> From<RangeInclusive<&'a str>> for QueryValue {
    fn from(r: RangeInclusive<&'a str>) -> Self {
        QueryValue::Range(r.into())
    }
}

/// What a single field must satisfy.
#[derive(Debug, Clone)]
pub enum QueryValue {
    /// Equal to this literal.
    Exact(Literal),
    /// Textual form matched by this regex.
    Pattern(Regex),
    /// Accepted by this closure.
    Predicate(Predicate),
    /// Within these bounds.
    Range(ValueRange),
    /// Of this kind or a subtype.
    Kind(Kind),
}

impl QueryValue {
    /// Compiles `pattern` into a pattern query value.
    pub fn pattern(pattern: &str) -> Result<Self> {
        Ok(QueryValue::Pattern(Regex::new(pattern)?))
    }

    /// Wraps a closure as a predicate query value.
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&Value<'_>) -> bool + Send + Sync + 'static,
    {
        QueryValue::Predicate(Predicate::new(f))
    }

    /// Evaluates this query value against a field value.
    pub fn matches(&self, field_value: &Value<'_>) -> bool {
        Matcher::matches(self, field_value)
    }

    /// Name of the variant, for diagnostics.
    pub fn variant_name(&self) -> &'static str {
        match self {
            QueryValue::Exact(_) => "exact",
            QueryValue::Pattern(_) => "pattern",
            QueryValue::Predicate(_) => "predicate",
            QueryValue::Range(_) => "range",
            QueryValue::Kind(_) => "kind",
        }
    }
}

/// Evaluates query values against field values.
pub struct Matcher;

impl Matcher {
    /// Returns `true` if `field_value` satisfies `query_value`.
    pub fn matches(query_value: &QueryValue, field_value: &Value<'_>) -> bool {
        if field_value.is_none() {
            return false;
        }

        match query_value {
            QueryValue::Predicate(predicate) => predicate.call(field_value),
            QueryValue::Range(range) => range.contains(field_value),
            QueryValue::Pattern(regex) => regex.is_match(&field_value.to_string()),
            QueryValue::Kind(kind) => kind.accepts(field_value),
            QueryValue::Exact(literal) => Self::equals(literal, field_value),
        }
    }

    fn equals(literal: &Literal, field_value: &Value<'_>) -> bool {
        match (literal, field_value) {
            (Literal::String(a), Value::String(b)) => a == b,
            (Literal::Number(a), Value::Number(b)) => a == b,
            (Literal::Timestamp(a), Value::Timestamp(b)) => a == b,
            (Literal::Enum(a), Value::Enum(b)) => a == b,
            (Literal::Bool(a), Value::Bool(b)) => a == b,
            _ => false,
        }
    }
}

// Conversions into QueryValue

macro_rules! query_value_exact {
    ($($t:ty),*) => {
        $(
            impl From<$t> for QueryValue {
                fn from(value: $t) -> Self {
                    QueryValue::Exact(value.into())
                }
            }
        )*
    };
}

impl<'a> From<&'a str> for QueryValue {
    fn from(value: &'a str) -> Self {
        QueryValue::Exact(value.into())
    }
}

query_value_exact!(
    Literal, String, Number, Timestamp, bool, i8, i16, i32, i64, isize, u8, u16, u32, u64,
    usize, f32, f64
);

impl From<Regex> for QueryValue {
    fn from(regex: Regex) -> Self {
        QueryValue::Pattern(regex)
    }
}

impl From<Predicate> for QueryValue {
    fn from(predicate: Predicate) -> Self {
        QueryValue::Predicate(predicate)
    }
}

impl From<ValueRange> for QueryValue {
    fn from(range: ValueRange) -> Self {
        QueryValue::Range(range)
    }
}

impl From<Kind> for QueryValue {
    fn from(kind: Kind) -> Self {
        QueryValue::Kind(kind)
    }
}
