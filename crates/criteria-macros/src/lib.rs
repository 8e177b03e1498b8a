//! Derive macro for the `criteria` crate.
//!
//! - [`Record`] - Generate named-field read access and field name constants
//!
//! Most users enable the `derive` feature of `criteria` and use the re-export
//! instead of depending on this crate directly.

mod attrs;
mod derive;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives the `Record` trait for structs with named fields.
///
/// # Field Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `String` | String field, read as `Value::String` |
/// | `Number` | Numeric field, converted with `Number::from` |
/// | `Timestamp` | Timestamp field, requires `RecordTimestamp` |
/// | `Enum` | Enum field, requires `RecordEnum` |
/// | `Bool` | Boolean field |
/// | `ty = "..."` | Kind given as a string (`"enum"`, `"bool"`, ...) |
/// | `skip` | Exclude this field from queries |
/// | `rename = "..."` | Use a custom name for queries |
///
/// Fields without a `#[record(...)]` kind are not exposed.
///
/// # Generated Code
///
/// 1. Field name constants (e.g., `Person::NAME`, `Person::AGE`)
/// 2. `impl criteria::Record`
///
/// # Example
///
/// ```ignore
/// use criteria::{Queryable, Record};
///
/// #[derive(Record)]
/// struct Person {
///     #[record(String)]
///     name: String,
///
///     #[record(Number)]
///     age: u8,
///
///     #[record(skip)]
///     internal_id: u64,
/// }
///
/// let people = vec![
///     Person { name: "Matt".into(), age: 30, internal_id: 1 },
///     Person { name: "Mark".into(), age: 45, internal_id: 2 },
/// ];
///
/// let older = people.where_((Person::AGE, 40..)).to_vec();
/// assert_eq!(older[0].name, "Mark");
/// ```
#[proc_macro_derive(Record, attributes(record))]
pub fn record_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive::record_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
