//! # sqlfrag
//!
//! An incremental, fluent query-fragment builder: start from a base statement,
//! accumulate filter conditions, grouping, ordering, pagination, and
//! alternation (OR) branches across conditional code paths, then render one
//! statement string with safely escaped literals.
//!
//! ## Features
//!
//! - **Fluent accumulation**: every mutator returns the builder, so clauses
//!   compose across branches without hand-concatenating strings
//! - **Injection-safe literals**: values pass through a [`Sanitizer`] dialect
//!   adapter; templates use positional `?` or named `:key` placeholders
//! - **Recursive OR branches**: whole builders attach as alternation groups
//!   and flatten deterministically at render time
//! - **Pagination derivation**: `page`/`per` derive `LIMIT`/`OFFSET` in either
//!   call order
//! - **No execution**: pure text output; drivers, pools, and transactions are
//!   someone else's job
//!
//! ```ignore
//! use sqlfrag::QueryBuilder;
//!
//! let sql = QueryBuilder::new("SELECT * FROM users")
//!     .filter("name = ?", vec!["hello world".into()])?
//!     .filter("status != ?", vec![1.into()])?
//!     .order("created_at desc")?
//!     .page(1)
//!     .per(20)
//!     .to_sql();
//! ```

pub mod branch;
pub mod builder;
pub mod error;
pub mod sanitize;
pub mod value;

pub use branch::Branch;
pub use builder::QueryBuilder;
pub use error::{QueryError, QueryResult};
pub use sanitize::{AnsiQuoting, SanitizeError, Sanitizer};
pub use value::Value;

/// Create a [`QueryBuilder`] over a base statement.
///
/// # Example
/// ```ignore
/// let q = sqlfrag::builder("select * from users").filter("id = ?", vec![1.into()])?;
/// ```
pub fn builder(base: impl Into<String>) -> QueryBuilder {
    QueryBuilder::new(base)
}
