//! The clause accumulator and serializer.

use crate::branch::{Branch, flatten};
use crate::error::{QueryError, QueryResult};
use crate::sanitize::{AnsiQuoting, Sanitizer};
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_PER_PAGE: i64 = 10;

/// Fluent accumulator for query fragments.
///
/// A builder is constructed once per logical query with an opaque base
/// statement, mutated through a chain of calls, and rendered with
/// [`QueryBuilder::to_sql`]. The base text is never parsed, only prefixed to
/// the output. Fallible mutators sanitize their input immediately, so
/// rendering itself is infallible and pure.
///
/// ```ignore
/// use sqlfrag::QueryBuilder;
///
/// let sql = QueryBuilder::new("select * from users")
///     .filter("name = ?", vec!["hello world".into()])?
///     .filter("status != ?", vec![1.into()])?
///     .order("created_at desc")?
///     .page(2)
///     .per(20)
///     .to_sql();
/// ```
#[derive(Clone)]
pub struct QueryBuilder {
    base: String,
    sanitizer: Arc<dyn Sanitizer + Send + Sync>,
    conditions: Vec<String>,
    orders: Vec<String>,
    groups: Vec<String>,
    havings: Vec<String>,
    branches: Vec<Branch>,
    page: Option<i64>,
    per_page: Option<i64>,
    limit: Option<i64>,
    offset: Option<i64>,
}

impl QueryBuilder {
    /// Create a builder over a base statement, quoting literals ANSI-style.
    pub fn new(base: impl Into<String>) -> Self {
        Self::with_sanitizer(base, Arc::new(AnsiQuoting))
    }

    /// Create a builder with an injected dialect adapter.
    pub fn with_sanitizer(
        base: impl Into<String>,
        sanitizer: Arc<dyn Sanitizer + Send + Sync>,
    ) -> Self {
        Self {
            base: base.into(),
            sanitizer,
            conditions: Vec::new(),
            orders: Vec::new(),
            groups: Vec::new(),
            havings: Vec::new(),
            branches: Vec::new(),
            page: None,
            per_page: None,
            limit: None,
            offset: None,
        }
    }

    // ==================== WHERE conditions ====================

    /// Add an AND-ed condition from a template with positional `?` placeholders.
    pub fn filter(mut self, template: &str, values: Vec<Value>) -> QueryResult<Self> {
        let fragment = self.sanitizer.sanitize(template, &values)?;
        self.conditions.push(fragment);
        Ok(self)
    }

    /// Add an AND-ed condition from a template with named `:key` placeholders.
    pub fn filter_named(mut self, template: &str, values: &[(&str, Value)]) -> QueryResult<Self> {
        let fragment = self.sanitizer.sanitize_named(template, values)?;
        self.conditions.push(fragment);
        Ok(self)
    }

    /// Add an AND-ed equality conjunction from bare key/value pairs:
    /// `key = value AND key2 = value2`, in the given order.
    pub fn filter_pairs(mut self, pairs: &[(&str, Value)]) -> QueryResult<Self> {
        if pairs.is_empty() {
            return Err(QueryError::invalid_argument(
                "empty pair list has no predicate",
            ));
        }
        let fragment = self.sanitizer.sanitize_pairs(pairs)?;
        self.conditions.push(fragment);
        Ok(self)
    }

    /// Replace this builder's conditions with `other`'s.
    ///
    /// This is a replace, not a merge: any conditions already accumulated on
    /// the receiver are discarded. Call it before adding local conditions.
    /// Intended for deriving a count query from a filtered query.
    pub fn filter_query(mut self, other: &QueryBuilder) -> Self {
        self.conditions = other.conditions.clone();
        self
    }

    // ==================== OR branches ====================

    /// Attach `other`'s accumulated state as alternation branches.
    ///
    /// Appends, per call and in this order: a nested alternation wrapping
    /// `other`'s own branches if it has any, then an AND-group wrapping
    /// `other`'s flat conditions if it has any.
    pub fn or(mut self, other: QueryBuilder) -> Self {
        if !other.branches.is_empty() {
            self.branches.push(Branch::Any(other.branches));
        }
        if !other.conditions.is_empty() {
            self.branches.push(Branch::All(other.conditions));
        }
        self
    }

    // ==================== Ordering & grouping ====================

    /// Add a verified "column [asc|desc]" ordering expression.
    pub fn order(mut self, expression: &str) -> QueryResult<Self> {
        let fragment = self.sanitizer.sanitize_order(expression)?;
        self.orders.push(fragment);
        Ok(self)
    }

    /// Add one grouping expression. Duplicates collapse to first occurrence.
    pub fn group(self, expression: impl Into<String>) -> Self {
        self.group_all([expression.into()])
    }

    /// Add a sequence of grouping expressions, deduplicated by value while
    /// preserving first-seen order.
    pub fn group_all<I, S>(mut self, expressions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for expression in expressions {
            let expression = expression.into();
            if !self.groups.contains(&expression) {
                self.groups.push(expression);
            }
        }
        self
    }

    // ==================== HAVING conditions ====================

    /// Add a HAVING condition from a template with positional `?` placeholders.
    pub fn having(mut self, template: &str, values: Vec<Value>) -> QueryResult<Self> {
        let fragment = self.sanitizer.sanitize(template, &values)?;
        self.havings.push(fragment);
        Ok(self)
    }

    /// Add a HAVING condition from a template with named `:key` placeholders.
    pub fn having_named(mut self, template: &str, values: &[(&str, Value)]) -> QueryResult<Self> {
        let fragment = self.sanitizer.sanitize_named(template, values)?;
        self.havings.push(fragment);
        Ok(self)
    }

    /// Add a HAVING equality conjunction from bare key/value pairs.
    pub fn having_pairs(mut self, pairs: &[(&str, Value)]) -> QueryResult<Self> {
        if pairs.is_empty() {
            return Err(QueryError::invalid_argument(
                "empty pair list has no predicate",
            ));
        }
        let fragment = self.sanitizer.sanitize_pairs(pairs)?;
        self.havings.push(fragment);
        Ok(self)
    }

    // ==================== Pagination ====================

    /// Set LIMIT. A never-set offset defaults to 0 so `OFFSET 0` is emitted.
    pub fn limit(mut self, n: i64) -> Self {
        if self.offset.is_none() {
            self.offset = Some(0);
        }
        self.limit = Some(n);
        self
    }

    /// Set OFFSET. Does not touch the limit; OFFSET is only emitted once a
    /// limit exists.
    pub fn offset(mut self, n: i64) -> Self {
        self.offset = Some(n);
        self
    }

    /// Set the page (1-based) and derive `limit`/`offset` from the current
    /// per-page size (default 10).
    pub fn page(mut self, n: i64) -> Self {
        self.page = Some(n);
        self.derive_pagination();
        self
    }

    /// Set the per-page size and re-derive `limit`/`offset` from the last-set
    /// page (default 1). `page` and `per` commute.
    pub fn per(mut self, n: i64) -> Self {
        self.per_page = Some(n);
        self.derive_pagination();
        self
    }

    fn derive_pagination(&mut self) {
        let page = self.page.unwrap_or(DEFAULT_PAGE);
        let per_page = self.per_page.unwrap_or(DEFAULT_PER_PAGE);
        self.offset = Some(per_page * (page - 1));
        self.limit = Some(per_page);
    }

    // ==================== Accessors ====================

    /// The base statement text.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Accumulated WHERE fragments, in insertion order.
    pub fn conditions(&self) -> &[String] {
        &self.conditions
    }

    /// Accumulated ordering fragments.
    pub fn orders(&self) -> &[String] {
        &self.orders
    }

    /// Accumulated grouping expressions, deduplicated.
    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    /// Accumulated HAVING fragments.
    pub fn havings(&self) -> &[String] {
        &self.havings
    }

    /// Attached alternation branches.
    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    // ==================== Serialization ====================

    /// Render the final statement.
    ///
    /// Emission order is fixed: base, WHERE, flattened OR lines, ORDER BY,
    /// GROUP BY, HAVING, LIMIT, OFFSET. Absent clauses are omitted entirely
    /// and present parts are joined with single spaces. OR lines sit directly
    /// after WHERE (and are emitted even when there are no flat conditions);
    /// existing callers depend on that exact textual order.
    pub fn to_sql(&self) -> String {
        let mut parts: Vec<String> = vec![self.base.clone()];

        if !self.conditions.is_empty() {
            parts.push(format!("WHERE {}", self.conditions.join(" AND ")));
        }
        parts.extend(flatten(&self.branches));
        if !self.orders.is_empty() {
            parts.push(format!("ORDER BY {}", self.orders.join(", ")));
        }
        if !self.groups.is_empty() {
            parts.push(format!("GROUP BY {}", self.groups.join(", ")));
        }
        if !self.havings.is_empty() {
            parts.push(format!("HAVING {}", self.havings.join(" AND ")));
        }
        if let Some(limit) = self.limit {
            parts.push(format!("LIMIT {limit}"));
            if let Some(offset) = self.offset {
                parts.push(format!("OFFSET {offset}"));
            }
        }

        let sql = parts.join(" ");

        #[cfg(feature = "tracing")]
        tracing::debug!(
            len = sql.len(),
            conditions = self.conditions.len(),
            branches = self.branches.len(),
            "rendered query"
        );

        sql
    }
}

impl fmt::Display for QueryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}

impl fmt::Debug for QueryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryBuilder")
            .field("base", &self.base)
            .field("conditions", &self.conditions)
            .field("orders", &self.orders)
            .field("groups", &self.groups)
            .field("havings", &self.havings)
            .field("branches", &self.branches)
            .field("page", &self.page)
            .field("per_page", &self.per_page)
            .field("limit", &self.limit)
            .field("offset", &self.offset)
            .finish_non_exhaustive()
    }
}
