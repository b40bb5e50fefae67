//! Fluent query builder for SQLite statements.
//!
//! One [`QueryBuilder`] assembles exactly one statement. Fluent calls take
//! and return the builder by value; a terminal call (`get`, `get_single`,
//! `insert`, `update`, `delete`, `count`) renders the statement, hands it to
//! the driver together with the accumulated bindings, and consumes the
//! builder. A new build cycle always starts from a fresh builder obtained
//! via [`crate::Driver::query_builder`], so no statement can inherit state
//! from the previous one.
//!
//! ```ignore
//! let rows = db
//!     .query_builder()
//!     .select("id, name")
//!     .and_where("status", "=", "active")
//!     .order_by("id", Order::Desc)
//!     .limit(10)
//!     .get("users")?;
//! ```

mod bindings;
mod predicate;

pub use bindings::{Binding, BindingList};
pub use predicate::ALLOWED_OPERATORS;

use crate::driver::{Driver, ResultSet};
use crate::error::{DbError, DbResult};
use crate::value::Value;

/// Marker substituted with the table name at terminal time.
const TABLE_MARK: &str = "{{table}}";

/// Join flavors supported by [`QueryBuilder::join`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    LeftOuter,
    Cross,
}

impl JoinKind {
    fn sql(self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER",
            JoinKind::LeftOuter => "LEFT OUTER",
            JoinKind::Cross => "CROSS",
        }
    }
}

/// Sort direction for [`QueryBuilder::order_by`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

impl Order {
    fn sql(self) -> &'static str {
        match self {
            Order::Asc => "ASC",
            Order::Desc => "DESC",
        }
    }
}

/// Single-statement query builder bound to an execution driver.
pub struct QueryBuilder<'d> {
    driver: &'d dyn Driver,
    query: String,
    wheres: Vec<String>,
    bindings: BindingList,
    orderings: Vec<String>,
    joins: Vec<String>,
    limit: Option<u32>,
    binder: usize,
    strict_ops: bool,
    op_error: Option<String>,
}

impl<'d> QueryBuilder<'d> {
    /// Create a builder bound to a driver.
    pub fn new(driver: &'d dyn Driver) -> Self {
        QueryBuilder {
            driver,
            query: String::new(),
            wheres: Vec::new(),
            bindings: BindingList::new(),
            orderings: Vec::new(),
            joins: Vec::new(),
            limit: None,
            binder: 0,
            strict_ops: false,
            op_error: None,
        }
    }

    /// Reject operators outside the allowed set instead of falling back to
    /// an equality comparison. The rejection surfaces as
    /// [`DbError::Operator`] at the terminal call.
    pub fn strict_operators(mut self) -> Self {
        self.strict_ops = true;
        self
    }

    /// Seed `SELECT columns FROM {{table}}`; the table name is supplied by
    /// the terminal call. A bare `get` without `select` behaves like
    /// `select("*")`.
    pub fn select(mut self, columns: &str) -> Self {
        self.query = format!("SELECT {columns} FROM {TABLE_MARK}");
        self
    }

    /// Append an ordering key. Repeated calls compose a multi-key ORDER BY
    /// in call order.
    pub fn order_by(mut self, column: &str, direction: Order) -> Self {
        self.orderings.push(format!("{column} {}", direction.sql()));
        self
    }

    /// Set the LIMIT. Only one limit is supported; the last write wins.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Append a join. Joins render in call order, before the WHERE clause.
    /// An empty condition omits the ON part (CROSS joins).
    pub fn join(mut self, table: &str, condition: &str, kind: JoinKind) -> Self {
        if condition.is_empty() {
            self.joins.push(format!("{} JOIN {table}", kind.sql()));
        } else {
            self.joins
                .push(format!("{} JOIN {table} ON {condition}", kind.sql()));
        }
        self
    }

    /// Append an INNER JOIN.
    pub fn inner_join(self, table: &str, condition: &str) -> Self {
        self.join(table, condition, JoinKind::Inner)
    }

    /// Append a LEFT OUTER JOIN.
    pub fn left_join(self, table: &str, condition: &str) -> Self {
        self.join(table, condition, JoinKind::LeftOuter)
    }

    /// Append a CROSS JOIN.
    pub fn cross_join(self, table: &str) -> Self {
        self.join(table, "", JoinKind::Cross)
    }

    // ==================== Terminal operations ====================

    /// Execute a SELECT against `table` and return the rows.
    pub fn get(mut self, table: &str) -> DbResult<ResultSet> {
        if self.query.is_empty() {
            self = self.select("*");
        }
        self.query = self.query.replace(TABLE_MARK, table);
        self.run()
    }

    /// Execute a SELECT with the limit forced to one row.
    pub fn get_single(self, table: &str) -> DbResult<ResultSet> {
        self.limit(1).get(table)
    }

    /// Insert one row. Column order follows `data`; every value is bound
    /// to a `:column` placeholder.
    pub fn insert(mut self, table: &str, data: &[(&str, Value)]) -> DbResult<ResultSet> {
        let columns: Vec<&str> = data.iter().map(|(key, _)| *key).collect();
        let params: Vec<String> = columns.iter().map(|key| placeholder(key)).collect();
        self.query = format!(
            "INSERT INTO {table} ({}) VALUES ({})",
            columns.join(","),
            params.join(",")
        );
        for (key, value) in data {
            self.bindings.push(placeholder(key), value.clone());
        }
        self.run()
    }

    /// Update rows matching the accumulated WHERE clause.
    pub fn update(mut self, table: &str, data: &[(&str, Value)]) -> DbResult<ResultSet> {
        let assignments: Vec<String> = data
            .iter()
            .map(|(key, _)| format!("{key} = {}", placeholder(key)))
            .collect();
        self.query = format!("UPDATE {table} SET {}", assignments.join(","));
        for (key, value) in data {
            self.bindings.push(placeholder(key), value.clone());
        }
        self.run()
    }

    /// Delete rows matching the accumulated WHERE clause.
    pub fn delete(mut self, table: &str) -> DbResult<ResultSet> {
        self.query = format!("DELETE FROM {table}");
        self.run()
    }

    /// Count rows matching the accumulated joins and WHERE clause. The
    /// count is returned under the column name `count`.
    pub fn count(mut self, table: &str) -> DbResult<ResultSet> {
        self.query = format!("SELECT COUNT(*) as count FROM {table}");
        self.run()
    }

    /// Render the statement text from the current state without mutating
    /// it: query skeleton, then joins, WHERE, ORDER BY, LIMIT. Calling it
    /// twice with no intervening fluent call yields identical text.
    pub fn to_sql(&self) -> String {
        let mut sql = self.query.clone();
        for join in &self.joins {
            sql.push(' ');
            sql.push_str(join);
        }
        if !self.wheres.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.wheres.join(" "));
        }
        if !self.orderings.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&self.orderings.join(","));
        }
        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }
        sql
    }

    fn run(mut self) -> DbResult<ResultSet> {
        if let Some(op) = self.op_error.take() {
            return Err(DbError::Operator(op));
        }
        let sql = self.to_sql();
        let bindings = self.bindings.drain();
        self.driver.execute(&sql, &bindings)
    }
}

/// `:column` placeholder with dots stripped, matching the binding store.
fn placeholder(column: &str) -> String {
    format!(":{}", column.replace('.', ""))
}
