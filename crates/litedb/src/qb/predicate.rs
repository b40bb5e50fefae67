//! WHERE-clause assembly: flat conditions, IN lists, and nested groups.
//!
//! Each condition becomes one fragment carrying its own embedded
//! conjunction (`" AND "` / `" OR "`, empty for the first fragment of a
//! cycle); the final WHERE body is the fragments joined with a single
//! space, so ordering alone determines precedence.
//!
//! Placeholder suffixes come from a statement-wide counter threaded
//! through nested builders, so names stay pairwise distinct even when the
//! same column appears at several nesting depths.

use super::QueryBuilder;
use crate::value::Value;

/// Operators accepted by [`QueryBuilder::and_where`] and friends. Anything
/// else falls back to an equality comparison (see `and_where`).
pub const ALLOWED_OPERATORS: [&str; 9] = [
    "=", ">", "<", ">=", "<=", "LIKE", "NOT LIKE", "IN", "NOT IN",
];

/// Conjunction joining a fragment to the one before it. The surrounding
/// spaces are part of the fragment text itself.
#[derive(Clone, Copy)]
enum Conjunction {
    And,
    Or,
}

impl Conjunction {
    fn sql(self) -> &'static str {
        match self {
            Conjunction::And => " AND ",
            Conjunction::Or => " OR ",
        }
    }
}

impl<'d> QueryBuilder<'d> {
    /// Add an AND condition: `column operator :placeholder`.
    ///
    /// An operator outside [`ALLOWED_OPERATORS`] falls back to an equality
    /// comparison that binds the operator text itself as the value and
    /// discards `value` (a quirk kept from the original engine), unless
    /// [`QueryBuilder::strict_operators`] is set.
    ///
    /// For `IN`/`NOT IN` the right-hand side is emitted verbatim instead of
    /// bound; use [`QueryBuilder::where_in`] / [`QueryBuilder::where_not_in`]
    /// to get escaping.
    pub fn and_where(self, column: &str, operator: &str, value: impl Into<Value>) -> Self {
        self.push_condition(column, operator, value.into(), Conjunction::And)
    }

    /// Add an OR condition: `column operator :placeholder`.
    pub fn or_where(self, column: &str, operator: &str, value: impl Into<Value>) -> Self {
        self.push_condition(column, operator, value.into(), Conjunction::Or)
    }

    /// Two-argument equality shorthand for [`QueryBuilder::and_where`].
    pub fn and_where_eq(self, column: &str, value: impl Into<Value>) -> Self {
        self.push_condition(column, "=", value.into(), Conjunction::And)
    }

    /// Two-argument equality shorthand for [`QueryBuilder::or_where`].
    pub fn or_where_eq(self, column: &str, value: impl Into<Value>) -> Self {
        self.push_condition(column, "=", value.into(), Conjunction::Or)
    }

    /// Open a parenthesized sub-predicate joined with AND. The closure
    /// receives a fresh nested builder; its fragments are concatenated
    /// as-is (they keep their embedded conjunctions with no re-joining,
    /// a quirk kept from the original engine) and its bindings merge into
    /// this builder.
    pub fn and_where_group<F>(self, build: F) -> Self
    where
        F: FnOnce(QueryBuilder<'d>) -> QueryBuilder<'d>,
    {
        self.push_group(build, Conjunction::And)
    }

    /// Open a parenthesized sub-predicate joined with OR.
    pub fn or_where_group<F>(self, build: F) -> Self
    where
        F: FnOnce(QueryBuilder<'d>) -> QueryBuilder<'d>,
    {
        self.push_group(build, Conjunction::Or)
    }

    /// `column IN (..)` with every value escaped into the literal list.
    /// The list is never bound: drivers reject binding a variable-length
    /// list to one placeholder.
    pub fn where_in<T: Into<Value>>(
        self,
        column: &str,
        values: impl IntoIterator<Item = T>,
    ) -> Self {
        let list = literal_list(values);
        self.push_raw(column, "IN", list, Conjunction::And)
    }

    /// `column NOT IN (..)` with every value escaped into the literal list.
    pub fn where_not_in<T: Into<Value>>(
        self,
        column: &str,
        values: impl IntoIterator<Item = T>,
    ) -> Self {
        let list = literal_list(values);
        self.push_raw(column, "NOT IN", list, Conjunction::And)
    }

    fn push_condition(
        mut self,
        column: &str,
        operator: &str,
        value: Value,
        conjunction: Conjunction,
    ) -> Self {
        if !is_allowed(operator) {
            if self.strict_ops {
                if self.op_error.is_none() {
                    self.op_error = Some(operator.to_string());
                }
                return self;
            }
            // Invalid operator: compare the operator text itself with `=`,
            // discarding `value`, exactly as the original engine recurses.
            return self.push_condition(
                column,
                "=",
                Value::Text(operator.to_string()),
                conjunction,
            );
        }

        if operator == "IN" || operator == "NOT IN" {
            // Text goes in verbatim (caller pre-escapes); other values are
            // rendered as literals.
            let rhs = match value {
                Value::Text(s) => s,
                other => other.sqlite_literal(),
            };
            return self.push_raw(column, operator, rhs, conjunction);
        }

        let conjunction = self.next_conjunction(conjunction);
        let name = format!(":{}{}", column.replace('.', ""), self.binder);
        self.binder += 1;
        self.wheres
            .push(format!("{conjunction}{column} {operator} {name}"));
        self.bindings.push(name, value);
        self
    }

    fn push_raw(
        mut self,
        column: &str,
        operator: &str,
        rhs: String,
        conjunction: Conjunction,
    ) -> Self {
        let conjunction = self.next_conjunction(conjunction);
        self.wheres
            .push(format!("{conjunction}{column} {operator} {rhs}"));
        self
    }

    fn push_group<F>(mut self, build: F, conjunction: Conjunction) -> Self
    where
        F: FnOnce(QueryBuilder<'d>) -> QueryBuilder<'d>,
    {
        let conjunction = self.next_conjunction(conjunction);
        let mut nested = QueryBuilder::new(self.driver);
        nested.strict_ops = self.strict_ops;
        nested.binder = self.binder;
        let nested = build(nested);
        self.binder = nested.binder;
        self.wheres
            .push(format!("{conjunction}( {} )", nested.wheres.concat()));
        self.bindings.extend(nested.bindings);
        if self.op_error.is_none() {
            self.op_error = nested.op_error;
        }
        self
    }

    /// The first fragment of a cycle carries no conjunction.
    fn next_conjunction(&self, conjunction: Conjunction) -> &'static str {
        if self.wheres.is_empty() {
            ""
        } else {
            conjunction.sql()
        }
    }

}

fn is_allowed(operator: &str) -> bool {
    ALLOWED_OPERATORS.contains(&operator)
}

fn literal_list<T: Into<Value>>(values: impl IntoIterator<Item = T>) -> String {
    let rendered: Vec<String> = values
        .into_iter()
        .map(|value| value.into().sqlite_literal())
        .collect();
    format!("({})", rendered.join(","))
}
