//! Execution driver: the collaborator owning the live SQLite connection.

use std::path::Path;

use rusqlite::Connection;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::qb::{Binding, QueryBuilder};
use crate::value::Value;

/// Executes finished statements on behalf of a query builder.
///
/// Named placeholders use the SQLite `:name` syntax. The driver owns the
/// one live connection and assumes at most one statement is prepared and
/// executed at a time.
pub trait Driver {
    /// Prepare `sql`, bind every named placeholder, execute, and return the
    /// materialized result. A binding whose name does not appear in the
    /// statement is an error.
    fn execute(&self, sql: &str, bindings: &[Binding]) -> DbResult<ResultSet>;

    /// Obtain a fresh builder bound to this driver.
    fn query_builder(&self) -> QueryBuilder<'_>
    where
        Self: Sized,
    {
        QueryBuilder::new(self)
    }
}

/// Materialized outcome of one statement.
///
/// SELECT-like statements fill the columns and rows; mutations report the
/// number of affected rows and the last inserted rowid.
#[derive(Clone, Debug, Default)]
pub struct ResultSet {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
    changes: usize,
    last_insert_rowid: i64,
}

impl ResultSet {
    /// Column names, in statement order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All rows.
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First row, if any.
    pub fn first(&self) -> Option<&[Value]> {
        self.rows.first().map(Vec::as_slice)
    }

    /// Value at `(row, column name)`.
    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.columns.iter().position(|c| c == column)?;
        self.rows.get(row)?.get(idx)
    }

    /// Rows affected by a mutation.
    pub fn changes(&self) -> usize {
        self.changes
    }

    /// Rowid of the most recent successful INSERT on the connection.
    pub fn last_insert_rowid(&self) -> i64 {
        self.last_insert_rowid
    }
}

/// SQLite driver over an explicitly constructed connection.
///
/// Open once at startup, pass by reference wherever statements are built,
/// drop at shutdown. There is deliberately no global instance.
pub struct SqliteDriver {
    conn: Connection,
}

impl SqliteDriver {
    /// Open (or create) a database file.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let path = path.as_ref();
        let conn =
            Connection::open(path).map_err(|e| DbError::Connection(e.to_string()))?;
        info!(path = %path.display(), "opened sqlite database");
        Ok(SqliteDriver { conn })
    }

    /// Open an in-memory database.
    pub fn open_in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::Connection(e.to_string()))?;
        Ok(SqliteDriver { conn })
    }

    /// Run a raw batch of SQL (DDL, PRAGMA).
    pub fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.conn.execute_batch(sql)?;
        Ok(())
    }

    /// Begin a transaction. Not atomic with [`SqliteDriver::commit`]: the
    /// caller pairs the two and issues a rollback on failure if wanted.
    pub fn begin(&self) -> DbResult<()> {
        debug!("BEGIN");
        self.conn.execute_batch("BEGIN;")?;
        Ok(())
    }

    /// Commit the open transaction.
    pub fn commit(&self) -> DbResult<()> {
        debug!("COMMIT");
        self.conn.execute_batch("COMMIT;")?;
        Ok(())
    }

    /// Roll back the open transaction.
    pub fn rollback(&self) -> DbResult<()> {
        debug!("ROLLBACK");
        self.conn.execute_batch("ROLLBACK;")?;
        Ok(())
    }
}

impl Driver for SqliteDriver {
    fn execute(&self, sql: &str, bindings: &[Binding]) -> DbResult<ResultSet> {
        debug!(sql, bindings = bindings.len(), "executing statement");
        let mut stmt = self.conn.prepare(sql)?;
        for binding in bindings {
            let index = stmt
                .parameter_index(&binding.name)?
                .ok_or_else(|| DbError::Binding(binding.name.clone()))?;
            stmt.raw_bind_parameter(index, &binding.value)?;
        }

        if stmt.column_count() == 0 {
            let changes = stmt.raw_execute()?;
            return Ok(ResultSet {
                changes,
                last_insert_rowid: self.conn.last_insert_rowid(),
                ..ResultSet::default()
            });
        }

        let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
        let mut rows = Vec::new();
        let mut raw = stmt.raw_query();
        while let Some(row) = raw.next()? {
            let mut cells = Vec::with_capacity(columns.len());
            for i in 0..columns.len() {
                let cell: rusqlite::types::Value = row.get(i)?;
                cells.push(Value::from(cell));
            }
            rows.push(cells);
        }
        Ok(ResultSet {
            columns,
            rows,
            changes: 0,
            last_insert_rowid: self.conn.last_insert_rowid(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qb::Order;

    fn memory_db() -> SqliteDriver {
        let db = SqliteDriver::open_in_memory().unwrap();
        db.execute_batch(
            "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT NOT NULL, age INTEGER);",
        )
        .unwrap();
        db
    }

    fn seed(db: &SqliteDriver, name: &str, age: i64) {
        db.query_builder()
            .insert("users", &[("name", name.into()), ("age", age.into())])
            .unwrap();
    }

    #[test]
    fn test_insert_reports_changes_and_rowid() {
        let db = memory_db();
        let result = db
            .query_builder()
            .insert("users", &[("name", "Ann".into()), ("age", 30.into())])
            .unwrap();
        assert_eq!(result.changes(), 1);
        assert_eq!(result.last_insert_rowid(), 1);
    }

    #[test]
    fn test_select_round_trip() {
        let db = memory_db();
        seed(&db, "Ann", 30);
        seed(&db, "Bob", 41);

        let rows = db
            .query_builder()
            .and_where("age", ">", 35)
            .get("users")
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows.value(0, "name"), Some(&Value::Text("Bob".into())));
        assert_eq!(rows.value(0, "age"), Some(&Value::Integer(41)));
    }

    #[test]
    fn test_like_and_order() {
        let db = memory_db();
        seed(&db, "Ann", 30);
        seed(&db, "Anna", 25);
        seed(&db, "Bob", 41);

        let rows = db
            .query_builder()
            .and_where("name", "LIKE", "Ann%")
            .order_by("age", Order::Asc)
            .get("users")
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows.value(0, "name"), Some(&Value::Text("Anna".into())));
    }

    #[test]
    fn test_count_respects_where() {
        let db = memory_db();
        seed(&db, "Ann", 30);
        seed(&db, "Bob", 41);

        let result = db
            .query_builder()
            .and_where("age", "<", 40)
            .count("users")
            .unwrap();
        assert_eq!(result.value(0, "count"), Some(&Value::Integer(1)));
    }

    #[test]
    fn test_update_and_delete_changes() {
        let db = memory_db();
        seed(&db, "Ann", 30);
        seed(&db, "Bob", 41);

        let updated = db
            .query_builder()
            .and_where_eq("name", "Ann")
            .update("users", &[("age", 31.into())])
            .unwrap();
        assert_eq!(updated.changes(), 1);

        let deleted = db.query_builder().delete("users").unwrap();
        assert_eq!(deleted.changes(), 2);
    }

    #[test]
    fn test_orphan_binding_is_an_error() {
        let db = memory_db();
        let err = db
            .execute(
                "SELECT * FROM users WHERE id = :id",
                &[Binding {
                    name: ":nope".to_string(),
                    value: Value::Integer(1),
                }],
            )
            .unwrap_err();
        assert!(matches!(err, DbError::Binding(name) if name == ":nope"));
    }

    #[test]
    fn test_driver_error_propagates() {
        let db = memory_db();
        let err = db.query_builder().get("no_such_table").unwrap_err();
        assert!(matches!(err, DbError::Query(_)));
    }

    #[test]
    fn test_transaction_commit_and_rollback() {
        let db = memory_db();

        db.begin().unwrap();
        seed(&db, "Ann", 30);
        db.rollback().unwrap();
        let count = db.query_builder().count("users").unwrap();
        assert_eq!(count.value(0, "count"), Some(&Value::Integer(0)));

        db.begin().unwrap();
        seed(&db, "Ann", 30);
        db.commit().unwrap();
        let count = db.query_builder().count("users").unwrap();
        assert_eq!(count.value(0, "count"), Some(&Value::Integer(1)));
    }

    #[test]
    fn test_contradictory_group_and_flat_matches_nothing() {
        let db = memory_db();
        seed(&db, "Ann", 30);

        // Both conditions target the same column; the placeholders must stay
        // distinct or the second binding silently overwrites the first.
        let rows = db
            .query_builder()
            .and_where_group(|q| q.and_where_eq("age", 31))
            .and_where_eq("age", 30)
            .get("users")
            .unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_null_round_trip() {
        let db = memory_db();
        db.query_builder()
            .insert("users", &[("name", "Ann".into()), ("age", Value::Null)])
            .unwrap();
        let rows = db.query_builder().get("users").unwrap();
        assert_eq!(rows.value(0, "age"), Some(&Value::Null));
    }
}
