//! # litedb
//!
//! A lightweight SQLite-only query builder and CRUD layer for Rust.
//!
//! ## Features
//!
//! - **Fluent statements**: chain `select` / `and_where` / `order_by` /
//!   `limit` and finish with a terminal call (`get`, `get_single`,
//!   `insert`, `update`, `delete`, `count`)
//! - **Safe bindings**: every condition binds a uniquely named
//!   `:placeholder`; IN lists are escaped literals
//! - **Nested predicates**: parenthesized sub-predicates built by closures
//! - **Value semantics**: terminal calls consume the builder, so no
//!   statement can inherit state from the previous one
//! - **Explicit connection**: the driver is constructed once and passed
//!   where needed; there is no global instance
//! - **CRUD layer**: `Entity` + `Repository` for table-backed types
//! - **Validation** (feature `validate`): rule strings
//!   (`"required|min[3]|email"`) with localized messages
//!
//! ```ignore
//! use litedb::{Driver, Order, SqliteDriver};
//!
//! let db = SqliteDriver::open("app.db")?;
//!
//! let rows = db
//!     .query_builder()
//!     .and_where("status", "=", "active")
//!     .order_by("id", Order::Desc)
//!     .limit(10)
//!     .get("users")?;
//!
//! db.query_builder()
//!     .insert("users", &[("name", "Ann".into()), ("age", 30.into())])?;
//! ```

pub mod crud;
pub mod driver;
pub mod error;
pub mod qb;
#[cfg(feature = "validate")]
pub mod validate;
pub mod value;

pub use crud::{Entity, Repository};
pub use driver::{Driver, ResultSet, SqliteDriver};
pub use error::{DbError, DbResult};
pub use qb::{Binding, BindingList, JoinKind, Order, QueryBuilder};
#[cfg(feature = "validate")]
pub use validate::{FieldRules, Validator};
pub use value::Value;
