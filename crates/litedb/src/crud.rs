//! Entity-oriented convenience layer over the query builder.

use std::marker::PhantomData;

use crate::driver::{Driver, ResultSet};
use crate::error::DbResult;
use crate::qb::QueryBuilder;
use crate::value::Value;

#[cfg(feature = "validate")]
use crate::error::DbError;
#[cfg(feature = "validate")]
use crate::validate::{FieldRules, Validator};

/// A table-backed entity: the two facts the CRUD layer needs, plus
/// optional create-time validation rules.
pub trait Entity {
    fn table_name() -> &'static str;

    fn primary_key() -> &'static str;

    /// Rules applied by [`Repository::create`]. Empty by default.
    #[cfg(feature = "validate")]
    fn rules() -> Vec<(&'static str, FieldRules)> {
        Vec::new()
    }
}

/// CRUD operations for one entity over an injected driver.
pub struct Repository<'d, E: Entity> {
    driver: &'d dyn Driver,
    _entity: PhantomData<E>,
}

impl<'d, E: Entity> Repository<'d, E> {
    pub fn new(driver: &'d dyn Driver) -> Self {
        Repository {
            driver,
            _entity: PhantomData,
        }
    }

    fn builder(&self) -> QueryBuilder<'d> {
        QueryBuilder::new(self.driver)
    }

    /// Insert a row. With the `validate` feature and non-empty rules, the
    /// data is validated first and a failure never reaches the database.
    pub fn create(&self, data: &[(&str, Value)]) -> DbResult<ResultSet> {
        #[cfg(feature = "validate")]
        {
            let rules = E::rules();
            if !rules.is_empty() {
                let mut validator = Validator::new();
                if !validator.validate(&rules, data) {
                    return Err(DbError::validation(
                        std::any::type_name::<E>(),
                        validator.into_errors(),
                    ));
                }
            }
        }
        self.builder().insert(E::table_name(), data)
    }

    /// Fetch every row of the entity's table.
    pub fn read(&self) -> DbResult<ResultSet> {
        self.builder().get(E::table_name())
    }

    /// Fetch the row with the given primary key, limited to one.
    pub fn read_one(&self, id: impl Into<Value>) -> DbResult<ResultSet> {
        self.builder()
            .and_where_eq(E::primary_key(), id)
            .get_single(E::table_name())
    }

    /// Update the row with the given primary key.
    pub fn update(&self, data: &[(&str, Value)], id: impl Into<Value>) -> DbResult<ResultSet> {
        self.builder()
            .and_where_eq(E::primary_key(), id)
            .update(E::table_name(), data)
    }

    /// Delete the row with the given primary key.
    pub fn delete(&self, id: impl Into<Value>) -> DbResult<ResultSet> {
        self.builder()
            .and_where_eq(E::primary_key(), id)
            .delete(E::table_name())
    }
}
