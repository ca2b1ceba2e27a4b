//! Bind values for parameterized statements.

use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::Query;
use uuid::Uuid;

/// A single positional bind value (`$1`, `$2`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlParam {
    Uuid(Uuid),
    Text(String),
    TextArray(Vec<String>),
    Int(i32),
}

impl From<Uuid> for SqlParam {
    fn from(value: Uuid) -> Self {
        SqlParam::Uuid(value)
    }
}

impl From<String> for SqlParam {
    fn from(value: String) -> Self {
        SqlParam::Text(value)
    }
}

impl From<&str> for SqlParam {
    fn from(value: &str) -> Self {
        SqlParam::Text(value.to_owned())
    }
}

impl From<Vec<String>> for SqlParam {
    fn from(value: Vec<String>) -> Self {
        SqlParam::TextArray(value)
    }
}

impl From<i32> for SqlParam {
    fn from(value: i32) -> Self {
        SqlParam::Int(value)
    }
}

/// Build a query from `statement` with `params` bound in order.
pub(crate) fn bind_all(statement: &str, params: Vec<SqlParam>) -> Query<'_, Postgres, PgArguments> {
    params
        .into_iter()
        .fold(sqlx::query(statement), |query, param| match param {
            SqlParam::Uuid(value) => query.bind(value),
            SqlParam::Text(value) => query.bind(value),
            SqlParam::TextArray(value) => query.bind(value),
            SqlParam::Int(value) => query.bind(value),
        })
}
