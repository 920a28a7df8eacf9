//! Endpoint capability trait
//!
//! A live, owned connection to one database: catalog introspection,
//! statement execution, and transactional control. The transfer core
//! consumes endpoints, it does not implement wire protocols — callers
//! supply an implementation per connection (driver-backed in the host
//! application, [`crate::script::ScriptEndpoint`] for script output).
//!
//! Endpoints are not thread-safe and must not be shared across concurrent
//! sessions. Closing the underlying connection must make any in-flight
//! call fail fast with a `Connection` error; the core imposes no timeouts.

use crate::catalog::TypeCode;
use crate::error::TransferResult;
use crate::rowset::RowSet;
use crate::types::{ColumnDescriptor, TableRef, Value};

pub trait Endpoint {
    /// The reported database product name, e.g. `"PostgreSQL"`. Drives
    /// vendor adapter selection.
    fn product_name(&self) -> &str;

    /// Lists catalog names visible on this connection.
    fn list_catalogs(&mut self) -> TransferResult<Vec<String>>;

    /// Lists schema names visible on this connection.
    fn list_schemas(&mut self) -> TransferResult<Vec<String>>;

    /// Lists tables and views, optionally restricted to a catalog and a set
    /// of schemas.
    fn list_tables(
        &mut self,
        catalog: Option<&str>,
        schemas: &[String],
    ) -> TransferResult<Vec<TableRef>>;

    /// Introspects one table's column metadata.
    fn describe_columns(&mut self, table: &TableRef) -> TransferResult<Vec<ColumnDescriptor>>;

    /// Primary-key column names for one table, in key order. Endpoints
    /// without key introspection report none.
    fn primary_keys(&mut self, _table: &TableRef) -> TransferResult<Vec<String>> {
        Ok(Vec::new())
    }

    /// Executes a statement with no result set (DDL/DML).
    fn execute(&mut self, sql: &str) -> TransferResult<()>;

    /// Runs a query and materializes the full result into a [`RowSet`],
    /// decoupled from this connection's cursor lifetime.
    fn query(&mut self, sql: &str) -> TransferResult<RowSet>;

    /// Writes one row through the given parameterized insert statement.
    /// Implementations may prepare and cache the statement keyed by its
    /// text.
    fn put_row(
        &mut self,
        insert_sql: &str,
        row: &[Value],
        types: &[TypeCode],
    ) -> TransferResult<()>;

    fn set_auto_commit(&mut self, on: bool) -> TransferResult<()>;

    fn commit(&mut self) -> TransferResult<()>;

    fn rollback(&mut self) -> TransferResult<()>;
}
