//! In-memory endpoint used by the integration tests.

use std::collections::HashMap;

use sqlporter::{
    ColumnDescriptor, Endpoint, RowSet, TableRef, TransferError, TransferResult, TypeCode, Value,
};

pub struct StoredTable {
    pub columns: Vec<ColumnDescriptor>,
    pub primary_key: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

/// A fake database: a product name, a handful of stored tables, and a
/// recording of everything executed against it.
pub struct MemoryEndpoint {
    product: String,
    tables: HashMap<String, StoredTable>,
    pub executed: Vec<String>,
    pub insert_sql: Option<String>,
    pub inserted_rows: Vec<Vec<Value>>,
    pub autocommit_calls: Vec<bool>,
    pub commits: usize,
    pub rollbacks: usize,
    /// When set, `put_row` fails once this many rows have been accepted.
    pub fail_insert_after: Option<usize>,
}

impl MemoryEndpoint {
    pub fn new(product: impl Into<String>) -> Self {
        Self {
            product: product.into(),
            tables: HashMap::new(),
            executed: Vec::new(),
            insert_sql: None,
            inserted_rows: Vec::new(),
            autocommit_calls: Vec::new(),
            commits: 0,
            rollbacks: 0,
            fail_insert_after: None,
        }
    }

    pub fn with_table(
        mut self,
        name: impl Into<String>,
        columns: Vec<ColumnDescriptor>,
        primary_key: Vec<String>,
        rows: Vec<Vec<Value>>,
    ) -> Self {
        self.tables.insert(
            name.into(),
            StoredTable {
                columns,
                primary_key,
                rows,
            },
        );
        self
    }

    fn table(&self, name: &str) -> TransferResult<&StoredTable> {
        self.tables
            .get(name)
            .ok_or_else(|| TransferError::data_access(name, "lookup", "no such table"))
    }
}

impl Endpoint for MemoryEndpoint {
    fn product_name(&self) -> &str {
        &self.product
    }

    fn list_catalogs(&mut self) -> TransferResult<Vec<String>> {
        Ok(Vec::new())
    }

    fn list_schemas(&mut self) -> TransferResult<Vec<String>> {
        Ok(Vec::new())
    }

    fn list_tables(
        &mut self,
        _catalog: Option<&str>,
        _schemas: &[String],
    ) -> TransferResult<Vec<TableRef>> {
        let mut names: Vec<&String> = self.tables.keys().collect();
        names.sort();
        Ok(names.into_iter().map(TableRef::table).collect())
    }

    fn describe_columns(&mut self, table: &TableRef) -> TransferResult<Vec<ColumnDescriptor>> {
        Ok(self.table(&table.name)?.columns.clone())
    }

    fn primary_keys(&mut self, table: &TableRef) -> TransferResult<Vec<String>> {
        Ok(self.table(&table.name)?.primary_key.clone())
    }

    fn execute(&mut self, sql: &str) -> TransferResult<()> {
        self.executed.push(sql.to_string());
        Ok(())
    }

    fn query(&mut self, sql: &str) -> TransferResult<RowSet> {
        // The engine only ever sends "SELECT * FROM <name>" here.
        let name = sql
            .rsplit(' ')
            .next()
            .ok_or_else(|| TransferError::data_access("?", "select", "unparseable query"))?;
        let table = self.table(name)?;
        RowSet::from_parts(&table.columns, table.rows.clone())
    }

    fn put_row(
        &mut self,
        insert_sql: &str,
        row: &[Value],
        _types: &[TypeCode],
    ) -> TransferResult<()> {
        if let Some(limit) = self.fail_insert_after {
            if self.inserted_rows.len() >= limit {
                return Err(TransferError::data_access(
                    "?",
                    "insert",
                    "simulated write failure",
                ));
            }
        }
        self.insert_sql = Some(insert_sql.to_string());
        self.inserted_rows.push(row.to_vec());
        Ok(())
    }

    fn set_auto_commit(&mut self, on: bool) -> TransferResult<()> {
        self.autocommit_calls.push(on);
        Ok(())
    }

    fn commit(&mut self) -> TransferResult<()> {
        self.commits += 1;
        Ok(())
    }

    fn rollback(&mut self) -> TransferResult<()> {
        self.rollbacks += 1;
        Ok(())
    }
}
