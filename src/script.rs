//! Write-only script endpoint
//!
//! Instead of executing statements against a live destination, this
//! endpoint renders them into a SQL text stream for later replay. It only
//! works as a transfer destination; catalog introspection and queries fail
//! with a connection error.
//!
//! The reported product name is configurable so the destination adapter
//! still matches the engine the script is meant for.

use std::io::Write;

use crate::catalog::TypeCode;
use crate::endpoint::Endpoint;
use crate::error::{TransferError, TransferResult};
use crate::rowset::RowSet;
use crate::types::{ColumnDescriptor, TableRef, Value};

pub struct ScriptEndpoint<W: Write> {
    product: String,
    out: W,
    rows: u64,
}

impl<W: Write> ScriptEndpoint<W> {
    /// A script target with no dialect affinity (generic adapter).
    pub fn new(out: W) -> Self {
        Self::with_product("SQL script", out)
    }

    /// A script target whose statements are generated for the dialect
    /// matching `product`, e.g. `"PostgreSQL"`.
    pub fn with_product(product: impl Into<String>, out: W) -> Self {
        Self {
            product: product.into(),
            out,
            rows: 0,
        }
    }

    /// Hands back the underlying writer, e.g. to flush or close a file.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, sql: &str) -> TransferResult<()> {
        self.emit_raw(&format!("{sql};"))
    }

    fn emit_raw(&mut self, line: &str) -> TransferResult<()> {
        writeln!(self.out, "{line}")
            .map_err(|e| TransferError::connection(format!("script write failed: {e}")))
    }
}

fn write_only(operation: &str) -> TransferError {
    TransferError::connection(format!(
        "script endpoint is write-only, {operation} is not supported"
    ))
}

impl<W: Write> Endpoint for ScriptEndpoint<W> {
    fn product_name(&self) -> &str {
        &self.product
    }

    fn list_catalogs(&mut self) -> TransferResult<Vec<String>> {
        Err(write_only("catalog enumeration"))
    }

    fn list_schemas(&mut self) -> TransferResult<Vec<String>> {
        Err(write_only("schema enumeration"))
    }

    fn list_tables(
        &mut self,
        _catalog: Option<&str>,
        _schemas: &[String],
    ) -> TransferResult<Vec<TableRef>> {
        Err(write_only("table enumeration"))
    }

    fn describe_columns(&mut self, _table: &TableRef) -> TransferResult<Vec<ColumnDescriptor>> {
        Err(write_only("column introspection"))
    }

    fn execute(&mut self, sql: &str) -> TransferResult<()> {
        self.emit(sql)
    }

    fn query(&mut self, _sql: &str) -> TransferResult<RowSet> {
        Err(write_only("querying"))
    }

    fn put_row(
        &mut self,
        insert_sql: &str,
        row: &[Value],
        _types: &[TypeCode],
    ) -> TransferResult<()> {
        let rendered = render_insert(insert_sql, row)?;
        self.emit(&rendered)?;
        self.rows += 1;
        Ok(())
    }

    fn set_auto_commit(&mut self, _on: bool) -> TransferResult<()> {
        Ok(())
    }

    fn commit(&mut self) -> TransferResult<()> {
        self.emit("COMMIT")?;
        self.emit_raw(&format!("-- rows: {}", self.rows))
    }

    fn rollback(&mut self) -> TransferResult<()> {
        self.emit("ROLLBACK")
    }
}

/// Substitutes one literal per `?` placeholder, left to right.
fn render_insert(insert_sql: &str, row: &[Value]) -> TransferResult<String> {
    let mut parts = insert_sql.split('?');
    let mut out = String::with_capacity(insert_sql.len() + row.len() * 8);
    out.push_str(parts.next().unwrap_or_default());
    let mut values = row.iter();
    for part in parts {
        let value = values.next().ok_or_else(|| {
            TransferError::schema_mismatch(format!(
                "{} placeholders but only {} values",
                insert_sql.matches('?').count(),
                row.len()
            ))
        })?;
        out.push_str(&sql_literal(value));
        out.push_str(part);
    }
    if values.next().is_some() {
        return Err(TransferError::schema_mismatch(format!(
            "{} values but only {} placeholders",
            row.len(),
            insert_sql.matches('?').count()
        )));
    }
    Ok(out)
}

fn sql_literal(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(true) => "TRUE".to_string(),
        Value::Bool(false) => "FALSE".to_string(),
        Value::SmallInt(v) => v.to_string(),
        Value::Int(v) => v.to_string(),
        Value::Float(v) => v.to_string(),
        Value::Numeric(v) => v.to_string(),
        Value::Text(v) => format!("'{}'", v.replace('\'', "''")),
        Value::Bytes(v) => {
            let mut hex = String::with_capacity(v.len() * 2);
            for b in v {
                hex.push_str(&format!("{b:02X}"));
            }
            format!("X'{hex}'")
        }
        Value::Date(v) => format!("'{v}'"),
        Value::Time(v) => format!("'{v}'"),
        Value::Timestamp(v) => format!("'{}'", v.format("%Y-%m-%d %H:%M:%S%.f")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statements_are_terminated_and_ordered() {
        let mut script = ScriptEndpoint::new(Vec::new());
        script.execute("CREATE TABLE EMP (ID INTEGER)").unwrap();
        script
            .put_row(
                "INSERT INTO EMP VALUES (?)",
                &[Value::Int(1)],
                &[TypeCode::Integer],
            )
            .unwrap();
        script.commit().unwrap();

        let text = String::from_utf8(script.into_inner()).unwrap();
        assert_eq!(
            text,
            "CREATE TABLE EMP (ID INTEGER);\nINSERT INTO EMP VALUES (1);\nCOMMIT;\n-- rows: 1\n"
        );
    }

    #[test]
    fn literals_escape_quotes_and_render_null() {
        let rendered = render_insert(
            "INSERT INTO T VALUES (?,?,?)",
            &[
                Value::Text("O'Brien".into()),
                Value::Null,
                Value::Bytes(vec![0xAB, 0x01]),
            ],
        )
        .unwrap();
        assert_eq!(rendered, "INSERT INTO T VALUES ('O''Brien',NULL,X'AB01')");
    }

    #[test]
    fn placeholder_count_must_match_the_row() {
        let err = render_insert("INSERT INTO T VALUES (?,?)", &[Value::Int(1)]).unwrap_err();
        assert!(matches!(err, TransferError::SchemaMismatch { .. }));

        let err = render_insert(
            "INSERT INTO T VALUES (?)",
            &[Value::Int(1), Value::Int(2)],
        )
        .unwrap_err();
        assert!(matches!(err, TransferError::SchemaMismatch { .. }));
    }

    #[test]
    fn introspection_is_rejected_as_write_only() {
        let mut script = ScriptEndpoint::new(Vec::new());
        assert!(matches!(
            script.list_tables(None, &[]),
            Err(TransferError::Connection { .. })
        ));
        assert!(matches!(
            script.query("SELECT 1"),
            Err(TransferError::Connection { .. })
        ));
    }
}
