// SPDX-License-Identifier: Apache-2.0

//! Transfer session orchestration
//!
//! A session pairs one source endpoint with one destination endpoint and
//! drives the per-table pipeline: schema extraction into a portable
//! definition, destination DDL generation, and the row copy. Vendor
//! adapters are selected from each endpoint's reported product name when
//! the session opens and carry per-session mutable state, so sessions are
//! never shared.

use tracing::{debug, info, warn};

use crate::catalog::TypeCode;
use crate::endpoint::Endpoint;
use crate::error::{TransferError, TransferResult};
use crate::types::{
    PortableColumn, PortableTable, SessionId, TableKind, TableRef, TransferTable, Value,
};
use crate::vendors::{Dialect, VendorAdapter, SERIAL_MARKER};

/// Rows between progress log lines during a copy.
const PROGRESS_INTERVAL: u64 = 100;

/// Where a session stands in the per-table pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    SchemaExtracted,
    DdlGenerated,
    Transferring,
    Committed,
    Aborted,
}

/// One source-to-destination transfer pairing.
///
/// Borrows both endpoints mutably for its lifetime; the endpoints outlive
/// the session and can be reused for the next one.
pub struct TransferSession<'a> {
    id: SessionId,
    source: &'a mut dyn Endpoint,
    dest: &'a mut dyn Endpoint,
    source_adapter: Box<dyn VendorAdapter>,
    dest_adapter: Box<dyn VendorAdapter>,
    phase: SessionPhase,
}

impl<'a> TransferSession<'a> {
    /// Opens a session, selecting a vendor adapter per endpoint from its
    /// reported product name.
    pub fn new(source: &'a mut dyn Endpoint, dest: &'a mut dyn Endpoint) -> Self {
        let source_dialect = Dialect::from_product_name(source.product_name());
        let dest_dialect = Dialect::from_product_name(dest.product_name());
        let id = SessionId::new();
        debug!(
            session = %id.0,
            source = source_dialect.name(),
            dest = dest_dialect.name(),
            "transfer session opened"
        );
        Self {
            id,
            source,
            dest,
            source_adapter: source_dialect.adapter(),
            dest_adapter: dest_dialect.adapter(),
            phase: SessionPhase::Idle,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn source_dialect(&self) -> Dialect {
        self.source_adapter.dialect()
    }

    pub fn dest_dialect(&self) -> Dialect {
        self.dest_adapter.dialect()
    }

    /// Introspects `table` on the source and builds its portable
    /// definition: normalized type codes, portable definition text with the
    /// auto-increment encoding canonicalized to `SERIAL`, and the primary
    /// key if the endpoint can report one.
    ///
    /// A type code outside the portable catalog does not fail the table;
    /// the column keeps its vendor-native type text.
    pub fn extract_schema(&mut self, table: &TableRef) -> TransferResult<PortableTable> {
        if let Some(schema) = &table.schema {
            self.source_adapter.state_mut().schema = schema.clone();
        }

        if table.kind == TableKind::View {
            // Views carry no column definitions of their own; DDL
            // generation emits a skeleton for the caller to complete.
            self.phase = SessionPhase::SchemaExtracted;
            return Ok(PortableTable {
                source: table.clone(),
                columns: Vec::new(),
                primary_key: Vec::new(),
            });
        }

        let descriptors = self
            .source
            .describe_columns(table)
            .map_err(|e| wrap_table_err(&table.name, "describe columns", e))?;

        let mut columns = Vec::with_capacity(descriptors.len());
        for col in &descriptors {
            let (type_code, mut def) = match TypeCode::from_code(col.portable_type) {
                Ok(raw) => {
                    let t = self.source_adapter.convert_from_type(raw);
                    (t, t.name().to_string())
                }
                Err(e) => {
                    debug!(
                        session = %self.id.0,
                        column = %col.name,
                        native = %col.native_type,
                        "{e}; keeping the vendor-native type text"
                    );
                    (TypeCode::Other, col.native_type.to_string())
                }
            };

            if col.auto_increment {
                def = SERIAL_MARKER.to_string();
            } else {
                match type_code {
                    TypeCode::Numeric | TypeCode::Decimal if col.precision > 0 => {
                        def.push_str(&format!("({}", col.precision));
                        if col.scale > 0 {
                            def.push_str(&format!(",{}", col.scale));
                        }
                        def.push(')');
                    }
                    TypeCode::Char | TypeCode::Varchar if col.column_size > 0 => {
                        def.push_str(&format!("({})", col.column_size));
                    }
                    _ => {}
                }
            }

            if let Some(default) = &col.default_value {
                if needs_quoted_default(type_code) {
                    def.push_str(&format!(" DEFAULT '{default}'"));
                } else {
                    def.push_str(&format!(" DEFAULT {default}"));
                }
            }
            if !col.nullable {
                def.push_str(" NOT NULL");
            }

            let def = self
                .source_adapter
                .fixup_column_def_read(&table.name, &col.name, &def, col.column_size);
            columns.push(PortableColumn {
                name: col.name.to_string(),
                type_code,
                def,
                size: col.column_size,
            });
        }

        let primary_key = match self.source.primary_keys(table) {
            Ok(pk) => pk,
            Err(e) => {
                debug!(session = %self.id.0, table = %table.name, error = %e,
                       "primary-key introspection unavailable, creating without a key");
                Vec::new()
            }
        };

        self.phase = SessionPhase::SchemaExtracted;
        Ok(PortableTable {
            source: table.clone(),
            columns,
            primary_key,
        })
    }

    /// Rewrites `portable` into destination-native statements on
    /// `transfer.stmts`: drop/create/delete/insert text plus any setup and
    /// teardown statements the destination adapter accumulates.
    ///
    /// Regeneration is idempotent; stale setup/teardown from an earlier
    /// pass is discarded first.
    pub fn generate_ddl(
        &mut self,
        portable: &PortableTable,
        transfer: &mut TransferTable,
    ) -> TransferResult<()> {
        let adapter = &mut self.dest_adapter;
        adapter.state_mut().schema = transfer.dest_schema.clone().unwrap_or_default();
        let dest_name = adapter.format_qualified_name(&transfer.dest_name);

        let stmts = &mut transfer.stmts;
        stmts.dest_setup.clear();
        stmts.dest_teardown.clear();

        if transfer.source.kind == TableKind::View {
            stmts.dest_drop = format!("DROP VIEW {dest_name}");
            stmts.dest_create = format!("CREATE VIEW {dest_name} AS SELECT ");
            stmts.dest_delete.clear();
            stmts.dest_insert.clear();
            stmts.run_delete = false;
            stmts.run_transfer = false;
            self.phase = SessionPhase::DdlGenerated;
            return Ok(());
        }

        if portable.columns.is_empty() {
            return Err(TransferError::schema_mismatch(format!(
                "table {} has no columns to generate DDL for",
                transfer.source.name
            )));
        }

        stmts.dest_drop = format!("DROP TABLE {dest_name}");
        stmts.dest_delete = format!("DELETE FROM {dest_name}");

        let mut col_defs = Vec::with_capacity(portable.columns.len());
        let mut params = Vec::with_capacity(portable.columns.len());
        for col in &portable.columns {
            let target = adapter.convert_to_type(col.type_code);
            // The fixup sees the portable text first; dialects that respell
            // a type wholesale (DATETIME ranges, SERIAL) key off it.
            let mut def = adapter.fixup_column_def_write(
                stmts,
                &transfer.dest_name,
                &col.name,
                &col.def,
                col.size,
            );
            if target != col.type_code && col.type_code != TypeCode::Other {
                // Retarget the portable type name if the fixup left it in.
                def = def.replacen(col.type_code.name(), target.name(), 1);
            }
            col_defs.push(format!("{} {}", adapter.format_identifier(&col.name), def));
            params.push("?");
        }

        let mut body = col_defs.join(", ");
        if !portable.primary_key.is_empty() {
            let key: Vec<String> = portable
                .primary_key
                .iter()
                .map(|c| adapter.format_identifier(c))
                .collect();
            body.push_str(&format!(", PRIMARY KEY ({})", key.join(", ")));
        }
        stmts.dest_create = format!("CREATE TABLE {dest_name} ({body})");
        stmts.dest_insert = format!(
            "INSERT INTO {dest_name} VALUES ({})",
            params.join(",")
        );

        if stmts.source_select.is_empty() {
            stmts.source_select = format!(
                "SELECT * FROM {}",
                self.source_adapter.format_qualified_name(&transfer.source.name)
            );
        }

        self.phase = SessionPhase::DdlGenerated;
        Ok(())
    }

    /// Copies rows through the generated insert statement. `max_rows`
    /// caps the copy; 0 means unlimited.
    ///
    /// Values are coerced by the destination adapter right before the
    /// write. On a transactional destination a failed copy is rolled back;
    /// otherwise rows already written stay written.
    pub fn copy_data(&mut self, transfer: &TransferTable, max_rows: u64) -> TransferResult<u64> {
        let stmts = &transfer.stmts;
        if stmts.dest_insert.is_empty() {
            return Err(TransferError::data_access(
                &transfer.dest_name,
                "copy",
                "no insert statement has been generated",
            ));
        }

        self.phase = SessionPhase::Transferring;

        let Self {
            id,
            source,
            dest,
            dest_adapter,
            phase,
            ..
        } = self;

        let mut cursor = source
            .query(&stmts.source_select)
            .map_err(|e| wrap_table_err(&transfer.source.name, "select", e))?;

        // Only the destination gets a transaction bracket; the source is
        // read through a fully materialized cursor and stays untouched.
        dest_adapter.begin_data_transfer(&mut **dest);

        let mut types: Vec<TypeCode> = Vec::new();
        let mut rows_done: u64 = 0;
        let outcome: TransferResult<()> = loop {
            if !cursor.next() {
                break Ok(());
            }
            if max_rows != 0 && rows_done >= max_rows {
                debug!(session = %id.0, table = %transfer.dest_name, max_rows,
                       "row cap reached, stopping the copy");
                break Ok(());
            }

            let width = cursor.column_count();
            if types.is_empty() {
                // The first row fixes the type vector for the whole copy.
                types = (0..width)
                    .map(|i| cursor.column_type(i).unwrap_or(TypeCode::Other))
                    .collect();
            }

            let mut row = Vec::with_capacity(width);
            for i in 0..width {
                let value = cursor.value_at(i).cloned().unwrap_or(Value::Null);
                row.push(dest_adapter.coerce_value(value, i, types[i]));
            }

            if let Err(e) = dest.put_row(&stmts.dest_insert, &row, &types) {
                break Err(wrap_table_err(
                    &transfer.dest_name,
                    format!("insert row {}", rows_done + 1),
                    e,
                ));
            }
            rows_done += 1;
            if rows_done % PROGRESS_INTERVAL == 0 {
                info!(session = %id.0, table = %transfer.dest_name, rows = rows_done,
                      "copy in progress");
            }
        };

        match outcome {
            Ok(()) => {
                dest_adapter.end_data_transfer(&mut **dest);
                *phase = SessionPhase::Committed;
                info!(session = %id.0, table = %transfer.dest_name, rows = rows_done,
                      "table copy finished");
                Ok(rows_done)
            }
            Err(e) => {
                if dest_adapter.needs_transactional_transfer() {
                    if let Err(rb) = dest.rollback() {
                        warn!(session = %id.0, table = %transfer.dest_name, error = %rb,
                              "rollback after failed copy also failed");
                    }
                } else if rows_done > 0 {
                    warn!(session = %id.0, table = %transfer.dest_name, rows = rows_done,
                          "destination is non-transactional, rows already written remain");
                }
                *phase = SessionPhase::Aborted;
                Err(e)
            }
        }
    }

    /// Runs the whole pipeline for one table, honoring its enable flags:
    /// teardown and drop (failures ignored, the objects may not exist yet),
    /// setup and create, delete, then the row copy.
    ///
    /// Returns the number of rows copied; 0 when the transfer step is
    /// disabled.
    pub fn run(&mut self, transfer: &mut TransferTable, max_rows: u64) -> TransferResult<u64> {
        let portable = self.extract_schema(&transfer.source)?;
        self.generate_ddl(&portable, transfer)?;

        let stmts = transfer.stmts.clone();
        if stmts.run_drop {
            for sql in &stmts.dest_teardown {
                if let Err(e) = self.dest.execute(sql) {
                    debug!(session = %self.id.0, error = %e, "ignoring teardown failure");
                }
            }
            if let Err(e) = self.dest.execute(&stmts.dest_drop) {
                debug!(session = %self.id.0, error = %e, "ignoring drop failure");
            }
        }
        if stmts.run_create {
            for sql in &stmts.dest_setup {
                self.dest
                    .execute(sql)
                    .map_err(|e| wrap_table_err(&transfer.dest_name, "setup", e))?;
            }
            self.dest
                .execute(&stmts.dest_create)
                .map_err(|e| wrap_table_err(&transfer.dest_name, "create", e))?;
        }
        if stmts.run_delete && !stmts.dest_delete.is_empty() {
            self.dest
                .execute(&stmts.dest_delete)
                .map_err(|e| wrap_table_err(&transfer.dest_name, "delete", e))?;
        }
        if stmts.run_transfer {
            self.copy_data(transfer, max_rows)
        } else {
            Ok(0)
        }
    }
}

/// Attaches table and operation context to an endpoint failure, keeping
/// connection failures recognizable as fatal to the session.
fn wrap_table_err(
    table: impl Into<String>,
    operation: impl Into<String>,
    err: TransferError,
) -> TransferError {
    match err {
        TransferError::Connection { .. } => err,
        other => TransferError::data_access(table, operation, other),
    }
}

/// Default expressions for textual and temporal types are re-emitted
/// single-quoted; everything else passes through as written.
fn needs_quoted_default(t: TypeCode) -> bool {
    matches!(
        t,
        TypeCode::Char
            | TypeCode::Varchar
            | TypeCode::LongVarchar
            | TypeCode::Date
            | TypeCode::Time
            | TypeCode::Timestamp
    )
}
