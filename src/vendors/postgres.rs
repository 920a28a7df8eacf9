// SPDX-License-Identifier: Apache-2.0

//! PostgreSQL-family adapter.
//!
//! Auto-increment columns are backed by sequence objects: reading turns a
//! `nextval(...)` default into the portable `SERIAL` marker, writing turns
//! the marker back into a sequence declaration plus a deferred
//! `DROP SEQUENCE` on the table's teardown script. The transfer bracket is
//! transactional and finishes with a `VACUUM ANALYZE` so a bulk load leaves
//! fresh planner statistics behind.

use tracing::warn;

use super::{
    sequence_name, translate_fn_tokens, AdapterState, Dialect, VendorAdapter, SERIAL_MARKER,
};
use crate::catalog::TypeCode;
use crate::endpoint::Endpoint;
use crate::types::TransferStatements;

pub struct PostgresAdapter {
    state: AdapterState,
}

impl PostgresAdapter {
    pub fn new() -> Self {
        Self {
            state: AdapterState::default(),
        }
    }
}

impl VendorAdapter for PostgresAdapter {
    fn dialect(&self) -> Dialect {
        Dialect::Postgres
    }

    fn state(&self) -> &AdapterState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut AdapterState {
        &mut self.state
    }

    // The driver reports BOOLEAN columns under the BIT code; swap it back.
    fn convert_from_type(&self, t: TypeCode) -> TypeCode {
        match t {
            TypeCode::Bit => TypeCode::Boolean,
            other => other,
        }
    }

    fn convert_to_type(&self, t: TypeCode) -> TypeCode {
        match t {
            TypeCode::Boolean => TypeCode::Bit,
            TypeCode::TinyInt => TypeCode::SmallInt,
            other => other,
        }
    }

    fn fixup_column_def_read(
        &self,
        _table: &str,
        _column: &str,
        column_def: &str,
        _column_size: i32,
    ) -> String {
        if column_def.to_lowercase().contains("nextval(") {
            return SERIAL_MARKER.to_string();
        }
        translate_fn_tokens(column_def, &[("now()", "NOW()")])
    }

    fn fixup_column_def_write(
        &self,
        stmts: &mut TransferStatements,
        table: &str,
        column: &str,
        column_def: &str,
        _column_size: i32,
    ) -> String {
        if column_def.contains(SERIAL_MARKER) {
            let seq = sequence_name(table, column);
            stmts.dest_setup.push(format!("CREATE SEQUENCE {seq}"));
            stmts.dest_teardown.push(format!("DROP SEQUENCE {seq}"));
            return column_def.replacen(
                SERIAL_MARKER,
                &format!("INTEGER DEFAULT nextval('{seq}')"),
                1,
            );
        }
        translate_fn_tokens(column_def, self.fn_token_map())
    }

    fn fn_token_map(&self) -> &'static [(&'static str, &'static str)] {
        &[("NOW()", "now()")]
    }

    fn needs_transactional_transfer(&self) -> bool {
        true
    }

    fn end_data_transfer(&mut self, endpoint: &mut dyn Endpoint) {
        if let Err(e) = endpoint.commit() {
            warn!(error = %e, "ignoring failure to commit transfer");
        }
        if let Err(e) = endpoint.set_auto_commit(true) {
            warn!(error = %e, "ignoring failure to restore autocommit after transfer");
        }
        // Reclaim storage and refresh statistics after the bulk load.
        if let Err(e) = endpoint.execute("VACUUM ANALYZE") {
            warn!(error = %e, "ignoring failure to vacuum after transfer");
        }
    }
}
