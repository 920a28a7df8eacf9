//! SQL Server-family adapter.
//!
//! Also selected for "access" product names, a compatibility alias carried
//! over from the transfer tools this engine replaces.

use super::{translate_fn_tokens, AdapterState, Dialect, VendorAdapter, SERIAL_MARKER};
use crate::catalog::TypeCode;
use crate::types::TransferStatements;

pub struct SqlServerAdapter {
    state: AdapterState,
}

impl SqlServerAdapter {
    pub fn new() -> Self {
        Self {
            state: AdapterState::default(),
        }
    }
}

impl VendorAdapter for SqlServerAdapter {
    fn dialect(&self) -> Dialect {
        Dialect::SqlServer
    }

    fn state(&self) -> &AdapterState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut AdapterState {
        &mut self.state
    }

    fn convert_to_type(&self, t: TypeCode) -> TypeCode {
        match t {
            TypeCode::Boolean => TypeCode::Bit,
            TypeCode::Double => TypeCode::Float,
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
        if column_def.to_uppercase().contains("IDENTITY") {
            SERIAL_MARKER.to_string()
        } else {
            column_def.to_string()
        }
    }

    fn fixup_column_def_write(
        &self,
        _stmts: &mut TransferStatements,
        _table: &str,
        _column: &str,
        column_def: &str,
        _column_size: i32,
    ) -> String {
        if column_def.contains(SERIAL_MARKER) {
            column_def.replacen(SERIAL_MARKER, "INT IDENTITY(1,1)", 1)
        } else {
            translate_fn_tokens(column_def, self.fn_token_map())
        }
    }

    fn fn_token_map(&self) -> &'static [(&'static str, &'static str)] {
        &[("NOW()", "GETDATE()")]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_columns_canonicalize_to_serial() {
        let adapter = SqlServerAdapter::new();
        assert_eq!(
            adapter.fixup_column_def_read("EMP", "ID", "int IDENTITY(1,1) NOT NULL", 0),
            "SERIAL"
        );
    }

    #[test]
    fn serial_writes_back_as_identity() {
        let adapter = SqlServerAdapter::new();
        let mut stmts = TransferStatements::default();
        assert_eq!(
            adapter.fixup_column_def_write(&mut stmts, "EMP", "ID", "SERIAL", 0),
            "INT IDENTITY(1,1)"
        );
    }

    #[test]
    fn now_marker_becomes_getdate() {
        let adapter = SqlServerAdapter::new();
        let mut stmts = TransferStatements::default();
        assert_eq!(
            adapter.fixup_column_def_write(
                &mut stmts,
                "T",
                "TS",
                "TIMESTAMP DEFAULT NOW()",
                0
            ),
            "TIMESTAMP DEFAULT GETDATE()"
        );
    }
}
