//! Embedded SQL engine adapter (HSQLDB-family).
//!
//! Auto-increment columns use native `IDENTITY` syntax, and the engine has
//! no LOB types: BLOB/CLOB degrade to the long binary/char forms.

use super::{translate_fn_tokens, AdapterState, Dialect, VendorAdapter, SERIAL_MARKER};
use crate::catalog::TypeCode;
use crate::types::TransferStatements;

pub struct HsqldbAdapter {
    state: AdapterState,
}

impl HsqldbAdapter {
    pub fn new() -> Self {
        Self {
            state: AdapterState::default(),
        }
    }
}

impl VendorAdapter for HsqldbAdapter {
    fn dialect(&self) -> Dialect {
        Dialect::Hsqldb
    }

    fn state(&self) -> &AdapterState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut AdapterState {
        &mut self.state
    }

    fn convert_to_type(&self, t: TypeCode) -> TypeCode {
        match t {
            TypeCode::Blob => TypeCode::LongVarbinary,
            TypeCode::Clob => TypeCode::LongVarchar,
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
            column_def.replacen(SERIAL_MARKER, "INTEGER IDENTITY", 1)
        } else {
            translate_fn_tokens(column_def, self.fn_token_map())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_columns_canonicalize_to_serial() {
        let adapter = HsqldbAdapter::new();
        assert_eq!(
            adapter.fixup_column_def_read("EMP", "ID", "INTEGER IDENTITY", 0),
            "SERIAL"
        );
        assert_eq!(
            adapter.fixup_column_def_read("EMP", "NAME", "VARCHAR(20)", 20),
            "VARCHAR(20)"
        );
    }

    #[test]
    fn serial_writes_back_as_identity() {
        let adapter = HsqldbAdapter::new();
        let mut stmts = TransferStatements::default();
        assert_eq!(
            adapter.fixup_column_def_write(&mut stmts, "EMP", "ID", "SERIAL", 0),
            "INTEGER IDENTITY"
        );
        assert!(stmts.dest_setup.is_empty());
    }

    #[test]
    fn lob_types_degrade_to_long_forms() {
        let adapter = HsqldbAdapter::new();
        assert_eq!(adapter.convert_to_type(TypeCode::Blob), TypeCode::LongVarbinary);
        assert_eq!(adapter.convert_to_type(TypeCode::Clob), TypeCode::LongVarchar);
        assert_eq!(adapter.convert_to_type(TypeCode::Varchar), TypeCode::Varchar);
    }
}
