//! Informix-family adapter.
//!
//! The driver reports `DATETIME` columns under the TIME code; both temporal
//! portable types have to be spelled as `DATETIME ... TO ...` ranges in
//! native DDL. `SERIAL` is a native Informix type and passes through as-is.

use super::{translate_fn_tokens, AdapterState, Dialect, VendorAdapter, SERIAL_MARKER};
use crate::catalog::TypeCode;
use crate::types::TransferStatements;

pub struct InformixAdapter {
    state: AdapterState,
}

impl InformixAdapter {
    pub fn new() -> Self {
        Self {
            state: AdapterState::default(),
        }
    }
}

impl VendorAdapter for InformixAdapter {
    fn dialect(&self) -> Dialect {
        Dialect::Informix
    }

    fn state(&self) -> &AdapterState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut AdapterState {
        &mut self.state
    }

    // The driver reports DATETIME YEAR TO SECOND columns as TIME; swap
    // them back to TIMESTAMP on the way in.
    fn convert_from_type(&self, t: TypeCode) -> TypeCode {
        match t {
            TypeCode::Time => TypeCode::Timestamp,
            other => other,
        }
    }

    fn convert_to_type(&self, t: TypeCode) -> TypeCode {
        match t {
            TypeCode::Timestamp => TypeCode::Time,
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
        let def = column_def.replacen("DATETIME YEAR TO FRACTION(5)", "TIMESTAMP", 1);
        def.replacen("DATETIME HOUR TO SECOND", "TIME", 1)
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
            // SERIAL is native here.
            return column_def.to_string();
        }
        // "TIMESTAMP" contains "TIME": pick one rewrite, never both.
        let def = if column_def.contains("TIMESTAMP") {
            column_def.replacen("TIMESTAMP", "DATETIME YEAR TO FRACTION(5)", 1)
        } else {
            column_def.replacen("TIME", "DATETIME HOUR TO SECOND", 1)
        };
        translate_fn_tokens(&def, self.fn_token_map())
    }

    fn fn_token_map(&self) -> &'static [(&'static str, &'static str)] {
        &[("NOW()", "CURRENT")]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_reporting_quirk_round_trips() {
        let adapter = InformixAdapter::new();
        assert_eq!(adapter.convert_from_type(TypeCode::Time), TypeCode::Timestamp);
        assert_eq!(
            adapter.convert_to_type(adapter.convert_from_type(TypeCode::Time)),
            TypeCode::Time
        );
    }

    #[test]
    fn temporal_defs_spell_native_datetime_ranges() {
        let adapter = InformixAdapter::new();
        let mut stmts = TransferStatements::default();
        assert_eq!(
            adapter.fixup_column_def_write(&mut stmts, "T", "TS", "TIMESTAMP NOT NULL", 0),
            "DATETIME YEAR TO FRACTION(5) NOT NULL"
        );
        assert_eq!(
            adapter.fixup_column_def_write(&mut stmts, "T", "T0", "TIME", 0),
            "DATETIME HOUR TO SECOND"
        );
    }

    #[test]
    fn serial_is_native_and_passes_through() {
        let adapter = InformixAdapter::new();
        let mut stmts = TransferStatements::default();
        assert_eq!(
            adapter.fixup_column_def_write(&mut stmts, "EMP", "ID", "SERIAL", 0),
            "SERIAL"
        );
        assert!(stmts.dest_setup.is_empty());
        assert!(stmts.dest_teardown.is_empty());
    }
}
