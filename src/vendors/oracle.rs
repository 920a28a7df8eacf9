//! Oracle-family adapter.
//!
//! Older drivers report datetime columns under the DATE code; the engine
//! has no BIGINT or BOOLEAN, and auto-increment columns ride on sequence
//! objects referenced from the column default.

use super::{
    sequence_name, translate_fn_tokens, AdapterState, Dialect, VendorAdapter, SERIAL_MARKER,
};
use crate::catalog::TypeCode;
use crate::types::TransferStatements;

pub struct OracleAdapter {
    state: AdapterState,
}

impl OracleAdapter {
    pub fn new() -> Self {
        Self {
            state: AdapterState::default(),
        }
    }
}

impl VendorAdapter for OracleAdapter {
    fn dialect(&self) -> Dialect {
        Dialect::Oracle
    }

    fn state(&self) -> &AdapterState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut AdapterState {
        &mut self.state
    }

    fn convert_from_type(&self, t: TypeCode) -> TypeCode {
        match t {
            TypeCode::Date => TypeCode::Timestamp,
            other => other,
        }
    }

    fn convert_to_type(&self, t: TypeCode) -> TypeCode {
        match t {
            TypeCode::Timestamp => TypeCode::Date,
            TypeCode::BigInt => TypeCode::Numeric,
            TypeCode::Boolean => TypeCode::SmallInt,
            other => other,
        }
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
                &format!("INTEGER DEFAULT {seq}.NEXTVAL"),
                1,
            );
        }
        translate_fn_tokens(column_def, self.fn_token_map())
    }

    fn fn_token_map(&self) -> &'static [(&'static str, &'static str)] {
        &[("NOW()", "SYSDATE")]
    }

    fn needs_transactional_transfer(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn datetime_reporting_quirk_round_trips() {
        let adapter = OracleAdapter::new();
        assert_eq!(adapter.convert_from_type(TypeCode::Date), TypeCode::Timestamp);
        assert_eq!(
            adapter.convert_to_type(adapter.convert_from_type(TypeCode::Date)),
            TypeCode::Date
        );
    }

    #[test]
    fn serial_write_uses_a_sequence_default() {
        let adapter = OracleAdapter::new();
        let mut stmts = TransferStatements::default();
        let def = adapter.fixup_column_def_write(&mut stmts, "EMP", "ID", "SERIAL", 0);
        assert_eq!(def, "INTEGER DEFAULT EMP_ID_seq.NEXTVAL");
        assert_eq!(stmts.dest_teardown, vec!["DROP SEQUENCE EMP_ID_seq"]);
    }

    #[test]
    fn now_marker_becomes_sysdate() {
        let adapter = OracleAdapter::new();
        let mut stmts = TransferStatements::default();
        let def = adapter.fixup_column_def_write(&mut stmts, "T", "TS", "DATE DEFAULT NOW()", 0);
        assert_eq!(def, "DATE DEFAULT SYSDATE");
    }
}
