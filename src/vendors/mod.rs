// SPDX-License-Identifier: Apache-2.0

//! Vendor adapters
//!
//! One adapter per supported SQL dialect, each customizing type-code
//! remapping, identifier quoting, DDL column fixups, value coercion, and
//! transaction bracketing. The default trait methods implement the generic
//! passthrough behavior; dialect variants override only what their vendor
//! does differently.
//!
//! Adapters carry per-transfer mutable state (the target schema and the
//! one-time coercion diagnostics), so they are instantiated per transfer
//! session and never shared.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::catalog::TypeCode;
use crate::endpoint::Endpoint;
use crate::types::{TransferStatements, Value};

mod generic;
mod hsqldb;
mod informix;
mod monetdb;
mod oracle;
mod postgres;
mod sqlserver;

pub use generic::GenericAdapter;
pub use hsqldb::HsqldbAdapter;
pub use informix::InformixAdapter;
pub use monetdb::MonetDbAdapter;
pub use oracle::OracleAdapter;
pub use postgres::PostgresAdapter;
pub use sqlserver::SqlServerAdapter;

/// Portable marker token for an auto-increment column definition.
pub const SERIAL_MARKER: &str = "SERIAL";

/// Identifier budget for generated sequence names.
const SEQUENCE_NAME_BUDGET: usize = 31;

/// Identity of a SQL dialect, derived from a connection's reported
/// product name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    Generic,
    Hsqldb,
    Postgres,
    Oracle,
    Informix,
    MonetDb,
    SqlServer,
}

/// Ordered dialect keywords; first case-insensitive substring match wins.
/// "access" is a long-standing compatibility alias for the SQL Server
/// adapter and must stay in this list.
const DIALECT_KEYWORDS: &[(&str, Dialect)] = &[
    ("hsql", Dialect::Hsqldb),
    ("postgres", Dialect::Postgres),
    ("oracle", Dialect::Oracle),
    ("informix", Dialect::Informix),
    ("monet", Dialect::MonetDb),
    ("sql server", Dialect::SqlServer),
    ("access", Dialect::SqlServer),
];

impl Dialect {
    /// Selects the dialect for a reported product name. Unrecognized
    /// products get the generic passthrough adapter.
    pub fn from_product_name(product: &str) -> Dialect {
        let lower = product.to_lowercase();
        DIALECT_KEYWORDS
            .iter()
            .find(|(keyword, _)| lower.contains(keyword))
            .map(|&(_, dialect)| dialect)
            .unwrap_or(Dialect::Generic)
    }

    /// Instantiates a fresh adapter for one transfer session.
    pub fn adapter(self) -> Box<dyn VendorAdapter> {
        match self {
            Dialect::Generic => Box::new(GenericAdapter::new()),
            Dialect::Hsqldb => Box::new(HsqldbAdapter::new()),
            Dialect::Postgres => Box::new(PostgresAdapter::new()),
            Dialect::Oracle => Box::new(OracleAdapter::new()),
            Dialect::Informix => Box::new(InformixAdapter::new()),
            Dialect::MonetDb => Box::new(MonetDbAdapter::new()),
            Dialect::SqlServer => Box::new(SqlServerAdapter::new()),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Dialect::Generic => "generic",
            Dialect::Hsqldb => "hsqldb",
            Dialect::Postgres => "postgres",
            Dialect::Oracle => "oracle",
            Dialect::Informix => "informix",
            Dialect::MonetDb => "monetdb",
            Dialect::SqlServer => "sqlserver",
        }
    }
}

/// Per-session mutable adapter state.
#[derive(Debug, Default)]
pub struct AdapterState {
    /// Destination schema; qualifies formatted names when non-empty.
    pub schema: String,
    /// Narrowing kinds already diagnosed this session.
    narrowed: HashSet<TypeCode>,
}

/// The fixed capability set every dialect implements.
///
/// Default methods are the generic passthrough; overrides encode one
/// vendor's quirks. Methods that wrap endpoint calls may surface a
/// `DataAccess` error, except the transfer brackets, which are best
/// effort by contract: their own failures are logged and swallowed so a
/// partially configured destination never aborts a copy that the rows
/// themselves would survive. That relaxation is intentional and matches
/// the observable behavior of the legacy transfer tools this engine
/// replaces; do not tighten it without a product decision.
pub trait VendorAdapter {
    fn dialect(&self) -> Dialect;

    fn state(&self) -> &AdapterState;

    fn state_mut(&mut self) -> &mut AdapterState;

    /// Corrects type codes when reading schema information *from* this
    /// vendor, undoing known driver type-reporting quirks.
    fn convert_from_type(&self, t: TypeCode) -> TypeCode {
        t
    }

    /// Maps portable type codes onto what this vendor accepts when writing.
    /// For every type a dialect special-cases in both directions,
    /// `convert_to_type(convert_from_type(t)) == t` must hold.
    fn convert_to_type(&self, t: TypeCode) -> TypeCode {
        t
    }

    /// Canonicalizes vendor-specific auto-increment encodings in a column
    /// definition read from this vendor into the portable `SERIAL` marker.
    fn fixup_column_def_read(
        &self,
        _table: &str,
        _column: &str,
        column_def: &str,
        _column_size: i32,
    ) -> String {
        column_def.to_string()
    }

    /// Rewrites a portable column definition into this vendor's native DDL:
    /// expands the `SERIAL` marker and translates portable function-call
    /// tokens. May accumulate setup/teardown statements onto `stmts`.
    fn fixup_column_def_write(
        &self,
        _stmts: &mut TransferStatements,
        _table: &str,
        _column: &str,
        column_def: &str,
        _column_size: i32,
    ) -> String {
        translate_fn_tokens(column_def, self.fn_token_map())
    }

    /// Portable → native function-call token map applied during
    /// `fixup_column_def_write`.
    fn fn_token_map(&self) -> &'static [(&'static str, &'static str)] {
        &[]
    }

    /// The identifier quote character for this dialect.
    fn quote_char(&self) -> char {
        '"'
    }

    /// Quotes an identifier only when it needs it: a leading non-letter or
    /// embedded whitespace. Plain identifiers pass through unchanged.
    fn format_identifier(&self, id: &str) -> String {
        if id.is_empty() {
            return String::new();
        }
        let first = id.chars().next().unwrap_or(' ');
        if !first.is_alphabetic() || id.contains(char::is_whitespace) {
            let q = self.quote_char();
            format!("{q}{id}{q}")
        } else {
            id.to_string()
        }
    }

    /// Prefixes `schema.` only when a non-empty schema is set, then formats
    /// the identifier.
    fn format_qualified_name(&self, name: &str) -> String {
        let schema = &self.state().schema;
        if schema.is_empty() {
            self.format_identifier(name)
        } else {
            format!("{}.{}", schema, self.format_identifier(name))
        }
    }

    /// Last-chance value narrowing before a destination write. Silent,
    /// except for a one-time diagnostic per narrowing kind per session.
    ///
    /// The stock case: drivers that only hand back a wide integer
    /// representation for a column declared SMALLINT.
    fn coerce_value(&mut self, value: Value, column: usize, target: TypeCode) -> Value {
        match (target, value) {
            (TypeCode::SmallInt, Value::Int(wide)) => {
                if self.state_mut().narrowed.insert(TypeCode::SmallInt) {
                    warn!(
                        column,
                        dialect = self.dialect().name(),
                        "narrowing wide integer values to the declared SMALLINT width"
                    );
                }
                Value::SmallInt(wide as i16)
            }
            (_, v) => v,
        }
    }

    /// Whether the session should wrap the whole table copy in one
    /// transaction on this destination.
    fn needs_transactional_transfer(&self) -> bool {
        false
    }

    /// Opens the transfer bracket on `endpoint`. Best effort: failures are
    /// logged, never raised.
    fn begin_data_transfer(&mut self, endpoint: &mut dyn Endpoint) {
        if self.needs_transactional_transfer() {
            if let Err(e) = endpoint.set_auto_commit(false) {
                warn!(dialect = self.dialect().name(), error = %e,
                      "ignoring failure to disable autocommit for transfer");
            }
        }
    }

    /// Closes the transfer bracket on `endpoint`. Best effort: failures are
    /// logged, never raised.
    fn end_data_transfer(&mut self, endpoint: &mut dyn Endpoint) {
        if self.needs_transactional_transfer() {
            if let Err(e) = endpoint.commit() {
                warn!(dialect = self.dialect().name(), error = %e,
                      "ignoring failure to commit transfer");
            }
            if let Err(e) = endpoint.set_auto_commit(true) {
                warn!(dialect = self.dialect().name(), error = %e,
                      "ignoring failure to restore autocommit after transfer");
            }
        }
    }
}

/// Replaces the first occurrence of each mapped portable token, scanning
/// left to right, one replacement per token per call.
pub(crate) fn translate_fn_tokens(
    def: &str,
    map: &[(&str, &str)],
) -> String {
    let mut out = def.to_string();
    for (portable, native) in map {
        if out.contains(portable) {
            out = out.replacen(portable, native, 1);
        }
    }
    out
}

/// Builds `table_column_seq`, keeping the whole name within the 31-char
/// identifier budget. When it does not fit, the table-name portion is
/// truncated from the left; the `_column_seq` suffix always survives
/// intact. Counted in characters, so multibyte identifiers never split.
pub(crate) fn sequence_name(table: &str, column: &str) -> String {
    let suffix = format!("_{column}_seq");
    let budget = SEQUENCE_NAME_BUDGET.saturating_sub(suffix.chars().count());
    let drop = table.chars().count().saturating_sub(budget);
    let kept: String = table.chars().skip(drop).collect();
    format!("{kept}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_name_selection_is_ordered_substring_match() {
        assert_eq!(
            Dialect::from_product_name("HSQL Database Engine"),
            Dialect::Hsqldb
        );
        assert_eq!(Dialect::from_product_name("PostgreSQL"), Dialect::Postgres);
        assert_eq!(Dialect::from_product_name("Oracle"), Dialect::Oracle);
        assert_eq!(
            Dialect::from_product_name("Informix Dynamic Server"),
            Dialect::Informix
        );
        assert_eq!(Dialect::from_product_name("MonetDB"), Dialect::MonetDb);
        assert_eq!(
            Dialect::from_product_name("Microsoft SQL Server"),
            Dialect::SqlServer
        );
        assert_eq!(Dialect::from_product_name("Unknown DB 3000"), Dialect::Generic);
    }

    #[test]
    fn access_is_a_sql_server_alias() {
        assert_eq!(Dialect::from_product_name("access"), Dialect::SqlServer);
        assert_eq!(Dialect::from_product_name("ACCESS"), Dialect::SqlServer);
        assert_eq!(
            Dialect::from_product_name("Microsoft Access Driver"),
            Dialect::SqlServer
        );
    }

    #[test]
    fn format_identifier_quotes_only_when_needed() {
        let adapter = GenericAdapter::new();
        assert_eq!(adapter.format_identifier(""), "");
        assert_eq!(adapter.format_identifier("plain"), "plain");
        assert_eq!(adapter.format_identifier("has space"), "\"has space\"");
        assert_eq!(adapter.format_identifier("1abc"), "\"1abc\"");
        assert_eq!(adapter.format_identifier("_x"), "\"_x\"");
    }

    #[test]
    fn qualified_name_prefixes_schema_only_when_set() {
        let mut adapter = GenericAdapter::new();
        assert_eq!(adapter.format_qualified_name("EMP"), "EMP");

        adapter.state_mut().schema = "hr".into();
        assert_eq!(adapter.format_qualified_name("EMP"), "hr.EMP");
        assert_eq!(adapter.format_qualified_name("has space"), "hr.\"has space\"");
    }

    #[test]
    fn sequence_name_fits_the_identifier_budget() {
        // Short names pass through untouched.
        assert_eq!(sequence_name("EMP", "ID"), "EMP_ID_seq");

        // 40-char table, 1-char column: exactly 31 chars, suffix intact,
        // table truncated from the left.
        let table = "A".repeat(39) + "Z";
        let name = sequence_name(&table, "X");
        assert_eq!(name.len(), 31);
        assert!(name.ends_with("_X_seq"));
        assert!(name.starts_with('A'));
        assert_eq!(&name[..25], &table[15..]);
    }

    #[test]
    fn sequence_name_truncates_multibyte_names_on_char_boundaries() {
        // Short multibyte names pass through whole.
        let table = "é".repeat(12) + "a";
        assert_eq!(sequence_name(&table, "ID"), format!("{table}_ID_seq"));

        // A long multibyte name truncates without splitting a character.
        let long = "é".repeat(40);
        let name = sequence_name(&long, "X");
        assert_eq!(name.chars().count(), 31);
        assert!(name.ends_with("_X_seq"));
        assert!(name.starts_with('é'));
    }

    #[test]
    fn fn_token_translation_replaces_first_occurrence_only() {
        let map: &[(&str, &str)] = &[("NOW()", "now()")];
        assert_eq!(
            translate_fn_tokens("TIMESTAMP DEFAULT NOW()", map),
            "TIMESTAMP DEFAULT now()"
        );
        assert_eq!(
            translate_fn_tokens("NOW() NOW()", map),
            "now() NOW()"
        );
    }

    #[test]
    fn smallint_narrowing_diagnoses_once_per_session() {
        let mut adapter = GenericAdapter::new();

        for i in 0..50 {
            let v = adapter.coerce_value(Value::Int(40_000 + i), 0, TypeCode::SmallInt);
            assert!(matches!(v, Value::SmallInt(_)));
        }
        assert_eq!(adapter.state().narrowed.len(), 1);

        // Non-narrowing values pass through untouched.
        let v = adapter.coerce_value(Value::Text("x".into()), 1, TypeCode::Varchar);
        assert_eq!(v, Value::Text("x".into()));
    }

    #[test]
    fn adapter_round_trip_holds_for_special_cased_types() {
        // Every dialect that defines both directions for a type must
        // round-trip it: to(from(t)) == t.
        let cases: &[(Dialect, &[TypeCode])] = &[
            (Dialect::Postgres, &[TypeCode::Bit]),
            (Dialect::Oracle, &[TypeCode::Date]),
            (Dialect::Informix, &[TypeCode::Time]),
        ];
        for &(dialect, types) in cases {
            let adapter = dialect.adapter();
            for &t in types {
                assert_eq!(
                    adapter.convert_to_type(adapter.convert_from_type(t)),
                    t,
                    "{} does not round-trip {}",
                    dialect.name(),
                    t.name()
                );
            }
        }
    }
}
