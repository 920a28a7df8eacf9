//! Universal data types for the transfer engine
//!
//! These types provide a normalized representation of relational concepts
//! independent of any one vendor: typed nullable values, column metadata,
//! table identities, and the serializable per-table unit of work.

use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::TypeCode;

/// Unique identifier for a transfer session, used for log correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

/// Universal value representation for one cell of a row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    SmallInt(i16),
    Int(i64),
    Float(f64),
    Numeric(rust_decimal::Decimal),
    Text(String),
    Bytes(#[serde(with = "base64_bytes")] Vec<u8>),
    Date(chrono::NaiveDate),
    Time(chrono::NaiveTime),
    Timestamp(chrono::NaiveDateTime),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD, Engine};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &Vec<u8>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        STANDARD.decode(&s).map_err(serde::de::Error::custom)
    }
}

/// Column metadata captured by introspecting a query result or a
/// connection's catalog. Immutable once captured for a given transfer.
///
/// `portable_type` is the raw portable integer code as the endpoint
/// reported it; callers resolve it through [`TypeCode::from_code`] so a
/// vendor-extension code can fall back to `native_type` text instead of
/// failing the transfer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub name: CompactString,
    pub portable_type: i32,
    /// Vendor-native type text, e.g. `int4` or `NUMBER`.
    pub native_type: CompactString,
    /// Zero-based position in the row.
    pub ordinal: usize,
    pub column_size: i32,
    pub precision: i32,
    pub scale: i32,
    pub nullable: bool,
    pub auto_increment: bool,
    pub default_value: Option<String>,
}

impl ColumnDescriptor {
    pub fn new(
        name: impl Into<CompactString>,
        portable_type: TypeCode,
        native_type: impl Into<CompactString>,
        ordinal: usize,
    ) -> Self {
        Self {
            name: name.into(),
            portable_type: portable_type.code(),
            native_type: native_type.into(),
            ordinal,
            column_size: 0,
            precision: 0,
            scale: 0,
            nullable: true,
            auto_increment: false,
            default_value: None,
        }
    }

    pub fn with_size(mut self, size: i32) -> Self {
        self.column_size = size;
        self
    }

    pub fn with_precision(mut self, precision: i32, scale: i32) -> Self {
        self.precision = precision;
        self.scale = scale;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default_value = Some(default.into());
        self
    }
}

/// Kind of tabular object. System tables, temporaries, aliases and
/// synonyms are ignored during enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableKind {
    Table,
    View,
}

/// Identity of one table on one endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRef {
    pub catalog: Option<String>,
    pub schema: Option<String>,
    pub name: String,
    pub kind: TableKind,
}

impl TableRef {
    pub fn table(name: impl Into<String>) -> Self {
        Self {
            catalog: None,
            schema: None,
            name: name.into(),
            kind: TableKind::Table,
        }
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }
}

/// One column of a portable table definition: the source schema after the
/// source adapter has normalized types and canonicalized auto-increment
/// encodings into the `SERIAL` marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortableColumn {
    pub name: String,
    pub type_code: TypeCode,
    /// Full portable column definition text, e.g. `VARCHAR(20) NOT NULL`
    /// or `SERIAL`.
    pub def: String,
    pub size: i32,
}

/// Vendor-independent table definition produced by schema extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortableTable {
    pub source: TableRef,
    pub columns: Vec<PortableColumn>,
    pub primary_key: Vec<String>,
}

/// Generated destination statements for one table, plus per-statement
/// enable flags. Accumulated during DDL generation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransferStatements {
    pub source_select: String,
    pub dest_drop: String,
    pub dest_create: String,
    pub dest_delete: String,
    pub dest_insert: String,
    /// Statements to run before the CREATE, e.g. sequence declarations.
    pub dest_setup: Vec<String>,
    /// Deferred teardown, e.g. `DROP SEQUENCE`, run before the table drop.
    pub dest_teardown: Vec<String>,
    pub run_drop: bool,
    pub run_create: bool,
    pub run_delete: bool,
    pub run_transfer: bool,
}

/// The unit of work: one source table paired with one destination table,
/// plus the statements generated for it.
///
/// Serializable on its own — it carries no live connection state, so the
/// configuration layer can persist an ordered list of these and rehydrate
/// endpoints separately at load time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferTable {
    pub source: TableRef,
    pub dest_schema: Option<String>,
    pub dest_name: String,
    pub stmts: TransferStatements,
}

impl TransferTable {
    /// Pairs a source table with a same-named destination table, with every
    /// step enabled.
    pub fn new(source: TableRef) -> Self {
        let dest_name = source.name.clone();
        Self::with_dest(source, dest_name)
    }

    pub fn with_dest(source: TableRef, dest_name: impl Into<String>) -> Self {
        Self {
            source,
            dest_schema: None,
            dest_name: dest_name.into(),
            stmts: TransferStatements {
                run_drop: true,
                run_create: true,
                run_delete: true,
                run_transfer: true,
                ..TransferStatements::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transfer_table_serializes_without_connection_state() {
        let mut t = TransferTable::new(TableRef::table("EMP").with_schema("hr"));
        t.stmts.dest_create = "CREATE TABLE EMP(ID INTEGER)".into();
        t.stmts.dest_teardown.push("DROP SEQUENCE EMP_ID_seq".into());

        let json = serde_json::to_string(&t).unwrap();
        let back: TransferTable = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
    }

    #[test]
    fn value_bytes_serialize_as_base64_text() {
        let v = Value::Bytes(vec![0, 1, 254, 255]);
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, "\"AAH+/w==\"");
    }
}
