// SPDX-License-Identifier: Apache-2.0

//! Portable type catalog
//!
//! Maps database-portable integer type codes to canonical names and back.
//! Vendor adapters use this as their fallback vocabulary: every portable
//! code has a canonical name reachable in both directions, and a miss in
//! either direction fails with [`TransferError::UnknownType`].
//!
//! Pure lookup table with no side effects; safe for concurrent read-only
//! use from any number of transfer sessions.

use serde::{Deserialize, Serialize};

use crate::error::{TransferError, TransferResult};

/// Database-portable classification of a column's logical type.
///
/// The integer codes follow the portable SQL metadata convention, so
/// endpoints built on top of standard driver metadata can report them
/// unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeCode {
    Bit,
    TinyInt,
    SmallInt,
    Integer,
    BigInt,
    Float,
    Real,
    Double,
    Numeric,
    Decimal,
    Char,
    Varchar,
    LongVarchar,
    Date,
    Time,
    Timestamp,
    Binary,
    Varbinary,
    LongVarbinary,
    Null,
    Boolean,
    Blob,
    Clob,
    Array,
    Struct,
    Ref,
    Distinct,
    Object,
    Other,
}

/// Every portable type code, in catalog order.
pub const ALL_TYPES: &[TypeCode] = &[
    TypeCode::Bit,
    TypeCode::TinyInt,
    TypeCode::SmallInt,
    TypeCode::Integer,
    TypeCode::BigInt,
    TypeCode::Float,
    TypeCode::Real,
    TypeCode::Double,
    TypeCode::Numeric,
    TypeCode::Decimal,
    TypeCode::Char,
    TypeCode::Varchar,
    TypeCode::LongVarchar,
    TypeCode::Date,
    TypeCode::Time,
    TypeCode::Timestamp,
    TypeCode::Binary,
    TypeCode::Varbinary,
    TypeCode::LongVarbinary,
    TypeCode::Null,
    TypeCode::Boolean,
    TypeCode::Blob,
    TypeCode::Clob,
    TypeCode::Array,
    TypeCode::Struct,
    TypeCode::Ref,
    TypeCode::Distinct,
    TypeCode::Object,
    TypeCode::Other,
];

impl TypeCode {
    /// The portable integer code for this type.
    pub const fn code(self) -> i32 {
        match self {
            TypeCode::Bit => -7,
            TypeCode::TinyInt => -6,
            TypeCode::BigInt => -5,
            TypeCode::LongVarbinary => -4,
            TypeCode::Varbinary => -3,
            TypeCode::Binary => -2,
            TypeCode::LongVarchar => -1,
            TypeCode::Null => 0,
            TypeCode::Char => 1,
            TypeCode::Numeric => 2,
            TypeCode::Decimal => 3,
            TypeCode::Integer => 4,
            TypeCode::SmallInt => 5,
            TypeCode::Float => 6,
            TypeCode::Real => 7,
            TypeCode::Double => 8,
            TypeCode::Varchar => 12,
            TypeCode::Boolean => 16,
            TypeCode::Date => 91,
            TypeCode::Time => 92,
            TypeCode::Timestamp => 93,
            TypeCode::Other => 1111,
            TypeCode::Object => 2000,
            TypeCode::Distinct => 2001,
            TypeCode::Struct => 2002,
            TypeCode::Array => 2003,
            TypeCode::Blob => 2004,
            TypeCode::Clob => 2005,
            TypeCode::Ref => 2006,
        }
    }

    /// The canonical name for this type.
    pub const fn name(self) -> &'static str {
        match self {
            TypeCode::Bit => "BIT",
            TypeCode::TinyInt => "TINYINT",
            TypeCode::SmallInt => "SMALLINT",
            TypeCode::Integer => "INTEGER",
            TypeCode::BigInt => "BIGINT",
            TypeCode::Float => "FLOAT",
            TypeCode::Real => "REAL",
            TypeCode::Double => "DOUBLE",
            TypeCode::Numeric => "NUMERIC",
            TypeCode::Decimal => "DECIMAL",
            TypeCode::Char => "CHAR",
            TypeCode::Varchar => "VARCHAR",
            TypeCode::LongVarchar => "LONGVARCHAR",
            TypeCode::Date => "DATE",
            TypeCode::Time => "TIME",
            TypeCode::Timestamp => "TIMESTAMP",
            TypeCode::Binary => "BINARY",
            TypeCode::Varbinary => "VARBINARY",
            TypeCode::LongVarbinary => "LONGVARBINARY",
            TypeCode::Null => "NULL",
            TypeCode::Boolean => "BOOLEAN",
            TypeCode::Blob => "BLOB",
            TypeCode::Clob => "CLOB",
            TypeCode::Array => "ARRAY",
            TypeCode::Struct => "STRUCT",
            TypeCode::Ref => "REF",
            TypeCode::Distinct => "DISTINCT",
            TypeCode::Object => "OBJECT",
            TypeCode::Other => "OTHER",
        }
    }

    /// Looks up a portable integer code.
    pub fn from_code(code: i32) -> TransferResult<Self> {
        ALL_TYPES
            .iter()
            .copied()
            .find(|t| t.code() == code)
            .ok_or_else(|| TransferError::unknown_type(format!("code {code}")))
    }

    /// Looks up a canonical name, case-insensitively.
    pub fn from_name(name: &str) -> TransferResult<Self> {
        ALL_TYPES
            .iter()
            .copied()
            .find(|t| t.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| TransferError::unknown_type(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_lookup_round_trips_for_every_type() {
        for &t in ALL_TYPES {
            assert_eq!(TypeCode::from_code(t.code()).unwrap(), t);
        }
    }

    #[test]
    fn name_lookup_round_trips_for_every_type() {
        for &t in ALL_TYPES {
            assert_eq!(TypeCode::from_name(t.name()).unwrap(), t);
        }
    }

    #[test]
    fn name_lookup_is_case_insensitive() {
        assert_eq!(TypeCode::from_name("varchar").unwrap(), TypeCode::Varchar);
        assert_eq!(TypeCode::from_name("Timestamp").unwrap(), TypeCode::Timestamp);
    }

    #[test]
    fn unknown_code_and_name_fail() {
        assert!(matches!(
            TypeCode::from_code(424242),
            Err(TransferError::UnknownType { .. })
        ));
        assert!(matches!(
            TypeCode::from_name("FANCYTYPE"),
            Err(TransferError::UnknownType { .. })
        ));
    }
}
