// SPDX-License-Identifier: Apache-2.0

//! Normalized error types for the transfer engine
//!
//! Endpoint- and adapter-level failures are mapped to these unified error
//! types so the transfer session can decide what is fatal to a table copy
//! versus the whole batch.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for all transfer operations
#[derive(Debug, Error, Serialize, Deserialize)]
pub enum TransferError {
    /// The endpoint's connection is unusable. Fatal to the session.
    #[error("connection error: {message}")]
    Connection { message: String },

    /// A row's shape is inconsistent with the buffer's established columns.
    /// Fatal to the current buffer.
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// Type catalog miss. Recoverable by falling back to the vendor-native
    /// type text.
    #[error("unknown portable type: {name}")]
    UnknownType { name: String },

    /// Wraps an underlying query/DDL/DML failure with table and operation
    /// context. Fatal to the current table transfer, not to the batch.
    #[error("data access error on {table} ({operation}): {message}")]
    DataAccess {
        table: String,
        operation: String,
        message: String,
    },
}

impl TransferError {
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection { message: msg.into() }
    }

    pub fn schema_mismatch(msg: impl Into<String>) -> Self {
        Self::SchemaMismatch { message: msg.into() }
    }

    pub fn unknown_type(name: impl Into<String>) -> Self {
        Self::UnknownType { name: name.into() }
    }

    pub fn data_access(
        table: impl Into<String>,
        operation: impl Into<String>,
        msg: impl std::fmt::Display,
    ) -> Self {
        Self::DataAccess {
            table: table.into(),
            operation: operation.into(),
            message: msg.to_string(),
        }
    }
}

/// Result type alias for transfer operations
pub type TransferResult<T> = Result<T, TransferError>;
