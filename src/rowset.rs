// SPDX-License-Identifier: Apache-2.0

//! Buffered result cursor
//!
//! An in-memory, replayable materialization of tabular rows, decoupled from
//! the connection that produced them. A live query result is materialized
//! eagerly — trading memory for the ability to reset and replay, and for
//! outliving the source cursor. Rows can also be appended programmatically,
//! in which case the first row fixes the column count and type vector for
//! the lifetime of the buffer.
//!
//! Column accessors are defined only while the cursor is positioned on a
//! row; out of range they return `None`/`0` sentinels and never panic.

use compact_str::CompactString;

use crate::catalog::TypeCode;
use crate::error::{TransferError, TransferResult};
use crate::types::{ColumnDescriptor, Value};

/// Buffer lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BufferState {
    /// No column metadata established yet.
    Empty,
    /// Columns fixed, rows still appendable.
    Populating,
    /// Iteration has begun.
    Ready,
}

#[derive(Debug, Clone, PartialEq)]
struct RowSetColumn {
    name: CompactString,
    type_code: TypeCode,
}

/// In-memory, randomly-replayable tabular buffer.
#[derive(Debug, Clone)]
pub struct RowSet {
    columns: Vec<RowSetColumn>,
    rows: Vec<Vec<Value>>,
    /// 0 = before first, 1..=N on a row, N+1 = after last.
    pos: usize,
    state: BufferState,
}

impl RowSet {
    /// An empty buffer; columns are fixed by the first appended row.
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
            pos: 0,
            state: BufferState::Empty,
        }
    }

    /// Materializes a full result: column metadata plus every row.
    ///
    /// Fails with `SchemaMismatch` if any row's width differs from the
    /// descriptor list.
    pub fn from_parts(
        columns: &[ColumnDescriptor],
        rows: Vec<Vec<Value>>,
    ) -> TransferResult<Self> {
        let cols: Vec<RowSetColumn> = columns
            .iter()
            .map(|c| RowSetColumn {
                name: c.name.clone(),
                type_code: TypeCode::from_code(c.portable_type).unwrap_or(TypeCode::Other),
            })
            .collect();

        for (i, row) in rows.iter().enumerate() {
            if row.len() != cols.len() {
                return Err(TransferError::schema_mismatch(format!(
                    "row {} has {} values, buffer has {} columns",
                    i + 1,
                    row.len(),
                    cols.len()
                )));
            }
        }

        Ok(Self {
            columns: cols,
            rows,
            pos: 0,
            state: BufferState::Ready,
        })
    }

    /// Appends one row. The first row establishes the column count and type
    /// vector; every later row must match both exactly.
    pub fn add_row(&mut self, types: &[TypeCode], values: Vec<Value>) -> TransferResult<()> {
        if values.len() != types.len() {
            return Err(TransferError::schema_mismatch(format!(
                "{} values for {} declared types",
                values.len(),
                types.len()
            )));
        }

        match self.state {
            BufferState::Empty => {
                self.columns = types
                    .iter()
                    .enumerate()
                    .map(|(i, &t)| RowSetColumn {
                        name: CompactString::from(format!("C{}", i + 1)),
                        type_code: t,
                    })
                    .collect();
                self.state = BufferState::Populating;
            }
            BufferState::Populating | BufferState::Ready => {
                if types.len() != self.columns.len() {
                    return Err(TransferError::schema_mismatch(format!(
                        "row has {} columns, buffer has {}",
                        types.len(),
                        self.columns.len()
                    )));
                }
                for (i, (&t, col)) in types.iter().zip(self.columns.iter()).enumerate() {
                    if t != col.type_code {
                        return Err(TransferError::schema_mismatch(format!(
                            "column {} is {} in the buffer but the row declares {}",
                            i + 1,
                            col.type_code.name(),
                            t.name()
                        )));
                    }
                }
            }
        }

        self.rows.push(values);
        Ok(())
    }

    /// Advances the cursor; returns whether it now sits on a row.
    pub fn next(&mut self) -> bool {
        if self.state == BufferState::Populating {
            self.state = BufferState::Ready;
        }
        if self.pos <= self.rows.len() {
            self.pos += 1;
        }
        self.pos <= self.rows.len()
    }

    /// Rewinds to before the first row for a replay.
    pub fn reset(&mut self) {
        self.pos = 0;
    }

    /// High-water mark: rows materialized so far.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Column count, or 0 when the cursor is not on a row.
    pub fn column_count(&self) -> usize {
        if self.on_row() {
            self.columns.len()
        } else {
            0
        }
    }

    /// Column name at `idx`, or `None` when off-row or out of bounds.
    pub fn column_name(&self, idx: usize) -> Option<&str> {
        if self.on_row() {
            self.columns.get(idx).map(|c| c.name.as_str())
        } else {
            None
        }
    }

    /// Column type at `idx`, or `None` when off-row or out of bounds.
    pub fn column_type(&self, idx: usize) -> Option<TypeCode> {
        if self.on_row() {
            self.columns.get(idx).map(|c| c.type_code)
        } else {
            None
        }
    }

    /// Value at `idx` in the current row, or `None` when off-row or out of
    /// bounds.
    pub fn value_at(&self, idx: usize) -> Option<&Value> {
        if self.on_row() {
            self.rows[self.pos - 1].get(idx)
        } else {
            None
        }
    }

    fn on_row(&self) -> bool {
        self.pos >= 1 && self.pos <= self.rows.len()
    }
}

impl Default for RowSet {
    fn default() -> Self {
        Self::new()
    }
}
