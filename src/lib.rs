// SPDX-License-Identifier: Apache-2.0

//! sqlporter - cross-vendor schema and data transfer engine
//!
//! Moves one table at a time between relational databases that share a
//! tabular query interface but disagree on SQL dialect, identifier quoting,
//! type systems, and transactional behavior. The crate normalizes those
//! differences through per-dialect [`vendors::VendorAdapter`] implementations,
//! buffers source rows in a replayable [`rowset::RowSet`], and drives the
//! whole copy through a [`session::TransferSession`].
//!
//! Live connections are consumed through the [`endpoint::Endpoint`] trait;
//! the crate never implements a wire protocol itself. The one in-tree
//! endpoint, [`script::ScriptEndpoint`], renders a transfer as a SQL script.

pub mod catalog;
pub mod endpoint;
pub mod error;
pub mod rowset;
pub mod script;
pub mod session;
pub mod types;
pub mod vendors;

pub use catalog::TypeCode;
pub use endpoint::Endpoint;
pub use error::{TransferError, TransferResult};
pub use rowset::RowSet;
pub use script::ScriptEndpoint;
pub use session::{SessionPhase, TransferSession};
pub use types::{
    ColumnDescriptor, PortableColumn, PortableTable, TableKind, TableRef, TransferStatements,
    TransferTable, Value,
};
pub use vendors::{Dialect, VendorAdapter};
