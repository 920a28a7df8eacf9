//! Generic passthrough adapter for unrecognized products.

use super::{AdapterState, Dialect, VendorAdapter};

/// Default adapter: no type remapping, no DDL fixups, per-row autocommit.
pub struct GenericAdapter {
    state: AdapterState,
}

impl GenericAdapter {
    pub fn new() -> Self {
        Self {
            state: AdapterState::default(),
        }
    }
}

impl Default for GenericAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl VendorAdapter for GenericAdapter {
    fn dialect(&self) -> Dialect {
        Dialect::Generic
    }

    fn state(&self) -> &AdapterState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut AdapterState {
        &mut self.state
    }
}
