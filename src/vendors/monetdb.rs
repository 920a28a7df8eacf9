//! MonetDB-family adapter (columnar engine).
//!
//! Columnar stores pay per-statement overhead on row-at-a-time loads, so
//! the whole copy runs inside one transaction. `SERIAL` is native.

use super::{AdapterState, Dialect, VendorAdapter};

pub struct MonetDbAdapter {
    state: AdapterState,
}

impl MonetDbAdapter {
    pub fn new() -> Self {
        Self {
            state: AdapterState::default(),
        }
    }
}

impl VendorAdapter for MonetDbAdapter {
    fn dialect(&self) -> Dialect {
        Dialect::MonetDb
    }

    fn state(&self) -> &AdapterState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut AdapterState {
        &mut self.state
    }

    fn fn_token_map(&self) -> &'static [(&'static str, &'static str)] {
        &[("NOW()", "now()")]
    }

    fn needs_transactional_transfer(&self) -> bool {
        true
    }
}
