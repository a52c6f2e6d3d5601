// CLASSIFICATION: COMMUNITY
// Filename: tables/mod.rs v0.3
// Author: Lukas Bower
// Date Modified: 2027-08-02

//! The three concrete endpoint tables.
//!
//! Tables are built once through `Lazy`; optional endpoint groups are
//! composed in at construction behind cargo features, mirroring the driver's
//! conditional build configuration. Handler bodies live beside their table.

mod adapter;
mod dm;
mod driver;

use std::fmt;

pub use adapter::ADAPTER_TABLE;
pub use dm::DM_TABLE;
pub use driver::DRIVER_TABLE;

use crate::table::ScopeKind;

/// The declared `(name, writable)` listing for a scope kind.
pub fn catalog(kind: ScopeKind) -> Vec<(&'static str, bool)> {
    match kind {
        ScopeKind::Driver => DRIVER_TABLE.catalog(),
        ScopeKind::Interface => ADAPTER_TABLE.catalog(),
        ScopeKind::DynamicMechanism => DM_TABLE.catalog(),
    }
}

/// Dump handler for endpoints that exist only for their apply side.
pub(crate) fn dump_none<C>(_: &C, _: &mut String) -> fmt::Result {
    Ok(())
}
