// CLASSIFICATION: COMMUNITY
// Filename: table.rs v0.3
// Author: Lukas Bower
// Date Modified: 2027-07-19

//! Endpoint descriptor tables.
//!
//! A table is an ordered, immutable sequence of `(name, dump, apply)`
//! descriptors declared once per scope kind. Conditional endpoints are
//! included or omitted when the table is built (cargo features), never by
//! mutating a table afterwards. The dispatcher resolves descriptors by index;
//! name lookup exists only for registration-time use and tests.

use std::fmt;

use crate::dispatch::ApplyOutcome;

/// The three scope kinds in the diagnostics tree.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    /// Process-wide driver scope, one per registry handle.
    Driver,
    /// Per-adapter interface scope, keyed by interface name.
    Interface,
    /// Nested per-interface dynamic-mechanism scope.
    DynamicMechanism,
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeKind::Driver => write!(f, "driver"),
            ScopeKind::Interface => write!(f, "interface"),
            ScopeKind::DynamicMechanism => write!(f, "dm"),
        }
    }
}

/// Read-side handler: render a textual snapshot of context state.
pub type DumpFn<C> = fn(&C, &mut String) -> fmt::Result;

/// Write-side handler: parse a small textual command and act on context
/// state. Returns whether the command took effect; malformed input is an
/// [`ApplyOutcome::Ignored`] no-op by contract.
pub type ApplyFn<C> = fn(&C, &[u8]) -> ApplyOutcome;

/// One named endpoint: a dump handler and an optional apply handler.
pub struct EndpointDescriptor<C> {
    /// Endpoint name, unique within its table.
    pub name: &'static str,
    /// Read-side handler.
    pub dump: DumpFn<C>,
    /// Write-side handler, absent for read-only endpoints.
    pub apply: Option<ApplyFn<C>>,
}

impl<C> EndpointDescriptor<C> {
    /// Declare a read-only endpoint.
    pub fn read_only(name: &'static str, dump: DumpFn<C>) -> Self {
        Self {
            name,
            dump,
            apply: None,
        }
    }

    /// Declare a readable and writable endpoint.
    pub fn read_write(name: &'static str, dump: DumpFn<C>, apply: ApplyFn<C>) -> Self {
        Self {
            name,
            dump,
            apply: Some(apply),
        }
    }

    /// Whether the endpoint accepts writes.
    pub fn writable(&self) -> bool {
        self.apply.is_some()
    }
}

/// Ordered, immutable descriptor sequence for one scope kind.
pub struct EndpointTable<C> {
    entries: Vec<EndpointDescriptor<C>>,
}

impl<C> EndpointTable<C> {
    /// Build a table from its descriptors. Names must be unique.
    pub fn new(entries: Vec<EndpointDescriptor<C>>) -> Self {
        debug_assert!(
            entries
                .iter()
                .all(|e| entries.iter().filter(|o| o.name == e.name).count() == 1),
            "duplicate endpoint name in table"
        );
        Self { entries }
    }

    /// Number of declared endpoints.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table declares no endpoints.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Descriptor at `index`, if in range.
    pub fn get(&self, index: usize) -> Option<&EndpointDescriptor<C>> {
        self.entries.get(index)
    }

    /// Registration-time name lookup. Not used on the dispatch path.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name == name)
    }

    /// Iterate descriptors in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &EndpointDescriptor<C>> {
        self.entries.iter()
    }

    /// The `(name, writable)` listing for documentation and tests.
    pub fn catalog(&self) -> Vec<(&'static str, bool)> {
        self.entries.iter().map(|e| (e.name, e.writable())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dump_a(_: &u32, out: &mut String) -> fmt::Result {
        out.push('a');
        Ok(())
    }

    fn apply_a(_: &u32, _: &[u8]) -> ApplyOutcome {
        ApplyOutcome::Applied
    }

    #[test]
    fn catalog_reports_write_capability() {
        let table = EndpointTable::new(vec![
            EndpointDescriptor::read_only("ver", dump_a),
            EndpointDescriptor::read_write("level", dump_a, apply_a),
        ]);
        assert_eq!(table.catalog(), vec![("ver", false), ("level", true)]);
        assert_eq!(table.position("level"), Some(1));
        assert_eq!(table.position("missing"), None);
    }

    #[test]
    #[should_panic(expected = "duplicate endpoint name")]
    fn duplicate_names_rejected() {
        let _ = EndpointTable::new(vec![
            EndpointDescriptor::read_only("ver", dump_a),
            EndpointDescriptor::read_only("ver", dump_a),
        ]);
    }
}
