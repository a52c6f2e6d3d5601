// CLASSIFICATION: COMMUNITY
// Filename: lib.rs v0.3
// Author: Lukas Bower
// Date Modified: 2027-08-02

//! Hierarchical diagnostics/control file tree for a wlan driver.
//!
//! `diagfs` exposes runtime driver state (counters, register windows, the
//! security CAM cache, tunable algorithm parameters) as a tree of named
//! endpoints. The tree mirrors the driver object lifecycle: one driver scope
//! per registry handle, one interface scope per managed adapter, and a nested
//! `dm` scope per interface for the dynamic-mechanism subsystem.
//!
//! Every endpoint is a `(dump, apply)` handler pair declared in a static
//! table per scope kind. A single dispatcher serves all endpoints by table
//! index, so adding an endpoint is one table entry and two functions.
//!
//! # Public Surface
//! * [`DiagRegistry`] – lifecycle handle (init/deinit, interface
//!   register/unregister/rename).
//! * [`Transport`] / [`MemTransport`] – the narrow contract turning scopes
//!   into a listable tree, plus the in-memory implementation.
//! * [`catalog`] – the declared endpoint listing per [`ScopeKind`].
//! * [`state`] – the driver/adapter context types endpoints operate against.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod dispatch;
pub mod error;
pub mod parse;
pub mod registry;
pub mod scope;
pub mod state;
pub mod table;
pub mod tables;
pub mod transport;

pub use dispatch::{ApplyOutcome, APPLY_INPUT_MAX};
pub use error::RegistryError;
pub use registry::DiagRegistry;
pub use table::{EndpointDescriptor, EndpointTable, ScopeKind};
pub use tables::catalog;
pub use transport::{LeafIo, MemTransport, Transport, TransportError};
