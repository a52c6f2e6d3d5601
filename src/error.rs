// CLASSIFICATION: COMMUNITY
// Filename: error.rs v0.2
// Author: Lukas Bower
// Date Modified: 2027-07-19

//! Error taxonomy for the diagnostics registry.
//!
//! Structural variants (`ScopeAlreadyLive`, `DuplicateScope`,
//! `IndexOutOfRange`) indicate lifecycle ordering bugs in the embedding
//! driver; they are logged loudly at the point of detection. `ReadOnlyEndpoint`
//! and `EndpointNotFound` are ordinary caller-visible outcomes. Malformed
//! apply payloads are deliberately *not* errors: the write is consumed as a
//! no-op and the transport count reported, matching the driver's tolerant
//! command handling.

use thiserror::Error;

use crate::table::ScopeKind;
use crate::transport::TransportError;

/// Errors surfaced by registry lifecycle and endpoint dispatch operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A scope was created twice. Creation of an already-live scope is a
    /// programming error in the caller's lifecycle ordering.
    #[error("scope already live at {0}")]
    ScopeAlreadyLive(String),
    /// An interface scope was registered under a name already present.
    #[error("duplicate interface scope {0:?}")]
    DuplicateScope(String),
    /// A child scope create was attempted while its parent scope is absent.
    #[error("parent scope not live")]
    ParentNotLive,
    /// Dispatch resolved an index outside the descriptor table. Endpoints
    /// created through the lifecycle manager can never trigger this.
    #[error("endpoint index {index} out of range for {kind} table of {len}")]
    IndexOutOfRange {
        /// Scope kind whose table was consulted.
        kind: ScopeKind,
        /// Offending index.
        index: usize,
        /// Table length at dispatch time.
        len: usize,
    },
    /// Write attempted against an endpoint declaring no apply handler.
    #[error("read-only endpoint {0:?}")]
    ReadOnlyEndpoint(&'static str),
    /// Dispatch against a scope that has been torn down, or a rename of an
    /// interface name that was never registered.
    #[error("endpoint not found")]
    EndpointNotFound,
    /// Failure reported by the underlying transport.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}
