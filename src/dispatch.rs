// CLASSIFICATION: COMMUNITY
// Filename: dispatch.rs v0.3
// Author: Lukas Bower
// Date Modified: 2027-08-02

//! Shared endpoint dispatcher.
//!
//! One dispatcher implementation serves all three scope kinds. Each live
//! endpoint is an [`EndpointBinding`]: an index into its scope's descriptor
//! table plus a shared handle to the scope core (table, context, liveness
//! gate). Read traffic renders the dump handler into a text sink; write
//! traffic runs the apply handler over a bounded input window.
//!
//! Teardown discipline: destroy flips the liveness flag under the write lock,
//! so it waits out in-flight dispatch, and the context is `Arc`-owned, so a
//! dispatch that raced teardown still holds valid memory and merely reports
//! the endpoint gone.

use std::sync::{Arc, RwLock};

use log::{debug, warn};

use crate::error::RegistryError;
use crate::table::{EndpointTable, ScopeKind};
use crate::transport::LeafIo;

/// Apply handlers inspect at most this many leading bytes of a write
/// payload; the rest is accepted but ignored, as the original driver's fixed
/// command buffer did.
pub const APPLY_INPUT_MAX: usize = 32;

/// Outcome of an apply handler. `Ignored` means the payload was consumed but
/// did not parse as a valid command; the write still reports its byte count.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The command parsed and took effect.
    Applied,
    /// The payload was consumed as a no-op.
    Ignored,
}

/// Shared state of one live scope: its table, bound context, and liveness.
pub struct ScopeCore<C: 'static> {
    kind: ScopeKind,
    table: &'static EndpointTable<C>,
    ctx: Arc<C>,
    live: RwLock<bool>,
}

impl<C> ScopeCore<C> {
    /// Bind a table and context for a new scope.
    pub fn new(kind: ScopeKind, table: &'static EndpointTable<C>, ctx: Arc<C>) -> Self {
        Self {
            kind,
            table,
            ctx,
            live: RwLock::new(true),
        }
    }

    /// The scope kind the core was created for.
    pub fn kind(&self) -> ScopeKind {
        self.kind
    }

    /// The context bound at creation time.
    pub fn ctx(&self) -> &Arc<C> {
        &self.ctx
    }

    /// Whether the scope is still live.
    pub fn is_live(&self) -> bool {
        *self.live.read().expect("poisoned scope liveness lock")
    }

    /// Mark the scope dead. Waits for in-flight dispatch to drain. Returns
    /// whether the call transitioned the scope out of the live state.
    pub fn retire(&self) -> bool {
        let mut live = self.live.write().expect("poisoned scope liveness lock");
        std::mem::replace(&mut *live, false)
    }
}

/// Binding of one descriptor index to one scope core. Implements the leaf
/// I/O hook handed to the transport at endpoint creation.
pub struct EndpointBinding<C: 'static> {
    core: Arc<ScopeCore<C>>,
    index: usize,
}

impl<C> EndpointBinding<C> {
    /// Bind descriptor `index` of the core's table.
    pub fn new(core: Arc<ScopeCore<C>>, index: usize) -> Self {
        Self { core, index }
    }

    fn resolve(&self) -> Result<&'static crate::table::EndpointDescriptor<C>, RegistryError> {
        self.core.table.get(self.index).ok_or_else(|| {
            warn!(
                "endpoint index {} out of range for {} table",
                self.index,
                self.core.kind()
            );
            RegistryError::IndexOutOfRange {
                kind: self.core.kind(),
                index: self.index,
                len: self.core.table.len(),
            }
        })
    }
}

impl<C: Send + Sync + 'static> LeafIo for EndpointBinding<C> {
    fn read(&self) -> Result<Vec<u8>, RegistryError> {
        let live = self.core.live.read().expect("poisoned scope liveness lock");
        if !*live {
            return Err(RegistryError::EndpointNotFound);
        }
        let desc = self.resolve()?;
        let mut out = String::new();
        if (desc.dump)(self.core.ctx(), &mut out).is_err() {
            // Dump failures must not crash the caller; serve what rendered.
            warn!("dump handler {:?} failed mid-render", desc.name);
        }
        Ok(out.into_bytes())
    }

    fn write(&self, data: &[u8]) -> Result<usize, RegistryError> {
        let live = self.core.live.read().expect("poisoned scope liveness lock");
        if !*live {
            return Err(RegistryError::EndpointNotFound);
        }
        let desc = self.resolve()?;
        let apply = desc
            .apply
            .ok_or(RegistryError::ReadOnlyEndpoint(desc.name))?;
        let window = &data[..data.len().min(APPLY_INPUT_MAX)];
        if apply(self.core.ctx(), window) == ApplyOutcome::Ignored {
            debug!("apply {:?}: payload ignored as no-op", desc.name);
        }
        Ok(data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::EndpointDescriptor;
    use once_cell::sync::Lazy;
    use std::fmt;

    struct Ctx {
        hits: std::sync::atomic::AtomicU32,
    }

    fn dump_hits(ctx: &Ctx, out: &mut String) -> fmt::Result {
        use std::fmt::Write;
        writeln!(
            out,
            "hits={}",
            ctx.hits.load(std::sync::atomic::Ordering::Relaxed)
        )
    }

    fn apply_bump(ctx: &Ctx, data: &[u8]) -> ApplyOutcome {
        match crate::parse::as_text(data).and_then(crate::parse::first_dec_u32) {
            Some(n) => {
                ctx.hits
                    .fetch_add(n, std::sync::atomic::Ordering::Relaxed);
                ApplyOutcome::Applied
            }
            None => ApplyOutcome::Ignored,
        }
    }

    static TABLE: Lazy<EndpointTable<Ctx>> = Lazy::new(|| {
        EndpointTable::new(vec![
            EndpointDescriptor::read_write("hits", dump_hits, apply_bump),
            EndpointDescriptor::read_only("hits_ro", dump_hits),
        ])
    });

    fn core() -> Arc<ScopeCore<Ctx>> {
        Arc::new(ScopeCore::new(
            ScopeKind::Driver,
            &TABLE,
            Arc::new(Ctx {
                hits: std::sync::atomic::AtomicU32::new(0),
            }),
        ))
    }

    #[test]
    fn read_after_write_reflects_context() {
        let core = core();
        let ep = EndpointBinding::new(core, 0);
        assert_eq!(ep.write(b"3\n").expect("write"), 2);
        assert_eq!(ep.read().expect("read"), b"hits=3\n");
    }

    #[test]
    fn malformed_payload_consumed_as_noop() {
        let core = core();
        let ep = EndpointBinding::new(core, 0);
        assert_eq!(ep.write(b"not a number").expect("write"), 12);
        assert_eq!(ep.read().expect("read"), b"hits=0\n");
    }

    #[test]
    fn oversized_payload_truncated_but_counted() {
        let core = core();
        let ep = EndpointBinding::new(core, 0);
        let payload = vec![b'9'; 200];
        assert_eq!(ep.write(&payload).expect("write"), 200);
    }

    #[test]
    fn read_only_endpoint_rejects_write() {
        let core = core();
        let ep = EndpointBinding::new(core.clone(), 1);
        assert!(matches!(
            ep.write(b"1"),
            Err(RegistryError::ReadOnlyEndpoint("hits_ro"))
        ));
        assert_eq!(ep.read().expect("read"), b"hits=0\n");
    }

    #[test]
    fn retired_scope_reports_endpoint_gone() {
        let core = core();
        let ep = EndpointBinding::new(core.clone(), 0);
        assert!(core.retire());
        assert!(!core.retire());
        assert!(matches!(ep.read(), Err(RegistryError::EndpointNotFound)));
        assert!(matches!(
            ep.write(b"1"),
            Err(RegistryError::EndpointNotFound)
        ));
    }

    #[test]
    fn out_of_range_index_is_fatal_to_request() {
        let ep = EndpointBinding::new(core(), 99);
        assert!(matches!(
            ep.read(),
            Err(RegistryError::IndexOutOfRange { index: 99, .. })
        ));
    }
}
