// CLASSIFICATION: COMMUNITY
// Filename: scope.rs v0.4
// Author: Lukas Bower
// Date Modified: 2027-08-02

//! Scope node lifecycle: create with rollback, destroy in reverse order.
//!
//! A scope materializes one descriptor table under one directory. Creation
//! makes the directory, then every leaf in table order; any leaf failure
//! removes everything already created before the error is surfaced, so a
//! partial scope is never left listable. Destruction retires the dispatch
//! core first (waiting out in-flight reads/writes), then removes leaves in
//! reverse creation order, then the directory.

use std::sync::Arc;

use log::{debug, info, warn};

use crate::dispatch::{EndpointBinding, ScopeCore};
use crate::error::RegistryError;
use crate::table::{EndpointTable, ScopeKind};
use crate::transport::Transport;

fn join(parent: &str, name: &str) -> String {
    if parent == "/" {
        format!("/{}", name)
    } else {
        format!("{}/{}", parent, name)
    }
}

/// One live scope node and the endpoints it owns.
pub struct Scope<C: 'static> {
    core: Arc<ScopeCore<C>>,
    dir: String,
    leaves: Vec<String>,
}

impl<C> std::fmt::Debug for Scope<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scope")
            .field("dir", &self.dir)
            .field("leaves", &self.leaves)
            .finish_non_exhaustive()
    }
}

impl<C: Send + Sync + 'static> Scope<C> {
    /// Create the scope directory under `parent` and materialize every
    /// endpoint the table declares. Rolls back on any failure.
    pub fn create(
        transport: &Arc<dyn Transport>,
        parent: &str,
        name: &str,
        kind: ScopeKind,
        table: &'static EndpointTable<C>,
        ctx: Arc<C>,
    ) -> Result<Self, RegistryError> {
        let dir = join(parent, name);
        if let Err(err) = transport.make_dir(&dir) {
            warn!("{} scope create failed at {}: {}", kind, dir, err);
            return Err(match err {
                crate::transport::TransportError::AlreadyExists(path) => {
                    RegistryError::ScopeAlreadyLive(path)
                }
                other => RegistryError::Transport(other),
            });
        }
        let core = Arc::new(ScopeCore::new(kind, table, ctx));
        let mut leaves: Vec<String> = Vec::with_capacity(table.len());
        for (index, desc) in table.iter().enumerate() {
            let path = join(&dir, desc.name);
            let hook = Arc::new(EndpointBinding::new(core.clone(), index));
            if let Err(err) = transport.make_leaf(&path, hook) {
                warn!(
                    "{} scope {}: endpoint {:?} failed ({}), rolling back",
                    kind, dir, desc.name, err
                );
                core.retire();
                for created in leaves.iter().rev() {
                    if let Err(rm_err) = transport.remove(created) {
                        warn!("rollback remove {} failed: {}", created, rm_err);
                    }
                }
                if let Err(rm_err) = transport.remove(&dir) {
                    warn!("rollback remove {} failed: {}", dir, rm_err);
                }
                return Err(err.into());
            }
            leaves.push(path);
        }
        info!("{} scope live at {} ({} endpoints)", kind, dir, leaves.len());
        Ok(Self { core, dir, leaves })
    }

    /// Tear the scope down: retire dispatch, remove endpoints in reverse
    /// creation order, then the directory. Idempotent; destroying an
    /// already-absent scope is a logged no-op.
    pub fn destroy(&self, transport: &Arc<dyn Transport>) {
        if !self.core.retire() {
            debug!("{} scope {} already absent", self.core.kind(), self.dir);
            return;
        }
        for leaf in self.leaves.iter().rev() {
            if let Err(err) = transport.remove(leaf) {
                warn!("remove {} failed: {}", leaf, err);
            }
        }
        if let Err(err) = transport.remove(&self.dir) {
            warn!("remove {} failed: {}", self.dir, err);
        }
        info!("{} scope {} destroyed", self.core.kind(), self.dir);
    }

    /// Whether the scope is still live.
    pub fn is_live(&self) -> bool {
        self.core.is_live()
    }

    /// The context bound at creation.
    pub fn ctx(&self) -> &Arc<C> {
        self.core.ctx()
    }

    /// The scope's directory path.
    pub fn dir(&self) -> &str {
        &self.dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::EndpointDescriptor;
    use crate::transport::MemTransport;
    use once_cell::sync::Lazy;
    use std::fmt;

    fn dump_unit(_: &(), out: &mut String) -> fmt::Result {
        out.push_str("ok\n");
        Ok(())
    }

    static UNIT_TABLE: Lazy<EndpointTable<()>> = Lazy::new(|| {
        EndpointTable::new(vec![
            EndpointDescriptor::read_only("one", dump_unit),
            EndpointDescriptor::read_only("two", dump_unit),
        ])
    });

    #[test]
    fn create_materializes_table_and_destroy_clears_it() {
        let transport: Arc<dyn Transport> = Arc::new(MemTransport::new());
        let scope = Scope::create(
            &transport,
            "/",
            "drv",
            ScopeKind::Driver,
            &UNIT_TABLE,
            Arc::new(()),
        )
        .expect("create");
        assert_eq!(transport.list("/drv").expect("list"), vec!["one", "two"]);
        scope.destroy(&transport);
        assert!(transport.list("/drv").is_err());
        // Second destroy is a no-op.
        scope.destroy(&transport);
    }

    #[test]
    fn create_on_existing_dir_is_structural() {
        let transport: Arc<dyn Transport> = Arc::new(MemTransport::new());
        transport.make_dir("/drv").expect("mkdir");
        let err = Scope::create(
            &transport,
            "/",
            "drv",
            ScopeKind::Driver,
            &UNIT_TABLE,
            Arc::new(()),
        )
        .expect_err("must fail");
        assert!(matches!(err, RegistryError::ScopeAlreadyLive(_)));
    }
}
