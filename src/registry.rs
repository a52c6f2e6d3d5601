// CLASSIFICATION: COMMUNITY
// Filename: registry.rs v0.5
// Author: Lukas Bower
// Date Modified: 2027-08-02

//! Registry handle and scope-tree lifecycle manager.
//!
//! [`DiagRegistry`] owns the driver scope and the interface subtrees nested
//! under it. Creation is parent before child (driver, then interface, then
//! its `dm` child); destruction is strictly the reverse. Interface rename is
//! a full teardown under the old name followed by recreation under the new
//! name with the same context, so observers see a brief absence rather than
//! a rename in place.
//!
//! Lifecycle operations on interface subtrees are serialized by the registry
//! mutex; endpoint dispatch runs concurrently with everything except the
//! teardown of its own scope.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use log::{debug, info, warn};

use crate::error::RegistryError;
use crate::scope::Scope;
use crate::state::{AdapterState, DriverState};
use crate::table::ScopeKind;
use crate::tables::{ADAPTER_TABLE, DM_TABLE, DRIVER_TABLE};
use crate::transport::Transport;

/// Name of the nested dynamic-mechanism directory under each interface.
pub const DM_DIR: &str = "dm";

struct InterfaceSubtree {
    iface: Scope<AdapterState>,
    dm: Scope<AdapterState>,
    ctx: Arc<AdapterState>,
}

/// Handle to one diagnostics tree rooted at `/<name>` on a transport.
///
/// Created at driver load, dropped at driver unload. Interface registration,
/// unregistration, and rename are driven by the surrounding driver as
/// adapters come and go.
pub struct DiagRegistry {
    transport: Arc<dyn Transport>,
    driver: Scope<DriverState>,
    interfaces: Mutex<HashMap<String, InterfaceSubtree>>,
}

impl std::fmt::Debug for DiagRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiagRegistry").finish_non_exhaustive()
    }
}

impl DiagRegistry {
    /// Create the driver scope and its endpoints under `/<name>`.
    ///
    /// Fails with [`RegistryError::ScopeAlreadyLive`] if the directory is
    /// already present; initializing twice is a lifecycle ordering bug in
    /// the caller.
    pub fn init(
        transport: Arc<dyn Transport>,
        name: &str,
        driver: Arc<DriverState>,
    ) -> Result<Self, RegistryError> {
        let scope = Scope::create(
            &transport,
            "/",
            name,
            ScopeKind::Driver,
            &DRIVER_TABLE,
            driver,
        )?;
        info!("diagnostics registry initialised at {}", scope.dir());
        Ok(Self {
            transport,
            driver: scope,
            interfaces: Mutex::new(HashMap::new()),
        })
    }

    /// Tear down every remaining interface subtree, then the driver scope.
    /// Idempotent; a second call is a no-op.
    pub fn deinit(&self) {
        let mut interfaces = self.interfaces.lock().expect("poisoned registry lock");
        for (name, subtree) in interfaces.drain() {
            debug!("deinit: dropping interface subtree {}", name);
            subtree.dm.destroy(&self.transport);
            subtree.iface.destroy(&self.transport);
        }
        self.driver.destroy(&self.transport);
    }

    /// Create an interface scope and its `dm` child for a newly registered
    /// adapter. The same `ctx` must be passed to later lifecycle calls.
    pub fn register_interface(
        &self,
        name: &str,
        ctx: Arc<AdapterState>,
    ) -> Result<(), RegistryError> {
        let mut interfaces = self.interfaces.lock().expect("poisoned registry lock");
        if !self.driver.is_live() {
            warn!("interface {} registered against a dead driver scope", name);
            return Err(RegistryError::ParentNotLive);
        }
        if interfaces.contains_key(name) {
            warn!("duplicate interface registration: {}", name);
            return Err(RegistryError::DuplicateScope(name.to_owned()));
        }
        let subtree = self.build_subtree(name, ctx)?;
        interfaces.insert(name.to_owned(), subtree);
        Ok(())
    }

    /// Remove the interface subtree: `dm` child first, then the interface
    /// scope. Unregistering an unknown name is an idempotent no-op.
    pub fn unregister_interface(&self, name: &str) -> Result<(), RegistryError> {
        let mut interfaces = self.interfaces.lock().expect("poisoned registry lock");
        match interfaces.remove(name) {
            Some(subtree) => {
                subtree.dm.destroy(&self.transport);
                subtree.iface.destroy(&self.transport);
                Ok(())
            }
            None => {
                debug!("unregister_interface: {} already absent", name);
                Ok(())
            }
        }
    }

    /// Rename an interface: destroy the whole subtree under `old`, then
    /// recreate it under `new` with the same context. The collision check
    /// runs before any teardown, so a failed rename has no side effects.
    pub fn rename_interface(&self, old: &str, new: &str) -> Result<(), RegistryError> {
        let mut interfaces = self.interfaces.lock().expect("poisoned registry lock");
        let Some(subtree) = interfaces.remove(old) else {
            warn!("rename of unknown interface {}", old);
            return Err(RegistryError::EndpointNotFound);
        };
        if old != new && interfaces.contains_key(new) {
            warn!("rename {} -> {}: target already live", old, new);
            interfaces.insert(old.to_owned(), subtree);
            return Err(RegistryError::DuplicateScope(new.to_owned()));
        }
        let ctx = subtree.ctx.clone();
        subtree.dm.destroy(&self.transport);
        subtree.iface.destroy(&self.transport);
        let rebuilt = self.build_subtree(new, ctx)?;
        interfaces.insert(new.to_owned(), rebuilt);
        info!("interface {} renamed to {}", old, new);
        Ok(())
    }

    fn build_subtree(
        &self,
        name: &str,
        ctx: Arc<AdapterState>,
    ) -> Result<InterfaceSubtree, RegistryError> {
        let iface = Scope::create(
            &self.transport,
            self.driver.dir(),
            name,
            ScopeKind::Interface,
            &ADAPTER_TABLE,
            ctx.clone(),
        )?;
        let dm = match Scope::create(
            &self.transport,
            iface.dir(),
            DM_DIR,
            ScopeKind::DynamicMechanism,
            &DM_TABLE,
            ctx.clone(),
        ) {
            Ok(dm) => dm,
            Err(err) => {
                // The dm child is mandatory; a half-built subtree must not
                // stay listable.
                iface.destroy(&self.transport);
                return Err(err);
            }
        };
        Ok(InterfaceSubtree { iface, dm, ctx })
    }

    /// The transport this registry was initialised with.
    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Directory path of the driver scope.
    pub fn driver_dir(&self) -> String {
        self.driver.dir().to_owned()
    }

    /// Directory path of a live interface scope, if registered.
    pub fn interface_dir(&self, name: &str) -> Option<String> {
        self.interfaces
            .lock()
            .expect("poisoned registry lock")
            .get(name)
            .map(|s| s.iface.dir().to_owned())
    }

    /// Names of the currently registered interfaces, sorted.
    pub fn interfaces(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .interfaces
            .lock()
            .expect("poisoned registry lock")
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }
}

impl Drop for DiagRegistry {
    fn drop(&mut self) {
        self.deinit();
    }
}
