// CLASSIFICATION: COMMUNITY
// Filename: transport.rs v0.4
// Author: Lukas Bower
// Date Modified: 2027-08-02

//! The narrow transport contract and its in-memory implementation.
//!
//! A [`Transport`] turns scopes into a listable tree of named containers and
//! endpoints into openable leaves. The registry only ever uses the five
//! primitives below; everything else about the surrounding filesystem (caller
//! plumbing, buffer copy-in) stays on the transport's side of the line.
//! [`MemTransport`] is the in-process implementation used by tests and by
//! embedders without a kernel VFS.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use log::debug;
use thiserror::Error;

use crate::error::RegistryError;

/// Read/write hook a leaf routes its open/read/write traffic through.
pub trait LeafIo: Send + Sync {
    /// Produce the current textual snapshot for the leaf.
    fn read(&self) -> Result<Vec<u8>, RegistryError>;
    /// Submit a command payload. Returns the accepted byte count.
    fn write(&self, data: &[u8]) -> Result<usize, RegistryError>;
}

/// Failures reported by transport primitives.
#[derive(Debug, Error)]
pub enum TransportError {
    /// A node already exists at the path.
    #[error("path already exists: {0}")]
    AlreadyExists(String),
    /// No node exists at the path.
    #[error("path not found: {0}")]
    NotFound(String),
    /// A directory operation was applied to a leaf, or vice versa.
    #[error("not a directory: {0}")]
    NotADirectory(String),
    /// A directory remove was attempted while children remain.
    #[error("directory not empty: {0}")]
    DirNotEmpty(String),
    /// The transport refused the operation. Used by fault-injecting test
    /// transports; real transports map resource exhaustion here.
    #[error("transport rejected {0}")]
    Rejected(String),
}

/// Primitives the registry consumes to materialize scopes and endpoints.
pub trait Transport: Send + Sync {
    /// Create a named container. The parent path must already exist.
    fn make_dir(&self, path: &str) -> Result<(), TransportError>;
    /// Create a named leaf whose traffic is routed through `hook`.
    fn make_leaf(&self, path: &str, hook: Arc<dyn LeafIo>) -> Result<(), TransportError>;
    /// Remove a leaf or an empty container by path.
    fn remove(&self, path: &str) -> Result<(), TransportError>;
    /// List the immediate child names of a container, sorted.
    fn list(&self, path: &str) -> Result<Vec<String>, TransportError>;
    /// Open a leaf for read/write traffic.
    fn open(&self, path: &str) -> Result<Arc<dyn LeafIo>, TransportError>;
}

enum MemNode {
    Dir,
    Leaf(Arc<dyn LeafIo>),
}

/// In-memory transport: a path-keyed node map guarded by one mutex.
pub struct MemTransport {
    nodes: Mutex<HashMap<String, MemNode>>,
}

impl MemTransport {
    /// Create a transport holding only the root container `/`.
    pub fn new() -> Self {
        let mut nodes = HashMap::new();
        nodes.insert(String::from("/"), MemNode::Dir);
        Self {
            nodes: Mutex::new(nodes),
        }
    }
}

impl Default for MemTransport {
    fn default() -> Self {
        Self::new()
    }
}

fn parent_of(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) | None => "/",
        Some(idx) => &path[..idx],
    }
}

impl Transport for MemTransport {
    fn make_dir(&self, path: &str) -> Result<(), TransportError> {
        let mut nodes = self.nodes.lock().expect("poisoned transport lock");
        match nodes.get(parent_of(path)) {
            Some(MemNode::Dir) => {}
            Some(MemNode::Leaf(_)) => {
                return Err(TransportError::NotADirectory(parent_of(path).into()))
            }
            None => return Err(TransportError::NotFound(parent_of(path).into())),
        }
        if nodes.contains_key(path) {
            return Err(TransportError::AlreadyExists(path.into()));
        }
        nodes.insert(path.into(), MemNode::Dir);
        debug!("mkdir {}", path);
        Ok(())
    }

    fn make_leaf(&self, path: &str, hook: Arc<dyn LeafIo>) -> Result<(), TransportError> {
        let mut nodes = self.nodes.lock().expect("poisoned transport lock");
        match nodes.get(parent_of(path)) {
            Some(MemNode::Dir) => {}
            Some(MemNode::Leaf(_)) => {
                return Err(TransportError::NotADirectory(parent_of(path).into()))
            }
            None => return Err(TransportError::NotFound(parent_of(path).into())),
        }
        if nodes.contains_key(path) {
            return Err(TransportError::AlreadyExists(path.into()));
        }
        nodes.insert(path.into(), MemNode::Leaf(hook));
        Ok(())
    }

    fn remove(&self, path: &str) -> Result<(), TransportError> {
        let mut nodes = self.nodes.lock().expect("poisoned transport lock");
        match nodes.get(path) {
            None => return Err(TransportError::NotFound(path.into())),
            Some(MemNode::Dir) => {
                let prefix = format!("{}/", path);
                if nodes.keys().any(|p| p.starts_with(&prefix)) {
                    return Err(TransportError::DirNotEmpty(path.into()));
                }
            }
            Some(MemNode::Leaf(_)) => {}
        }
        nodes.remove(path);
        debug!("rm {}", path);
        Ok(())
    }

    fn list(&self, path: &str) -> Result<Vec<String>, TransportError> {
        let nodes = self.nodes.lock().expect("poisoned transport lock");
        match nodes.get(path) {
            Some(MemNode::Dir) => {}
            Some(MemNode::Leaf(_)) => return Err(TransportError::NotADirectory(path.into())),
            None => return Err(TransportError::NotFound(path.into())),
        }
        let prefix = if path == "/" {
            String::from("/")
        } else {
            format!("{}/", path)
        };
        let mut names: Vec<String> = nodes
            .keys()
            .filter_map(|p| p.strip_prefix(&prefix))
            .filter(|rel| !rel.is_empty() && !rel.contains('/'))
            .map(str::to_owned)
            .collect();
        names.sort();
        Ok(names)
    }

    fn open(&self, path: &str) -> Result<Arc<dyn LeafIo>, TransportError> {
        let nodes = self.nodes.lock().expect("poisoned transport lock");
        match nodes.get(path) {
            Some(MemNode::Leaf(hook)) => Ok(hook.clone()),
            Some(MemNode::Dir) => Err(TransportError::NotADirectory(path.into())),
            None => Err(TransportError::NotFound(path.into())),
        }
    }
}
