// Tree-store client: the seam between the engine and the backend

pub mod http;

pub use http::HttpTreeStore;

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

/// Write flavor, selecting HTTP method and target collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteKind {
    /// Replace the node at the path.
    Put,
    /// Create a node under the path.
    Post,
    /// Merge fields into the node at the path.
    Patch,
    /// Append an element to the list node at the path.
    PostListNode,
}

/// Delete flavor: a single node or a whole list node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteKind {
    Node,
    ListNode,
}

/// Transport failure or non-success status from the tree store.
#[derive(Debug, Clone)]
pub struct ClientError {
    /// HTTP status when the store answered; None for transport failures.
    pub status: Option<u16>,
    pub message: String,
}

impl ClientError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }

    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(code) => write!(f, "tree store responded with status {}: {}", code, self.message),
            None => write!(f, "tree store unreachable: {}", self.message),
        }
    }
}

impl std::error::Error for ClientError {}

/// Pre-authenticated access to one hierarchical data store.
///
/// The engine only depends on this trait; production wires [`HttpTreeStore`],
/// tests substitute a scripted mock.
#[async_trait]
pub trait TreeStore: Send + Sync {
    /// Fetch the node at `path` under `anchor`.
    async fn read(
        &self,
        anchor: &str,
        path: &str,
        include_descendants: bool,
    ) -> Result<String, ClientError>;

    /// Query nodes under `anchor`. `by_tree_path` selects the store's native
    /// tree-path query dialect instead of the xpath dialect.
    async fn query(
        &self,
        anchor: &str,
        path: &str,
        by_tree_path: bool,
        include_descendants: bool,
    ) -> Result<String, ClientError>;

    /// Apply a write at `path` under `anchor` and return the store's response body.
    async fn write(
        &self,
        anchor: &str,
        path: &str,
        kind: WriteKind,
        payload: &Value,
    ) -> Result<String, ClientError>;

    /// Delete the node (or list node) at `path` under `anchor`.
    async fn remove(&self, anchor: &str, path: &str, kind: DeleteKind)
        -> Result<(), ClientError>;
}
