//! Render error types.

use hookmark_ast::NodeId;

use crate::hooks::{HookError, HookId, HookKind};

/// Error returned when rendering a document fails.
///
/// Any error aborts the whole document; no partial HTML is returned.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// A registered hook returned an error.
    #[error("{kind} hook '{identity}' failed on node {node}")]
    Hook {
        kind: HookKind,
        node: NodeId,
        identity: HookId,
        #[source]
        source: HookError,
    },
    /// Checkpoint pushes and pops did not balance.
    #[error("unbalanced capture stack ({depth} open checkpoints)")]
    UnbalancedCapture { depth: usize },
    /// A node or hook did not have the kind its dispatch path expects.
    #[error("kind mismatch: expected {expected}, found {found}")]
    KindMismatch {
        expected: &'static str,
        found: &'static str,
    },
}
