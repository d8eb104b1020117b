use crate::node::NodeId;

/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur when manipulating documents or the scene graph.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The node handle never existed in this scene.
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    /// The node existed but has been destroyed since the handle was taken.
    #[error("node destroyed: {0}")]
    NodeDestroyed(NodeId),

    /// A node cannot be parented under itself or one of its descendants.
    #[error("cannot parent {child} under {parent}: would create a cycle")]
    ParentCycle {
        /// The node being re-parented.
        child: NodeId,
        /// The requested parent.
        parent: NodeId,
    },
}
