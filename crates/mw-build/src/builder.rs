use mw_core::{Element, ElementKind, NodeId};

use crate::context::BuildContext;
use crate::error::BuildResult;
use crate::pipeline::BuildArtifacts;

/// One element as seen by a builder during the assemble phase.
#[derive(Debug, Clone, Copy)]
pub struct BuildItem<'a> {
    /// The document element.
    pub element: &'a Element,
    /// Classification of the element's tag, resolved once by the pipeline.
    pub kind: ElementKind,
    /// Node pre-populated by the content resolver for this element.
    pub placeholder: NodeId,
}

/// A stateful visitor that augments the elements it owns.
///
/// Builders run in registration order. During the assemble phase every
/// builder sees every element and must return immediately for kinds it does
/// not own. Once every element has been visited, [`Builder::post_build`] runs
/// once per builder, again in registration order. A builder may rely on its
/// own assemble-phase state in `post_build`, never on another builder's.
pub trait Builder: std::fmt::Debug {
    /// Human-readable name for this builder.
    fn name(&self) -> &'static str;

    /// Returns true if this builder owns elements of `kind`.
    fn owns(&self, kind: ElementKind) -> bool;

    /// Called once per owned element, in document order.
    fn build(&mut self, item: &BuildItem<'_>, ctx: &mut BuildContext<'_>) -> BuildResult<()>;

    /// Called once after the whole document has been assembled.
    fn post_build(&mut self, _ctx: &mut BuildContext<'_>) -> BuildResult<()> {
        Ok(())
    }

    /// Move whatever this builder exposes to the host into `artifacts`.
    fn publish(self: Box<Self>, _artifacts: &mut BuildArtifacts) {}
}
