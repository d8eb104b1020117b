//! Deterministic document-to-scene build pipeline for Mapwright.
//!
//! A [`BuildPipeline`] turns a [`mw_core::Document`] into scene nodes and
//! assigns every console, ladder endpoint and room a small integer id. The
//! ids depend only on the document and the content resolver, so every peer
//! building the same document derives the same ids without exchanging them.

/// The trait every builder implements.
pub mod builder;
/// Build tunables.
pub mod config;
/// Mutable context passed to builders.
pub mod context;
/// Non-fatal build warnings.
pub mod diagnostics;
/// Error types for the build crate.
pub mod error;
/// Per-round task data from published counts.
pub mod init;
/// Ladder endpoints and their registry.
pub mod ladder;
/// Record of every id assigned during a build.
pub mod ledger;
/// Active document and asset cache invalidation.
pub mod lifecycle;
/// Minimap icons and async sprite delivery.
pub mod minimap;
/// The build orchestrator.
pub mod pipeline;
/// Content templates and the resolver trait.
pub mod resolver;
/// Room ids.
pub mod rooms;
/// Ladder climb message routing.
pub mod rpc;
/// Consoles and task entities.
pub mod task;

/// Re-export of [`builder::Builder`] and [`builder::BuildItem`].
pub use builder::{BuildItem, Builder};
/// Re-export of [`config::BuildConfig`].
pub use config::BuildConfig;
/// Re-export of [`context::BuildContext`].
pub use context::BuildContext;
/// Re-exports of the build log types.
pub use diagnostics::{BuildEvent, BuildEventKind, BuildLog};
/// Re-exports of [`error::BuildError`] and [`error::BuildResult`].
pub use error::{BuildError, BuildResult};
/// Re-export of [`init::TaskInitializer`].
pub use init::TaskInitializer;
/// Re-exports of the ladder types.
pub use ladder::{LadderBuilder, LadderRegistry, RegisteredLadder};
/// Re-exports of the id ledger types.
pub use ledger::{AssignedId, IdLedger, LedgerEntry};
/// Re-exports of the lifecycle types.
pub use lifecycle::{AssetCache, DocumentSource, MapLoader};
/// Re-exports of the minimap types.
pub use minimap::{AttachOutcome, IconAttachments, MinimapBuilder};
/// Re-exports of the orchestrator types.
pub use pipeline::{BuildArtifacts, BuildInput, BuildOutput, BuildPipeline};
/// Re-exports of the resolver types.
pub use resolver::{ContentResolver, Template, TemplateCatalog};
/// Re-exports of the room types.
pub use rooms::{RoomBuilder, RoomIndex};
/// Re-exports of the RPC types.
pub use rpc::{CLIMB_LADDER, LadderClimber, RpcOutcome};
/// Re-exports of the task types.
pub use task::{CounterKey, TaskBuilder, TaskCounts};
