//! Routing of ladder climb messages to locally built endpoints.
//!
//! Peers never send endpoint references, only the byte id every peer derived
//! for the same ladder during its own build.

use log::warn;
use mw_core::component::LadderId;

use crate::ladder::{LadderRegistry, RegisteredLadder};

/// Call id of the climb message.
pub const CLIMB_LADDER: u8 = 31;

/// Whether a message was consumed or should fall through to default handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpcOutcome {
    /// The climb was performed.
    Handled,
    /// Not a climb, or nothing to climb.
    Unhandled,
}

/// Performs the climb once an endpoint has been resolved.
pub trait LadderClimber {
    /// Climb `ladder`. `sequence` orders climbs from the same player.
    fn climb(&mut self, ladder: &RegisteredLadder, sequence: u8);
}

/// Handle one incoming message.
///
/// `ladders` is `None` while no map is loaded, in which case every message
/// is left to the default handler. Climb payloads are `[ladder_id, sequence]`.
pub fn dispatch(
    call_id: u8,
    payload: &[u8],
    ladders: Option<&LadderRegistry>,
    climber: &mut dyn LadderClimber,
) -> RpcOutcome {
    let Some(ladders) = ladders else {
        return RpcOutcome::Unhandled;
    };
    if call_id != CLIMB_LADDER {
        return RpcOutcome::Unhandled;
    }
    let [ladder_id, sequence, ..] = *payload else {
        warn!("[rpc] climb message too short ({} bytes)", payload.len());
        return RpcOutcome::Unhandled;
    };

    match ladders.get(LadderId(ladder_id)) {
        Some(ladder) => {
            climber.climb(ladder, sequence);
            RpcOutcome::Handled
        }
        None => {
            warn!("[rpc] could not find a ladder of id: {ladder_id}");
            RpcOutcome::Unhandled
        }
    }
}
