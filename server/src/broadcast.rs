//! Turns the manager's per-tick state into outgoing wire payloads. The
//! transport itself stays behind [`Broadcaster`]; this crate only decides
//! what bytes go out and when a keyframe is due.

use log::{debug, trace};
use thiserror::Error;

use outbreak_shared::{
    CompressionError, EncodeError, FieldMap, Frame, FrameEncoder, GameEvent, SchemaRegistry,
};

use crate::world::{EntityManager, SnapshotMode};

#[derive(Debug, Error)]
pub enum BroadcastError {
    #[error("frame encode failed: {0}")]
    Encode(#[from] EncodeError),
    #[error("frame compression failed: {0}")]
    Compression(#[from] CompressionError),
}

/// Outgoing side of the transport. One call per tick with the finished
/// payload; fan-out to individual connections happens behind this. Events
/// travel out of band from the periodic delta stream, at most once per
/// occurrence.
pub trait Broadcaster {
    fn broadcast(&mut self, payload: &[u8]);

    fn broadcast_event(&mut self, event: &GameEvent);
}

/// Drains this tick's discrete events into the transport.
pub fn send_events(manager: &mut EntityManager, transport: &mut dyn Broadcaster) {
    for event in manager.drain_events() {
        transport.broadcast_event(&event);
    }
}

/// Per-tick snapshot pipeline: pick full or delta mode, encode against the
/// registry, compress, hand off to the transport, then clear dirty state.
///
/// Keyframes are sent on a fixed tick cadence so a client that missed
/// deltas converges without a resync handshake.
pub struct SnapshotSender {
    keyframe_interval: u32,
    ticks_since_keyframe: u32,
    encoder: FrameEncoder,
}

impl SnapshotSender {
    pub fn new(keyframe_interval: u32, compression_level: i32) -> Result<Self, BroadcastError> {
        Ok(Self {
            keyframe_interval: keyframe_interval.max(1),
            // First send is always a keyframe.
            ticks_since_keyframe: u32::MAX - 1,
            encoder: FrameEncoder::try_new(compression_level)?,
        })
    }

    /// Builds and sends this tick's frame. `game_state` carries the global
    /// fields the embedder maintains (alive count, elapsed ticks, phase).
    /// Dirty tracking is cleared only after a successful hand-off, so a
    /// failed tick retries the same changes next time.
    pub fn send_tick(
        &mut self,
        manager: &mut EntityManager,
        game_state: FieldMap,
        registry: &SchemaRegistry,
        transport: &mut dyn Broadcaster,
    ) -> Result<(), BroadcastError> {
        self.ticks_since_keyframe = self.ticks_since_keyframe.saturating_add(1);
        let keyframe = self.ticks_since_keyframe >= self.keyframe_interval;
        let mode = if keyframe {
            SnapshotMode::Full
        } else {
            SnapshotMode::Delta
        };

        let mut frame = manager.snapshot(mode);
        frame.game_state = game_state;

        // An idle delta still goes out: the tick number is the client's
        // liveness and interpolation clock.
        let bytes = frame.encode(registry)?;
        let payload = self.encoder.try_encode(&bytes)?;
        if keyframe {
            debug!(
                "keyframe tick {}: {} entities, {} bytes on the wire",
                frame.tick,
                frame.entities.len(),
                payload.len()
            );
        } else {
            trace!(
                "delta tick {}: {} changed, {} removed, {} bytes",
                frame.tick,
                frame.entities.len(),
                frame.removed.len(),
                payload.len()
            );
        }
        transport.broadcast(payload);

        if keyframe {
            self.ticks_since_keyframe = 0;
        }
        manager.clear_dirty();
        Ok(())
    }
}

/// Build a frame without sending it. Handed to a newly-connected client so
/// it can construct the whole world before joining the delta stream.
pub fn full_frame(manager: &EntityManager, game_state: FieldMap) -> Frame {
    let mut frame = manager.snapshot(SnapshotMode::Full);
    frame.game_state = game_state;
    frame
}
