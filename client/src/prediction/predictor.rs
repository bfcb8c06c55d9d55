use log::trace;

use outbreak_shared::{step_movement, FixedTimestep, MoveInput, SequenceNum, Vec2};

use super::input_buffer::{InputBuffer, InputRecord};

/// How far (world units) the server may disagree with the recorded
/// prediction before a rebase-and-replay is worth the work. Float drift
/// this small is invisible on screen.
const CORRECTION_EPSILON: f32 = 1e-3;

/// Locally-simulated player. Runs the shared movement model against a fixed
/// timestep so the client advances in the same quantum as the server, tags
/// every step with a sequence number, and rebases onto authoritative
/// corrections when they arrive.
pub struct Predictor {
    position: Vec2,
    speed: f32,
    timestep: FixedTimestep,
    next_seq: SequenceNum,
    buffer: InputBuffer,
}

impl Predictor {
    pub fn new(position: Vec2, speed: f32, step_secs: f32, buffer_capacity: usize) -> Self {
        Self {
            position,
            speed,
            timestep: FixedTimestep::new(step_secs),
            next_seq: 0,
            buffer: InputBuffer::new(buffer_capacity),
        }
    }

    /// The predicted position, updated every drained step and every
    /// reconciliation.
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Sequence number the next step will carry. What the embedder stamps
    /// on the outgoing input packet for that step.
    pub fn next_seq(&self) -> SequenceNum {
        self.next_seq
    }

    pub fn pending_inputs(&self) -> usize {
        self.buffer.len()
    }

    /// Feeds one render frame's elapsed time and the input held during it.
    /// Whole fixed steps are drained; each applies the shared movement step
    /// and records itself for replay. Returns the sequence numbers stepped
    /// this frame, in order, for the embedder to transmit.
    pub fn advance(&mut self, frame_secs: f32, input: MoveInput) -> Vec<SequenceNum> {
        let mut stepped = Vec::new();

        let position = &mut self.position;
        let speed = self.speed;
        let next_seq = &mut self.next_seq;
        let buffer = &mut self.buffer;
        self.timestep.advance(frame_secs, |dt| {
            *position = step_movement(*position, input, speed, dt);
            let seq = *next_seq;
            *next_seq = next_seq.wrapping_add(1);
            buffer.push(InputRecord {
                seq,
                input,
                position: *position,
            });
            stepped.push(seq);
        });
        stepped
    }

    /// Processes an authoritative ack for a sequence: the acknowledged
    /// prefix is retired, and if the server's position disagrees with what
    /// was predicted for that step, rebase onto it and replay every
    /// still-unacknowledged input with the same fixed-step semantics. An
    /// ack with no buffered record is a stale correction and is skipped,
    /// which also makes duplicate acks harmless. Returns whether a
    /// correction was applied.
    pub fn reconcile(&mut self, ack_seq: SequenceNum, authoritative: Vec2) -> bool {
        let predicted = match self.buffer.iter().find(|r| r.seq == ack_seq) {
            Some(record) => record.position,
            None => {
                trace!("skipping stale correction for seq {ack_seq}");
                return false;
            }
        };
        self.buffer.drop_through(ack_seq);

        if predicted.distance_sq(authoritative) <= CORRECTION_EPSILON * CORRECTION_EPSILON {
            return false;
        }

        self.position = authoritative;
        let dt = self.timestep.step_secs();
        for record in self.buffer.iter() {
            self.position = step_movement(self.position, record.input, self.speed, dt);
        }
        true
    }
}
