//! Remote entities are never predicted; they are rendered a fixed number
//! of ticks in the past and interpolated between the two authoritative
//! samples bracketing that delayed time. The constant visual delay buys
//! smoothness that survives jitter and reordered arrival.

use std::collections::VecDeque;

use outbreak_shared::Vec2;

/// Bounded per-entity position history keyed by an unwrapped tick clock.
/// Samples arrive in increasing tick order (the frame layer discards stale
/// frames); the oldest sample is evicted when full.
pub struct InterpolationBuffer {
    samples: VecDeque<(u64, Vec2)>,
    capacity: usize,
}

impl InterpolationBuffer {
    pub fn new(capacity: usize) -> Self {
        debug_assert!(capacity >= 2);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn push(&mut self, tick: u64, position: Vec2) {
        if let Some(&(last_tick, _)) = self.samples.back() {
            if tick <= last_tick {
                // Same-tick repush overwrites; anything older was already
                // filtered upstream.
                if tick == last_tick {
                    if let Some(last) = self.samples.back_mut() {
                        last.1 = position;
                    }
                }
                return;
            }
        }
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back((tick, position));
    }

    /// Position at `render_tick`, linearly interpolated between the two
    /// bracketing samples. Outside the buffered window the nearest edge
    /// sample is returned unextrapolated. `None` only when no sample has
    /// ever arrived.
    pub fn sample(&self, render_tick: f64) -> Option<Vec2> {
        let (first_tick, first_pos) = *self.samples.front()?;
        if render_tick <= first_tick as f64 {
            return Some(first_pos);
        }
        let (last_tick, last_pos) = *self.samples.back()?;
        if render_tick >= last_tick as f64 {
            return Some(last_pos);
        }

        let mut prev = (first_tick, first_pos);
        for &(tick, position) in self.samples.iter().skip(1) {
            if render_tick < tick as f64 {
                let span = (tick - prev.0) as f64;
                let t = (render_tick - prev.0 as f64) / span;
                return Some(Vec2::lerp(prev.1, position, t as f32));
            }
            prev = (tick, position);
        }
        Some(last_pos)
    }
}
