//! The movement model shared by the authoritative simulation and the
//! client's local prediction. Determinism anchor: both sides must produce
//! bit-identical positions from the same inputs and fixed step, so this is
//! the only place movement math lives.

use std::f32::consts::FRAC_1_SQRT_2;

use crate::codec::{ByteReader, ByteWriter, DecodeError};
use crate::math::Vec2;

/// One frame of directional input, packed as a bitmask for the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MoveInput {
    bits: u8,
}

impl MoveInput {
    pub const UP: u8 = 1 << 0;
    pub const DOWN: u8 = 1 << 1;
    pub const LEFT: u8 = 1 << 2;
    pub const RIGHT: u8 = 1 << 3;

    pub fn new(up: bool, down: bool, left: bool, right: bool) -> Self {
        let mut bits = 0;
        if up {
            bits |= Self::UP;
        }
        if down {
            bits |= Self::DOWN;
        }
        if left {
            bits |= Self::LEFT;
        }
        if right {
            bits |= Self::RIGHT;
        }
        Self { bits }
    }

    pub fn from_bits(bits: u8) -> Self {
        Self { bits: bits & 0x0f }
    }

    pub fn bits(&self) -> u8 {
        self.bits
    }

    pub fn is_idle(&self) -> bool {
        self.bits == 0
    }

    fn axis(&self) -> Vec2 {
        let mut dir = Vec2::ZERO;
        if self.bits & Self::UP != 0 {
            dir.y -= 1.0;
        }
        if self.bits & Self::DOWN != 0 {
            dir.y += 1.0;
        }
        if self.bits & Self::LEFT != 0 {
            dir.x -= 1.0;
        }
        if self.bits & Self::RIGHT != 0 {
            dir.x += 1.0;
        }
        dir
    }

    pub fn write(&self, writer: &mut ByteWriter) {
        writer.write_u8(self.bits);
    }

    pub fn read(reader: &mut ByteReader) -> Result<Self, DecodeError> {
        Ok(Self::from_bits(reader.read_u8()?))
    }
}

/// Advances `position` by one fixed step of directional movement.
/// Diagonals are normalized so they are no faster than cardinal movement.
pub fn step_movement(position: Vec2, input: MoveInput, speed: f32, dt: f32) -> Vec2 {
    let dir = input.axis();
    if dir.x != 0.0 && dir.y != 0.0 {
        position + dir * (FRAC_1_SQRT_2 * speed * dt)
    } else {
        position + dir * (speed * dt)
    }
}
