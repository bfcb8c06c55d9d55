//! Out-of-band discrete events. These ride a separate channel from the
//! periodic delta stream and are delivered at-most-once per occurrence.

use crate::codec::{ByteReader, ByteWriter, DecodeError, EncodeError};
use crate::math::Vec2;
use crate::types::EntityId;

/// Action tag for interactions; gameplay content interprets the codes,
/// the core only transports them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractAction {
    /// Built-in action code (pickup, open, etc. — consumer-defined).
    Builtin(u8),
    /// Free-form action name for scripted content.
    Scripted(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Pickup {
        entity: EntityId,
        item_key: String,
        quantity: u16,
    },
    Death {
        entity: EntityId,
        position: Vec2,
    },
    Explosion {
        position: Vec2,
        radius: f32,
    },
    Interact {
        source: EntityId,
        target: EntityId,
        action: InteractAction,
    },
    GameOver {
        survived_ticks: u32,
    },
}

const KIND_PICKUP: u8 = 0;
const KIND_DEATH: u8 = 1;
const KIND_EXPLOSION: u8 = 2;
const KIND_INTERACT: u8 = 3;
const KIND_GAME_OVER: u8 = 4;

const ACTION_BUILTIN: u8 = 0;
const ACTION_SCRIPTED: u8 = 1;

impl GameEvent {
    pub fn kind(&self) -> u8 {
        match self {
            GameEvent::Pickup { .. } => KIND_PICKUP,
            GameEvent::Death { .. } => KIND_DEATH,
            GameEvent::Explosion { .. } => KIND_EXPLOSION,
            GameEvent::Interact { .. } => KIND_INTERACT,
            GameEvent::GameOver { .. } => KIND_GAME_OVER,
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>, EncodeError> {
        let mut writer = ByteWriter::new();
        writer.write_u8(self.kind());
        match self {
            GameEvent::Pickup {
                entity,
                item_key,
                quantity,
            } => {
                entity.write(&mut writer);
                writer.write_str(item_key)?;
                writer.write_u16(*quantity);
            }
            GameEvent::Death { entity, position } => {
                entity.write(&mut writer);
                writer.write_vec2(*position);
            }
            GameEvent::Explosion { position, radius } => {
                writer.write_vec2(*position);
                writer.write_f32(*radius);
            }
            GameEvent::Interact {
                source,
                target,
                action,
            } => {
                source.write(&mut writer);
                target.write(&mut writer);
                match action {
                    InteractAction::Builtin(code) => {
                        writer.write_u8(ACTION_BUILTIN);
                        writer.write_u8(*code);
                    }
                    InteractAction::Scripted(name) => {
                        writer.write_u8(ACTION_SCRIPTED);
                        writer.write_str(name)?;
                    }
                }
            }
            GameEvent::GameOver { survived_ticks } => {
                writer.write_u32(*survived_ticks);
            }
        }
        Ok(writer.into_bytes())
    }

    pub fn decode(bytes: &[u8]) -> Result<GameEvent, DecodeError> {
        let mut reader = ByteReader::new(bytes);
        let kind = reader.read_u8()?;
        Ok(match kind {
            KIND_PICKUP => GameEvent::Pickup {
                entity: EntityId::read(&mut reader)?,
                item_key: reader.read_str()?,
                quantity: reader.read_u16()?,
            },
            KIND_DEATH => GameEvent::Death {
                entity: EntityId::read(&mut reader)?,
                position: reader.read_vec2()?,
            },
            KIND_EXPLOSION => GameEvent::Explosion {
                position: reader.read_vec2()?,
                radius: reader.read_f32()?,
            },
            KIND_INTERACT => {
                let source = EntityId::read(&mut reader)?;
                let target = EntityId::read(&mut reader)?;
                let action = match reader.read_u8()? {
                    ACTION_BUILTIN => InteractAction::Builtin(reader.read_u8()?),
                    ACTION_SCRIPTED => InteractAction::Scripted(reader.read_str()?),
                    tag => return Err(DecodeError::UnknownVariant { tag, variants: 2 }),
                };
                GameEvent::Interact {
                    source,
                    target,
                    action,
                }
            }
            KIND_GAME_OVER => GameEvent::GameOver {
                survived_ticks: reader.read_u32()?,
            },
            tag => return Err(DecodeError::UnknownEventKind { tag }),
        })
    }
}
