//! Protocol message definitions for client-server communication.
//!
//! All payloads are JSON-serializable records with no binary framing; the
//! `type` tag carries the message name on the wire.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use voxelstrike_core::{EntityId, HitEvent, PlayerInput, ShotRequest, TickSnapshot};

/// Protocol version for compatibility checking.
pub const PROTOCOL_VERSION: u16 = 1;

/// Tolerance around 1.0 for a shot direction's length.
pub const DIRECTION_TOLERANCE: f64 = 0.1;

/// Maximum absolute pitch a client may report (radians).
pub const MAX_PITCH: f64 = std::f64::consts::FRAC_PI_2 + 0.01;

/// Rejection reasons for inbound messages.
///
/// A rejected message is dropped and the sender receives no update this
/// tick; rejection is never propagated as a fault into the simulation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// A numeric field was NaN or infinite.
    #[error("non-finite numeric field")]
    NonFinite,
    /// A shot direction was not close to unit length.
    #[error("shot direction is not a unit vector")]
    NotUnitDirection,
    /// Pitch outside the representable look range.
    #[error("rotation out of range")]
    RotationOutOfRange,
}

/// Messages sent from client to server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientMessage {
    /// Per-tick input record.
    PlayerInput(PlayerInput),
    /// Fire action.
    PlayerShoot(ShotRequest),
    /// Reload request.
    PlayerReload,
}

impl ClientMessage {
    /// Verify message limits and validity.
    ///
    /// This runs on every received message; anything malformed is dropped
    /// before it reaches the simulation.
    pub fn verify(&self) -> Result<(), ProtocolError> {
        match self {
            ClientMessage::PlayerInput(input) => {
                if !input.yaw.is_finite()
                    || !input.pitch.is_finite()
                    || !input.timestamp.is_finite()
                {
                    return Err(ProtocolError::NonFinite);
                }
                if input.pitch.abs() > MAX_PITCH {
                    return Err(ProtocolError::RotationOutOfRange);
                }
            }
            ClientMessage::PlayerShoot(shot) => {
                let fields = [
                    shot.origin_x,
                    shot.origin_y,
                    shot.origin_z,
                    shot.dir_x,
                    shot.dir_y,
                    shot.dir_z,
                    shot.requested_at,
                ];
                if fields.iter().any(|value| !value.is_finite()) {
                    return Err(ProtocolError::NonFinite);
                }
                let length =
                    (shot.dir_x * shot.dir_x + shot.dir_y * shot.dir_y + shot.dir_z * shot.dir_z)
                        .sqrt();
                if (length - 1.0).abs() > DIRECTION_TOLERANCE {
                    return Err(ProtocolError::NotUnitDirection);
                }
            }
            ClientMessage::PlayerReload => {}
        }
        Ok(())
    }
}

/// Messages sent from server to client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerMessage {
    /// Initial state for a newly joined client.
    GameState {
        /// Entity id assigned to this client.
        player_id: EntityId,
        /// World seed the client must generate terrain from.
        seed: i64,
        /// Full snapshot at join time.
        snapshot: TickSnapshot,
    },
    /// Per-tick snapshot broadcast.
    GameUpdate(TickSnapshot),
    /// An entity joined the session.
    PlayerJoined {
        /// The new entity.
        id: EntityId,
    },
    /// An entity left the session.
    PlayerLeft {
        /// The departed entity.
        id: EntityId,
    },
    /// A projectile struck an entity.
    PlayerHit(HitEvent),
    /// A shot was accepted and a projectile spawned.
    PlayerShot {
        /// Shooter.
        shooter: EntityId,
        /// Muzzle X.
        x: f64,
        /// Muzzle Y.
        y: f64,
        /// Muzzle Z.
        z: f64,
        /// Initial velocity X.
        vel_x: f64,
        /// Initial velocity Y.
        vel_y: f64,
        /// Initial velocity Z.
        vel_z: f64,
    },
    /// A reload was accepted.
    PlayerReloaded {
        /// Reloading entity.
        id: EntityId,
        /// Clip contents after the reload.
        ammo: u32,
        /// Reserve remaining.
        reserve: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_input() -> PlayerInput {
        let mut input = PlayerInput::idle();
        input.sequence = 7;
        input.yaw = 1.0;
        input.pitch = 0.2;
        input
    }

    fn valid_shot() -> ShotRequest {
        ShotRequest {
            origin_x: 0.0,
            origin_y: 25.0,
            origin_z: 0.0,
            dir_x: 0.0,
            dir_y: 0.0,
            dir_z: 1.0,
            requested_at: 3.5,
        }
    }

    #[test]
    fn test_valid_input_passes() {
        assert!(ClientMessage::PlayerInput(valid_input()).verify().is_ok());
    }

    #[test]
    fn test_nan_input_rejected() {
        let mut input = valid_input();
        input.yaw = f64::NAN;
        assert_eq!(
            ClientMessage::PlayerInput(input).verify(),
            Err(ProtocolError::NonFinite)
        );
    }

    #[test]
    fn test_excessive_pitch_rejected() {
        let mut input = valid_input();
        input.pitch = 2.0;
        assert_eq!(
            ClientMessage::PlayerInput(input).verify(),
            Err(ProtocolError::RotationOutOfRange)
        );
    }

    #[test]
    fn test_valid_shot_passes() {
        assert!(ClientMessage::PlayerShoot(valid_shot()).verify().is_ok());
    }

    #[test]
    fn test_non_unit_direction_rejected() {
        let mut shot = valid_shot();
        shot.dir_z = 2.0;
        assert_eq!(
            ClientMessage::PlayerShoot(shot).verify(),
            Err(ProtocolError::NotUnitDirection)
        );

        let mut zero = valid_shot();
        zero.dir_z = 0.0;
        assert_eq!(
            ClientMessage::PlayerShoot(zero).verify(),
            Err(ProtocolError::NotUnitDirection)
        );
    }

    #[test]
    fn test_infinite_origin_rejected() {
        let mut shot = valid_shot();
        shot.origin_y = f64::INFINITY;
        assert_eq!(
            ClientMessage::PlayerShoot(shot).verify(),
            Err(ProtocolError::NonFinite)
        );
    }

    #[test]
    fn test_reload_always_valid() {
        assert!(ClientMessage::PlayerReload.verify().is_ok());
    }

    #[test]
    fn test_wire_tags_are_kebab_case() {
        let json = serde_json::to_string(&ClientMessage::PlayerReload).expect("encode");
        assert!(json.contains("\"player-reload\""));

        let json =
            serde_json::to_string(&ServerMessage::PlayerJoined { id: 3 }).expect("encode");
        assert!(json.contains("\"player-joined\""));
    }
}
