//! Per-tick input records crossing the core boundary.

use serde::{Deserialize, Serialize};

/// Movement input for one tick, as produced by the client.
///
/// Missing or malformed input is treated as "no input this tick", never as a
/// fault; [`PlayerInput::idle`] is that neutral record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerInput {
    /// Move toward the heading.
    pub forward: bool,
    /// Move away from the heading.
    pub backward: bool,
    /// Strafe left.
    pub left: bool,
    /// Strafe right.
    pub right: bool,
    /// Jump request (edge-triggered; only honored while grounded).
    pub jump: bool,
    /// Heading around the vertical axis (radians).
    pub yaw: f64,
    /// Look elevation (radians).
    pub pitch: f64,
    /// Client-assigned sequence number, echoed in snapshots.
    pub sequence: u32,
    /// Client timestamp (seconds).
    pub timestamp: f64,
}

impl PlayerInput {
    /// Neutral input: no movement, heading unchanged from zero.
    pub fn idle() -> Self {
        Self {
            forward: false,
            backward: false,
            left: false,
            right: false,
            jump: false,
            yaw: 0.0,
            pitch: 0.0,
            sequence: 0,
            timestamp: 0.0,
        }
    }

    /// Whether any horizontal movement key is held.
    pub fn has_move(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }
}

/// A fire action crossing the core boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShotRequest {
    /// Muzzle origin X.
    pub origin_x: f64,
    /// Muzzle origin Y.
    pub origin_y: f64,
    /// Muzzle origin Z.
    pub origin_z: f64,
    /// Unit direction X.
    pub dir_x: f64,
    /// Unit direction Y.
    pub dir_y: f64,
    /// Unit direction Z.
    pub dir_z: f64,
    /// Client timestamp of the request (seconds).
    pub requested_at: f64,
}
