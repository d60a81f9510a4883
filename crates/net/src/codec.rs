//! Message encoding and decoding.
//!
//! JSON text, one message per payload; there is no length framing at this
//! layer (the transport collaborator owns delivery).

use crate::protocol::{ClientMessage, ServerMessage};
use thiserror::Error;

/// Encoding or decoding failure.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Payload was not valid JSON for the expected message shape.
    #[error("malformed message payload")]
    Malformed(#[from] serde_json::Error),
}

/// Encode a client message as a JSON payload.
pub fn encode_client_message(msg: &ClientMessage) -> Result<String, CodecError> {
    Ok(serde_json::to_string(msg)?)
}

/// Decode a client message from a JSON payload.
pub fn decode_client_message(payload: &str) -> Result<ClientMessage, CodecError> {
    Ok(serde_json::from_str(payload)?)
}

/// Encode a server message as a JSON payload.
pub fn encode_server_message(msg: &ServerMessage) -> Result<String, CodecError> {
    Ok(serde_json::to_string(msg)?)
}

/// Decode a server message from a JSON payload.
pub fn decode_server_message(payload: &str) -> Result<ServerMessage, CodecError> {
    Ok(serde_json::from_str(payload)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxelstrike_core::{PlayerInput, SimTick, TickSnapshot};

    #[test]
    fn test_client_message_roundtrip() {
        let mut input = PlayerInput::idle();
        input.forward = true;
        input.sequence = 12;
        input.yaw = 0.4;
        let msg = ClientMessage::PlayerInput(input);

        let payload = encode_client_message(&msg).expect("encode");
        let decoded = decode_client_message(&payload).expect("decode");
        assert_eq!(msg, decoded);
    }

    #[test]
    fn test_server_message_roundtrip() {
        let msg = ServerMessage::GameState {
            player_id: 4,
            seed: 42,
            snapshot: TickSnapshot {
                tick: SimTick(10),
                entities: vec![],
                projectiles: vec![],
            },
        };

        let payload = encode_server_message(&msg).expect("encode");
        let decoded = decode_server_message(&payload).expect("decode");
        assert_eq!(msg, decoded);
    }

    #[test]
    fn test_garbage_payload_is_rejected() {
        assert!(decode_client_message("not json").is_err());
        assert!(decode_client_message("{\"type\":\"unknown-kind\"}").is_err());
    }
}
