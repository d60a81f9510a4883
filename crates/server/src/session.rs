//! The authoritative session: clients, input intake, tick driver, broadcast.

use crate::spawn::spawn_point;
use std::collections::HashMap;
use tracing::{debug, info, instrument, warn};
use voxelstrike_core::tuning::TICK_DT;
use voxelstrike_core::{EntityId, SimEvent};
use voxelstrike_net::{decode_client_message, ClientMessage, InputRateLimiter, ServerMessage};
use voxelstrike_sim::{FixedStep, Simulation};

/// Opaque client key assigned by the transport collaborator.
pub type ClientId = u64;

/// Per-client state tracked by the server.
pub struct ConnectedClient {
    /// Player entity assigned to this client.
    player_id: EntityId,
    /// Input flood gate for this client.
    rate_limiter: InputRateLimiter,
}

impl ConnectedClient {
    /// Player entity assigned to this client.
    pub fn player_id(&self) -> EntityId {
        self.player_id
    }
}

/// Authoritative session over one simulated world.
pub struct ArenaServer {
    sim: Simulation,
    driver: FixedStep,
    clients: HashMap<ClientId, ConnectedClient>,
    next_entity_id: EntityId,
}

impl ArenaServer {
    /// Create a session for a world seed.
    pub fn new(seed: i64) -> Self {
        info!(seed, "arena session created");
        Self {
            sim: Simulation::new(seed),
            driver: FixedStep::new(),
            clients: HashMap::new(),
            next_entity_id: 1,
        }
    }

    /// The simulated world (post-tick reads only).
    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    /// Number of connected clients.
    pub fn client_count(&self) -> usize {
        self.clients.len()
    }

    /// Register a client: assign an entity id, spawn the player at its
    /// deterministic spawn point, and return the initial state message for
    /// that client. The join notification reaches everyone with the next
    /// broadcast batch. Re-connecting an already-known client yields `None`.
    #[instrument(skip(self))]
    pub fn connect(&mut self, client: ClientId) -> Option<ServerMessage> {
        if self.clients.contains_key(&client) {
            warn!(client, "duplicate connect ignored");
            return None;
        }

        let player_id = self.next_entity_id;
        self.next_entity_id += 1;

        let (x, y, z) = spawn_point(self.sim.terrain(), player_id);
        self.sim.spawn_player(player_id, x, y, z);
        self.clients.insert(
            client,
            ConnectedClient {
                player_id,
                rate_limiter: InputRateLimiter::new(),
            },
        );
        info!(client, player_id, "client joined");

        Some(ServerMessage::GameState {
            player_id,
            seed: self.sim.seed(),
            snapshot: self.sim.snapshot(),
        })
    }

    /// Drop a client. Transport loss routes here too: the player simply
    /// leaves the registry.
    #[instrument(skip(self))]
    pub fn disconnect(&mut self, client: ClientId) {
        if let Some(state) = self.clients.remove(&client) {
            info!(client, player_id = state.player_id, "client left");
            self.sim.remove_entity(state.player_id);
        }
    }

    /// Spawn a server-controlled enemy at its deterministic spawn point.
    pub fn spawn_enemy(&mut self) -> EntityId {
        let id = self.next_entity_id;
        self.next_entity_id += 1;
        let (x, y, z) = spawn_point(self.sim.terrain(), id);
        self.sim.spawn_enemy(id, x, y, z);
        id
    }

    /// Handle a raw JSON payload from a client.
    ///
    /// Malformed or invalid payloads are dropped with a log line, never
    /// propagated as faults. `now` is the wall clock (seconds since session
    /// start).
    pub fn handle_payload(&mut self, client: ClientId, payload: &str, now: f64) {
        let message = match decode_client_message(payload) {
            Ok(message) => message,
            Err(error) => {
                warn!(client, %error, "dropping undecodable payload");
                return;
            }
        };
        if let Err(error) = message.verify() {
            warn!(client, %error, "dropping invalid message");
            return;
        }
        self.handle_message(client, message, now);
    }

    /// Handle a decoded, verified client message.
    pub fn handle_message(&mut self, client: ClientId, message: ClientMessage, now: f64) {
        let Some(state) = self.clients.get_mut(&client) else {
            debug!(client, "message from unknown client ignored");
            return;
        };
        let player_id = state.player_id;

        match message {
            ClientMessage::PlayerInput(input) => {
                // Inputs are accepted at most once per ~16 ms per client.
                if state.rate_limiter.try_accept(now) {
                    self.sim.apply_input(player_id, input);
                }
            }
            ClientMessage::PlayerShoot(shot) => {
                self.sim.try_fire(player_id, &shot, now);
            }
            ClientMessage::PlayerReload => {
                self.sim.try_reload(player_id, now);
            }
        }
    }

    /// Feed measured wall time into the fixed-step driver and run the ticks
    /// it yields. Returns the broadcast batch for this advance: events as
    /// messages, then one `game-update` snapshot per tick.
    pub fn advance(&mut self, elapsed: f64, now: f64) -> Vec<ServerMessage> {
        let ticks = self.driver.advance(elapsed);
        let mut batch = Vec::new();
        for _ in 0..ticks {
            self.sim.step(TICK_DT, now);
            for event in self.sim.drain_events() {
                batch.push(event_to_message(event));
            }
            batch.push(ServerMessage::GameUpdate(self.sim.snapshot()));
        }
        batch
    }

    /// Run exactly one tick regardless of the accumulator (headless tests).
    pub fn tick_once(&mut self, now: f64) -> Vec<ServerMessage> {
        self.sim.step(TICK_DT, now);
        let mut batch: Vec<ServerMessage> = self
            .sim
            .drain_events()
            .into_iter()
            .map(event_to_message)
            .collect();
        batch.push(ServerMessage::GameUpdate(self.sim.snapshot()));
        batch
    }
}

/// Convert a simulation event into its broadcast message.
fn event_to_message(event: SimEvent) -> ServerMessage {
    match event {
        SimEvent::Joined { id } => ServerMessage::PlayerJoined { id },
        SimEvent::Left { id } => ServerMessage::PlayerLeft { id },
        SimEvent::Hit(hit) => ServerMessage::PlayerHit(hit),
        SimEvent::Shot {
            shooter,
            x,
            y,
            z,
            vel_x,
            vel_y,
            vel_z,
        } => ServerMessage::PlayerShot {
            shooter,
            x,
            y,
            z,
            vel_x,
            vel_y,
            vel_z,
        },
        SimEvent::Reloaded { id, ammo, reserve } => {
            ServerMessage::PlayerReloaded { id, ammo, reserve }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxelstrike_core::tuning::{INPUT_MIN_INTERVAL, WORLD_SEED};
    use voxelstrike_core::PlayerInput;
    use voxelstrike_net::encode_client_message;

    fn input_payload(sequence: u32, forward: bool) -> String {
        let mut input = PlayerInput::idle();
        input.sequence = sequence;
        input.forward = forward;
        encode_client_message(&ClientMessage::PlayerInput(input)).expect("encode")
    }

    #[test]
    fn test_connect_returns_game_state() {
        let mut server = ArenaServer::new(WORLD_SEED);
        let reply = server.connect(100).expect("first connect succeeds");

        match reply {
            ServerMessage::GameState {
                player_id,
                seed,
                snapshot,
            } => {
                assert_eq!(player_id, 1);
                assert_eq!(seed, WORLD_SEED);
                assert_eq!(snapshot.entities.len(), 1);
            }
            other => panic!("expected game-state, got {:?}", other),
        }
        assert_eq!(server.client_count(), 1);
    }

    #[test]
    fn test_duplicate_connect_rejected() {
        let mut server = ArenaServer::new(WORLD_SEED);
        assert!(server.connect(100).is_some());
        assert!(server.connect(100).is_none());
        assert_eq!(server.client_count(), 1);
    }

    #[test]
    fn test_join_notification_in_next_batch() {
        let mut server = ArenaServer::new(WORLD_SEED);
        server.connect(100);

        let batch = server.tick_once(0.0);
        assert!(batch
            .iter()
            .any(|msg| matches!(msg, ServerMessage::PlayerJoined { id: 1 })));
        assert!(batch
            .iter()
            .any(|msg| matches!(msg, ServerMessage::GameUpdate(_))));
    }

    #[test]
    fn test_disconnect_emits_leave() {
        let mut server = ArenaServer::new(WORLD_SEED);
        server.connect(100);
        server.tick_once(0.0);

        server.disconnect(100);
        let batch = server.tick_once(TICK_DT);
        assert!(batch
            .iter()
            .any(|msg| matches!(msg, ServerMessage::PlayerLeft { id: 1 })));
        assert_eq!(server.simulation().entity_count(), 0);
    }

    #[test]
    fn test_input_rate_limit() {
        let mut server = ArenaServer::new(WORLD_SEED);
        server.connect(100);

        server.handle_payload(100, &input_payload(1, true), 1.0);
        // Flood: inside the window, dropped.
        server.handle_payload(100, &input_payload(2, true), 1.001);
        server.tick_once(1.0);

        let snapshot = server.simulation().snapshot();
        assert_eq!(snapshot.entities[0].input_sequence, 1);

        // Past the window: accepted.
        server.handle_payload(100, &input_payload(3, true), 1.0 + INPUT_MIN_INTERVAL);
        server.tick_once(1.1);
        let snapshot = server.simulation().snapshot();
        assert_eq!(snapshot.entities[0].input_sequence, 3);
    }

    #[test]
    fn test_malformed_payload_is_dropped() {
        let mut server = ArenaServer::new(WORLD_SEED);
        server.connect(100);
        server.handle_payload(100, "{\"type\":\"player-shoot\",\"bogus\":true}", 0.0);
        server.handle_payload(100, "garbage", 0.0);
        // Session unaffected.
        assert_eq!(server.simulation().projectiles().active_count(), 0);
    }

    #[test]
    fn test_unknown_client_message_ignored() {
        let mut server = ArenaServer::new(WORLD_SEED);
        server.handle_payload(999, &input_payload(1, true), 0.0);
        assert_eq!(server.simulation().entity_count(), 0);
    }

    #[test]
    fn test_shot_spawns_projectile_and_broadcast() {
        let mut server = ArenaServer::new(WORLD_SEED);
        server.connect(100);
        server.tick_once(0.0);

        let shot = ClientMessage::PlayerShoot(voxelstrike_core::ShotRequest {
            origin_x: 0.0,
            origin_y: 55.0,
            origin_z: 0.0,
            dir_x: 0.0,
            dir_y: 0.0,
            dir_z: 1.0,
            requested_at: 1.0,
        });
        let payload = encode_client_message(&shot).expect("encode");
        server.handle_payload(100, &payload, 1.0);

        assert_eq!(server.simulation().projectiles().active_count(), 1);
        let batch = server.tick_once(1.0);
        assert!(batch
            .iter()
            .any(|msg| matches!(msg, ServerMessage::PlayerShot { shooter: 1, .. })));
    }

    #[test]
    fn test_advance_consumes_whole_ticks() {
        let mut server = ArenaServer::new(WORLD_SEED);
        server.connect(100);

        // Half a tick: nothing runs.
        assert!(server.advance(TICK_DT * 0.5, 0.0).is_empty());
        // The other half: exactly one tick.
        let batch = server.advance(TICK_DT * 0.5, 0.0);
        let updates = batch
            .iter()
            .filter(|msg| matches!(msg, ServerMessage::GameUpdate(_)))
            .count();
        assert_eq!(updates, 1);
    }

    #[test]
    fn test_identical_servers_stay_identical() {
        let mut a = ArenaServer::new(WORLD_SEED);
        let mut b = ArenaServer::new(WORLD_SEED);

        for server in [&mut a, &mut b] {
            server.connect(100);
            server.connect(200);
            server.spawn_enemy();
            server.handle_payload(100, &input_payload(1, true), 0.0);
        }

        for i in 0..100 {
            let now = i as f64 * TICK_DT;
            let batch_a = a.tick_once(now);
            let batch_b = b.tick_once(now);
            assert_eq!(batch_a, batch_b, "diverged at tick {}", i);
        }
        assert_eq!(a.simulation().snapshot(), b.simulation().snapshot());
    }
}
