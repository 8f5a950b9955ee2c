//! Matchmaker actor: a single Tokio task that owns the room registry.
//!
//! All inbound events funnel through one mpsc channel and are handled to
//! completion, one at a time, in arrival order. That serialization is the
//! whole concurrency story: no two events ever interleave their reads and
//! writes of the registry or the directory, so every check-and-mutate is
//! atomic without locks.
//!
//! Delayed work (the role announcement after a join, the opening-turn
//! signal after a rematch) is a command the actor schedules back to itself
//! through the same channel. A scheduled command can arrive after the room
//! it was meant for is gone, so each one re-validates the room's name,
//! generation, and phase before acting; a stale command is a logged no-op.

use std::collections::HashMap;
use std::time::Duration;

use duomatch_protocol::{ClientEvent, ConnectionId, Mark, RoomPhase, ServerEvent};
use tokio::sync::mpsc;

use crate::{MatchConfig, RoomError, RoomRegistry};

/// Channel sender for delivering outbound events to one connection.
pub type EventSender = mpsc::UnboundedSender<ServerEvent>;

/// Commands processed by the matchmaker actor.
enum MatchCommand {
    /// A connection was accepted; register its outbound sender.
    Connect {
        conn: ConnectionId,
        sender: EventSender,
    },

    /// A decoded client event from a connection.
    Inbound {
        conn: ConnectionId,
        event: ClientEvent,
    },

    /// A connection went away.
    Disconnect { conn: ConnectionId },

    /// Delayed continuation of a join: announce roles and pick a starter.
    StartRound { name: String, generation: u64 },

    /// Delayed continuation of a rematch: signal the opening turn to the
    /// participant holding `starter`.
    HandOff {
        name: String,
        generation: u64,
        starter: Mark,
    },
}

/// Handle to the running matchmaker. Cheap to clone — one per connection
/// handler.
#[derive(Clone)]
pub struct MatchmakerHandle {
    sender: mpsc::Sender<MatchCommand>,
}

impl MatchmakerHandle {
    /// Registers a connection and its outbound event channel.
    pub async fn connect(
        &self,
        conn: ConnectionId,
        sender: EventSender,
    ) -> Result<(), RoomError> {
        self.sender
            .send(MatchCommand::Connect { conn, sender })
            .await
            .map_err(|_| RoomError::Unavailable)
    }

    /// Forwards a decoded client event.
    pub async fn inbound(
        &self,
        conn: ConnectionId,
        event: ClientEvent,
    ) -> Result<(), RoomError> {
        self.sender
            .send(MatchCommand::Inbound { conn, event })
            .await
            .map_err(|_| RoomError::Unavailable)
    }

    /// Reports that a connection closed.
    pub async fn disconnect(&self, conn: ConnectionId) -> Result<(), RoomError> {
        self.sender
            .send(MatchCommand::Disconnect { conn })
            .await
            .map_err(|_| RoomError::Unavailable)
    }
}

/// Spawns the matchmaker actor task and returns a handle to it.
///
/// The actor runs until every handle is dropped; scheduled continuations
/// hold only weak senders and cannot keep it alive on their own.
pub fn spawn_matchmaker(config: MatchConfig) -> MatchmakerHandle {
    let (tx, rx) = mpsc::channel(config.command_buffer);

    let actor = Matchmaker {
        registry: RoomRegistry::new(),
        senders: HashMap::new(),
        config,
        timer_tx: tx.downgrade(),
        receiver: rx,
    };

    tokio::spawn(actor.run());

    MatchmakerHandle { sender: tx }
}

/// The actor state. Lives inside one Tokio task.
struct Matchmaker {
    registry: RoomRegistry,
    /// Per-connection outbound channels.
    senders: HashMap<ConnectionId, EventSender>,
    config: MatchConfig,
    /// Weak self-sender for scheduled continuations.
    timer_tx: mpsc::WeakSender<MatchCommand>,
    receiver: mpsc::Receiver<MatchCommand>,
}

impl Matchmaker {
    async fn run(mut self) {
        tracing::debug!("matchmaker started");

        while let Some(command) = self.receiver.recv().await {
            match command {
                MatchCommand::Connect { conn, sender } => {
                    self.handle_connect(conn, sender);
                }
                MatchCommand::Inbound { conn, event } => {
                    self.handle_event(conn, event);
                }
                MatchCommand::Disconnect { conn } => {
                    self.handle_disconnect(conn);
                }
                MatchCommand::StartRound { name, generation } => {
                    self.handle_start_round(&name, generation);
                }
                MatchCommand::HandOff { name, generation, starter } => {
                    self.handle_hand_off(&name, generation, starter);
                }
            }
        }

        tracing::debug!("matchmaker stopped");
    }

    fn handle_connect(&mut self, conn: ConnectionId, sender: EventSender) {
        self.senders.insert(conn, sender);
        self.send_to(conn, ServerEvent::Connected);
        tracing::debug!(%conn, "connection registered");
    }

    fn handle_event(&mut self, conn: ConnectionId, event: ClientEvent) {
        match event {
            ClientEvent::CreateGame { name } => self.create_game(conn, &name),
            ClientEvent::JoinGame { name } => self.join_game(conn, &name),
            ClientEvent::Toggle { payload } => {
                self.relay(conn, ServerEvent::Toggle { payload });
            }
            ClientEvent::NextPlayer => {
                self.relay(conn, ServerEvent::StartingPlayer);
            }
            ClientEvent::NextGame { mark } => self.next_game(conn, mark),
            ClientEvent::EndGame => self.end_game(conn),
            ClientEvent::DeleteGame => self.delete_game(conn),
        }
    }

    // -- Room lifecycle ---------------------------------------------------

    fn create_game(&mut self, conn: ConnectionId, name: &str) {
        let response = match self.registry.create(name, conn) {
            Ok(room) => ServerEvent::CreateGameRes {
                success: true,
                message: None,
                data: Some(room.snapshot()),
            },
            Err(error) => {
                tracing::debug!(%conn, room = %name, %error, "create rejected");
                ServerEvent::CreateGameRes {
                    success: false,
                    message: Some(error.to_string()),
                    data: None,
                }
            }
        };
        self.send_to(conn, response);
    }

    fn join_game(&mut self, conn: ConnectionId, name: &str) {
        let (snapshot, generation, members) =
            match self.registry.join(name, conn) {
                Ok(room) => (
                    room.snapshot(),
                    room.generation(),
                    room.participants()
                        .map(|p| p.connection)
                        .collect::<Vec<_>>(),
                ),
                Err(error) => {
                    tracing::debug!(%conn, room = %name, %error, "join rejected");
                    self.send_to(
                        conn,
                        ServerEvent::JoinGameRes {
                            success: false,
                            message: Some(error.to_string()),
                            data: None,
                        },
                    );
                    return;
                }
            };

        // Room-channel broadcast: the join is announced to both occupants.
        for &member in &members {
            self.send_to(member, ServerEvent::OpponentJoinGame { success: true });
        }
        for &member in &members {
            self.send_to(
                member,
                ServerEvent::JoinGameRes {
                    success: true,
                    message: None,
                    data: Some(snapshot.clone()),
                },
            );
        }

        self.schedule(
            MatchCommand::StartRound { name: name.to_owned(), generation },
            self.config.start_grace,
        );
    }

    /// Delayed join continuation. The room may have been removed (or its
    /// name reused) during the grace window, so `start_round` re-validates
    /// before any emission.
    fn handle_start_round(&mut self, name: &str, generation: u64) {
        let Some(room) = self.registry.start_round(name, generation) else {
            tracing::debug!(room = %name, "start skipped; room gone or superseded");
            return;
        };

        let assignments: Vec<(ConnectionId, Mark)> =
            room.participants().map(|p| (p.connection, p.mark)).collect();
        let starter = room
            .participant_by_mark(Mark::random())
            .map(|p| p.connection);

        for (member, mark) in assignments {
            self.send_to(member, ServerEvent::SetPlayer { mark });
        }
        if let Some(starter) = starter {
            self.send_to(starter, ServerEvent::StartingPlayer);
        }
        tracing::info!(room = %name, "round started");
    }

    fn next_game(&mut self, conn: ConnectionId, resting: Mark) {
        let Ok(peer) = self.registry.opponent_of(conn) else {
            tracing::debug!(%conn, "rematch request without a matched room");
            return;
        };
        self.send_to(peer, ServerEvent::NextGame);

        // `resting` sat out; the complementary mark opens the next round.
        // No new randomization here.
        if let Some(room) = self.registry.room_by_connection(conn) {
            let command = MatchCommand::HandOff {
                name: room.name().to_owned(),
                generation: room.generation(),
                starter: resting.complement(),
            };
            self.schedule(command, self.config.handoff_grace);
        }
    }

    /// Delayed rematch continuation, with the same staleness rules as
    /// `handle_start_round`.
    fn handle_hand_off(&mut self, name: &str, generation: u64, starter: Mark) {
        let starter_conn = match self.registry.room(name) {
            Some(room)
                if room.generation() == generation
                    && room.phase() == RoomPhase::InProgress =>
            {
                room.participant_by_mark(starter).map(|p| p.connection)
            }
            _ => {
                tracing::debug!(room = %name, "hand-off skipped; room gone or superseded");
                return;
            }
        };
        if let Some(conn) = starter_conn {
            self.send_to(conn, ServerEvent::StartingPlayer);
        }
    }

    fn end_game(&mut self, conn: ConnectionId) {
        if let Ok(peer) = self.registry.opponent_of(conn) {
            self.send_to(peer, ServerEvent::EndGame);
        }
        if let Some(room) = self.registry.remove_by_connection(conn) {
            tracing::info!(room = %room.name(), %conn, "game ended");
        }
    }

    fn delete_game(&mut self, conn: ConnectionId) {
        if let Some(room) = self.registry.remove_by_connection(conn) {
            tracing::debug!(room = %room.name(), %conn, "game deleted");
        }
    }

    fn handle_disconnect(&mut self, conn: ConnectionId) {
        self.senders.remove(&conn);

        if let Some(room) = self.registry.remove_by_connection(conn) {
            for participant in room.participants() {
                self.send_to(participant.connection, ServerEvent::OpponentLeft);
            }
            tracing::info!(
                room = %room.name(),
                %conn,
                "participant disconnected; room closed"
            );
        } else {
            tracing::debug!(%conn, "unmatched connection closed");
        }
    }

    // -- Delivery ---------------------------------------------------------

    /// Forwards an event to the sender's opponent; silently dropped when
    /// the opponent is unresolvable (no guaranteed delivery).
    fn relay(&self, conn: ConnectionId, event: ServerEvent) {
        match self.registry.opponent_of(conn) {
            Ok(peer) => self.send_to(peer, event),
            Err(error) => {
                tracing::debug!(%conn, %error, "relay dropped");
            }
        }
    }

    /// Sends an event to a single connection. Silently drops if the
    /// receiver is gone (connection already closed).
    fn send_to(&self, conn: ConnectionId, event: ServerEvent) {
        if let Some(sender) = self.senders.get(&conn) {
            let _ = sender.send(event);
        }
    }

    /// Schedules a command back onto the actor's own queue after `delay`.
    fn schedule(&self, command: MatchCommand, delay: Duration) {
        let tx = self.timer_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(tx) = tx.upgrade() {
                let _ = tx.send(command).await;
            }
        });
    }
}
