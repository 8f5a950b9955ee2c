//! Core protocol types for Duomatch's wire format.
//!
//! Every inbound and outbound event is a single JSON object, internally
//! tagged with a camelCase `type` field, sent as one WebSocket text frame.

use serde::{Deserialize, Serialize};

use std::fmt;

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Opaque identifier for one live client link.
///
/// Assigned by the transport when a connection is accepted, stable for the
/// link's duration, unique at any instant, and never reused while the link
/// is open. There is no persisted identity behind it.
///
/// `#[serde(transparent)]` makes a `ConnectionId(42)` serialize as plain
/// `42`, so room snapshots stay flat on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Creates a new `ConnectionId` from a raw `u64`.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Mark — the two-valued role symbol
// ---------------------------------------------------------------------------

/// One of the two mutually exclusive role symbols a participant can hold.
///
/// The creator's mark is drawn uniformly at random when the room is
/// created; the opponent always receives the [`complement`](Self::complement).
/// Serialized as `"x"` / `"o"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mark {
    X,
    O,
}

impl Mark {
    /// Returns the other mark.
    pub fn complement(self) -> Self {
        match self {
            Self::X => Self::O,
            Self::O => Self::X,
        }
    }

    /// Draws a mark uniformly at random.
    ///
    /// This is the single randomization entry point for role assignment
    /// and starting-player selection.
    pub fn random() -> Self {
        use rand::Rng;
        if rand::rng().random::<bool>() {
            Self::X
        } else {
            Self::O
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => write!(f, "x"),
            Self::O => write!(f, "o"),
        }
    }
}

// ---------------------------------------------------------------------------
// RoomPhase — room lifecycle tag
// ---------------------------------------------------------------------------

/// The lifecycle state of a room.
///
/// Transitions are strictly ordered:
///
/// ```text
/// AwaitingOpponent → ReadyToStart → InProgress → Ended
/// ```
///
/// - **AwaitingOpponent**: room exists with only its creator; joinable.
/// - **ReadyToStart**: an opponent joined; the role/turn announcement is
///   pending its grace delay.
/// - **InProgress**: roles announced, a starter picked; moves are relayed.
/// - **Ended**: terminal. A room in this phase has left the registry.
///
/// The phase is an explicit tag rather than something inferred from which
/// slots happen to be filled, so invalid transitions are direct checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomPhase {
    AwaitingOpponent,
    ReadyToStart,
    InProgress,
    Ended,
}

impl RoomPhase {
    /// Returns `true` if the room is accepting an opponent.
    pub fn is_joinable(&self) -> bool {
        matches!(self, Self::AwaitingOpponent)
    }
}

impl fmt::Display for RoomPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AwaitingOpponent => write!(f, "AwaitingOpponent"),
            Self::ReadyToStart => write!(f, "ReadyToStart"),
            Self::InProgress => write!(f, "InProgress"),
            Self::Ended => write!(f, "Ended"),
        }
    }
}

// ---------------------------------------------------------------------------
// Room snapshots
// ---------------------------------------------------------------------------

/// One participant as reported in a room snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantInfo {
    /// The participant's connection id.
    pub connection: ConnectionId,
    /// The mark assigned to this participant.
    pub mark: Mark,
}

/// The state of a room as returned in `createGameRes` / `joinGameRes`
/// success payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSnapshot {
    /// The room's unique, human-supplied name.
    pub name: String,
    /// Current lifecycle phase.
    pub status: RoomPhase,
    /// The participant that created the room.
    pub creator: ParticipantInfo,
    /// The joined opponent, absent while the room is waiting.
    pub opponent: Option<ParticipantInfo>,
}

// ---------------------------------------------------------------------------
// ClientEvent — inbound
// ---------------------------------------------------------------------------

/// Events a client sends to the server.
///
/// Connect and disconnect are transport-level facts, not wire messages, so
/// they have no variants here.
///
/// `#[serde(tag = "type", rename_all = "camelCase")]` produces internally
/// tagged JSON with the historical event names:
/// `{ "type": "createGame", "name": "alpha" }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientEvent {
    /// Create a room named `name` and wait for an opponent.
    CreateGame { name: String },

    /// Join the room named `name` as its opponent.
    JoinGame { name: String },

    /// Relay an opaque move payload to the opponent, unmodified.
    Toggle { payload: serde_json::Value },

    /// Hand the turn to the opponent.
    NextPlayer,

    /// Start a rematch. `mark` names the role that does NOT open the next
    /// round; the holder of the complementary mark is signalled to start.
    NextGame { mark: Mark },

    /// End the current game and tear the room down, notifying the opponent.
    EndGame,

    /// Tear the room down without notifying anyone.
    DeleteGame,
}

// ---------------------------------------------------------------------------
// ServerEvent — outbound
// ---------------------------------------------------------------------------

/// Events the server sends to clients.
///
/// `*Res` variants answer a specific request and go to the originating
/// connection (plus the room channel on a successful join); failures carry
/// a human-readable `message` and never reach the peer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerEvent {
    /// Greeting sent once, immediately after the connection is accepted.
    Connected,

    /// Outcome of a `createGame` request.
    CreateGameRes {
        success: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data: Option<RoomSnapshot>,
    },

    /// Outcome of a `joinGame` request.
    JoinGameRes {
        success: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data: Option<RoomSnapshot>,
    },

    /// Broadcast to the room when its opponent slot is filled.
    OpponentJoinGame { success: bool },

    /// Tells one participant which mark they hold this round.
    SetPlayer { mark: Mark },

    /// Tells exactly one participant that the opening move is theirs.
    StartingPlayer,

    /// A move payload relayed verbatim from the peer.
    Toggle { payload: serde_json::Value },

    /// The peer requested a rematch.
    NextGame,

    /// The peer ended the game.
    EndGame,

    /// The peer's connection went away; the room is gone.
    OpponentLeft,
}

// =========================================================================
// Tests
// =========================================================================
