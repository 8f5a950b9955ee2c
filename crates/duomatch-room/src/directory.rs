//! Reverse index from connection ids to room names.

use std::collections::HashMap;

use duomatch_protocol::ConnectionId;

/// Maps each connection to the name of the room it participates in.
///
/// This is the dedicated reverse index that turns "which room is this
/// connection in?" from a scan over all rooms into an O(1) lookup. Entries
/// are non-owning back-references: the [`RoomRegistry`](crate::RoomRegistry)
/// owns the rooms and is the only code that mutates this map, atomically
/// with every create, join, and remove.
#[derive(Debug, Default)]
pub struct ConnectionDirectory {
    rooms_by_connection: HashMap<ConnectionId, String>,
}

impl ConnectionDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn bind(&mut self, connection: ConnectionId, room: &str) {
        self.rooms_by_connection.insert(connection, room.to_owned());
    }

    pub(crate) fn unbind(&mut self, connection: ConnectionId) {
        self.rooms_by_connection.remove(&connection);
    }

    /// The name of the room this connection participates in, if any.
    pub fn room_name(&self, connection: ConnectionId) -> Option<&str> {
        self.rooms_by_connection.get(&connection).map(String::as_str)
    }

    /// Returns `true` if the connection participates in a live room.
    pub fn contains(&self, connection: ConnectionId) -> bool {
        self.rooms_by_connection.contains_key(&connection)
    }

    /// Number of bound connections.
    pub fn len(&self) -> usize {
        self.rooms_by_connection.len()
    }

    /// Returns `true` if no connection is bound.
    pub fn is_empty(&self) -> bool {
        self.rooms_by_connection.is_empty()
    }
}
