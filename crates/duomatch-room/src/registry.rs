//! The room registry: name-keyed room store plus the connection index.
//!
//! # Concurrency note
//!
//! `RoomRegistry` is NOT thread-safe by itself — it uses plain `HashMap`s.
//! This is intentional: the registry is owned by the matchmaker actor and
//! only ever touched from that one task, which serializes every mutation.

use std::collections::HashMap;

use duomatch_protocol::{ConnectionId, Mark, RoomPhase};

use crate::{ConnectionDirectory, Room, RoomError};

/// Minimum length of a room name, in characters.
const MIN_NAME_CHARS: usize = 2;

/// Owns every live room and keeps the connection directory in sync with
/// each mutation.
///
/// Names are case-sensitive and unique among live rooms. Each room carries
/// a generation stamp from a registry-wide counter, so a room that is torn
/// down and recreated under the same name is distinguishable from its
/// predecessor.
pub struct RoomRegistry {
    /// Live rooms, keyed by name.
    rooms: HashMap<String, Room>,

    /// Connection → room-name reverse index, updated atomically with
    /// `rooms` on every create, join, and remove.
    directory: ConnectionDirectory,

    /// Source of generation stamps.
    next_generation: u64,
}

impl RoomRegistry {
    /// Creates a new, empty registry.
    pub fn new() -> Self {
        Self {
            rooms: HashMap::new(),
            directory: ConnectionDirectory::new(),
            next_generation: 0,
        }
    }

    /// Creates a room named `name` with `creator` as its first participant.
    ///
    /// The creator's mark is drawn uniformly at random; the opponent slot
    /// is left empty and will receive the complement on join.
    ///
    /// # Errors
    /// - [`RoomError::InvalidName`] — name shorter than 2 characters
    /// - [`RoomError::AlreadyExists`] — a live room holds this name
    /// - [`RoomError::AlreadyInRoom`] — the creator is already matched
    pub fn create(
        &mut self,
        name: &str,
        creator: ConnectionId,
    ) -> Result<&Room, RoomError> {
        if name.chars().count() < MIN_NAME_CHARS {
            return Err(RoomError::InvalidName);
        }
        if self.rooms.contains_key(name) {
            return Err(RoomError::AlreadyExists(name.to_owned()));
        }
        if let Some(existing) = self.directory.room_name(creator) {
            return Err(RoomError::AlreadyInRoom(creator, existing.to_owned()));
        }

        self.next_generation += 1;
        let room = Room::new(
            name.to_owned(),
            self.next_generation,
            creator,
            Mark::random(),
        );
        self.directory.bind(creator, name);
        self.rooms.insert(name.to_owned(), room);

        tracing::info!(room = %name, conn = %creator, "room created");
        Ok(self.rooms.get(name).expect("just inserted"))
    }

    /// Fills the opponent slot of the room named `name` with `joiner`.
    ///
    /// # Errors
    /// - [`RoomError::NotFound`] — no live room has this name
    /// - [`RoomError::RoomFull`] — both slots occupied (or the room has
    ///   already moved past its joinable phase)
    /// - [`RoomError::SelfJoin`] — the joiner created this room
    /// - [`RoomError::AlreadyInRoom`] — the joiner is already matched
    pub fn join(
        &mut self,
        name: &str,
        joiner: ConnectionId,
    ) -> Result<&Room, RoomError> {
        let Some(room) = self.rooms.get_mut(name) else {
            return Err(RoomError::NotFound(name.to_owned()));
        };
        if room.is_full() || !room.phase().is_joinable() {
            return Err(RoomError::RoomFull(name.to_owned()));
        }
        if room.creator().connection == joiner {
            return Err(RoomError::SelfJoin);
        }
        if let Some(existing) = self.directory.room_name(joiner) {
            return Err(RoomError::AlreadyInRoom(joiner, existing.to_owned()));
        }

        room.admit(joiner);
        self.directory.bind(joiner, name);

        tracing::info!(room = %name, conn = %joiner, "opponent joined");
        Ok(&*room)
    }

    /// Moves a room from `ReadyToStart` to `InProgress`.
    ///
    /// This is the re-validation gate for the delayed role announcement:
    /// it returns `Some` only if the room still exists, is the same
    /// incarnation (`generation` matches), and has not already started or
    /// ended. A stale continuation gets `None` and must do nothing.
    pub fn start_round(
        &mut self,
        name: &str,
        generation: u64,
    ) -> Option<&Room> {
        let room = self.rooms.get_mut(name)?;
        if room.generation() != generation
            || room.phase() != RoomPhase::ReadyToStart
        {
            return None;
        }
        room.begin();
        Some(&*room)
    }

    /// Looks up a live room by name.
    pub fn room(&self, name: &str) -> Option<&Room> {
        self.rooms.get(name)
    }

    /// Removes the room named `name`, unbinding both participants.
    ///
    /// Idempotent: removing an absent name is a no-op returning `None`.
    /// The returned room carries the terminal `Ended` phase.
    pub fn remove(&mut self, name: &str) -> Option<Room> {
        let mut room = self.rooms.remove(name)?;
        let connections: Vec<ConnectionId> =
            room.participants().map(|p| p.connection).collect();
        for connection in connections {
            self.directory.unbind(connection);
        }
        room.finish();
        tracing::info!(room = %name, "room removed");
        Some(room)
    }

    /// The room this connection participates in, if any. O(1).
    pub fn room_by_connection(&self, connection: ConnectionId) -> Option<&Room> {
        let name = self.directory.room_name(connection)?;
        self.rooms.get(name)
    }

    /// The other participant's connection id within the same room.
    ///
    /// # Errors
    /// [`RoomError::UnknownConnection`] if the connection is in no room or
    /// the room has no opponent yet.
    pub fn opponent_of(
        &self,
        connection: ConnectionId,
    ) -> Result<ConnectionId, RoomError> {
        self.room_by_connection(connection)
            .and_then(|room| room.peer_of(connection))
            .map(|peer| peer.connection)
            .ok_or(RoomError::UnknownConnection(connection))
    }

    /// Removes the room the connection participates in, if any.
    ///
    /// Safe to call unconditionally — a connection with no room is a
    /// no-op. Used on disconnect and client-initiated teardown.
    pub fn remove_by_connection(
        &mut self,
        connection: ConnectionId,
    ) -> Option<Room> {
        let name = self.directory.room_name(connection)?.to_owned();
        self.remove(&name)
    }

    /// Read-only view of the connection index.
    pub fn directory(&self) -> &ConnectionDirectory {
        &self.directory
    }

    /// Number of live rooms.
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    /// Returns `true` if no rooms are live.
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn cid(id: u64) -> ConnectionId {
        ConnectionId::new(id)
    }

    /// Registry with "alpha" created by connection 1.
    fn registry_with_alpha() -> RoomRegistry {
        let mut registry = RoomRegistry::new();
        registry.create("alpha", cid(1)).expect("create should succeed");
        registry
    }

    // =====================================================================
    // create()
    // =====================================================================

    #[test]
    fn test_create_new_room_awaits_opponent() {
        let mut registry = RoomRegistry::new();

        let room = registry.create("alpha", cid(1)).expect("should succeed");

        assert_eq!(room.name(), "alpha");
        assert_eq!(room.phase(), RoomPhase::AwaitingOpponent);
        assert_eq!(room.creator().connection, cid(1));
        assert!(room.opponent().is_none());
    }

    #[test]
    fn test_create_binds_creator_in_directory() {
        let registry = registry_with_alpha();
        assert_eq!(registry.directory().room_name(cid(1)), Some("alpha"));
    }

    #[test]
    fn test_create_short_name_rejected_without_side_effects() {
        let mut registry = RoomRegistry::new();

        for name in ["", "a", "é"] {
            let result = registry.create(name, cid(1));
            assert!(
                matches!(result, Err(RoomError::InvalidName)),
                "{name:?} should be rejected"
            );
        }
        assert!(registry.is_empty(), "no entry should be registered");
        assert!(registry.directory().is_empty());
    }

    #[test]
    fn test_create_two_character_multibyte_name_is_valid() {
        let mut registry = RoomRegistry::new();
        assert!(registry.create("éé", cid(1)).is_ok());
    }

    #[test]
    fn test_create_duplicate_name_returns_already_exists() {
        // Two creates for one name in strict order: the first wins, the
        // second observes the name as taken.
        let mut registry = registry_with_alpha();

        let result = registry.create("alpha", cid(2));

        assert!(
            matches!(result, Err(RoomError::AlreadyExists(ref n)) if n == "alpha")
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_create_names_are_case_sensitive() {
        let mut registry = registry_with_alpha();
        assert!(registry.create("Alpha", cid(2)).is_ok());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_create_while_matched_returns_already_in_room() {
        let mut registry = registry_with_alpha();

        let result = registry.create("beta", cid(1));

        assert!(matches!(
            result,
            Err(RoomError::AlreadyInRoom(c, ref n)) if c == cid(1) && n == "alpha"
        ));
    }

    #[test]
    fn test_create_generations_are_unique_across_name_reuse() {
        let mut registry = registry_with_alpha();
        let first = registry.room("alpha").unwrap().generation();

        registry.remove("alpha");
        registry.create("alpha", cid(1)).expect("recreate should succeed");
        let second = registry.room("alpha").unwrap().generation();

        assert_ne!(first, second);
    }

    // =====================================================================
    // join()
    // =====================================================================

    #[test]
    fn test_join_fills_opponent_with_complementary_mark() {
        let mut registry = registry_with_alpha();

        let room = registry.join("alpha", cid(2)).expect("should succeed");

        assert_eq!(room.phase(), RoomPhase::ReadyToStart);
        let creator = *room.creator();
        let opponent = *room.opponent().expect("opponent present");
        assert_ne!(creator.connection, opponent.connection);
        assert_eq!(creator.mark.complement(), opponent.mark);
    }

    #[test]
    fn test_join_makes_opponents_mutually_resolvable() {
        let mut registry = registry_with_alpha();
        registry.join("alpha", cid(2)).unwrap();

        assert_eq!(registry.opponent_of(cid(1)).unwrap(), cid(2));
        assert_eq!(registry.opponent_of(cid(2)).unwrap(), cid(1));
    }

    #[test]
    fn test_join_missing_room_returns_not_found() {
        let mut registry = RoomRegistry::new();
        let result = registry.join("missing", cid(1));
        assert!(
            matches!(result, Err(RoomError::NotFound(ref n)) if n == "missing")
        );
    }

    #[test]
    fn test_join_full_room_returns_room_full() {
        let mut registry = registry_with_alpha();
        registry.join("alpha", cid(2)).unwrap();

        let result = registry.join("alpha", cid(3));

        assert!(
            matches!(result, Err(RoomError::RoomFull(ref n)) if n == "alpha")
        );
    }

    #[test]
    fn test_join_own_room_returns_self_join() {
        let mut registry = registry_with_alpha();
        let result = registry.join("alpha", cid(1));
        assert!(matches!(result, Err(RoomError::SelfJoin)));
    }

    #[test]
    fn test_join_while_matched_elsewhere_returns_already_in_room() {
        let mut registry = registry_with_alpha();
        registry.create("beta", cid(2)).unwrap();

        let result = registry.join("alpha", cid(2));

        assert!(matches!(
            result,
            Err(RoomError::AlreadyInRoom(c, ref n)) if c == cid(2) && n == "beta"
        ));
    }

    // =====================================================================
    // start_round()
    // =====================================================================

    #[test]
    fn test_start_round_moves_room_in_progress() {
        let mut registry = registry_with_alpha();
        let generation = registry.join("alpha", cid(2)).unwrap().generation();

        let room = registry
            .start_round("alpha", generation)
            .expect("start should be accepted");

        assert_eq!(room.phase(), RoomPhase::InProgress);
    }

    #[test]
    fn test_start_round_rejects_missing_room() {
        let mut registry = RoomRegistry::new();
        assert!(registry.start_round("alpha", 1).is_none());
    }

    #[test]
    fn test_start_round_rejects_waiting_room() {
        // The continuation only makes sense once an opponent joined.
        let mut registry = registry_with_alpha();
        let generation = registry.room("alpha").unwrap().generation();
        assert!(registry.start_round("alpha", generation).is_none());
    }

    #[test]
    fn test_start_round_rejects_superseded_generation() {
        // The room was removed and its name reused while the continuation
        // slept; the stale generation must not start the new room.
        let mut registry = registry_with_alpha();
        let stale = registry.join("alpha", cid(2)).unwrap().generation();

        registry.remove("alpha");
        registry.create("alpha", cid(3)).unwrap();
        registry.join("alpha", cid(4)).unwrap();

        assert!(registry.start_round("alpha", stale).is_none());
        assert_eq!(
            registry.room("alpha").unwrap().phase(),
            RoomPhase::ReadyToStart
        );
    }

    #[test]
    fn test_start_round_is_not_repeatable() {
        let mut registry = registry_with_alpha();
        let generation = registry.join("alpha", cid(2)).unwrap().generation();

        assert!(registry.start_round("alpha", generation).is_some());
        assert!(registry.start_round("alpha", generation).is_none());
    }

    // =====================================================================
    // remove() / remove_by_connection()
    // =====================================================================

    #[test]
    fn test_remove_clears_room_and_both_mappings() {
        let mut registry = registry_with_alpha();
        registry.join("alpha", cid(2)).unwrap();

        let removed = registry.remove("alpha").expect("room should be removed");

        assert_eq!(removed.phase(), RoomPhase::Ended);
        assert!(registry.is_empty());
        assert!(!registry.directory().contains(cid(1)));
        assert!(!registry.directory().contains(cid(2)));
    }

    #[test]
    fn test_remove_absent_name_is_noop() {
        let mut registry = RoomRegistry::new();
        assert!(registry.remove("ghost").is_none());
    }

    #[test]
    fn test_remove_by_connection_works_for_either_participant() {
        for leaver in [1, 2] {
            let mut registry = registry_with_alpha();
            registry.join("alpha", cid(2)).unwrap();

            let removed = registry
                .remove_by_connection(cid(leaver))
                .expect("room should be removed");

            assert_eq!(removed.name(), "alpha");
            assert!(registry.is_empty());
            assert!(registry.directory().is_empty());
        }
    }

    #[test]
    fn test_remove_by_connection_unmatched_is_noop() {
        let mut registry = registry_with_alpha();

        assert!(registry.remove_by_connection(cid(42)).is_none());

        // Registry and directory state unchanged.
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.directory().len(), 1);
    }

    #[test]
    fn test_name_is_reusable_after_removal() {
        let mut registry = registry_with_alpha();
        registry.remove("alpha");
        assert!(registry.create("alpha", cid(2)).is_ok());
    }

    // =====================================================================
    // opponent_of() / room_by_connection()
    // =====================================================================

    #[test]
    fn test_opponent_of_unknown_connection_errors() {
        let registry = RoomRegistry::new();
        let result = registry.opponent_of(cid(9));
        assert!(matches!(
            result,
            Err(RoomError::UnknownConnection(c)) if c == cid(9)
        ));
    }

    #[test]
    fn test_opponent_of_waiting_room_errors() {
        // The creator has no peer until someone joins.
        let registry = registry_with_alpha();
        assert!(matches!(
            registry.opponent_of(cid(1)),
            Err(RoomError::UnknownConnection(_))
        ));
    }

    #[test]
    fn test_room_by_connection_resolves_both_participants() {
        let mut registry = registry_with_alpha();
        registry.join("alpha", cid(2)).unwrap();

        assert_eq!(registry.room_by_connection(cid(1)).unwrap().name(), "alpha");
        assert_eq!(registry.room_by_connection(cid(2)).unwrap().name(), "alpha");
        assert!(registry.room_by_connection(cid(3)).is_none());
    }
}
