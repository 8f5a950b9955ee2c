//! The room record: one matchable game session and its occupants.

use duomatch_protocol::{
    ConnectionId, Mark, ParticipantInfo, RoomPhase, RoomSnapshot,
};

/// A connection paired with its assigned mark within a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Participant {
    /// The participant's connection id.
    pub connection: ConnectionId,
    /// The mark this participant plays.
    pub mark: Mark,
}

/// One named, at-most-two-occupant game session.
///
/// The creator is present from birth; the opponent slot fills exactly once,
/// on a successful join, and always holds the complement of the creator's
/// mark. The `generation` stamp lets delayed continuations detect that a
/// room was torn down and its name reused while they slept.
#[derive(Debug, Clone)]
pub struct Room {
    name: String,
    generation: u64,
    phase: RoomPhase,
    creator: Participant,
    opponent: Option<Participant>,
}

impl Room {
    pub(crate) fn new(
        name: String,
        generation: u64,
        creator: ConnectionId,
        creator_mark: Mark,
    ) -> Self {
        Self {
            name,
            generation,
            phase: RoomPhase::AwaitingOpponent,
            creator: Participant { connection: creator, mark: creator_mark },
            opponent: None,
        }
    }

    /// The room's unique, human-supplied name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The creation stamp distinguishing this room from any earlier room
    /// that held the same name.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> RoomPhase {
        self.phase
    }

    /// The participant that created the room.
    pub fn creator(&self) -> &Participant {
        &self.creator
    }

    /// The joined opponent, if any.
    pub fn opponent(&self) -> Option<&Participant> {
        self.opponent.as_ref()
    }

    /// Returns `true` when both participant slots are occupied.
    pub fn is_full(&self) -> bool {
        self.opponent.is_some()
    }

    /// Iterates over the present participants (one or two).
    pub fn participants(&self) -> impl Iterator<Item = &Participant> {
        std::iter::once(&self.creator).chain(self.opponent.as_ref())
    }

    /// Finds the participant holding the given mark.
    pub fn participant_by_mark(&self, mark: Mark) -> Option<&Participant> {
        self.participants().find(|p| p.mark == mark)
    }

    /// Returns the *other* participant relative to `connection`, or `None`
    /// if the connection is not in this room or the room has no opponent.
    pub fn peer_of(&self, connection: ConnectionId) -> Option<&Participant> {
        let opponent = self.opponent.as_ref()?;
        if self.creator.connection == connection {
            Some(opponent)
        } else if opponent.connection == connection {
            Some(&self.creator)
        } else {
            None
        }
    }

    /// Builds the wire snapshot carried by `*Res` success payloads.
    pub fn snapshot(&self) -> RoomSnapshot {
        RoomSnapshot {
            name: self.name.clone(),
            status: self.phase,
            creator: ParticipantInfo {
                connection: self.creator.connection,
                mark: self.creator.mark,
            },
            opponent: self.opponent.as_ref().map(|p| ParticipantInfo {
                connection: p.connection,
                mark: p.mark,
            }),
        }
    }

    /// Fills the opponent slot with the complementary mark and moves the
    /// room to `ReadyToStart`. The caller has already validated occupancy.
    pub(crate) fn admit(&mut self, joiner: ConnectionId) {
        self.opponent = Some(Participant {
            connection: joiner,
            mark: self.creator.mark.complement(),
        });
        self.phase = RoomPhase::ReadyToStart;
    }

    /// `ReadyToStart` → `InProgress`, after the role/turn announcement.
    pub(crate) fn begin(&mut self) {
        self.phase = RoomPhase::InProgress;
    }

    /// Stamps the terminal phase on a room leaving the registry.
    pub(crate) fn finish(&mut self) {
        self.phase = RoomPhase::Ended;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cid(id: u64) -> ConnectionId {
        ConnectionId::new(id)
    }

    fn waiting_room() -> Room {
        Room::new("alpha".into(), 1, cid(1), Mark::X)
    }

    #[test]
    fn test_new_room_awaits_opponent() {
        let room = waiting_room();
        assert_eq!(room.phase(), RoomPhase::AwaitingOpponent);
        assert!(!room.is_full());
        assert!(room.opponent().is_none());
        assert_eq!(room.participants().count(), 1);
    }

    #[test]
    fn test_admit_assigns_complementary_mark() {
        let mut room = waiting_room();
        room.admit(cid(2));

        assert_eq!(room.phase(), RoomPhase::ReadyToStart);
        assert!(room.is_full());
        let opponent = room.opponent().expect("opponent should be present");
        assert_eq!(opponent.connection, cid(2));
        assert_eq!(opponent.mark, Mark::O);
    }

    #[test]
    fn test_peer_of_resolves_both_directions() {
        let mut room = waiting_room();
        room.admit(cid(2));

        assert_eq!(room.peer_of(cid(1)).unwrap().connection, cid(2));
        assert_eq!(room.peer_of(cid(2)).unwrap().connection, cid(1));
        assert!(room.peer_of(cid(3)).is_none());
    }

    #[test]
    fn test_peer_of_waiting_room_is_none() {
        let room = waiting_room();
        assert!(room.peer_of(cid(1)).is_none());
    }

    #[test]
    fn test_participant_by_mark() {
        let mut room = waiting_room();
        room.admit(cid(2));

        assert_eq!(
            room.participant_by_mark(Mark::X).unwrap().connection,
            cid(1)
        );
        assert_eq!(
            room.participant_by_mark(Mark::O).unwrap().connection,
            cid(2)
        );
    }

    #[test]
    fn test_snapshot_reflects_occupancy() {
        let mut room = waiting_room();
        let snapshot = room.snapshot();
        assert_eq!(snapshot.name, "alpha");
        assert_eq!(snapshot.status, RoomPhase::AwaitingOpponent);
        assert!(snapshot.opponent.is_none());

        room.admit(cid(2));
        let snapshot = room.snapshot();
        assert_eq!(snapshot.status, RoomPhase::ReadyToStart);
        let opponent = snapshot.opponent.expect("snapshot should carry opponent");
        assert_eq!(opponent.connection, cid(2));
        assert_eq!(opponent.mark, Mark::O);
    }
}
