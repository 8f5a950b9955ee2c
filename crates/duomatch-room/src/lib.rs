//! Room registry and match lifecycle for Duomatch.
//!
//! This crate is the stateful heart of the service. It owns every live
//! room, the reverse index from connection ids to rooms, and the state
//! machine that carries a room from creation through role assignment and
//! turn hand-off to teardown.
//!
//! # Key types
//!
//! - [`RoomRegistry`] — name-keyed room store with uniqueness, capacity,
//!   and a connection-keyed reverse index
//! - [`Room`] / [`Participant`] — one match and its occupants
//! - [`spawn_matchmaker`] — starts the actor task that processes client
//!   events one at a time and emits server events
//! - [`MatchmakerHandle`] — cheap-to-clone command front for the actor
//! - [`MatchConfig`] — grace delays and channel sizing

mod config;
mod directory;
mod error;
mod matchmaker;
mod registry;
mod room;

pub use config::MatchConfig;
pub use directory::ConnectionDirectory;
pub use error::RoomError;
pub use matchmaker::{EventSender, MatchmakerHandle, spawn_matchmaker};
pub use registry::RoomRegistry;
pub use room::{Participant, Room};
