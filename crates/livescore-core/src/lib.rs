//! Core state for the live score service.
//!
//! This crate provides the concurrency-sensitive heart of the service:
//! - [`MatchRepository`] for validated CRUD over match records
//! - [`AdminGate`] for the shared-secret mutation check
//! - [`BroadcastHub`] for snapshot fan-out to live subscribers
//! - [`ScoreBoard`] tying repository and hub into one atomic mutation path

mod gate;
mod hub;
mod model;
mod repository;
mod service;

pub use gate::AdminGate;
pub use hub::{
    BroadcastHub, HubClosedError, HubConfig, HubEvent, SubscriberId, SubscriberState,
    SubscriptionHandle,
};
pub use model::{Match, MatchId, MatchPatch, Snapshot, ValidationError};
pub use repository::{MatchRepository, RepoError};
pub use service::ScoreBoard;
