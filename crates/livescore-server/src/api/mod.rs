//! API handlers for the live score server.

pub mod matches;
