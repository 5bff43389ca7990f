//! Request middleware for the live score server.

pub mod logging;
