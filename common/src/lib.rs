//! Shared models, parsing rules and the system gateway port used by every
//! `medlink` crate.

pub mod config;
pub mod error;
pub mod hosts;
pub mod network;
pub mod system;
pub mod utils;
