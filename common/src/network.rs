//! Parsers for the human-readable output of the Windows networking commands.
//!
//! Every parser is total: unrecognised text yields `None` or an empty
//! collection, never an error. Callers treat "not found" as "not configured".

pub mod interface;
pub mod ping;
pub mod route;
