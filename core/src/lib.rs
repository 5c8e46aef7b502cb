//! # medlink core
//!
//! The reconciler and the adapters it runs against:
//!
//! * [`reconciler`]: probes an interface and applies only the missing configuration.
//! * [`system`]: the Windows implementation of the system gateway port.
//! * [`command`]: how OS commands are run and their output captured.
//! * [`hosts`]: hosts file reads and appends.
//! * [`network`] / [`check`]: reachability of the medical network.
//! * [`task`]: moving blocking work off the driving thread.

pub mod check;
pub mod command;
pub mod hosts;
pub mod network;
pub mod reconciler;
pub mod system;
pub mod task;
