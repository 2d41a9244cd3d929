//! Find USB modem serial devices and open them.
//!
//! Two operations make up the library: [`list_candidate_ports`] scans the
//! device directory for names carrying a marker substring, and
//! [`open_port`] opens one of them with a fixed line configuration,
//! returning `None` when the open fails. Both have `_with` variants that take
//! a [`PortConfig`] instead of the built-in defaults.

pub mod config;
pub mod discovery;
pub mod error;
pub mod serial;
pub mod tracing;

pub use config::PortConfig;
pub use discovery::{list_candidate_ports, list_candidate_ports_with};
pub use error::{Error, FailureKind, OpenError, Result};
pub use serial::{open_port, open_port_async, open_port_with, try_open_port};
