//! Crypton console core
//!
//! The telemetry state store of the Crypton IDS console together with the
//! structures layered on it: the newest-first log stream and the oldest-first
//! terminal line buffer. There are no timers or I/O here; the runtime crate
//! drives the store from the command interpreter and the event generator.

pub mod config;
pub mod errors;
pub mod logs;
pub mod state;
pub mod store;
pub mod terminal;

pub use config::{ConsoleConfig, GeneratorConfig, InterpreterConfig, StoreConfig, MAX_SENSORS};
pub use errors::{ConsoleError, ConsoleResult};
pub use logs::{current_timestamp, LogEntry, LogFilter, LogStream, LogType};
pub use state::{clamp_threat, SystemState, ThreatSeverity, THREAT_MAX, THREAT_MIN};
pub use store::{Mutation, Store, SubscriptionId};
pub use terminal::{LineKind, TerminalBuffer, IDLE_BANNER};
