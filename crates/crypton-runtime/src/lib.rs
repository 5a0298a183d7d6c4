//! Crypton console runtime
//!
//! Drives the core [`Store`](crypton_core::Store) over time: the command
//! interpreter with its staged narrative output, the scheduler those
//! sequences run on, and the synthetic event generator. Everything here
//! expects to be constructed inside a tokio runtime.

pub mod commands;
pub mod console;
pub mod generator;
pub mod interpreter;
pub mod random;
pub mod scheduler;

pub use commands::{normalize, Command, DEFAULT_ATTACK_TYPE};
pub use console::Console;
pub use generator::{synthesize, EventGenerator, SyntheticEvent};
pub use interpreter::{capitalize, help_block, status_block, CommandInterpreter, SIMULATED_SOURCE_IP};
pub use random::{shared_random, with_random, RandomSource, SeededRandom, SharedRandom, SystemRandom};
pub use scheduler::{Scheduler, SequenceId, Stage};
