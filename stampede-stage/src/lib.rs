//! Stage orchestration engine
//!
//! A stage seeds a collection, then pushes read traffic at it: producers emit
//! events at a fixed rate into a bounded channel, a growing population of
//! workers turns each event into one randomized sampling query, and shared
//! counters track how many queries failed. The [`StageController`] runs the
//! whole schedule and returns a [`RunReport`].
//!
//! The engine only sees storage through [`stampede_interfaces::Repository`].

pub mod arena;
pub mod channel;
pub mod clock;
pub mod controller;
pub mod error;
pub mod generator;
pub mod producer;
pub mod report;
pub mod seeder;
pub mod stats;
pub mod worker;

#[cfg(test)]
pub(crate) mod testing;

pub use arena::WorkerArena;
pub use channel::{EventChannel, EventReceiver, LoadEvent, EVENT_CHANNEL_CAPACITY};
pub use clock::{Clock, TokioClock};
pub use controller::{run as run_stage, StageController};
pub use error::StageError;
pub use generator::{generate_identifier, generate_payload};
pub use producer::ProducerGroup;
pub use report::{RampStep, RunReport};
pub use seeder::seed;
pub use stats::{timeout_percentage, RunStats, StatsSnapshot};
pub use worker::{sample_identifiers, WorkerContext, WorkerHandle};
