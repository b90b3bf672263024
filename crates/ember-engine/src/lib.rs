//! Stepping engine for Ember particle simulations.
//!
//! [`simulate_step`] advances a [`ParticlesState`](ember_storage::ParticlesState)
//! by one tick of a [`StepDescription`](ember_behavior::StepDescription):
//! existing particles move block by block in parallel, emitters add new
//! particles that move from their birth time to the end of the tick, the
//! particles actions requested are allocated and moved the same way, and
//! killed particles are removed before the blocks are compacted.
//! [`Simulation`] owns a state and an optional dedicated worker pool.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod dispatch;
pub mod emission;
pub mod error;
pub mod metrics;
pub mod simulate;
pub mod spawn;
pub mod step;

pub use config::{ConfigError, EngineConfig};
pub use error::StepError;
pub use metrics::StepMetrics;
pub use simulate::{ideal_offsets, simulate_ignoring_events, simulate_particles, LoopStats};
pub use spawn::{commit_spawns, SpawnStats};
pub use step::{simulate_step, simulate_step_with_config, Simulation};
