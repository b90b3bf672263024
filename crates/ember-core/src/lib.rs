//! Core types for the Ember particle simulation engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the vocabulary shared by every other Ember crate: particle type IDs,
//! attribute kinds and default values, the [`TimeSpan`] of a tick, and
//! the error types raised by attribute lookups and behaviors.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod attribute;
pub mod error;
pub mod id;
pub mod time;

pub use attribute::{AttributeType, AttributeValue, BIRTH_TIME, KILL_STATE, POSITION, VELOCITY};
pub use error::{AttributeError, BehaviorError};
pub use id::ParticleTypeId;
pub use time::TimeSpan;

/// Three-component float vector used for positions, velocities and forces.
pub use glam::Vec3;
