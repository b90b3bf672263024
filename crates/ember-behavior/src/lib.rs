//! Behavior traits and step descriptions for Ember simulations.
//!
//! A particle type is a set of [`Force`]s plus an ordered list of
//! [`Event`]s, each bound to one [`Action`]. [`Emitter`]s create new
//! particles once the existing ones have been stepped, and actions may
//! queue [`SpawnRequest`]s for the engine to allocate. A [`StepDescription`] gathers all of
//! these with the tick duration and resolves every type's attribute schema
//! up front.
//!
//! Behaviors are `&self` and `Send + Sync`: the engine shares them across
//! worker threads and hands each call a [`ParticleSet`] borrowed from one
//! block.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod action;
pub mod description;
pub mod emitter;
pub mod event;
pub mod force;
pub mod offsets;
pub mod particle_type;
pub mod set;
pub mod spawn;

pub use action::{Action, ActionInterface};
pub use description::{DescriptionError, StepDescription, StepDescriptionBuilder, TypeDescription};
pub use emitter::{EmitTarget, Emitter, EmitterInterface, TargetWriter};
pub use event::{Event, EventInterface, Trigger};
pub use force::Force;
pub use offsets::IdealOffsets;
pub use particle_type::{EventBinding, MassSource, ParticleType, ParticleTypeBuilder};
pub use set::{ParticleIndices, ParticleSet};
pub use spawn::{SpawnRequest, SpawnValues, SpawnWriter};
