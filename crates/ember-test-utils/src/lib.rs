//! Test utilities and mock behaviors for Ember development.
//!
//! [`fixtures`] builds blocks and particle states with the built-in
//! attributes. The mocks implement the behavior traits with scripted,
//! inspectable outcomes:
//!
//! - [`ConstantForce`] adds the same force to every particle.
//! - [`FailingForce`] always fails.
//! - [`ScriptedEvent`] fires at a fixed fraction of the remaining duration.
//! - [`RecordingAction`] logs each call and can kill or count hits.
//! - [`SpawningAction`] requests new particles where its particles hit.
//! - [`FixedEmitter`] emits a preset batch of particles every tick.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;
mod mocks;

pub use mocks::{
    ActionCall, ConstantForce, FailingForce, FixedEmitter, RecordingAction, ScriptedEvent,
    SpawningAction,
};
