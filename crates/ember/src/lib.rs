//! Ember: an event-driven particle simulation engine.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Ember sub-crates. For most users, adding `ember` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use ember::prelude::*;
//!
//! const SPARK: ParticleTypeId = ParticleTypeId(0);
//!
//! let spark = ParticleType::builder()
//!     .force(GravityForce::default())
//!     .event(AgeReachedEvent::new(1.0).unwrap(), KillAction)
//!     .build();
//! let description = StepDescription::builder(0.1)
//!     .particle_type(SPARK, spark)
//!     .emitter(
//!         PointEmitter::builder()
//!             .particle_type(SPARK)
//!             .velocity(Vec3::new(0.0, 0.0, 4.0))
//!             .rate(50.0)
//!             .build()
//!             .unwrap(),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let mut sim = Simulation::new(EngineConfig::default()).unwrap();
//! for _ in 0..5 {
//!     sim.step(&description).unwrap();
//! }
//! assert_eq!(sim.particle_count(), 25);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `ember-core` | Type IDs, time spans, attribute kinds, error types |
//! | [`storage`] | `ember-storage` | Attribute schemas, blocks, containers, allocation |
//! | [`behavior`] | `ember-behavior` | Behavior traits, particle types, step descriptions |
//! | [`behaviors`] | `ember-behaviors` | Reference behaviors and the behavior registry |
//! | [`engine`] | `ember-engine` | The stepping loop and the `Simulation` host |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types and IDs (`ember-core`).
pub use ember_core as types;

/// Attribute storage (`ember-storage`).
///
/// Schemas ([`storage::AttributesInfo`]), fixed-capacity blocks, per-type
/// containers, and the [`storage::ParticlesState`] that owns them.
pub use ember_storage as storage;

/// Behavior traits and step descriptions (`ember-behavior`).
///
/// [`behavior::Force`], [`behavior::Event`], [`behavior::Action`] and
/// [`behavior::Emitter`] are the extension points for user-defined
/// particle behavior.
pub use ember_behavior as behavior;

/// Reference behaviors (`ember-behaviors`).
pub use ember_behaviors as behaviors;

/// The stepping engine (`ember-engine`).
///
/// [`engine::simulate_step`] advances a state by one tick;
/// [`engine::Simulation`] owns a state and a worker pool.
pub use ember_engine as engine;

/// Common imports for typical Ember usage.
///
/// ```rust
/// use ember::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use ember_core::{
        AttributeType, AttributeValue, ParticleTypeId, TimeSpan, Vec3, BIRTH_TIME, KILL_STATE,
        POSITION, VELOCITY,
    };

    // Errors
    pub use ember_core::{AttributeError, BehaviorError};
    pub use ember_storage::StorageError;
    pub use ember_behavior::DescriptionError;
    pub use ember_engine::{ConfigError, StepError};

    // Storage
    pub use ember_storage::{AttributesDeclaration, AttributesInfo, ParticlesState, StorageConfig};

    // Behaviors
    pub use ember_behavior::{
        Action, ActionInterface, Emitter, EmitterInterface, Event, EventInterface, Force,
        MassSource, ParticleSet, ParticleType, StepDescription,
    };
    pub use ember_behaviors::{
        AgeReachedEvent, BehaviorParams, BehaviorRegistry, BounceAction, DragForce, GravityForce,
        KillAction, NoneAction, PlaneCollisionEvent, PointEmitter,
    };

    // Engine
    pub use ember_engine::{simulate_step, EngineConfig, Simulation, StepMetrics};
}
