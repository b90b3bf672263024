//! Reference behaviors for Ember simulations.
//!
//! Ready-made implementations of the behavior traits, plus a
//! [`BehaviorRegistry`] that builds them by name from [`BehaviorParams`].
//!
//! # Behaviors
//!
//! | Kind    | Type                    | Effect                                           |
//! |---------|-------------------------|--------------------------------------------------|
//! | force   | [`GravityForce`]        | constant force                                   |
//! | force   | [`DragForce`]           | `-k * velocity`                                  |
//! | event   | [`AgeReachedEvent`]     | fires when a particle reaches a fixed age        |
//! | event   | [`PlaneCollisionEvent`] | fires when a particle crosses a plane            |
//! | action  | [`KillAction`]          | marks particles dead                             |
//! | action  | [`BounceAction`]        | reflects velocity off a plane                    |
//! | action  | [`NoneAction`]          | no effect                                        |
//! | emitter | [`PointEmitter`]        | fixed-rate point source with seeded jitter       |

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod actions;
pub mod age_reached;
pub mod drag;
pub mod gravity;
pub mod params;
pub mod plane_collision;
pub mod point_emitter;
pub mod registry;

pub use actions::{BounceAction, KillAction, NoneAction};
pub use age_reached::AgeReachedEvent;
pub use drag::DragForce;
pub use gravity::GravityForce;
pub use params::{BehaviorParams, ParamError, ParamValue};
pub use plane_collision::PlaneCollisionEvent;
pub use point_emitter::{PointEmitter, PointEmitterBuilder};
pub use registry::{
    ActionFactory, BehaviorKind, BehaviorRegistry, EmitterFactory, EventFactory, ForceFactory,
    RegistryError,
};
