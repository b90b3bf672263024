//! Named factories for behaviors.
//!
//! A [`BehaviorRegistry`] maps names to constructors that build boxed
//! behaviors from [`BehaviorParams`]. Registries are plain values owned by
//! the caller; [`BehaviorRegistry::with_defaults`] fills one with every
//! behavior in this crate.
//!
//! | Kind    | Name                  | Parameters                                                 |
//! |---------|-----------------------|------------------------------------------------------------|
//! | force   | `gravity`             | `strength: vec3` (default `(0, 0, -9.81)`)                 |
//! | force   | `drag`                | `coefficient: float`                                       |
//! | event   | `age_reached`         | `lifetime: float`                                          |
//! | event   | `plane_collision`     | `point: vec3` (default origin), `normal: vec3`             |
//! | action  | `kill`                |                                                            |
//! | action  | `bounce`              | `normal: vec3`, `damping: float` (default 0)               |
//! | action  | `none`                |                                                            |
//! | emitter | `point`               | `particle_type: int`, `position`, `velocity: vec3`, `rate`, `spread: float`, `seed: int` |

use std::fmt;

use ember_behavior::{Action, Emitter, Event, Force};
use ember_core::{ParticleTypeId, Vec3};
use indexmap::IndexMap;

use crate::actions::{BounceAction, KillAction, NoneAction};
use crate::age_reached::AgeReachedEvent;
use crate::drag::DragForce;
use crate::gravity::GravityForce;
use crate::params::{BehaviorParams, ParamError};
use crate::plane_collision::PlaneCollisionEvent;
use crate::point_emitter::PointEmitter;

/// Which table a name was looked up in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BehaviorKind {
    /// [`Force`] factories.
    Force,
    /// [`Event`] factories.
    Event,
    /// [`Action`] factories.
    Action,
    /// [`Emitter`] factories.
    Emitter,
}

impl fmt::Display for BehaviorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Force => "force",
            Self::Event => "event",
            Self::Action => "action",
            Self::Emitter => "emitter",
        })
    }
}

/// Errors from registering or building behaviors.
#[derive(Clone, Debug, PartialEq)]
pub enum RegistryError {
    /// A factory with this name is already registered.
    Duplicate {
        /// Table the name belongs to.
        kind: BehaviorKind,
        /// The repeated name.
        name: String,
    },
    /// No factory with this name.
    Unknown {
        /// Table that was searched.
        kind: BehaviorKind,
        /// The requested name.
        name: String,
    },
    /// A parameter was missing or had the wrong type.
    Param(ParamError),
    /// The factory rejected its parameters.
    InvalidParams {
        /// Name of the behavior being built.
        name: String,
        /// What was wrong.
        reason: String,
    },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Duplicate { kind, name } => write!(f, "{kind} '{name}' is already registered"),
            Self::Unknown { kind, name } => write!(f, "no {kind} named '{name}'"),
            Self::Param(e) => write!(f, "{e}"),
            Self::InvalidParams { name, reason } => {
                write!(f, "invalid parameters for '{name}': {reason}")
            }
        }
    }
}

impl std::error::Error for RegistryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Param(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ParamError> for RegistryError {
    fn from(e: ParamError) -> Self {
        Self::Param(e)
    }
}

/// Builds a boxed force from parameters.
pub type ForceFactory = Box<dyn Fn(&BehaviorParams) -> Result<Box<dyn Force>, RegistryError> + Send + Sync>;
/// Builds a boxed event from parameters.
pub type EventFactory = Box<dyn Fn(&BehaviorParams) -> Result<Box<dyn Event>, RegistryError> + Send + Sync>;
/// Builds a boxed action from parameters.
pub type ActionFactory = Box<dyn Fn(&BehaviorParams) -> Result<Box<dyn Action>, RegistryError> + Send + Sync>;
/// Builds a boxed emitter from parameters.
pub type EmitterFactory =
    Box<dyn Fn(&BehaviorParams) -> Result<Box<dyn Emitter>, RegistryError> + Send + Sync>;

/// Name-to-factory tables for each behavior kind.
#[derive(Default)]
pub struct BehaviorRegistry {
    forces: IndexMap<String, ForceFactory>,
    events: IndexMap<String, EventFactory>,
    actions: IndexMap<String, ActionFactory>,
    emitters: IndexMap<String, EmitterFactory>,
}

impl BehaviorRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every behavior in this crate.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.add_defaults();
        registry
    }

    fn add_defaults(&mut self) {
        self.forces.insert(
            "gravity".into(),
            force_factory(|p| {
                let strength = p.vec3_or("strength", GravityForce::default().strength())?;
                Ok(Box::new(GravityForce::new(strength)))
            }),
        );
        self.forces.insert(
            "drag".into(),
            force_factory(|p| {
                let force = DragForce::new(p.float("coefficient")?).map_err(invalid("drag"))?;
                Ok(Box::new(force))
            }),
        );
        self.events.insert(
            "age_reached".into(),
            event_factory(|p| {
                let event = AgeReachedEvent::new(p.float("lifetime")?).map_err(invalid("age_reached"))?;
                Ok(Box::new(event))
            }),
        );
        self.events.insert(
            "plane_collision".into(),
            event_factory(|p| {
                let event = PlaneCollisionEvent::new(p.vec3_or("point", Vec3::ZERO)?, p.vec3("normal")?)
                    .map_err(invalid("plane_collision"))?;
                Ok(Box::new(event))
            }),
        );
        self.actions
            .insert("kill".into(), action_factory(|_| Ok(Box::new(KillAction))));
        self.actions.insert(
            "bounce".into(),
            action_factory(|p| {
                let action = BounceAction::new(p.vec3("normal")?, p.float_or("damping", 0.0)?)
                    .map_err(invalid("bounce"))?;
                Ok(Box::new(action))
            }),
        );
        self.actions
            .insert("none".into(), action_factory(|_| Ok(Box::new(NoneAction))));
        self.emitters.insert(
            "point".into(),
            emitter_factory(|p| {
                let particle_type = u32::try_from(p.int("particle_type")?).map_err(|_| {
                    RegistryError::InvalidParams {
                        name: "point".to_string(),
                        reason: "particle_type must fit in u32".to_string(),
                    }
                })?;
                let emitter = PointEmitter::builder()
                    .particle_type(ParticleTypeId(particle_type))
                    .position(p.vec3_or("position", Vec3::ZERO)?)
                    .velocity(p.vec3_or("velocity", Vec3::ZERO)?)
                    .rate(p.float_or("rate", 10.0)?)
                    .spread(p.float_or("spread", 0.0)?)
                    .seed(p.int_or("seed", 0)? as u64)
                    .build()
                    .map_err(invalid("point"))?;
                Ok(Box::new(emitter))
            }),
        );
    }

    // ── Registration ───────────────────────────────────────────────

    /// Register a force factory under `name`.
    pub fn register_force<F>(&mut self, name: &str, factory: F) -> Result<(), RegistryError>
    where
        F: Fn(&BehaviorParams) -> Result<Box<dyn Force>, RegistryError> + Send + Sync + 'static,
    {
        insert_unique(&mut self.forces, BehaviorKind::Force, name, force_factory(factory))
    }

    /// Register an event factory under `name`.
    pub fn register_event<F>(&mut self, name: &str, factory: F) -> Result<(), RegistryError>
    where
        F: Fn(&BehaviorParams) -> Result<Box<dyn Event>, RegistryError> + Send + Sync + 'static,
    {
        insert_unique(&mut self.events, BehaviorKind::Event, name, event_factory(factory))
    }

    /// Register an action factory under `name`.
    pub fn register_action<F>(&mut self, name: &str, factory: F) -> Result<(), RegistryError>
    where
        F: Fn(&BehaviorParams) -> Result<Box<dyn Action>, RegistryError> + Send + Sync + 'static,
    {
        insert_unique(&mut self.actions, BehaviorKind::Action, name, action_factory(factory))
    }

    /// Register an emitter factory under `name`.
    pub fn register_emitter<F>(&mut self, name: &str, factory: F) -> Result<(), RegistryError>
    where
        F: Fn(&BehaviorParams) -> Result<Box<dyn Emitter>, RegistryError> + Send + Sync + 'static,
    {
        insert_unique(&mut self.emitters, BehaviorKind::Emitter, name, emitter_factory(factory))
    }

    // ── Construction ───────────────────────────────────────────────

    /// Build the force registered as `name`.
    pub fn build_force(&self, name: &str, params: &BehaviorParams) -> Result<Box<dyn Force>, RegistryError> {
        lookup(&self.forces, BehaviorKind::Force, name)?(params)
    }

    /// Build the event registered as `name`.
    pub fn build_event(&self, name: &str, params: &BehaviorParams) -> Result<Box<dyn Event>, RegistryError> {
        lookup(&self.events, BehaviorKind::Event, name)?(params)
    }

    /// Build the action registered as `name`.
    pub fn build_action(&self, name: &str, params: &BehaviorParams) -> Result<Box<dyn Action>, RegistryError> {
        lookup(&self.actions, BehaviorKind::Action, name)?(params)
    }

    /// Build the emitter registered as `name`.
    pub fn build_emitter(
        &self,
        name: &str,
        params: &BehaviorParams,
    ) -> Result<Box<dyn Emitter>, RegistryError> {
        lookup(&self.emitters, BehaviorKind::Emitter, name)?(params)
    }

    /// Registered names of one kind, in registration order.
    pub fn names(&self, kind: BehaviorKind) -> Vec<&str> {
        match kind {
            BehaviorKind::Force => self.forces.keys().map(String::as_str).collect(),
            BehaviorKind::Event => self.events.keys().map(String::as_str).collect(),
            BehaviorKind::Action => self.actions.keys().map(String::as_str).collect(),
            BehaviorKind::Emitter => self.emitters.keys().map(String::as_str).collect(),
        }
    }
}

impl fmt::Debug for BehaviorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BehaviorRegistry")
            .field("forces", &self.names(BehaviorKind::Force))
            .field("events", &self.names(BehaviorKind::Event))
            .field("actions", &self.names(BehaviorKind::Action))
            .field("emitters", &self.names(BehaviorKind::Emitter))
            .finish()
    }
}

fn force_factory<F>(f: F) -> ForceFactory
where
    F: Fn(&BehaviorParams) -> Result<Box<dyn Force>, RegistryError> + Send + Sync + 'static,
{
    Box::new(f)
}

fn event_factory<F>(f: F) -> EventFactory
where
    F: Fn(&BehaviorParams) -> Result<Box<dyn Event>, RegistryError> + Send + Sync + 'static,
{
    Box::new(f)
}

fn action_factory<F>(f: F) -> ActionFactory
where
    F: Fn(&BehaviorParams) -> Result<Box<dyn Action>, RegistryError> + Send + Sync + 'static,
{
    Box::new(f)
}

fn emitter_factory<F>(f: F) -> EmitterFactory
where
    F: Fn(&BehaviorParams) -> Result<Box<dyn Emitter>, RegistryError> + Send + Sync + 'static,
{
    Box::new(f)
}

fn insert_unique<T>(
    table: &mut IndexMap<String, T>,
    kind: BehaviorKind,
    name: &str,
    factory: T,
) -> Result<(), RegistryError> {
    if table.contains_key(name) {
        return Err(RegistryError::Duplicate {
            kind,
            name: name.to_string(),
        });
    }
    table.insert(name.to_string(), factory);
    Ok(())
}

fn lookup<'t, T>(table: &'t IndexMap<String, T>, kind: BehaviorKind, name: &str) -> Result<&'t T, RegistryError> {
    table.get(name).ok_or_else(|| RegistryError::Unknown {
        kind,
        name: name.to_string(),
    })
}

fn invalid(name: &'static str) -> impl Fn(String) -> RegistryError {
    move |reason| RegistryError::InvalidParams {
        name: name.to_string(),
        reason,
    }
}
