//! [`ParticleType`]: the behaviors and attributes of one kind of particle.

use ember_core::{AttributeError, Vec3, BIRTH_TIME, KILL_STATE, POSITION, VELOCITY};
use ember_storage::{AttributesDeclaration, AttributesInfo};

use crate::action::Action;
use crate::event::Event;
use crate::force::Force;

/// Where a particle's mass comes from when converting force to acceleration.
#[derive(Clone, Debug, PartialEq)]
pub enum MassSource {
    /// Every particle has the same mass.
    Constant(f32),
    /// Mass is read from a float attribute, declared with default 1.0.
    Attribute(String),
}

impl Default for MassSource {
    fn default() -> Self {
        Self::Constant(1.0)
    }
}

/// An event paired with the action that runs when it fires.
pub struct EventBinding {
    event: Box<dyn Event>,
    action: Box<dyn Action>,
}

impl EventBinding {
    /// The event.
    pub fn event(&self) -> &dyn Event {
        self.event.as_ref()
    }

    /// The action run for particles that hit the event.
    pub fn action(&self) -> &dyn Action {
        self.action.as_ref()
    }
}

/// Forces, events, and attributes of one particle type.
///
/// Built with [`ParticleType::builder`]. Event order is significant:
/// when two events fire at exactly the same time for a particle, the
/// earlier one wins.
pub struct ParticleType {
    forces: Vec<Box<dyn Force>>,
    events: Vec<EventBinding>,
    mass: MassSource,
    extra_attributes: AttributesDeclaration,
}

impl ParticleType {
    /// Start building a particle type.
    pub fn builder() -> ParticleTypeBuilder {
        ParticleTypeBuilder::default()
    }

    /// Forces summed every tick.
    pub fn forces(&self) -> &[Box<dyn Force>] {
        &self.forces
    }

    /// Events in priority order.
    pub fn events(&self) -> &[EventBinding] {
        &self.events
    }

    /// Mass source.
    pub fn mass(&self) -> &MassSource {
        &self.mass
    }

    /// Collect every attribute this type needs: the built-in ones, the
    /// mass attribute, and everything its behaviors declare.
    pub fn declare_attributes(&self) -> AttributesDeclaration {
        let mut declaration = AttributesDeclaration::new();
        declaration
            .add_byte(KILL_STATE, 0)
            .add_float(BIRTH_TIME, 0.0)
            .add_float3(POSITION, Vec3::ZERO)
            .add_float3(VELOCITY, Vec3::ZERO);
        if let MassSource::Attribute(name) = &self.mass {
            declaration.add_float(name, 1.0);
        }
        for force in &self.forces {
            force.declare_attributes(&mut declaration);
        }
        for binding in &self.events {
            binding.event.declare_attributes(&mut declaration);
            binding.action.declare_attributes(&mut declaration);
        }
        declaration.join(&self.extra_attributes);
        declaration
    }

    /// Build the attribute schema for this type.
    pub fn attributes_info(&self) -> Result<AttributesInfo, AttributeError> {
        self.declare_attributes().build()
    }
}

/// Builder for [`ParticleType`].
#[derive(Default)]
pub struct ParticleTypeBuilder {
    forces: Vec<Box<dyn Force>>,
    events: Vec<EventBinding>,
    mass: MassSource,
    extra_attributes: AttributesDeclaration,
}

impl ParticleTypeBuilder {
    /// Add a force.
    pub fn force(mut self, force: impl Force + 'static) -> Self {
        self.forces.push(Box::new(force));
        self
    }

    /// Add a boxed force.
    pub fn boxed_force(mut self, force: Box<dyn Force>) -> Self {
        self.forces.push(force);
        self
    }

    /// Add an event and the action it triggers.
    pub fn event(mut self, event: impl Event + 'static, action: impl Action + 'static) -> Self {
        self.events.push(EventBinding {
            event: Box::new(event),
            action: Box::new(action),
        });
        self
    }

    /// Add a boxed event and its boxed action.
    pub fn boxed_event(mut self, event: Box<dyn Event>, action: Box<dyn Action>) -> Self {
        self.events.push(EventBinding { event, action });
        self
    }

    /// Set the mass source. Default: `MassSource::Constant(1.0)`.
    pub fn mass(mut self, mass: MassSource) -> Self {
        self.mass = mass;
        self
    }

    /// Declare attributes no behavior asks for, e.g. data set by emitters.
    pub fn attributes(mut self, declaration: &AttributesDeclaration) -> Self {
        self.extra_attributes.join(declaration);
        self
    }

    /// Finish building.
    pub fn build(self) -> ParticleType {
        ParticleType {
            forces: self.forces,
            events: self.events,
            mass: self.mass,
            extra_attributes: self.extra_attributes,
        }
    }
}
