//! [`StepDescription`]: everything the engine needs to advance one tick.

use std::error::Error;
use std::fmt;

use indexmap::IndexMap;

use ember_core::{AttributeError, ParticleTypeId};
use ember_storage::AttributesInfo;

use crate::emitter::Emitter;
use crate::particle_type::ParticleType;

// ── Errors ─────────────────────────────────────────────────────────

/// Errors detected while building a [`StepDescription`].
#[derive(Debug, Clone, PartialEq)]
pub enum DescriptionError {
    /// The step duration is NaN, infinite, or negative.
    InvalidDuration {
        /// The rejected duration.
        value: f32,
    },
    /// The same particle type was registered twice.
    DuplicateParticleType {
        /// The repeated type.
        particle_type: ParticleTypeId,
    },
    /// A particle type's behaviors declare incompatible attributes.
    Attributes {
        /// The offending type.
        particle_type: ParticleTypeId,
        /// The underlying conflict.
        error: AttributeError,
    },
}

impl fmt::Display for DescriptionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDuration { value } => {
                write!(f, "step duration must be finite and non-negative, got {value}")
            }
            Self::DuplicateParticleType { particle_type } => {
                write!(f, "particle type {particle_type} registered twice")
            }
            Self::Attributes {
                particle_type,
                error,
            } => write!(f, "particle type {particle_type}: {error}"),
        }
    }
}

impl Error for DescriptionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Attributes { error, .. } => Some(error),
            _ => None,
        }
    }
}

// ── Description ────────────────────────────────────────────────────

/// A particle type together with its resolved attribute schema.
pub struct TypeDescription {
    particle_type: ParticleType,
    attributes: AttributesInfo,
}

impl TypeDescription {
    /// The behaviors.
    pub fn particle_type(&self) -> &ParticleType {
        &self.particle_type
    }

    /// The schema every container of this type must have.
    pub fn attributes(&self) -> &AttributesInfo {
        &self.attributes
    }
}

/// Duration, particle types, and emitters for one tick.
///
/// Attribute schemas are resolved once in [`StepDescriptionBuilder::build`],
/// so a description that builds successfully never fails on schema
/// conflicts during a step.
pub struct StepDescription {
    duration: f32,
    types: IndexMap<ParticleTypeId, TypeDescription>,
    emitters: Vec<Box<dyn Emitter>>,
}

impl StepDescription {
    /// Start building a description for a tick of `duration`.
    pub fn builder(duration: f32) -> StepDescriptionBuilder {
        StepDescriptionBuilder {
            duration,
            types: Vec::new(),
            emitters: Vec::new(),
        }
    }

    /// Length of the tick.
    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Particle types in registration order.
    pub fn types(&self) -> impl Iterator<Item = (ParticleTypeId, &TypeDescription)> + '_ {
        self.types.iter().map(|(id, ty)| (*id, ty))
    }

    /// One particle type.
    pub fn particle_type(&self, id: ParticleTypeId) -> Option<&TypeDescription> {
        self.types.get(&id)
    }

    /// Number of particle types.
    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    /// Emitters in registration order.
    pub fn emitters(&self) -> &[Box<dyn Emitter>] {
        &self.emitters
    }
}

impl fmt::Debug for StepDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepDescription")
            .field("duration", &self.duration)
            .field("types", &self.types.keys().collect::<Vec<_>>())
            .field(
                "emitters",
                &self.emitters.iter().map(|e| e.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Builder for [`StepDescription`].
pub struct StepDescriptionBuilder {
    duration: f32,
    types: Vec<(ParticleTypeId, ParticleType)>,
    emitters: Vec<Box<dyn Emitter>>,
}

impl StepDescriptionBuilder {
    /// Register a particle type.
    pub fn particle_type(mut self, id: ParticleTypeId, particle_type: ParticleType) -> Self {
        self.types.push((id, particle_type));
        self
    }

    /// Add an emitter.
    pub fn emitter(mut self, emitter: impl Emitter + 'static) -> Self {
        self.emitters.push(Box::new(emitter));
        self
    }

    /// Add a boxed emitter.
    pub fn boxed_emitter(mut self, emitter: Box<dyn Emitter>) -> Self {
        self.emitters.push(emitter);
        self
    }

    /// Validate and resolve attribute schemas.
    ///
    /// Checks performed:
    ///
    /// 1. The duration is finite and non-negative.
    /// 2. No particle type is registered twice.
    /// 3. Every type's attribute declarations, joined with what each
    ///    emitter declares for it, are consistent.
    pub fn build(self) -> Result<StepDescription, DescriptionError> {
        if !self.duration.is_finite() || self.duration < 0.0 {
            return Err(DescriptionError::InvalidDuration {
                value: self.duration,
            });
        }

        let mut types = IndexMap::with_capacity(self.types.len());
        for (id, particle_type) in self.types {
            if types.contains_key(&id) {
                return Err(DescriptionError::DuplicateParticleType { particle_type: id });
            }
            let mut declaration = particle_type.declare_attributes();
            for emitter in &self.emitters {
                emitter.declare_attributes(id, &mut declaration);
            }
            let attributes = declaration
                .build()
                .map_err(|error| DescriptionError::Attributes {
                    particle_type: id,
                    error,
                })?;
            types.insert(
                id,
                TypeDescription {
                    particle_type,
                    attributes,
                },
            );
        }

        Ok(StepDescription {
            duration: self.duration,
            types,
            emitters: self.emitters,
        })
    }
}
