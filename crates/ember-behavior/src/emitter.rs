//! The [`Emitter`] trait and the [`EmitterInterface`] it requests slots from.

use std::ops::Range;

use ember_core::{AttributeError, BehaviorError, ParticleTypeId, TimeSpan, Vec3};
use ember_storage::{AttributesDeclaration, BlockAllocator, BlockRange, ParticlesBlock, StorageError};

/// Particles requested by one emitter call, possibly spread over several
/// blocks.
#[derive(Clone, Debug, PartialEq)]
pub struct EmitTarget {
    particle_type: ParticleTypeId,
    parts: Vec<BlockRange>,
    birth_moments: Vec<f32>,
}

impl EmitTarget {
    /// Type of the emitted particles.
    pub fn particle_type(&self) -> ParticleTypeId {
        self.particle_type
    }

    /// Block ranges holding the particles, in emission order.
    pub fn parts(&self) -> &[BlockRange] {
        &self.parts
    }

    /// Birth moments in `[0, 1]` relative to the emission time span.
    pub fn birth_moments(&self) -> &[f32] {
        &self.birth_moments
    }

    /// Number of emitted particles.
    pub fn size(&self) -> usize {
        self.birth_moments.len()
    }
}

/// Context handed to an [`Emitter`] once per tick.
pub struct EmitterInterface<'a> {
    allocator: BlockAllocator<'a>,
    time_span: TimeSpan,
    targets: Vec<EmitTarget>,
}

impl<'a> EmitterInterface<'a> {
    /// Create an interface that allocates through `allocator`.
    pub fn new(allocator: BlockAllocator<'a>, time_span: TimeSpan) -> Self {
        Self {
            allocator,
            time_span,
            targets: Vec::new(),
        }
    }

    /// The interval being emitted into.
    pub fn time_span(&self) -> TimeSpan {
        self.time_span
    }

    /// Reserve `amount` new particles of `particle_type`.
    ///
    /// The particles start at their attribute defaults with birth moment
    /// 1.0 (the end of the interval) until the returned writer changes
    /// them.
    pub fn request(
        &mut self,
        particle_type: ParticleTypeId,
        amount: usize,
    ) -> Result<TargetWriter<'_, 'a>, BehaviorError> {
        let parts = self
            .allocator
            .allocate(particle_type, amount)
            .map_err(storage_error)?;
        self.targets.push(EmitTarget {
            particle_type,
            parts,
            birth_moments: vec![1.0; amount],
        });
        let target = self
            .targets
            .last_mut()
            .ok_or_else(|| BehaviorError::ExecutionFailed {
                reason: "emit target missing after request".to_string(),
            })?;
        Ok(TargetWriter {
            allocator: &mut self.allocator,
            target,
        })
    }

    /// Targets requested so far.
    pub fn targets(&self) -> &[EmitTarget] {
        &self.targets
    }

    /// Consume the interface, returning every requested target.
    pub fn into_targets(self) -> Vec<EmitTarget> {
        self.targets
    }
}

fn storage_error(error: StorageError) -> BehaviorError {
    match error {
        StorageError::Attribute(error) => BehaviorError::Attribute(error),
        other => BehaviorError::ExecutionFailed {
            reason: other.to_string(),
        },
    }
}

/// Writes initial attribute values into one [`EmitTarget`].
///
/// Value slices are indexed in emission order and must hold exactly one
/// entry per emitted particle.
pub struct TargetWriter<'i, 'a> {
    allocator: &'i mut BlockAllocator<'a>,
    target: &'i mut EmitTarget,
}

impl TargetWriter<'_, '_> {
    /// Number of particles in the target.
    pub fn size(&self) -> usize {
        self.target.size()
    }

    /// Set per-particle birth moments.
    pub fn set_birth_moments(&mut self, moments: &[f32]) {
        self.check_len(moments.len());
        self.target.birth_moments.copy_from_slice(moments);
    }

    /// Give every particle the same birth moment.
    pub fn fill_birth_moment(&mut self, moment: f32) {
        self.target.birth_moments.fill(moment);
    }

    /// Set a byte attribute.
    pub fn set_byte(&mut self, name: &str, values: &[u8]) -> Result<(), BehaviorError> {
        self.check_len(values.len());
        self.write_parts(|block, dst, src| {
            block.attributes_mut().get_byte_mut(name)?[dst].copy_from_slice(&values[src]);
            Ok(())
        })
    }

    /// Set an int attribute.
    pub fn set_int(&mut self, name: &str, values: &[i32]) -> Result<(), BehaviorError> {
        self.check_len(values.len());
        self.write_parts(|block, dst, src| {
            block.attributes_mut().get_int_mut(name)?[dst].copy_from_slice(&values[src]);
            Ok(())
        })
    }

    /// Set a float attribute.
    pub fn set_float(&mut self, name: &str, values: &[f32]) -> Result<(), BehaviorError> {
        self.check_len(values.len());
        self.write_parts(|block, dst, src| {
            block.attributes_mut().get_float_mut(name)?[dst].copy_from_slice(&values[src]);
            Ok(())
        })
    }

    /// Set a float3 attribute.
    pub fn set_float3(&mut self, name: &str, values: &[Vec3]) -> Result<(), BehaviorError> {
        self.check_len(values.len());
        self.write_parts(|block, dst, src| {
            block.attributes_mut().get_float3_mut(name)?[dst].copy_from_slice(&values[src]);
            Ok(())
        })
    }

    /// Set a float attribute to the same value for every particle.
    pub fn fill_float(&mut self, name: &str, value: f32) -> Result<(), BehaviorError> {
        self.write_parts(|block, dst, _| {
            block.attributes_mut().get_float_mut(name)?[dst].fill(value);
            Ok(())
        })
    }

    /// Set a float3 attribute to the same value for every particle.
    pub fn fill_float3(&mut self, name: &str, value: Vec3) -> Result<(), BehaviorError> {
        self.write_parts(|block, dst, _| {
            block.attributes_mut().get_float3_mut(name)?[dst].fill(value);
            Ok(())
        })
    }

    fn check_len(&self, len: usize) {
        assert_eq!(
            len,
            self.target.size(),
            "value count must match the number of emitted particles"
        );
    }

    /// Call `write` for every part with its block, block-local slot range,
    /// and the matching range in emission order.
    fn write_parts<F>(&mut self, mut write: F) -> Result<(), BehaviorError>
    where
        F: FnMut(&mut ParticlesBlock, Range<usize>, Range<usize>) -> Result<(), AttributeError>,
    {
        let particle_type = self.target.particle_type;
        let container = self
            .allocator
            .container_mut(particle_type)
            .ok_or_else(|| BehaviorError::ExecutionFailed {
                reason: format!("no container for particle type {particle_type}"),
            })?;
        let mut offset = 0;
        for part in &self.target.parts {
            let len = part.len();
            write(container.block_mut(part.block), part.range.clone(), offset..offset + len)?;
            offset += len;
        }
        Ok(())
    }
}

/// A source of new particles.
///
/// # Contract
///
/// - `emit()` is called once per tick, after existing particles have been
///   stepped, in description order.
/// - Emitters run sequentially; the allocator is never shared.
/// - Attributes an emitter writes must be declared through
///   `declare_attributes()` for every type it targets.
pub trait Emitter: Send + Sync {
    /// Human-readable name for error reporting.
    fn name(&self) -> &str;

    /// Attributes this emitter writes on particles of `particle_type`.
    ///
    /// Called once per described type while the schema is resolved.
    fn declare_attributes(&self, _particle_type: ParticleTypeId, _attributes: &mut AttributesDeclaration) {}

    /// Request and initialize new particles.
    fn emit(&self, interface: &mut EmitterInterface<'_>) -> Result<(), BehaviorError>;
}
