//! Particles requested by actions while a tick is being stepped.
//!
//! Actions run inside the parallel block phase and cannot touch the
//! allocator. They queue [`SpawnRequest`]s instead; the engine allocates
//! and steps the queued particles once the parallel phase is over.

use std::ops::Range;

use indexmap::IndexMap;

use ember_core::{AttributeError, ParticleTypeId, Vec3};
use ember_storage::AttributeArraysMut;

/// Initial values of one attribute, one entry per requested particle.
#[derive(Clone, Debug, PartialEq)]
pub enum SpawnValues {
    /// Byte values.
    Byte(Vec<u8>),
    /// Int values.
    Int(Vec<i32>),
    /// Float values.
    Float(Vec<f32>),
    /// Float3 values.
    Float3(Vec<Vec3>),
}

/// New particles queued by an action, not yet allocated.
#[derive(Clone, Debug, PartialEq)]
pub struct SpawnRequest {
    particle_type: ParticleTypeId,
    birth_times: Vec<f32>,
    values: IndexMap<String, SpawnValues>,
    source: String,
}

impl SpawnRequest {
    /// Request `amount` particles of `particle_type`, all born at `birth_time`.
    pub fn new(particle_type: ParticleTypeId, amount: usize, birth_time: f32) -> Self {
        Self {
            particle_type,
            birth_times: vec![birth_time; amount],
            values: IndexMap::new(),
            source: String::new(),
        }
    }

    /// Record the name of the behavior that made the request.
    pub fn attributed_to(mut self, name: &str) -> Self {
        self.source = name.to_string();
        self
    }

    /// Name of the requesting behavior, empty if unknown.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Type of the requested particles.
    pub fn particle_type(&self) -> ParticleTypeId {
        self.particle_type
    }

    /// Number of requested particles.
    pub fn size(&self) -> usize {
        self.birth_times.len()
    }

    /// Absolute birth time of each particle.
    pub fn birth_times(&self) -> &[f32] {
        &self.birth_times
    }

    /// Writer for birth times and attribute values.
    pub fn writer(&mut self) -> SpawnWriter<'_> {
        SpawnWriter { request: self }
    }

    /// Attribute values set so far, in the order they were first set.
    pub fn values(&self) -> impl Iterator<Item = (&str, &SpawnValues)> + '_ {
        self.values.iter().map(|(name, values)| (name.as_str(), values))
    }

    /// Copy the entries `src` of every set attribute into the slots `dst`.
    ///
    /// Attributes not set by the request keep the values already in the
    /// slots (their defaults, for freshly allocated slots).
    pub fn write_into(
        &self,
        attributes: &mut AttributeArraysMut<'_>,
        dst: Range<usize>,
        src: Range<usize>,
    ) -> Result<(), AttributeError> {
        for (name, values) in &self.values {
            match values {
                SpawnValues::Byte(v) => {
                    attributes.get_byte_mut(name)?[dst.clone()].copy_from_slice(&v[src.clone()])
                }
                SpawnValues::Int(v) => {
                    attributes.get_int_mut(name)?[dst.clone()].copy_from_slice(&v[src.clone()])
                }
                SpawnValues::Float(v) => {
                    attributes.get_float_mut(name)?[dst.clone()].copy_from_slice(&v[src.clone()])
                }
                SpawnValues::Float3(v) => {
                    attributes.get_float3_mut(name)?[dst.clone()].copy_from_slice(&v[src.clone()])
                }
            }
        }
        Ok(())
    }
}

/// Sets birth times and initial attribute values of one [`SpawnRequest`].
///
/// Value slices must hold exactly one entry per requested particle.
pub struct SpawnWriter<'r> {
    request: &'r mut SpawnRequest,
}

impl SpawnWriter<'_> {
    /// Number of requested particles.
    pub fn size(&self) -> usize {
        self.request.size()
    }

    /// Set per-particle birth times.
    pub fn set_birth_times(&mut self, times: &[f32]) {
        self.check_len(times.len());
        self.request.birth_times.copy_from_slice(times);
    }

    /// Give every particle the same birth time.
    pub fn fill_birth_time(&mut self, time: f32) {
        self.request.birth_times.fill(time);
    }

    /// Set a byte attribute.
    pub fn set_byte(&mut self, name: &str, values: &[u8]) {
        self.check_len(values.len());
        self.insert(name, SpawnValues::Byte(values.to_vec()));
    }

    /// Set an int attribute.
    pub fn set_int(&mut self, name: &str, values: &[i32]) {
        self.check_len(values.len());
        self.insert(name, SpawnValues::Int(values.to_vec()));
    }

    /// Set a float attribute.
    pub fn set_float(&mut self, name: &str, values: &[f32]) {
        self.check_len(values.len());
        self.insert(name, SpawnValues::Float(values.to_vec()));
    }

    /// Set a float3 attribute.
    pub fn set_float3(&mut self, name: &str, values: &[Vec3]) {
        self.check_len(values.len());
        self.insert(name, SpawnValues::Float3(values.to_vec()));
    }

    /// Set a float attribute to the same value for every particle.
    pub fn fill_float(&mut self, name: &str, value: f32) {
        let size = self.size();
        self.insert(name, SpawnValues::Float(vec![value; size]));
    }

    /// Set a float3 attribute to the same value for every particle.
    pub fn fill_float3(&mut self, name: &str, value: Vec3) {
        let size = self.size();
        self.insert(name, SpawnValues::Float3(vec![value; size]));
    }

    fn insert(&mut self, name: &str, values: SpawnValues) {
        self.request.values.insert(name.to_string(), values);
    }

    fn check_len(&self, len: usize) {
        assert_eq!(
            len,
            self.request.size(),
            "value count must match the number of requested particles"
        );
    }
}
