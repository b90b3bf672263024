//! Blocks and particle states preloaded with the built-in attributes.

use std::sync::Arc;

use ember_core::{ParticleTypeId, Vec3, BIRTH_TIME, KILL_STATE, POSITION, VELOCITY};
use ember_storage::{
    AttributesDeclaration, AttributesInfo, ParticlesBlock, ParticlesState, StorageConfig,
};

/// Declaration of the four attributes every particle type has.
pub fn base_declaration() -> AttributesDeclaration {
    let mut declaration = AttributesDeclaration::new();
    declaration
        .add_byte(KILL_STATE, 0)
        .add_float(BIRTH_TIME, 0.0)
        .add_float3(POSITION, Vec3::ZERO)
        .add_float3(VELOCITY, Vec3::ZERO);
    declaration
}

/// Schema with only the built-in attributes.
pub fn base_info() -> AttributesInfo {
    base_declaration()
        .build()
        .expect("built-in attributes never conflict")
}

/// A block of `capacity` slots with `active` live particles.
///
/// Particle `i` sits at `(i, 0, 0)` with zero velocity.
pub fn block_with_particles(capacity: usize, active: usize) -> ParticlesBlock {
    let mut block = ParticlesBlock::new(Arc::new(base_info()), capacity);
    let range = block.reserve(active);
    let mut attributes = block.attributes_mut();
    let positions = attributes.get_float3_mut(POSITION).expect("position declared");
    for slot in range {
        positions[slot] = Vec3::new(slot as f32, 0.0, 0.0);
    }
    block
}

/// A state holding one empty container of `particle_type` with the
/// built-in schema.
pub fn state_with_type(particle_type: ParticleTypeId, block_size: usize) -> ParticlesState {
    let mut state = ParticlesState::new(StorageConfig::new(block_size)).expect("valid block size");
    state
        .ensure_container(particle_type)
        .update_attributes(base_info());
    state
}

/// Add live particles with the given positions and velocities.
///
/// # Panics
///
/// Panics if the slices differ in length or the container's schema lacks
/// the built-in attributes.
pub fn spawn(
    state: &mut ParticlesState,
    particle_type: ParticleTypeId,
    positions: &[Vec3],
    velocities: &[Vec3],
) {
    assert_eq!(positions.len(), velocities.len());
    let parts = state
        .allocator()
        .allocate(particle_type, positions.len())
        .expect("container exists");
    let container = state.container_mut(particle_type).expect("container exists");
    let mut offset = 0;
    for part in parts {
        let len = part.len();
        let mut attributes = container.block_mut(part.block).attributes_mut();
        attributes.get_float3_mut(POSITION).expect("position declared")[part.range.clone()]
            .copy_from_slice(&positions[offset..offset + len]);
        attributes.get_float3_mut(VELOCITY).expect("velocity declared")[part.range]
            .copy_from_slice(&velocities[offset..offset + len]);
        offset += len;
    }
}

/// Live values of a float3 attribute, in block order.
pub fn float3_values(state: &ParticlesState, particle_type: ParticleTypeId, name: &str) -> Vec<Vec3> {
    let container = state.container(particle_type).expect("container exists");
    container
        .active_blocks()
        .iter()
        .flat_map(|block| {
            block
                .slice_active()
                .get_float3(name)
                .expect("float3 attribute declared")
                .to_vec()
        })
        .collect()
}

/// Live values of a float attribute, in block order.
pub fn float_values(state: &ParticlesState, particle_type: ParticleTypeId, name: &str) -> Vec<f32> {
    let container = state.container(particle_type).expect("container exists");
    container
        .active_blocks()
        .iter()
        .flat_map(|block| {
            block
                .slice_active()
                .get_float(name)
                .expect("float attribute declared")
                .to_vec()
        })
        .collect()
}

/// Live positions, in block order.
pub fn positions(state: &ParticlesState, particle_type: ParticleTypeId) -> Vec<Vec3> {
    float3_values(state, particle_type, POSITION)
}
