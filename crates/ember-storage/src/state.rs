//! Simulation-wide particle state.

use indexmap::IndexMap;

use ember_core::ParticleTypeId;

use crate::allocator::BlockAllocator;
use crate::config::StorageConfig;
use crate::container::ParticlesContainer;
use crate::error::StorageError;
use crate::info::AttributesInfo;

/// All particle containers of one simulation plus its current time.
///
/// Created once per simulation and mutated every tick. Containers are
/// created lazily the first time a particle type is referenced and are
/// never dropped by the engine.
#[derive(Debug)]
pub struct ParticlesState {
    containers: IndexMap<ParticleTypeId, ParticlesContainer>,
    current_time: f32,
    config: StorageConfig,
}

impl ParticlesState {
    /// Create an empty state at time zero.
    pub fn new(config: StorageConfig) -> Result<Self, StorageError> {
        config.validate()?;
        Ok(Self {
            containers: IndexMap::new(),
            current_time: 0.0,
            config,
        })
    }

    /// The storage configuration.
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Current simulation time.
    pub fn current_time(&self) -> f32 {
        self.current_time
    }

    /// Overwrite the current simulation time.
    pub fn set_current_time(&mut self, time: f32) {
        self.current_time = time;
    }

    /// Container for `particle_type`, if one exists.
    pub fn container(&self, particle_type: ParticleTypeId) -> Option<&ParticlesContainer> {
        self.containers.get(&particle_type)
    }

    /// Mutable container for `particle_type`, if one exists.
    pub fn container_mut(&mut self, particle_type: ParticleTypeId) -> Option<&mut ParticlesContainer> {
        self.containers.get_mut(&particle_type)
    }

    /// Container for `particle_type`, failing if it does not exist.
    pub fn try_container_mut(
        &mut self,
        particle_type: ParticleTypeId,
    ) -> Result<&mut ParticlesContainer, StorageError> {
        self.containers
            .get_mut(&particle_type)
            .ok_or(StorageError::UnknownParticleType { particle_type })
    }

    /// Container for `particle_type`, creating an empty one if needed.
    pub fn ensure_container(&mut self, particle_type: ParticleTypeId) -> &mut ParticlesContainer {
        let block_size = self.config.block_size;
        self.containers.entry(particle_type).or_insert_with(|| {
            log::debug!("creating container for particle type {particle_type}");
            ParticlesContainer::new(AttributesInfo::empty(), block_size)
        })
    }

    /// Iterate over `(type, container)` in creation order.
    pub fn containers(&self) -> impl Iterator<Item = (ParticleTypeId, &ParticlesContainer)> + '_ {
        self.containers.iter().map(|(id, c)| (*id, c))
    }

    /// Total live particles across every container.
    pub fn particle_count(&self) -> usize {
        self.containers.values().map(|c| c.count_active()).sum()
    }

    /// An allocator with exclusive access to this state's containers.
    pub fn allocator(&mut self) -> BlockAllocator<'_> {
        BlockAllocator::new(&mut self.containers)
    }
}
