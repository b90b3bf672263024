//! Mock behaviors with scripted, inspectable outcomes.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use ember_behavior::{
    Action, ActionInterface, Emitter, EmitterInterface, Event, EventInterface, Force, ParticleSet,
};
use ember_core::{BehaviorError, ParticleTypeId, Vec3, POSITION, VELOCITY};
use ember_storage::AttributesDeclaration;

// ── Forces ─────────────────────────────────────────────────────────

/// Adds the same force to every particle.
pub struct ConstantForce {
    pub force: Vec3,
}

impl ConstantForce {
    pub fn new(force: Vec3) -> Self {
        Self { force }
    }
}

impl Force for ConstantForce {
    fn name(&self) -> &str {
        "constant_force"
    }

    fn add_force(&self, _particles: &ParticleSet<'_>, forces: &mut [Vec3]) -> Result<(), BehaviorError> {
        for force in forces.iter_mut() {
            *force += self.force;
        }
        Ok(())
    }
}

/// Fails on every call.
pub struct FailingForce {
    pub name: String,
}

impl FailingForce {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Force for FailingForce {
    fn name(&self) -> &str {
        &self.name
    }

    fn add_force(&self, _particles: &ParticleSet<'_>, _forces: &mut [Vec3]) -> Result<(), BehaviorError> {
        Err(BehaviorError::ExecutionFailed {
            reason: "scripted failure".to_string(),
        })
    }
}

// ── Events ─────────────────────────────────────────────────────────

/// Fires for every particle at a fixed fraction of its remaining duration.
///
/// With [`only_below_x`](ScriptedEvent::only_below_x) it fires only for
/// particles whose position x is below a threshold, which lets tests pick
/// particles by where a fixture placed them.
pub struct ScriptedEvent {
    pub name: String,
    pub time_factor: f32,
    pub max_x: Option<f32>,
    calls: AtomicUsize,
}

impl ScriptedEvent {
    pub fn new(time_factor: f32) -> Self {
        Self {
            name: "scripted_event".to_string(),
            time_factor,
            max_x: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn only_below_x(mut self, max_x: f32) -> Self {
        self.max_x = Some(max_x);
        self
    }

    /// Number of `filter()` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl Event for ScriptedEvent {
    fn name(&self) -> &str {
        &self.name
    }

    fn filter(&self, interface: &mut EventInterface<'_, '_>) -> Result<(), BehaviorError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        let particles = interface.particles();
        let positions = particles.attributes().get_float3(POSITION)?;
        let selected: Vec<usize> = (0..particles.len())
            .filter(|&i| match self.max_x {
                Some(max_x) => positions[particles.particle_index(i)].x < max_x,
                None => true,
            })
            .collect();
        for i in selected {
            interface.trigger(i, self.time_factor);
        }
        Ok(())
    }
}

// ── Actions ────────────────────────────────────────────────────────

/// One recorded [`RecordingAction`] call.
#[derive(Clone, Debug, PartialEq)]
pub struct ActionCall {
    pub particles: usize,
    pub current_times: Vec<f32>,
    pub remaining_durations: Vec<f32>,
}

/// Records every call; optionally kills particles, reverses their
/// velocity, or counts hits in an int attribute.
#[derive(Clone, Default)]
pub struct RecordingAction {
    pub kill: bool,
    pub reverse_velocity: bool,
    pub counter: Option<String>,
    calls: Arc<Mutex<Vec<ActionCall>>>,
}

impl RecordingAction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn killing() -> Self {
        Self {
            kill: true,
            ..Self::default()
        }
    }

    pub fn reversing() -> Self {
        Self {
            reverse_velocity: true,
            ..Self::default()
        }
    }

    pub fn with_attribute(name: impl Into<String>) -> Self {
        Self {
            counter: Some(name.into()),
            ..Self::default()
        }
    }

    /// Calls recorded so far. Clones share the log.
    pub fn calls(&self) -> Vec<ActionCall> {
        self.calls.lock().expect("call log poisoned").clone()
    }

    /// Total particles seen across all calls.
    pub fn particles_seen(&self) -> usize {
        self.calls().iter().map(|c| c.particles).sum()
    }
}

impl Action for RecordingAction {
    fn name(&self) -> &str {
        "recording_action"
    }

    fn declare_attributes(&self, attributes: &mut AttributesDeclaration) {
        if let Some(counter) = &self.counter {
            attributes.add_int(counter, 0);
        }
    }

    fn execute(&self, interface: &mut ActionInterface<'_>) -> Result<(), BehaviorError> {
        self.calls.lock().expect("call log poisoned").push(ActionCall {
            particles: interface.particles().len(),
            current_times: interface.current_times().to_vec(),
            remaining_durations: interface.remaining_durations().to_vec(),
        });

        let slots: Vec<usize> = interface.particles().indices().iter().collect();
        if let Some(counter) = &self.counter {
            let mut attributes = interface.particles_mut().attributes_mut();
            let counts = attributes.get_int_mut(counter)?;
            for &slot in &slots {
                counts[slot] += 1;
            }
        }
        if self.reverse_velocity {
            let mut attributes = interface.particles_mut().attributes_mut();
            let velocities = attributes.get_float3_mut(VELOCITY)?;
            for &slot in &slots {
                velocities[slot] = -velocities[slot];
            }
        }
        if self.kill {
            interface.kill_all()?;
        }
        Ok(())
    }
}

/// Requests one particle per entry of `velocities` at every hit
/// particle's position, born at the moment of the hit.
pub struct SpawningAction {
    pub particle_type: ParticleTypeId,
    pub velocities: Vec<Vec3>,
    pub kill_parent: bool,
}

impl SpawningAction {
    pub fn new(particle_type: ParticleTypeId, velocities: Vec<Vec3>) -> Self {
        Self {
            particle_type,
            velocities,
            kill_parent: false,
        }
    }

    pub fn killing_parent(mut self) -> Self {
        self.kill_parent = true;
        self
    }
}

impl Action for SpawningAction {
    fn name(&self) -> &str {
        "spawning_action"
    }

    fn execute(&self, interface: &mut ActionInterface<'_>) -> Result<(), BehaviorError> {
        let hit_positions: Vec<Vec3> = {
            let particles = interface.particles();
            let positions = particles.attributes().get_float3(POSITION)?;
            particles.indices().iter().map(|slot| positions[slot]).collect()
        };

        let mut birth_times = Vec::new();
        let mut positions = Vec::new();
        let mut velocities = Vec::new();
        for (i, position) in hit_positions.iter().enumerate() {
            for velocity in &self.velocities {
                birth_times.push(interface.current_time(i));
                positions.push(*position);
                velocities.push(*velocity);
            }
        }

        let mut writer = interface.request(self.particle_type, birth_times.len());
        writer.set_birth_times(&birth_times);
        writer.set_float3(POSITION, &positions);
        writer.set_float3(VELOCITY, &velocities);

        if self.kill_parent {
            interface.kill_all()?;
        }
        Ok(())
    }
}

// ── Emitters ───────────────────────────────────────────────────────

/// Emits the same batch of particles every tick.
pub struct FixedEmitter {
    pub particle_type: ParticleTypeId,
    pub positions: Vec<Vec3>,
    pub velocities: Vec<Vec3>,
    pub birth_moments: Option<Vec<f32>>,
    /// Extra float attributes, declared on `particle_type` and written on
    /// every emitted particle.
    pub floats: Vec<(String, Vec<f32>)>,
}

impl FixedEmitter {
    /// Emit particles at `positions` with zero velocity.
    pub fn new(particle_type: ParticleTypeId, positions: Vec<Vec3>) -> Self {
        let velocities = vec![Vec3::ZERO; positions.len()];
        Self {
            particle_type,
            positions,
            velocities,
            birth_moments: None,
            floats: Vec::new(),
        }
    }

    pub fn with_velocities(mut self, velocities: Vec<Vec3>) -> Self {
        self.velocities = velocities;
        self
    }

    pub fn with_birth_moments(mut self, moments: Vec<f32>) -> Self {
        self.birth_moments = Some(moments);
        self
    }

    pub fn with_float(mut self, name: &str, values: Vec<f32>) -> Self {
        self.floats.push((name.to_string(), values));
        self
    }
}

impl Emitter for FixedEmitter {
    fn name(&self) -> &str {
        "fixed_emitter"
    }

    fn declare_attributes(&self, particle_type: ParticleTypeId, attributes: &mut AttributesDeclaration) {
        if particle_type == self.particle_type {
            for (name, _) in &self.floats {
                attributes.add_float(name, 0.0);
            }
        }
    }

    fn emit(&self, interface: &mut EmitterInterface<'_>) -> Result<(), BehaviorError> {
        let mut writer = interface.request(self.particle_type, self.positions.len())?;
        writer.set_float3(POSITION, &self.positions)?;
        writer.set_float3(VELOCITY, &self.velocities)?;
        if let Some(moments) = &self.birth_moments {
            writer.set_birth_moments(moments);
        }
        for (name, values) in &self.floats {
            writer.set_float(name, values)?;
        }
        Ok(())
    }
}
