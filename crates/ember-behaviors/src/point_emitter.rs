//! Emits particles from a single point at a fixed rate.
//!
//! Births are spread evenly through the tick: with `n` particles the
//! `i`-th is born at moment `(i + 0.5) / n`. Each particle leaves with
//! the base velocity plus a per-axis uniform jitter in `[-spread, spread)`.
//!
//! Jitter is deterministic: the RNG is a ChaCha8 stream seeded from
//! `seed XOR` the bit pattern of the tick's start time, so replaying the
//! same ticks reproduces the same velocities.
//!
//! Constructed via the builder pattern: [`PointEmitter::builder`].

use ember_behavior::{Emitter, EmitterInterface};
use ember_core::{BehaviorError, ParticleTypeId, Vec3, POSITION, VELOCITY};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// A fixed-rate point source.
#[derive(Clone, Debug, PartialEq)]
pub struct PointEmitter {
    particle_type: ParticleTypeId,
    position: Vec3,
    velocity: Vec3,
    rate: f32,
    spread: f32,
    seed: u64,
}

/// Builder for [`PointEmitter`].
///
/// Required field: `particle_type`.
pub struct PointEmitterBuilder {
    particle_type: Option<ParticleTypeId>,
    position: Vec3,
    velocity: Vec3,
    rate: f32,
    spread: f32,
    seed: u64,
}

impl PointEmitter {
    /// Create a new builder for configuring a `PointEmitter`.
    pub fn builder() -> PointEmitterBuilder {
        PointEmitterBuilder {
            particle_type: None,
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            rate: 10.0,
            spread: 0.0,
            seed: 0,
        }
    }

    /// Type of the emitted particles.
    pub fn particle_type(&self) -> ParticleTypeId {
        self.particle_type
    }

    /// Particles per unit of time.
    pub fn rate(&self) -> f32 {
        self.rate
    }

    /// Number of particles emitted over `duration`.
    pub fn amount_for(&self, duration: f32) -> usize {
        (self.rate * duration).round().max(0.0) as usize
    }
}

impl PointEmitterBuilder {
    /// Set the particle type to emit.
    pub fn particle_type(mut self, particle_type: ParticleTypeId) -> Self {
        self.particle_type = Some(particle_type);
        self
    }

    /// Set the emission point (default: origin).
    pub fn position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Set the base velocity (default: zero).
    pub fn velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    /// Set particles per unit of time (default: 10). Must be >= 0.
    pub fn rate(mut self, rate: f32) -> Self {
        self.rate = rate;
        self
    }

    /// Set the per-axis velocity jitter (default: 0). Must be >= 0.
    pub fn spread(mut self, spread: f32) -> Self {
        self.spread = spread;
        self
    }

    /// Set the RNG seed (default: 0).
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Build the emitter, validating all configuration.
    ///
    /// # Errors
    ///
    /// Returns `Err` if:
    /// - `particle_type` is not set
    /// - `rate` or `spread` is negative or not finite
    /// - `position` or `velocity` is not finite
    pub fn build(self) -> Result<PointEmitter, String> {
        let particle_type = self
            .particle_type
            .ok_or_else(|| "particle_type is required".to_string())?;
        if !self.rate.is_finite() || self.rate < 0.0 {
            return Err(format!("rate must be finite and >= 0, got {}", self.rate));
        }
        if !self.spread.is_finite() || self.spread < 0.0 {
            return Err(format!("spread must be finite and >= 0, got {}", self.spread));
        }
        if !self.position.is_finite() || !self.velocity.is_finite() {
            return Err("position and velocity must be finite".to_string());
        }
        Ok(PointEmitter {
            particle_type,
            position: self.position,
            velocity: self.velocity,
            rate: self.rate,
            spread: self.spread,
            seed: self.seed,
        })
    }
}

impl Emitter for PointEmitter {
    fn name(&self) -> &str {
        "PointEmitter"
    }

    fn emit(&self, interface: &mut EmitterInterface<'_>) -> Result<(), BehaviorError> {
        let time_span = interface.time_span();
        let amount = self.amount_for(time_span.duration());
        if amount == 0 {
            return Ok(());
        }

        let mut rng = ChaCha8Rng::seed_from_u64(self.seed ^ u64::from(time_span.start().to_bits()));
        let velocities: Vec<Vec3> = (0..amount)
            .map(|_| {
                if self.spread == 0.0 {
                    return self.velocity;
                }
                let jitter = Vec3::new(
                    rng.random_range(-1.0..1.0),
                    rng.random_range(-1.0..1.0),
                    rng.random_range(-1.0..1.0),
                );
                self.velocity + jitter * self.spread
            })
            .collect();
        let moments: Vec<f32> = (0..amount)
            .map(|i| (i as f32 + 0.5) / amount as f32)
            .collect();

        let mut target = interface.request(self.particle_type, amount)?;
        target.set_birth_moments(&moments);
        target.fill_float3(POSITION, self.position)?;
        target.set_float3(VELOCITY, &velocities)?;
        Ok(())
    }
}
