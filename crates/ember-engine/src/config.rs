//! Engine configuration, validation, and error types.

use std::error::Error;
use std::fmt;

use ember_storage::{StorageConfig, StorageError};

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`EngineConfig::validate()`] or while building
/// a [`Simulation`](crate::Simulation).
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// Storage configuration is invalid.
    Storage(StorageError),
    /// `max_events_per_tick` is zero.
    InvalidEventCap,
    /// `retrigger_epsilon` is NaN, infinite, or negative.
    InvalidRetriggerEpsilon {
        /// The invalid value.
        value: f32,
    },
    /// `worker_threads` is `Some(0)`.
    InvalidWorkerThreads,
    /// The dedicated worker pool could not be created.
    ThreadPoolFailed {
        /// Description from the thread pool builder.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Storage(e) => write!(f, "storage: {e}"),
            Self::InvalidEventCap => write!(f, "max_events_per_tick must be at least 1"),
            Self::InvalidRetriggerEpsilon { value } => {
                write!(f, "retrigger_epsilon must be finite and non-negative, got {value}")
            }
            Self::InvalidWorkerThreads => write!(f, "worker_threads must be at least 1"),
            Self::ThreadPoolFailed { reason } => {
                write!(f, "worker pool creation failed: {reason}")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StorageError> for ConfigError {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

// ── EngineConfig ───────────────────────────────────────────────────

/// Tuning parameters for the stepping engine.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    /// Block capacity for newly created containers.
    pub storage: StorageConfig,
    /// Event passes per particle per tick before the remaining duration
    /// is integrated without events. Default: 10.
    pub max_events_per_tick: usize,
    /// Minimum time between two consecutive events of one particle.
    /// Candidates closer than this to the previous event are discarded.
    /// Default: 1e-5.
    pub retrigger_epsilon: f32,
    /// Rounds of action-spawned particles stepped with events per tick.
    /// Particles requested after the last round still move to the end of
    /// the tick, but without events. Default: 4.
    pub max_spawn_generations: usize,
    /// Size of a dedicated worker pool. `None` uses rayon's global pool.
    pub worker_threads: Option<usize>,
}

impl EngineConfig {
    /// Default event cap.
    pub const DEFAULT_MAX_EVENTS_PER_TICK: usize = 10;
    /// Default retrigger threshold.
    pub const DEFAULT_RETRIGGER_EPSILON: f32 = 1e-5;
    /// Default spawn generation limit.
    pub const DEFAULT_MAX_SPAWN_GENERATIONS: usize = 4;

    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.storage.validate()?;
        if self.max_events_per_tick == 0 {
            return Err(ConfigError::InvalidEventCap);
        }
        if !self.retrigger_epsilon.is_finite() || self.retrigger_epsilon < 0.0 {
            return Err(ConfigError::InvalidRetriggerEpsilon {
                value: self.retrigger_epsilon,
            });
        }
        if self.worker_threads == Some(0) {
            return Err(ConfigError::InvalidWorkerThreads);
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            max_events_per_tick: Self::DEFAULT_MAX_EVENTS_PER_TICK,
            retrigger_epsilon: Self::DEFAULT_RETRIGGER_EPSILON,
            max_spawn_generations: Self::DEFAULT_MAX_SPAWN_GENERATIONS,
            worker_threads: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_events_per_tick, 10);
        assert_eq!(config.retrigger_epsilon, 1e-5);
        assert_eq!(config.max_spawn_generations, 4);
        assert_eq!(config.storage.block_size, 1000);
    }

    #[test]
    fn zero_block_size_is_a_storage_error() {
        let config = EngineConfig {
            storage: StorageConfig::new(0),
            ..EngineConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Storage(_)));
        assert!(err.source().is_some());
    }

    #[test]
    fn zero_event_cap_rejected() {
        let config = EngineConfig {
            max_events_per_tick: 0,
            ..EngineConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidEventCap));
    }

    #[test]
    fn negative_epsilon_rejected() {
        let config = EngineConfig {
            retrigger_epsilon: -1.0,
            ..EngineConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidRetriggerEpsilon { value: -1.0 })
        );
    }

    #[test]
    fn nan_epsilon_rejected() {
        let config = EngineConfig {
            retrigger_epsilon: f32::NAN,
            ..EngineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRetriggerEpsilon { .. })
        ));
    }

    #[test]
    fn zero_workers_rejected() {
        let config = EngineConfig {
            worker_threads: Some(0),
            ..EngineConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidWorkerThreads));
    }

    #[test]
    fn zero_epsilon_allowed() {
        let config = EngineConfig {
            retrigger_epsilon: 0.0,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_ok());
    }
}
