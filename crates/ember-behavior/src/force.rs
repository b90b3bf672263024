//! The [`Force`] trait.

use ember_core::{BehaviorError, Vec3};
use ember_storage::AttributesDeclaration;

use crate::set::ParticleSet;

/// A force acting on every particle of a type.
///
/// # Contract
///
/// - `add_force()` is a pure function of the current attributes.
/// - Forces accumulate: implementations must add into `forces`, never
///   overwrite it. `forces[i]` belongs to the `i`-th particle of the set.
/// - `&self`: forces are shared read-only across worker threads.
pub trait Force: Send + Sync {
    /// Human-readable name for error reporting.
    fn name(&self) -> &str;

    /// Attributes this force reads.
    ///
    /// Default: none beyond the built-in attributes.
    fn declare_attributes(&self, _attributes: &mut AttributesDeclaration) {}

    /// Add this force's contribution for every particle in `particles`.
    fn add_force(&self, particles: &ParticleSet<'_>, forces: &mut [Vec3]) -> Result<(), BehaviorError>;
}
