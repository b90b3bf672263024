//! Columnar particle storage for the Ember simulation engine.
//!
//! # Architecture
//!
//! ```text
//! ParticlesState (one per simulation)
//! ├── current_time
//! └── ParticleTypeId → ParticlesContainer
//!     ├── Arc<AttributesInfo> (schema shared by every block)
//!     └── ParticlesBlock[] (fixed capacity, owned by value)
//!         ├── AttributeColumn × schema length
//!         └── active_amount watermark
//! ```
//!
//! Blocks are the unit of parallel work: the engine hands each worker an
//! exclusive `&mut ParticlesBlock`. New slots are reserved through a
//! [`BlockAllocator`], which borrows the containers exclusively.
//! Deleted particles are swap-removed within their block and
//! [`ParticlesContainer::compress`] consolidates sparse blocks afterwards.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod allocator;
pub mod arrays;
pub mod block;
mod column;
pub mod config;
pub mod container;
pub mod error;
pub mod info;
pub mod state;

// Public re-exports for the primary API surface.
pub use allocator::{BlockAllocator, BlockRange};
pub use arrays::{AttributeArrays, AttributeArraysMut};
pub use block::ParticlesBlock;
pub use config::StorageConfig;
pub use container::ParticlesContainer;
pub use error::StorageError;
pub use info::{AttributesDeclaration, AttributesInfo};
pub use state::ParticlesState;
