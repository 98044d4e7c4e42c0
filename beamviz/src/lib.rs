//! This library exports the state of a beam structural model to unstructured
//! grid files for viewing in ParaView and friends.
//!
//! It doesn't solve anything: it takes already-computed deformed positions,
//! nodal orientation triads and element connectivities, lays them out as a
//! mesh of 3-node line cells, and hands that off to `vtkio` for writing.
//!
//! Element formulations are pluggable through the `BeamElement` trait; the one
//! shipped here stores Cartesian rotation vectors, as beam solvers usually do.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]
#![allow(clippy::needless_return)]

pub mod elements;
pub mod errors;
pub mod exporter;
pub mod geometry;
pub mod mesh;
pub mod report;
pub mod settings;
pub mod state;
pub mod writer;

/// Imports the most relevant exports from the library.
pub mod prelude {
  pub use crate::elements::*;
  pub use crate::errors::*;
  pub use crate::exporter::*;
  pub use crate::geometry::*;
  pub use crate::mesh::*;
  pub use crate::report::*;
  pub use crate::settings::*;
  pub use crate::state::*;
  pub use crate::writer::*;
}

#[cfg(test)]
mod tests;
