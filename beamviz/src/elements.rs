//! This module defines what the exporter needs from a beam element, so that
//! any element formulation can be plotted, plus the rotation vector-based
//! element most beam solvers hand out.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::geometry::*;

/// Anything that can be plotted as a 3-node beam element.
pub trait BeamElement {
  /// Returns the deformed local frames at every local node, split by axis.
  fn deformed_triad(&self) -> ElementTriads;

  /// Returns the global node indices of the element, ordered along it (end,
  /// midside, end).
  fn reordered_global_connectivity(&self) -> [usize; NODES_PER_ELEM];
}

/// A 3-node beam element whose nodal orientations are stored as Cartesian
/// rotation vectors.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CrvElement {
  /// Deformed rotation vector at each local node.
  pub psi_def: [Vector3<f64>; NODES_PER_ELEM],
  /// Global node indices, ordered along the element.
  pub reordered_global_connectivity: [usize; NODES_PER_ELEM],
}

impl CrvElement {
  /// Creates an undeformed (unrotated) element over some nodes.
  pub fn straight(conn: [usize; NODES_PER_ELEM]) -> Self {
    return Self {
      psi_def: [Vector3::zeros(); NODES_PER_ELEM],
      reordered_global_connectivity: conn,
    };
  }
}

impl BeamElement for CrvElement {
  fn deformed_triad(&self) -> ElementTriads {
    return ElementTriads::from_triads(&self.psi_def.map(|p| Triad::from_crv(&p)));
  }

  fn reordered_global_connectivity(&self) -> [usize; NODES_PER_ELEM] {
    return self.reordered_global_connectivity;
  }
}

/// An element that already knows its deformed frames. Handy when the frames
/// come from somewhere that doesn't speak rotation vectors.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TriadElement {
  /// Frames at each local node.
  pub triads: [Triad; NODES_PER_ELEM],
  /// Global node indices, ordered along the element.
  pub reordered_global_connectivity: [usize; NODES_PER_ELEM],
}

impl BeamElement for TriadElement {
  fn deformed_triad(&self) -> ElementTriads {
    return ElementTriads::from_triads(&self.triads);
  }

  fn reordered_global_connectivity(&self) -> [usize; NODES_PER_ELEM] {
    return self.reordered_global_connectivity;
  }
}
