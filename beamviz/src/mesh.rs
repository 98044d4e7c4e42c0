//! This module lays out a structural state as a mesh of line cells with the
//! attributes we want to see in a viewer.

use log::debug;
use nalgebra::Vector3;

use crate::elements::BeamElement;
use crate::errors::StateError;
use crate::geometry::*;
use crate::state::StructuralState;

/// Everything that goes into a beam grid file. Built, written and dropped
/// within a single export.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshSnapshot {
  /// Point coordinates, one per node.
  pub points: Vec<Vector3<f64>>,
  /// Node indices of every cell, one cell per element.
  pub connectivity: Vec<[usize; NODES_PER_ELEM]>,
  /// Point scalar: the node index.
  pub node_id: Vec<usize>,
  /// Cell scalar: the element index.
  pub elem_id: Vec<usize>,
  /// Point vector: local x axis from the master element.
  pub local_x: Vec<Vector3<f64>>,
  /// Point vector: local y axis from the master element.
  pub local_y: Vec<Vector3<f64>>,
  /// Point vector: local z axis from the master element.
  pub local_z: Vec<Vector3<f64>>,
}

impl MeshSnapshot {
  /// Builds the mesh for a state. Every node gets the frame of its master
  /// element at its local index, nothing averaged across elements sharing it.
  /// Fails on the first index that points nowhere.
  pub fn build<E: BeamElement>(
    state: &StructuralState<E>
  ) -> Result<Self, StateError> {
    state.check_lengths()?;
    let num_node = state.num_node;
    let num_elem = state.num_elem;
    // coordinates
    let points = state.pos_def.clone();
    let node_id = (0..num_node).collect::<Vec<_>>();
    // local frames
    let mut local_x = Vec::with_capacity(num_node);
    let mut local_y = Vec::with_capacity(num_node);
    let mut local_z = Vec::with_capacity(num_node);
    for (node, master) in state.node_master_elem.iter().enumerate() {
      let elem = state.check_master(node, master)?;
      let triad = elem.deformed_triad()
        .at(master.local_node)
        .ok_or(StateError::LocalNodeOutOfRange {
          node,
          element: master.element,
          local_node: master.local_node
        })?;
      local_x.push(triad.x);
      local_y.push(triad.y);
      local_z.push(triad.z);
    }
    // cells
    let connectivity = state.elements.iter()
      .enumerate()
      .map(|(element, elem)| state.check_connectivity(element, elem))
      .collect::<Result<Vec<_>, _>>()?;
    let elem_id = (0..num_elem).collect::<Vec<_>>();
    debug!(
      "Built beam mesh with {} points and {} cells.",
      points.len(),
      connectivity.len()
    );
    return Ok(Self {
      points,
      connectivity,
      node_id,
      elem_id,
      local_x,
      local_y,
      local_z,
    });
  }

  /// Number of points.
  pub fn num_points(&self) -> usize {
    return self.points.len();
  }

  /// Number of cells.
  pub fn num_cells(&self) -> usize {
    return self.connectivity.len();
  }

  /// The local axis vectors for a given axis.
  pub fn local_axis(&self, axis: Axis) -> &[Vector3<f64>] {
    return match axis {
      Axis::X => &self.local_x,
      Axis::Y => &self.local_y,
      Axis::Z => &self.local_z,
    };
  }
}
