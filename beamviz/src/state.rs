//! This module implements the structural state snapshot handed over by the
//! beam solver, and its loading from JSON.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use log::debug;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::elements::*;
use crate::errors::*;
use crate::geometry::NODES_PER_ELEM;

/// The master element of a node and the node's local index within it. Stored
/// in state files as a bare `[element, local_node]` pair.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "(usize, usize)", into = "(usize, usize)")]
pub struct MasterElement {
  /// Index of the element.
  pub element: usize,
  /// Index of the node within the element.
  pub local_node: usize,
}

impl From<(usize, usize)> for MasterElement {
  fn from(value: (usize, usize)) -> Self {
    return Self { element: value.0, local_node: value.1 };
  }
}

impl From<MasterElement> for (usize, usize) {
  fn from(value: MasterElement) -> Self {
    return (value.element, value.local_node);
  }
}

/// A snapshot of the beam's structural state. The exporter never mutates it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct StructuralState<E = CrvElement> {
  /// Name of the case; output files are named after it.
  pub case: String,
  /// Number of nodes.
  pub num_node: usize,
  /// Number of elements.
  pub num_elem: usize,
  /// Deformed nodal positions.
  pub pos_def: Vec<Vector3<f64>>,
  /// The master element of every node.
  pub node_master_elem: Vec<MasterElement>,
  /// The elements.
  pub elements: Vec<E>,
}

impl<E: BeamElement> StructuralState<E> {
  /// Creates a state, taking the node and element counts from the arrays.
  pub fn new(
    case: impl Into<String>,
    pos_def: Vec<Vector3<f64>>,
    node_master_elem: Vec<MasterElement>,
    elements: Vec<E>
  ) -> Self {
    return Self {
      case: case.into(),
      num_node: pos_def.len(),
      num_elem: elements.len(),
      pos_def,
      node_master_elem,
      elements,
    };
  }

  /// Base name (no extension) of the files exported for this state.
  pub fn beam_file_stem(&self) -> String {
    return format!("{}_beam", self.case);
  }

  /// Checks that every array has the declared length and every index points
  /// somewhere valid. Returns the first problem found.
  pub fn validate(&self) -> Result<(), StateError> {
    self.check_lengths()?;
    for (node, master) in self.node_master_elem.iter().enumerate() {
      self.check_master(node, master)?;
    }
    for (element, elem) in self.elements.iter().enumerate() {
      self.check_connectivity(element, elem)?;
    }
    return Ok(());
  }

  /// Checks that the per-node and per-element arrays have the declared sizes.
  pub(crate) fn check_lengths(&self) -> Result<(), StateError> {
    let check_len = |what, expected, found| {
      if expected == found {
        return Ok(());
      }
      return Err(StateError::LengthMismatch { what, expected, found });
    };
    check_len("pos_def", self.num_node, self.pos_def.len())?;
    check_len("node_master_elem", self.num_node, self.node_master_elem.len())?;
    check_len("elements", self.num_elem, self.elements.len())?;
    return Ok(());
  }

  /// Checks a single master element reference.
  pub(crate) fn check_master(
    &self,
    node: usize,
    master: &MasterElement
  ) -> Result<&E, StateError> {
    let elem = self.elements.get(master.element)
      .ok_or(StateError::MasterElementOutOfRange {
        node,
        element: master.element,
        num_elem: self.elements.len()
      })?;
    if master.local_node >= NODES_PER_ELEM {
      return Err(StateError::LocalNodeOutOfRange {
        node,
        element: master.element,
        local_node: master.local_node
      });
    }
    return Ok(elem);
  }

  /// Checks a single element's connectivity, returning it.
  pub(crate) fn check_connectivity(
    &self,
    element: usize,
    elem: &E
  ) -> Result<[usize; NODES_PER_ELEM], StateError> {
    let conn = elem.reordered_global_connectivity();
    if let Some(node) = conn.iter().find(|n| **n >= self.num_node) {
      return Err(StateError::ConnectivityOutOfRange {
        element,
        node: *node,
        num_node: self.num_node
      });
    }
    return Ok(conn);
  }
}

impl<E: BeamElement + for<'de> Deserialize<'de>> StructuralState<E> {
  /// Parses and validates a state from a JSON string.
  pub fn from_json_str(s: &str) -> Result<Self, LoadError> {
    let state: Self = serde_json::from_str(s)?;
    state.validate()?;
    return Ok(state);
  }

  /// Reads and validates a state from a JSON file.
  pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
    let file = File::open(path)?;
    let state: Self = serde_json::from_reader(BufReader::new(file))?;
    state.validate()?;
    debug!(
      "Loaded case \"{}\": {} nodes, {} elements.",
      state.case,
      state.num_node,
      state.num_elem
    );
    return Ok(state);
  }
}
