//! This module defines basic geometric concepts used to describe the
//! orientation of beam nodes.

use nalgebra::{Rotation3, Vector3};
use serde::{Deserialize, Serialize};

/// Number of nodes in every beam element (two ends plus a midside node).
pub const NODES_PER_ELEM: usize = 3;

/// The three axes of a local frame.
#[derive(
  Copy, Clone, Debug, Serialize, Deserialize, PartialOrd, Ord, PartialEq, Eq
)]
pub enum Axis {
  /// The X axis.
  X,
  /// The Y axis.
  Y,
  /// The Z axis.
  Z,
}

impl Axis {
  /// Returns all axes in order.
  pub const fn all() -> &'static [Self; 3] {
    return &[Self::X, Self::Y, Self::Z];
  }

  /// Returns this axis' lowercase letter.
  pub const fn letter(&self) -> char {
    return match self {
      Axis::X => 'x',
      Axis::Y => 'y',
      Axis::Z => 'z',
    };
  }

  /// Returns this axis' number 1-3.
  pub const fn number(&self) -> usize {
    return match self {
      Axis::X => 1,
      Axis::Y => 2,
      Axis::Z => 3,
    };
  }

  /// Returns the zero-based column of this axis in a rotation matrix.
  pub const fn column(&self) -> usize {
    return self.number() - 1;
  }

  /// Name of the point vector attribute holding this local axis.
  pub fn attribute_name(&self) -> String {
    return format!("local_{}", self.letter());
  }
}

/// A local frame at a single point: three (ideally orthonormal) axes.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Triad {
  /// Local x axis.
  pub x: Vector3<f64>,
  /// Local y axis.
  pub y: Vector3<f64>,
  /// Local z axis.
  pub z: Vector3<f64>,
}

impl Triad {
  /// Builds the frame whose axes are the columns of a rotation matrix.
  pub fn from_rotation(rot: &Rotation3<f64>) -> Self {
    let col = |a: Axis| rot.matrix().column(a.column()).into_owned();
    return Self {
      x: col(Axis::X),
      y: col(Axis::Y),
      z: col(Axis::Z),
    };
  }

  /// Builds the frame from a Cartesian rotation vector (axis times angle).
  /// The rotation matrix is the exponential map of the vector's skew matrix,
  /// i.e. Rodrigues' formula.
  pub fn from_crv(psi: &Vector3<f64>) -> Self {
    return Self::from_rotation(&Rotation3::new(*psi));
  }
}

/// The deformed frames of every local node of an element, split by axis.
/// Row `k` of each axis array belongs to local node `k`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ElementTriads {
  /// Local x axes, one per local node.
  pub vx: [Vector3<f64>; NODES_PER_ELEM],
  /// Local y axes, one per local node.
  pub vy: [Vector3<f64>; NODES_PER_ELEM],
  /// Local z axes, one per local node.
  pub vz: [Vector3<f64>; NODES_PER_ELEM],
}

impl ElementTriads {
  /// Groups per-node frames into per-axis arrays.
  pub fn from_triads(triads: &[Triad; NODES_PER_ELEM]) -> Self {
    return Self {
      vx: triads.map(|t| t.x),
      vy: triads.map(|t| t.y),
      vz: triads.map(|t| t.z),
    };
  }

  /// Returns the frame at a local node, if there is one.
  pub fn at(&self, local_node: usize) -> Option<Triad> {
    return Some(Triad {
      x: *self.vx.get(local_node)?,
      y: *self.vy.get(local_node)?,
      z: *self.vz.get(local_node)?,
    });
  }
}
