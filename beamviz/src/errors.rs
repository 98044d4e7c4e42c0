//! Contains error types for loading states and exporting them.

use std::error::Error;
use std::fmt::Display;
use std::io;

/// Ways in which a structural state can break its own contract. These are
/// bugs upstream; exports abort on them instead of writing a broken mesh.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StateError {
  /// Some per-node or per-element array doesn't have the declared length.
  LengthMismatch {
    /// Which array.
    what: &'static str,
    /// The declared length.
    expected: usize,
    /// The actual length.
    found: usize
  },
  /// A node's master element doesn't exist.
  MasterElementOutOfRange {
    /// The node.
    node: usize,
    /// The element it claims as master.
    element: usize,
    /// How many elements there are.
    num_elem: usize
  },
  /// A node's local index doesn't exist within its master element.
  LocalNodeOutOfRange {
    /// The node.
    node: usize,
    /// Its master element.
    element: usize,
    /// The local index within that element.
    local_node: usize
  },
  /// An element references a node that doesn't exist.
  ConnectivityOutOfRange {
    /// The element.
    element: usize,
    /// The node it references.
    node: usize,
    /// How many nodes there are.
    num_node: usize
  },
  /// An index is too large to be stored in the grid file.
  IndexOverflow(usize),
}

impl Display for StateError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    return match self {
      Self::LengthMismatch { what, expected, found } => write!(
        f,
        "{} has {} entries, expected {}",
        what,
        found,
        expected
      ),
      Self::MasterElementOutOfRange { node, element, num_elem } => write!(
        f,
        "node {} has master element {}, but there are only {} elements",
        node,
        element,
        num_elem
      ),
      Self::LocalNodeOutOfRange { node, element, local_node } => write!(
        f,
        "node {} is local node {} of element {}, which doesn't exist",
        node,
        local_node,
        element
      ),
      Self::ConnectivityOutOfRange { element, node, num_node } => write!(
        f,
        "element {} references node {}, but there are only {} nodes",
        element,
        node,
        num_node
      ),
      Self::IndexOverflow(i) => write!(f, "index {} is too large to export", i),
    };
  }
}

impl Error for StateError {}

/// Errors that abort an export.
#[derive(Debug, derive_more::From)]
pub enum ExportError {
  /// The state was inconsistent.
  State(StateError),
  /// Creating the output directory or moving the file into place failed.
  Io(io::Error),
  /// The grid writer failed.
  Grid(vtkio::Error),
}

impl Display for ExportError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    return match self {
      Self::State(e) => write!(f, "invalid structural state: {}", e),
      Self::Io(e) => write!(f, "I/O error: {}", e),
      Self::Grid(e) => write!(f, "could not write grid: {}", e),
    };
  }
}

impl Error for ExportError {
  fn source(&self) -> Option<&(dyn Error + 'static)> {
    return match self {
      Self::State(e) => Some(e),
      Self::Io(e) => Some(e),
      Self::Grid(e) => Some(e),
    };
  }
}

/// Errors when loading a structural state from disk.
#[derive(Debug, derive_more::From)]
pub enum LoadError {
  /// The file couldn't be read.
  Io(io::Error),
  /// The file isn't a valid state.
  Json(serde_json::Error),
  /// The file parsed, but the state is inconsistent.
  State(StateError),
}

impl Display for LoadError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    return match self {
      Self::Io(e) => write!(f, "could not read state: {}", e),
      Self::Json(e) => write!(f, "could not parse state: {}", e),
      Self::State(e) => write!(f, "invalid structural state: {}", e),
    };
  }
}

impl Error for LoadError {}
