//! This module turns mesh snapshots into `vtkio` unstructured grids and writes
//! them to disk.
//!
//! Files are first written under a temporary name in the destination
//! directory and only renamed into place once the writer is done, so a failed
//! export never leaves a truncated file where a good one is expected.

use std::path::{Path, PathBuf};

use log::debug;
use nalgebra::Vector3;
use vtkio::model::{
  Attribute, Attributes, ByteOrder, CellType, Cells, DataSet,
  UnstructuredGridPiece, Version, VertexNumbers, Vtk
};

use crate::errors::{ExportError, StateError};
use crate::geometry::{Axis, NODES_PER_ELEM};
use crate::mesh::MeshSnapshot;
use crate::settings::GridFormat;

/// VTK file format version we write.
const VTK_VERSION: (u8, u8) = (4, 2);

/// Converts an index to what the grid stores.
fn grid_index(i: usize) -> Result<u32, StateError> {
  return u32::try_from(i).map_err(|_| StateError::IndexOverflow(i));
}

/// Converts a list of indices to what the grid stores.
fn grid_indices(v: &[usize]) -> Result<Vec<u32>, StateError> {
  return v.iter().copied().map(grid_index).collect();
}

/// Flattens vectors into x1, y1, z1, x2, ...
fn flatten(v: &[Vector3<f64>]) -> Vec<f64> {
  return v.iter().flat_map(|p| [p.x, p.y, p.z]).collect();
}

impl MeshSnapshot {
  /// Lays the snapshot out as a VTK unstructured grid. Every element becomes a
  /// 3-point poly-line cell, following the element from end to end.
  pub fn to_vtk(&self, title: &str) -> Result<Vtk, StateError> {
    let mut vertices: Vec<u32> = Vec::with_capacity(
      self.num_cells() * (NODES_PER_ELEM + 1)
    );
    for conn in self.connectivity.iter() {
      vertices.push(grid_index(conn.len())?);
      vertices.extend(grid_indices(conn)?);
    }
    let cells = Cells {
      cell_verts: VertexNumbers::Legacy {
        num_cells: grid_index(self.num_cells())?,
        vertices,
      },
      types: vec![CellType::PolyLine; self.num_cells()],
    };
    let mut point_data = vec![
      Attribute::scalars("node_id", 1).with_data(grid_indices(&self.node_id)?)
    ];
    for axis in Axis::all() {
      point_data.push(
        Attribute::vectors(axis.attribute_name())
          .with_data(flatten(self.local_axis(*axis)))
      );
    }
    let cell_data = vec![
      Attribute::scalars("elem_id", 1).with_data(grid_indices(&self.elem_id)?)
    ];
    let piece = UnstructuredGridPiece {
      points: flatten(&self.points).into(),
      cells,
      data: Attributes { point: point_data, cell: cell_data },
    };
    return Ok(Vtk {
      version: Version::new(VTK_VERSION),
      title: title.to_string(),
      byte_order: ByteOrder::BigEndian,
      file_path: None,
      data: DataSet::inline(piece),
    });
  }
}

/// Writes a grid to `<dir>/<stem>.<ext>`, the extension coming from the
/// format. The file's directory must exist; the stem may contain separators,
/// in which case that's a subdirectory of `dir`. Returns the final path.
pub fn write_grid(
  vtk: Vtk,
  dir: &Path,
  stem: &str,
  format: GridFormat
) -> Result<PathBuf, ExportError> {
  let ext = format.extension();
  let final_path = dir.join(format!("{}.{}", stem, ext));
  let final_dir = final_path.parent().unwrap_or(dir);
  let file_name = final_path.file_name()
    .map(|n| n.to_string_lossy().into_owned())
    .unwrap_or_default();
  // the writer picks the flavour from the extension, so keep it
  let tmp = tempfile::Builder::new()
    .prefix(&format!(".{}.", file_name))
    .suffix(&format!(".{}", ext))
    .tempfile_in(final_dir)?
    .into_temp_path();
  debug!("Writing {} grid to {}...", format, tmp.display());
  match format {
    GridFormat::Vtu | GridFormat::Vtk => vtk.export(&tmp)?,
    GridFormat::VtkAscii => vtk.export_ascii(&tmp)?,
  };
  tmp.persist(&final_path).map_err(|e| e.error)?;
  return Ok(final_path);
}
