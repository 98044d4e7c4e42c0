use std::cell::RefCell;
use std::f64::consts::FRAC_PI_2;

use log::Level;
use nalgebra::Vector3;
use toml::Table;
use vtkio::model::{
  Attribute, CellType, DataSet, IOBuffer, Piece, VertexNumbers
};

use crate::prelude::*;

/// Keeps every notice it gets.
#[derive(Default)]
struct RecordingReporter {
  notices: RefCell<Vec<(Level, String)>>
}

impl Reporter for RecordingReporter {
  fn notice(&self, level: Level, message: &str) {
    self.notices.borrow_mut().push((level, message.to_string()));
  }
}

impl RecordingReporter {
  fn count(&self, level: Level) -> usize {
    return self.notices.borrow().iter().filter(|(l, _)| *l == level).count();
  }
}

/// Four nodes along x, two elements sharing the middle ones.
fn four_node_state() -> StructuralState {
  let pos_def = (0..4)
    .map(|i| Vector3::new(i as f64, 0.0, 0.0))
    .collect::<Vec<_>>();
  let node_master_elem = vec![
    (0, 0).into(),
    (0, 1).into(),
    (0, 2).into(),
    (1, 2).into(),
  ];
  let elements = vec![
    CrvElement::straight([0, 1, 2]),
    CrvElement::straight([1, 2, 3]),
  ];
  return StructuralState::new("wing", pos_def, node_master_elem, elements);
}

/// Options pointing somewhere.
fn options_with_route(route: &std::path::Path) -> Table {
  let mut options = Table::new();
  options.insert("route".into(), route.display().to_string().into());
  return options;
}

fn assert_near(a: &Vector3<f64>, b: &Vector3<f64>) {
  assert!((a - b).norm() < 1e-12, "{} != {}", a, b);
}

#[test]
fn crv_triads() {
  let identity = Triad::from_crv(&Vector3::zeros());
  assert_eq!(identity.x, Vector3::x());
  assert_eq!(identity.y, Vector3::y());
  assert_eq!(identity.z, Vector3::z());
  let quarter = Triad::from_crv(&Vector3::new(0.0, 0.0, FRAC_PI_2));
  assert_near(&quarter.x, &Vector3::y());
  assert_near(&quarter.y, &-Vector3::x());
  assert_near(&quarter.z, &Vector3::z());
  let elem = CrvElement {
    psi_def: [Vector3::zeros(), Vector3::new(0.0, 0.0, FRAC_PI_2), Vector3::zeros()],
    reordered_global_connectivity: [0, 1, 2]
  };
  let triads = elem.deformed_triad();
  assert_near(&triads.vx[1], &Vector3::y());
  assert_eq!(triads.at(1).map(|t| t.z), Some(triads.vz[1]));
  assert!(triads.at(NODES_PER_ELEM).is_none());
}

#[test]
fn axis_names() {
  let names = Axis::all().iter().map(|a| a.attribute_name()).collect::<Vec<_>>();
  assert_eq!(names, ["local_x", "local_y", "local_z"]);
  let columns = Axis::all().iter().map(|a| a.column()).collect::<Vec<_>>();
  assert_eq!(columns, [0, 1, 2]);
}

#[test]
fn mesh_shape_and_ids() {
  let state = four_node_state();
  let mesh = MeshSnapshot::build(&state).unwrap();
  assert_eq!(mesh.num_points(), 4);
  assert_eq!(mesh.num_cells(), 2);
  assert_eq!(mesh.node_id, [0, 1, 2, 3]);
  assert_eq!(mesh.elem_id, [0, 1]);
  assert_eq!(mesh.points, state.pos_def);
  assert_eq!(mesh.connectivity, [[0, 1, 2], [1, 2, 3]]);
  for conn in mesh.connectivity.iter() {
    assert!(conn.iter().all(|n| *n < mesh.num_points()));
  }
  for axis in Axis::all() {
    assert_eq!(mesh.local_axis(*axis).len(), 4);
  }
}

#[test]
fn frames_come_from_master_element() {
  // every local node gets a distinct frame so mixups show
  let frame = |k: f64| Triad {
    x: Vector3::new(k, 0.1, 0.2),
    y: Vector3::new(0.3, k, 0.4),
    z: Vector3::new(0.5, 0.6, k),
  };
  let elements = vec![
    TriadElement {
      triads: [frame(1.0), frame(2.0), frame(3.0)],
      reordered_global_connectivity: [0, 1, 2]
    },
    TriadElement {
      triads: [frame(4.0), frame(5.0), frame(6.0)],
      reordered_global_connectivity: [2, 3, 4]
    },
  ];
  // node 2 is shared, and element 1 is its master
  let masters: Vec<MasterElement> = vec![
    (0, 0).into(),
    (0, 1).into(),
    (1, 0).into(),
    (1, 1).into(),
    (1, 2).into(),
  ];
  let pos_def = vec![Vector3::zeros(); 5];
  let state = StructuralState::new("frames", pos_def, masters.clone(), elements);
  let mesh = MeshSnapshot::build(&state).unwrap();
  for (i, m) in masters.iter().enumerate() {
    let triads = state.elements[m.element].deformed_triad();
    assert_eq!(mesh.local_x[i], triads.vx[m.local_node]);
    assert_eq!(mesh.local_y[i], triads.vy[m.local_node]);
    assert_eq!(mesh.local_z[i], triads.vz[m.local_node]);
  }
  assert_eq!(mesh.local_x[2], frame(4.0).x);
}

#[test]
fn bad_indices_fail_fast() {
  let mut state = four_node_state();
  state.node_master_elem[3] = (2, 0).into();
  assert_eq!(
    MeshSnapshot::build(&state),
    Err(StateError::MasterElementOutOfRange { node: 3, element: 2, num_elem: 2 })
  );
  let mut state = four_node_state();
  state.node_master_elem[1] = (0, 3).into();
  assert_eq!(
    MeshSnapshot::build(&state),
    Err(StateError::LocalNodeOutOfRange { node: 1, element: 0, local_node: 3 })
  );
  let mut state = four_node_state();
  state.elements[1].reordered_global_connectivity = [2, 3, 4];
  assert_eq!(
    state.validate(),
    Err(StateError::ConnectivityOutOfRange { element: 1, node: 4, num_node: 4 })
  );
  let mut state = four_node_state();
  state.num_node = 5;
  assert_eq!(
    MeshSnapshot::build(&state),
    Err(StateError::LengthMismatch { what: "pos_def", expected: 5, found: 4 })
  );
}

#[test]
fn missing_route_falls_back() {
  let reporter = RecordingReporter::default();
  let plot = BeamPlot::initialise(four_node_state(), &Table::new(), &reporter);
  assert_eq!(plot.settings().route, std::path::PathBuf::from(DEFAULT_ROUTE));
  assert_eq!(plot.settings().format, GridFormat::Vtu);
  assert_eq!(reporter.count(Level::Warn), 1);
  let msg = reporter.notices.borrow()[0].1.clone();
  assert!(msg.contains("defaulting to ./output"));
}

#[test]
fn bad_settings_fall_back() {
  let reporter = RecordingReporter::default();
  let mut options = Table::new();
  options.insert("route".into(), toml::Value::Integer(3));
  options.insert("format".into(), "stl".into());
  let settings = BeamPlotSettings::resolve(&options, &reporter);
  assert_eq!(settings, BeamPlotSettings::default());
  assert_eq!(reporter.count(Level::Warn), 2);
  let reporter = RecordingReporter::default();
  options.insert("route".into(), "somewhere".into());
  options.insert("format".into(), "vtk-ascii".into());
  let settings = BeamPlotSettings::resolve(&options, &reporter);
  assert_eq!(settings.route, std::path::PathBuf::from("somewhere"));
  assert_eq!(settings.format, GridFormat::VtkAscii);
  assert_eq!(settings.format.extension(), "vtk");
  assert_eq!(reporter.count(Level::Warn), 0);
}

#[test]
fn run_creates_directory_and_writes() {
  let tmp = tempfile::tempdir().unwrap();
  let route = tmp.path().join("deep").join("output");
  let reporter = RecordingReporter::default();
  let state = four_node_state();
  let plot = BeamPlot::initialise(
    state.clone(),
    &options_with_route(&route),
    &reporter
  );
  assert!(!route.exists());
  assert_eq!(plot.run().unwrap(), &state);
  let expected = route.join("wing_beam.vtu");
  assert_eq!(plot.output_path(), expected);
  assert!(expected.is_file());
  // again, with the directory already there
  assert!(plot.run().is_ok());
  assert_eq!(reporter.count(Level::Warn), 0);
  assert_eq!(reporter.count(Level::Info), 2);
  // no temporaries left behind
  let entries = std::fs::read_dir(&route).unwrap().count();
  assert_eq!(entries, 1);
}

#[test]
fn ascii_file_has_attributes() {
  let tmp = tempfile::tempdir().unwrap();
  let mut options = options_with_route(tmp.path());
  options.insert("format".into(), "vtk-ascii".into());
  let reporter = RecordingReporter::default();
  let plot = BeamPlot::initialise(four_node_state(), &options, &reporter);
  let path = plot.export().unwrap();
  assert_eq!(path, tmp.path().join("wing_beam.vtk"));
  let contents = std::fs::read_to_string(path).unwrap();
  assert!(contents.starts_with("# vtk DataFile"));
  for name in ["node_id", "elem_id", "local_x", "local_y", "local_z"] {
    assert!(contents.contains(name), "missing {}", name);
  }
}

/// Pulls a named integer array out of a list of grid attributes.
fn u32_attribute(attrs: &[Attribute], name: &str) -> Vec<u32> {
  for attr in attrs.iter() {
    if let Attribute::DataArray(arr) = attr {
      if arr.name == name {
        if let IOBuffer::U32(v) = &arr.data {
          return v.clone();
        }
        panic!("{} is not stored as u32", name);
      }
    }
  }
  panic!("no attribute named {}", name);
}

#[test]
fn written_grid_reads_back() {
  let tmp = tempfile::tempdir().unwrap();
  let reporter = RecordingReporter::default();
  let plot = BeamPlot::initialise(
    four_node_state(),
    &options_with_route(tmp.path()),
    &reporter
  );
  let path = plot.export().unwrap();
  let vtk = vtkio::Vtk::import(&path).unwrap();
  let mut pieces = match vtk.data {
    DataSet::UnstructuredGrid { pieces, .. } => pieces,
    other => panic!("expected an unstructured grid, got {:?}", other),
  };
  assert_eq!(pieces.len(), 1);
  let piece = match pieces.remove(0) {
    Piece::Inline(p) => *p,
    _ => panic!("expected inline piece data"),
  };
  assert_eq!(piece.points.len(), 4 * 3);
  assert_eq!(piece.cells.types, vec![CellType::PolyLine; 2]);
  let connectivity: Vec<u64> = match piece.cells.cell_verts {
    VertexNumbers::XML { connectivity, offsets } => {
      assert_eq!(offsets, [3, 6]);
      connectivity
    },
    VertexNumbers::Legacy { num_cells, vertices } => {
      assert_eq!(num_cells, 2);
      assert_eq!((vertices[0], vertices[4]), (3, 3));
      vertices.iter()
        .enumerate()
        .filter(|(i, _)| i % 4 != 0)
        .map(|(_, v)| *v as u64)
        .collect()
    },
  };
  assert_eq!(connectivity, [0, 1, 2, 1, 2, 3]);
  assert_eq!(u32_attribute(&piece.data.point, "node_id"), [0, 1, 2, 3]);
  assert_eq!(u32_attribute(&piece.data.cell, "elem_id"), [0, 1]);
  for axis in Axis::all() {
    let name = axis.attribute_name();
    let found = piece.data.point.iter().any(|a| match a {
      Attribute::DataArray(arr) => arr.name == name && arr.data.len() == 4 * 3,
      _ => false,
    });
    assert!(found, "missing {}", name);
  }
}

#[test]
fn nested_case_name_writes_in_subdirectory() {
  let tmp = tempfile::tempdir().unwrap();
  std::fs::create_dir(tmp.path().join("sub")).unwrap();
  let mut state = four_node_state();
  state.case = "sub/wing".to_string();
  let reporter = RecordingReporter::default();
  let plot = BeamPlot::initialise(state, &options_with_route(tmp.path()), &reporter);
  let path = plot.export().unwrap();
  assert_eq!(path, tmp.path().join("sub").join("wing_beam.vtu"));
  assert!(path.is_file());
  assert_eq!(std::fs::read_dir(tmp.path().join("sub")).unwrap().count(), 1);
}

#[test]
fn invalid_state_writes_nothing() {
  let tmp = tempfile::tempdir().unwrap();
  let mut state = four_node_state();
  state.node_master_elem[0] = (7, 0).into();
  let reporter = RecordingReporter::default();
  let plot = BeamPlot::initialise(state, &options_with_route(tmp.path()), &reporter);
  let err = plot.run().unwrap_err();
  assert!(matches!(
    err,
    ExportError::State(StateError::MasterElementOutOfRange { element: 7, .. })
  ));
  assert!(err.to_string().contains("node 0"));
  assert!(!plot.output_path().exists());
  assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
  assert_eq!(reporter.count(Level::Info), 0);
}

#[test]
fn unwritable_route_is_an_io_error() {
  let tmp = tempfile::tempdir().unwrap();
  let blocker = tmp.path().join("file");
  std::fs::write(&blocker, "not a directory").unwrap();
  let reporter = RecordingReporter::default();
  let plot = BeamPlot::initialise(
    four_node_state(),
    &options_with_route(&blocker.join("output")),
    &reporter
  );
  assert!(matches!(plot.run(), Err(ExportError::Io(_))));
}

#[test]
fn load_state_from_json() {
  let json = r#"{
    "case": "wing",
    "num_node": 3, "num_elem": 1,
    "pos_def": [[0,0,0],[1,0,0],[2,0,0]],
    "node_master_elem": [[0,0],[0,1],[0,2]],
    "elements": [
      { "psi_def": [[0,0,0],[0,0,0],[0,0,0]],
        "reordered_global_connectivity": [0,1,2] }
    ]
  }"#;
  let state: StructuralState = StructuralState::from_json_str(json).unwrap();
  assert_eq!(state.beam_file_stem(), "wing_beam");
  assert_eq!(state.node_master_elem[2], MasterElement { element: 0, local_node: 2 });
  assert_eq!(state.elements[0], CrvElement::straight([0, 1, 2]));
  let broken = json.replace("[0,1,2] }", "[0,1,9] }");
  assert!(matches!(
    StructuralState::<CrvElement>::from_json_str(&broken),
    Err(LoadError::State(StateError::ConnectivityOutOfRange { node: 9, .. }))
  ));
  assert!(matches!(
    StructuralState::<CrvElement>::from_json_str("{}"),
    Err(LoadError::Json(_))
  ));
}
