//! This module implements the beam exporter itself: it holds on to a state and
//! its settings and writes a grid file every time it's run.

use std::path::PathBuf;

use log::debug;
use toml::Table;

use crate::elements::*;
use crate::errors::*;
use crate::mesh::MeshSnapshot;
use crate::report::*;
use crate::settings::*;
use crate::state::StructuralState;
use crate::writer::write_grid;

/// Exports the beam of a structural state to `<route>/<case>_beam.<ext>`.
pub struct BeamPlot<E = CrvElement, R = LogReporter> {
  /// The state being exported.
  state: StructuralState<E>,
  /// The resolved settings.
  settings: BeamPlotSettings,
  /// Where notices go.
  reporter: R,
}

impl<E: BeamElement> BeamPlot<E, LogReporter> {
  /// Initialises an exporter that reports through the `log` facade.
  pub fn new(state: StructuralState<E>, options: &Table) -> Self {
    return Self::initialise(state, options, LogReporter);
  }
}

impl<E: BeamElement, R: Reporter> BeamPlot<E, R> {
  /// Resolves settings from a raw mapping and holds on to the state. Does not
  /// touch the filesystem; a missing route falls back to the default with a
  /// warning.
  pub fn initialise(
    state: StructuralState<E>,
    options: &Table,
    reporter: R
  ) -> Self {
    let settings = BeamPlotSettings::resolve(options, &reporter);
    return Self::with_settings(state, settings, reporter);
  }

  /// Creates an exporter from already-resolved settings.
  pub fn with_settings(
    state: StructuralState<E>,
    settings: BeamPlotSettings,
    reporter: R
  ) -> Self {
    return Self { state, settings, reporter };
  }

  /// The resolved settings.
  pub fn settings(&self) -> &BeamPlotSettings {
    return &self.settings;
  }

  /// The state being exported.
  pub fn state(&self) -> &StructuralState<E> {
    return &self.state;
  }

  /// Gives the state back.
  pub fn into_state(self) -> StructuralState<E> {
    return self.state;
  }

  /// Where `export` writes to.
  pub fn output_path(&self) -> PathBuf {
    return self.settings.route.join(format!(
      "{}.{}",
      self.state.beam_file_stem(),
      self.settings.format.extension()
    ));
  }

  /// Creates the output directory if needed, builds the mesh and writes it.
  /// Returns the path of the written file.
  pub fn export(&self) -> Result<PathBuf, ExportError> {
    std::fs::create_dir_all(&self.settings.route)?;
    let mesh = MeshSnapshot::build(&self.state)?;
    let vtk = mesh.to_vtk(&format!("{} {}", SOLVER_ID, self.state.case))?;
    let path = write_grid(
      vtk,
      &self.settings.route,
      &self.state.beam_file_stem(),
      self.settings.format
    )?;
    debug!("Wrote {}.", path.display());
    return Ok(path);
  }

  /// Runs an export, reports completion and passes the state along,
  /// untouched, to whatever comes next.
  pub fn run(&self) -> Result<&StructuralState<E>, ExportError> {
    self.export()?;
    self.reporter.info("...Finished");
    return Ok(&self.state);
  }
}
