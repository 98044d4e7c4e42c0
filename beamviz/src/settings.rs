//! This module implements the settings of the beam exporter and how they're
//! resolved from a raw key-value mapping, like a section of a TOML file.

use std::fmt::Display;
use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use toml::{Table, Value};

use crate::report::Reporter;

/// Identifies the exporter in notices and settings files.
pub const SOLVER_ID: &str = "BeamPlot";

/// Where files go when no route is given.
pub const DEFAULT_ROUTE: &str = "./output";

/// Grid file flavours we can write.
#[derive(
  Copy, Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq, ValueEnum
)]
#[serde(rename_all = "kebab-case")]
#[clap(rename_all = "kebab-case")]
pub enum GridFormat {
  /// XML unstructured grid.
  #[default]
  Vtu,
  /// Legacy binary VTK.
  Vtk,
  /// Legacy ASCII VTK.
  VtkAscii,
}

impl GridFormat {
  /// Extension of files in this format, without the dot.
  pub const fn extension(&self) -> &'static str {
    return match self {
      Self::Vtu => "vtu",
      Self::Vtk | Self::VtkAscii => "vtk",
    };
  }

  /// Setting-style name of the format.
  pub const fn name(&self) -> &'static str {
    return match self {
      Self::Vtu => "vtu",
      Self::Vtk => "vtk",
      Self::VtkAscii => "vtk-ascii",
    };
  }
}

impl Display for GridFormat {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    return write!(f, "{}", self.name());
  }
}

/// The resolved settings of a beam exporter.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BeamPlotSettings {
  /// Directory to write files in. Created if missing.
  pub route: PathBuf,
  /// Format of the written grid.
  pub format: GridFormat,
}

impl Default for BeamPlotSettings {
  fn default() -> Self {
    return Self {
      route: PathBuf::from(DEFAULT_ROUTE),
      format: GridFormat::default(),
    };
  }
}

impl BeamPlotSettings {
  /// Resolves settings from a raw mapping. Never fails: anything missing or
  /// unusable is replaced by its default, and the reporter is warned about
  /// the route falling back.
  pub fn resolve<R: Reporter>(raw: &Table, reporter: &R) -> Self {
    let mut settings = Self::default();
    match raw.get("route") {
      Some(Value::String(s)) if !s.is_empty() => {
        settings.route = PathBuf::from(s)
      },
      Some(_) => reporter.warn(&format!(
        "{}: route must be a non-empty string, defaulting to {}",
        SOLVER_ID,
        DEFAULT_ROUTE
      )),
      None => reporter.warn(&format!(
        "{}: no location for figures defined, defaulting to {}",
        SOLVER_ID,
        DEFAULT_ROUTE
      )),
    };
    if let Some(fmt) = raw.get("format") {
      match fmt.clone().try_into::<GridFormat>() {
        Ok(f) => settings.format = f,
        Err(_) => reporter.warn(&format!(
          "{}: unknown grid format {}, defaulting to {}",
          SOLVER_ID,
          fmt,
          settings.format
        )),
      };
    }
    return settings;
  }
}
