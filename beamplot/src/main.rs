//! Exports a beam structural state, stored as JSON, to a grid file that can be
//! opened in ParaView.

#![allow(clippy::needless_return)]
#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::error::Error;
use std::path::{Path, PathBuf};

use beamviz::prelude::*;
use clap::Parser;
use log::{LevelFilter, info, error};
use toml::{Table, Value};

/// The arguments passed to the exporter.
#[derive(Clone, Debug, Parser)]
#[command(author, version, about)]
struct Cli {
  /// Settings file (TOML). Exporter options are read from its [BeamPlot]
  /// table; if it's missing, defaults are used.
  #[arg(short = 's', long = "settings")]
  settings: Option<PathBuf>,
  /// Directory to write to. Overrides the settings file.
  #[arg(short = 'r', long = "route")]
  route: Option<PathBuf>,
  /// Grid format to write. Overrides the settings file.
  #[arg(short = 'f', long = "format")]
  format: Option<GridFormat>,
  /// Case name to use for the output file. Overrides the state file.
  #[arg(short = 'c', long = "case")]
  case: Option<String>,
  /// Output extra/debug info while exporting.
  #[arg(short = 'v', long = "verbose")]
  verbose: bool,
  /// The structural state (JSON).
  state: PathBuf,
}

/// Reads the exporter's options from a settings file.
fn read_options(path: &Path) -> Result<Table, Box<dyn Error>> {
  let contents = std::fs::read_to_string(path)?;
  let mut settings: Table = toml::from_str(&contents)?;
  return Ok(match settings.remove(SOLVER_ID) {
    Some(Value::Table(t)) => t,
    Some(_) => return Err(format!("[{}] must be a table", SOLVER_ID).into()),
    None => Table::new(),
  });
}

/// Loads everything and runs the export once.
fn run(args: &Cli) -> Result<(), Box<dyn Error>> {
  let mut options = match args.settings {
    Some(ref p) => read_options(p)?,
    None => Table::new(),
  };
  if let Some(ref r) = args.route {
    options.insert("route".into(), r.display().to_string().into());
  }
  if let Some(f) = args.format {
    options.insert("format".into(), f.name().into());
  }
  if let Some(bn) = args.state.file_name().and_then(|b| b.to_str()) {
    info!("Reading {}...", bn);
  }
  let mut state: StructuralState = StructuralState::from_json_file(&args.state)?;
  if let Some(ref case) = args.case {
    state.case = case.clone();
  }
  info!(
    "Exporting case \"{}\": {} nodes, {} elements.",
    state.case,
    state.num_node,
    state.num_elem
  );
  let plot = BeamPlot::new(state, &options);
  plot.run()?;
  info!("Wrote {}.", plot.output_path().display());
  return Ok(());
}

fn main() {
  // init cli stuff
  let args = Cli::parse();
  let log_level = if args.verbose {
    LevelFilter::Debug
  } else {
    LevelFilter::Info
  };
  env_logger::builder().filter_level(log_level).init();
  if let Err(e) = run(&args) {
    error!("{}", e);
    std::process::exit(1);
  }
}
