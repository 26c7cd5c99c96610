use alcgen::{configuration::DatasetConfiguration, create_dataset, manchester::to_manchester};
use alcgen_lib::api::{generate, RandomGuide};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::{io::Write, path::PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "alcgen", version, about = "Random ALC class expression generator")]
struct Opts {
  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Generate a single class expression and print it.
  Single {
    /// Nesting depth of the expression.
    depth: u32,

    /// Seed for the random guide; unseeded when absent.
    #[arg(long)]
    seed: Option<u64>,

    /// Make the expression unsatisfiable.
    #[arg(long)]
    close: bool,

    /// Collapse the symbols after generation.
    #[arg(long)]
    minimize: bool,

    /// JSON dataset configuration supplying the guide parameters.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Emit Manchester OWL syntax instead of the pretty rendering.
    #[arg(long)]
    manchester: bool,
  },

  /// Generate a dataset tree of OWL files.
  Dataset {
    /// Target directory for the `<depth>/<instance>/*.owl` layout.
    target: PathBuf,

    /// JSON dataset configuration; defaults apply when absent.
    #[arg(long)]
    config: Option<PathBuf>,
  },
}

fn load_configuration(path: Option<&PathBuf>) -> Result<DatasetConfiguration> {
  match path {
    Some(path) => DatasetConfiguration::from_path(path)
      .with_context(|| format!("loading configuration from {}", path.display())),
    None => Ok(DatasetConfiguration::default()),
  }
}

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .with_writer(std::io::stderr)
    .init();

  let opts = Opts::parse();
  match opts.command {
    Command::Single { depth, seed, close, minimize, config, manchester } => {
      let configuration = load_configuration(config.as_ref())?;
      let mut guide = RandomGuide::from_seed(
        seed,
        configuration.guide.clone().unwrap_or_default(),
        configuration.universal_guide.clone(),
      );
      let expression = generate(depth, &mut guide, close, minimize)?;
      let stdout = std::io::stdout();
      let mut out = stdout.lock();
      if manchester {
        to_manchester(&expression, &configuration.prefix, &mut out)?;
      } else {
        writeln!(out, "{expression}")?;
      }
    }
    Command::Dataset { target, config } => {
      let configuration = load_configuration(config.as_ref())?;
      create_dataset(&configuration, &target)?;
    }
  }
  Ok(())
}
