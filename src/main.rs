use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use devnotes::engine::Diagram;
use devnotes::render;
use devnotes::serialize;
use devnotes::store::GraphStore;

#[derive(Parser)]
#[command(name = "devnotes")]
#[command(about = "Hierarchical diagram engine for visually documenting codebases")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter diagram file
    New {
        /// Output path
        #[arg(short, long, default_value = "untitled.diagram.json")]
        out: PathBuf,
    },
    /// Print a diagram's containment tree and stats
    Show {
        /// Path to a .diagram.json file
        file: PathBuf,
    },
    /// Validate a diagram file without keeping it
    Check {
        /// Path to a .diagram.json file
        file: PathBuf,
    },
    /// Re-derive layout geometry and rewrite the file
    Layout {
        /// Path to a .diagram.json file
        file: PathBuf,

        /// Write here instead of rewriting in place
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "devnotes=info".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load(path: &Path) -> Result<(GraphStore, serialize::ImportReport)> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("could not read {}", path.display()))?;
    let mut store = GraphStore::new();
    let report = serialize::import(&mut store, &json)
        .with_context(|| format!("could not import {}", path.display()))?;
    Ok((store, report))
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::New { out } => {
            let diagram = Diagram::sample();
            let json = diagram.export_json()?;
            std::fs::write(&out, json)
                .with_context(|| format!("could not write {}", out.display()))?;
            println!("Wrote starter diagram to {}", out.display());
        }
        Commands::Show { file } => {
            let (store, report) = load(&file)?;
            if report.version_mismatch {
                eprintln!(
                    "warning: file version {} (expected {}), loaded anyway",
                    report.version,
                    serialize::FILE_VERSION
                );
            }
            print!("{}", render::render_tree(&store));
            let stats = store.stats();
            println!(
                "\n{} projects, {} components, {} files, {} functions, {} connections",
                stats.projects, stats.components, stats.files, stats.functions, stats.edges
            );
        }
        Commands::Check { file } => {
            let json = std::fs::read_to_string(&file)
                .with_context(|| format!("could not read {}", file.display()))?;
            let mut store = GraphStore::new();
            match serialize::import(&mut store, &json) {
                Ok(report) => {
                    if report.version_mismatch {
                        println!(
                            "{}: ok with warnings — file version {} (expected {})",
                            file.display(),
                            report.version,
                            serialize::FILE_VERSION
                        );
                    } else {
                        println!(
                            "{}: ok — {} nodes, {} edges",
                            file.display(),
                            report.nodes,
                            report.edges
                        );
                    }
                }
                Err(e) => bail!("{}: {e}", file.display()),
            }
        }
        Commands::Layout { file, out } => {
            // Import already runs the full layout pass; re-exporting
            // persists the derived geometry.
            let (store, _) = load(&file)?;
            let json = serialize::export_json(&store)?;
            let target = out.unwrap_or(file);
            std::fs::write(&target, json)
                .with_context(|| format!("could not write {}", target.display()))?;
            println!("Laid out {}", target.display());
        }
    }

    Ok(())
}
