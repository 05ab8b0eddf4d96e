use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use layerplan::exec::{ExecutionEngine, WasmStrategy};
use layerplan::manifest::PlanManifest;
use layerplan::{Config, FileSystemState, PlanManager};

#[derive(Parser)]
#[command(name = "layerplan", version, about = "Inspect and run layered filesystem plans")]
struct Cli {
    /// Configuration file (defaults to ./layerplan.toml when present)
    #[arg(long, global = true, env = "LAYERPLAN_CONFIG")]
    config: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the materialized filesystem of one or all plans
    Show {
        manifest: PathBuf,
        #[arg(long)]
        plan: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Show path changes between two plans
    Diff { manifest: PathBuf, from: String, to: String },
    /// Run a plan with the wasm strategy
    Run { manifest: PathBuf, plan: String },
    /// Every change touching a path across a plan's ancestry
    History { manifest: PathBuf, plan: String, path: String },
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "layerplan=info,warn".into());
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry.with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)).init();
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

fn load_manager(manifest: &Path, config: &Config) -> Result<PlanManager> {
    PlanManifest::from_path(manifest)?
        .build(config)
        .with_context(|| format!("failed to build plans from {}", manifest.display()))
}

fn print_state(name: &str, state: &FileSystemState) {
    println!(">>> Filesystem of plan '{}':", name);
    if state.is_empty() {
        println!("    (empty filesystem)");
    }
    for (path, content_id) in state {
        println!("    - {} (hash: {})", path, content_id);
    }
    println!();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Show { manifest, plan, json } => {
            let manager = load_manager(&manifest, &config)?;
            let names = match plan {
                Some(name) => vec![name],
                None => manager.list_plans()?.into_iter().map(|info| info.id).collect(),
            };

            for name in names {
                let state = manager.materialize(&name)?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&*state)?);
                } else {
                    print_state(&name, &state);
                }
            }
        }
        Command::Diff { manifest, from, to } => {
            let manager = load_manager(&manifest, &config)?;
            for change in manager.diff(&from, &to)? {
                match (&change.old, &change.new) {
                    (Some(old), Some(new)) => {
                        println!("{} {} ({} -> {})", change.kind, change.path, old, new)
                    }
                    (_, Some(content_id)) | (Some(content_id), None) => {
                        println!("{} {} ({})", change.kind, change.path, content_id)
                    }
                    (None, None) => println!("{} {}", change.kind, change.path),
                }
            }
        }
        Command::Run { manifest, plan } => {
            let manager = load_manager(&manifest, &config)?;
            let state = manager.materialize(&plan)?;

            let strategy = WasmStrategy::from_config(&config.execution);
            let engine = ExecutionEngine::with_strategy(Box::new(strategy));
            let report = engine.run(&plan, &state).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::History { manifest, plan, path } => {
            let manager = load_manager(&manifest, &config)?;
            for version in manager.file_history(&plan, &path)? {
                let content = version.record.new_content_id().unwrap_or("-");
                println!(
                    "{}/{}: {} {} ({})",
                    version.plan,
                    version.layer,
                    version.record.kind(),
                    version.record.path(),
                    content
                );
            }
            println!("current: {:?}", manager.lookup(&plan, &path)?);
        }
    }

    Ok(())
}
