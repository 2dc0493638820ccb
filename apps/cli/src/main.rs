// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! floorplan-scene: turn floor plan detector output into 3D viewer assets.
//!
//! # Commands
//!
//! - `convert <DETECTIONS>` - classify, project and write the four category files
//! - `legacy-walls <WALLS_JSON>` - rewrite start/end wall segments as x1/y1/x2/y2
//! - `labels` - print the effective class id to label table
//!
//! Defaults come from `FLOORPLAN_*` environment variables (see [`config`]);
//! logging is controlled with `RUST_LOG`.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use floorplan_lite_scene::{
    adapt_walls_file, convert, default_min_confidence, filter_by_confidence, retain_labels,
    ConvertOptions, DetectionSource, JsonDetections, LabelTable, Profile, SceneOptions,
    UnmatchedPolicy,
};
use std::path::{Path, PathBuf};

mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "floorplan-scene")]
#[command(about = "Convert floor plan detections into JSON assets for the 3D viewer")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert a detector export into walls/doors/windows/furniture JSON
    Convert(ConvertArgs),

    /// Convert a legacy start/end walls.json into public/walls.json
    LegacyWalls {
        /// Legacy walls.json file
        input: PathBuf,
    },

    /// Print the class id to label table
    Labels {
        /// Label table JSON file (defaults to the built-in detector labels)
        #[arg(long)]
        labels: Option<PathBuf>,
    },
}

#[derive(clap::Args)]
struct ConvertArgs {
    /// Detector export: JSON array of {class_id, confidence, box}
    detections: PathBuf,

    /// Output directory for the category files
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output profile
    #[arg(short, long, value_enum)]
    profile: Option<ProfileArg>,

    /// Extrusion height written by the scene profile
    #[arg(long)]
    fixed_height: Option<u32>,

    /// What the scene profile does with labels matching no category
    #[arg(long, value_enum, default_value = "furniture")]
    unmatched: UnmatchedArg,

    /// Label table JSON file, e.g. {"7": "Wall"}
    #[arg(long)]
    labels: Option<PathBuf>,

    /// Drop detections below this confidence (default: 0.3 flat, 0.25 scene)
    #[arg(long)]
    min_confidence: Option<f32>,

    /// Only keep detections with these labels (comma-separated)
    #[arg(long, value_delimiter = ',')]
    select: Vec<String>,

    /// Print a status report to stdout (`json`, or `csv` for per-label counts)
    #[arg(long, value_enum, num_args = 0..=1, default_missing_value = "json")]
    report: Option<ReportFormat>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Json,
    Csv,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ProfileArg {
    Flat,
    Scene,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum UnmatchedArg {
    Furniture,
    Drop,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,floorplan_lite_scene=debug".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    if let Err(e) = run(cli.command, &config) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(command: Command, config: &Config) -> Result<()> {
    match command {
        Command::Convert(args) => run_convert(args, config),
        Command::LegacyWalls { input } => {
            let output = adapt_walls_file(&input)
                .with_context(|| format!("converting legacy walls from {}", input.display()))?;
            println!("Converted walls saved to {}", output.display());
            Ok(())
        }
        Command::Labels { labels } => {
            let table = load_labels(labels.as_deref().or(config.labels.as_deref()))?;
            for (id, label) in table.entries() {
                println!("{:>3}  {}", id, label);
            }
            Ok(())
        }
    }
}

fn run_convert(args: ConvertArgs, config: &Config) -> Result<()> {
    let profile = resolve_profile(&args, config)?;
    let label_table = load_labels(args.labels.as_deref().or(config.labels.as_deref()))?;
    let output_dir = args.output_dir.unwrap_or_else(|| config.output_dir.clone());

    let source = JsonDetections::new(&args.detections);
    let mut detections = source
        .detections()
        .with_context(|| format!("loading detections from {}", args.detections.display()))?;

    let min_confidence = args
        .min_confidence
        .unwrap_or_else(|| default_min_confidence(&profile));
    detections = filter_by_confidence(detections, min_confidence);
    if !args.select.is_empty() {
        detections = retain_labels(detections, &label_table, args.select.as_slice());
    }

    tracing::info!(
        input = %args.detections.display(),
        profile = profile.name(),
        min_confidence,
        detections = detections.len(),
        "Converting detections"
    );

    let options = ConvertOptions {
        label_table,
        profile,
        output_dir,
    };
    let report = convert(&detections, &options)
        .with_context(|| format!("writing viewer files to {}", options.output_dir.display()))?;

    match args.report {
        Some(ReportFormat::Json) => {
            let status = serde_json::json!({
                "status": "success",
                "message": "Detection complete. Viewer updated.",
                "categories": report.populated(),
                "report": report,
            });
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
        Some(ReportFormat::Csv) => print!("{}", report.labels_csv()),
        None => {}
    }
    Ok(())
}

fn resolve_profile(args: &ConvertArgs, config: &Config) -> Result<Profile> {
    let kind = match args.profile {
        Some(kind) => kind,
        None => match ProfileArg::from_str(&config.profile, true) {
            Ok(kind) => kind,
            Err(_) => bail!(
                "FLOORPLAN_PROFILE must be 'flat' or 'scene', got '{}'",
                config.profile
            ),
        },
    };

    Ok(match kind {
        ProfileArg::Flat => Profile::Flat,
        ProfileArg::Scene => Profile::Scene(SceneOptions {
            fixed_height: args.fixed_height.unwrap_or(config.fixed_height),
            unmatched: match args.unmatched {
                UnmatchedArg::Furniture => UnmatchedPolicy::Furniture,
                UnmatchedArg::Drop => UnmatchedPolicy::Drop,
            },
        }),
    })
}

fn load_labels(path: Option<&Path>) -> Result<LabelTable> {
    match path {
        Some(path) => LabelTable::from_json_file(path)
            .with_context(|| format!("loading label table from {}", path.display())),
        None => Ok(LabelTable::floor_plan()),
    }
}
