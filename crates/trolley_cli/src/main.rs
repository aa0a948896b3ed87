//! Trolley CLI
//!
//! Headless driver for the simulation engine: plays scripted runs and
//! scores recorded decision logs from the terminal.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use trolley_core::{
    analyse_records, default_campaign, EngineConfig, Lane, Level, LevelSequencer,
    SequenceEndPolicy,
};

#[derive(Parser)]
#[command(name = "trolley_cli")]
#[command(about = "Drive scripted trolley runs and score decision logs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a scripted run and print the verdict
    Run {
        /// Levels as top:bottom pairs, e.g. "1:5,5:1,3:3" (default campaign
        /// when omitted)
        #[arg(long)]
        levels: Option<String>,

        /// One choice per level: T, B, or - to leave it to fate
        #[arg(long)]
        choices: Option<String>,

        /// RNG seed for fate-decided rounds
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Wrap around the level sequence instead of halting
        #[arg(long, default_value = "false")]
        endless: bool,

        /// Emit the full run as JSON instead of text
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Score a recorded decision log (JSON array)
    Analyse {
        /// Input JSON file path
        #[arg(long)]
        r#in: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            levels,
            choices,
            seed,
            endless,
            json,
        } => run_scripted(levels, choices, seed, endless, json),
        Commands::Analyse { r#in } => analyse_file(&r#in),
    }
}

fn run_scripted(
    levels: Option<String>,
    choices: Option<String>,
    seed: u64,
    endless: bool,
    json: bool,
) -> Result<()> {
    let levels = match levels {
        Some(spec) => parse_levels(&spec)?,
        None => default_campaign(),
    };
    let choices = match choices {
        Some(spec) => parse_choices(&spec)?,
        None => vec![None; levels.len()],
    };
    if choices.len() != levels.len() {
        bail!(
            "expected {} choices, got {}",
            levels.len(),
            choices.len()
        );
    }

    let mut config = EngineConfig::default();
    if endless {
        config.sequence_end = SequenceEndPolicy::Wrap;
    }
    let round_count = levels.len();
    let mut sequencer = LevelSequencer::new(config, levels, seed)?;

    for choice in choices.into_iter().take(round_count) {
        let Some(summary) = sequencer.play_round(choice) else {
            break;
        };
        if !json {
            println!(
                "Level {}: chose {} ({:?}) - struck {}, spared {}",
                summary.level_index + 1,
                summary.choice.tag(),
                summary.realized_lane,
                summary.struck,
                summary.spared
            );
        }
    }

    let report = analyse_records(sequencer.run_log());
    if json {
        let output = serde_json::json!({
            "decisions": sequencer.run_log().records(),
            "rounds": sequencer.rounds(),
            "report": report,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!();
        println!("{}", report.summary);
        println!(
            "lives lost: {}, potential saved: {}, agency: {:.2}, compassion: {:.2}",
            report.lives_lost, report.potential_saved, report.agency, report.compassion
        );
    }
    Ok(())
}

fn analyse_file(path: &PathBuf) -> Result<()> {
    let input = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let output = trolley_core::analyse_run_json(&input)?;
    let pretty: serde_json::Value = serde_json::from_str(&output)?;
    println!("{}", serde_json::to_string_pretty(&pretty)?);
    Ok(())
}

/// Parse "1:5,5:1" into levels.
fn parse_levels(spec: &str) -> Result<Vec<Level>> {
    spec.split(',')
        .map(|pair| {
            let (top, bottom) = pair
                .split_once(':')
                .with_context(|| format!("level '{pair}' is not top:bottom"))?;
            let top: i64 = top.trim().parse().context("top count")?;
            let bottom: i64 = bottom.trim().parse().context("bottom count")?;
            Ok(Level::from_signed(top, bottom)?)
        })
        .collect()
}

/// Parse "T,B,-" into per-level choices.
fn parse_choices(spec: &str) -> Result<Vec<Option<Lane>>> {
    spec.split(',')
        .map(|tag| match tag.trim() {
            "T" | "t" => Ok(Some(Lane::Top)),
            "B" | "b" => Ok(Some(Lane::Bottom)),
            "-" | "" => Ok(None),
            other => bail!("unknown choice '{other}' (expected T, B or -)"),
        })
        .collect()
}
