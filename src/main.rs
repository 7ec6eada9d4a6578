//! # Moonlight Application Entry Point
//!
//! This binary crate wires the phase calculator to a terminal front end: it parses
//! the command line, loads configuration, and prints either a text summary or JSON.


mod cli;
mod logging;

use std::path::Path;

use anyhow::{bail, Context};
use chrono::NaiveDate;
use clap::Parser;
use cli::{Cli, Command, InitConfigArgs, RangeArgs, ShowArgs};
use moonlight_lib::config::Config;
use moonlight_lib::lunar::{parse_calendar_date, LunarPhaseCalculator};
use moonlight_lib::timeline::Timeline;
use moonlight_lib::{renderer, MoonReading};
use tracing::info;

/// Resolve an optional date argument, defaulting to today.
fn resolve_date(
    text: Option<&str>,
    calculator: &LunarPhaseCalculator,
) -> anyhow::Result<NaiveDate> {
    match text {
        Some(text) => {
            parse_calendar_date(text).with_context(|| format!("bad date argument {text:?}"))
        }
        None => Ok(calculator.today()),
    }
}

fn show(args: ShowArgs, config: &Config, calculator: LunarPhaseCalculator) -> anyhow::Result<()> {
    let date = resolve_date(args.date.as_deref(), &calculator)?;
    let mut timeline = Timeline::new(calculator, date);

    if args.json {
        let reading = timeline.reading();
        println!("{}", serde_json::to_string_pretty(&reading)?);
        return Ok(());
    }

    // The text view is just another observer of the selected date
    let display = config.display.clone();
    timeline.subscribe(move |reading: &MoonReading| renderer::draw_ascii(reading, &display));
    timeline.select(date);
    Ok(())
}

fn range(args: RangeArgs, config: &Config, calculator: LunarPhaseCalculator) -> anyhow::Result<()> {
    let from = resolve_date(args.from.as_deref(), &calculator)?;
    let readings: Vec<MoonReading> = Timeline::new(calculator, from).readings(args.days).collect();
    info!(%from, days = readings.len(), "listing moon phases");

    if args.json {
        println!("{}", serde_json::to_string_pretty(&readings)?);
    } else {
        print!("{}", renderer::format_table(&readings, &config.display));
    }
    Ok(())
}

fn init_config(args: InitConfigArgs, default_path: &Path) -> anyhow::Result<()> {
    let path = args.path.as_deref().unwrap_or(default_path);
    if path.exists() && !args.force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    Config::default()
        .save_to_path(path)
        .with_context(|| format!("writing {}", path.display()))?;
    println!("Configuration written to {}", path.display());
    Ok(())
}

/// Load configuration and build the calculator it describes.
fn load(path: &Path) -> anyhow::Result<(Config, LunarPhaseCalculator)> {
    let config = Config::load_from_path(path);
    let calculator = config
        .calculator()
        .context("invalid [calendar] section in configuration")?;
    Ok((config, calculator))
}

/// Main application entry point.
fn main() -> anyhow::Result<()> {
    let Cli {
        verbose,
        config: config_path,
        command,
    } = Cli::parse();
    logging::init(verbose);

    match command {
        Command::InitConfig(args) => init_config(args, &config_path),
        Command::Show(args) => {
            let (config, calculator) = load(&config_path)?;
            show(args, &config, calculator)
        }
        Command::Range(args) => {
            let (config, calculator) = load(&config_path)?;
            range(args, &config, calculator)
        }
    }
}
