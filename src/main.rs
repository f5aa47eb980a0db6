use std::fs::create_dir_all;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info, LevelFilter};
use simple_logger::SimpleLogger;
use time::macros::format_description;

mod aggregate;
mod catalog;
mod load;
mod render;
mod types;

use crate::aggregate::{cumulative_group, open_access_percentage, stacking_accumulation};
use crate::catalog::{JOURNALS, JOURNAL_PALETTE, MODELS, MODEL_PALETTE};
use crate::load::load_group;
use crate::render::{render_combined_figure, render_group_figure, GroupPanels};
use crate::types::{EntityTable, FIRST_YEAR, LAST_YEAR, YEAR_COUNT};

#[derive(Parser)]
#[command(name = "Open-Access Publication Trend Plotter")]
#[command(about = "Builds cumulative publication, open-access, and data-availability statistics for a fixed set of hydrology journals and soil-hydrology models, renders stacked-area trend figures, and prints the open-access shares.")]
#[command(version = "1.0.0")]
struct Cli {
    #[arg(short, long, default_value = "data", help = "Directory containing the per-entity yearly count files")]
    data_dir: String,

    #[arg(short, long, default_value = "figures", help = "Output directory for the rendered figures")]
    figures_dir: String,

    #[arg(short, long, default_value = "INFO", help = "Logging level (DEBUG, INFO, WARN, ERROR)")]
    log_level: String,
}

fn format_elapsed(elapsed: Duration) -> String {
    let total_secs = elapsed.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s {}ms", seconds, elapsed.subsec_millis())
    }
}

// Final slot of the last stacked row: the whole group through the prior year.
fn stacked_terminal(table: &EntityTable) -> u64 {
    table
        .series()
        .last()
        .map(|series| series.values()[YEAR_COUNT - 1])
        .unwrap_or(0)
}

fn main() -> Result<()> {
    let main_start_time = Instant::now();
    let cli = Cli::parse();

    let log_level = match cli.log_level.to_uppercase().as_str() {
        "DEBUG" => LevelFilter::Debug,
        "INFO" => LevelFilter::Info,
        "WARN" | "WARNING" => LevelFilter::Warn,
        "ERROR" => LevelFilter::Error,
        _ => {
            eprintln!("Invalid log level '{}', defaulting to INFO.", cli.log_level);
            LevelFilter::Info
        }
    };
    SimpleLogger::new()
        .with_level(log_level)
        .with_timestamp_format(format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second]"
        ))
        .init()?;

    info!("Starting Open-Access Publication Trend Plotter v{}", env!("CARGO_PKG_VERSION"));

    let data_dir = PathBuf::from(&cli.data_dir);
    let figures_dir = PathBuf::from(&cli.figures_dir);
    info!("Data directory: {}", data_dir.display());
    info!("Figures directory: {}", figures_dir.display());

    info!("--- Loading Count Files ---");
    let journal_tables =
        load_group(&data_dir, &JOURNALS).context("Failed to load journal count files")?;
    let model_tables =
        load_group(&data_dir, &MODELS).context("Failed to load model count files")?;
    info!(
        "Loaded {} journals and {} models over publication years {}-{}",
        JOURNALS.entities.len(),
        MODELS.entities.len(),
        FIRST_YEAR,
        LAST_YEAR
    );
    for (code, series) in journal_tables.total.iter() {
        debug!("  {}: {} publications on record", code, series.total());
    }
    for (code, series) in model_tables.total.iter() {
        debug!("  {}: {} publications on record", code, series.total());
    }

    let journal_cumulative = cumulative_group(&journal_tables);
    let model_cumulative = cumulative_group(&model_tables);

    let journal_baseline = stacking_accumulation(&journal_tables.total);
    let model_baseline = stacking_accumulation(&model_tables.total);
    info!(
        "Journal stacking baseline through {}: {} publications",
        LAST_YEAR - 1,
        stacked_terminal(&journal_baseline)
    );
    info!(
        "Model stacking baseline through {}: {} publications",
        LAST_YEAR - 1,
        stacked_terminal(&model_baseline)
    );

    info!("--- Rendering Figures ---");
    create_dir_all(&figures_dir)
        .with_context(|| format!("Failed to create figures directory: {}", figures_dir.display()))?;

    let journal_labels = JOURNALS.labels();
    let model_labels = MODELS.labels();
    let journal_panels = GroupPanels {
        cumulative: &journal_cumulative,
        labels: &journal_labels,
        palette: &JOURNAL_PALETTE,
    };
    let model_panels = GroupPanels {
        cumulative: &model_cumulative,
        labels: &model_labels,
        palette: &MODEL_PALETTE,
    };

    render_group_figure(&figures_dir.join("journals_.png"), &journal_panels)?;
    render_group_figure(&figures_dir.join("models_.png"), &model_panels)?;
    render_combined_figure(
        &figures_dir.join("journals_models.png"),
        &figures_dir.join("journals_models.svg"),
        &journal_panels,
        &model_panels,
    )?;

    let journal_pct = open_access_percentage(&journal_tables.total, &journal_tables.open_access);
    let model_pct = open_access_percentage(&model_tables.total, &model_tables.open_access);

    info!("-------------------- FINAL SUMMARY --------------------");
    info!(" Total execution time: {}", format_elapsed(main_start_time.elapsed()));
    info!(" Publication years covered: {}-{}", FIRST_YEAR, LAST_YEAR);
    info!(
        " Journals: {} publications, {} open-access, {} with availability statements",
        journal_tables.total.grand_total(),
        journal_tables.open_access.grand_total(),
        journal_tables.with_availability.grand_total()
    );
    info!(
        " Models: {} publications, {} open-access, {} with availability statements",
        model_tables.total.grand_total(),
        model_tables.open_access.grand_total(),
        model_tables.with_availability.grand_total()
    );
    info!(" Journal open-access share: {:.2}%", journal_pct);
    info!(" Model open-access share: {:.2}%", model_pct);
    info!(" Figures written to: {}", figures_dir.display());
    info!("--------------------------------------------------------");

    println!("Journals: {:.2} %", journal_pct);
    println!("Models: {:.2} %", model_pct);

    Ok(())
}
