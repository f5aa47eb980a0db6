use std::path::Path;

use anyhow::{Context, Result};
use log::info;
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::types::{axis_year, EntityTable, GroupTables, YEAR_COUNT};

const DPI: f64 = 250.0;
const GROUP_FIGURE_INCHES: (f64, f64) = (5.0, 6.0);
const COMBINED_FIGURE_INCHES: (f64, f64) = (6.0, 6.0);
const FILL_ALPHA: f64 = 0.8;
const COMBINED_MODEL_FILL_ALPHA: f64 = 0.9;
const TICK_FONT: i32 = 26;
const AXIS_FONT: i32 = 30;
const LEGEND_FONT: i32 = 24;
const X_DESC: &str = "Year of publication";
const Y_DESC_TOTAL: &str = "# Publications";
const Y_DESC_OPEN_ACCESS: &str = "# Open-access publications";
const Y_DESC_AVAILABILITY: &str = "# Open-access + availability";

/// One group's render inputs: cumulative variant tables plus display metadata.
pub struct GroupPanels<'a> {
    pub cumulative: &'a GroupTables,
    pub labels: &'a [&'a str],
    pub palette: &'a [RGBColor],
}

fn px(inches: f64) -> u32 {
    (inches * DPI).round() as u32
}

// Lower and upper stack boundaries per entity, bottom entity first.
fn stack_bands(table: &EntityTable) -> Vec<(Vec<f64>, Vec<f64>)> {
    let mut lower = vec![0.0; YEAR_COUNT];
    let mut bands = Vec::with_capacity(table.len());
    for series in table.series() {
        let upper: Vec<f64> = lower
            .iter()
            .zip(series.values())
            .map(|(low, &value)| low + value as f64)
            .collect();
        bands.push((lower, upper.clone()));
        lower = upper;
    }
    bands
}

// 5% headroom above the tallest stack, floored at one for all-zero tables.
fn y_ceiling(table: &EntityTable) -> f64 {
    let tallest = (0..YEAR_COUNT)
        .map(|slot| {
            table
                .series()
                .iter()
                .map(|series| series.values()[slot])
                .sum::<u64>()
        })
        .max()
        .unwrap_or(0);
    (tallest as f64 * 1.05).max(1.0)
}

struct PanelOptions<'a> {
    table: &'a EntityTable,
    labels: &'a [&'a str],
    palette: &'a [RGBColor],
    alpha: f64,
    y_desc: &'a str,
    x_desc: Option<&'a str>,
    show_x_ticks: bool,
    legend: bool,
}

fn draw_stacked_panel<DB>(area: &DrawingArea<DB, Shift>, opts: &PanelOptions) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    if opts.table.is_empty() {
        return Ok(());
    }

    let x_start = axis_year(0) as f64;
    let x_end = axis_year(YEAR_COUNT - 1) as f64;
    let x_area = if !opts.show_x_ticks {
        0
    } else if opts.x_desc.is_some() {
        80
    } else {
        45
    };

    let mut chart = ChartBuilder::on(area)
        .margin(6)
        .x_label_area_size(x_area)
        .y_label_area_size(110)
        .build_cartesian_2d(x_start..x_end, 0f64..y_ceiling(opts.table))?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(6)
        .y_labels(5)
        .label_style(("sans-serif", TICK_FONT))
        .axis_desc_style(("sans-serif", AXIS_FONT))
        .x_label_formatter(&|year| (*year as i32).to_string())
        .y_label_formatter(&|count| (*count as u64).to_string())
        .x_desc(opts.x_desc.unwrap_or(""))
        .y_desc(opts.y_desc)
        .draw()?;

    // Drawn top band first so the legend lists the top of the stack first;
    // the bands are disjoint, so draw order does not change the picture.
    let bands = stack_bands(opts.table);
    for (idx, (lower, upper)) in bands.iter().enumerate().rev() {
        let color = opts.palette[idx % opts.palette.len()].mix(opts.alpha);
        let mut points: Vec<(f64, f64)> = Vec::with_capacity(2 * YEAR_COUNT);
        for (slot, &y) in lower.iter().enumerate() {
            points.push((axis_year(slot) as f64, y));
        }
        for (slot, &y) in upper.iter().enumerate().rev() {
            points.push((axis_year(slot) as f64, y));
        }

        let band = chart.draw_series(std::iter::once(Polygon::new(points, color.filled())))?;
        if opts.legend {
            band.label(opts.labels[idx]).legend(move |(x, y)| {
                Rectangle::new([(x, y - 8), (x + 20, y + 8)], color.filled())
            });
        }
    }

    if opts.legend {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .border_style(&TRANSPARENT)
            .background_style(&TRANSPARENT)
            .label_font(("sans-serif", LEGEND_FONT))
            .draw()?;
    }
    Ok(())
}

// Standalone legend for the combined figure's spare cell.
fn draw_legend_cell<DB>(
    area: &DrawingArea<DB, Shift>,
    labels: &[&str],
    palette: &[RGBColor],
    alpha: f64,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let line_height = LEGEND_FONT + 12;
    let style = ("sans-serif", LEGEND_FONT).into_font().color(&BLACK);
    // Top of the stack first, matching the in-panel legends.
    for (row, idx) in (0..labels.len()).rev().enumerate() {
        let y = 12 + row as i32 * line_height;
        let color = palette[idx % palette.len()].mix(alpha);
        area.draw(&Rectangle::new([(16, y), (36, y + 16)], color.filled()))?;
        area.draw(&Text::new(labels[idx].to_string(), (44, y - 2), style.clone()))?;
    }
    Ok(())
}

/// Renders one group's standalone figure: three stacked panels over a shared
/// x axis, legend in the bottom panel.
pub fn render_group_figure(path: &Path, group: &GroupPanels) -> Result<()> {
    let size = (px(GROUP_FIGURE_INCHES.0), px(GROUP_FIGURE_INCHES.1));
    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)
        .with_context(|| format!("Failed to initialize figure: {}", path.display()))?;

    let panels = root.split_evenly((3, 1));
    draw_stacked_panel(
        &panels[0],
        &PanelOptions {
            table: &group.cumulative.total,
            labels: group.labels,
            palette: group.palette,
            alpha: FILL_ALPHA,
            y_desc: Y_DESC_TOTAL,
            x_desc: None,
            show_x_ticks: false,
            legend: false,
        },
    )?;
    draw_stacked_panel(
        &panels[1],
        &PanelOptions {
            table: &group.cumulative.open_access,
            labels: group.labels,
            palette: group.palette,
            alpha: FILL_ALPHA,
            y_desc: Y_DESC_OPEN_ACCESS,
            x_desc: None,
            show_x_ticks: false,
            legend: false,
        },
    )?;
    draw_stacked_panel(
        &panels[2],
        &PanelOptions {
            table: &group.cumulative.with_availability,
            labels: group.labels,
            palette: group.palette,
            alpha: FILL_ALPHA,
            y_desc: Y_DESC_AVAILABILITY,
            x_desc: Some(X_DESC),
            show_x_ticks: true,
            legend: true,
        },
    )?;

    root.present()
        .with_context(|| format!("Failed to write figure: {}", path.display()))?;
    info!("Figure written: {}", path.display());
    Ok(())
}

fn draw_combined<DB>(
    root: &DrawingArea<DB, Shift>,
    journals: &GroupPanels,
    models: &GroupPanels,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;
    // Row-major 3x2 grid: journals in the left column with their legend in
    // the spare bottom-left cell, models in the right column.
    let cells = root.split_evenly((3, 2));

    draw_stacked_panel(
        &cells[0],
        &PanelOptions {
            table: &journals.cumulative.total,
            labels: journals.labels,
            palette: journals.palette,
            alpha: FILL_ALPHA,
            y_desc: Y_DESC_TOTAL,
            x_desc: None,
            show_x_ticks: true,
            legend: false,
        },
    )?;
    draw_stacked_panel(
        &cells[2],
        &PanelOptions {
            table: &journals.cumulative.open_access,
            labels: journals.labels,
            palette: journals.palette,
            alpha: FILL_ALPHA,
            y_desc: Y_DESC_OPEN_ACCESS,
            x_desc: Some(X_DESC),
            show_x_ticks: true,
            legend: false,
        },
    )?;
    draw_legend_cell(&cells[4], journals.labels, journals.palette, FILL_ALPHA)?;

    draw_stacked_panel(
        &cells[1],
        &PanelOptions {
            table: &models.cumulative.total,
            labels: models.labels,
            palette: models.palette,
            alpha: COMBINED_MODEL_FILL_ALPHA,
            y_desc: "",
            x_desc: None,
            show_x_ticks: true,
            legend: false,
        },
    )?;
    draw_stacked_panel(
        &cells[3],
        &PanelOptions {
            table: &models.cumulative.open_access,
            labels: models.labels,
            palette: models.palette,
            alpha: COMBINED_MODEL_FILL_ALPHA,
            y_desc: "",
            x_desc: None,
            show_x_ticks: true,
            legend: false,
        },
    )?;
    draw_stacked_panel(
        &cells[5],
        &PanelOptions {
            table: &models.cumulative.with_availability,
            labels: models.labels,
            palette: models.palette,
            alpha: COMBINED_MODEL_FILL_ALPHA,
            y_desc: Y_DESC_AVAILABILITY,
            x_desc: Some(X_DESC),
            show_x_ticks: true,
            legend: true,
        },
    )?;
    Ok(())
}

/// Renders the combined journals-and-models figure as both a PNG and an SVG.
pub fn render_combined_figure(
    png_path: &Path,
    svg_path: &Path,
    journals: &GroupPanels,
    models: &GroupPanels,
) -> Result<()> {
    let size = (px(COMBINED_FIGURE_INCHES.0), px(COMBINED_FIGURE_INCHES.1));

    {
        let root = BitMapBackend::new(png_path, size).into_drawing_area();
        draw_combined(&root, journals, models)
            .with_context(|| format!("Failed to draw figure: {}", png_path.display()))?;
        root.present()
            .with_context(|| format!("Failed to write figure: {}", png_path.display()))?;
    }
    info!("Figure written: {}", png_path.display());

    {
        let root = SVGBackend::new(svg_path, size).into_drawing_area();
        draw_combined(&root, journals, models)
            .with_context(|| format!("Failed to draw figure: {}", svg_path.display()))?;
        root.present()
            .with_context(|| format!("Failed to write figure: {}", svg_path.display()))?;
    }
    info!("Figure written: {}", svg_path.display());
    Ok(())
}
