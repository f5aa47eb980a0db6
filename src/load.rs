use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use log::debug;
use serde::Deserialize;

use crate::catalog::EntityGroup;
use crate::types::{year_offset, EntityTable, GroupTables, Variant, YearlyCounts, FIRST_YEAR, LAST_YEAR};

// One count file row, deserialized by position so header names never matter.
#[derive(Debug, Deserialize)]
struct CountRow(i32, u64);

fn count_file_path(data_dir: &Path, group: &EntityGroup, code: &str, variant: Variant) -> PathBuf {
    data_dir
        .join(group.subdir)
        .join(format!("{}{}.txt", code, variant.file_suffix()))
}

fn read_count_rows(path: &Path) -> Result<Vec<(i32, u64)>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Failed to open count file: {}", path.display()))?;

    let headers = reader
        .headers()
        .with_context(|| format!("Failed to read header of {}", path.display()))?;
    if headers.is_empty() {
        bail!("Empty count file: {}", path.display());
    }

    let mut rows = Vec::new();
    for row in reader.deserialize::<CountRow>() {
        let CountRow(year, count) =
            row.with_context(|| format!("Malformed row in {}", path.display()))?;
        rows.push((year, count));
    }
    rows.sort_by_key(|&(year, _)| year);
    Ok(rows)
}

/// Loads one entity's series for one variant, zero-filled over the fixed years.
pub fn load_series(
    data_dir: &Path,
    group: &EntityGroup,
    code: &str,
    variant: Variant,
) -> Result<YearlyCounts> {
    let path = count_file_path(data_dir, group, code, variant);
    let rows = read_count_rows(&path)?;

    let dropped = rows
        .iter()
        .filter(|&&(year, _)| year_offset(year).is_none())
        .count();
    if dropped > 0 {
        debug!(
            "{}: dropped {} row(s) outside {}-{}",
            path.display(),
            dropped,
            FIRST_YEAR,
            LAST_YEAR
        );
    }

    YearlyCounts::from_rows(&rows).with_context(|| format!("Bad count file: {}", path.display()))
}

fn load_table(data_dir: &Path, group: &EntityGroup, variant: Variant) -> Result<EntityTable> {
    let mut series = Vec::with_capacity(group.entities.len());
    for entity in group.entities {
        debug!(
            "Loading {} {} counts for {}",
            group.name,
            variant.describe(),
            entity.code
        );
        series.push(load_series(data_dir, group, entity.code, variant)?);
    }
    let codes = group.codes().map(str::to_owned).collect();
    Ok(EntityTable::new(codes, series))
}

/// Loads the three variant tables of a group in catalog entity order.
pub fn load_group(data_dir: &Path, group: &EntityGroup) -> Result<GroupTables> {
    Ok(GroupTables {
        total: load_table(data_dir, group, Variant::Total)?,
        open_access: load_table(data_dir, group, Variant::OpenAccess)?,
        with_availability: load_table(data_dir, group, Variant::OpenAccessAvailability)?,
    })
}
