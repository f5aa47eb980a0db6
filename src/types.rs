use anyhow::{bail, Result};

// Publication years covered by the report, one index slot per year.
pub const FIRST_YEAR: i32 = 2011;
pub const LAST_YEAR: i32 = 2022;
pub const YEAR_COUNT: usize = (LAST_YEAR - FIRST_YEAR + 1) as usize;

/// Calendar year plotted for slot `offset`: publications from year `y` count
/// toward the end of year `y - 1`, so the axis runs 2010 through 2021.
pub fn axis_year(offset: usize) -> i32 {
    FIRST_YEAR - 1 + offset as i32
}

pub fn year_offset(year: i32) -> Option<usize> {
    if (FIRST_YEAR..=LAST_YEAR).contains(&year) {
        Some((year - FIRST_YEAR) as usize)
    } else {
        None
    }
}

/// The three count files tracked for every journal and model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Total,
    OpenAccess,
    OpenAccessAvailability,
}

impl Variant {
    pub fn file_suffix(self) -> &'static str {
        match self {
            Variant::Total => "",
            Variant::OpenAccess => "_open-access",
            Variant::OpenAccessAvailability => "_open-access_availability",
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            Variant::Total => "total",
            Variant::OpenAccess => "open-access",
            Variant::OpenAccessAvailability => "open-access + availability",
        }
    }
}

/// Publication counts for one entity over the fixed annual index: exactly one
/// value per year, zero where the source file had no row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearlyCounts([u64; YEAR_COUNT]);

impl YearlyCounts {
    /// Builds a series from `(year, count)` rows. Out-of-index years are
    /// skipped; a repeated in-range year is an error.
    pub fn from_rows(rows: &[(i32, u64)]) -> Result<Self> {
        let mut values = [0u64; YEAR_COUNT];
        let mut seen = [false; YEAR_COUNT];
        for &(year, count) in rows {
            let slot = match year_offset(year) {
                Some(slot) => slot,
                None => continue,
            };
            if seen[slot] {
                bail!("duplicate row for year {}", year);
            }
            seen[slot] = true;
            values[slot] = count;
        }
        Ok(YearlyCounts(values))
    }

    pub fn from_values(values: [u64; YEAR_COUNT]) -> Self {
        YearlyCounts(values)
    }

    pub fn values(&self) -> &[u64; YEAR_COUNT] {
        &self.0
    }

    pub fn total(&self) -> u64 {
        self.0.iter().sum()
    }

    /// Running sum from the first year through each year.
    pub fn cumulative(&self) -> YearlyCounts {
        let mut values = [0u64; YEAR_COUNT];
        let mut acc = 0u64;
        for (slot, &count) in self.0.iter().enumerate() {
            acc += count;
            values[slot] = acc;
        }
        YearlyCounts(values)
    }

    /// The series moved one slot later: the first year becomes zero and the
    /// final year's count falls off the end.
    pub fn shifted_one_year(&self) -> YearlyCounts {
        let mut values = [0u64; YEAR_COUNT];
        values[1..].copy_from_slice(&self.0[..YEAR_COUNT - 1]);
        YearlyCounts(values)
    }
}

/// One variant's series for every entity of a group. Entity order controls
/// stacking in the figures and must match across the group's variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityTable {
    codes: Vec<String>,
    series: Vec<YearlyCounts>,
}

impl EntityTable {
    pub fn new(codes: Vec<String>, series: Vec<YearlyCounts>) -> Self {
        assert_eq!(codes.len(), series.len(), "one series per entity");
        EntityTable { codes, series }
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.codes.iter().map(String::as_str)
    }

    pub fn series(&self) -> &[YearlyCounts] {
        &self.series
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &YearlyCounts)> {
        self.codes.iter().map(String::as_str).zip(self.series.iter())
    }

    pub fn grand_total(&self) -> u64 {
        self.series.iter().map(YearlyCounts::total).sum()
    }

    pub fn map_series<F>(&self, f: F) -> EntityTable
    where
        F: Fn(&YearlyCounts) -> YearlyCounts,
    {
        EntityTable {
            codes: self.codes.clone(),
            series: self.series.iter().map(f).collect(),
        }
    }
}

/// The three variant tables of one group, in identical entity order.
#[derive(Debug, Clone)]
pub struct GroupTables {
    pub total: EntityTable,
    pub open_access: EntityTable,
    pub with_availability: EntityTable,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(series: &YearlyCounts, year: i32) -> u64 {
        series.values()[year_offset(year).unwrap()]
    }

    #[test]
    fn index_covers_twelve_years() {
        assert_eq!(YEAR_COUNT, 12);
        assert_eq!(year_offset(FIRST_YEAR), Some(0));
        assert_eq!(year_offset(LAST_YEAR), Some(YEAR_COUNT - 1));
        assert_eq!(year_offset(2010), None);
        assert_eq!(year_offset(2023), None);
        assert_eq!(axis_year(0), 2010);
        assert_eq!(axis_year(YEAR_COUNT - 1), 2021);
    }

    #[test]
    fn from_rows_zero_fills_missing_years() {
        let series = YearlyCounts::from_rows(&[(2015, 10)]).unwrap();
        for year in FIRST_YEAR..=LAST_YEAR {
            let expected = if year == 2015 { 10 } else { 0 };
            assert_eq!(at(&series, year), expected);
        }
        assert_eq!(series.total(), 10);
    }

    #[test]
    fn from_rows_skips_years_outside_the_index() {
        let series = YearlyCounts::from_rows(&[(2009, 7), (2023, 3), (2011, 1)]).unwrap();
        assert_eq!(series.total(), 1);
        assert_eq!(at(&series, 2011), 1);
    }

    #[test]
    fn from_rows_rejects_duplicate_years() {
        let err = YearlyCounts::from_rows(&[(2015, 1), (2015, 2)]).unwrap_err();
        assert!(err.to_string().contains("2015"));
    }

    #[test]
    fn cumulative_is_monotonic_and_ends_at_the_total() {
        let series = YearlyCounts::from_rows(&[(2011, 3), (2013, 2), (2022, 5)]).unwrap();
        let cumulative = series.cumulative();
        for pair in cumulative.values().windows(2) {
            assert!(pair[1] >= pair[0]);
        }
        assert_eq!(at(&cumulative, 2011), 3);
        assert_eq!(at(&cumulative, 2012), 3);
        assert_eq!(at(&cumulative, 2013), 5);
        assert_eq!(at(&cumulative, LAST_YEAR), series.total());
    }

    #[test]
    fn shift_moves_counts_one_year_later() {
        let series = YearlyCounts::from_rows(&[(2011, 4), (2022, 9)]).unwrap();
        let shifted = series.shifted_one_year();
        assert_eq!(at(&shifted, 2011), 0);
        assert_eq!(at(&shifted, 2012), 4);
        // The final year's count has no later slot to land in.
        assert_eq!(shifted.total(), 4);
    }

    #[test]
    fn variant_suffixes_match_the_file_scheme() {
        assert_eq!(Variant::Total.file_suffix(), "");
        assert_eq!(Variant::OpenAccess.file_suffix(), "_open-access");
        assert_eq!(
            Variant::OpenAccessAvailability.file_suffix(),
            "_open-access_availability"
        );
    }

    #[test]
    fn table_preserves_entity_order() {
        let table = EntityTable::new(
            vec!["B".into(), "A".into()],
            vec![
                YearlyCounts::from_rows(&[(2011, 1)]).unwrap(),
                YearlyCounts::from_rows(&[(2012, 2)]).unwrap(),
            ],
        );
        let codes: Vec<&str> = table.codes().collect();
        assert_eq!(codes, ["B", "A"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.grand_total(), 3);
    }
}
