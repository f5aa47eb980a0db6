use crate::types::{EntityTable, GroupTables, YearlyCounts, YEAR_COUNT};

/// Replaces each entity's series with its running sum over the year index.
pub fn cumulative_over_time(table: &EntityTable) -> EntityTable {
    table.map_series(YearlyCounts::cumulative)
}

/// Cumulative form of all three variant tables of a group.
pub fn cumulative_group(tables: &GroupTables) -> GroupTables {
    GroupTables {
        total: cumulative_over_time(&tables.total),
        open_access: cumulative_over_time(&tables.open_access),
        with_availability: cumulative_over_time(&tables.with_availability),
    }
}

/// Stacked prior-year baseline of a table: each series is shifted one year
/// later, summed cumulatively over time, then summed across entities, so row
/// `k` holds the combined depth of entities `0..=k` through the prior year.
pub fn stacking_accumulation(table: &EntityTable) -> EntityTable {
    let mut running = [0u64; YEAR_COUNT];
    let mut stacked = Vec::with_capacity(table.len());
    for series in table.series() {
        let shifted = series.shifted_one_year().cumulative();
        for (slot, value) in running.iter_mut().enumerate() {
            *value += shifted.values()[slot];
        }
        stacked.push(YearlyCounts::from_values(running));
    }
    EntityTable::new(table.codes().map(str::to_owned).collect(), stacked)
}

/// Share of open-access publications in percent, zero when `total` is empty.
pub fn open_access_percentage(total: &EntityTable, open_access: &EntityTable) -> f64 {
    let all = total.grand_total();
    if all > 0 {
        open_access.grand_total() as f64 / all as f64 * 100.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_table(entries: &[(&str, &[(i32, u64)])]) -> EntityTable {
        let codes = entries.iter().map(|(code, _)| (*code).to_owned()).collect();
        let series = entries
            .iter()
            .map(|(_, rows)| YearlyCounts::from_rows(rows).unwrap())
            .collect();
        EntityTable::new(codes, series)
    }

    fn series_for<'a>(table: &'a EntityTable, code: &str) -> &'a YearlyCounts {
        table
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, series)| series)
            .unwrap()
    }

    #[test]
    fn cumulative_series_never_decrease() {
        let table = make_table(&[
            ("A", &[(2011, 2), (2014, 1), (2022, 6)]),
            ("B", &[(2013, 9)]),
        ]);
        let cumulative = cumulative_over_time(&table);
        for (_, series) in cumulative.iter() {
            for pair in series.values().windows(2) {
                assert!(pair[1] >= pair[0]);
            }
        }
        assert_eq!(series_for(&cumulative, "A").values()[YEAR_COUNT - 1], 9);
        assert_eq!(series_for(&cumulative, "B").values()[YEAR_COUNT - 1], 9);
    }

    #[test]
    fn stacking_accumulation_sums_shifted_cumulatives_across_entities() {
        let table = make_table(&[
            ("A", &[(2011, 2), (2013, 1)]),
            ("B", &[(2012, 5), (2022, 3)]),
        ]);
        let stacked = stacking_accumulation(&table);

        for (k, (_, got)) in stacked.iter().enumerate() {
            for slot in 0..YEAR_COUNT {
                let expected: u64 = table.series()[..=k]
                    .iter()
                    .map(|s| s.shifted_one_year().cumulative().values()[slot])
                    .sum();
                assert_eq!(got.values()[slot], expected);
            }
        }

        // Final row, final year: everything on record except final-year counts.
        let last = stacked.series().last().unwrap();
        assert_eq!(last.values()[YEAR_COUNT - 1], 8);
    }

    #[test]
    fn open_access_share_is_a_guarded_percentage() {
        let total = make_table(&[("JH", &[(2015, 10)])]);
        let open = make_table(&[("JH", &[(2015, 4)])]);
        assert!((open_access_percentage(&total, &open) - 40.0).abs() < 1e-9);
        assert!((open_access_percentage(&total, &total) - 100.0).abs() < 1e-9);

        let none = make_table(&[("JH", &[])]);
        assert_eq!(open_access_percentage(&none, &none), 0.0);
    }

    #[test]
    fn entity_order_changes_stacking_but_not_per_entity_series() {
        let forward = make_table(&[("A", &[(2011, 2)]), ("B", &[(2012, 5)])]);
        let reversed = make_table(&[("B", &[(2012, 5)]), ("A", &[(2011, 2)])]);

        let cumulative_fwd = cumulative_over_time(&forward);
        let cumulative_rev = cumulative_over_time(&reversed);
        assert_eq!(series_for(&cumulative_fwd, "A"), series_for(&cumulative_rev, "A"));
        assert_eq!(series_for(&cumulative_fwd, "B"), series_for(&cumulative_rev, "B"));
        assert_eq!(cumulative_fwd.grand_total(), cumulative_rev.grand_total());

        // The running cross-entity sum depends on table order, so per-entity
        // stacked rows move while the topmost row stays the same.
        let stacked_fwd = stacking_accumulation(&forward);
        let stacked_rev = stacking_accumulation(&reversed);
        assert_ne!(series_for(&stacked_fwd, "A"), series_for(&stacked_rev, "A"));
        assert_eq!(
            stacked_fwd.series().last().unwrap(),
            stacked_rev.series().last().unwrap()
        );
    }
}
