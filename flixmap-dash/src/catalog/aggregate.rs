//! Country × year aggregation
//!
//! Produces the dense grid behind the map and timeline, the per-country
//! totals, and the exploded per-entry table behind the data table. All of it
//! is computed once at start-up and never mutated.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use super::{ContentType, CountryTotalStat, CountryYearStat, Entry, ExplodedEntry, YearRange};

/// Aggregated, read-only view of the catalogue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregates {
    pub year_range: YearRange,
    /// One row per (country, year); sorted by year, then country
    pub grid: Vec<CountryYearStat>,
    /// One row per country; sorted by country
    pub totals: Vec<CountryTotalStat>,
    /// One row per (entry, country), in source order
    pub exploded: Vec<ExplodedEntry>,
}

impl Aggregates {
    /// Grid rows for one year; empty outside the year range
    pub fn year_rows(&self, year: i32) -> &[CountryYearStat] {
        let start = self.grid.partition_point(|row| row.year < year);
        let end = self.grid.partition_point(|row| row.year <= year);
        &self.grid[start..end]
    }

    pub fn total(&self, country: &str) -> Option<&CountryTotalStat> {
        self.totals
            .binary_search_by(|t| t.country.as_str().cmp(country))
            .ok()
            .map(|i| &self.totals[i])
    }
}

/// Split a raw country list into trimmed, distinct, non-empty names
///
/// Order of first appearance is kept.
pub fn split_countries(raw: &str) -> Vec<String> {
    let mut seen = BTreeSet::new();
    raw.split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .filter(|c| seen.insert(*c))
        .map(str::to_string)
        .collect()
}

/// One row per (entry, country); entries without a country yield nothing
pub fn explode(entries: &[Arc<Entry>]) -> Vec<ExplodedEntry> {
    entries
        .iter()
        .flat_map(|entry| {
            let countries = entry
                .country
                .as_deref()
                .map(split_countries)
                .unwrap_or_default();
            countries.into_iter().map(move |country| ExplodedEntry {
                country,
                entry: Arc::clone(entry),
            })
        })
        .collect()
}

/// Build the dense grid, totals and exploded table
///
/// `countries` is the set of names with a boundary polygon; counts for any
/// other country are dropped from the grid. Every (country, year) pair in
/// `countries × year_range` gets exactly one row, zero-filled when nothing
/// matched.
pub fn aggregate(entries: &[Entry], countries: &[String], year_range: YearRange) -> Aggregates {
    let entries: Vec<Arc<Entry>> = entries.iter().cloned().map(Arc::new).collect();
    let exploded = explode(&entries);

    // (movies, shows) per (country, year)
    let mut counts: HashMap<(&str, i32), (u32, u32)> = HashMap::new();
    for row in &exploded {
        let cell = counts
            .entry((row.country.as_str(), row.entry.release_year))
            .or_default();
        match row.entry.content_type {
            ContentType::Movie => cell.0 += 1,
            ContentType::Show => cell.1 += 1,
        }
    }

    let known: BTreeSet<&str> = countries.iter().map(String::as_str).collect();

    let mut grid = Vec::with_capacity(known.len() * year_range.year_count());
    for year in year_range.years() {
        for country in &known {
            let (movies, shows) = counts.get(&(*country, year)).copied().unwrap_or_default();
            grid.push(CountryYearStat {
                country: country.to_string(),
                year,
                movies,
                shows,
                all: movies + shows,
            });
        }
    }

    let mut summed: BTreeMap<&str, (u32, u32)> =
        known.iter().map(|country| (*country, (0, 0))).collect();
    for row in &grid {
        if let Some(total) = summed.get_mut(row.country.as_str()) {
            total.0 += row.movies;
            total.1 += row.shows;
        }
    }
    let totals = summed
        .into_iter()
        .map(|(country, (movies, shows))| CountryTotalStat {
            country: country.to_string(),
            movies,
            shows,
            all: movies + shows,
        })
        .collect();

    Aggregates {
        year_range,
        grid,
        totals,
        exploded,
    }
}
