//! Catalogue data model, loading and aggregation

use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub mod aggregate;
pub mod load;

pub use aggregate::{aggregate, explode, split_countries, Aggregates};
pub use load::{load_boundaries, load_catalog, read_boundaries, read_catalog, Boundaries};

/// Kind of catalogue entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentType {
    #[serde(rename = "Movie")]
    Movie,
    #[serde(rename = "TV Show")]
    Show,
}

impl ContentType {
    /// Parse the `type` column value
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "Movie" => Some(Self::Movie),
            "TV Show" => Some(Self::Show),
            _ => None,
        }
    }

    /// Label as written in the source file
    pub fn label(&self) -> &'static str {
        match self {
            Self::Movie => "Movie",
            Self::Show => "TV Show",
        }
    }
}

/// One content item from the catalogue file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub title: String,
    pub content_type: ContentType,
    /// Raw comma-separated country list
    pub country: Option<String>,
    pub release_year: i32,
    pub rating: Option<String>,
    /// Raw comma-separated genre list (`listed_in`)
    pub listed_in: String,
    pub director: Option<String>,
}

/// One (entry, single country) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplodedEntry {
    /// Trimmed country name
    pub country: String,
    pub entry: Arc<Entry>,
}

/// Content-type selection used by the map metric and the table filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ContentFilter {
    Movies,
    Shows,
    #[default]
    All,
}

impl ContentFilter {
    pub const OPTIONS: [ContentFilter; 3] = [Self::Movies, Self::Shows, Self::All];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Movies => "Movies",
            Self::Shows => "Shows",
            Self::All => "All",
        }
    }

    /// Whether an entry of this type passes the filter
    pub fn matches(&self, content_type: ContentType) -> bool {
        match self {
            Self::Movies => content_type == ContentType::Movie,
            Self::Shows => content_type == ContentType::Show,
            Self::All => true,
        }
    }

    /// The grid column this filter selects
    pub fn metric(&self, stat: &CountryYearStat) -> u32 {
        match self {
            Self::Movies => stat.movies,
            Self::Shows => stat.shows,
            Self::All => stat.all,
        }
    }
}

/// Color-scale mode for the map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ScaleMode {
    #[serde(alias = "fixed", alias = "fix")]
    Fix,
    #[default]
    #[serde(alias = "auto")]
    Auto,
}

impl ScaleMode {
    pub const OPTIONS: [ScaleMode; 2] = [Self::Fix, Self::Auto];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Fix => "Fix",
            Self::Auto => "Auto",
        }
    }
}

/// Counts for one (country, year) cell of the grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryYearStat {
    pub country: String,
    pub year: i32,
    pub movies: u32,
    pub shows: u32,
    pub all: u32,
}

/// Counts for one country summed over every year
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryTotalStat {
    pub country: String,
    pub movies: u32,
    pub shows: u32,
    pub all: u32,
}

/// Closed interval of release years
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearRange {
    pub min: i32,
    pub max: i32,
}

impl YearRange {
    /// Returns `None` when `min > max`
    pub fn new(min: i32, max: i32) -> Option<Self> {
        (min <= max).then_some(Self { min, max })
    }

    /// Smallest range covering every entry's release year
    pub fn spanning(entries: &[Entry]) -> Option<Self> {
        let min = entries.iter().map(|e| e.release_year).min()?;
        let max = entries.iter().map(|e| e.release_year).max()?;
        Some(Self { min, max })
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.min..=self.max).contains(&year)
    }

    pub fn years(&self) -> impl Iterator<Item = i32> {
        self.min..=self.max
    }

    /// Number of years in the range (always at least one)
    pub fn year_count(&self) -> usize {
        let span = i64::from(self.max) - i64::from(self.min);
        usize::try_from(span + 1).unwrap_or(usize::MAX)
    }

    /// Slider marks: every tenth year from `min`, excluding `max`
    pub fn marks(&self) -> Vec<i32> {
        (self.min..self.max).step_by(10).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_parse() {
        assert_eq!(ContentType::parse("Movie"), Some(ContentType::Movie));
        assert_eq!(ContentType::parse(" TV Show "), Some(ContentType::Show));
        assert_eq!(ContentType::parse("Podcast"), None);
    }

    #[test]
    fn test_content_filter_matches() {
        assert!(ContentFilter::Movies.matches(ContentType::Movie));
        assert!(!ContentFilter::Movies.matches(ContentType::Show));
        assert!(ContentFilter::Shows.matches(ContentType::Show));
        assert!(ContentFilter::All.matches(ContentType::Movie));
        assert!(ContentFilter::All.matches(ContentType::Show));
    }

    #[test]
    fn test_scale_mode_aliases() {
        let fixed: ScaleMode = serde_json::from_str("\"fixed\"").unwrap();
        let fix: ScaleMode = serde_json::from_str("\"Fix\"").unwrap();
        let auto: ScaleMode = serde_json::from_str("\"auto\"").unwrap();
        assert_eq!(fixed, ScaleMode::Fix);
        assert_eq!(fix, ScaleMode::Fix);
        assert_eq!(auto, ScaleMode::Auto);
    }

    #[test]
    fn test_year_range_marks_match_slider() {
        let range = YearRange::new(1942, 2021).unwrap();
        assert_eq!(range.year_count(), 80);
        assert_eq!(
            range.marks(),
            vec![1942, 1952, 1962, 1972, 1982, 1992, 2002, 2012]
        );
        assert!(YearRange::new(2000, 1999).is_none());
    }

    #[test]
    fn test_year_count_full_i32_range() {
        let range = YearRange::new(i32::MIN, i32::MAX).unwrap();
        assert_eq!(range.year_count() as u64, 1u64 << 32);
        assert_eq!(YearRange::new(2020, 2020).unwrap().year_count(), 1);
    }
}
