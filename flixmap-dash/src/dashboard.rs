//! The immutable dashboard value shared by every handler
//!
//! Built once at start-up from the two input files and never mutated; each
//! request only reads from it.

use flixmap_common::config::{DashboardConfig, MAX_YEAR_SPAN};
use flixmap_common::{Error, Result};
use tracing::info;

use crate::catalog::{
    aggregate, load_boundaries, load_catalog, Aggregates, Boundaries, ContentFilter, Entry,
    ScaleMode, YearRange,
};
use crate::figures::{build_map, build_timeline, BarFigure, MapFigure, MapStyle};
use crate::table::{build_table, TableRows};

/// Route the page loads the boundary document from
pub const BOUNDARIES_URL: &str = "/api/boundaries";

/// Display settings that are fixed for the lifetime of the process
#[derive(Debug, Clone)]
pub struct DashboardSettings {
    pub fixed_scale_max: u32,
    pub fallback_country: String,
}

#[derive(Debug)]
pub struct Dashboard {
    pub aggregates: Aggregates,
    pub boundaries: Boundaries,
    pub settings: DashboardSettings,
    map_style: MapStyle,
}

impl Dashboard {
    /// Aggregate `entries` against `boundaries`
    ///
    /// `year_range` defaults to the span of the entries' release years and
    /// may cover at most `MAX_YEAR_SPAN` years past its start.
    pub fn new(
        entries: &[Entry],
        boundaries: Boundaries,
        year_range: Option<YearRange>,
        settings: DashboardSettings,
    ) -> Result<Self> {
        let year_range = match year_range {
            Some(range) => range,
            None => YearRange::spanning(entries).ok_or_else(|| {
                Error::InvalidInput("Catalogue has no entries to derive a year range from".to_string())
            })?,
        };

        let span = i64::from(year_range.max) - i64::from(year_range.min);
        if span > MAX_YEAR_SPAN {
            return Err(Error::InvalidInput(format!(
                "Year range {}..={} spans more than {} years",
                year_range.min, year_range.max, MAX_YEAR_SPAN
            )));
        }

        let aggregates = aggregate(entries, &boundaries.countries, year_range);
        let map_style = MapStyle {
            fixed_max: settings.fixed_scale_max,
            feature_id_key: boundaries.feature_id_key(),
            geojson_url: BOUNDARIES_URL.to_string(),
        };

        Ok(Self {
            aggregates,
            boundaries,
            settings,
            map_style,
        })
    }

    /// Load both input files named by `config` and aggregate them
    pub fn load(config: &DashboardConfig) -> Result<Self> {
        let entries = load_catalog(&config.catalog_path)?;
        let boundaries = load_boundaries(&config.boundaries_path, &config.boundary_property)?;

        // Configured bounds win; missing ones come from the catalogue
        let spanning = YearRange::spanning(&entries);
        let year_range = match (
            config.year_min.or(spanning.map(|r| r.min)),
            config.year_max.or(spanning.map(|r| r.max)),
        ) {
            (Some(min), Some(max)) => Some(YearRange::new(min, max).ok_or_else(|| {
                Error::Config(format!("Year range {}..={} is empty", min, max))
            })?),
            _ => None,
        };

        let settings = DashboardSettings {
            fixed_scale_max: config.fixed_scale_max,
            fallback_country: config.fallback_country.clone(),
        };

        let dashboard = Self::new(&entries, boundaries, year_range, settings)?;
        info!(
            "Aggregated {} grid rows ({} countries × {} years, {}..={}), {} exploded rows",
            dashboard.aggregates.grid.len(),
            dashboard.boundaries.countries.len(),
            dashboard.year_range().year_count(),
            dashboard.year_range().min,
            dashboard.year_range().max,
            dashboard.aggregates.exploded.len()
        );
        Ok(dashboard)
    }

    pub fn year_range(&self) -> YearRange {
        self.aggregates.year_range
    }

    pub fn map(&self, content: ContentFilter, year: i32, scale: ScaleMode) -> Option<MapFigure> {
        build_map(
            self.aggregates.year_rows(year),
            content,
            year,
            scale,
            &self.map_style,
        )
    }

    /// Timeline for `country`, or for the fallback country when `None`
    pub fn timeline(&self, country: Option<&str>) -> BarFigure {
        let country = country.unwrap_or(self.settings.fallback_country.as_str());
        build_timeline(&self.aggregates.grid, country)
    }

    pub fn table(&self, country: &str, year: i32, content: ContentFilter) -> TableRows {
        build_table(&self.aggregates.exploded, country, year, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{read_boundaries, ContentType};

    fn boundaries() -> Boundaries {
        let text = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": {"geounit": "France"}, "geometry": null},
                {"type": "Feature", "properties": {"geounit": "Japan"}, "geometry": null}
            ]
        }"#;
        read_boundaries(text.to_string(), "geounit").unwrap()
    }

    fn settings() -> DashboardSettings {
        DashboardSettings {
            fixed_scale_max: 450,
            fallback_country: "Japan".to_string(),
        }
    }

    fn entries(years: &[i32]) -> Vec<Entry> {
        years
            .iter()
            .map(|year| Entry {
                title: format!("Title {}", year),
                content_type: ContentType::Movie,
                country: Some("France".to_string()),
                release_year: *year,
                rating: None,
                listed_in: "Dramas".to_string(),
                director: None,
            })
            .collect()
    }

    #[test]
    fn test_year_range_defaults_to_catalogue_span() {
        let dashboard = Dashboard::new(&entries(&[2003, 2001]), boundaries(), None, settings())
            .unwrap();
        assert_eq!(dashboard.year_range(), YearRange::new(2001, 2003).unwrap());
        assert_eq!(dashboard.aggregates.grid.len(), 6);
    }

    #[test]
    fn test_wide_year_range_rejected() {
        let wide = YearRange::new(i32::MIN, i32::MAX);
        let err = Dashboard::new(&entries(&[2001]), boundaries(), wide, settings()).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        // A stray release year in the data widens the derived range too
        let err = Dashboard::new(&entries(&[1, 2001]), boundaries(), None, settings()).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_map_uses_rows_of_requested_year() {
        let dashboard = Dashboard::new(
            &entries(&[2001, 2002, 2002]),
            boundaries(),
            None,
            settings(),
        )
        .unwrap();

        let map = dashboard
            .map(ContentFilter::Movies, 2002, ScaleMode::Auto)
            .unwrap();
        assert_eq!(map.year, 2002);
        assert_eq!(map.points.len(), 2);
        assert_eq!(map.points[0].country, "France");
        assert_eq!(map.points[0].value, 2);
        assert_eq!(map.color_domain, (0, 2));

        assert!(dashboard
            .map(ContentFilter::All, 1999, ScaleMode::Auto)
            .is_none());
    }
}
