//! Choropleth map and timeline bar chart builders
//!
//! Figures are plain values; they serialize to Plotly figure JSON
//! (`{"data": [...], "layout": {...}}`) so the page only has to render them.

use serde::{Serialize, Serializer};
use serde_json::{json, Value};

use crate::catalog::{ContentFilter, CountryYearStat, ScaleMode};

const BACKGROUND: &str = "#323130";
const FONT_COLOR: &str = "white";
const MOVIES_COLOR: &str = "white";
const SHOWS_COLOR: &str = "red";

/// Map settings that do not change between requests
#[derive(Debug, Clone)]
pub struct MapStyle {
    /// Upper bound of the color domain in fixed mode
    pub fixed_max: u32,
    /// Plotly `featureidkey`, e.g. `properties.geounit`
    pub feature_id_key: String,
    /// URL the page fetches the boundary GeoJSON from
    pub geojson_url: String,
}

/// One country's values on the map
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapPoint {
    pub country: String,
    pub value: u32,
    pub movies: u32,
    pub shows: u32,
}

/// Choropleth of one metric for one year
#[derive(Debug, Clone, PartialEq)]
pub struct MapFigure {
    pub year: i32,
    pub metric: ContentFilter,
    pub scale: ScaleMode,
    pub points: Vec<MapPoint>,
    /// Closed color domain `(min, max)`
    pub color_domain: (u32, u32),
    pub feature_id_key: String,
    pub geojson_url: String,
}

impl MapFigure {
    pub fn to_plotly(&self) -> Value {
        let locations: Vec<&str> = self.points.iter().map(|p| p.country.as_str()).collect();
        let values: Vec<u32> = self.points.iter().map(|p| p.value).collect();
        let customdata: Vec<[u32; 2]> = self.points.iter().map(|p| [p.movies, p.shows]).collect();
        let metric = self.metric.label();

        json!({
            "data": [{
                "type": "choropleth",
                "geojson": self.geojson_url,
                "featureidkey": self.feature_id_key,
                "locations": locations,
                "z": values,
                "zmin": self.color_domain.0,
                "zmax": self.color_domain.1,
                "colorscale": "Reds",
                "customdata": customdata,
                "hovertemplate": format!(
                    "<b>%{{location}}</b><br>{}=%{{z}}<br>Movies=%{{customdata[0]}}<br>Shows=%{{customdata[1]}}<extra></extra>",
                    metric
                ),
                "colorbar": { "title": { "text": metric } },
            }],
            "layout": {
                "title": { "text": "map" },
                "geo": {
                    "visible": false,
                    "projection": { "type": "equirectangular" },
                    "bgcolor": BACKGROUND,
                },
                "margin": { "r": 0, "t": 0, "l": 0, "b": 0 },
                "plot_bgcolor": BACKGROUND,
                "paper_bgcolor": BACKGROUND,
                "font": { "color": FONT_COLOR },
            },
        })
    }
}

impl Serialize for MapFigure {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_plotly().serialize(serializer)
    }
}

/// Grouped yearly Movies/Shows bars for one country
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarFigure {
    pub country: String,
    pub years: Vec<i32>,
    pub movies: Vec<u32>,
    pub shows: Vec<u32>,
}

impl BarFigure {
    pub fn title(&self) -> String {
        format!("Timeline: {}", self.country)
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    pub fn to_plotly(&self) -> Value {
        json!({
            "data": [
                {
                    "type": "bar",
                    "name": "Movies",
                    "x": self.years,
                    "y": self.movies,
                    "marker": { "color": MOVIES_COLOR },
                },
                {
                    "type": "bar",
                    "name": "Shows",
                    "x": self.years,
                    "y": self.shows,
                    "marker": { "color": SHOWS_COLOR },
                },
            ],
            "layout": {
                "title": { "text": self.title() },
                "barmode": "group",
                "xaxis": { "title": { "text": "Year" } },
                "yaxis": { "title": { "text": "value" } },
                "legend": { "title": { "text": "variable" } },
                "plot_bgcolor": BACKGROUND,
                "paper_bgcolor": BACKGROUND,
                "font": { "color": FONT_COLOR },
            },
        })
    }
}

impl Serialize for BarFigure {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_plotly().serialize(serializer)
    }
}

/// Upper bound of the color domain
///
/// Fixed mode ignores the data; auto mode follows the largest value, never
/// below 1 so the domain keeps a non-zero width.
pub fn color_max(scale: ScaleMode, fixed_max: u32, values: impl Iterator<Item = u32>) -> u32 {
    match scale {
        ScaleMode::Fix => fixed_max,
        ScaleMode::Auto => values.max().unwrap_or(0).max(1),
    }
}

/// Build the choropleth from the grid rows of `year`
///
/// `None` when the grid has no rows for the year.
pub fn build_map(
    rows: &[CountryYearStat],
    metric: ContentFilter,
    year: i32,
    scale: ScaleMode,
    style: &MapStyle,
) -> Option<MapFigure> {
    if rows.is_empty() {
        return None;
    }

    let max = color_max(scale, style.fixed_max, rows.iter().map(|r| metric.metric(r)));

    let points = rows
        .iter()
        .map(|row| MapPoint {
            country: row.country.clone(),
            value: metric.metric(row),
            movies: row.movies,
            shows: row.shows,
        })
        .collect();

    Some(MapFigure {
        year,
        metric,
        scale,
        points,
        color_domain: (0, max),
        feature_id_key: style.feature_id_key.clone(),
        geojson_url: style.geojson_url.clone(),
    })
}

/// Build the yearly bar chart for `country`; empty when it has no rows
pub fn build_timeline(grid: &[CountryYearStat], country: &str) -> BarFigure {
    let mut figure = BarFigure {
        country: country.to_string(),
        years: Vec::new(),
        movies: Vec::new(),
        shows: Vec::new(),
    };

    for row in grid.iter().filter(|row| row.country == country) {
        figure.years.push(row.year);
        figure.movies.push(row.movies);
        figure.shows.push(row.shows);
    }

    figure
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stat(country: &str, year: i32, movies: u32, shows: u32) -> CountryYearStat {
        CountryYearStat {
            country: country.to_string(),
            year,
            movies,
            shows,
            all: movies + shows,
        }
    }

    fn grid() -> Vec<CountryYearStat> {
        vec![
            stat("France", 2019, 3, 1),
            stat("Japan", 2019, 0, 0),
            stat("France", 2020, 5, 7),
            stat("Japan", 2020, 2, 9),
        ]
    }

    fn year_rows(year: i32) -> Vec<CountryYearStat> {
        grid().into_iter().filter(|row| row.year == year).collect()
    }

    fn style() -> MapStyle {
        MapStyle {
            fixed_max: 450,
            feature_id_key: "properties.geounit".to_string(),
            geojson_url: "/api/boundaries".to_string(),
        }
    }

    #[test]
    fn test_map_missing_year_yields_none() {
        let map = build_map(&year_rows(1999), ContentFilter::All, 1999, ScaleMode::Auto, &style());
        assert!(map.is_none());
    }

    #[test]
    fn test_map_fixed_scale_is_constant() {
        for metric in ContentFilter::OPTIONS {
            for year in [2019, 2020] {
                let map =
                    build_map(&year_rows(year), metric, year, ScaleMode::Fix, &style()).unwrap();
                assert_eq!(map.color_domain, (0, 450));
            }
        }
    }

    #[test]
    fn test_map_auto_scale_follows_metric() {
        let all =
            build_map(&year_rows(2020), ContentFilter::All, 2020, ScaleMode::Auto, &style()).unwrap();
        assert_eq!(all.color_domain, (0, 12));

        let movies =
            build_map(&year_rows(2020), ContentFilter::Movies, 2020, ScaleMode::Auto, &style()).unwrap();
        assert_eq!(movies.color_domain, (0, 5));
        assert_eq!(movies.points[1].value, 2);
        assert_eq!(movies.points[1].shows, 9);
    }

    #[test]
    fn test_map_auto_scale_floored_at_one() {
        let grid = vec![stat("France", 2019, 0, 0), stat("Japan", 2019, 0, 0)];
        let map = build_map(&grid, ContentFilter::Shows, 2019, ScaleMode::Auto, &style()).unwrap();
        assert_eq!(map.color_domain, (0, 1));
    }

    #[test]
    fn test_map_plotly_shape() {
        let map =
            build_map(&year_rows(2019), ContentFilter::Shows, 2019, ScaleMode::Auto, &style()).unwrap();
        let value = serde_json::to_value(&map).unwrap();
        let trace = &value["data"][0];

        assert_eq!(trace["type"], "choropleth");
        assert_eq!(trace["featureidkey"], "properties.geounit");
        assert_eq!(trace["locations"], json!(["France", "Japan"]));
        assert_eq!(trace["z"], json!([1, 0]));
        assert_eq!(trace["customdata"], json!([[3, 1], [0, 0]]));
        assert_eq!(trace["zmax"], 1);
        assert_eq!(value["layout"]["geo"]["visible"], false);
    }

    #[test]
    fn test_timeline_for_country() {
        let bars = build_timeline(&grid(), "Japan");
        assert_eq!(bars.title(), "Timeline: Japan");
        assert_eq!(bars.years, vec![2019, 2020]);
        assert_eq!(bars.movies, vec![0, 2]);
        assert_eq!(bars.shows, vec![0, 9]);

        let value = serde_json::to_value(&bars).unwrap();
        assert_eq!(value["layout"]["barmode"], "group");
        assert_eq!(value["data"][0]["name"], "Movies");
        assert_eq!(value["data"][1]["marker"]["color"], "red");
    }

    #[test]
    fn test_timeline_unknown_country_is_empty() {
        let bars = build_timeline(&grid(), "Atlantis");
        assert!(bars.is_empty());
        assert_eq!(bars.title(), "Timeline: Atlantis");
    }
}
