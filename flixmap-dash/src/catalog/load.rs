//! Catalogue and boundary file loading
//!
//! Both inputs are read once at start-up; any failure here is fatal for the
//! dashboard. Individual malformed catalogue rows are skipped.

use flixmap_common::{Error, Result};
use geojson::GeoJson;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info, warn};

use super::{ContentType, Entry};

/// Columns that must be present in the catalogue header
const REQUIRED_COLUMNS: [&str; 3] = ["type", "title", "release_year"];

/// One CSV row; columns are matched by header name and extra columns ignored
#[derive(Debug, Deserialize)]
struct CatalogRecord {
    #[serde(rename = "type")]
    kind: String,
    title: String,
    #[serde(default)]
    director: Option<String>,
    #[serde(default)]
    country: Option<String>,
    release_year: String,
    #[serde(default)]
    rating: Option<String>,
    #[serde(default)]
    listed_in: Option<String>,
}

impl CatalogRecord {
    fn into_entry(self) -> Option<Entry> {
        let content_type = ContentType::parse(&self.kind)?;
        let release_year = self.release_year.trim().parse::<i32>().ok()?;

        Some(Entry {
            title: self.title,
            content_type,
            country: non_blank(self.country),
            release_year,
            rating: non_blank(self.rating),
            listed_in: non_blank(self.listed_in).unwrap_or_default(),
            director: non_blank(self.director),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Read the catalogue CSV at `path`
pub fn load_catalog(path: &Path) -> Result<Vec<Entry>> {
    let file = File::open(path)?;
    let entries = read_catalog(BufReader::new(file))?;
    info!("Loaded {} catalogue entries from {}", entries.len(), path.display());
    Ok(entries)
}

/// Parse catalogue CSV from any reader
///
/// Rows with an unknown `type`, an unparseable `release_year`, or a wrong
/// field count are skipped. I/O errors abort the read.
pub fn read_catalog<R: Read>(reader: R) -> Result<Vec<Entry>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(Error::InvalidInput(format!(
                "Catalogue is missing required column '{}'",
                column
            )));
        }
    }

    let mut entries = Vec::new();
    let mut skipped = 0usize;

    for (index, record) in csv_reader.deserialize::<CatalogRecord>().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                debug!("Skipping malformed catalogue row {}: {}", index + 1, e);
                skipped += 1;
                continue;
            }
        };

        match record.into_entry() {
            Some(entry) => entries.push(entry),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        warn!("Skipped {} catalogue rows with unknown type or bad release year", skipped);
    }

    Ok(entries)
}

/// Country boundary collection
#[derive(Debug, Clone)]
pub struct Boundaries {
    /// Distinct country names, sorted
    pub countries: Vec<String>,
    /// Feature property that holds the country name
    pub name_property: String,
    /// Original GeoJSON text, served to the browser unchanged
    pub document: String,
}

impl Boundaries {
    /// Plotly `featureidkey` for the name property
    pub fn feature_id_key(&self) -> String {
        format!("properties.{}", self.name_property)
    }
}

/// Read the GeoJSON boundary file at `path`
pub fn load_boundaries(path: &Path, name_property: &str) -> Result<Boundaries> {
    let text = std::fs::read_to_string(path)?;
    let boundaries = read_boundaries(text, name_property)?;
    info!(
        "Loaded {} countries from {} (property '{}')",
        boundaries.countries.len(),
        path.display(),
        name_property
    );
    Ok(boundaries)
}

/// Parse a GeoJSON FeatureCollection and collect the country names
pub fn read_boundaries(text: String, name_property: &str) -> Result<Boundaries> {
    let geojson: GeoJson = text.parse()?;

    let GeoJson::FeatureCollection(collection) = geojson else {
        return Err(Error::InvalidInput(
            "Boundary document must be a FeatureCollection".to_string(),
        ));
    };

    let mut names = BTreeSet::new();
    let mut unnamed = 0usize;
    for feature in &collection.features {
        match feature.property(name_property).and_then(|v| v.as_str()) {
            Some(name) if !name.trim().is_empty() => {
                names.insert(name.to_string());
            }
            _ => unnamed += 1,
        }
    }

    if unnamed > 0 {
        warn!(
            "{} boundary features have no '{}' property and were ignored",
            unnamed, name_property
        );
    }

    Ok(Boundaries {
        countries: names.into_iter().collect(),
        name_property: name_property.to_string(),
        document: text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
show_id,type,title,director,cast,country,date_added,release_year,rating,duration,listed_in,description
s1,Movie,Amélie,Jean-Pierre Jeunet,,\"France, Germany\",,2001,R,122 min,\"Comedies, Romantic Movies\",A shy waitress
s2,TV Show,Dark,,,Germany,,2017,TV-MA,3 Seasons,\"Crime TV Shows, International TV Shows\",Time travel
s3,Movie,Untitled,,,,,2019,,90 min,Dramas,No country
s4,Podcast,Talk,,,France,,2019,,1 hr,Talk,Unknown type
s5,Movie,Broken,,,France,,not-a-year,,1 hr,Dramas,Bad year
";

    #[test]
    fn test_read_catalog_parses_quoted_fields() {
        let entries = read_catalog(CSV.as_bytes()).unwrap();
        assert_eq!(entries.len(), 3);

        let amelie = &entries[0];
        assert_eq!(amelie.title, "Amélie");
        assert_eq!(amelie.content_type, ContentType::Movie);
        assert_eq!(amelie.country.as_deref(), Some("France, Germany"));
        assert_eq!(amelie.release_year, 2001);
        assert_eq!(amelie.listed_in, "Comedies, Romantic Movies");
        assert_eq!(amelie.director.as_deref(), Some("Jean-Pierre Jeunet"));

        let dark = &entries[1];
        assert_eq!(dark.content_type, ContentType::Show);
        assert_eq!(dark.director, None);
    }

    #[test]
    fn test_read_catalog_keeps_entry_without_country() {
        let entries = read_catalog(CSV.as_bytes()).unwrap();
        let untitled = entries.iter().find(|e| e.title == "Untitled").unwrap();
        assert_eq!(untitled.country, None);
        assert_eq!(untitled.rating, None);
    }

    #[test]
    fn test_read_catalog_missing_column() {
        let csv = "type,title\nMovie,Alone\n";
        let err = read_catalog(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("release_year"));
    }

    #[test]
    fn test_read_catalog_padded_headers() {
        let csv = " type , title ,country, release_year\nMovie,Alone,France,2001\n";
        let entries = read_catalog(csv.as_bytes()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Alone");
        assert_eq!(entries[0].release_year, 2001);
    }

    #[test]
    fn test_load_catalog_missing_file_is_io_error() {
        let err = load_catalog(Path::new("/nonexistent/flixmap/titles.csv")).unwrap_err();
        match err {
            Error::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
            other => panic!("Expected Io error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_boundaries_directory_is_io_error() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR"));
        let err = load_boundaries(dir, "geounit").unwrap_err();
        assert!(matches!(err, Error::Io(_)), "got {:?}", err);
    }

    #[test]
    fn test_read_boundaries_collects_sorted_names() {
        let text = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": {"geounit": "Germany"}, "geometry": null},
                {"type": "Feature", "properties": {"geounit": "France"}, "geometry": null},
                {"type": "Feature", "properties": {"geounit": "France"}, "geometry": null},
                {"type": "Feature", "properties": {"name": "Nowhere"}, "geometry": null}
            ]
        }"#;

        let boundaries = read_boundaries(text.to_string(), "geounit").unwrap();
        assert_eq!(boundaries.countries, vec!["France", "Germany"]);
        assert_eq!(boundaries.feature_id_key(), "properties.geounit");
    }

    #[test]
    fn test_read_boundaries_rejects_single_feature() {
        let text = r#"{"type": "Feature", "properties": {"geounit": "France"}, "geometry": null}"#;
        let err = read_boundaries(text.to_string(), "geounit").unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}
