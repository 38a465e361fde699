//! Data table builder
//!
//! Filters the exploded per-entry table for one country, year and content
//! filter. Rows stay in source order.

use serde::Serialize;

use crate::catalog::{ContentFilter, ExplodedEntry};

/// Column ids, in display order
pub const TABLE_COLUMNS: [&str; 5] = ["type", "title", "director", "rating", "listed_in"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    #[serde(rename = "type")]
    pub content_type: &'static str,
    pub title: String,
    pub director: Option<String>,
    pub rating: Option<String>,
    pub listed_in: String,
}

impl From<&ExplodedEntry> for TableRow {
    fn from(row: &ExplodedEntry) -> Self {
        let entry = &row.entry;
        Self {
            content_type: entry.content_type.label(),
            title: entry.title.clone(),
            director: entry.director.clone(),
            rating: entry.rating.clone(),
            listed_in: entry.listed_in.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRows {
    pub country: String,
    pub year: i32,
    pub content: ContentFilter,
    pub columns: Vec<&'static str>,
    pub rows: Vec<TableRow>,
}

pub fn build_table(
    exploded: &[ExplodedEntry],
    country: &str,
    year: i32,
    content: ContentFilter,
) -> TableRows {
    let rows = exploded
        .iter()
        .filter(|row| row.country == country && row.entry.release_year == year)
        .filter(|row| content.matches(row.entry.content_type))
        .map(TableRow::from)
        .collect();

    TableRows {
        country: country.to_string(),
        year,
        content,
        columns: TABLE_COLUMNS.to_vec(),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{explode, ContentType, Entry};
    use std::sync::Arc;

    fn entry(title: &str, kind: ContentType, country: &str, year: i32) -> Arc<Entry> {
        Arc::new(Entry {
            title: title.to_string(),
            content_type: kind,
            country: Some(country.to_string()),
            release_year: year,
            rating: Some("PG".to_string()),
            listed_in: "Dramas".to_string(),
            director: Some("Someone".to_string()),
        })
    }

    fn exploded() -> Vec<ExplodedEntry> {
        explode(&[
            entry("First", ContentType::Movie, "France", 2015),
            entry("Second", ContentType::Show, "France, Germany", 2015),
            entry("Third", ContentType::Movie, "Germany, France", 2015),
            entry("Older", ContentType::Movie, "France", 2014),
        ])
    }

    #[test]
    fn test_all_keeps_source_order() {
        let table = build_table(&exploded(), "France", 2015, ContentFilter::All);
        let titles: Vec<&str> = table.rows.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Second", "Third"]);
        assert_eq!(table.columns, TABLE_COLUMNS.to_vec());
    }

    #[test]
    fn test_content_filter_restricts_type() {
        let movies = build_table(&exploded(), "France", 2015, ContentFilter::Movies);
        assert_eq!(movies.rows.len(), 2);
        assert!(movies.rows.iter().all(|r| r.content_type == "Movie"));

        let shows = build_table(&exploded(), "France", 2015, ContentFilter::Shows);
        assert_eq!(shows.rows.len(), 1);
        assert_eq!(shows.rows[0].content_type, "TV Show");
    }

    #[test]
    fn test_exact_country_and_year() {
        assert!(build_table(&exploded(), "Fra", 2015, ContentFilter::All).rows.is_empty());
        assert_eq!(build_table(&exploded(), "France", 2014, ContentFilter::All).rows.len(), 1);
    }

    #[test]
    fn test_row_serializes_type_column() {
        let table = build_table(&exploded(), "Germany", 2015, ContentFilter::All);
        let value = serde_json::to_value(&table.rows[0]).unwrap();
        assert_eq!(value["type"], "TV Show");
        assert_eq!(value["listed_in"], "Dramas");
    }
}
