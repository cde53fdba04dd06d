use std::fmt;

use crate::city::City;

/// Expected column layout of the published sheet (0-indexed). Only position
/// matters; header names are never inspected.
const COL_NAME: usize = 0;
const COL_LAT: usize = 1;
const COL_LNG: usize = 2;
// Column 3 is the state/region, unused by this layer.
const COL_VISITED: usize = 4;
const COL_IMAGE_LINK: usize = 5;

/// Everything that can go wrong while loading the city sheet.
///
/// Row-level problems are not errors — bad rows are dropped with a
/// diagnostic (`ParsedCities::skipped`) and the batch continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The share URL has no `spreadsheets/d/<id>` segment.
    InvalidUrl,
    /// The fetch did not resolve within the timeout bound.
    Timeout,
    /// The server answered with a non-success HTTP status.
    FetchFailed(u16),
    /// Any other transport failure, surfaced verbatim.
    Network(String),
    /// The CSV parsed structurally but produced zero usable records —
    /// a data-shape problem, not a connectivity one.
    EmptyResult,
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUrl => write!(f, "Invalid Google Sheets URL"),
            Self::Timeout => write!(
                f,
                "Request timeout: unable to fetch sheet data. Please check your internet connection."
            ),
            Self::FetchFailed(status) => write!(f, "Failed to fetch sheet data (HTTP {status})"),
            Self::Network(msg) => write!(f, "{msg}"),
            Self::EmptyResult => write!(
                f,
                "No valid cities found in the sheet. Please check that it has rows with valid coordinates."
            ),
        }
    }
}

impl std::error::Error for LoadError {}

/// Extract the spreadsheet identifier from a share URL.
/// Returns `None` when the URL carries no `spreadsheets/d/<id>` segment.
pub fn extract_sheet_id(url: &str) -> Option<&str> {
    let rest = &url[url.find("spreadsheets/d/")? + "spreadsheets/d/".len()..];
    let end = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        .unwrap_or(rest.len());
    (end > 0).then(|| &rest[..end])
}

/// CSV export endpoint for a sheet id.
pub fn csv_export_url(sheet_id: &str) -> String {
    format!("https://docs.google.com/spreadsheets/d/{sheet_id}/export?format=csv")
}

/// Field-splitting strategy for one CSV line.
///
/// The default `CommaSplit` is a naive comma split: a quoted field
/// containing a literal comma is split apart. That matches the sheet data
/// this app consumes; a conforming CSV splitter can be swapped in here
/// without touching any parse call sites.
pub trait SplitFields {
    fn split<'a>(&self, line: &'a str) -> Vec<&'a str>;
}

/// Naive comma splitter. Does not honor quoting.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommaSplit;

impl SplitFields for CommaSplit {
    fn split<'a>(&self, line: &'a str) -> Vec<&'a str> {
        line.split(',').collect()
    }
}

/// One discarded data row, kept for caller-side logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// 1-based line number in the raw CSV text.
    pub line: usize,
    pub name: String,
    pub raw: String,
}

impl fmt::Display for SkippedRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "city \"{}\" (line {}) has invalid or missing coordinates, skipping: \"{}\"",
            self.name, self.line, self.raw
        )
    }
}

/// Output of a successful parse: the validated records in input order plus
/// the diagnostics for every coordinate-invalid row that was dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedCities {
    pub cities: Vec<City>,
    pub skipped: Vec<SkippedRow>,
}

/// Strip all double quotes and surrounding whitespace from a raw field.
fn clean_field(raw: &str) -> String {
    raw.replace('"', "").trim().to_string()
}

fn field(parts: &[&str], idx: usize) -> String {
    clean_field(parts.get(idx).copied().unwrap_or(""))
}

/// Parse raw CSV text into city records.
///
/// The first non-blank line is treated as a header and skipped without
/// validation. Rows with an empty name are dropped silently; rows whose
/// latitude or longitude fails a strict finite parse are dropped with a
/// diagnostic. A parse that yields zero records fails with `EmptyResult`.
pub fn parse_cities(text: &str, splitter: &impl SplitFields) -> Result<ParsedCities, LoadError> {
    let mut parsed = ParsedCities::default();
    let mut header_seen = false;

    for (idx, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        if !header_seen {
            header_seen = true;
            continue;
        }

        let parts = splitter.split(line);
        let name = field(&parts, COL_NAME);
        if name.is_empty() {
            continue;
        }

        let lat = field(&parts, COL_LAT).parse::<f64>().ok();
        let lng = field(&parts, COL_LNG).parse::<f64>().ok();
        let (Some(lat), Some(lng)) = (lat, lng) else {
            parsed.skipped.push(SkippedRow {
                line: idx + 1,
                name,
                raw: line.to_string(),
            });
            continue;
        };
        if !lat.is_finite() || !lng.is_finite() {
            parsed.skipped.push(SkippedRow {
                line: idx + 1,
                name,
                raw: line.to_string(),
            });
            continue;
        }

        let visited_text = field(&parts, COL_VISITED);
        let visited = visited_text.eq_ignore_ascii_case("true")
            || visited_text.eq_ignore_ascii_case("yes");

        let image_link = match field(&parts, COL_IMAGE_LINK) {
            link if link.is_empty() => None,
            link => Some(link),
        };

        parsed.cities.push(City {
            name,
            lat,
            lng,
            visited,
            image_link,
        });
    }

    if parsed.cities.is_empty() {
        return Err(LoadError::EmptyResult);
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<ParsedCities, LoadError> {
        parse_cities(text, &CommaSplit)
    }

    #[test]
    fn parses_valid_row_and_drops_bad_coordinates() {
        let csv = "Name,Lat,Lng,State,Visited,Image\nDelhi,28.6,77.2,DL,yes,\nBadRow,notanumber,77,DL,no,\n";
        let parsed = parse(csv).unwrap();
        assert_eq!(parsed.cities.len(), 1);
        let city = &parsed.cities[0];
        assert_eq!(city.name, "Delhi");
        assert_eq!(city.lat, 28.6);
        assert_eq!(city.lng, 77.2);
        assert!(city.visited);
        assert_eq!(city.image_link, None);

        assert_eq!(parsed.skipped.len(), 1);
        assert_eq!(parsed.skipped[0].name, "BadRow");
        assert_eq!(parsed.skipped[0].line, 3);
    }

    #[test]
    fn visited_accepts_true_and_yes_case_insensitively() {
        let csv = "h,,,,,\nA,1,1,,TRUE,\nB,1,1,,Yes,\nC,1,1,,No,\nD,1,1,,1,\nE,1,1,,,\nF,1,1,,y,\n";
        let parsed = parse(csv).unwrap();
        let flags: Vec<bool> = parsed.cities.iter().map(|c| c.visited).collect();
        assert_eq!(flags, vec![true, true, false, false, false, false]);
    }

    #[test]
    fn empty_name_rows_are_skipped_silently() {
        let csv = "h\n,1,1,,yes,\n   ,2,2,,yes,\nGoa,15.3,74.1,,no,\n";
        let parsed = parse(csv).unwrap();
        assert_eq!(parsed.cities.len(), 1);
        assert_eq!(parsed.cities[0].name, "Goa");
        assert!(parsed.skipped.is_empty());
    }

    #[test]
    fn non_finite_coordinates_are_rejected() {
        // "inf" and "NaN" parse as f64 but must never enter the collection.
        let csv = "h\nA,inf,77,,yes,\nB,NaN,77,,yes,\nC,28.6,77.2,,yes,\n";
        let parsed = parse(csv).unwrap();
        assert_eq!(parsed.cities.len(), 1);
        assert_eq!(parsed.cities[0].name, "C");
        assert_eq!(parsed.skipped.len(), 2);
        assert!(parsed.cities.iter().all(|c| c.lat.is_finite() && c.lng.is_finite()));
    }

    #[test]
    fn header_only_input_is_an_empty_result() {
        assert_eq!(parse("Name,Lat,Lng\n"), Err(LoadError::EmptyResult));
    }

    #[test]
    fn all_invalid_rows_is_an_empty_result() {
        let csv = "h\nA,x,y,,yes,\nB,,,,no,\n";
        assert_eq!(parse(csv), Err(LoadError::EmptyResult));
    }

    #[test]
    fn blank_lines_are_ignored() {
        let csv = "\n\nh\n\nDelhi,28.6,77.2,DL,yes,\n\n";
        let parsed = parse(csv).unwrap();
        assert_eq!(parsed.cities.len(), 1);
    }

    #[test]
    fn quotes_and_whitespace_are_stripped_from_fields() {
        let csv = "h\n\"Delhi\" , \"28.6\",\"77.2\",DL,\" yes \",\"https://img/x.jpg\"\n";
        let parsed = parse(csv).unwrap();
        let city = &parsed.cities[0];
        assert_eq!(city.name, "Delhi");
        assert!(city.visited);
        assert_eq!(city.image_link.as_deref(), Some("https://img/x.jpg"));
    }

    #[test]
    fn short_rows_default_missing_columns_to_empty() {
        let parsed = parse("h\nDelhi,28.6,77.2\n").unwrap();
        let city = &parsed.cities[0];
        assert!(!city.visited);
        assert_eq!(city.image_link, None);
    }

    #[test]
    fn output_preserves_input_order_and_duplicates() {
        let csv = "h\nB,2,2,,,\nA,1,1,,,\nB,3,3,,,\n";
        let parsed = parse(csv).unwrap();
        let names: Vec<&str> = parsed.cities.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A", "B"]);
    }

    #[test]
    fn naive_split_breaks_quoted_commas() {
        // Known limitation of CommaSplit: the quoted comma shifts every
        // later column, so the latitude slot holds text and the row is
        // dropped. This test pins the behavior so replacing the splitter
        // is a deliberate change.
        let csv = "h\n\"Delhi, NCR\",28.6,77.2,DL,yes,\nGoa,15.3,74.1,,no,\n";
        let parsed = parse(csv).unwrap();
        assert_eq!(parsed.cities.len(), 1);
        assert_eq!(parsed.cities[0].name, "Goa");
        assert_eq!(parsed.skipped.len(), 1);
        assert_eq!(parsed.skipped[0].name, "Delhi");
    }

    #[test]
    fn extracts_sheet_id_from_share_url() {
        let url = "https://docs.google.com/spreadsheets/d/17qIOCxerf5C_YHIzUx6n4NFI3IorMJicLGxkAy35LQU/edit?usp=sharing";
        assert_eq!(
            extract_sheet_id(url),
            Some("17qIOCxerf5C_YHIzUx6n4NFI3IorMJicLGxkAy35LQU")
        );
    }

    #[test]
    fn rejects_urls_without_sheet_segment() {
        assert_eq!(extract_sheet_id("https://docs.google.com/document/d/abc"), None);
        assert_eq!(extract_sheet_id("https://docs.google.com/spreadsheets/d/"), None);
        assert_eq!(extract_sheet_id(""), None);
    }

    #[test]
    fn builds_csv_export_url() {
        assert_eq!(
            csv_export_url("abc-123_X"),
            "https://docs.google.com/spreadsheets/d/abc-123_X/export?format=csv"
        );
    }

    #[test]
    fn error_messages_distinguish_shape_from_connectivity() {
        assert!(LoadError::EmptyResult.to_string().contains("sheet"));
        assert!(LoadError::Timeout.to_string().contains("timeout"));
        assert_eq!(LoadError::FetchFailed(503).to_string(), "Failed to fetch sheet data (HTTP 503)");
        assert_eq!(LoadError::Network("boom".into()).to_string(), "boom");
    }
}
