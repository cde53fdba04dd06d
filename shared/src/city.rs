use serde::{Deserialize, Serialize};

/// One validated city record from the travel sheet.
///
/// Coordinates are guaranteed finite: rows that fail numeric parsing never
/// become a `City` (see `sheet::parse_cities`). `name` is the key used
/// throughout the UI; the parser does not enforce uniqueness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub visited: bool,
    #[serde(default)]
    #[serde(rename = "imageLink")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_link: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::City;

    fn delhi() -> City {
        City {
            name: "Delhi".into(),
            lat: 28.6,
            lng: 77.2,
            visited: true,
            image_link: None,
        }
    }

    #[test]
    fn serializes_without_absent_image_link() {
        let json = serde_json::to_value(delhi()).unwrap();
        assert!(json.get("imageLink").is_none());
        assert_eq!(json["name"], "Delhi");
        assert_eq!(json["visited"], true);
    }

    #[test]
    fn round_trips_name_and_visited() {
        let cities = vec![
            delhi(),
            City {
                name: "Pune".into(),
                lat: 18.52,
                lng: 73.85,
                visited: false,
                image_link: Some("https://example.com/pune.jpg".into()),
            },
        ];
        let json = serde_json::to_string_pretty(&cities).unwrap();
        let back: Vec<City> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.len(), cities.len());
        assert_eq!(back, cities);
    }

    #[test]
    fn image_link_uses_sheet_field_name() {
        let json = serde_json::to_string(&City {
            image_link: Some("https://example.com/x.jpg".into()),
            ..delhi()
        })
        .unwrap();
        assert!(json.contains("\"imageLink\""));
        assert!(!json.contains("image_link"));
    }
}
