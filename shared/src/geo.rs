use std::fmt::Write as FmtWrite;
use std::sync::LazyLock;

use geojson::{GeoJson, Geometry, Value};

/// Latitude domain of the Mercator forward transform (degrees, exclusive).
const MERCATOR_LAT_LIMIT: f64 = 90.0;

static BUNDLED: LazyLock<BoundarySet> = LazyLock::new(|| {
    BoundarySet::from_geojson(include_str!("../data/india.json"))
        .expect("bundled boundary dataset parses")
});

/// One administrative boundary feature: identifying key, display labels,
/// and the polygon geometry it is drawn from. Immutable for the process
/// lifetime.
#[derive(Debug, Clone)]
pub struct BoundaryFeature {
    pub id: String,
    pub state: String,
    pub district: String,
    geometry: Geometry,
}

impl BoundaryFeature {
    /// "State - District" pair shown for the shape.
    pub fn label(&self) -> String {
        format!("{} - {}", self.state, self.district)
    }
}

/// The reference polygon dataset the projection is fitted against.
#[derive(Debug, Clone)]
pub struct BoundarySet {
    features: Vec<BoundaryFeature>,
}

impl BoundarySet {
    /// The boundary dataset bundled with the application.
    pub fn bundled() -> &'static BoundarySet {
        &BUNDLED
    }

    pub fn from_geojson(text: &str) -> Result<Self, String> {
        let geojson: GeoJson = text
            .parse()
            .map_err(|e| format!("invalid boundary GeoJSON: {e}"))?;
        let GeoJson::FeatureCollection(collection) = geojson else {
            return Err("boundary dataset is not a FeatureCollection".into());
        };

        let features = collection
            .features
            .into_iter()
            .enumerate()
            .filter_map(|(idx, feature)| {
                let geometry = feature.geometry?;
                let properties = feature.properties.unwrap_or_default();
                let state = properties
                    .get("st_nm")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string();
                let district = properties
                    .get("district")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string();
                Some(BoundaryFeature {
                    id: format!("{state}-{district}-{idx}"),
                    state,
                    district,
                    geometry,
                })
            })
            .collect();

        Ok(Self { features })
    }

    pub fn features(&self) -> &[BoundaryFeature] {
        &self.features
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Mercator forward transform in raw (unscaled) plane units.
/// `None` for coordinates outside the projection's domain.
fn mercator_raw(lng: f64, lat: f64) -> Option<(f64, f64)> {
    if !lng.is_finite() || !lat.is_finite() || lat.abs() >= MERCATOR_LAT_LIMIT {
        return None;
    }
    let x = lng.to_radians();
    // Screen y grows downward, so north gets the smaller coordinate.
    let y = -((std::f64::consts::FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln());
    (x.is_finite() && y.is_finite()).then_some((x, y))
}

fn visit_rings(rings: &[Vec<Vec<f64>>], f: &mut impl FnMut(f64, f64)) {
    for ring in rings {
        for position in ring {
            if let [lng, lat, ..] = position[..] {
                f(lng, lat);
            }
        }
    }
}

fn each_vertex(geometry: &Geometry, f: &mut impl FnMut(f64, f64)) {
    match &geometry.value {
        Value::Polygon(rings) => visit_rings(rings, f),
        Value::MultiPolygon(polygons) => {
            for rings in polygons {
                visit_rings(rings, f);
            }
        }
        _ => {}
    }
}

/// A Mercator projection fitted to a rectangular drawing surface.
///
/// `fit` scales and translates the raw transform so the reference dataset's
/// bounding box spans exactly [0,width] x [0,height]. The fit is
/// deterministic for fixed inputs; one instance is shared per surface so
/// polygons and point markers stay spatially coherent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapProjection {
    scale_x: f64,
    scale_y: f64,
    translate_x: f64,
    translate_y: f64,
}

impl MapProjection {
    pub fn fit(width: f64, height: f64, boundaries: &BoundarySet) -> Self {
        let mut min_x = f64::MAX;
        let mut min_y = f64::MAX;
        let mut max_x = f64::MIN;
        let mut max_y = f64::MIN;
        for feature in boundaries.features() {
            each_vertex(&feature.geometry, &mut |lng, lat| {
                if let Some((x, y)) = mercator_raw(lng, lat) {
                    min_x = min_x.min(x);
                    min_y = min_y.min(y);
                    max_x = max_x.max(x);
                    max_y = max_y.max(y);
                }
            });
        }

        if !(min_x < max_x && min_y < max_y) || width <= 0.0 || height <= 0.0 {
            // Degenerate dataset or surface: identity transform.
            return Self {
                scale_x: 1.0,
                scale_y: 1.0,
                translate_x: 0.0,
                translate_y: 0.0,
            };
        }

        let scale_x = width / (max_x - min_x);
        let scale_y = height / (max_y - min_y);
        Self {
            scale_x,
            scale_y,
            translate_x: -min_x * scale_x,
            translate_y: -min_y * scale_y,
        }
    }

    /// Convert a coordinate pair to surface coordinates.
    /// `None` when the pair is outside the projection's domain — the
    /// caller decides how to render an unprojectable point.
    pub fn project(&self, lat: f64, lng: f64) -> Option<(f64, f64)> {
        mercator_raw(lng, lat).map(|(x, y)| {
            (
                x * self.scale_x + self.translate_x,
                y * self.scale_y + self.translate_y,
            )
        })
    }

    /// SVG path data for one boundary feature. Returns an empty path when
    /// the geometry cannot be projected; never fails the whole batch.
    pub fn polygon_path(&self, feature: &BoundaryFeature) -> String {
        match &feature.geometry.value {
            Value::Polygon(rings) => self.rings_path(rings).unwrap_or_default(),
            Value::MultiPolygon(polygons) => {
                let mut path = String::new();
                for rings in polygons {
                    match self.rings_path(rings) {
                        Some(sub) => path.push_str(&sub),
                        None => return String::new(),
                    }
                }
                path
            }
            _ => String::new(),
        }
    }

    fn rings_path(&self, rings: &[Vec<Vec<f64>>]) -> Option<String> {
        let mut path = String::new();
        for ring in rings {
            let mut started = false;
            for position in ring {
                let [lng, lat, ..] = position[..] else {
                    return None;
                };
                let (x, y) = self.project(lat, lng)?;
                let cmd = if started { 'L' } else { 'M' };
                let _ = write!(path, "{cmd}{x:.2},{y:.2}");
                started = true;
            }
            if started {
                path.push('Z');
            }
        }
        Some(path)
    }

    /// Bounding box of the dataset after projection, as
    /// (min_x, min_y, max_x, max_y). `None` for an empty dataset.
    pub fn projected_bounds(&self, boundaries: &BoundarySet) -> Option<(f64, f64, f64, f64)> {
        let mut bounds: Option<(f64, f64, f64, f64)> = None;
        for feature in boundaries.features() {
            each_vertex(&feature.geometry, &mut |lng, lat| {
                if let Some((x, y)) = self.project(lat, lng) {
                    let (min_x, min_y, max_x, max_y) =
                        bounds.unwrap_or((f64::MAX, f64::MAX, f64::MIN, f64::MIN));
                    bounds = Some((min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y)));
                }
            });
        }
        bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn square_set() -> BoundarySet {
        // One unit square plus a smaller island, both well inside the
        // Mercator domain.
        let text = r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": { "st_nm": "Alpha", "district": "Core" },
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[[70.0, 10.0], [80.0, 10.0], [80.0, 30.0], [70.0, 30.0], [70.0, 10.0]]]
                    }
                },
                {
                    "type": "Feature",
                    "properties": { "st_nm": "Beta", "district": "Isle" },
                    "geometry": {
                        "type": "MultiPolygon",
                        "coordinates": [[[[72.0, 12.0], [74.0, 12.0], [73.0, 14.0], [72.0, 12.0]]]]
                    }
                }
            ]
        }"#;
        BoundarySet::from_geojson(text).unwrap()
    }

    #[test]
    fn bundled_dataset_parses_and_is_nonempty() {
        let set = BoundarySet::bundled();
        assert!(!set.is_empty());
        for feature in set.features() {
            assert!(!feature.state.is_empty());
            assert!(feature.id.contains(&feature.state));
        }
    }

    #[test]
    fn projection_is_deterministic() {
        let set = square_set();
        let projection = MapProjection::fit(800.0, 900.0, &set);
        let a = projection.project(20.0, 75.0).unwrap();
        let b = projection.project(20.0, 75.0).unwrap();
        assert_eq!(a, b);

        let refit = MapProjection::fit(800.0, 900.0, &set);
        assert_eq!(projection, refit);
    }

    #[test]
    fn fit_spans_the_surface_exactly_for_any_size() {
        let set = square_set();
        for (w, h) in [(800.0, 900.0), (320.0, 200.0)] {
            let projection = MapProjection::fit(w, h, &set);
            let (min_x, min_y, max_x, max_y) = projection.projected_bounds(&set).unwrap();
            assert!(min_x.abs() < EPS && min_y.abs() < EPS);
            assert!((max_x - w).abs() < EPS, "width span {max_x} != {w}");
            assert!((max_y - h).abs() < EPS, "height span {max_y} != {h}");
        }
    }

    #[test]
    fn north_projects_above_south() {
        let set = square_set();
        let projection = MapProjection::fit(800.0, 900.0, &set);
        let (_, y_north) = projection.project(30.0, 75.0).unwrap();
        let (_, y_south) = projection.project(10.0, 75.0).unwrap();
        assert!(y_north < y_south);
    }

    #[test]
    fn out_of_domain_points_are_rejected() {
        let set = square_set();
        let projection = MapProjection::fit(800.0, 900.0, &set);
        assert_eq!(projection.project(90.0, 75.0), None);
        assert_eq!(projection.project(-90.0, 75.0), None);
        assert_eq!(projection.project(f64::NAN, 75.0), None);
        assert_eq!(projection.project(20.0, f64::INFINITY), None);
    }

    #[test]
    fn polygon_path_is_closed_svg_path_data() {
        let set = square_set();
        let projection = MapProjection::fit(800.0, 900.0, &set);
        for feature in set.features() {
            let path = projection.polygon_path(feature);
            assert!(path.starts_with('M'), "path: {path}");
            assert!(path.ends_with('Z'), "path: {path}");
            assert!(path.contains('L'));
        }
    }

    #[test]
    fn unsupported_geometry_projects_to_empty_path() {
        let text = r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": { "st_nm": "Dot", "district": "Point" },
                    "geometry": { "type": "Point", "coordinates": [75.0, 20.0] }
                }
            ]
        }"#;
        let set = BoundarySet::from_geojson(text).unwrap();
        let projection = MapProjection::fit(800.0, 900.0, &square_set());
        assert_eq!(projection.polygon_path(&set.features()[0]), "");
    }

    #[test]
    fn feature_labels_pair_state_and_district() {
        let set = square_set();
        assert_eq!(set.features()[0].label(), "Alpha - Core");
        assert_eq!(set.features()[1].id, "Beta-Isle-1");
    }

    #[test]
    fn rejects_non_feature_collection_input() {
        assert!(BoundarySet::from_geojson("{\"type\": \"Point\", \"coordinates\": [0, 0]}").is_err());
        assert!(BoundarySet::from_geojson("not json").is_err());
    }
}
