//! Great-circle distance and name matching shared by every directory.
//!
//! The SQLite store registers these functions on its connection so the SQL
//! and in-memory code paths rank and filter facilities identically.

use geo::Coord;

/// Mean Earth radius used for distance ranking, in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Number of decimal places kept on reported distances.
pub const DISTANCE_DECIMALS: i32 = 4;

/// Great-circle distance between two WGS84 positions, in kilometres.
///
/// Uses the spherical law of cosines. Rounding can push the cosine of the
/// central angle a hair outside `[-1, 1]` for identical or antipodal
/// points; the value is clamped so those cases yield `0` and `π·R` rather
/// than `NaN`.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use eatsafe_core::great_circle_km;
///
/// let ottawa = Coord { x: -75.6972, y: 45.4215 };
/// assert_eq!(great_circle_km(ottawa, ottawa), 0.0);
/// ```
#[must_use]
pub fn great_circle_km(from: Coord<f64>, to: Coord<f64>) -> f64 {
    // sin² + cos² may land one ulp below 1, which acos turns into ~0.0001 km.
    if from == to {
        return 0.0;
    }
    let from_lat = from.y.to_radians();
    let to_lat = to.y.to_radians();
    let delta_lon = to.x.to_radians() - from.x.to_radians();
    let cosine = from_lat.sin() * to_lat.sin() + from_lat.cos() * to_lat.cos() * delta_lon.cos();
    cosine.clamp(-1.0, 1.0).acos() * EARTH_RADIUS_KM
}

/// Round a distance to [`DISTANCE_DECIMALS`] places.
#[must_use]
pub fn round_distance(km: f64) -> f64 {
    let scale = 10_f64.powi(DISTANCE_DECIMALS);
    (km * scale).round() / scale
}

/// Case-insensitive literal substring test used for facility names.
///
/// An empty needle matches every name.
#[must_use]
pub fn name_contains(name: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    name.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn coord(lat: f64, lon: f64) -> Coord<f64> {
        Coord { x: lon, y: lat }
    }

    #[rstest]
    fn identical_points_are_zero_apart() {
        let point = coord(45.4215, -75.6972);
        let distance = great_circle_km(point, point);
        assert!(!distance.is_nan());
        assert_eq!(round_distance(distance), 0.0);
    }

    #[rstest]
    fn antipodes_are_half_the_circumference_apart() {
        let distance = great_circle_km(coord(0.0, 0.0), coord(0.0, 180.0));
        assert!((distance - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }

    #[rstest]
    fn one_degree_of_longitude_at_the_equator() {
        let distance = round_distance(great_circle_km(coord(0.0, 0.0), coord(0.0, 1.0)));
        assert_eq!(distance, 111.1949);
    }

    #[rstest]
    #[case(1.234_56, 1.2346)]
    #[case(0.000_04, 0.0)]
    #[case(10.0, 10.0)]
    fn rounds_to_four_places(#[case] raw: f64, #[case] expected: f64) {
        assert_eq!(round_distance(raw), expected);
    }

    #[rstest]
    #[case("Pizza Hut", "Pizza", true)]
    #[case("Luigi's pizzeria", "Pizza", true)]
    #[case("Burger King", "Pizza", false)]
    #[case("CAFÉ MOZART", "café", true)]
    #[case("100% Juice", "%", true)]
    #[case("Juice Bar", "%", false)]
    #[case("Anything", "", true)]
    fn matches_names_case_insensitively(
        #[case] name: &str,
        #[case] needle: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(name_contains(name, needle), expected);
    }
}
