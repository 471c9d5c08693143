//! Great-circle distance on a spherical Earth

use crate::model::Point;

/// Mean Earth radius in kilometres
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two points, in kilometres
pub fn haversine_km(from: Point, to: Point) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let d_lat = lat2 - lat1;
    let d_lon = to.longitude.to_radians() - from.longitude.to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_distance() {
        let p = Point::new(40.4168, -3.7038);
        assert_eq!(haversine_km(p, p), 0.0);
    }

    #[test]
    fn test_one_degree_along_equator() {
        let d = haversine_km(Point::new(0.0, 0.0), Point::new(0.0, 1.0));
        // 2πR / 360
        assert!((d - 111.194_926_6).abs() < 1e-6, "got {}", d);
    }

    #[test]
    fn test_symmetric() {
        let madrid = Point::new(40.4168, -3.7038);
        let paris = Point::new(48.8566, 2.3522);
        let there = haversine_km(madrid, paris);
        let back = haversine_km(paris, madrid);
        assert!((there - back).abs() < 1e-9);
        // Madrid-Paris is roughly 1053 km
        assert!((there - 1053.0).abs() < 5.0, "got {}", there);
    }

    #[test]
    fn test_antipodal_points() {
        let d = haversine_km(Point::new(0.0, 0.0), Point::new(0.0, 180.0));
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }
}
