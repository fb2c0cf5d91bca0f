use serde::Serialize;

/// Spherical Earth radius used for every distance computation, in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Geographic position of a segment vertex.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    pub longitude: f64,
    pub latitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elevation: Option<f64>,
}

impl Coordinate {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
            elevation: None,
        }
    }

    /// Great-circle distance to another coordinate in metres.
    pub fn distance_to(&self, other: &Self) -> f64 {
        haversine_distance(self, other)
    }

    /// Earth-centred cartesian position in metres, ignoring elevation.
    ///
    /// Straight-line (chord) distance between two of these points never exceeds
    /// the haversine distance, so a chord radius query is a superset of the
    /// matching great-circle query.
    pub fn to_cartesian(&self) -> [f64; 3] {
        let lat = self.latitude.to_radians();
        let lon = self.longitude.to_radians();
        [
            EARTH_RADIUS_M * lat.cos() * lon.cos(),
            EARTH_RADIUS_M * lat.cos() * lon.sin(),
            EARTH_RADIUS_M * lat.sin(),
        ]
    }
}

/// Haversine distance between two coordinates in metres.
pub fn haversine_distance(a: &Coordinate, b: &Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_M * c
}

/// Offset a coordinate by a number of metres east and north.
///
/// Uses a local flat-earth approximation, which is accurate to well under a
/// metre at resort scale.
pub fn offset_meters(origin: &Coordinate, east: f64, north: f64) -> Coordinate {
    let dlat = north / EARTH_RADIUS_M;
    let dlon = east / (EARTH_RADIUS_M * origin.latitude.to_radians().cos());
    Coordinate::new(
        origin.longitude + dlon.to_degrees(),
        origin.latitude + dlat.to_degrees(),
    )
}
