//! Coordinates and the rectangular approximation used for distance search.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

pub const EARTH_RADIUS_KM: f64 = 6_378.137;

const MIN_LATITUDE: f64 = -90.0;
const MAX_LATITUDE: f64 = 90.0;
const MIN_LONGITUDE: f64 = -180.0;
const MAX_LONGITUDE: f64 = 180.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
	pub latitude: f64,
	pub longitude: f64,
}

/// Axis-aligned latitude/longitude box around a circle of a given radius.
///
/// The box is a fast approximation: it over-covers the circle near its corners, and its
/// complement is "outside the box", not "outside the circle". Both edges are clamped to the valid
/// coordinate range, so boxes near a pole or the antimeridian are truncated rather than wrapped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
	pub min_latitude: f64,
	pub max_latitude: f64,
	pub min_longitude: f64,
	pub max_longitude: f64,
}
impl BoundingBox {
	pub fn around(origin: Coordinates, radius_km: f64) -> Self {
		let delta = radius_km * degrees_per_km();
		let min_latitude = clamp(origin.latitude - delta, MIN_LATITUDE, MAX_LATITUDE);
		let max_latitude = clamp(origin.latitude + delta, MIN_LATITUDE, MAX_LATITUDE);
		// Meridians converge towards the poles, so one km spans more longitude at the edge.
		let min_longitude = clamp(
			origin.longitude - delta / min_latitude.to_radians().cos(),
			MIN_LONGITUDE,
			MAX_LONGITUDE,
		);
		let max_longitude = clamp(
			origin.longitude + delta / max_latitude.to_radians().cos(),
			MIN_LONGITUDE,
			MAX_LONGITUDE,
		);

		Self { min_latitude, max_latitude, min_longitude, max_longitude }
	}

	/// Strict membership, matching the compiled predicate.
	pub fn contains(&self, point: Coordinates) -> bool {
		point.latitude < self.max_latitude
			&& point.latitude > self.min_latitude
			&& point.longitude < self.max_longitude
			&& point.longitude > self.min_longitude
	}
}

/// Degrees of latitude spanned by one kilometre.
pub fn degrees_per_km() -> f64 {
	1.0 / ((2.0 * PI / 360.0) * EARTH_RADIUS_KM)
}

fn clamp(value: f64, min: f64, max: f64) -> f64 {
	value.max(min).min(max)
}
