use bevy::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Linear lat/lng ↔ world XZ transform anchored at `origin`.
///
/// East is `+x`, north is `-z`. Heights are not mapped (`y` is always 0 on the
/// way in and ignored on the way out).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoMapping {
    pub origin: GeoPoint,
    pub units_per_degree_lat: f64,
    pub units_per_degree_lng: f64,
}

impl GeoMapping {
    pub fn to_world(&self, point: GeoPoint) -> Vec3 {
        let x = (point.lng - self.origin.lng) * self.units_per_degree_lng;
        let z = -(point.lat - self.origin.lat) * self.units_per_degree_lat;
        Vec3::new(x as f32, 0.0, z as f32)
    }

    pub fn to_geo(&self, position: Vec3) -> GeoPoint {
        GeoPoint {
            lat: self.origin.lat - position.z as f64 / self.units_per_degree_lat,
            lng: self.origin.lng + position.x as f64 / self.units_per_degree_lng,
        }
    }
}
