//! WGS84 coordinates
use crate::prelude::Vector3;
use map_3d::{ecef2geodetic, geodetic2ecef, Ellipsoid};
use nalgebra::Matrix3;

/// [Position] expressed both in ECEF and geodetic coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    /// ECEF coordinates in meters
    pub(crate) ecef: Vector3<f64>,
    /// Geodetic coordinates: latitude and longitude in radians, height in meters
    pub(crate) geodetic: Vector3<f64>,
}

impl Position {
    /// Builds new [Position] from ECEF coordinates expressed in meter.
    pub fn from_ecef(ecef: Vector3<f64>) -> Self {
        let (lat, lon, h) = ecef2geodetic(ecef[0], ecef[1], ecef[2], Ellipsoid::WGS84);
        Self {
            ecef,
            geodetic: Vector3::new(lat, lon, h),
        }
    }

    /// Builds new [Position] from Geodetic coordinates
    /// - latitude [rad]
    /// - longitude [rad]
    /// - height above ellipsoid [m]
    pub fn from_geo(geodetic: Vector3<f64>) -> Self {
        let (x, y, z) = geodetic2ecef(geodetic[0], geodetic[1], geodetic[2], Ellipsoid::WGS84);
        Self {
            geodetic,
            ecef: Vector3::new(x, y, z),
        }
    }

    /// Returns ECEF coordinates (m).
    pub fn ecef(&self) -> Vector3<f64> {
        self.ecef
    }

    /// Returns Geodetic coordinates
    /// - latitude [rad]
    /// - longitude [rad]
    /// - height above ellipsoid [m]
    pub fn geodetic(&self) -> Vector3<f64> {
        self.geodetic
    }

    /// ECEF to local North East Down rotation matrix at this [Position].
    pub fn ecef_to_ned(&self) -> Matrix3<f64> {
        let (sin_lat, cos_lat) = self.geodetic[0].sin_cos();
        let (sin_lon, cos_lon) = self.geodetic[1].sin_cos();
        Matrix3::new(
            -sin_lat * cos_lon,
            -sin_lat * sin_lon,
            cos_lat,
            -sin_lon,
            cos_lon,
            0.0,
            -cos_lat * cos_lon,
            -cos_lat * sin_lon,
            -sin_lat,
        )
    }

    /// Local "down" unit vector, expressed in ECEF.
    pub fn down(&self) -> Vector3<f64> {
        self.ecef_to_ned().row(2).transpose()
    }

    /// Expresses an ECEF vector in the local NED frame.
    pub fn to_ned(&self, v: &Vector3<f64>) -> Vector3<f64> {
        self.ecef_to_ned() * v
    }

    /// Azimuth and elevation (radians) of `target` (ECEF m) seen from this [Position].
    /// Azimuth is counted clockwise from north, within [0, 2π).
    pub fn azimuth_elevation(&self, target: &Vector3<f64>) -> (f64, f64) {
        let ned = self.to_ned(&(target - self.ecef));
        let norm = ned.norm();
        let mut azimuth = ned[1].atan2(ned[0]);
        if azimuth < 0.0 {
            azimuth += 2.0 * std::f64::consts::PI;
        }
        let elevation = (-ned[2] / norm).asin();
        (azimuth, elevation)
    }
}
