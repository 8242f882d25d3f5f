//! The two coordinate representations handled by the crate:
//! [`Geodetic`](geodetic::Geodetic) (latitude and longitude in degrees,
//! height above the ellipsoid in meters) and [`Ecef`](ecef::Ecef)
//! (earth-centered, earth-fixed cartesian, in meters).

pub mod ecef;
pub mod geodetic;
