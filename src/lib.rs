//! *Conversion between geodetic and earth-centered, earth-fixed coordinates*.
//!
//! Geodetic coordinates (latitude, longitude, height above the ellipsoid) are
//! converted to ECEF cartesian coordinates by the classical closed form
//! expressions, and back again by fixed point iteration, for any reference
//! ellipsoid implementing [`EllipsoidBase`]. WGS84 is the default.
//!
//! ```
//! use geocentric::prelude::*;
//!
//! fn main() -> Result<(), Error> {
//!     let wgs84 = Converter::wgs84();
//!     let cart = wgs84.ecef(55., 12., 100.);
//!     let geo = wgs84.geodetic(cart.x(), cart.y(), cart.z())?;
//!     assert!((geo.latitude - 55.).abs() < 1e-9);
//!     assert!((geo.height - 100.).abs() < 1e-5);
//!     Ok(())
//! }
//! ```
//!
//! Angular quantities are given in degrees at the public interface, and in
//! radians only where the name of the operation says so
//! ([`Converter::ecef_from_radians`], [`Converter::geodetic_in_radians`]).
//! Lengths are always in meters.

mod converter;
mod coordinate;
mod ellipsoid;

pub use crate::converter::Converter;
pub use crate::converter::Solution;
pub use crate::converter::DEFAULT_MAX_ITERATIONS;
pub use crate::converter::DEFAULT_TOLERANCE;
pub use crate::coordinate::ecef::Ecef;
pub use crate::coordinate::geodetic::Geodetic;
pub use crate::ellipsoid::descriptor::EllipsoidDescriptor;
pub use crate::ellipsoid::Ellipsoid;
pub use crate::ellipsoid::EllipsoidBase;

/// Preamble for users of the crate
pub mod prelude {
    pub use crate::Converter;
    pub use crate::Ecef;
    pub use crate::Ellipsoid;
    pub use crate::EllipsoidBase;
    pub use crate::EllipsoidDescriptor;
    pub use crate::Error;
    pub use crate::Geodetic;
    pub use crate::Solution;
}

/// Preamble for crate-internal modules
pub(crate) mod internal {
    pub use crate::prelude::*;
    pub use log::debug;
    pub use log::trace;
    pub use log::warn;
    pub use std::f64::consts::FRAC_PI_2;
}

use thiserror::Error;

/// The errors reported by the library.
#[derive(Error, Debug)]
pub enum Error {
    /// Ellipsoid parameters violating `a > 0`, `0 <= b <= a`, `0 <= e² < 1`,
    /// or an ellipsoid name that cannot be resolved
    #[error("invalid ellipsoid: {0}")]
    InvalidEllipsoid(String),

    /// The geodetic iteration did not reach the requested tolerance within
    /// the allowed number of iterations. `estimate` is the last (unconverged)
    /// result, `residual` the last height correction in meters.
    #[error("no convergence after {iterations} iterations (last height correction {residual} m)")]
    NonConvergence {
        iterations: usize,
        residual: f64,
        estimate: Geodetic,
    },

    /// Iteration settings that can never be met: a zero iteration limit, or a
    /// negative or NaN tolerance
    #[error("invalid iteration setting: {0}")]
    InvalidSetting(String),

    /// The center of the ellipsoid has no meaningful geodetic coordinates
    #[error("the coordinate origin has no geodetic representation")]
    Origin,
}

/// Literature, that has been useful in designing and implementing this library.
pub enum Bibliography {
    /// W.A. Heiskanen and H. Moritz (1967): *Physical Geodesy*.
    /// W.H. Freeman and Company, San Francisco.
    Hei67,
}
