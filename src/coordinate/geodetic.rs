/// Geodetic coordinates: latitude and longitude in degrees, and height
/// above the ellipsoid in meters.
///
/// The latitude is physically meaningful only in [-90, 90], but this is not
/// enforced: Out-of-range values are converted by the same formulas as
/// everything else.
#[derive(Debug, Default, PartialEq, Copy, Clone)]
pub struct Geodetic {
    pub latitude: f64,
    pub longitude: f64,
    pub height: f64,
}

// ----- C O N S T R U C T O R S ---------------------------------------------

/// Constructors
impl Geodetic {
    /// A `Geodetic` from latitude/longitude/height, with the angular input in degrees
    #[must_use]
    pub fn new(latitude: f64, longitude: f64, height: f64) -> Geodetic {
        Geodetic {
            latitude,
            longitude,
            height,
        }
    }

    /// A `Geodetic` from latitude/longitude/height, with the angular input in radians
    #[must_use]
    pub fn from_radians(latitude: f64, longitude: f64, height: f64) -> Geodetic {
        Geodetic::new(latitude.to_degrees(), longitude.to_degrees(), height)
    }

    /// A `Geodetic` where absent elements are taken as 0
    #[must_use]
    pub fn from_options(
        latitude: Option<f64>,
        longitude: Option<f64>,
        height: Option<f64>,
    ) -> Geodetic {
        Geodetic::new(
            latitude.unwrap_or(0.0),
            longitude.unwrap_or(0.0),
            height.unwrap_or(0.0),
        )
    }

    /// A `Geodetic` consisting of 3 `NaN`s
    #[must_use]
    pub fn nan() -> Geodetic {
        Geodetic::new(f64::NAN, f64::NAN, f64::NAN)
    }
}

// ----- A C C E S S O R S ---------------------------------------------------

impl Geodetic {
    /// The (latitude, longitude, height) triplet, with angles in radians
    #[must_use]
    pub fn to_radians(&self) -> (f64, f64, f64) {
        (
            self.latitude.to_radians(),
            self.longitude.to_radians(),
            self.height,
        )
    }

    #[must_use]
    pub fn is_nan(&self) -> bool {
        self.latitude.is_nan() || self.longitude.is_nan() || self.height.is_nan()
    }
}

// ----- T E S T S ---------------------------------------------------
