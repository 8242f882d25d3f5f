use super::constants::ELLIPSOID_LIST;
use crate::internal::*;

/// An ellipsoid of revolution.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ellipsoid {
    a: f64,
    f: f64,
}

/// WGS84 is the default ellipsoid.
impl Default for Ellipsoid {
    fn default() -> Ellipsoid {
        Ellipsoid::raw(6_378_137.0, 1. / 298.257_223_563)
    }
}

impl EllipsoidBase for Ellipsoid {
    fn semimajor_axis(&self) -> f64 {
        self.a
    }

    fn flattening(&self) -> f64 {
        self.f
    }
}

/// Constructors for `Ellipsoid`
impl Ellipsoid {
    // Unchecked: only for parameters known to be valid
    const fn raw(semimajor_axis: f64, flattening: f64) -> Ellipsoid {
        Ellipsoid {
            a: semimajor_axis,
            f: flattening,
        }
    }

    /// User defined ellipsoid, given by its semimajor axis and flattening
    pub fn new(semimajor_axis: f64, flattening: f64) -> Result<Ellipsoid, Error> {
        let ellps = Ellipsoid::raw(semimajor_axis, flattening);
        ellps.validate()?;
        Ok(ellps)
    }

    /// User defined ellipsoid, given by its semimajor and semiminor axes
    pub fn from_semiaxes(semimajor_axis: f64, semiminor_axis: f64) -> Result<Ellipsoid, Error> {
        let (a, b) = (semimajor_axis, semiminor_axis);
        if b.is_nan() || b < 0.0 {
            return Err(Error::InvalidEllipsoid(format!(
                "semiminor axis must be non-negative, got {b}"
            )));
        }
        if b > a {
            return Err(Error::InvalidEllipsoid(format!(
                "semiminor axis {b} exceeds semimajor axis {a}"
            )));
        }
        Ellipsoid::new(a, (a - b) / a)
    }

    /// User defined ellipsoid, given by its semimajor axis and squared eccentricity
    pub fn from_eccentricity_squared(
        semimajor_axis: f64,
        eccentricity_squared: f64,
    ) -> Result<Ellipsoid, Error> {
        let es = eccentricity_squared;
        if !(0.0..1.0).contains(&es) {
            return Err(Error::InvalidEllipsoid(format!(
                "squared eccentricity must be in [0, 1), got {es}"
            )));
        }
        // b/a = sqrt(1 - e²)
        Ellipsoid::new(semimajor_axis, 1.0 - (1.0 - es).sqrt())
    }

    /// Predefined ellipsoid; built-in, or given as a string formatted
    /// (a, rf) tuple, e.g. "6378137, 298.25"
    pub fn named(name: &str) -> Result<Ellipsoid, Error> {
        // Is it one of the builtins?
        if let Some(&(_, a, rf, _)) = ELLIPSOID_LIST.iter().find(|ellps| ellps.0 == name) {
            let f = if rf != 0.0 { 1.0 / rf } else { rf };
            return Ok(Ellipsoid::raw(a, f));
        }

        // Remove optional parenthesis
        let name = name.trim();
        let name = name
            .strip_prefix('(')
            .and_then(|n| n.strip_suffix(')'))
            .unwrap_or(name);

        // The "semimajor, reciproque-flattening" form, e.g. "6378137, 298.3"
        let a_and_rf = name.split(',').collect::<Vec<_>>();
        if a_and_rf.len() == 2_usize {
            if let (Ok(a), Ok(rf)) = (
                a_and_rf[0].trim().parse::<f64>(),
                a_and_rf[1].trim().parse::<f64>(),
            ) {
                let f = if rf != 0.0 { 1.0 / rf } else { rf };
                return Ellipsoid::new(a, f);
            }
        }

        Err(Error::InvalidEllipsoid(format!("unknown ellipsoid '{name}'")))
    }

    /// The names of the builtin ellipsoids, with a short description
    pub fn builtins() -> impl Iterator<Item = (&'static str, &'static str)> {
        ELLIPSOID_LIST.iter().map(|e| (e.0, e.3))
    }
}

// ----- Tests ---------------------------------------------------------------------
