use crate::internal::*;

mod biaxial;
mod constants;
pub mod descriptor;

pub use biaxial::Ellipsoid;

/// The shape and size of an ellipsoid of revolution. Implementors provide the
/// two defining parameters, everything else follows.
pub trait EllipsoidBase {
    /// The semimajor axis, *a*
    fn semimajor_axis(&self) -> f64;

    /// The flattening, *f = (a - b)/a*
    fn flattening(&self) -> f64;

    // ----- Size and shape --------------------------------------------------------

    /// The semiminor axis, *b*
    #[must_use]
    fn semiminor_axis(&self) -> f64 {
        self.semimajor_axis() * (1.0 - self.flattening())
    }

    /// The aspect ratio, *b / a  =  1 - f  =  sqrt(1 - e²)*
    #[must_use]
    fn aspect_ratio(&self) -> f64 {
        1.0 - self.flattening()
    }

    // ----- Eccentricities --------------------------------------------------------

    /// The squared eccentricity *e² = (a² - b²) / a²*.
    #[must_use]
    fn eccentricity_squared(&self) -> f64 {
        let f = self.flattening();
        f * (2_f64 - f)
    }

    /// The eccentricity *e*
    #[must_use]
    fn eccentricity(&self) -> f64 {
        self.eccentricity_squared().sqrt()
    }

    /// The squared second eccentricity *e'² = (a² - b²) / b² = e² / (1 - e²)*
    #[must_use]
    fn second_eccentricity_squared(&self) -> f64 {
        let es = self.eccentricity_squared();
        es / (1.0 - es)
    }

    // ----- Curvatures ------------------------------------------------------------

    /// The radius of curvature in the prime vertical, *N*
    #[must_use]
    fn prime_vertical_radius_of_curvature(&self, latitude: f64) -> f64 {
        if self.flattening() == 0.0 {
            return self.semimajor_axis();
        }
        self.semimajor_axis()
            / (1.0 - latitude.sin().powi(2) * self.eccentricity_squared()).sqrt()
    }

    /// The meridian radius of curvature, *M*
    #[must_use]
    fn meridian_radius_of_curvature(&self, latitude: f64) -> f64 {
        if self.flattening() == 0.0 {
            return self.semimajor_axis();
        }
        let num = self.semimajor_axis() * (1.0 - self.eccentricity_squared());
        let denom = (1.0 - latitude.sin().powi(2) * self.eccentricity_squared()).powf(1.5);
        num / denom
    }

    /// The polar radius of curvature, *c*
    #[must_use]
    fn polar_radius_of_curvature(&self) -> f64 {
        let a = self.semimajor_axis();
        a * a / self.semiminor_axis()
    }

    // ----- Sanity ----------------------------------------------------------------

    /// Check the invariants `a > 0`, `0 <= b <= a`, and `0 <= e² < 1`
    fn validate(&self) -> Result<(), Error> {
        let a = self.semimajor_axis();
        let f = self.flattening();
        if !a.is_finite() || a <= 0.0 {
            return Err(Error::InvalidEllipsoid(format!(
                "semimajor axis must be positive and finite, got {a}"
            )));
        }
        if !f.is_finite() || f < 0.0 {
            return Err(Error::InvalidEllipsoid(format!(
                "semiminor axis exceeds semimajor axis (flattening {f})"
            )));
        }
        if f >= 1.0 {
            return Err(Error::InvalidEllipsoid(format!(
                "semiminor axis must be positive (flattening {f})"
            )));
        }
        Ok(())
    }
}

// ----- Tests ---------------------------------------------------------------------
