use crate::internal::*;

/// The default upper limit for the number of iterations in [`Converter::solve`]
pub const DEFAULT_MAX_ITERATIONS: usize = 50;

/// The default convergence criterion for [`Converter::solve`]: The iteration
/// stops when the height changes by no more than this many meters
pub const DEFAULT_TOLERANCE: f64 = 1e-4;

/// Geodetic <--> ECEF conversion, with respect to one ellipsoid.
///
/// A `Converter` is a plain value: Binding another ellipsoid is done
/// either by building a new converter ([`Converter::with_ellipsoid`]), or
/// by [`Converter::set_ellipsoid`], which requires exclusive access.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Converter<E: EllipsoidBase = Ellipsoid> {
    ellps: E,
    max_iterations: usize,
    tolerance: f64,
}

/// WGS84 is the default ellipsoid.
impl Default for Converter {
    fn default() -> Converter {
        Converter::wgs84()
    }
}

/// The result of the cartesian-to-geodetic iteration. Angles in radians.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Solution {
    pub latitude: f64,
    pub longitude: f64,
    pub height: f64,
    /// Number of iterations needed to meet the tolerance. Zero for the
    /// cases handled without iteration (points on the Z axis, NaN input)
    pub iterations: usize,
}

impl Solution {
    fn nan() -> Solution {
        Solution {
            latitude: f64::NAN,
            longitude: f64::NAN,
            height: f64::NAN,
            iterations: 0,
        }
    }

    /// The solution, with angles converted to degrees
    #[must_use]
    pub fn geodetic(&self) -> Geodetic {
        Geodetic::from_radians(self.latitude, self.longitude, self.height)
    }
}

// ----- Constructors and accessors for the default ellipsoid type -----------------

impl Converter {
    /// A converter bound to WGS84, with default iteration settings
    #[must_use]
    pub fn wgs84() -> Converter {
        Converter {
            ellps: Ellipsoid::default(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    /// A converter bound to the ellipsoid given by `descriptor`
    pub fn from_descriptor(descriptor: &EllipsoidDescriptor) -> Result<Converter, Error> {
        Converter::new(descriptor.resolve()?)
    }

    /// A converter bound to a builtin ellipsoid, or one given in the
    /// "a, rf" form, cf. [`Ellipsoid::named`]
    pub fn named(name: &str) -> Result<Converter, Error> {
        Converter::new(Ellipsoid::named(name)?)
    }

    /// Rebind the ellipsoid. On failure, the current ellipsoid is retained.
    pub fn set_ellipsoid(&mut self, descriptor: &EllipsoidDescriptor) -> Result<(), Error> {
        let ellps = descriptor.resolve()?;
        debug!("rebinding ellipsoid: {descriptor:?} -> {ellps:?}");
        self.ellps = ellps;
        Ok(())
    }
}

// ----- Generic construction and configuration ------------------------------------

impl<E: EllipsoidBase> Converter<E> {
    /// A converter bound to `ellps`, with default iteration settings
    pub fn new(ellps: E) -> Result<Converter<E>, Error> {
        ellps.validate()?;
        debug!(
            "binding ellipsoid: a = {}, f = {}",
            ellps.semimajor_axis(),
            ellps.flattening()
        );
        Ok(Converter {
            ellps,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
        })
    }

    /// A new converter with the same iteration settings, but bound to `ellps`
    pub fn with_ellipsoid<F: EllipsoidBase>(self, ellps: F) -> Result<Converter<F>, Error> {
        let mut converter = Converter::new(ellps)?;
        converter.max_iterations = self.max_iterations;
        converter.tolerance = self.tolerance;
        Ok(converter)
    }

    /// Set the upper limit for the number of iterations in [`Converter::solve`].
    ///
    /// # Errors
    ///
    /// [`Error::InvalidSetting`] if `max_iterations` is zero
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Result<Converter<E>, Error> {
        if max_iterations == 0 {
            return Err(Error::InvalidSetting(String::from(
                "at least one iteration is needed",
            )));
        }
        self.max_iterations = max_iterations;
        Ok(self)
    }

    /// Set the height convergence criterion (in meters) for [`Converter::solve`].
    ///
    /// # Errors
    ///
    /// [`Error::InvalidSetting`] if `tolerance` is negative or NaN
    pub fn with_tolerance(mut self, tolerance: f64) -> Result<Converter<E>, Error> {
        if !(tolerance >= 0.0) {
            return Err(Error::InvalidSetting(format!(
                "tolerance must be non-negative, got {tolerance}"
            )));
        }
        self.tolerance = tolerance;
        Ok(self)
    }

    #[must_use]
    pub fn ellipsoid(&self) -> &E {
        &self.ellps
    }

    #[must_use]
    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    #[must_use]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }
}

// ----- Geodetic to cartesian -----------------------------------------------------

impl<E: EllipsoidBase> Converter<E> {
    /// Geodetic to cartesian conversion, with latitude and longitude in degrees.
    ///
    /// Non-finite input gives non-finite output.
    #[must_use]
    pub fn ecef(&self, latitude: f64, longitude: f64, height: f64) -> Ecef {
        self.ecef_from_radians(latitude.to_radians(), longitude.to_radians(), height)
    }

    /// Geodetic to cartesian conversion, with latitude and longitude in radians.
    ///
    /// Follows Heiskanen & Moritz ([1967](crate::Bibliography::Hei67)).
    #[must_use]
    #[allow(non_snake_case)] // make it possible to mimic math notation from the literature
    pub fn ecef_from_radians(&self, latitude: f64, longitude: f64, height: f64) -> Ecef {
        let (phi, lam, h) = (latitude, longitude, height);

        let N = self.ellps.prime_vertical_radius_of_curvature(phi);
        // b²/a²
        let ar2 = self.ellps.aspect_ratio().powi(2);
        let (sinphi, cosphi) = phi.sin_cos();
        let (sinlam, coslam) = lam.sin_cos();

        let X = (N + h) * cosphi * coslam;
        let Y = (N + h) * cosphi * sinlam;
        let Z = (ar2 * N + h) * sinphi;

        Ecef([X, Y, Z])
    }

    /// Geodetic to cartesian conversion of a [`Geodetic`] (i.e. degrees)
    #[must_use]
    pub fn to_ecef(&self, geodetic: &Geodetic) -> Ecef {
        self.ecef(geodetic.latitude, geodetic.longitude, geodetic.height)
    }
}

// ----- Cartesian to geodetic -----------------------------------------------------

impl<E: EllipsoidBase> Converter<E> {
    /// Cartesian to geodetic conversion, returning latitude and longitude in degrees
    pub fn geodetic(&self, x: f64, y: f64, z: f64) -> Result<Geodetic, Error> {
        Ok(self.solve(x, y, z)?.geodetic())
    }

    /// Cartesian to geodetic conversion, returning the
    /// (latitude, longitude, height) triplet with the angles in radians
    pub fn geodetic_in_radians(&self, x: f64, y: f64, z: f64) -> Result<(f64, f64, f64), Error> {
        let s = self.solve(x, y, z)?;
        Ok((s.latitude, s.longitude, s.height))
    }

    /// Cartesian to geodetic conversion of an [`Ecef`]
    pub fn to_geodetic(&self, ecef: &Ecef) -> Result<Geodetic, Error> {
        self.geodetic(ecef.x(), ecef.y(), ecef.z())
    }

    /// Cartesian to geodetic conversion by fixed point iteration on the
    /// latitude (cf. Heiskanen & Moritz [1967](crate::Bibliography::Hei67)),
    /// stopping when the height correction falls below the tolerance.
    ///
    /// Points on the Z axis are handled in closed form, with the longitude
    /// set to 0. Non-finite input gives a NaN solution.
    ///
    /// # Errors
    ///
    /// [`Error::Origin`] for the center of the ellipsoid, and
    /// [`Error::NonConvergence`] if the tolerance is not met within the
    /// maximum number of iterations.
    #[allow(non_snake_case)] // make it possible to mimic math notation from the literature
    pub fn solve(&self, x: f64, y: f64, z: f64) -> Result<Solution, Error> {
        if !(x.is_finite() && y.is_finite() && z.is_finite()) {
            return Ok(Solution::nan());
        }

        let es = self.ellps.eccentricity_squared();

        // The longitude is straightforward: Plain geometry in the equatorial plane
        let lam = y.atan2(x);

        // The perpendicular distance from the point coordinate to the Z-axis
        // (HM eq. 5-28)
        let p = x.hypot(y);

        // If we're this close to the Z-axis, we force the latitude to the
        // relevant pole, and compute the height as |Z| - b
        let cutoff = self.ellps.semimajor_axis() * 1e-16;
        if p < cutoff {
            if z.abs() < cutoff {
                return Err(Error::Origin);
            }
            let phi = FRAC_PI_2.copysign(z);
            let h = z.abs() - self.ellps.semiminor_axis();
            trace!("polar axis: phi = {phi}, h = {h}");
            return Ok(Solution {
                latitude: phi,
                longitude: 0.0,
                height: h,
                iterations: 0,
            });
        }

        let t = z / p;
        let aa = self.ellps.semimajor_axis().powi(2);

        // The height above the ellipsoid, at latitude phi, for the point (p, z).
        // Unlike p/cos(phi) - N, this stays well behaved near the Z-axis
        let height = |phi: f64, N: f64| {
            let (sinphi, cosphi) = phi.sin_cos();
            p * cosphi + z * sinphi - aa / N
        };

        // A crude seed, but the iteration takes it from there
        let mut phi = t.atan2(0.01);
        let mut N = self.ellps.prime_vertical_radius_of_curvature(phi);
        let mut h = height(phi, N);

        let mut residual = f64::INFINITY;
        for i in 1..=self.max_iterations {
            let previous = h;
            phi = t.atan2(1.0 - es * N / (N + h));
            N = self.ellps.prime_vertical_radius_of_curvature(phi);
            h = height(phi, N);
            residual = (h - previous).abs();
            trace!("iteration {i}: phi = {phi}, h = {h}, dh = {residual}");
            if residual <= self.tolerance {
                return Ok(Solution {
                    latitude: phi,
                    longitude: lam,
                    height: h,
                    iterations: i,
                });
            }
        }

        warn!(
            "no convergence for ({x}, {y}, {z}) after {} iterations, dh = {residual}",
            self.max_iterations
        );
        Err(Error::NonConvergence {
            iterations: self.max_iterations,
            residual,
            estimate: Geodetic::from_radians(phi, lam, h),
        })
    }
}

// ----- Tests ---------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::assert_float_eq;

    #[test]
    fn equator_and_poles() -> Result<(), Error> {
        let wgs84 = Converter::wgs84();
        let a = wgs84.ellipsoid().semimajor_axis();
        let b = wgs84.ellipsoid().semiminor_axis();

        // Exact on the equator/prime meridian
        assert_eq!(wgs84.ecef(0., 0., 0.), Ecef::raw(a, 0., 0.));

        // Floating point noise at the pole
        let pole = wgs84.ecef(90., 0., 0.);
        assert_float_eq!(pole.0, [0., 0., b], abs_all <= 1e-9);
        let pole = wgs84.ecef(-90., 0., 0.);
        assert_float_eq!(pole.0, [0., 0., -b], abs_all <= 1e-9);
        Ok(())
    }

    #[test]
    fn known_values() -> Result<(), Error> {
        let wgs84 = Converter::wgs84();
        let cart = wgs84.ecef(39.197807, -77.108574, 55.);
        let expected = [1_104_259.070_939_718_3, -4_824_765.955_871_677, 4_009_394.028_186_884_7];
        assert_float_eq!(cart.0, expected, abs_all <= 1e-6);

        let geo = wgs84.geodetic(expected[0], expected[1], expected[2])?;
        assert_float_eq!(geo.latitude, 39.197807, abs <= 1e-10);
        assert_float_eq!(geo.longitude, -77.108574, abs <= 1e-10);
        assert_float_eq!(geo.height, 55., abs <= 1e-5);

        // GRS80 values, as given by the cart operator of Rust Geodesy
        let grs80 = Converter::named("GRS80")?;
        let geo = [
            Geodetic::new(85., 0., 100000.),
            Geodetic::new(55., 10., -100000.),
            Geodetic::new(25., 20., 0.),
            Geodetic::new(0., -20., 0.),
            Geodetic::new(-25., 20., 10.),
        ];
        let cart = [
            [566_462.633_537_476_8, 0.0, 6_432_020.333_690_127],
            [3_554_403.475_871_930_4, 626_737.233_120_170_7, 5_119_468.318_659_256],
            [5_435_195.382_145_216, 1_978_249.336_521_975_5, 2_679_074.462_877_277_8],
            [5_993_488.273_261_571, -2_181_451.330_890_750_5, 0.],
            [5_435_203.898_652_612, 1_978_252.436_277_167_4, -2_679_078.689_059_895],
        ];
        for i in 0..geo.len() {
            let c = grs80.to_ecef(&geo[i]);
            assert_float_eq!(c.0, cart[i], abs_all <= 1e-6);
            let g = grs80.to_geodetic(&c)?;
            assert_float_eq!(g.latitude, geo[i].latitude, abs <= 1e-10);
            assert_float_eq!(g.longitude, geo[i].longitude, abs <= 1e-10);
            assert_float_eq!(g.height, geo[i].height, abs <= 1e-5);
        }
        Ok(())
    }

    #[test]
    fn radians_and_degrees_agree() -> Result<(), Error> {
        let wgs84 = Converter::wgs84();
        let deg = wgs84.ecef(55., 12., 100.);
        let rad = wgs84.ecef_from_radians(55_f64.to_radians(), 12_f64.to_radians(), 100.);
        assert_eq!(deg, rad);
        assert_eq!(deg, wgs84.to_ecef(&Geodetic::new(55., 12., 100.)));

        let (lat, lon, h) = wgs84.geodetic_in_radians(deg.x(), deg.y(), deg.z())?;
        let geo = wgs84.geodetic(deg.x(), deg.y(), deg.z())?;
        assert_eq!(geo, Geodetic::from_radians(lat, lon, h));
        assert_float_eq!(lat, 55_f64.to_radians(), abs <= 1e-12);
        assert_float_eq!(lon, 12_f64.to_radians(), abs <= 1e-12);
        Ok(())
    }

    #[test]
    fn absent_arguments() {
        let wgs84 = Converter::wgs84();
        let origin = Geodetic::from_options(None, None, None);
        let a = wgs84.ellipsoid().semimajor_axis();
        assert_eq!(wgs84.to_ecef(&origin), Ecef::raw(a, 0., 0.));
        let high = Geodetic::from_options(None, None, Some(1000.));
        assert_eq!(wgs84.to_ecef(&high), Ecef::raw(a + 1000., 0., 0.));
    }

    #[test]
    fn unit_sphere() -> Result<(), Error> {
        let sphere = Converter::new(Ellipsoid::from_semiaxes(1., 1.)?)?;
        for lat in (-90..=90).step_by(15) {
            for lon in (-180..=180).step_by(30) {
                let c = sphere.ecef(lat as f64, lon as f64, 0.);
                assert_float_eq!(c.norm(), 1.0, abs <= 1e-14);
            }
        }

        // On a sphere, the iteration has nothing to refine
        let c = sphere.ecef(30., 40., 0.5);
        let s = sphere.solve(c.x(), c.y(), c.z())?;
        assert!(s.iterations <= 2);
        assert_float_eq!(s.geodetic().latitude, 30., abs <= 1e-12);
        assert_float_eq!(s.height, 0.5, abs <= 1e-12);
        Ok(())
    }

    #[test]
    fn convergence() -> Result<(), Error> {
        let wgs84 = Converter::wgs84();
        for lat in [-89.9, -60., -30., -1e-6, 0., 1e-6, 15., 45., 75., 89.9] {
            for h in [-1000., 0., 8848., 100_000.] {
                let c = wgs84.ecef(lat, 33., h);
                let s = wgs84.solve(c.x(), c.y(), c.z())?;
                assert!(s.iterations >= 1);
                assert!(s.iterations <= 10, "{lat} {h}: {}", s.iterations);
            }
        }

        // Forcing a premature stop gives the last estimate, and an error
        let c = wgs84.ecef(45., 10., 0.);
        let hasty = wgs84.with_max_iterations(1)?;
        match hasty.solve(c.x(), c.y(), c.z()) {
            Err(Error::NonConvergence {
                iterations,
                residual,
                estimate,
            }) => {
                assert_eq!(iterations, 1);
                assert!(residual > hasty.tolerance());
                assert_float_eq!(estimate.longitude, 10., abs <= 1e-12);
                assert!((estimate.latitude - 45.).abs() < 1.);
            }
            other => panic!("expected NonConvergence, got {other:?}"),
        }

        // A zero tolerance is strict, but reachable
        let strict = wgs84.with_tolerance(0.0)?;
        let geo = strict.geodetic(c.x(), c.y(), c.z())?;
        assert_float_eq!(geo.latitude, 45., abs <= 1e-12);
        Ok(())
    }

    #[test]
    fn iteration_settings() -> Result<(), Error> {
        let wgs84 = Converter::wgs84();
        assert_eq!(wgs84.max_iterations(), DEFAULT_MAX_ITERATIONS);
        assert_eq!(wgs84.tolerance(), DEFAULT_TOLERANCE);

        let tuned = wgs84.with_max_iterations(7)?.with_tolerance(1e-6)?;
        assert_eq!(tuned.max_iterations(), 7);
        assert_eq!(tuned.tolerance(), 1e-6);

        // Settings that could never be met are rejected up front
        for tolerance in [-1.0, f64::NAN, f64::NEG_INFINITY] {
            assert!(matches!(
                wgs84.with_tolerance(tolerance),
                Err(Error::InvalidSetting(_))
            ));
        }
        assert!(matches!(
            wgs84.with_max_iterations(0),
            Err(Error::InvalidSetting(_))
        ));

        // Rebinding keeps the settings
        let intl = tuned.with_ellipsoid(Ellipsoid::named("intl")?)?;
        assert_eq!(intl.max_iterations(), 7);
        assert_eq!(intl.tolerance(), 1e-6);
        Ok(())
    }

    #[test]
    fn degenerate_input() -> Result<(), Error> {
        let wgs84 = Converter::wgs84();
        let b = wgs84.ellipsoid().semiminor_axis();

        // On the polar axis
        let north = wgs84.geodetic(0., 0., b + 100.)?;
        assert_eq!(north.latitude, 90.);
        assert_eq!(north.longitude, 0.);
        assert_float_eq!(north.height, 100., abs <= 1e-8);

        let south = wgs84.solve(0., -0., -b)?;
        assert_eq!(south.latitude, -FRAC_PI_2);
        assert_eq!(south.longitude, 0.);
        assert_eq!(south.iterations, 0);
        assert_float_eq!(south.height, 0., abs <= 1e-8);

        // The center of the earth
        assert!(matches!(wgs84.geodetic(0., 0., 0.), Err(Error::Origin)));
        Ok(())
    }

    #[test]
    fn close_to_the_polar_axis() -> Result<(), Error> {
        let wgs84 = Converter::wgs84();
        let b = wgs84.ellipsoid().semiminor_axis();

        // Just outside the cutoff for the closed form polar case, cos(phi)
        // is mostly rounding noise, so the height must not depend on it
        for z in [6_356_752.3, b + 1000., -b + 10.] {
            for offset in [1e-9, 1e-6, 1e-3] {
                let s = wgs84.solve(offset, 0., z)?;
                assert_float_eq!(s.height, z.abs() - b, abs <= 1e-3);
                assert_float_eq!(s.latitude.abs(), FRAC_PI_2, abs <= 1e-9);
                assert_eq!(s.latitude.signum(), z.signum());

                let s = wgs84.solve(0., -offset, z)?;
                assert_float_eq!(s.height, z.abs() - b, abs <= 1e-3);
            }
        }

        // ...and the height round trips for the polar cap in general
        for lat in [89.9, 89.99999, 89.9999999, -89.9999999] {
            let c = wgs84.ecef(lat, 120., 250.);
            let geo = wgs84.to_geodetic(&c)?;
            assert_float_eq!(geo.height, 250., abs <= 1e-5);
            assert_float_eq!(geo.latitude, lat, abs <= 1e-9);
        }
        Ok(())
    }

    #[test]
    fn non_finite_input() -> Result<(), Error> {
        let wgs84 = Converter::wgs84();
        assert!(!wgs84.ecef(f64::NAN, 0., 0.).is_finite());
        assert!(wgs84.ecef(0., 0., f64::NAN).0.iter().all(|c| c.is_nan()));
        assert_eq!(wgs84.ecef(0., 0., f64::INFINITY).x(), f64::INFINITY);

        assert!(wgs84.geodetic(f64::NAN, 0., 0.)?.is_nan());
        assert!(wgs84.geodetic(0., f64::INFINITY, 0.)?.is_nan());
        Ok(())
    }

    #[test]
    fn rebinding() -> Result<(), Error> {
        let mut conv = Converter::wgs84().with_max_iterations(20)?;
        let wgs84 = conv;
        let before = conv.ecef(55., 12., 0.);

        conv.set_ellipsoid(&EllipsoidDescriptor::from("intl"))?;
        assert_eq!(conv.ellipsoid().flattening(), 1. / 297.);
        assert_eq!(conv.max_iterations(), 20);
        assert_ne!(conv.ecef(55., 12., 0.), before);

        // The copy taken before rebinding is unaffected
        assert_eq!(wgs84.ecef(55., 12., 0.), before);

        // A failed rebind changes nothing
        let bad = EllipsoidDescriptor::Semiaxes { a: 1., b: 2. };
        assert!(matches!(conv.set_ellipsoid(&bad), Err(Error::InvalidEllipsoid(_))));
        assert_eq!(conv.ellipsoid().flattening(), 1. / 297.);

        let again = conv.with_ellipsoid(Ellipsoid::default())?;
        assert_eq!(again, wgs84);
        assert!(conv.with_ellipsoid(Ellipsoid::named("unitsphere")?).is_ok());
        Ok(())
    }

    #[test]
    fn invalid_ellipsoids() {
        assert!(matches!(
            Converter::from_descriptor(&EllipsoidDescriptor::Semiaxes { a: 0., b: 0. }),
            Err(Error::InvalidEllipsoid(_))
        ));
        assert!(matches!(
            Converter::from_descriptor(&EllipsoidDescriptor::Semiaxes { a: 1., b: 2. }),
            Err(Error::InvalidEllipsoid(_))
        ));
        assert!(matches!(
            Converter::named("Middle Earth"),
            Err(Error::InvalidEllipsoid(_))
        ));
    }
}
