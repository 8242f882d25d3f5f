use std::ops::{Index, IndexMut, Sub};

/// Earth-centered, earth-fixed cartesian coordinates, *(X, Y, Z)*, in meters.
/// The Z axis points toward the north pole, the X axis toward the
/// intersection of the prime meridian and the equator.
#[derive(Debug, Default, PartialEq, Copy, Clone)]
pub struct Ecef(pub [f64; 3]);

impl Index<usize> for Ecef {
    type Output = f64;
    fn index(&self, i: usize) -> &Self::Output {
        &self.0[i]
    }
}

impl IndexMut<usize> for Ecef {
    fn index_mut(&mut self, i: usize) -> &mut Self::Output {
        &mut self.0[i]
    }
}

impl Sub for Ecef {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Ecef([self[0] - other[0], self[1] - other[1], self[2] - other[2]])
    }
}

impl From<(f64, f64, f64)> for Ecef {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Ecef([x, y, z])
    }
}

impl From<Ecef> for (f64, f64, f64) {
    fn from(ecef: Ecef) -> Self {
        (ecef[0], ecef[1], ecef[2])
    }
}

// ----- C O N S T R U C T O R S ---------------------------------------------

/// Constructors
impl Ecef {
    /// An `Ecef` from its X, Y, and Z components
    #[must_use]
    pub fn raw(x: f64, y: f64, z: f64) -> Ecef {
        Ecef([x, y, z])
    }

    /// An `Ecef` consisting of 3 `NaN`s
    #[must_use]
    pub fn nan() -> Ecef {
        Ecef([f64::NAN; 3])
    }

    /// The center of the ellipsoid
    #[must_use]
    pub fn origin() -> Ecef {
        Ecef([0., 0., 0.])
    }
}

// ----- A C C E S S O R S ---------------------------------------------------

impl Ecef {
    #[must_use]
    pub fn x(&self) -> f64 {
        self.0[0]
    }

    #[must_use]
    pub fn y(&self) -> f64 {
        self.0[1]
    }

    #[must_use]
    pub fn z(&self) -> f64 {
        self.0[2]
    }

    /// The perpendicular distance from the point to the Z axis
    #[must_use]
    pub fn polar_distance(&self) -> f64 {
        self[0].hypot(self[1])
    }

    /// The distance from the point to the origin
    #[must_use]
    pub fn norm(&self) -> f64 {
        self[0].hypot(self[1]).hypot(self[2])
    }

    /// Euclidean distance between two points
    #[must_use]
    pub fn hypot3(&self, other: &Ecef) -> f64 {
        (*self - *other).norm()
    }

    /// True if all components are finite
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|c| c.is_finite())
    }
}

// ----- T E S T S ---------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distances() {
        let a = Ecef::raw(3., 4., 12.);
        assert_eq!(a.polar_distance(), 5.);
        assert_eq!(a.norm(), 13.);
        assert_eq!(a.hypot3(&Ecef::origin()), 13.);
        assert_eq!(a.hypot3(&a), 0.);
    }

    #[test]
    fn conversions() {
        let mut a = Ecef::from((1., 2., 3.));
        assert_eq!((a.x(), a.y(), a.z()), (1., 2., 3.));
        a[2] = 4.;
        let (x, y, z) = a.into();
        assert_eq!([x, y, z], [1., 2., 4.]);
        assert!(a.is_finite());
        assert!(!Ecef::nan().is_finite());
        assert!(!Ecef::raw(f64::INFINITY, 0., 0.).is_finite());
    }
}
