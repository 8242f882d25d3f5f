use crate::internal::*;
use std::str::FromStr;

/// The ways an ellipsoid can be specified when binding a [`Converter`].
///
/// A descriptor is just a recipe: it is resolved to an [`Ellipsoid`] (and
/// its invariants checked) by [`EllipsoidDescriptor::resolve`].
#[derive(Clone, Debug, Default, PartialEq)]
pub enum EllipsoidDescriptor {
    /// WGS84
    #[default]
    Default,
    /// A builtin ellipsoid, or the "a, rf" form accepted by [`Ellipsoid::named`]
    Named(String),
    Semiaxes { a: f64, b: f64 },
    Flattening { a: f64, f: f64 },
    ReciprocalFlattening { a: f64, rf: f64 },
    EccentricitySquared { a: f64, e2: f64 },
}

impl EllipsoidDescriptor {
    pub fn resolve(&self) -> Result<Ellipsoid, Error> {
        use EllipsoidDescriptor::*;
        match self {
            Default => Ok(Ellipsoid::default()),
            Named(name) => Ellipsoid::named(name),
            Semiaxes { a, b } => Ellipsoid::from_semiaxes(*a, *b),
            Flattening { a, f } => Ellipsoid::new(*a, *f),
            ReciprocalFlattening { a, rf } => {
                let f = if *rf != 0.0 { 1.0 / rf } else { 0.0 };
                Ellipsoid::new(*a, f)
            }
            EccentricitySquared { a, e2 } => Ellipsoid::from_eccentricity_squared(*a, *e2),
        }
    }
}

impl From<&str> for EllipsoidDescriptor {
    fn from(name: &str) -> Self {
        EllipsoidDescriptor::Named(name.to_string())
    }
}

/// Parse a descriptor from one of the forms
///
/// - `""` or `"default"`: WGS84
/// - `"GRS80"`, `"6378137, 298.25"`: see [`Ellipsoid::named`]
/// - `"a=6378137 b=6356752.314"`: key=value pairs, where `a` is required,
///   and at most one of `b`, `f`, `rf`, `e2` gives the shape. With none of
///   them, the ellipsoid is a sphere of radius `a`
impl FromStr for EllipsoidDescriptor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s == "default" {
            return Ok(EllipsoidDescriptor::Default);
        }
        if !s.contains('=') {
            return Ok(EllipsoidDescriptor::Named(s.to_string()));
        }

        let mut a = None;
        let mut shape = Vec::new();
        for pair in s.split(|c: char| c.is_whitespace() || c == ',') {
            if pair.is_empty() {
                continue;
            }
            let Some((key, value)) = pair.split_once('=') else {
                return Err(Error::InvalidEllipsoid(format!("expected key=value, got '{pair}'")));
            };
            let value = value.trim().parse::<f64>().map_err(|_| {
                Error::InvalidEllipsoid(format!("malformed value for parameter {key}: '{value}'"))
            })?;
            match key.trim() {
                "a" => a = Some(value),
                "b" | "f" | "rf" | "e2" => shape.push((key.trim(), value)),
                other => {
                    return Err(Error::InvalidEllipsoid(format!("unknown parameter '{other}'")))
                }
            }
        }

        let Some(a) = a else {
            return Err(Error::InvalidEllipsoid(String::from(
                "missing semimajor axis 'a'",
            )));
        };
        let descriptor = match shape.as_slice() {
            [] => EllipsoidDescriptor::Flattening { a, f: 0.0 },
            [("b", b)] => EllipsoidDescriptor::Semiaxes { a, b: *b },
            [("f", f)] => EllipsoidDescriptor::Flattening { a, f: *f },
            [("rf", rf)] => EllipsoidDescriptor::ReciprocalFlattening { a, rf: *rf },
            [("e2", e2)] => EllipsoidDescriptor::EccentricitySquared { a, e2: *e2 },
            _ => {
                return Err(Error::InvalidEllipsoid(String::from(
                    "give at most one of 'b', 'f', 'rf', 'e2'",
                )))
            }
        };
        Ok(descriptor)
    }
}

// ----- Tests ---------------------------------------------------------------------
