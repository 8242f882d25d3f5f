// Builtin ellipsoids: (name, semimajor axis, reciprocal flattening, description).
// EPSG convention: zero reciprocal flattening indicates zero flattening.
#[rustfmt::skip]
pub(crate) const ELLIPSOID_LIST: [(&str, f64, f64, &str); 16] = [
    ("WGS84",      6_378_137.0,   298.257_223_563,     "WGS 84"),
    ("GRS80",      6_378_137.0,   298.257_222_100_882_7, "GRS 1980 (IUGG, 1980)"),
    ("WGS72",      6_378_135.0,   298.26,              "WGS 72"),
    ("GRS67",      6_378_160.0,   298.247_167_427,     "GRS 67 (IUGG 1967)"),
    ("MERIT",      6_378_137.0,   298.257,             "MERIT 1983"),
    ("intl",       6_378_388.0,   297.0,               "International 1924 (Hayford 1909, 1910)"),
    ("krass",      6_378_245.0,   298.3,               "Krassovsky, 1942"),
    ("Helmert",    6_378_200.0,   298.3,               "Helmert 1906"),
    ("clrk66",     6_378_206.4,   294.978_698_2,       "Clarke 1866"),
    ("clrk80",     6_378_249.145, 293.465,             "Clarke 1880 mod."),
    ("bessel",     6_377_397.155, 299.152_812_8,       "Bessel 1841"),
    ("airy",       6_377_563.396, 299.324_964_6,       "Airy 1830"),
    ("mod_airy",   6_377_340.189, 299.324_964_6,       "Modified Airy"),
    ("aust_SA",    6_378_160.0,   298.25,              "Australian Natl & S. Amer. 1969"),
    ("sphere",     6_370_997.0,   0.0,                 "Normal Sphere (r=6370997)"),
    ("unitsphere", 1.0,           0.0,                 "Unit sphere (r=1)"),
];
