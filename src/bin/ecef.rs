//! Convert geodetic coordinates to ECEF, or (with `--inv`) vice versa.
//!
//! Reads one coordinate per line, from the files given, or from stdin:
//!
//! ```sh
//! echo 55 12 100 | ecef --ellps GRS80
//! echo 3586525.761 762339.584 5201465.438 | ecef --inv
//! ```
use anyhow::Context;
use clap::Parser;
use geocentric::prelude::*;
use log::{debug, trace, warn};
use std::io::{self, BufRead};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(name = "ecef")]
#[clap(author, version, about = "Geodetic <-> ECEF conversion", long_about = None)]
struct Cli {
    /// Inverse operation: ECEF (x y z) to geodetic (lat lon h)
    #[clap(long = "inv")]
    inverse: bool,

    /// Ellipsoid: builtin name, "a, rf", or "a=... b=..." (also f, rf, e2)
    #[clap(long, default_value = "WGS84")]
    ellps: String,

    /// Specify a fixed height for all input coordinates (forward only)
    #[clap(short = 'z', long)]
    height: Option<f64>,

    /// Number of decimals in the output
    #[clap(short = 'd', long)]
    decimals: Option<usize>,

    /// Report fwd-inv roundtrip deviation
    #[clap(short, long)]
    roundtrip: bool,

    /// Echo input to output
    #[clap(short, long)]
    echo: bool,

    /// Upper limit for the number of iterations of the inverse operation
    #[clap(long, default_value_t = geocentric::DEFAULT_MAX_ITERATIONS)]
    max_iterations: usize,

    /// Convergence criterion (height change, in meters) for the inverse operation
    #[clap(long, default_value_t = geocentric::DEFAULT_TOLERANCE)]
    tolerance: f64,

    #[clap(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// The files to operate on (stdin if none)
    args: Vec<PathBuf>,
}

fn main() -> Result<(), anyhow::Error> {
    let options = Cli::parse();
    env_logger::Builder::new()
        .filter_level(options.verbose.log_level_filter())
        .init();
    trace!("This is ecef");
    debug!("{options:#?}");

    let descriptor: EllipsoidDescriptor = options.ellps.parse()?;
    let converter = Converter::from_descriptor(&descriptor)
        .with_context(|| format!("unusable ellipsoid '{}'", options.ellps))?
        .with_max_iterations(options.max_iterations)?
        .with_tolerance(options.tolerance)?;

    if options.args.is_empty() {
        let stdin = io::stdin();
        process(&options, &converter, stdin.lock())?;
    } else {
        for path in &options.args {
            let file = std::fs::File::open(path)
                .with_context(|| format!("cannot open {}", path.display()))?;
            process(&options, &converter, io::BufReader::new(file))?;
        }
    }
    Ok(())
}

fn process(options: &Cli, converter: &Converter, reader: impl BufRead) -> Result<(), anyhow::Error> {
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let text = line.split('#').next().unwrap_or_default().trim();
        if text.is_empty() {
            continue;
        }
        if options.echo {
            println!("# {text}");
        }

        let mut args = Vec::new();
        for item in text.split_whitespace() {
            match item.parse::<f64>() {
                Ok(value) => args.push(value),
                Err(_) => {
                    warn!("line {}: cannot parse '{item}'", index + 1);
                    args.push(f64::NAN);
                }
            }
        }

        let output = if options.inverse {
            inverse(options, converter, &args, index + 1)
        } else {
            forward(options, converter, &args, index + 1)
        };
        println!("{output}");
    }
    Ok(())
}

fn forward(options: &Cli, converter: &Converter, args: &[f64], line: usize) -> String {
    if args.len() < 2 {
        warn!("line {line}: expected 'lat lon [h]'");
        return format_row(&[f64::NAN; 3], options.decimals.unwrap_or(4));
    }
    let height = options.height.or_else(|| args.get(2).copied());
    let geo = Geodetic::from_options(Some(args[0]), Some(args[1]), height);
    let cart = converter.to_ecef(&geo);
    let mut row = format_row(&cart.0, options.decimals.unwrap_or(4));

    if options.roundtrip {
        let deviation = match converter.to_geodetic(&cart) {
            Ok(back) => converter.to_ecef(&back).hypot3(&cart),
            Err(e) => {
                warn!("line {line}: {e}");
                f64::NAN
            }
        };
        row += &format!("  {deviation:.3e}");
    }
    row
}

fn inverse(options: &Cli, converter: &Converter, args: &[f64], line: usize) -> String {
    let decimals = options.decimals.unwrap_or(10);
    if args.len() < 3 {
        warn!("line {line}: expected 'x y z'");
        return format_row(&[f64::NAN; 3], decimals);
    }
    let cart = Ecef::raw(args[0], args[1], args[2]);
    let geo = match converter.to_geodetic(&cart) {
        Ok(geo) => geo,
        Err(Error::NonConvergence { estimate, .. }) => {
            warn!("line {line}: no convergence, using last estimate");
            estimate
        }
        Err(e) => {
            warn!("line {line}: {e}");
            Geodetic::nan()
        }
    };

    let mut row = format_row(&[geo.latitude, geo.longitude, geo.height], decimals);

    if options.roundtrip {
        let back = converter.to_ecef(&geo);
        row += &format!("  {:.3e}", back.hypot3(&cart));
    }
    row
}

fn format_row(values: &[f64], decimals: usize) -> String {
    values
        .iter()
        .map(|v| format!("{v:.decimals$}"))
        .collect::<Vec<_>>()
        .join(" ")
}
