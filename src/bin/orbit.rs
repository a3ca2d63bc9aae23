extern crate clap;
extern crate image;
extern crate num;
extern crate num_cpus;
extern crate orbitplot;
extern crate rand;

use clap::{App, Arg, ArgMatches};
use image::pnm::PNMEncoder;
use image::pnm::{PNMSubtype, SampleEncoding};
use image::ColorType;
use num::{clamp, Complex};
use std::fs::File;
use std::path::Path;
use std::str::FromStr;

use orbitplot::{
    buddhabrot_grid, buddhabrot_grid_threaded, buddhabrot_random, clifford_attractor, mandelbrot,
    PlaneMapper,
};

fn parse_pair<T>(s: &str, separator: char) -> Option<(T, T)>
where
    T: FromStr,
{
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

fn parse_complex(s: &str) -> Option<Complex<f64>> {
    match parse_pair(s, ',') {
        Some((re, im)) => Some(Complex { re, im }),
        None => None,
    }
}

/// Comma-separated a,b,c,d for the Clifford recurrence.
fn parse_quad(s: &str) -> Option<(f64, f64, f64, f64)> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 4 {
        return None;
    }
    match (
        f64::from_str(parts[0]),
        f64::from_str(parts[1]),
        f64::from_str(parts[2]),
        f64::from_str(parts[3]),
    ) {
        (Ok(a), Ok(b), Ok(c), Ok(d)) => Some((a, b, c, d)),
        _ => None,
    }
}

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_number<T: FromStr>(s: &str, err: &str) -> Result<(), String> {
    match T::from_str(s) {
        Ok(_) => Ok(()),
        Err(_) => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + Ord>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

const OUTPUT: &str = "output";
const MODE: &str = "mode";
const SIZE: &str = "size";
const LEFTLOWER: &str = "leftlower";
const RIGHTUPPER: &str = "rightupper";
const THREADS: &str = "threads";
const ITERATIONS: &str = "iterations";
const SAMPLES: &str = "samples";
const SCALE: &str = "scale";
const CENTER: &str = "center";
const HALFWIDTH: &str = "halfwidth";
const RADIUS: &str = "radius";
const PARAMS: &str = "params";

const MODES: [&str; 4] = ["buddha", "grid", "clifford", "mandel"];

fn args<'a>() -> ArgMatches<'a> {
    let max_threads = num_cpus::get();

    App::new("orbit")
        .version("0.1.0")
        .about("Escape-time and strange-attractor density renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .required(true)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output file"),
        )
        .arg(
            Arg::with_name(MODE)
                .required(false)
                .long(MODE)
                .short("m")
                .takes_value(true)
                .default_value("buddha")
                .possible_values(&MODES)
                .help("Which renderer to run"),
        )
        .arg(
            Arg::with_name(SIZE)
                .required(false)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("800x600")
                .validator(|s| validate_pair::<u16>(&s, 'x', "Could not parse output image size"))
                .help("Size of output image"),
        )
        .arg(
            Arg::with_name(LEFTLOWER)
                .required(false)
                .long(LEFTLOWER)
                .short("l")
                .takes_value(true)
                .default_value("-2.103,-1.238")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse left lower corner"))
                .help("Left lower corner of the sampled window"),
        )
        .arg(
            Arg::with_name(RIGHTUPPER)
                .required(false)
                .long(RIGHTUPPER)
                .short("r")
                .takes_value(true)
                .default_value("1.201,1.240")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse right upper corner"))
                .help("Right upper corner of the sampled window"),
        )
        .arg(
            Arg::with_name(THREADS)
                .required(false)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .default_value("1")
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        max_threads,
                        "Could not parse thread count",
                        &format!("Thread count must be between 1 and {}", max_threads),
                    )
                })
                .help("Number of threads to use in the grid renderer"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .required(false)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("2000")
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        200_000,
                        "Could not parse iteration count",
                        "Iteration count must be between 1 and 200000",
                    )
                })
                .help("Per-orbit iteration budget"),
        )
        .arg(
            Arg::with_name(SAMPLES)
                .required(false)
                .long(SAMPLES)
                .short("n")
                .takes_value(true)
                .default_value("1000000")
                .validator(|s| validate_number::<usize>(&s, "Could not parse sample count"))
                .help("Random samples (buddha) or trajectory steps (clifford)"),
        )
        .arg(
            Arg::with_name(SCALE)
                .required(false)
                .long(SCALE)
                .takes_value(true)
                .default_value("2")
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        64,
                        "Could not parse grid scale",
                        "Grid scale must be between 1 and 64",
                    )
                })
                .help("Grid oversampling factor (grid mode)"),
        )
        .arg(
            Arg::with_name(CENTER)
                .required(false)
                .long(CENTER)
                .short("c")
                .takes_value(true)
                .default_value("-0.5,0.0")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse view center"))
                .help("View center (mandel mode)"),
        )
        .arg(
            Arg::with_name(HALFWIDTH)
                .required(false)
                .long(HALFWIDTH)
                .short("d")
                .takes_value(true)
                .default_value("1.5")
                .validator(|s| validate_number::<f64>(&s, "Could not parse view half-width"))
                .help("View half-width (mandel mode)"),
        )
        .arg(
            Arg::with_name(RADIUS)
                .required(false)
                .long(RADIUS)
                .takes_value(true)
                .default_value("2.0")
                .validator(|s| validate_number::<f64>(&s, "Could not parse escape radius"))
                .help("Escape radius (mandel mode)"),
        )
        .arg(
            Arg::with_name(PARAMS)
                .required(false)
                .long(PARAMS)
                .short("p")
                .takes_value(true)
                .default_value("-1.4,1.6,1.0,0.7")
                .validator(|s| match parse_quad(&s) {
                    Some(_) => Ok(()),
                    None => Err("Could not parse attractor parameters".to_string()),
                })
                .help("Clifford parameters a,b,c,d"),
        )
        .get_matches()
}

fn write_image(outfile: &str, pixels: &[u8], bounds: (usize, usize)) -> Result<(), std::io::Error> {
    let path = Path::new(outfile);
    let output = File::create(&path)?;
    let mut encoder =
        PNMEncoder::new(output).with_subtype(PNMSubtype::Graymap(SampleEncoding::Binary));
    encoder.encode(pixels, bounds.0 as u32, bounds.1 as u32, ColorType::Gray(8))?;
    Ok(())
}

/// Max-scales a density raster to 8 bits, flooring the dimmest cells
/// to black so single stray counts don't wash the image gray.
fn normalize_density(raw: &[f64]) -> Vec<u8> {
    let maxi = raw.iter().cloned().fold(0.0f64, f64::max);
    if maxi <= 0.0 {
        return vec![0; raw.len()];
    }
    let bias = 0.045 * maxi;
    raw.iter()
        .map(|&s| {
            let s = if s < bias { 0.0 } else { s };
            clamp(s * 256.0 / maxi, 0.0, 255.0) as u8
        })
        .collect()
}

/// Plain max-scaling for the smooth escape-count field.
fn normalize_field(raw: &[f64]) -> Vec<u8> {
    let maxi = raw.iter().cloned().fold(0.0f64, f64::max);
    if maxi <= 0.0 {
        return vec![0; raw.len()];
    }
    raw.iter()
        .map(|&s| clamp(s * 256.0 / maxi, 0.0, 255.0) as u8)
        .collect()
}

fn main() {
    let matches = args();
    let (width, height) = parse_pair::<usize>(matches.value_of(SIZE).unwrap(), 'x')
        .expect("Error parsing image dimensions");
    let leftlower =
        parse_complex(matches.value_of(LEFTLOWER).unwrap()).expect("Error parsing left lower point");
    let rightupper = parse_complex(matches.value_of(RIGHTUPPER).unwrap())
        .expect("Error parsing right upper point");
    let threads =
        usize::from_str(matches.value_of(THREADS).unwrap()).expect("Could not parse thread count");
    let iterations = usize::from_str(matches.value_of(ITERATIONS).unwrap())
        .expect("Could not parse iteration count");
    let samples = usize::from_str(matches.value_of(SAMPLES).unwrap())
        .expect("Could not parse sample count");

    let pixels = match matches.value_of(MODE).unwrap() {
        "buddha" => {
            let plane = PlaneMapper::new(width, height, leftlower, rightupper);
            let mut path_re = vec![0.0; iterations];
            let mut path_im = vec![0.0; iterations];
            let mut image = vec![0.0; plane.len()];
            let mut rng = rand::thread_rng();
            buddhabrot_random(
                &plane, iterations, samples, &mut rng, &mut path_re, &mut path_im, &mut image,
            );
            normalize_density(&image)
        }
        "grid" => {
            let plane = PlaneMapper::new(width, height, leftlower, rightupper);
            let scale = usize::from_str(matches.value_of(SCALE).unwrap())
                .expect("Could not parse grid scale");
            let image = if threads > 1 {
                buddhabrot_grid_threaded(&plane, iterations, scale, threads)
            } else {
                let mut path_re = vec![0.0; iterations];
                let mut path_im = vec![0.0; iterations];
                let mut image = vec![0.0; plane.len()];
                buddhabrot_grid(&plane, iterations, scale, &mut path_re, &mut path_im, &mut image);
                image
            };
            normalize_density(&image)
        }
        "clifford" => {
            let (a, b, c, d) = parse_quad(matches.value_of(PARAMS).unwrap())
                .expect("Error parsing attractor parameters");
            let mut counts = vec![0u32; width * height];
            clifford_attractor(a, b, c, d, &mut counts, width, height, samples);
            let raw: Vec<f64> = counts.iter().map(|&v| f64::from(v)).collect();
            normalize_density(&raw)
        }
        "mandel" => {
            let center =
                parse_complex(matches.value_of(CENTER).unwrap()).expect("Error parsing view center");
            let halfwidth = f64::from_str(matches.value_of(HALFWIDTH).unwrap())
                .expect("Could not parse view half-width");
            let radius = f64::from_str(matches.value_of(RADIUS).unwrap())
                .expect("Could not parse escape radius");
            let mut field = vec![0.0; width * height];
            mandelbrot(
                center.re,
                center.im,
                halfwidth,
                height,
                width,
                &mut field,
                iterations as u32,
                radius,
            );
            normalize_field(&field)
        }
        _ => unreachable!(),
    };

    if let Err(e) = write_image(matches.value_of(OUTPUT).unwrap(), &pixels, (width, height)) {
        eprintln!("Render failure: {}", e);
        std::process::exit(1);
    }
}
