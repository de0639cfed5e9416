extern crate clap;
extern crate env_logger;
extern crate image;
extern crate mandelscope;
extern crate num;
extern crate num_cpus;

use clap::{App, Arg, ArgMatches};
use image::pnm::PNMEncoder;
use image::pnm::{PNMSubtype, SampleEncoding};
use image::ColorType;
use num::Complex;
use std::fs::File;
use std::path::Path;
use std::str::FromStr;

use mandelscope::Explorer;

// Splits "left<separator>right" and parses both halves, giving up if
// either half refuses.
fn parse_pair<T: FromStr>(s: &str, separator: char) -> Option<(T, T)> {
    let index = s.find(separator)?;
    match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
        (Ok(left), Ok(right)) => Some((left, right)),
        _ => None,
    }
}

fn parse_complex(s: &str) -> Option<Complex<f64>> {
    parse_pair(s, ',').map(|(re, im)| Complex { re, im })
}

// Validator form of parse_pair for the clap builder.
fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    parse_pair::<T>(s, separator)
        .map(|_| ())
        .ok_or_else(|| err.to_string())
}

// Validator for a bounded numeric argument, with separate complaints
// for unparseable and out-of-range input.
fn validate_range<T: FromStr + Ord>(
    s: &str,
    low: T,
    high: T,
    unparseable_err: &str,
    out_of_range_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(value) if value >= low && value <= high => Ok(()),
        Ok(_) => Err(out_of_range_err.to_string()),
        Err(_) => Err(unparseable_err.to_string()),
    }
}

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const CENTER: &str = "center";
const ZOOM: &str = "zoom";
const THREADS: &str = "threads";

fn args<'a>() -> ArgMatches<'a> {
    let max_threads = num_cpus::get();

    App::new("mandel")
        .version("0.1.0")
        .about("Mandelbrot set renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .required(true)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output file (binary PPM)"),
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
            Arg::with_name(CENTER)
                .required(false)
                .long(CENTER)
                .short("c")
                .takes_value(true)
                .default_value("0,0")
                // The interesting regions of the set sit at negative
                // real parts, so a leading hyphen must parse as a
                // value, not a flag.
                .allow_hyphen_values(true)
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse view center"))
                .help("Plane coordinate to center the view on"),
        )
        .arg(
            Arg::with_name(ZOOM)
                .required(false)
                .long(ZOOM)
                .short("z")
                .takes_value(true)
                .default_value("0")
                .validator(|s| {
                    validate_range(
                        &s,
                        0,
                        64,
                        "Could not parse zoom level",
                        "Zoom level must be between 0 and 64",
                    )
                })
                .help("Number of zoom-in steps to apply"),
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
                .help("Number of render workers"),
        )
        .get_matches()
}

fn write_image(outfile: &str, pixels: &[u8], bounds: (usize, usize)) -> Result<(), std::io::Error> {
    let path = Path::new(outfile);
    let output = File::create(&path)?;
    let mut encoder =
        PNMEncoder::new(output).with_subtype(PNMSubtype::Pixmap(SampleEncoding::Binary));
    encoder.encode(pixels, bounds.0 as u32, bounds.1 as u32, ColorType::RGB(8))?;
    Ok(())
}

fn main() {
    env_logger::init();
    let matches = args();
    let (width, height) = parse_pair::<usize>(matches.value_of(SIZE).unwrap(), 'x')
        .expect("Error parsing image dimensions");
    let center =
        parse_complex(matches.value_of(CENTER).unwrap()).expect("Error parsing view center");
    let zoom = u32::from_str(matches.value_of(ZOOM).unwrap()).expect("Could not parse zoom level");
    let threads =
        usize::from_str(matches.value_of(THREADS).unwrap()).expect("Could not parse thread count");

    let mut explorer = match Explorer::new(width, height) {
        Ok(explorer) => explorer.with_workers(threads),
        Err(e) => {
            eprintln!("Setup failure: {}", e);
            std::process::exit(1);
        }
    };

    // The window loop this stands in for recenters on each click and
    // zooms one step; here the whole exploration happens up front,
    // then one frame is rendered and "drawn" to the output file.
    let target = explorer.view().point_to_pixel(center);
    explorer.set_center(target);
    for _ in 0..zoom {
        explorer.zoom_in();
    }
    explorer.render();

    let mut raw = Vec::with_capacity(explorer.pixel_buffer().len() * 3);
    for cell in explorer.pixel_buffer() {
        raw.push(cell.color.0);
        raw.push(cell.color.1);
        raw.push(cell.color.2);
    }
    if let Err(e) = write_image(matches.value_of(OUTPUT).unwrap(), &raw, (width, height)) {
        eprintln!("Write failure: {}", e);
        std::process::exit(1);
    }
    println!("{}", explorer.status_text());
}
