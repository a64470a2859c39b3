extern crate clap;
extern crate env_logger;
extern crate parbrot;

use clap::{App, Arg, ArgMatches};
use failure::{format_err, Error};
use log::warn;
use parbrot::config::{self, parse_complex, parse_pair, RenderConfig, RunMode};
use parbrot::output::write_image;
use parbrot::timing::{seconds, timed, Comparison};
use parbrot::{ComplexPlane, IntegralPlane, Mandelbrot, Mode, ParallelRenderer, Partition};
use parbrot::{PlaneMapper, Raster, RenderError};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
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

const SIZE: &str = "size";
const LEFTLOWER: &str = "leftlower";
const RIGHTUPPER: &str = "rightupper";
const ITERATIONS: &str = "iterations";
const THREADS: &str = "threads";
const PARTITION: &str = "partition";
const MODE: &str = "mode";
const PARALLEL_OUTPUT: &str = "parallel-output";
const SEQUENTIAL_OUTPUT: &str = "sequential-output";

fn args<'a>(default_threads: &'a str, default_iterations: &'a str) -> ArgMatches<'a> {
    let max_threads = num_cpus::get() * 4;

    App::new("parbrot")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Parallel Mandelbrot renderer with a sequential baseline")
        .arg(
            Arg::with_name(SIZE)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value(config::DEFAULT_SIZE)
                .validator(|s| validate_pair::<usize>(&s, 'x', "Could not parse output image size"))
                .help("Size of output image, WIDTHxHEIGHT"),
        )
        .arg(
            Arg::with_name(LEFTLOWER)
                .long(LEFTLOWER)
                .short("l")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value(config::DEFAULT_LEFTLOWER)
                .validator(|s| validate_pair::<f32>(&s, ',', "Could not parse left lower corner"))
                .help("Left lower corner of the mandelbrot space"),
        )
        .arg(
            Arg::with_name(RIGHTUPPER)
                .long(RIGHTUPPER)
                .short("r")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value(config::DEFAULT_RIGHTUPPER)
                .validator(|s| validate_pair::<f32>(&s, ',', "Could not parse right upper corner"))
                .help("Right upper corner of the mandelbrot space"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value(default_iterations)
                .validator(|s| match i32::from_str(&s) {
                    Ok(_) => Ok(()),
                    Err(_) => Err("Could not parse iteration count".to_string()),
                })
                .help("Maximum number of iterations per pixel"),
        )
        .arg(
            Arg::with_name(THREADS)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .default_value(default_threads)
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        max_threads,
                        "Could not parse thread count",
                        &format!("Thread count must be between 1 and {}", max_threads),
                    )
                })
                .help("Number of threads to use for the parallel render"),
        )
        .arg(
            Arg::with_name(PARTITION)
                .long(PARTITION)
                .short("p")
                .takes_value(true)
                .default_value("static")
                .validator(|s| {
                    Partition::from_str(&s)
                        .map(|_| ())
                        .map_err(|e| e.to_string())
                })
                .help("How to split the image: static, rows:K or pixels:K"),
        )
        .arg(
            Arg::with_name(MODE)
                .long(MODE)
                .short("m")
                .takes_value(true)
                .possible_values(&["both", "parallel", "sequential"])
                .default_value("both")
                .help("Which renders to run"),
        )
        .arg(
            Arg::with_name(PARALLEL_OUTPUT)
                .long(PARALLEL_OUTPUT)
                .takes_value(true)
                .default_value(config::DEFAULT_PARALLEL_OUTPUT)
                .help("Output file for the parallel render (.png or .pgm)"),
        )
        .arg(
            Arg::with_name(SEQUENTIAL_OUTPUT)
                .long(SEQUENTIAL_OUTPUT)
                .takes_value(true)
                .default_value(config::DEFAULT_SEQUENTIAL_OUTPUT)
                .help("Output file for the sequential render (.png or .pgm)"),
        )
        .get_matches()
}

fn value<'a>(matches: &'a ArgMatches, name: &str) -> Result<&'a str, Error> {
    matches
        .value_of(name)
        .ok_or_else(|| format_err!("missing value for --{}", name))
}

fn parse<T: FromStr>(matches: &ArgMatches, name: &str) -> Result<T, Error> {
    T::from_str(value(matches, name)?).map_err(|_| format_err!("could not parse --{}", name))
}

fn config_from(matches: &ArgMatches) -> Result<RenderConfig, Error> {
    let size = parse_pair::<usize>(value(matches, SIZE)?, 'x')
        .ok_or_else(|| format_err!("Error parsing image dimensions"))?;
    let leftlower = parse_complex(value(matches, LEFTLOWER)?)
        .ok_or_else(|| format_err!("Error parsing left lower point"))?;
    let rightupper = parse_complex(value(matches, RIGHTUPPER)?)
        .ok_or_else(|| format_err!("Error parsing right upper point"))?;
    let mode = RunMode::from_str(value(matches, MODE)?).map_err(|e| format_err!("{}", e))?;

    Ok(RenderConfig {
        size: IntegralPlane(size.0, size.1),
        plane: ComplexPlane(leftlower, rightupper),
        max_iterations: parse(matches, ITERATIONS)?,
        threads: parse(matches, THREADS)?,
        partition: Partition::from_str(value(matches, PARTITION)?)?,
        mode,
        parallel_output: PathBuf::from(value(matches, PARALLEL_OUTPUT)?),
        sequential_output: PathBuf::from(value(matches, SEQUENTIAL_OUTPUT)?),
    })
}

fn render_timed(
    label: &str,
    mode: Mode,
    job: &Mandelbrot,
) -> Result<(Raster, Duration), RenderError> {
    let mut raster = job.raster()?;
    let (result, elapsed) = timed(label, || mode.render_into(job, &mut raster));
    result?;
    Ok((raster, elapsed))
}

fn run(config: &RenderConfig) -> Result<(), Error> {
    // Everything is validated here, before the first pixel is touched.
    let plane = PlaneMapper::from_planes(config.size, config.plane)?;
    let job = Mandelbrot::new(plane, config.max_iterations)?;
    let parallel = Mode::Parallel(ParallelRenderer::new(config.threads, config.partition)?);

    match config.mode {
        RunMode::Parallel => {
            let (raster, elapsed) = render_timed("parallel render", parallel, &job)?;
            println!("Parallel Mandelbrot: {:.3} s", seconds(elapsed));
            write_image(&config.parallel_output, &raster)?;
        }
        RunMode::Sequential => {
            let (raster, elapsed) = render_timed("sequential render", Mode::Sequential, &job)?;
            println!("Sequential Mandelbrot: {:.3} s", seconds(elapsed));
            write_image(&config.sequential_output, &raster)?;
        }
        RunMode::Both => {
            let (par_raster, par_elapsed) = render_timed("parallel render", parallel, &job)?;
            println!("Parallel Mandelbrot: {:.3} s", seconds(par_elapsed));
            let (seq_raster, seq_elapsed) =
                render_timed("sequential render", Mode::Sequential, &job)?;
            println!("Sequential Mandelbrot: {:.3} s", seconds(seq_elapsed));

            let comparison = Comparison {
                parallel: par_elapsed,
                sequential: seq_elapsed,
            };
            match comparison.speedup() {
                Some(speedup) => println!("Speed-up: {:.2} X", speedup),
                None => println!("Speed-up: n/a"),
            }

            write_image(&config.parallel_output, &par_raster)?;
            write_image(&config.sequential_output, &seq_raster)?;

            if par_raster != seq_raster {
                let differing = par_raster
                    .as_raw()
                    .iter()
                    .zip(seq_raster.as_raw())
                    .filter(|(a, b)| a != b)
                    .count();
                warn!("{} pixels differ between the two renders", differing);
                return Err(format_err!("parallel and sequential renders differ"));
            }
        }
    }
    Ok(())
}

fn main() {
    env_logger::init();
    let default_threads = num_cpus::get().to_string();
    let default_iterations = config::DEFAULT_ITERATIONS.to_string();
    let matches = args(&default_threads, &default_iterations);
    let result = config_from(&matches).and_then(|config| run(&config));
    if let Err(e) = result {
        eprintln!("Render failure: {}", e);
        std::process::exit(1);
    }
}
