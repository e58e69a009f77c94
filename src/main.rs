//! Memory-Mapped I/O Subsystem Simulator CLI.
//!
//! The main executable for the simulator. It handles command-line argument
//! parsing, system construction, image loading, and the simulation loop.
//!
//! # Usage
//!
//! `servio --file <image.bin> [--config <file.toml>] [--verify]`
//!
//! The image is loaded into the RAM from word 0. With `--verify`, every word
//! of the image is read back through requester port 0 across the full fabric
//! and compared against the file contents.

use clap::Parser;
use std::{fs, process};

use servio::common::error::{SimError, SimResult};
use servio::config::{Config, Topology};
use servio::logger;
use servio::sim::loader;
use servio::sim::requester::Access;
use servio::soc::traits::{RamBacked, WishboneSlave};
use servio::soc::{build_mux, build_rom, System};

/// Command-line arguments for the I/O subsystem simulator.
#[derive(Parser, Debug)]
#[command(author, version, about = "RISC-V SoC Memory-Mapped I/O Simulator")]
struct Args {
    #[arg(short, long)]
    config: Option<String>,

    #[arg(short, long)]
    file: Option<String>,

    /// Read the image back through port 0 and compare.
    #[arg(long)]
    verify: bool,

    /// Write the bus statistics as JSON to this path.
    #[arg(long)]
    stats_json: Option<String>,

    /// Log every tick.
    #[arg(long)]
    trace: bool,
}

fn load_config(path: Option<&str>) -> SimResult<Config> {
    let config = match path {
        Some(path) => {
            let text = fs::read_to_string(path).map_err(|e| SimError::Io {
                path: path.to_string(),
                reason: e.to_string(),
            })?;
            Config::from_toml(&text)?
        }
        None => Config::default(),
    };
    config.validate()?;
    Ok(config)
}

fn print_config(config: &Config) {
    println!("Global Configuration");
    println!("--------------------");
    println!("Memory:");
    println!("  Depth:              {} words", config.memory.depth);
    println!("  Width:              {} bits", config.memory.width);
    println!("  Symbol:             {} bits", config.memory.symbol);
    println!("  Init:               {}", config.memory.init);
    println!("  Skip Align:         {}", config.memory.skip_align);
    println!("Bus:");
    println!("  Topology:           {:?}", config.bus.topology);
    println!("  Requesters:         {}", config.bus.requester_count);
    println!(
        "  Read Latency:       {}..={} cycles",
        config.bus.read_latency_min, config.bus.read_latency_max
    );
    println!("  Max Cycles:         {}", config.general.max_cycles);
    println!("--------------------");
}

/// Loads the image, optionally verifies it over the bus, and reports.
///
/// Returns the number of words that read back differently from the file.
fn execute<S: WishboneSlave + RamBacked>(
    system: &mut System<S>,
    image: &[u8],
    verify: bool,
) -> SimResult<usize> {
    let words = system.load_image(image)?;
    println!("[*] Loaded {} words", words);

    if !verify {
        return Ok(0);
    }

    let body = system.ram().body();
    let expected = loader::words_from_bytes(image, body);
    for index in 0..expected.len() {
        system.submit(0, Access::read((index * body) as u64))?;
    }

    let cycles = system.run_until_idle()?;
    println!("[*] Read back {} words in {} cycles", expected.len(), cycles);

    let mut mismatches = 0;
    let completions = system.requester(0).map(|r| r.completions()).unwrap_or(&[]);
    for (done, want) in completions.iter().zip(&expected) {
        let got = done.read_data.unwrap_or_default();
        if got != *want {
            mismatches += 1;
            eprintln!(
                "[!] Mismatch @ {:#x}: expected {:#x}, got {:#x}",
                done.access.address, want, got
            );
        }
    }
    Ok(mismatches)
}

fn finish<S: WishboneSlave>(system: &System<S>, stats_json: Option<&str>) -> SimResult<()> {
    system.stats.print();
    if let Some(path) = stats_json {
        let json = system.stats.to_json()?;
        fs::write(path, json).map_err(|e| SimError::Io {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        println!("[*] Statistics written to {}", path);
    }
    Ok(())
}

/// Runs the image on a built system and reports statistics either way.
///
/// A fault aborts with `[!] FATAL`, the statistics gathered so far, and exit
/// status 1.
fn simulate<S: WishboneSlave + RamBacked>(
    system: &mut System<S>,
    args: &Args,
    image: &[u8],
) -> SimResult<usize> {
    let mismatches = match execute(system, image, args.verify) {
        Ok(mismatches) => mismatches,
        Err(e) => {
            eprintln!("\n[!] FATAL: {}", e);
            system.stats.print();
            process::exit(1);
        }
    };
    finish(system, args.stats_json.as_deref())?;
    Ok(mismatches)
}

fn run(args: &Args, config: &Config, image: &[u8]) -> SimResult<usize> {
    match config.bus.topology {
        Topology::Mux => simulate(&mut build_mux(config)?, args, image),
        Topology::Rom => simulate(&mut build_rom(config)?, args, image),
    }
}

/// Main entry point for the I/O subsystem simulator.
///
/// # Behavior
///
/// 1. **Configuration**: Parses arguments and loads the TOML configuration, or defaults.
/// 2. **Initialization**: Builds the topology named by `[bus] topology`.
/// 3. **Loader**: Loads the flat image into the RAM from word 0.
/// 4. **Simulation Loop**: With `--verify`, reads the image back across the fabric.
/// 5. **Teardown**: Prints statistics and exits nonzero on any fault or mismatch.
///    A fault during the run prints `[!] FATAL` before the statistics.
fn main() {
    let args = Args::parse();

    let config = load_config(args.config.as_deref()).unwrap_or_else(|e| {
        eprintln!("\n[!] FATAL: {}", e);
        process::exit(1);
    });

    let level = if args.trace || config.general.trace || cfg!(feature = "always-trace") {
        log::LevelFilter::Trace
    } else {
        log::LevelFilter::Info
    };
    if !logger::init(level) {
        eprintln!("[!] Warning: a logger was already installed; log output may be missing.");
    }

    print_config(&config);

    let Some(bin_path) = args.file.as_deref() else {
        eprintln!("Error: No image specified.");
        eprintln!("Usage:");
        eprintln!("  servio --file <image.bin> [--config <file.toml>] [--verify]");
        process::exit(1);
    };

    let result = loader::load_binary(bin_path).and_then(|image| run(&args, &config, &image));

    match result {
        Ok(0) => println!("\n[*] Done."),
        Ok(mismatches) => {
            eprintln!("\n[!] {} word(s) read back incorrectly", mismatches);
            process::exit(1);
        }
        Err(e) => {
            eprintln!("\n[!] FATAL: {}", e);
            process::exit(1);
        }
    }
}
