//! # KILN Command Line
//!
//! Drives the file layer through an application context.
//!
//! ## Usage
//!
//! ```bash
//! kiln [--config kiln.toml] cat shaders/quad.vert
//! kiln size assets/atlas.png
//! kiln copy assets/atlas.png /tmp/atlas.png
//! ```

use std::io::Write;
use std::process::ExitCode;
use std::time::UNIX_EPOCH;

use kiln::{AppContext, KilnConfig};
use kiln_core::log::Logger;
use kiln_core::{log, log_error, log_trace};

const USAGE: &str = "\
Usage: kiln [OPTIONS] <COMMAND> <ARGS>

Commands:
  cat <FILE>            Print a file read through transient storage
  size <FILE>           Print the size of a file in bytes
  exists <FILE>         Exit 0 if the file can be opened
  stamp <FILE>          Print the modification time in seconds since the epoch
  copy <SRC> <DST>      Copy a file through transient storage

Options:
  -c, --config <FILE>   TOML configuration (default: built-in defaults)
  -h, --help            Show this help";

fn main() -> ExitCode {
    // Parse command line arguments (simple parsing, no external deps)
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut config_path: Option<String> = None;
    let mut rest: Vec<&str> = Vec::new();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("{USAGE}");
                return ExitCode::SUCCESS;
            }
            other => rest.push(other),
        }
        i += 1;
    }

    let config = match config_path {
        Some(path) => match KilnConfig::load(&path) {
            Ok(config) => config,
            Err(err) => {
                let _ = log::install(Logger::with_sink(std::io::stderr()));
                log_error!("{err}");
                return ExitCode::from(2);
            }
        },
        None => KilnConfig::default(),
    };
    // Nothing has logged yet, so this wins.
    // Log lines go to stderr so `cat` output stays clean.
    let _ = log::install(config.logger_with_sink(std::io::stderr()));

    let mut ctx = AppContext::new(config);
    run(&mut ctx, &rest)
}

/// Executes one command.
fn run(ctx: &mut AppContext, args: &[&str]) -> ExitCode {
    match args {
        ["cat", file] => {
            let Some(asset) = ctx.load_asset(file) else {
                return ExitCode::FAILURE;
            };
            let bytes = ctx.asset_bytes(asset).unwrap_or_default();
            let mut stdout = std::io::stdout().lock();
            if stdout.write_all(bytes).and_then(|()| stdout.flush()).is_err() {
                return ExitCode::FAILURE;
            }
            log_trace!("{} bytes of transient storage used", ctx.transient().used());
            ExitCode::SUCCESS
        }
        ["size", file] => {
            let path = ctx.asset_path(file);
            println!("{}", kiln_io::size(path));
            ExitCode::SUCCESS
        }
        ["exists", file] => {
            if kiln_io::exists(ctx.asset_path(file)) {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        ["stamp", file] => {
            let stamp = ctx.watch_asset(file);
            match stamp.last_seen().and_then(|t| t.duration_since(UNIX_EPOCH).ok()) {
                Some(age) => {
                    println!("{}", age.as_secs());
                    ExitCode::SUCCESS
                }
                None => ExitCode::FAILURE,
            }
        }
        ["copy", source, target] => {
            let source = ctx.asset_path(source);
            let target = ctx.asset_path(target);
            if kiln_io::copy(&source, &target, ctx.transient_mut()) {
                log_trace!("Copied {} -> {}", source.display(), target.display());
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        _ => {
            eprintln!("{USAGE}");
            ExitCode::from(2)
        }
    }
}
