#![forbid(unsafe_code)]

//! Command-line argument parsing for the demo.
//!
//! Two flags do not justify a CLI dependency, so args are parsed by hand.

use std::env;
use std::process;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP_TEXT: &str = "\
termline-demo — interactive line editing over a raw terminal

Type a line and press return; the demo echoes every completed line back.
Press the up arrow to recall and edit the previous line. Exit with ^C, ^D,
or by typing \"quit\".

USAGE:
    termline-demo [OPTIONS]

OPTIONS:
    --frame       Frame demo: a bordered region tracking the window size
    --log         Log engine traces to stderr (filter with RUST_LOG)
    --help, -h    Show this help message
    --version, -V Show version";

/// Parsed command-line options.
pub struct Opts {
    /// Run the framed-region demo instead of line editing.
    pub frame: bool,
    /// Install a stderr tracing subscriber.
    pub log: bool,
}

impl Opts {
    /// Parse command-line arguments.
    pub fn parse() -> Self {
        let mut opts = Self {
            frame: false,
            log: false,
        };

        for arg in env::args().skip(1) {
            match arg.as_str() {
                "--help" | "-h" => {
                    println!("{HELP_TEXT}");
                    process::exit(0);
                }
                "--version" | "-V" => {
                    println!("termline-demo {VERSION}");
                    process::exit(0);
                }
                "--frame" => opts.frame = true,
                "--log" => opts.log = true,
                other => {
                    eprintln!("Unknown argument: {other}");
                    eprintln!("Run with --help for usage information.");
                    process::exit(1);
                }
            }
        }

        opts
    }
}
