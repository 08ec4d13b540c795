#![forbid(unsafe_code)]

//! GuideKit demo binary entry point.

use std::io;
use std::process;

use guidekit::GuideConfig;
use guidekit_demo::cli::{self, Command};
use guidekit_demo::tour;
use tracing_subscriber::EnvFilter;

fn main() {
    let opts = match cli::Opts::parse() {
        Ok(Command::Run(opts)) => opts,
        Ok(Command::Help) => {
            println!("{}", cli::HELP_TEXT);
            return;
        }
        Ok(Command::Version) => {
            println!("guidekit-demo {}", cli::VERSION);
            return;
        }
        Err(msg) => {
            eprintln!("{msg}");
            process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let config = GuideConfig::from_env();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match tour::run(&opts, config, &mut out) {
        Ok(report) if report.completed => {}
        Ok(_) => process::exit(2),
        Err(e) => {
            eprintln!("Failed to write transcript: {e}");
            process::exit(1);
        }
    }
}
