//! fipp - Flexible Interactive Password Processor
//!
//! Main entry point for the command-line application.

use clap::Parser;
use indicatif::ProgressBar;
use std::io;
use std::process;
use std::time::Instant;

use fipp::cli::Args;
use fipp::encoding::sniff_encoding;
use fipp::interactive::Session;
use fipp::processor::{Processor, RunConfig};
use fipp::progress::{
    create_bytes_progress_bar, print_banner, print_error, print_header, print_info, print_summary,
    print_warning,
};
use fipp::ErrorKind;

fn main() {
    // Parse command-line arguments
    let args = Args::parse();

    // Set up logging; RUST_LOG wins over the flags
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(args.log_level()))
        .format_timestamp(None)
        .format_target(false)
        .init();

    if let Err(e) = run(&args) {
        print_error(&format!("{}", e));

        // Print chain of errors
        for cause in e.chain().skip(1) {
            print_error(&format!("  Caused by: {}", cause));
        }

        let is_config = e
            .downcast_ref::<fipp::Error>()
            .is_some_and(|err| err.kind() == ErrorKind::Configuration);
        if is_config {
            print_info("Run with --help for usage.");
        }

        process::exit(1);
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let config = if args.interactive {
        print_banner();

        let stdin = io::stdin();
        let mut session = Session::new(stdin.lock(), io::stdout());
        match session.run()? {
            Some(config) => config,
            None => {
                print_info("Process interrupted by user. Exiting gracefully...");
                return Ok(());
            }
        }
    } else {
        if !args.quiet {
            print_banner();
        }
        RunConfig::from_args(args)?
    };

    if args.verbose {
        print_config(&config);
    }

    let pb = if args.quiet {
        ProgressBar::hidden()
    } else {
        print_header("Processing Password File...");
        create_bytes_progress_bar("Filtering...")
    };

    let started = Instant::now();
    let run = Processor::new(config).with_progress(pb).run()?;

    if !args.quiet {
        print_summary(&run, started.elapsed(), args.verbose);
    }

    Ok(())
}

/// Print configuration summary
fn print_config(config: &RunConfig) {
    print_header("Configuration");

    let policy = &config.policy;
    print_info(&format!("Input:          {:?}", config.input));
    print_info(&format!("Output:         {:?}", config.output));
    print_info(&format!("Encoding:       {}", config.encoding));
    print_info(&format!("Exact length:   {}", policy.exact_length()));
    print_info(&format!("Specials:       {}", allowed(policy.allow_special())));
    print_info(&format!("Numbers:        {}", allowed(policy.allow_numeric())));
    match policy.min_uppercase() {
        Some(n) => print_info(&format!("Min uppercase:  {}", n)),
        None => print_info("Min uppercase:  no check"),
    }

    if let Ok(Some(guess)) = sniff_encoding(&config.input) {
        if !guess.agrees_with(config.encoding) {
            print_warning(&format!(
                "Input looks like {}, but {} was selected",
                guess, config.encoding
            ));
        }
    }
}

fn allowed(flag: bool) -> &'static str {
    if flag {
        "allowed"
    } else {
        "rejected"
    }
}
