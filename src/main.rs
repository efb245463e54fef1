//! design-lint binary

use clap::{Arg, ArgAction, Command};
use framelint::runner::setup_logging;
use framelint::{config, FrameStyleResolver, LintRunner, Reporter, RunMode, RunProfile};
use std::process;

fn main() {
    let matches = build_cli().get_matches();
    setup_logging(matches.get_count("verbose"));

    let mode = if matches.get_flag("fix") {
        RunMode::Fix
    } else {
        RunMode::DryRun
    };
    let json = matches
        .get_one::<String>("format")
        .map(|format| format == "json")
        .unwrap_or(false);
    let config_path = matches
        .get_one::<String>("config")
        .map(String::as_str)
        .unwrap_or(config::DEFAULT_CONFIG_FILE);
    let roots: Vec<String> = matches
        .get_many::<String>("paths")
        .map(|paths| paths.cloned().collect())
        .unwrap_or_default();

    process::exit(run(config_path, roots, mode, json));
}

fn run(config_path: &str, roots: Vec<String>, mode: RunMode, json: bool) -> i32 {
    let reporter = Reporter::new(RunProfile::Lint, mode);
    if !json {
        reporter.print_header();
    }

    let mut config = match config::load_or_default(config_path) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("design-lint: {}", err);
            return 1;
        }
    };
    if !roots.is_empty() {
        config.roots = roots;
    }

    let runner = LintRunner::new(
        config,
        Box::new(FrameStyleResolver::new()),
        RunProfile::Lint,
        mode,
    );
    match runner.run() {
        Ok(report) => {
            if json {
                match reporter.render_json(&report) {
                    Ok(text) => println!("{}", text),
                    Err(err) => {
                        eprintln!("design-lint: {}", err);
                        return 1;
                    }
                }
            } else {
                reporter.print(&report);
            }
            reporter.exit_code(&report)
        }
        Err(err) => {
            eprintln!("design-lint failed: {}", err);
            1
        }
    }
}

fn build_cli() -> Command {
    Command::new("design-lint")
        .version(framelint::VERSION)
        .about("Static design lint for Frame component usage")
        .arg(
            Arg::new("fix")
                .long("fix")
                .help("Apply auto-fixes in place")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .value_name("FORMAT")
                .value_parser(["text", "json"])
                .default_value("text")
                .help("Report format")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Increase verbosity (can be used multiple times)")
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new("paths")
                .value_name("PATH")
                .help("Directories to scan, overriding the configured roots")
                .action(ArgAction::Append),
        )
}
