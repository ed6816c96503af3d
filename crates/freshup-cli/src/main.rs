//! `freshup` command line

use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use freshup_core::{ProjectUpgrader, RunResult, UpgradeConfig};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("freshup")
        .version(freshup_core::VERSION)
        .about("Upgrade a Fresh 1.x project to Fresh 2")
        .arg(
            Arg::new("dir")
                .value_name("DIR")
                .default_value(".")
                .value_parser(value_parser!(PathBuf))
                .help("Project root"),
        )
        .arg(
            Arg::new("no-format")
                .long("no-format")
                .action(ArgAction::SetTrue)
                .help("Do not run the formatter on rewritten files"),
        )
        .arg(
            Arg::new("formatter")
                .long("formatter")
                .value_name("PROGRAM")
                .default_value("deno")
                .help("Formatter executable, invoked as `<PROGRAM> fmt <file>`"),
        )
        .arg(
            Arg::new("concurrency")
                .short('j')
                .long("concurrency")
                .value_name("N")
                .value_parser(value_parser!(usize))
                .help("Files processed at once [default: available cores]"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .help("Print the summary as JSON"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .help("More log output (-v info, -vv debug, -vvv trace)"),
        )
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn config_from(matches: &ArgMatches) -> UpgradeConfig {
    let mut config = UpgradeConfig::default();
    if let Some(dir) = matches.get_one::<PathBuf>("dir") {
        config.root.clone_from(dir);
    }
    config = config.with_format(!matches.get_flag("no-format"));
    if let Some(program) = matches.get_one::<String>("formatter") {
        config = config.with_formatter_program(program.clone());
    }
    if let Some(n) = matches.get_one::<usize>("concurrency") {
        config = config.with_concurrency(*n);
    }
    config
}

fn print_summary(result: &RunResult) {
    match &result.manifest_path {
        Some(path) if result.config_updated => println!("Updated {}", path.display()),
        Some(path) => println!("{} already up to date", path.display()),
        None if result.manifest_error.is_none() => println!("No deno.json or deno.jsonc found"),
        None => {}
    }
    if let Some(error) = &result.manifest_error {
        println!("Manifest not updated: {error}");
    }

    println!(
        "Processed {} files, modified {}",
        result.files_processed, result.files_modified
    );

    if !result.removed_symbols.is_empty() {
        println!(
            "Removed unused preact imports: {}",
            result.removed_symbols.join(", ")
        );
    }

    if result.warnings > 0 {
        println!("{} constructs need manual attention:", result.warnings);
        for warning in result.warning_messages() {
            println!("  {warning}");
        }
    }

    if !result.failures.is_empty() {
        println!("{} files could not be upgraded:", result.failures.len());
        for failure in &result.failures {
            println!("  {}: {}", failure.path.display(), failure.error);
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();
    init_tracing(matches.get_count("verbose"));

    let config = config_from(&matches);
    let root = config.root.clone();
    let result = ProjectUpgrader::new(config)
        .run()
        .await
        .with_context(|| format!("cannot upgrade {}", root.display()))?;

    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_summary(&result);
    }

    if !result.is_success() {
        std::process::exit(1);
    }
    Ok(())
}
