//! CLI module for autorst

mod args;

pub use args::{Args, Command, DiscoveryArgs};

use crate::analysis::{AnalysisResult, Analyzer};
use crate::config::{CliOverrides, Config, DEFAULT_CONFIG_FILE};
use crate::error::Result;
use crate::output::DocGenerator;
use crate::source::open_source;
use std::path::Path;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Run the CLI application
pub fn run() -> ExitCode {
    let args = Args::parse_args();
    init_logging(args.verbose, args.quiet);

    match execute(args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr. `RUST_LOG` wins over the verbosity flags.
fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,autorst={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn execute(args: Args) -> Result<()> {
    match args.command {
        Command::Generate {
            discovery,
            source,
            apipath,
            docpath,
            writtenpath,
            write_index,
            write_doc,
            no_write_api,
            overwrite,
        } => {
            let cfg = load_config(
                &discovery,
                CliOverrides {
                    source,
                    apipath,
                    docpath,
                    writtenpath,
                    write_index,
                    write_doc,
                    no_write_api,
                    overwrite,
                    ..discovery.overrides()
                },
            )?;

            let analysis = analyze(&cfg, &discovery.package)?;

            let generator = DocGenerator::new(cfg.clone())?.with_verbose(args.verbose);
            let report = generator.generate(&analysis)?;

            println!("{}", report.summary());
            println!("Documentation stubs written to: {}", cfg.output.source.display());
            Ok(())
        }

        Command::Inspect { discovery, json } => {
            let cfg = load_config(&discovery, discovery.overrides())?;
            let analysis = analyze(&cfg, &discovery.package)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&analysis)?);
            } else {
                print!("{}", format_inspection(&analysis));
            }
            Ok(())
        }

        Command::Version => {
            println!("autorst {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// Config from `--config`, else from the default file if present, with CLI
/// flags merged on top
fn load_config(discovery: &DiscoveryArgs, overrides: CliOverrides) -> Result<Config> {
    let mut cfg = match &discovery.config {
        Some(path) => Config::load(path)?,
        None => Config::load_or_default(Path::new(DEFAULT_CONFIG_FILE))?,
    };

    cfg.merge_cli(overrides);
    cfg.validate()?;
    Ok(cfg)
}

fn analyze(cfg: &Config, package: &str) -> Result<AnalysisResult> {
    let mut source = open_source(cfg)?;
    Analyzer::new(cfg)?.analyze(source.as_mut(), package)
}

/// One line per module, members indented below it
fn format_inspection(analysis: &AnalysisResult) -> String {
    let mut out = String::new();
    for module in &analysis.modules {
        out.push_str(&module.dotted_name);
        if module.has_leading_doc {
            out.push_str(" (doc)");
        }
        out.push('\n');
        for member in &module.member_names {
            out.push_str("    ");
            out.push_str(member);
            out.push('\n');
        }
    }
    out.push_str(&format!(
        "{} modules in {}\n",
        analysis.modules.len(),
        analysis.package
    ));
    out
}
