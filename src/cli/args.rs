//! CLI argument parsing

use crate::config::{CliOverrides, MemberOrder};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Generate Sphinx API and module doc stubs from Python packages
#[derive(Parser, Debug)]
#[command(name = "autorst")]
#[command(about = "Generate Sphinx API and module doc stubs from Python packages")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Debug logging and a progress bar
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

impl Args {
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Options shared by every command that walks a package
#[derive(clap::Args, Debug, Clone)]
pub struct DiscoveryArgs {
    /// Dotted name of the root package
    pub package: String,

    /// Directory searched for the package (can be repeated)
    #[arg(short, long = "path")]
    pub paths: Vec<PathBuf>,

    /// Config file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// JSON symbol manifest used instead of scanning sources
    #[arg(long)]
    pub manifest: Option<PathBuf>,

    /// Regex over full dotted module names to skip
    #[arg(short = 'X', long)]
    pub exclude: Option<String>,

    /// Order of members on API pages (alphabetical, declaration)
    #[arg(long, value_parser = parse_member_order)]
    pub member_order: Option<MemberOrder>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write API pages, doc pages and indices for a package
    Generate {
        #[command(flatten)]
        discovery: DiscoveryArgs,

        /// Base output directory
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// API page directory, relative to the source dir
        #[arg(short, long)]
        apipath: Option<String>,

        /// Doc page directory, relative to the source dir
        #[arg(short, long)]
        docpath: Option<String>,

        /// Hand-written docs directory, relative to the source dir
        #[arg(short, long)]
        writtenpath: Option<String>,

        /// Write the top-level index, backing up an existing one
        #[arg(short = 'i', long)]
        write_index: bool,

        /// Write doc pages for modules with a leading doc string
        #[arg(long)]
        write_doc: bool,

        /// Skip API pages and the API index
        #[arg(long)]
        no_write_api: bool,

        /// Back up and replace existing pages instead of failing
        #[arg(long)]
        overwrite: bool,
    },

    /// List the modules and members a run would document, writing nothing
    Inspect {
        #[command(flatten)]
        discovery: DiscoveryArgs,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

impl DiscoveryArgs {
    /// Config overrides for the discovery options
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            search_paths: self.paths.clone(),
            manifest: self.manifest.clone(),
            exclude: self.exclude.clone(),
            member_order: self.member_order,
            ..Default::default()
        }
    }
}

fn parse_member_order(s: &str) -> std::result::Result<MemberOrder, String> {
    s.parse().map_err(|e: crate::error::Error| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_defaults() {
        let args = Args::try_parse_from(["autorst", "generate", "demo"]).unwrap();
        assert!(!args.verbose);
        assert!(!args.quiet);
        match args.command {
            Command::Generate {
                discovery,
                source,
                apipath,
                write_index,
                write_doc,
                no_write_api,
                overwrite,
                ..
            } => {
                assert_eq!(discovery.package, "demo");
                assert!(discovery.paths.is_empty());
                assert!(discovery.config.is_none());
                assert!(discovery.member_order.is_none());
                assert!(source.is_none());
                assert!(apipath.is_none());
                assert!(!write_index);
                assert!(!write_doc);
                assert!(!no_write_api);
                assert!(!overwrite);
            }
            _ => panic!("Expected Generate command"),
        }
    }

    #[test]
    fn test_generate_with_options() {
        let args = Args::try_parse_from([
            "autorst", "generate", "demo",
            "-p", "src",
            "--path", "lib",
            "--config", "custom.toml",
            "-s", "docs/source",
            "-a", "api",
            "-d", "doc",
            "-w", "guide",
            "-i",
            "--write-doc",
            "--no-write-api",
            "--overwrite",
            "-X", r"\.tests\.",
            "--member-order", "declaration",
            "--verbose",
        ])
        .unwrap();

        assert!(args.verbose);
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
                assert_eq!(discovery.paths, vec![PathBuf::from("src"), PathBuf::from("lib")]);
                assert_eq!(discovery.config, Some(PathBuf::from("custom.toml")));
                assert_eq!(discovery.exclude.as_deref(), Some(r"\.tests\."));
                assert_eq!(discovery.member_order, Some(MemberOrder::Declaration));
                assert_eq!(source, Some(PathBuf::from("docs/source")));
                assert_eq!(apipath.as_deref(), Some("api"));
                assert_eq!(docpath.as_deref(), Some("doc"));
                assert_eq!(writtenpath.as_deref(), Some("guide"));
                assert!(write_index);
                assert!(write_doc);
                assert!(no_write_api);
                assert!(overwrite);
            }
            _ => panic!("Expected Generate command"),
        }
    }

    #[test]
    fn test_generate_requires_package() {
        assert!(Args::try_parse_from(["autorst", "generate"]).is_err());
    }

    #[test]
    fn test_invalid_member_order() {
        let result =
            Args::try_parse_from(["autorst", "generate", "demo", "--member-order", "random"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Args::try_parse_from(["autorst", "-v", "-q", "version"]).is_err());
    }

    #[test]
    fn test_inspect() {
        let args =
            Args::try_parse_from(["autorst", "inspect", "demo", "--manifest", "syms.json", "--json"])
                .unwrap();
        match args.command {
            Command::Inspect { discovery, json } => {
                assert_eq!(discovery.package, "demo");
                assert_eq!(discovery.manifest, Some(PathBuf::from("syms.json")));
                assert!(json);
            }
            _ => panic!("Expected Inspect command"),
        }
    }

    #[test]
    fn test_overrides() {
        let args = Args::try_parse_from(["autorst", "inspect", "demo", "-p", "src", "-X", "skip"])
            .unwrap();
        let Command::Inspect { discovery, .. } = args.command else {
            panic!("Expected Inspect command");
        };
        let overrides = discovery.overrides();
        assert_eq!(overrides.search_paths, vec![PathBuf::from("src")]);
        assert_eq!(overrides.exclude.as_deref(), Some("skip"));
        assert!(!overrides.write_index);
    }

    #[test]
    fn test_version_command() {
        let args = Args::try_parse_from(["autorst", "version"]).unwrap();
        assert!(matches!(args.command, Command::Version));
    }
}
