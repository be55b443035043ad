use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "autorst.toml";

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub discovery: DiscoveryConfig,
    pub output: OutputConfig,
    pub generate: GenerateConfig,
}

/// Where and how the package is discovered
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Directories searched (in order) for the root package
    pub search_paths: Vec<PathBuf>,
    /// Regex over full dotted module names; matches are skipped
    pub exclude: Option<String>,
    /// JSON symbol registry used instead of scanning sources
    pub manifest: Option<PathBuf>,
}

/// Output layout. Sub-paths are relative to `source` and double as
/// toctree links, so they are kept as `/`-separated strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub source: PathBuf,
    pub apipath: String,
    pub docpath: String,
    pub writtenpath: String,
    pub extension: String,
    pub backup_prefix: String,
}

/// Which artifacts a run produces
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateConfig {
    pub write_api: bool,
    pub write_doc: bool,
    pub write_index: bool,
    pub overwrite: bool,
    pub member_order: MemberOrder,
}

/// Order of member names on API pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MemberOrder {
    #[default]
    Alphabetical,
    Declaration,
}

impl std::str::FromStr for MemberOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "alphabetical" | "alpha" => Ok(MemberOrder::Alphabetical),
            "declaration" | "source" => Ok(MemberOrder::Declaration),
            other => Err(Error::config_validation(format!(
                "unknown member order: {}",
                other
            ))),
        }
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            search_paths: vec![PathBuf::from(".")],
            exclude: None,
            manifest: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from("source"),
            apipath: "generated/api".to_string(),
            docpath: "generated/doc".to_string(),
            writtenpath: "written".to_string(),
            extension: "rst".to_string(),
            backup_prefix: ".bak".to_string(),
        }
    }
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            write_api: true,
            write_doc: false,
            write_index: false,
            overwrite: false,
            member_order: MemberOrder::default(),
        }
    }
}

/// CLI overrides; `None`/`false` leaves the config value alone
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub search_paths: Vec<PathBuf>,
    pub manifest: Option<PathBuf>,
    pub exclude: Option<String>,
    pub source: Option<PathBuf>,
    pub apipath: Option<String>,
    pub docpath: Option<String>,
    pub writtenpath: Option<String>,
    pub write_index: bool,
    pub write_doc: bool,
    pub no_write_api: bool,
    pub overwrite: bool,
    pub member_order: Option<MemberOrder>,
}

impl Config {
    /// Load config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from file, or defaults if the file does not exist
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Merge CLI arguments into config (CLI takes precedence)
    pub fn merge_cli(&mut self, cli: CliOverrides) {
        if !cli.search_paths.is_empty() {
            self.discovery.search_paths = cli.search_paths;
        }
        if cli.manifest.is_some() {
            self.discovery.manifest = cli.manifest;
        }
        if cli.exclude.is_some() {
            self.discovery.exclude = cli.exclude;
        }

        if let Some(source) = cli.source {
            self.output.source = source;
        }
        if let Some(apipath) = cli.apipath {
            self.output.apipath = apipath;
        }
        if let Some(docpath) = cli.docpath {
            self.output.docpath = docpath;
        }
        if let Some(writtenpath) = cli.writtenpath {
            self.output.writtenpath = writtenpath;
        }

        if cli.write_index {
            self.generate.write_index = true;
        }
        if cli.write_doc {
            self.generate.write_doc = true;
        }
        if cli.no_write_api {
            self.generate.write_api = false;
        }
        if cli.overwrite {
            self.generate.overwrite = true;
        }
        if let Some(order) = cli.member_order {
            self.generate.member_order = order;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.discovery.search_paths.is_empty() {
            return Err(Error::config_validation("at least one search path required"));
        }

        for (key, value) in [
            ("apipath", &self.output.apipath),
            ("docpath", &self.output.docpath),
            ("writtenpath", &self.output.writtenpath),
        ] {
            if value.trim().is_empty() {
                return Err(Error::config_validation(format!("{} must not be empty", key)));
            }
            if Path::new(value).is_absolute() {
                return Err(Error::config_validation(format!(
                    "{} must be relative to the source dir, got {}",
                    key, value
                )));
            }
        }

        if self.output.extension.is_empty() {
            return Err(Error::config_validation("extension must not be empty"));
        }

        if self.output.backup_prefix.is_empty() {
            return Err(Error::config_validation("backup_prefix must not be empty"));
        }

        if let Some(pattern) = &self.discovery.exclude {
            regex::Regex::new(pattern)?;
        }

        Ok(())
    }
}
