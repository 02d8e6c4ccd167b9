//! Configuration for the analysis run
//!
//! Settings come from three layers, strongest first:
//! - command line arguments
//! - `.phint.yaml` / `.phint.yml` (project directory, then home directory)
//! - built-in defaults

use crate::rules::Rule;
use crate::version::PhpVersion;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("unknown tool name: {0}")]
    UnknownTool(String),
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Pretty,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(OutputFormat::Pretty),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// File-backed settings. Output format and job count are command line
/// concerns and deliberately have no file spelling.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    php_version: Option<PhpVersion>,
    ignore_tools: Option<Vec<String>>,
    only_tools: Option<Vec<String>>,
    ignore_paths: Option<Vec<String>>,
    extensions: Option<Vec<String>>,
    vendor: Option<bool>,
}

/// Resolved configuration for one analysis run
#[derive(Debug, Clone)]
pub struct Config {
    /// Target PHP version; rules requiring a newer version stay inactive
    pub php_version: PhpVersion,

    /// Rule ids excluded from the run
    pub ignore_tools: Vec<String>,

    /// When non-empty, only these rule ids run
    pub only_tools: Vec<String>,

    /// Glob patterns for paths excluded from discovery
    pub ignore_paths: Vec<String>,

    /// File extensions treated as PHP sources
    pub extensions: Vec<String>,

    /// Analyze vendor directories too
    pub vendor: bool,

    /// Report format
    pub format: OutputFormat,

    /// Number of worker threads (0 = auto-detect)
    pub jobs: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            php_version: PhpVersion::LATEST,
            ignore_tools: Vec::new(),
            only_tools: Vec::new(),
            ignore_paths: Vec::new(),
            extensions: vec!["php".to_string()],
            vendor: false,
            format: OutputFormat::Pretty,
            jobs: 0,
        }
    }
}

const CONFIG_NAMES: [&str; 2] = [".phint.yaml", ".phint.yml"];

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let file: ConfigFile = serde_yaml::from_str(&content)?;

        let mut config = Self::default();
        config.apply_file(file);
        Ok(config)
    }

    /// Load configuration from default locations: the current directory
    /// first, then the home directory, else built-in defaults.
    pub fn load_default() -> Result<Self, ConfigError> {
        for name in &CONFIG_NAMES {
            let path = PathBuf::from(name);
            if path.exists() {
                return Self::load(&path);
            }
        }

        if let Some(home) = dirs::home_dir() {
            for name in &CONFIG_NAMES {
                let path = home.join(name);
                if path.exists() {
                    return Self::load(&path);
                }
            }
        }

        Ok(Self::default())
    }

    fn apply_file(&mut self, file: ConfigFile) {
        if let Some(version) = file.php_version {
            self.php_version = version;
        }
        if let Some(tools) = file.ignore_tools {
            self.ignore_tools = tools;
        }
        if let Some(tools) = file.only_tools {
            self.only_tools = tools;
        }
        if let Some(paths) = file.ignore_paths {
            self.ignore_paths = paths;
        }
        if let Some(extensions) = file.extensions {
            self.extensions = extensions;
        }
        if let Some(vendor) = file.vendor {
            self.vendor = vendor;
        }
    }

    /// Merge command line arguments into configuration. Arguments replace
    /// the file-level value wholesale rather than appending to it.
    #[allow(clippy::too_many_arguments)]
    pub fn merge_cli(
        &mut self,
        php_version: Option<PhpVersion>,
        ignore_tools: Option<Vec<String>>,
        only_tools: Option<Vec<String>>,
        ignore_paths: Option<Vec<String>>,
        extensions: Option<Vec<String>>,
        vendor: bool,
        format: Option<OutputFormat>,
        jobs: Option<usize>,
    ) {
        if let Some(version) = php_version {
            self.php_version = version;
        }
        if let Some(tools) = ignore_tools {
            self.ignore_tools = tools;
        }
        if let Some(tools) = only_tools {
            self.only_tools = tools;
        }
        if let Some(paths) = ignore_paths {
            self.ignore_paths = paths;
        }
        if let Some(exts) = extensions {
            self.extensions = exts;
        }
        if vendor {
            self.vendor = true;
        }
        if let Some(f) = format {
            self.format = f;
        }
        if let Some(j) = jobs {
            self.jobs = j;
        }
    }

    /// Reject tool names that match no known rule id.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for name in self.ignore_tools.iter().chain(self.only_tools.iter()) {
            if !Rule::VALID_IDS.contains(&name.as_str()) {
                return Err(ConfigError::UnknownTool(name.clone()));
            }
        }
        Ok(())
    }

    pub fn ignored_ids(&self) -> HashSet<String> {
        self.ignore_tools.iter().cloned().collect()
    }

    pub fn allowed_ids(&self) -> HashSet<String> {
        self.only_tools.iter().cloned().collect()
    }
}
