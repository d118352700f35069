//! `sprig.toml` configuration.
//!
//! Every section and key is optional; missing values fall back to their defaults and unknown
//! keys are rejected at load time.
//!
//! ```toml
//! [logging]
//! level = "sprig.index=debug,info"
//! json = false
//!
//! [indexing]
//! max_passes = 3
//! ignored_annotation_prefixes = ["java.", "kotlin."]
//!
//! [[projects]]
//! name = "shop"
//! root = "services/shop"
//! ```

mod logging;
mod schema;
mod validation;

use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sprig_annotations::DEFAULT_IGNORED_PREFIXES;
use sprig_core::FileUri;
use sprig_index::{IndexerConfig, PipelineConfig, ProjectRoot, DEFAULT_MAX_PASSES};
use sprig_scheduler::SchedulerConfig;
use thiserror::Error;

pub use logging::{init_tracing, LoggingConfig};
pub use schema::json_schema;
pub use validation::ConfigValidationError;

/// File names looked up by [`discover_config_path`], in order.
pub const CONFIG_FILE_NAMES: [&str; 2] = ["sprig.toml", ".sprig.toml"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct SprigConfig {
    pub logging: LoggingConfig,
    pub indexing: IndexingConfig,
    /// Source roots that beans are attributed to.
    pub projects: Vec<ProjectConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct IndexingConfig {
    /// Maximum number of passes per indexing run. Files still deferring after the last pass
    /// keep their partial output.
    #[schemars(range(min = 1))]
    pub max_passes: u8,

    /// Annotation namespaces never searched for meta-annotations.
    pub ignored_annotation_prefixes: Vec<String>,

    /// Worker threads for background indexing. Defaults to the scheduler's choice.
    #[schemars(range(min = 1))]
    pub background_threads: Option<usize>,
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            max_passes: DEFAULT_MAX_PASSES,
            ignored_annotation_prefixes: DEFAULT_IGNORED_PREFIXES
                .iter()
                .map(|prefix| prefix.to_string())
                .collect(),
            background_threads: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    pub name: String,
    /// A `file://` URI, or a path relative to the directory holding the config file.
    pub root: String,
}

impl ProjectConfig {
    fn to_root(&self, base_dir: &Path) -> ProjectRoot {
        let root = if self.root.starts_with("file://") {
            self.root.clone()
        } else {
            FileUri::from_path(&base_dir.join(&self.root))
                .as_str()
                .to_string()
        };
        ProjectRoot::new(self.name.clone(), root)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse toml config: {0}")]
    Toml(String),
    #[error("invalid configuration: {}", join_errors(.0))]
    Invalid(Vec<ConfigValidationError>),
}

fn join_errors(errors: &[ConfigValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        // The default rendering quotes the offending source line; keep just the message.
        ConfigError::Toml(err.message().to_string())
    }
}

impl SprigConfig {
    /// Parse and validate TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: SprigConfig = toml::from_str(text)?;
        let errors = config.validate();
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(ConfigError::Invalid(errors))
        }
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Settings for [`sprig_index::SpringIndexer`]. Relative project roots resolve against
    /// `base_dir`.
    pub fn indexer_config(&self, base_dir: &Path) -> IndexerConfig {
        let mut scheduler = SchedulerConfig::default();
        if let Some(threads) = self.indexing.background_threads {
            scheduler.background_threads = threads;
        }
        IndexerConfig {
            pipeline: PipelineConfig {
                max_passes: self.indexing.max_passes,
                ignored_annotation_prefixes: self.indexing.ignored_annotation_prefixes.clone(),
                projects: self
                    .projects
                    .iter()
                    .map(|project| project.to_root(base_dir))
                    .collect(),
            },
            scheduler,
        }
    }
}

/// First config file found in `workspace_root` or one of its ancestors.
pub fn discover_config_path(workspace_root: &Path) -> Option<PathBuf> {
    workspace_root.ancestors().find_map(|dir| {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file())
    })
}

/// Load the config governing `workspace_root`, or the defaults when there is none.
///
/// Returns the directory relative project roots resolve against.
pub fn load_for_workspace(workspace_root: &Path) -> Result<(SprigConfig, PathBuf), ConfigError> {
    match discover_config_path(workspace_root) {
        Some(path) => {
            let config = SprigConfig::load_from_path(&path)?;
            let base = path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| workspace_root.to_path_buf());
            tracing::debug!(target: "sprig.config", path = %path.display(), "loaded config");
            Ok((config, base))
        }
        None => Ok((SprigConfig::default(), workspace_root.to_path_buf())),
    }
}
