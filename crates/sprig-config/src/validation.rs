use std::collections::HashSet;

use thiserror::Error;

use crate::SprigConfig;

#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigValidationError {
    #[error("indexing.max_passes must be at least 1")]
    MaxPassesZero,
    #[error("indexing.background_threads must be at least 1")]
    BackgroundThreadsZero,
    #[error("indexing.ignored_annotation_prefixes contains an empty prefix")]
    EmptyIgnoredPrefix,
    #[error("logging.level {value:?} is not a valid filter")]
    InvalidLoggingLevel { value: String },
    #[error("projects[{index}] has an empty {field}")]
    EmptyProjectField { index: usize, field: &'static str },
    #[error("project {name:?} is declared more than once")]
    DuplicateProject { name: String },
}

impl SprigConfig {
    /// Every semantic problem with this configuration; empty when it is usable.
    #[must_use]
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();
        validate_indexing(self, &mut errors);
        validate_logging(self, &mut errors);
        validate_projects(self, &mut errors);
        errors
    }
}

fn validate_indexing(config: &SprigConfig, errors: &mut Vec<ConfigValidationError>) {
    let indexing = &config.indexing;
    if indexing.max_passes == 0 {
        errors.push(ConfigValidationError::MaxPassesZero);
    }
    if indexing.background_threads == Some(0) {
        errors.push(ConfigValidationError::BackgroundThreadsZero);
    }
    if indexing
        .ignored_annotation_prefixes
        .iter()
        .any(|prefix| prefix.trim().is_empty())
    {
        errors.push(ConfigValidationError::EmptyIgnoredPrefix);
    }
}

fn validate_logging(config: &SprigConfig, errors: &mut Vec<ConfigValidationError>) {
    if config.logging.parse_filter().is_err() {
        errors.push(ConfigValidationError::InvalidLoggingLevel {
            value: config.logging.level.clone(),
        });
    }
}

fn validate_projects(config: &SprigConfig, errors: &mut Vec<ConfigValidationError>) {
    let mut names = HashSet::new();
    for (index, project) in config.projects.iter().enumerate() {
        if project.name.trim().is_empty() {
            errors.push(ConfigValidationError::EmptyProjectField {
                index,
                field: "name",
            });
        } else if !names.insert(project.name.as_str()) {
            errors.push(ConfigValidationError::DuplicateProject {
                name: project.name.clone(),
            });
        }
        if project.root.trim().is_empty() {
            errors.push(ConfigValidationError::EmptyProjectField {
                index,
                field: "root",
            });
        }
    }
}
