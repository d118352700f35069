mod pipeline;
mod providers;
mod service;

use sprig_core::FileUri;
use sprig_index::{
    ElementTree, FileIndexSnapshot, FileStamp, IndexPipeline, IndexReport, MemorySourceStore,
    PipelineConfig, ProviderRegistry,
};
use sprig_scheduler::CancellationToken;

/// In-memory sources plus a pipeline with the built-in providers.
pub(crate) struct Workspace {
    pub store: MemorySourceStore,
    pub pipeline: IndexPipeline,
    pub files: Vec<FileUri>,
}

impl Workspace {
    pub fn new() -> Self {
        Self::with_config(PipelineConfig::default())
    }

    pub fn with_config(config: PipelineConfig) -> Self {
        Self::with_registry(ProviderRegistry::with_defaults().unwrap(), config)
    }

    pub fn with_registry(registry: ProviderRegistry, config: PipelineConfig) -> Self {
        Self {
            store: MemorySourceStore::new(),
            pipeline: IndexPipeline::new(registry, config).unwrap(),
            files: Vec::new(),
        }
    }

    pub fn add(&mut self, path: &str, text: &str) -> FileUri {
        let uri = uri(path);
        self.store.insert(uri.clone(), text);
        if !self.files.contains(&uri) {
            self.files.push(uri.clone());
        }
        uri
    }

    /// Index every added file with stamp `version`.
    pub fn index(&mut self, version: u64) -> IndexReport {
        let stamps: Vec<FileStamp> = self
            .files
            .iter()
            .map(|uri| FileStamp::new(uri.clone(), version))
            .collect();
        self.pipeline
            .run(&stamps, &self.store, &CancellationToken::new())
            .unwrap()
    }

    pub fn snapshot(&self, uri: &FileUri) -> std::sync::Arc<FileIndexSnapshot> {
        self.pipeline
            .snapshot(uri)
            .unwrap_or_else(|| panic!("no snapshot for {uri}"))
    }
}

/// A `@Component` class in `com.example`.
pub(crate) fn component(name: &str) -> String {
    format!(
        "package com.example;\n\
         import org.springframework.stereotype.Component;\n\
         @Component\n\
         public class {name} {{}}\n"
    )
}

pub(crate) fn uri(path: &str) -> FileUri {
    FileUri::new(format!("file:///ws/src/{path}"))
}

pub(crate) fn labels(trees: &[ElementTree]) -> Vec<&str> {
    trees.iter().map(|tree| tree.element.label.as_str()).collect()
}

pub(crate) fn symbol_labels(snapshot: &FileIndexSnapshot) -> Vec<&str> {
    snapshot
        .symbols
        .iter()
        .map(|symbol| symbol.label.as_str())
        .collect()
}
