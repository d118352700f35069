//! Multi-pass indexing over a batch of files.
//!
//! A run reads and parses every stale file, registers its types with the shared type index,
//! then visits the files pass by pass. Pass one sees a declarations-only parse; later passes
//! reparse with method bodies and only visit files that asked for another pass. Output of a
//! file is published as a [`FileIndexSnapshot`] once the run is over.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use sprig_annotations::DEFAULT_IGNORED_PREFIXES;
use sprig_core::{FileUri, LineIndex};
use sprig_java::{parse_unit, ImportScope, JavaUnit, ParseMode, TypeIndex};
use sprig_scheduler::{CancellationToken, Cancelled, Progress};

use crate::context::{FileInput, Hierarchies, Pass, PassContext};
use crate::dispatch;
use crate::element::IndexedSymbol;
use crate::graph::ElementGraph;
use crate::project::{project_for, ProjectRoot};
use crate::provider::ProviderRegistry;
use crate::snapshot::FileIndexSnapshot;
use crate::source::SourceStore;
use crate::view::IndexView;

pub const DEFAULT_MAX_PASSES: u8 = 2;

/// A file to index and the modification stamp of its current contents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FileStamp {
    pub uri: FileUri,
    pub last_modified: u64,
}

impl FileStamp {
    pub fn new(uri: FileUri, last_modified: u64) -> Self {
        Self { uri, last_modified }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineConfig {
    /// Upper bound on passes per run; at least one.
    pub max_passes: u8,
    /// Annotation namespaces the closure engine never walks into.
    pub ignored_annotation_prefixes: Vec<String>,
    pub projects: Vec<ProjectRoot>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_passes: DEFAULT_MAX_PASSES,
            ignored_annotation_prefixes: DEFAULT_IGNORED_PREFIXES
                .iter()
                .map(|prefix| prefix.to_string())
                .collect(),
            projects: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("max_passes must be at least 1")]
pub struct InvalidPassLimit;

/// Outcome of one [`IndexPipeline::run`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IndexReport {
    /// Files whose snapshot was rebuilt, in input order.
    pub indexed: Vec<FileUri>,
    /// Files skipped because their snapshot matched the stamp.
    pub reused: usize,
    /// Files that could not be read or parsed; their previous output was dropped.
    pub failed: Vec<FileUri>,
    /// Number of deferrals honoured (a file deferred twice counts twice).
    pub deferred: usize,
    /// Files that still asked for another pass at the pass limit.
    pub deferral_exhausted: Vec<FileUri>,
    /// Highest pass that visited at least one file.
    pub passes: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileState {
    Pending,
    NeedsPass(Pass),
    Done,
}

struct FileWork {
    stamp: FileStamp,
    text: Arc<str>,
    line_index: LineIndex,
    unit: JavaUnit,
    scope: ImportScope,
    state: FileState,
    passes: u8,
    exhausted: bool,
}

/// Owns the element graph and the published snapshots.
pub struct IndexPipeline {
    registry: ProviderRegistry,
    hierarchies: Arc<Hierarchies>,
    graph: ElementGraph,
    symbols: HashMap<FileUri, Vec<IndexedSymbol>>,
    snapshots: BTreeMap<FileUri, Arc<FileIndexSnapshot>>,
    projects: Vec<ProjectRoot>,
    max_passes: u8,
}

impl IndexPipeline {
    pub fn new(
        registry: ProviderRegistry,
        config: PipelineConfig,
    ) -> Result<Self, InvalidPassLimit> {
        if config.max_passes == 0 {
            return Err(InvalidPassLimit);
        }
        let hierarchies = Hierarchies::new(TypeIndex::new())
            .with_ignored_prefixes(config.ignored_annotation_prefixes);
        Ok(Self {
            registry,
            hierarchies: Arc::new(hierarchies),
            graph: ElementGraph::new(),
            symbols: HashMap::new(),
            snapshots: BTreeMap::new(),
            projects: config.projects,
            max_passes: config.max_passes,
        })
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    pub fn hierarchies(&self) -> Arc<Hierarchies> {
        self.hierarchies.clone()
    }

    pub fn graph(&self) -> &ElementGraph {
        &self.graph
    }

    pub fn max_passes(&self) -> u8 {
        self.max_passes
    }

    pub fn snapshot(&self, uri: &FileUri) -> Option<Arc<FileIndexSnapshot>> {
        self.snapshots.get(uri).cloned()
    }

    /// Immutable view of every published snapshot.
    pub fn view(&self) -> IndexView {
        IndexView::new(self.snapshots.clone())
    }

    /// Replace the project roots; published snapshots are re-attributed.
    pub fn set_projects(&mut self, projects: Vec<ProjectRoot>) {
        self.projects = projects;
        for snapshot in self.snapshots.values_mut() {
            let project = project_for(&self.projects, &snapshot.uri).map(str::to_string);
            if snapshot.project != project {
                Arc::make_mut(snapshot).project = project;
            }
        }
    }

    /// Forget a file: its output, its snapshot and its types.
    pub fn remove_file(&mut self, uri: &FileUri) -> bool {
        let known = self.purge_output(uri);
        self.hierarchies.with_resolver(|types| types.remove_file(uri));
        known
    }

    /// Index `stamps`. Files whose snapshot carries the same stamp are reused untouched.
    ///
    /// On cancellation the run stops between provider calls. Files already purged keep
    /// whatever they produced so far in the graph but get no snapshot, so the next run
    /// rebuilds them.
    pub fn run(
        &mut self,
        stamps: &[FileStamp],
        store: &dyn SourceStore,
        token: &CancellationToken,
    ) -> Result<IndexReport, Cancelled> {
        self.run_with_progress(stamps, store, token, None)
    }

    /// [`IndexPipeline::run`], reporting on `progress` as files finish their first pass.
    /// Reused and unreadable files count as done once loading is over.
    pub fn run_with_progress(
        &mut self,
        stamps: &[FileStamp],
        store: &dyn SourceStore,
        token: &CancellationToken,
        progress: Option<&Progress>,
    ) -> Result<IndexReport, Cancelled> {
        let started = Instant::now();
        let mut report = IndexReport::default();
        let mut work = Vec::new();
        let mut seen = HashSet::new();
        let mut done: u32 = 0;

        for stamp in stamps {
            Cancelled::check(token)?;
            if !seen.insert(&stamp.uri) {
                continue;
            }
            let cached = self
                .snapshots
                .get(&stamp.uri)
                .is_some_and(|snapshot| snapshot.last_modified == stamp.last_modified);
            if cached {
                report.reused += 1;
                done += 1;
                continue;
            }
            match self.load(stamp, store) {
                Some(file) => work.push(file),
                None => {
                    self.remove_file(&stamp.uri);
                    report.failed.push(stamp.uri.clone());
                    done += 1;
                }
            }
        }
        if let Some(progress) = progress.filter(|_| done > 0) {
            progress.report(None, done);
        }

        let mut pass = Pass::ONE;
        loop {
            let queue: Vec<usize> = work
                .iter()
                .enumerate()
                .filter(|(_, file)| match file.state {
                    FileState::Pending => pass.is_first(),
                    FileState::NeedsPass(next) => next == pass,
                    FileState::Done => false,
                })
                .map(|(index, _)| index)
                .collect();
            if queue.is_empty() {
                break;
            }
            report.passes = pass.number();
            tracing::debug!(
                target: "sprig.index",
                pass = pass.number(),
                files = queue.len(),
                "starting pass"
            );

            for index in queue {
                Cancelled::check(token)?;
                let file = &mut work[index];
                if pass.is_first() {
                    self.purge_output(&file.stamp.uri);
                } else {
                    match parse_unit(&file.text, ParseMode::Full) {
                        Ok(unit) => {
                            file.scope = ImportScope::for_unit(&unit);
                            file.unit = unit;
                        }
                        Err(err) => {
                            tracing::warn!(
                                target: "sprig.index",
                                file = %file.stamp.uri,
                                %pass,
                                error = %err,
                                "reparse failed; keeping output of earlier passes"
                            );
                            file.state = FileState::Done;
                            continue;
                        }
                    }
                }

                let deferral = self.visit(file, pass, token);
                Cancelled::check(token)?;
                file.passes = pass.number();
                file.state = match deferral {
                    Some(reason) if pass.number() < self.max_passes => {
                        tracing::debug!(
                            target: "sprig.index",
                            file = %file.stamp.uri,
                            %pass,
                            reason = %reason,
                            "file deferred to the next pass"
                        );
                        report.deferred += 1;
                        FileState::NeedsPass(pass.next())
                    }
                    Some(reason) => {
                        tracing::warn!(
                            target: "sprig.index",
                            file = %file.stamp.uri,
                            max_passes = self.max_passes,
                            reason = %reason,
                            "pass limit reached; keeping partial output"
                        );
                        file.exhausted = true;
                        report.deferral_exhausted.push(file.stamp.uri.clone());
                        FileState::Done
                    }
                    None => FileState::Done,
                };
                if let Some(progress) = progress.filter(|_| pass.is_first()) {
                    done += 1;
                    progress.report(file.stamp.uri.to_string(), done);
                }
            }
            pass = pass.next();
        }

        for file in work {
            let uri = file.stamp.uri;
            let snapshot = FileIndexSnapshot {
                project: project_for(&self.projects, &uri).map(str::to_string),
                symbols: self.symbols.get(&uri).cloned().unwrap_or_default(),
                elements: self.graph.file_trees(&uri),
                last_modified: file.stamp.last_modified,
                passes: file.passes,
                deferral_exhausted: file.exhausted,
                uri: uri.clone(),
            };
            self.snapshots.insert(uri.clone(), Arc::new(snapshot));
            report.indexed.push(uri);
        }

        tracing::info!(
            target: "sprig.index",
            indexed = report.indexed.len(),
            reused = report.reused,
            failed = report.failed.len(),
            deferred = report.deferred,
            exhausted = report.deferral_exhausted.len(),
            passes = report.passes,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "index run finished"
        );
        Ok(report)
    }

    fn load(&self, stamp: &FileStamp, store: &dyn SourceStore) -> Option<FileWork> {
        let text = match store.read(&stamp.uri) {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(target: "sprig.index", file = %stamp.uri, error = %err, "cannot read file");
                return None;
            }
        };
        let unit = match parse_unit(&text, ParseMode::Declarations) {
            Ok(unit) => unit,
            Err(err) => {
                tracing::warn!(target: "sprig.index", file = %stamp.uri, error = %err, "cannot parse file");
                return None;
            }
        };
        self.hierarchies
            .with_resolver(|types| types.register_unit(&stamp.uri, &unit));
        Some(FileWork {
            stamp: stamp.clone(),
            line_index: LineIndex::new(&text),
            scope: ImportScope::for_unit(&unit),
            text,
            unit,
            state: FileState::Pending,
            passes: 0,
            exhausted: false,
        })
    }

    fn visit(&mut self, file: &FileWork, pass: Pass, token: &CancellationToken) -> Option<String> {
        let input = FileInput {
            file: &file.stamp.uri,
            source: &file.text,
            line_index: &file.line_index,
            unit: &file.unit,
            scope: &file.scope,
        };
        let symbols = self.symbols.entry(file.stamp.uri.clone()).or_default();
        let mut cx = PassContext::new(
            pass,
            input,
            &self.hierarchies,
            &mut self.graph,
            symbols,
            token,
        );
        dispatch::index_unit(&self.registry, &file.unit, &mut cx);
        cx.take_deferral()
    }

    /// Drop the elements, symbols and snapshot of `uri`. Returns whether anything was known.
    fn purge_output(&mut self, uri: &FileUri) -> bool {
        let removed = self.graph.remove_file(uri);
        let symbols = self.symbols.remove(uri).is_some();
        let snapshot = self.snapshots.remove(uri).is_some();
        removed > 0 || symbols || snapshot
    }
}
