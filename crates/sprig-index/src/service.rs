use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use sprig_annotations::RegistryError;
use sprig_core::FileUri;
use sprig_scheduler::{BlockingTask, CancellationToken, Quiescence, Scheduler, SchedulerConfig};

use crate::context::Hierarchies;
use crate::pipeline::{FileStamp, IndexPipeline, IndexReport, InvalidPassLimit, PipelineConfig};
use crate::project::ProjectRoot;
use crate::provider::ProviderRegistry;
use crate::source::SourceStore;
use crate::view::IndexView;

#[derive(Debug, Clone, Default)]
pub struct IndexerConfig {
    pub pipeline: PipelineConfig,
    pub scheduler: SchedulerConfig,
}

#[derive(Debug, thiserror::Error)]
pub enum IndexerError {
    #[error("invalid provider registry: {0}")]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    PassLimit(#[from] InvalidPassLimit),
}

/// Entry point for editors and tools.
///
/// Indexing requests run on the background pool, one pipeline run at a time. Every finished
/// run publishes a fresh [`IndexView`]; a cancelled run publishes nothing. Readers never
/// block on indexing.
#[derive(Clone)]
pub struct SpringIndexer {
    inner: Arc<Inner>,
}

struct Inner {
    pipeline: Mutex<IndexPipeline>,
    view: RwLock<Arc<IndexView>>,
    hierarchies: Arc<Hierarchies>,
    store: Arc<dyn SourceStore>,
    scheduler: Scheduler,
    quiescence: Quiescence,
}

impl SpringIndexer {
    /// Indexer with the built-in Spring providers.
    pub fn new(config: IndexerConfig, store: Arc<dyn SourceStore>) -> Result<Self, IndexerError> {
        Self::with_registry(ProviderRegistry::with_defaults()?, config, store)
    }

    pub fn with_registry(
        registry: ProviderRegistry,
        config: IndexerConfig,
        store: Arc<dyn SourceStore>,
    ) -> Result<Self, IndexerError> {
        let pipeline = IndexPipeline::new(registry, config.pipeline)?;
        Ok(Self {
            inner: Arc::new(Inner {
                hierarchies: pipeline.hierarchies(),
                view: RwLock::new(Arc::new(pipeline.view())),
                pipeline: Mutex::new(pipeline),
                store,
                scheduler: Scheduler::new(config.scheduler),
                quiescence: Quiescence::new(),
            }),
        })
    }

    pub fn index_file(&self, uri: FileUri, last_modified: u64) -> BlockingTask<IndexReport> {
        self.index_files(vec![FileStamp::new(uri, last_modified)])
    }

    pub fn index_files(&self, stamps: Vec<FileStamp>) -> BlockingTask<IndexReport> {
        self.index_files_with_token(stamps, CancellationToken::new())
    }

    pub fn index_files_with_token(
        &self,
        stamps: Vec<FileStamp>,
        token: CancellationToken,
    ) -> BlockingTask<IndexReport> {
        let guard = self.inner.quiescence.begin();
        let inner = self.inner.clone();
        self.inner
            .scheduler
            .spawn_background_with_token(token, move |token| {
                let _guard = guard;
                let progress = inner
                    .scheduler
                    .progress()
                    .start("Indexing Spring elements", u32::try_from(stamps.len()).ok());
                let mut pipeline = inner.pipeline.lock();
                let report =
                    pipeline.run_with_progress(&stamps, &*inner.store, &token, Some(&progress));
                match &report {
                    Ok(report) => {
                        inner.publish(&pipeline);
                        progress.finish(format!(
                            "{} indexed, {} unchanged",
                            report.indexed.len(),
                            report.reused
                        ));
                    }
                    // Readers keep the last complete view; the next run rebuilds what this
                    // one purged.
                    Err(_) => progress.finish("cancelled".to_string()),
                }
                report
            })
    }

    pub fn remove_file(&self, uri: FileUri) -> BlockingTask<bool> {
        let guard = self.inner.quiescence.begin();
        let inner = self.inner.clone();
        self.inner.scheduler.spawn_background(move |_token| {
            let _guard = guard;
            let mut pipeline = inner.pipeline.lock();
            let removed = pipeline.remove_file(&uri);
            inner.publish(&pipeline);
            Ok(removed)
        })
    }

    /// Re-attribute files to projects. Blocks while a run is in progress.
    pub fn set_projects(&self, projects: Vec<ProjectRoot>) {
        let mut pipeline = self.inner.pipeline.lock();
        pipeline.set_projects(projects);
        self.inner.publish(&pipeline);
    }

    /// The most recently published view.
    pub fn view(&self) -> Arc<IndexView> {
        self.inner.view.read().clone()
    }

    pub fn hierarchies(&self) -> Arc<Hierarchies> {
        self.inner.hierarchies.clone()
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.inner.scheduler
    }

    pub fn is_quiescent(&self) -> bool {
        self.inner.quiescence.is_quiescent()
    }

    /// Resolves once no indexing request is queued or running.
    pub async fn wait_for_quiescence(&self) -> Arc<IndexView> {
        self.inner.quiescence.wait().await;
        self.view()
    }

    pub fn wait_for_quiescence_blocking(&self) -> Arc<IndexView> {
        self.inner.quiescence.wait_blocking();
        self.view()
    }

    /// `None` if indexing was still running after `timeout`.
    pub fn wait_for_quiescence_timeout(&self, timeout: Duration) -> Option<Arc<IndexView>> {
        self.inner
            .quiescence
            .wait_blocking_timeout(timeout)
            .then(|| self.view())
    }
}

impl Inner {
    fn publish(&self, pipeline: &IndexPipeline) {
        *self.view.write() = Arc::new(pipeline.view());
    }
}
