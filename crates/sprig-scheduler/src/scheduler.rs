use std::sync::Arc;

use rayon::ThreadPool;
use tokio::sync::oneshot;

use sprig_core::panic_payload_to_str;

use crate::{BlockingTask, CancellationToken, Cancelled, ProgressSender, TaskError};

enum Pool {
    Rayon(ThreadPool),
    Inline,
}

impl Pool {
    fn spawn<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        match self {
            Pool::Rayon(pool) => pool.spawn(job),
            Pool::Inline => job(),
        }
    }
}

fn build_pool(prefix: &'static str, threads: usize) -> Pool {
    let mut threads = threads.max(1);
    loop {
        match rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(move |idx| format!("{prefix}-{idx}"))
            .build()
        {
            Ok(pool) => return Pool::Rayon(pool),
            // Thread limits: retry smaller, then run jobs on the caller's thread.
            Err(_) if threads > 1 => threads = (threads / 2).max(1),
            Err(err) => {
                tracing::warn!(
                    target: "sprig.scheduler",
                    error = %err,
                    "no worker threads available, running jobs inline"
                );
                return Pool::Inline;
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub background_threads: usize,
    pub progress_channel_capacity: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        let available = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self {
            background_threads: available.clamp(1, 2),
            progress_channel_capacity: 256,
        }
    }
}

/// Runs indexing jobs off the caller's thread.
#[derive(Clone)]
pub struct Scheduler {
    inner: Arc<SchedulerInner>,
}

struct SchedulerInner {
    background: Pool,
    progress: ProgressSender,
}

impl Scheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            inner: Arc::new(SchedulerInner {
                background: build_pool("sprig-index", config.background_threads),
                progress: ProgressSender::new(config.progress_channel_capacity),
            }),
        }
    }

    pub fn progress(&self) -> ProgressSender {
        self.inner.progress.clone()
    }

    pub fn spawn_background<T, F>(&self, f: F) -> BlockingTask<T>
    where
        T: Send + 'static,
        F: FnOnce(CancellationToken) -> Result<T, Cancelled> + Send + 'static,
    {
        self.spawn_background_with_token(CancellationToken::new(), f)
    }

    /// Run `f` on the background pool. A panic inside `f` is logged and surfaces as
    /// [`TaskError::Panicked`].
    pub fn spawn_background_with_token<T, F>(
        &self,
        token: CancellationToken,
        f: F,
    ) -> BlockingTask<T>
    where
        T: Send + 'static,
        F: FnOnce(CancellationToken) -> Result<T, Cancelled> + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        if token.is_cancelled() {
            let _ = tx.send(Err(TaskError::Cancelled));
            return BlockingTask::new(token, rx);
        }

        let job_token = token.clone();
        let job = move || {
            let result =
                match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| f(job_token))) {
                    Ok(Ok(value)) => Ok(value),
                    Ok(Err(err)) => Err(TaskError::from(err)),
                    Err(panic) => {
                        tracing::error!(
                            target: "sprig.scheduler",
                            panic = %panic_payload_to_str(&*panic),
                            "background job panicked"
                        );
                        Err(TaskError::Panicked)
                    }
                };
            let _ = tx.send(result);
        };
        self.inner.background.spawn(job);

        BlockingTask::new(token, rx)
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(SchedulerConfig::default())
    }
}
